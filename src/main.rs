mod form;
mod routes;
mod services;
mod state;
mod store;

use std::sync::Arc;

use services::residents::{ResidentLookup, ResidentsClient};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "data".into());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    let store = store::Store::open(&data_dir)
        .await
        .expect("store init failed");

    // Initialize the resident directory client (non-fatal: resident dropdowns
    // keep their stored options if the directory is not configured).
    let residents: Option<Arc<dyn ResidentLookup>> = match ResidentsClient::from_env() {
        Ok(client) => {
            tracing::info!(base_url = client.base_url(), "resident directory configured");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!(error = %e, "resident directory not configured — resident lookup disabled");
            None
        }
    };

    let state = state::AppState::new(Arc::new(store), residents);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, %data_dir, "formboard listening");
    axum::serve(listener, app).await.expect("server failed");
}
