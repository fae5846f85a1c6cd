//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the draft-builder, template, and form endpoints under a
//! single Axum router with permissive CORS and request tracing. Every error
//! response carries a JSON `{"message": ...}` body — the transient message a
//! client surfaces to the user.

pub mod drafts;
pub mod forms;
pub mod templates;

use axum::Router;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, patch, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// All application routes.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/draft", post(drafts::create_draft))
        .route(
            "/api/draft/{id}",
            get(drafts::get_draft)
                .patch(drafts::rename_draft)
                .delete(drafts::discard_draft),
        )
        .route("/api/draft/{id}/preview", get(drafts::preview_draft))
        .route("/api/draft/{id}/save", post(drafts::save_draft))
        .route("/api/draft/{id}/section", post(drafts::add_section))
        .route(
            "/api/draft/{id}/section/{section_id}",
            patch(drafts::update_section).delete(drafts::delete_section),
        )
        .route("/api/draft/{id}/section/{section_id}/field", post(drafts::add_field))
        .route(
            "/api/draft/{id}/section/{section_id}/field/{field_id}",
            patch(drafts::update_field).delete(drafts::delete_field),
        )
        .route(
            "/api/draft/{id}/section/{section_id}/field/{field_id}/move",
            post(drafts::move_field),
        )
        .route("/api/template", get(templates::list_templates))
        .route(
            "/api/template/{id}",
            get(templates::get_template).delete(templates::delete_template),
        )
        .route("/api/template/{id}/form", get(forms::fill_form))
        .route(
            "/api/template/{id}/submissions",
            get(forms::list_submissions).post(forms::submit_form),
        )
        .route(
            "/api/submission/{id}",
            get(forms::view_submission).patch(forms::update_submission),
        )
        .route("/api/submission/{id}/edit", get(forms::edit_form))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Error payload: HTTP status plus the transient user-facing message.
pub(crate) type ApiError = (StatusCode, Json<serde_json::Value>);

pub(crate) fn message_error(status: StatusCode, message: &str) -> ApiError {
    (status, Json(serde_json::json!({ "message": message })))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
