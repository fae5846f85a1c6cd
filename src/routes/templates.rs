//! Template routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::form::Template;
use crate::routes::{ApiError, message_error};
use crate::state::AppState;

/// One row of the template listing.
#[derive(Serialize)]
pub struct TemplateSummary {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub section_count: usize,
}

pub(crate) fn to_summary(template: &Template) -> TemplateSummary {
    TemplateSummary {
        id: template.id,
        name: template.name.clone(),
        created_at: template.created_at,
        section_count: template.sections.len(),
    }
}

/// `GET /api/template` — list saved templates.
pub async fn list_templates(State(state): State<AppState>) -> Json<Vec<TemplateSummary>> {
    let templates = state.store.templates().await;
    Json(templates.iter().map(to_summary).collect())
}

/// `GET /api/template/:id` — fetch one template in full.
pub async fn get_template(
    State(state): State<AppState>,
    Path(template_id): Path<Uuid>,
) -> Result<Json<Template>, ApiError> {
    state
        .store
        .template(template_id)
        .await
        .map(Json)
        .ok_or_else(|| message_error(StatusCode::NOT_FOUND, "Template not found."))
}

/// `DELETE /api/template/:id` — delete a template and its submissions.
pub async fn delete_template(
    State(state): State<AppState>,
    Path(template_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = state
        .store
        .delete_template(template_id)
        .await
        .map_err(|_| message_error(StatusCode::INTERNAL_SERVER_ERROR, "Error deleting template."))?;
    if !deleted {
        return Err(message_error(StatusCode::NOT_FOUND, "Template not found."));
    }
    Ok(Json(serde_json::json!({ "ok": true })))
}

#[cfg(test)]
#[path = "templates_test.rs"]
mod tests;
