//! Draft-builder routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::form::{ColumnLayout, Field, FieldType, Section, Template};
use crate::routes::{ApiError, message_error};
use crate::services::draft::{self, DraftError, FieldPatch};
use crate::services::renderer::{self, FormMode, FormView};
use crate::state::AppState;

#[derive(Serialize)]
pub struct DraftResponse {
    pub id: Uuid,
    pub name: String,
    pub sections: Vec<Section>,
}

#[derive(Deserialize)]
pub struct CreateDraftBody {
    /// Seed the draft from a saved template (duplicate-and-edit).
    pub template_id: Option<Uuid>,
}

#[derive(Deserialize)]
pub struct RenameDraftBody {
    pub name: String,
}

#[derive(Deserialize)]
pub struct SectionBody {
    pub name: Option<String>,
    pub columns: Option<ColumnLayout>,
}

#[derive(Deserialize)]
pub struct AddFieldBody {
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

#[derive(Deserialize)]
pub struct MoveFieldBody {
    /// Target index within the section's field list.
    pub to: usize,
}

#[derive(Deserialize)]
pub struct SaveDraftBody {
    pub name: Option<String>,
}

/// `POST /api/draft` — open a new draft, optionally seeded from a template.
pub async fn create_draft(
    State(state): State<AppState>,
    body: Option<Json<CreateDraftBody>>,
) -> Result<(StatusCode, Json<DraftResponse>), ApiError> {
    let from_template = body.and_then(|Json(b)| b.template_id);
    let (id, draft) = draft::create_draft(&state, from_template)
        .await
        .map_err(draft_error_to_response)?;
    Ok((
        StatusCode::CREATED,
        Json(DraftResponse { id, name: draft.name, sections: draft.sections }),
    ))
}

/// `GET /api/draft/:id` — fetch the current draft state.
pub async fn get_draft(
    State(state): State<AppState>,
    Path(draft_id): Path<Uuid>,
) -> Result<Json<DraftResponse>, ApiError> {
    let draft = draft::draft(&state, draft_id)
        .await
        .map_err(draft_error_to_response)?;
    Ok(Json(DraftResponse { id: draft_id, name: draft.name, sections: draft.sections }))
}

/// `PATCH /api/draft/:id` — rename the draft.
pub async fn rename_draft(
    State(state): State<AppState>,
    Path(draft_id): Path<Uuid>,
    Json(body): Json<RenameDraftBody>,
) -> Result<Json<DraftResponse>, ApiError> {
    let draft = draft::rename_draft(&state, draft_id, body.name)
        .await
        .map_err(draft_error_to_response)?;
    Ok(Json(DraftResponse { id: draft_id, name: draft.name, sections: draft.sections }))
}

/// `DELETE /api/draft/:id` — discard the draft without saving.
pub async fn discard_draft(
    State(state): State<AppState>,
    Path(draft_id): Path<Uuid>,
) -> Json<serde_json::Value> {
    draft::discard_draft(&state, draft_id).await;
    Json(serde_json::json!({ "ok": true }))
}

/// `POST /api/draft/:id/section` — add a section.
pub async fn add_section(
    State(state): State<AppState>,
    Path(draft_id): Path<Uuid>,
    Json(body): Json<SectionBody>,
) -> Result<(StatusCode, Json<Section>), ApiError> {
    let name = body.name.unwrap_or_default();
    let section = draft::add_section(&state, draft_id, &name, body.columns)
        .await
        .map_err(draft_error_to_response)?;
    Ok((StatusCode::CREATED, Json(section)))
}

/// `PATCH /api/draft/:id/section/:section_id` — update name and/or columns.
pub async fn update_section(
    State(state): State<AppState>,
    Path((draft_id, section_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<SectionBody>,
) -> Result<Json<Section>, ApiError> {
    let section = draft::update_section(&state, draft_id, section_id, body.name, body.columns)
        .await
        .map_err(draft_error_to_response)?;
    Ok(Json(section))
}

/// `DELETE /api/draft/:id/section/:section_id` — remove a section.
pub async fn delete_section(
    State(state): State<AppState>,
    Path((draft_id, section_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    draft::delete_section(&state, draft_id, section_id)
        .await
        .map_err(draft_error_to_response)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

/// `POST /api/draft/:id/section/:section_id/field` — add a blank field.
pub async fn add_field(
    State(state): State<AppState>,
    Path((draft_id, section_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<AddFieldBody>,
) -> Result<(StatusCode, Json<Field>), ApiError> {
    let field = draft::add_field(&state, draft_id, section_id, body.field_type)
        .await
        .map_err(draft_error_to_response)?;
    Ok((StatusCode::CREATED, Json(field)))
}

/// `PATCH /api/draft/:id/section/:section_id/field/:field_id` — update field
/// properties.
pub async fn update_field(
    State(state): State<AppState>,
    Path((draft_id, section_id, field_id)): Path<(Uuid, Uuid, Uuid)>,
    Json(patch): Json<FieldPatch>,
) -> Result<Json<Field>, ApiError> {
    let field = draft::update_field(&state, draft_id, section_id, field_id, patch)
        .await
        .map_err(draft_error_to_response)?;
    Ok(Json(field))
}

/// `DELETE /api/draft/:id/section/:section_id/field/:field_id` — remove a
/// field.
pub async fn delete_field(
    State(state): State<AppState>,
    Path((draft_id, section_id, field_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    draft::delete_field(&state, draft_id, section_id, field_id)
        .await
        .map_err(draft_error_to_response)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

/// `POST /api/draft/:id/section/:section_id/field/:field_id/move` — reorder a
/// field within its section. Returns the new field order.
pub async fn move_field(
    State(state): State<AppState>,
    Path((draft_id, section_id, field_id)): Path<(Uuid, Uuid, Uuid)>,
    Json(body): Json<MoveFieldBody>,
) -> Result<Json<Vec<Field>>, ApiError> {
    let fields = draft::move_field(&state, draft_id, section_id, field_id, body.to)
        .await
        .map_err(draft_error_to_response)?;
    Ok(Json(fields))
}

/// `GET /api/draft/:id/preview` — render the unsaved draft as a blank form.
pub async fn preview_draft(
    State(state): State<AppState>,
    Path(draft_id): Path<Uuid>,
) -> Result<Json<FormView>, ApiError> {
    let draft = draft::draft(&state, draft_id)
        .await
        .map_err(draft_error_to_response)?;
    // Transient template: the preview id is never stored.
    let template = Template::new(draft.name, draft.sections);
    Ok(Json(renderer::render(&template, FormMode::Create, &crate::form::Data::new())))
}

/// `POST /api/draft/:id/save` — validate and persist the draft as a template.
pub async fn save_draft(
    State(state): State<AppState>,
    Path(draft_id): Path<Uuid>,
    body: Option<Json<SaveDraftBody>>,
) -> Result<(StatusCode, Json<Template>), ApiError> {
    let name = body.and_then(|Json(b)| b.name);
    let template = draft::save_draft(&state, draft_id, name)
        .await
        .map_err(draft_error_to_response)?;
    Ok((StatusCode::CREATED, Json(template)))
}

pub(crate) fn draft_error_to_response(err: DraftError) -> ApiError {
    match err {
        DraftError::DraftNotFound(_) => message_error(StatusCode::NOT_FOUND, "Draft not found."),
        DraftError::TemplateNotFound(_) => message_error(StatusCode::NOT_FOUND, "Template not found."),
        DraftError::SectionNotFound(_) => message_error(StatusCode::NOT_FOUND, "Section not found."),
        DraftError::FieldNotFound(_) => message_error(StatusCode::NOT_FOUND, "Field not found."),
        DraftError::NameRequired => {
            message_error(StatusCode::UNPROCESSABLE_ENTITY, "Template name cannot be empty!")
        }
        DraftError::SectionNameRequired => {
            message_error(StatusCode::UNPROCESSABLE_ENTITY, "Section name cannot be empty!")
        }
        DraftError::NoSections => {
            message_error(StatusCode::UNPROCESSABLE_ENTITY, "Please add at least one section.")
        }
        DraftError::EmptyOptions { label } => message_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            &format!("Please add options for \"{label}\"."),
        ),
        DraftError::DuplicateId(_) => {
            message_error(StatusCode::UNPROCESSABLE_ENTITY, "Error saving template.")
        }
        DraftError::Store(_) => {
            message_error(StatusCode::INTERNAL_SERVER_ERROR, "Error saving template.")
        }
    }
}

#[cfg(test)]
#[path = "drafts_test.rs"]
mod tests;
