//! Form routes — fill, submit, view, and edit filled forms.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::form::{Data, Submission, Template};
use crate::routes::{ApiError, message_error};
use crate::services::renderer::{self, FormMode, FormView};
use crate::services::residents;
use crate::services::submission::{self, SubmitError};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SubmitBody {
    pub data: Data,
}

#[derive(Serialize)]
pub struct SubmissionListResponse {
    pub template_name: String,
    pub submissions: Vec<Submission>,
}

#[derive(Serialize)]
pub struct ViewSubmissionResponse {
    pub submission: Submission,
    pub form: FormView,
}

/// `GET /api/template/:id/form` — render a blank fill form. Resident
/// dropdowns get their options from the directory when one is configured.
pub async fn fill_form(
    State(state): State<AppState>,
    Path(template_id): Path<Uuid>,
) -> Result<Json<FormView>, ApiError> {
    let Some(template) = state.store.template(template_id).await else {
        return Err(message_error(StatusCode::NOT_FOUND, "Template not found."));
    };

    let (template, warnings) = with_resident_options(&state, template).await;
    let mut view = renderer::render(&template, FormMode::Create, &Data::new());
    view.warnings = warnings;
    Ok(Json(view))
}

/// `POST /api/template/:id/submissions` — validate and store a filled form.
pub async fn submit_form(
    State(state): State<AppState>,
    Path(template_id): Path<Uuid>,
    Json(body): Json<SubmitBody>,
) -> Result<(StatusCode, Json<Submission>), ApiError> {
    let submission = submission::submit(&state.store, template_id, body.data)
        .await
        .map_err(submit_error_to_response)?;
    Ok((StatusCode::CREATED, Json(submission)))
}

/// `GET /api/template/:id/submissions` — list saved forms for a template.
pub async fn list_submissions(
    State(state): State<AppState>,
    Path(template_id): Path<Uuid>,
) -> Json<SubmissionListResponse> {
    let listing = submission::list(&state.store, template_id).await;
    Json(SubmissionListResponse {
        template_name: listing.template_name,
        submissions: listing.submissions,
    })
}

/// `GET /api/submission/:id` — read-only render of one saved form.
pub async fn view_submission(
    State(state): State<AppState>,
    Path(submission_id): Path<Uuid>,
) -> Result<Json<ViewSubmissionResponse>, ApiError> {
    let (submission, template) = submission::find(&state.store, submission_id)
        .await
        .map_err(find_error_to_response)?;

    let form = renderer::render(&template, FormMode::View, &submission.data);
    Ok(Json(ViewSubmissionResponse { submission, form }))
}

/// `GET /api/submission/:id/edit` — editable render of one saved form.
pub async fn edit_form(
    State(state): State<AppState>,
    Path(submission_id): Path<Uuid>,
) -> Result<Json<FormView>, ApiError> {
    let (submission, template) = submission::find(&state.store, submission_id)
        .await
        .map_err(find_error_to_response)?;

    let (template, warnings) = with_resident_options(&state, template).await;
    let mut view = renderer::render(&template, FormMode::Edit, &submission.data);
    view.warnings = warnings;
    Ok(Json(view))
}

/// `PATCH /api/submission/:id` — save edited form data.
pub async fn update_submission(
    State(state): State<AppState>,
    Path(submission_id): Path<Uuid>,
    Json(body): Json<SubmitBody>,
) -> Result<Json<Submission>, ApiError> {
    let submission = submission::update(&state.store, submission_id, body.data)
        .await
        .map_err(submit_error_to_response)?;
    Ok(Json(submission))
}

/// Fetch directory residents and inject them into a working copy of the
/// template. A failed fetch degrades to the stored options with a transient
/// warning; an unconfigured directory is silent.
async fn with_resident_options(state: &AppState, mut template: Template) -> (Template, Vec<String>) {
    if !template.has_resident_fields() {
        return (template, Vec::new());
    }
    let Some(directory) = &state.residents else {
        return (template, Vec::new());
    };

    match directory.assigned_residents().await {
        Ok(list) => {
            residents::inject_resident_options(&mut template, &list);
            (template, Vec::new())
        }
        Err(e) => {
            warn!(error = %e, template_id = %template.id, "resident fetch failed");
            (template, vec!["Error fetching resident list.".to_owned()])
        }
    }
}

/// View and edit need both the submission and its template; either one
/// missing surfaces as the combined not-found message.
pub(crate) fn find_error_to_response(err: SubmitError) -> ApiError {
    match err {
        SubmitError::SubmissionNotFound(_) | SubmitError::TemplateNotFound(_) => message_error(
            StatusCode::NOT_FOUND,
            "Form data or associated template not found.",
        ),
        other => submit_error_to_response(other),
    }
}

pub(crate) fn submit_error_to_response(err: SubmitError) -> ApiError {
    match err {
        SubmitError::TemplateNotFound(_) => message_error(StatusCode::NOT_FOUND, "Template not found."),
        SubmitError::SubmissionNotFound(_) => message_error(
            StatusCode::NOT_FOUND,
            "Form data or associated template not found.",
        ),
        SubmitError::Invalid(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({
                "message": "Please fill all required fields.",
                "errors": errors,
            })),
        ),
        SubmitError::Store(_) => message_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error submitting form. Please try again.",
        ),
    }
}

#[cfg(test)]
#[path = "forms_test.rs"]
mod tests;
