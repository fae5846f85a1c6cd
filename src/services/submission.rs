//! Submission service — submit, list, find, and edit filled forms.
//!
//! DESIGN
//! ======
//! Submissions are append-only per template: submitting never rewrites
//! earlier entries, and editing replaces one submission's data in place.
//! Validation runs against the template as it exists at submit time;
//! submissions are NOT re-validated when the template later changes, so
//! stale field ids may persist in stored data.

use std::collections::HashMap;

use tracing::info;
use uuid::Uuid;

use crate::form::{Data, Submission, Template};
use crate::services::renderer;
use crate::store::{Store, StoreError};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("template not found: {0}")]
    TemplateNotFound(Uuid),
    #[error("submission not found: {0}")]
    SubmissionNotFound(Uuid),
    #[error("validation failed for {} field(s)", .0.len())]
    Invalid(HashMap<Uuid, String>),
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// A template's submissions plus the name to head the listing with.
#[derive(Debug, Clone)]
pub struct SubmissionList {
    pub template_name: String,
    pub submissions: Vec<Submission>,
}

// =============================================================================
// SUBMIT
// =============================================================================

/// Validate form data against its template and append a new submission.
/// Exactly one submission is added; prior submissions are untouched.
///
/// # Errors
///
/// Returns `Invalid` with the per-field error map when a required field is
/// empty, `TemplateNotFound` for an unknown template, or a storage error.
pub async fn submit(store: &Store, template_id: Uuid, data: Data) -> Result<Submission, SubmitError> {
    let template = store
        .template(template_id)
        .await
        .ok_or(SubmitError::TemplateNotFound(template_id))?;

    let errors = renderer::validate(&template, &data);
    if !errors.is_empty() {
        return Err(SubmitError::Invalid(errors));
    }

    let submission = Submission::new(template_id, data);
    store.append_submission(submission.clone()).await?;
    info!(submission_id = %submission.id, %template_id, "form submitted");
    Ok(submission)
}

// =============================================================================
// LIST / FIND
// =============================================================================

/// Submissions for one template. The name falls back to "Unknown Template"
/// when the template has been deleted but its submissions remain.
pub async fn list(store: &Store, template_id: Uuid) -> SubmissionList {
    let template_name = store
        .template(template_id)
        .await
        .map_or_else(|| "Unknown Template".to_owned(), |t| t.name);
    let submissions = store.submissions(template_id).await;
    SubmissionList { template_name, submissions }
}

/// Find a submission by id across every template's list and resolve its
/// template. Both must exist for view/edit to proceed.
///
/// # Errors
///
/// Returns `SubmissionNotFound` or `TemplateNotFound`.
pub async fn find(store: &Store, submission_id: Uuid) -> Result<(Submission, Template), SubmitError> {
    let submission = store
        .find_submission(submission_id)
        .await
        .ok_or(SubmitError::SubmissionNotFound(submission_id))?;
    let template = store
        .template(submission.template_id)
        .await
        .ok_or(SubmitError::TemplateNotFound(submission.template_id))?;
    Ok((submission, template))
}

// =============================================================================
// UPDATE
// =============================================================================

/// Re-validate edited data against the submission's template and replace the
/// stored data in place. Id, template id, and submission time are preserved.
///
/// # Errors
///
/// Returns `Invalid`, `SubmissionNotFound`, `TemplateNotFound`, or a storage
/// error.
pub async fn update(store: &Store, submission_id: Uuid, data: Data) -> Result<Submission, SubmitError> {
    let (_, template) = find(store, submission_id).await?;

    let errors = renderer::validate(&template, &data);
    if !errors.is_empty() {
        return Err(SubmitError::Invalid(errors));
    }

    let updated = store
        .replace_submission_data(submission_id, data)
        .await?
        .ok_or(SubmitError::SubmissionNotFound(submission_id))?;
    info!(%submission_id, template_id = %updated.template_id, "submission updated");
    Ok(updated)
}

#[cfg(test)]
#[path = "submission_test.rs"]
mod tests;
