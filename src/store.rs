//! Blob store — JSON-file persistence for templates and submissions.
//!
//! DESIGN
//! ======
//! Two blobs under the data directory mirror the shapes the client keeps in
//! browser storage: `templates.json` is a flat array of templates and
//! `submissions.json` maps template id to its list of submissions. Both are
//! loaded once at startup; memory is authoritative afterwards. Every mutation
//! rewrites the affected blob while holding the write lock, so writes are
//! serialized and each file replace is atomic (temp file + rename).
//!
//! ERROR HANDLING
//! ==============
//! A failed write leaves the in-memory mutation in place and returns the
//! error; the next successful write re-syncs the blob. Missing files on load
//! mean empty state, but a malformed blob fails startup rather than silently
//! discarding data.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::form::{Data, Submission, Template};

const TEMPLATES_FILE: &str = "templates.json";
const SUBMISSIONS_FILE: &str = "submissions.json";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage blob malformed: {0}")]
    Blob(#[from] serde_json::Error),
}

/// File-backed store for templates and their submissions.
pub struct Store {
    dir: PathBuf,
    templates: RwLock<Vec<Template>>,
    submissions: RwLock<HashMap<Uuid, Vec<Submission>>>,
}

// =============================================================================
// LIFECYCLE
// =============================================================================

impl Store {
    /// Open the store, creating the data directory and loading both blobs.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or a blob exists
    /// but cannot be read or parsed.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;

        let templates: Vec<Template> = load_blob(&dir.join(TEMPLATES_FILE)).await?.unwrap_or_default();
        let submissions: HashMap<Uuid, Vec<Submission>> =
            load_blob(&dir.join(SUBMISSIONS_FILE)).await?.unwrap_or_default();

        info!(
            dir = %dir.display(),
            templates = templates.len(),
            submission_lists = submissions.len(),
            "store opened"
        );

        Ok(Self {
            dir,
            templates: RwLock::new(templates),
            submissions: RwLock::new(submissions),
        })
    }
}

// =============================================================================
// TEMPLATES
// =============================================================================

impl Store {
    /// All saved templates, in insertion order.
    pub async fn templates(&self) -> Vec<Template> {
        self.templates.read().await.clone()
    }

    /// Look up one template by id.
    pub async fn template(&self, template_id: Uuid) -> Option<Template> {
        self.templates
            .read()
            .await
            .iter()
            .find(|t| t.id == template_id)
            .cloned()
    }

    /// Append a finished template and persist the blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob write fails.
    pub async fn insert_template(&self, template: Template) -> Result<(), StoreError> {
        let mut templates = self.templates.write().await;
        templates.push(template);
        self.persist_templates(&templates).await
    }

    /// Remove a template and its submission list. Returns `false` when the
    /// template does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if a blob write fails.
    pub async fn delete_template(&self, template_id: Uuid) -> Result<bool, StoreError> {
        let mut templates = self.templates.write().await;
        let before = templates.len();
        templates.retain(|t| t.id != template_id);
        if templates.len() == before {
            return Ok(false);
        }
        self.persist_templates(&templates).await?;
        drop(templates);

        let mut submissions = self.submissions.write().await;
        if submissions.remove(&template_id).is_some() {
            self.persist_submissions(&submissions).await?;
        }
        Ok(true)
    }
}

// =============================================================================
// SUBMISSIONS
// =============================================================================

impl Store {
    /// Submissions for one template, oldest first. Unknown templates yield an
    /// empty list.
    pub async fn submissions(&self, template_id: Uuid) -> Vec<Submission> {
        self.submissions
            .read()
            .await
            .get(&template_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Append one submission to its template's list and persist the blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob write fails.
    pub async fn append_submission(&self, submission: Submission) -> Result<(), StoreError> {
        let mut submissions = self.submissions.write().await;
        submissions
            .entry(submission.template_id)
            .or_default()
            .push(submission);
        self.persist_submissions(&submissions).await
    }

    /// Scan every template's list for a submission by id.
    pub async fn find_submission(&self, submission_id: Uuid) -> Option<Submission> {
        self.submissions
            .read()
            .await
            .values()
            .flat_map(|list| list.iter())
            .find(|s| s.id == submission_id)
            .cloned()
    }

    /// Replace a submission's data in place, keeping id, template id, and
    /// submission time. Returns the updated record, or `None` when the
    /// submission does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob write fails.
    pub async fn replace_submission_data(
        &self,
        submission_id: Uuid,
        data: Data,
    ) -> Result<Option<Submission>, StoreError> {
        let mut submissions = self.submissions.write().await;
        let Some(target) = submissions
            .values_mut()
            .flat_map(|list| list.iter_mut())
            .find(|s| s.id == submission_id)
        else {
            return Ok(None);
        };

        target.data = data;
        let updated = target.clone();
        self.persist_submissions(&submissions).await?;
        Ok(Some(updated))
    }
}

// =============================================================================
// BLOB I/O
// =============================================================================

impl Store {
    async fn persist_templates(&self, templates: &[Template]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(templates)?;
        write_atomic(&self.dir.join(TEMPLATES_FILE), &bytes).await?;
        Ok(())
    }

    async fn persist_submissions(
        &self,
        submissions: &HashMap<Uuid, Vec<Submission>>,
    ) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(submissions)?;
        write_atomic(&self.dir.join(SUBMISSIONS_FILE), &bytes).await?;
        Ok(())
    }
}

async fn load_blob<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_slice(&bytes)?))
}

/// Replace a blob atomically: write the new bytes next to the target, then
/// rename over it.
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), std::io::Error> {
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
