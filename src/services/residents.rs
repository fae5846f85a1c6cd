//! Resident directory — HTTP client for resident-dropdown options.
//!
//! DESIGN
//! ======
//! The directory is an external collaborator reached over HTTP; the
//! `ResidentLookup` trait seams it off so routes can be tested with a mock.
//! Configuration comes from environment variables and is optional: when the
//! base URL is absent the service runs with resident lookup disabled and
//! resident dropdowns keep whatever options are stored.
//!
//! ERROR HANDLING
//! ==============
//! A failed fetch never blocks rendering. Callers inject options on a
//! working copy of the template and degrade to stored options with a
//! transient warning when the directory is unreachable.

use serde::Deserialize;

use crate::form::{FieldOption, FieldType, Template};

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// TYPES
// =============================================================================

/// Errors produced by resident directory operations.
#[derive(Debug, thiserror::Error)]
pub enum ResidentError {
    /// The base URL environment variable is not set.
    #[error("missing base URL: env var {var} not set")]
    MissingBaseUrl { var: String },

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request to the directory failed.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The directory returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The directory response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),
}

/// One resident as exposed to the form layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resident {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

impl Resident {
    /// Label shown in a resident dropdown.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Directory-neutral async trait for resident lookup. Enables mocking in
/// tests.
#[async_trait::async_trait]
pub trait ResidentLookup: Send + Sync {
    /// Fetch the residents assigned to this installation.
    ///
    /// # Errors
    ///
    /// Returns a [`ResidentError`] if the request fails or the response is
    /// malformed.
    async fn assigned_residents(&self) -> Result<Vec<Resident>, ResidentError>;
}

// =============================================================================
// WIRE FORMAT
// =============================================================================

/// Envelope the directory wraps its payload in.
#[derive(Debug, Deserialize)]
struct ResidentsEnvelope {
    data: ResidentsPage,
}

#[derive(Debug, Deserialize)]
struct ResidentsPage {
    docs: Vec<ResidentDoc>,
}

#[derive(Debug, Deserialize)]
struct ResidentDoc {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "firstName")]
    first_name: String,
    #[serde(rename = "lastName")]
    last_name: String,
}

impl From<ResidentDoc> for Resident {
    fn from(doc: ResidentDoc) -> Self {
        Self { id: doc.id, first_name: doc.first_name, last_name: doc.last_name }
    }
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

/// Concrete directory client speaking the resident API's JSON shape.
pub struct ResidentsClient {
    http: reqwest::Client,
    base_url: String,
}

impl ResidentsClient {
    /// Build a directory client from environment variables.
    ///
    /// - `RESIDENTS_API_URL`: base URL of the directory (required)
    /// - `RESIDENTS_REQUEST_TIMEOUT_SECS`: default 30
    /// - `RESIDENTS_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is missing or the HTTP client fails
    /// to build.
    pub fn from_env() -> Result<Self, ResidentError> {
        let base_url = std::env::var("RESIDENTS_API_URL")
            .map_err(|_| ResidentError::MissingBaseUrl { var: "RESIDENTS_API_URL".into() })?;
        let request_secs = env_parse_u64("RESIDENTS_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS);
        let connect_secs = env_parse_u64("RESIDENTS_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS);
        Self::new(&base_url, request_secs, connect_secs)
    }

    /// Build a directory client against an explicit base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base_url: &str, request_secs: u64, connect_secs: u64) -> Result<Self, ResidentError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(request_secs))
            .connect_timeout(std::time::Duration::from_secs(connect_secs))
            .build()
            .map_err(|e| ResidentError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string() })
    }

    /// The configured directory base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

#[async_trait::async_trait]
impl ResidentLookup for ResidentsClient {
    async fn assigned_residents(&self) -> Result<Vec<Resident>, ResidentError> {
        let url = format!("{}/api/v1/get-assigned-residents", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ResidentError::ApiRequest(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ResidentError::ApiResponse { status: status.as_u16(), body });
        }

        let envelope: ResidentsEnvelope = response
            .json()
            .await
            .map_err(|e| ResidentError::ApiParse(e.to_string()))?;
        Ok(envelope.data.docs.into_iter().map(Resident::from).collect())
    }
}

// =============================================================================
// OPTION INJECTION
// =============================================================================

/// Map residents into labeled dropdown options.
#[must_use]
pub fn resident_options(residents: &[Resident]) -> Vec<FieldOption> {
    residents
        .iter()
        .map(|r| FieldOption::Labeled { label: r.display_name(), value: r.id.clone() })
        .collect()
}

/// Replace the options of every resident-dropdown field with the directory's
/// current residents. Other field types are untouched. Callers pass a working
/// copy; stored templates are never mutated.
pub fn inject_resident_options(template: &mut Template, residents: &[Resident]) {
    let options = resident_options(residents);
    for section in &mut template.sections {
        for field in &mut section.fields {
            if field.field_type == FieldType::ResidentDropdown {
                field.options = options.clone();
            }
        }
    }
}

#[cfg(test)]
#[path = "residents_test.rs"]
mod tests;
