//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the blob store, the map of in-progress template drafts, and the
//! optional resident directory client. Drafts live only in memory: they are
//! the builder's working copy and reach the store when saved.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::form::Section;
use crate::services::residents::ResidentLookup;
use crate::store::Store;

// =============================================================================
// DRAFT STATE
// =============================================================================

/// An unsaved template being composed in the builder. Everything a finished
/// template has except identity and creation time, which are stamped at save.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DraftState {
    pub name: String,
    pub sections: Vec<Section>,
}

impl DraftState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    /// In-progress drafts keyed by draft id.
    pub drafts: Arc<RwLock<HashMap<Uuid, DraftState>>>,
    /// Optional resident directory. `None` if the directory env vars are not
    /// configured.
    pub residents: Option<Arc<dyn ResidentLookup>>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<Store>, residents: Option<Arc<dyn ResidentLookup>>) -> Self {
        Self { store, drafts: Arc::new(RwLock::new(HashMap::new())), residents }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
