//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::adapters::MemoryStorage;
use crate::config::Config;
use mindtrack_core::ports::{AnalysisService, AuthSessionStore, StorageService};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn StorageService>,
    pub auth_sessions: Arc<dyn AuthSessionStore>,
    pub analysis: Arc<dyn AnalysisService>,
    pub config: Arc<Config>,
}

impl AppState {
    /// State backed by a fresh `MemoryStorage` for both records and auth sessions.
    pub fn in_memory(config: Config, analysis: Arc<dyn AnalysisService>) -> Self {
        let memory = Arc::new(MemoryStorage::new());
        Self {
            storage: memory.clone(),
            auth_sessions: memory,
            analysis,
            config: Arc::new(config),
        }
    }
}
