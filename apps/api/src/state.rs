use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::GenerativeBackend;
use crate::storage::Store;
use crate::telemetry::Telemetry;

/// Shared application state injected into all route handlers.
/// The store and the generative backend sit behind trait objects so tests
/// can swap in an in-memory store and a canned backend.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub llm: Arc<dyn GenerativeBackend>,
    pub telemetry: Telemetry,
    pub config: Config,
}
