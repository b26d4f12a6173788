//! HTTP API for the Luna chat
//!
//! Visitors open a chat, stream it over SSE and post their clicks back.
//! The admin summary is served only when a token is configured.

mod handlers;
mod sse;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::db::Database;
use crate::runtime::{RuntimeConfig, RuntimeManager};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<RuntimeManager>,
    pub admin_token: Option<String>,
}

impl AppState {
    pub fn new(db: Database, config: RuntimeConfig, admin_token: Option<String>) -> Self {
        Self {
            runtime: Arc::new(RuntimeManager::new(db, config)),
            admin_token,
        }
    }
}
