use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use sqlx::SqlitePool;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::session::UserSession;
use crate::speech::Narrator;

/// Active sessions keyed by session id. The explicit replacement for an
/// ambient per-user session object: handlers look their session up here and
/// pass it through the call chain.
pub type SessionRegistry = Arc<Mutex<HashMap<String, UserSession>>>;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub llm: LlmClient,
    pub narrator: Narrator,
    pub config: Config,
    pub sessions: SessionRegistry,
}

impl AppState {
    /// Locks the session registry. Lock scope stays inside one handler step;
    /// nothing awaits while holding it.
    pub fn lock_sessions(&self) -> MutexGuard<'_, HashMap<String, UserSession>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
