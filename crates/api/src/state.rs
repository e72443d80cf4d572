//! Shared application state passed to all handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::notifications::Notifier;

/// State shared across the router. Cheap to clone; everything inside is
/// either a pool handle or behind an [`Arc`].
#[derive(Clone)]
pub struct AppState {
    /// Postgres connection pool.
    pub pool: registra_db::DbPool,
    /// Server configuration (JWT settings, timeouts).
    pub config: Arc<ServerConfig>,
    /// Sink for grade and attendance notification events.
    pub notifier: Arc<dyn Notifier>,
}
