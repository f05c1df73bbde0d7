use std::sync::Arc;

use pawhaven_notify::Mailer;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: pawhaven_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Outbound email sender. `None` when SMTP is not configured, in which
    /// case notification emails are skipped.
    pub mailer: Option<Arc<Mailer>>,
}
