//! Route definitions for the `/attendance` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::attendance;
use crate::state::AppState;

/// Routes mounted at `/attendance`.
///
/// ```text
/// POST /            -> record (upsert; 201 first write, 200 overwrite)
/// GET  /{id}/audit  -> list_audit (owning teacher/admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(attendance::record))
        .route("/{id}/audit", get(attendance::list_audit))
}
