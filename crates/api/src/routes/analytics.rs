//! Route definitions for the `/analytics` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::analytics;
use crate::state::AppState;

/// Routes mounted at `/analytics`.
///
/// ```text
/// GET /student/{id} -> student (?subject_id=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/student/{id}", get(analytics::student))
}
