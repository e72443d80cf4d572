//! Route definitions for the `/assignments` resource.

use axum::routing::{post, put};
use axum::Router;

use crate::handlers::assignments;
use crate::state::AppState;

/// Routes mounted at `/assignments`.
///
/// ```text
/// POST /      -> create (owning teacher/admin)
/// PUT  /{id}  -> update (owning teacher/admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(assignments::create))
        .route("/{id}", put(assignments::update))
}
