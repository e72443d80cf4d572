//! Route definitions for the `/enrollments` resource.

use axum::routing::{delete, post};
use axum::Router;

use crate::handlers::enrollments;
use crate::state::AppState;

/// Routes mounted at `/enrollments`.
///
/// ```text
/// POST   /      -> create (admin or owning teacher)
/// DELETE /{id}  -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(enrollments::create))
        .route("/{id}", delete(enrollments::delete))
}
