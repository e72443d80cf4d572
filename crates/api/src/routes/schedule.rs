//! Route definitions for the top-level `/schedule` resource.
//!
//! Slot creation and listing live under `/subjects/{id}/schedule`; deletion
//! addresses a slot by its own id.

use axum::routing::delete;
use axum::Router;

use crate::handlers::subjects;
use crate::state::AppState;

/// Routes mounted at `/schedule`.
///
/// ```text
/// DELETE /{id} -> delete_schedule_slot (owning teacher/admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", delete(subjects::delete_schedule_slot))
}
