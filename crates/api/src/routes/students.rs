//! Route definitions for the `/students` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::students;
use crate::state::AppState;

/// Routes mounted at `/students`.
///
/// Read-only; visibility is scoped per caller (admins see everyone,
/// teachers their enrolled students, students themselves, parents their
/// linked children).
///
/// ```text
/// GET /                  -> list
/// GET /{id}              -> get_by_id (profile + subjects + recent grades)
/// GET /{id}/grades       -> grades (?subject_id=, ?limit=)
/// GET /{id}/attendance   -> attendance (?subject_id=, ?days=)
/// GET /{id}/schedule     -> timetable
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(students::list))
        .route("/{id}", get(students::get_by_id))
        .route("/{id}/grades", get(students::grades))
        .route("/{id}/attendance", get(students::attendance))
        .route("/{id}/schedule", get(students::timetable))
}
