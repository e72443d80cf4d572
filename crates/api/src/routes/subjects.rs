//! Route definitions for the `/subjects` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::subjects;
use crate::state::AppState;

/// Routes mounted at `/subjects`.
///
/// ```text
/// GET  /               -> list (any authenticated identity)
/// POST /               -> create (admin only)
/// GET  /{id}           -> get_by_id
/// PUT  /{id}           -> update (admin only)
/// GET  /{id}/students  -> list_students (owning teacher/admin)
/// GET  /{id}/report    -> class_report (owning teacher/admin)
/// GET  /{id}/schedule  -> list_schedule
/// POST /{id}/schedule  -> create_schedule_slot (owning teacher/admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(subjects::list).post(subjects::create))
        .route("/{id}", get(subjects::get_by_id).put(subjects::update))
        .route("/{id}/students", get(subjects::list_students))
        .route("/{id}/report", get(subjects::class_report))
        .route(
            "/{id}/schedule",
            get(subjects::list_schedule).post(subjects::create_schedule_slot),
        )
}
