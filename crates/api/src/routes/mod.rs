pub mod admin;
pub mod analytics;
pub mod api_keys;
pub mod assignments;
pub mod attendance;
pub mod auth;
pub mod enrollments;
pub mod health;
pub mod schedule;
pub mod students;
pub mod subjects;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /health                          service + database health (public)
///
/// /auth/login                      login (public)
/// /auth/refresh                    refresh (public)
/// /auth/logout                     logout (requires auth)
///
/// /admin/users                     list, create (admin only)
/// /admin/users/{id}                get, update, deactivate
/// /admin/guardians                 list, create guardian links
/// /admin/guardians/{id}            delete guardian link
/// /admin/settings                  get, update grading settings
///
/// /subjects                        list, create (create admin only)
/// /subjects/{id}                   get, update (update admin only)
/// /subjects/{id}/students          roster (owning teacher/admin)
/// /subjects/{id}/report            class report (owning teacher/admin)
/// /subjects/{id}/schedule          list, create slots
/// /schedule/{id}                   delete slot
///
/// /enrollments                     create (admin or owning teacher)
/// /enrollments/{id}                delete
///
/// /students                        list visible students
/// /students/{id}                   profile + subjects + recent grades
/// /students/{id}/grades            grades + statistics (?subject_id, ?limit)
/// /students/{id}/attendance        records + summary (?subject_id, ?days)
/// /students/{id}/schedule          weekly timetable
///
/// /assignments                     record grade (POST)
/// /assignments/{id}                correct grade (PUT)
/// /attendance                      mark attendance (POST, upsert)
/// /attendance/{id}/audit           append-only change trail
///
/// /analytics/student/{id}          statistics + trend forecast (?subject_id)
///
/// /api-keys                        list, create (admin only)
/// /api-keys/{id}/revoke            revoke (POST, one-directional)
/// /api-keys/{id}/logs              access log entries (?limit)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Service health (public, no auth).
        .merge(health::router())
        // Session authentication (login, refresh, logout).
        .nest("/auth", auth::router())
        // Admin provisioning: identities, guardian links, grading settings.
        .nest("/admin", admin::router())
        // Subjects, rosters, reports, and per-subject schedules.
        .nest("/subjects", subjects::router())
        // Top-level schedule slot deletion.
        .nest("/schedule", schedule::router())
        // Enrollment management.
        .nest("/enrollments", enrollments::router())
        // Student-centric reads (profile, grades, attendance, timetable).
        .nest("/students", students::router())
        // Grade ledger writes.
        .nest("/assignments", assignments::router())
        // Attendance ledger writes and audit trail.
        .nest("/attendance", attendance::router())
        // Derived statistics and forecasts.
        .nest("/analytics", analytics::router())
        // External API key administration.
        .nest("/api-keys", api_keys::router())
}
