//! Route definitions for the `/admin` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require the `admin` role (enforced by handler extractors).
///
/// ```text
/// GET    /users           -> list_users (?role=)
/// POST   /users           -> create_user
/// GET    /users/{id}      -> get_user
/// PUT    /users/{id}      -> update_user
/// DELETE /users/{id}      -> deactivate_user
/// GET    /guardians       -> list_guardians
/// POST   /guardians       -> create_guardian
/// DELETE /guardians/{id}  -> delete_guardian
/// GET    /settings        -> get_settings
/// PUT    /settings        -> update_settings
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users).post(admin::create_user))
        .route(
            "/users/{id}",
            get(admin::get_user)
                .put(admin::update_user)
                .delete(admin::deactivate_user),
        )
        .route(
            "/guardians",
            get(admin::list_guardians).post(admin::create_guardian),
        )
        .route(
            "/guardians/{id}",
            axum::routing::delete(admin::delete_guardian),
        )
        .route(
            "/settings",
            get(admin::get_settings).put(admin::update_settings),
        )
}
