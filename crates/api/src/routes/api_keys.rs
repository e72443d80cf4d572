//! Route definitions for the `/api-keys` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::api_keys;
use crate::state::AppState;

/// Routes mounted at `/api-keys`.
///
/// All routes require the `admin` role (enforced by handler extractors).
///
/// ```text
/// GET  /              -> list (no hashes; ?user_id=)
/// POST /              -> create (one-time secret disclosure)
/// POST /{id}/revoke   -> revoke
/// GET  /{id}/logs     -> access_log (?limit=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(api_keys::list).post(api_keys::create))
        .route("/{id}/revoke", post(api_keys::revoke))
        .route("/{id}/logs", get(api_keys::access_log))
}
