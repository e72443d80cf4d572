//! Role-based access control extractors.
//!
//! Admin-only surfaces use [`RequireAdmin`] as a handler argument; every
//! other role decision goes through `registra_core::authorization`, which
//! needs resource context an extractor cannot see.
//!
//! ```ignore
//! pub async fn create_user(
//!     State(state): State<AppState>,
//!     RequireAdmin(admin): RequireAdmin,
//!     Json(input): Json<CreateUserRequest>,
//! ) -> AppResult<Json<UserResponse>> { /* ... */ }
//! ```

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use registra_core::error::CoreError;
use registra_core::roles::Role;

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Extractor that requires the authenticated caller to hold the `admin` role.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != Role::Admin {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".to_string(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}
