//! Authenticated-caller extractor.
//!
//! [`AuthUser`] accepts two bearer credential shapes on the `Authorization`
//! header:
//!
//! - a JWT access token issued by `/auth/login`, giving a full interactive
//!   session, or
//! - an API key of the form `key_id:secret`, giving scoped programmatic
//!   access.
//!
//! The two are distinguished by the `:` separator, which never appears in a
//! JWT. API-key authentication is fail-closed: every failure mode (unknown
//! key id, wrong secret, revoked, expired, deactivated owner) returns the
//! same generic 401 so callers cannot probe which part was wrong. Successful
//! key authentication bumps the key's usage counter and appends an access-log
//! row before the handler runs, so rejected requests still leave a trace.

use axum::extract::{FromRequestParts, OriginalUri};
use axum::http::request::Parts;
use chrono::Utc;
use registra_core::api_keys::{self, KeyScope, KeyStatus};
use registra_core::error::CoreError;
use registra_core::roles::Role;
use registra_core::types::DbId;
use registra_db::repositories::{ApiKeyRepo, UserRepo};

use crate::auth::jwt;
use crate::error::AppError;
use crate::state::AppState;

/// Generic rejection for every API-key failure mode.
const INVALID_KEY_MSG: &str = "Invalid API key";

/// What the caller's credential grants beyond their role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    /// Interactive JWT session. No extra restriction.
    Full,
    /// API key restricted to the given scope.
    Key(KeyScope),
}

/// The authenticated caller, extracted from the `Authorization` header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub role: Role,
    pub access: AccessLevel,
}

impl AuthUser {
    /// Reject read-only API keys. Interactive sessions and `read_write` keys
    /// pass; role-level checks happen separately in the handlers.
    pub fn require_write_access(&self) -> Result<(), AppError> {
        match self.access {
            AccessLevel::Full => Ok(()),
            AccessLevel::Key(scope) if scope.allows_write() => Ok(()),
            AccessLevel::Key(_) => Err(AppError::Core(CoreError::Forbidden(
                "This API key does not permit write operations".to_string(),
            ))),
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".to_string(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".to_string(),
            ))
        })?;

        if api_keys::split_bearer_key(token).is_some() {
            let method = parts.method.as_str().to_string();
            // Nested routers strip their prefix from `parts.uri`; the access
            // log keeps the path as the caller sent it.
            let path = parts
                .extensions
                .get::<OriginalUri>()
                .map(|uri| uri.0.path().to_string())
                .unwrap_or_else(|| parts.uri.path().to_string());
            return authenticate_api_key(state, token, &method, &path).await;
        }

        let claims = jwt::validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired token".to_string(),
            ))
        })?;

        let role = Role::parse(&claims.role).map_err(|_| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired token".to_string(),
            ))
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            role,
            access: AccessLevel::Full,
        })
    }
}

/// Authenticate a `key_id:secret` credential.
///
/// On success, records usage (counter bump + access-log row) before the
/// handler runs. All failures map to the same generic 401.
async fn authenticate_api_key(
    state: &AppState,
    token: &str,
    method: &str,
    path: &str,
) -> Result<AuthUser, AppError> {
    let invalid = || AppError::Core(CoreError::Unauthorized(INVALID_KEY_MSG.to_string()));

    let (key_id, secret) = api_keys::split_bearer_key(token).ok_or_else(invalid)?;

    let key = ApiKeyRepo::find_by_key_id(&state.pool, key_id)
        .await?
        .ok_or_else(invalid)?;

    if !api_keys::verify_secret(secret, &key.secret_hash) {
        tracing::warn!(key_id, "API key secret mismatch");
        return Err(invalid());
    }

    if key.status(Utc::now()) != KeyStatus::Active {
        tracing::warn!(key_id, "Rejected non-active API key");
        return Err(invalid());
    }

    let owner = UserRepo::find_by_id(&state.pool, key.user_id)
        .await?
        .ok_or_else(invalid)?;
    if !owner.is_active {
        tracing::warn!(key_id, user_id = owner.id, "Rejected key of deactivated user");
        return Err(invalid());
    }

    let role = owner.parsed_role().map_err(|_| invalid())?;
    let scope = KeyScope::parse(&key.scope).map_err(|_| invalid())?;

    // Usage accounting happens at authentication time. A request that later
    // fails a scope or role check still counts against the key.
    ApiKeyRepo::record_usage(&state.pool, key.id, method, path).await?;

    Ok(AuthUser {
        user_id: owner.id,
        role,
        access: AccessLevel::Key(scope),
    })
}
