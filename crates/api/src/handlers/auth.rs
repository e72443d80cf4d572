//! Handlers for the `/auth` resource: login, token refresh, logout.
//!
//! Login failures are deliberately indistinguishable: an unknown username
//! and a wrong password both return the same 401 so callers cannot probe
//! which usernames exist. Repeated failures lock the account for a short
//! period.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};
use registra_core::error::CoreError;
use registra_core::roles::Role;
use registra_core::types::DbId;
use registra_db::models::session::CreateSession;
use registra_db::models::user::User;
use registra_db::repositories::{SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::jwt;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Failed logins allowed before the account is locked.
const MAX_FAILED_ATTEMPTS: i32 = 5;

/// How long a lockout lasts.
const LOCK_DURATION_MINS: i64 = 15;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Response body for successful login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access-token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

/// Caller-safe subset of the user row.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub username: String,
    pub display_name: String,
    pub role: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Verify credentials and issue an access/refresh token pair.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    // 1. Look up the user. Unknown usernames get the same error as bad
    //    passwords.
    let user = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid username or password".to_string(),
            ))
        })?;

    // 2. Deactivated accounts cannot log in.
    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".to_string(),
        )));
    }

    // 3. Respect an active lockout, even if the password is correct.
    if let Some(locked_until) = user.locked_until {
        if locked_until > Utc::now() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Account is temporarily locked. Try again later.".to_string(),
            )));
        }
    }

    // 4. Verify the password.
    let valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    // 5. On failure, count the attempt and lock once the threshold is hit.
    if !valid {
        UserRepo::increment_failed_login(&state.pool, user.id).await?;
        if user.failed_login_attempts + 1 >= MAX_FAILED_ATTEMPTS {
            let until = Utc::now() + Duration::minutes(LOCK_DURATION_MINS);
            UserRepo::lock_account(&state.pool, user.id, until).await?;
            tracing::warn!(user_id = user.id, "Account locked after repeated failed logins");
        }
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid username or password".to_string(),
        )));
    }

    // 6. Success: reset the failure counter and stamp the login time.
    UserRepo::record_successful_login(&state.pool, user.id).await?;

    // 7. Issue tokens.
    let role = user.parsed_role()?;
    let response = create_auth_response(&state, &user, role).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for a new token pair. Refresh tokens are
/// single-use: the presented session is revoked before the new one is
/// created.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let token_hash = jwt::hash_refresh_token(&input.refresh_token);

    let session = SessionRepo::find_valid_by_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".to_string(),
            ))
        })?;

    // Rotation: revoke the old session before issuing a replacement.
    SessionRepo::revoke(&state.pool, session.id).await?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("User no longer exists".to_string()))
        })?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".to_string(),
        )));
    }

    let role = user.parsed_role()?;
    let response = create_auth_response(&state, &user, role).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/logout
///
/// Revoke every session for the caller. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    SessionRepo::revoke_all_for_user(&state.pool, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Issue a new token pair and persist the refresh session.
async fn create_auth_response(
    state: &AppState,
    user: &User,
    role: Role,
) -> Result<AuthResponse, AppError> {
    let access_token = jwt::generate_access_token(user.id, role.as_str(), &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_token, refresh_token_hash) = jwt::generate_refresh_token();
    let expires_at = Utc::now() + Duration::days(state.config.jwt.refresh_token_expiry_days);

    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash,
            expires_at,
        },
    )
    .await?;

    Ok(AuthResponse {
        access_token,
        refresh_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: UserInfo {
            id: user.id,
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            role: role.as_str().to_string(),
        },
    })
}
