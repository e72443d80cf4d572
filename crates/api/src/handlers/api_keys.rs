//! Handlers for the `/api-keys` admin surface.
//!
//! Creation is the ONLY place the plaintext secret ever leaves the system;
//! the database stores a SHA-256 digest and every later listing serializes
//! [`ApiKeyResponse`], which omits the hash. A lost secret means issuing a
//! new key. Revocation is one-directional: a revoked key is replaced, never
//! reactivated.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use registra_core::api_keys::{generate_api_key, KeyScope};
use registra_core::error::CoreError;
use registra_core::types::{DbId, Timestamp};
use registra_db::models::api_key::{ApiAccessLogEntry, ApiKeyResponse, CreateApiKey};
use registra_db::repositories::{ApiKeyRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Default number of access log entries returned per key.
const DEFAULT_ACCESS_LOG_LIMIT: i64 = 50;

/// Upper bound on access log entries per request.
const MAX_ACCESS_LOG_LIMIT: i64 = 500;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api-keys`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateApiKeyRequest {
    pub user_id: DbId,
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    pub scope: String,
    pub expires_at: Option<Timestamp>,
}

/// Query parameters for `GET /api-keys`.
#[derive(Debug, Deserialize)]
pub struct ListKeysQuery {
    pub user_id: Option<DbId>,
}

/// Query parameters for `GET /api-keys/{id}/logs`.
#[derive(Debug, Deserialize)]
pub struct AccessLogQuery {
    pub limit: Option<i64>,
}

/// One-time creation payload.
///
/// This is the only response that carries `secret` and `bearer_token`;
/// neither can be recovered afterward.
#[derive(Debug, Serialize)]
pub struct CreatedApiKey {
    pub key: ApiKeyResponse,
    pub secret: String,
    pub bearer_token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/api-keys
///
/// Issue a key on behalf of a user. The response discloses the plaintext
/// secret exactly once.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateApiKeyRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<CreatedApiKey>>)> {
    admin.require_write_access()?;
    input.validate()?;

    let name = input.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name must not be empty".to_string()));
    }

    let owner = UserRepo::find_by_id(&state.pool, input.user_id).await?;
    let owner = match owner {
        Some(user) if user.is_active => user,
        _ => {
            return Err(AppError::Core(CoreError::Validation(
                "user_id must reference an active account".to_string(),
            )))
        }
    };

    let scope = KeyScope::parse(&input.scope)?;
    let owner_role = owner.parsed_role()?;
    if !scope.permitted_for(owner_role) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "scope {} is not permitted for role {}",
            scope.as_str(),
            owner_role.as_str()
        ))));
    }

    if let Some(expires_at) = input.expires_at {
        if expires_at <= Utc::now() {
            return Err(AppError::Core(CoreError::Validation(
                "expires_at must be in the future".to_string(),
            )));
        }
    }

    let generated = generate_api_key();
    let key = ApiKeyRepo::create(
        &state.pool,
        &CreateApiKey {
            key_id: generated.key_id.clone(),
            secret_hash: generated.secret_hash.clone(),
            user_id: owner.id,
            name: name.to_string(),
            scope: scope.as_str().to_string(),
            expires_at: input.expires_at,
        },
    )
    .await?;

    tracing::info!(
        api_key_id = key.id,
        key_id = %key.key_id,
        user_id = key.user_id,
        scope = %key.scope,
        "API key created"
    );

    let created = CreatedApiKey {
        key: ApiKeyResponse::from_row(&key, Utc::now()),
        bearer_token: generated.bearer_token(),
        secret: generated.secret,
    };
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/api-keys?user_id=
///
/// Every key, newest first, hashes omitted. With `?user_id=`, only the keys
/// owned by that user.
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<ListKeysQuery>,
) -> AppResult<Json<DataResponse<Vec<ApiKeyResponse>>>> {
    let now = Utc::now();
    let rows = match query.user_id {
        Some(user_id) => ApiKeyRepo::list_for_user(&state.pool, user_id).await?,
        None => ApiKeyRepo::list(&state.pool).await?,
    };
    let keys = rows
        .iter()
        .map(|key| ApiKeyResponse::from_row(key, now))
        .collect();
    Ok(Json(DataResponse { data: keys }))
}

/// POST /api/v1/api-keys/{id}/revoke
///
/// 409 when the key was already revoked, 404 when it never existed.
pub async fn revoke(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ApiKeyResponse>>> {
    admin.require_write_access()?;

    match ApiKeyRepo::revoke(&state.pool, id).await? {
        Some(key) => {
            tracing::info!(api_key_id = key.id, key_id = %key.key_id, "API key revoked");
            Ok(Json(DataResponse {
                data: ApiKeyResponse::from_row(&key, Utc::now()),
            }))
        }
        None => match ApiKeyRepo::find_by_id(&state.pool, id).await? {
            Some(_) => Err(AppError::Core(CoreError::Conflict(
                "API key is already revoked".to_string(),
            ))),
            None => Err(AppError::Core(CoreError::NotFound {
                entity: "API key",
                id,
            })),
        },
    }
}

/// GET /api/v1/api-keys/{id}/logs?limit=
///
/// Recent access log entries for one key, newest first.
pub async fn access_log(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Query(query): Query<AccessLogQuery>,
) -> AppResult<Json<DataResponse<Vec<ApiAccessLogEntry>>>> {
    if ApiKeyRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "API key",
            id,
        }));
    }

    let limit = query
        .limit
        .unwrap_or(DEFAULT_ACCESS_LOG_LIMIT)
        .clamp(1, MAX_ACCESS_LOG_LIMIT);
    let entries = ApiKeyRepo::list_access_log(&state.pool, id, limit).await?;
    Ok(Json(DataResponse { data: entries }))
}
