//! External API key models: key rows and the per-call access log.

use registra_core::api_keys::{key_status, KeyStatus};
use registra_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full API key row from the `api_keys` table.
///
/// Contains the secret hash -- NEVER serialize this to API responses
/// directly. Use [`ApiKeyResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct ApiKey {
    pub id: DbId,
    pub key_id: String,
    pub secret_hash: String,
    pub user_id: DbId,
    pub name: String,
    pub scope: String,
    pub expires_at: Option<Timestamp>,
    pub revoked_at: Option<Timestamp>,
    pub last_used_at: Option<Timestamp>,
    pub usage_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ApiKey {
    /// Lifecycle state of this key as of `now`.
    pub fn status(&self, now: Timestamp) -> KeyStatus {
        key_status(self.revoked_at, self.expires_at, now)
    }
}

/// Safe API key representation for responses (no secret hash).
#[derive(Debug, Clone, Serialize)]
pub struct ApiKeyResponse {
    pub id: DbId,
    pub key_id: String,
    pub user_id: DbId,
    pub name: String,
    pub scope: String,
    pub status: KeyStatus,
    pub expires_at: Option<Timestamp>,
    pub revoked_at: Option<Timestamp>,
    pub last_used_at: Option<Timestamp>,
    pub usage_count: i64,
    pub created_at: Timestamp,
}

impl ApiKeyResponse {
    /// Build from a full row, deriving the status as of `now`.
    pub fn from_row(key: &ApiKey, now: Timestamp) -> Self {
        Self {
            id: key.id,
            key_id: key.key_id.clone(),
            user_id: key.user_id,
            name: key.name.clone(),
            scope: key.scope.clone(),
            status: key.status(now),
            expires_at: key.expires_at,
            revoked_at: key.revoked_at,
            last_used_at: key.last_used_at,
            usage_count: key.usage_count,
            created_at: key.created_at,
        }
    }
}

/// DTO for persisting a freshly generated key.
#[derive(Debug, Deserialize)]
pub struct CreateApiKey {
    pub key_id: String,
    pub secret_hash: String,
    pub user_id: DbId,
    pub name: String,
    pub scope: String,
    pub expires_at: Option<Timestamp>,
}

/// One entry in the `api_access_log` table, written at authentication time.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApiAccessLogEntry {
    pub id: DbId,
    pub api_key_id: DbId,
    pub method: String,
    pub path: String,
    pub created_at: Timestamp,
}
