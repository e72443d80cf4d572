//! Refresh-token session model and DTOs.

use registra_core::types::{DbId, Timestamp};
use serde::Deserialize;
use sqlx::FromRow;

/// Full session row from the `sessions` table.
///
/// Stores only the SHA-256 digest of the refresh token; sessions are never
/// serialized to API responses.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: DbId,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a session.
#[derive(Debug, Deserialize)]
pub struct CreateSession {
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}
