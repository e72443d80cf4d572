//! Repository for the `api_keys` and `api_access_log` tables.

use registra_core::types::DbId;
use sqlx::PgPool;

use crate::models::api_key::{ApiAccessLogEntry, ApiKey, CreateApiKey};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, key_id, secret_hash, user_id, name, scope, expires_at, \
                        revoked_at, last_used_at, usage_count, created_at, updated_at";

const ACCESS_LOG_COLUMNS: &str = "id, api_key_id, method, path, created_at";

/// Provides operations for API keys and their access log.
pub struct ApiKeyRepo;

impl ApiKeyRepo {
    /// Persist a freshly generated key. Returns the full row (with hash).
    pub async fn create(pool: &PgPool, input: &CreateApiKey) -> Result<ApiKey, sqlx::Error> {
        let query = format!(
            "INSERT INTO api_keys (key_id, secret_hash, user_id, name, scope, expires_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ApiKey>(&query)
            .bind(&input.key_id)
            .bind(&input.secret_hash)
            .bind(input.user_id)
            .bind(&input.name)
            .bind(&input.scope)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find a key by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ApiKey>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM api_keys WHERE id = $1");
        sqlx::query_as::<_, ApiKey>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a key by its public identifier (the part before the colon).
    ///
    /// Used during authentication. Lifecycle checks happen in the caller so
    /// an expired or revoked key is indistinguishable from a bad secret.
    pub async fn find_by_key_id(pool: &PgPool, key_id: &str) -> Result<Option<ApiKey>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM api_keys WHERE key_id = $1");
        sqlx::query_as::<_, ApiKey>(&query)
            .bind(key_id)
            .fetch_optional(pool)
            .await
    }

    /// List the keys owned by a user, newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<ApiKey>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM api_keys
             WHERE user_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, ApiKey>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// List all keys, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<ApiKey>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM api_keys ORDER BY created_at DESC");
        sqlx::query_as::<_, ApiKey>(&query).fetch_all(pool).await
    }

    /// Revoke a key by setting `revoked_at`. One-directional: a second call
    /// is a no-op and returns `None`.
    pub async fn revoke(pool: &PgPool, id: DbId) -> Result<Option<ApiKey>, sqlx::Error> {
        let query = format!(
            "UPDATE api_keys SET revoked_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND revoked_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ApiKey>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Account for one authenticated call: bump the usage counter, stamp
    /// `last_used_at`, and append an access log row, atomically.
    pub async fn record_usage(
        pool: &PgPool,
        id: DbId,
        method: &str,
        path: &str,
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "UPDATE api_keys SET
                usage_count = usage_count + 1,
                last_used_at = NOW(),
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO api_access_log (api_key_id, method, path) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(method)
            .bind(path)
            .execute(&mut *tx)
            .await?;

        tx.commit().await
    }

    /// Recent access log entries for one key, newest first.
    pub async fn list_access_log(
        pool: &PgPool,
        api_key_id: DbId,
        limit: i64,
    ) -> Result<Vec<ApiAccessLogEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {ACCESS_LOG_COLUMNS} FROM api_access_log
             WHERE api_key_id = $1
             ORDER BY id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, ApiAccessLogEntry>(&query)
            .bind(api_key_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
