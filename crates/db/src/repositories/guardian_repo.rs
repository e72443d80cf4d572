//! Repository for the `guardian_links` table.

use registra_core::types::DbId;
use sqlx::PgPool;

use crate::models::guardian::{CreateGuardianLink, GuardianLink, GuardianLinkDetail};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, parent_id, student_id, created_at, updated_at";

/// Provides CRUD operations for parent-to-student links.
pub struct GuardianRepo;

impl GuardianRepo {
    /// Insert a new link, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateGuardianLink,
    ) -> Result<GuardianLink, sqlx::Error> {
        let query = format!(
            "INSERT INTO guardian_links (parent_id, student_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GuardianLink>(&query)
            .bind(input.parent_id)
            .bind(input.student_id)
            .fetch_one(pool)
            .await
    }

    /// Find a link by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<GuardianLink>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM guardian_links WHERE id = $1");
        sqlx::query_as::<_, GuardianLink>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a link. Returns `true` if the row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM guardian_links WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List all links with both display names resolved.
    pub async fn list(pool: &PgPool) -> Result<Vec<GuardianLinkDetail>, sqlx::Error> {
        sqlx::query_as::<_, GuardianLinkDetail>(
            "SELECT g.id, g.parent_id, p.display_name AS parent_name,
                    g.student_id, s.display_name AS student_name, g.created_at
             FROM guardian_links g
             JOIN users p ON g.parent_id = p.id
             JOIN users s ON g.student_id = s.id
             ORDER BY p.display_name, s.display_name",
        )
        .fetch_all(pool)
        .await
    }

    /// The student IDs a parent is linked to.
    ///
    /// This is the whole of a parent's visibility: record reads are checked
    /// against exactly this set.
    pub async fn linked_student_ids(
        pool: &PgPool,
        parent_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT student_id FROM guardian_links WHERE parent_id = $1 ORDER BY student_id",
        )
        .bind(parent_id)
        .fetch_all(pool)
        .await
    }

    /// Remove every link touching a user, as parent or as student.
    ///
    /// Called when an account is deactivated. Returns the number of links
    /// removed.
    pub async fn remove_links_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM guardian_links WHERE parent_id = $1 OR student_id = $1")
                .bind(user_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}
