//! Repository for the `grading_settings` table.

use sqlx::PgPool;

use crate::models::settings::{GradingSettings, UpdateGradingSettings};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, grade_min, grade_max, passing_grade, created_at, updated_at";

/// Provides access to the single grading configuration row.
pub struct SettingsRepo;

impl SettingsRepo {
    /// Fetch the grading configuration. The row is seeded by migration, so
    /// it always exists.
    pub async fn get(pool: &PgPool) -> Result<GradingSettings, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM grading_settings ORDER BY id LIMIT 1");
        sqlx::query_as::<_, GradingSettings>(&query)
            .fetch_one(pool)
            .await
    }

    /// Update the grading configuration. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        input: &UpdateGradingSettings,
    ) -> Result<GradingSettings, sqlx::Error> {
        let query = format!(
            "UPDATE grading_settings SET
                grade_min = COALESCE($1, grade_min),
                grade_max = COALESCE($2, grade_max),
                passing_grade = COALESCE($3, passing_grade),
                updated_at = NOW()
             WHERE id = (SELECT id FROM grading_settings ORDER BY id LIMIT 1)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GradingSettings>(&query)
            .bind(input.grade_min)
            .bind(input.grade_max)
            .bind(input.passing_grade)
            .fetch_one(pool)
            .await
    }
}
