//! Repository for the `subjects` table.

use registra_core::types::DbId;
use sqlx::PgPool;

use crate::models::subject::{CreateSubject, Subject, SubjectWithTeacher, UpdateSubject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, teacher_id, created_at, updated_at";

const LIST_COLUMNS: &str = "s.id, s.name, s.teacher_id, \
                             u.display_name AS teacher_name, s.created_at";

/// Provides CRUD operations for subjects.
pub struct SubjectRepo;

impl SubjectRepo {
    /// Insert a new subject, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSubject) -> Result<Subject, sqlx::Error> {
        let query = format!(
            "INSERT INTO subjects (name, teacher_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subject>(&query)
            .bind(&input.name)
            .bind(input.teacher_id)
            .fetch_one(pool)
            .await
    }

    /// Find a subject by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Subject>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM subjects WHERE id = $1");
        sqlx::query_as::<_, Subject>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all subjects with the owning teacher's display name.
    pub async fn list(pool: &PgPool) -> Result<Vec<SubjectWithTeacher>, sqlx::Error> {
        let query = format!(
            "SELECT {LIST_COLUMNS}
             FROM subjects s
             JOIN users u ON s.teacher_id = u.id
             ORDER BY s.name"
        );
        sqlx::query_as::<_, SubjectWithTeacher>(&query)
            .fetch_all(pool)
            .await
    }

    /// List subjects owned by a teacher.
    pub async fn list_for_teacher(
        pool: &PgPool,
        teacher_id: DbId,
    ) -> Result<Vec<Subject>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM subjects WHERE teacher_id = $1 ORDER BY name");
        sqlx::query_as::<_, Subject>(&query)
            .bind(teacher_id)
            .fetch_all(pool)
            .await
    }

    /// Update a subject. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSubject,
    ) -> Result<Option<Subject>, sqlx::Error> {
        let query = format!(
            "UPDATE subjects SET
                name = COALESCE($2, name),
                teacher_id = COALESCE($3, teacher_id),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subject>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.teacher_id)
            .fetch_optional(pool)
            .await
    }
}
