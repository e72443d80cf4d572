//! Repository for the `assignments` table.

use registra_core::types::DbId;
use sqlx::PgPool;

use crate::models::assignment::{
    Assignment, AssignmentWithSubject, CreateAssignment, UpdateAssignment,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, subject_id, student_id, name, grade, created_at, updated_at";

const WITH_SUBJECT_COLUMNS: &str = "a.id, a.subject_id, s.name AS subject_name, \
                                     a.student_id, a.name, a.grade, a.created_at";

/// Provides CRUD operations for graded assignments.
pub struct AssignmentRepo;

impl AssignmentRepo {
    /// Insert a new assignment, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateAssignment) -> Result<Assignment, sqlx::Error> {
        let query = format!(
            "INSERT INTO assignments (subject_id, student_id, name, grade)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Assignment>(&query)
            .bind(input.subject_id)
            .bind(input.student_id)
            .bind(&input.name)
            .bind(input.grade)
            .fetch_one(pool)
            .await
    }

    /// Find an assignment by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Assignment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assignments WHERE id = $1");
        sqlx::query_as::<_, Assignment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update an assignment. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAssignment,
    ) -> Result<Option<Assignment>, sqlx::Error> {
        let query = format!(
            "UPDATE assignments SET
                name = COALESCE($2, name),
                grade = COALESCE($3, grade),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Assignment>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.grade)
            .fetch_optional(pool)
            .await
    }

    /// List a student's assignments across all subjects, oldest first,
    /// with subject names resolved.
    pub async fn list_for_student(
        pool: &PgPool,
        student_id: DbId,
    ) -> Result<Vec<AssignmentWithSubject>, sqlx::Error> {
        let query = format!(
            "SELECT {WITH_SUBJECT_COLUMNS}
             FROM assignments a
             JOIN subjects s ON a.subject_id = s.id
             WHERE a.student_id = $1
             ORDER BY a.created_at, a.id"
        );
        sqlx::query_as::<_, AssignmentWithSubject>(&query)
            .bind(student_id)
            .fetch_all(pool)
            .await
    }

    /// All grades recorded for a subject, across every enrolled student.
    pub async fn grades_for_subject(
        pool: &PgPool,
        subject_id: DbId,
    ) -> Result<Vec<f64>, sqlx::Error> {
        sqlx::query_scalar("SELECT grade FROM assignments WHERE subject_id = $1")
            .bind(subject_id)
            .fetch_all(pool)
            .await
    }

    /// A student's grades in one subject in chronological order.
    ///
    /// Write order doubles as the sample order for trend forecasting.
    pub async fn grades_for_student_in_subject(
        pool: &PgPool,
        student_id: DbId,
        subject_id: DbId,
    ) -> Result<Vec<f64>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT grade FROM assignments
             WHERE student_id = $1 AND subject_id = $2
             ORDER BY created_at, id",
        )
        .bind(student_id)
        .bind(subject_id)
        .fetch_all(pool)
        .await
    }
}
