//! Repository for the `enrollments` table.

use registra_core::types::DbId;
use sqlx::PgPool;

use crate::models::enrollment::{CreateEnrollment, EnrolledStudent, Enrollment};
use crate::models::subject::SubjectWithTeacher;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, subject_id, student_id, created_at, updated_at";

/// Provides CRUD operations for enrollments.
pub struct EnrollmentRepo;

impl EnrollmentRepo {
    /// Insert a new enrollment, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateEnrollment,
    ) -> Result<Enrollment, sqlx::Error> {
        let query = format!(
            "INSERT INTO enrollments (subject_id, student_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(input.subject_id)
            .bind(input.student_id)
            .fetch_one(pool)
            .await
    }

    /// Find an enrollment by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Enrollment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM enrollments WHERE id = $1");
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a student is currently enrolled in a subject.
    pub async fn exists(
        pool: &PgPool,
        subject_id: DbId,
        student_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM enrollments WHERE subject_id = $1 AND student_id = $2
             )",
        )
        .bind(subject_id)
        .bind(student_id)
        .fetch_one(pool)
        .await
    }

    /// Remove an enrollment. Historical grades and attendance keep their own
    /// subject/student references and are untouched.
    ///
    /// Returns `true` if the row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM enrollments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove every enrollment held by a student, returning the number of
    /// rows deleted. Used when a student account is deactivated.
    pub async fn remove_for_student(pool: &PgPool, student_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM enrollments WHERE student_id = $1")
            .bind(student_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// List the subjects a student is enrolled in, with teacher names.
    pub async fn list_subjects_for_student(
        pool: &PgPool,
        student_id: DbId,
    ) -> Result<Vec<SubjectWithTeacher>, sqlx::Error> {
        sqlx::query_as::<_, SubjectWithTeacher>(
            "SELECT s.id, s.name, s.teacher_id,
                    u.display_name AS teacher_name, s.created_at
             FROM enrollments e
             JOIN subjects s ON e.subject_id = s.id
             JOIN users u ON s.teacher_id = u.id
             WHERE e.student_id = $1
             ORDER BY s.name",
        )
        .bind(student_id)
        .fetch_all(pool)
        .await
    }

    /// List the students enrolled in a subject, with display names.
    pub async fn list_students_for_subject(
        pool: &PgPool,
        subject_id: DbId,
    ) -> Result<Vec<EnrolledStudent>, sqlx::Error> {
        sqlx::query_as::<_, EnrolledStudent>(
            "SELECT e.id AS enrollment_id, u.id AS student_id,
                    u.display_name AS student_name, e.created_at AS enrolled_at
             FROM enrollments e
             JOIN users u ON e.student_id = u.id
             WHERE e.subject_id = $1
             ORDER BY u.display_name",
        )
        .bind(subject_id)
        .fetch_all(pool)
        .await
    }
}
