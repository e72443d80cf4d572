//! Repository for the `attendance` and `attendance_audit` tables.

use chrono::NaiveDate;
use registra_core::types::DbId;
use sqlx::PgPool;

use crate::models::attendance::{
    Attendance, AttendanceAuditEntry, AttendanceUpsert, RecordAttendance,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, subject_id, student_id, date, period, present, created_at, updated_at";

const AUDIT_COLUMNS: &str = "id, attendance_id, present, changed_by, created_at";

/// Provides operations for attendance entries and their audit trail.
pub struct AttendanceRepo;

impl AttendanceRepo {
    /// Record attendance for a (student, subject, date, period) slot.
    ///
    /// A first write inserts; a repeat write overwrites the stored mark.
    /// Either way an audit row is appended in the same transaction, so the
    /// trail always holds every value the slot has carried.
    pub async fn record(
        pool: &PgPool,
        input: &RecordAttendance,
        changed_by: DbId,
    ) -> Result<AttendanceUpsert, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let upsert = sqlx::query_as::<_, AttendanceUpsert>(
            "INSERT INTO attendance (subject_id, student_id, date, period, present)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT ON CONSTRAINT uq_attendance_student_subject_date_period
             DO UPDATE SET present = EXCLUDED.present, updated_at = NOW()
             RETURNING id, subject_id, student_id, date, period, present,
                       (xmax = 0) AS inserted",
        )
        .bind(input.subject_id)
        .bind(input.student_id)
        .bind(input.date)
        .bind(input.period)
        .bind(input.present)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO attendance_audit (attendance_id, present, changed_by)
             VALUES ($1, $2, $3)",
        )
        .bind(upsert.id)
        .bind(upsert.present)
        .bind(changed_by)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(upsert)
    }

    /// Find an attendance entry by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Attendance>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM attendance WHERE id = $1");
        sqlx::query_as::<_, Attendance>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a student's attendance entries from `since` onward, most recent
    /// first. Pass a subject to narrow to one subject.
    pub async fn list_for_student(
        pool: &PgPool,
        student_id: DbId,
        subject_id: Option<DbId>,
        since: NaiveDate,
    ) -> Result<Vec<Attendance>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM attendance
             WHERE student_id = $1
               AND date >= $2
               AND ($3::bigint IS NULL OR subject_id = $3)
             ORDER BY date DESC, period DESC"
        );
        sqlx::query_as::<_, Attendance>(&query)
            .bind(student_id)
            .bind(since)
            .bind(subject_id)
            .fetch_all(pool)
            .await
    }

    /// The audit trail for one attendance entry, oldest write first.
    pub async fn list_audit(
        pool: &PgPool,
        attendance_id: DbId,
    ) -> Result<Vec<AttendanceAuditEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {AUDIT_COLUMNS} FROM attendance_audit
             WHERE attendance_id = $1
             ORDER BY id"
        );
        sqlx::query_as::<_, AttendanceAuditEntry>(&query)
            .bind(attendance_id)
            .fetch_all(pool)
            .await
    }
}
