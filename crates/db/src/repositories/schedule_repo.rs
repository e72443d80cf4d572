//! Repository for the `schedule_slots` table.

use registra_core::types::DbId;
use sqlx::PgPool;

use crate::models::schedule::{CreateScheduleSlot, ScheduleSlot, TimetableSlot};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, subject_id, weekday, period, room, created_at, updated_at";

/// Orders rows Monday through Friday, then by period.
const WEEKDAY_ORDER: &str =
    "array_position(ARRAY['monday','tuesday','wednesday','thursday','friday'], weekday)";

/// Provides CRUD operations for schedule slots.
pub struct ScheduleRepo;

impl ScheduleRepo {
    /// Insert a new slot, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateScheduleSlot,
    ) -> Result<ScheduleSlot, sqlx::Error> {
        let query = format!(
            "INSERT INTO schedule_slots (subject_id, weekday, period, room)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ScheduleSlot>(&query)
            .bind(input.subject_id)
            .bind(&input.weekday)
            .bind(input.period)
            .bind(&input.room)
            .fetch_one(pool)
            .await
    }

    /// Find a slot by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ScheduleSlot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM schedule_slots WHERE id = $1");
        sqlx::query_as::<_, ScheduleSlot>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a slot. Returns `true` if the row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM schedule_slots WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List a subject's slots in weekday-then-period order.
    pub async fn list_for_subject(
        pool: &PgPool,
        subject_id: DbId,
    ) -> Result<Vec<ScheduleSlot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM schedule_slots
             WHERE subject_id = $1
             ORDER BY {WEEKDAY_ORDER}, period"
        );
        sqlx::query_as::<_, ScheduleSlot>(&query)
            .bind(subject_id)
            .fetch_all(pool)
            .await
    }

    /// A student's weekly timetable across every enrolled subject.
    pub async fn timetable_for_student(
        pool: &PgPool,
        student_id: DbId,
    ) -> Result<Vec<TimetableSlot>, sqlx::Error> {
        sqlx::query_as::<_, TimetableSlot>(
            "SELECT sl.subject_id, s.name AS subject_name,
                    u.display_name AS teacher_name,
                    sl.weekday, sl.period, sl.room
             FROM schedule_slots sl
             JOIN subjects s ON sl.subject_id = s.id
             JOIN users u ON s.teacher_id = u.id
             JOIN enrollments e ON e.subject_id = sl.subject_id
             WHERE e.student_id = $1
             ORDER BY array_position(
                 ARRAY['monday','tuesday','wednesday','thursday','friday'], sl.weekday
             ), sl.period",
        )
        .bind(student_id)
        .fetch_all(pool)
        .await
    }
}
