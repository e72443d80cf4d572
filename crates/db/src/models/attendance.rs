//! Attendance models: daily entries plus the append-only audit trail.

use chrono::NaiveDate;
use registra_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full attendance row from the `attendance` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Attendance {
    pub id: DbId,
    pub subject_id: DbId,
    pub student_id: DbId,
    pub date: NaiveDate,
    pub period: i32,
    pub present: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Result of an attendance upsert: the stored row plus whether the write
/// created a new entry (`true`) or overwrote an existing mark (`false`).
#[derive(Debug, Clone, FromRow)]
pub struct AttendanceUpsert {
    pub id: DbId,
    pub subject_id: DbId,
    pub student_id: DbId,
    pub date: NaiveDate,
    pub period: i32,
    pub present: bool,
    pub inserted: bool,
}

/// One entry in the `attendance_audit` trail.
///
/// The trail stores every value ever written for a slot, in write order;
/// rows are never updated or deleted.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AttendanceAuditEntry {
    pub id: DbId,
    pub attendance_id: DbId,
    pub present: bool,
    pub changed_by: DbId,
    pub created_at: Timestamp,
}

/// DTO for recording attendance. A repeat write for the same
/// (student, subject, date, period) overwrites the previous mark.
#[derive(Debug, Deserialize)]
pub struct RecordAttendance {
    pub subject_id: DbId,
    pub student_id: DbId,
    pub date: NaiveDate,
    pub period: i32,
    pub present: bool,
}
