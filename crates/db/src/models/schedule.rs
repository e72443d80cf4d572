//! Weekly schedule slot model and DTOs.

use registra_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full schedule slot row from the `schedule_slots` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScheduleSlot {
    pub id: DbId,
    pub subject_id: DbId,
    pub weekday: String,
    pub period: i32,
    pub room: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Slot joined with its subject and teacher names, for student timetables.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TimetableSlot {
    pub subject_id: DbId,
    pub subject_name: String,
    pub teacher_name: String,
    pub weekday: String,
    pub period: i32,
    pub room: Option<String>,
}

/// DTO for creating a schedule slot. Weekday and period arrive pre-validated.
#[derive(Debug, Deserialize)]
pub struct CreateScheduleSlot {
    pub subject_id: DbId,
    pub weekday: String,
    pub period: i32,
    pub room: Option<String>,
}
