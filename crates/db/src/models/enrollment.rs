//! Enrollment entity model and DTOs.

use registra_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full enrollment row from the `enrollments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Enrollment {
    pub id: DbId,
    pub subject_id: DbId,
    pub student_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Enrollment joined with the student's display name, for per-subject rosters.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EnrolledStudent {
    pub enrollment_id: DbId,
    pub student_id: DbId,
    pub student_name: String,
    pub enrolled_at: Timestamp,
}

/// DTO for creating an enrollment.
#[derive(Debug, Deserialize)]
pub struct CreateEnrollment {
    pub subject_id: DbId,
    pub student_id: DbId,
}
