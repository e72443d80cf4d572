//! Graded assignment model and DTOs.

use registra_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full assignment row from the `assignments` table.
///
/// `grade` is stored already rounded to two decimal places; validation and
/// rounding happen before the insert, not in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Assignment {
    pub id: DbId,
    pub subject_id: DbId,
    pub student_id: DbId,
    pub name: String,
    pub grade: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Assignment joined with its subject name, for cross-subject listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssignmentWithSubject {
    pub id: DbId,
    pub subject_id: DbId,
    pub subject_name: String,
    pub student_id: DbId,
    pub name: String,
    pub grade: f64,
    pub created_at: Timestamp,
}

/// DTO for creating an assignment. The grade arrives pre-validated.
#[derive(Debug, Deserialize)]
pub struct CreateAssignment {
    pub subject_id: DbId,
    pub student_id: DbId,
    pub name: String,
    pub grade: f64,
}

/// DTO for updating an assignment. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateAssignment {
    pub name: Option<String>,
    pub grade: Option<f64>,
}
