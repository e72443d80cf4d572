//! Subject entity model and DTOs.

use registra_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full subject row from the `subjects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subject {
    pub id: DbId,
    pub name: String,
    pub teacher_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Subject row joined with the owning teacher's display name, for listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubjectWithTeacher {
    pub id: DbId,
    pub name: String,
    pub teacher_id: DbId,
    pub teacher_name: String,
    pub created_at: Timestamp,
}

/// DTO for creating a subject.
#[derive(Debug, Deserialize)]
pub struct CreateSubject {
    pub name: String,
    pub teacher_id: DbId,
}

/// DTO for updating a subject. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateSubject {
    pub name: Option<String>,
    pub teacher_id: Option<DbId>,
}
