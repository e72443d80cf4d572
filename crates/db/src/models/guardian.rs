//! Parent-to-student guardian link model and DTOs.

use registra_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full guardian link row from the `guardian_links` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GuardianLink {
    pub id: DbId,
    pub parent_id: DbId,
    pub student_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Link joined with both display names, for the admin listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GuardianLinkDetail {
    pub id: DbId,
    pub parent_id: DbId,
    pub parent_name: String,
    pub student_id: DbId,
    pub student_name: String,
    pub created_at: Timestamp,
}

/// DTO for creating a guardian link.
#[derive(Debug, Deserialize)]
pub struct CreateGuardianLink {
    pub parent_id: DbId,
    pub student_id: DbId,
}
