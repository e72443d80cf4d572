//! Deployment-wide grading configuration model.

use registra_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The single `grading_settings` row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GradingSettings {
    pub id: DbId,
    pub grade_min: f64,
    pub grade_max: f64,
    pub passing_grade: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for updating the grading configuration. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateGradingSettings {
    pub grade_min: Option<f64>,
    pub grade_max: Option<f64>,
    pub passing_grade: Option<f64>,
}
