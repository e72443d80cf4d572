//! Handlers for the `/assignments` resource: recording and correcting
//! graded work.
//!
//! Grades pass through `registra_core::grading::normalize_grade` before any
//! row is written: two-decimal half-up rounding first, then the configured
//! bound check, so `100.004` rounds into range and `100.01` is rejected with
//! the ledger untouched. Authorization runs before enrollment or grade
//! validation so an unauthorized caller learns nothing about either.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use registra_core::authorization::{Action, ResourceRef};
use registra_core::error::CoreError;
use registra_core::grading::normalize_grade;
use registra_core::types::DbId;
use registra_db::models::assignment::{Assignment, CreateAssignment, UpdateAssignment};
use registra_db::repositories::{AssignmentRepo, EnrollmentRepo, SettingsRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::subjects::find_subject;
use crate::handlers::{enforce, load_identity};
use crate::middleware::auth::AuthUser;
use crate::notifications::NotificationEvent;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /assignments`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAssignmentRequest {
    pub subject_id: DbId,
    pub student_id: DbId,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub grade: f64,
}

/// Request body for `PUT /assignments/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAssignmentRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub grade: Option<f64>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/assignments
///
/// Record a graded assignment. Owning teacher or admin; the student must be
/// enrolled in the subject. 409 when the (subject, student, name) triple
/// already exists.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateAssignmentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Assignment>>)> {
    auth.require_write_access()?;
    input.validate()?;

    let subject = find_subject(&state, input.subject_id).await?;

    let identity = load_identity(&state.pool, &auth).await?;
    let resource = ResourceRef::record(subject.id, subject.teacher_id, input.student_id);
    enforce(&identity, Action::Create, &resource)?;

    if !EnrollmentRepo::exists(&state.pool, subject.id, input.student_id).await? {
        return Err(AppError::Core(CoreError::Validation(
            "Student is not enrolled in this subject".to_string(),
        )));
    }

    let settings = SettingsRepo::get(&state.pool).await?;
    let grade = normalize_grade(input.grade, settings.grade_min, settings.grade_max)?;

    let assignment = AssignmentRepo::create(
        &state.pool,
        &CreateAssignment {
            subject_id: subject.id,
            student_id: input.student_id,
            name: input.name,
            grade,
        },
    )
    .await?;

    tracing::info!(
        assignment_id = assignment.id,
        subject_id = subject.id,
        student_id = assignment.student_id,
        grade = assignment.grade,
        "Grade recorded"
    );

    state
        .notifier
        .dispatch(NotificationEvent::GradeRecorded {
            student_id: assignment.student_id,
            subject_id: assignment.subject_id,
            assignment_id: assignment.id,
            grade: assignment.grade,
        })
        .await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: assignment })))
}

/// PUT /api/v1/assignments/{id}
///
/// Partial update of name and/or grade. A new grade goes through the same
/// normalization as on create.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAssignmentRequest>,
) -> AppResult<Json<DataResponse<Assignment>>> {
    auth.require_write_access()?;
    input.validate()?;

    let existing = AssignmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Assignment",
            id,
        }))?;
    let subject = find_subject(&state, existing.subject_id).await?;

    let identity = load_identity(&state.pool, &auth).await?;
    let resource = ResourceRef::record(subject.id, subject.teacher_id, existing.student_id);
    enforce(&identity, Action::Update, &resource)?;

    let grade = match input.grade {
        Some(value) => {
            let settings = SettingsRepo::get(&state.pool).await?;
            Some(normalize_grade(value, settings.grade_min, settings.grade_max)?)
        }
        None => None,
    };

    let assignment = AssignmentRepo::update(
        &state.pool,
        id,
        &UpdateAssignment {
            name: input.name,
            grade,
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Assignment",
        id,
    }))?;

    tracing::info!(
        assignment_id = assignment.id,
        subject_id = assignment.subject_id,
        student_id = assignment.student_id,
        grade = assignment.grade,
        "Grade updated"
    );

    state
        .notifier
        .dispatch(NotificationEvent::GradeUpdated {
            student_id: assignment.student_id,
            subject_id: assignment.subject_id,
            assignment_id: assignment.id,
            grade: assignment.grade,
        })
        .await;

    Ok(Json(DataResponse { data: assignment }))
}
