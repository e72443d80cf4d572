//! Handlers for the `/enrollments` resource.
//!
//! Enrollment ties a student to a subject. Creating one is allowed for the
//! subject's owning teacher and for admins; removing one deletes only the
//! enrollment row, never the grades or attendance recorded under it.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use registra_core::authorization::{Action, ResourceRef};
use registra_core::error::CoreError;
use registra_core::roles::Role;
use registra_core::types::DbId;
use registra_db::models::enrollment::{CreateEnrollment, Enrollment};
use registra_db::repositories::{EnrollmentRepo, UserRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::subjects::find_subject;
use crate::handlers::{enforce, load_identity};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /enrollments`.
#[derive(Debug, Deserialize)]
pub struct CreateEnrollmentRequest {
    pub subject_id: DbId,
    pub student_id: DbId,
}

/// POST /api/v1/enrollments
///
/// Enroll a student in a subject. Owning teacher or admin; 409 when the
/// pair already exists.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateEnrollmentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Enrollment>>)> {
    auth.require_write_access()?;

    let subject = find_subject(&state, input.subject_id).await?;

    let identity = load_identity(&state.pool, &auth).await?;
    let resource = ResourceRef::record(subject.id, subject.teacher_id, input.student_id);
    enforce(&identity, Action::Create, &resource)?;

    let student = UserRepo::find_by_id(&state.pool, input.student_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: input.student_id,
        }))?;
    if student.parsed_role()? != Role::Student || !student.is_active {
        return Err(AppError::Core(CoreError::Validation(
            "student_id must reference an active student account".to_string(),
        )));
    }

    if EnrollmentRepo::exists(&state.pool, subject.id, student.id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Student is already enrolled in this subject".to_string(),
        )));
    }

    let enrollment = EnrollmentRepo::create(
        &state.pool,
        &CreateEnrollment {
            subject_id: subject.id,
            student_id: student.id,
        },
    )
    .await?;

    tracing::info!(
        subject_id = subject.id,
        student_id = student.id,
        "Student enrolled"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: enrollment })))
}

/// DELETE /api/v1/enrollments/{id}
///
/// Drop an enrollment. The row is removed; recorded grades and attendance
/// keep their subject and student references. Returns 204.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    auth.require_write_access()?;

    let enrollment = EnrollmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Enrollment",
            id,
        }))?;
    let subject = find_subject(&state, enrollment.subject_id).await?;

    let identity = load_identity(&state.pool, &auth).await?;
    let resource = ResourceRef::record(subject.id, subject.teacher_id, enrollment.student_id);
    enforce(&identity, Action::Delete, &resource)?;

    let deleted = EnrollmentRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(
            enrollment_id = id,
            subject_id = subject.id,
            student_id = enrollment.student_id,
            "Enrollment removed"
        );
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Enrollment",
            id,
        }))
    }
}
