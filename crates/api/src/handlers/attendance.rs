//! Handlers for the `/attendance` resource.
//!
//! Attendance is an upsert surface: the first write for a
//! (student, subject, date, period) slot answers 201, a repeat write
//! overwrites the stored mark and answers 200. Every write appends to the
//! audit trail regardless, so corrections never erase history.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use registra_core::authorization::{Action, ResourceRef};
use registra_core::error::CoreError;
use registra_core::schedule::validate_period;
use registra_core::types::DbId;
use registra_db::models::attendance::{AttendanceAuditEntry, AttendanceUpsert, RecordAttendance};
use registra_db::repositories::{AttendanceRepo, EnrollmentRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::subjects::find_subject;
use crate::handlers::{enforce, load_identity};
use crate::middleware::auth::AuthUser;
use crate::notifications::NotificationEvent;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /attendance`.
#[derive(Debug, Deserialize)]
pub struct RecordAttendanceRequest {
    pub subject_id: DbId,
    pub student_id: DbId,
    pub date: NaiveDate,
    pub period: i32,
    pub present: bool,
}

/// The stored mark as returned by the write endpoint.
#[derive(Debug, Serialize)]
pub struct AttendanceEntry {
    pub id: DbId,
    pub subject_id: DbId,
    pub student_id: DbId,
    pub date: NaiveDate,
    pub period: i32,
    pub present: bool,
}

impl From<AttendanceUpsert> for AttendanceEntry {
    fn from(upsert: AttendanceUpsert) -> Self {
        Self {
            id: upsert.id,
            subject_id: upsert.subject_id,
            student_id: upsert.student_id,
            date: upsert.date,
            period: upsert.period,
            present: upsert.present,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/attendance
///
/// Mark a student present or absent for one period. Owning teacher or
/// admin; the student must be enrolled. 201 when the slot is new, 200 when
/// an existing mark was overwritten.
pub async fn record(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<RecordAttendanceRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<AttendanceEntry>>)> {
    auth.require_write_access()?;

    let subject = find_subject(&state, input.subject_id).await?;

    let identity = load_identity(&state.pool, &auth).await?;
    let resource = ResourceRef::record(subject.id, subject.teacher_id, input.student_id);
    enforce(&identity, Action::Create, &resource)?;

    validate_period(input.period)?;

    if !EnrollmentRepo::exists(&state.pool, subject.id, input.student_id).await? {
        return Err(AppError::Core(CoreError::Validation(
            "Student is not enrolled in this subject".to_string(),
        )));
    }

    let upsert = AttendanceRepo::record(
        &state.pool,
        &RecordAttendance {
            subject_id: subject.id,
            student_id: input.student_id,
            date: input.date,
            period: input.period,
            present: input.present,
        },
        auth.user_id,
    )
    .await?;

    let status = if upsert.inserted {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    tracing::info!(
        attendance_id = upsert.id,
        subject_id = upsert.subject_id,
        student_id = upsert.student_id,
        date = %upsert.date,
        period = upsert.period,
        present = upsert.present,
        overwrote = !upsert.inserted,
        "Attendance recorded"
    );

    state
        .notifier
        .dispatch(NotificationEvent::AttendanceMarked {
            student_id: upsert.student_id,
            subject_id: upsert.subject_id,
            date: upsert.date,
            period: upsert.period,
            present: upsert.present,
        })
        .await;

    Ok((status, Json(DataResponse { data: upsert.into() })))
}

/// GET /api/v1/attendance/{id}/audit
///
/// Every value the slot has carried, oldest write first. Owning teacher or
/// admin.
pub async fn list_audit(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<AttendanceAuditEntry>>>> {
    let attendance = AttendanceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Attendance entry",
            id,
        }))?;
    let subject = find_subject(&state, attendance.subject_id).await?;

    let identity = load_identity(&state.pool, &auth).await?;
    let resource = ResourceRef::subject_wide(subject.id, subject.teacher_id);
    enforce(&identity, Action::Read, &resource)?;

    let entries = AttendanceRepo::list_audit(&state.pool, id).await?;
    Ok(Json(DataResponse { data: entries }))
}
