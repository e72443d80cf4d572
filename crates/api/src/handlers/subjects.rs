//! Handlers for the `/subjects` resource: subject management, class roster,
//! class report, and schedule slots.
//!
//! Subject creation and reassignment are admin operations. Roster, report,
//! and schedule mutations go through the authorization engine with a
//! subject-wide resource reference, so owning teachers and admins pass and
//! everyone else receives the generic forbidden error.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use registra_core::analytics::{grade_statistics, GradeStatistics};
use registra_core::authorization::{Action, ResourceRef};
use registra_core::error::CoreError;
use registra_core::grading::{is_passing, letter_grade};
use registra_core::roles::Role;
use registra_core::schedule::{validate_period, Weekday};
use registra_core::types::DbId;
use registra_db::models::enrollment::EnrolledStudent;
use registra_db::models::schedule::{CreateScheduleSlot, ScheduleSlot};
use registra_db::models::subject::{CreateSubject, Subject, SubjectWithTeacher, UpdateSubject};
use registra_db::repositories::{
    AssignmentRepo, EnrollmentRepo, ScheduleRepo, SettingsRepo, SubjectRepo, UserRepo,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::{enforce, load_identity};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /subjects`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSubjectRequest {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    pub teacher_id: DbId,
}

/// Request body for `PUT /subjects/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSubjectRequest {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
    pub teacher_id: Option<DbId>,
}

/// Request body for `POST /subjects/{id}/schedule`.
#[derive(Debug, Deserialize)]
pub struct CreateScheduleSlotRequest {
    pub weekday: String,
    pub period: i32,
    pub room: Option<String>,
}

/// Per-student block of the class report.
#[derive(Debug, Serialize)]
pub struct StudentReportRow {
    pub student_id: DbId,
    pub student_name: String,
    pub statistics: GradeStatistics,
    /// Letter for the student's average; absent when there are no grades.
    pub letter_grade: Option<String>,
    pub passing: Option<bool>,
}

/// Response body for `GET /subjects/{id}/report`.
#[derive(Debug, Serialize)]
pub struct ClassReport {
    pub subject_id: DbId,
    pub subject_name: String,
    pub class_statistics: GradeStatistics,
    pub students: Vec<StudentReportRow>,
}

// ---------------------------------------------------------------------------
// Subject handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/subjects
///
/// Create a subject owned by an active teacher. Admin only.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateSubjectRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Subject>>)> {
    admin.require_write_access()?;
    input.validate()?;

    ensure_active_teacher(&state, input.teacher_id).await?;

    let subject = SubjectRepo::create(
        &state.pool,
        &CreateSubject {
            name: input.name,
            teacher_id: input.teacher_id,
        },
    )
    .await?;

    tracing::info!(
        subject_id = subject.id,
        teacher_id = subject.teacher_id,
        "Subject created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: subject })))
}

/// GET /api/v1/subjects
///
/// List all subjects with teacher names. Any authenticated caller.
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<SubjectWithTeacher>>>> {
    let subjects = SubjectRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: subjects }))
}

/// GET /api/v1/subjects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Subject>>> {
    let subject = SubjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Subject",
            id,
        }))?;
    Ok(Json(DataResponse { data: subject }))
}

/// PUT /api/v1/subjects/{id}
///
/// Rename a subject or hand it to a different teacher. Admin only.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSubjectRequest>,
) -> AppResult<Json<DataResponse<Subject>>> {
    admin.require_write_access()?;
    input.validate()?;

    if let Some(teacher_id) = input.teacher_id {
        ensure_active_teacher(&state, teacher_id).await?;
    }

    let subject = SubjectRepo::update(
        &state.pool,
        id,
        &UpdateSubject {
            name: input.name,
            teacher_id: input.teacher_id,
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Subject",
        id,
    }))?;

    Ok(Json(DataResponse { data: subject }))
}

/// GET /api/v1/subjects/{id}/students
///
/// Class roster. Owning teacher or admin.
pub async fn list_students(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<EnrolledStudent>>>> {
    let subject = find_subject(&state, id).await?;

    let identity = load_identity(&state.pool, &auth).await?;
    let resource = ResourceRef::subject_wide(subject.id, subject.teacher_id);
    enforce(&identity, Action::Read, &resource)?;

    let students = EnrollmentRepo::list_students_for_subject(&state.pool, subject.id).await?;
    Ok(Json(DataResponse { data: students }))
}

/// GET /api/v1/subjects/{id}/report
///
/// Class report: per-student grade statistics with letter grades and
/// pass/fail against the configured passing grade, plus class-wide
/// statistics. Owning teacher or admin.
pub async fn class_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ClassReport>>> {
    let subject = find_subject(&state, id).await?;

    let identity = load_identity(&state.pool, &auth).await?;
    let resource = ResourceRef::subject_wide(subject.id, subject.teacher_id);
    enforce(&identity, Action::Read, &resource)?;

    let settings = SettingsRepo::get(&state.pool).await?;
    let roster = EnrollmentRepo::list_students_for_subject(&state.pool, subject.id).await?;

    let mut students = Vec::with_capacity(roster.len());
    for member in &roster {
        let grades =
            AssignmentRepo::grades_for_student_in_subject(&state.pool, member.student_id, subject.id)
                .await?;
        let statistics = grade_statistics(&grades);
        let letter = statistics.average.map(|avg| letter_grade(avg).to_string());
        let passing = statistics
            .average
            .map(|avg| is_passing(avg, settings.passing_grade));

        students.push(StudentReportRow {
            student_id: member.student_id,
            student_name: member.student_name.clone(),
            statistics,
            letter_grade: letter,
            passing,
        });
    }

    let class_grades = AssignmentRepo::grades_for_subject(&state.pool, subject.id).await?;
    let report = ClassReport {
        subject_id: subject.id,
        subject_name: subject.name,
        class_statistics: grade_statistics(&class_grades),
        students,
    };

    Ok(Json(DataResponse { data: report }))
}

// ---------------------------------------------------------------------------
// Schedule slot handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/subjects/{id}/schedule
///
/// Weekly slots for a subject, ordered by weekday and period. Any
/// authenticated caller; the timetable itself is not sensitive.
pub async fn list_schedule(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ScheduleSlot>>>> {
    // 404 for unknown subjects rather than an empty list.
    find_subject(&state, id).await?;

    let slots = ScheduleRepo::list_for_subject(&state.pool, id).await?;
    Ok(Json(DataResponse { data: slots }))
}

/// POST /api/v1/subjects/{id}/schedule
///
/// Add a weekly slot. Owning teacher or admin.
pub async fn create_schedule_slot(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<CreateScheduleSlotRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ScheduleSlot>>)> {
    auth.require_write_access()?;

    let subject = find_subject(&state, id).await?;

    let identity = load_identity(&state.pool, &auth).await?;
    let resource = ResourceRef::subject_wide(subject.id, subject.teacher_id);
    enforce(&identity, Action::Create, &resource)?;

    let weekday = Weekday::parse(&input.weekday)?;
    validate_period(input.period)?;

    let slot = ScheduleRepo::create(
        &state.pool,
        &CreateScheduleSlot {
            subject_id: subject.id,
            weekday: weekday.as_str().to_string(),
            period: input.period,
            room: input.room,
        },
    )
    .await?;

    tracing::info!(
        subject_id = subject.id,
        weekday = %slot.weekday,
        period = slot.period,
        "Schedule slot created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: slot })))
}

/// DELETE /api/v1/schedule/{id}
///
/// Remove a slot. Owning teacher or admin.
pub async fn delete_schedule_slot(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    auth.require_write_access()?;

    let slot = ScheduleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Schedule slot",
            id,
        }))?;
    let subject = find_subject(&state, slot.subject_id).await?;

    let identity = load_identity(&state.pool, &auth).await?;
    let resource = ResourceRef::subject_wide(subject.id, subject.teacher_id);
    enforce(&identity, Action::Delete, &resource)?;

    let deleted = ScheduleRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Schedule slot",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a subject or return the standard 404.
pub(crate) async fn find_subject(state: &AppState, id: DbId) -> Result<Subject, AppError> {
    SubjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Subject",
            id,
        }))
}

/// Reject a `teacher_id` that is not an active teacher account.
async fn ensure_active_teacher(state: &AppState, teacher_id: DbId) -> Result<(), AppError> {
    let teacher = UserRepo::find_by_id(&state.pool, teacher_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: teacher_id,
        }))?;

    if teacher.parsed_role()? != Role::Teacher || !teacher.is_active {
        return Err(AppError::Core(CoreError::Validation(
            "teacher_id must reference an active teacher account".to_string(),
        )));
    }
    Ok(())
}
