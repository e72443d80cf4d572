//! Handlers for the `/students` resource: roster, profile, grades,
//! attendance, and timetable.
//!
//! These are the cross-subject read surfaces. Who sees what:
//!
//! - admins and teachers see the full roster; a teacher can open an
//!   individual student only while that student is enrolled in one of the
//!   teacher's subjects, and then sees records from those subjects only
//! - a student sees exactly themself
//! - a parent sees their linked children
//!
//! Statistics and summaries are computed over the visible record set, after
//! scope filtering and before any `limit` truncation.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{Duration, Utc};
use registra_core::analytics::{
    attendance_summary, grade_statistics, AttendanceSummary, GradeStatistics,
    DEFAULT_ATTENDANCE_WINDOW_DAYS,
};
use registra_core::error::CoreError;
use registra_core::roles::Role;
use registra_core::types::DbId;
use registra_db::models::assignment::AssignmentWithSubject;
use registra_db::models::attendance::Attendance;
use registra_db::models::schedule::TimetableSlot;
use registra_db::models::subject::SubjectWithTeacher;
use registra_db::models::user::{User, UserResponse};
use registra_db::repositories::{
    AssignmentRepo, AttendanceRepo, EnrollmentRepo, GuardianRepo, ScheduleRepo, UserRepo,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::subjects::find_subject;
use crate::handlers::{ensure_student_visible, visibility_denied};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// How many grades the profile's recent list shows.
const RECENT_GRADES: usize = 5;

// ---------------------------------------------------------------------------
// Query / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /students/{id}/grades`.
#[derive(Debug, Deserialize)]
pub struct GradesQuery {
    pub subject_id: Option<DbId>,
    /// Truncates the listing to the most recent N entries. Statistics are
    /// unaffected.
    pub limit: Option<usize>,
}

/// Query parameters for `GET /students/{id}/attendance`.
#[derive(Debug, Deserialize)]
pub struct AttendanceQuery {
    pub subject_id: Option<DbId>,
    /// Trailing window in days; defaults to 30.
    pub days: Option<u32>,
}

/// Response body for `GET /students/{id}`.
#[derive(Debug, Serialize)]
pub struct StudentProfile {
    pub student: UserResponse,
    pub subjects: Vec<SubjectWithTeacher>,
    /// Most recent grades, newest first.
    pub recent_grades: Vec<AssignmentWithSubject>,
}

/// Response body for `GET /students/{id}/grades`.
#[derive(Debug, Serialize)]
pub struct GradesOverview {
    /// Chronological, oldest first.
    pub grades: Vec<AssignmentWithSubject>,
    pub statistics: GradeStatistics,
}

/// Response body for `GET /students/{id}/attendance`.
#[derive(Debug, Serialize)]
pub struct AttendanceOverview {
    /// Newest first.
    pub records: Vec<Attendance>,
    pub summary: AttendanceSummary,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/students
///
/// Roster scoped to the caller: full roster for admins and teachers, self
/// for students, linked children for parents.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let students = match auth.role {
        Role::Admin | Role::Teacher => {
            UserRepo::list_by_role(&state.pool, Role::Student.as_str()).await?
        }
        Role::Student => {
            let me = UserRepo::find_by_id(&state.pool, auth.user_id)
                .await?
                .ok_or_else(|| {
                    AppError::Core(CoreError::Unauthorized("User no longer exists".to_string()))
                })?;
            vec![me]
        }
        Role::Parent => {
            let children = GuardianRepo::linked_student_ids(&state.pool, auth.user_id).await?;
            let mut rows = Vec::with_capacity(children.len());
            for child_id in children {
                if let Some(child) = UserRepo::find_by_id(&state.pool, child_id).await? {
                    rows.push(child);
                }
            }
            rows
        }
    };

    let data: Vec<UserResponse> = students.iter().map(UserResponse::from).collect();
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/students/{id}
///
/// Profile with enrolled subjects and the most recent grades. 404 for
/// unknown ids (or ids that are not student accounts), 403 when the caller
/// lacks visibility.
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<StudentProfile>>> {
    let student = find_student(&state, id).await?;
    let visibility = ensure_student_visible(&state.pool, &auth, student.id).await?;

    let mut subjects = EnrollmentRepo::list_subjects_for_student(&state.pool, student.id).await?;
    subjects.retain(|s| visibility.allows_subject(s.id));

    let rows = AssignmentRepo::list_for_student(&state.pool, student.id).await?;
    let visible: Vec<AssignmentWithSubject> = rows
        .into_iter()
        .filter(|a| visibility.allows_subject(a.subject_id))
        .collect();
    let start = visible.len().saturating_sub(RECENT_GRADES);
    let mut recent_grades = visible[start..].to_vec();
    recent_grades.reverse();

    Ok(Json(DataResponse {
        data: StudentProfile {
            student: UserResponse::from(&student),
            subjects,
            recent_grades,
        },
    }))
}

/// GET /api/v1/students/{id}/grades?subject_id=&limit=
///
/// Grade listing plus statistics over the visible set. Requesting a subject
/// the student has no grades in is not an error; it returns an empty listing
/// with the no-data statistics.
pub async fn grades(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Query(query): Query<GradesQuery>,
) -> AppResult<Json<DataResponse<GradesOverview>>> {
    let student = find_student(&state, id).await?;
    let visibility = ensure_student_visible(&state.pool, &auth, student.id).await?;

    if let Some(subject_id) = query.subject_id {
        let subject = find_subject(&state, subject_id).await?;
        if !visibility.allows_subject(subject.id) {
            return Err(visibility_denied(&auth, student.id, "not_owner"));
        }
    }

    let rows = AssignmentRepo::list_for_student(&state.pool, student.id).await?;
    let mut grades: Vec<AssignmentWithSubject> = rows
        .into_iter()
        .filter(|a| visibility.allows_subject(a.subject_id))
        .filter(|a| query.subject_id.is_none_or(|sid| a.subject_id == sid))
        .collect();

    let values: Vec<f64> = grades.iter().map(|a| a.grade).collect();
    let statistics = grade_statistics(&values);

    if let Some(limit) = query.limit {
        let start = grades.len().saturating_sub(limit);
        grades = grades.split_off(start);
    }

    Ok(Json(DataResponse {
        data: GradesOverview { grades, statistics },
    }))
}

/// GET /api/v1/students/{id}/attendance?days=&subject_id=
///
/// Attendance records over a trailing window plus a presence summary. Only
/// recorded days count toward the rate.
pub async fn attendance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Query(query): Query<AttendanceQuery>,
) -> AppResult<Json<DataResponse<AttendanceOverview>>> {
    let student = find_student(&state, id).await?;
    let visibility = ensure_student_visible(&state.pool, &auth, student.id).await?;

    if let Some(subject_id) = query.subject_id {
        let subject = find_subject(&state, subject_id).await?;
        if !visibility.allows_subject(subject.id) {
            return Err(visibility_denied(&auth, student.id, "not_owner"));
        }
    }

    let days = query.days.unwrap_or(DEFAULT_ATTENDANCE_WINDOW_DAYS);
    let since = Utc::now().date_naive() - Duration::days(i64::from(days));

    let rows =
        AttendanceRepo::list_for_student(&state.pool, student.id, query.subject_id, since).await?;
    let records: Vec<Attendance> = rows
        .into_iter()
        .filter(|r| visibility.allows_subject(r.subject_id))
        .collect();

    let flags: Vec<bool> = records.iter().map(|r| r.present).collect();
    let summary = attendance_summary(&flags);

    Ok(Json(DataResponse {
        data: AttendanceOverview { records, summary },
    }))
}

/// GET /api/v1/students/{id}/schedule
///
/// Weekly timetable assembled from the student's enrollments.
pub async fn timetable(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<TimetableSlot>>>> {
    let student = find_student(&state, id).await?;
    let visibility = ensure_student_visible(&state.pool, &auth, student.id).await?;

    let slots = ScheduleRepo::timetable_for_student(&state.pool, student.id).await?;
    let data: Vec<TimetableSlot> = slots
        .into_iter()
        .filter(|s| visibility.allows_subject(s.subject_id))
        .collect();

    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a student account or return the standard 404. Ids belonging to
/// non-student accounts 404 identically, so the route leaks nothing about
/// other account types.
pub(crate) async fn find_student(state: &AppState, id: DbId) -> Result<User, AppError> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Student",
            id,
        }))?;

    if user.parsed_role()? != Role::Student {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Student",
            id,
        }));
    }
    Ok(user)
}
