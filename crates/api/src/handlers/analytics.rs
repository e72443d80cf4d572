//! Handlers for the `/analytics` resource.
//!
//! Serves the advisory grade projection alongside the plain aggregates.
//! Everything is computed on demand from the grade set the caller is
//! allowed to see, so two callers with different visibility can get
//! different numbers for the same student.

use axum::extract::{Path, Query, State};
use axum::Json;
use registra_core::analytics::{forecast_grades, grade_statistics, Forecast, GradeStatistics};
use registra_core::types::DbId;
use registra_db::repositories::AssignmentRepo;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::handlers::students::find_student;
use crate::handlers::subjects::find_subject;
use crate::handlers::{ensure_student_visible, visibility_denied};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /analytics/student/{id}`.
#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    pub subject_id: Option<DbId>,
}

/// Aggregates plus the trend projection for one student.
#[derive(Debug, Serialize)]
pub struct StudentAnalytics {
    pub student_id: DbId,
    pub subject_id: Option<DbId>,
    pub statistics: GradeStatistics,
    pub forecast: Forecast,
}

/// GET /api/v1/analytics/student/{id}?subject_id=
///
/// Least-squares projection of the next grade over the caller-visible
/// sequence, in recording order. Below the minimum sample count the
/// forecast reports `insufficient_data` instead of extrapolating.
pub async fn student(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Query(query): Query<AnalyticsQuery>,
) -> AppResult<Json<DataResponse<StudentAnalytics>>> {
    let student = find_student(&state, id).await?;
    let visibility = ensure_student_visible(&state.pool, &auth, student.id).await?;

    if let Some(subject_id) = query.subject_id {
        let subject = find_subject(&state, subject_id).await?;
        if !visibility.allows_subject(subject.id) {
            return Err(visibility_denied(&auth, student.id, "not_owner"));
        }
    }

    // Recording order doubles as the sample order for the fit.
    let values: Vec<f64> = AssignmentRepo::list_for_student(&state.pool, student.id)
        .await?
        .into_iter()
        .filter(|a| visibility.allows_subject(a.subject_id))
        .filter(|a| query.subject_id.is_none_or(|sid| a.subject_id == sid))
        .map(|a| a.grade)
        .collect();

    let analytics = StudentAnalytics {
        student_id: student.id,
        subject_id: query.subject_id,
        statistics: grade_statistics(&values),
        forecast: forecast_grades(&values),
    };
    Ok(Json(DataResponse { data: analytics }))
}
