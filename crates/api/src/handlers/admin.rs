//! Handlers for the `/admin` resource: user provisioning, guardian links,
//! and grading settings.
//!
//! All handlers require the `admin` role via [`RequireAdmin`]. A user's role
//! is fixed at creation; there is no update path for it.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use registra_core::error::CoreError;
use registra_core::roles::Role;
use registra_core::types::DbId;
use registra_db::models::guardian::{CreateGuardianLink, GuardianLink, GuardianLinkDetail};
use registra_db::models::settings::{GradingSettings, UpdateGradingSettings};
use registra_db::models::user::{CreateUser, UpdateUser, UserResponse};
use registra_db::repositories::{
    EnrollmentRepo, GuardianRepo, SessionRepo, SettingsRepo, UserRepo,
};
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Minimum password length enforced on creation and reset.
const MIN_PASSWORD_LENGTH: usize = 12;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 64))]
    pub username: String,
    pub password: String,
    /// One of `admin`, `teacher`, `student`, `parent`. Immutable afterwards.
    pub role: String,
    #[validate(length(min = 1, max = 128))]
    pub display_name: String,
    #[validate(email)]
    pub email: Option<String>,
}

/// Query parameters for `GET /admin/users`.
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub role: Option<String>,
}

/// Request body for `PUT /admin/users/{id}`. Role is not updatable; a
/// supplied password replaces the old one and revokes live sessions.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 128))]
    pub display_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub is_active: Option<bool>,
    pub password: Option<String>,
}

/// Request body for `POST /admin/guardians`.
#[derive(Debug, Deserialize)]
pub struct CreateGuardianRequest {
    pub parent_id: DbId,
    pub student_id: DbId,
}

/// Request body for `PUT /admin/settings`. All fields optional; omitted
/// fields keep their current value.
#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    pub grade_min: Option<f64>,
    pub grade_max: Option<f64>,
    pub passing_grade: Option<f64>,
}

// ---------------------------------------------------------------------------
// User handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/users
///
/// Create a user with a fixed role. Validates password strength, hashes the
/// password, and returns a safe [`UserResponse`] with 201 Created.
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    admin.require_write_access()?;
    input.validate()?;

    let role = Role::parse(&input.role)?;

    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let hashed = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create_dto = CreateUser {
        username: input.username,
        password_hash: hashed,
        role: role.as_str().to_string(),
        display_name: input.display_name,
        email: input.email,
    };

    let user = UserRepo::create(&state.pool, &create_dto).await?;
    tracing::info!(user_id = user.id, role = %user.role, "User created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(&user),
        }),
    ))
}

/// GET /api/v1/admin/users?role=
///
/// List users. With `?role=`, lists active users of that role; without,
/// lists everyone including deactivated accounts.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<ListUsersQuery>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = match query.role {
        Some(raw) => {
            let role = Role::parse(&raw)?;
            UserRepo::list_by_role(&state.pool, role.as_str()).await?
        }
        None => UserRepo::list(&state.pool).await?,
    };

    let responses: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();
    Ok(Json(DataResponse { data: responses }))
}

/// GET /api/v1/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

/// PUT /api/v1/admin/users/{id}
///
/// Update profile fields, reset the password, or reactivate an account.
/// Role is immutable. A password reset revokes every live session.
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    admin.require_write_access()?;
    input.validate()?;

    let hashed = match &input.password {
        Some(password) => {
            validate_password_strength(password, MIN_PASSWORD_LENGTH)
                .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
            Some(
                hash_password(password)
                    .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?,
            )
        }
        None => None,
    };

    let update_dto = UpdateUser {
        display_name: input.display_name,
        email: input.email,
        is_active: input.is_active,
    };

    let user = UserRepo::update(&state.pool, id, &update_dto)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    if let Some(hashed) = hashed {
        UserRepo::update_password(&state.pool, id, &hashed).await?;
        let sessions = SessionRepo::revoke_all_for_user(&state.pool, id).await?;
        tracing::info!(user_id = id, sessions, "Password reset");
    }

    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}

/// DELETE /api/v1/admin/users/{id}
///
/// Soft deactivation: the row survives (so historical records keep their
/// author and subject references), but sessions are revoked, enrollments
/// removed, and guardian links on either side dropped. Returns 204.
pub async fn deactivate_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    admin.require_write_access()?;

    let deactivated = UserRepo::deactivate(&state.pool, id).await?;
    if !deactivated {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }

    let sessions = SessionRepo::revoke_all_for_user(&state.pool, id).await?;
    let enrollments = EnrollmentRepo::remove_for_student(&state.pool, id).await?;
    let links = GuardianRepo::remove_links_for_user(&state.pool, id).await?;

    tracing::info!(
        user_id = id,
        sessions,
        enrollments,
        guardian_links = links,
        "User deactivated"
    );

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Guardian link handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/guardians
///
/// Link a parent account to a student account. Both sides must exist, be
/// active, and carry the expected role.
pub async fn create_guardian(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateGuardianRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<GuardianLink>>)> {
    admin.require_write_access()?;

    let parent = UserRepo::find_by_id(&state.pool, input.parent_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: input.parent_id,
        }))?;
    if parent.parsed_role()? != Role::Parent || !parent.is_active {
        return Err(AppError::Core(CoreError::Validation(
            "parent_id must reference an active parent account".to_string(),
        )));
    }

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

    let link = GuardianRepo::create(
        &state.pool,
        &CreateGuardianLink {
            parent_id: input.parent_id,
            student_id: input.student_id,
        },
    )
    .await?;

    tracing::info!(
        parent_id = input.parent_id,
        student_id = input.student_id,
        "Guardian link created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: link })))
}

/// GET /api/v1/admin/guardians
pub async fn list_guardians(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<GuardianLinkDetail>>>> {
    let links = GuardianRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: links }))
}

/// DELETE /api/v1/admin/guardians/{id}
pub async fn delete_guardian(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    admin.require_write_access()?;

    let deleted = GuardianRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Guardian link",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Grading settings handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/settings
pub async fn get_settings(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<GradingSettings>>> {
    let settings = SettingsRepo::get(&state.pool).await?;
    Ok(Json(DataResponse { data: settings }))
}

/// PUT /api/v1/admin/settings
///
/// Partial update of the grading scale. The merged result must keep
/// `grade_min < grade_max` and the passing grade inside the scale.
pub async fn update_settings(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<UpdateSettingsRequest>,
) -> AppResult<Json<DataResponse<GradingSettings>>> {
    admin.require_write_access()?;

    let current = SettingsRepo::get(&state.pool).await?;
    let min = input.grade_min.unwrap_or(current.grade_min);
    let max = input.grade_max.unwrap_or(current.grade_max);
    let passing = input.passing_grade.unwrap_or(current.passing_grade);

    if min >= max {
        return Err(AppError::Core(CoreError::Validation(format!(
            "grade_min ({min}) must be below grade_max ({max})"
        ))));
    }
    if passing < min || passing > max {
        return Err(AppError::Core(CoreError::Validation(format!(
            "passing_grade ({passing}) must lie within [{min}, {max}]"
        ))));
    }

    let update_dto = UpdateGradingSettings {
        grade_min: input.grade_min,
        grade_max: input.grade_max,
        passing_grade: input.passing_grade,
    };

    let settings = SettingsRepo::update(&state.pool, &update_dto).await?;
    tracing::info!(
        grade_min = settings.grade_min,
        grade_max = settings.grade_max,
        passing_grade = settings.passing_grade,
        "Grading settings updated"
    );

    Ok(Json(DataResponse { data: settings }))
}
