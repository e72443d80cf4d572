//! HTTP-level integration tests for the admin provisioning surface: user
//! management, guardian links, and grading settings.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json, post_json_auth, put_json_auth};
use sqlx::PgPool;

use registra_api::auth::password::hash_password;
use registra_db::models::user::CreateUser;
use registra_db::repositories::{EnrollmentRepo, SubjectRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Seed a user directly and return (id, password).
async fn seed_user(pool: &PgPool, username: &str, role: &str) -> (i64, String) {
    let password = "test_password_123!";
    let hashed = hash_password(password).expect("hashing should succeed");
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            password_hash: hashed,
            role: role.to_string(),
            display_name: username.to_string(),
            email: None,
        },
    )
    .await
    .expect("user creation should succeed");
    (user.id, password.to_string())
}

/// Log in and return the access token.
async fn login(app: axum::Router, username: &str, password: &str) -> String {
    let body = serde_json::json!({ "username": username, "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["access_token"].as_str().unwrap().to_string()
}

async fn admin_token(pool: &PgPool, app: axum::Router) -> String {
    let (_id, password) = seed_user(pool, "the_admin", "admin").await;
    login(app, "the_admin", &password).await
}

// ---------------------------------------------------------------------------
// User management
// ---------------------------------------------------------------------------

/// Admin can create a user; the response wraps the row in the data envelope.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_create_user(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = admin_token(&pool, app.clone()).await;

    let body = serde_json::json!({
        "username": "newteacher",
        "password": "strong_password_123!",
        "role": "teacher",
        "display_name": "New Teacher",
        "email": "newteacher@school.test"
    });
    let response = post_json_auth(app, "/api/v1/admin/users", body, &token).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "newteacher");
    assert_eq!(json["data"]["role"], "teacher");
    assert_eq!(json["data"]["display_name"], "New Teacher");
    assert!(json["data"]["is_active"].as_bool().unwrap());
    assert!(
        json["data"].get("password_hash").is_none(),
        "password hash must never be serialized"
    );
}

/// Creating a user with an already-taken username returns 409.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_username_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = admin_token(&pool, app.clone()).await;

    let body = serde_json::json!({
        "username": "taken",
        "password": "strong_password_123!",
        "role": "student",
        "display_name": "First"
    });
    let first = post_json_auth(app.clone(), "/api/v1/admin/users", body.clone(), &token).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = post_json_auth(app, "/api/v1/admin/users", body, &token).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

/// Passwords below the minimum length are rejected.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_short_password_rejected(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = admin_token(&pool, app.clone()).await;

    let body = serde_json::json!({
        "username": "weakpw",
        "password": "short",
        "role": "student",
        "display_name": "Weak"
    });
    let response = post_json_auth(app, "/api/v1/admin/users", body, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Unknown roles are rejected; the role set is closed.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_role_rejected(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = admin_token(&pool, app.clone()).await;

    let body = serde_json::json!({
        "username": "superuser",
        "password": "strong_password_123!",
        "role": "superadmin",
        "display_name": "Super"
    });
    let response = post_json_auth(app, "/api/v1/admin/users", body, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// `?role=` filters the user listing.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_users_filters_by_role(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = admin_token(&pool, app.clone()).await;
    seed_user(&pool, "teach1", "teacher").await;
    seed_user(&pool, "stud1", "student").await;

    let response = get_auth(app, "/api/v1/admin/users?role=teacher", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let users = json["data"].as_array().expect("data should be an array");
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["username"], "teach1");
}

/// A user's role is fixed at creation; an update carrying `role` leaves it
/// untouched.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_role_is_immutable(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = admin_token(&pool, app.clone()).await;
    let (student_id, _) = seed_user(&pool, "fixedrole", "student").await;

    let body = serde_json::json!({ "display_name": "Renamed", "role": "admin" });
    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/admin/users/{student_id}"),
        body,
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["display_name"], "Renamed");
    assert_eq!(json["data"]["role"], "student", "role must not change");
}

/// An admin password reset replaces the credential and kills live sessions.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_password_reset(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = admin_token(&pool, app.clone()).await;
    let (user_id, old_password) = seed_user(&pool, "forgetful", "teacher").await;

    // Capture a live refresh token under the old password.
    let body = serde_json::json!({ "username": "forgetful", "password": old_password });
    let response = post_json(app.clone(), "/api/v1/auth/login", body).await;
    let session = body_json(response).await;
    let refresh_token = session["refresh_token"].as_str().unwrap().to_string();

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/admin/users/{user_id}"),
        serde_json::json!({ "password": "fresh_password_456!" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Old credentials and old sessions are both dead.
    let body = serde_json::json!({ "username": "forgetful", "password": old_password });
    let response = post_json(app.clone(), "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json(app.clone(), "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = serde_json::json!({ "username": "forgetful", "password": "fresh_password_456!" });
    let response = post_json(app.clone(), "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    // A weak replacement is rejected.
    let response = put_json_auth(
        app,
        &format!("/api/v1/admin/users/{user_id}"),
        serde_json::json!({ "password": "short" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Deactivation is a soft delete: the row stays, sessions die, links are
/// removed, and recorded history is kept.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deactivate_user_dissociates(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = admin_token(&pool, app.clone()).await;
    let (teacher_id, _) = seed_user(&pool, "owner", "teacher").await;
    let (student_id, student_pw) = seed_user(&pool, "leaver", "student").await;

    let subject = SubjectRepo::create(
        &pool,
        &registra_db::models::subject::CreateSubject {
            name: "Mathematics".to_string(),
            teacher_id,
        },
    )
    .await
    .unwrap();
    EnrollmentRepo::create(
        &pool,
        &registra_db::models::enrollment::CreateEnrollment {
            subject_id: subject.id,
            student_id,
        },
    )
    .await
    .unwrap();

    let response = delete_auth(
        app.clone(),
        &format!("/api/v1/admin/users/{student_id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The student can no longer sign in.
    let body = serde_json::json!({ "username": "leaver", "password": student_pw });
    let login_attempt = post_json(app.clone(), "/api/v1/auth/login", body).await;
    assert_eq!(login_attempt.status(), StatusCode::FORBIDDEN);

    // Enrollments are gone.
    let enrolled = EnrollmentRepo::exists(&pool, subject.id, student_id)
        .await
        .unwrap();
    assert!(!enrolled, "enrollments must be removed on deactivation");

    // The row itself survives and is visible to the admin.
    let response = get_auth(app, &format!("/api/v1/admin/users/{student_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["is_active"], false);
}

/// Deactivating an unknown user returns 404.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deactivate_unknown_user(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = admin_token(&pool, app.clone()).await;

    let response = delete_auth(app, "/api/v1/admin/users/999999", &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Guardian links
// ---------------------------------------------------------------------------

/// Admin links a parent to a student; duplicates conflict.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_guardian_link_lifecycle(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = admin_token(&pool, app.clone()).await;
    let (parent_id, _) = seed_user(&pool, "parent1", "parent").await;
    let (student_id, _) = seed_user(&pool, "child1", "student").await;

    let body = serde_json::json!({ "parent_id": parent_id, "student_id": student_id });
    let response = post_json_auth(app.clone(), "/api/v1/admin/guardians", body.clone(), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let link_id = json["data"]["id"].as_i64().unwrap();

    let duplicate = post_json_auth(app.clone(), "/api/v1/admin/guardians", body, &token).await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    let response = delete_auth(
        app.clone(),
        &format!("/api/v1/admin/guardians/{link_id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete_auth(app, &format!("/api/v1/admin/guardians/{link_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// The parent side of a link must actually be a parent account.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_guardian_link_requires_parent_role(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = admin_token(&pool, app.clone()).await;
    let (teacher_id, _) = seed_user(&pool, "notaparent", "teacher").await;
    let (student_id, _) = seed_user(&pool, "child2", "student").await;

    let body = serde_json::json!({ "parent_id": teacher_id, "student_id": student_id });
    let response = post_json_auth(app, "/api/v1/admin/guardians", body, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Grading settings
// ---------------------------------------------------------------------------

/// Settings start at the seeded defaults and can be updated.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_settings_read_and_update(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = admin_token(&pool, app.clone()).await;

    let response = get_auth(app.clone(), "/api/v1/admin/settings", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["grade_min"], 0.0);
    assert_eq!(json["data"]["grade_max"], 100.0);

    let body = serde_json::json!({ "passing_grade": 75.0 });
    let response = put_json_auth(app, "/api/v1/admin/settings", body, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["passing_grade"], 75.0);
}

/// An update that would invert the grade bounds is rejected against the
/// merged result, not field by field.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_settings_reject_inverted_bounds(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = admin_token(&pool, app.clone()).await;

    let body = serde_json::json!({ "grade_min": 60.0, "grade_max": 50.0 });
    let response = put_json_auth(app.clone(), "/api/v1/admin/settings", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Moving only the minimum above the stored passing grade also fails.
    let body = serde_json::json!({ "grade_min": 70.0 });
    let response = put_json_auth(app, "/api/v1/admin/settings", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
