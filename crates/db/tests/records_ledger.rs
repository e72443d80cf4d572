//! Integration tests for the records ledger: graded assignments, attendance
//! upserts with their audit trail, and the grading configuration.

use chrono::NaiveDate;
use registra_core::types::DbId;
use sqlx::PgPool;

use registra_db::models::assignment::{CreateAssignment, UpdateAssignment};
use registra_db::models::attendance::RecordAttendance;
use registra_db::models::enrollment::CreateEnrollment;
use registra_db::models::settings::UpdateGradingSettings;
use registra_db::models::subject::CreateSubject;
use registra_db::models::user::CreateUser;
use registra_db::repositories::{
    AssignmentRepo, AttendanceRepo, EnrollmentRepo, SettingsRepo, SubjectRepo, UserRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(username: &str, role: &str) -> CreateUser {
    CreateUser {
        username: username.to_string(),
        password_hash: "hash-not-under-test".to_string(),
        role: role.to_string(),
        display_name: username.to_string(),
        email: None,
    }
}

/// Seed a teacher, a student, a subject, and the enrollment joining them.
/// Returns (teacher_id, student_id, subject_id).
async fn seed_roster(pool: &PgPool) -> (DbId, DbId, DbId) {
    let teacher = UserRepo::create(pool, &new_user("t.rivera", "teacher"))
        .await
        .unwrap();
    let student = UserRepo::create(pool, &new_user("s.okafor", "student"))
        .await
        .unwrap();
    let subject = SubjectRepo::create(
        pool,
        &CreateSubject {
            name: "Mathematics".to_string(),
            teacher_id: teacher.id,
        },
    )
    .await
    .unwrap();
    EnrollmentRepo::create(
        pool,
        &CreateEnrollment {
            subject_id: subject.id,
            student_id: student.id,
        },
    )
    .await
    .unwrap();
    (teacher.id, student.id, subject.id)
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
}

fn mark(subject_id: DbId, student_id: DbId, date: NaiveDate, period: i32, present: bool) -> RecordAttendance {
    RecordAttendance {
        subject_id,
        student_id,
        date,
        period,
        present,
    }
}

// ---------------------------------------------------------------------------
// Assignments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_assignment_create_and_duplicate_name_rejected(pool: PgPool) {
    let (_, student_id, subject_id) = seed_roster(&pool).await;

    let input = CreateAssignment {
        subject_id,
        student_id,
        name: "Quiz 1".to_string(),
        grade: 87.5,
    };
    let created = AssignmentRepo::create(&pool, &input).await.unwrap();
    assert_eq!(created.grade, 87.5);

    // Same (subject, student, name) hits the unique constraint.
    let result = AssignmentRepo::create(&pool, &input).await;
    assert!(result.is_err(), "Duplicate assignment name should fail");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_assignment_partial_update(pool: PgPool) {
    let (_, student_id, subject_id) = seed_roster(&pool).await;

    let created = AssignmentRepo::create(
        &pool,
        &CreateAssignment {
            subject_id,
            student_id,
            name: "Essay".to_string(),
            grade: 71.0,
        },
    )
    .await
    .unwrap();

    // Only the grade changes; the name must survive the COALESCE update.
    let updated = AssignmentRepo::update(
        &pool,
        created.id,
        &UpdateAssignment {
            name: None,
            grade: Some(74.25),
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.name, "Essay");
    assert_eq!(updated.grade, 74.25);

    let missing = AssignmentRepo::update(
        &pool,
        created.id + 999,
        &UpdateAssignment {
            name: None,
            grade: Some(50.0),
        },
    )
    .await
    .unwrap();
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_grades_listed_in_write_order(pool: PgPool) {
    let (_, student_id, subject_id) = seed_roster(&pool).await;

    for (name, grade) in [("Quiz 1", 70.0), ("Quiz 2", 75.0), ("Quiz 3", 80.0)] {
        AssignmentRepo::create(
            &pool,
            &CreateAssignment {
                subject_id,
                student_id,
                name: name.to_string(),
                grade,
            },
        )
        .await
        .unwrap();
    }

    let grades = AssignmentRepo::grades_for_student_in_subject(&pool, student_id, subject_id)
        .await
        .unwrap();
    assert_eq!(grades, vec![70.0, 75.0, 80.0]);

    let listing = AssignmentRepo::list_for_student(&pool, student_id)
        .await
        .unwrap();
    assert_eq!(listing.len(), 3);
    assert_eq!(listing[0].subject_name, "Mathematics");
    assert_eq!(listing[0].name, "Quiz 1");
}

// ---------------------------------------------------------------------------
// Attendance upsert and audit trail
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_attendance_first_write_inserts(pool: PgPool) {
    let (teacher_id, student_id, subject_id) = seed_roster(&pool).await;

    let upsert = AttendanceRepo::record(
        &pool,
        &mark(subject_id, student_id, day(2), 1, true),
        teacher_id,
    )
    .await
    .unwrap();

    assert!(upsert.inserted, "First write for a slot should insert");
    assert!(upsert.present);

    let trail = AttendanceRepo::list_audit(&pool, upsert.id).await.unwrap();
    assert_eq!(trail.len(), 1);
    assert!(trail[0].present);
    assert_eq!(trail[0].changed_by, teacher_id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_attendance_rewrite_overwrites_same_row(pool: PgPool) {
    let (teacher_id, student_id, subject_id) = seed_roster(&pool).await;

    let first = AttendanceRepo::record(
        &pool,
        &mark(subject_id, student_id, day(2), 1, true),
        teacher_id,
    )
    .await
    .unwrap();

    // Correction for the same slot: same row, value overwritten.
    let second = AttendanceRepo::record(
        &pool,
        &mark(subject_id, student_id, day(2), 1, false),
        teacher_id,
    )
    .await
    .unwrap();

    assert_eq!(second.id, first.id, "Upsert should reuse the existing row");
    assert!(!second.inserted, "Rewrite should report an overwrite");
    assert!(!second.present);

    // The audit trail holds both values in write order.
    let trail = AttendanceRepo::list_audit(&pool, first.id).await.unwrap();
    let values: Vec<bool> = trail.iter().map(|e| e.present).collect();
    assert_eq!(values, vec![true, false]);

    let stored = AttendanceRepo::find_by_id(&pool, first.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!stored.present);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_attendance_periods_are_distinct_slots(pool: PgPool) {
    let (teacher_id, student_id, subject_id) = seed_roster(&pool).await;

    let morning = AttendanceRepo::record(
        &pool,
        &mark(subject_id, student_id, day(3), 1, true),
        teacher_id,
    )
    .await
    .unwrap();
    let afternoon = AttendanceRepo::record(
        &pool,
        &mark(subject_id, student_id, day(3), 5, false),
        teacher_id,
    )
    .await
    .unwrap();

    assert_ne!(morning.id, afternoon.id);
    assert!(afternoon.inserted);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_attendance_period_bounds_enforced(pool: PgPool) {
    let (teacher_id, student_id, subject_id) = seed_roster(&pool).await;

    let result = AttendanceRepo::record(
        &pool,
        &mark(subject_id, student_id, day(3), 9, true),
        teacher_id,
    )
    .await;
    assert!(result.is_err(), "Period outside 1..=8 should hit the CHECK");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_attendance_listing_respects_window_and_subject(pool: PgPool) {
    let (teacher_id, student_id, subject_id) = seed_roster(&pool).await;

    // One entry before the window, three inside it.
    AttendanceRepo::record(
        &pool,
        &mark(subject_id, student_id, day(1), 1, false),
        teacher_id,
    )
    .await
    .unwrap();
    for (d, present) in [(10, true), (11, true), (12, false)] {
        AttendanceRepo::record(
            &pool,
            &mark(subject_id, student_id, day(d), 1, present),
            teacher_id,
        )
        .await
        .unwrap();
    }

    let rows = AttendanceRepo::list_for_student(&pool, student_id, None, day(10))
        .await
        .unwrap();
    let flags: Vec<bool> = rows.iter().map(|r| r.present).collect();
    // Newest first, window start inclusive.
    assert_eq!(flags, vec![false, true, true]);
    assert_eq!(rows[2].date, day(10));

    // Narrowed to a subject with no entries, nothing comes back.
    let other_teacher = UserRepo::create(&pool, &new_user("t.larsen", "teacher"))
        .await
        .unwrap();
    let other_subject = SubjectRepo::create(
        &pool,
        &CreateSubject {
            name: "History".to_string(),
            teacher_id: other_teacher.id,
        },
    )
    .await
    .unwrap();
    let none =
        AttendanceRepo::list_for_student(&pool, student_id, Some(other_subject.id), day(1))
            .await
            .unwrap();
    assert!(none.is_empty());
}

// ---------------------------------------------------------------------------
// Grading settings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_settings_partial_update(pool: PgPool) {
    let before = SettingsRepo::get(&pool).await.unwrap();
    assert_eq!(before.passing_grade, 60.0);

    let after = SettingsRepo::update(
        &pool,
        &UpdateGradingSettings {
            grade_min: None,
            grade_max: None,
            passing_grade: Some(65.0),
        },
    )
    .await
    .unwrap();

    assert_eq!(after.passing_grade, 65.0);
    assert_eq!(after.grade_min, before.grade_min);
    assert_eq!(after.grade_max, before.grade_max);
}
