//! Integration tests for identities, enrollments, and guardian links:
//! - Soft deactivation and role immutability
//! - Login bookkeeping (failure counter, lock, reset)
//! - Enrollment lifecycle and record survival after dissociation
//! - Parent-to-student link management

use sqlx::PgPool;

use registra_db::models::assignment::CreateAssignment;
use registra_db::models::enrollment::CreateEnrollment;
use registra_db::models::guardian::CreateGuardianLink;
use registra_db::models::subject::CreateSubject;
use registra_db::models::user::{CreateUser, UpdateUser};
use registra_db::repositories::{
    AssignmentRepo, EnrollmentRepo, GuardianRepo, SubjectRepo, UserRepo,
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

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_and_find_user(pool: PgPool) {
    let created = UserRepo::create(&pool, &new_user("a.admin", "admin"))
        .await
        .unwrap();
    assert!(created.is_active);
    assert_eq!(created.failed_login_attempts, 0);

    let by_name = UserRepo::find_by_username(&pool, "a.admin")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_name.id, created.id);
    assert_eq!(by_name.role, "admin");

    assert!(UserRepo::find_by_username(&pool, "nobody")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_username_rejected(pool: PgPool) {
    UserRepo::create(&pool, &new_user("taken", "student"))
        .await
        .unwrap();
    let result = UserRepo::create(&pool, &new_user("taken", "teacher")).await;
    assert!(result.is_err(), "Duplicate username should fail");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_role_rejected_by_check(pool: PgPool) {
    let result = UserRepo::create(&pool, &new_user("p.rincipal", "principal")).await;
    assert!(result.is_err(), "Role outside the closed set should fail");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_leaves_role_untouched(pool: PgPool) {
    let created = UserRepo::create(&pool, &new_user("s.okafor", "student"))
        .await
        .unwrap();

    let updated = UserRepo::update(
        &pool,
        created.id,
        &UpdateUser {
            display_name: Some("Sam Okafor".to_string()),
            email: Some("sam@example.org".to_string()),
            is_active: None,
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.display_name, "Sam Okafor");
    assert_eq!(updated.role, "student", "Role is fixed at creation");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deactivate_reports_first_flip_only(pool: PgPool) {
    let created = UserRepo::create(&pool, &new_user("s.gone", "student"))
        .await
        .unwrap();

    assert!(UserRepo::deactivate(&pool, created.id).await.unwrap());
    assert!(!UserRepo::deactivate(&pool, created.id).await.unwrap());

    let row = UserRepo::find_by_id(&pool, created.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!row.is_active);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_by_role_excludes_deactivated(pool: PgPool) {
    let active = UserRepo::create(&pool, &new_user("s.one", "student"))
        .await
        .unwrap();
    let inactive = UserRepo::create(&pool, &new_user("s.two", "student"))
        .await
        .unwrap();
    UserRepo::create(&pool, &new_user("t.other", "teacher"))
        .await
        .unwrap();
    UserRepo::deactivate(&pool, inactive.id).await.unwrap();

    let students = UserRepo::list_by_role(&pool, "student").await.unwrap();
    let ids: Vec<_> = students.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![active.id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_bookkeeping(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("t.rivera", "teacher"))
        .await
        .unwrap();

    UserRepo::increment_failed_login(&pool, user.id).await.unwrap();
    UserRepo::increment_failed_login(&pool, user.id).await.unwrap();
    let after_failures = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(after_failures.failed_login_attempts, 2);

    UserRepo::record_successful_login(&pool, user.id).await.unwrap();
    let after_login = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(after_login.failed_login_attempts, 0);
    assert!(after_login.locked_until.is_none());
    assert!(after_login.last_login_at.is_some());
}

// ---------------------------------------------------------------------------
// Subjects and enrollments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_subject_listing_resolves_teacher_name(pool: PgPool) {
    let teacher = UserRepo::create(&pool, &new_user("t.rivera", "teacher"))
        .await
        .unwrap();
    SubjectRepo::create(
        &pool,
        &CreateSubject {
            name: "Physics".to_string(),
            teacher_id: teacher.id,
        },
    )
    .await
    .unwrap();

    let listed = SubjectRepo::list(&pool).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].teacher_name, "t.rivera");

    // Subject names are unique across the deployment.
    let duplicate = SubjectRepo::create(
        &pool,
        &CreateSubject {
            name: "Physics".to_string(),
            teacher_id: teacher.id,
        },
    )
    .await;
    assert!(duplicate.is_err());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_enrollment_lifecycle(pool: PgPool) {
    let teacher = UserRepo::create(&pool, &new_user("t.rivera", "teacher"))
        .await
        .unwrap();
    let student = UserRepo::create(&pool, &new_user("s.okafor", "student"))
        .await
        .unwrap();
    let subject = SubjectRepo::create(
        &pool,
        &CreateSubject {
            name: "Chemistry".to_string(),
            teacher_id: teacher.id,
        },
    )
    .await
    .unwrap();

    let enrollment = EnrollmentRepo::create(
        &pool,
        &CreateEnrollment {
            subject_id: subject.id,
            student_id: student.id,
        },
    )
    .await
    .unwrap();
    assert!(EnrollmentRepo::exists(&pool, subject.id, student.id)
        .await
        .unwrap());

    // Enrolling twice hits the unique constraint.
    let duplicate = EnrollmentRepo::create(
        &pool,
        &CreateEnrollment {
            subject_id: subject.id,
            student_id: student.id,
        },
    )
    .await;
    assert!(duplicate.is_err());

    assert!(EnrollmentRepo::delete(&pool, enrollment.id).await.unwrap());
    assert!(!EnrollmentRepo::exists(&pool, subject.id, student.id)
        .await
        .unwrap());
    assert!(!EnrollmentRepo::delete(&pool, enrollment.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_grades_survive_enrollment_removal(pool: PgPool) {
    let teacher = UserRepo::create(&pool, &new_user("t.rivera", "teacher"))
        .await
        .unwrap();
    let student = UserRepo::create(&pool, &new_user("s.okafor", "student"))
        .await
        .unwrap();
    let subject = SubjectRepo::create(
        &pool,
        &CreateSubject {
            name: "Biology".to_string(),
            teacher_id: teacher.id,
        },
    )
    .await
    .unwrap();
    let enrollment = EnrollmentRepo::create(
        &pool,
        &CreateEnrollment {
            subject_id: subject.id,
            student_id: student.id,
        },
    )
    .await
    .unwrap();

    let assignment = AssignmentRepo::create(
        &pool,
        &CreateAssignment {
            subject_id: subject.id,
            student_id: student.id,
            name: "Lab Report".to_string(),
            grade: 91.0,
        },
    )
    .await
    .unwrap();

    // Dissociation removes the link, never the history.
    EnrollmentRepo::delete(&pool, enrollment.id).await.unwrap();
    let kept = AssignmentRepo::find_by_id(&pool, assignment.id)
        .await
        .unwrap();
    assert!(kept.is_some(), "Grades must survive enrollment removal");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_subjects_for_student_listing(pool: PgPool) {
    let teacher = UserRepo::create(&pool, &new_user("t.rivera", "teacher"))
        .await
        .unwrap();
    let student = UserRepo::create(&pool, &new_user("s.okafor", "student"))
        .await
        .unwrap();
    for name in ["Algebra", "Geometry"] {
        let subject = SubjectRepo::create(
            &pool,
            &CreateSubject {
                name: name.to_string(),
                teacher_id: teacher.id,
            },
        )
        .await
        .unwrap();
        EnrollmentRepo::create(
            &pool,
            &CreateEnrollment {
                subject_id: subject.id,
                student_id: student.id,
            },
        )
        .await
        .unwrap();
    }

    let subjects = EnrollmentRepo::list_subjects_for_student(&pool, student.id)
        .await
        .unwrap();
    let names: Vec<_> = subjects.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Algebra", "Geometry"]);
}

// ---------------------------------------------------------------------------
// Guardian links
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_guardian_link_lifecycle(pool: PgPool) {
    let parent = UserRepo::create(&pool, &new_user("p.okafor", "parent"))
        .await
        .unwrap();
    let child_a = UserRepo::create(&pool, &new_user("s.okafor", "student"))
        .await
        .unwrap();
    let child_b = UserRepo::create(&pool, &new_user("s.okafor2", "student"))
        .await
        .unwrap();

    for child in [child_a.id, child_b.id] {
        GuardianRepo::create(
            &pool,
            &CreateGuardianLink {
                parent_id: parent.id,
                student_id: child,
            },
        )
        .await
        .unwrap();
    }

    let linked = GuardianRepo::linked_student_ids(&pool, parent.id)
        .await
        .unwrap();
    assert_eq!(linked, vec![child_a.id, child_b.id]);

    // Linking the same pair twice hits the unique constraint.
    let duplicate = GuardianRepo::create(
        &pool,
        &CreateGuardianLink {
            parent_id: parent.id,
            student_id: child_a.id,
        },
    )
    .await;
    assert!(duplicate.is_err());

    let detail = GuardianRepo::list(&pool).await.unwrap();
    assert_eq!(detail.len(), 2);
    assert_eq!(detail[0].parent_name, "p.okafor");

    // Deactivating the student side tears down links from either end.
    let removed = GuardianRepo::remove_links_for_user(&pool, child_a.id)
        .await
        .unwrap();
    assert_eq!(removed, 1);
    let remaining = GuardianRepo::linked_student_ids(&pool, parent.id)
        .await
        .unwrap();
    assert_eq!(remaining, vec![child_b.id]);
}
