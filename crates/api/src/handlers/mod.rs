//! Request handlers, one submodule per resource.
//!
//! Handlers delegate persistence to the repositories in `registra_db` and
//! map errors via [`AppError`]. Access control runs before storage is
//! touched: subject-scoped operations build a
//! [`ResourceRef`](registra_core::authorization::ResourceRef) and call
//! [`authorize`](registra_core::authorization::authorize); cross-subject
//! reads about one student go through [`ensure_student_visible`].

use registra_core::authorization::{authorize, Action, Decision, IdentityRef, ResourceRef};
use registra_core::error::CoreError;
use registra_core::roles::Role;
use registra_core::types::DbId;
use registra_db::repositories::{EnrollmentRepo, GuardianRepo, SubjectRepo};
use registra_db::DbPool;

use crate::error::AppError;
use crate::middleware::auth::AuthUser;

pub mod admin;
pub mod analytics;
pub mod api_keys;
pub mod assignments;
pub mod attendance;
pub mod auth;
pub mod enrollments;
pub mod students;
pub mod subjects;

// ---------------------------------------------------------------------------
// Shared access-control helpers
// ---------------------------------------------------------------------------

/// Build the caller's [`IdentityRef`], loading guardian links for parents.
pub(crate) async fn load_identity(pool: &DbPool, auth: &AuthUser) -> Result<IdentityRef, AppError> {
    let identity = match auth.role {
        Role::Parent => {
            let children = GuardianRepo::linked_student_ids(pool, auth.user_id).await?;
            IdentityRef::with_children(auth.user_id, children)
        }
        role => IdentityRef::new(auth.user_id, role),
    };
    Ok(identity)
}

/// Run an authorization check, logging the structured denial reason before
/// surfacing the generic forbidden error.
pub(crate) fn enforce(
    identity: &IdentityRef,
    action: Action,
    resource: &ResourceRef,
) -> Result<(), AppError> {
    let decision = authorize(identity, action, resource);
    if let Decision::Deny(reason) = decision {
        tracing::warn!(
            user_id = identity.id,
            role = identity.role.as_str(),
            action = action.as_str(),
            subject_id = resource.subject_id,
            student_id = resource.student_id,
            reason = reason.as_str(),
            "Authorization denied"
        );
    }
    decision.require()?;
    Ok(())
}

/// How much of one student's cross-subject data the caller may see.
pub(crate) enum StudentVisibility {
    /// Every record (admin, the student themself, a linked parent).
    Unrestricted,
    /// Only records in the listed subjects (a teacher viewing a student
    /// enrolled in one of their subjects).
    OwnedSubjects(Vec<DbId>),
}

impl StudentVisibility {
    /// Whether records in `subject_id` are visible under this scope.
    pub(crate) fn allows_subject(&self, subject_id: DbId) -> bool {
        match self {
            StudentVisibility::Unrestricted => true,
            StudentVisibility::OwnedSubjects(ids) => ids.contains(&subject_id),
        }
    }
}

/// Check that the caller may view `student_id`'s profile and records, and
/// return the subject scope that applies.
///
/// Admins, the student themself, and linked parents see everything. A
/// teacher sees the student only while the student is enrolled in at least
/// one subject the teacher owns, and then only records within the teacher's
/// own subjects. Everyone else gets the generic forbidden error.
pub(crate) async fn ensure_student_visible(
    pool: &DbPool,
    auth: &AuthUser,
    student_id: DbId,
) -> Result<StudentVisibility, AppError> {
    match auth.role {
        Role::Admin => Ok(StudentVisibility::Unrestricted),

        Role::Student if auth.user_id == student_id => Ok(StudentVisibility::Unrestricted),
        Role::Student => Err(visibility_denied(auth, student_id, "not_owner")),

        Role::Parent => {
            let children = GuardianRepo::linked_student_ids(pool, auth.user_id).await?;
            if children.contains(&student_id) {
                Ok(StudentVisibility::Unrestricted)
            } else {
                Err(visibility_denied(auth, student_id, "not_owner"))
            }
        }

        Role::Teacher => {
            let owned: Vec<DbId> = SubjectRepo::list_for_teacher(pool, auth.user_id)
                .await?
                .iter()
                .map(|s| s.id)
                .collect();
            let enrolled: Vec<DbId> = EnrollmentRepo::list_subjects_for_student(pool, student_id)
                .await?
                .iter()
                .map(|s| s.id)
                .collect();

            if enrolled.iter().any(|id| owned.contains(id)) {
                Ok(StudentVisibility::OwnedSubjects(owned))
            } else {
                Err(visibility_denied(auth, student_id, "not_enrolled"))
            }
        }
    }
}

pub(crate) fn visibility_denied(auth: &AuthUser, student_id: DbId, reason: &'static str) -> AppError {
    tracing::warn!(
        user_id = auth.user_id,
        role = auth.role.as_str(),
        student_id,
        reason,
        "Student visibility denied"
    );
    AppError::Core(CoreError::Forbidden(
        registra_core::authorization::FORBIDDEN_MSG.to_string(),
    ))
}
