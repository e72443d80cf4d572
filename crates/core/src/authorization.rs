//! Role-scoped access decisions.
//!
//! One pure function decides every read and write on academic records.
//! Handlers gather the caller's identity and the owning references of the
//! resource being touched, call [`authorize`], and only reach storage after
//! an [`Decision::Allow`]. Denials carry a structured reason for logging;
//! the HTTP layer surfaces nothing beyond a generic forbidden message so an
//! unauthorized caller cannot probe for resource existence.

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DbId;

/// Generic message for every authorization denial, regardless of reason.
pub const FORBIDDEN_MSG: &str = "You do not have permission to perform this action";

/// What the caller is attempting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

/// The caller, reduced to what the decision needs.
#[derive(Debug, Clone)]
pub struct IdentityRef {
    pub id: DbId,
    pub role: Role,
    /// Student ids a parent may view. Empty for every other role.
    pub linked_children: Vec<DbId>,
}

impl IdentityRef {
    pub fn new(id: DbId, role: Role) -> Self {
        Self {
            id,
            role,
            linked_children: Vec::new(),
        }
    }

    pub fn with_children(id: DbId, children: Vec<DbId>) -> Self {
        Self {
            id,
            role: Role::Parent,
            linked_children: children,
        }
    }
}

/// The record being touched, reduced to its owning references.
#[derive(Debug, Clone, Copy)]
pub struct ResourceRef {
    /// Subject the record belongs to.
    pub subject_id: DbId,
    /// Teacher who owns that subject.
    pub subject_teacher_id: DbId,
    /// Student the record is about. Subject-wide resources such as
    /// schedule slots and class reports carry none.
    pub student_id: Option<DbId>,
}

impl ResourceRef {
    /// A record tied to one student within a subject (grade, attendance).
    pub fn record(subject_id: DbId, subject_teacher_id: DbId, student_id: DbId) -> Self {
        Self {
            subject_id,
            subject_teacher_id,
            student_id: Some(student_id),
        }
    }

    /// A subject-wide resource with no single student.
    pub fn subject_wide(subject_id: DbId, subject_teacher_id: DbId) -> Self {
        Self {
            subject_id,
            subject_teacher_id,
            student_id: None,
        }
    }
}

/// Why a request was denied.
///
/// Logged with structure at the decision site; never serialized into a
/// response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Caller does not own or is not the subject of the resource.
    NotOwner,
    /// Caller's role cannot perform this action at all.
    WrongRole,
}

impl DenyReason {
    pub fn as_str(self) -> &'static str {
        match self {
            DenyReason::NotOwner => "not_owner",
            DenyReason::WrongRole => "wrong_role",
        }
    }
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    /// Convert into a result, replacing any denial with the generic
    /// forbidden error. Callers that want the reason match first.
    pub fn require(self) -> Result<(), CoreError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(_) => Err(CoreError::Forbidden(FORBIDDEN_MSG.to_string())),
        }
    }
}

/// Decide whether `identity` may perform `action` on `resource`.
///
/// Deny-by-default: every allowed combination is spelled out below and
/// anything else falls through to a denial.
///
/// - Admin: allowed, any action.
/// - Teacher: allowed iff they own the resource's subject.
/// - Student: read-only, and only records about themselves.
/// - Parent: read-only, and only records about a linked child.
pub fn authorize(identity: &IdentityRef, action: Action, resource: &ResourceRef) -> Decision {
    match identity.role {
        Role::Admin => Decision::Allow,

        Role::Teacher => {
            if resource.subject_teacher_id == identity.id {
                Decision::Allow
            } else {
                Decision::Deny(DenyReason::NotOwner)
            }
        }

        Role::Student => match (action, resource.student_id) {
            (Action::Read, Some(student_id)) if student_id == identity.id => Decision::Allow,
            (Action::Read, _) => Decision::Deny(DenyReason::NotOwner),
            _ => Decision::Deny(DenyReason::WrongRole),
        },

        Role::Parent => match (action, resource.student_id) {
            (Action::Read, Some(student_id)) if identity.linked_children.contains(&student_id) => {
                Decision::Allow
            }
            (Action::Read, _) => Decision::Deny(DenyReason::NotOwner),
            _ => Decision::Deny(DenyReason::WrongRole),
        },
    }
}
