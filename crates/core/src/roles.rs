//! The closed set of roles an identity can hold.
//!
//! Roles are fixed at account creation; there is no promotion or demotion
//! path. The string forms below are what the `users.role` column stores.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_TEACHER: &str = "teacher";
pub const ROLE_STUDENT: &str = "student";
pub const ROLE_PARENT: &str = "parent";

/// An identity's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    Student,
    Parent,
}

impl Role {
    /// The storage and wire form of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::Teacher => ROLE_TEACHER,
            Role::Student => ROLE_STUDENT,
            Role::Parent => ROLE_PARENT,
        }
    }

    /// Parse the storage form back into a role.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            ROLE_ADMIN => Ok(Role::Admin),
            ROLE_TEACHER => Ok(Role::Teacher),
            ROLE_STUDENT => Ok(Role::Student),
            ROLE_PARENT => Ok(Role::Parent),
            other => Err(CoreError::Validation(format!("unknown role: {other}"))),
        }
    }

    /// Whether identities with this role can ever mutate academic records.
    ///
    /// Students and parents are read-only across the whole surface, so an
    /// API key they own can never carry a write scope.
    pub fn can_write_records(self) -> bool {
        matches!(self, Role::Admin | Role::Teacher)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
