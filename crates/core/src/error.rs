use crate::types::DbId;

/// Domain error taxonomy shared by every crate in the workspace.
///
/// The HTTP layer owns the mapping to status codes; this enum only states
/// what went wrong in domain terms. `Forbidden` and `Unauthorized` messages
/// are written for the caller and stay generic; the precise denial reason
/// is logged where the decision is made, never serialized into a response.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The referenced entity does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Caller-correctable input problem (malformed, out of range).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A duplicate natural key where an update was intended.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Missing, malformed, expired, or revoked credential.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Valid credential, insufficient permission.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Unexpected failure; details are logged, never surfaced.
    #[error("internal error: {0}")]
    Internal(String),
}
