//! API key material: generation, hashing, scopes, and lifecycle state.
//!
//! This module lives in `core` (zero internal deps) so the HTTP layer and
//! any future CLI tooling share one definition of what a key is. Secrets
//! exist in plaintext only inside [`GeneratedApiKey`] at creation time;
//! storage and authentication work exclusively with the SHA-256 digest.

use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Length of the public key identifier (the part before the colon).
pub const KEY_ID_LENGTH: usize = 12;

/// Length of the secret half of a key (the part after the colon).
pub const SECRET_LENGTH: usize = 40;

/// Separator between key id and secret in a bearer token.
pub const KEY_SEPARATOR: char = ':';

// ---------------------------------------------------------------------------
// Scopes
// ---------------------------------------------------------------------------

/// Permission scope a key carries.
///
/// A key's effective capability is this scope intersected with whatever
/// its owning identity's role allows; a key can never grant more than its
/// owner possesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyScope {
    /// Read-only access to records the owner can see.
    Read,
    /// Read plus the mutations the owner could perform directly.
    ReadWrite,
}

impl KeyScope {
    pub fn as_str(self) -> &'static str {
        match self {
            KeyScope::Read => "read",
            KeyScope::ReadWrite => "read_write",
        }
    }

    /// Parse the storage form back into a scope.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "read" => Ok(KeyScope::Read),
            "read_write" => Ok(KeyScope::ReadWrite),
            other => Err(CoreError::Validation(format!("unknown scope: {other}"))),
        }
    }

    pub fn allows_write(self) -> bool {
        matches!(self, KeyScope::ReadWrite)
    }

    /// Whether an owner with `role` may hold a key with this scope.
    pub fn permitted_for(self, role: Role) -> bool {
        !self.allows_write() || role.can_write_records()
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Lifecycle state of a key, derived from its row.
///
/// Transitions are one-directional: an expired or revoked key is replaced,
/// never reactivated. Revocation wins over expiry when both apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyStatus {
    Active,
    Expired,
    Revoked,
}

/// Derive the lifecycle state from the revocation and expiry timestamps.
pub fn key_status(
    revoked_at: Option<Timestamp>,
    expires_at: Option<Timestamp>,
    now: Timestamp,
) -> KeyStatus {
    if revoked_at.is_some() {
        KeyStatus::Revoked
    } else if expires_at.is_some_and(|at| at <= now) {
        KeyStatus::Expired
    } else {
        KeyStatus::Active
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// The result of generating a new API key.
pub struct GeneratedApiKey {
    /// Public identifier, safe to display and log.
    pub key_id: String,
    /// The plaintext secret (disclosed to the caller exactly once, never
    /// stored).
    pub secret: String,
    /// SHA-256 hex digest of the secret (what the database stores).
    pub secret_hash: String,
}

impl GeneratedApiKey {
    /// The bearer token form handed to the caller: `key_id:secret`.
    pub fn bearer_token(&self) -> String {
        format!("{}{}{}", self.key_id, KEY_SEPARATOR, self.secret)
    }
}

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generate fresh key material.
pub fn generate_api_key() -> GeneratedApiKey {
    let key_id = random_alphanumeric(KEY_ID_LENGTH);
    let secret = random_alphanumeric(SECRET_LENGTH);
    let secret_hash = hash_secret(&secret);
    GeneratedApiKey {
        key_id,
        secret,
        secret_hash,
    }
}

// ---------------------------------------------------------------------------
// Hashing and token parsing
// ---------------------------------------------------------------------------

/// SHA-256 hex digest of a key secret.
///
/// Used at creation (to store the digest) and at authentication (to compare
/// against the stored digest).
pub fn hash_secret(secret: &str) -> String {
    let digest = Sha256::digest(secret.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Check a presented secret against a stored digest.
pub fn verify_secret(secret: &str, stored_hash: &str) -> bool {
    hash_secret(secret) == stored_hash
}

/// Split a bearer token of the form `key_id:secret`.
///
/// Returns `None` when the token carries no separator or either half is
/// empty; callers treat such tokens as session tokens instead.
pub fn split_bearer_key(token: &str) -> Option<(&str, &str)> {
    token
        .split_once(KEY_SEPARATOR)
        .filter(|(key_id, secret)| !key_id.is_empty() && !secret.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    // -- Key generation ----------------------------------------------------

    #[test]
    fn generated_parts_have_correct_lengths() {
        let key = generate_api_key();
        assert_eq!(key.key_id.len(), KEY_ID_LENGTH);
        assert_eq!(key.secret.len(), SECRET_LENGTH);
    }

    #[test]
    fn generated_parts_are_alphanumeric() {
        let key = generate_api_key();
        assert!(key.key_id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(key.secret.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn generated_hash_is_sha256_hex() {
        let key = generate_api_key();
        assert_eq!(key.secret_hash.len(), 64, "SHA-256 hex digest should be 64 chars");
        assert!(key.secret_hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn hash_matches_regeneration() {
        let key = generate_api_key();
        assert_eq!(key.secret_hash, hash_secret(&key.secret));
        assert!(verify_secret(&key.secret, &key.secret_hash));
    }

    #[test]
    fn different_keys_differ() {
        let a = generate_api_key();
        let b = generate_api_key();
        assert_ne!(a.key_id, b.key_id);
        assert_ne!(a.secret, b.secret);
        assert_ne!(a.secret_hash, b.secret_hash);
    }

    #[test]
    fn bearer_token_joins_with_colon() {
        let key = generate_api_key();
        let token = key.bearer_token();
        let (key_id, secret) = split_bearer_key(&token).unwrap();
        assert_eq!(key_id, key.key_id);
        assert_eq!(secret, key.secret);
    }

    // -- Hashing -----------------------------------------------------------

    #[test]
    fn same_input_produces_same_hash() {
        assert_eq!(hash_secret("secret_123"), hash_secret("secret_123"));
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let stored = hash_secret("right");
        assert!(!verify_secret("wrong", &stored));
    }

    // -- Token parsing -----------------------------------------------------

    #[test]
    fn split_rejects_tokens_without_separator() {
        assert_eq!(split_bearer_key("justasessiontoken"), None);
    }

    #[test]
    fn split_rejects_empty_halves() {
        assert_eq!(split_bearer_key(":secretonly"), None);
        assert_eq!(split_bearer_key("idonly:"), None);
        assert_eq!(split_bearer_key(":"), None);
    }

    #[test]
    fn split_keeps_colons_inside_the_secret() {
        let (key_id, secret) = split_bearer_key("abc:def:ghi").unwrap();
        assert_eq!(key_id, "abc");
        assert_eq!(secret, "def:ghi");
    }

    // -- Scopes ------------------------------------------------------------

    #[test]
    fn scope_parse_round_trips() {
        for scope in [KeyScope::Read, KeyScope::ReadWrite] {
            assert_eq!(KeyScope::parse(scope.as_str()).unwrap(), scope);
        }
        assert!(KeyScope::parse("admin").is_err());
    }

    #[test]
    fn write_scope_requires_a_writing_owner() {
        assert!(KeyScope::ReadWrite.permitted_for(Role::Admin));
        assert!(KeyScope::ReadWrite.permitted_for(Role::Teacher));
        assert!(!KeyScope::ReadWrite.permitted_for(Role::Student));
        assert!(!KeyScope::ReadWrite.permitted_for(Role::Parent));
    }

    #[test]
    fn read_scope_is_open_to_every_role() {
        for role in [Role::Admin, Role::Teacher, Role::Student, Role::Parent] {
            assert!(KeyScope::Read.permitted_for(role));
        }
    }

    // -- Lifecycle ---------------------------------------------------------

    #[test]
    fn status_active_within_expiry() {
        let now = Utc::now();
        assert_eq!(key_status(None, None, now), KeyStatus::Active);
        assert_eq!(
            key_status(None, Some(now + Duration::days(1)), now),
            KeyStatus::Active
        );
    }

    #[test]
    fn status_expired_past_expiry() {
        let now = Utc::now();
        assert_eq!(
            key_status(None, Some(now - Duration::seconds(1)), now),
            KeyStatus::Expired
        );
        assert_eq!(key_status(None, Some(now), now), KeyStatus::Expired);
    }

    #[test]
    fn revocation_wins_over_expiry() {
        let now = Utc::now();
        assert_eq!(
            key_status(Some(now), Some(now + Duration::days(1)), now),
            KeyStatus::Revoked
        );
        assert_eq!(
            key_status(Some(now), Some(now - Duration::days(1)), now),
            KeyStatus::Revoked
        );
    }
}
