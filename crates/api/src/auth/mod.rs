//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and strength checks.
//! - [`jwt`] -- JWT access-token generation, validation, and refresh-token helpers.

pub mod jwt;
pub mod password;
