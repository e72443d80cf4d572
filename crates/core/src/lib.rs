//! Pure domain logic for the registra academic-records service.
//!
//! Nothing in this crate performs I/O. Authorization decisions, grade
//! arithmetic, attendance and trend math, and API key material are plain
//! functions over plain types so they can be tested without a database or
//! an HTTP stack. The `registra-db` and `registra-api` crates feed these
//! functions and act on their results.

pub mod analytics;
pub mod api_keys;
pub mod authorization;
pub mod error;
pub mod grading;
pub mod roles;
pub mod schedule;
pub mod types;
