//! Database models and DTOs.
//!
//! One module per table (or closely related table pair). Full rows derive
//! `FromRow`; rows carrying secrets get a separate `*Response` struct for
//! serialization so the secret can never leak through a handler by accident.

pub mod api_key;
pub mod assignment;
pub mod attendance;
pub mod enrollment;
pub mod guardian;
pub mod schedule;
pub mod session;
pub mod settings;
pub mod subject;
pub mod user;
