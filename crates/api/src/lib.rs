//! HTTP API for the registra backend.
//!
//! Axum application exposing the school-records service: authentication,
//! user administration, subjects and enrollments, grade and attendance
//! recording, per-student analytics, and API-key management.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod notifications;
pub mod response;
pub mod routes;
pub mod state;
