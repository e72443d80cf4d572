//! Guardian notification seam for ledger writes.
//!
//! Every grade or attendance write emits a [`NotificationEvent`] through the
//! [`Notifier`] held in application state. The default [`TracingNotifier`]
//! records events to the structured log; an external delivery channel
//! (webhook, email) can implement the same trait without touching handlers.
//!
//! Dispatch is fire-and-forget from the handler's point of view: a failing
//! notifier must never fail the write that triggered it.

use async_trait::async_trait;
use chrono::NaiveDate;
use registra_core::types::DbId;

// ---------------------------------------------------------------------------
// NotificationEvent
// ---------------------------------------------------------------------------

/// A ledger change worth telling guardians about.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
    /// A new graded assignment was recorded for a student.
    GradeRecorded {
        student_id: DbId,
        subject_id: DbId,
        assignment_id: DbId,
        grade: f64,
    },
    /// An existing assignment's grade or name was changed.
    GradeUpdated {
        student_id: DbId,
        subject_id: DbId,
        assignment_id: DbId,
        grade: f64,
    },
    /// Attendance was marked (or re-marked) for a student.
    AttendanceMarked {
        student_id: DbId,
        subject_id: DbId,
        date: NaiveDate,
        period: i32,
        present: bool,
    },
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

/// Sink for notification events.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Dispatch a single event. Implementations must not panic and should
    /// swallow their own delivery errors (logging them is enough).
    async fn dispatch(&self, event: NotificationEvent);
}

/// Default notifier: writes each event to the structured log.
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn dispatch(&self, event: NotificationEvent) {
        match event {
            NotificationEvent::GradeRecorded {
                student_id,
                subject_id,
                assignment_id,
                grade,
            } => {
                tracing::info!(
                    student_id,
                    subject_id,
                    assignment_id,
                    grade,
                    "Guardian notification: new grade"
                );
            }
            NotificationEvent::GradeUpdated {
                student_id,
                subject_id,
                assignment_id,
                grade,
            } => {
                tracing::info!(
                    student_id,
                    subject_id,
                    assignment_id,
                    grade,
                    "Guardian notification: grade changed"
                );
            }
            NotificationEvent::AttendanceMarked {
                student_id,
                subject_id,
                date,
                period,
                present,
            } => {
                tracing::info!(
                    student_id,
                    subject_id,
                    date = %date,
                    period,
                    present,
                    "Guardian notification: attendance"
                );
            }
        }
    }
}
