//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod api_key_repo;
pub mod assignment_repo;
pub mod attendance_repo;
pub mod enrollment_repo;
pub mod guardian_repo;
pub mod schedule_repo;
pub mod session_repo;
pub mod settings_repo;
pub mod subject_repo;
pub mod user_repo;

pub use api_key_repo::ApiKeyRepo;
pub use assignment_repo::AssignmentRepo;
pub use attendance_repo::AttendanceRepo;
pub use enrollment_repo::EnrollmentRepo;
pub use guardian_repo::GuardianRepo;
pub use schedule_repo::ScheduleRepo;
pub use session_repo::SessionRepo;
pub use settings_repo::SettingsRepo;
pub use subject_repo::SubjectRepo;
pub use user_repo::UserRepo;
