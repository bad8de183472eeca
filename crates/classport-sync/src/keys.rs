//! Resource keys for the portal views that share a cache.
//!
//! Using these constants instead of string literals keeps sibling views
//! pointed at the same cache entry across tab switches.

use uuid::Uuid;

/// Timetable and class roster view.
pub const CLASSES: &str = "classes";
/// Attendance records view.
pub const ATTENDANCE: &str = "attendance";
/// Exams and allotted tests view.
pub const EXAMS: &str = "exams";
/// Study material library view.
pub const LIBRARY: &str = "library";
/// Notice board view.
pub const NOTICES: &str = "notices";
/// Performance and results view.
pub const PERFORMANCE: &str = "performance";

/// Key for a resource scoped to one user.
///
/// Parent portals cache the same resources once per linked student.
pub fn scoped(resource: &str, user_id: Uuid) -> String {
    format!("{resource}:{user_id}")
}
