use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One student's relationship to a course. Loaded alongside the course
/// aggregate and never written back by this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    pub student_id: Uuid,
    pub progress_percent: i32,
    pub completed: bool,
    pub last_active_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    pub instructor_id: Uuid,
    pub enrollments: Vec<EnrollmentRecord>,
}
