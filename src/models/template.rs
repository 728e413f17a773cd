use std::fmt::{Display, Formatter, Result};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MAX_SUBJECT_CHARS: usize = 200;
pub const MAX_CONTENT_CHARS: usize = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Normal => write!(f, "normal"),
            Priority::High => write!(f, "high"),
            Priority::Urgent => write!(f, "urgent"),
        }
    }
}

/// Shared announcement template, built once per dispatch from the request
/// body and the authenticated actor.
#[derive(Debug, Clone)]
pub struct MessageTemplate {
    pub subject: Option<String>,
    pub content: String,
    pub priority: Priority,
    pub course_id: Uuid,
    pub sender_id: Uuid,
    pub sender_name: String,
}
