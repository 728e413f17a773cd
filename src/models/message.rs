use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{filter::RecipientFilter, template::Priority};

/// Both outputs of one dispatch carry this fixed type tag.
pub const ANNOUNCEMENT_TYPE: &str = "course_announcement";

/// Stamped onto every message of a bulk dispatch. Fixed shape: the
/// persisted metadata is queried by these exact fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageMetadata {
    pub bulk_message: bool,
    pub recipient_filter: RecipientFilter,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterializedMessage {
    pub id: Uuid,
    pub sender: Uuid,
    pub recipient: Uuid,
    pub subject: Option<String>,
    pub content: String,
    pub message_type: String,
    pub course: Uuid,
    pub priority: Priority,
    pub metadata: MessageMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationData {
    pub course_id: Uuid,
    pub course_name: String,
    pub sender_id: Uuid,
    pub sender_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterializedNotification {
    pub user: Uuid,
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub data: NotificationData,
    pub priority: Priority,
}
