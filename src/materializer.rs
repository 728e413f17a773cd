use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{
    course::EnrollmentRecord,
    filter::RecipientFilter,
    message::{
        ANNOUNCEMENT_TYPE, MaterializedMessage, MaterializedNotification, MessageMetadata,
        NotificationData,
    },
    template::MessageTemplate,
};

const NOTIFICATION_PREVIEW_CHARS: usize = 100;
const TRUNCATION_MARKER: &str = "...";

/// One message and one notification per recipient, ready for the two bulk
/// inserts.
#[derive(Debug, Clone)]
pub struct MaterializedBatch {
    pub messages: Vec<MaterializedMessage>,
    pub notifications: Vec<MaterializedNotification>,
}

/// Expands a template into per-recipient payloads, in recipient order.
///
/// Pure transform: ids are minted here, but no I/O happens. `sent_at` is
/// the single dispatch timestamp stamped into every message's metadata.
pub fn materialize(
    recipients: &[EnrollmentRecord],
    template: &MessageTemplate,
    course_name: &str,
    policy: RecipientFilter,
    sent_at: DateTime<Utc>,
) -> MaterializedBatch {
    let mut messages = Vec::with_capacity(recipients.len());
    let mut notifications = Vec::with_capacity(recipients.len());

    let notification_message = notification_preview(template);
    let title = format!("New announcement in {}", course_name);

    for recipient in recipients {
        messages.push(MaterializedMessage {
            id: Uuid::new_v4(),
            sender: template.sender_id,
            recipient: recipient.student_id,
            subject: template.subject.clone(),
            content: template.content.clone(),
            message_type: ANNOUNCEMENT_TYPE.to_string(),
            course: template.course_id,
            priority: template.priority,
            metadata: MessageMetadata {
                bulk_message: true,
                recipient_filter: policy,
                sent_at,
            },
        });

        notifications.push(MaterializedNotification {
            user: recipient.student_id,
            notification_type: ANNOUNCEMENT_TYPE.to_string(),
            title: title.clone(),
            message: notification_message.clone(),
            data: NotificationData {
                course_id: template.course_id,
                course_name: course_name.to_string(),
                sender_id: template.sender_id,
                sender_name: template.sender_name.clone(),
            },
            priority: template.priority,
        });
    }

    MaterializedBatch {
        messages,
        notifications,
    }
}

/// Subject wins when present; otherwise the first 100 characters of the
/// content, with a `...` marker only when something was actually cut.
fn notification_preview(template: &MessageTemplate) -> String {
    if let Some(subject) = &template.subject {
        if !subject.is_empty() {
            return subject.clone();
        }
    }

    let mut preview: String = template
        .content
        .chars()
        .take(NOTIFICATION_PREVIEW_CHARS)
        .collect();

    if template.content.chars().count() > NOTIFICATION_PREVIEW_CHARS {
        preview.push_str(TRUNCATION_MARKER);
    }

    preview
}
