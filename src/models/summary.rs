use serde::Serialize;

use crate::models::filter::RecipientFilter;

/// What the caller gets back from one successful dispatch.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchSummary {
    pub messages_sent: usize,
    pub recipient_count: usize,
    pub course_name: String,
    pub filter_used: RecipientFilter,
}
