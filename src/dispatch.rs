use std::sync::Arc;

use anyhow::Error;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    error::DispatchError,
    filter::filter_recipients,
    materializer::materialize,
    models::{
        course::Course,
        filter::RecipientFilter,
        message::{MaterializedMessage, MaterializedNotification},
        summary::DispatchSummary,
        template::{MessageTemplate, Priority},
        validation::validate_template,
    },
};

/// Event name pushed over the live channel for each recipient.
pub const REALTIME_EVENT: &str = "notification:new";

#[async_trait]
pub trait EnrollmentStore: Send + Sync {
    async fn course_with_enrollments(&self, course_id: Uuid) -> Result<Option<Course>, Error>;
}

#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    async fn bulk_insert_messages(
        &self,
        messages: &[MaterializedMessage],
    ) -> Result<Vec<Uuid>, Error>;

    async fn bulk_insert_notifications(
        &self,
        notifications: &[MaterializedNotification],
    ) -> Result<(), Error>;
}

/// Live push channel. Delivery is best-effort: the dispatcher never waits
/// on it and never fails because of it.
#[async_trait]
pub trait RealtimeNotifier: Send + Sync {
    async fn emit_to_user(
        &self,
        user_id: Uuid,
        event: &str,
        payload: serde_json::Value,
    ) -> Result<(), Error>;
}

#[derive(Debug, Clone)]
pub struct BulkDispatchRequest {
    pub course_id: Uuid,
    pub actor_id: Uuid,
    pub actor_name: String,
    pub subject: Option<String>,
    pub content: String,
    pub priority: Priority,
    pub filter: RecipientFilter,
}

pub struct Dispatcher {
    store: Arc<dyn EnrollmentStore>,
    gateway: Arc<dyn PersistenceGateway>,
    notifier: Arc<dyn RealtimeNotifier>,
}

impl Dispatcher {
    pub fn new(
        store: Arc<dyn EnrollmentStore>,
        gateway: Arc<dyn PersistenceGateway>,
        notifier: Arc<dyn RealtimeNotifier>,
    ) -> Self {
        Self {
            store,
            gateway,
            notifier,
        }
    }

    /// Runs one bulk announcement dispatch to completion.
    ///
    /// Validation, lookup, and authorization short-circuit before any
    /// write. The two bulk inserts are sequential and not transactional:
    /// a persistence failure on the second leaves the already-inserted
    /// messages in place.
    pub async fn dispatch(
        &self,
        request: BulkDispatchRequest,
    ) -> Result<DispatchSummary, DispatchError> {
        let template = MessageTemplate {
            subject: request.subject,
            content: request.content,
            priority: request.priority,
            course_id: request.course_id,
            sender_id: request.actor_id,
            sender_name: request.actor_name,
        };

        validate_template(&template)?;

        let course = self
            .store
            .course_with_enrollments(request.course_id)
            .await
            .map_err(DispatchError::Persistence)?
            .ok_or(DispatchError::CourseNotFound)?;

        if course.instructor_id != request.actor_id {
            return Err(DispatchError::NotInstructor);
        }

        info!(
            course_id = %course.id,
            enrollment_count = course.enrollments.len(),
            filter = %request.filter,
            "Dispatching bulk announcement"
        );

        let now = Utc::now();

        let recipients = filter_recipients(course.enrollments, request.filter, now);

        let batch = materialize(&recipients, &template, &course.name, request.filter, now);

        let messages_sent = if batch.messages.is_empty() {
            debug!(course_id = %course.id, "No recipients matched the filter, nothing persisted");
            0
        } else {
            let inserted = self
                .gateway
                .bulk_insert_messages(&batch.messages)
                .await
                .map_err(DispatchError::Persistence)?;

            self.gateway
                .bulk_insert_notifications(&batch.notifications)
                .await
                .map_err(DispatchError::Persistence)?;

            inserted.len()
        };

        self.push_live_events(&batch.notifications);

        info!(
            course_id = %course.id,
            messages_sent,
            recipient_count = recipients.len(),
            "Bulk announcement dispatched"
        );

        Ok(DispatchSummary {
            messages_sent,
            recipient_count: recipients.len(),
            course_name: course.name,
            filter_used: request.filter,
        })
    }

    /// Fans the live event out to every recipient without joining on the
    /// results. Runs only after the durable writes have committed.
    fn push_live_events(&self, notifications: &[MaterializedNotification]) {
        for notification in notifications {
            let notifier = Arc::clone(&self.notifier);
            let user = notification.user;
            let payload = json!({
                "type": notification.notification_type,
                "title": notification.title,
                "message": notification.message,
                "priority": notification.priority,
                "data": notification.data,
            });

            tokio::spawn(async move {
                if let Err(e) = notifier.emit_to_user(user, REALTIME_EVENT, payload).await {
                    warn!(user_id = %user, error = %e, "Realtime push failed");
                }
            });
        }
    }
}
