use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_postgres::{Client, NoTls};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::{
    config::Config,
    dispatch::{EnrollmentStore, PersistenceGateway},
    models::{
        course::{Course, EnrollmentRecord},
        message::{MaterializedMessage, MaterializedNotification},
    },
    utils::retry_with_backoff,
};

/// PostgreSQL adapter serving both the enrollment reads and the two bulk
/// writes of a dispatch.
pub struct DatabaseClient {
    client: Client,
}

impl DatabaseClient {
    pub async fn connect(config: &Config) -> Result<Self, Error> {
        info!("Connecting to PostgreSQL");

        let retry_config = config.connect_retry_config();
        let database_url = config.database_url.clone();

        let (client, connection) = retry_with_backoff(&retry_config, || {
            let url = database_url.clone();
            async move { tokio_postgres::connect(&url, NoTls).await }
        })
        .await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))?;

        // The connection object drives the socket; it lives on its own task.
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(error = %e, "PostgreSQL connection terminated");
            }
        });

        info!("PostgreSQL connection established");

        Ok(Self { client })
    }

    pub async fn health_check(&self) -> Result<(), Error> {
        self.client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| anyhow!("Database health check failed: {}", e))?;

        Ok(())
    }
}

#[async_trait]
impl EnrollmentStore for DatabaseClient {
    async fn course_with_enrollments(&self, course_id: Uuid) -> Result<Option<Course>, Error> {
        let course_row = self
            .client
            .query_opt(
                "SELECT id, name, instructor_id FROM courses WHERE id = $1",
                &[&course_id],
            )
            .await
            .map_err(|e| anyhow!("Course lookup failed: {}", e))?;

        let Some(course_row) = course_row else {
            return Ok(None);
        };

        let enrollment_rows = self
            .client
            .query(
                "SELECT student_id, progress_percent, completed, last_active_at \
                 FROM enrollments WHERE course_id = $1 ORDER BY enrolled_at",
                &[&course_id],
            )
            .await
            .map_err(|e| anyhow!("Enrollment lookup failed: {}", e))?;

        let enrollments = enrollment_rows
            .iter()
            .map(|row| EnrollmentRecord {
                student_id: row.get("student_id"),
                progress_percent: row.get("progress_percent"),
                completed: row.get("completed"),
                last_active_at: row.get("last_active_at"),
            })
            .collect();

        debug!(
            course_id = %course_id,
            enrollment_count = enrollment_rows.len(),
            "Course aggregate loaded"
        );

        Ok(Some(Course {
            id: course_row.get("id"),
            name: course_row.get("name"),
            instructor_id: course_row.get("instructor_id"),
            enrollments,
        }))
    }
}

#[async_trait]
impl PersistenceGateway for DatabaseClient {
    async fn bulk_insert_messages(
        &self,
        messages: &[MaterializedMessage],
    ) -> Result<Vec<Uuid>, Error> {
        let mut ids = Vec::with_capacity(messages.len());
        let mut senders = Vec::with_capacity(messages.len());
        let mut recipients = Vec::with_capacity(messages.len());
        let mut subjects: Vec<Option<&str>> = Vec::with_capacity(messages.len());
        let mut contents = Vec::with_capacity(messages.len());
        let mut types = Vec::with_capacity(messages.len());
        let mut courses = Vec::with_capacity(messages.len());
        let mut priorities = Vec::with_capacity(messages.len());
        let mut bulk_flags = Vec::with_capacity(messages.len());
        let mut filters = Vec::with_capacity(messages.len());
        let mut sent_ats: Vec<DateTime<Utc>> = Vec::with_capacity(messages.len());

        for message in messages {
            ids.push(message.id);
            senders.push(message.sender);
            recipients.push(message.recipient);
            subjects.push(message.subject.as_deref());
            contents.push(message.content.as_str());
            types.push(message.message_type.as_str());
            courses.push(message.course);
            priorities.push(message.priority.to_string());
            bulk_flags.push(message.metadata.bulk_message);
            filters.push(message.metadata.recipient_filter.as_str());
            sent_ats.push(message.metadata.sent_at);
        }

        let rows = self
            .client
            .query(
                "INSERT INTO messages (id, sender_id, recipient_id, subject, content, \
                 message_type, course_id, priority, bulk_message, recipient_filter, sent_at) \
                 SELECT * FROM UNNEST($1::uuid[], $2::uuid[], $3::uuid[], $4::text[], \
                 $5::text[], $6::text[], $7::uuid[], $8::text[], $9::bool[], $10::text[], \
                 $11::timestamptz[]) \
                 RETURNING id",
                &[
                    &ids,
                    &senders,
                    &recipients,
                    &subjects,
                    &contents,
                    &types,
                    &courses,
                    &priorities,
                    &bulk_flags,
                    &filters,
                    &sent_ats,
                ],
            )
            .await
            .map_err(|e| anyhow!("Bulk message insert failed: {}", e))?;

        debug!(inserted = rows.len(), "Messages persisted");

        Ok(rows.iter().map(|row| row.get("id")).collect())
    }

    async fn bulk_insert_notifications(
        &self,
        notifications: &[MaterializedNotification],
    ) -> Result<(), Error> {
        let mut users = Vec::with_capacity(notifications.len());
        let mut types = Vec::with_capacity(notifications.len());
        let mut titles = Vec::with_capacity(notifications.len());
        let mut bodies = Vec::with_capacity(notifications.len());
        let mut data: Vec<serde_json::Value> = Vec::with_capacity(notifications.len());
        let mut priorities = Vec::with_capacity(notifications.len());

        for notification in notifications {
            users.push(notification.user);
            types.push(notification.notification_type.as_str());
            titles.push(notification.title.as_str());
            bodies.push(notification.message.as_str());
            data.push(serde_json::to_value(&notification.data)?);
            priorities.push(notification.priority.to_string());
        }

        let inserted = self
            .client
            .execute(
                "INSERT INTO notifications (user_id, notification_type, title, message, \
                 data, priority) \
                 SELECT * FROM UNNEST($1::uuid[], $2::text[], $3::text[], $4::text[], \
                 $5::jsonb[], $6::text[])",
                &[&users, &types, &titles, &bodies, &data, &priorities],
            )
            .await
            .map_err(|e| anyhow!("Bulk notification insert failed: {}", e))?;

        debug!(inserted, "Notifications persisted");

        Ok(())
    }
}
