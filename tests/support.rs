use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU32, Ordering},
};

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::time::{Duration, sleep};
use uuid::Uuid;

use announcement_service::{
    dispatch::{BulkDispatchRequest, EnrollmentStore, PersistenceGateway, RealtimeNotifier},
    models::{
        course::{Course, EnrollmentRecord},
        filter::RecipientFilter,
        message::{MaterializedMessage, MaterializedNotification},
        template::Priority,
    },
};

pub fn enrollment_active_at(
    progress_percent: i32,
    completed: bool,
    last_active_at: DateTime<Utc>,
) -> EnrollmentRecord {
    EnrollmentRecord {
        student_id: Uuid::new_v4(),
        progress_percent,
        completed,
        last_active_at,
    }
}

pub fn enrollment(progress_percent: i32, completed: bool) -> EnrollmentRecord {
    enrollment_active_at(progress_percent, completed, Utc::now())
}

pub fn course(instructor_id: Uuid, enrollments: Vec<EnrollmentRecord>) -> Course {
    Course {
        id: Uuid::new_v4(),
        name: "Intro to Rust".to_string(),
        instructor_id,
        enrollments,
    }
}

pub fn announcement(course_id: Uuid, actor_id: Uuid) -> BulkDispatchRequest {
    BulkDispatchRequest {
        course_id,
        actor_id,
        actor_name: "Dana Instructor".to_string(),
        subject: Some("Exam moved".to_string()),
        content: "The midterm moves to Friday, same room.".to_string(),
        priority: Priority::Normal,
        filter: RecipientFilter::All,
    }
}

/// Polls a condition until it holds or ~1s passes.
pub async fn eventually<F: Fn() -> bool>(condition: F) -> bool {
    for _ in 0..100 {
        if condition() {
            return true;
        }
        sleep(Duration::from_millis(10)).await;
    }
    condition()
}

pub struct MockStore {
    course: Option<Course>,
    calls: AtomicU32,
}

impl MockStore {
    pub fn with_course(course: Course) -> Arc<Self> {
        Arc::new(Self {
            course: Some(course),
            calls: AtomicU32::new(0),
        })
    }

    pub fn empty() -> Arc<Self> {
        Arc::new(Self {
            course: None,
            calls: AtomicU32::new(0),
        })
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EnrollmentStore for MockStore {
    async fn course_with_enrollments(&self, _course_id: Uuid) -> Result<Option<Course>, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.course.clone())
    }
}

#[derive(Default)]
pub struct MockGateway {
    fail_messages: bool,
    fail_notifications: bool,
    message_calls: AtomicU32,
    notification_calls: AtomicU32,
    messages: Mutex<Vec<MaterializedMessage>>,
    notifications: Mutex<Vec<MaterializedNotification>>,
}

impl MockGateway {
    pub fn working() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_on_messages() -> Arc<Self> {
        Arc::new(Self {
            fail_messages: true,
            ..Self::default()
        })
    }

    pub fn failing_on_notifications() -> Arc<Self> {
        Arc::new(Self {
            fail_notifications: true,
            ..Self::default()
        })
    }

    pub fn message_call_count(&self) -> u32 {
        self.message_calls.load(Ordering::SeqCst)
    }

    pub fn notification_call_count(&self) -> u32 {
        self.notification_calls.load(Ordering::SeqCst)
    }

    pub fn inserted_messages(&self) -> Vec<MaterializedMessage> {
        self.messages.lock().unwrap().clone()
    }

    pub fn inserted_notifications(&self) -> Vec<MaterializedNotification> {
        self.notifications.lock().unwrap().clone()
    }
}

#[async_trait]
impl PersistenceGateway for MockGateway {
    async fn bulk_insert_messages(
        &self,
        messages: &[MaterializedMessage],
    ) -> Result<Vec<Uuid>, Error> {
        self.message_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_messages {
            return Err(anyhow!("injected message insert failure"));
        }

        let ids = messages.iter().map(|m| m.id).collect();
        self.messages.lock().unwrap().extend_from_slice(messages);

        Ok(ids)
    }

    async fn bulk_insert_notifications(
        &self,
        notifications: &[MaterializedNotification],
    ) -> Result<(), Error> {
        self.notification_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_notifications {
            return Err(anyhow!("injected notification insert failure"));
        }

        self.notifications
            .lock()
            .unwrap()
            .extend_from_slice(notifications);

        Ok(())
    }
}

#[derive(Default)]
pub struct MockNotifier {
    fail: bool,
    block: bool,
    started: AtomicU32,
    completed: AtomicU32,
}

impl MockNotifier {
    pub fn working() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    /// Every emit hangs forever, so completions only happen if the
    /// dispatcher (wrongly) waits on them.
    pub fn blocking() -> Arc<Self> {
        Arc::new(Self {
            block: true,
            ..Self::default()
        })
    }

    pub fn started_count(&self) -> u32 {
        self.started.load(Ordering::SeqCst)
    }

    pub fn completed_count(&self) -> u32 {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RealtimeNotifier for MockNotifier {
    async fn emit_to_user(
        &self,
        _user_id: Uuid,
        _event: &str,
        _payload: serde_json::Value,
    ) -> Result<(), Error> {
        self.started.fetch_add(1, Ordering::SeqCst);

        if self.block {
            futures_util::future::pending::<()>().await;
        }

        if self.fail {
            return Err(anyhow!("injected push failure"));
        }

        self.completed.fetch_add(1, Ordering::SeqCst);

        Ok(())
    }
}
