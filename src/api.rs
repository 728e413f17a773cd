use std::sync::Arc;

use anyhow::{Error, Result};
use axum::{
    Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::{
    clients::health::HealthChecker,
    config::Config,
    dispatch::{BulkDispatchRequest, Dispatcher},
    models::{
        filter::RecipientFilter, health::HealthStatus, response::ApiResponse, template::Priority,
    },
};

pub struct AppState {
    dispatcher: Dispatcher,
    health_checker: HealthChecker,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher, health_checker: HealthChecker) -> Self {
        Self {
            dispatcher,
            health_checker,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BulkMessageRequest {
    pub subject: Option<String>,

    #[serde(default)]
    pub content: String,

    pub recipient_filter: Option<String>,

    #[serde(default)]
    pub priority: Priority,
}

#[derive(Debug, Serialize)]
pub struct BulkMessageData {
    pub messages_sent: usize,
    pub recipients: usize,
    pub course: String,
    pub recipient_filter: RecipientFilter,
}

pub async fn run_api_server(config: Config, state: AppState) -> Result<(), Error> {
    let app = Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/teacher/courses/{course_id}/messages/bulk",
            post(send_bulk_course_message),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state));

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = TcpListener::bind(&addr).await?;

    info!(address = %addr, "API server started");

    axum::serve(listener, app).await?;

    Ok(())
}

async fn send_bulk_course_message(
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<Uuid>,
    headers: HeaderMap,
    Json(body): Json<BulkMessageRequest>,
) -> Response {
    // Auth middleware upstream resolves the actor; we only read the result.
    let Some((actor_id, actor_name)) = actor_from_headers(&headers) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<()>::error(
                "Missing authenticated user".to_string(),
            )),
        )
            .into_response();
    };

    let request = BulkDispatchRequest {
        course_id,
        actor_id,
        actor_name,
        subject: body.subject,
        content: body.content,
        priority: body.priority,
        filter: RecipientFilter::from_name(body.recipient_filter.as_deref()),
    };

    match state.dispatcher.dispatch(request).await {
        Ok(summary) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(BulkMessageData {
                messages_sent: summary.messages_sent,
                recipients: summary.recipient_count,
                course: summary.course_name,
                recipient_filter: summary.filter_used,
            })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

fn actor_from_headers(headers: &HeaderMap) -> Option<(Uuid, String)> {
    let actor_id = headers.get("x-user-id")?.to_str().ok()?;
    let actor_id = Uuid::parse_str(actor_id).ok()?;
    let actor_name = headers.get("x-user-name")?.to_str().ok()?.to_string();

    Some((actor_id, actor_name))
}

async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_checker.check_all().await;

    let status_code = match health.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}
