use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::MultiplexedConnection};
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{config::Config, dispatch::RealtimeNotifier, utils::retry_with_backoff};

/// Publishes live events onto per-user Redis channels. The socket gateway
/// that actually holds the websocket connections subscribes on the other
/// side; a publish with zero subscribers is a normal outcome here.
pub struct RealtimeClient {
    connection: MultiplexedConnection,
    channel_prefix: String,
}

impl RealtimeClient {
    pub async fn connect(config: &Config) -> Result<Self, Error> {
        info!("Connecting to Redis");

        let client = Client::open(config.redis_url.as_str())
            .map_err(|_| anyhow!("Failed to create redis client"))?;

        let retry_config = config.connect_retry_config();

        let connection = retry_with_backoff(&retry_config, || {
            let client = client.clone();
            async move { client.get_multiplexed_async_connection().await }
        })
        .await
        .map_err(|e| anyhow!("Failed to connect to redis: {}", e))?;

        info!("Redis connection established");

        Ok(Self {
            connection,
            channel_prefix: config.realtime_channel_prefix.clone(),
        })
    }

    pub async fn ping(&self) -> Result<(), Error> {
        let mut conn = self.connection.clone();

        conn.ping::<String>()
            .await
            .map_err(|e| anyhow!("Redis ping failed: {}", e))?;

        Ok(())
    }
}

#[async_trait]
impl RealtimeNotifier for RealtimeClient {
    async fn emit_to_user(
        &self,
        user_id: Uuid,
        event: &str,
        payload: serde_json::Value,
    ) -> Result<(), Error> {
        let channel = format!("{}:{}", self.channel_prefix, user_id);
        let envelope = serde_json::to_string(&json!({
            "event": event,
            "data": payload,
        }))?;

        let mut conn = self.connection.clone();

        let receivers: u64 = conn
            .publish(&channel, envelope)
            .await
            .map_err(|e| anyhow!("Failed to publish realtime event: {}", e))?;

        debug!(channel = %channel, receivers, "Realtime event published");

        Ok(())
    }
}
