use anyhow::{Error, Result, anyhow};
use dotenvy::dotenv;
use serde::Deserialize;

use crate::models::retry::RetryConfig;

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    pub database_url: String,

    pub redis_url: String,
    pub realtime_channel_prefix: String,

    pub connect_retry_attempts: u32,
    pub connect_retry_initial_delay_ms: u64,
    pub connect_retry_max_delay_ms: u64,
    pub connect_retry_backoff_multiplier: u64,

    pub server_port: u16,
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        dotenv().ok();

        let config = envy::from_env::<Self>()
            .map_err(|_| anyhow!("Invalid or missing environmental variable"))?;
        Ok(config)
    }

    pub fn connect_retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.connect_retry_attempts,
            initial_delay_ms: self.connect_retry_initial_delay_ms,
            max_delay_ms: self.connect_retry_max_delay_ms,
            backoff_multiplier: self.connect_retry_backoff_multiplier,
        }
    }
}
