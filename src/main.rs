use std::sync::Arc;

use announcement_service::{
    api::{AppState, run_api_server},
    clients::{database::DatabaseClient, health::HealthChecker, redis::RealtimeClient},
    config::Config,
    dispatch::Dispatcher,
};
use anyhow::{Error, Result};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::load()?;

    let database = Arc::new(DatabaseClient::connect(&config).await?);
    let realtime = Arc::new(RealtimeClient::connect(&config).await?);

    let dispatcher = Dispatcher::new(database.clone(), database.clone(), realtime.clone());
    let health_checker = HealthChecker::new(database, realtime);

    run_api_server(config, AppState::new(dispatcher, health_checker)).await
}
