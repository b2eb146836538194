use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use gymdesk::{
    config::Config,
    db::db::DBClient,
    service::{
        expiry_job::start_expiry_notification_job,
        notification_service::LogSender,
        plan_seed::seed_default_plans,
    },
    AppState,
};
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::init()?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to the database")?;

    tracing::info!("Connection to the database is successful");

    let db_client = DBClient::new(pool);
    db_client.migrate().await.context("failed to run migrations")?;

    if config.seed_plans {
        seed_default_plans(&db_client).await?;
    }

    // Push delivery is handled outside this service; log intents for now.
    let app_state = Arc::new(AppState::new(db_client, config.clone(), Arc::new(LogSender)));

    tokio::spawn(start_expiry_notification_job(app_state.clone()));

    tracing::info!(
        "Expiry notifications running every {}s",
        config.expiry_check_interval_secs
    );

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    tracing::info!("Shutting down");
    Ok(())
}
