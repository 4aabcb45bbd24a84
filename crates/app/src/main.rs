use std::{sync::Arc, time::Duration};

use engine::ExchangeRates;
use migration::{Migrator, MigratorTrait};
use server::SharedRates;
use settings::Database;
use tokio::sync::RwLock;

mod rates;
mod reminders;
mod settings;

const DEFAULT_REFRESH_SECS: u64 = 3600;
const DEFAULT_POLL_SECS: u64 = 60;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;
    let mut tasks = tokio::task::JoinSet::new();

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "cashify={level},server={level},engine={level},fx={level}",
            level = settings.app.level
        ))
        .init();

    let shared_rates: SharedRates = Arc::new(RwLock::new(ExchangeRates::default()));

    if let Some(rates) = settings.rates {
        let shared_rates = shared_rates.clone();
        tasks.spawn(async move {
            tracing::info!("Found rates settings...");
            let client = fx::RatesClient::new(reqwest::Client::new(), rates.base_url, rates.api_key);
            let every = Duration::from_secs(rates.refresh_secs.unwrap_or(DEFAULT_REFRESH_SECS));
            rates::refresh(client, shared_rates, every).await;
        });
    }

    if let Some(server) = settings.server {
        let poll_secs = settings
            .reminders
            .unwrap_or_default()
            .poll_secs
            .unwrap_or(DEFAULT_POLL_SECS);

        let db = parse_database(&server.database).await?;
        let engine = Arc::new(engine::Engine::builder().database(db).build().await?);

        let reminder_engine = engine.clone();
        tasks.spawn(async move {
            reminders::run(
                reminder_engine,
                reminders::LogNotifier,
                Duration::from_secs(poll_secs),
            )
            .await;
        });

        tasks.spawn(async move {
            tracing::info!("Found server settings...");
            let bind = server.bind.unwrap_or_else(|| "127.0.0.1".to_string());
            let addr = format!("{}:{}", bind, server.port);
            server::run(engine, shared_rates, &addr).await;
        });
    }

    while tasks.join_next().await.is_some() {
        tasks.shutdown().await;
    }

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
