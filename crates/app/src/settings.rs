//! Handles settings for the application. Configuration is read from an
//! optional `settings.toml` and from `CASHIFY__*` environment variables,
//! e.g. `CASHIFY__SERVER__PORT=3000`.
//!
//! See `settings.example.toml` for the configuration.
use config::{Config, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub database: Database,
    pub bind: Option<String>,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct Rates {
    pub base_url: String,
    pub api_key: String,
    pub refresh_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Reminders {
    pub poll_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Option<Server>,
    pub rates: Option<Rates>,
    pub reminders: Option<Reminders>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::build(
            Config::builder()
                .add_source(File::with_name("settings").required(false))
                .add_source(
                    Environment::with_prefix("CASHIFY")
                        .separator("__")
                        .try_parsing(true),
                ),
        )
    }

    fn build(builder: config::ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings: Self = builder
            .set_default("app.level", "info")?
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Intervals drive `tokio::time::interval`, which needs a non-zero period.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.rates.as_ref().and_then(|r| r.refresh_secs) == Some(0) {
            return Err(ConfigError::Message(
                "rates.refresh_secs must be at least 1".to_string(),
            ));
        }
        if self.reminders.as_ref().and_then(|r| r.poll_secs) == Some(0) {
            return Err(ConfigError::Message(
                "reminders.poll_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
