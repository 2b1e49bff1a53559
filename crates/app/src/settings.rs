//! Handles settings for the application.
//!
//! Settings come from an optional `settings.toml`, then `FRIDGESHARE__*`
//! environment variables, then command line flags.
//!
//! ```toml
//! [app]
//! level = "info"
//!
//! [database]
//! sqlite = "fridgeshare.db"
//! ```
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "settings";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
    Url(String),
}

impl Default for Database {
    fn default() -> Self {
        Self::Sqlite("fridgeshare.db".to_string())
    }
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            Self::Memory => String::from("sqlite::memory:"),
            Self::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
            Self::Url(url) => url.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub database: Database,
}

impl Settings {
    /// Load settings, applying `level` and `database_url` last when given.
    pub fn new(
        config_path: Option<&str>,
        level: Option<&str>,
        database_url: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let path = config_path.unwrap_or(DEFAULT_CONFIG_PATH);
        let mut settings: Settings = Config::builder()
            .add_source(File::with_name(path).required(config_path.is_some()))
            .add_source(Environment::with_prefix("FRIDGESHARE").separator("__"))
            .build()?
            .try_deserialize()?;

        if let Some(level) = level {
            settings.app.level = level.to_string();
        }
        if let Some(url) = database_url {
            settings.database = Database::Url(url.to_string());
        }
        Ok(settings)
    }
}
