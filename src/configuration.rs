use std::time::Duration;

use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub browser: BrowserSettings,
    pub scraper: ScraperSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
}

/// Connection target for the lead store. None of these have defaults in source,
/// they must come from the environment (`APP_DATABASE__PASSWORD`, ...).
#[derive(Deserialize, Clone, Debug)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    pub database_name: String,
    pub require_ssl: bool,
}

#[derive(Deserialize, Clone, Debug)]
pub struct BrowserSettings {
    pub webdriver_url: String,
    pub headless: bool,
    pub user_agent: String,
    pub window_width: u32,
    pub window_height: u32,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ScraperSettings {
    pub search_url: String,
    pub max_pagination_attempts: u32,
    pub search_timeout_ms: u64,
    pub scroll_delay_ms: u64,
    pub scroll_distance: i64,
    pub navigation_timeout_ms: u64,
    pub settle_delay_ms: u64,
    pub website_timeout_ms: u64,
    pub poll_interval_ms: u64,
    pub skip_duplicate_names: bool,
}

impl DatabaseSettings {
    pub fn without_db(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };
        PgConnectOptions::new()
            .host(&self.host)
            .username(&self.username)
            .password(&self.password)
            .port(self.port)
            .ssl_mode(ssl_mode)
    }

    pub fn with_db(&self) -> PgConnectOptions {
        self.without_db().database(&self.database_name)
    }
}

impl ScraperSettings {
    pub fn search_timeout(&self) -> Duration {
        Duration::from_millis(self.search_timeout_ms)
    }

    pub fn scroll_delay(&self) -> Duration {
        Duration::from_millis(self.scroll_delay_ms)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn website_timeout(&self) -> Duration {
        Duration::from_millis(self.website_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for ScraperSettings {
    fn default() -> Self {
        ScraperSettings {
            search_url: "https://www.google.com/maps".to_string(),
            max_pagination_attempts: 10,
            search_timeout_ms: 3_000,
            scroll_delay_ms: 2_000,
            scroll_distance: 3_000,
            navigation_timeout_ms: 30_000,
            settle_delay_ms: 1_500,
            website_timeout_ms: 10_000,
            poll_interval_ms: 250,
            skip_duplicate_names: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error(transparent)]
    Source(#[from] config::ConfigError),
    #[error("{0} is not a supported environment. Use either `local` or `production`.")]
    UnknownEnvironment(String),
    #[error("configuration value `{0}` must not be empty")]
    Missing(&'static str),
    #[error("configuration value `{0}` must be greater than zero")]
    Zero(&'static str),
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = ConfigurationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(ConfigurationError::UnknownEnvironment(other.to_string())),
        }
    }
}

impl Settings {
    pub fn validate(self) -> Result<Self, ConfigurationError> {
        let required = [
            ("database.username", &self.database.username),
            ("database.password", &self.database.password),
            ("database.host", &self.database.host),
            ("database.database_name", &self.database.database_name),
            ("browser.webdriver_url", &self.browser.webdriver_url),
            ("scraper.search_url", &self.scraper.search_url),
        ];
        if let Some((key, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ConfigurationError::Missing(*key));
        }
        if self.scraper.max_pagination_attempts == 0 {
            return Err(ConfigurationError::Zero("scraper.max_pagination_attempts"));
        }
        if self.scraper.poll_interval_ms == 0 {
            return Err(ConfigurationError::Zero("scraper.poll_interval_ms"));
        }
        Ok(self)
    }
}

pub fn get_configuration() -> Result<Settings, ConfigurationError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;
    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()?.validate()
}
