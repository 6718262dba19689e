use serde::Deserialize;
use std::time::Duration;

use crate::error::{AppError, AppResult};
use crate::scheduler::ScheduleDefinition;

/// Environment variable naming an alternative config file (without extension)
pub const CONFIG_PATH_ENV: &str = "GKE_PROVIDER_CONFIG";

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// `projects/<project>/locations/<location>` paths to enumerate
    #[serde(default)]
    pub parents: Vec<String>,

    #[serde(default)]
    pub schedule: ScheduleConfig,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Static bearer token; the metadata server is used when absent
    #[serde(default)]
    pub access_token: Option<String>,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// HTTP catalog endpoint; mutations go to stdout when absent
    #[serde(default)]
    pub catalog_url: Option<String>,

    #[serde(default)]
    pub catalog_token: Option<String>,

    #[serde(default)]
    pub metrics_port: Option<u16>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_frequency_secs")]
    pub frequency_secs: u64,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub initial_delay_secs: u64,
}

fn default_api_base_url() -> String {
    "https://container.googleapis.com".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_frequency_secs() -> u64 {
    // 30 minutes
    1800
}

fn default_timeout_secs() -> u64 {
    180
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            frequency_secs: default_frequency_secs(),
            timeout_secs: default_timeout_secs(),
            initial_delay_secs: 0,
        }
    }
}

impl ScheduleConfig {
    /// Convert to a validated schedule definition
    pub fn to_definition(&self) -> AppResult<ScheduleDefinition> {
        if self.frequency_secs == 0 {
            return Err(AppError::config("schedule.frequency_secs must be greater than 0"));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::config("schedule.timeout_secs must be greater than 0"));
        }

        Ok(ScheduleDefinition {
            frequency: Duration::from_secs(self.frequency_secs),
            timeout: Duration::from_secs(self.timeout_secs),
            initial_delay: Duration::from_secs(self.initial_delay_secs),
        })
    }
}

impl ProviderConfig {
    /// Load configuration from `.env`, an optional config file and
    /// `GKE_PROVIDER_*` environment variables, in increasing precedence.
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "gke-provider".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name(&path).required(false))
            .add_source(
                config::Environment::with_prefix("GKE_PROVIDER")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("parents")
                    .try_parsing(true),
            )
            .build()?;

        let settings: ProviderConfig = config.try_deserialize()?;
        settings.validate()?;

        Ok(settings)
    }

    /// Parse configuration from an in-memory YAML document
    pub fn from_yaml(source: &str) -> AppResult<Self> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Yaml))
            .build()?;

        let settings: ProviderConfig = config.try_deserialize()?;
        settings.validate()?;

        Ok(settings)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.parents.is_empty() {
            return Err(AppError::config("at least one parent must be configured"));
        }
        if let Some(blank) = self.parents.iter().position(|p| p.trim().is_empty()) {
            return Err(AppError::config(&format!("parent at index {} is empty", blank)));
        }
        if self.request_timeout_secs == 0 {
            return Err(AppError::config("request_timeout_secs must be greater than 0"));
        }
        self.schedule.to_definition()?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
