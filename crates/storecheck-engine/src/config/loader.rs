use super::schema::StorecheckConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from `explicit` when given, otherwise from the default locations,
    /// then apply environment overrides and validate.
    pub async fn load(explicit: Option<&Path>) -> Result<StorecheckConfig, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::load_from(path).await?,
            None => Self::load_default().await?,
        };
        Self::apply_env(&mut config, |key| std::env::var(key).ok());
        Self::validate(&config)?;
        Ok(config)
    }

    /// Load from default locations:
    /// 1. ./storecheck.yaml
    /// 2. ~/.storecheck/config.yaml
    /// 3. Default configuration
    pub async fn load_default() -> Result<StorecheckConfig, ConfigError> {
        let local_config = PathBuf::from("./storecheck.yaml");
        if local_config.exists() {
            return Self::load_from(&local_config).await;
        }

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".storecheck").join("config.yaml");
            if home_config.exists() {
                return Self::load_from(&home_config).await;
            }
        }

        debug!("No config file found; using defaults");
        Ok(StorecheckConfig::default())
    }

    pub async fn load_from(path: &Path) -> Result<StorecheckConfig, ConfigError> {
        info!(path = %path.display(), "Loading config");
        let content = tokio::fs::read_to_string(path).await?;
        let config: StorecheckConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Apply `HEADLESS`, `BASE_URL`, `WEBDRIVER_URL` and `API_BASE`.
    ///
    /// `HEADLESS=0` runs a visible browser; any other value forces headless.
    pub fn apply_env<F>(config: &mut StorecheckConfig, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("HEADLESS") {
            config.browser.headless = value.trim() != "0";
        }
        if let Some(url) = lookup("BASE_URL").filter(|v| !v.is_empty()) {
            config.target.base_url = url;
        }
        if let Some(url) = lookup("WEBDRIVER_URL").filter(|v| !v.is_empty()) {
            config.browser.webdriver_url = url;
        }
        if let Some(url) = lookup("API_BASE").filter(|v| !v.is_empty()) {
            config.database.api_base = url;
        }
    }

    pub fn validate(config: &StorecheckConfig) -> Result<(), ConfigError> {
        for (name, value) in [
            ("target.base_url", &config.target.base_url),
            ("browser.webdriver_url", &config.browser.webdriver_url),
            ("database.api_base", &config.database.api_base),
        ] {
            url::Url::parse(value)
                .map_err(|e| ConfigError::Invalid(format!("{} '{}': {}", name, value, e)))?;
        }

        if let Some(set) = config.catalog.sets().into_iter().find(|set| set.is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "catalog set '{}' has no locators",
                set.name()
            )));
        }

        let timing = &config.timing;
        for (name, value) in [
            ("timing.default_timeout_ms", timing.default_timeout_ms),
            ("timing.attempt_timeout_ms", timing.attempt_timeout_ms),
            ("timing.poll_interval_ms", timing.poll_interval_ms),
            ("timing.clickable_timeout_ms", timing.clickable_timeout_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{} must be positive", name)));
            }
        }
        if config.database.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "database.poll_interval_ms must be positive".into(),
            ));
        }
        Ok(())
    }
}
