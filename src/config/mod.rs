use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

use crate::fetch::DEFAULT_USER_AGENT;

/// Extraction settings, loadable from `config.yaml` and overridable per run
/// from the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Seconds to wait between requests (rate limiting)
    pub delay_between_requests: f64,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum retry attempts for transient failures
    pub max_retries: u32,

    /// Custom User-Agent header; browser-style default when unset
    pub user_agent: Option<String>,

    /// Default output format for saved results
    pub default_output_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delay_between_requests: 2.0,
            timeout_secs: 30,
            max_retries: 3,
            user_agent: None,
            default_output_format: "json".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file or fall back to defaults.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = fs_err::read_to_string(&config_path)
                .context("Failed to read config file")?;

            let config: Config =
                serde_yaml::from_str(&content).context("Failed to parse config file")?;

            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;

        fs_err::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path.
    pub fn config_path() -> Result<PathBuf> {
        // Current directory first for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join("tedscribe").join("config.yaml"))
    }

    /// Validate configuration. Misconfiguration is a programmer/operator
    /// error and propagates, unlike per-URL extraction failures.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be greater than zero");
        }

        if !self.delay_between_requests.is_finite() || self.delay_between_requests < 0.0 {
            anyhow::bail!("delay_between_requests must be a non-negative number of seconds");
        }

        Ok(())
    }

    /// Apply command-line overrides on top of the loaded configuration.
    pub fn with_overrides(
        mut self,
        delay: Option<f64>,
        timeout: Option<u64>,
        retries: Option<u32>,
        user_agent: Option<String>,
    ) -> Self {
        if let Some(delay) = delay {
            self.delay_between_requests = delay;
        }
        if let Some(timeout) = timeout {
            self.timeout_secs = timeout;
        }
        if let Some(retries) = retries {
            self.max_retries = retries;
        }
        if user_agent.is_some() {
            self.user_agent = user_agent;
        }
        self
    }

    /// Effective User-Agent header.
    pub fn user_agent(&self) -> &str {
        match &self.user_agent {
            Some(ua) => {
                debug!(user_agent = %ua, "using custom user agent");
                ua
            }
            None => DEFAULT_USER_AGENT,
        }
    }

    /// Display current configuration.
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Delay between requests: {}s", self.delay_between_requests);
        println!("  Request timeout: {}s", self.timeout_secs);
        println!("  Max retries: {}", self.max_retries);
        println!(
            "  User agent: {}",
            self.user_agent.as_deref().unwrap_or("(default)")
        );
        println!("  Default output format: {}", self.default_output_format);
    }
}
