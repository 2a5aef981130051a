//! Configuration loading and management
//!
//! Configuration comes from an optional YAML file, then environment variables
//! override individual values. Every field has a default, so an empty file (or
//! no file at all) yields a working setup.
//!
//! ```yaml
//! server:
//!   host: 0.0.0.0
//!   port: 3000
//! reports:
//!   utc_offset_seconds: 0
//!   cache_enabled: true
//!   cache_capacity: 1000
//!   cache_timeout_ms: 250
//!   # redis_url: redis://localhost:6379 (needs the `redis-cache` feature)
//! ```

use anyhow::{Context, Result, anyhow};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub reports: ReportConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Report computation and cache settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Offset from UTC of the timezone that defines calendar days
    pub utc_offset_seconds: i32,

    /// When false every report is computed from the store
    pub cache_enabled: bool,

    /// Maximum number of cached reports
    pub cache_capacity: u64,

    /// Upper bound on a single cache call before it counts as a miss
    pub cache_timeout_ms: u64,

    /// Shared Redis cache; when unset reports are cached in process
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redis_url: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            utc_offset_seconds: 0,
            cache_enabled: true,
            cache_capacity: 1000,
            cache_timeout_ms: 250,
            redis_url: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path))?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    ///
    /// Recognised variables: `BISTRO_HOST`, `PORT`, `BISTRO_UTC_OFFSET_SECONDS`,
    /// `BISTRO_CACHE_ENABLED`, `BISTRO_CACHE_TIMEOUT_MS`, `REDIS_URL`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("BISTRO_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("PORT must be a port number, got '{}'", port))?;
        }
        if let Some(offset) = lookup("BISTRO_UTC_OFFSET_SECONDS") {
            self.reports.utc_offset_seconds = offset.parse().with_context(|| {
                format!("BISTRO_UTC_OFFSET_SECONDS must be an integer, got '{}'", offset)
            })?;
        }
        if let Some(enabled) = lookup("BISTRO_CACHE_ENABLED") {
            self.reports.cache_enabled = enabled.parse().with_context(|| {
                format!("BISTRO_CACHE_ENABLED must be true or false, got '{}'", enabled)
            })?;
        }
        if let Some(timeout) = lookup("BISTRO_CACHE_TIMEOUT_MS") {
            self.reports.cache_timeout_ms = timeout.parse().with_context(|| {
                format!("BISTRO_CACHE_TIMEOUT_MS must be an integer, got '{}'", timeout)
            })?;
        }
        if let Some(url) = lookup("REDIS_URL").filter(|url| !url.trim().is_empty()) {
            self.reports.redis_url = Some(url);
        }
        self.validate()?;
        Ok(self)
    }

    /// Check values that deserialize fine but make no sense
    pub fn validate(&self) -> Result<()> {
        self.utc_offset()?;
        if self.reports.cache_timeout_ms == 0 {
            return Err(anyhow!("reports.cache_timeout_ms must be greater than zero"));
        }
        Ok(())
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Canonical timezone for calendar days
    pub fn utc_offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.reports.utc_offset_seconds).ok_or_else(|| {
            anyhow!(
                "reports.utc_offset_seconds out of range: {}",
                self.reports.utc_offset_seconds
            )
        })
    }

    pub fn cache_timeout(&self) -> Duration {
        Duration::from_millis(self.reports.cache_timeout_ms)
    }
}
