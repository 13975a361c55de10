//! Client configuration management.
//!
//! Configuration is persisted as TOML on disk. The session token and REST
//! URL are normally obtained out of band (the Bullhorn login handshake is not
//! part of this library) and handed in through `BULLHORN_SESSION_TOKEN` and
//! `BULLHORN_REST_URL`, which take precedence over the file.

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{BhError, BhResult};
use crate::platform;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Bullhorn connection settings.
    #[serde(default)]
    pub bullhorn: BullhornConfig,

    /// Retry policy settings.
    #[serde(default)]
    pub retry: RetrySettings,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Bullhorn REST connection configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct BullhornConfig {
    /// REST endpoint returned by the Bullhorn login call
    /// (e.g. "https://rest123.bullhornstaffing.com/rest-services/1234/").
    #[serde(default)]
    pub rest_url: String,

    /// Session token (`BhRestToken`).
    #[serde(default)]
    pub session_token: String,

    /// Per-attempt request timeout in milliseconds.
    #[serde(default = "default_api_timeout")]
    pub api_timeout_ms: u64,

    /// TCP connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,
}

/// Retry policy as written in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Total attempts per call, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry, doubled on each further retry.
    #[serde(default = "default_base_delay")]
    pub base_delay_ms: u64,

    /// Upper bound on any single delay.
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,

    /// Randomize each delay by up to 25% in either direction.
    #[serde(default)]
    pub jitter: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for log files. If empty, uses default location.
    #[serde(default)]
    pub directory: String,

    /// Enable JSON structured logging output.
    #[serde(default)]
    pub json_output: bool,
}

// Default value functions for serde

fn default_api_timeout() -> u64 {
    constants::DEFAULT_API_TIMEOUT_MS
}

fn default_connect_timeout() -> u64 {
    15_000
}

fn default_max_attempts() -> u32 {
    constants::DEFAULT_MAX_ATTEMPTS
}

fn default_base_delay() -> u64 {
    constants::DEFAULT_RETRY_BASE_DELAY_MS
}

fn default_max_delay() -> u64 {
    constants::DEFAULT_RETRY_MAX_DELAY_MS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for BullhornConfig {
    fn default() -> Self {
        Self {
            rest_url: String::new(),
            session_token: String::new(),
            api_timeout_ms: default_api_timeout(),
            connect_timeout_ms: default_connect_timeout(),
        }
    }
}

impl std::fmt::Debug for BullhornConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BullhornConfig")
            .field("rest_url", &self.rest_url)
            .field("session_token", &redact(&self.session_token))
            .field("api_timeout_ms", &self.api_timeout_ms)
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .finish()
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay(),
            max_delay_ms: default_max_delay(),
            jitter: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: String::new(),
            json_output: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path, then apply environment overrides.
    pub fn load_default() -> BhResult<Self> {
        let path = Self::default_config_path()?;
        let mut config = if path.exists() {
            Self::load_from_file(&path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> BhResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a specific file path.
    pub fn save_to_file(&self, path: &Path) -> BhResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| BhError::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> BhResult<PathBuf> {
        let config_dir = platform::config_dir()?;
        Ok(config_dir.join("config.toml"))
    }

    /// Get the effective log directory, using the configured path or the default.
    pub fn effective_log_dir(&self) -> BhResult<PathBuf> {
        if self.logging.directory.is_empty() {
            platform::default_log_dir()
        } else {
            Ok(PathBuf::from(&self.logging.directory))
        }
    }

    /// Override credentials with `BULLHORN_SESSION_TOKEN` / `BULLHORN_REST_URL`.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Override credentials from an arbitrary variable lookup.
    ///
    /// Empty values are ignored so that an exported-but-blank variable does
    /// not wipe a token read from the file.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(constants::ENV_SESSION_TOKEN).filter(|v| !v.trim().is_empty()) {
            self.bullhorn.session_token = token.trim().to_string();
        }
        if let Some(url) = lookup(constants::ENV_REST_URL).filter(|v| !v.trim().is_empty()) {
            self.bullhorn.rest_url = url;
        }
    }

    /// Check whether both credentials are present.
    pub fn is_configured(&self) -> bool {
        !self.bullhorn.rest_url.trim().is_empty() && !self.bullhorn.session_token.trim().is_empty()
    }

    /// Sanitize and normalize a REST URL.
    ///
    /// Strips whitespace and surrounding quotes, defaults the scheme to
    /// https, and guarantees exactly one trailing slash so relative entity
    /// paths can be appended.
    pub fn sanitize_rest_url(url: &str) -> String {
        let trimmed = url.trim().trim_matches('"').trim();
        if trimmed.is_empty() {
            return String::new();
        }

        let scheme = trimmed.get(..8).unwrap_or(trimmed).to_ascii_lowercase();
        let with_scheme = if scheme.starts_with("http://") || scheme.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        };

        format!("{}/", with_scheme.trim_end_matches('/'))
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<empty>"
    } else {
        "<redacted>"
    }
}
