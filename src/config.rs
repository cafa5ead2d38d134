//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub polling: PollingConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote service endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Financial data service, e.g. `https://host/api`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Authentication service, e.g. `https://host/api/auth`
    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://fintrack-api-czav.onrender.com/api".to_string()
}

fn default_auth_url() -> String {
    "https://fintrack-api-czav.onrender.com/api/auth".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_url: default_auth_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    /// Point both services at one host, e.g. `http://127.0.0.1:8000`.
    ///
    /// Uses the `/api` and `/api/auth` prefixes of the reference backend.
    pub fn for_host(host: &str) -> Self {
        let host = host.trim_end_matches('/');
        Self {
            base_url: format!("{}/api", host),
            auth_url: format!("{}/api/auth", host),
            request_timeout_secs: default_request_timeout(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        // A zero timeout would fail every request before it is sent
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

/// Where the persisted session lives
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_session_dir")]
    pub dir: String,
}

fn default_session_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("fintrack").to_string_lossy().to_string())
        .unwrap_or_else(|| "./fintrack_data".to_string())
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            dir: default_session_dir(),
        }
    }
}

impl SessionConfig {
    /// Session directory with a leading `~/` expanded
    pub fn dir_path(&self) -> PathBuf {
        match (self.dir.strip_prefix("~/"), dirs::home_dir()) {
            (Some(rest), Some(home)) => home.join(rest),
            _ => PathBuf::from(&self.dir),
        }
    }
}

/// Live-refresh settings for `watch`-style views
#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_poll_interval")]
    pub interval_secs: u64,
}

fn default_poll_interval() -> u64 {
    60
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval(),
        }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        // A zero interval would make tokio::time::interval panic
        Duration::from_secs(self.interval_secs.max(1))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(path, &content)
    }

    fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("fintrack").join("config.toml")),
            Some(PathBuf::from("/etc/fintrack/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // API overrides
        if let Some(url) = var("FINTRACK_API_BASE_URL") {
            self.api.base_url = url;
        }
        if let Some(url) = var("FINTRACK_API_AUTH_URL") {
            self.api.auth_url = url;
        }
        if let Some(secs) = var("FINTRACK_REQUEST_TIMEOUT_SECS") {
            if let Ok(s) = secs.parse() {
                self.api.request_timeout_secs = s;
            }
        }

        // Session overrides
        if let Some(dir) = var("FINTRACK_SESSION_DIR") {
            self.session.dir = dir;
        }

        // Polling overrides
        if let Some(secs) = var("FINTRACK_POLL_INTERVAL_SECS") {
            if let Ok(s) = secs.parse() {
                self.polling.interval_secs = s;
            }
        }

        // Logging overrides
        if let Some(level) = var("FINTRACK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("FINTRACK_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# FinTrack Configuration
#
# Environment variables override these settings:
# - FINTRACK_API_BASE_URL
# - FINTRACK_API_AUTH_URL
# - FINTRACK_REQUEST_TIMEOUT_SECS
# - FINTRACK_SESSION_DIR
# - FINTRACK_POLL_INTERVAL_SECS
# - FINTRACK_LOG_LEVEL
# - FINTRACK_LOG_FORMAT

[api]
# Financial data service
base_url = "https://fintrack-api-czav.onrender.com/api"

# Authentication service (token issue/refresh, profile)
auth_url = "https://fintrack-api-czav.onrender.com/api/auth"

# Request timeout in seconds
request_timeout_secs = 30

[session]
# Directory holding the persisted session (tokens + cached profile)
dir = "~/.local/share/fintrack"

[polling]
# Refresh interval for live views (seconds)
interval_secs = 60

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/fintrack/fintrack.log"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.api.base_url.ends_with("/api"));
        assert!(config.api.auth_url.ends_with("/api/auth"));
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.polling.interval_secs, 60);
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(Path::new("generated"), &generate_default_config()).unwrap();
        assert_eq!(
            config.api.base_url,
            "https://fintrack-api-czav.onrender.com/api"
        );
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.session.dir, "~/.local/share/fintrack");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = Config::parse(
            Path::new("partial"),
            "[api]\nbase_url = \"http://localhost:8000/api\"\n",
        )
        .unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8000/api");
        assert_eq!(config.api.auth_url, default_auth_url());
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_invalid_file_is_parse_error() {
        let err = Config::parse(Path::new("bad.toml"), "[api\nbase_url = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[polling]\ninterval_secs = 5\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.polling.interval_secs, 5);

        let missing = Config::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("FINTRACK_API_BASE_URL", "http://api.test/api"),
            ("FINTRACK_REQUEST_TIMEOUT_SECS", "5"),
            ("FINTRACK_POLL_INTERVAL_SECS", "not-a-number"),
            ("FINTRACK_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "http://api.test/api");
        assert_eq!(config.api.request_timeout_secs, 5);
        assert_eq!(config.polling.interval_secs, 60);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_for_host() {
        let api = ApiConfig::for_host("http://127.0.0.1:9000/");
        assert_eq!(api.base_url, "http://127.0.0.1:9000/api");
        assert_eq!(api.auth_url, "http://127.0.0.1:9000/api/auth");
    }

    #[test]
    fn test_session_dir_expands_home() {
        let session = SessionConfig {
            dir: "~/.local/share/fintrack".to_string(),
        };
        if let Some(home) = dirs::home_dir() {
            assert_eq!(session.dir_path(), home.join(".local/share/fintrack"));
        }

        let absolute = SessionConfig {
            dir: "/var/lib/fintrack".to_string(),
        };
        assert_eq!(absolute.dir_path(), PathBuf::from("/var/lib/fintrack"));
    }

    #[test]
    fn test_zero_request_timeout_is_clamped() {
        let config = Config::parse(Path::new("zero"), "[api]\nrequest_timeout_secs = 0\n").unwrap();
        assert_eq!(config.api.request_timeout(), Duration::from_secs(1));

        let api = ApiConfig {
            request_timeout_secs: 12,
            ..ApiConfig::default()
        };
        assert_eq!(api.request_timeout(), Duration::from_secs(12));
    }

    #[test]
    fn test_zero_poll_interval_is_clamped() {
        let polling = PollingConfig { interval_secs: 0 };
        assert_eq!(polling.interval(), Duration::from_secs(1));
    }
}
