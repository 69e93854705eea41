//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::session::TokenPolicy;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// File the config was read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,

    /// Problems met while loading; logged once tracing is set up
    #[serde(skip)]
    pub warnings: Vec<String>,
}

/// Remote API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Token store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_session_file")]
    pub file: String,

    #[serde(default)]
    pub token_policy: TokenPolicy,
}

fn default_session_file() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("rentwise").join("session.json").to_string_lossy().to_string())
        .unwrap_or_else(|| "./rentwise_session.json".to_string())
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            file: default_session_file(),
            token_policy: TokenPolicy::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
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

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
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
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("rentwise").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    /// Load the first of `paths` that exists and parses; unreadable files
    /// are skipped with a warning
    pub fn load_first(paths: &[PathBuf]) -> Self {
        let mut warnings = Vec::new();

        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load_with_env(path) {
                Ok(mut config) => {
                    config.source = Some(path.clone());
                    warnings.append(&mut config.warnings);
                    config.warnings = warnings;
                    return config;
                }
                Err(e) => warnings.push(format!("{e}; ignoring it")),
            }
        }

        let mut config = Self::from_env();
        warnings.append(&mut config.warnings);
        config.warnings = warnings;
        config
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("RENTWISE_API_URL") {
            self.api.base_url = url;
        }

        if let Some(file) = var("RENTWISE_SESSION_FILE") {
            self.session.file = file;
        }
        if let Some(policy) = var("RENTWISE_TOKEN_POLICY") {
            match policy.parse() {
                Ok(p) => self.session.token_policy = p,
                Err(e) => self.warnings.push(format!("Ignoring RENTWISE_TOKEN_POLICY: {e}")),
            }
        }

        if let Some(level) = var("RENTWISE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("RENTWISE_LOG_FORMAT") {
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
    r#"# RentWise Configuration
#
# Environment variables override these settings:
# - RENTWISE_API_URL
# - RENTWISE_SESSION_FILE
# - RENTWISE_TOKEN_POLICY
# - RENTWISE_LOG_LEVEL
# - RENTWISE_LOG_FORMAT

[api]
# Base URL of the RentWise REST API
base_url = "http://localhost:8000"

[session]
# Where the access token, refresh token and username are kept
# file = "~/.local/share/rentwise/session.json"

# How stored tokens are judged:
#   presence - any non-empty token that is not a placeholder
#   expiry   - additionally reject tokens whose `exp` claim has passed
token_policy = "expiry"

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.session.token_policy, TokenPolicy::Expiry);
        assert_eq!(config.logging.format, "pretty");
        assert!(config.session.file.ends_with("session.json"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::parse(
            r#"
            [api]
            base_url = "https://rent.example.com"

            [session]
            token_policy = "presence"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://rent.example.com");
        assert_eq!(config.session.token_policy, TokenPolicy::Presence);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.session.token_policy, TokenPolicy::Expiry);
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let err = Config::parse("[session]\ntoken_policy = \"sometimes\"\n").unwrap_err();
        assert!(err.contains("sometimes") || err.contains("unknown variant"));
    }

    #[test]
    fn test_broken_file_is_reported_and_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.toml");
        let good = dir.path().join("good.toml");
        std::fs::write(&broken, "[api").unwrap();
        std::fs::write(&good, "[api]\nbase_url = \"https://rent.example.com\"\n").unwrap();

        let config = Config::load_first(&[broken.clone(), good.clone()]);
        assert_eq!(config.api.base_url, "https://rent.example.com");
        assert_eq!(config.source, Some(good));
        assert_eq!(config.warnings.len(), 1);
        assert!(config.warnings[0].contains("broken.toml"));

        let config = Config::load_first(&[broken]);
        assert_eq!(config.source, None);
        assert_eq!(config.warnings.len(), 1);
    }

    #[test]
    fn test_bad_policy_override_is_a_warning() {
        let mut config = Config::default();
        config.apply_overrides(|key| match key {
            "RENTWISE_TOKEN_POLICY" => Some("sometimes".to_string()),
            "RENTWISE_API_URL" => Some("http://10.0.0.2:8000".to_string()),
            _ => None,
        });

        assert_eq!(config.api.base_url, "http://10.0.0.2:8000");
        assert_eq!(config.session.token_policy, TokenPolicy::Expiry);
        assert_eq!(config.warnings.len(), 1);
        assert!(config.warnings[0].contains("sometimes"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
