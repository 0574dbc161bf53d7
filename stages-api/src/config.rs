//! Server configuration.
//!
//! Values come from an optional TOML file named by `STAGES_API_CONFIG`,
//! then `STAGES_API_*` environment variables override individual fields.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::auth::TokenEntry;
use crate::observability::LoggingConfig;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "STAGES_API_CONFIG";

const BIND_ADDR_ENV: &str = "STAGES_API_BIND_ADDR";
const LOG_LEVEL_ENV: &str = "STAGES_API_LOG_LEVEL";
const LOG_JSON_ENV: &str = "STAGES_API_LOG_JSON";
const SEED_PATH_ENV: &str = "STAGES_API_SEED_PATH";

/// Errors loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field holds an unusable value.
    #[error("Invalid value for field '{field}': {reason}")]
    InvalidValue {
        /// Offending field.
        field: String,
        /// Why it is unusable.
        reason: String,
    },
}

impl ConfigError {
    fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Token authentication settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Whether API routes require a bearer token.
    #[serde(default = "default_auth_enabled")]
    pub enabled: bool,
    /// Accepted tokens.
    #[serde(default)]
    pub tokens: Vec<TokenEntry>,
}

fn default_auth_enabled() -> bool {
    true
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: default_auth_enabled(),
            tokens: Vec::new(),
        }
    }
}

/// Top-level server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Logging options.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Authentication options.
    #[serde(default)]
    pub auth: AuthConfig,
    /// JSON file of pipelines, events and stages to serve.
    #[serde(default)]
    pub seed_path: Option<PathBuf>,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            logging: LoggingConfig::default(),
            auth: AuthConfig::default(),
            seed_path: None,
        }
    }
}

impl ServerConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Reads a TOML file, or returns defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Loads from the process environment: file first, then overrides,
    /// then validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
        let mut config = Self::load(path.as_deref())?;
        config.apply_env(std::env::vars())?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `STAGES_API_*` overrides from the given variables.
    pub fn apply_env<I>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            match key.as_str() {
                BIND_ADDR_ENV => self.bind_addr = value,
                LOG_LEVEL_ENV => self.logging.level = value,
                LOG_JSON_ENV => {
                    self.logging.json = parse_flag(&value)
                        .ok_or_else(|| ConfigError::invalid(LOG_JSON_ENV, "expected true or false"))?;
                }
                SEED_PATH_ENV => self.seed_path = Some(PathBuf::from(value)),
                _ => {}
            }
        }
        Ok(())
    }

    /// Checks that every field is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.socket_addr()?;

        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::invalid("logging.level", "must not be empty"));
        }

        if self.auth.enabled {
            if self.auth.tokens.is_empty() {
                return Err(ConfigError::invalid(
                    "auth.tokens",
                    "at least one token is required when auth is enabled",
                ));
            }
            for (index, entry) in self.auth.tokens.iter().enumerate() {
                if entry.token.trim().is_empty() {
                    return Err(ConfigError::invalid(
                        format!("auth.tokens[{index}].token"),
                        "must not be empty",
                    ));
                }
                if entry.scopes.is_empty() {
                    return Err(ConfigError::invalid(
                        format!("auth.tokens[{index}].scopes"),
                        "must grant at least one scope",
                    ));
                }
            }
        }

        Ok(())
    }

    /// Parses the bind address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_addr
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::invalid("bind_addr", e.to_string()))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
