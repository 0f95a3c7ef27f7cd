use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;

/// Environment variable holding the generative-AI credential.
pub const API_KEY_ENV: &str = "API_KEY";

const ENV_PREFIX: &str = "ORIENTALL_";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Generative-AI backend settings
    #[serde(default)]
    pub ai: AiConfig,

    /// HTTP proxy settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Generative-AI backend configuration.
///
/// The credential is never written to disk and is redacted from `Debug` output.
#[derive(Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Credential for the AI service; normally supplied through `API_KEY`
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Model used for weather lookups
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the generative language API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl AiConfig {
    /// Check if a usable credential is present (not empty, not a placeholder)
    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    /// The credential, if one is configured
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && !k.starts_with("YOUR_") && *k != "DISABLED")
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP proxy binds to
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Port the HTTP proxy listens on
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8888
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

impl Config {
    /// Load configuration from the config file (if present) and the process environment
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        let mut config = Self::load_from(path.as_deref())?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Read a TOML config file, falling back to defaults when it does not exist
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path.filter(|p| p.exists()) else {
            return Ok(Self::default());
        };

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;
        Ok(config)
    }

    /// Apply environment overrides using the given lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let prefixed = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(key) = lookup(API_KEY_ENV) {
            self.ai.api_key = Some(key);
        }
        if let Some(model) = prefixed("AI_MODEL") {
            self.ai.model = model;
        }
        if let Some(base_url) = prefixed("AI_BASE_URL") {
            self.ai.base_url = base_url;
        }
        if let Some(timeout) = prefixed("AI_TIMEOUT_SECS") {
            self.ai.timeout_secs = timeout
                .trim()
                .parse()
                .with_context(|| format!("Invalid {ENV_PREFIX}AI_TIMEOUT_SECS: {timeout}"))?;
        }
        if let Some(bind) = prefixed("BIND") {
            self.server.bind = bind;
        }
        if let Some(port) = prefixed("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid {ENV_PREFIX}PORT: {port}"))?;
        }

        Ok(())
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.ai.base_url, "ai.base_url", &mut result);

        if self.ai.model.trim().is_empty() {
            result.add_error("ai.model", "Model name must not be empty");
        }

        if self.ai.timeout_secs == 0 {
            result.add_error("ai.timeout_secs", "Timeout must be greater than 0");
        } else if self.ai.timeout_secs > 120 {
            result.add_error("ai.timeout_secs", "Timeout cannot exceed 120 seconds");
        }

        if self.server.port == 0 {
            result.add_error("server.port", "Port cannot be 0");
        }

        // Missing credential is surfaced per request, not at startup
        if !self.ai.is_configured() {
            result.add_warning(
                "ai.api_key",
                format!("{API_KEY_ENV} is not set - weather lookups will report a configuration error"),
            );
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("orientall").join("config.toml"))
    }
}
