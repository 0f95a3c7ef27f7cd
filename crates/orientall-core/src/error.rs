//! Error types shared by the OrientAll crates.
//!
//! Every failed weather lookup ends up as a [`WeatherError`] with a fixed
//! [`ErrorKind`]. `Display` keeps the diagnostic detail for logs while
//! `user_message()` is the only text meant for people.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::API_KEY_ENV;

/// Process-level error returned by startup and the serve loop.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Weather lookup failed: {0}")]
    Weather(#[from] WeatherError),

    #[error("Bad configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport failure: {0}")]
    Network(#[from] NetworkError),

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Lift an `anyhow` error from config loading, keeping a [`ConfigError`] typed.
    pub fn from_anyhow(err: anyhow::Error) -> Self {
        match err.downcast::<ConfigError>() {
            Ok(config) => Self::Config(config),
            Err(other) => Self::Other(other),
        }
    }

    /// Returns a user-friendly message suitable for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Weather(e) => e.user_message(),
            Self::Config(e) => e.user_message(),
            Self::Network(e) => e.user_message(),
            Self::Io(_) => "OrientAll could not open its listening socket or config file.",
            Self::Other(_) => "OrientAll hit an unexpected problem.",
        }
    }
}

/// Outbound HTTP failures, before they are mapped to a weather error kind.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Could not reach host: {0}")]
    ConnectionFailed(String),

    #[error("Timed out waiting for a response")]
    Timeout,

    #[error("Unreadable response body: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::ConnectionFailed(_) => "The weather service could not be reached.",
            Self::Timeout => "The weather service took too long to answer.",
            Self::InvalidResponse(_) => "The weather service sent back something unreadable.",
        }
    }

    /// Whether the failure came from the transport rather than the remote application.
    pub fn is_transport_failure(&self) -> bool {
        match self {
            Self::ConnectionFailed(_) | Self::Timeout => true,
            Self::InvalidResponse(_) => false,
        }
    }
}

/// Problems found while loading `config.toml` and the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config rejected: {0}")]
    Invalid(String),

    #[error("Config file unreadable: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Invalid(_) => "OrientAll settings are invalid. Fix config.toml or the ORIENTALL_* variables.",
            Self::ParseError(_) => "config.toml is not valid TOML.",
        }
    }
}

/// Classification of a failed weather lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    ConfigurationError,
    EmptyResponse,
    MalformedResponse,
    LocationNotFound,
    IncompleteData,
    InvalidCredential,
    ServiceUnavailable,
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigurationError => "ConfigurationError",
            Self::EmptyResponse => "EmptyResponse",
            Self::MalformedResponse => "MalformedResponse",
            Self::LocationNotFound => "LocationNotFound",
            Self::IncompleteData => "IncompleteData",
            Self::InvalidCredential => "InvalidCredential",
            Self::ServiceUnavailable => "ServiceUnavailable",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weather lookup errors. Every variant carries a diagnostic message for logs;
/// `user_message()` is what gets shown to people.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    #[error("Weather service is not configured: {0}")]
    Configuration(String),

    #[error("The AI returned an empty response")]
    EmptyResponse,

    #[error("Malformed AI response: {0}")]
    MalformedResponse(String),

    #[error("{0}")]
    LocationNotFound(String),

    #[error("Incomplete weather data: {0}")]
    IncompleteData(String),

    #[error("Credential rejected: {0}")]
    InvalidCredential(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("{0}")]
    Unknown(String),
}

impl WeatherError {
    /// Rebuild an error from a kind and message, e.g. when decoding a proxy response.
    pub fn from_kind(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            ErrorKind::ConfigurationError => Self::Configuration(message),
            ErrorKind::EmptyResponse => Self::EmptyResponse,
            ErrorKind::MalformedResponse => Self::MalformedResponse(message),
            ErrorKind::LocationNotFound => Self::LocationNotFound(message),
            ErrorKind::IncompleteData => Self::IncompleteData(message),
            ErrorKind::InvalidCredential => Self::InvalidCredential(message),
            ErrorKind::ServiceUnavailable => Self::ServiceUnavailable(message),
            ErrorKind::Unknown => Self::Unknown(message),
        }
    }

    /// The error raised when no credential is configured.
    pub fn missing_credential() -> Self {
        Self::Configuration(format!("{API_KEY_ENV} is not set"))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::ConfigurationError,
            Self::EmptyResponse => ErrorKind::EmptyResponse,
            Self::MalformedResponse(_) => ErrorKind::MalformedResponse,
            Self::LocationNotFound(_) => ErrorKind::LocationNotFound,
            Self::IncompleteData(_) => ErrorKind::IncompleteData,
            Self::InvalidCredential(_) => ErrorKind::InvalidCredential,
            Self::ServiceUnavailable(_) => ErrorKind::ServiceUnavailable,
            Self::Unknown(_) => ErrorKind::Unknown,
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Configuration(_) => {
                "The weather service is not configured. Set the API_KEY environment variable \
                 on the server, then restart or redeploy it."
            }
            Self::EmptyResponse => {
                "The AI returned an empty response. The model may be temporarily unavailable. \
                 Please try again later."
            }
            Self::MalformedResponse(_) => {
                "The AI returned data in an unexpected format. Please try a different location."
            }
            Self::LocationNotFound(_) => {
                "Sorry, we could not find weather data for that location. Please try a different city."
            }
            Self::IncompleteData(_) => "The AI returned incomplete weather data. Please try again.",
            Self::InvalidCredential(_) => {
                "The configured API key is not valid. Check the API_KEY value for typos or extra spaces."
            }
            Self::ServiceUnavailable(_) => {
                "The weather service is temporarily unavailable. Please try again in a few minutes."
            }
            Self::Unknown(_) => "An unexpected error occurred while fetching weather data.",
        }
    }
}

/// Maps reqwest failures onto [`NetworkError`].
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_connect() {
            NetworkError::ConnectionFailed(self.to_string())
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}
