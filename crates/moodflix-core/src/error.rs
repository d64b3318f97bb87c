//! Error types for the MoodFlix client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire MoodFlix client.
///
/// Every collaborator boundary (camera, inference, HTTP backends, local
/// storage) maps its failures into one of these variants so the capture loop
/// can decide, per variant, whether a failure is terminal or transient.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum MoodflixError {
    /// Camera permission denied or no capture device available
    #[error("Camera error: {message}")]
    Camera { message: String },

    /// Model loading or per-frame detection failure
    #[error("Inference error: {0}")]
    Inference(String),

    /// Transport-level failure (connection refused, timeout, DNS)
    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered, but not with a usable success response
    #[error("HTTP error ({status}): {message}")]
    Http { status: u16, message: String },

    /// Login/signup rejected; the message is shown to the user verbatim
    #[error("{0}")]
    Authentication(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Expression sample with a confidence outside [0, 1]
    #[error("Invalid expression sample: {0}")]
    InvalidSample(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MoodflixError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Camera error
    pub fn camera(message: impl Into<String>) -> Self {
        Self::Camera {
            message: message.into(),
        }
    }

    /// Creates an Inference error
    pub fn inference(message: impl Into<String>) -> Self {
        Self::Inference(message.into())
    }

    /// Creates a Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates an Http error
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates an Authentication error
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a Camera error
    pub fn is_camera(&self) -> bool {
        matches!(self, Self::Camera { .. })
    }

    /// Check if this is an Authentication error
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Returns true for failures that only affect the current cycle.
    ///
    /// The report client logs these at `warn`; anything else at `error`.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Inference(_) | Self::Network(_) | Self::Http { .. }
        )
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for MoodflixError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for MoodflixError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for MoodflixError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for MoodflixError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for MoodflixError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Serialization {
                format: "JSON".to_string(),
                message: err.to_string(),
            };
        }
        match err.status() {
            Some(status) => Self::Http {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => Self::Network(err.to_string()),
        }
    }
}

/// A type alias for `Result<T, MoodflixError>`.
pub type Result<T> = std::result::Result<T, MoodflixError>;
