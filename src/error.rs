//! # Error Types
//!
//! Custom error types for the DShot engine using `thiserror`.
//!
//! The protocol core itself never fails: bad input is clamped and corrupt
//! telemetry falls back to the cached value. These errors cover the layers
//! around it (configuration, file output, the signal transceiver).

use thiserror::Error;

/// Main error type for the DShot engine
#[derive(Debug, Error)]
pub enum DshotError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Telemetry serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Signal transceiver errors
    #[error("Transceiver error: {0}")]
    Transceiver(String),
}

/// Result type alias for the DShot engine
pub type Result<T> = std::result::Result<T, DshotError>;
