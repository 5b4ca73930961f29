//! Error types for the bridge.

use thiserror::Error;

/// Main error type for all bridge operations.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// I/O error on the device handle.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serial port open/configuration error.
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// Configuration file could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Downstream remote-call error.
    #[error("downstream error: {0}")]
    Downstream(#[from] reqwest::Error),

    /// Protocol-level violation (bad frame shape, oversized length, etc.).
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Device connection closed while the bridge still needed it.
    #[error("connection closed")]
    ConnectionClosed,
}

/// Result type alias using BridgeError.
pub type Result<T> = std::result::Result<T, BridgeError>;
