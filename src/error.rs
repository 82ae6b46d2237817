//! Error types for the telephony framing pipeline

use thiserror::Error;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum Error {
    /// A sample rate, capacity or frame size that cannot be used
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Encoded input whose length does not match the sample width
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Resampling failed: {0}")]
    Resample(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    pub(crate) fn invalid_parameter(msg: impl Into<String>) -> Self {
        Error::InvalidParameter(msg.into())
    }

    pub(crate) fn malformed_input(msg: impl Into<String>) -> Self {
        Error::MalformedInput(msg.into())
    }
}

/// Result type alias for the crate
pub type Result<T> = std::result::Result<T, Error>;
