//! Error handling for the codec library
//!
//! Every failure carries a variant that callers can match on. In particular
//! "codec not available" is kept apart from "unsupported format" so a batch
//! caller can skip G.729 on builds without the native library and keep going
//! with the other formats.

#![allow(missing_docs)]

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;

/// Error type for codec operations
#[derive(Error, Debug)]
pub enum CodecError {
    /// Format identifier could not be parsed
    #[error("Invalid audio format: {name:?}")]
    InvalidFormat { name: String },

    /// Format identifier is not one the factory can dispatch on
    #[error("Unsupported format: {name:?}")]
    UnsupportedFormat { name: String },

    /// Codec exists in the format set but cannot be used in this build/process
    #[error("Codec not available: {codec} ({reason})")]
    CodecNotAvailable { codec: String, reason: String },

    /// Encoding operation failed
    #[error("Encoding failed: {reason}")]
    EncodingFailed { reason: String },

    /// Decoding operation failed
    #[error("Decoding failed: {reason}")]
    DecodingFailed { reason: String },

    /// Caller-provided buffer does not fit the result
    #[error("Buffer too small: need {needed}, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    /// The byte sink or source failed
    #[error("I/O operation failed: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    /// Create a new invalid format error
    pub fn invalid_format(name: impl Into<String>) -> Self {
        Self::InvalidFormat { name: name.into() }
    }

    /// Create a new unsupported format error
    pub fn unsupported_format(name: impl Into<String>) -> Self {
        Self::UnsupportedFormat { name: name.into() }
    }

    /// Create a new codec not available error
    pub fn codec_not_available(codec: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CodecNotAvailable {
            codec: codec.into(),
            reason: reason.into(),
        }
    }

    /// Create a new encoding failed error
    pub fn encoding_failed(reason: impl Into<String>) -> Self {
        Self::EncodingFailed {
            reason: reason.into(),
        }
    }

    /// Create a new decoding failed error
    pub fn decoding_failed(reason: impl Into<String>) -> Self {
        Self::DecodingFailed {
            reason: reason.into(),
        }
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidFormat { .. } => ErrorKind::InvalidFormat,
            Self::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            Self::CodecNotAvailable { .. } => ErrorKind::CodecNotAvailable,
            Self::EncodingFailed { .. }
            | Self::DecodingFailed { .. }
            | Self::BufferTooSmall { .. } => ErrorKind::Encoding,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    /// Whether processing other formats can continue after this error
    ///
    /// Only configuration-level problems with the requested codec qualify;
    /// the input and the remaining encoders are unaffected by them.
    pub fn is_format_scoped(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::CodecNotAvailable | ErrorKind::UnsupportedFormat | ErrorKind::InvalidFormat
        )
    }
}

/// Coarse classification shared by the codec and transcoder error types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Format identifier not recognized
    InvalidFormat,
    /// Format identifier not recognized by the dispatcher
    UnsupportedFormat,
    /// Input audio does not meet the 8kHz/mono/16-bit contract
    InvalidInput,
    /// Output sink could not be created or written
    InvalidOutput,
    /// Requested codec is not compiled in or failed to initialize
    CodecNotAvailable,
    /// Codec processing failed
    Encoding,
    /// Generic I/O failure
    Io,
    /// Configuration could not be loaded
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvalidFormat => "invalid format",
            Self::UnsupportedFormat => "unsupported format",
            Self::InvalidInput => "invalid input",
            Self::InvalidOutput => "invalid output",
            Self::CodecNotAvailable => "codec not available",
            Self::Encoding => "encoding",
            Self::Io => "I/O",
            Self::Config => "configuration",
        };
        f.write_str(name)
    }
}
