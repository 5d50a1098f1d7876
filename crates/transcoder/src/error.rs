//! Error types for the transcoder
//!
//! Failures are wrapped with the step that produced them
//! ("input validation failed: ...", "encoder acquisition failed: ...") while
//! [`TranscodeError::kind`] still reports the root cause, so a batch caller
//! can tell an unavailable codec from bad input and carry on.

use std::path::Path;
use telecodec_codec_core::CodecError;
use thiserror::Error;

pub use telecodec_codec_core::ErrorKind;

/// Result type alias for transcoder operations
pub type Result<T> = std::result::Result<T, TranscodeError>;

/// Error type for transcoder operations
#[derive(Error, Debug)]
pub enum TranscodeError {
    /// Input is missing, unreadable, or not 8kHz/mono/16-bit PCM WAV
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Violated constraint and the value found
        reason: String,
    },

    /// Output sink could not be created or written
    #[error("invalid output {target}: {source}")]
    InvalidOutput {
        /// Output path, or `writer` for caller-supplied sinks
        target: String,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Codec layer failure (format lookup, availability, encoding)
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// I/O failure not attributable to the input or output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be loaded or applied
    #[error("configuration error: {0}")]
    Config(String),

    /// Another error tagged with the operation that failed
    #[error("{context}: {source}")]
    Context {
        /// Failed operation
        context: String,
        /// Wrapped error
        #[source]
        source: Box<TranscodeError>,
    },
}

impl TranscodeError {
    /// Create a new invalid input error
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Create a new invalid output error for a file path
    pub fn invalid_output(path: &Path, source: std::io::Error) -> Self {
        Self::InvalidOutput {
            target: path.display().to_string(),
            source,
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Wrap this error with a description of the failed operation
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, below any context layers
    pub fn root(&self) -> &TranscodeError {
        match self {
            Self::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// Kind of the root cause
    pub fn kind(&self) -> ErrorKind {
        match self.root() {
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::InvalidOutput { .. } => ErrorKind::InvalidOutput,
            Self::Codec(e) => e.kind(),
            Self::Io(_) => ErrorKind::Io,
            Self::Config(_) => ErrorKind::Config,
            Self::Context { .. } => unreachable!("root() strips context layers"),
        }
    }

    /// Whether the requested codec is missing from this build
    pub fn is_codec_not_available(&self) -> bool {
        self.kind() == ErrorKind::CodecNotAvailable
    }

    /// Whether the input failed validation
    pub fn is_invalid_input(&self) -> bool {
        self.kind() == ErrorKind::InvalidInput
    }
}

/// Extension trait for tagging results with the failed operation
pub trait ResultExt<T> {
    /// Wrap the error, if any, with `context`
    fn context(self, context: &str) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<TranscodeError>,
{
    fn context(self, context: &str) -> Result<T> {
        self.map_err(|e| e.into().context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_preserves_kind() {
        let err = TranscodeError::invalid_input("expected mono audio, got 2 channels")
            .context("input validation failed");
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(err.is_invalid_input());
        assert_eq!(
            err.to_string(),
            "input validation failed: invalid input: expected mono audio, got 2 channels"
        );
    }

    #[test]
    fn test_codec_kind_through_context() {
        let err: TranscodeError = CodecError::codec_not_available("g729", "not linked").into();
        let err = err.context("encoder acquisition failed");
        assert!(err.is_codec_not_available());
        assert!(!err.is_invalid_input());
        assert!(matches!(err.root(), TranscodeError::Codec(_)));
    }

    #[test]
    fn test_nested_context() {
        let err = TranscodeError::config("bad level")
            .context("inner")
            .context("outer");
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().starts_with("outer: inner: "));
    }

    #[test]
    fn test_result_ext() {
        let res: std::result::Result<(), CodecError> = Err(CodecError::unsupported_format("mp3"));
        let err = res.context("encoder acquisition failed").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
        assert!(err.to_string().starts_with("encoder acquisition failed: "));
    }

    #[test]
    fn test_invalid_output_kind() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = TranscodeError::invalid_output(Path::new("/out/x.ulaw"), io);
        assert_eq!(err.kind(), ErrorKind::InvalidOutput);
        assert!(err.to_string().contains("/out/x.ulaw"));
    }
}
