//! # Transcoder: WAV to telephony formats
//!
//! Reads 8kHz mono 16-bit PCM WAV input and writes raw G.729, μ-law, A-law
//! or SLIN output, reporting input metadata and processing statistics for
//! every call.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use telecodec_transcoder::{AudioFormat, TranscodeJob, Transcoder, TranscoderOptions};
//!
//! let transcoder = Transcoder::new(TranscoderOptions::default());
//! let result = transcoder.transcode(&TranscodeJob::new(
//!     "input.wav",
//!     "output.ulaw",
//!     AudioFormat::ULaw,
//! ))?;
//! println!("{} bytes written", result.output.size);
//! # Ok::<(), telecodec_transcoder::TranscodeError>(())
//! ```
//!
//! Inputs are accepted from files or any [`std::io::Read`]; outputs go to
//! files or any [`std::io::Write`]. [`Transcoder::transcode_all`] runs one
//! input through several formats and keeps going past per-format failures,
//! such as G.729 being unavailable in builds without `g729-native`.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod logging;
pub mod transcoder;
pub mod types;
pub mod wav;

pub use config::{BatchConfig, LogSettings, TranscoderOptions};
pub use error::{ErrorKind, Result, ResultExt, TranscodeError};
pub use logging::{log_startup, parse_log_level, setup_logging, LogFormat, LoggingConfig};
pub use transcoder::{BatchReport, FormatOutcome, Stage, Transcoder};
pub use types::{FileInfo, OutputInfo, ProcessingStats, TranscodeJob, TranscodeResult};
pub use wav::read_wav;

pub use telecodec_codec_core::{AudioFormat, CodecError, EncoderFactory};

/// Version information for the transcoder library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
