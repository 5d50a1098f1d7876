//! Format encoders and factory

use crate::error::{CodecError, Result};
use crate::types::AudioFormat;
use std::io::Write;
use tracing::debug;

pub mod companding;
pub mod g711;
pub mod g729;
pub mod slin;

pub use g711::{AlawEncoder, UlawEncoder};
pub use g729::G729Encoder;
pub use slin::SlinEncoder;

/// Samples encoded per `write_all` call by the per-sample encoders
pub(crate) const CHUNK_SAMPLES: usize = 512;

/// Trait for output format encoders
///
/// Encoders stream into `sink` as they go; nothing requires the whole output
/// to sit in memory. A failed write stops the encode immediately and the sink
/// keeps whatever was written before the failure.
pub trait FormatEncoder: Send {
    /// Encode `samples` in order and write the result to `sink`
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Io`] if the sink fails, or a codec error if the
    /// underlying codec rejects a frame.
    fn encode(&mut self, samples: &[i16], sink: &mut dyn Write) -> Result<()>;

    /// Format this encoder produces
    fn format(&self) -> AudioFormat;

    /// Nominal bitrate in kbps
    fn bitrate_kbps(&self) -> f64 {
        self.format().nominal_bitrate_kbps()
    }

    /// Samples consumed per encode unit
    fn frame_size(&self) -> usize {
        self.format().frame_size()
    }
}

/// Factory for creating encoder instances
pub struct EncoderFactory;

impl EncoderFactory {
    /// Create a fresh encoder for `format`
    ///
    /// μ-law, A-law and SLIN never fail. G.729 needs the native codec and
    /// returns [`CodecError::CodecNotAvailable`] when it is missing or fails
    /// to initialize; the returned encoder owns the native handle and releases
    /// it when dropped.
    pub fn create(format: AudioFormat) -> Result<Box<dyn FormatEncoder>> {
        let encoder: Box<dyn FormatEncoder> = match format {
            AudioFormat::G729 => Box::new(G729Encoder::open()?),
            AudioFormat::ULaw => Box::new(UlawEncoder),
            AudioFormat::ALaw => Box::new(AlawEncoder),
            AudioFormat::Slin => Box::new(SlinEncoder),
        };

        debug!(format = %format, bitrate_kbps = encoder.bitrate_kbps(), "Created encoder");
        Ok(encoder)
    }

    /// Create an encoder from a format identifier
    ///
    /// Accepts the same spellings as [`AudioFormat::from_str`](std::str::FromStr).
    pub fn create_by_name(name: &str) -> Result<Box<dyn FormatEncoder>> {
        let format = name
            .parse::<AudioFormat>()
            .map_err(|_| CodecError::unsupported_format(name))?;
        Self::create(format)
    }

    /// All formats the factory dispatches on
    pub fn supported_formats() -> Vec<AudioFormat> {
        AudioFormat::all().to_vec()
    }

    /// Whether an encoder for `format` can be built in this build
    pub fn is_available(format: AudioFormat) -> bool {
        match format {
            AudioFormat::G729 => g729::native_available(),
            AudioFormat::ULaw | AudioFormat::ALaw | AudioFormat::Slin => true,
        }
    }
}
