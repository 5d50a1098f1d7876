//! # Codec-Core: telephony output codecs
//!
//! Converts 16-bit linear PCM samples (8kHz mono) into one of four telephony
//! output formats:
//!
//! - **μ-law** and **A-law**: ITU-T G.711 style logarithmic companding, one byte per sample
//! - **SLIN**: signed linear passthrough, two little-endian bytes per sample
//! - **G.729**: CELP speech coding through the native libbcg729 library
//!   (cargo feature `g729-native`), ≤10 bytes per 80-sample frame
//!
//! ## Usage
//!
//! ```rust
//! use telecodec_codec_core::{AudioFormat, EncoderFactory, FormatEncoder};
//!
//! let mut encoder = EncoderFactory::create(AudioFormat::ULaw)?;
//!
//! let samples = vec![0i16; 160]; // 20ms at 8kHz
//! let mut output = Vec::new();
//! encoder.encode(&samples, &mut output)?;
//! assert_eq!(output.len(), 160);
//! # Ok::<(), telecodec_codec_core::CodecError>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `g729-native`: link libbcg729 and enable the G.729 encoder/decoder

#![warn(missing_docs)]

pub mod codecs;
pub mod error;
pub mod types;

pub use codecs::companding::{encode_alaw, encode_slin, encode_ulaw};
pub use codecs::g729::{G729Decoder, G729Encoder};
pub use codecs::{EncoderFactory, FormatEncoder};
pub use error::{CodecError, ErrorKind, Result};
pub use types::AudioFormat;

/// Version information for the codec library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Sample rate every encoder in this crate expects, in Hz
pub const SAMPLE_RATE: u32 = 8000;

/// Channel count every encoder in this crate expects
pub const CHANNELS: u16 = 1;

/// Bit depth of the linear PCM input
pub const BITS_PER_SAMPLE: u16 = 16;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports_cover_all_formats() {
        for format in AudioFormat::all() {
            assert_eq!(format.name().parse::<AudioFormat>().unwrap(), *format);
        }
    }
}
