//! Core types for the codec library

use crate::error::CodecError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output formats the transcoder can produce
///
/// The set is closed: dispatch on it is a plain `match`, never a lookup in a
/// runtime table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// G.729 CELP, 8 kbps, 80-sample frames
    G729,
    /// G.711 μ-law, 64 kbps
    ULaw,
    /// G.711 A-law, 64 kbps
    ALaw,
    /// Signed linear 16-bit little-endian, 128 kbps
    Slin,
}

const ALL_FORMATS: [AudioFormat; 4] = [
    AudioFormat::G729,
    AudioFormat::ULaw,
    AudioFormat::ALaw,
    AudioFormat::Slin,
];

impl AudioFormat {
    /// All formats, in canonical order
    pub fn all() -> &'static [AudioFormat] {
        &ALL_FORMATS
    }

    /// Canonical lowercase identifier
    pub fn name(self) -> &'static str {
        match self {
            Self::G729 => "g729",
            Self::ULaw => "ulaw",
            Self::ALaw => "alaw",
            Self::Slin => "slin",
        }
    }

    /// Conventional file extension for raw output in this format
    pub fn file_extension(self) -> &'static str {
        self.name()
    }

    /// Human-readable description
    pub fn description(self) -> &'static str {
        match self {
            Self::G729 => "G.729 CELP",
            Self::ULaw => "G.711 μ-law",
            Self::ALaw => "G.711 A-law",
            Self::Slin => "Signed linear PCM (16-bit LE)",
        }
    }

    /// Nominal bitrate in kbps
    ///
    /// A property of the format, not a measurement of an encode run.
    pub fn nominal_bitrate_kbps(self) -> f64 {
        match self {
            Self::G729 => 8.0,
            Self::ULaw | Self::ALaw => 64.0,
            Self::Slin => 128.0,
        }
    }

    /// Number of input samples consumed per encode unit
    pub fn frame_size(self) -> usize {
        match self {
            Self::G729 => 80,
            Self::ULaw | Self::ALaw | Self::Slin => 1,
        }
    }

    /// Upper bound on the encoded size of `samples` input samples
    pub fn max_encoded_len(self, samples: usize) -> usize {
        match self {
            Self::G729 => samples.div_ceil(80) * 10,
            Self::ULaw | Self::ALaw => samples,
            Self::Slin => samples * 2,
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AudioFormat {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "g729" => Ok(Self::G729),
            "ulaw" | "mulaw" | "pcmu" => Ok(Self::ULaw),
            "alaw" | "pcma" => Ok(Self::ALaw),
            "slin" | "linear" | "pcm" => Ok(Self::Slin),
            _ => Err(CodecError::invalid_format(s)),
        }
    }
}
