//! WAV input adapter
//!
//! Container parsing is delegated to `hound`. This module only enforces the
//! input contract (integer PCM, 16-bit, mono, 8000 Hz) and exposes the two
//! steps the transcoder needs separately: header validation and sample
//! decoding.

use crate::error::{Result, TranscodeError};
use crate::types::FileInfo;
use hound::{SampleFormat, WavReader, WavSpec};
use std::io::Cursor;
use std::path::PathBuf;
use telecodec_codec_core::{BITS_PER_SAMPLE, CHANNELS, SAMPLE_RATE};

/// Container type reported in [`FileInfo::file_type`]
pub const WAVE_TYPE: &str = "WAVE";

/// Check a WAV header against the input contract
///
/// # Errors
///
/// Returns [`TranscodeError::InvalidInput`] naming the first violated
/// constraint and the value found.
pub fn validate_spec(spec: &WavSpec) -> Result<()> {
    if spec.sample_format != SampleFormat::Int {
        return Err(TranscodeError::invalid_input(
            "expected integer PCM samples, got IEEE float",
        ));
    }
    if spec.bits_per_sample != BITS_PER_SAMPLE {
        return Err(TranscodeError::invalid_input(format!(
            "expected {}-bit samples, got {}-bit",
            BITS_PER_SAMPLE, spec.bits_per_sample
        )));
    }
    if spec.channels != CHANNELS {
        return Err(TranscodeError::invalid_input(format!(
            "expected mono audio, got {} channels",
            spec.channels
        )));
    }
    if spec.sample_rate != SAMPLE_RATE {
        return Err(TranscodeError::invalid_input(format!(
            "expected {} Hz sample rate, got {} Hz",
            SAMPLE_RATE, spec.sample_rate
        )));
    }
    Ok(())
}

/// A WAV input whose header passed validation
pub struct WavInput {
    reader: WavReader<Cursor<Vec<u8>>>,
    info: FileInfo,
}

impl WavInput {
    /// Parse and validate the header of an in-memory WAV container
    pub fn open(bytes: Vec<u8>, path: Option<PathBuf>) -> Result<Self> {
        let size = bytes.len() as u64;
        let reader = WavReader::new(Cursor::new(bytes)).map_err(|e| {
            TranscodeError::invalid_input(format!("unreadable WAV container: {}", e))
        })?;

        let spec = reader.spec();
        validate_spec(&spec)?;

        let total_samples = reader.duration() as usize;
        let info = FileInfo {
            path,
            file_type: WAVE_TYPE.to_string(),
            bit_depth: spec.bits_per_sample,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            total_samples,
            duration_secs: total_samples as f64 / f64::from(spec.sample_rate),
            size,
        };

        Ok(Self { reader, info })
    }

    /// Header metadata
    pub fn info(&self) -> &FileInfo {
        &self.info
    }

    /// Decode every sample, in order
    ///
    /// The sample count in the returned [`FileInfo`] reflects what was
    /// actually decoded.
    pub fn decode_samples(self) -> Result<(Vec<i16>, FileInfo)> {
        let Self { reader, mut info } = self;

        let samples = reader
            .into_samples::<i16>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| TranscodeError::invalid_input(format!("corrupt sample data: {}", e)))?;

        info.total_samples = samples.len();
        info.duration_secs = samples.len() as f64 / f64::from(info.sample_rate);
        Ok((samples, info))
    }
}

/// Validate and decode an in-memory WAV container in one step
pub fn read_wav(bytes: Vec<u8>) -> Result<(Vec<i16>, FileInfo)> {
    WavInput::open(bytes, None)?.decode_samples()
}
