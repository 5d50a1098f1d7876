//! Transcode requests, results and statistics

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use telecodec_codec_core::AudioFormat;

/// File → file transcode request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscodeJob {
    /// WAV file to read
    pub input_path: PathBuf,
    /// Raw encoded file to write (created or truncated)
    pub output_path: PathBuf,
    /// Target format
    pub format: AudioFormat,
}

impl TranscodeJob {
    /// Create a new job
    pub fn new(
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        format: AudioFormat,
    ) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            format,
        }
    }
}

/// Metadata of a validated input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileInfo {
    /// Source path, if the input came from a file
    pub path: Option<PathBuf>,
    /// Container type
    pub file_type: String,
    /// Bits per sample
    pub bit_depth: u16,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Channel count
    pub channels: u16,
    /// Samples per channel
    pub total_samples: usize,
    /// Duration in seconds
    pub duration_secs: f64,
    /// Container size in bytes
    pub size: u64,
}

impl FileInfo {
    /// Duration as a [`Duration`]
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.duration_secs)
    }
}

/// What was written
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputInfo {
    /// Destination path, if the sink was a file
    pub path: Option<PathBuf>,
    /// Encoded format
    pub format: AudioFormat,
    /// Bytes written
    pub size: u64,
}

/// Statistics for one transcode call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingStats {
    /// Wall time from request to finalized output
    pub processing_time: Duration,
    /// Output bytes / input bytes (below 1.0 means the output is smaller)
    pub compression_ratio: f64,
    /// Nominal bitrate of the output format in kbps
    pub bitrate_kbps: f64,
    /// Input samples consumed
    pub samples_processed: usize,
    /// Encode units submitted (samples for G.711/SLIN, 80-sample frames for G.729)
    pub frames_processed: usize,
}

impl ProcessingStats {
    /// Processing time in whole milliseconds
    pub fn processing_time_ms(&self) -> u128 {
        self.processing_time.as_millis()
    }
}

/// Result of a successful transcode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscodeResult {
    /// Input metadata
    pub input: FileInfo,
    /// Output metadata
    pub output: OutputInfo,
    /// Processing statistics
    pub stats: ProcessingStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_deserialize() {
        let job: TranscodeJob = serde_json::from_str(
            r#"{"input_path": "in.wav", "output_path": "out.alaw", "format": "alaw"}"#,
        )
        .unwrap();
        assert_eq!(job, TranscodeJob::new("in.wav", "out.alaw", AudioFormat::ALaw));
    }

    #[test]
    fn test_processing_time_ms() {
        let stats = ProcessingStats {
            processing_time: Duration::from_micros(12_500),
            compression_ratio: 0.5,
            bitrate_kbps: 64.0,
            samples_processed: 10,
            frames_processed: 10,
        };
        assert_eq!(stats.processing_time_ms(), 12);
    }

    #[test]
    fn test_file_info_duration() {
        let info = FileInfo {
            path: None,
            file_type: "WAVE".to_string(),
            bit_depth: 16,
            sample_rate: 8000,
            channels: 1,
            total_samples: 16000,
            duration_secs: 2.0,
            size: 32044,
        };
        assert_eq!(info.duration(), Duration::from_secs(2));
    }
}
