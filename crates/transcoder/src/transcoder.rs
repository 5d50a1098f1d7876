//! Transcoding orchestrator
//!
//! Every entry point runs the same pipeline:
//!
//! ```text
//! ValidateFormat -> ValidateInput -> AcquireEncoder -> DecodeSamples -> Encode -> Finalize
//! ```
//!
//! A failing stage returns immediately with its error tagged by the stage;
//! the encoder (and any native handle it owns) is dropped on every path.
//! Inputs are read fully into memory and outputs go through a byte counter,
//! so file and stream entry points report identical statistics for
//! identical content.

use crate::config::TranscoderOptions;
use crate::error::{Result, ResultExt, TranscodeError};
use crate::types::{FileInfo, OutputInfo, ProcessingStats, TranscodeJob, TranscodeResult};
use crate::wav::WavInput;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use telecodec_codec_core::{AudioFormat, CodecError, EncoderFactory, FormatEncoder};
use tracing::{debug, info, info_span, warn};

/// Pipeline stages, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Resolve and check the target format
    ValidateFormat,
    /// Read the input and check its header
    ValidateInput,
    /// Build the encoder for the target format
    AcquireEncoder,
    /// Decode all input samples
    DecodeSamples,
    /// Encode samples into the sink
    Encode,
    /// Flush the sink and compute statistics
    Finalize,
}

impl Stage {
    /// Context attached to errors raised in this stage
    pub fn failure_context(self) -> &'static str {
        match self {
            Self::ValidateFormat => "format validation failed",
            Self::ValidateInput => "input validation failed",
            Self::AcquireEncoder => "encoder acquisition failed",
            Self::DecodeSamples => "failed to read WAV samples",
            Self::Encode => "encoding failed",
            Self::Finalize => "failed to finalize output",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Where the WAV bytes come from
enum Source<'a> {
    File(&'a Path),
    Reader(&'a mut dyn Read),
}

/// Where the encoded bytes go
enum Sink<'a> {
    File(&'a Path),
    Writer(&'a mut dyn Write),
}

/// Writer adapter that counts bytes passed through
struct CountingWriter<W> {
    inner: W,
    written: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Outcome of one format in a batch
#[derive(Debug)]
pub struct FormatOutcome {
    /// Requested format
    pub format: AudioFormat,
    /// Planned output path
    pub output_path: PathBuf,
    /// Result of the transcode
    pub result: Result<TranscodeResult>,
}

/// Outcomes of a batch, one per requested format
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Per-format outcomes in request order
    pub outcomes: Vec<FormatOutcome>,
}

impl BatchReport {
    /// Number of formats that transcoded successfully
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Number of formats that failed
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// WAV to telephony format transcoder
///
/// Holds no per-call state, so one instance can serve concurrent calls from
/// several threads; each call builds its own encoder.
#[derive(Debug, Clone, Default)]
pub struct Transcoder {
    options: TranscoderOptions,
}

impl Transcoder {
    /// Create a new transcoder
    pub fn new(options: TranscoderOptions) -> Self {
        Self { options }
    }

    /// Transcoder options
    pub fn options(&self) -> &TranscoderOptions {
        &self.options
    }

    /// Formats this transcoder can be asked for
    pub fn supported_formats(&self) -> Vec<AudioFormat> {
        EncoderFactory::supported_formats()
    }

    /// Resolve a format identifier
    ///
    /// # Errors
    ///
    /// Unknown identifiers fail with [`CodecError::UnsupportedFormat`].
    pub fn parse_format(name: &str) -> Result<AudioFormat> {
        name.parse::<AudioFormat>()
            .map_err(|_| TranscodeError::from(CodecError::unsupported_format(name)))
            .context(Stage::ValidateFormat.failure_context())
    }

    /// Transcode a WAV file into a raw file
    pub fn transcode(&self, job: &TranscodeJob) -> Result<TranscodeResult> {
        self.run(
            Source::File(&job.input_path),
            Sink::File(&job.output_path),
            job.format,
        )
    }

    /// Transcode WAV bytes from `reader` into a raw file
    pub fn transcode_from_reader<R: Read>(
        &self,
        mut reader: R,
        output_path: impl AsRef<Path>,
        format: AudioFormat,
    ) -> Result<TranscodeResult> {
        self.run(
            Source::Reader(&mut reader),
            Sink::File(output_path.as_ref()),
            format,
        )
    }

    /// Transcode a WAV file into `writer`
    ///
    /// The writer is flushed but not closed.
    pub fn transcode_to_writer<W: Write>(
        &self,
        input_path: impl AsRef<Path>,
        mut writer: W,
        format: AudioFormat,
    ) -> Result<TranscodeResult> {
        self.run(
            Source::File(input_path.as_ref()),
            Sink::Writer(&mut writer),
            format,
        )
    }

    /// Validate a WAV file without encoding it
    pub fn validate_input(&self, input_path: impl AsRef<Path>) -> Result<FileInfo> {
        let input = open_input(Source::File(input_path.as_ref()))
            .context(Stage::ValidateInput.failure_context())?;
        Ok(input.info().clone())
    }

    /// Transcode one input into several formats
    ///
    /// Outputs are written to `output_dir` as `<input stem>.<format>`. A
    /// failing format is recorded in the report and the remaining formats
    /// still run.
    pub fn transcode_all(
        &self,
        input_path: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
        formats: &[AudioFormat],
    ) -> Result<BatchReport> {
        let input_path = input_path.as_ref();
        let output_dir = output_dir.as_ref();

        fs::create_dir_all(output_dir)
            .map_err(|e| TranscodeError::invalid_output(output_dir, e))?;

        let stem = input_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output");

        let mut report = BatchReport::default();
        for (index, &format) in formats.iter().enumerate() {
            let output_path = output_dir.join(format!("{}.{}", stem, format.file_extension()));
            info!(
                "[{}/{}] Converting {} to {}",
                index + 1,
                formats.len(),
                input_path.display(),
                format
            );

            let result = self.transcode(&TranscodeJob::new(input_path, &output_path, format));
            if let Err(e) = &result {
                warn!(format = %format, kind = %e.kind(), "Conversion failed: {}", e);
            }

            report.outcomes.push(FormatOutcome {
                format,
                output_path,
                result,
            });
        }

        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            "Batch complete"
        );
        Ok(report)
    }

    fn run(
        &self,
        source: Source<'_>,
        sink: Sink<'_>,
        format: AudioFormat,
    ) -> Result<TranscodeResult> {
        let start = Instant::now();
        let _span = info_span!("transcode", format = %format).entered();

        // ValidateFormat: the format set is closed, only the target is logged
        debug!(
            stage = %Stage::ValidateFormat,
            "Target format {} ({})",
            format,
            format.description()
        );

        debug!(stage = %Stage::ValidateInput, "Reading input");
        let input = open_input(source).context(Stage::ValidateInput.failure_context())?;

        debug!(stage = %Stage::AcquireEncoder, "Creating encoder");
        let mut encoder =
            EncoderFactory::create(format).context(Stage::AcquireEncoder.failure_context())?;

        debug!(stage = %Stage::DecodeSamples, "Decoding samples");
        let (samples, input_info) = input
            .decode_samples()
            .context(Stage::DecodeSamples.failure_context())?;

        debug!(stage = %Stage::Encode, samples = samples.len(), "Encoding");
        let (output_path, output_size) = match sink {
            Sink::File(path) => {
                let file = File::create(path)
                    .map_err(|e| TranscodeError::invalid_output(path, e))
                    .context(Stage::Encode.failure_context())?;
                let mut out = CountingWriter::new(BufWriter::new(file));
                encode_into(encoder.as_mut(), &samples, &mut out, path.display())?;
                out.flush()
                    .map_err(|e| TranscodeError::invalid_output(path, e))
                    .context(Stage::Finalize.failure_context())?;
                (Some(path.to_path_buf()), out.written)
            }
            Sink::Writer(writer) => {
                let mut out = CountingWriter::new(writer);
                encode_into(encoder.as_mut(), &samples, &mut out, "writer")?;
                out.flush()
                    .map_err(invalid_writer)
                    .context(Stage::Finalize.failure_context())?;
                (None, out.written)
            }
        };

        debug!(stage = %Stage::Finalize, bytes = output_size, "Computing statistics");
        let compression_ratio = if input_info.size > 0 {
            output_size as f64 / input_info.size as f64
        } else {
            0.0
        };

        let result = TranscodeResult {
            output: OutputInfo {
                path: output_path,
                format,
                size: output_size,
            },
            stats: ProcessingStats {
                processing_time: start.elapsed(),
                compression_ratio,
                bitrate_kbps: encoder.bitrate_kbps(),
                samples_processed: samples.len(),
                frames_processed: samples.len().div_ceil(encoder.frame_size()),
            },
            input: input_info,
        };

        self.log_result(&result);
        Ok(result)
    }

    fn log_result(&self, result: &TranscodeResult) {
        let input = result
            .input
            .path
            .as_deref()
            .map_or_else(|| "<reader>".to_string(), |p| p.display().to_string());
        let output = result
            .output
            .path
            .as_deref()
            .map_or_else(|| "<writer>".to_string(), |p| p.display().to_string());

        if self.options.verbose {
            info!(
                input = %input,
                input_bytes = result.input.size,
                duration_secs = result.input.duration_secs,
                output = %output,
                output_bytes = result.output.size,
                format = %result.output.format,
                bitrate_kbps = result.stats.bitrate_kbps,
                processing_ms = result.stats.processing_time_ms() as u64,
                compression_pct = result.stats.compression_ratio * 100.0,
                samples = result.stats.samples_processed,
                "Transcoding complete"
            );
        } else {
            debug!(
                input = %input,
                output = %output,
                format = %result.output.format,
                output_bytes = result.output.size,
                "Transcoding complete"
            );
        }
    }
}

fn open_input(source: Source<'_>) -> Result<WavInput> {
    match source {
        Source::File(path) => {
            let bytes = fs::read(path).map_err(|e| {
                TranscodeError::invalid_input(format!("cannot read {}: {}", path.display(), e))
            })?;
            WavInput::open(bytes, Some(path.to_path_buf()))
        }
        Source::Reader(reader) => {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes).map_err(|e| {
                TranscodeError::invalid_input(format!("cannot read input stream: {}", e))
            })?;
            WavInput::open(bytes, None)
        }
    }
}

/// Encode into a counted sink, attributing sink I/O failures to the output
fn encode_into(
    encoder: &mut dyn FormatEncoder,
    samples: &[i16],
    out: &mut dyn Write,
    target: impl fmt::Display,
) -> Result<()> {
    encoder
        .encode(samples, out)
        .map_err(|e| match e {
            CodecError::Io(source) => TranscodeError::InvalidOutput {
                target: target.to_string(),
                source,
            },
            other => TranscodeError::from(other),
        })
        .context(Stage::Encode.failure_context())
}

fn invalid_writer(source: io::Error) -> TranscodeError {
    TranscodeError::InvalidOutput {
        target: "writer".to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use temp_dir::TempDir;
    use tracing_test::traced_test;

    fn write_wav(path: &Path, samples: &[i16]) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for &sample in samples {
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_counting_writer() {
        let mut out = CountingWriter::new(Vec::new());
        out.write_all(&[1, 2, 3]).unwrap();
        out.write_all(&[4]).unwrap();
        assert_eq!(out.written, 4);
        assert_eq!(out.inner, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_stage_context() {
        assert_eq!(
            Stage::ValidateInput.failure_context(),
            "input validation failed"
        );
        assert_eq!(Stage::AcquireEncoder.to_string(), "AcquireEncoder");
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(Transcoder::parse_format("ULAW").unwrap(), AudioFormat::ULaw);

        let err = Transcoder::parse_format("mp3").unwrap_err();
        assert_eq!(err.kind(), telecodec_codec_core::ErrorKind::UnsupportedFormat);
    }

    #[test]
    fn test_batch_report_counts() {
        let report = BatchReport {
            outcomes: vec![FormatOutcome {
                format: AudioFormat::G729,
                output_path: PathBuf::from("x.g729"),
                result: Err(TranscodeError::from(CodecError::codec_not_available("g729", "test"))),
            }],
        };
        assert_eq!(report.succeeded(), 0);
        assert_eq!(report.failed(), 1);
    }

    #[traced_test]
    #[test]
    fn test_verbose_logs_summary() {
        let dir = TempDir::new().unwrap();
        let input = dir.child("tone.wav");
        write_wav(&input, &[100; 800]);

        let transcoder = Transcoder::new(TranscoderOptions::verbose(true));
        transcoder
            .transcode(&TranscodeJob::new(&input, dir.child("tone.alaw"), AudioFormat::ALaw))
            .unwrap();

        assert!(logs_contain("Transcoding complete"));
        assert!(logs_contain("output_bytes=800"));
    }

    #[traced_test]
    #[test]
    fn test_failure_names_stage() {
        let dir = TempDir::new().unwrap();
        let err = Transcoder::default()
            .transcode(&TranscodeJob::new(
                dir.child("missing.wav"),
                dir.child("out.ulaw"),
                AudioFormat::ULaw,
            ))
            .unwrap_err();

        assert!(err.is_invalid_input());
        assert!(err.to_string().starts_with("input validation failed: "));
        assert!(logs_contain("Reading input"));
        assert!(!dir.child("out.ulaw").exists());
    }
}
