//! Batch command - one WAV file to several formats

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;
use telecodec_transcoder::{AudioFormat, BatchReport, ErrorKind, TranscodeResult, Transcoder};
use tracing::info;

use crate::report;

/// JSON view of one format's outcome
#[derive(Debug, Serialize)]
struct OutcomeView<'a> {
    format: AudioFormat,
    output_path: &'a Path,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a TranscodeResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Execute batch command
///
/// Fails only when every requested format failed.
pub fn execute(
    transcoder: &Transcoder,
    input: &Path,
    output_dir: &Path,
    formats: &[AudioFormat],
    json: bool,
) -> Result<ExitCode> {
    info!("📦 Converting {} to {} formats", input.display(), formats.len());

    let report = transcoder
        .transcode_all(input, output_dir, formats)
        .with_context(|| format!("cannot prepare {}", output_dir.display()))?;

    let mut stdout = io::stdout().lock();
    if json {
        report::write_json(&mut stdout, &views(&report))?;
    } else {
        write_summary(&mut stdout, &report)?;
    }
    stdout.flush()?;

    Ok(exit_code(&report))
}

fn views(report: &BatchReport) -> Vec<OutcomeView<'_>> {
    report
        .outcomes
        .iter()
        .map(|outcome| OutcomeView {
            format: outcome.format,
            output_path: &outcome.output_path,
            success: outcome.result.is_ok(),
            result: outcome.result.as_ref().ok(),
            error_kind: outcome.result.as_ref().err().map(|e| e.kind()),
            error: outcome.result.as_ref().err().map(|e| e.to_string()),
        })
        .collect()
}

fn write_summary(out: &mut dyn Write, report: &BatchReport) -> io::Result<()> {
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(result) => writeln!(
                out,
                "{} {:<5} {} ({} bytes, {:.1}% of input)",
                "✅".green(),
                outcome.format.name(),
                outcome.output_path.display(),
                result.output.size,
                result.stats.compression_ratio * 100.0
            )?,
            Err(e) => writeln!(
                out,
                "{} {:<5} {}",
                "❌".red(),
                outcome.format.name(),
                e
            )?,
        }
    }
    writeln!(
        out,
        "\n{} succeeded, {} failed",
        report.succeeded().to_string().green().bold(),
        report.failed().to_string().red().bold()
    )
}

fn exit_code(report: &BatchReport) -> ExitCode {
    if !report.outcomes.is_empty() && report.succeeded() == 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use telecodec_transcoder::{CodecError, FormatOutcome, TranscodeError};

    fn unavailable(format: AudioFormat) -> FormatOutcome {
        FormatOutcome {
            format,
            output_path: PathBuf::from(format!("out/in.{}", format.file_extension())),
            result: Err(TranscodeError::from(CodecError::codec_not_available(
                format.name(),
                "not linked",
            ))),
        }
    }

    #[test]
    fn test_exit_code_only_fails_when_everything_failed() {
        let report = BatchReport {
            outcomes: vec![unavailable(AudioFormat::G729)],
        };
        assert_eq!(exit_code(&report), ExitCode::FAILURE);
        assert_eq!(exit_code(&BatchReport::default()), ExitCode::SUCCESS);
    }

    #[test]
    fn test_json_view_of_failure() {
        let report = BatchReport {
            outcomes: vec![unavailable(AudioFormat::G729)],
        };
        let value = serde_json::to_value(views(&report)).unwrap();
        assert_eq!(value[0]["format"], "g729");
        assert_eq!(value[0]["success"], false);
        assert!(value[0].get("result").is_none());
        assert!(value[0]["error"].as_str().unwrap().contains("g729"));
    }

    #[test]
    fn test_summary_lists_failures() {
        let report = BatchReport {
            outcomes: vec![unavailable(AudioFormat::G729)],
        };
        let mut out = Vec::new();
        write_summary(&mut out, &report).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("g729"));
        assert!(text.contains("failed"));
    }
}
