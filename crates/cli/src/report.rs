//! Human and JSON rendering of results

use colored::Colorize;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;
use telecodec_transcoder::{FileInfo, TranscodeResult};

/// Write `value` as pretty JSON followed by a newline
pub fn write_json<T: Serialize>(out: &mut dyn Write, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}

/// Describe a path, or a placeholder for streams
pub fn display_path(path: Option<&Path>, placeholder: &str) -> String {
    path.map_or_else(|| placeholder.to_string(), |p| p.display().to_string())
}

/// Print a conversion result
pub fn write_result(out: &mut dyn Write, result: &TranscodeResult, json: bool) -> io::Result<()> {
    if json {
        return write_json(out, result);
    }

    let format = result.output.format;
    writeln!(
        out,
        "{} {} → {} ({})",
        "✅ Converted".green().bold(),
        display_path(result.input.path.as_deref(), "<stdin>"),
        display_path(result.output.path.as_deref(), "<stdout>"),
        format.description()
    )?;
    writeln!(
        out,
        "   Input:   {:.2}s, {} samples, {} bytes",
        result.input.duration_secs, result.input.total_samples, result.input.size
    )?;
    writeln!(
        out,
        "   Output:  {} bytes ({:.1}% of input)",
        result.output.size,
        result.stats.compression_ratio * 100.0
    )?;
    writeln!(out, "   Bitrate: {} kbps", result.stats.bitrate_kbps)?;
    writeln!(out, "   Time:    {} ms", result.stats.processing_time_ms())
}

/// Print validated input metadata
pub fn write_file_info(out: &mut dyn Write, info: &FileInfo, json: bool) -> io::Result<()> {
    if json {
        return write_json(out, info);
    }

    writeln!(
        out,
        "{} {}",
        "✅ Valid input:".green().bold(),
        display_path(info.path.as_deref(), "<stdin>")
    )?;
    writeln!(out, "   Type:        {}", info.file_type)?;
    writeln!(out, "   Sample rate: {} Hz", info.sample_rate)?;
    writeln!(out, "   Channels:    {}", info.channels)?;
    writeln!(out, "   Bit depth:   {}", info.bit_depth)?;
    writeln!(out, "   Samples:     {}", info.total_samples)?;
    writeln!(out, "   Duration:    {:.2}s", info.duration_secs)?;
    writeln!(out, "   Size:        {} bytes", info.size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use telecodec_transcoder::{AudioFormat, OutputInfo, ProcessingStats};

    fn sample_result() -> TranscodeResult {
        TranscodeResult {
            input: FileInfo {
                path: Some("in.wav".into()),
                file_type: "WAVE".to_string(),
                bit_depth: 16,
                sample_rate: 8000,
                channels: 1,
                total_samples: 8000,
                duration_secs: 1.0,
                size: 16044,
            },
            output: OutputInfo {
                path: None,
                format: AudioFormat::ULaw,
                size: 8000,
            },
            stats: ProcessingStats {
                processing_time: Duration::from_millis(3),
                compression_ratio: 8000.0 / 16044.0,
                bitrate_kbps: 64.0,
                samples_processed: 8000,
                frames_processed: 8000,
            },
        }
    }

    #[test]
    fn test_json_result() {
        let mut out = Vec::new();
        write_result(&mut out, &sample_result(), true).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["output"]["format"], "ulaw");
        assert_eq!(value["output"]["size"], 8000);
        assert_eq!(value["input"]["sample_rate"], 8000);
        assert!(value["output"]["path"].is_null());
    }

    #[test]
    fn test_human_result() {
        let mut out = Vec::new();
        write_result(&mut out, &sample_result(), false).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("in.wav"));
        assert!(text.contains("<stdout>"));
        assert!(text.contains("8000 bytes"));
    }
}
