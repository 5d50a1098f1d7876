//! Convert command - one WAV file to one format

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::Path;
use telecodec_transcoder::{TranscodeJob, Transcoder};
use tracing::info;

use crate::report;

/// Execute convert command
///
/// An output of `-` streams the encoded audio to stdout; the summary then
/// goes to stderr.
pub fn execute(
    transcoder: &Transcoder,
    input: &Path,
    output: &Path,
    format: &str,
    json: bool,
) -> Result<()> {
    let format = Transcoder::parse_format(format)?;
    info!("🎵 Converting {} to {}", input.display(), format);

    if output == Path::new("-") {
        let stdout = io::stdout();
        let result = transcoder
            .transcode_to_writer(input, stdout.lock(), format)
            .with_context(|| format!("failed to convert {}", input.display()))?;
        report::write_result(&mut io::stderr(), &result, json)?;
        return Ok(());
    }

    let result = transcoder
        .transcode(&TranscodeJob::new(input, output, format))
        .with_context(|| format!("failed to convert {}", input.display()))?;

    let mut stdout = io::stdout().lock();
    report::write_result(&mut stdout, &result, json)?;
    stdout.flush()?;
    Ok(())
}
