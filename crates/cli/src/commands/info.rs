//! Info command - validate a WAV file and show its properties

use anyhow::{Context, Result};
use std::io;
use std::path::Path;
use telecodec_transcoder::Transcoder;

use crate::report;

/// Execute info command
pub fn execute(transcoder: &Transcoder, input: &Path, json: bool) -> Result<()> {
    let info = transcoder
        .validate_input(input)
        .with_context(|| format!("{} is not usable input", input.display()))?;

    report::write_file_info(&mut io::stdout().lock(), &info, json)?;
    Ok(())
}
