//! Formats command - list output formats

use anyhow::Result;
use serde::Serialize;
use std::io::{self, Write};
use tabled::{Table, Tabled};
use telecodec_transcoder::{EncoderFactory, Transcoder};

use crate::report;

/// One row of the format listing
#[derive(Debug, Serialize, Tabled)]
pub struct FormatRow {
    #[tabled(rename = "Format")]
    pub name: &'static str,
    #[tabled(rename = "Description")]
    pub description: &'static str,
    #[tabled(rename = "Bitrate (kbps)")]
    pub bitrate_kbps: f64,
    #[tabled(rename = "Frame (samples)")]
    pub frame_size: usize,
    #[tabled(rename = "Available")]
    pub available: bool,
}

/// Rows for every format the transcoder knows
pub fn rows(transcoder: &Transcoder) -> Vec<FormatRow> {
    transcoder
        .supported_formats()
        .into_iter()
        .map(|format| FormatRow {
            name: format.name(),
            description: format.description(),
            bitrate_kbps: format.nominal_bitrate_kbps(),
            frame_size: format.frame_size(),
            available: EncoderFactory::is_available(format),
        })
        .collect()
}

/// Execute formats command
pub fn execute(transcoder: &Transcoder, json: bool) -> Result<()> {
    let rows = rows(transcoder);
    let mut stdout = io::stdout().lock();

    if json {
        report::write_json(&mut stdout, &rows)?;
    } else {
        writeln!(stdout, "{}", Table::new(&rows))?;
        if rows.iter().any(|row| !row.available) {
            writeln!(stdout, "G.729 needs a build with the `g729-native` feature and libbcg729.")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use telecodec_transcoder::AudioFormat;

    #[test]
    fn test_rows_cover_all_formats() {
        let rows = rows(&Transcoder::default());
        assert_eq!(rows.len(), AudioFormat::all().len());

        let ulaw = rows.iter().find(|row| row.name == "ulaw").unwrap();
        assert!(ulaw.available);
        assert_eq!(ulaw.bitrate_kbps, 64.0);

        let g729 = rows.iter().find(|row| row.name == "g729").unwrap();
        assert_eq!(g729.available, cfg!(feature = "g729-native"));
        assert_eq!(g729.frame_size, 80);
    }

    #[test]
    fn test_table_renders() {
        let table = Table::new(rows(&Transcoder::default())).to_string();
        assert!(table.contains("Bitrate (kbps)"));
        assert!(table.contains("alaw"));
    }
}
