//! Signed linear (SLIN) passthrough

use super::companding::encode_slin;
use super::{FormatEncoder, CHUNK_SAMPLES};
use crate::error::Result;
use crate::types::AudioFormat;
use std::io::Write;

/// SLIN encoder: each sample written as two little-endian bytes, unmodified
#[derive(Debug, Clone, Copy, Default)]
pub struct SlinEncoder;

impl FormatEncoder for SlinEncoder {
    fn encode(&mut self, samples: &[i16], sink: &mut dyn Write) -> Result<()> {
        let mut chunk = [0u8; CHUNK_SAMPLES * 2];

        for block in samples.chunks(CHUNK_SAMPLES) {
            let out = &mut chunk[..block.len() * 2];
            for (pair, &sample) in out.chunks_exact_mut(2).zip(block) {
                pair.copy_from_slice(&encode_slin(sample));
            }
            sink.write_all(out)?;
        }
        Ok(())
    }

    fn format(&self) -> AudioFormat {
        AudioFormat::Slin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slin_encoding() {
        let samples = [0i16, 100, -100, 1000, -1000];
        let mut out = Vec::new();
        SlinEncoder.encode(&samples, &mut out).unwrap();

        assert_eq!(out.len(), samples.len() * 2);
        assert_eq!(&out[0..2], &[0x00, 0x00]);
        assert_eq!(&out[2..4], &[0x64, 0x00]);
        assert_eq!(&out[4..6], &[0x9C, 0xFF]);
    }

    #[test]
    fn test_slin_preserves_samples() {
        let samples: Vec<i16> = (0..1500).map(|i| (i as i16).wrapping_mul(-53)).collect();
        let mut out = Vec::new();
        SlinEncoder.encode(&samples, &mut out).unwrap();

        let decoded: Vec<i16> = out
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        assert_eq!(decoded, samples);
    }

    #[test]
    fn test_slin_bitrate() {
        assert_eq!(SlinEncoder.bitrate_kbps(), 128.0);
        assert_eq!(SlinEncoder.format(), AudioFormat::Slin);
    }
}
