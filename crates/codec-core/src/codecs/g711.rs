//! G.711 μ-law and A-law encoders

use super::companding::{encode_alaw, encode_ulaw};
use super::{FormatEncoder, CHUNK_SAMPLES};
use crate::error::Result;
use crate::types::AudioFormat;
use std::io::Write;

/// μ-law encoder, one byte per sample
#[derive(Debug, Clone, Copy, Default)]
pub struct UlawEncoder;

/// A-law encoder, one byte per sample
#[derive(Debug, Clone, Copy, Default)]
pub struct AlawEncoder;

impl FormatEncoder for UlawEncoder {
    fn encode(&mut self, samples: &[i16], sink: &mut dyn Write) -> Result<()> {
        encode_bytewise(samples, sink, encode_ulaw)
    }

    fn format(&self) -> AudioFormat {
        AudioFormat::ULaw
    }
}

impl FormatEncoder for AlawEncoder {
    fn encode(&mut self, samples: &[i16], sink: &mut dyn Write) -> Result<()> {
        encode_bytewise(samples, sink, encode_alaw)
    }

    fn format(&self) -> AudioFormat {
        AudioFormat::ALaw
    }
}

fn encode_bytewise(samples: &[i16], sink: &mut dyn Write, law: fn(i16) -> u8) -> Result<()> {
    let mut chunk = [0u8; CHUNK_SAMPLES];

    for block in samples.chunks(CHUNK_SAMPLES) {
        let out = &mut chunk[..block.len()];
        for (byte, &sample) in out.iter_mut().zip(block) {
            *byte = law(sample);
        }
        sink.write_all(out)?;
    }
    Ok(())
}
