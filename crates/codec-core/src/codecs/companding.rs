//! Per-sample companding transforms
//!
//! Maps one 16-bit linear sample to its encoded form. All functions are pure:
//! no state, no allocation, same input always gives the same output.
//!
//! ## Algorithm
//!
//! μ-law and A-law share the first five steps:
//!
//! 1. Split off the sign and take the magnitude
//! 2. Add a bias of 33
//! 3. Find the segment: bit length of `biased >> 7`, clipped to 7
//! 4. Quantize: `(biased >> (segment + 3)) & 0x0F`
//! 5. Compose `(segment << 4) | quantization`, setting bit 7 for negative input
//!
//! μ-law then complements all eight bits; A-law toggles the even bits (`^ 0x55`).
//!
//! The magnitude is taken in 32-bit arithmetic, so `i16::MIN` does not wrap and
//! encodes exactly like `-32767` (both land in the top segment).

use crate::error::{CodecError, Result};

/// Bias added to the magnitude before the segment search
const BIAS: i32 = 33;

/// Highest segment index
const MAX_SEGMENT: u32 = 7;

/// Sign bit in the composed byte
const SIGN_BIT: u8 = 0x80;

/// Even-bit toggle mask applied by A-law
const ALAW_TOGGLE: u8 = 0x55;

/// Steps 1-5 shared by both laws: sign, bias, segment, quantization, compose.
#[inline]
fn compose(sample: i16) -> u8 {
    let negative = sample < 0;
    let biased = i32::from(sample).abs() + BIAS;

    let segment = (u32::BITS - ((biased >> 7) as u32).leading_zeros()).min(MAX_SEGMENT);
    let quantization = ((biased >> (segment + 3)) & 0x0F) as u8;

    let mut byte = ((segment as u8) << 4) | quantization;
    if negative {
        byte |= SIGN_BIT;
    }
    byte
}

/// Segment index (0-7) a sample falls into
///
/// Exposed for diagnostics and tests; the encoders call [`encode_ulaw`] and
/// [`encode_alaw`] directly.
pub fn segment(sample: i16) -> u8 {
    (compose(sample) >> 4) & 0x07
}

/// Encode one linear sample as μ-law
#[inline]
pub fn encode_ulaw(sample: i16) -> u8 {
    !compose(sample)
}

/// Encode one linear sample as A-law
#[inline]
pub fn encode_alaw(sample: i16) -> u8 {
    compose(sample) ^ ALAW_TOGGLE
}

/// Encode one linear sample as SLIN (little-endian: low byte, high byte)
#[inline]
pub fn encode_slin(sample: i16) -> [u8; 2] {
    sample.to_le_bytes()
}

/// μ-law encode a slice into a caller-provided buffer
///
/// # Errors
///
/// Returns [`CodecError::BufferTooSmall`] if `output` is shorter than `samples`.
pub fn encode_ulaw_slice(samples: &[i16], output: &mut [u8]) -> Result<usize> {
    encode_slice(samples, output, encode_ulaw)
}

/// A-law encode a slice into a caller-provided buffer
///
/// # Errors
///
/// Returns [`CodecError::BufferTooSmall`] if `output` is shorter than `samples`.
pub fn encode_alaw_slice(samples: &[i16], output: &mut [u8]) -> Result<usize> {
    encode_slice(samples, output, encode_alaw)
}

fn encode_slice(samples: &[i16], output: &mut [u8], law: fn(i16) -> u8) -> Result<usize> {
    if output.len() < samples.len() {
        return Err(CodecError::BufferTooSmall {
            needed: samples.len(),
            actual: output.len(),
        });
    }

    for (out, &sample) in output.iter_mut().zip(samples) {
        *out = law(sample);
    }
    Ok(samples.len())
}
