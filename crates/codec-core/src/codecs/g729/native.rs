//! libbcg729 bindings
//!
//! Each channel context is owned by exactly one guard and closed in `Drop`,
//! so every exit path (success, early error return, panic unwind) releases it
//! once.

use super::{FrameDecoder, FrameEncoder, FRAME_SAMPLES, MAX_FRAME_BYTES};
use crate::error::{CodecError, Result};
use crate::types::AudioFormat;
use std::ptr::NonNull;
use tracing::debug;

/// Size of a SID (comfort noise) frame in the bcg729 bitstream
const SID_FRAME_BYTES: usize = 2;

#[repr(C)]
struct EncoderChannelContext {
    _private: [u8; 0],
}

#[repr(C)]
struct DecoderChannelContext {
    _private: [u8; 0],
}

#[allow(non_snake_case)]
#[link(name = "bcg729")]
extern "C" {
    fn initBcg729EncoderChannel(enableVAD: u8) -> *mut EncoderChannelContext;
    fn closeBcg729EncoderChannel(encoderChannelContext: *mut EncoderChannelContext);
    fn bcg729Encoder(
        encoderChannelContext: *mut EncoderChannelContext,
        inputFrame: *const i16,
        bitStream: *mut u8,
        bitStreamLength: *mut u8,
    );

    fn initBcg729DecoderChannel() -> *mut DecoderChannelContext;
    fn closeBcg729DecoderChannel(decoderChannelContext: *mut DecoderChannelContext);
    fn bcg729Decoder(
        decoderChannelContext: *mut DecoderChannelContext,
        bitStream: *const u8,
        bitStreamLength: u8,
        frameErasureFlag: u8,
        SIDFrameFlag: u8,
        rfc3389PayloadFlag: u8,
        signal: *mut i16,
    );
}

/// Native G.729 encoder channel (VAD disabled)
pub struct Bcg729Encoder {
    context: NonNull<EncoderChannelContext>,
}

// SAFETY: the context is only reached through `&mut self`, so at most one
// thread uses it at a time. It is deliberately not `Sync`.
unsafe impl Send for Bcg729Encoder {}

impl Bcg729Encoder {
    /// Open a new encoder channel
    pub fn new() -> Result<Self> {
        // SAFETY: plain constructor call; a null return is handled below.
        let raw = unsafe { initBcg729EncoderChannel(0) };
        let context = NonNull::new(raw).ok_or_else(|| {
            CodecError::codec_not_available(
                AudioFormat::G729.name(),
                "failed to initialize libbcg729 encoder channel",
            )
        })?;

        debug!("Opened libbcg729 encoder channel");
        Ok(Self { context })
    }
}

impl FrameEncoder for Bcg729Encoder {
    fn encode_frame(
        &mut self,
        frame: &[i16; FRAME_SAMPLES],
        output: &mut [u8; MAX_FRAME_BYTES],
    ) -> Result<usize> {
        let mut length: u8 = 0;
        // SAFETY: context is live for the lifetime of self; the input holds 80
        // samples and the output 10 bytes, the sizes bcg729 reads and writes.
        unsafe {
            bcg729Encoder(
                self.context.as_ptr(),
                frame.as_ptr(),
                output.as_mut_ptr(),
                &mut length,
            );
        }
        Ok(usize::from(length))
    }
}

impl Drop for Bcg729Encoder {
    fn drop(&mut self) {
        // SAFETY: the context came from initBcg729EncoderChannel and is closed
        // only here.
        unsafe { closeBcg729EncoderChannel(self.context.as_ptr()) };
        debug!("Closed libbcg729 encoder channel");
    }
}

/// Native G.729 decoder channel
pub struct Bcg729Decoder {
    context: NonNull<DecoderChannelContext>,
}

// SAFETY: see Bcg729Encoder.
unsafe impl Send for Bcg729Decoder {}

impl Bcg729Decoder {
    /// Open a new decoder channel
    pub fn new() -> Result<Self> {
        // SAFETY: plain constructor call; a null return is handled below.
        let raw = unsafe { initBcg729DecoderChannel() };
        let context = NonNull::new(raw).ok_or_else(|| {
            CodecError::codec_not_available(
                AudioFormat::G729.name(),
                "failed to initialize libbcg729 decoder channel",
            )
        })?;

        debug!("Opened libbcg729 decoder channel");
        Ok(Self { context })
    }
}

impl FrameDecoder for Bcg729Decoder {
    fn decode_frame(&mut self, payload: &[u8], output: &mut [i16; FRAME_SAMPLES]) -> Result<()> {
        if payload.is_empty() || payload.len() > MAX_FRAME_BYTES {
            return Err(CodecError::decoding_failed(format!(
                "G.729 payload of {} bytes",
                payload.len()
            )));
        }

        let sid = u8::from(payload.len() == SID_FRAME_BYTES);
        // SAFETY: payload length is checked above and passed alongside the
        // pointer; output holds the 80 samples bcg729 writes.
        unsafe {
            bcg729Decoder(
                self.context.as_ptr(),
                payload.as_ptr(),
                payload.len() as u8,
                0,
                sid,
                0,
                output.as_mut_ptr(),
            );
        }
        Ok(())
    }
}

impl Drop for Bcg729Decoder {
    fn drop(&mut self) {
        // SAFETY: the context came from initBcg729DecoderChannel and is closed
        // only here.
        unsafe { closeBcg729DecoderChannel(self.context.as_ptr()) };
        debug!("Closed libbcg729 decoder channel");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codecs::FormatEncoder;
    use crate::codecs::g729::{G729Decoder, G729Encoder};

    #[test]
    fn test_native_round_trip_sizes() {
        let mut encoder = G729Encoder::open().unwrap();
        let samples: Vec<i16> = (0..800)
            .map(|i| ((i as f32 * 0.05).sin() * 8000.0) as i16)
            .collect();

        let mut encoded = Vec::new();
        encoder.encode(&samples, &mut encoded).unwrap();
        assert_eq!(encoded.len(), 10 * MAX_FRAME_BYTES);

        let mut decoder = G729Decoder::open().unwrap();
        let mut pcm = Vec::new();
        let frames = decoder.decode(&mut encoded.as_slice(), &mut pcm).unwrap();
        assert_eq!(frames, 10);
        assert_eq!(pcm.len(), samples.len() * 2);
    }
}
