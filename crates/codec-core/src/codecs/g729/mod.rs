//! G.729 framing over an external CELP codec
//!
//! The speech coder itself is not implemented here. [`FrameEncoder`] and
//! [`FrameDecoder`] describe the capability this crate consumes: turn 80
//! samples into at most 10 bytes, and back. The `g729-native` feature
//! provides both on top of libbcg729; without it [`G729Encoder::open`] and
//! [`G729Decoder::open`] fail with [`CodecError::CodecNotAvailable`].
//!
//! Output framing: frames are written back to back with no length prefix.
//! Frame boundaries follow from the fixed 80-sample input chunking.

use super::FormatEncoder;
use crate::error::{CodecError, Result};
use crate::types::AudioFormat;
use std::io::{self, Read, Write};
use tracing::{debug, trace};

#[cfg(feature = "g729-native")]
mod native;

#[cfg(feature = "g729-native")]
pub use native::{Bcg729Decoder, Bcg729Encoder};

/// Samples per G.729 frame (10ms at 8kHz)
pub const FRAME_SAMPLES: usize = 80;

/// Largest encoded frame in bytes
pub const MAX_FRAME_BYTES: usize = 10;

/// One serial stream of G.729 frame encodes
///
/// Implementations keep codec state across calls, so a single instance must
/// not be shared between independent streams.
pub trait FrameEncoder: Send {
    /// Encode one frame into `output`, returning the number of valid bytes
    fn encode_frame(
        &mut self,
        frame: &[i16; FRAME_SAMPLES],
        output: &mut [u8; MAX_FRAME_BYTES],
    ) -> Result<usize>;
}

/// One serial stream of G.729 frame decodes
pub trait FrameDecoder: Send {
    /// Decode one encoded frame into 80 samples
    fn decode_frame(&mut self, payload: &[u8], output: &mut [i16; FRAME_SAMPLES]) -> Result<()>;
}

/// Whether the native G.729 codec was compiled in
pub fn native_available() -> bool {
    cfg!(feature = "g729-native")
}

#[cfg(not(feature = "g729-native"))]
fn not_available() -> CodecError {
    CodecError::codec_not_available(
        AudioFormat::G729.name(),
        "built without the `g729-native` feature (requires libbcg729)",
    )
}

/// G.729 encoder
///
/// Owns its frame backend; for the native backend that is a libbcg729
/// channel which is closed when the encoder is dropped.
pub struct G729Encoder {
    backend: Box<dyn FrameEncoder>,
    frames_encoded: u64,
}

impl G729Encoder {
    /// Open an encoder on the native codec
    pub fn open() -> Result<Self> {
        #[cfg(feature = "g729-native")]
        {
            Ok(Self::with_backend(Bcg729Encoder::new()?))
        }

        #[cfg(not(feature = "g729-native"))]
        {
            Err(not_available())
        }
    }

    /// Create an encoder over any frame backend
    pub fn with_backend(backend: impl FrameEncoder + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            frames_encoded: 0,
        }
    }

    /// Frames submitted to the backend so far
    pub fn frames_encoded(&self) -> u64 {
        self.frames_encoded
    }
}

impl FormatEncoder for G729Encoder {
    fn encode(&mut self, samples: &[i16], sink: &mut dyn Write) -> Result<()> {
        let mut frame = [0i16; FRAME_SAMPLES];
        let mut output = [0u8; MAX_FRAME_BYTES];

        for chunk in samples.chunks(FRAME_SAMPLES) {
            // Short final chunk is padded with silence
            frame[..chunk.len()].copy_from_slice(chunk);
            frame[chunk.len()..].fill(0);

            let len = self.backend.encode_frame(&frame, &mut output)?;
            if len > MAX_FRAME_BYTES {
                return Err(CodecError::encoding_failed(format!(
                    "G.729 backend reported {} bytes for a {} byte frame",
                    len, MAX_FRAME_BYTES
                )));
            }

            if len > 0 {
                sink.write_all(&output[..len])?;
            }
            self.frames_encoded += 1;
            trace!(frame = self.frames_encoded, bytes = len, "Encoded G.729 frame");
        }

        debug!(frames = self.frames_encoded, "G.729 encode complete");
        Ok(())
    }

    fn format(&self) -> AudioFormat {
        AudioFormat::G729
    }
}

/// G.729 decoder
///
/// Reads back-to-back 10-byte frames and writes 80 little-endian 16-bit
/// samples per frame.
pub struct G729Decoder {
    backend: Box<dyn FrameDecoder>,
}

impl G729Decoder {
    /// Open a decoder on the native codec
    pub fn open() -> Result<Self> {
        #[cfg(feature = "g729-native")]
        {
            Ok(Self::with_backend(Bcg729Decoder::new()?))
        }

        #[cfg(not(feature = "g729-native"))]
        {
            Err(not_available())
        }
    }

    /// Create a decoder over any frame backend
    pub fn with_backend(backend: impl FrameDecoder + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Decode every frame in `reader` into `writer`, returning the frame count
    ///
    /// # Errors
    ///
    /// A trailing partial frame fails with [`CodecError::DecodingFailed`];
    /// frames before it have already been written.
    pub fn decode(&mut self, reader: &mut dyn Read, writer: &mut dyn Write) -> Result<usize> {
        let mut payload = [0u8; MAX_FRAME_BYTES];
        let mut samples = [0i16; FRAME_SAMPLES];
        let mut pcm = [0u8; FRAME_SAMPLES * 2];
        let mut frames = 0;

        loop {
            let n = read_frame(reader, &mut payload)?;
            if n == 0 {
                break;
            }
            if n != MAX_FRAME_BYTES {
                return Err(CodecError::decoding_failed(format!(
                    "incomplete G.729 frame: expected {} bytes, got {}",
                    MAX_FRAME_BYTES, n
                )));
            }

            self.backend.decode_frame(&payload, &mut samples)?;
            for (pair, sample) in pcm.chunks_exact_mut(2).zip(samples.iter()) {
                pair.copy_from_slice(&sample.to_le_bytes());
            }
            writer.write_all(&pcm)?;
            frames += 1;
        }

        debug!(frames, "G.729 decode complete");
        Ok(frames)
    }
}

/// Fill `buf` from `reader`, stopping early only at end of stream
fn read_frame(reader: &mut dyn Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records submitted frames and reports a fixed payload length
    struct RecordingBackend {
        frames: Arc<Mutex<Vec<[i16; FRAME_SAMPLES]>>>,
        reported_len: usize,
    }

    impl FrameEncoder for RecordingBackend {
        fn encode_frame(
            &mut self,
            frame: &[i16; FRAME_SAMPLES],
            output: &mut [u8; MAX_FRAME_BYTES],
        ) -> Result<usize> {
            let mut frames = self.frames.lock().unwrap();
            output.fill(frames.len() as u8);
            frames.push(*frame);
            Ok(self.reported_len)
        }
    }

    fn recording(reported_len: usize) -> (RecordingBackend, Arc<Mutex<Vec<[i16; FRAME_SAMPLES]>>>) {
        let frames = Arc::new(Mutex::new(Vec::new()));
        (
            RecordingBackend {
                frames: frames.clone(),
                reported_len,
            },
            frames,
        )
    }

    #[test]
    fn test_pads_final_frame_with_silence() {
        let (backend, frames) = recording(MAX_FRAME_BYTES);
        let mut encoder = G729Encoder::with_backend(backend);

        let samples: Vec<i16> = (1..=100).collect();
        let mut out = Vec::new();
        encoder.encode(&samples, &mut out).unwrap();

        let frames = frames.lock().unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0][0], 1);
        assert_eq!(frames[0][79], 80);
        assert_eq!(frames[1][..20], samples[80..]);
        assert!(frames[1][20..].iter().all(|&s| s == 0));
        assert_eq!(out.len(), 20);
        assert_eq!(encoder.frames_encoded(), 2);
    }

    #[test]
    fn test_writes_only_reported_bytes() {
        let (backend, _) = recording(2);
        let mut encoder = G729Encoder::with_backend(backend);

        let mut out = Vec::new();
        encoder.encode(&[0i16; 240], &mut out).unwrap();
        assert_eq!(out, vec![0, 0, 1, 1, 2, 2]);
    }

    #[test]
    fn test_empty_frames_write_nothing() {
        let (backend, frames) = recording(0);
        let mut encoder = G729Encoder::with_backend(backend);

        let mut out = Vec::new();
        encoder.encode(&[0i16; 160], &mut out).unwrap();
        assert!(out.is_empty());
        assert_eq!(frames.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_rejects_oversized_frame_report() {
        let (backend, _) = recording(11);
        let mut encoder = G729Encoder::with_backend(backend);

        let err = encoder.encode(&[0i16; 80], &mut Vec::new()).unwrap_err();
        assert!(matches!(err, CodecError::EncodingFailed { .. }));
    }

    #[test]
    fn test_exact_multiple_has_no_padding_frame() {
        let (backend, frames) = recording(MAX_FRAME_BYTES);
        let mut encoder = G729Encoder::with_backend(backend);
        encoder.encode(&[7i16; 160], &mut Vec::new()).unwrap();
        assert_eq!(frames.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_g729_reports_format() {
        let (backend, _) = recording(MAX_FRAME_BYTES);
        let encoder = G729Encoder::with_backend(backend);
        assert_eq!(encoder.format(), AudioFormat::G729);
        assert_eq!(encoder.bitrate_kbps(), 8.0);
        assert_eq!(encoder.frame_size(), FRAME_SAMPLES);
    }

    /// Expands each payload byte into a constant frame
    struct ConstantDecoder;

    impl FrameDecoder for ConstantDecoder {
        fn decode_frame(
            &mut self,
            payload: &[u8],
            output: &mut [i16; FRAME_SAMPLES],
        ) -> Result<()> {
            output.fill(i16::from(payload[0]));
            Ok(())
        }
    }

    #[test]
    fn test_decoder_expands_frames() {
        let mut decoder = G729Decoder::with_backend(ConstantDecoder);
        let mut input: &[u8] = &[3u8; 20];
        let mut out = Vec::new();

        let frames = decoder.decode(&mut input, &mut out).unwrap();
        assert_eq!(frames, 2);
        assert_eq!(out.len(), 2 * FRAME_SAMPLES * 2);
        assert_eq!(&out[..2], &[3, 0]);
    }

    #[test]
    fn test_decoder_rejects_partial_frame() {
        let mut decoder = G729Decoder::with_backend(ConstantDecoder);
        let mut input: &[u8] = &[1u8; 15];
        let mut out = Vec::new();

        let err = decoder.decode(&mut input, &mut out).unwrap_err();
        assert!(matches!(err, CodecError::DecodingFailed { .. }));
        assert_eq!(out.len(), FRAME_SAMPLES * 2);
    }

    #[cfg(not(feature = "g729-native"))]
    #[test]
    fn test_open_without_native() {
        assert!(!native_available());
        assert!(matches!(
            G729Encoder::open().err().unwrap(),
            CodecError::CodecNotAvailable { .. }
        ));
        assert!(matches!(
            G729Decoder::open().err().unwrap(),
            CodecError::CodecNotAvailable { .. }
        ));
    }
}
