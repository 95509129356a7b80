//! Codec session: owns the writer state for one encode call.
//!
//! A session moves linearly through
//! `Idle -> Validated -> WriterReady -> HeaderWritten -> Streaming -> Finalized -> Released`.
//! Any failure jumps straight to `Released`; whatever output was produced so
//! far is dropped with the session, so a failed call never hands back bytes.

use std::io::Write;

use super::error_sink::ErrorSink;
use super::rows::{stream_rows, RowView};
use super::sink::OutputSink;
use super::types::{EncodeError, EncodeRequest, EncoderPolicy};

/// PNG signature plus the IHDR and IEND chunks.
const PNG_FIXED_OVERHEAD: usize = 8 + 25 + 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SessionState {
    Idle,
    Validated,
    WriterReady,
    HeaderWritten,
    Streaming,
    Finalized,
    Released,
}

/// A finished encode: the PNG bytes and any warnings raised along the way.
#[derive(Debug)]
pub struct EncodeOutput {
    pub png: Vec<u8>,
    pub diagnostics: ErrorSink,
}

/// Encoder state for a single frame.
///
/// Sessions are single use: [`CodecSession::run`] consumes the session, so the
/// diagnostics sink can never leak from one call into another.
#[derive(Debug)]
pub struct CodecSession<'a> {
    request: EncodeRequest<'a>,
    policy: EncoderPolicy,
    diagnostics: ErrorSink,
    output_limit: usize,
    state: SessionState,
}

impl<'a> CodecSession<'a> {
    pub fn new(request: EncodeRequest<'a>) -> Self {
        let mut session = Self {
            request,
            policy: EncoderPolicy::FAST,
            diagnostics: ErrorSink::new(),
            output_limit: usize::MAX,
            state: SessionState::Idle,
        };
        session.advance(SessionState::Validated);
        session
    }

    pub fn request(&self) -> &EncodeRequest<'a> {
        &self.request
    }

    pub fn policy(&self) -> EncoderPolicy {
        self.policy
    }

    /// Cap the encoded size at `max_bytes`.
    ///
    /// A limit too small for the PNG signature, header and trailer fails as
    /// [`EncodeError::WriterInit`]; output that outgrows it while streaming
    /// fails as [`EncodeError::Streaming`].
    pub fn with_output_limit(mut self, max_bytes: usize) -> Self {
        self.output_limit = max_bytes;
        self
    }

    fn advance(&mut self, next: SessionState) {
        debug_assert!(next > self.state, "{:?} -> {:?}", self.state, next);
        log::trace!("codec session: {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Record `msg` as fatal, release the session and build the error.
    fn fail(&mut self, msg: &str, make: fn(String) -> EncodeError) -> EncodeError {
        self.diagnostics.error(msg);
        self.advance(SessionState::Released);
        make(self.diagnostics.as_str().to_owned())
    }

    /// Encode the frame.
    ///
    /// # Errors
    ///
    /// - [`EncodeError::WriterInit`] if the output buffer cannot be allocated
    /// - [`EncodeError::InfoInit`] if the header state is rejected
    /// - [`EncodeError::Header`] if the header cannot be written
    /// - [`EncodeError::Streaming`] if any row or the trailer fails
    pub fn run(mut self) -> Result<EncodeOutput, EncodeError> {
        let request = self.request;

        let trailing = request.trailing_len();
        if trailing > 0 {
            // Padded frame buffers are routine; keep this out of warn-level logs.
            self.diagnostics.warn_at(log::Level::Debug, &format!(
                "ignoring {} trailing bytes beyond {}x{}@{}",
                trailing,
                request.width(),
                request.height(),
                request.depth().bits()
            ));
        }

        let mut png = Vec::new();
        let sink = match OutputSink::with_limit(&mut png, PNG_FIXED_OVERHEAD, self.output_limit) {
            Ok(sink) => sink,
            Err(e) => {
                let msg = format!("output buffer: {e}");
                return Err(self.fail(&msg, |diagnostics| EncodeError::WriterInit { diagnostics }));
            }
        };
        self.advance(SessionState::WriterReady);

        let mut encoder = match header_encoder(sink, &request, &self.policy) {
            Ok(encoder) => encoder,
            Err(e) => {
                let msg = e.to_string();
                return Err(self.fail(&msg, |diagnostics| EncodeError::InfoInit { diagnostics }));
            }
        };
        // set_compression also picks a filter, so the filter must come second.
        encoder.set_compression(self.policy.png_compression());
        encoder.set_filter(self.policy.png_filter());

        let writer = match encoder.write_header() {
            Ok(writer) => writer,
            Err(e) => {
                let msg = e.to_string();
                return Err(self.fail(&msg, |diagnostics| EncodeError::Header { diagnostics }));
            }
        };
        self.advance(SessionState::HeaderWritten);

        let rows = RowView::new(&request);
        self.advance(SessionState::Streaming);
        if let Err(e) = stream_rows(writer, &rows) {
            let msg = e.to_string();
            return Err(self.fail(&msg, |diagnostics| EncodeError::Streaming { diagnostics }));
        }
        self.advance(SessionState::Finalized);

        log::debug!(
            "encoded {}x{}@{} grayscale into {} bytes",
            request.width(),
            request.height(),
            request.depth().bits(),
            png.len()
        );
        self.advance(SessionState::Released);

        Ok(EncodeOutput {
            png,
            diagnostics: self.diagnostics,
        })
    }
}

/// Build the PNG header state: dimensions, depth, grayscale, no interlacing.
///
/// Compression and filter type fields are the defaults PNG defines; they are
/// the only values the format allows.
fn header_encoder<W: Write>(
    sink: W,
    request: &EncodeRequest<'_>,
    policy: &EncoderPolicy,
) -> Result<png::Encoder<'static, W>, png::EncodingError> {
    let mut info = png::Info::with_size(request.width(), request.height());
    info.bit_depth = request.depth().to_png();
    info.color_type = png::ColorType::Grayscale;
    info.interlaced = policy.interlaced;
    png::Encoder::with_info(sink, info)
}

/// Encode a grayscale frame to PNG.
///
/// `data` holds `width * height` samples, row-major with no padding between
/// rows. 16-bit samples must be little-endian. Bytes past the last row are
/// ignored with a warning.
///
/// The compression pass runs on a worker thread that reads `data` in place;
/// `data` is borrowed for the whole call.
///
/// # Example
///
/// ```
/// use fastpng_core::store_image;
///
/// let png = store_image(2, 2, 8, &[0xff, 0x00, 0x00, 0xff]).unwrap();
/// assert_eq!(&png[1..4], b"PNG");
/// ```
pub fn store_image(width: u32, height: u32, depth: u32, data: &[u8]) -> Result<Vec<u8>, EncodeError> {
    let request = EncodeRequest::new(width, height, depth, data)?;
    CodecSession::new(request).run().map(|output| output.png)
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for generating image dimensions (keep small for speed).
    fn dimensions_strategy() -> impl Strategy<Value = (u32, u32)> {
        (1u32..=40, 1u32..=40)
    }

    /// Strategy for a frame of the given depth with random samples.
    fn frame_strategy(depth: u32) -> impl Strategy<Value = (u32, u32, Vec<u8>)> {
        dimensions_strategy().prop_flat_map(move |(w, h)| {
            let size = (w * h * depth / 8) as usize;
            (Just(w), Just(h), prop::collection::vec(any::<u8>(), size..=size))
        })
    }

    fn decode(png: &[u8]) -> image::DynamicImage {
        image::load_from_memory_with_format(png, image::ImageFormat::Png).unwrap()
    }

    proptest! {
        /// Property: 8-bit frames decode to the exact input samples.
        #[test]
        fn prop_gray8_roundtrip((width, height, data) in frame_strategy(8)) {
            let png = store_image(width, height, 8, &data).unwrap();
            let decoded = decode(&png);

            prop_assert_eq!(decoded.color(), image::ColorType::L8);
            let luma = decoded.into_luma8();
            prop_assert_eq!(luma.dimensions(), (width, height));
            prop_assert_eq!(luma.into_raw(), data);
        }

        /// Property: 16-bit little-endian frames decode to the same sample values.
        #[test]
        fn prop_gray16_roundtrip((width, height, data) in frame_strategy(16)) {
            let png = store_image(width, height, 16, &data).unwrap();
            let decoded = decode(&png);

            prop_assert_eq!(decoded.color(), image::ColorType::L16);
            let luma = decoded.into_luma16();
            prop_assert_eq!(luma.dimensions(), (width, height));

            let expected: Vec<u16> = data
                .chunks_exact(2)
                .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                .collect();
            prop_assert_eq!(luma.into_raw(), expected);
        }

        /// Property: any depth other than 8 or 16 is rejected, whatever else is passed.
        #[test]
        fn prop_invalid_depth_always_rejected(
            width in any::<u32>(),
            height in any::<u32>(),
            depth in any::<u32>(),
            len in 0usize..64,
        ) {
            prop_assume!(depth != 8 && depth != 16);

            let data = vec![0u8; len];
            let result = store_image(width, height, depth, &data);
            let rejected = matches!(result, Err(EncodeError::InvalidDepth(d)) if d == depth);
            prop_assert!(rejected, "expected InvalidDepth, got {:?}", result);
        }

        /// Property: a buffer one byte short is always rejected.
        #[test]
        fn prop_short_buffer_always_rejected(
            (width, height) in dimensions_strategy(),
            sixteen in any::<bool>(),
        ) {
            let depth = if sixteen { 16 } else { 8 };
            let required = (width * height * depth / 8) as usize;
            let data = vec![0u8; required - 1];

            let result = store_image(width, height, depth, &data);
            let rejected = matches!(
                result,
                Err(EncodeError::BufferTooSmall { required: r, actual })
                    if r == required as u64 && actual == required - 1
            );
            prop_assert!(rejected, "expected BufferTooSmall, got {:?}", result);
        }

        /// Property: same input always produces the same bytes.
        #[test]
        fn prop_deterministic_output((width, height, data) in frame_strategy(16)) {
            let first = store_image(width, height, 16, &data).unwrap();
            let second = store_image(width, height, 16, &data).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
