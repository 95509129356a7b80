//! Core types for grayscale PNG encoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while encoding a grayscale frame.
///
/// Every variant that is raised after validation carries the text accumulated
/// in the call's [`ErrorSink`](super::ErrorSink).
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Bit depth is neither 8 nor 16.
    #[error("Depth must be either 8 or 16 (got {0}).")]
    InvalidDepth(u32),

    /// Sample buffer is shorter than `width * height * (depth / 8)`.
    #[error("Data must contain at least {required} bytes (got {actual}).")]
    BufferTooSmall { required: u64, actual: usize },

    /// The output sink could not be created.
    #[error("Unable to create PNG writing structure: {diagnostics}")]
    WriterInit { diagnostics: String },

    /// The PNG header state could not be created.
    #[error("Unable to create PNG info structure: {diagnostics}")]
    InfoInit { diagnostics: String },

    /// The PNG header could not be written (e.g. zero width or height).
    #[error("A PNG error occurred: {diagnostics}")]
    Header { diagnostics: String },

    /// A fatal error while streaming rows or writing the trailer.
    #[error("A PNG error occurred while writing: {diagnostics}")]
    Streaming { diagnostics: String },
}

impl EncodeError {
    /// The category of this error, without its message.
    pub fn kind(&self) -> EncodeErrorKind {
        match self {
            EncodeError::InvalidDepth(_) => EncodeErrorKind::InvalidDepth,
            EncodeError::BufferTooSmall { .. } => EncodeErrorKind::BufferTooSmall,
            EncodeError::WriterInit { .. } => EncodeErrorKind::WriterInit,
            EncodeError::InfoInit { .. } => EncodeErrorKind::InfoInit,
            EncodeError::Header { .. } => EncodeErrorKind::Header,
            EncodeError::Streaming { .. } => EncodeErrorKind::Streaming,
        }
    }

    /// Returns true if the caller supplied arguments that were rejected
    /// before any encoder state was created.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            EncodeError::InvalidDepth(_) | EncodeError::BufferTooSmall { .. }
        )
    }
}

/// Failure categories of [`EncodeError`], suitable for structured reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncodeErrorKind {
    InvalidDepth,
    BufferTooSmall,
    WriterInit,
    InfoInit,
    Header,
    Streaming,
}

/// Bits per grayscale sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum BitDepth {
    /// One byte per sample.
    Eight = 8,
    /// Two bytes per sample, supplied little-endian.
    Sixteen = 16,
}

impl BitDepth {
    /// Number of bytes each sample occupies in the source buffer.
    #[inline]
    pub fn bytes_per_sample(self) -> usize {
        match self {
            BitDepth::Eight => 1,
            BitDepth::Sixteen => 2,
        }
    }

    /// Depth in bits.
    #[inline]
    pub fn bits(self) -> u32 {
        self as u32
    }

    pub(crate) fn to_png(self) -> png::BitDepth {
        match self {
            BitDepth::Eight => png::BitDepth::Eight,
            BitDepth::Sixteen => png::BitDepth::Sixteen,
        }
    }
}

impl TryFrom<u32> for BitDepth {
    type Error = EncodeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            8 => Ok(BitDepth::Eight),
            16 => Ok(BitDepth::Sixteen),
            other => Err(EncodeError::InvalidDepth(other)),
        }
    }
}

/// Scanline filter applied to every row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowFilter {
    /// Each byte is stored as the difference from the byte one sample to its left.
    Sub,
}

/// Effort setting handed to the deflate compressor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionSpeed {
    /// Least effort; trades output size for encode latency.
    Fastest,
}

/// The fixed policy every frame is written with.
///
/// There is no knob to change it: the encoder always prefers latency over size.
/// The value exists so callers can record how a frame was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderPolicy {
    pub filter: RowFilter,
    pub compression: CompressionSpeed,
    pub interlaced: bool,
}

impl EncoderPolicy {
    /// SUB filter, fastest compression, no interlacing.
    pub const FAST: EncoderPolicy = EncoderPolicy {
        filter: RowFilter::Sub,
        compression: CompressionSpeed::Fastest,
        interlaced: false,
    };

    pub(crate) fn png_filter(&self) -> png::Filter {
        match self.filter {
            RowFilter::Sub => png::Filter::Sub,
        }
    }

    pub(crate) fn png_compression(&self) -> png::Compression {
        match self.compression {
            CompressionSpeed::Fastest => png::Compression::Fastest,
        }
    }
}

impl Default for EncoderPolicy {
    fn default() -> Self {
        Self::FAST
    }
}

/// A validated request to encode one frame.
///
/// Construction checks the depth first and the buffer length second, so a
/// request that exists always satisfies
/// `samples.len() >= width * height * (depth / 8)`.
#[derive(Debug, Clone, Copy)]
pub struct EncodeRequest<'a> {
    width: u32,
    height: u32,
    depth: BitDepth,
    samples: &'a [u8],
}

impl<'a> EncodeRequest<'a> {
    /// Validate the arguments of an encode call.
    ///
    /// # Errors
    ///
    /// - [`EncodeError::InvalidDepth`] if `depth` is not 8 or 16
    /// - [`EncodeError::BufferTooSmall`] if `samples` cannot hold every row
    pub fn new(width: u32, height: u32, depth: u32, samples: &'a [u8]) -> Result<Self, EncodeError> {
        let depth = BitDepth::try_from(depth)?;
        let required = required_len(width, height, depth);

        if (samples.len() as u64) < required {
            return Err(EncodeError::BufferTooSmall {
                required,
                actual: samples.len(),
            });
        }

        Ok(Self {
            width,
            height,
            depth,
            samples,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn depth(&self) -> BitDepth {
        self.depth
    }

    /// The full caller buffer, including any bytes past the last row.
    #[inline]
    pub fn samples(&self) -> &'a [u8] {
        self.samples
    }

    /// Bytes between the start of consecutive rows.
    #[inline]
    pub fn row_span(&self) -> usize {
        self.width as usize * self.depth.bytes_per_sample()
    }

    /// Bytes the image occupies in `samples`.
    #[inline]
    pub fn image_len(&self) -> usize {
        // Fits: validation proved the buffer holds at least this many bytes.
        required_len(self.width, self.height, self.depth) as usize
    }

    /// Bytes in `samples` that lie past the last row and will not be encoded.
    #[inline]
    pub fn trailing_len(&self) -> usize {
        self.samples.len() - self.image_len()
    }
}

/// `width * height * bytes_per_sample`, saturating at `u64::MAX`.
pub(crate) fn required_len(width: u32, height: u32, depth: BitDepth) -> u64 {
    (width as u64)
        .checked_mul(height as u64)
        .and_then(|n| n.checked_mul(depth.bytes_per_sample() as u64))
        .unwrap_or(u64::MAX)
}
