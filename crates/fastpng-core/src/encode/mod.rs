//! Grayscale PNG encoding pipeline.
//!
//! This module provides functionality for:
//! - Validating raw 8-bit or 16-bit grayscale sample buffers
//! - Writing them as PNG with a fixed speed-first policy (SUB filter,
//!   fastest deflate level, no interlacing)
//! - Capturing warnings and errors for each call in an [`ErrorSink`]
//!
//! # Architecture
//!
//! [`store_image`] validates its arguments into an [`EncodeRequest`] and hands
//! it to a [`CodecSession`]. The session builds the header state and then
//! passes the writer to the row streamer, which pushes every row through the
//! compressor on a worker thread and writes the trailer. Errors from any step
//! are collected in the session's sink and surface as a single
//! [`EncodeError`].
//!
//! # Examples
//!
//! ```ignore
//! use fastpng_core::encode::store_image;
//!
//! let depth_frame = vec![0u8; 640 * 480 * 2]; // little-endian u16 samples
//! let png = store_image(640, 480, 16, &depth_frame).unwrap();
//! println!("Encoded {} bytes", png.len());
//! ```

mod error_sink;
mod luma;
mod rows;
mod session;
mod sink;
mod types;

pub use error_sink::ErrorSink;
pub use luma::{encode_gray16, encode_gray8};
pub use rows::RowView;
pub use session::{store_image, CodecSession, EncodeOutput};
pub use types::{
    BitDepth, CompressionSpeed, EncodeError, EncodeErrorKind, EncodeRequest, EncoderPolicy,
    RowFilter,
};
