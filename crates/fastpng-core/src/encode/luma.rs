//! Entry points for frames already held in `image` buffers.

use image::{GrayImage, ImageBuffer, Luma};

use super::session::store_image;
use super::types::EncodeError;

/// Encode an 8-bit grayscale image buffer.
pub fn encode_gray8(img: &GrayImage) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = img.dimensions();
    store_image(width, height, 8, img.as_raw())
}

/// Encode a 16-bit grayscale image buffer.
///
/// Samples are laid out little-endian before encoding, which is the order
/// [`store_image`] expects for 16-bit data.
pub fn encode_gray16(img: &ImageBuffer<Luma<u16>, Vec<u16>>) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = img.dimensions();
    let samples: Vec<u8> = img.as_raw().iter().flat_map(|s| s.to_le_bytes()).collect();
    store_image(width, height, 16, &samples)
}
