//! Grayscale PNG encoding WASM bindings.
//!
//! This module exposes the fastpng-core encoder to JavaScript. Arguments are
//! marshaled straight through; failures become catchable `Error` objects whose
//! `name` is the failure kind and whose `message` carries the diagnostics.
//!
//! # Functions
//!
//! - [`store_image`] - Encode grayscale samples to PNG bytes
//! - [`PngExt::store_png`] - The same call under the `PngExt` codec module
//! - [`encoder_policy`] - The fixed filter/compression policy, as a plain object
//!
//! # Example
//!
//! ```typescript
//! import { PngExt, store_image } from '@nl/fast-png';
//!
//! const png = store_image(2, 2, 8, new Uint8Array([0xff, 0x00, 0x00, 0xff]));
//! const same = PngExt.store_png(2, 2, 8, new Uint8Array([0xff, 0x00, 0x00, 0xff]));
//! ```

use fastpng_core::{EncodeError, EncodeErrorKind, EncoderPolicy};
use wasm_bindgen::prelude::*;

/// Encode grayscale samples to PNG bytes.
///
/// # Arguments
///
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `depth` - Bits per sample, 8 or 16
/// * `data` - Row-major samples as a `Uint8Array`; 16-bit samples little-endian
///
/// # Errors
///
/// Throws an `Error` if:
/// - `depth` is not 8 or 16
/// - `data` is shorter than `width * height * depth / 8`
/// - The encoder fails while writing the header, rows or trailer
///
/// The input array is read in place for the duration of the call and must
/// not be modified by another worker until it returns.
#[wasm_bindgen]
pub fn store_image(width: u32, height: u32, depth: u32, data: &[u8]) -> Result<Vec<u8>, JsValue> {
    fastpng_core::store_image(width, height, depth, data).map_err(to_js_error)
}

/// The `PngExt` codec module.
///
/// Groups the encoder the way the `NL.FastPng.PngExt` namespace did: the
/// package is the organization and feature, this class is the codec module.
#[wasm_bindgen]
pub struct PngExt {
    _private: (),
}

#[wasm_bindgen]
impl PngExt {
    /// Encode grayscale samples to PNG bytes. See [`store_image`].
    pub fn store_png(width: u32, height: u32, depth: u32, data: &[u8]) -> Result<Vec<u8>, JsValue> {
        store_image(width, height, depth, data)
    }
}

/// The filter/compression policy every frame is written with.
///
/// Returns a plain object such as
/// `{ filter: "Sub", compression: "Fastest", interlaced: false }`.
#[wasm_bindgen]
pub fn encoder_policy() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&EncoderPolicy::FAST).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// JavaScript `Error.name` for each failure kind.
pub(crate) fn error_name(kind: EncodeErrorKind) -> &'static str {
    match kind {
        EncodeErrorKind::InvalidDepth => "InvalidDepthError",
        EncodeErrorKind::BufferTooSmall => "BufferTooSmallError",
        EncodeErrorKind::WriterInit => "WriterInitError",
        EncodeErrorKind::InfoInit => "InfoInitError",
        EncodeErrorKind::Header => "HeaderError",
        EncodeErrorKind::Streaming => "StreamingError",
    }
}

fn to_js_error(err: EncodeError) -> JsValue {
    let js_err = js_sys::Error::new(&err.to_string());
    js_err.set_name(error_name(err.kind()));
    js_err.into()
}
