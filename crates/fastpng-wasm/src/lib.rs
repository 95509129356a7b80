//! fastpng WASM - WebAssembly bindings for fastpng
//!
//! This crate exposes the fastpng-core grayscale PNG encoder to
//! JavaScript/TypeScript. It only marshals arguments; every encoding rule lives
//! in the core crate.
//!
//! # Module Structure
//!
//! - `encode` - `store_image`, the `PngExt` codec module and the encode policy
//! - `console` - routes core warnings and errors to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { PngExt } from '@nl/fast-png';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! // Encode a 16-bit depth frame
//! const png = PngExt.store_png(640, 480, 16, depthBytes);
//! ```

use wasm_bindgen::prelude::*;

mod console;
mod encode;

pub use encode::{encoder_policy, store_image, PngExt};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console::install();
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
