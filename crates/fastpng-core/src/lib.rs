//! fastpng Core - speed-first grayscale PNG encoder
//!
//! This crate turns raw depth or sensor frames (8-bit or 16-bit grayscale
//! samples) into PNG files as quickly as possible. Output size is secondary:
//! every frame is written with the SUB filter and the fastest deflate setting.
//!
//! Decoding, color, palette and interlaced output are out of scope.

pub mod encode;

pub use encode::{
    encode_gray16, encode_gray8, store_image, BitDepth, CodecSession, EncodeError,
    EncodeErrorKind, EncodeOutput, EncodeRequest, EncoderPolicy, ErrorSink, RowView,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports_encode() {
        let png = store_image(1, 1, 8, &[0x42]).unwrap();
        assert!(!png.is_empty());
    }

    #[test]
    fn test_policy_serializes() {
        // serde derive is part of the public contract for policy reporting.
        fn assert_serialize<T: serde::Serialize>(_: &T) {}
        assert_serialize(&EncoderPolicy::FAST);
        assert_serialize(&BitDepth::Sixteen);
        assert_serialize(&EncodeErrorKind::Streaming);
    }
}
