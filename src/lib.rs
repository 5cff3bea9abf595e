//! qr_reader - QR code reading in pure Rust
//!
//! A single-symbol QR decoder: luminance in, text out. The pipeline is
//! binarization, finder and alignment pattern detection, perspective grid
//! sampling, format/version extraction, Reed-Solomon correction and payload
//! parsing, with a transposed retry for mirrored symbols.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// QR code decoding modules (error correction, format extraction, data modes)
pub mod decoder;
/// QR code detection modules (finder patterns, alignment, grid sampling)
pub mod detector;
/// Error types
pub mod error;
/// Core data structures (QRCode, BitMatrix, Point, etc.)
pub mod models;
/// High-level reader tying detection and decoding together
pub mod reader;
/// Helpers for loading images from disk
pub mod tools;
/// Utility functions (grayscale, luminance, binarization, geometry)
pub mod utils;

#[cfg(test)]
mod test_support;

pub use decoder::{DecodeHints, DecoderResult};
pub use error::{DecodeError, Result};
pub use models::{BitMatrix, ECLevel, Point, QRCode, ResultPointCallback, StructuredAppend};
pub use reader::QrReader;
pub use utils::binarization::BinarizerKind;
pub use utils::luminance::LuminanceSource;

/// Decode the QR code in a luminance source with the given hints
pub fn decode(source: LuminanceSource, hints: &DecodeHints) -> Result<QRCode> {
    QrReader::new().decode(source, hints)
}

/// Decode the QR code in an RGB image
///
/// # Arguments
/// * `image` - Raw RGB bytes (3 bytes per pixel)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
///
/// Hints come from the `QR_*` environment variables, see [`DecodeHints::from_env`].
pub fn decode_rgb(image: &[u8], width: usize, height: usize) -> Result<QRCode> {
    let source = LuminanceSource::from_rgb(width, height, image)?;
    decode(source, &DecodeHints::from_env())
}

/// Decode the QR code in an 8-bit grayscale image (1 byte per pixel)
pub fn decode_gray(image: &[u8], width: usize, height: usize) -> Result<QRCode> {
    let source = LuminanceSource::from_gray(width, height, image.to_vec())?;
    decode(source, &DecodeHints::from_env())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{render, symbol};

    #[test]
    fn test_decode_empty() {
        // 10x10 RGB, too small and featureless to hold a symbol
        let image = vec![0u8; 300];
        assert!(decode_rgb(&image, 10, 10).is_err());
    }

    #[test]
    fn test_decode_rgb_rendered() {
        let source = render(&symbol(b"RGB INPUT", 1, qrcode::EcLevel::M), 4, 4);
        let gray = source.matrix().into_owned();
        let rgb: Vec<u8> = gray.iter().flat_map(|&v| [v, v, v]).collect();
        let code = decode_rgb(&rgb, source.width(), source.height()).unwrap();
        assert_eq!(code.content, "RGB INPUT");
    }

    #[test]
    fn test_decode_gray_rejects_short_buffer() {
        assert!(decode_gray(&[0u8; 10], 10, 10).is_err());
    }
}
