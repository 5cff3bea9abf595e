//! Image-side helpers for QR code detection
//!
//! - Grayscale conversion (RGB/RGBA to luminance)
//! - Luminance sources (crop, rotate, invert views)
//! - Binarization (global histogram and hybrid block thresholds)
//! - Geometry (perspective transforms)

/// Luminance to black/white thresholding
pub mod binarization;
/// Perspective transforms
pub mod geometry;
/// Colour to luminance conversion
pub mod grayscale;
/// Grayscale pixel views
pub mod luminance;
