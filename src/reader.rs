//! User-facing entry point: luminance in, decoded [`QRCode`] out.

use log::debug;
use rayon::prelude::*;

use crate::decoder::{DecodeHints, DecoderResult, QrDecoder};
use crate::detector::Detector;
use crate::error::{DecodeError, Result};
use crate::models::{BitMatrix, Point, QRCode};
use crate::utils::binarization::Binarizer;
use crate::utils::luminance::LuminanceSource;

/// Binarize, detect, sample and decode one symbol per image
pub struct QrReader {
    decoder: QrDecoder,
}

impl Default for QrReader {
    fn default() -> Self {
        Self::new()
    }
}

impl QrReader {
    /// Reader with a fresh Reed-Solomon decoder
    pub fn new() -> Self {
        Self {
            decoder: QrDecoder::new(),
        }
    }

    /// Decode the single QR code in `source`
    pub fn decode(&self, source: LuminanceSource, hints: &DecodeHints) -> Result<QRCode> {
        let mut binarizer = Binarizer::new(hints.binarizer, source);
        let image = binarizer.black_matrix()?;

        let (result, mut points) = if hints.pure_barcode {
            let bits = extract_pure_bits(image)?;
            (self.decoder.decode_bit_matrix(bits, hints)?, Vec::new())
        } else {
            let detected = Detector::new(image).detect(hints)?;
            (
                self.decoder.decode_bit_matrix(detected.bits, hints)?,
                detected.points,
            )
        };

        if let Some(meta) = result.other {
            meta.apply_mirrored_correction(&mut points);
        }
        debug!(
            "decoded v{} {} mask {}: {} chars",
            result.version_number,
            result.ec_level,
            result.data_mask,
            result.text.chars().count()
        );
        Ok(into_qr_code(result, points))
    }

    /// Decode many images in parallel; each gets its own binarizer, detector and decoder
    pub fn decode_batch(sources: &[LuminanceSource], hints: &DecodeHints) -> Vec<Result<QRCode>> {
        sources
            .par_iter()
            .map(|source| QrReader::new().decode(source.clone(), hints))
            .collect()
    }
}

fn into_qr_code(result: DecoderResult, points: Vec<Point>) -> QRCode {
    let mirrored = result.is_mirrored();
    QRCode {
        content: result.text,
        raw_bytes: result.raw_bytes,
        byte_segments: result.byte_segments,
        version: result.version_number,
        error_correction: result.ec_level,
        mask: result.data_mask,
        points,
        errors_corrected: result.errors_corrected,
        erasures: result.erasures,
        structured_append: result.structured_append,
        symbology_identifier: format!("]Q{}", result.symbology_modifier),
        mirrored,
    }
}

/// Read the module grid straight off an unrotated, unskewed symbol.
///
/// The symbol's extent comes from its first and last dark pixels, the module
/// size from the diagonal through the top-left finder. Samples are taken half
/// a module in from each module's corner.
pub fn extract_pure_bits(image: &BitMatrix) -> Result<BitMatrix> {
    let (left_top_x, left_top_y) = image.top_left_on_bit().ok_or(DecodeError::NotFound)?;
    let (right_bottom_x, right_bottom_y) =
        image.bottom_right_on_bit().ok_or(DecodeError::NotFound)?;

    let module_size = module_size(left_top_x, left_top_y, image)?;

    let mut top = left_top_y as i64;
    let bottom = right_bottom_y as i64;
    let mut left = left_top_x as i64;
    let mut right = right_bottom_x as i64;

    if left >= right || top >= bottom {
        return Err(DecodeError::NotFound);
    }
    if bottom - top != right - left {
        // Assume a square symbol; the bottom-right corner may be light
        right = left + (bottom - top);
        if right >= image.width() as i64 {
            return Err(DecodeError::NotFound);
        }
    }

    let matrix_width = ((right - left + 1) as f32 / module_size).round() as i64;
    let matrix_height = ((bottom - top + 1) as f32 / module_size).round() as i64;
    if matrix_width <= 0 || matrix_height <= 0 || matrix_height != matrix_width {
        return Err(DecodeError::NotFound);
    }

    let nudge = (module_size / 2.0) as i64;
    top += nudge;
    left += nudge;

    let nudged_too_far_right = left + ((matrix_width - 1) as f32 * module_size) as i64 - right;
    if nudged_too_far_right > 0 {
        if nudged_too_far_right > nudge {
            return Err(DecodeError::NotFound);
        }
        left -= nudged_too_far_right;
    }
    let nudged_too_far_down = top + ((matrix_height - 1) as f32 * module_size) as i64 - bottom;
    if nudged_too_far_down > 0 {
        if nudged_too_far_down > nudge {
            return Err(DecodeError::NotFound);
        }
        top -= nudged_too_far_down;
    }

    let dimension = matrix_width as usize;
    let mut bits = BitMatrix::square(dimension);
    for y in 0..dimension {
        let i_offset = top + (y as f32 * module_size) as i64;
        for x in 0..dimension {
            let j_offset = left + (x as f32 * module_size) as i64;
            if image.get_i(j_offset as i32, i_offset as i32) {
                bits.set(x, y, true);
            }
        }
    }
    Ok(bits)
}

/// Walk the diagonal from the first dark pixel across the finder's five edges
fn module_size(left_top_x: usize, left_top_y: usize, image: &BitMatrix) -> Result<f32> {
    let (width, height) = (image.width(), image.height());
    let (mut x, mut y) = (left_top_x, left_top_y);
    let mut in_black = true;
    let mut transitions = 0;
    while x < width && y < height {
        if in_black != image.get(x, y) {
            transitions += 1;
            if transitions == 5 {
                break;
            }
            in_black = !in_black;
        }
        x += 1;
        y += 1;
    }
    if x == width || y == height {
        return Err(DecodeError::NotFound);
    }
    Ok((x - left_top_x) as f32 / 7.0)
}
