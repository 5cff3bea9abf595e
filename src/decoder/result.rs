/// Output of the bit-matrix decoder, before it is tied back to image coordinates
use crate::models::{ECLevel, Point, StructuredAppend};

/// Extra information the QR decoder attaches to a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrDecoderMetaData {
    mirrored: bool,
}

impl QrDecoderMetaData {
    /// Metadata for a read that did or did not need the mirror retry
    pub fn new(mirrored: bool) -> Self {
        Self { mirrored }
    }

    /// Whether the symbol was read transposed
    pub fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    /// A mirrored read swaps bottom-left and top-right; put them back.
    ///
    /// Expects points in bottom-left, top-left, top-right order.
    pub fn apply_mirrored_correction(&self, points: &mut [Point]) {
        if !self.mirrored || points.len() < 3 {
            return;
        }
        points.swap(0, 2);
    }
}

/// Decoded payload and error-correction statistics of one symbol
#[derive(Debug, Clone, PartialEq)]
pub struct DecoderResult {
    /// Corrected data codewords
    pub raw_bytes: Vec<u8>,
    /// Number of valid bits in `raw_bytes`
    pub num_bits: usize,
    /// Decoded text
    pub text: String,
    /// Raw bytes of each byte-mode segment
    pub byte_segments: Vec<Vec<u8>>,
    /// Error correction level from the format information
    pub ec_level: ECLevel,
    /// Symbol version, 1-40
    pub version_number: u8,
    /// Data mask id, 0-7
    pub data_mask: u8,
    /// Codewords repaired by Reed-Solomon, over all blocks
    pub errors_corrected: usize,
    /// Known-bad codewords; always 0 for QR
    pub erasures: usize,
    /// Position in a multi-symbol message, if any
    pub structured_append: Option<StructuredAppend>,
    /// Symbology modifier digit of the AIM identifier `]Q<n>`
    pub symbology_modifier: u8,
    /// Set by the decoder once it knows which orientation worked
    pub other: Option<QrDecoderMetaData>,
}

impl DecoderResult {
    /// Result with no corrections, no structured append and modifier 1
    pub fn new(
        raw_bytes: Vec<u8>,
        text: String,
        byte_segments: Vec<Vec<u8>>,
        ec_level: ECLevel,
    ) -> Self {
        let num_bits = 8 * raw_bytes.len();
        Self {
            raw_bytes,
            num_bits,
            text,
            byte_segments,
            ec_level,
            version_number: 0,
            data_mask: 0,
            errors_corrected: 0,
            erasures: 0,
            structured_append: None,
            symbology_modifier: 1,
            other: None,
        }
    }

    /// Whether the symbol is part of a structured append sequence
    pub fn has_structured_append(&self) -> bool {
        self.structured_append.is_some()
    }

    /// Whether the mirror retry produced this result
    pub fn is_mirrored(&self) -> bool {
        self.other.is_some_and(|meta| meta.is_mirrored())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirrored_correction_swaps_outer_points() {
        let mut points = vec![
            Point::new(1.0, 9.0),
            Point::new(1.0, 1.0),
            Point::new(9.0, 1.0),
            Point::new(8.0, 8.0),
        ];
        QrDecoderMetaData::new(true).apply_mirrored_correction(&mut points);
        assert_eq!(points[0], Point::new(9.0, 1.0));
        assert_eq!(points[1], Point::new(1.0, 1.0));
        assert_eq!(points[2], Point::new(1.0, 9.0));
        assert_eq!(points[3], Point::new(8.0, 8.0));
    }

    #[test]
    fn test_unmirrored_correction_is_noop() {
        let mut points = vec![Point::new(1.0, 9.0), Point::new(1.0, 1.0), Point::new(9.0, 1.0)];
        let before = points.clone();
        QrDecoderMetaData::new(false).apply_mirrored_correction(&mut points);
        assert_eq!(points, before);
    }

    #[test]
    fn test_defaults() {
        let result = DecoderResult::new(vec![1, 2], "x".into(), Vec::new(), ECLevel::L);
        assert_eq!(result.num_bits, 16);
        assert_eq!(result.symbology_modifier, 1);
        assert!(!result.is_mirrored());
        assert!(!result.has_structured_append());
    }
}
