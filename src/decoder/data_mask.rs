/// Data masks, referenced by the 3-bit id in the format information.
///
/// Coordinates follow the standard's convention: `i` is the row, `j` the column.
use crate::error::{DecodeError, Result};
use crate::models::BitMatrix;

/// One of the eight mask patterns XORed over the data region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataMask {
    /// (i + j) mod 2 == 0
    Mask000,
    /// i mod 2 == 0
    Mask001,
    /// j mod 3 == 0
    Mask010,
    /// (i + j) mod 3 == 0
    Mask011,
    /// (i/2 + j/3) mod 2 == 0
    Mask100,
    /// (i*j) mod 2 + (i*j) mod 3 == 0
    Mask101,
    /// ((i*j) mod 2 + (i*j) mod 3) mod 2 == 0
    Mask110,
    /// ((i+j) mod 2 + (i*j) mod 3) mod 2 == 0
    Mask111,
}

const DATA_MASKS: [DataMask; 8] = [
    DataMask::Mask000,
    DataMask::Mask001,
    DataMask::Mask010,
    DataMask::Mask011,
    DataMask::Mask100,
    DataMask::Mask101,
    DataMask::Mask110,
    DataMask::Mask111,
];

impl DataMask {
    /// Mask for a format-information reference (0-7)
    pub fn for_reference(reference: u8) -> Result<Self> {
        DATA_MASKS
            .get(reference as usize)
            .copied()
            .ok_or(DecodeError::Format("data mask reference out of range"))
    }

    /// Reference id of this mask
    pub fn reference(self) -> u8 {
        self as u8
    }

    /// Whether the module at row `i`, column `j` is inverted by this mask
    #[inline]
    pub fn is_masked(self, i: usize, j: usize) -> bool {
        match self {
            DataMask::Mask000 => (i + j) & 0x01 == 0,
            DataMask::Mask001 => i & 0x01 == 0,
            DataMask::Mask010 => j % 3 == 0,
            DataMask::Mask011 => (i + j) % 3 == 0,
            DataMask::Mask100 => ((i / 2) + (j / 3)) & 0x01 == 0,
            DataMask::Mask101 => (i * j) % 6 == 0,
            DataMask::Mask110 => (i * j) % 6 < 3,
            DataMask::Mask111 => ((i + j + ((i * j) % 3)) & 0x01) == 0,
        }
    }

    /// Flip every masked module of a `dimension` x `dimension` symbol in place.
    ///
    /// Applying the same mask twice restores the matrix. Function patterns are
    /// flipped too; callers skip them when reading codewords.
    pub fn unmask_bit_matrix(self, bits: &mut BitMatrix, dimension: usize) {
        for i in 0..dimension {
            for j in 0..dimension {
                if self.is_masked(i, j) {
                    bits.flip(j, i);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_predicate(mask: u8, i: usize, j: usize) -> bool {
        match mask {
            0 => (i + j) % 2 == 0,
            1 => i % 2 == 0,
            2 => j % 3 == 0,
            3 => (i + j) % 3 == 0,
            4 => (i / 2 + j / 3) % 2 == 0,
            5 => (i * j) % 2 + (i * j) % 3 == 0,
            6 => ((i * j) % 2 + (i * j) % 3) % 2 == 0,
            _ => ((i + j) % 2 + (i * j) % 3) % 2 == 0,
        }
    }

    #[test]
    fn test_predicates_match_standard_formulas() {
        for reference in 0..8u8 {
            let mask = DataMask::for_reference(reference).unwrap();
            assert_eq!(mask.reference(), reference);
            for i in 0..30 {
                for j in 0..30 {
                    assert_eq!(
                        mask.is_masked(i, j),
                        reference_predicate(reference, i, j),
                        "mask {} at row {} col {}",
                        reference,
                        i,
                        j
                    );
                }
            }
        }
        assert!(DataMask::for_reference(8).is_err());
    }

    #[test]
    fn test_unmask_flips_row_column_convention() {
        // Mask001 inverts whole even rows
        let mut bits = BitMatrix::square(21);
        DataMask::Mask001.unmask_bit_matrix(&mut bits, 21);
        assert!(bits.get(5, 0), "row 0 is even and should be flipped");
        assert!(!bits.get(0, 1), "row 1 is odd and should stay");

        // Mask010 inverts every third column
        let mut bits = BitMatrix::square(21);
        DataMask::Mask010.unmask_bit_matrix(&mut bits, 21);
        assert!(bits.get(3, 7));
        assert!(!bits.get(4, 7));
    }

    #[test]
    fn test_unmask_twice_is_identity() {
        let mut bits = BitMatrix::square(25);
        bits.set(3, 4, true);
        bits.set(20, 11, true);
        let original = bits.clone();
        for mask in DATA_MASKS {
            mask.unmask_bit_matrix(&mut bits, 25);
            mask.unmask_bit_matrix(&mut bits, 25);
            assert_eq!(bits, original, "{:?} applied twice should be identity", mask);
        }
    }
}
