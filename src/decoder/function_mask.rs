use super::version::Version;
use crate::models::BitMatrix;

/// Function module mask for a specific QR version.
/// true = function module (not data), false = data module.
pub struct FunctionMask {
    mask: BitMatrix,
    version: u8,
}

impl FunctionMask {
    /// Mark finder patterns with separators and format info, alignment patterns,
    /// timing patterns and, from version 7, the version info blocks.
    pub fn new(version: &Version) -> Self {
        let size = version.dimension_for_version();
        let mut mask = BitMatrix::square(size);

        // Top left finder pattern + separator + format
        mask.set_region(0, 0, 9, 9);
        // Top right finder pattern + separator + format
        mask.set_region(size - 8, 0, 8, 9);
        // Bottom left finder pattern + separator + format (covers the dark module)
        mask.set_region(0, size - 8, 9, 8);

        // Alignment patterns, except where they would overlap a finder
        let centers = version.alignment_pattern_centers();
        let max = centers.len();
        for x in 0..max {
            let top = centers[x] as usize - 2;
            for y in 0..max {
                if (x == 0 && (y == 0 || y == max - 1)) || (x == max - 1 && y == 0) {
                    continue;
                }
                mask.set_region(centers[y] as usize - 2, top, 5, 5);
            }
        }

        // Vertical and horizontal timing patterns
        mask.set_region(6, 9, 1, size - 17);
        mask.set_region(9, 6, size - 17, 1);

        if version.version_number() > 6 {
            // Version info, top right and bottom left
            mask.set_region(size - 11, 0, 3, 6);
            mask.set_region(0, size - 11, 6, 3);
        }

        Self {
            mask,
            version: version.version_number(),
        }
    }

    /// Modules per side
    pub fn size(&self) -> usize {
        self.mask.width()
    }

    /// Version the map was built for
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Whether the module at `(x, y)` is part of a function pattern
    #[inline]
    pub fn is_function(&self, x: usize, y: usize) -> bool {
        self.mask.get(x, y)
    }

    /// Modules left over for data and EC bits
    pub fn data_modules_count(&self) -> usize {
        let size = self.size();
        size * size - self.mask.count_ones()
    }

    /// The mask as a plain bit matrix
    pub fn into_matrix(self) -> BitMatrix {
        self.mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remainder_bits(version: u32) -> usize {
        match version {
            1 => 0,
            2..=6 => 7,
            7..=13 => 0,
            14..=20 => 3,
            21..=27 => 4,
            28..=34 => 3,
            _ => 0,
        }
    }

    #[test]
    fn test_data_modules_match_codeword_capacity() {
        for n in 1..=40u32 {
            let version = Version::for_number(n).unwrap();
            let mask = FunctionMask::new(version);
            assert_eq!(mask.version() as u32, n);
            assert_eq!(
                mask.data_modules_count(),
                version.total_codewords() * 8 + remainder_bits(n),
                "version {} data module count",
                n
            );
        }
    }

    #[test]
    fn test_version_one_layout() {
        let mask = FunctionMask::new(Version::for_number(1).unwrap());
        assert_eq!(mask.size(), 21);
        // Finder corners and format areas
        assert!(mask.is_function(0, 0));
        assert!(mask.is_function(8, 8));
        assert!(mask.is_function(20, 8));
        assert!(mask.is_function(8, 20));
        // Timing
        assert!(mask.is_function(6, 10));
        assert!(mask.is_function(10, 6));
        // Data
        assert!(!mask.is_function(9, 9));
        assert!(!mask.is_function(20, 20));
        assert!(!mask.is_function(12, 0));
    }

    #[test]
    fn test_alignment_and_version_areas() {
        let mask = FunctionMask::new(Version::for_number(7).unwrap());
        let size = mask.size();
        assert_eq!(size, 45);
        // Alignment centred at (22, 22), (38, 38), (22, 6)
        assert!(mask.is_function(22, 22));
        assert!(mask.is_function(40, 40));
        assert!(mask.is_function(24, 4));
        assert!(!mask.is_function(41, 41));
        // Version info blocks
        assert!(mask.is_function(size - 11, 0));
        assert!(mask.is_function(size - 9, 5));
        assert!(mask.is_function(5, size - 9));
        assert!(!mask.is_function(size - 12, 0));
    }
}
