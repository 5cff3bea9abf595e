use super::BitArray;
use crate::error::{DecodeError, Result};

/// Compact bit matrix for storing binary data
///
/// Rows are packed into 32-bit words with a fixed row stride (`row_size` words);
/// `true` means a black pixel or dark module.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitMatrix {
    width: usize,
    height: usize,
    row_size: usize,
    bits: Vec<u32>,
}

impl BitMatrix {
    /// Create a new bit matrix with given dimensions
    pub fn new(width: usize, height: usize) -> Self {
        let row_size = width.div_ceil(32);
        Self {
            width,
            height,
            row_size,
            bits: vec![0; row_size * height],
        }
    }

    /// Create a square matrix
    pub fn square(dimension: usize) -> Self {
        Self::new(dimension, dimension)
    }

    /// Parse a text picture where each cell is `set` or `unset`, one row per line
    pub fn parse(picture: &str, set: &str, unset: &str) -> Result<Self> {
        let mut rows: Vec<Vec<bool>> = Vec::new();
        for line in picture.lines().filter(|l| !l.trim().is_empty()) {
            let mut row = Vec::new();
            let mut rest = line;
            while !rest.is_empty() {
                if let Some(tail) = rest.strip_prefix(set) {
                    row.push(true);
                    rest = tail;
                } else if let Some(tail) = rest.strip_prefix(unset) {
                    row.push(false);
                    rest = tail;
                } else {
                    return Err(DecodeError::Format("illegal character in bit matrix picture"));
                }
            }
            rows.push(row);
        }

        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != width) {
            return Err(DecodeError::Format("bit matrix rows differ in length"));
        }

        let mut matrix = Self::new(width, rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, &bit) in row.iter().enumerate() {
                matrix.set(x, y, bit);
            }
        }
        Ok(matrix)
    }

    /// Get matrix width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get matrix height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of 32-bit words per row
    pub fn row_size(&self) -> usize {
        self.row_size
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        y * self.row_size + x / 32
    }

    /// Get bit at (x, y); coordinates outside the matrix read as white
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        (self.bits[self.offset(x, y)] >> (x & 31)) & 1 == 1
    }

    /// Signed-coordinate variant of [`get`](Self::get) used by scanners walking off the edge
    #[inline]
    pub fn get_i(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && self.get(x as usize, y as usize)
    }

    /// Set bit at (x, y)
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let offset = self.offset(x, y);
        if value {
            self.bits[offset] |= 1 << (x & 31);
        } else {
            self.bits[offset] &= !(1 << (x & 31));
        }
    }

    /// Flip bit at (x, y)
    pub fn flip(&mut self, x: usize, y: usize) {
        if x >= self.width || y >= self.height {
            return;
        }
        let offset = self.offset(x, y);
        self.bits[offset] ^= 1 << (x & 31);
    }

    /// Invert every bit
    pub fn flip_all(&mut self) {
        let tail = self.width % 32;
        let tail_mask = if tail == 0 { !0u32 } else { (1u32 << tail) - 1 };
        for row in self.bits.chunks_mut(self.row_size.max(1)) {
            for word in row.iter_mut() {
                *word = !*word;
            }
            if let Some(last) = row.last_mut() {
                *last &= tail_mask;
            }
        }
    }

    /// XOR every bit with the corresponding bit of `mask`
    pub fn xor(&mut self, mask: &BitMatrix) -> Result<()> {
        if self.width != mask.width || self.height != mask.height {
            return Err(DecodeError::Format("bit matrix dimensions differ"));
        }
        for (word, &rhs) in self.bits.iter_mut().zip(mask.bits.iter()) {
            *word ^= rhs;
        }
        Ok(())
    }

    /// Clear all bits to 0
    pub fn clear(&mut self) {
        self.bits.fill(0);
    }

    /// Set a rectangular region, clipped to the matrix
    pub fn set_region(&mut self, left: usize, top: usize, width: usize, height: usize) {
        let right = (left + width).min(self.width);
        let bottom = (top + height).min(self.height);
        for y in top..bottom {
            for x in left..right {
                let offset = self.offset(x, y);
                self.bits[offset] |= 1 << (x & 31);
            }
        }
    }

    /// Copy row `y` into a [`BitArray`], reusing `row` when it is large enough
    pub fn get_row(&self, y: usize, row: Option<BitArray>) -> BitArray {
        let mut row = match row {
            Some(mut r) if r.size() >= self.width => {
                r.clear();
                r
            }
            _ => BitArray::new(self.width),
        };
        if y < self.height {
            let start = y * self.row_size;
            for (i, &word) in self.bits[start..start + self.row_size].iter().enumerate() {
                row.set_bulk(i * 32, word);
            }
        }
        row
    }

    /// Overwrite row `y` with the contents of `row`
    pub fn set_row(&mut self, y: usize, row: &BitArray) {
        if y >= self.height {
            return;
        }
        let start = y * self.row_size;
        for (dst, &src) in self.bits[start..start + self.row_size]
            .iter_mut()
            .zip(row.words().iter())
        {
            *dst = src;
        }
    }

    /// Rotate by 180 degrees in place
    pub fn rotate180(&mut self) {
        let mut rotated = Self::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                if self.get(x, y) {
                    rotated.set(self.width - 1 - x, self.height - 1 - y, true);
                }
            }
        }
        *self = rotated;
    }

    /// Rotate 90 degrees counterclockwise in place
    pub fn rotate90(&mut self) {
        let mut rotated = Self::new(self.height, self.width);
        for y in 0..self.height {
            for x in 0..self.width {
                if self.get(x, y) {
                    rotated.set(y, self.width - 1 - x, true);
                }
            }
        }
        *self = rotated;
    }

    /// Mirror across the main diagonal, so `(x, y)` becomes `(y, x)`
    pub fn transpose(&self) -> BitMatrix {
        let mut out = Self::new(self.height, self.width);
        for y in 0..self.height {
            for x in 0..self.width {
                if self.get(x, y) {
                    out.set(y, x, true);
                }
            }
        }
        out
    }

    /// Bounding box `[left, top, width, height]` of all set bits
    pub fn enclosing_rectangle(&self) -> Option<[usize; 4]> {
        let mut left = self.width;
        let mut top = self.height;
        let mut right = 0usize;
        let mut bottom = 0usize;
        let mut any = false;

        for y in 0..self.height {
            for x32 in 0..self.row_size {
                let word = self.bits[y * self.row_size + x32];
                if word == 0 {
                    continue;
                }
                any = true;
                top = top.min(y);
                bottom = bottom.max(y);
                left = left.min(x32 * 32 + word.trailing_zeros() as usize);
                right = right.max(x32 * 32 + 31 - word.leading_zeros() as usize);
            }
        }

        if !any || right < left || bottom < top {
            return None;
        }
        Some([left, top, right - left + 1, bottom - top + 1])
    }

    /// Coordinates `(x, y)` of the first set bit in row-major order
    pub fn top_left_on_bit(&self) -> Option<(usize, usize)> {
        let offset = self.bits.iter().position(|&w| w != 0)?;
        let word = self.bits[offset];
        let x = (offset % self.row_size) * 32 + word.trailing_zeros() as usize;
        Some((x, offset / self.row_size))
    }

    /// Coordinates `(x, y)` of the last set bit in row-major order
    pub fn bottom_right_on_bit(&self) -> Option<(usize, usize)> {
        let offset = self.bits.iter().rposition(|&w| w != 0)?;
        let word = self.bits[offset];
        let x = (offset % self.row_size) * 32 + 31 - word.leading_zeros() as usize;
        Some((x, offset / self.row_size))
    }

    /// Count of set bits
    pub fn count_ones(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }
}

impl Default for BitMatrix {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl std::fmt::Display for BitMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                f.write_str(if self.get(x, y) { "X " } else { "  " })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_matrix() {
        let mut matrix = BitMatrix::new(40, 8);
        assert_eq!(matrix.width(), 40);
        assert_eq!(matrix.height(), 8);
        assert_eq!(matrix.row_size(), 2);

        matrix.set(35, 4, true);
        assert!(matrix.get(35, 4));
        assert!(!matrix.get(35, 3));

        matrix.flip(35, 4);
        assert!(!matrix.get(35, 4));

        matrix.set(1, 1, true);
        matrix.clear();
        assert!(!matrix.get(1, 1));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut matrix = BitMatrix::new(8, 8);
        matrix.set(10, 10, true); // Should not panic
        assert!(!matrix.get(10, 10));
        assert!(!matrix.get_i(-1, 3));
    }

    #[test]
    fn test_set_region_and_enclosing_rectangle() {
        let mut matrix = BitMatrix::square(50);
        assert_eq!(matrix.enclosing_rectangle(), None);
        matrix.set_region(3, 5, 34, 2);
        assert_eq!(matrix.enclosing_rectangle(), Some([3, 5, 34, 2]));
        assert_eq!(matrix.top_left_on_bit(), Some((3, 5)));
        assert_eq!(matrix.bottom_right_on_bit(), Some((36, 6)));
        assert_eq!(matrix.count_ones(), 68);
    }

    #[test]
    fn test_flip_all_keeps_padding_clear() {
        let mut matrix = BitMatrix::new(5, 2);
        matrix.flip_all();
        assert_eq!(matrix.count_ones(), 10);
        assert_eq!(matrix.bottom_right_on_bit(), Some((4, 1)));
    }

    #[test]
    fn test_rotations_and_transpose() {
        let mut matrix = BitMatrix::new(3, 2);
        matrix.set(0, 0, true);
        matrix.set(2, 1, true);

        let mut r180 = matrix.clone();
        r180.rotate180();
        assert!(r180.get(2, 1));
        assert!(r180.get(0, 0));

        let mut r90 = matrix.clone();
        r90.rotate90();
        assert_eq!((r90.width(), r90.height()), (2, 3));
        assert!(r90.get(0, 2));
        assert!(r90.get(1, 0));

        let t = matrix.transpose();
        assert_eq!((t.width(), t.height()), (2, 3));
        assert!(t.get(0, 0));
        assert!(t.get(1, 2));
        assert_eq!(t.transpose(), matrix);
    }

    #[test]
    fn test_rows_round_trip() {
        let mut matrix = BitMatrix::new(33, 3);
        matrix.set(0, 1, true);
        matrix.set(32, 1, true);
        let row = matrix.get_row(1, None);
        assert!(row.get(0) && row.get(32));

        let mut other = BitMatrix::new(33, 3);
        other.set_row(2, &row);
        assert!(other.get(32, 2));
        assert!(!other.get(32, 1));
    }

    #[test]
    fn test_parse_and_xor() {
        let mut matrix = BitMatrix::parse("X   X \n  X   \n", "X ", "  ").expect("picture parses");
        assert_eq!((matrix.width(), matrix.height()), (3, 2));
        assert!(matrix.get(0, 0) && matrix.get(2, 0) && matrix.get(1, 1));

        let mask = matrix.clone();
        matrix.xor(&mask).expect("same dimensions");
        assert_eq!(matrix.count_ones(), 0);
        assert!(matrix.xor(&BitMatrix::new(2, 2)).is_err());
    }

    #[test]
    fn test_parse_rejects_ragged_rows() {
        assert!(BitMatrix::parse("XX\nX\n", "X", " ").is_err());
        assert!(BitMatrix::parse("X?\n", "X", " ").is_err());
    }
}
