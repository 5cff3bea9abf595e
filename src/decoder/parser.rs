/// Reads format, version and codewords out of a sampled symbol
use log::trace;

use super::data_mask::DataMask;
use super::format::FormatInformation;
use super::function_mask::FunctionMask;
use super::version::Version;
use crate::error::{DecodeError, Result};
use crate::models::BitMatrix;

/// Walks a rectified, square module grid.
///
/// Format and version are read lazily and cached until the mirror state changes.
pub struct BitMatrixParser {
    bit_matrix: BitMatrix,
    parsed_version: Option<&'static Version>,
    parsed_format_info: Option<FormatInformation>,
    applied_mask: Option<DataMask>,
    mirror: bool,
}

impl BitMatrixParser {
    /// Dimension must be at least 21 and equal to 1 mod 4
    pub fn new(bit_matrix: BitMatrix) -> Result<Self> {
        let dimension = bit_matrix.height();
        if dimension < 21 || (dimension & 0x03) != 1 {
            return Err(DecodeError::Format("symbol dimension must be 21 + 4k"));
        }
        if bit_matrix.width() != dimension {
            return Err(DecodeError::Format("symbol must be square"));
        }
        Ok(Self {
            bit_matrix,
            parsed_version: None,
            parsed_format_info: None,
            applied_mask: None,
            mirror: false,
        })
    }

    /// The module grid in its current state (masked or not, mirrored or not)
    pub fn bit_matrix(&self) -> &BitMatrix {
        &self.bit_matrix
    }

    fn copy_bit(&self, i: usize, j: usize, version_bits: u32) -> u32 {
        let bit = if self.mirror {
            self.bit_matrix.get(j, i)
        } else {
            self.bit_matrix.get(i, j)
        };
        if bit {
            (version_bits << 1) | 0x1
        } else {
            version_bits << 1
        }
    }

    /// Read both copies of the format information around the finder patterns
    pub fn read_format_information(&mut self) -> Result<FormatInformation> {
        if let Some(format_info) = self.parsed_format_info {
            return Ok(format_info);
        }

        // Top-left: along row 8, then up column 8, skipping the timing modules
        let mut format_info_bits1 = 0;
        for i in 0..6 {
            format_info_bits1 = self.copy_bit(i, 8, format_info_bits1);
        }
        format_info_bits1 = self.copy_bit(7, 8, format_info_bits1);
        format_info_bits1 = self.copy_bit(8, 8, format_info_bits1);
        format_info_bits1 = self.copy_bit(8, 7, format_info_bits1);
        for j in (0..6).rev() {
            format_info_bits1 = self.copy_bit(8, j, format_info_bits1);
        }

        // Top-right and bottom-left halves of the second copy
        let dimension = self.bit_matrix.height();
        let mut format_info_bits2 = 0;
        for j in (dimension - 7..dimension).rev() {
            format_info_bits2 = self.copy_bit(8, j, format_info_bits2);
        }
        for i in dimension - 8..dimension {
            format_info_bits2 = self.copy_bit(i, 8, format_info_bits2);
        }

        let format_info = FormatInformation::decode(format_info_bits1, format_info_bits2)
            .ok_or(DecodeError::Format("format information unreadable"))?;
        trace!(
            "format bits {:#06x}/{:#06x}: ec={} mask={}",
            format_info_bits1,
            format_info_bits2,
            format_info.error_correction_level,
            format_info.data_mask
        );
        self.parsed_format_info = Some(format_info);
        Ok(format_info)
    }

    /// Version from dimension for versions 1-6, from the version blocks otherwise
    pub fn read_version(&mut self) -> Result<&'static Version> {
        if let Some(version) = self.parsed_version {
            return Ok(version);
        }

        let dimension = self.bit_matrix.height();
        let provisional_version = (dimension - 17) / 4;
        if provisional_version <= 6 {
            let version = Version::for_number(provisional_version as u32)?;
            self.parsed_version = Some(version);
            return Ok(version);
        }

        // Top-right block
        let ij_min = dimension - 11;
        let mut version_bits = 0;
        for j in (0..=5).rev() {
            for i in (ij_min..=dimension - 9).rev() {
                version_bits = self.copy_bit(i, j, version_bits);
            }
        }
        if let Some(version) = Self::matching_version(version_bits, dimension) {
            self.parsed_version = Some(version);
            return Ok(version);
        }

        // Bottom-left block
        version_bits = 0;
        for i in (0..=5).rev() {
            for j in (ij_min..=dimension - 9).rev() {
                version_bits = self.copy_bit(i, j, version_bits);
            }
        }
        if let Some(version) = Self::matching_version(version_bits, dimension) {
            self.parsed_version = Some(version);
            return Ok(version);
        }

        Err(DecodeError::Format("version information unreadable"))
    }

    fn matching_version(version_bits: u32, dimension: usize) -> Option<&'static Version> {
        Version::decode_version_information(version_bits)
            .filter(|version| version.dimension_for_version() == dimension)
    }

    /// Unmask the data region and read codewords in the standard zig-zag order
    pub fn read_codewords(&mut self) -> Result<Vec<u8>> {
        let format_info = self.read_format_information()?;
        let version = self.read_version()?;

        let dimension = self.bit_matrix.height();
        let data_mask = DataMask::for_reference(format_info.data_mask)?;
        if self.applied_mask.is_none() {
            data_mask.unmask_bit_matrix(&mut self.bit_matrix, dimension);
            self.applied_mask = Some(data_mask);
        }

        let function_pattern = FunctionMask::new(version);
        let total_codewords = version.total_codewords();
        let mut result = Vec::with_capacity(total_codewords);
        let mut reading_up = true;
        let mut current_byte = 0u8;
        let mut bits_read = 0;

        // Column pairs right to left, skipping the vertical timing column
        let mut j = dimension - 1;
        while j > 0 {
            if j == 6 {
                j -= 1;
            }
            for count in 0..dimension {
                let i = if reading_up { dimension - 1 - count } else { count };
                for col in 0..2 {
                    if !function_pattern.is_function(j - col, i) {
                        bits_read += 1;
                        current_byte <<= 1;
                        if self.bit_matrix.get(j - col, i) {
                            current_byte |= 1;
                        }
                        if bits_read == 8 {
                            result.push(current_byte);
                            bits_read = 0;
                            current_byte = 0;
                        }
                    }
                }
            }
            reading_up = !reading_up;
            j = j.saturating_sub(2);
        }

        if result.len() != total_codewords {
            return Err(DecodeError::Format("codeword count does not match version"));
        }
        Ok(result)
    }

    /// Re-apply the data mask removed by [`read_codewords`](Self::read_codewords)
    pub fn remask(&mut self) {
        if let Some(mask) = self.applied_mask.take() {
            let dimension = self.bit_matrix.height();
            mask.unmask_bit_matrix(&mut self.bit_matrix, dimension);
        }
    }

    /// Read format and version transposed; clears the cached values
    pub fn set_mirror(&mut self, mirror: bool) {
        self.parsed_version = None;
        self.parsed_format_info = None;
        self.mirror = mirror;
    }

    /// Transpose the module grid in place
    pub fn mirror(&mut self) {
        self.bit_matrix = self.bit_matrix.transpose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ECLevel;
    use crate::test_support::symbol;

    #[test]
    fn test_rejects_bad_dimensions() {
        assert!(BitMatrixParser::new(BitMatrix::square(20)).is_err());
        assert!(BitMatrixParser::new(BitMatrix::square(23)).is_err());
        assert!(BitMatrixParser::new(BitMatrix::square(17)).is_err());
        assert!(BitMatrixParser::new(BitMatrix::new(21, 25)).is_err());
        assert!(BitMatrixParser::new(BitMatrix::square(21)).is_ok());
    }

    #[test]
    fn test_format_bits_of_mask_constant() {
        // Write 0x5412 into the first format copy only; second copy stays blank
        let mut bits = BitMatrix::square(21);
        let format = 0x5412u32;
        let positions: Vec<(usize, usize)> = (0..6)
            .map(|i| (i, 8))
            .chain([(7, 8), (8, 8), (8, 7)])
            .chain((0..6).rev().map(|j| (8, j)))
            .collect();
        for (k, &(x, y)) in positions.iter().enumerate() {
            if (format >> (14 - k)) & 1 == 1 {
                bits.set(x, y, true);
            }
        }
        let mut parser = BitMatrixParser::new(bits).unwrap();
        let info = parser.read_format_information().unwrap();
        assert_eq!(info.error_correction_level, ECLevel::M);
        assert_eq!(info.data_mask, 0);
    }

    #[test]
    fn test_reads_generated_symbol() {
        let bits = symbol(b"HELLO WORLD", 1, qrcode::EcLevel::Q);
        let mut parser = BitMatrixParser::new(bits).unwrap();
        let info = parser.read_format_information().unwrap();
        assert_eq!(info.error_correction_level, ECLevel::Q);
        assert_eq!(parser.read_version().unwrap().version_number(), 1);
        let codewords = parser.read_codewords().unwrap();
        assert_eq!(codewords.len(), 26);
        // Alphanumeric mode indicator 0010 in the first nibble
        assert_eq!(codewords[0] >> 4, 0b0010);
    }

    #[test]
    fn test_small_version_is_cached() {
        let bits = symbol(b"CACHE", 3, qrcode::EcLevel::M);
        let mut parser = BitMatrixParser::new(bits).unwrap();
        assert!(parser.parsed_version.is_none());
        assert_eq!(parser.read_version().unwrap().version_number(), 3);
        assert_eq!(parser.parsed_version.map(|v| v.version_number()), Some(3));
        parser.set_mirror(true);
        assert!(parser.parsed_version.is_none());
    }

    #[test]
    fn test_reads_version_blocks() {
        let bits = symbol(b"version seven", 7, qrcode::EcLevel::L);
        assert_eq!(bits.width(), 45);
        let mut parser = BitMatrixParser::new(bits).unwrap();
        assert_eq!(parser.read_version().unwrap().version_number(), 7);
        assert_eq!(parser.read_codewords().unwrap().len(), 196);
    }

    #[test]
    fn test_remask_restores_grid() {
        let bits = symbol(b"12345", 2, qrcode::EcLevel::M);
        let original = bits.clone();
        let mut parser = BitMatrixParser::new(bits).unwrap();
        parser.read_codewords().unwrap();
        assert_ne!(parser.bit_matrix(), &original);
        parser.remask();
        assert_eq!(parser.bit_matrix(), &original);
        // A second remask has nothing to undo
        parser.remask();
        assert_eq!(parser.bit_matrix(), &original);
    }

    #[test]
    fn test_mirrored_read() {
        let bits = symbol(b"mirror", 2, qrcode::EcLevel::H);
        let mut expected = BitMatrixParser::new(bits.clone()).unwrap();
        let expected_codewords = expected.read_codewords().unwrap();

        let mut parser = BitMatrixParser::new(bits.transpose()).unwrap();
        parser.set_mirror(true);
        parser.read_version().unwrap();
        let info = parser.read_format_information().unwrap();
        assert_eq!(info.error_correction_level, ECLevel::H);
        parser.mirror();
        assert_eq!(parser.read_codewords().unwrap(), expected_codewords);
    }
}
