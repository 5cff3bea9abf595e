//! QR code data mode decoders
//!
//! This module contains decoders for the segment types of a QR payload:
//! - Numeric: digits packed three per 10 bits
//! - Alphanumeric: 45-character set packed two per 11 bits
//! - Byte: 8-bit data in an ECI, hinted or guessed charset
//! - Kanji / Hanzi: 13-bit double-byte characters

/// Alphanumeric segments
pub mod alphanumeric;
/// Byte segments
pub mod byte;
/// ECI designators and charsets
pub mod eci;
/// Kanji and Hanzi segments
pub mod kanji;
/// Numeric segments
pub mod numeric;

use crate::decoder::version::Version;
use crate::error::{DecodeError, Result};

/// Segment mode, from the 4-bit indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// End of data, `0000`
    Terminator,
    /// `0001`
    Numeric,
    /// `0010`
    Alphanumeric,
    /// Sequence and parity of a multi-symbol message, `0011`
    StructuredAppend,
    /// `0100`
    Byte,
    /// GS1 data follows, `0101`
    Fnc1FirstPosition,
    /// Charset switch, `0111`
    Eci,
    /// `1000`
    Kanji,
    /// AIM application indicator follows, `1001`
    Fnc1SecondPosition,
    /// GB 2312 Chinese, signalled with a subset indicator
    Hanzi,
}

impl Mode {
    /// Mode for a 4-bit indicator; unassigned values are a format error
    pub fn for_bits(bits: u32) -> Result<Self> {
        match bits {
            0x0 => Ok(Mode::Terminator),
            0x1 => Ok(Mode::Numeric),
            0x2 => Ok(Mode::Alphanumeric),
            0x3 => Ok(Mode::StructuredAppend),
            0x4 => Ok(Mode::Byte),
            0x5 => Ok(Mode::Fnc1FirstPosition),
            0x7 => Ok(Mode::Eci),
            0x8 => Ok(Mode::Kanji),
            0x9 => Ok(Mode::Fnc1SecondPosition),
            0xD => Ok(Mode::Hanzi),
            _ => Err(DecodeError::Format("unknown segment mode")),
        }
    }

    /// Width of the character count field, which grows at versions 10 and 27
    pub fn character_count_bits(self, version: &Version) -> usize {
        let widths: [usize; 3] = match self {
            Mode::Numeric => [10, 12, 14],
            Mode::Alphanumeric => [9, 11, 13],
            Mode::Byte => [8, 16, 16],
            Mode::Kanji | Mode::Hanzi => [8, 10, 12],
            _ => [0, 0, 0],
        };
        let group = match version.version_number() {
            0..=9 => 0,
            10..=26 => 1,
            _ => 2,
        };
        widths[group]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_bits() {
        assert_eq!(Mode::for_bits(0x0).unwrap(), Mode::Terminator);
        assert_eq!(Mode::for_bits(0x4).unwrap(), Mode::Byte);
        assert_eq!(Mode::for_bits(0xD).unwrap(), Mode::Hanzi);
        assert!(Mode::for_bits(0x6).is_err());
        assert!(Mode::for_bits(0xF).is_err());
    }

    #[test]
    fn test_character_count_bits() {
        let v1 = Version::for_number(1).unwrap();
        let v10 = Version::for_number(10).unwrap();
        let v40 = Version::for_number(40).unwrap();
        assert_eq!(Mode::Numeric.character_count_bits(v1), 10);
        assert_eq!(Mode::Alphanumeric.character_count_bits(v10), 11);
        assert_eq!(Mode::Byte.character_count_bits(v10), 16);
        assert_eq!(Mode::Kanji.character_count_bits(v40), 12);
        assert_eq!(Mode::Eci.character_count_bits(v40), 0);
    }
}
