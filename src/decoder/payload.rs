/// Turns corrected data codewords into text, segment by segment
use log::trace;

use super::bit_source::BitSource;
use super::config::DecodeHints;
use super::modes::Mode;
use super::modes::alphanumeric::AlphanumericDecoder;
use super::modes::byte::ByteDecoder;
use super::modes::eci::{CharacterSet, parse_eci_value};
use super::modes::kanji::{GB2312_SUBSET, HanziDecoder, KanjiDecoder};
use super::modes::numeric::NumericDecoder;
use super::result::DecoderResult;
use super::version::Version;
use crate::error::{DecodeError, Result};
use crate::models::{ECLevel, StructuredAppend};

/// Parse the segment stream up to the terminator (or the end of the data).
///
/// A charset set by an ECI applies to every later byte segment until the next ECI.
pub fn decode(
    bytes: &[u8],
    version: &Version,
    ec_level: ECLevel,
    hints: &DecodeHints,
) -> Result<DecoderResult> {
    let mut bits = BitSource::new(bytes);
    let mut result = String::with_capacity(50);
    let mut byte_segments: Vec<Vec<u8>> = Vec::with_capacity(1);
    let mut structured_append = None;
    let mut current_charset: Option<CharacterSet> = None;
    let mut fc1_in_effect = false;
    let mut has_fnc1_first = false;
    let mut has_fnc1_second = false;

    loop {
        // Fewer than 4 bits left counts as an implicit terminator
        let mode = if bits.available() < 4 {
            Mode::Terminator
        } else {
            Mode::for_bits(bits.read_bits(4)?)?
        };
        trace!("segment {:?} at byte {}", mode, bits.byte_offset());

        match mode {
            Mode::Terminator => break,
            Mode::Fnc1FirstPosition => {
                has_fnc1_first = true;
                fc1_in_effect = true;
            }
            Mode::Fnc1SecondPosition => {
                has_fnc1_second = true;
                fc1_in_effect = true;
            }
            Mode::StructuredAppend => {
                if bits.available() < 16 {
                    return Err(DecodeError::Format("structured append header truncated"));
                }
                let sequence = bits.read_bits(8)? as u8;
                let parity = bits.read_bits(8)? as u8;
                structured_append = Some(StructuredAppend { sequence, parity });
            }
            Mode::Eci => {
                let value = parse_eci_value(&mut bits)?;
                current_charset = Some(
                    CharacterSet::for_eci_value(value)
                        .ok_or(DecodeError::Format("unsupported ECI value"))?,
                );
            }
            Mode::Hanzi => {
                let subset = bits.read_bits(4)?;
                let count = bits.read_bits(mode.character_count_bits(version))? as usize;
                if subset == GB2312_SUBSET {
                    HanziDecoder::decode(&mut bits, count, &mut result)?;
                }
            }
            Mode::Numeric | Mode::Alphanumeric | Mode::Byte | Mode::Kanji => {
                let count = bits.read_bits(mode.character_count_bits(version))? as usize;
                match mode {
                    Mode::Numeric => NumericDecoder::decode(&mut bits, count, &mut result)?,
                    Mode::Alphanumeric => {
                        AlphanumericDecoder::decode(&mut bits, count, fc1_in_effect, &mut result)?
                    }
                    Mode::Byte => ByteDecoder::decode(
                        &mut bits,
                        count,
                        current_charset,
                        hints.character_set.as_deref(),
                        &mut byte_segments,
                        &mut result,
                    )?,
                    _ => KanjiDecoder::decode(&mut bits, count, &mut result)?,
                }
            }
        }
    }

    let symbology_modifier = match (current_charset.is_some(), has_fnc1_first, has_fnc1_second) {
        (true, true, _) => 4,
        (true, false, true) => 6,
        (true, false, false) => 2,
        (false, true, _) => 3,
        (false, false, true) => 5,
        (false, false, false) => 1,
    };

    let mut decoded = DecoderResult::new(bytes.to_vec(), result, byte_segments, ec_level);
    decoded.version_number = version.version_number();
    decoded.structured_append = structured_append;
    decoded.symbology_modifier = symbology_modifier;
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// MSB-first bit packer, zero padded to whole bytes
    #[derive(Default)]
    struct Bits(Vec<bool>);

    impl Bits {
        fn put(mut self, value: u32, n: usize) -> Self {
            for shift in (0..n).rev() {
                self.0.push((value >> shift) & 1 == 1);
            }
            self
        }

        fn bytes(&self) -> Vec<u8> {
            self.0
                .chunks(8)
                .map(|chunk| {
                    chunk
                        .iter()
                        .enumerate()
                        .fold(0u8, |acc, (i, &b)| acc | ((b as u8) << (7 - i)))
                })
                .collect()
        }
    }

    fn parse(bits: Bits) -> Result<DecoderResult> {
        let version = Version::for_number(1).unwrap();
        decode(&bits.bytes(), version, ECLevel::M, &DecodeHints::default())
    }

    #[test]
    fn test_numeric_then_alphanumeric() {
        let bits = Bits::default()
            .put(0b0001, 4)
            .put(8, 10)
            .put(12, 10) // 012
            .put(345, 10)
            .put(67, 7)
            .put(0b0010, 4)
            .put(2, 9)
            .put(10 * 45 + 11, 11) // AB
            .put(0, 4);
        let result = parse(bits).unwrap();
        assert_eq!(result.text, "01234567AB");
        assert_eq!(result.symbology_modifier, 1);
        assert!(result.byte_segments.is_empty());
    }

    #[test]
    fn test_eci_utf8_byte_segment() {
        let bits = Bits::default()
            .put(0b0111, 4)
            .put(26, 8)
            .put(0b0100, 4)
            .put(3, 8)
            .put(0xE2, 8)
            .put(0x82, 8)
            .put(0xAC, 8)
            .put(0, 4);
        let result = parse(bits).unwrap();
        assert_eq!(result.text, "€");
        assert_eq!(result.byte_segments, vec![vec![0xE2, 0x82, 0xAC]]);
        assert_eq!(result.symbology_modifier, 2);
    }

    #[test]
    fn test_fnc1_first_position_alphanumeric() {
        // "A%B" with FNC1 in first position: the lone % becomes GS
        let bits = Bits::default()
            .put(0b0101, 4)
            .put(0b0010, 4)
            .put(3, 9)
            .put(10 * 45 + 38, 11)
            .put(11, 6)
            .put(0, 4);
        let result = parse(bits).unwrap();
        assert_eq!(result.text, "A\u{1D}B");
        assert_eq!(result.symbology_modifier, 3);
    }

    #[test]
    fn test_fnc1_second_position_with_eci() {
        let bits = Bits::default()
            .put(0b1001, 4)
            .put(0b0111, 4)
            .put(3, 8)
            .put(0b0100, 4)
            .put(1, 8)
            .put(0xE9, 8);
        let result = parse(bits).unwrap();
        assert_eq!(result.text, "é");
        assert_eq!(result.symbology_modifier, 6);
    }

    #[test]
    fn test_structured_append_header() {
        let bits = Bits::default()
            .put(0b0011, 4)
            .put(0x21, 8)
            .put(0x5A, 8)
            .put(0b0001, 4)
            .put(1, 10)
            .put(7, 4);
        let result = parse(bits).unwrap();
        assert_eq!(result.text, "7");
        assert_eq!(
            result.structured_append,
            Some(StructuredAppend {
                sequence: 0x21,
                parity: 0x5A
            })
        );
    }

    #[test]
    fn test_hanzi_segment() {
        let bits = Bits::default()
            .put(0b1101, 4)
            .put(GB2312_SUBSET, 4)
            .put(1, 8)
            .put(0x3C0, 13)
            .put(0, 4);
        assert_eq!(parse(bits).unwrap().text, "啊");
    }

    #[test]
    fn test_byte_segment_uses_hinted_charset() {
        let bits = Bits::default().put(0b0100, 4).put(1, 8).put(0xE9, 8).put(0, 4);
        let version = Version::for_number(1).unwrap();
        let hints = DecodeHints::default().with_character_set("ISO-8859-5");
        let result = decode(&bits.bytes(), version, ECLevel::L, &hints).unwrap();
        assert_eq!(result.text, "щ");
    }

    #[test]
    fn test_unknown_eci_is_format_error() {
        let bits = Bits::default().put(0b0111, 4).put(31, 8).put(0, 4);
        assert!(matches!(parse(bits), Err(DecodeError::Format(_))));
    }

    #[test]
    fn test_unknown_mode_is_format_error() {
        let bits = Bits::default().put(0b0110, 4).put(0, 12);
        assert!(matches!(parse(bits), Err(DecodeError::Format(_))));
    }

    #[test]
    fn test_truncated_structured_append() {
        let bits = Bits::default().put(0b0011, 4).put(0x21, 8);
        assert!(matches!(parse(bits), Err(DecodeError::Format(_))));
    }

    #[test]
    fn test_short_tail_is_implicit_terminator() {
        // Exactly 24 bits with no terminator
        let bits = Bits::default().put(0b0001, 4).put(3, 10).put(123, 10);
        let result = parse(bits).unwrap();
        assert_eq!(result.text, "123");
        assert_eq!(result.raw_bytes.len(), 3);
    }
}
