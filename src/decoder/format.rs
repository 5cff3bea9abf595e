/// Format information: error correction level and data mask id
use crate::models::ECLevel;

/// XOR mask applied to the 15 format bits so they are never all zero
pub const FORMAT_INFO_MASK_QR: u32 = 0x5412;

/// At most 3 bit errors are accepted when matching against the table
const MAX_FORMAT_INFO_DISTANCE: u32 = 3;

/// Masked 15-bit format codewords and the 5 data bits each one carries (ISO 18004 Annex C)
const FORMAT_INFO_DECODE_LOOKUP: [(u32, u8); 32] = [
    (0x5412, 0x00),
    (0x5125, 0x01),
    (0x5E7C, 0x02),
    (0x5B4B, 0x03),
    (0x45F9, 0x04),
    (0x40CE, 0x05),
    (0x4F97, 0x06),
    (0x4AA0, 0x07),
    (0x77C4, 0x08),
    (0x72F3, 0x09),
    (0x7DAA, 0x0A),
    (0x789D, 0x0B),
    (0x662F, 0x0C),
    (0x6318, 0x0D),
    (0x6C41, 0x0E),
    (0x6976, 0x0F),
    (0x1689, 0x10),
    (0x13BE, 0x11),
    (0x1CE7, 0x12),
    (0x19D0, 0x13),
    (0x0762, 0x14),
    (0x0255, 0x15),
    (0x0D0C, 0x16),
    (0x083B, 0x17),
    (0x355F, 0x18),
    (0x3068, 0x19),
    (0x3F31, 0x1A),
    (0x3A06, 0x1B),
    (0x24B4, 0x1C),
    (0x2183, 0x1D),
    (0x2EDA, 0x1E),
    (0x2BED, 0x1F),
];

/// Decoded format information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInformation {
    /// Error correction level
    pub error_correction_level: ECLevel,
    /// Data mask id (0-7)
    pub data_mask: u8,
}

impl FormatInformation {
    fn from_data_bits(format_info: u8) -> Self {
        Self {
            error_correction_level: ECLevel::from_bits((format_info >> 3) & 0x03),
            data_mask: format_info & 0x07,
        }
    }

    /// Decode the two redundant copies of the format bits.
    ///
    /// Falls back to matching with the QR mask XORed out, for encoders that
    /// forget to apply it.
    pub fn decode(masked_format_info1: u32, masked_format_info2: u32) -> Option<Self> {
        Self::do_decode(masked_format_info1, masked_format_info2).or_else(|| {
            Self::do_decode(
                masked_format_info1 ^ FORMAT_INFO_MASK_QR,
                masked_format_info2 ^ FORMAT_INFO_MASK_QR,
            )
        })
    }

    fn do_decode(masked_format_info1: u32, masked_format_info2: u32) -> Option<Self> {
        let mut best_difference = u32::MAX;
        let mut best_format_info = 0;
        for &(target, data_bits) in FORMAT_INFO_DECODE_LOOKUP.iter() {
            if target == masked_format_info1 || target == masked_format_info2 {
                return Some(Self::from_data_bits(data_bits));
            }
            let difference = (masked_format_info1 ^ target).count_ones();
            if difference < best_difference {
                best_format_info = data_bits;
                best_difference = difference;
            }
            if masked_format_info1 != masked_format_info2 {
                let difference = (masked_format_info2 ^ target).count_ones();
                if difference < best_difference {
                    best_format_info = data_bits;
                    best_difference = difference;
                }
            }
        }
        if best_difference <= MAX_FORMAT_INFO_DISTANCE {
            return Some(Self::from_data_bits(best_format_info));
        }
        None
    }

    /// The 5 data bits this format information encodes
    pub fn data_bits(&self) -> u8 {
        (self.error_correction_level.bits() << 3) | self.data_mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codeword_for(info: FormatInformation) -> u32 {
        FORMAT_INFO_DECODE_LOOKUP
            .iter()
            .find(|(_, data)| *data == info.data_bits())
            .map(|(code, _)| *code)
            .unwrap()
    }

    #[test]
    fn test_mask_constant_decodes_to_m_mask_zero() {
        let info = FormatInformation::decode(0x5412, 0x5412).unwrap();
        assert_eq!(info.error_correction_level, ECLevel::M);
        assert_eq!(info.data_mask, 0);
    }

    #[test]
    fn test_every_entry_decodes_exactly() {
        for &(code, data) in FORMAT_INFO_DECODE_LOOKUP.iter() {
            let info = FormatInformation::decode(code, 0).unwrap();
            assert_eq!(info.data_bits(), data, "entry {:#06x}", code);
            // Either copy alone is enough
            let info = FormatInformation::decode(0x7FFF, code).unwrap();
            assert_eq!(info.data_bits(), data);
        }
    }

    #[test]
    fn test_unmasked_fallback() {
        // Encoder that left the mask off: L, mask 5
        let expected = FormatInformation::from_data_bits(0x0D);
        let unmasked = codeword_for(expected) ^ FORMAT_INFO_MASK_QR;
        assert_eq!(FormatInformation::decode(unmasked, unmasked), Some(expected));
    }

    #[test]
    fn test_corrects_up_to_three_bits() {
        for &(code, data) in FORMAT_INFO_DECODE_LOOKUP.iter() {
            for a in 0..15 {
                for b in a..15 {
                    for c in b..15 {
                        let corrupted = code ^ (1 << a) ^ (1 << b) ^ (1 << c);
                        let info = FormatInformation::decode(corrupted, corrupted);
                        assert_eq!(
                            info.map(|i| i.data_bits()),
                            Some(data),
                            "corruption {:#06x} of {:#06x} should still decode",
                            corrupted,
                            code
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_four_bit_corruption_lands_on_neighbour_or_fails() {
        // Minimum distance 7: four flips toward a neighbour leave the word 3 bits
        // from that neighbour, which the decoder then accepts.
        let distance = |a: u32, b: u32| (a ^ b).count_ones();
        let mut wrong = 0;
        let mut rejected = 0;
        for &(code, data) in FORMAT_INFO_DECODE_LOOKUP.iter() {
            for a in 0..15 {
                for b in a + 1..15 {
                    for c in b + 1..15 {
                        for d in c + 1..15 {
                            let corrupted = code ^ (1 << a) ^ (1 << b) ^ (1 << c) ^ (1 << d);
                            let Some(info) = FormatInformation::decode(corrupted, corrupted) else {
                                rejected += 1;
                                continue;
                            };
                            if info.data_bits() == data {
                                continue;
                            }
                            wrong += 1;
                            let target = codeword_for(info);
                            let masked_distance = distance(corrupted, target);
                            if masked_distance <= MAX_FORMAT_INFO_DISTANCE {
                                assert_eq!(
                                    masked_distance, 3,
                                    "{:#06x} from {:#06x} resolved to {:#06x}",
                                    corrupted, code, target
                                );
                                assert_eq!(distance(code, target), 7);
                            } else {
                                // Only reachable through the unmasked retry
                                assert!(
                                    FORMAT_INFO_DECODE_LOOKUP
                                        .iter()
                                        .all(|&(t, _)| distance(corrupted, t) > MAX_FORMAT_INFO_DISTANCE),
                                    "{:#06x} had a masked match but took the unmasked path",
                                    corrupted
                                );
                                assert!(
                                    distance(corrupted ^ FORMAT_INFO_MASK_QR, target)
                                        <= MAX_FORMAT_INFO_DISTANCE
                                );
                            }
                        }
                    }
                }
            }
        }
        // Four flips are beyond what the code can detect reliably
        assert_eq!(wrong, 30080);
        assert_eq!(rejected, 11520);
    }
}
