/// Kanji mode (Mode 1000) and Hanzi mode (Mode 1101) decoders
/// Both pack one double-byte character into 13 bits
use encoding_rs::{GBK, SHIFT_JIS};

use crate::decoder::bit_source::BitSource;
use crate::error::{DecodeError, Result};

/// Hanzi subset indicator for GB 2312
pub const GB2312_SUBSET: u32 = 1;

/// Shift_JIS characters in 0x8140-0x9FFC and 0xE040-0xEBBF
pub struct KanjiDecoder;

impl KanjiDecoder {
    /// Decode `count` Shift_JIS characters
    pub fn decode(bits: &mut BitSource<'_>, count: usize, result: &mut String) -> Result<()> {
        let buffer = read_double_bytes(bits, count, |two_bytes| {
            let assembled = ((two_bytes / 0x0C0) << 8) | (two_bytes % 0x0C0);
            if assembled < 0x01F00 {
                assembled + 0x08140
            } else {
                assembled + 0x0C140
            }
        })?;
        let (text, _) = SHIFT_JIS.decode_without_bom_handling(&buffer);
        result.push_str(&text);
        Ok(())
    }
}

/// GB 2312 characters in 0xA1A1-0xAAFE and 0xB0A1-0xFAFE
pub struct HanziDecoder;

impl HanziDecoder {
    /// Decode `count` GB 2312 characters
    pub fn decode(bits: &mut BitSource<'_>, count: usize, result: &mut String) -> Result<()> {
        let buffer = read_double_bytes(bits, count, |two_bytes| {
            let assembled = ((two_bytes / 0x060) << 8) | (two_bytes % 0x060);
            if assembled < 0x00A00 {
                assembled + 0x0A1A1
            } else {
                assembled + 0x0A6A1
            }
        })?;
        let (text, _) = GBK.decode_without_bom_handling(&buffer);
        result.push_str(&text);
        Ok(())
    }
}

fn read_double_bytes(
    bits: &mut BitSource<'_>,
    count: usize,
    assemble: impl Fn(u32) -> u32,
) -> Result<Vec<u8>> {
    if count * 13 > bits.available() {
        return Err(DecodeError::Format("double-byte segment truncated"));
    }
    let mut buffer = Vec::with_capacity(2 * count);
    for _ in 0..count {
        let assembled = assemble(bits.read_bits(13)?);
        buffer.push((assembled >> 8) as u8);
        buffer.push(assembled as u8);
    }
    Ok(buffer)
}
