/// Byte mode decoder (Mode 0100) for 8-bit data
/// The charset comes from the active ECI, else the caller's hint, else a guess
use encoding_rs::SHIFT_JIS;

use super::eci::CharacterSet;
use crate::decoder::bit_source::BitSource;
use crate::error::{DecodeError, Result};

/// 8 bits per character
pub struct ByteDecoder;

impl ByteDecoder {
    /// Decode `count` bytes, appending the text to `result` and the raw bytes to `byte_segments`
    pub fn decode(
        bits: &mut BitSource<'_>,
        count: usize,
        current_charset: Option<CharacterSet>,
        hinted_charset: Option<&str>,
        byte_segments: &mut Vec<Vec<u8>>,
        result: &mut String,
    ) -> Result<()> {
        if 8 * count > bits.available() {
            return Err(DecodeError::Format("byte segment truncated"));
        }
        let mut read_bytes = Vec::with_capacity(count);
        for _ in 0..count {
            read_bytes.push(bits.read_bits(8)? as u8);
        }

        let charset = current_charset
            .or_else(|| hinted_charset.and_then(CharacterSet::for_name))
            .unwrap_or_else(|| guess_charset(&read_bytes));
        result.push_str(&charset.decode(&read_bytes));
        byte_segments.push(read_bytes);
        Ok(())
    }
}

/// Best guess for bytes without a declared charset: UTF-8 when the bytes are valid
/// and use multi-byte sequences, Shift_JIS when they decode cleanly with double-byte
/// characters, ISO-8859-1 otherwise.
pub fn guess_charset(bytes: &[u8]) -> CharacterSet {
    if let Ok(text) = std::str::from_utf8(bytes) {
        if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) || !text.is_ascii() {
            return CharacterSet::Encoding(encoding_rs::UTF_8);
        }
        return CharacterSet::Latin1;
    }
    let (text, had_errors) = SHIFT_JIS.decode_without_bom_handling(bytes);
    if !had_errors && text.chars().any(|c| c as u32 > 0xFF && !is_halfwidth_katakana(c)) {
        return CharacterSet::Encoding(SHIFT_JIS);
    }
    CharacterSet::Latin1
}

fn is_halfwidth_katakana(c: char) -> bool {
    ('\u{FF61}'..='\u{FF9F}').contains(&c)
}
