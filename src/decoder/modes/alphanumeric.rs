/// Alphanumeric mode decoder (Mode 0010)
/// Alphanumeric character set: 0-9, A-Z, space, $%*+-./:
use crate::decoder::bit_source::BitSource;
use crate::error::{DecodeError, Result};

const ALPHANUMERIC_CHARS: &[u8; 45] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Group separator, which `%` stands for under FNC1
const GS: char = '\u{1D}';

/// Pairs = 11 bits, single = 6 bits
pub struct AlphanumericDecoder;

impl AlphanumericDecoder {
    /// Decode `count` characters; under FNC1 `%%` is `%` and a lone `%` is GS
    pub fn decode(
        bits: &mut BitSource<'_>,
        mut count: usize,
        fc1_in_effect: bool,
        result: &mut String,
    ) -> Result<()> {
        let mut segment = String::with_capacity(count);
        while count > 1 {
            if bits.available() < 11 {
                return Err(DecodeError::Format("alphanumeric segment truncated"));
            }
            let next_two_chars = bits.read_bits(11)?;
            segment.push(to_alphanumeric_char(next_two_chars / 45)?);
            segment.push(to_alphanumeric_char(next_two_chars % 45)?);
            count -= 2;
        }
        if count == 1 {
            if bits.available() < 6 {
                return Err(DecodeError::Format("alphanumeric segment truncated"));
            }
            segment.push(to_alphanumeric_char(bits.read_bits(6)?)?);
        }

        if fc1_in_effect {
            // "%%" is a literal percent, a lone "%" is the GS1 separator
            let mut chars = segment.chars().peekable();
            while let Some(c) = chars.next() {
                if c == '%' {
                    if chars.peek() == Some(&'%') {
                        chars.next();
                        result.push('%');
                    } else {
                        result.push(GS);
                    }
                } else {
                    result.push(c);
                }
            }
        } else {
            result.push_str(&segment);
        }
        Ok(())
    }
}

fn to_alphanumeric_char(value: u32) -> Result<char> {
    ALPHANUMERIC_CHARS
        .get(value as usize)
        .map(|&c| c as char)
        .ok_or(DecodeError::Format("alphanumeric value out of range"))
}
