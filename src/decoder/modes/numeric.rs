/// Numeric mode decoder (Mode 0001)
/// Three digits per 10 bits, a trailing pair in 7 bits or a single digit in 4
use crate::decoder::bit_source::BitSource;
use crate::error::{DecodeError, Result};

/// Digits 0-9
pub struct NumericDecoder;

impl NumericDecoder {
    /// Decode `count` digits
    pub fn decode(bits: &mut BitSource<'_>, mut count: usize, result: &mut String) -> Result<()> {
        while count >= 3 {
            if bits.available() < 10 {
                return Err(DecodeError::Format("numeric segment truncated"));
            }
            let three_digits = bits.read_bits(10)?;
            if three_digits >= 1000 {
                return Err(DecodeError::Format("numeric triple out of range"));
            }
            push_digit(result, three_digits / 100);
            push_digit(result, (three_digits / 10) % 10);
            push_digit(result, three_digits % 10);
            count -= 3;
        }

        match count {
            2 => {
                if bits.available() < 7 {
                    return Err(DecodeError::Format("numeric segment truncated"));
                }
                let two_digits = bits.read_bits(7)?;
                if two_digits >= 100 {
                    return Err(DecodeError::Format("numeric pair out of range"));
                }
                push_digit(result, two_digits / 10);
                push_digit(result, two_digits % 10);
            }
            1 => {
                if bits.available() < 4 {
                    return Err(DecodeError::Format("numeric segment truncated"));
                }
                let digit = bits.read_bits(4)?;
                if digit >= 10 {
                    return Err(DecodeError::Format("numeric digit out of range"));
                }
                push_digit(result, digit);
            }
            _ => {}
        }
        Ok(())
    }
}

fn push_digit(result: &mut String, digit: u32) {
    result.push(char::from(b'0' + digit as u8));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_decode() {
        // "01234567": 012 -> 0000001100, 345 -> 0101011001, 67 -> 1000011
        // 0000001100 0101011001 1000011 (27 bits) padded to 4 bytes
        let bytes = [0b0000_0011, 0b0001_0101, 0b1001_1000, 0b0110_0000];
        let mut bits = BitSource::new(&bytes);
        let mut result = String::new();
        NumericDecoder::decode(&mut bits, 8, &mut result).unwrap();
        assert_eq!(result, "01234567");
        assert_eq!(bits.available(), 5);
    }

    #[test]
    fn test_single_digit() {
        let bytes = [0b1001_0000];
        let mut bits = BitSource::new(&bytes);
        let mut result = String::from("x");
        NumericDecoder::decode(&mut bits, 1, &mut result).unwrap();
        assert_eq!(result, "x9");
    }

    #[test]
    fn test_rejects_out_of_range() {
        // 1111101000 = 1000
        let bytes = [0b1111_1010, 0b0000_0000];
        let mut bits = BitSource::new(&bytes);
        let mut result = String::new();
        assert!(NumericDecoder::decode(&mut bits, 3, &mut result).is_err());

        let bytes = [0xFF];
        let mut bits = BitSource::new(&bytes);
        assert!(NumericDecoder::decode(&mut bits, 3, &mut result).is_err(), "too few bits");
    }
}
