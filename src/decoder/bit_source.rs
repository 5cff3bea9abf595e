/// Big-endian bit reader over the corrected data codewords
use crate::error::{DecodeError, Result};

/// Reads bits most significant first, tracking the byte and bit offset
pub struct BitSource<'a> {
    bytes: &'a [u8],
    byte_offset: usize,
    bit_offset: usize,
}

impl<'a> BitSource<'a> {
    /// Reader positioned at the first bit of `bytes`
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            byte_offset: 0,
            bit_offset: 0,
        }
    }

    /// Index of the next byte to be read from
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    /// Bits already consumed from the current byte
    pub fn bit_offset(&self) -> usize {
        self.bit_offset
    }

    /// Bits left to read
    pub fn available(&self) -> usize {
        8 * (self.bytes.len() - self.byte_offset) - self.bit_offset
    }

    /// Read 1 to 32 bits, most significant first
    pub fn read_bits(&mut self, num_bits: usize) -> Result<u32> {
        if !(1..=32).contains(&num_bits) || num_bits > self.available() {
            return Err(DecodeError::Format("bit stream ended early"));
        }

        let mut num_bits = num_bits;
        let mut result = 0u32;

        // Finish the partially read byte
        if self.bit_offset > 0 {
            let bits_left = 8 - self.bit_offset;
            let to_read = num_bits.min(bits_left);
            let bits_to_not_read = bits_left - to_read;
            let mask = (0xFFu32 >> (8 - to_read)) << bits_to_not_read;
            result = (self.bytes[self.byte_offset] as u32 & mask) >> bits_to_not_read;
            num_bits -= to_read;
            self.bit_offset += to_read;
            if self.bit_offset == 8 {
                self.bit_offset = 0;
                self.byte_offset += 1;
            }
        }

        // Whole bytes, then the head of the next one
        while num_bits >= 8 {
            result = (result << 8) | self.bytes[self.byte_offset] as u32;
            self.byte_offset += 1;
            num_bits -= 8;
        }
        if num_bits > 0 {
            let bits_to_not_read = 8 - num_bits;
            let mask = (0xFFu32 >> bits_to_not_read) << bits_to_not_read;
            result = (result << num_bits)
                | ((self.bytes[self.byte_offset] as u32 & mask) >> bits_to_not_read);
            self.bit_offset += num_bits;
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_bits() {
        let bytes = [0b0000_0001, 0b0000_0010, 0b0000_0011, 0b0000_0100, 0b0000_0101];
        let mut source = BitSource::new(&bytes);
        assert_eq!(source.available(), 40);
        assert_eq!(source.read_bits(1).unwrap(), 0);
        assert_eq!(source.available(), 39);
        assert_eq!(source.read_bits(6).unwrap(), 0);
        assert_eq!(source.read_bits(1).unwrap(), 1);
        assert_eq!(source.byte_offset(), 1);
        assert_eq!(source.bit_offset(), 0);
        assert_eq!(source.read_bits(5).unwrap(), 0);
        assert_eq!(source.read_bits(3).unwrap(), 2);
        assert_eq!(source.read_bits(16).unwrap(), 0x0304);
        assert_eq!(source.read_bits(8).unwrap(), 5);
        assert_eq!(source.available(), 0);
    }

    #[test]
    fn test_read_across_bytes() {
        let bytes = [0xAB, 0xCD, 0xEF];
        let mut source = BitSource::new(&bytes);
        assert_eq!(source.read_bits(4).unwrap(), 0xA);
        assert_eq!(source.read_bits(12).unwrap(), 0xBCD);
        assert_eq!(source.read_bits(3).unwrap(), 0b111);
        assert_eq!(source.available(), 5);
    }

    #[test]
    fn test_rejects_over_read() {
        let bytes = [0xFF];
        let mut source = BitSource::new(&bytes);
        assert!(source.read_bits(9).is_err());
        assert!(source.read_bits(0).is_err());
        assert_eq!(source.read_bits(8).unwrap(), 0xFF);
        assert!(source.read_bits(1).is_err(), "nothing left");
    }
}
