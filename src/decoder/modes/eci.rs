/// Extended Channel Interpretation: charset designators for byte segments
use encoding_rs::Encoding;

use crate::decoder::bit_source::BitSource;
use crate::error::{DecodeError, Result};

/// A character set a byte segment can be decoded with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterSet {
    /// ISO-8859-1, one byte per code point
    Latin1,
    /// Anything `encoding_rs` knows by label
    Encoding(&'static Encoding),
}

impl CharacterSet {
    /// Charset assigned to an ECI designator value
    pub fn for_eci_value(value: u32) -> Option<Self> {
        // Code page 437 has no decoder here; its printable ASCII range matches Latin-1
        let label = match value {
            0..=3 => return Some(CharacterSet::Latin1),
            4 => "iso-8859-2",
            5 => "iso-8859-3",
            6 => "iso-8859-4",
            7 => "iso-8859-5",
            8 => "iso-8859-6",
            9 => "iso-8859-7",
            10 => "iso-8859-8",
            11 => "iso-8859-9",
            12 => "iso-8859-10",
            13 => "windows-874",
            15 => "iso-8859-13",
            16 => "iso-8859-14",
            17 => "iso-8859-15",
            18 => "iso-8859-16",
            20 => "shift_jis",
            21 => "windows-1250",
            22 => "windows-1251",
            23 => "windows-1252",
            24 => "windows-1256",
            25 => "utf-16be",
            26 => "utf-8",
            27 | 170 => "us-ascii",
            28 => "big5",
            29 => "gb18030",
            30 => "euc-kr",
            _ => return None,
        };
        Encoding::for_label(label.as_bytes()).map(CharacterSet::Encoding)
    }

    /// Charset from a name such as `UTF-8` or `ISO-8859-1`
    pub fn for_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace('_', "-");
        if matches!(normalized.as_str(), "iso-8859-1" | "iso8859-1" | "latin1" | "latin-1") {
            return Some(CharacterSet::Latin1);
        }
        Encoding::for_label(normalized.as_bytes())
            .or_else(|| Encoding::for_label(name.trim().as_bytes()))
            .map(CharacterSet::Encoding)
    }

    /// Text of `bytes` in this charset, with malformed sequences replaced
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            CharacterSet::Latin1 => bytes.iter().map(|&b| b as char).collect(),
            CharacterSet::Encoding(encoding) => {
                let (text, _) = encoding.decode_without_bom_handling(bytes);
                text.into_owned()
            }
        }
    }
}

/// Read a 1, 2 or 3 byte ECI designator
pub fn parse_eci_value(bits: &mut BitSource<'_>) -> Result<u32> {
    let first_byte = bits.read_bits(8)?;
    if first_byte & 0x80 == 0 {
        return Ok(first_byte & 0x7F);
    }
    if first_byte & 0xC0 == 0x80 {
        let second_byte = bits.read_bits(8)?;
        return Ok(((first_byte & 0x3F) << 8) | second_byte);
    }
    if first_byte & 0xE0 == 0xC0 {
        let second_third_bytes = bits.read_bits(16)?;
        return Ok(((first_byte & 0x1F) << 16) | second_third_bytes);
    }
    Err(DecodeError::Format("bad ECI designator"))
}
