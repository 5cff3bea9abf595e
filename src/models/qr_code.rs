use super::Point;

/// Error correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ECLevel {
    /// Low (~7% recovery capacity)
    L,
    /// Medium (~15% recovery capacity)
    M,
    /// Quartile (~25% recovery capacity)
    Q,
    /// High (~30% recovery capacity)
    H,
}

/// Level for each 2-bit pattern as it appears in the format information
const FOR_BITS: [ECLevel; 4] = [ECLevel::M, ECLevel::L, ECLevel::H, ECLevel::Q];

impl ECLevel {
    /// Get error correction level from the two format bits (01=L, 00=M, 11=Q, 10=H)
    pub fn from_bits(bits: u8) -> Self {
        FOR_BITS[(bits & 0x03) as usize]
    }

    /// The two bits encoding this level in the format information
    pub fn bits(&self) -> u8 {
        match self {
            ECLevel::L => 0x01,
            ECLevel::M => 0x00,
            ECLevel::Q => 0x03,
            ECLevel::H => 0x02,
        }
    }

    /// Position in L, M, Q, H order, as used by the block tables
    pub fn ordinal(&self) -> usize {
        match self {
            ECLevel::L => 0,
            ECLevel::M => 1,
            ECLevel::Q => 2,
            ECLevel::H => 3,
        }
    }
}

impl std::fmt::Display for ECLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ECLevel::L => "L",
            ECLevel::M => "M",
            ECLevel::Q => "Q",
            ECLevel::H => "H",
        };
        f.write_str(name)
    }
}

/// Structured-append position of a symbol within a multi-symbol message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuredAppend {
    /// Sequence byte: high nibble is the index, low nibble the total count minus one
    pub sequence: u8,
    /// Parity byte of the whole message
    pub parity: u8,
}

/// Decoded QR code
#[derive(Debug, Clone, PartialEq)]
pub struct QRCode {
    /// Decoded content as text
    pub content: String,
    /// Corrected data codewords
    pub raw_bytes: Vec<u8>,
    /// Raw bytes of each byte-mode segment, in order
    pub byte_segments: Vec<Vec<u8>>,
    /// QR code version (1-40)
    pub version: u8,
    /// Error correction level
    pub error_correction: ECLevel,
    /// Data mask id (0-7)
    pub mask: u8,
    /// Finder (and alignment) centres in image coordinates: bottom-left, top-left, top-right, [alignment]
    pub points: Vec<Point>,
    /// Codewords repaired by Reed-Solomon
    pub errors_corrected: usize,
    /// Erasures used during correction
    pub erasures: usize,
    /// Structured-append metadata, when present
    pub structured_append: Option<StructuredAppend>,
    /// AIM symbology identifier, e.g. `]Q1`
    pub symbology_identifier: String,
    /// Whether the symbol was read through the mirrored path
    pub mirrored: bool,
}
