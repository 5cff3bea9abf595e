/// QR code versions: symbol dimensions, block layouts and version information decoding
use super::tables::{VERSION_DECODE_INFO, VERSIONS};
use crate::error::{DecodeError, Result};
use crate::models::ECLevel;

/// Version info is 18 bits (6 data + 12 BCH); at most 3 bit errors are accepted
const MAX_VERSION_INFO_DISTANCE: u32 = 3;

/// A run of `count` blocks that each carry `data_codewords` data codewords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ECB {
    /// Number of blocks in this run
    pub count: u8,
    /// Data codewords per block
    pub data_codewords: u8,
}

/// Block layout for one error correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ECBlocks {
    /// EC codewords appended to every block
    pub ec_codewords_per_block: u8,
    /// Block runs, shorter blocks first
    pub blocks: &'static [ECB],
}

impl ECBlocks {
    /// Total number of blocks across all runs
    pub fn num_blocks(&self) -> usize {
        self.blocks.iter().map(|b| b.count as usize).sum()
    }

    /// EC codewords across all blocks
    pub fn total_ec_codewords(&self) -> usize {
        self.ec_codewords_per_block as usize * self.num_blocks()
    }
}

/// One of the 40 QR code versions
#[derive(Debug, PartialEq, Eq)]
pub struct Version {
    version_number: u8,
    alignment_pattern_centers: &'static [u8],
    ec_blocks: [ECBlocks; 4],
    total_codewords: usize,
}

impl Version {
    pub(crate) const fn build(
        version_number: u8,
        alignment_pattern_centers: &'static [u8],
        ec_blocks: [ECBlocks; 4],
    ) -> Self {
        // Every level fills the same number of codewords; count them from L
        let level = &ec_blocks[0];
        let mut total_codewords = 0usize;
        let mut i = 0;
        while i < level.blocks.len() {
            let block = level.blocks[i];
            total_codewords += block.count as usize
                * (block.data_codewords as usize + level.ec_codewords_per_block as usize);
            i += 1;
        }
        Self {
            version_number,
            alignment_pattern_centers,
            ec_blocks,
            total_codewords,
        }
    }

    /// Look up a version by number (1-40)
    pub fn for_number(version_number: u32) -> Result<&'static Version> {
        if !(1..=40).contains(&version_number) {
            return Err(DecodeError::Format("version number out of range"));
        }
        Ok(&VERSIONS[version_number as usize - 1])
    }

    /// Infer the version from a symbol dimension, which must be `17 + 4 * version`
    pub fn provisional_for_dimension(dimension: usize) -> Result<&'static Version> {
        if dimension % 4 != 1 || dimension < 21 {
            return Err(DecodeError::Format("dimension is not 1 mod 4"));
        }
        Self::for_number(((dimension - 17) / 4) as u32)
    }

    /// Decode 18 version-information bits, tolerating up to 3 bit errors
    pub fn decode_version_information(version_bits: u32) -> Option<&'static Version> {
        let mut best_difference = u32::MAX;
        let mut best_version = 0;
        for (i, &target) in VERSION_DECODE_INFO.iter().enumerate() {
            if target == version_bits {
                return Self::for_number(i as u32 + 7).ok();
            }
            let difference = (version_bits ^ target).count_ones();
            if difference < best_difference {
                best_version = i as u32 + 7;
                best_difference = difference;
            }
        }
        if best_difference <= MAX_VERSION_INFO_DISTANCE {
            return Self::for_number(best_version).ok();
        }
        None
    }

    /// Version number (1-40)
    pub fn version_number(&self) -> u8 {
        self.version_number
    }

    /// Alignment pattern centre coordinates along each axis
    pub fn alignment_pattern_centers(&self) -> &'static [u8] {
        self.alignment_pattern_centers
    }

    /// Data plus EC codewords in the symbol
    pub fn total_codewords(&self) -> usize {
        self.total_codewords
    }

    /// Modules per side
    pub fn dimension_for_version(&self) -> usize {
        17 + 4 * self.version_number as usize
    }

    /// Block layout for an error correction level
    pub fn ec_blocks_for_level(&self, ec_level: ECLevel) -> &ECBlocks {
        &self.ec_blocks[ec_level.ordinal()]
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.version_number)
    }
}
