/// De-interleaving of raw codewords into Reed-Solomon blocks
use super::version::Version;
use crate::error::{DecodeError, Result};
use crate::models::ECLevel;

/// One Reed-Solomon block: data codewords followed by its EC codewords
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataBlock {
    num_data_codewords: usize,
    codewords: Vec<u8>,
}

impl DataBlock {
    /// How many of the codewords carry data; the rest are EC
    pub fn num_data_codewords(&self) -> usize {
        self.num_data_codewords
    }

    /// Data codewords followed by EC codewords
    pub fn codewords(&self) -> &[u8] {
        &self.codewords
    }

    /// Mutable codewords, corrected in place
    pub fn codewords_mut(&mut self) -> &mut [u8] {
        &mut self.codewords
    }

    /// Split the symbol's codewords into blocks.
    ///
    /// Codewords are interleaved one per block in turn. Shorter blocks come first;
    /// longer blocks carry one extra data codeword, read after all the shared ones.
    pub fn get_data_blocks(
        raw_codewords: &[u8],
        version: &Version,
        ec_level: ECLevel,
    ) -> Result<Vec<DataBlock>> {
        if raw_codewords.len() != version.total_codewords() {
            return Err(DecodeError::Format("codeword count does not match version"));
        }

        let ec_blocks = version.ec_blocks_for_level(ec_level);
        let ec_per_block = ec_blocks.ec_codewords_per_block as usize;
        let mut result: Vec<DataBlock> = ec_blocks
            .blocks
            .iter()
            .flat_map(|ecb| std::iter::repeat_n(ecb.data_codewords as usize, ecb.count as usize))
            .map(|num_data_codewords| DataBlock {
                num_data_codewords,
                codewords: vec![0; num_data_codewords + ec_per_block],
            })
            .collect();
        let num_blocks = result.len();
        if num_blocks == 0 {
            return Err(DecodeError::Format("version has no blocks"));
        }

        let shorter_blocks_total_codewords = result[0].codewords.len();
        let longer_blocks_start_at = result
            .iter()
            .rposition(|block| block.codewords.len() == shorter_blocks_total_codewords)
            .map_or(0, |last_short| last_short + 1);
        let shorter_blocks_num_data_codewords = shorter_blocks_total_codewords - ec_per_block;

        let mut raw = raw_codewords.iter().copied();
        let mut next = || raw.next().ok_or(DecodeError::Format("codewords exhausted"));

        // Data codewords every block has
        for i in 0..shorter_blocks_num_data_codewords {
            for block in result.iter_mut() {
                block.codewords[i] = next()?;
            }
        }
        // The extra data codeword of the longer blocks
        for block in result[longer_blocks_start_at..].iter_mut() {
            block.codewords[shorter_blocks_num_data_codewords] = next()?;
        }
        // EC codewords, shifted by one in the longer blocks
        for i in shorter_blocks_num_data_codewords..shorter_blocks_total_codewords {
            for (j, block) in result.iter_mut().enumerate() {
                let i_offset = if j < longer_blocks_start_at { i } else { i + 1 };
                block.codewords[i_offset] = next()?;
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_block() {
        let version = Version::for_number(1).unwrap();
        let raw: Vec<u8> = (0..26).collect();
        let blocks = DataBlock::get_data_blocks(&raw, version, ECLevel::M).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].num_data_codewords(), 16);
        assert_eq!(blocks[0].codewords(), &raw[..]);
    }

    #[test]
    fn test_mixed_block_lengths() {
        // Version 5-Q: 2 blocks of 15 data + 2 blocks of 16 data, 18 EC each
        let version = Version::for_number(5).unwrap();
        let raw: Vec<u8> = (0..134).map(|i| i as u8).collect();
        let blocks = DataBlock::get_data_blocks(&raw, version, ECLevel::Q).unwrap();
        let sizes: Vec<usize> = blocks.iter().map(|b| b.codewords().len()).collect();
        assert_eq!(sizes, vec![33, 33, 34, 34]);
        let data: Vec<usize> = blocks.iter().map(|b| b.num_data_codewords()).collect();
        assert_eq!(data, vec![15, 15, 16, 16]);

        // Round-robin data codewords
        assert_eq!(&blocks[0].codewords()[..3], &[0, 4, 8]);
        assert_eq!(&blocks[3].codewords()[..3], &[3, 7, 11]);
        // 60 shared data codewords, then the two extras
        assert_eq!(blocks[2].codewords()[15], 60);
        assert_eq!(blocks[3].codewords()[15], 61);
        // EC codewords follow, starting at 62
        assert_eq!(blocks[0].codewords()[15], 62);
        assert_eq!(blocks[2].codewords()[16], 64);
        assert_eq!(*blocks[3].codewords().last().unwrap(), 133);
    }

    #[test]
    fn test_rejects_wrong_length() {
        let version = Version::for_number(2).unwrap();
        assert!(DataBlock::get_data_blocks(&[0; 10], version, ECLevel::L).is_err());
    }
}
