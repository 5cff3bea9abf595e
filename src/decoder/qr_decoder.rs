/// Main QR decoder: module grid in, payload out
use log::{debug, trace};

use super::config::DecodeHints;
use super::data_block::DataBlock;
use super::parser::BitMatrixParser;
use super::payload;
use super::reed_solomon::ReedSolomonDecoder;
use super::result::{DecoderResult, QrDecoderMetaData};
use crate::error::{DecodeError, Result};
use crate::models::BitMatrix;

/// How the module grid is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Orientation {
    Normal,
    /// Rows and columns swapped, for symbols printed or captured in a mirror
    Mirrored,
}

/// Decodes a rectified module grid: format, version, codewords, error
/// correction, then the segment stream
pub struct QrDecoder {
    rs_decoder: ReedSolomonDecoder<'static>,
}

impl Default for QrDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl QrDecoder {
    /// Decoder over GF(256) with the QR primitive polynomial
    pub fn new() -> Self {
        Self {
            rs_decoder: ReedSolomonDecoder::qr_code(),
        }
    }

    /// Decode a grid given as rows of booleans, `true` for dark
    pub fn decode_modules(&self, modules: &[Vec<bool>], hints: &DecodeHints) -> Result<DecoderResult> {
        let dimension = modules.len();
        let mut bits = BitMatrix::square(dimension);
        for (y, row) in modules.iter().enumerate() {
            if row.len() != dimension {
                return Err(DecodeError::Format("module grid must be square"));
            }
            for (x, &dark) in row.iter().enumerate() {
                if dark {
                    bits.set(x, y, true);
                }
            }
        }
        self.decode_bit_matrix(bits, hints)
    }

    /// Decode a grid with one bit per module.
    ///
    /// When the normal reading fails with a format or checksum error, the grid is
    /// read again transposed. If that fails too, the error of the first attempt
    /// is returned.
    pub fn decode_bit_matrix(&self, bits: BitMatrix, hints: &DecodeHints) -> Result<DecoderResult> {
        let mut parser = BitMatrixParser::new(bits)?;
        let mut first_error = None;

        for orientation in [Orientation::Normal, Orientation::Mirrored] {
            match self.decode_oriented(&mut parser, orientation, hints) {
                Ok(mut result) => {
                    if orientation == Orientation::Mirrored {
                        result.other = Some(QrDecoderMetaData::new(true));
                    }
                    return Ok(result);
                }
                Err(err) => {
                    debug!("{:?} reading failed: {}", orientation, err);
                    first_error.get_or_insert(err);
                }
            }
        }
        Err(first_error.unwrap_or(DecodeError::NotFound))
    }

    fn decode_oriented(
        &self,
        parser: &mut BitMatrixParser,
        orientation: Orientation,
        hints: &DecodeHints,
    ) -> Result<DecoderResult> {
        if orientation == Orientation::Mirrored {
            // Undo the unmasking of the failed attempt, then re-read the
            // metadata transposed before flipping the grid itself
            parser.remask();
            parser.set_mirror(true);
            parser.read_version()?;
            parser.read_format_information()?;
            parser.mirror();
        }
        self.decode_parser(parser, hints)
    }

    fn decode_parser(&self, parser: &mut BitMatrixParser, hints: &DecodeHints) -> Result<DecoderResult> {
        let version = parser.read_version()?;
        let format_info = parser.read_format_information()?;
        let ec_level = format_info.error_correction_level;
        let codewords = parser.read_codewords()?;
        let mut data_blocks = DataBlock::get_data_blocks(&codewords, version, ec_level)?;

        let total_bytes: usize = data_blocks.iter().map(|b| b.num_data_codewords()).sum();
        let mut result_bytes = Vec::with_capacity(total_bytes);
        let mut errors_corrected = 0;
        for (index, block) in data_blocks.iter_mut().enumerate() {
            let num_data_codewords = block.num_data_codewords();
            let corrected = self.correct_errors(block.codewords_mut(), num_data_codewords)?;
            if corrected > 0 {
                trace!("block {}: corrected {} codewords", index, corrected);
            }
            errors_corrected += corrected;
            result_bytes.extend_from_slice(&block.codewords()[..num_data_codewords]);
        }
        debug!(
            "version {} level {}: {} data codewords, {} corrected",
            version, ec_level, total_bytes, errors_corrected
        );

        let mut result = payload::decode(&result_bytes, version, ec_level, hints)?;
        result.errors_corrected = errors_corrected;
        result.data_mask = format_info.data_mask;
        Ok(result)
    }

    /// Correct one block in place; returns the number of codewords repaired
    fn correct_errors(&self, codewords: &mut [u8], num_data_codewords: usize) -> Result<usize> {
        let num_ec_codewords = codewords.len() - num_data_codewords;
        Ok(self.rs_decoder.decode(codewords, num_ec_codewords)?)
    }
}
