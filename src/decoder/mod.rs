//! QR code decoding modules
//!
//! This module contains all the logic for decoding a symbol once its module
//! grid has been sampled:
//! - Format and version information extraction
//! - Data mask removal and codeword reading
//! - Reed-Solomon error correction over GF(256)
//! - Segment decoding (numeric, alphanumeric, byte, kanji, hanzi, ECI)

/// Bit-level reader over data codewords
pub mod bit_source;
/// Decode hints and environment defaults
pub mod config;
/// De-interleaving of codewords into Reed-Solomon blocks
pub mod data_block;
/// The eight data mask patterns
pub mod data_mask;
/// Format information (EC level and mask id)
pub mod format;
/// Function module mask builder (finder/timing/format/alignment/version)
pub mod function_mask;
/// Galois field arithmetic
pub mod gf;
/// Polynomials over a Galois field
pub mod gf_poly;
/// Segment mode decoders
pub mod modes;
/// Format, version and codeword reading from the module grid
pub mod parser;
/// Segment stream parser
pub mod payload;
/// Main QR decoder that orchestrates the decoding pipeline
pub mod qr_decoder;
/// Reed-Solomon error correction
pub mod reed_solomon;
/// Decoder output types
pub mod result;
/// QR specification tables (versions, EC blocks, version codewords)
pub mod tables;
/// Version lookup and properties
pub mod version;

pub use config::DecodeHints;
pub use qr_decoder::QrDecoder;
pub use result::{DecoderResult, QrDecoderMetaData};
