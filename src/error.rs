//! Error types shared by every decoding stage.

use thiserror::Error;

/// Errors surfaced by a single decode attempt.
///
/// All three kinds are terminal: no partial payload is returned alongside them.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// No symbol geometry could be established (binarization collapsed,
    /// finder/alignment search exhausted, sampling ran off the image).
    #[error("QR code not found")]
    NotFound,
    /// Symbol structure was found but its bit-level content is inconsistent.
    #[error("invalid QR code format: {0}")]
    Format(&'static str),
    /// Reed-Solomon correction could not repair a block.
    #[error("QR code checksum failed")]
    Checksum,
}

/// Algebraic failure inside the Reed-Solomon solver.
///
/// Never leaves the decoder as-is: it is converted into [`DecodeError::Checksum`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Reed-Solomon decode failed: {0}")]
pub struct ReedSolomonError(pub &'static str);

impl From<ReedSolomonError> for DecodeError {
    fn from(_: ReedSolomonError) -> Self {
        DecodeError::Checksum
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DecodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reed_solomon_maps_to_checksum() {
        let err: DecodeError = ReedSolomonError("bad error location").into();
        assert_eq!(err, DecodeError::Checksum);
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(DecodeError::NotFound.to_string(), "QR code not found");
        assert_eq!(
            DecodeError::Format("dimension").to_string(),
            "invalid QR code format: dimension"
        );
    }
}
