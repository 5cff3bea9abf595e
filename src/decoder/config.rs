//! Decode hints, with process-wide defaults read from the environment.
//!
//! | Variable           | Meaning                                  |
//! |--------------------|------------------------------------------|
//! | `QR_TRY_HARDER`    | `1` scans every row for finder patterns  |
//! | `QR_PURE_BARCODE`  | `1` skips detection for clean symbols    |
//! | `QR_CHARACTER_SET` | byte-mode charset when no ECI is present |
//! | `QR_BINARIZER`     | `global` or `hybrid`                     |

use std::sync::OnceLock;

use crate::models::ResultPointCallback;
use crate::utils::binarization::BinarizerKind;

fn parse_env_bool_u8(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .map(|v| v != 0)
        .unwrap_or(default)
}

fn parse_env_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Options for one decode request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecodeHints {
    /// Spend more time looking for finder patterns
    pub try_harder: bool,
    /// The image is an unrotated, unskewed symbol with only a quiet zone around it
    pub pure_barcode: bool,
    /// Charset label for byte segments that carry no ECI designator
    pub character_set: Option<String>,
    /// Thresholding strategy
    pub binarizer: BinarizerKind,
    /// Told about each candidate finder and alignment centre as it is found
    pub result_point_callback: Option<ResultPointCallback>,
}

static ENV_HINTS: OnceLock<DecodeHints> = OnceLock::new();

impl DecodeHints {
    /// Defaults overlaid with the `QR_*` environment variables, read once per process
    pub fn from_env() -> Self {
        ENV_HINTS
            .get_or_init(|| {
                let defaults = DecodeHints::default();
                DecodeHints {
                    try_harder: parse_env_bool_u8("QR_TRY_HARDER", defaults.try_harder),
                    pure_barcode: parse_env_bool_u8("QR_PURE_BARCODE", defaults.pure_barcode),
                    character_set: parse_env_string("QR_CHARACTER_SET"),
                    binarizer: parse_env_string("QR_BINARIZER")
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(defaults.binarizer),
                    result_point_callback: None,
                }
            })
            .clone()
    }

    /// Scan every row for finder patterns
    pub fn with_try_harder(mut self, try_harder: bool) -> Self {
        self.try_harder = try_harder;
        self
    }

    /// Skip detection and read the symbol straight off the image
    pub fn with_pure_barcode(mut self, pure_barcode: bool) -> Self {
        self.pure_barcode = pure_barcode;
        self
    }

    /// Charset for byte segments that carry no ECI
    pub fn with_character_set(mut self, character_set: impl Into<String>) -> Self {
        self.character_set = Some(character_set.into());
        self
    }

    /// Thresholding strategy
    pub fn with_binarizer(mut self, binarizer: BinarizerKind) -> Self {
        self.binarizer = binarizer;
        self
    }

    /// Observe candidate pattern centres during detection
    pub fn with_result_point_callback(mut self, callback: ResultPointCallback) -> Self {
        self.result_point_callback = Some(callback);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let hints = DecodeHints::default()
            .with_try_harder(true)
            .with_character_set("Shift_JIS")
            .with_binarizer(BinarizerKind::Global);
        assert!(hints.try_harder);
        assert!(!hints.pure_barcode);
        assert_eq!(hints.character_set.as_deref(), Some("Shift_JIS"));
        assert_eq!(hints.binarizer, BinarizerKind::Global);
    }

    #[test]
    fn test_defaults() {
        let hints = DecodeHints::default();
        assert!(!hints.try_harder);
        assert_eq!(hints.binarizer, BinarizerKind::Hybrid);
        assert!(hints.character_set.is_none());
        assert!(hints.result_point_callback.is_none());
    }

    #[test]
    fn test_env_parsers_fall_back() {
        assert!(parse_env_bool_u8("QR_READER_TEST_UNSET_FLAG", true));
        assert!(!parse_env_bool_u8("QR_READER_TEST_UNSET_FLAG", false));
        assert_eq!(parse_env_string("QR_READER_TEST_UNSET_STRING"), None);
    }
}
