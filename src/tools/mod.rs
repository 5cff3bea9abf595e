//! Image loading and dataset helpers for the CLI and benches.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use image::GenericImageView;
use thiserror::Error;

use crate::decoder::DecodeHints;
use crate::error::DecodeError;
use crate::models::QRCode;
use crate::reader::QrReader;
use crate::utils::luminance::LuminanceSource;

/// Failure to load or decode an image file
#[derive(Error, Debug)]
pub enum ToolError {
    /// The file could not be opened or is not a supported image
    #[error("failed to load image: {0}")]
    Image(#[from] image::ImageError),
    /// The image loaded but no symbol could be decoded
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// `QR_MAX_DIM`: downscale images whose longer side exceeds this; `0` disables
fn max_dim_from_env() -> Option<u32> {
    env::var("QR_MAX_DIM")
        .ok()
        .and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|&v| v != 0)
}

/// Load an image as a luminance source, downscaled per `QR_MAX_DIM`
pub fn load_luminance<P: AsRef<Path>>(path: P) -> Result<LuminanceSource, ToolError> {
    let img = image::open(path)?;
    let img = match max_dim_from_env() {
        Some(max_dim) if img.dimensions().0.max(img.dimensions().1) > max_dim => {
            img.resize(max_dim, max_dim, image::imageops::FilterType::Triangle)
        }
        _ => img,
    };
    Ok(LuminanceSource::from_image(&img)?)
}

/// Load and decode one image file
pub fn decode_file<P: AsRef<Path>>(path: P, hints: &DecodeHints) -> Result<QRCode, ToolError> {
    let source = load_luminance(path)?;
    Ok(QrReader::new().decode(source, hints)?)
}

/// Directory of images to scan when none is given (`QR_DATASET_ROOT`)
pub fn dataset_root_from_env() -> PathBuf {
    env::var("QR_DATASET_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("benches/images"))
}

/// Image files under `root`, sorted, at most `limit` of them
pub fn dataset_iter<P: AsRef<Path>>(root: P, limit: Option<usize>) -> impl Iterator<Item = PathBuf> {
    let mut images = collect_images(root.as_ref());
    images.sort();
    if let Some(limit) = limit {
        images.truncate(limit);
    }
    images.into_iter()
}

fn collect_images(root: &Path) -> Vec<PathBuf> {
    let mut stack = vec![root.to_path_buf()];
    let mut images = Vec::new();

    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            if let Some(ext) = path.extension() {
                let ext = ext.to_string_lossy().to_lowercase();
                if matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "gif" | "bmp") {
                    images.push(path);
                }
            }
        }
    }

    images
}
