//! Read-only grayscale pixel views.
//!
//! A [`LuminanceSource`] never mutates its pixels: cropping shares the
//! underlying buffer, while rotation and inversion produce new views.

use std::borrow::Cow;
use std::sync::Arc;

use image::{DynamicImage, GrayImage};

use super::grayscale::{rgb_to_grayscale, rgba_to_grayscale};
use crate::error::{DecodeError, Result};

/// A window onto a shared row-major 8-bit buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferLuminance {
    data: Arc<[u8]>,
    data_width: usize,
    left: usize,
    top: usize,
    width: usize,
    height: usize,
}

/// Grayscale pixel source: a buffer window or an inverted view of another source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LuminanceSource {
    /// Pixels read straight from a buffer
    Buffer(BufferLuminance),
    /// Every pixel reported as `255 - value`
    Inverted(Box<LuminanceSource>),
}

impl LuminanceSource {
    /// Wrap a row-major 8-bit grayscale buffer of exactly `width * height` bytes
    pub fn from_gray(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 || data.len() != width * height {
            return Err(DecodeError::Format("luminance buffer does not match dimensions"));
        }
        Ok(LuminanceSource::Buffer(BufferLuminance {
            data: data.into(),
            data_width: width,
            left: 0,
            top: 0,
            width,
            height,
        }))
    }

    /// Convert packed RGB (3 bytes per pixel) to luminance
    pub fn from_rgb(width: usize, height: usize, rgb: &[u8]) -> Result<Self> {
        if rgb.len() != width * height * 3 {
            return Err(DecodeError::Format("RGB buffer does not match dimensions"));
        }
        Self::from_gray(width, height, rgb_to_grayscale(rgb, width, height))
    }

    /// Convert packed RGBA (4 bytes per pixel) to luminance, ignoring alpha
    pub fn from_rgba(width: usize, height: usize, rgba: &[u8]) -> Result<Self> {
        if rgba.len() != width * height * 4 {
            return Err(DecodeError::Format("RGBA buffer does not match dimensions"));
        }
        Self::from_gray(width, height, rgba_to_grayscale(rgba, width, height))
    }

    /// Use an 8-bit grayscale image as-is
    pub fn from_luma_image(img: &GrayImage) -> Result<Self> {
        let (width, height) = img.dimensions();
        Self::from_gray(width as usize, height as usize, img.as_raw().clone())
    }

    /// Convert any decoded image through its RGB representation
    pub fn from_image(img: &DynamicImage) -> Result<Self> {
        match img {
            DynamicImage::ImageLuma8(gray) => Self::from_luma_image(gray),
            other => {
                let rgb = other.to_rgb8();
                let (width, height) = rgb.dimensions();
                Self::from_rgb(width as usize, height as usize, rgb.as_raw())
            }
        }
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        match self {
            LuminanceSource::Buffer(buffer) => buffer.width,
            LuminanceSource::Inverted(inner) => inner.width(),
        }
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        match self {
            LuminanceSource::Buffer(buffer) => buffer.height,
            LuminanceSource::Inverted(inner) => inner.height(),
        }
    }

    /// One row of luminance; borrowed when no conversion is needed.
    ///
    /// `y` must be below [`height`](Self::height).
    pub fn row(&self, y: usize) -> Cow<'_, [u8]> {
        match self {
            LuminanceSource::Buffer(buffer) => {
                let offset = (buffer.top + y) * buffer.data_width + buffer.left;
                Cow::Borrowed(&buffer.data[offset..offset + buffer.width])
            }
            LuminanceSource::Inverted(inner) => {
                Cow::Owned(inner.row(y).iter().map(|&v| 255 - v).collect())
            }
        }
    }

    /// The whole window, row-major with stride [`width`](Self::width)
    pub fn matrix(&self) -> Cow<'_, [u8]> {
        match self {
            LuminanceSource::Buffer(buffer) => {
                if buffer.left == 0 && buffer.top == 0 && buffer.width == buffer.data_width {
                    let end = buffer.width * buffer.height;
                    return Cow::Borrowed(&buffer.data[..end]);
                }
                let mut matrix = Vec::with_capacity(buffer.width * buffer.height);
                for y in 0..buffer.height {
                    let offset = (buffer.top + y) * buffer.data_width + buffer.left;
                    matrix.extend_from_slice(&buffer.data[offset..offset + buffer.width]);
                }
                Cow::Owned(matrix)
            }
            LuminanceSource::Inverted(inner) => {
                Cow::Owned(inner.matrix().iter().map(|&v| 255 - v).collect())
            }
        }
    }

    /// Single pixel, `0` is black
    pub fn get(&self, x: usize, y: usize) -> u8 {
        match self {
            LuminanceSource::Buffer(buffer) => {
                buffer.data[(buffer.top + y) * buffer.data_width + buffer.left + x]
            }
            LuminanceSource::Inverted(inner) => 255 - inner.get(x, y),
        }
    }

    /// Always true
    pub fn is_crop_supported(&self) -> bool {
        true
    }

    /// A sub-window sharing the same pixels
    pub fn crop(&self, left: usize, top: usize, width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 || left + width > self.width() || top + height > self.height()
        {
            return Err(DecodeError::Format("crop rectangle does not fit inside the image"));
        }
        match self {
            LuminanceSource::Buffer(buffer) => Ok(LuminanceSource::Buffer(BufferLuminance {
                data: Arc::clone(&buffer.data),
                data_width: buffer.data_width,
                left: buffer.left + left,
                top: buffer.top + top,
                width,
                height,
            })),
            LuminanceSource::Inverted(inner) => {
                Ok(LuminanceSource::Inverted(Box::new(inner.crop(left, top, width, height)?)))
            }
        }
    }

    /// Always true for 90 degree turns
    pub fn is_rotate_supported(&self) -> bool {
        true
    }

    /// Rotate 90 degrees counterclockwise; pixel `(x, y)` moves to `(y, width - 1 - x)`
    pub fn rotate_counter_clockwise(&self) -> Self {
        match self {
            LuminanceSource::Buffer(buffer) => {
                let (width, height) = (buffer.width, buffer.height);
                let mut rotated = vec![0u8; width * height];
                for y in 0..height {
                    let offset = (buffer.top + y) * buffer.data_width + buffer.left;
                    for x in 0..width {
                        rotated[(width - 1 - x) * height + y] = buffer.data[offset + x];
                    }
                }
                LuminanceSource::Buffer(BufferLuminance {
                    data: rotated.into(),
                    data_width: height,
                    left: 0,
                    top: 0,
                    width: height,
                    height: width,
                })
            }
            LuminanceSource::Inverted(inner) => {
                LuminanceSource::Inverted(Box::new(inner.rotate_counter_clockwise()))
            }
        }
    }

    /// 45 degree rotation is not available for raster buffers
    pub fn rotate_counter_clockwise_45(&self) -> Option<Self> {
        None
    }

    /// Inverted view; inverting twice yields the original source
    pub fn invert(self) -> Self {
        match self {
            LuminanceSource::Inverted(inner) => *inner,
            source => LuminanceSource::Inverted(Box::new(source)),
        }
    }
}
