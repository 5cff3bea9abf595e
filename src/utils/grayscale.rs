/// Convert packed colour pixels to 8-bit luminance
/// Y = (R + 2G + B) / 4, a cheap approximation that weights green the most
use rayon::prelude::*;

/// Images with at least this many pixels are converted row-parallel
const PARALLEL_MIN_PIXELS: usize = 1 << 18;

#[inline]
fn luminance(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 + 2 * g as u32 + b as u32) / 4) as u8
}

fn convert(pixels: &[u8], channels: usize, width: usize, height: usize) -> Vec<u8> {
    let pixel_count = width * height;
    let mut gray = vec![0u8; pixel_count];
    if pixel_count == 0 {
        return gray;
    }

    let convert_row = |(y, row): (usize, &mut [u8])| {
        let row_start = y * width * channels;
        for (x, out) in row.iter_mut().enumerate() {
            let idx = row_start + x * channels;
            *out = luminance(pixels[idx], pixels[idx + 1], pixels[idx + 2]);
        }
    };

    if pixel_count >= PARALLEL_MIN_PIXELS {
        gray.par_chunks_mut(width).enumerate().for_each(convert_row);
    } else {
        gray.chunks_mut(width).enumerate().for_each(convert_row);
    }
    gray
}

/// Convert an RGB buffer (3 bytes per pixel) to grayscale
pub fn rgb_to_grayscale(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    convert(rgb, 3, width, height)
}

/// Convert an RGBA buffer to grayscale (alpha is ignored)
pub fn rgba_to_grayscale(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    convert(rgba, 4, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_to_grayscale() {
        let white = vec![255, 255, 255];
        assert_eq!(rgb_to_grayscale(&white, 1, 1), vec![255]);

        let black = vec![0, 0, 0];
        assert_eq!(rgb_to_grayscale(&black, 1, 1), vec![0]);

        // Green counts double
        let red = rgb_to_grayscale(&[255, 0, 0], 1, 1)[0];
        let green = rgb_to_grayscale(&[0, 255, 0], 1, 1)[0];
        assert_eq!(red, 63);
        assert_eq!(green, 127);

        let img = vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255];
        let gray = rgb_to_grayscale(&img, 2, 2);
        assert_eq!(gray, vec![63, 127, 63, 255]);
    }

    #[test]
    fn test_rgba_to_grayscale() {
        let rgba = vec![255, 128, 64, 0, 10, 10, 10, 255];
        let gray = rgba_to_grayscale(&rgba, 2, 1);
        assert_eq!(gray, vec![143, 10], "alpha should not affect luminance");
    }

    #[test]
    fn test_large_image_matches_sequential() {
        let width = 640;
        let height = 480;
        let rgb: Vec<u8> = (0..width * height * 3).map(|i| (i * 7 % 256) as u8).collect();
        let gray = rgb_to_grayscale(&rgb, width, height);
        for (i, &g) in gray.iter().enumerate().step_by(997) {
            let p = &rgb[i * 3..i * 3 + 3];
            assert_eq!(g, luminance(p[0], p[1], p[2]));
        }
    }
}
