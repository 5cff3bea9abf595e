//! Synthetic symbols for unit tests, built with the `qrcode` encoder.

use crate::models::BitMatrix;
use crate::utils::luminance::LuminanceSource;

/// Module grid of `data` encoded at a fixed version and level
pub(crate) fn symbol(data: &[u8], version: i16, ec: qrcode::EcLevel) -> BitMatrix {
    let code = qrcode::QrCode::with_version(data, qrcode::Version::Normal(version), ec)
        .expect("data fits the requested version");
    let width = code.width();
    let mut bits = BitMatrix::square(width);
    for y in 0..width {
        for x in 0..width {
            if code[(x, y)] == qrcode::Color::Dark {
                bits.set(x, y, true);
            }
        }
    }
    bits
}

/// Draw `bits` at `module` pixels per module inside a `quiet`-module white border
pub(crate) fn render(bits: &BitMatrix, module: usize, quiet: usize) -> LuminanceSource {
    let side = (bits.width() + 2 * quiet) * module;
    let mut pixels = vec![255u8; side * side];
    for y in 0..bits.height() {
        for x in 0..bits.width() {
            if !bits.get(x, y) {
                continue;
            }
            let top = (y + quiet) * module;
            let left = (x + quiet) * module;
            for row in pixels[top * side..(top + module) * side].chunks_mut(side) {
                row[left..left + module].fill(0);
            }
        }
    }
    LuminanceSource::from_gray(side, side, pixels).expect("rendered buffer matches its size")
}

/// Binary image of `bits` at `module` pixels per module with a `quiet`-module border
pub(crate) fn scaled(bits: &BitMatrix, module: usize, quiet: usize) -> BitMatrix {
    let side = (bits.width() + 2 * quiet) * module;
    let mut image = BitMatrix::square(side);
    for y in 0..bits.height() {
        for x in 0..bits.width() {
            if bits.get(x, y) {
                image.set_region((x + quiet) * module, (y + quiet) * module, module, module);
            }
        }
    }
    image
}
