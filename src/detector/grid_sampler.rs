/// Sample a rectified module grid out of a binarized image
use crate::error::{DecodeError, Result};
use crate::models::BitMatrix;
use crate::utils::geometry::PerspectiveTransform;

/// Read a `dimension_x` x `dimension_y` grid, sampling each module at its centre.
///
/// `transform` maps module coordinates to image coordinates. Fails with
/// `NotFound` when any module centre lands off the image.
pub fn sample_grid(
    image: &BitMatrix,
    dimension_x: usize,
    dimension_y: usize,
    transform: &PerspectiveTransform,
) -> Result<BitMatrix> {
    if dimension_x == 0 || dimension_y == 0 {
        return Err(DecodeError::NotFound);
    }
    let width = image.width() as i32;
    let height = image.height() as i32;
    let mut bits = BitMatrix::new(dimension_x, dimension_y);
    let mut points = vec![0.0f32; 2 * dimension_x];
    for y in 0..dimension_y {
        let i_value = y as f32 + 0.5;
        for (x, pair) in points.chunks_exact_mut(2).enumerate() {
            pair[0] = x as f32 + 0.5;
            pair[1] = i_value;
        }
        transform.transform_points(&mut points);
        check_and_nudge_points(image, &mut points)?;
        for (x, pair) in points.chunks_exact(2).enumerate() {
            let px = pair[0] as i32;
            let py = pair[1] as i32;
            if px < 0 || py < 0 || px >= width || py >= height {
                return Err(DecodeError::NotFound);
            }
            if image.get(px as usize, py as usize) {
                bits.set(x, y, true);
            }
        }
    }
    Ok(bits)
}

/// Pull points lying one pixel outside the image back onto its edge.
///
/// Only the runs of points at either end of the row are inspected, which is
/// where a slightly-off transform lands first. Anything further out is `NotFound`.
pub fn check_and_nudge_points(image: &BitMatrix, points: &mut [f32]) -> Result<()> {
    let width = image.width() as i32;
    let height = image.height() as i32;
    let pairs = points.len() / 2;

    let mut nudge = |offset: usize| -> Result<bool> {
        let x = points[offset] as i32;
        let y = points[offset + 1] as i32;
        if x < -1 || x > width || y < -1 || y > height {
            return Err(DecodeError::NotFound);
        }
        let mut nudged = false;
        if x == -1 {
            points[offset] = 0.0;
            nudged = true;
        } else if x == width {
            points[offset] = (width - 1) as f32;
            nudged = true;
        }
        if y == -1 {
            points[offset + 1] = 0.0;
            nudged = true;
        } else if y == height {
            points[offset + 1] = (height - 1) as f32;
            nudged = true;
        }
        Ok(nudged)
    };

    // From the start
    for pair in 0..pairs {
        if !nudge(pair * 2)? {
            break;
        }
    }
    // From the end
    for pair in (0..pairs).rev() {
        if !nudge(pair * 2)? {
            break;
        }
    }
    Ok(())
}
