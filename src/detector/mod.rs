//! QR code detection modules
//!
//! This module turns a binarized image into a rectified module grid:
//! - Finder pattern detection (the three square markers)
//! - Alignment pattern detection (for version 2 and above)
//! - Module size and dimension estimation between the finders
//! - Perspective sampling of the grid

/// Alignment pattern detection for QR versions 2+
pub mod alignment;
/// Finder pattern detection using 1:1:3:1:1 ratio scanning
pub mod finder;
/// Sample grid extraction through a perspective transform
pub mod grid_sampler;

use log::debug;

use crate::decoder::config::DecodeHints;
use crate::decoder::version::Version;
use crate::error::{DecodeError, Result};
use crate::models::{BitMatrix, Point, ResultPoint, ResultPointCallback};
use crate::utils::geometry::PerspectiveTransform;
use alignment::{AlignmentPattern, AlignmentPatternFinder};
use finder::{FinderPatternFinder, FinderPatternInfo};
use grid_sampler::sample_grid;

/// A sampled symbol and where it was found
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorResult {
    /// Rectified module grid, one bit per module
    pub bits: BitMatrix,
    /// Bottom-left, top-left and top-right finder centres, then the alignment centre if found
    pub points: Vec<Point>,
}

/// Locates one QR code in a binarized image and samples its modules
pub struct Detector<'a> {
    image: &'a BitMatrix,
}

impl<'a> Detector<'a> {
    /// Detector over a binarized image
    pub fn new(image: &'a BitMatrix) -> Self {
        Self { image }
    }

    /// The image being searched
    pub fn image(&self) -> &BitMatrix {
        self.image
    }

    /// Find the finder patterns, then sample the symbol they frame
    pub fn detect(&self, hints: &DecodeHints) -> Result<DetectorResult> {
        let callback = hints.result_point_callback.as_ref();
        let info = FinderPatternFinder::new(self.image)
            .with_result_point_callback(callback)
            .find(hints.try_harder)?;
        self.process_finder_pattern_info(&info, callback)
    }

    /// Estimate size and version from the finders, look for the alignment pattern, then sample
    pub fn process_finder_pattern_info(
        &self,
        info: &FinderPatternInfo,
        result_point_callback: Option<&ResultPointCallback>,
    ) -> Result<DetectorResult> {
        let top_left = info.top_left.point();
        let top_right = info.top_right.point();
        let bottom_left = info.bottom_left.point();

        let module_size = self.calculate_module_size(&top_left, &top_right, &bottom_left);
        if module_size.is_nan() || module_size < 1.0 {
            return Err(DecodeError::NotFound);
        }
        let dimension = compute_dimension(&top_left, &top_right, &bottom_left, module_size)?;
        let provisional_version =
            Version::provisional_for_dimension(dimension).map_err(|_| DecodeError::NotFound)?;
        let modules_between_centers = provisional_version.dimension_for_version() - 7;
        debug!(
            "module size {:.2}, dimension {}, provisional version {}",
            module_size, dimension, provisional_version
        );

        let mut alignment_pattern = None;
        if !provisional_version.alignment_pattern_centers().is_empty() {
            // Where the bottom-right finder would be
            let bottom_right_x = top_right.x - top_left.x + bottom_left.x;
            let bottom_right_y = top_right.y - top_left.y + bottom_left.y;
            // The alignment pattern sits 3 modules in from that corner
            let correction_to_top_left = 1.0 - 3.0 / modules_between_centers as f32;
            let est_alignment_x =
                (top_left.x + correction_to_top_left * (bottom_right_x - top_left.x)) as i32;
            let est_alignment_y =
                (top_left.y + correction_to_top_left * (bottom_right_y - top_left.y)) as i32;

            for allowance_factor in [4, 8, 16] {
                if let Ok(pattern) = self.find_alignment_in_region(
                    module_size,
                    est_alignment_x,
                    est_alignment_y,
                    allowance_factor as f32,
                    result_point_callback,
                ) {
                    alignment_pattern = Some(pattern);
                    break;
                }
            }
            debug!("alignment pattern: {:?}", alignment_pattern.map(|p| p.point()));
        }

        let transform = create_transform(
            &top_left,
            &top_right,
            &bottom_left,
            alignment_pattern.as_ref(),
            dimension,
        );
        let bits = sample_grid(self.image, dimension, dimension, &transform)?;

        let mut points = vec![bottom_left, top_left, top_right];
        if let Some(pattern) = alignment_pattern {
            points.push(pattern.point());
        }
        Ok(DetectorResult { bits, points })
    }

    /// Average of the module sizes measured along both finder-to-finder edges
    fn calculate_module_size(&self, top_left: &Point, top_right: &Point, bottom_left: &Point) -> f32 {
        (self.calculate_module_size_one_way(top_left, top_right)
            + self.calculate_module_size_one_way(top_left, bottom_left))
            / 2.0
    }

    /// Measure the finder pattern width from each end of the line joining two finders
    fn calculate_module_size_one_way(&self, pattern: &Point, other_pattern: &Point) -> f32 {
        let est1 = self.size_of_black_white_black_run_both_ways(
            pattern.x as i32,
            pattern.y as i32,
            other_pattern.x as i32,
            other_pattern.y as i32,
        );
        let est2 = self.size_of_black_white_black_run_both_ways(
            other_pattern.x as i32,
            other_pattern.y as i32,
            pattern.x as i32,
            pattern.y as i32,
        );
        match (est1, est2) {
            (Some(a), Some(b)) => (a + b) / 14.0,
            (Some(a), None) => a / 7.0,
            (None, Some(b)) => b / 7.0,
            (None, None) => f32::NAN,
        }
    }

    /// Run length through the finder centre towards `to` plus the same run continued
    /// the opposite way, clipped to the image
    fn size_of_black_white_black_run_both_ways(
        &self,
        from_x: i32,
        from_y: i32,
        to_x: i32,
        to_y: i32,
    ) -> Option<f32> {
        let width = self.image.width() as i32;
        let height = self.image.height() as i32;
        let forward = self.size_of_black_white_black_run(from_x, from_y, to_x, to_y);

        // Reflect `to` through `from`, scaling back inside the image
        let mut scale = 1.0f32;
        let mut other_to_x = from_x - (to_x - from_x);
        if other_to_x < 0 {
            scale = from_x as f32 / (from_x - other_to_x) as f32;
            other_to_x = 0;
        } else if other_to_x >= width {
            scale = (width - 1 - from_x) as f32 / (other_to_x - from_x) as f32;
            other_to_x = width - 1;
        }
        let mut other_to_y = (from_y as f32 - (to_y - from_y) as f32 * scale) as i32;

        scale = 1.0;
        if other_to_y < 0 {
            scale = from_y as f32 / (from_y - other_to_y) as f32;
            other_to_y = 0;
        } else if other_to_y >= height {
            scale = (height - 1 - from_y) as f32 / (other_to_y - from_y) as f32;
            other_to_y = height - 1;
        }
        other_to_x = (from_x as f32 + (other_to_x - from_x) as f32 * scale) as i32;

        let backward = self.size_of_black_white_black_run(from_x, from_y, other_to_x, other_to_y);
        // The centre pixel is counted by both walks
        Some(forward? + backward? - 1.0)
    }

    /// Bresenham walk from a finder centre until black, white, black has been crossed
    fn size_of_black_white_black_run(
        &self,
        from_x: i32,
        from_y: i32,
        to_x: i32,
        to_y: i32,
    ) -> Option<f32> {
        // Walk along the major axis
        let steep = (to_y - from_y).abs() > (to_x - from_x).abs();
        let (from_x, from_y, to_x, to_y) = if steep {
            (from_y, from_x, to_y, to_x)
        } else {
            (from_x, from_y, to_x, to_y)
        };

        let dx = (to_x - from_x).abs();
        let dy = (to_y - from_y).abs();
        let mut error = -dx / 2;
        let x_step = if from_x < to_x { 1 } else { -1 };
        let y_step = if from_y < to_y { 1 } else { -1 };

        // 0: in black, 1: in white, 2: in black again
        let mut state = 0;
        let x_limit = to_x + x_step;
        let mut x = from_x;
        let mut y = from_y;
        while x != x_limit {
            let (real_x, real_y) = if steep { (y, x) } else { (x, y) };
            if (state == 1) == self.image.get_i(real_x, real_y) {
                if state == 2 {
                    return Some(distance(x, y, from_x, from_y));
                }
                state += 1;
            }
            error += dy;
            if error > 0 {
                if y == to_y {
                    break;
                }
                y += y_step;
                error -= dx;
            }
            x += x_step;
        }
        // Ran to the end while in the second black run
        if state == 2 {
            return Some(distance(to_x + x_step, to_y, from_x, from_y));
        }
        None
    }

    /// Search a square of `allowance_factor` module sizes around the estimate
    fn find_alignment_in_region(
        &self,
        overall_est_module_size: f32,
        est_alignment_x: i32,
        est_alignment_y: i32,
        allowance_factor: f32,
        result_point_callback: Option<&ResultPointCallback>,
    ) -> Result<AlignmentPattern> {
        let allowance = (allowance_factor * overall_est_module_size) as i32;
        let width = self.image.width() as i32;
        let height = self.image.height() as i32;

        let left = (est_alignment_x - allowance).max(0);
        let right = (est_alignment_x + allowance).min(width - 1);
        if ((right - left) as f32) < overall_est_module_size * 3.0 {
            return Err(DecodeError::NotFound);
        }
        let top = (est_alignment_y - allowance).max(0);
        let bottom = (est_alignment_y + allowance).min(height - 1);
        if ((bottom - top) as f32) < overall_est_module_size * 3.0 {
            return Err(DecodeError::NotFound);
        }

        AlignmentPatternFinder::new(
            self.image,
            left as usize,
            top as usize,
            (right - left) as usize,
            (bottom - top) as usize,
            overall_est_module_size,
        )
        .with_result_point_callback(result_point_callback)
        .find()
    }
}

/// Symbol dimension from the finder spacing, snapped to `17 + 4 * version`
pub fn compute_dimension(
    top_left: &Point,
    top_right: &Point,
    bottom_left: &Point,
    module_size: f32,
) -> Result<usize> {
    let tltr_centers_dimension = (top_left.distance(top_right) / module_size).round() as i32;
    let tlbl_centers_dimension = (top_left.distance(bottom_left) / module_size).round() as i32;
    let mut dimension = (tltr_centers_dimension + tlbl_centers_dimension) / 2 + 7;
    match dimension & 0x03 {
        0 => dimension += 1,
        2 => dimension -= 1,
        3 => return Err(DecodeError::NotFound),
        _ => {}
    }
    usize::try_from(dimension).map_err(|_| DecodeError::NotFound)
}

/// Map module-space centres (3.5 in from each corner) onto the image points
pub fn create_transform(
    top_left: &Point,
    top_right: &Point,
    bottom_left: &Point,
    alignment_pattern: Option<&AlignmentPattern>,
    dimension: usize,
) -> PerspectiveTransform {
    let dim_minus_three = dimension as f32 - 3.5;
    let (bottom_right_x, bottom_right_y, source_bottom_right) = match alignment_pattern {
        Some(pattern) => (pattern.x(), pattern.y(), dim_minus_three - 3.0),
        None => (
            top_right.x - top_left.x + bottom_left.x,
            top_right.y - top_left.y + bottom_left.y,
            dim_minus_three,
        ),
    };

    PerspectiveTransform::quadrilateral_to_quadrilateral(
        3.5,
        3.5,
        dim_minus_three,
        3.5,
        source_bottom_right,
        source_bottom_right,
        3.5,
        dim_minus_three,
        top_left.x,
        top_left.y,
        top_right.x,
        top_right.y,
        bottom_right_x,
        bottom_right_y,
        bottom_left.x,
        bottom_left.y,
    )
}

fn distance(ax: i32, ay: i32, bx: i32, by: i32) -> f32 {
    let dx = (ax - bx) as f32;
    let dy = (ay - by) as f32;
    (dx * dx + dy * dy).sqrt()
}
