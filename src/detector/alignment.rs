/// Alignment pattern detection
/// Alignment patterns appear in QR codes version 2 and above: a single dark
/// module ringed by light then dark, searched for as a 1:1:1 white/black/white run
use crate::error::{DecodeError, Result};
use crate::models::{BitMatrix, Point, ResultPoint, ResultPointCallback};

/// Centre of the bottom-right alignment pattern
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentPattern {
    x: f32,
    y: f32,
    estimated_module_size: f32,
}

impl AlignmentPattern {
    /// A centre seen once
    pub fn new(x: f32, y: f32, estimated_module_size: f32) -> Self {
        Self {
            x,
            y,
            estimated_module_size,
        }
    }

    /// Column of the centre
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Row of the centre
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Average width of one module
    pub fn estimated_module_size(&self) -> f32 {
        self.estimated_module_size
    }

    fn about_equals(&self, module_size: f32, i: f32, j: f32) -> bool {
        if (i - self.y).abs() <= module_size && (j - self.x).abs() <= module_size {
            let module_size_diff = (module_size - self.estimated_module_size).abs();
            return module_size_diff <= 1.0 || module_size_diff <= self.estimated_module_size;
        }
        false
    }

    /// Plain average of this centre and a new observation
    fn combine_estimate(&self, i: f32, j: f32, new_module_size: f32) -> Self {
        Self::new(
            (self.x + j) / 2.0,
            (self.y + i) / 2.0,
            (self.estimated_module_size + new_module_size) / 2.0,
        )
    }
}

impl ResultPoint for AlignmentPattern {
    fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Searches a rectangular region of the image for one alignment pattern
pub struct AlignmentPatternFinder<'a> {
    image: &'a BitMatrix,
    possible_centers: Vec<AlignmentPattern>,
    start_x: i32,
    start_y: i32,
    width: i32,
    height: i32,
    module_size: f32,
    result_point_callback: Option<&'a ResultPointCallback>,
}

impl<'a> AlignmentPatternFinder<'a> {
    /// `module_size` is the estimate taken from the finder patterns
    pub fn new(
        image: &'a BitMatrix,
        start_x: usize,
        start_y: usize,
        width: usize,
        height: usize,
        module_size: f32,
    ) -> Self {
        Self {
            image,
            possible_centers: Vec::new(),
            start_x: start_x as i32,
            start_y: start_y as i32,
            width: width as i32,
            height: height as i32,
            module_size,
            result_point_callback: None,
        }
    }

    /// Report each new candidate centre to `callback`
    pub fn with_result_point_callback(mut self, callback: Option<&'a ResultPointCallback>) -> Self {
        self.result_point_callback = callback;
        self
    }

    /// Scan rows outward from the middle of the region.
    ///
    /// Returns the first centre seen twice; failing that, the first centre seen at all.
    pub fn find(&mut self) -> Result<AlignmentPattern> {
        let max_j = self.start_x + self.width;
        let middle_i = self.start_y + self.height / 2;

        for i_gen in 0..self.height {
            // middle, middle + 1, middle - 1, middle + 2, ...
            let offset = (i_gen + 1) / 2;
            let i = if i_gen & 1 == 0 {
                middle_i + offset
            } else {
                middle_i - offset
            };

            let mut state_count = [0i32; 3];
            let mut j = self.start_x;
            // A leading white run has no start, so its length is meaningless
            while j < max_j && !self.image.get_i(j, i) {
                j += 1;
            }
            let mut current_state = 0usize;
            while j < max_j {
                if self.image.get_i(j, i) {
                    if current_state == 1 {
                        state_count[1] += 1;
                    } else if current_state == 2 {
                        if self.found_pattern_cross(&state_count) {
                            if let Some(confirmed) = self.handle_possible_center(&state_count, i, j) {
                                return Ok(confirmed);
                            }
                        }
                        state_count = [state_count[2], 1, 0];
                        current_state = 1;
                    } else {
                        current_state += 1;
                        state_count[current_state] += 1;
                    }
                } else {
                    if current_state == 1 {
                        current_state += 1;
                    }
                    state_count[current_state] += 1;
                }
                j += 1;
            }

            if self.found_pattern_cross(&state_count) {
                if let Some(confirmed) = self.handle_possible_center(&state_count, i, max_j) {
                    return Ok(confirmed);
                }
            }
        }

        self.possible_centers
            .first()
            .copied()
            .ok_or(DecodeError::NotFound)
    }

    /// Every run within 50% of the module size
    fn found_pattern_cross(&self, state_count: &[i32; 3]) -> bool {
        let max_variance = self.module_size / 2.0;
        state_count
            .iter()
            .all(|&count| (self.module_size - count as f32).abs() < max_variance)
    }

    fn cross_check_vertical(
        &self,
        start_i: i32,
        center_j: i32,
        max_count: i32,
        original_state_count_total: i32,
    ) -> Option<f32> {
        let image = self.image;
        let max_i = image.height() as i32;
        let mut state_count = [0i32; 3];

        let mut i = start_i;
        while i >= 0 && image.get_i(center_j, i) && state_count[1] <= max_count {
            state_count[1] += 1;
            i -= 1;
        }
        if i < 0 || state_count[1] > max_count {
            return None;
        }
        while i >= 0 && !image.get_i(center_j, i) && state_count[0] <= max_count {
            state_count[0] += 1;
            i -= 1;
        }
        if state_count[0] > max_count {
            return None;
        }

        i = start_i + 1;
        while i < max_i && image.get_i(center_j, i) && state_count[1] <= max_count {
            state_count[1] += 1;
            i += 1;
        }
        if i == max_i || state_count[1] > max_count {
            return None;
        }
        while i < max_i && !image.get_i(center_j, i) && state_count[2] <= max_count {
            state_count[2] += 1;
            i += 1;
        }
        if state_count[2] > max_count {
            return None;
        }

        let state_count_total: i32 = state_count.iter().sum();
        if 5 * (state_count_total - original_state_count_total).abs()
            >= 2 * original_state_count_total
        {
            return None;
        }
        self.found_pattern_cross(&state_count)
            .then(|| center_from_end(&state_count, i))
    }

    /// Record a horizontal hit; returns a centre once it has been seen twice
    fn handle_possible_center(
        &mut self,
        state_count: &[i32; 3],
        i: i32,
        j: i32,
    ) -> Option<AlignmentPattern> {
        let state_count_total: i32 = state_count.iter().sum();
        let center_j = center_from_end(state_count, j);
        let center_i = self.cross_check_vertical(
            i,
            center_j as i32,
            2 * state_count[1],
            state_count_total,
        )?;
        let estimated_module_size = state_count_total as f32 / 3.0;
        if let Some(center) = self
            .possible_centers
            .iter()
            .find(|center| center.about_equals(estimated_module_size, center_i, center_j))
        {
            return Some(center.combine_estimate(center_i, center_j, estimated_module_size));
        }
        let pattern = AlignmentPattern::new(center_j, center_i, estimated_module_size);
        self.possible_centers.push(pattern);
        if let Some(callback) = self.result_point_callback {
            callback.found_possible_result_point(pattern.point());
        }
        None
    }
}

fn center_from_end(state_count: &[i32; 3], end: i32) -> f32 {
    (end - state_count[2]) as f32 - state_count[1] as f32 / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{scaled, symbol};

    #[test]
    fn test_finds_version_2_alignment_pattern() {
        // Version 2: alignment centre at module (18, 18); 4 px/module, 4-module border
        let image = scaled(&symbol(b"ALIGN", 2, qrcode::EcLevel::L), 4, 4);
        let expected = (4.0 + 18.5) * 4.0;
        let mut finder = AlignmentPatternFinder::new(&image, 70, 70, 40, 40, 4.0);
        let pattern = finder.find().unwrap();
        assert!(
            (pattern.x() - expected).abs() <= 1.0 && (pattern.y() - expected).abs() <= 1.0,
            "expected ({expected}, {expected}), got ({}, {})",
            pattern.x(),
            pattern.y()
        );
        assert!((pattern.estimated_module_size() - 4.0).abs() < 1.0);
    }

    #[test]
    fn test_isolated_pattern() {
        // 5x5-module alignment pattern at 3 px/module on white
        let mut image = BitMatrix::square(30);
        image.set_region(6, 6, 15, 3);
        image.set_region(6, 18, 15, 3);
        image.set_region(6, 6, 3, 15);
        image.set_region(18, 6, 3, 15);
        image.set_region(12, 12, 3, 3);
        let pattern = AlignmentPatternFinder::new(&image, 0, 0, 30, 30, 3.0)
            .find()
            .unwrap();
        assert_eq!(pattern.x(), 13.5);
        assert_eq!(pattern.y(), 13.5);
        assert_eq!(pattern.estimated_module_size(), 3.0);
    }

    #[test]
    fn test_reports_first_sighting_to_callback() {
        use std::sync::{Arc, Mutex};

        let mut image = BitMatrix::square(30);
        image.set_region(6, 6, 15, 3);
        image.set_region(6, 18, 15, 3);
        image.set_region(6, 6, 3, 15);
        image.set_region(18, 6, 3, 15);
        image.set_region(12, 12, 3, 3);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback = ResultPointCallback::new(move |point| sink.lock().unwrap().push(point));
        AlignmentPatternFinder::new(&image, 0, 0, 30, 30, 3.0)
            .with_result_point_callback(Some(&callback))
            .find()
            .unwrap();
        // The confirming second sighting is merged, not reported
        assert_eq!(*seen.lock().unwrap(), vec![Point::new(13.5, 13.5)]);
    }

    #[test]
    fn test_blank_region_not_found() {
        let image = BitMatrix::square(40);
        let result = AlignmentPatternFinder::new(&image, 5, 5, 30, 30, 3.0).find();
        assert_eq!(result.unwrap_err(), DecodeError::NotFound);
    }

    #[test]
    fn test_combine_estimate_averages() {
        let pattern = AlignmentPattern::new(10.0, 10.0, 2.0);
        let combined = pattern.combine_estimate(12.0, 14.0, 4.0);
        assert_eq!(combined.x(), 12.0);
        assert_eq!(combined.y(), 11.0);
        assert_eq!(combined.estimated_module_size(), 3.0);
    }
}
