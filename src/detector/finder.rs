/// Finder pattern detection using 1:1:3:1:1 run-length scanning with cross checks
use log::debug;

use crate::error::{DecodeError, Result};
use crate::models::{BitMatrix, Point, ResultPoint, ResultPointCallback, order_best_patterns};

/// Candidates need this many merged observations to be selected
const CENTER_QUORUM: u32 = 2;
/// 1 pixel/module times 3 modules/center
const MIN_SKIP: i32 = 3;
/// Largest symbol (in modules) assumed to fill a quarter of the image height
const MAX_MODULES: i32 = 97;

/// Centre of one of the three 7x7 locator squares
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinderPattern {
    x: f32,
    y: f32,
    estimated_module_size: f32,
    count: u32,
}

impl FinderPattern {
    /// A centre seen once
    pub fn new(x: f32, y: f32, estimated_module_size: f32) -> Self {
        Self::with_count(x, y, estimated_module_size, 1)
    }

    fn with_count(x: f32, y: f32, estimated_module_size: f32, count: u32) -> Self {
        Self {
            x,
            y,
            estimated_module_size,
            count,
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

    /// Number of scan observations merged into this centre
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Whether an observation at row `i`, column `j` is the same pattern
    fn about_equals(&self, module_size: f32, i: f32, j: f32) -> bool {
        if (i - self.y).abs() <= module_size && (j - self.x).abs() <= module_size {
            let module_size_diff = (module_size - self.estimated_module_size).abs();
            return module_size_diff <= 1.0 || module_size_diff <= self.estimated_module_size;
        }
        false
    }

    /// Observation-weighted average of this centre and a new one
    fn combine_estimate(&self, i: f32, j: f32, new_module_size: f32) -> Self {
        let count = self.count as f32;
        let combined_count = count + 1.0;
        Self::with_count(
            (count * self.x + j) / combined_count,
            (count * self.y + i) / combined_count,
            (count * self.estimated_module_size + new_module_size) / combined_count,
            self.count + 1,
        )
    }
}

impl ResultPoint for FinderPattern {
    fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// The three finder patterns of one symbol, in canonical order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinderPatternInfo {
    /// Corner below the top-left one
    pub bottom_left: FinderPattern,
    /// Corner opposite the longest side
    pub top_left: FinderPattern,
    /// Corner right of the top-left one
    pub top_right: FinderPattern,
}

impl FinderPatternInfo {
    /// Expects `[bottom_left, top_left, top_right]`
    pub fn new(patterns: [FinderPattern; 3]) -> Self {
        let [bottom_left, top_left, top_right] = patterns;
        Self {
            bottom_left,
            top_left,
            top_right,
        }
    }
}

/// Searches a binarized image for the three finder patterns
pub struct FinderPatternFinder<'a> {
    image: &'a BitMatrix,
    possible_centers: Vec<FinderPattern>,
    has_skipped: bool,
    result_point_callback: Option<&'a ResultPointCallback>,
}

impl<'a> FinderPatternFinder<'a> {
    /// Finder over a binarized image
    pub fn new(image: &'a BitMatrix) -> Self {
        Self {
            image,
            possible_centers: Vec::new(),
            has_skipped: false,
            result_point_callback: None,
        }
    }

    /// Report each new candidate centre to `callback`
    pub fn with_result_point_callback(mut self, callback: Option<&'a ResultPointCallback>) -> Self {
        self.result_point_callback = callback;
        self
    }

    /// The image being searched
    pub fn image(&self) -> &BitMatrix {
        self.image
    }

    /// Candidate centres recorded so far
    pub fn possible_centers(&self) -> &[FinderPattern] {
        &self.possible_centers
    }

    /// Scan rows for black/white/black/white/black runs in 1:1:3:1:1 proportion.
    ///
    /// Without `try_harder`, the row stride assumes the largest supported symbol
    /// takes up a quarter of the image height.
    pub fn find(&mut self, try_harder: bool) -> Result<FinderPatternInfo> {
        let max_i = self.image.height() as i32;
        let max_j = self.image.width() as i32;
        let mut i_skip = if try_harder {
            1
        } else {
            ((3 * max_i) / (4 * MAX_MODULES)).max(MIN_SKIP)
        };

        let mut done = false;
        let mut i = i_skip - 1;
        while i < max_i && !done {
            let mut state_count = [0i32; 5];
            let mut current_state = 0usize;
            let mut j = 0;
            while j < max_j {
                if self.image.get_i(j, i) {
                    // Black pixel
                    if current_state & 1 == 1 {
                        current_state += 1;
                    }
                    state_count[current_state] += 1;
                } else if current_state & 1 == 0 {
                    // White pixel closing a black run
                    if current_state == 4 {
                        if found_pattern_cross(&state_count)
                            && self.handle_possible_center(&state_count, i, j)
                        {
                            // Patterns are at least two rows tall from here on
                            i_skip = 2;
                            if self.has_skipped {
                                done = self.have_multiply_confirmed_centers();
                            } else {
                                let row_skip = self.find_row_skip();
                                if row_skip > state_count[2] {
                                    i += row_skip - state_count[2] - i_skip;
                                    j = max_j - 1;
                                }
                            }
                            current_state = 0;
                            state_count = [0; 5];
                        } else {
                            shift_counts_2(&mut state_count);
                            current_state = 3;
                        }
                    } else {
                        current_state += 1;
                        state_count[current_state] += 1;
                    }
                } else {
                    state_count[current_state] += 1;
                }
                j += 1;
            }
            if found_pattern_cross(&state_count)
                && self.handle_possible_center(&state_count, i, max_j)
            {
                i_skip = state_count[0];
                if self.has_skipped {
                    done = self.have_multiply_confirmed_centers();
                }
            }
            i += i_skip;
        }

        let mut patterns = self.select_best_patterns()?;
        order_best_patterns(&mut patterns);
        debug!(
            "finder centres: bl=({:.1},{:.1}) tl=({:.1},{:.1}) tr=({:.1},{:.1})",
            patterns[0].x, patterns[0].y, patterns[1].x, patterns[1].y, patterns[2].x, patterns[2].y
        );
        Ok(FinderPatternInfo::new(patterns))
    }

    /// Cross-check a horizontal hit vertically, horizontally and diagonally, then record it
    fn handle_possible_center(&mut self, state_count: &[i32; 5], i: i32, j: i32) -> bool {
        let state_count_total: i32 = state_count.iter().sum();
        let center_j = center_from_end(state_count, j);
        let Some(center_i) =
            self.cross_check_vertical(i, center_j as i32, state_count[2], state_count_total)
        else {
            return false;
        };
        let Some(center_j) =
            self.cross_check_horizontal(center_j as i32, center_i as i32, state_count[2], state_count_total)
        else {
            return false;
        };
        if !self.cross_check_diagonal(center_i as i32, center_j as i32) {
            return false;
        }

        let estimated_module_size = state_count_total as f32 / 7.0;
        match self
            .possible_centers
            .iter_mut()
            .find(|center| center.about_equals(estimated_module_size, center_i, center_j))
        {
            Some(center) => {
                *center = center.combine_estimate(center_i, center_j, estimated_module_size)
            }
            None => {
                let pattern = FinderPattern::new(center_j, center_i, estimated_module_size);
                self.possible_centers.push(pattern);
                if let Some(callback) = self.result_point_callback {
                    callback.found_possible_result_point(pattern.point());
                }
            }
        }
        true
    }

    fn cross_check_vertical(
        &self,
        start_i: i32,
        center_j: i32,
        max_count: i32,
        original_state_count_total: i32,
    ) -> Option<f32> {
        let image = self.image;
        cross_check_line(
            start_i,
            image.height() as i32,
            max_count,
            original_state_count_total,
            |i| image.get_i(center_j, i),
        )
    }

    fn cross_check_horizontal(
        &self,
        start_j: i32,
        center_i: i32,
        max_count: i32,
        original_state_count_total: i32,
    ) -> Option<f32> {
        let image = self.image;
        cross_check_line(
            start_j,
            image.width() as i32,
            max_count,
            original_state_count_total,
            |j| image.get_i(j, center_i),
        )
    }

    /// Walk the 45 degree diagonal through the centre; tolerates more variance
    fn cross_check_diagonal(&self, center_i: i32, center_j: i32) -> bool {
        let image = self.image;
        let mut state_count = [0i32; 5];

        // Up and to the left
        let mut i = 0;
        while center_i >= i && center_j >= i && image.get_i(center_j - i, center_i - i) {
            state_count[2] += 1;
            i += 1;
        }
        if state_count[2] == 0 {
            return false;
        }
        while center_i >= i && center_j >= i && !image.get_i(center_j - i, center_i - i) {
            state_count[1] += 1;
            i += 1;
        }
        if state_count[1] == 0 {
            return false;
        }
        while center_i >= i && center_j >= i && image.get_i(center_j - i, center_i - i) {
            state_count[0] += 1;
            i += 1;
        }
        if state_count[0] == 0 {
            return false;
        }

        // Down and to the right
        let max_i = image.height() as i32;
        let max_j = image.width() as i32;
        let in_bounds = |i: i32| center_i + i < max_i && center_j + i < max_j;
        i = 1;
        while in_bounds(i) && image.get_i(center_j + i, center_i + i) {
            state_count[2] += 1;
            i += 1;
        }
        while in_bounds(i) && !image.get_i(center_j + i, center_i + i) {
            state_count[3] += 1;
            i += 1;
        }
        if state_count[3] == 0 {
            return false;
        }
        while in_bounds(i) && image.get_i(center_j + i, center_i + i) {
            state_count[4] += 1;
            i += 1;
        }
        if state_count[4] == 0 {
            return false;
        }

        found_pattern_diagonal(&state_count)
    }

    /// Rows to skip once two centres are confirmed, assuming the top-left is found last
    fn find_row_skip(&mut self) -> i32 {
        if self.possible_centers.len() <= 1 {
            return 0;
        }
        let mut first_confirmed: Option<&FinderPattern> = None;
        for center in &self.possible_centers {
            if center.count < CENTER_QUORUM {
                continue;
            }
            match first_confirmed {
                None => first_confirmed = Some(center),
                Some(first) => {
                    self.has_skipped = true;
                    return ((first.x - center.x).abs() - (first.y - center.y).abs()) as i32 / 2;
                }
            }
        }
        0
    }

    /// Three or more confirmed centres whose module sizes agree within 5%
    fn have_multiply_confirmed_centers(&self) -> bool {
        let mut confirmed_count = 0;
        let mut total_module_size = 0.0f32;
        for pattern in &self.possible_centers {
            if pattern.count >= CENTER_QUORUM {
                confirmed_count += 1;
                total_module_size += pattern.estimated_module_size;
            }
        }
        if confirmed_count < 3 {
            return false;
        }
        let average = total_module_size / self.possible_centers.len() as f32;
        let total_deviation: f32 = self
            .possible_centers
            .iter()
            .map(|pattern| (pattern.estimated_module_size - average).abs())
            .sum();
        total_deviation <= 0.05 * total_module_size
    }

    /// The confirmed triple of similar module size closest to an isosceles right triangle
    fn select_best_patterns(&mut self) -> Result<[FinderPattern; 3]> {
        if self.possible_centers.len() < 3 {
            return Err(DecodeError::NotFound);
        }
        self.possible_centers
            .retain(|center| center.count >= CENTER_QUORUM);
        self.possible_centers
            .sort_by(|a, b| a.estimated_module_size.total_cmp(&b.estimated_module_size));

        let centers = &self.possible_centers;
        let mut distortion = f64::MAX;
        let mut best = None;
        for i in 0..centers.len().saturating_sub(2) {
            let fpi = centers[i];
            let min_module_size = fpi.estimated_module_size;
            for j in i + 1..centers.len() - 1 {
                let fpj = centers[j];
                let squares0 = squared_distance(&fpi, &fpj);
                for &fpk in &centers[j + 1..] {
                    if fpk.estimated_module_size > min_module_size * 1.4 {
                        continue;
                    }
                    let mut sides = [
                        squares0,
                        squared_distance(&fpj, &fpk),
                        squared_distance(&fpi, &fpk),
                    ];
                    sides.sort_by(f64::total_cmp);
                    let [a, b, c] = sides;
                    // c = a + b and a = b for an isosceles right triangle
                    let d = (c - 2.0 * b).abs() + (c - 2.0 * a).abs();
                    if d < distortion {
                        distortion = d;
                        best = Some([fpi, fpj, fpk]);
                    }
                }
            }
        }
        best.ok_or(DecodeError::NotFound)
    }
}

/// Centre of the middle run, given the column just past the last run
fn center_from_end(state_count: &[i32; 5], end: i32) -> f32 {
    (end - state_count[4] - state_count[3]) as f32 - state_count[2] as f32 / 2.0
}

/// All five runs within 50% of their expected 1:1:3:1:1 share
pub(crate) fn found_pattern_cross(state_count: &[i32; 5]) -> bool {
    pattern_within_variance(state_count, 2.0)
}

/// Same as [`found_pattern_cross`] with a 75% tolerance
fn found_pattern_diagonal(state_count: &[i32; 5]) -> bool {
    pattern_within_variance(state_count, 1.333)
}

fn pattern_within_variance(state_count: &[i32; 5], divisor: f32) -> bool {
    if state_count.contains(&0) {
        return false;
    }
    let total_module_size: i32 = state_count.iter().sum();
    if total_module_size < 7 {
        return false;
    }
    let module_size = total_module_size as f32 / 7.0;
    let max_variance = module_size / divisor;
    (module_size - state_count[0] as f32).abs() < max_variance
        && (module_size - state_count[1] as f32).abs() < max_variance
        && (3.0 * module_size - state_count[2] as f32).abs() < 3.0 * max_variance
        && (module_size - state_count[3] as f32).abs() < max_variance
        && (module_size - state_count[4] as f32).abs() < max_variance
}

/// Keep the last black/white pair as the first two runs of the next candidate
fn shift_counts_2(state_count: &mut [i32; 5]) {
    state_count[0] = state_count[2];
    state_count[1] = state_count[3];
    state_count[2] = state_count[4];
    state_count[3] = 1;
    state_count[4] = 0;
}

/// Re-measure the five runs along one line through `start`.
///
/// `is_black(k)` reads position `k` on the line, `limit` is its length.
/// Returns the recentred coordinate when the runs still form a finder pattern
/// and their total is within 40% of the original measurement.
fn cross_check_line(
    start: i32,
    limit: i32,
    max_count: i32,
    original_state_count_total: i32,
    is_black: impl Fn(i32) -> bool,
) -> Option<f32> {
    let mut state_count = [0i32; 5];

    let mut k = start;
    while k >= 0 && is_black(k) {
        state_count[2] += 1;
        k -= 1;
    }
    if k < 0 {
        return None;
    }
    while k >= 0 && !is_black(k) && state_count[1] <= max_count {
        state_count[1] += 1;
        k -= 1;
    }
    if k < 0 || state_count[1] > max_count {
        return None;
    }
    while k >= 0 && is_black(k) && state_count[0] <= max_count {
        state_count[0] += 1;
        k -= 1;
    }
    if state_count[0] > max_count {
        return None;
    }

    k = start + 1;
    while k < limit && is_black(k) {
        state_count[2] += 1;
        k += 1;
    }
    if k == limit {
        return None;
    }
    while k < limit && !is_black(k) && state_count[3] < max_count {
        state_count[3] += 1;
        k += 1;
    }
    if k == limit || state_count[3] >= max_count {
        return None;
    }
    while k < limit && is_black(k) && state_count[4] < max_count {
        state_count[4] += 1;
        k += 1;
    }
    if state_count[4] >= max_count {
        return None;
    }

    let state_count_total: i32 = state_count.iter().sum();
    if 5 * (state_count_total - original_state_count_total).abs() >= 2 * original_state_count_total
    {
        return None;
    }
    found_pattern_cross(&state_count).then(|| center_from_end(&state_count, k))
}

fn squared_distance(a: &FinderPattern, b: &FinderPattern) -> f64 {
    let x = (a.x - b.x) as f64;
    let y = (a.y - b.y) as f64;
    x * x + y * y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{scaled, symbol};

    fn assert_near(pattern: &FinderPattern, x: f32, y: f32) {
        assert!(
            (pattern.x() - x).abs() <= 1.0 && (pattern.y() - y).abs() <= 1.0,
            "expected centre near ({}, {}), got ({}, {})",
            x,
            y,
            pattern.x(),
            pattern.y()
        );
    }

    #[test]
    fn test_found_pattern_cross() {
        assert!(found_pattern_cross(&[1, 1, 3, 1, 1]));
        assert!(found_pattern_cross(&[4, 4, 12, 4, 4]));
        assert!(found_pattern_cross(&[5, 4, 11, 3, 4]));
        assert!(!found_pattern_cross(&[4, 4, 4, 4, 4]), "centre must be three modules");
        assert!(!found_pattern_cross(&[0, 4, 12, 4, 4]));
        assert!(!found_pattern_cross(&[1, 1, 2, 1, 1]), "too small to measure");
    }

    #[test]
    fn test_diagonal_is_looser() {
        let skewed = [2, 5, 15, 5, 5];
        assert!(!found_pattern_cross(&skewed));
        assert!(found_pattern_diagonal(&skewed));
    }

    #[test]
    fn test_combine_estimate_weights_by_count() {
        let first = FinderPattern::new(10.0, 20.0, 2.0);
        let merged = first.combine_estimate(22.0, 12.0, 4.0);
        assert_eq!(merged.count(), 2);
        assert_eq!(merged.x(), 11.0);
        assert_eq!(merged.y(), 21.0);
        assert_eq!(merged.estimated_module_size(), 3.0);

        let third = merged.combine_estimate(24.0, 14.0, 6.0);
        assert_eq!(third.count(), 3);
        assert!((third.x() - 12.0).abs() < 1e-5);
        assert!((third.estimated_module_size() - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_about_equals() {
        let pattern = FinderPattern::new(50.0, 50.0, 4.0);
        assert!(pattern.about_equals(4.0, 52.0, 48.0));
        assert!(!pattern.about_equals(4.0, 55.0, 50.0), "too far away");
        assert!(!pattern.about_equals(12.0, 50.0, 50.0), "module size differs too much");
    }

    #[test]
    fn test_finds_three_patterns() {
        // Version 1 at 4 px/module with a 4-module quiet zone
        let image = scaled(&symbol(b"FINDER", 1, qrcode::EcLevel::M), 4, 4);
        let mut finder = FinderPatternFinder::new(&image);
        let info = finder.find(false).unwrap();
        assert_near(&info.top_left, 30.0, 30.0);
        assert_near(&info.top_right, 86.0, 30.0);
        assert_near(&info.bottom_left, 30.0, 86.0);
        for pattern in [info.top_left, info.top_right, info.bottom_left] {
            assert!((pattern.estimated_module_size() - 4.0).abs() < 0.5);
            assert!(pattern.count() >= CENTER_QUORUM);
        }
    }

    #[test]
    fn test_reports_new_centres_to_callback() {
        use std::sync::{Arc, Mutex};

        let image = scaled(&symbol(b"FINDER", 1, qrcode::EcLevel::M), 4, 4);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback = ResultPointCallback::new(move |point| sink.lock().unwrap().push(point));
        let info = FinderPatternFinder::new(&image)
            .with_result_point_callback(Some(&callback))
            .find(false)
            .unwrap();

        let seen = seen.lock().unwrap();
        assert!(seen.len() >= 3, "only {} centres reported", seen.len());
        for pattern in [info.top_left, info.top_right, info.bottom_left] {
            assert!(
                seen.iter().any(|point| point.distance(&pattern.point()) <= 4.0),
                "{:?} was never reported",
                pattern
            );
        }
    }

    #[test]
    fn test_ordering_follows_rotation() {
        let mut image = scaled(&symbol(b"FINDER", 1, qrcode::EcLevel::M), 4, 4);
        image.rotate180();
        let info = FinderPatternFinder::new(&image).find(true).unwrap();
        // After a half turn the top-left locator sits at the bottom right
        assert_near(&info.top_left, 86.0, 86.0);
        assert_near(&info.top_right, 30.0, 86.0);
        assert_near(&info.bottom_left, 86.0, 30.0);
    }

    #[test]
    fn test_blank_image_not_found() {
        let image = BitMatrix::square(120);
        let result = FinderPatternFinder::new(&image).find(true);
        assert_eq!(result.unwrap_err(), DecodeError::NotFound);
    }
}
