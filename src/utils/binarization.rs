/// Convert luminance to a 1-bit BitMatrix where true = black.
///
/// Two strategies share one interface: a global histogram threshold, and a
/// hybrid that thresholds 8x8 blocks against their 5x5 block neighbourhood.
use std::str::FromStr;

use crate::error::{DecodeError, Result};
use crate::models::{BitArray, BitMatrix};
use crate::utils::luminance::LuminanceSource;

const LUMINANCE_BITS: usize = 5;
const LUMINANCE_SHIFT: usize = 8 - LUMINANCE_BITS;
const LUMINANCE_BUCKETS: usize = 1 << LUMINANCE_BITS;

const BLOCK_SIZE_POWER: usize = 3;
const BLOCK_SIZE: usize = 1 << BLOCK_SIZE_POWER;
const BLOCK_SIZE_MASK: usize = BLOCK_SIZE - 1;
const MINIMUM_DIMENSION: usize = BLOCK_SIZE * 5;
const MIN_DYNAMIC_RANGE: u32 = 24;

/// Which binarization strategy to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BinarizerKind {
    /// One histogram-derived threshold for the whole image
    Global,
    /// Local block thresholds, falling back to global for small images
    #[default]
    Hybrid,
}

impl FromStr for BinarizerKind {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "global" | "histogram" | "global_histogram" => Ok(BinarizerKind::Global),
            "hybrid" => Ok(BinarizerKind::Hybrid),
            other => Err(format!("unknown binarizer '{}'", other)),
        }
    }
}

/// A luminance source plus the memoized black matrix computed from it
#[derive(Debug, Clone)]
pub enum Binarizer {
    /// Global histogram threshold
    GlobalHistogram {
        /// Pixels to binarize
        source: LuminanceSource,
        /// Black matrix, computed on first request
        matrix: Option<BitMatrix>,
    },
    /// Per-block local threshold
    Hybrid {
        /// Pixels to binarize
        source: LuminanceSource,
        /// Black matrix, computed on first request
        matrix: Option<BitMatrix>,
    },
}

impl Binarizer {
    /// Binarizer of the given kind with an empty cache
    pub fn new(kind: BinarizerKind, source: LuminanceSource) -> Self {
        match kind {
            BinarizerKind::Global => Binarizer::GlobalHistogram {
                source,
                matrix: None,
            },
            BinarizerKind::Hybrid => Binarizer::Hybrid {
                source,
                matrix: None,
            },
        }
    }

    /// Global histogram binarizer
    pub fn global_histogram(source: LuminanceSource) -> Self {
        Self::new(BinarizerKind::Global, source)
    }

    /// Hybrid binarizer
    pub fn hybrid(source: LuminanceSource) -> Self {
        Self::new(BinarizerKind::Hybrid, source)
    }

    /// Which strategy this is
    pub fn kind(&self) -> BinarizerKind {
        match self {
            Binarizer::GlobalHistogram { .. } => BinarizerKind::Global,
            Binarizer::Hybrid { .. } => BinarizerKind::Hybrid,
        }
    }

    /// The pixels being binarized
    pub fn luminance_source(&self) -> &LuminanceSource {
        match self {
            Binarizer::GlobalHistogram { source, .. } | Binarizer::Hybrid { source, .. } => source,
        }
    }

    /// Source width in pixels
    pub fn width(&self) -> usize {
        self.luminance_source().width()
    }

    /// Source height in pixels
    pub fn height(&self) -> usize {
        self.luminance_source().height()
    }

    /// Same strategy over a different source, with an empty cache
    pub fn create_binarizer(&self, source: LuminanceSource) -> Self {
        Self::new(self.kind(), source)
    }

    /// Binarize one row with the global row algorithm (both variants).
    ///
    /// Reuses `row` when it is wide enough.
    pub fn black_row(&self, y: usize, row: Option<BitArray>) -> Result<BitArray> {
        let source = self.luminance_source();
        if y >= source.height() {
            return Err(DecodeError::NotFound);
        }
        let width = source.width();
        let mut row = match row {
            Some(mut row) if row.size() >= width => {
                row.clear();
                row
            }
            _ => BitArray::new(width),
        };

        let luminances = source.row(y);
        let mut buckets = [0u32; LUMINANCE_BUCKETS];
        for &pixel in luminances.iter() {
            buckets[(pixel as usize) >> LUMINANCE_SHIFT] += 1;
        }
        let black_point = estimate_black_point(&buckets)? as i32;

        if width < 3 {
            for (x, &pixel) in luminances.iter().enumerate() {
                if (pixel as i32) < black_point {
                    row.set(x);
                }
            }
        } else {
            let mut left = luminances[0] as i32;
            let mut center = luminances[1] as i32;
            for x in 1..width - 1 {
                let right = luminances[x + 1] as i32;
                // -1 4 -1 box filter with a weight of 2
                if ((center * 4) - left - right) / 2 < black_point {
                    row.set(x);
                }
                left = center;
                center = right;
            }
        }
        Ok(row)
    }

    /// The binarized image, computed at most once per instance
    pub fn black_matrix(&mut self) -> Result<&BitMatrix> {
        let (source, cache, hybrid) = match self {
            Binarizer::GlobalHistogram { source, matrix } => (&*source, matrix, false),
            Binarizer::Hybrid { source, matrix } => (&*source, matrix, true),
        };
        if cache.is_none() {
            let width = source.width();
            let height = source.height();
            let computed = if hybrid && width >= MINIMUM_DIMENSION && height >= MINIMUM_DIMENSION {
                hybrid_black_matrix(source)
            } else {
                global_black_matrix(source)?
            };
            *cache = Some(computed);
        }
        cache.as_ref().ok_or(DecodeError::NotFound)
    }
}

/// Threshold from the two dominant histogram peaks and the deepest valley between them
pub fn estimate_black_point(buckets: &[u32]) -> Result<u32> {
    let num_buckets = buckets.len();

    // Tallest peak
    let mut max_bucket_count = 0;
    let mut first_peak = 0;
    let mut first_peak_size = 0;
    for (x, &count) in buckets.iter().enumerate() {
        if count > first_peak_size {
            first_peak = x;
            first_peak_size = count;
        }
        if count > max_bucket_count {
            max_bucket_count = count;
        }
    }

    // Second peak, favouring buckets far from the first
    let mut second_peak = 0;
    let mut second_peak_score = 0u64;
    for (x, &count) in buckets.iter().enumerate() {
        let distance = x.abs_diff(first_peak) as u64;
        let score = count as u64 * distance * distance;
        if score > second_peak_score {
            second_peak = x;
            second_peak_score = score;
        }
    }

    if first_peak > second_peak {
        std::mem::swap(&mut first_peak, &mut second_peak);
    }

    // Peaks this close mean there is no real contrast
    if second_peak - first_peak <= num_buckets / 16 {
        return Err(DecodeError::NotFound);
    }

    let mut best_valley = second_peak - 1;
    let mut best_valley_score: i64 = -1;
    for x in (first_peak + 1..second_peak).rev() {
        let from_first = (x - first_peak) as i64;
        let score = from_first
            * from_first
            * (second_peak - x) as i64
            * (max_bucket_count - buckets[x]) as i64;
        if score > best_valley_score {
            best_valley = x;
            best_valley_score = score;
        }
    }

    Ok((best_valley << LUMINANCE_SHIFT) as u32)
}

fn global_black_matrix(source: &LuminanceSource) -> Result<BitMatrix> {
    let width = source.width();
    let height = source.height();
    let mut matrix = BitMatrix::new(width, height);

    // Sample the middle three fifths of four rows
    let mut buckets = [0u32; LUMINANCE_BUCKETS];
    for y in 1..5 {
        let row = source.row(height * y / 5);
        let right = (width * 4) / 5;
        for &pixel in &row[width / 5..right] {
            buckets[(pixel as usize) >> LUMINANCE_SHIFT] += 1;
        }
    }
    let black_point = estimate_black_point(&buckets)?;

    let luminances = source.matrix();
    for y in 0..height {
        let offset = y * width;
        for x in 0..width {
            if (luminances[offset + x] as u32) < black_point {
                matrix.set(x, y, true);
            }
        }
    }
    Ok(matrix)
}

fn hybrid_black_matrix(source: &LuminanceSource) -> BitMatrix {
    let width = source.width();
    let height = source.height();
    let luminances = source.matrix();

    let mut sub_width = width >> BLOCK_SIZE_POWER;
    if width & BLOCK_SIZE_MASK != 0 {
        sub_width += 1;
    }
    let mut sub_height = height >> BLOCK_SIZE_POWER;
    if height & BLOCK_SIZE_MASK != 0 {
        sub_height += 1;
    }

    let black_points = calculate_black_points(&luminances, sub_width, sub_height, width, height);
    let mut matrix = BitMatrix::new(width, height);
    calculate_threshold_for_block(
        &luminances,
        sub_width,
        sub_height,
        width,
        height,
        &black_points,
        &mut matrix,
    );
    matrix
}

/// Threshold each block against the average of the 5x5 blocks around it
fn calculate_threshold_for_block(
    luminances: &[u8],
    sub_width: usize,
    sub_height: usize,
    width: usize,
    height: usize,
    black_points: &[Vec<u32>],
    matrix: &mut BitMatrix,
) {
    let max_y_offset = height - BLOCK_SIZE;
    let max_x_offset = width - BLOCK_SIZE;
    for y in 0..sub_height {
        let y_offset = (y << BLOCK_SIZE_POWER).min(max_y_offset);
        let top = cap(y, sub_height - 3);
        for x in 0..sub_width {
            let x_offset = (x << BLOCK_SIZE_POWER).min(max_x_offset);
            let left = cap(x, sub_width - 3);
            let mut sum = 0;
            for black_row in &black_points[top - 2..=top + 2] {
                sum += black_row[left - 2..=left + 2].iter().sum::<u32>();
            }
            let average = sum / 25;
            threshold_block(luminances, x_offset, y_offset, average, width, matrix);
        }
    }
}

#[inline]
fn cap(value: usize, max: usize) -> usize {
    if value < 2 { 2 } else { value.min(max) }
}

fn threshold_block(
    luminances: &[u8],
    x_offset: usize,
    y_offset: usize,
    threshold: u32,
    stride: usize,
    matrix: &mut BitMatrix,
) {
    for y in 0..BLOCK_SIZE {
        let offset = (y_offset + y) * stride + x_offset;
        for x in 0..BLOCK_SIZE {
            // Pixels equal to the threshold count as black
            if luminances[offset + x] as u32 <= threshold {
                matrix.set(x_offset + x, y_offset + y, true);
            }
        }
    }
}

/// Per-block black point: the block average, or a neighbour-derived guess for flat blocks
fn calculate_black_points(
    luminances: &[u8],
    sub_width: usize,
    sub_height: usize,
    width: usize,
    height: usize,
) -> Vec<Vec<u32>> {
    let max_y_offset = height - BLOCK_SIZE;
    let max_x_offset = width - BLOCK_SIZE;
    let mut black_points = vec![vec![0u32; sub_width]; sub_height];

    for y in 0..sub_height {
        let y_offset = (y << BLOCK_SIZE_POWER).min(max_y_offset);
        for x in 0..sub_width {
            let x_offset = (x << BLOCK_SIZE_POWER).min(max_x_offset);
            let mut sum = 0u32;
            let mut min = 0xFFu32;
            let mut max = 0u32;

            let mut yy = 0;
            while yy < BLOCK_SIZE {
                let offset = (y_offset + yy) * width + x_offset;
                for &pixel in &luminances[offset..offset + BLOCK_SIZE] {
                    let pixel = pixel as u32;
                    sum += pixel;
                    min = min.min(pixel);
                    max = max.max(pixel);
                }
                yy += 1;
                if max - min > MIN_DYNAMIC_RANGE {
                    // Range is settled; only the sum is still needed
                    while yy < BLOCK_SIZE {
                        let offset = (y_offset + yy) * width + x_offset;
                        sum += luminances[offset..offset + BLOCK_SIZE]
                            .iter()
                            .map(|&p| p as u32)
                            .sum::<u32>();
                        yy += 1;
                    }
                }
            }

            let mut average = sum >> (BLOCK_SIZE_POWER * 2);
            if max - min <= MIN_DYNAMIC_RANGE {
                // Flat block: assume white unless neighbours say otherwise
                average = min / 2;
                if y > 0 && x > 0 {
                    let neighbor_black_point = (black_points[y - 1][x]
                        + 2 * black_points[y][x - 1]
                        + black_points[y - 1][x - 1])
                        / 4;
                    if min < neighbor_black_point {
                        average = neighbor_black_point;
                    }
                }
            }
            black_points[y][x] = average;
        }
    }
    black_points
}
