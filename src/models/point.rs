use std::fmt;
use std::sync::Arc;

/// 2D point with floating point coordinates (a result point in image space)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another point
    pub fn distance(&self, other: &Point) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Calculate squared distance (faster, no sqrt)
    pub fn distance_squared(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Z component of the cross product of `(c - b)` and `(a - b)`
    pub fn cross_product_z(a: &Point, b: &Point, c: &Point) -> f32 {
        (c.x - b.x) * (a.y - b.y) - (c.y - b.y) * (a.x - b.x)
    }
}

/// Anything positioned in image space
pub trait ResultPoint {
    /// Position of the point
    fn point(&self) -> Point;
}

impl ResultPoint for Point {
    fn point(&self) -> Point {
        *self
    }
}

/// Observer told about each new candidate finder or alignment centre
#[derive(Clone)]
pub struct ResultPointCallback(Arc<dyn Fn(Point) + Send + Sync>);

impl ResultPointCallback {
    /// Wrap a closure; it may run on several threads during batch decoding
    pub fn new(callback: impl Fn(Point) + Send + Sync + 'static) -> Self {
        Self(Arc::new(callback))
    }

    /// Report a newly recorded candidate centre
    pub fn found_possible_result_point(&self, point: Point) {
        (self.0)(point)
    }
}

impl fmt::Debug for ResultPointCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ResultPointCallback")
    }
}

/// Two callbacks are equal when they share the same closure
impl PartialEq for ResultPointCallback {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl Eq for ResultPointCallback {}

/// Order three finder centres as `[bottom_left, top_left, top_right]`.
///
/// The top-left corner is the vertex opposite the longest side; the other two
/// are assigned so the winding is the same regardless of input order.
pub fn order_best_patterns<T: ResultPoint + Copy>(patterns: &mut [T; 3]) {
    let p = [patterns[0].point(), patterns[1].point(), patterns[2].point()];
    let zero_one = p[0].distance(&p[1]);
    let one_two = p[1].distance(&p[2]);
    let zero_two = p[0].distance(&p[2]);

    // (a, b, c) indices with b at the corner
    let (mut a, b, mut c) = if one_two >= zero_one && one_two >= zero_two {
        (1, 0, 2)
    } else if zero_two >= one_two && zero_two >= zero_one {
        (0, 1, 2)
    } else {
        (0, 2, 1)
    };

    if Point::cross_product_z(&p[a], &p[b], &p[c]) < 0.0 {
        std::mem::swap(&mut a, &mut c);
    }

    *patterns = [patterns[a], patterns[b], patterns[c]];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(3.0, 4.0);
        assert!((p1.distance(&p2) - 5.0).abs() < 0.001);
        assert!((p1.distance_squared(&p2) - 25.0).abs() < 0.001);
    }

    #[test]
    fn test_result_point_callback() {
        use std::sync::Mutex;

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback = ResultPointCallback::new(move |point| sink.lock().unwrap().push(point));
        callback.found_possible_result_point(Point::new(1.0, 2.0));
        callback.clone().found_possible_result_point(Point::new(3.0, 4.0));
        assert_eq!(*seen.lock().unwrap(), vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)]);

        assert_eq!(callback, callback.clone());
        assert_ne!(callback, ResultPointCallback::new(|_| {}));
    }

    #[test]
    fn test_order_best_patterns_any_input_order() {
        let bottom_left = Point::new(10.0, 90.0);
        let top_left = Point::new(10.0, 10.0);
        let top_right = Point::new(90.0, 10.0);
        let expected = [bottom_left, top_left, top_right];

        let inputs = [
            [bottom_left, top_left, top_right],
            [top_right, bottom_left, top_left],
            [top_left, top_right, bottom_left],
            [top_right, top_left, bottom_left],
            [bottom_left, top_right, top_left],
            [top_left, bottom_left, top_right],
        ];
        for mut input in inputs {
            order_best_patterns(&mut input);
            assert_eq!(input, expected, "ordering should not depend on input order");
        }
    }
}
