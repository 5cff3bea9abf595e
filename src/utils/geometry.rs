/// Projective transforms between quadrilaterals
use crate::models::Point;

/// Perspective transformation matrix (3x3).
///
/// Points are row vectors: `[x' y' w] = [x y 1] * A`, so `a31`/`a32` are the
/// translation terms and `a13`/`a23` the projective ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveTransform {
    a11: f32,
    a12: f32,
    a13: f32,
    a21: f32,
    a22: f32,
    a23: f32,
    a31: f32,
    a32: f32,
    a33: f32,
}

impl PerspectiveTransform {
    #[allow(clippy::too_many_arguments)]
    fn new(
        a11: f32,
        a21: f32,
        a31: f32,
        a12: f32,
        a22: f32,
        a32: f32,
        a13: f32,
        a23: f32,
        a33: f32,
    ) -> Self {
        Self {
            a11,
            a12,
            a13,
            a21,
            a22,
            a23,
            a31,
            a32,
            a33,
        }
    }

    /// Map quadrilateral `(x0,y0)..(x3,y3)` onto `(x0p,y0p)..(x3p,y3p)`, corner by corner
    #[allow(clippy::too_many_arguments)]
    pub fn quadrilateral_to_quadrilateral(
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        x3: f32,
        y3: f32,
        x0p: f32,
        y0p: f32,
        x1p: f32,
        y1p: f32,
        x2p: f32,
        y2p: f32,
        x3p: f32,
        y3p: f32,
    ) -> Self {
        let q_to_s = Self::quadrilateral_to_square(x0, y0, x1, y1, x2, y2, x3, y3);
        let s_to_q = Self::square_to_quadrilateral(x0p, y0p, x1p, y1p, x2p, y2p, x3p, y3p);
        s_to_q.times(&q_to_s)
    }

    /// Map the unit square `(0,0) (1,0) (1,1) (0,1)` onto a quadrilateral
    #[allow(clippy::too_many_arguments)]
    pub fn square_to_quadrilateral(
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        x3: f32,
        y3: f32,
    ) -> Self {
        let dx3 = x0 - x1 + x2 - x3;
        let dy3 = y0 - y1 + y2 - y3;
        if dx3 == 0.0 && dy3 == 0.0 {
            // Parallelogram: affine
            Self::new(x1 - x0, x2 - x1, x0, y1 - y0, y2 - y1, y0, 0.0, 0.0, 1.0)
        } else {
            let dx1 = x1 - x2;
            let dx2 = x3 - x2;
            let dy1 = y1 - y2;
            let dy2 = y3 - y2;
            let denominator = dx1 * dy2 - dx2 * dy1;
            let a13 = (dx3 * dy2 - dx2 * dy3) / denominator;
            let a23 = (dx1 * dy3 - dx3 * dy1) / denominator;
            Self::new(
                x1 - x0 + a13 * x1,
                x3 - x0 + a23 * x3,
                x0,
                y1 - y0 + a13 * y1,
                y3 - y0 + a23 * y3,
                y0,
                a13,
                a23,
                1.0,
            )
        }
    }

    /// Inverse of [`square_to_quadrilateral`](Self::square_to_quadrilateral), up to scale
    #[allow(clippy::too_many_arguments)]
    pub fn quadrilateral_to_square(
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        x3: f32,
        y3: f32,
    ) -> Self {
        Self::square_to_quadrilateral(x0, y0, x1, y1, x2, y2, x3, y3).build_adjoint()
    }

    /// Adjoint matrix; equals the inverse up to a scale factor, which the projective divide cancels
    pub fn build_adjoint(&self) -> Self {
        Self::new(
            self.a22 * self.a33 - self.a23 * self.a32,
            self.a23 * self.a31 - self.a21 * self.a33,
            self.a21 * self.a32 - self.a22 * self.a31,
            self.a13 * self.a32 - self.a12 * self.a33,
            self.a11 * self.a33 - self.a13 * self.a31,
            self.a12 * self.a31 - self.a11 * self.a32,
            self.a12 * self.a23 - self.a13 * self.a22,
            self.a13 * self.a21 - self.a11 * self.a23,
            self.a11 * self.a22 - self.a12 * self.a21,
        )
    }

    /// Composition: apply `other` first, then `self`
    pub fn times(&self, other: &Self) -> Self {
        Self::new(
            self.a11 * other.a11 + self.a21 * other.a12 + self.a31 * other.a13,
            self.a11 * other.a21 + self.a21 * other.a22 + self.a31 * other.a23,
            self.a11 * other.a31 + self.a21 * other.a32 + self.a31 * other.a33,
            self.a12 * other.a11 + self.a22 * other.a12 + self.a32 * other.a13,
            self.a12 * other.a21 + self.a22 * other.a22 + self.a32 * other.a23,
            self.a12 * other.a31 + self.a22 * other.a32 + self.a32 * other.a33,
            self.a13 * other.a11 + self.a23 * other.a12 + self.a33 * other.a13,
            self.a13 * other.a21 + self.a23 * other.a22 + self.a33 * other.a23,
            self.a13 * other.a31 + self.a23 * other.a32 + self.a33 * other.a33,
        )
    }

    /// Transform interleaved `x, y` pairs in place
    pub fn transform_points(&self, points: &mut [f32]) {
        for pair in points.chunks_exact_mut(2) {
            let x = pair[0];
            let y = pair[1];
            let denominator = self.a13 * x + self.a23 * y + self.a33;
            pair[0] = (self.a11 * x + self.a21 * y + self.a31) / denominator;
            pair[1] = (self.a12 * x + self.a22 * y + self.a32) / denominator;
        }
    }

    /// Transform a single point
    pub fn transform(&self, p: &Point) -> Point {
        let mut pair = [p.x, p.y];
        self.transform_points(&mut pair);
        Point::new(pair[0], pair[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Point, expected: (f32, f32)) {
        assert!(
            (actual.x - expected.0).abs() < 1e-3 && (actual.y - expected.1).abs() < 1e-3,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    #[test]
    fn test_square_to_quadrilateral_corners() {
        let t = PerspectiveTransform::square_to_quadrilateral(
            10.0, 20.0, 110.0, 25.0, 120.0, 140.0, 5.0, 130.0,
        );
        assert_close(t.transform(&Point::new(0.0, 0.0)), (10.0, 20.0));
        assert_close(t.transform(&Point::new(1.0, 0.0)), (110.0, 25.0));
        assert_close(t.transform(&Point::new(1.0, 1.0)), (120.0, 140.0));
        assert_close(t.transform(&Point::new(0.0, 1.0)), (5.0, 130.0));
    }

    #[test]
    fn test_parallelogram_is_affine() {
        let t = PerspectiveTransform::square_to_quadrilateral(
            0.0, 0.0, 100.0, 0.0, 100.0, 50.0, 0.0, 50.0,
        );
        assert_eq!(t.a13, 0.0);
        assert_eq!(t.a23, 0.0);
        assert_close(t.transform(&Point::new(0.5, 0.5)), (50.0, 25.0));
    }

    #[test]
    fn test_quadrilateral_to_quadrilateral() {
        let t = PerspectiveTransform::quadrilateral_to_quadrilateral(
            3.5, 3.5, 17.5, 3.5, 14.5, 14.5, 3.5, 17.5, // module space
            30.0, 32.0, 170.0, 28.0, 142.0, 150.0, 35.0, 176.0, // image space
        );
        assert_close(t.transform(&Point::new(3.5, 3.5)), (30.0, 32.0));
        assert_close(t.transform(&Point::new(17.5, 3.5)), (170.0, 28.0));
        assert_close(t.transform(&Point::new(14.5, 14.5)), (142.0, 150.0));
        assert_close(t.transform(&Point::new(3.5, 17.5)), (35.0, 176.0));
    }

    #[test]
    fn test_adjoint_inverts_up_to_scale() {
        let t = PerspectiveTransform::square_to_quadrilateral(
            10.0, 20.0, 110.0, 25.0, 120.0, 140.0, 5.0, 130.0,
        );
        let round_trip = t.build_adjoint().times(&t);
        let p = round_trip.transform(&Point::new(0.3, 0.7));
        assert_close(p, (0.3, 0.7));
    }

    #[test]
    fn test_transform_points_interleaved() {
        let t = PerspectiveTransform::square_to_quadrilateral(
            0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 10.0,
        );
        let mut points = [0.5, 0.5, 1.0, 0.0, 0.25, 1.0];
        t.transform_points(&mut points);
        assert_eq!(points, [5.0, 5.0, 10.0, 0.0, 2.5, 10.0]);
    }
}
