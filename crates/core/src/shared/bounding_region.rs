/// A 2-D point in pixel coordinates of the source frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned face box as reported by a face model.
///
/// Model output is not trusted to be well-formed, so construction never
/// rejects a degenerate box. Consumers check [`BoundingRegion::is_degenerate`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingRegion {
    pub top_left: Point,
    pub bottom_right: Point,
}

impl BoundingRegion {
    pub const fn new(top_left: Point, bottom_right: Point) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    /// Builds a region from `[x1, y1, x2, y2]` corner coordinates.
    pub fn from_corners(corners: [f64; 4]) -> Self {
        Self::new(
            Point::new(corners[0], corners[1]),
            Point::new(corners[2], corners[3]),
        )
    }

    pub fn top(&self) -> f64 {
        self.top_left.y
    }

    pub fn bottom(&self) -> f64 {
        self.bottom_right.y
    }

    pub fn width(&self) -> f64 {
        self.bottom_right.x - self.top_left.x
    }

    pub fn height(&self) -> f64 {
        self.bottom_right.y - self.top_left.y
    }

    /// True when the box has no positive, finite height.
    pub fn is_degenerate(&self) -> bool {
        let h = self.height();
        !h.is_finite() || h <= 0.0
    }

    /// The y coordinate at `fraction` of the height below the top edge.
    pub fn row_at(&self, fraction: f64) -> f64 {
        self.top() + fraction * self.height()
    }

    pub fn corners(&self) -> [f64; 4] {
        [
            self.top_left.x,
            self.top_left.y,
            self.bottom_right.x,
            self.bottom_right.y,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn region(x1: f64, y1: f64, x2: f64, y2: f64) -> BoundingRegion {
        BoundingRegion::from_corners([x1, y1, x2, y2])
    }

    #[test]
    fn test_dimensions() {
        let r = region(10.0, 100.0, 110.0, 300.0);
        assert_relative_eq!(r.width(), 100.0);
        assert_relative_eq!(r.height(), 200.0);
        assert_relative_eq!(r.top(), 100.0);
        assert_relative_eq!(r.bottom(), 300.0);
    }

    #[test]
    fn test_row_at_fraction() {
        let r = region(0.0, 100.0, 100.0, 300.0);
        assert_relative_eq!(r.row_at(0.0), 100.0);
        assert_relative_eq!(r.row_at(0.2), 140.0);
        assert_relative_eq!(r.row_at(1.0), 300.0);
    }

    #[test]
    fn test_corners_roundtrip() {
        let corners = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(BoundingRegion::from_corners(corners).corners(), corners);
    }

    #[rstest]
    #[case::zero_height(region(0.0, 100.0, 50.0, 100.0), true)]
    #[case::inverted(region(0.0, 200.0, 50.0, 100.0), true)]
    #[case::nan(region(0.0, f64::NAN, 50.0, 100.0), true)]
    #[case::normal(region(0.0, 100.0, 50.0, 101.0), false)]
    fn test_is_degenerate(#[case] r: BoundingRegion, #[case] expected: bool) {
        assert_eq!(r.is_degenerate(), expected);
    }
}
