//! Basic geometric types used throughout layout and scene building.
//!
//! All coordinates are `f64`: the partition layout has to conserve area across
//! deep hierarchies and single precision drifts too far for that.

/// A point in 2D canvas space (x grows right, y grows down).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f64 {
        self.y
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the midpoint between this point and another point
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Calculates the hypotenuse (Euclidean distance from origin)
    pub fn hypot(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Multiplies both coordinates by the given factor
    pub fn scale(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Returns true if neither coordinate is NaN or infinite
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Converts a point and size into a bounds rectangle
    ///
    /// The point is treated as the center of the bounds, and the size
    /// is distributed equally in all directions around that center.
    pub fn to_bounds(self, size: Size) -> Bounds {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;

        Bounds {
            min_x: self.x - half_width,
            min_y: self.y - half_height,
            max_x: self.x + half_width,
            max_y: self.y + half_height,
        }
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f64,
    height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f64 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f64 {
        self.height
    }

    /// Returns the point at the center of a canvas of this size
    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Returns true if both dimensions are finite and strictly positive
    pub fn is_drawable(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Returns a new Size with the insets removed from both dimensions.
    ///
    /// Dimensions never go below zero.
    pub fn shrink(self, insets: Insets) -> Self {
        Self {
            width: (self.width - insets.horizontal_sum()).max(0.0),
            height: (self.height - insets.vertical_sum()).max(0.0),
        }
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Bounds {
    /// Creates bounds from explicit edge coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Creates bounds from a top-left corner and a size.
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Returns the smallest bounds containing every point, or `None` for an
    /// empty iterator.
    pub fn enclosing(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let start = Self::new(first.x, first.y, first.x, first.y);
        Some(points.fold(start, |acc, p| Self {
            min_x: acc.min_x.min(p.x),
            min_y: acc.min_y.min(p.y),
            max_x: acc.max_x.max(p.x),
            max_y: acc.max_y.max(p.y),
        }))
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f64 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f64 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f64 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f64 {
        self.max_y
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f64 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f64 {
        self.max_y - self.min_y
    }

    /// Returns the area covered by the bounds
    pub fn area(self) -> f64 {
        self.width() * self.height()
    }

    /// Returns the center of the bounds
    pub fn center(self) -> Point {
        Point {
            x: (self.min_x + self.max_x) / 2.0,
            y: (self.min_y + self.max_y) / 2.0,
        }
    }

    /// Returns true if `other` lies entirely inside these bounds, allowing
    /// `tolerance` of slack on every edge.
    pub fn contains(&self, other: &Self, tolerance: f64) -> bool {
        other.min_x >= self.min_x - tolerance
            && other.min_y >= self.min_y - tolerance
            && other.max_x <= self.max_x + tolerance
            && other.max_y <= self.max_y + tolerance
    }
}

/// Represents spacing around an element (padding, margin, etc.)
/// with potentially different values for each side
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Insets {
    top: f64,
    right: f64,
    bottom: f64,
    left: f64,
}

impl Insets {
    /// Creates new insets with specified values for each side
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Creates uniform insets with the same value for all sides
    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    /// Returns the top inset value
    pub fn top(self) -> f64 {
        self.top
    }

    /// Returns the left inset value
    pub fn left(self) -> f64 {
        self.left
    }

    /// Returns the sum of left and right insets
    pub fn horizontal_sum(self) -> f64 {
        self.left + self.right
    }

    /// Returns the sum of top and bottom insets
    pub fn vertical_sum(self) -> f64 {
        self.top + self.bottom
    }

    /// Returns the area left inside `size` once these insets are removed,
    /// as bounds positioned in the same coordinate space.
    pub fn inner_bounds(self, size: Size) -> Bounds {
        Bounds::new_from_top_left(Point::new(self.left, self.top), size.shrink(self))
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_point_default() {
        let point = Point::default();
        assert_eq!(point.x(), 0.0);
        assert_eq!(point.y(), 0.0);
    }

    #[test]
    fn test_point_add_sub() {
        let p1 = Point::new(5.0, 8.0);
        let p2 = Point::new(2.0, 3.0);
        assert_eq!(p1.add_point(p2), Point::new(7.0, 11.0));
        assert_eq!(p1.sub_point(p2), Point::new(3.0, 5.0));
    }

    #[test]
    fn test_point_midpoint_and_hypot() {
        let midpoint = Point::new(0.0, 0.0).midpoint(Point::new(4.0, 6.0));
        assert_eq!(midpoint, Point::new(2.0, 3.0));
        assert_eq!(Point::new(3.0, 4.0).hypot(), 5.0);
    }

    #[test]
    fn test_point_is_finite() {
        assert!(Point::new(1.0, -2.0).is_finite());
        assert!(!Point::new(f64::NAN, 0.0).is_finite());
        assert!(!Point::new(0.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_point_to_bounds() {
        let bounds = Point::new(10.0, 20.0).to_bounds(Size::new(4.0, 6.0));
        assert_eq!(bounds, Bounds::new(8.0, 17.0, 12.0, 23.0));
    }

    #[test]
    fn test_size_center_and_drawable() {
        let size = Size::new(400.0, 300.0);
        assert_eq!(size.center(), Point::new(200.0, 150.0));
        assert!(size.is_drawable());
        assert!(!Size::new(0.0, 10.0).is_drawable());
        assert!(!Size::new(f64::NAN, 10.0).is_drawable());
    }

    #[test]
    fn test_size_shrink_never_negative() {
        let size = Size::new(80.0, 300.0).shrink(Insets::uniform(50.0));
        assert_eq!(size.width(), 0.0);
        assert_eq!(size.height(), 200.0);
    }

    #[test]
    fn test_bounds_enclosing() {
        assert!(Bounds::enclosing(Vec::<Point>::new()).is_none());

        let bounds = Bounds::enclosing([
            Point::new(1.0, 5.0),
            Point::new(-3.0, 2.0),
            Point::new(4.0, 9.0),
        ])
        .unwrap();
        assert_eq!(bounds, Bounds::new(-3.0, 2.0, 4.0, 9.0));
        assert_eq!(bounds.center(), Point::new(0.5, 5.5));
    }

    #[test]
    fn test_bounds_area_and_size() {
        let bounds = Bounds::new_from_top_left(Point::new(10.0, 10.0), Size::new(30.0, 20.0));
        assert_approx_eq!(f64, bounds.area(), 600.0);
        assert_approx_eq!(f64, bounds.width(), 30.0);
        assert_approx_eq!(f64, bounds.height(), 20.0);
        assert_eq!(bounds.min_x(), 10.0);
    }

    #[test]
    fn test_bounds_contains() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(5.0, -5.0, 20.0, 5.0);
        assert!(Bounds::new(0.0, -5.0, 20.0, 10.0).contains(&a, 0.0));
        assert!(!a.contains(&b, 0.0));
        assert!(a.contains(&Bounds::new(-0.5, 0.0, 10.0, 10.0), 1.0));
    }

    #[test]
    fn test_insets_inner_bounds() {
        let inner = Insets::uniform(50.0).inner_bounds(Size::new(400.0, 300.0));
        assert_eq!(inner, Bounds::new(50.0, 50.0, 350.0, 250.0));

        let uneven = Insets::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(uneven.horizontal_sum(), 6.0);
        assert_eq!(uneven.vertical_sum(), 4.0);
    }
}
