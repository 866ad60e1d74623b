//! Geometric primitives for diagram layout and positioning.
//!
//! This module provides the geometric types used throughout Stratus for
//! placing components on the canvas and checking that they fit.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in canvas space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangle defined by minimum and maximum coordinates
//! - [`Insets`] - Padding values for four sides
//!
//! # Coordinate System
//!
//! Stratus uses the coordinate system shared by SVG and Draw.io:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! - **Origin**: Top-left corner of the canvas at `(0, 0)`
//! - **X-axis**: Increases rightward
//! - **Y-axis**: Increases downward

/// A 2D point in canvas coordinate space.
///
/// # Examples
///
/// ```
/// # use stratus_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
///
/// let mid = p1.midpoint(p2);
/// assert_eq!(mid.x(), 7.5);
/// assert_eq!(mid.y(), 12.5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Adds another point to this point, returning a new point.
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

    /// Euclidean distance to another point
    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Multiplies both coordinates by the given factor.
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Converts a point and size into a bounds rectangle centered on the point.
    pub fn to_bounds(self, size: Size) -> Bounds {
        Bounds::new_from_center(self, size)
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Clamps both dimensions to `other`.
    pub fn min(self, other: Size) -> Self {
        Self {
            width: self.width.min(other.width),
            height: self.height.min(other.height),
        }
    }
}

/// A rectangle defined by its minimum and maximum coordinates.
///
/// Components and containers store their position as `Bounds`. The
/// `(x, y, width, height)` view used by configuration files and the
/// Draw.io format is available through [`Bounds::new`] and the
/// [`min_x`](Bounds::min_x)/[`min_y`](Bounds::min_y)/[`width`](Bounds::width)/[`height`](Bounds::height)
/// accessors.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates bounds from a top-left corner and dimensions.
    ///
    /// # Examples
    ///
    /// ```
    /// # use stratus_core::geometry::Bounds;
    /// let bounds = Bounds::new(10.0, 20.0, 100.0, 50.0);
    /// assert_eq!(bounds.max_x(), 110.0);
    /// assert_eq!(bounds.max_y(), 70.0);
    /// ```
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new_from_top_left(Point::new(x, y), Size::new(width, height))
    }

    /// Creates bounds spanning two corners exactly, without going through a size.
    ///
    /// Adjacent rectangles built from shared corner values meet without gaps.
    pub fn from_corners(min: Point, max: Point) -> Self {
        Self {
            min_x: min.x,
            min_y: min.y,
            max_x: max.x,
            max_y: max.y,
        }
    }

    /// Creates a new bounds from a center point and a size
    pub fn new_from_center(center: Point, size: Size) -> Self {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;
        Self {
            min_x: center.x - half_width,
            min_y: center.y - half_height,
            max_x: center.x + half_width,
            max_y: center.y + half_height,
        }
    }

    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the top-left corner as a Point
    pub fn min_point(self) -> Point {
        Point {
            x: self.min_x,
            y: self.min_y,
        }
    }

    /// Converts bounds to a Size object
    pub fn to_size(self) -> Size {
        Size {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Merges two bounds into the smallest bounds containing both.
    ///
    /// # Examples
    ///
    /// ```
    /// # use stratus_core::geometry::{Bounds, Point, Size};
    /// let web = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 30.0));
    /// let db = Bounds::new_from_top_left(Point::new(10.0, 40.0), Size::new(120.0, 80.0));
    ///
    /// let combined = web.merge(&db);
    /// assert_eq!(combined.min_x(), 0.0);
    /// assert_eq!(combined.width(), 130.0);
    /// assert_eq!(combined.height(), 120.0);
    /// ```
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Re-expresses the bounds relative to `origin`.
    ///
    /// Draw.io stores child geometry relative to the enclosing container.
    pub fn inverse_translate(&self, offset: Point) -> Self {
        Self {
            min_x: self.min_x - offset.x,
            min_y: self.min_y - offset.y,
            max_x: self.max_x - offset.x,
            max_y: self.max_y - offset.y,
        }
    }

    /// Grows the bounds outward by the given insets.
    pub fn add_padding(&self, insets: Insets) -> Self {
        Self {
            min_x: self.min_x - insets.left(),
            min_y: self.min_y - insets.top(),
            max_x: self.max_x + insets.right(),
            max_y: self.max_y + insets.bottom(),
        }
    }

    /// Clips the bounds to lie within `other`.
    pub fn intersect(&self, other: &Self) -> Self {
        let min_x = self.min_x.max(other.min_x);
        let min_y = self.min_y.max(other.min_y);
        Self {
            min_x,
            min_y,
            max_x: self.max_x.min(other.max_x).max(min_x),
            max_y: self.max_y.min(other.max_y).max(min_y),
        }
    }

    /// Returns true if `other` lies entirely within these bounds (edges inclusive).
    ///
    /// # Examples
    ///
    /// ```
    /// # use stratus_core::geometry::Bounds;
    /// let canvas = Bounds::new(0.0, 0.0, 800.0, 600.0);
    /// assert!(canvas.contains(&Bounds::new(700.0, 500.0, 100.0, 100.0)));
    /// assert!(!canvas.contains(&Bounds::new(900.0, 100.0, 50.0, 50.0)));
    /// ```
    pub fn contains(&self, other: &Self) -> bool {
        other.min_x >= self.min_x
            && other.min_y >= self.min_y
            && other.max_x <= self.max_x
            && other.max_y <= self.max_y
    }

    /// Returns true if the interiors of the two bounds overlap.
    ///
    /// Bounds that merely share an edge do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min_x < other.max_x
            && other.min_x < self.max_x
            && self.min_y < other.max_y
            && other.min_y < self.max_y
    }
}

/// Spacing around an element, with potentially different values per side
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Insets {
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
}

impl Insets {
    /// Creates new insets with specified values for each side
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Returns the top inset value
    pub fn top(self) -> f32 {
        self.top
    }

    /// Returns the right inset value
    pub fn right(self) -> f32 {
        self.right
    }

    /// Returns the bottom inset value
    pub fn bottom(self) -> f32 {
        self.bottom
    }

    /// Returns the left inset value
    pub fn left(self) -> f32 {
        self.left
    }
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (
            -1000.0f32..1000.0,
            -1000.0f32..1000.0,
            1.0f32..500.0,
            1.0f32..500.0,
        )
            .prop_map(|(x, y, w, h)| Bounds::new(x, y, w, h))
    }

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f32..1000.0, -1000.0f32..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    /// Merged bounds should contain both original bounds.
    fn check_bounds_merge_contains_both(b1: Bounds, b2: Bounds) -> Result<(), TestCaseError> {
        let merged = b1.merge(&b2);

        prop_assert!(merged.contains(&b1));
        prop_assert!(merged.contains(&b2));
        Ok(())
    }

    /// Moving the frame of reference keeps the size and shifts the corner.
    fn check_inverse_translate_keeps_size(
        bounds: Bounds,
        origin: Point,
    ) -> Result<(), TestCaseError> {
        let relative = bounds.inverse_translate(origin);

        prop_assert!(approx_eq!(f32, relative.width(), bounds.width(), epsilon = 0.001));
        prop_assert!(approx_eq!(f32, relative.height(), bounds.height(), epsilon = 0.001));
        prop_assert!(approx_eq!(f32, relative.min_x() + origin.x(), bounds.min_x(), epsilon = 0.001));
        prop_assert!(approx_eq!(f32, relative.min_y() + origin.y(), bounds.min_y(), epsilon = 0.001));
        Ok(())
    }

    /// Intersecting with a container always yields bounds the container contains.
    fn check_intersect_is_contained(b1: Bounds, b2: Bounds) -> Result<(), TestCaseError> {
        let clipped = b1.intersect(&b2);

        prop_assert!(clipped.width() >= 0.0);
        prop_assert!(clipped.height() >= 0.0);
        prop_assert!(clipped.min_x() >= b2.min_x());
        prop_assert!(clipped.min_y() >= b2.min_y());
        Ok(())
    }

    proptest! {
        #[test]
        fn bounds_merge_contains_both(b1 in bounds_strategy(), b2 in bounds_strategy()) {
            check_bounds_merge_contains_both(b1, b2)?;
        }

        #[test]
        fn inverse_translate_keeps_size(bounds in bounds_strategy(), origin in point_strategy()) {
            check_inverse_translate_keeps_size(bounds, origin)?;
        }

        #[test]
        fn intersect_is_contained(b1 in bounds_strategy(), b2 in bounds_strategy()) {
            check_intersect_is_contained(b1, b2)?;
        }
    }
}
