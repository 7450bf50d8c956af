//! Rectangle primitives for packing and atlas placement.

/// An axis-aligned rectangle in fixed-point packing space.
///
/// Coordinates are `i64`; areas are computed in `i128` so that products of
/// two large sides stay exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left edge.
    pub x: i64,
    /// Top edge.
    pub y: i64,
    /// Width.
    pub width: i64,
    /// Height.
    pub height: i64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    #[inline]
    pub fn right(&self) -> i64 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    #[inline]
    pub fn bottom(&self) -> i64 {
        self.y + self.height
    }

    /// Area of the rectangle.
    #[inline]
    pub fn area(&self) -> i128 {
        i128::from(self.width) * i128::from(self.height)
    }

    /// Check whether the two rectangles share interior area.
    ///
    /// Rectangles that only touch along an edge do not intersect.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Check whether this rectangle lies entirely inside `other`.
    #[inline]
    pub fn is_contained_in(&self, other: &Rect) -> bool {
        self.x >= other.x
            && self.y >= other.y
            && self.right() <= other.right()
            && self.bottom() <= other.bottom()
    }
}

/// A chart's placement in the atlas, in normalized `[0, 1]` coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UvRect {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl UvRect {
    /// Exclusive right edge.
    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Exclusive bottom edge.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Area of the rectangle.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// True for the zero-size placeholder given to charts that were not placed.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check whether the two rectangles overlap by more than `epsilon`.
    pub fn overlaps(&self, other: &UvRect, epsilon: f64) -> bool {
        self.left < other.right() - epsilon
            && other.left < self.right() - epsilon
            && self.top < other.bottom() - epsilon
            && other.top < self.bottom() - epsilon
    }
}
