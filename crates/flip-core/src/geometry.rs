#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All values are in points (`f32`), origin at the top-left, with `y`
//! growing downward. Rectangles may carry negative origins: a line of text
//! that overflows its bounds is positioned outside them rather than clamped.

/// A point in view coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Translate by an offset.
    #[inline]
    #[must_use]
    pub fn offset_by(self, offset: Offset) -> Self {
        Self::new(self.x + offset.dx, self.y + offset.dy)
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Zero size.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Create a new size.
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether both dimensions fit inside `other`.
    #[inline]
    pub fn fits_within(&self, other: Size) -> bool {
        self.width <= other.width && self.height <= other.height
    }
}

/// A translation, e.g. a text shadow offset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub dx: f32,
    pub dy: f32,
}

impl Offset {
    /// No translation.
    pub const ZERO: Self = Self { dx: 0.0, dy: 0.0 };

    /// Create a new offset.
    #[inline]
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }
}

impl From<(f32, f32)> for Offset {
    fn from((dx, dy): (f32, f32)) -> Self {
        Self::new(dx, dy)
    }
}

/// A rectangle for view bounds and text draw rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width in points.
    pub width: f32,
    /// Height in points.
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle at the origin with the given size.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    /// Left edge. Alias for `self.x`.
    #[inline]
    pub const fn left(&self) -> f32 {
        self.x
    }

    /// Top edge. Alias for `self.y`.
    #[inline]
    pub const fn top(&self) -> f32 {
        self.y
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Top-left corner.
    #[inline]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Width and height.
    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Vertical midline, the axis glyphs flip around.
    #[inline]
    pub fn mid_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Check if the rectangle has zero (or negative) area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if a point is inside the rectangle (right/bottom exclusive).
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Translate the rectangle by an offset.
    #[inline]
    #[must_use]
    pub fn translate(&self, offset: Offset) -> Rect {
        Rect::new(
            self.x + offset.dx,
            self.y + offset.dy,
            self.width,
            self.height,
        )
    }
}
