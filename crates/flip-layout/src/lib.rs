#![forbid(unsafe_code)]

//! Alignment of a measured line inside view bounds.
//!
//! [`resolve`] places a [`MeasuredLine`] inside a bounds rectangle according
//! to a horizontal and a vertical alignment. The result always has exactly
//! the measured size: a line that is larger than its bounds overflows
//! symmetrically (center) or away from its anchor edge, and is never clipped.
//!
//! # Example
//! ```
//! use flip_core::geometry::Rect;
//! use flip_layout::{HorizontalAlignment, VerticalAlignment, resolve};
//! use flip_text::MeasuredLine;
//!
//! let line = MeasuredLine { width: 40.0, height: 20.0, baseline: 16.0 };
//! let bounds = Rect::new(0.0, 0.0, 200.0, 50.0);
//!
//! let rect = resolve(bounds, &line, HorizontalAlignment::Trailing, VerticalAlignment::Center);
//! assert_eq!(rect, Rect::new(160.0, 15.0, 40.0, 20.0));
//! ```

use flip_core::geometry::{Point, Rect};
use flip_text::MeasuredLine;

/// Horizontal placement of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HorizontalAlignment {
    /// Flush with the left edge (default).
    #[default]
    Leading,
    /// Centered between the edges.
    Center,
    /// Flush with the right edge.
    Trailing,
}

/// Vertical placement of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VerticalAlignment {
    /// Flush with the top edge.
    Top,
    /// Centered between the edges (default).
    #[default]
    Center,
    /// Flush with the bottom edge.
    Bottom,
}

/// Resolve the draw rectangle of `line` inside `bounds`.
#[must_use]
pub fn resolve(
    bounds: Rect,
    line: &MeasuredLine,
    horizontal: HorizontalAlignment,
    vertical: VerticalAlignment,
) -> Rect {
    let x = match horizontal {
        HorizontalAlignment::Leading => bounds.left(),
        HorizontalAlignment::Center => bounds.left() + (bounds.width - line.width) / 2.0,
        HorizontalAlignment::Trailing => bounds.right() - line.width,
    };
    let y = match vertical {
        VerticalAlignment::Top => bounds.top(),
        VerticalAlignment::Center => bounds.top() + (bounds.height - line.height) / 2.0,
        VerticalAlignment::Bottom => bounds.bottom() - line.height,
    };
    Rect::new(x, y, line.width, line.height)
}

/// Pen origin for drawing `line` in `rect`: the left edge on the baseline.
#[inline]
#[must_use]
pub fn baseline_origin(rect: Rect, line: &MeasuredLine) -> Point {
    Point::new(rect.x, rect.y + line.baseline)
}
