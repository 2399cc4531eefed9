#![forbid(unsafe_code)]

//! Single-line text measurement for the flip label.
//!
//! - [`TextMetrics`] - measures a line under a [`Font`] and auto-fits font sizes
//! - [`FontMetrics`] - the glyph advance / line height source behind it
//! - [`split_glyphs`] - decomposes a line into positioned [`GlyphSegment`]s
//! - [`AdvanceCache`] - LRU cache for measured line widths
//!
//! # Example
//! ```
//! use flip_style::Font;
//! use flip_text::{ProportionalMetrics, TextMetrics, split_glyphs};
//!
//! let metrics = TextMetrics::new(ProportionalMetrics::default());
//! let font = Font::system(20.0);
//!
//! let line = metrics.measure("AB", &font).unwrap();
//! assert_eq!(line.width, 20.0);
//!
//! let glyphs = split_glyphs(&metrics, "AB", &font).unwrap();
//! assert_eq!(glyphs[1].x_offset, metrics.measure("A", &font).unwrap().width);
//! ```
//!
//! [`Font`]: flip_style::Font

pub mod advance_cache;
pub mod glyphs;
pub mod metrics;

use flip_core::geometry::Size;

/// The measured box of one line of text.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeasuredLine {
    /// Sum of glyph advances.
    pub width: f32,
    /// Line height.
    pub height: f32,
    /// Distance from the top of the line box to the baseline.
    pub baseline: f32,
}

impl MeasuredLine {
    /// The measurement of an empty string.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
        baseline: 0.0,
    };

    /// Width and height as a [`Size`].
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

pub use advance_cache::{AdvanceCache, CacheStats, DEFAULT_CACHE_CAPACITY};
pub use glyphs::{GlyphRun, GlyphSegment, split_glyphs};
pub use metrics::{FitOptions, FontMetrics, MetricsError, ProportionalMetrics, TextMetrics};
