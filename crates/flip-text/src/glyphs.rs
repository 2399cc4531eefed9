#![forbid(unsafe_code)]

//! Decomposition of a line into independently positioned glyph segments.
//!
//! Each grapheme cluster becomes one [`GlyphSegment`] carrying its offset
//! from the start of the line, so the flip animation can transform every
//! character on its own while keeping the line's static layout.
//!
//! Offsets are plain advance sums: no shaping or kerning is applied, so a
//! segmented line is positioned exactly like the measured line.

use flip_style::Font;
use smallvec::SmallVec;
use unicode_segmentation::UnicodeSegmentation;

use crate::metrics::{MetricsError, TextMetrics};

/// One grapheme cluster of a line with its horizontal position.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphSegment {
    /// The grapheme cluster.
    pub grapheme: String,
    /// Position in the line (0-based, in graphemes).
    pub index: usize,
    /// Cumulative advance of all preceding graphemes.
    pub x_offset: f32,
    /// Advance of this grapheme.
    pub advance: f32,
}

impl GlyphSegment {
    /// Right edge relative to the line start.
    #[inline]
    pub fn x_end(&self) -> f32 {
        self.x_offset + self.advance
    }
}

/// Segments of one line. Labels are short, so most runs stay inline.
pub type GlyphRun = SmallVec<[GlyphSegment; 16]>;

/// Split `text` into ordered glyph segments under `font`.
///
/// The empty string yields an empty run.
pub fn split_glyphs(
    metrics: &TextMetrics,
    text: &str,
    font: &Font,
) -> Result<GlyphRun, MetricsError> {
    let mut run = GlyphRun::new();
    let mut x_offset = 0.0_f32;

    for (index, grapheme) in text.graphemes(true).enumerate() {
        let advance = metrics.advance(grapheme, font)?;
        run.push(GlyphSegment {
            grapheme: grapheme.to_owned(),
            index,
            x_offset,
            advance,
        });
        x_offset += advance;
    }

    // Font validity is checked per advance; an empty line still needs one check.
    if run.is_empty() {
        metrics.advance("", font)?;
    }

    Ok(run)
}
