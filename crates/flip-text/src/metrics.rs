#![forbid(unsafe_code)]

//! Line measurement and auto-fit font sizing.
//!
//! [`TextMetrics`] turns a string and a [`Font`] into a [`MeasuredLine`].
//! Glyph advances come from a [`FontMetrics`] implementation; the bundled
//! [`ProportionalMetrics`] derives them from Unicode display width so the
//! crate works without a font rasterizer.
//!
//! # Invariants
//!
//! 1. Measurement is a pure function of `(text, font, metrics)`.
//! 2. Width, height and baseline are finite and `>= 0`.
//! 3. Line width equals the sum of the grapheme advances, in order.
//! 4. The empty string measures as [`MeasuredLine::ZERO`].
//! 5. [`TextMetrics::fit_font_size`] is monotone in the available area:
//!    shrinking it never yields a larger size.

use std::cell::RefCell;
use std::fmt;

use flip_style::Font;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::MeasuredLine;
use crate::advance_cache::{AdvanceCache, CacheStats, DEFAULT_CACHE_CAPACITY};

/// Measurement failures.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricsError {
    /// The font has no family or a non-finite / non-positive size.
    InvalidFont { family: String, size: f32 },
}

impl fmt::Display for MetricsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFont { family, size } => {
                write!(f, "invalid font: family={family:?} size={size}")
            }
        }
    }
}

impl std::error::Error for MetricsError {}

/// Source of per-glyph advances and vertical line metrics.
///
/// Implementations must be deterministic and return finite, non-negative
/// values for valid fonts.
pub trait FontMetrics {
    /// Horizontal advance of one grapheme cluster.
    fn advance(&self, grapheme: &str, font: &Font) -> f32;

    /// Height of a single line box.
    fn line_height(&self, font: &Font) -> f32;

    /// Distance from the top of the line box to the baseline.
    fn baseline(&self, font: &Font) -> f32;
}

/// Metrics proportional to the font size.
///
/// A grapheme advances by its Unicode display width (0, 1 or 2 columns)
/// times `advance_em` ems. Line height and baseline are fixed em ratios.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProportionalMetrics {
    advance_em: f32,
    line_height_em: f32,
    baseline_em: f32,
}

impl ProportionalMetrics {
    /// Default metrics: half-em columns, 1.25em lines, baseline at 1em.
    pub const fn new() -> Self {
        Self {
            advance_em: 0.5,
            line_height_em: 1.25,
            baseline_em: 1.0,
        }
    }

    /// Set the advance of a single-width column, in ems.
    #[must_use]
    pub fn advance_em(mut self, em: f32) -> Self {
        self.advance_em = em.max(0.0);
        self
    }

    /// Set the line height, in ems.
    #[must_use]
    pub fn line_height_em(mut self, em: f32) -> Self {
        self.line_height_em = em.max(0.0);
        self
    }

    /// Set the baseline offset from the line top, in ems.
    #[must_use]
    pub fn baseline_em(mut self, em: f32) -> Self {
        self.baseline_em = em.max(0.0);
        self
    }
}

impl Default for ProportionalMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl FontMetrics for ProportionalMetrics {
    fn advance(&self, grapheme: &str, font: &Font) -> f32 {
        // ZWJ sequences report the sum of their parts; a cluster never
        // occupies more than two columns.
        let columns = grapheme.width().min(2) as f32;
        columns * self.advance_em * font.size()
    }

    fn line_height(&self, font: &Font) -> f32 {
        self.line_height_em * font.size()
    }

    fn baseline(&self, font: &Font) -> f32 {
        self.baseline_em * font.size()
    }
}

/// Bracket and precision of the auto-fit search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    /// Floor of the search; returned when nothing fits.
    pub min_size: f32,
    /// Ceiling of the search.
    pub max_size: f32,
    /// Number of bisection steps.
    pub iterations: u32,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            min_size: 1.0,
            max_size: 1024.0,
            iterations: 24,
        }
    }
}

/// Measures single lines of text and picks auto-fit font sizes.
///
/// Line widths are memoized in an [`AdvanceCache`]. The cache sits behind a
/// `RefCell` so measurement can stay `&self`; the type is intentionally not
/// `Sync`.
pub struct TextMetrics {
    metrics: Box<dyn FontMetrics>,
    fit: FitOptions,
    cache: RefCell<AdvanceCache>,
}

impl fmt::Debug for TextMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextMetrics")
            .field("fit", &self.fit)
            .field("cache", &self.cache_stats())
            .finish()
    }
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self::new(ProportionalMetrics::default())
    }
}

impl TextMetrics {
    /// Wrap a [`FontMetrics`] source.
    pub fn new(metrics: impl FontMetrics + 'static) -> Self {
        Self {
            metrics: Box::new(metrics),
            fit: FitOptions::default(),
            cache: RefCell::new(AdvanceCache::new(DEFAULT_CACHE_CAPACITY)),
        }
    }

    /// Replace the auto-fit search options (builder).
    #[must_use]
    pub fn with_fit_options(mut self, fit: FitOptions) -> Self {
        let min_size = if fit.min_size.is_finite() && fit.min_size > 0.0 {
            fit.min_size
        } else {
            FitOptions::default().min_size
        };
        self.fit = FitOptions {
            min_size,
            max_size: fit.max_size.max(min_size),
            iterations: fit.iterations,
        };
        self
    }

    /// Current auto-fit options.
    pub fn fit_options(&self) -> FitOptions {
        self.fit
    }

    /// Advance of a single grapheme cluster.
    pub fn advance(&self, grapheme: &str, font: &Font) -> Result<f32, MetricsError> {
        check_font(font)?;
        Ok(sanitize(self.metrics.advance(grapheme, font)))
    }

    /// Measure one line of `text` under `font`.
    pub fn measure(&self, text: &str, font: &Font) -> Result<MeasuredLine, MetricsError> {
        check_font(font)?;
        if text.is_empty() {
            return Ok(MeasuredLine::ZERO);
        }

        let width = self
            .cache
            .borrow_mut()
            .get_or_compute_with(text, font, |text| self.sum_advances(text, font));

        Ok(MeasuredLine {
            width,
            height: sanitize(self.metrics.line_height(font)),
            baseline: sanitize(self.metrics.baseline(font)),
        })
    }

    /// Largest size in the configured bracket at which `text` fits inside
    /// `available_width` x `available_height`.
    ///
    /// Only the size of `base_font` is searched; the family is kept. Empty
    /// text keeps the base size. When nothing fits, the floor is returned.
    pub fn fit_font_size(
        &self,
        text: &str,
        base_font: &Font,
        available_width: f32,
        available_height: f32,
    ) -> Result<f32, MetricsError> {
        check_font(base_font)?;
        if text.is_empty() {
            return Ok(base_font.size());
        }

        let fits = |size: f32| -> Result<bool, MetricsError> {
            let line = self.measure(text, &base_font.with_size(size))?;
            Ok(line.width <= available_width && line.height <= available_height)
        };

        let FitOptions {
            min_size,
            max_size,
            iterations,
        } = self.fit;

        let size = if !fits(min_size)? {
            min_size
        } else if fits(max_size)? {
            max_size
        } else {
            // Invariant: `lo` fits, `hi` does not.
            let (mut lo, mut hi) = (min_size, max_size);
            for _ in 0..iterations {
                let mid = lo + (hi - lo) / 2.0;
                if fits(mid)? {
                    lo = mid;
                } else {
                    hi = mid;
                }
            }
            lo
        };

        tracing::trace!(
            text_len = text.len(),
            available_width,
            available_height,
            size,
            "auto-fit font size"
        );
        Ok(size)
    }

    /// Width cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.borrow().stats()
    }

    /// Drop all memoized widths.
    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
    }

    fn sum_advances(&self, text: &str, font: &Font) -> f32 {
        text.graphemes(true)
            .map(|g| sanitize(self.metrics.advance(g, font)))
            .sum()
    }
}

fn check_font(font: &Font) -> Result<(), MetricsError> {
    if font.is_valid() {
        Ok(())
    } else {
        Err(MetricsError::InvalidFont {
            family: font.family().to_owned(),
            size: font.size(),
        })
    }
}

/// Clamp metric output to a finite, non-negative value.
#[inline]
fn sanitize(value: f32) -> f32 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}
