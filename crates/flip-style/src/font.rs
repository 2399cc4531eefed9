//! Font descriptors.

use std::fmt;

/// Family name used for the platform default font.
pub const SYSTEM_FONT_FAMILY: &str = "system";

/// Default point size for a new label.
pub const DEFAULT_FONT_SIZE: f32 = 17.0;

/// A font family at a point size.
///
/// The descriptor carries no glyph data; measurement is delegated to a
/// `FontMetrics` implementation in `flip-text`.
#[derive(Clone, PartialEq)]
pub struct Font {
    family: String,
    size: f32,
}

impl Font {
    /// Create a font descriptor.
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }

    /// The platform default font at `size` points.
    pub fn system(size: f32) -> Self {
        Self::new(SYSTEM_FONT_FAMILY, size)
    }

    /// Family name.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Point size.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// The same family at another size.
    #[must_use]
    pub fn with_size(&self, size: f32) -> Self {
        Self {
            family: self.family.clone(),
            size,
        }
    }

    /// A font is usable for measurement when it names a family and has a
    /// finite, positive size.
    pub fn is_valid(&self) -> bool {
        !self.family.trim().is_empty() && self.size.is_finite() && self.size > 0.0
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::system(DEFAULT_FONT_SIZE)
    }
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Font({} {}pt)", self.family, self.size)
    }
}
