//! Packed RGBA colors.

use std::fmt;

/// A straight-alpha RGBA color packed as `0xRRGGBBAA`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Color(pub u32);

impl Color {
    /// Fully transparent (alpha = 0).
    pub const TRANSPARENT: Self = Self(0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque mid gray.
    pub const GRAY: Self = Self::rgb(128, 128, 128);

    /// Create an opaque RGB color (alpha = 255).
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Create an RGBA color with explicit alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (a as u32))
    }

    /// Red channel.
    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Green channel.
    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Blue channel.
    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Alpha channel.
    #[inline]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    /// Scale the alpha channel by `opacity` (clamped to [0, 1]).
    ///
    /// Animated layers multiply their opacity into the text and shadow color
    /// this way, so a half-transparent shadow stays half as visible as its
    /// glyph at every frame.
    #[inline]
    #[must_use]
    pub fn with_opacity(self, opacity: f32) -> Self {
        let opacity = if opacity.is_nan() {
            0.0
        } else {
            opacity.clamp(0.0, 1.0)
        };
        let a = (f32::from(self.a()) * opacity).round() as u8;
        Self::rgba(self.r(), self.g(), self.b(), a)
    }

    /// Whether the color draws nothing.
    #[inline]
    pub const fn is_transparent(self) -> bool {
        self.a() == 0
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color(#{:08x})", self.0)
    }
}
