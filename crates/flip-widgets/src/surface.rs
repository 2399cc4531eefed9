#![forbid(unsafe_code)]

//! Drawing seam between the label and a rendering backend.
//!
//! The label never rasterizes. Each visible run of text (a whole line or a
//! single flipping glyph, plus its shadow) becomes one [`TextDraw`] handed to
//! a [`Surface`]. Backends apply the transform: scale the glyph vertically by
//! `scale_y` around `pivot_y`, which is how a flat 2D surface shows a glyph
//! rotated about the horizontal midline.

use flip_core::geometry::Point;
use flip_style::{Color, Font};

/// Which pass a draw belongs to. Shadows are always emitted first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawLayer {
    Shadow,
    Text,
}

/// Rotation of a glyph about a horizontal axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlipTransform {
    /// Rotation in radians; `0` is flat.
    pub rotation: f32,
    /// Projected vertical scale, `cos(rotation)`.
    pub scale_y: f32,
    /// Y coordinate of the rotation axis.
    pub pivot_y: f32,
}

impl FlipTransform {
    /// No rotation about `pivot_y`.
    pub const fn flat(pivot_y: f32) -> Self {
        Self {
            rotation: 0.0,
            scale_y: 1.0,
            pivot_y,
        }
    }

    /// Whether the transform leaves the glyph untouched.
    pub fn is_flat(&self) -> bool {
        self.rotation == 0.0 && self.scale_y == 1.0
    }
}

/// One text draw command.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDraw {
    pub layer: DrawLayer,
    pub text: String,
    /// Pen origin: left edge on the baseline.
    pub origin: Point,
    pub font: Font,
    /// Final color, with layer opacity already multiplied into alpha.
    pub color: Color,
    pub transform: FlipTransform,
}

/// A target that can draw transformed text with opacity.
pub trait Surface {
    /// Draw one run of text.
    fn draw_text(&mut self, draw: TextDraw);
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn draw_text(&mut self, draw: TextDraw) {
        (**self).draw_text(draw);
    }
}

/// Surface that records draw commands, for headless hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    draws: Vec<TextDraw>,
}

impl RecordingSurface {
    /// Create an empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded commands in draw order.
    pub fn draws(&self) -> &[TextDraw] {
        &self.draws
    }

    /// Commands of one layer, in draw order.
    pub fn layer(&self, layer: DrawLayer) -> impl Iterator<Item = &TextDraw> {
        self.draws.iter().filter(move |draw| draw.layer == layer)
    }

    /// Text of every command in `layer`, in draw order.
    pub fn texts(&self, layer: DrawLayer) -> Vec<&str> {
        self.layer(layer).map(|draw| draw.text.as_str()).collect()
    }

    /// Take the recorded commands, leaving the recording empty.
    pub fn take(&mut self) -> Vec<TextDraw> {
        std::mem::take(&mut self.draws)
    }

    /// Drop all recorded commands.
    pub fn clear(&mut self) {
        self.draws.clear();
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }
}

impl Surface for RecordingSurface {
    fn draw_text(&mut self, draw: TextDraw) {
        self.draws.push(draw);
    }
}
