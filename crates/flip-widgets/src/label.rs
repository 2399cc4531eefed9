#![forbid(unsafe_code)]

//! Single-line label that flips between strings.
//!
//! [`FlipLabel`] owns the style state, measures and aligns its text, and
//! hosts a [`FlipSequencer`] for animated text changes. The host drives it:
//!
//! 1. property writes mark the layout stale;
//! 2. [`FlipLabel::layout`] recomputes at most once per batch of writes;
//! 3. [`FlipLabel::tick`] advances an animation once per display frame;
//! 4. [`FlipLabel::render`] emits draw commands to a [`Surface`].
//!
//! # Invariants
//!
//! 1. Font and text color are always set; rejected writes keep the prior
//!    value.
//! 2. The draw rectangle always has the measured line size (no clipping).
//! 3. Shadows, when enabled, are drawn before and identically to every text
//!    layer: static text, fading text, and flipping glyphs.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use flip_core::geometry::Rect;
//! use flip_widgets::label::FlipLabel;
//! use flip_widgets::surface::{DrawLayer, RecordingSurface};
//!
//! let mut label = FlipLabel::new();
//! label.set_text_with_flip_animation(Duration::from_secs(1), "42", None::<fn(bool)>);
//!
//! let bounds = Rect::new(0.0, 0.0, 120.0, 40.0);
//! let mut surface = RecordingSurface::new();
//! while label.is_animating() {
//!     label.tick(Duration::from_millis(16));
//!     label.render(bounds, &mut surface);
//! }
//! surface.clear();
//! label.render(bounds, &mut surface);
//! assert_eq!(surface.texts(DrawLayer::Text), vec!["42"]);
//! ```

use std::time::Duration;

use bitflags::bitflags;
use flip_core::geometry::{Offset, Point, Rect};
use flip_layout::{HorizontalAlignment, VerticalAlignment, baseline_origin, resolve};
use flip_style::{Color, Font};
use flip_text::{GlyphRun, MeasuredLine, TextMetrics, split_glyphs};

use crate::config::FlipConfig;
use crate::error::LabelError;
use crate::sequencer::{
    CompletionHandler, FadingLine, FlipPhase, FlipRequest, FlipSequencer, FlipTiming, GlyphVisual,
    TickOutcome,
};
use crate::surface::{DrawLayer, FlipTransform, Surface, TextDraw};

bitflags! {
    /// Which parts of the style changed since the last layout pass.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Invalidation: u8 {
        const TEXT = 1 << 0;
        const FONT = 1 << 1;
        const ALIGNMENT = 1 << 2;
        const COLOR = 1 << 3;
        const SHADOW = 1 << 4;
        const AUTO_FIT = 1 << 5;
    }
}

/// Style state of a label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelStyle {
    pub text: String,
    pub font: Font,
    pub text_color: Color,
    pub horizontal_alignment: HorizontalAlignment,
    pub vertical_alignment: VerticalAlignment,
    /// Shrink or grow the font to fit the bounds.
    pub dynamic_font_size: bool,
    /// Shadow color; `None` disables the shadow.
    pub shadow_color: Option<Color>,
    pub shadow_offset: Offset,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            text: String::new(),
            font: Font::default(),
            text_color: Color::BLACK,
            horizontal_alignment: HorizontalAlignment::default(),
            vertical_alignment: VerticalAlignment::default(),
            dynamic_font_size: false,
            shadow_color: None,
            shadow_offset: Offset::new(0.0, -1.0),
        }
    }
}

/// Result of a layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelLayout {
    /// Draw rectangle of the line.
    pub rect: Rect,
    /// Font in effect (after auto-fit).
    pub font: Font,
    /// Measured line under `font`.
    pub line: MeasuredLine,
}

impl LabelLayout {
    /// Pen origin of the line.
    pub fn origin(&self) -> Point {
        baseline_origin(self.rect, &self.line)
    }
}

/// A flip-animated single-line text label.
#[derive(Debug)]
pub struct FlipLabel {
    style: LabelStyle,
    interaction_enabled: bool,
    metrics: TextMetrics,
    sequencer: FlipSequencer,
    dirty: Invalidation,
    cached: Option<(Rect, LabelLayout)>,
    layout_passes: u64,
    needs_redraw: bool,
}

impl Default for FlipLabel {
    fn default() -> Self {
        Self::new()
    }
}

impl FlipLabel {
    /// Create an empty label with default style and metrics.
    pub fn new() -> Self {
        Self {
            style: LabelStyle::default(),
            interaction_enabled: false,
            metrics: TextMetrics::default(),
            sequencer: FlipSequencer::default(),
            dirty: Invalidation::all(),
            cached: None,
            layout_passes: 0,
            needs_redraw: true,
        }
    }

    /// Use another measurement source (builder).
    #[must_use]
    pub fn with_metrics(mut self, metrics: TextMetrics) -> Self {
        self.metrics = metrics;
        self.invalidate(Invalidation::FONT);
        self
    }

    /// Use other animation ratios (builder).
    #[must_use]
    pub fn with_config(mut self, config: FlipConfig) -> Self {
        self.sequencer.set_config(config);
        self
    }

    /// Animation ratios for future runs.
    pub fn config(&self) -> &FlipConfig {
        self.sequencer.config()
    }

    /// Replace the animation ratios for future runs.
    pub fn set_config(&mut self, config: FlipConfig) {
        self.sequencer.set_config(config);
    }

    /// Full style state.
    pub fn style(&self) -> &LabelStyle {
        &self.style
    }

    /// Measurement source.
    pub fn metrics(&self) -> &TextMetrics {
        &self.metrics
    }

    // --- properties --------------------------------------------------------

    pub fn text(&self) -> &str {
        &self.style.text
    }

    /// Replace the text without animation.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.style.text {
            self.style.text = text;
            self.invalidate(Invalidation::TEXT);
        }
    }

    pub fn font(&self) -> &Font {
        &self.style.font
    }

    /// Set the font. `None` or an unusable font is rejected.
    pub fn set_font(&mut self, font: impl Into<Option<Font>>) -> Result<(), LabelError> {
        let font = font
            .into()
            .ok_or_else(|| LabelError::invalid("font", "font cannot be unset"))?;
        if !font.is_valid() {
            return Err(LabelError::invalid(
                "font",
                format!("{font:?} needs a family and a positive size"),
            ));
        }
        if font != self.style.font {
            self.style.font = font;
            self.invalidate(Invalidation::FONT);
        }
        Ok(())
    }

    pub fn text_color(&self) -> Color {
        self.style.text_color
    }

    /// Set the text color. `None` is rejected.
    pub fn set_text_color(&mut self, color: impl Into<Option<Color>>) -> Result<(), LabelError> {
        let color = color
            .into()
            .ok_or_else(|| LabelError::invalid("text_color", "text color cannot be unset"))?;
        if color != self.style.text_color {
            self.style.text_color = color;
            self.invalidate(Invalidation::COLOR);
        }
        Ok(())
    }

    pub fn horizontal_alignment(&self) -> HorizontalAlignment {
        self.style.horizontal_alignment
    }

    pub fn set_horizontal_alignment(&mut self, alignment: HorizontalAlignment) {
        if alignment != self.style.horizontal_alignment {
            self.style.horizontal_alignment = alignment;
            self.invalidate(Invalidation::ALIGNMENT);
        }
    }

    pub fn vertical_alignment(&self) -> VerticalAlignment {
        self.style.vertical_alignment
    }

    pub fn set_vertical_alignment(&mut self, alignment: VerticalAlignment) {
        if alignment != self.style.vertical_alignment {
            self.style.vertical_alignment = alignment;
            self.invalidate(Invalidation::ALIGNMENT);
        }
    }

    pub fn dynamic_font_size(&self) -> bool {
        self.style.dynamic_font_size
    }

    pub fn set_dynamic_font_size(&mut self, enabled: bool) {
        if enabled != self.style.dynamic_font_size {
            self.style.dynamic_font_size = enabled;
            self.invalidate(Invalidation::AUTO_FIT);
        }
    }

    pub fn shadow_color(&self) -> Option<Color> {
        self.style.shadow_color
    }

    pub fn set_shadow_color(&mut self, color: impl Into<Option<Color>>) {
        let color = color.into();
        if color != self.style.shadow_color {
            self.style.shadow_color = color;
            self.invalidate(Invalidation::SHADOW);
        }
    }

    pub fn shadow_offset(&self) -> Offset {
        self.style.shadow_offset
    }

    pub fn set_shadow_offset(&mut self, offset: impl Into<Offset>) {
        let offset = offset.into();
        if offset != self.style.shadow_offset {
            self.style.shadow_offset = offset;
            self.invalidate(Invalidation::SHADOW);
        }
    }

    /// Passive flag; the label handles no input itself.
    pub fn interaction_enabled(&self) -> bool {
        self.interaction_enabled
    }

    pub fn set_interaction_enabled(&mut self, enabled: bool) {
        self.interaction_enabled = enabled;
    }

    // --- layout ------------------------------------------------------------

    /// Draw rectangle of the current text inside `bounds`. Does not touch
    /// the layout cache.
    pub fn text_rect_for_bounds(&self, bounds: Rect) -> Rect {
        self.compute_layout(bounds, &self.style.text).rect
    }

    /// Lay out the current text inside `bounds`.
    ///
    /// Recomputes only when a property changed or `bounds` differ from the
    /// previous pass; any number of writes in between cost one pass.
    pub fn layout(&mut self, bounds: Rect) -> &LabelLayout {
        let stale = !self.dirty.is_empty();
        let layout = match self.cached.take() {
            Some((cached_bounds, layout)) if !stale && cached_bounds == bounds => layout,
            _ => {
                #[cfg(feature = "tracing")]
                let _span = tracing::debug_span!(
                    "label_layout",
                    x = bounds.x,
                    y = bounds.y,
                    w = bounds.width,
                    h = bounds.height,
                    dirty = self.dirty.bits()
                )
                .entered();

                let layout = self.compute_layout(bounds, &self.style.text);
                self.dirty = Invalidation::empty();
                self.layout_passes += 1;
                layout
            }
        };
        &self.cached.insert((bounds, layout)).1
    }

    /// Number of real layout recomputations so far.
    pub fn layout_passes(&self) -> u64 {
        self.layout_passes
    }

    /// Pending invalidation flags.
    pub fn invalidation(&self) -> Invalidation {
        self.dirty
    }

    fn compute_layout(&self, bounds: Rect, text: &str) -> LabelLayout {
        let font = self.effective_font(bounds, text);
        // Fonts are validated on write, so measurement cannot fail here.
        let line = self.metrics.measure(text, &font).unwrap_or_default();
        let rect = resolve(
            bounds,
            &line,
            self.style.horizontal_alignment,
            self.style.vertical_alignment,
        );
        LabelLayout { rect, font, line }
    }

    fn effective_font(&self, bounds: Rect, text: &str) -> Font {
        let font = &self.style.font;
        if !self.style.dynamic_font_size {
            return font.clone();
        }
        let size = self
            .metrics
            .fit_font_size(text, font, bounds.width, bounds.height)
            .unwrap_or(font.size());
        font.with_size(size)
    }

    fn invalidate(&mut self, flags: Invalidation) {
        self.dirty |= flags;
        self.needs_redraw = true;
    }

    // --- animation ---------------------------------------------------------

    /// Replace the text with a flip transition.
    ///
    /// The previously displayed text fades out and `text` flips in glyph by
    /// glyph over `duration` (at least 0.75s). A run already in flight is
    /// interrupted: its handler receives `false` before this returns.
    /// `completion` receives `true` when this run finishes.
    ///
    /// Handlers run while the label is mutably borrowed, from this call or
    /// from [`FlipLabel::tick`]. To chain another transition, record the
    /// outcome in the handler and start the next run after `tick` returns.
    pub fn set_text_with_flip_animation<F>(
        &mut self,
        duration: Duration,
        text: impl Into<String>,
        completion: Option<F>,
    ) -> &FlipTiming
    where
        F: FnOnce(bool) + 'static,
    {
        let new_text = text.into();
        let old_text = std::mem::replace(&mut self.style.text, new_text.clone());
        self.invalidate(Invalidation::TEXT);

        let segments = self.split_for_animation(&new_text);
        let completion = completion.map(|f| Box::new(f) as CompletionHandler);
        self.sequencer.start(
            FlipRequest::new(old_text, new_text, duration),
            segments,
            completion,
        )
    }

    /// Advance the animation by one frame.
    pub fn tick(&mut self, dt: Duration) -> TickOutcome {
        let outcome = self.sequencer.tick(dt);
        if outcome != TickOutcome::Idle {
            self.needs_redraw = true;
        }
        outcome
    }

    pub fn is_animating(&self) -> bool {
        self.sequencer.is_animating()
    }

    /// Phase of the current (or last) animation.
    pub fn phase(&self) -> FlipPhase {
        self.sequencer.phase()
    }

    pub fn sequencer(&self) -> &FlipSequencer {
        &self.sequencer
    }

    /// Whether the label changed since the last render.
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Read and clear the redraw request.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    fn split_for_animation(&self, text: &str) -> GlyphRun {
        // Fixes the glyph set; positions are recomputed when drawing.
        // Auto-fit depends on the bounds; reuse the last known ones.
        let font = match &self.cached {
            Some((bounds, _)) => self.effective_font(*bounds, text),
            None => self.style.font.clone(),
        };
        split_glyphs(&self.metrics, text, &font).unwrap_or_default()
    }

    // --- drawing -----------------------------------------------------------

    /// Draw the label into `bounds`.
    pub fn render<S: Surface + ?Sized>(&mut self, bounds: Rect, surface: &mut S) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "label_render",
            x = bounds.x,
            y = bounds.y,
            w = bounds.width,
            h = bounds.height,
            animating = self.sequencer.is_animating()
        )
        .entered();

        let layout = self.layout(bounds).clone();
        self.needs_redraw = false;

        let Some(frame) = self.sequencer.frame() else {
            if !self.style.text.is_empty() {
                let transform = FlipTransform::flat(layout.rect.mid_y());
                self.draw_run(
                    surface,
                    &self.style.text,
                    layout.origin(),
                    &layout.font,
                    1.0,
                    transform,
                );
            }
            return;
        };

        for line in &frame.outgoing {
            let line_layout = self.layout_for(bounds, &line.text, &layout);
            self.draw_fading_line(surface, line, &line_layout);
        }

        let incoming = self.layout_for(bounds, &frame.text, &layout);
        let offsets = self.glyph_offsets(&frame.text, &incoming.font);
        for visual in &frame.glyphs {
            self.draw_glyph(surface, visual, &offsets, &incoming, 1.0);
        }
    }

    /// Glyph offsets of `text` under the font it is drawn with.
    ///
    /// Segments are split when a run starts, but auto-fit, resizes and font
    /// writes can change the drawn font mid-run.
    fn glyph_offsets(&self, text: &str, font: &Font) -> Vec<f32> {
        split_glyphs(&self.metrics, text, font)
            .map(|run| run.iter().map(|segment| segment.x_offset).collect())
            .unwrap_or_default()
    }

    fn layout_for(&self, bounds: Rect, text: &str, current: &LabelLayout) -> LabelLayout {
        if text == self.style.text {
            current.clone()
        } else {
            self.compute_layout(bounds, text)
        }
    }

    fn draw_fading_line<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        line: &FadingLine,
        layout: &LabelLayout,
    ) {
        match &line.glyphs {
            None => {
                let transform = FlipTransform::flat(layout.rect.mid_y());
                self.draw_run(
                    surface,
                    &line.text,
                    layout.origin(),
                    &layout.font,
                    line.opacity,
                    transform,
                );
            }
            Some(glyphs) => {
                let offsets = self.glyph_offsets(&line.text, &layout.font);
                for visual in glyphs {
                    self.draw_glyph(surface, visual, &offsets, layout, line.opacity);
                }
            }
        }
    }

    fn draw_glyph<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        visual: &GlyphVisual,
        offsets: &[f32],
        layout: &LabelLayout,
        layer_opacity: f32,
    ) {
        if !visual.is_visible() {
            return;
        }
        let x_offset = offsets
            .get(visual.segment.index)
            .copied()
            .unwrap_or(visual.segment.x_offset);
        let origin = layout.origin();
        let origin = Point::new(origin.x + x_offset, origin.y);
        let transform = FlipTransform {
            rotation: visual.rotation,
            scale_y: visual.scale_y,
            pivot_y: layout.rect.mid_y(),
        };
        self.draw_run(
            surface,
            &visual.segment.grapheme,
            origin,
            &layout.font,
            layer_opacity * visual.opacity,
            transform,
        );
    }

    /// Shadow (if any) then text, both at `opacity`.
    fn draw_run<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        text: &str,
        origin: Point,
        font: &Font,
        opacity: f32,
        transform: FlipTransform,
    ) {
        if opacity <= 0.0 || text.is_empty() {
            return;
        }

        if let Some(shadow) = self.style.shadow_color {
            let color = shadow.with_opacity(opacity);
            if !color.is_transparent() {
                let offset = self.style.shadow_offset;
                surface.draw_text(TextDraw {
                    layer: DrawLayer::Shadow,
                    text: text.to_owned(),
                    origin: origin.offset_by(offset),
                    font: font.clone(),
                    color,
                    transform: FlipTransform {
                        pivot_y: transform.pivot_y + offset.dy,
                        ..transform
                    },
                });
            }
        }

        let color = self.style.text_color.with_opacity(opacity);
        if !color.is_transparent() {
            surface.draw_text(TextDraw {
                layer: DrawLayer::Text,
                text: text.to_owned(),
                origin,
                font: font.clone(),
                color,
                transform,
            });
        }
    }
}
