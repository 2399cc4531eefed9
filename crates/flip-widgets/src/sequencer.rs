#![forbid(unsafe_code)]

//! Timed flip transition between two strings.
//!
//! A [`FlipSequencer`] owns at most one [`FlipRun`]. A run fades the outgoing
//! content out, then flips the new text in glyph by glyph: each glyph rotates
//! about the line's horizontal midline from edge-on (π/2) to flat while its
//! opacity ramps from 0 to 1. Glyph start times are staggered so the last
//! glyph lands exactly at the end of the run.
//!
//! State machine: `Idle → FadingOut → FlippingIn → Completed`, with
//! `Interrupted` reachable from both animating states when a new run is
//! started before the current one finishes.
//!
//! # Invariants
//!
//! 1. A run's total duration is never below [`MIN_FLIP_DURATION`].
//! 2. A completion handler runs at most once (`FnOnce`): `true` on natural
//!    completion, `false` when superseded.
//! 3. An interrupting [`FlipSequencer::start`] retires the previous run and
//!    calls its handler before the new run exists.
//! 4. A run completes only when every glyph has finished flipping and the
//!    elapsed time has reached the total duration.
//! 5. Interruption never snaps: the visible state of the superseded run is
//!    frozen and fades out as the new run's outgoing content.
//!
//! # Failure Modes
//!
//! None. Short durations are raised, a missing handler is skipped, and empty
//! text gives a fade-only run.

use std::f32::consts::FRAC_PI_2;
use std::fmt;
use std::time::Duration;

use flip_core::animation::stagger::stagger_offsets;
use flip_core::animation::{Animation, Delayed, Fade, ease_out};
use flip_text::{GlyphRun, GlyphSegment};

use crate::config::{FlipConfig, MIN_FLIP_DURATION};

/// Called once per run with `true` on completion, `false` on interruption.
///
/// Handlers run synchronously inside [`FlipSequencer::start`] and
/// [`FlipSequencer::tick`], while the sequencer (and any label owning it) is
/// mutably borrowed. A handler must not reach back into its owner: a host
/// keeping the label in `Rc<RefCell<_>>` would hit a `BorrowMutError`.
/// Record the outcome instead and act on it after the call returns.
pub type CompletionHandler = Box<dyn FnOnce(bool)>;

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Lifecycle state of a flip run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FlipPhase {
    /// No run has been started.
    #[default]
    Idle,
    /// The outgoing content is fading; no new glyph has started.
    FadingOut,
    /// New glyphs are flipping in.
    FlippingIn,
    /// The run finished naturally.
    Completed,
    /// The run was superseded by a newer one.
    Interrupted,
}

impl FlipPhase {
    /// Whether the run is still in flight.
    #[inline]
    pub fn is_animating(self) -> bool {
        matches!(self, Self::FadingOut | Self::FlippingIn)
    }

    /// Whether the run has ended.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Interrupted)
    }
}

/// Result of advancing the sequencer by one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing is animating; no further frames are needed.
    Idle,
    /// The run is in flight; request another frame.
    Running,
    /// The run completed on this tick.
    Completed,
}

// ---------------------------------------------------------------------------
// Request and timing
// ---------------------------------------------------------------------------

/// Inputs of one flip run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlipRequest {
    /// Text shown before the run.
    pub old_text: String,
    /// Text shown after the run.
    pub new_text: String,
    /// Requested total duration (raised to [`MIN_FLIP_DURATION`]).
    pub duration: Duration,
}

impl FlipRequest {
    /// Create a request.
    pub fn new(old_text: impl Into<String>, new_text: impl Into<String>, duration: Duration) -> Self {
        Self {
            old_text: old_text.into(),
            new_text: new_text.into(),
            duration,
        }
    }
}

/// Resolved schedule of one run. All offsets are relative to the run start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlipTiming {
    /// Total run duration.
    pub total: Duration,
    /// Length of the outgoing fade.
    pub fade: Duration,
    /// When the first glyph starts flipping.
    pub flip_window_start: Duration,
    /// Flip duration of a single glyph.
    pub char_flip: Duration,
    /// Gap between consecutive glyph starts (linear stagger).
    pub stagger_interval: Duration,
    /// Start time of each glyph.
    pub offsets: Vec<Duration>,
}

impl FlipTiming {
    /// Compute the schedule for `count` glyphs.
    ///
    /// With two or more glyphs each flip lasts `char_flip_fraction` of the
    /// flip window and the starts are spread so the last glyph ends at
    /// `total`. A single glyph flips across the whole window.
    #[must_use]
    pub fn compute(requested: Duration, count: usize, config: &FlipConfig) -> Self {
        let total = requested.max(MIN_FLIP_DURATION);
        let fade = total.mul_f64(ratio(config.fade_fraction, 0.0, 0.99));
        let flip_window_start = fade.mul_f64(1.0 - ratio(config.flip_overlap, 0.0, 1.0));
        let window = total.saturating_sub(flip_window_start);

        let (char_flip, stagger_interval) = if count >= 2 {
            let char_flip = window.mul_f64(ratio(config.char_flip_fraction, 0.01, 1.0));
            let gaps = u32::try_from(count - 1).unwrap_or(u32::MAX);
            (char_flip, window.saturating_sub(char_flip) / gaps)
        } else {
            (window, Duration::ZERO)
        };

        let mut offsets: Vec<Duration> =
            stagger_offsets(count, stagger_interval, config.stagger_mode)
                .into_iter()
                .map(|offset| flip_window_start.saturating_add(offset))
                .collect();
        // The interval is truncated to whole nanoseconds; the last glyph
        // absorbs the remainder so it ends exactly at `total`.
        if let Some(last) = offsets.last_mut() {
            *last = total.saturating_sub(char_flip).max(*last);
        }

        Self {
            total,
            fade,
            flip_window_start,
            char_flip,
            stagger_interval,
            offsets,
        }
    }

    /// Length of the flip window.
    #[inline]
    pub fn flip_window(&self) -> Duration {
        self.total.saturating_sub(self.flip_window_start)
    }

    /// When glyph `index` finishes flipping.
    pub fn glyph_end(&self, index: usize) -> Option<Duration> {
        self.offsets
            .get(index)
            .map(|start| start.saturating_add(self.char_flip))
    }
}

#[inline]
fn ratio(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

// ---------------------------------------------------------------------------
// Frame snapshot
// ---------------------------------------------------------------------------

/// Render state of one glyph for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphVisual {
    /// The glyph and its position in the line.
    pub segment: GlyphSegment,
    /// Eased flip progress in `[0, 1]`.
    pub progress: f32,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
    /// Rotation about the horizontal midline, `π/2` (edge-on) to `0` (flat).
    pub rotation: f32,
    /// Vertical scale of the projected glyph, `cos(rotation)`.
    pub scale_y: f32,
}

impl GlyphVisual {
    /// Visual state of `segment` at flip `progress`.
    pub fn at(segment: GlyphSegment, progress: f32) -> Self {
        let progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        let rotation = (1.0 - progress) * FRAC_PI_2;
        Self {
            segment,
            progress,
            opacity: progress,
            rotation,
            scale_y: rotation.cos().max(0.0),
        }
    }

    /// Whether anything of the glyph would be drawn.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0 && self.scale_y > 0.0
    }
}

/// Content fading out at the start of a run.
///
/// Either a whole line (`glyphs == None`) or the frozen glyphs of an
/// interrupted run. Glyph positions are relative to the layout of `text`.
#[derive(Debug, Clone, PartialEq)]
pub struct FadingLine {
    /// Text whose layout positions this line.
    pub text: String,
    /// Layer opacity, applied on top of per-glyph opacity.
    pub opacity: f32,
    /// Frozen glyph visuals, or `None` for the plain line.
    pub glyphs: Option<Vec<GlyphVisual>>,
}

impl FadingLine {
    /// A fully opaque plain line.
    pub fn whole(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            opacity: 1.0,
            glyphs: None,
        }
    }

    /// Whether drawing the line would produce anything.
    pub fn is_visible(&self) -> bool {
        if self.opacity <= 0.0 {
            return false;
        }
        match &self.glyphs {
            None => !self.text.is_empty(),
            Some(glyphs) => glyphs.iter().any(GlyphVisual::is_visible),
        }
    }

    fn faded(&self, opacity: f32) -> Self {
        Self {
            text: self.text.clone(),
            opacity: self.opacity * opacity,
            glyphs: self.glyphs.clone(),
        }
    }
}

/// Snapshot of an in-flight run for drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct FlipFrame {
    /// Phase at the time of the snapshot.
    pub phase: FlipPhase,
    /// Time since the run started.
    pub elapsed: Duration,
    /// Text being flipped in.
    pub text: String,
    /// Outgoing layers, drawn first, with the fade already applied.
    pub outgoing: Vec<FadingLine>,
    /// Incoming glyphs in line order.
    pub glyphs: Vec<GlyphVisual>,
}

impl FlipFrame {
    /// Opacity of the outgoing layer (the first line, or 0 when empty).
    pub fn outgoing_opacity(&self) -> f32 {
        self.outgoing.first().map_or(0.0, |line| line.opacity)
    }

    /// Freeze the visible state into outgoing lines for a successor run.
    pub fn freeze(self) -> Vec<FadingLine> {
        let mut lines: Vec<FadingLine> = self
            .outgoing
            .into_iter()
            .filter(FadingLine::is_visible)
            .collect();
        let glyphs: Vec<GlyphVisual> = self
            .glyphs
            .into_iter()
            .filter(GlyphVisual::is_visible)
            .collect();
        if !glyphs.is_empty() {
            lines.push(FadingLine {
                text: self.text,
                opacity: 1.0,
                glyphs: Some(glyphs),
            });
        }
        lines
    }
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// One flip transition. Exclusively owned by a [`FlipSequencer`].
pub struct FlipRun {
    request: FlipRequest,
    timing: FlipTiming,
    phase: FlipPhase,
    elapsed: Duration,
    fade: Fade,
    outgoing: Vec<FadingLine>,
    glyphs: Vec<(GlyphSegment, Delayed<Fade>)>,
    completion: Option<CompletionHandler>,
}

impl fmt::Debug for FlipRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlipRun")
            .field("request", &self.request)
            .field("timing", &self.timing)
            .field("phase", &self.phase)
            .field("elapsed", &self.elapsed)
            .field("outgoing", &self.outgoing.len())
            .field("glyphs", &self.glyphs.len())
            .field("has_completion", &self.completion.is_some())
            .finish()
    }
}

impl FlipRun {
    fn new(
        request: FlipRequest,
        segments: GlyphRun,
        outgoing: Vec<FadingLine>,
        completion: Option<CompletionHandler>,
        config: &FlipConfig,
    ) -> Self {
        let timing = FlipTiming::compute(request.duration, segments.len(), config);
        let glyphs = segments
            .into_iter()
            .zip(timing.offsets.iter().copied())
            .map(|(segment, offset)| {
                let flip = Fade::new(timing.char_flip).easing(ease_out);
                (segment, Delayed::new(offset, flip))
            })
            .collect();
        let phase = if timing.flip_window_start.is_zero() {
            FlipPhase::FlippingIn
        } else {
            FlipPhase::FadingOut
        };

        Self {
            fade: Fade::new(timing.fade),
            request,
            timing,
            phase,
            elapsed: Duration::ZERO,
            outgoing,
            glyphs,
            completion,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> FlipPhase {
        self.phase
    }

    /// Time since the run started.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Resolved schedule.
    pub fn timing(&self) -> &FlipTiming {
        &self.timing
    }

    /// Text shown before the run.
    pub fn old_text(&self) -> &str {
        &self.request.old_text
    }

    /// Text shown after the run.
    pub fn new_text(&self) -> &str {
        &self.request.new_text
    }

    /// Number of glyphs still owned by the run (zero once it has ended).
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Snapshot for drawing.
    pub fn frame(&self) -> FlipFrame {
        let fade_opacity = 1.0 - self.fade.value();
        FlipFrame {
            phase: self.phase,
            elapsed: self.elapsed,
            text: self.request.new_text.clone(),
            outgoing: self
                .outgoing
                .iter()
                .map(|line| line.faded(fade_opacity))
                .collect(),
            glyphs: self
                .glyphs
                .iter()
                .map(|(segment, flip)| GlyphVisual::at(segment.clone(), flip.value()))
                .collect(),
        }
    }

    fn advance(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
        self.fade.tick(dt);
        for (_, flip) in &mut self.glyphs {
            flip.tick(dt);
        }
        if self.phase == FlipPhase::FadingOut && self.elapsed >= self.timing.flip_window_start {
            self.phase = FlipPhase::FlippingIn;
        }
    }

    fn is_finished(&self) -> bool {
        self.elapsed >= self.timing.total && self.glyphs.iter().all(|(_, flip)| flip.is_complete())
    }

    /// End the run, discarding its glyphs, and hand back the handler.
    fn retire(&mut self, phase: FlipPhase) -> Option<CompletionHandler> {
        debug_assert!(phase.is_terminal());
        self.phase = phase;
        self.glyphs.clear();
        self.outgoing.clear();
        self.completion.take()
    }
}

// ---------------------------------------------------------------------------
// Sequencer
// ---------------------------------------------------------------------------

/// Run counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlipStats {
    pub started: u64,
    pub completed: u64,
    pub interrupted: u64,
}

/// Drives flip runs from an external frame clock.
#[derive(Debug, Default)]
pub struct FlipSequencer {
    config: FlipConfig,
    run: Option<FlipRun>,
    stats: FlipStats,
}

impl FlipSequencer {
    /// Create a sequencer with the given schedule ratios.
    pub fn new(config: FlipConfig) -> Self {
        Self {
            config,
            run: None,
            stats: FlipStats::default(),
        }
    }

    /// Schedule ratios used for new runs.
    pub fn config(&self) -> &FlipConfig {
        &self.config
    }

    /// Replace the schedule ratios. The current run keeps its schedule.
    pub fn set_config(&mut self, config: FlipConfig) {
        self.config = config;
    }

    /// Start a run, superseding any run in flight.
    ///
    /// The superseded run's handler is called with `false` before this
    /// returns, and before the new run is created. When nothing was in
    /// flight, `request.old_text` becomes the outgoing line.
    pub fn start(
        &mut self,
        request: FlipRequest,
        segments: GlyphRun,
        completion: Option<CompletionHandler>,
    ) -> &FlipTiming {
        let outgoing = match self.run.as_mut() {
            Some(run) if run.phase.is_animating() => {
                let frozen = run.frame().freeze();
                let handler = run.retire(FlipPhase::Interrupted);
                self.stats.interrupted += 1;
                flip_core::debug!(
                    elapsed_ms = run.elapsed.as_millis() as u64,
                    text = %run.request.new_text,
                    "flip run interrupted"
                );
                if let Some(handler) = handler {
                    handler(false);
                }
                frozen
            }
            _ => {
                let line = FadingLine::whole(request.old_text.as_str());
                if line.is_visible() {
                    vec![line]
                } else {
                    Vec::new()
                }
            }
        };

        let run = FlipRun::new(request, segments, outgoing, completion, &self.config);
        self.stats.started += 1;
        flip_core::debug!(
            total_ms = run.timing.total.as_millis() as u64,
            glyphs = run.glyphs.len(),
            text = %run.request.new_text,
            "flip run started"
        );
        &self.run.insert(run).timing
    }

    /// Advance the current run by `dt`.
    ///
    /// Fires the completion handler with `true` on the tick that completes
    /// the run.
    pub fn tick(&mut self, dt: Duration) -> TickOutcome {
        let Some(run) = self.run.as_mut() else {
            return TickOutcome::Idle;
        };
        if !run.phase.is_animating() {
            return TickOutcome::Idle;
        }

        run.advance(dt);
        if !run.is_finished() {
            return TickOutcome::Running;
        }

        let handler = run.retire(FlipPhase::Completed);
        self.stats.completed += 1;
        flip_core::debug!(
            elapsed_ms = run.elapsed.as_millis() as u64,
            text = %run.request.new_text,
            "flip run completed"
        );
        if let Some(handler) = handler {
            handler(true);
        }
        TickOutcome::Completed
    }

    /// Snapshot of the run in flight, if any.
    pub fn frame(&self) -> Option<FlipFrame> {
        self.active().map(FlipRun::frame)
    }

    /// Phase of the current (or last) run.
    pub fn phase(&self) -> FlipPhase {
        self.run.as_ref().map_or(FlipPhase::Idle, FlipRun::phase)
    }

    /// Elapsed time of the current (or last) run.
    pub fn elapsed(&self) -> Duration {
        self.run.as_ref().map_or(Duration::ZERO, FlipRun::elapsed)
    }

    /// Schedule of the current (or last) run.
    pub fn timing(&self) -> Option<&FlipTiming> {
        self.run.as_ref().map(FlipRun::timing)
    }

    /// The current (or last) run.
    pub fn run(&self) -> Option<&FlipRun> {
        self.run.as_ref()
    }

    /// Whether a run is in flight.
    pub fn is_animating(&self) -> bool {
        self.active().is_some()
    }

    /// Run counters.
    pub fn stats(&self) -> FlipStats {
        self.stats
    }

    fn active(&self) -> Option<&FlipRun> {
        self.run.as_ref().filter(|run| run.phase.is_animating())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use flip_style::Font;
    use flip_text::{TextMetrics, split_glyphs};
    use std::cell::RefCell;
    use std::rc::Rc;

    const MS_16: Duration = Duration::from_millis(16);

    fn segments(text: &str) -> GlyphRun {
        split_glyphs(&TextMetrics::default(), text, &Font::system(17.0)).unwrap()
    }

    fn recorder() -> (Rc<RefCell<Vec<bool>>>, impl Fn() -> CompletionHandler) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let make = {
            let log = Rc::clone(&log);
            move || -> CompletionHandler {
                let log = Rc::clone(&log);
                Box::new(move |finished| log.borrow_mut().push(finished))
            }
        };
        (log, make)
    }

    fn request(old: &str, new: &str, ms: u64) -> FlipRequest {
        FlipRequest::new(old, new, Duration::from_millis(ms))
    }

    #[test]
    fn timing_floor() {
        let timing = FlipTiming::compute(Duration::from_millis(100), 3, &FlipConfig::default());
        assert_eq!(timing.total, MIN_FLIP_DURATION);
        let timing = FlipTiming::compute(Duration::from_secs(3), 3, &FlipConfig::default());
        assert_eq!(timing.total, Duration::from_secs(3));
    }

    #[test]
    fn timing_two_glyphs() {
        let timing = FlipTiming::compute(Duration::from_secs(2), 2, &FlipConfig::default());
        assert_eq!(timing.fade, Duration::from_millis(500));
        assert_eq!(timing.flip_window_start, Duration::from_millis(500));
        assert_eq!(timing.char_flip, Duration::from_millis(600));
        assert_eq!(timing.stagger_interval, Duration::from_millis(900));
        assert_eq!(
            timing.offsets,
            vec![Duration::from_millis(500), Duration::from_millis(1400)]
        );
        assert_eq!(timing.glyph_end(1), Some(Duration::from_secs(2)));
        assert_eq!(timing.glyph_end(2), None);
    }

    #[test]
    fn timing_last_glyph_ends_at_total() {
        for count in [3, 7, 11, 13] {
            for ms in [750, 1000, 1333, 2001] {
                let total = Duration::from_millis(ms);
                let timing = FlipTiming::compute(total, count, &FlipConfig::default());
                assert_eq!(timing.glyph_end(count - 1), Some(total), "count={count} ms={ms}");
                for pair in timing.offsets.windows(2) {
                    assert!(pair[0] <= pair[1]);
                }
            }
        }
    }

    #[test]
    fn timing_single_glyph_spans_window() {
        let timing = FlipTiming::compute(Duration::from_secs(1), 1, &FlipConfig::default());
        assert_eq!(timing.flip_window_start, Duration::from_millis(250));
        assert_eq!(timing.char_flip, Duration::from_millis(750));
        assert_eq!(timing.stagger_interval, Duration::ZERO);
        assert_eq!(timing.offsets, vec![Duration::from_millis(250)]);

        let empty = FlipTiming::compute(Duration::from_secs(1), 0, &FlipConfig::default());
        assert!(empty.offsets.is_empty());
    }

    #[test]
    fn timing_overlap_starts_flip_during_fade() {
        let config = FlipConfig::default().flip_overlap(0.5);
        let timing = FlipTiming::compute(Duration::from_secs(2), 4, &config);
        assert_eq!(timing.fade, Duration::from_millis(500));
        assert_eq!(timing.flip_window_start, Duration::from_millis(250));
        assert!(timing.glyph_end(3).is_some_and(|end| end <= timing.total));
    }

    #[test]
    fn timing_tolerates_nan_config() {
        let config = FlipConfig {
            fade_fraction: f64::NAN,
            flip_overlap: f64::NAN,
            char_flip_fraction: f64::NAN,
            ..FlipConfig::default()
        };
        let timing = FlipTiming::compute(Duration::from_secs(1), 3, &config);
        assert_eq!(timing.fade, Duration::ZERO);
        assert_eq!(timing.offsets.len(), 3);
    }

    #[test]
    fn glyph_visual_endpoints() {
        let seg = segments("A")[0].clone();
        let start = GlyphVisual::at(seg.clone(), 0.0);
        assert_eq!(start.opacity, 0.0);
        assert!((start.rotation - FRAC_PI_2).abs() < 1e-6);
        assert_eq!(start.scale_y, 0.0);
        assert!(!start.is_visible());

        let end = GlyphVisual::at(seg, 1.0);
        assert_eq!(end.rotation, 0.0);
        assert_eq!(end.scale_y, 1.0);
        assert!(end.is_visible());
    }

    #[test]
    fn phases_progress_to_completion() {
        let (log, handler) = recorder();
        let mut seq = FlipSequencer::default();
        assert_eq!(seq.phase(), FlipPhase::Idle);
        assert_eq!(seq.tick(MS_16), TickOutcome::Idle);

        seq.start(request("", "HI", 2000), segments("HI"), Some(handler()));
        assert_eq!(seq.phase(), FlipPhase::FadingOut);
        assert!(seq.is_animating());

        seq.tick(Duration::from_millis(500));
        assert_eq!(seq.phase(), FlipPhase::FlippingIn);

        assert_eq!(seq.tick(Duration::from_millis(1499)), TickOutcome::Running);
        assert!(log.borrow().is_empty());

        assert_eq!(seq.tick(Duration::from_millis(1)), TickOutcome::Completed);
        assert_eq!(seq.phase(), FlipPhase::Completed);
        assert_eq!(*log.borrow(), vec![true]);
        assert_eq!(seq.run().map(FlipRun::glyph_count), Some(0));

        // Completed runs stay quiet.
        assert_eq!(seq.tick(MS_16), TickOutcome::Idle);
        assert!(seq.frame().is_none());
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn empty_text_is_fade_only() {
        let mut seq = FlipSequencer::default();
        seq.start(request("old", "", 100), segments(""), None);
        assert_eq!(seq.timing().map(|t| t.total), Some(MIN_FLIP_DURATION));

        let frame = seq.frame().unwrap();
        assert!(frame.glyphs.is_empty());
        assert_eq!(frame.outgoing_opacity(), 1.0);

        assert_eq!(seq.tick(Duration::from_millis(749)), TickOutcome::Running);
        assert_eq!(seq.tick(Duration::from_millis(1)), TickOutcome::Completed);
    }

    #[test]
    fn outgoing_fades_during_fade_window() {
        let mut seq = FlipSequencer::default();
        seq.start(request("old", "new", 1000), segments("new"), None);
        seq.tick(Duration::from_millis(125));
        let frame = seq.frame().unwrap();
        assert!((frame.outgoing_opacity() - 0.5).abs() < 1e-3);
        assert!(frame.glyphs.iter().all(|g| !g.is_visible()));

        seq.tick(Duration::from_millis(125));
        assert_eq!(seq.frame().unwrap().outgoing_opacity(), 0.0);
    }

    #[test]
    fn glyphs_start_in_order() {
        let mut seq = FlipSequencer::default();
        seq.start(request("", "ABCD", 2000), segments("ABCD"), None);
        seq.tick(Duration::from_millis(1000));
        let frame = seq.frame().unwrap();
        let progress: Vec<f32> = frame.glyphs.iter().map(|g| g.progress).collect();
        assert!(progress.windows(2).all(|w| w[0] >= w[1]), "{progress:?}");
        assert!(progress[0] > 0.0);
        assert_eq!(progress[3], 0.0);
    }

    #[test]
    fn interrupt_fires_previous_handler_synchronously() {
        let events = Rc::new(RefCell::new(Vec::<String>::new()));
        let first: CompletionHandler = {
            let events = Rc::clone(&events);
            Box::new(move |finished: bool| events.borrow_mut().push(format!("first:{finished}")))
        };
        let second: CompletionHandler = {
            let events = Rc::clone(&events);
            Box::new(move |finished: bool| events.borrow_mut().push(format!("second:{finished}")))
        };

        let mut seq = FlipSequencer::default();
        seq.start(request("", "one", 1000), segments("one"), Some(first));
        seq.tick(Duration::from_millis(600));
        seq.start(request("one", "two", 1000), segments("two"), Some(second));

        assert_eq!(*events.borrow(), vec!["first:false".to_string()]);
        assert_eq!(seq.phase(), FlipPhase::FadingOut);
        assert_eq!(seq.stats().interrupted, 1);

        while seq.tick(MS_16) == TickOutcome::Running {}
        assert_eq!(
            *events.borrow(),
            vec!["first:false".to_string(), "second:true".to_string()]
        );
    }

    #[test]
    fn interrupt_freezes_partial_state() {
        let mut seq = FlipSequencer::default();
        seq.start(request("", "one", 1000), segments("one"), None);
        seq.tick(Duration::from_millis(600));
        let before = seq.frame().unwrap();
        let visible_before: Vec<_> = before
            .glyphs
            .iter()
            .filter(|g| g.is_visible())
            .cloned()
            .collect();
        assert!(!visible_before.is_empty());

        seq.start(request("one", "two", 1000), segments("two"), None);
        let after = seq.frame().unwrap();
        assert_eq!(after.outgoing.len(), 1);
        let line = &after.outgoing[0];
        assert_eq!(line.text, "one");
        assert_eq!(line.opacity, 1.0);
        assert_eq!(line.glyphs.as_deref(), Some(visible_before.as_slice()));
    }

    #[test]
    fn start_after_completion_uses_old_text() {
        let mut seq = FlipSequencer::default();
        seq.start(request("", "one", 750), segments("one"), None);
        while seq.tick(MS_16) == TickOutcome::Running {}

        seq.start(request("one", "two", 750), segments("two"), None);
        let frame = seq.frame().unwrap();
        assert_eq!(frame.outgoing, vec![FadingLine::whole("one")]);
        assert_eq!(seq.stats().interrupted, 0);
        assert_eq!(seq.stats().completed, 1);
    }

    #[test]
    fn missing_handler_is_skipped() {
        let mut seq = FlipSequencer::default();
        seq.start(request("", "x", 0), segments("x"), None);
        seq.start(request("x", "y", 0), segments("y"), None);
        while seq.tick(MS_16) == TickOutcome::Running {}
        assert_eq!(seq.phase(), FlipPhase::Completed);
        assert_eq!(seq.stats().started, 2);
    }
}
