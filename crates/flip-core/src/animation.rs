#![forbid(unsafe_code)]

//! Frame-driven animation primitives.
//!
//! Time-based animations that produce normalized `f32` values (0.0–1.0).
//! Nothing here owns a clock: the host calls [`Animation::tick`] once per
//! display frame with the elapsed delta, and reads [`Animation::value`]
//! when drawing. Ticking never allocates.
//!
//! ```
//! use std::time::Duration;
//! use flip_core::animation::{Animation, Delayed, Fade};
//!
//! let mut glyph = Delayed::new(Duration::from_millis(100), Fade::new(Duration::from_millis(200)));
//! glyph.tick(Duration::from_millis(200));
//! assert!((glyph.value() - 0.5).abs() < 0.01);
//! ```

pub mod stagger;

use std::time::Duration;

// ---------------------------------------------------------------------------
// Easing functions
// ---------------------------------------------------------------------------

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f32) -> f32;

/// Identity easing (constant velocity).
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-in (slow start).
#[inline]
pub fn ease_in(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

/// Quadratic ease-out (slow end).
#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic ease-in-out (slow start and end).
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

// ---------------------------------------------------------------------------
// Animation trait
// ---------------------------------------------------------------------------

/// A clock-free animation producing values in [0.0, 1.0].
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the end has been reached.
    fn is_complete(&self) -> bool;

    /// Current value, in [0.0, 1.0].
    fn value(&self) -> f32;
}

// ---------------------------------------------------------------------------
// Fade
// ---------------------------------------------------------------------------

/// Eased ramp from 0.0 to 1.0 over a fixed duration.
///
/// Progress is kept as an accumulated [`Duration`], so thousands of 16ms
/// frames land on the same instant as one large tick.
#[derive(Debug, Clone, Copy)]
pub struct Fade {
    elapsed: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl Fade {
    /// Linear ramp over `duration`. A zero duration completes on the first
    /// non-zero tick.
    pub fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration: duration.max(Duration::from_nanos(1)),
            easing: linear,
        }
    }

    /// Use `easing` to shape the ramp.
    #[must_use]
    pub fn easing(self, easing: EasingFn) -> Self {
        Self { easing, ..self }
    }

    /// Linear progress before easing.
    pub fn raw_progress(&self) -> f32 {
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        t.min(1.0) as f32
    }
}

impl Animation for Fade {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt).min(self.duration);
    }

    fn is_complete(&self) -> bool {
        self.elapsed == self.duration
    }

    fn value(&self) -> f32 {
        (self.easing)(self.raw_progress())
    }
}

// ---------------------------------------------------------------------------
// Delayed
// ---------------------------------------------------------------------------

/// Holds `inner` at its start value until `delay` has passed.
///
/// A glyph's flip is a `Delayed<Fade>` whose delay is its stagger offset.
/// Only the part of a tick that falls after the delay reaches `inner`.
#[derive(Debug, Clone, Copy)]
pub struct Delayed<A> {
    delay: Duration,
    elapsed: Duration,
    inner: A,
}

impl<A: Animation> Delayed<A> {
    /// Start `inner` once `delay` has elapsed.
    pub fn new(delay: Duration, inner: A) -> Self {
        Self {
            delay,
            elapsed: Duration::ZERO,
            inner,
        }
    }

    /// Whether the delay has passed.
    pub fn has_started(&self) -> bool {
        self.elapsed >= self.delay
    }
}

impl<A: Animation> Animation for Delayed<A> {
    fn tick(&mut self, dt: Duration) {
        let before = self.elapsed;
        self.elapsed = self.elapsed.saturating_add(dt);
        if self.elapsed > self.delay {
            self.inner.tick(self.elapsed - before.max(self.delay));
        }
    }

    fn is_complete(&self) -> bool {
        self.has_started() && self.inner.is_complete()
    }

    fn value(&self) -> f32 {
        if self.has_started() {
            self.inner.value()
        } else {
            0.0
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const MS_16: Duration = Duration::from_millis(16);
    const MS_100: Duration = Duration::from_millis(100);
    const MS_500: Duration = Duration::from_millis(500);
    const SEC_1: Duration = Duration::from_secs(1);

    #[test]
    fn easing_endpoints() {
        let curves: [EasingFn; 4] = [linear, ease_in, ease_out, ease_in_out];
        for f in curves {
            assert!((f(0.0) - 0.0).abs() < f32::EPSILON);
            assert!((f(1.0) - 1.0).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn easing_clamps_input() {
        assert!((linear(-1.0) - 0.0).abs() < f32::EPSILON);
        assert!((linear(2.0) - 1.0).abs() < f32::EPSILON);
        assert!((ease_in(-0.5) - 0.0).abs() < f32::EPSILON);
        assert!((ease_out(1.5) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn ease_out_faster_start() {
        assert!(ease_out(0.5) > linear(0.5));
        assert!(ease_in(0.5) < linear(0.5));
        assert!((ease_in_out(0.5) - 0.5).abs() < 0.01);
    }

    #[test]
    fn fade_starts_at_zero() {
        let fade = Fade::new(SEC_1);
        assert!((fade.value() - 0.0).abs() < f32::EPSILON);
        assert!(!fade.is_complete());
    }

    #[test]
    fn fade_midpoint() {
        let mut fade = Fade::new(SEC_1);
        fade.tick(MS_500);
        assert!((fade.value() - 0.5).abs() < 0.01);
    }

    #[test]
    fn fade_incremental_ticks() {
        let mut fade = Fade::new(Duration::from_millis(160));
        for _ in 0..10 {
            fade.tick(MS_16);
        }
        assert!(fade.is_complete());
        assert!((fade.value() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn fade_with_easing_keeps_raw_progress() {
        let mut fade = Fade::new(SEC_1).easing(ease_in);
        fade.tick(MS_500);
        assert!((fade.raw_progress() - 0.5).abs() < 0.01);
        assert!((fade.value() - 0.25).abs() < 0.01);
    }

    #[test]
    fn fade_holds_at_end() {
        let mut fade = Fade::new(MS_100);
        fade.tick(MS_500);
        assert!(fade.is_complete());
        assert!((fade.value() - 1.0).abs() < f32::EPSILON);
        assert!((fade.raw_progress() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn fade_zero_duration() {
        let mut fade = Fade::new(Duration::ZERO);
        assert!(!fade.is_complete());
        fade.tick(Duration::from_nanos(1));
        assert!(fade.is_complete());
    }

    #[test]
    fn delayed_waits_then_plays() {
        let mut d = Delayed::new(MS_500, Fade::new(MS_500));

        d.tick(Duration::from_millis(250));
        assert!(!d.has_started());
        assert!((d.value() - 0.0).abs() < f32::EPSILON);

        d.tick(Duration::from_millis(250));
        assert!(d.has_started());
        assert!((d.value() - 0.0).abs() < f32::EPSILON);

        d.tick(MS_500);
        assert!(d.is_complete());
        assert!((d.value() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn delayed_passes_only_time_past_delay() {
        let mut d = Delayed::new(MS_100, Fade::new(SEC_1));
        d.tick(Duration::from_millis(200));
        assert!((d.value() - 0.1).abs() < 0.02);
        d.tick(MS_100);
        assert!((d.value() - 0.2).abs() < 0.02);
    }

    #[test]
    fn delayed_zero_delay_is_started_but_at_rest() {
        let d = Delayed::new(Duration::ZERO, Fade::new(MS_100));
        assert!(d.has_started());
        assert!(!d.is_complete());
        assert!((d.value() - 0.0).abs() < f32::EPSILON);
    }
}
