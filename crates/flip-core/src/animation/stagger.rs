#![forbid(unsafe_code)]

//! Stagger utilities: start offsets for per-character animations.
//!
//! [`stagger_offsets`] spreads `count` start times over a fixed span. The
//! flip sequencer uses it to start glyph *i* at
//! `flip_window_start + offset[i]`, where the span is chosen so the last
//! glyph finishes exactly at the end of the run.
//!
//! # Invariants
//!
//! 1. `stagger_offsets(0, ..)` returns an empty vec.
//! 2. The first offset is always `Duration::ZERO`.
//! 3. Offsets are monotonically non-decreasing.
//! 4. For `Linear`, `offset[i] = i * interval` computed in integer
//!    nanoseconds (no float drift).
//! 5. For eased modes the last offset equals `(count - 1) * interval` and the
//!    intermediate offsets follow the easing curve.

use std::time::Duration;

use super::{EasingFn, ease_in, ease_in_out, ease_out};

/// How to distribute start offsets across glyphs.
#[derive(Debug, Clone, Copy, Default)]
pub enum StaggerMode {
    /// Equal spacing: `offset[i] = i * interval`.
    #[default]
    Linear,
    /// Gaps widen toward the end (quadratic ease-in).
    EaseIn,
    /// Gaps narrow toward the end (quadratic ease-out).
    EaseOut,
    /// Slow start and end, faster middle.
    EaseInOut,
    /// Custom easing applied to the normalized glyph position.
    Custom(EasingFn),
}

impl StaggerMode {
    /// Parse a mode name (`linear`, `ease-in`, `ease-out`, `ease-in-out`).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "linear" => Some(Self::Linear),
            "ease-in" | "ease_in" | "easein" => Some(Self::EaseIn),
            "ease-out" | "ease_out" | "easeout" => Some(Self::EaseOut),
            "ease-in-out" | "ease_in_out" | "easeinout" => Some(Self::EaseInOut),
            _ => None,
        }
    }
}

/// Compute start offsets for `count` items spaced by `interval`.
#[must_use]
pub fn stagger_offsets(count: usize, interval: Duration, mode: StaggerMode) -> Vec<Duration> {
    if count == 0 {
        return Vec::new();
    }
    if count == 1 {
        return vec![Duration::ZERO];
    }

    let easing: EasingFn = match mode {
        StaggerMode::Linear => {
            return (0..count)
                .map(|i| interval.saturating_mul(u32::try_from(i).unwrap_or(u32::MAX)))
                .collect();
        }
        StaggerMode::EaseIn => ease_in,
        StaggerMode::EaseOut => ease_out,
        StaggerMode::EaseInOut => ease_in_out,
        StaggerMode::Custom(f) => f,
    };

    let last = count - 1;
    let span = interval.saturating_mul(u32::try_from(last).unwrap_or(u32::MAX));
    let total_nanos = span.as_nanos() as f64;

    (0..count)
        .map(|i| {
            if i == last {
                // Pin the endpoint so the final glyph still lands on the run end.
                return span;
            }
            let t = i as f32 / last as f32;
            let nanos = (total_nanos * f64::from(easing(t))) as u64;
            Duration::from_nanos(nanos).min(span)
        })
        .collect()
}
