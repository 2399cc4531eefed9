#![forbid(unsafe_code)]

//! Flip animation tuning (deterministic, env-overridable).
//!
//! [`FlipConfig`] holds the ratios that shape a run's schedule. Defaults
//! reproduce the standard transition: the old text fades out over the first
//! quarter of the run, then the new glyphs flip in one after another, each
//! flip taking 40% of the flip window.
//!
//! # Environment
//!
//! | Variable             | Field                | Range       |
//! |----------------------|----------------------|-------------|
//! | `FLIP_FADE_FRACTION` | `fade_fraction`      | `[0, 1)`    |
//! | `FLIP_OVERLAP`       | `flip_overlap`       | `[0, 1]`    |
//! | `FLIP_CHAR_FRACTION` | `char_flip_fraction` | `(0, 1]`    |
//! | `FLIP_STAGGER`       | `stagger_mode`       | `linear`, `ease-in`, `ease-out`, `ease-in-out` |
//!
//! Malformed or out-of-range values keep the default and are reported in
//! [`FlipConfigParse::errors`].

use std::env;
use std::fmt;
use std::time::Duration;

use flip_core::animation::stagger::StaggerMode;

/// Hard floor for a run's total duration.
pub const MIN_FLIP_DURATION: Duration = Duration::from_millis(750);

const ENV_FADE_FRACTION: &str = "FLIP_FADE_FRACTION";
const ENV_OVERLAP: &str = "FLIP_OVERLAP";
const ENV_CHAR_FRACTION: &str = "FLIP_CHAR_FRACTION";
const ENV_STAGGER: &str = "FLIP_STAGGER";

/// Schedule ratios for flip runs.
#[derive(Debug, Clone, Copy)]
pub struct FlipConfig {
    /// Share of the total duration spent fading out the old text.
    pub fade_fraction: f64,
    /// Share of the fade window the flip-in may overlap. `0.0` starts the
    /// first flip exactly when the fade ends.
    pub flip_overlap: f64,
    /// Single-glyph flip duration as a share of the flip window, for runs
    /// of two or more glyphs.
    pub char_flip_fraction: f64,
    /// Distribution of glyph start times across the flip window.
    pub stagger_mode: StaggerMode,
}

impl Default for FlipConfig {
    fn default() -> Self {
        Self {
            fade_fraction: 0.25,
            flip_overlap: 0.0,
            char_flip_fraction: 0.4,
            stagger_mode: StaggerMode::Linear,
        }
    }
}

/// Configuration parse diagnostics.
#[derive(Debug, Clone)]
pub struct FlipConfigParse {
    pub config: FlipConfig,
    pub errors: Vec<FlipConfigError>,
}

/// Configuration error with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlipConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl FlipConfigError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FlipConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for FlipConfigError {}

impl FlipConfig {
    /// Set the fade share, clamped to `[0, 0.99]`.
    #[must_use]
    pub fn fade_fraction(mut self, fraction: f64) -> Self {
        self.fade_fraction = clamp_or(fraction, 0.0, 0.99, 0.25);
        self
    }

    /// Set the flip/fade overlap, clamped to `[0, 1]`.
    #[must_use]
    pub fn flip_overlap(mut self, overlap: f64) -> Self {
        self.flip_overlap = clamp_or(overlap, 0.0, 1.0, 0.0);
        self
    }

    /// Set the single-glyph flip share, clamped to `[0.01, 1]`.
    #[must_use]
    pub fn char_flip_fraction(mut self, fraction: f64) -> Self {
        self.char_flip_fraction = clamp_or(fraction, 0.01, 1.0, 0.4);
        self
    }

    /// Set the stagger distribution.
    #[must_use]
    pub fn stagger_mode(mut self, mode: StaggerMode) -> Self {
        self.stagger_mode = mode;
        self
    }

    /// Parse config from environment variables.
    #[must_use]
    pub fn from_env() -> FlipConfig {
        Self::from_env_with_diagnostics().config
    }

    /// Parse config from environment variables and return diagnostics.
    #[must_use]
    pub fn from_env_with_diagnostics() -> FlipConfigParse {
        Self::from_env_with(|key| env::var(key).ok())
    }

    /// Parse config from an arbitrary key lookup.
    pub fn from_env_with<F>(mut get: F) -> FlipConfigParse
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut config = FlipConfig::default();
        let mut errors = Vec::new();

        if let Some(value) = get(ENV_FADE_FRACTION) {
            match parse_fraction(&value) {
                Some(parsed) => config.fade_fraction = parsed,
                None => errors.push(FlipConfigError::new(
                    "fade_fraction",
                    value,
                    "expected number in [0, 1)",
                )),
            }
        }

        if let Some(value) = get(ENV_OVERLAP) {
            match parse_fraction(&value) {
                Some(parsed) => config.flip_overlap = parsed,
                None => errors.push(FlipConfigError::new(
                    "flip_overlap",
                    value,
                    "expected number in [0, 1]",
                )),
            }
        }

        if let Some(value) = get(ENV_CHAR_FRACTION) {
            match parse_fraction(&value) {
                Some(parsed) => config.char_flip_fraction = parsed,
                None => errors.push(FlipConfigError::new(
                    "char_flip_fraction",
                    value,
                    "expected number in (0, 1]",
                )),
            }
        }

        if let Some(value) = get(ENV_STAGGER) {
            match StaggerMode::parse(&value) {
                Some(parsed) => config.stagger_mode = parsed,
                None => errors.push(FlipConfigError::new(
                    "stagger_mode",
                    value,
                    "expected linear|ease-in|ease-out|ease-in-out",
                )),
            }
        }

        // Out-of-range values fall back to their defaults.
        if let Err(mut validation) = config.validate() {
            let defaults = FlipConfig::default();
            for err in &validation {
                match err.field {
                    "fade_fraction" => config.fade_fraction = defaults.fade_fraction,
                    "flip_overlap" => config.flip_overlap = defaults.flip_overlap,
                    "char_flip_fraction" => {
                        config.char_flip_fraction = defaults.char_flip_fraction;
                    }
                    _ => {}
                }
            }
            errors.append(&mut validation);
        }

        FlipConfigParse { config, errors }
    }

    /// Validate config constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<FlipConfigError>> {
        let mut errors = Vec::new();
        if !(0.0..1.0).contains(&self.fade_fraction) {
            errors.push(FlipConfigError::new(
                "fade_fraction",
                self.fade_fraction.to_string(),
                "must be in [0, 1)",
            ));
        }
        if !(0.0..=1.0).contains(&self.flip_overlap) {
            errors.push(FlipConfigError::new(
                "flip_overlap",
                self.flip_overlap.to_string(),
                "must be in [0, 1]",
            ));
        }
        if !(self.char_flip_fraction > 0.0 && self.char_flip_fraction <= 1.0) {
            errors.push(FlipConfigError::new(
                "char_flip_fraction",
                self.char_flip_fraction.to_string(),
                "must be in (0, 1]",
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[inline]
fn parse_fraction(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[inline]
fn clamp_or(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}
