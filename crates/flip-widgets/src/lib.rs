#![forbid(unsafe_code)]

//! The flip label widget.
//!
//! - [`label`] - [`FlipLabel`], the composite text view
//! - [`sequencer`] - the fade-out / flip-in state machine
//! - [`surface`] - the drawing seam and a recording implementation
//! - [`config`] - animation ratios, env-overridable
//! - [`error`] - rejected property writes

pub mod config;
pub mod error;
pub mod label;
pub mod sequencer;
pub mod surface;

pub use config::{FlipConfig, FlipConfigError, FlipConfigParse, MIN_FLIP_DURATION};
pub use error::LabelError;
pub use label::{FlipLabel, Invalidation, LabelLayout, LabelStyle};
pub use sequencer::{
    CompletionHandler, FadingLine, FlipFrame, FlipPhase, FlipRequest, FlipRun, FlipSequencer,
    FlipStats, FlipTiming, GlyphVisual, TickOutcome,
};
pub use surface::{DrawLayer, FlipTransform, RecordingSurface, Surface, TextDraw};
