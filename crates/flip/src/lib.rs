#![forbid(unsafe_code)]

//! Flip label public facade crate.
//!
//! Re-exports the types a host needs to embed a flip-animated label and
//! offers a prelude for day-to-day usage.
//!
//! ```
//! use std::time::Duration;
//! use flip::prelude::*;
//!
//! let mut label = FlipLabel::new();
//! label.set_font(Font::system(24.0))?;
//! label.set_text_with_flip_animation(Duration::from_millis(900), "12:00", None::<fn(bool)>);
//! assert_eq!(label.phase(), FlipPhase::FadingOut);
//! # Ok::<(), flip::Error>(())
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use flip_core::animation::stagger::StaggerMode;
pub use flip_core::geometry::{Offset, Point, Rect, Size};

// --- Style and text re-exports ---------------------------------------------

pub use flip_style::{Color, Font};
pub use flip_text::{
    FitOptions, FontMetrics, GlyphSegment, MeasuredLine, MetricsError, ProportionalMetrics,
    TextMetrics,
};

// --- Layout re-exports -----------------------------------------------------

pub use flip_layout::{HorizontalAlignment, VerticalAlignment};

// --- Widget re-exports -----------------------------------------------------

pub use flip_widgets::{
    CompletionHandler, DrawLayer, FlipConfig, FlipConfigError, FlipFrame, FlipLabel, FlipPhase,
    FlipTiming, LabelError, LabelLayout, RecordingSurface, Surface, TextDraw, TickOutcome,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for flip label hosts.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A label property write was rejected.
    Label(LabelError),
    /// Text could not be measured.
    Metrics(MetricsError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label(err) => write!(f, "{err}"),
            Self::Metrics(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Label(err) => Some(err),
            Self::Metrics(err) => Some(err),
        }
    }
}

impl From<LabelError> for Error {
    fn from(err: LabelError) -> Self {
        Self::Label(err)
    }
}

impl From<MetricsError> for Error {
    fn from(err: MetricsError) -> Self {
        Self::Metrics(err)
    }
}

/// Standard result type for flip APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Color, Error, FlipLabel, FlipPhase, Font, HorizontalAlignment, Offset, Rect,
        RecordingSurface, Result, Surface, TickOutcome, VerticalAlignment,
    };

    pub use crate::{core, layout, style, text, widgets};
}

pub use flip_core as core;
pub use flip_layout as layout;
pub use flip_style as style;
pub use flip_text as text;
pub use flip_widgets as widgets;
