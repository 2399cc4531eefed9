#![forbid(unsafe_code)]

//! Core: geometry, frame-driven animation primitives, and logging.

pub mod animation;
pub mod geometry;
pub mod logging;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
