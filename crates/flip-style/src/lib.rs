#![forbid(unsafe_code)]

//! Style values for the flip label: packed colors and fonts.

pub mod color;
pub mod font;

pub use color::Color;
pub use font::{DEFAULT_FONT_SIZE, Font, SYSTEM_FONT_FAMILY};
