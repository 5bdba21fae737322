//! Colour handling for lineage metadata
//!
//! - `parse`: validation and normalisation of user-supplied colours
//! - `categorical`: deterministic default colours

mod parse;
mod categorical;

pub use parse::{hex, ColorSpec};
pub use categorical::{categorical_colors, categorical_colors_with, PaletteConfig, CATEGORICAL_20};
