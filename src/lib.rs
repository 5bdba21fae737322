//! lineage-core — labeled fate-probability matrices
//!
//! Per-cell probabilities of committing to each of several terminal or
//! initial states, with a name and a display colour per state.

pub mod color;
pub mod keys;
pub mod lineage;

pub use color::{categorical_colors, ColorSpec, PaletteConfig};
pub use lineage::{AxisIndex, IndexItem, Lineage, LineageError, Slice};
