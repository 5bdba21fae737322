//! Lineage — labeled fate-probability matrices
//!
//! A [`Lineage`] pairs a cell × lineage probability grid with one unique name
//! and one display colour per lineage:
//! - **array**: the matrix type, construction and two-axis indexing
//! - **registry**: validated names and colours for the columns
//! - **index**: per-axis index expressions and their resolution
//! - **error**: the shared error type

mod array;
mod error;
mod index;
mod registry;

pub use array::Lineage;
pub use error::{LineageError, Result};
pub use index::{resolve, AxisIndex, IndexItem, Slice};
pub use registry::Registry;
