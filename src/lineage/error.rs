//! Errors raised while building, mutating or indexing a [`Lineage`](super::Lineage).

/// Lineage-related errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LineageError {
    #[error("Expected a 2-dimensional array, found {0} dimension(s)")]
    Dimensionality(usize),

    #[error("Row {row} has {found} values, expected {expected}")]
    RaggedRows { row: usize, expected: usize, found: usize },

    #[error("Number of {what} ({found}) does not match the number of lineages ({expected})")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Lineage names are not unique: '{0}' appears more than once")]
    DuplicateName(String),

    #[error("Lineage name at position {position} is not a string: {found}")]
    NameType { position: usize, found: String },

    #[error("Invalid color: '{0}'")]
    InvalidColor(String),

    #[error("Lineage '{0}' not found")]
    NameNotFound(String),

    #[error("Index {index} is out of bounds for axis of size {len}")]
    IndexOutOfRange { index: isize, len: usize },

    #[error("Unsupported index: {0}")]
    UnsupportedIndex(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Shape mismatch: {left:?} vs {right:?}")]
    ShapeMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
}

impl LineageError {
    /// True for errors caused by a value of the wrong kind rather than a wrong value.
    pub fn is_type_error(&self) -> bool {
        matches!(self, Self::NameType { .. } | Self::UnsupportedIndex(_))
    }
}

pub type Result<T> = std::result::Result<T, LineageError>;
