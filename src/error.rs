//! Error types for `life_engine`.
//!
//! Construction and access errors surface immediately to the caller;
//! `Grid::step` never returns an error (it is infallible given a
//! well-constructed grid).

use thiserror::Error;

/// Result type alias used throughout the public API.
pub type Result<T> = std::result::Result<T, LifeError>;

/// Errors raised by `life_engine`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LifeError {
    /// Invalid construction parameters: non-positive dimensions, an
    /// unparseable rule string, or a rule digit outside `1..=8`.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A cell access or pattern blit fell outside the logical grid.
    #[error("position ({row}, {col}) is out of bounds for a {height}x{width} grid")]
    Bounds {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    },
}
