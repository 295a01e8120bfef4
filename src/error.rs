//! Error types for the gridanova library.
//!
//! One `thiserror` enum covers the whole request lifecycle: grid
//! validation, design feasibility checks, and numeric preconditions in
//! the F-distribution evaluator. Every failure is terminal for its
//! request; the caller only ever sees the message text.

use thiserror::Error;

/// The main error type for the gridanova library.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed or incomplete input grid: a missing or non-numeric cell
    /// value, non-positive dimensions, or an empty dataset.
    #[error("invalid grid: {message}")]
    Validation {
        /// Description of what is invalid.
        message: String,
    },

    /// Two-way design with unequal replicate counts across cells. The
    /// classical two-way decomposition requires a balanced design.
    #[error(
        "unbalanced design: cell ({row}, {col}) has {found} replicate(s), expected {expected}"
    )]
    UnbalancedDesign {
        /// Row index of the offending cell.
        row: usize,
        /// Column index of the offending cell.
        col: usize,
        /// Replicate count established by the first cell.
        expected: usize,
        /// Replicate count actually found.
        found: usize,
    },

    /// Not enough degrees of freedom to estimate error variance, e.g. a
    /// single group in one-way or a single replicate per cell in two-way.
    #[error("underpowered design: {message}")]
    UnderpoweredDesign {
        /// Description of what is missing.
        message: String,
    },

    /// Numeric precondition violated in the F-distribution evaluator.
    /// Unreachable when upstream validation holds.
    #[error("numeric domain error: {message}")]
    Domain {
        /// Description of the violated precondition.
        message: String,
    },
}

/// A specialized `Result` type for gridanova operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Create a new `Validation` error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new `UnderpoweredDesign` error.
    #[must_use]
    pub fn underpowered(message: impl Into<String>) -> Self {
        Self::UnderpoweredDesign {
            message: message.into(),
        }
    }

    /// Create a new `Domain` error.
    #[must_use]
    pub fn domain(message: impl Into<String>) -> Self {
        Self::Domain {
            message: message.into(),
        }
    }
}
