//! Error types for the fallible edges of the crate.
//!
//! The simulation itself never fails: illegal inputs are ignored. Only
//! configuration loading, restoring a saved grid and high score persistence
//! can return errors.

use std::fmt;

/// Errors produced while loading or validating [`crate::Tuning`].
#[derive(Debug)]
pub enum TuningError {
    /// The JSON document could not be parsed.
    Parse(serde_json::Error),

    /// A value is outside the range the simulation can work with.
    OutOfRange {
        /// Name of the field (for logging).
        field: &'static str,
        /// The value that was rejected.
        value: f64,
        /// Human-readable description of the accepted range.
        expected: &'static str,
    },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(e) => write!(f, "failed to parse tuning: {}", e),
            TuningError::OutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "tuning field '{}' = {} is out of range (expected {})",
                field, value, expected
            ),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(e) => Some(e),
            TuningError::OutOfRange { .. } => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}

/// Convenience alias: a `Result` using `TuningError` as the error type.
pub type TuningResult<T> = Result<T, TuningError>;

/// Errors found while restoring a saved [`crate::sim::HexGrid`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// A stored row does not have one slot per column.
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },

    /// A resident bubble records a cell other than the one it is stored in.
    CellMismatch { row: usize, col: usize },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::RaggedRow { row, len, expected } => write!(
                f,
                "grid row {} has {} cells (expected {})",
                row, len, expected
            ),
            GridError::CellMismatch { row, col } => {
                write!(f, "bubble at ({}, {}) is attached to a different cell", row, col)
            }
        }
    }
}

impl std::error::Error for GridError {}

/// Errors produced by high score stores.
#[derive(Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    Io(std::io::Error),

    /// Stored data is not a valid high score record.
    Format(serde_json::Error),

    /// No location is available to store data (no data dir, no LocalStorage).
    Unavailable(&'static str),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "high score I/O failed: {}", e),
            StoreError::Format(e) => write!(f, "high score data is malformed: {}", e),
            StoreError::Unavailable(what) => write!(f, "high score storage unavailable: {}", what),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Format(e) => Some(e),
            StoreError::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Format(e)
    }
}

/// Convenience alias: a `Result` using `StoreError` as the error type.
pub type StoreResult<T> = Result<T, StoreError>;
