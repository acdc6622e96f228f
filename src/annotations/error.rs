//! Range validation errors

use thiserror::Error;

/// Why a candidate range was refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("Range {start}..{end} is outside the text (length {len})")]
    OutOfBounds { start: i64, end: i64, len: usize },

    #[error("Range {start}..{end} is empty")]
    Empty { start: i64, end: i64 },

    #[error("Range {start}..{end} overlaps annotation {existing}")]
    Overlap {
        start: usize,
        end: usize,
        existing: String,
    },
}
