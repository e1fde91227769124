//! Error taxonomy.
//!
//! Three families, none of them recoverable:
//!
//! 1. Precondition violations (malformed chunks, out-of-range reads,
//!    mismatched overlap) - always checked.
//! 2. Bracket-state violations (reading the bracket while the cursor is
//!    locked) - always checked.
//! 3. Generator-contract violations (non-positive increments) - checked
//!    only under [`Validate::Strict`](crate::validate::Validate).
//!
//! All of them indicate a caller or generator bug, so the crate fails
//! loudly instead of returning a stale or undefined bracket.

use thiserror::Error;

use crate::window::Direction;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum Error {
    #[error("chunk holds {n} values, need at least 2")]
    ChunkTooShort { n: usize },

    #[error("chunk is not strictly increasing at offset {offset}")]
    NotIncreasing { offset: usize },

    #[error("position {x} outside the held range ({ymin}, {ymax}]")]
    OutOfRange { x: f64, ymin: f64, ymax: f64 },

    #[error("cursor is locked: supply the next chunk to the {direction}")]
    Locked { direction: Direction },

    #[error("block starting at {istart} cannot extend window [{wstart}, {wstop})")]
    DisjointBlock { istart: i64, wstart: i64, wstop: i64 },

    #[error("retention {nbuffer} exceeds window length {n}")]
    RetentionTooLong { nbuffer: usize, n: usize },

    #[error("overlap mismatch at global index {index}: held {held}, supplied {supplied}")]
    OverlapMismatch { index: i64, held: f64, supplied: f64 },

    #[error("global index {index} outside window [{wstart}, {wstop})")]
    IndexOutOfWindow { index: i64, wstart: i64, wstop: i64 },

    #[error("offset {offset} out of bounds for window of length {n}")]
    OffsetOutOfBounds { offset: usize, n: usize },

    #[error("generator returned {got} values, expected {expected}")]
    GeneratorShape { expected: usize, got: usize },

    #[error("generator produced non-positive increment {value} at row {row}, column {col}")]
    NonPositiveIncrement { row: usize, col: usize, value: f64 },

    #[error("expected {expected} rows, got {got}")]
    RowCountMismatch { expected: usize, got: usize },

    #[error("row {row} out of bounds for batch of {nrows} rows")]
    RowOutOfBounds { row: usize, nrows: usize },

    #[error("restored state holds {got} values, expected {expected}")]
    StateShape { expected: usize, got: usize },

    #[error("batch needs at least one row")]
    EmptyBatch,

    #[error("bad batch geometry: ntotal={ntotal}, nbuffer={nbuffer}, noffset={noffset}")]
    BadGeometry {
        ntotal: usize,
        nbuffer: usize,
        noffset: usize,
    },
}
