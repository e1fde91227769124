//! Per-instance validation level.
//!
//! The expensive consistency checks (strict sortedness of supplied
//! chunks, equality of overlapping data, positivity of generated
//! increments) are gated behind a level chosen at construction, so a
//! test can run fully checked against the same build a simulation runs
//! fast.

use crate::error::{Error, Result};

/// How much consistency checking an instance performs.
///
/// Preconditions and bracket-state checks are always on; `Strict` adds
/// the comparatively expensive data checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Validate {
    /// Cheap checks only.
    Fast,
    /// Also verify chunk sortedness, overlap equality, and generator
    /// output positivity.
    Strict,
}

impl Validate {
    pub fn is_strict(self) -> bool {
        return self == Validate::Strict;
    }
}

/// Tolerances for comparing overlapping data, matching the usual
/// `allclose` definition: `|a - b| <= atol + rtol * |b|`.
const RTOL: f64 = 1e-5;
const ATOL: f64 = 1e-8;

pub fn allclose(a: f64, b: f64) -> bool {
    return (a - b).abs() <= ATOL + RTOL * b.abs();
}

/// Check that a chunk is strictly increasing.
pub(crate) fn check_increasing(y: &[f64]) -> Result<()> {
    for i in 1..y.len() {
        if y[i] <= y[i - 1] {
            return Err(Error::NotIncreasing { offset: i });
        }
    }
    return Ok(());
}

/// Check that every generated increment is strictly positive.
pub(crate) fn check_positive(val: &[f64], cols: usize) -> Result<()> {
    for (i, &v) in val.iter().enumerate() {
        if v <= 0.0 {
            return Err(Error::NonPositiveIncrement {
                row: i / cols,
                col: i % cols,
                value: v,
            });
        }
    }
    return Ok(());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increasing_ok() {
        assert!(check_increasing(&[0.0, 1.0, 1.5]).is_ok());
    }

    #[test]
    fn increasing_rejects_ties() {
        let err = check_increasing(&[0.0, 1.0, 1.0]).unwrap_err();
        assert_eq!(err, Error::NotIncreasing { offset: 2 });
    }

    #[test]
    fn positive_reports_row_and_column() {
        let err = check_positive(&[1.0, 1.0, 1.0, 0.0], 2).unwrap_err();
        assert_eq!(
            err,
            Error::NonPositiveIncrement {
                row: 1,
                col: 1,
                value: 0.0
            }
        );
    }

    #[test]
    fn allclose_tolerates_rounding() {
        assert!(allclose(1.0, 1.0 + 1e-12));
        assert!(!allclose(1.0, 1.1));
    }
}
