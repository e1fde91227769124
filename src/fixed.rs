//! Cursor over a complete, unchanging sequence.
//!
//! The degenerate case of the sliding variants: the whole landscape is
//! known upfront, so there is no shifting, no lock state, and no
//! generator. Kept as the minimal correct reference and as a building
//! block for tests. Shares the open-`(`-closed-`]` bracket convention
//! of [`Window`](crate::window::Window).

use crate::error::{Error, Result};
use crate::search;
use crate::validate;

pub struct Fixed {
    x: f64,
    y: Vec<f64>,
    li: usize,
    left: f64,
    right: f64,
    proximity: usize,
}

impl Fixed {
    /// Create a cursor at `x` over the full sequence `y`.
    ///
    /// `y` must be strictly increasing and `x` must lie inside
    /// `(y[0], y[n - 1]]`.
    pub fn new(x: f64, y: Vec<f64>) -> Result<Fixed> {
        if y.len() < 2 {
            return Err(Error::ChunkTooShort { n: y.len() });
        }
        validate::check_increasing(&y)?;

        let ymin = y[0];
        let ymax = y[y.len() - 1];
        if x <= ymin || x > ymax {
            return Err(Error::OutOfRange { x, ymin, ymax });
        }

        let li = search::full(&y, x);
        let proximity = usize::min(search::DEFAULT_PROXIMITY, y.len());
        return Ok(Fixed {
            x,
            left: y[li],
            right: y[li + 1],
            li,
            y,
            proximity,
        });
    }

    /// Customise the proximity-search radius (0 disables the shortcut).
    pub fn set_proximity(&mut self, proximity: usize) {
        self.proximity = usize::min(proximity, self.y.len());
    }

    /// Move the cursor. Fails, leaving the cursor untouched, when `x`
    /// leaves the sequence.
    pub fn set_position(&mut self, x: f64) -> Result<()> {
        let ymin = self.y[0];
        let ymax = self.y[self.y.len() - 1];
        if x <= ymin || x > ymax {
            return Err(Error::OutOfRange { x, ymin, ymax });
        }

        self.x = x;
        self.li = search::from_guess(&self.y, x, self.li, self.proximity);
        self.left = self.y[self.li];
        self.right = self.y[self.li + 1];
        return Ok(());
    }

    /// The current query position.
    pub fn position(&self) -> f64 {
        return self.x;
    }

    /// Bracket index: `y()[index()] < x <= y()[index() + 1]`.
    pub fn index(&self) -> usize {
        return self.li;
    }

    /// Yield position directly left of the cursor.
    pub fn left(&self) -> f64 {
        return self.left;
    }

    /// Yield position directly right of the cursor.
    pub fn right(&self) -> f64 {
        return self.right;
    }

    /// Yield position `offset` brackets left of the cursor.
    pub fn left_offset(&self, offset: usize) -> Result<f64> {
        if offset > self.li {
            return Err(Error::OffsetOutOfBounds {
                offset,
                n: self.y.len(),
            });
        }
        return Ok(self.y[self.li - offset]);
    }

    /// Yield position `offset` brackets right of the cursor.
    pub fn right_offset(&self, offset: usize) -> Result<f64> {
        if self.li + 1 + offset >= self.y.len() {
            return Err(Error::OffsetOutOfBounds {
                offset,
                n: self.y.len(),
            });
        }
        return Ok(self.y[self.li + 1 + offset]);
    }

    /// Number of yield positions held.
    pub fn len(&self) -> usize {
        return self.y.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.y.is_empty();
    }

    /// Copy of the sequence.
    pub fn y(&self) -> Vec<f64> {
        return self.y.clone();
    }
}
