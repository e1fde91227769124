//! N independent cursors over generator-fed windows.
//!
//! Each row tracks one particle on its own landscape, but all rows
//! share a single window-length budget and a single injected
//! [`Generator`]. Instead of waiting for the caller to supply chunks,
//! a batch extends itself: when any row runs out of range,
//! [`RedrawBatch::set_position`] redraws every row that has drifted
//! within `noffset` of the same edge in one batched generator call,
//! amortizing the cost of the draw.
//!
//! Between redraw events the bracket is a pure function of the fixed
//! block and the position, so replaying a run does not need every
//! intermediate position. The per-row direction tags of each call
//! ([`RedrawBatch::current_redraw`]) form a sparse log: feed the
//! recorded tag vectors to a fresh, identically seeded batch via
//! [`RedrawBatch::force_redraw`], then call `set_position` once with
//! the terminal positions, and the raw buffers, brackets, and indices
//! come back bit-identical.

use log::trace;
use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::generate::Generator;
use crate::search;
use crate::validate::{self, Validate};

/// Direction of a row's most recent redraw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RedrawTag {
    None,
    Left,
    Right,
}

type Rows = SmallVec<[usize; 8]>;

pub struct RedrawBatch<G> {
    nrows: usize,
    /// Window length per row.
    ntot: usize,
    /// Increments retained across a redraw.
    nbuf: usize,
    /// Early-redraw offset: a row within noffset of an edge joins the
    /// batch even before it locks.
    noff: usize,
    proximity: usize,
    validate: Validate,
    draw: G,
    /// Increments, row-major `nrows x ntot`.
    val: Vec<f64>,
    /// Yield positions: per-row running sum of `val`, re-anchored at
    /// every redraw.
    pos: Vec<f64>,
    /// Per-row local bracket index.
    idx: Vec<usize>,
    /// Per-row cumulative index drift: total columns shifted since
    /// construction. `index()` is `idx + idx_offset`.
    idx_offset: Vec<i64>,
    ymin: Vec<f64>,
    ymax: Vec<f64>,
    left: Vec<f64>,
    right: Vec<f64>,
    /// Tags of the most recent call.
    tags: Vec<RedrawTag>,
}

impl<G: Generator> RedrawBatch<G> {
    /// Create a batch with one row per entry of `x`.
    ///
    /// Draws an initial `nrows x ntotal` block of increments, sums it
    /// per row, and re-centers each row so its starting position sits
    /// near the middle of the window, maximizing headroom before the
    /// first redraw.
    pub fn new(
        x: &[f64],
        draw: G,
        ntotal: usize,
        nbuffer: usize,
        noffset: usize,
        validate: Validate,
    ) -> Result<RedrawBatch<G>> {
        if x.is_empty() {
            return Err(Error::EmptyBatch);
        }
        // A single update may never need both a left and a right
        // redraw for the same row, hence 2 * noffset < ntotal.
        if ntotal < 2 || nbuffer > ntotal || noffset > nbuffer || 2 * noffset >= ntotal {
            return Err(Error::BadGeometry {
                ntotal,
                nbuffer,
                noffset,
            });
        }

        let nrows = x.len();
        let mut batch = RedrawBatch {
            nrows,
            ntot: ntotal,
            nbuf: nbuffer,
            noff: noffset,
            proximity: usize::min(search::DEFAULT_PROXIMITY, ntotal),
            validate,
            draw,
            val: Vec::new(),
            pos: vec![0.0; nrows * ntotal],
            idx: vec![0; nrows],
            idx_offset: vec![0; nrows],
            ymin: vec![0.0; nrows],
            ymax: vec![0.0; nrows],
            left: vec![0.0; nrows],
            right: vec![0.0; nrows],
            tags: vec![RedrawTag::None; nrows],
        };

        batch.val = batch.draw_block(nrows, ntotal)?;
        for p in 0..nrows {
            let row = p * ntotal;
            let mut acc = 0.0;
            for j in 0..ntotal {
                acc += batch.val[row + j];
                batch.pos[row + j] = acc;
            }
            // Re-center: put this row's starting position at the mean
            // of its landscape.
            let mean = batch.pos[row..row + ntotal].iter().sum::<f64>() / ntotal as f64;
            let shift = mean - x[p];
            for j in 0..ntotal {
                batch.pos[row + j] -= shift;
            }
        }
        batch.refresh_bounds();

        for p in 0..nrows {
            if x[p] <= batch.ymin[p] || x[p] >= batch.ymax[p] {
                return Err(Error::OutOfRange {
                    x: x[p],
                    ymin: batch.ymin[p],
                    ymax: batch.ymax[p],
                });
            }
            let i = search::full(batch.row(p), x[p]);
            batch.idx[p] = i;
            batch.left[p] = batch.pos[p * ntotal + i];
            batch.right[p] = batch.pos[p * ntotal + i + 1];
        }
        return Ok(batch);
    }

    /// Customise the proximity-search radius (0 disables the shortcut).
    pub fn set_proximity(&mut self, proximity: usize) {
        self.proximity = proximity;
    }

    fn row(&self, p: usize) -> &[f64] {
        return &self.pos[p * self.ntot..(p + 1) * self.ntot];
    }

    fn draw_block(&mut self, rows: usize, cols: usize) -> Result<Vec<f64>> {
        let block = self.draw.draw(rows, cols);
        if block.len() != rows * cols {
            return Err(Error::GeneratorShape {
                expected: rows * cols,
                got: block.len(),
            });
        }
        if self.validate.is_strict() {
            validate::check_positive(&block, cols)?;
        }
        return Ok(block);
    }

    fn refresh_bounds(&mut self) {
        for p in 0..self.nrows {
            self.ymin[p] = self.pos[p * self.ntot];
            self.ymax[p] = self.pos[(p + 1) * self.ntot - 1];
        }
    }

    /// Update every row's position, redrawing windows as needed.
    /// Returns whether any row was redrawn by this call.
    pub fn set_position(&mut self, x: &[f64]) -> Result<bool> {
        if x.len() != self.nrows {
            return Err(Error::RowCountMismatch {
                expected: self.nrows,
                got: x.len(),
            });
        }
        self.tags.fill(RedrawTag::None);

        // Right extension. Any row at or past its upper bound forces a
        // redraw; every row already past column ntot - noff joins the
        // batch while we are at it. With noff == 0 there is no early
        // band and only rows actually at the bound qualify.
        if (0..self.nrows).any(|p| x[p] >= self.ymax[p]) {
            let rows: Rows = (0..self.nrows)
                .filter(|&p| {
                    let edge = if self.noff == 0 {
                        self.ymax[p]
                    } else {
                        self.pos[p * self.ntot + self.ntot - self.noff]
                    };
                    return x[p] >= edge;
                })
                .collect();
            self.redraw_right(&rows)?;
        }

        // Left extension, symmetric.
        if (0..self.nrows).any(|p| x[p] <= self.ymin[p]) {
            let rows: Rows = (0..self.nrows)
                .filter(|&p| x[p] <= self.pos[p * self.ntot + self.noff])
                .collect();
            self.redraw_left(&rows)?;
        }

        // Bracket recomputation. Cheap for untouched rows: their cached
        // bracket usually still holds.
        for p in 0..self.nrows {
            if x[p] <= self.ymin[p] || x[p] >= self.ymax[p] {
                // The position moved across more than one window in a
                // single call.
                return Err(Error::OutOfRange {
                    x: x[p],
                    ymin: self.ymin[p],
                    ymax: self.ymax[p],
                });
            }
            let i = search::from_guess(self.row(p), x[p], self.idx[p], self.proximity);
            self.idx[p] = i;
            self.left[p] = self.pos[p * self.ntot + i];
            self.right[p] = self.pos[p * self.ntot + i + 1];
        }

        return Ok(self.tags.iter().any(|&t| t != RedrawTag::None));
    }

    fn check_rows(&self, rows: &[usize]) -> Result<()> {
        for &p in rows {
            if p >= self.nrows {
                return Err(Error::RowOutOfBounds {
                    row: p,
                    nrows: self.nrows,
                });
            }
        }
        return Ok(());
    }

    /// Redraw the given rows to the right: retain each row's last
    /// `nbuffer` increments as the new head, fill the remainder with
    /// one batched generator call, and advance the drift accumulator.
    ///
    /// Also the replay entry point: feeding recorded row sets here
    /// makes the same generator calls as the run being replayed.
    pub fn redraw_right(&mut self, rows: &[usize]) -> Result<()> {
        self.check_rows(rows)?;
        if rows.is_empty() {
            return Ok(());
        }

        let fresh_cols = self.ntot - self.nbuf;
        let fresh = self.draw_block(rows.len(), fresh_cols)?;
        trace!("redraw right: {} rows, {} fresh columns", rows.len(), fresh_cols);

        for (k, &p) in rows.iter().enumerate() {
            let row = p * self.ntot;

            // New increments: buffered tail, then fresh draws.
            self.val.copy_within(row + fresh_cols..row + self.ntot, row);
            self.val[row + self.nbuf..row + self.ntot]
                .copy_from_slice(&fresh[k * fresh_cols..(k + 1) * fresh_cols]);

            // Re-anchor the running sum at the first retained position.
            let anchor = self.pos[row + fresh_cols];
            self.pos[row] = anchor;
            for j in 1..self.ntot {
                self.pos[row + j] = self.pos[row + j - 1] + self.val[row + j];
            }

            self.idx_offset[p] += fresh_cols as i64;
            self.idx[p] = self.idx[p].saturating_sub(fresh_cols);
            self.tags[p] = RedrawTag::Right;
        }

        self.refresh_bounds();
        return Ok(());
    }

    /// Redraw the given rows to the left: retain each row's first
    /// `nbuffer` increments as the new tail, fill the head with one
    /// batched generator call, and rewind the drift accumulator.
    pub fn redraw_left(&mut self, rows: &[usize]) -> Result<()> {
        self.check_rows(rows)?;
        if rows.is_empty() {
            return Ok(());
        }

        let fresh_cols = self.ntot - self.nbuf;
        let fresh = self.draw_block(rows.len(), fresh_cols)?;
        trace!("redraw left: {} rows, {} fresh columns", rows.len(), fresh_cols);

        for (k, &p) in rows.iter().enumerate() {
            let row = p * self.ntot;

            // New increments: fresh draws, then buffered head.
            self.val.copy_within(row..row + self.nbuf, row + fresh_cols);
            self.val[row..row + fresh_cols]
                .copy_from_slice(&fresh[k * fresh_cols..(k + 1) * fresh_cols]);

            // Re-anchor so the retained region lands left of the old
            // window: start from the old nbuf column minus the full
            // row sum.
            let total: f64 = self.val[row..row + self.ntot].iter().sum();
            let anchor = self.pos[row + self.nbuf] - total;
            self.pos[row] = anchor;
            for j in 1..self.ntot {
                self.pos[row + j] = self.pos[row + j - 1] + self.val[row + j];
            }

            self.idx_offset[p] -= fresh_cols as i64;
            self.idx[p] = usize::min(self.idx[p] + fresh_cols, self.ntot - 1);
            self.tags[p] = RedrawTag::Left;
        }

        self.refresh_bounds();
        return Ok(());
    }

    /// Replay one recorded step: redraw the rows tagged `Right`, then
    /// the rows tagged `Left`, in the same batched calls the organic
    /// path makes.
    pub fn force_redraw(&mut self, tags: &[RedrawTag]) -> Result<()> {
        if tags.len() != self.nrows {
            return Err(Error::RowCountMismatch {
                expected: self.nrows,
                got: tags.len(),
            });
        }
        let right: Rows = (0..self.nrows).filter(|&p| tags[p] == RedrawTag::Right).collect();
        let left: Rows = (0..self.nrows).filter(|&p| tags[p] == RedrawTag::Left).collect();
        self.tags.fill(RedrawTag::None);
        self.redraw_right(&right)?;
        self.redraw_left(&left)?;
        return Ok(());
    }

    /// Per-row direction tags of the most recent call.
    pub fn current_redraw(&self) -> &[RedrawTag] {
        return &self.tags;
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        return self.nrows;
    }

    /// Window length per row.
    pub fn window_len(&self) -> usize {
        return self.ntot;
    }

    /// Yield position directly left of each row's cursor.
    pub fn yield_left(&self) -> Vec<f64> {
        return self.left.clone();
    }

    /// Yield position directly right of each row's cursor.
    pub fn yield_right(&self) -> Vec<f64> {
        return self.right.clone();
    }

    /// Drift-corrected global bracket index per row.
    pub fn index(&self) -> Vec<i64> {
        return (0..self.nrows)
            .map(|p| self.idx_offset[p] + self.idx[p] as i64)
            .collect();
    }

    /// Raw increments, row-major.
    pub fn raw_val(&self) -> Vec<f64> {
        return self.val.clone();
    }

    /// Raw yield positions, row-major.
    pub fn raw_pos(&self) -> Vec<f64> {
        return self.pos.clone();
    }

    /// Raw local bracket indices.
    pub fn raw_idx(&self) -> Vec<usize> {
        return self.idx.clone();
    }

    /// Raw drift accumulators.
    pub fn raw_idx_offset(&self) -> Vec<i64> {
        return self.idx_offset.clone();
    }

    /// Restore raw state captured by the `raw_*` accessors, e.g. from
    /// an external checkpoint. Brackets are recomputed from `idx`.
    pub fn restore(
        &mut self,
        val: Vec<f64>,
        pos: Vec<f64>,
        idx: Vec<usize>,
        idx_offset: Vec<i64>,
    ) -> Result<()> {
        let expected = self.nrows * self.ntot;
        if val.len() != expected || pos.len() != expected {
            return Err(Error::StateShape {
                expected,
                got: if val.len() != expected { val.len() } else { pos.len() },
            });
        }
        if idx.len() != self.nrows || idx_offset.len() != self.nrows {
            return Err(Error::RowCountMismatch {
                expected: self.nrows,
                got: if idx.len() != self.nrows { idx.len() } else { idx_offset.len() },
            });
        }
        for &i in &idx {
            if i + 1 >= self.ntot {
                return Err(Error::OffsetOutOfBounds {
                    offset: i,
                    n: self.ntot,
                });
            }
        }

        self.val = val;
        self.pos = pos;
        self.idx = idx;
        self.idx_offset = idx_offset;
        self.refresh_bounds();
        for p in 0..self.nrows {
            let row = p * self.ntot;
            self.left[p] = self.pos[row + self.idx[p]];
            self.right[p] = self.pos[row + self.idx[p] + 1];
        }
        self.tags.fill(RedrawTag::None);
        return Ok(());
    }
}
