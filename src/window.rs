//! Sliding window over a sequence supplied in chunks.
//!
//! The landscape is conceptually unbounded; only the slice covering
//! global indices `[istart, istop)` is held. The external driver sets
//! the cursor with [`Window::set_x`], and when the position runs off
//! the held range the window locks and reports which direction the
//! next chunk must extend. The driver then supplies that chunk through
//! one of the shift operations, either as absolute yield positions
//! (`*_y`) or as consecutive differences (`*_dy`), with a retention
//! count that preserves already-visited values so small reversals stay
//! cheap.
//!
//! Global indices are signed: sliding left past the origin is
//! perfectly legal.
//!
//! Chunks only need to cover what the window is missing. A supplied
//! block that lies entirely within the held range is ignored, and a
//! block reaching past the retained edge replaces the window
//! wholesale. Under [`Validate::Strict`] any region where held and
//! supplied data overlap is checked for equality, which catches a
//! driver handing out inconsistent chunks.

use log::debug;

use crate::error::{Error, Result};
use crate::search;
use crate::validate::{self, Validate};

/// Which way the window must extend before the bracket is readable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        };
    }
}

/// Outcome of a position update.
///
/// A locked cursor has no bracket; the caller must handle the
/// direction before any bracket accessor will succeed again.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Position {
    Unlocked { left: f64, right: f64 },
    Locked(Direction),
}

impl Position {
    pub fn is_locked(&self) -> bool {
        return matches!(self, Position::Locked(_));
    }
}

pub struct Window {
    x: f64,
    y: Vec<f64>,
    /// Local bracket index; meaningless while locked.
    li: usize,
    istart: i64,
    istop: i64,
    /// Left-most value of the most recently supplied block; with a
    /// retention buffer this is generally not `ymin()`. Drivers log it
    /// as a restore anchor.
    ymin_data: f64,
    left: f64,
    right: f64,
    lock: Option<Direction>,
    /// Ignore the cached bracket on the next lookup. Set by every
    /// window mutation.
    full_search: bool,
    proximity: usize,
    validate: Validate,
}

/// Splice for a right shift: the retained tail of the old window
/// followed by the unseen part of the block.
fn splice_right(old: &[f64], block: &[f64], retain: usize, skip: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(retain + block.len() - skip);
    out.extend_from_slice(&old[old.len() - retain..]);
    out.extend_from_slice(&block[skip..]);
    return out;
}

/// Splice for a left shift: the unseen part of the block followed by
/// the retained head of the old window.
fn splice_left(old: &[f64], block: &[f64], retain: usize, skip: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(retain + block.len() - skip);
    out.extend_from_slice(&block[..block.len() - skip]);
    out.extend_from_slice(&old[..retain]);
    return out;
}

/// Running sum of a block of differences.
fn cumsum(dy: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(dy.len());
    let mut acc = 0.0;
    for &d in dy {
        acc += d;
        out.push(acc);
    }
    return out;
}

impl Window {
    /// Create a window holding the chunk `y` whose first value has
    /// global index `istart`, with the cursor at `x`.
    pub fn new(x: f64, istart: i64, y: Vec<f64>, validate: Validate) -> Result<Window> {
        let mut window = Window {
            x,
            y: Vec::new(),
            li: 0,
            istart: 0,
            istop: 0,
            ymin_data: 0.0,
            left: 0.0,
            right: 0.0,
            lock: None,
            full_search: true,
            proximity: search::DEFAULT_PROXIMITY,
            validate,
        };
        window.set_y(istart, y)?;
        return Ok(window);
    }

    /// Customise the proximity-search radius (0 disables the shortcut).
    pub fn set_proximity(&mut self, proximity: usize) {
        self.proximity = proximity;
    }

    /// Overwrite the held chunk wholesale.
    pub fn set_y(&mut self, istart: i64, y: Vec<f64>) -> Result<()> {
        if y.len() < 2 {
            return Err(Error::ChunkTooShort { n: y.len() });
        }
        if self.validate.is_strict() {
            validate::check_increasing(&y)?;
        }

        self.ymin_data = y[0];
        self.y = y;
        self.istart = istart;
        self.istop = istart + self.y.len() as i64;
        debug!(
            "window replaced: [{}, {}) holding {} values",
            self.istart,
            self.istop,
            self.y.len()
        );

        self.full_search = true;
        self.update();
        return Ok(());
    }

    /// Check the supplied block against the held window wherever the
    /// two overlap.
    fn check_overlap(&self, istart: i64, y: &[f64]) -> Result<()> {
        let lo = i64::max(istart, self.istart);
        let hi = i64::min(istart + y.len() as i64, self.istop);
        for g in lo..hi {
            let held = self.y[(g - self.istart) as usize];
            let supplied = y[(g - istart) as usize];
            if !validate::allclose(held, supplied) {
                return Err(Error::OverlapMismatch {
                    index: g,
                    held,
                    supplied,
                });
            }
        }
        return Ok(());
    }

    /// Right-shift with a block of yield positions whose first value
    /// has global index `istart`, retaining the right-most `nbuffer`
    /// values of the current window.
    pub fn rshift_y(&mut self, istart: i64, y: &[f64], nbuffer: usize) -> Result<()> {
        if y.is_empty() {
            return Err(Error::ChunkTooShort { n: 0 });
        }
        if istart < self.istart || istart > self.istop {
            return Err(Error::DisjointBlock {
                istart,
                wstart: self.istart,
                wstop: self.istop,
            });
        }
        if self.validate.is_strict() {
            self.check_overlap(istart, y)?;
        }

        let istop_new = istart + y.len() as i64;
        if istop_new <= self.istop {
            // Already held in full.
            return Ok(());
        }

        // Pin the trailing edge nbuffer positions inside the old bound.
        let retained_start = self.istop - nbuffer as i64;
        if istart <= retained_start {
            return self.set_y(istart, y.to_vec());
        }

        if nbuffer > self.y.len() {
            return Err(Error::RetentionTooLong {
                nbuffer,
                n: self.y.len(),
            });
        }
        if self.validate.is_strict() {
            validate::check_increasing(y)?;
        }

        self.ymin_data = y[0];
        let skip = (self.istop - istart) as usize;
        self.y = splice_right(&self.y, y, nbuffer, skip);
        self.istart = retained_start;
        self.istop = istop_new;
        debug!(
            "window shifted right: [{}, {}) retaining {}",
            self.istart, self.istop, nbuffer
        );

        self.full_search = true;
        self.update();
        return Ok(());
    }

    /// Right-shift with a block of yield distances. `dy[k]` is the
    /// distance between global positions `istart + k` and
    /// `istart + k - 1`; the block is integrated anchored to the value
    /// already held at the overlap boundary, so repeated re-anchoring
    /// cannot drift.
    pub fn rshift_dy(&mut self, istart: i64, dy: &[f64], nbuffer: usize) -> Result<()> {
        if dy.is_empty() {
            return Err(Error::ChunkTooShort { n: 0 });
        }
        if istart < self.istart || istart > self.istop {
            return Err(Error::DisjointBlock {
                istart,
                wstart: self.istart,
                wstop: self.istop,
            });
        }

        let istop_new = istart + dy.len() as i64;
        if istop_new <= self.istop {
            return Ok(());
        }

        let mut y = cumsum(dy);
        let last = self.y[self.y.len() - 1];
        let anchor = if istart == self.istop {
            // The block follows directly: dy[0] leads away from the
            // current right-most value.
            last
        } else {
            last - y[(self.istop - 1 - istart) as usize]
        };
        for v in &mut y {
            *v += anchor;
        }

        return self.rshift_y(istart, &y, nbuffer);
    }

    /// Left-shift with a block of yield positions, retaining the
    /// left-most `nbuffer` values of the current window.
    pub fn lshift_y(&mut self, istart: i64, y: &[f64], nbuffer: usize) -> Result<()> {
        if y.is_empty() {
            return Err(Error::ChunkTooShort { n: 0 });
        }
        let istop_new = istart + y.len() as i64;
        if istart > self.istart || istop_new < self.istart {
            return Err(Error::DisjointBlock {
                istart,
                wstart: self.istart,
                wstop: self.istop,
            });
        }
        if self.validate.is_strict() {
            self.check_overlap(istart, y)?;
        }

        if istart >= self.istart && istop_new <= self.istop {
            return Ok(());
        }

        // Pin the leading edge nbuffer positions inside the old bound.
        let retained_stop = self.istart + nbuffer as i64;
        if istop_new >= retained_stop {
            return self.set_y(istart, y.to_vec());
        }

        if nbuffer > self.y.len() {
            return Err(Error::RetentionTooLong {
                nbuffer,
                n: self.y.len(),
            });
        }
        if self.validate.is_strict() {
            validate::check_increasing(y)?;
        }

        self.ymin_data = y[0];
        let skip = (istop_new - self.istart) as usize;
        self.y = splice_left(&self.y, y, nbuffer, skip);
        self.istart = istart;
        self.istop = retained_stop;
        debug!(
            "window shifted left: [{}, {}) retaining {}",
            self.istart, self.istop, nbuffer
        );

        self.full_search = true;
        self.update();
        return Ok(());
    }

    /// Left-shift with a block of yield distances, anchored to the
    /// value already held at the overlap boundary.
    pub fn lshift_dy(&mut self, istart: i64, dy: &[f64], nbuffer: usize) -> Result<()> {
        if dy.is_empty() {
            return Err(Error::ChunkTooShort { n: 0 });
        }
        let istop_new = istart + dy.len() as i64;
        if istop_new <= self.istart || istop_new > self.istop {
            return Err(Error::DisjointBlock {
                istart,
                wstart: self.istart,
                wstop: self.istop,
            });
        }

        let mut y = cumsum(dy);
        // The last integrated value lands on global index istop_new - 1,
        // which the window still holds.
        let anchor = self.y[(istop_new - 1 - self.istart) as usize] - y[y.len() - 1];
        for v in &mut y {
            *v += anchor;
        }

        return self.lshift_y(istart, &y, nbuffer);
    }

    /// Shift either direction, dispatching on whether the block starts
    /// before the current window.
    pub fn shift_y(&mut self, istart: i64, y: &[f64], nbuffer: usize) -> Result<()> {
        if istart < self.istart {
            return self.lshift_y(istart, y, nbuffer);
        }
        return self.rshift_y(istart, y, nbuffer);
    }

    /// [`shift_y`](Window::shift_y) for yield distances.
    pub fn shift_dy(&mut self, istart: i64, dy: &[f64], nbuffer: usize) -> Result<()> {
        if istart < self.istart {
            return self.lshift_dy(istart, dy, nbuffer);
        }
        return self.rshift_dy(istart, dy, nbuffer);
    }

    /// Right-shift with a block that follows the window directly:
    /// `y[0]` has global index `istop()`.
    pub fn rshift_y_next(&mut self, y: &[f64], nbuffer: usize) -> Result<()> {
        return self.rshift_y(self.istop, y, nbuffer);
    }

    /// Right-shift with a block of yield distances following the
    /// window directly: `dy[0]` leads away from `ymax()`.
    pub fn rshift_dy_next(&mut self, dy: &[f64], nbuffer: usize) -> Result<()> {
        return self.rshift_dy(self.istop, dy, nbuffer);
    }

    /// Left-shift with a block that ends directly before the window:
    /// its last value has global index `istart() - 1`.
    pub fn lshift_y_prev(&mut self, y: &[f64], nbuffer: usize) -> Result<()> {
        return self.lshift_y(self.istart - y.len() as i64, y, nbuffer);
    }

    /// Left-shift with a block of yield distances whose last distance
    /// leads into `istart()`. The integrated block ends on the held
    /// left-most value, a one-value overlap that anchors it.
    pub fn lshift_dy_prev(&mut self, dy: &[f64], nbuffer: usize) -> Result<()> {
        return self.lshift_dy(self.istart - dy.len() as i64 + 1, dy, nbuffer);
    }

    /// Move the cursor. The returned state is the only way back to an
    /// unlocked bracket: on `Locked`, supply a chunk in the reported
    /// direction.
    pub fn set_x(&mut self, x: f64) -> Position {
        self.x = x;
        return self.update();
    }

    fn update(&mut self) -> Position {
        let n = self.y.len();
        if self.x <= self.y[0] {
            self.lock = Some(Direction::Left);
        } else if self.x > self.y[n - 1] {
            self.lock = Some(Direction::Right);
        } else {
            self.lock = None;
        }

        if let Some(direction) = self.lock {
            return Position::Locked(direction);
        }

        if self.full_search {
            self.li = search::full(&self.y, self.x);
            self.full_search = false;
        } else {
            self.li = search::from_guess(&self.y, self.x, self.li, self.proximity);
        }
        self.left = self.y[self.li];
        self.right = self.y[self.li + 1];
        return Position::Unlocked {
            left: self.left,
            right: self.right,
        };
    }

    /// The current cursor state, without moving anything.
    pub fn bracket(&self) -> Position {
        if let Some(direction) = self.lock {
            return Position::Locked(direction);
        }
        return Position::Unlocked {
            left: self.left,
            right: self.right,
        };
    }

    /// Direction of the pending extension, if the cursor is locked.
    pub fn redraw(&self) -> Option<Direction> {
        return self.lock;
    }

    /// Direction a trial position would lock towards, without moving
    /// the cursor.
    pub fn redraw_trial(&self, x: f64) -> Option<Direction> {
        if x <= self.y[0] {
            return Some(Direction::Left);
        }
        if x > self.y[self.y.len() - 1] {
            return Some(Direction::Right);
        }
        return None;
    }

    /// The current query position.
    pub fn x(&self) -> f64 {
        return self.x;
    }

    /// Global index of the window's first value.
    pub fn istart(&self) -> i64 {
        return self.istart;
    }

    /// Global one-past-the-end index of the window.
    pub fn istop(&self) -> i64 {
        return self.istop;
    }

    /// Number of values held.
    pub fn len(&self) -> usize {
        return self.y.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.y.is_empty();
    }

    /// Left-most held value.
    pub fn ymin(&self) -> f64 {
        return self.y[0];
    }

    /// Right-most held value.
    pub fn ymax(&self) -> f64 {
        return self.y[self.y.len() - 1];
    }

    /// Left-most value of the most recently supplied block. With a
    /// retention buffer this is generally above [`ymin`](Window::ymin),
    /// and for delta-supplied blocks it is not otherwise known to the
    /// caller.
    pub fn ymin_chunk(&self) -> f64 {
        return self.ymin_data;
    }

    /// Copy of the held chunk.
    pub fn y(&self) -> Vec<f64> {
        return self.y.clone();
    }

    /// Value at global index `i`.
    pub fn value(&self, i: i64) -> Result<f64> {
        if i < self.istart || i >= self.istop {
            return Err(Error::IndexOutOfWindow {
                index: i,
                wstart: self.istart,
                wstop: self.istop,
            });
        }
        return Ok(self.y[(i - self.istart) as usize]);
    }

    /// Values along the global slice `[start, stop)`.
    pub fn values(&self, start: i64, stop: i64) -> Result<Vec<f64>> {
        if start > stop || start < self.istart || stop > self.istop {
            return Err(Error::IndexOutOfWindow {
                index: if start < self.istart { start } else { stop },
                wstart: self.istart,
                wstop: self.istop,
            });
        }
        let a = (start - self.istart) as usize;
        let b = (stop - self.istart) as usize;
        return Ok(self.y[a..b].to_vec());
    }

    fn bracket_read(&self) -> Result<()> {
        if let Some(direction) = self.lock {
            return Err(Error::Locked { direction });
        }
        return Ok(());
    }

    /// Signed global index of the yield position directly left of the
    /// cursor. Generally not the index within the held chunk.
    pub fn i(&self) -> Result<i64> {
        self.bracket_read()?;
        return Ok(self.istart + self.li as i64);
    }

    /// Bracket index relative to the held chunk: `i() - istart()`.
    pub fn i_chunk(&self) -> Result<usize> {
        self.bracket_read()?;
        return Ok(self.li);
    }

    /// Yield position directly left of the cursor.
    pub fn yleft(&self) -> Result<f64> {
        self.bracket_read()?;
        return Ok(self.left);
    }

    /// Yield position directly right of the cursor.
    pub fn yright(&self) -> Result<f64> {
        self.bracket_read()?;
        return Ok(self.right);
    }

    /// Yield position `offset` brackets left of the cursor.
    pub fn yleft_offset(&self, offset: usize) -> Result<f64> {
        self.bracket_read()?;
        if offset > self.li {
            return Err(Error::OffsetOutOfBounds {
                offset,
                n: self.y.len(),
            });
        }
        return Ok(self.y[self.li - offset]);
    }

    /// Yield position `offset` brackets right of the cursor.
    pub fn yright_offset(&self, offset: usize) -> Result<f64> {
        self.bracket_read()?;
        if self.li + 1 + offset >= self.y.len() {
            return Err(Error::OffsetOutOfBounds {
                offset,
                n: self.y.len(),
            });
        }
        return Ok(self.y[self.li + 1 + offset]);
    }

    /// There are at least `n` yield positions left of the bracket.
    /// False while locked: use this to extend the window before the
    /// cursor runs out of range.
    pub fn inbounds_left(&self, n: usize) -> bool {
        if self.lock.is_some() {
            return false;
        }
        return self.li >= n;
    }

    /// There are at least `n` yield positions right of the bracket.
    pub fn inbounds_right(&self, n: usize) -> bool {
        if self.lock.is_some() {
            return false;
        }
        return self.li + n + 1 < self.y.len();
    }

    pub fn inbounds(&self, n: usize) -> bool {
        return self.inbounds_left(n) && self.inbounds_right(n);
    }
}
