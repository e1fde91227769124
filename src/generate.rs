//! Increment generators.
//!
//! A [`RedrawBatch`](crate::batch::RedrawBatch) materializes its
//! windows by asking a generator for blocks of yield distances. The
//! contract: given a requested shape, return `rows * cols` freshly
//! generated values, row-major, strictly positive when interpreted as
//! increments, and reproducible from the generator's own seed/state
//! for a fixed call sequence.
//!
//! Every generator owns its state outright; there is no process-global
//! seed. Two batches that must evolve independently each get their own
//! generator, and replaying a batch means constructing a generator
//! from the same seed.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// Source of yield-distance blocks.
///
/// Stateful and non-re-entrant: the caller invokes `draw`
/// synchronously from a single thread.
pub trait Generator {
    /// Produce a row-major `rows x cols` block of increments.
    fn draw(&mut self, rows: usize, cols: usize) -> Vec<f64>;
}

/// The same distance in every slot: an equally spaced landscape.
///
/// Deterministic without any seed, which makes it the workhorse of the
/// tests: every bracket is predictable by arithmetic.
#[derive(Clone, Copy, Debug)]
pub struct Constant {
    scale: f64,
}

impl Constant {
    pub fn new(scale: f64) -> Constant {
        return Constant { scale };
    }
}

impl Generator for Constant {
    fn draw(&mut self, rows: usize, cols: usize) -> Vec<f64> {
        return vec![self.scale; rows * cols];
    }
}

/// Uniformly distributed distances `scale * U(0, 1)` from an owned,
/// seeded PCG stream.
#[derive(Clone, Debug)]
pub struct Uniform {
    scale: f64,
    rng: Pcg64Mcg,
}

impl Uniform {
    pub fn new(seed: u64) -> Uniform {
        return Uniform::with_scale(seed, 1.0);
    }

    pub fn with_scale(seed: u64, scale: f64) -> Uniform {
        return Uniform {
            scale,
            rng: Pcg64Mcg::seed_from_u64(seed),
        };
    }
}

impl Generator for Uniform {
    fn draw(&mut self, rows: usize, cols: usize) -> Vec<f64> {
        let mut out = Vec::with_capacity(rows * cols);
        for _ in 0..rows * cols {
            out.push(self.scale * self.rng.r#gen::<f64>());
        }
        return out;
    }
}

/// Adapter turning a closure into a [`Generator`].
pub struct FromFn<F> {
    f: F,
}

/// Wrap a `FnMut(rows, cols) -> Vec<f64>` closure as a generator.
pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: FnMut(usize, usize) -> Vec<f64>,
{
    return FromFn { f };
}

impl<F> Generator for FromFn<F>
where
    F: FnMut(usize, usize) -> Vec<f64>,
{
    fn draw(&mut self, rows: usize, cols: usize) -> Vec<f64> {
        return (self.f)(rows, cols);
    }
}
