//! Landscape - windowed tracking of a position on a sequence of
//! yield positions.
//!
//! A cursor holds a position `x` on a strictly increasing sequence and
//! keeps the bracket around it current: the pair of neighbouring yield
//! positions with `left < x <= right`. The sequence may be complete
//! ([`fixed::Fixed`]), fed chunk by chunk through a sliding window
//! ([`window::Window`]), or extended on demand by a seeded generator
//! for many rows at once ([`batch::RedrawBatch`]).
//!
//! # Quick Start
//!
//! ```
//! use landscape::fixed::Fixed;
//!
//! let y: Vec<f64> = (0..100).map(|i| i as f64).collect();
//! let mut cursor = Fixed::new(5.5, y).unwrap();
//! assert_eq!(cursor.index(), 5);
//!
//! // Updates reuse the previous bracket as a search hint.
//! cursor.set_position(6.2).unwrap();
//! assert_eq!(cursor.left(), 6.0);
//! assert_eq!(cursor.right(), 7.0);
//! ```

pub mod batch;
pub mod error;
pub mod fixed;
pub mod generate;
pub mod search;
pub mod validate;
pub mod window;

pub use error::{Error, Result};
pub use validate::Validate;
