//! Lift Layer - Degree-One Lifts of Circle Maps
//!
//! - **piecewise**: exact piecewise-linear tables on the fundamental domain
//! - **degree_one**: the lift monoid and its pointwise lattice
//! - **unit**: the group of invertible lifts

pub mod degree_one;
pub mod piecewise;
pub mod unit;

pub use degree_one::{bounded_by_translation, commutes_with_integer_shift, DegreeOneLift};
pub use piecewise::{Piece, PiecewiseLinear};
pub use unit::Unit;
