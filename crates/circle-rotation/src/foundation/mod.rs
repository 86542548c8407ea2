//! Foundation Layer - Mathematical Primitives
//!
//! This module defines the fundamental structures from first principles:
//! - Monoid and group axioms, the integer groups used to index actions
//! - Lattice theory and order structures
//! - Homomorphisms into degree-one lifts (group actions)
//! - Exact arbitrary-precision arithmetic and the geometric Cauchy limit

pub mod exactmath;
pub mod group;
pub mod homomorphism;
pub mod lattice;

pub use exactmath::Real;
pub use group::{AbelianGroup, Group, Monoid, Power};
pub use homomorphism::{CommutingPairAction, FnAction, LiftAction, PowerAction};
pub use lattice::Lattice;
