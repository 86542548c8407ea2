//! Lattice Theory
//!
//! A lattice is a partial order in which every pair has a least upper bound
//! (join) and a greatest lower bound (meet). Degree-one lifts form a lattice
//! under the pointwise order, with pointwise max and min.

use crate::lift::DegreeOneLift;

/// Lattice trait
pub trait Lattice: Clone + Eq {
    /// Meet operation (greatest lower bound)
    fn meet(&self, other: &Self) -> Self;

    /// Join operation (least upper bound)
    fn join(&self, other: &Self) -> Self;

    /// Partial order
    fn le(&self, other: &Self) -> bool;

    /// Verify join is an upper bound and meet a lower bound
    fn verify_bounds(&self, other: &Self) -> bool {
        let hi = self.join(other);
        let lo = self.meet(other);
        self.le(&hi) && other.le(&hi) && lo.le(self) && lo.le(other)
    }

    /// Verify absorption: a ∨ (a ∧ b) = a and a ∧ (a ∨ b) = a
    fn verify_absorption(&self, other: &Self) -> bool {
        self.join(&self.meet(other)) == *self && self.meet(&self.join(other)) == *self
    }

    /// Verify antisymmetry: a ≤ b ∧ b ≤ a ⇒ a = b
    fn verify_antisymmetry(&self, other: &Self) -> bool {
        !(self.le(other) && other.le(self)) || self == other
    }

    /// Verify that ≤ agrees with join: a ≤ b ⇔ a ∨ b = b
    fn verify_order_consistency(&self, other: &Self) -> bool {
        self.le(other) == (self.join(other) == *other)
    }
}

impl Lattice for DegreeOneLift {
    fn meet(&self, other: &Self) -> Self {
        DegreeOneLift::meet(self, other)
    }

    fn join(&self, other: &Self) -> Self {
        DegreeOneLift::join(self, other)
    }

    fn le(&self, other: &Self) -> bool {
        DegreeOneLift::le(self, other)
    }
}
