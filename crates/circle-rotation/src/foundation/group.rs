//! Abstract Monoid and Group Theory
//!
//! Defines the axioms from first principles:
//! 1. Closure: ∀ a,b ∈ M: a ○ b ∈ M
//! 2. Associativity: ∀ a,b,c ∈ M: (a ○ b) ○ c = a ○ (b ○ c)
//! 3. Identity: ∃ e ∈ M: ∀ a ∈ M: a ○ e = e ○ a = a
//! 4. Inverse (groups only): ∀ a ∈ G: ∃ a⁻¹ ∈ G: a ○ a⁻¹ = a⁻¹ ○ a = e
//!
//! Degree-one lifts form a monoid under composition; its units form a group.
//! Group actions on lifts are indexed by any type implementing [`Group`].

use std::fmt::Debug;

use crate::lift::DegreeOneLift;

/// Abstract monoid trait
pub trait Monoid: Clone + Eq + Debug {
    /// Monoid operation
    fn op(&self, other: &Self) -> Self;

    /// Identity element
    fn identity() -> Self;

    /// Verify associativity: (a ○ b) ○ c = a ○ (b ○ c)
    fn verify_associativity(&self, b: &Self, c: &Self) -> bool {
        let lhs = self.op(b).op(c);
        let rhs = self.op(&b.op(c));
        lhs == rhs
    }

    /// Verify identity: a ○ e = e ○ a = a
    fn verify_identity(&self) -> bool {
        let e = Self::identity();
        self.op(&e) == *self && e.op(self) == *self
    }
}

/// Abstract group trait
///
/// A group (G, ○) is a monoid in which every element has an inverse.
pub trait Group: Monoid {
    /// Inverse element
    fn inverse(&self) -> Self;

    /// Verify inverse: a ○ a⁻¹ = a⁻¹ ○ a = e
    fn verify_inverse(&self) -> bool {
        let inv = self.inverse();
        let e = Self::identity();
        self.op(&inv) == e && inv.op(self) == e
    }
}

/// Abelian (commutative) group
pub trait AbelianGroup: Group {
    /// Verify commutativity: a ○ b = b ○ a
    fn verify_commutativity(&self, other: &Self) -> bool {
        self.op(other) == other.op(self)
    }
}

impl Monoid for DegreeOneLift {
    fn op(&self, other: &Self) -> Self {
        self.compose(other)
    }

    fn identity() -> Self {
        DegreeOneLift::identity()
    }
}

/// The infinite cyclic group ℤ, written as exponents of a single generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Power(pub i64);

impl Power {
    /// The generator `1`.
    pub const GENERATOR: Power = Power(1);
}

impl Monoid for Power {
    fn op(&self, other: &Self) -> Self {
        Power(self.0.wrapping_add(other.0))
    }

    fn identity() -> Self {
        Power(0)
    }
}

impl Group for Power {
    fn inverse(&self) -> Self {
        Power(self.0.wrapping_neg())
    }
}

impl AbelianGroup for Power {}

/// Direct products are groups componentwise.
impl<A: Monoid, B: Monoid> Monoid for (A, B) {
    fn op(&self, other: &Self) -> Self {
        (self.0.op(&other.0), self.1.op(&other.1))
    }

    fn identity() -> Self {
        (A::identity(), B::identity())
    }
}

impl<A: Group, B: Group> Group for (A, B) {
    fn inverse(&self) -> Self {
        (self.0.inverse(), self.1.inverse())
    }
}

impl<A: AbelianGroup, B: AbelianGroup> AbelianGroup for (A, B) {}
