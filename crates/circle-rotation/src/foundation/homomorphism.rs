//! Homomorphisms - Structure-Preserving Maps into Lifts
//!
//! A group action by degree-one lifts is a homomorphism φ: G → Lift:
//! φ(a ○ b) = φ(a) ∘ φ(b) and φ(e) = id.

use std::fmt;

use super::group::{Group, Monoid, Power};
use crate::lift::{DegreeOneLift, Unit};

/// Action of a group `G` on the line by degree-one lifts.
pub trait LiftAction<G: Group> {
    /// Apply homomorphism
    fn act(&self, element: &G) -> DegreeOneLift;

    /// Verify structure preservation: φ(a ○ b) = φ(a) ∘ φ(b)
    fn verify_structure_preservation(&self, a: &G, b: &G) -> bool {
        let lhs = self.act(&a.op(b));
        let rhs = self.act(a).compose(&self.act(b));
        lhs == rhs
    }

    /// Verify identity preservation: φ(e_G) = id
    fn verify_identity_preservation(&self) -> bool {
        self.act(&G::identity()) == DegreeOneLift::identity()
    }
}

/// ℤ acting by integer powers of a single unit.
#[derive(Clone, Debug)]
pub struct PowerAction {
    generator: Unit,
}

impl PowerAction {
    /// Action `n ↦ generator^n`
    pub fn new(generator: Unit) -> Self {
        Self { generator }
    }

    /// The image of `1`.
    pub fn generator(&self) -> &Unit {
        &self.generator
    }
}

impl LiftAction<Power> for PowerAction {
    fn act(&self, element: &Power) -> DegreeOneLift {
        self.generator.zpow(element.0).as_lift().clone()
    }
}

/// Action given by a closure. The caller guarantees the homomorphism laws.
pub struct FnAction<F> {
    action: F,
}

impl<F> FnAction<F> {
    /// Wrap `action`
    pub fn new(action: F) -> Self {
        Self { action }
    }
}

impl<G, F> LiftAction<G> for FnAction<F>
where
    G: Group,
    F: Fn(&G) -> DegreeOneLift,
{
    fn act(&self, element: &G) -> DegreeOneLift {
        (self.action)(element)
    }
}

impl<F> fmt::Debug for FnAction<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnAction")
    }
}

/// ℤ² acting by powers of two commuting units.
#[derive(Clone, Debug)]
pub struct CommutingPairAction {
    first: Unit,
    second: Unit,
}

impl CommutingPairAction {
    /// Returns `None` unless the two units commute.
    pub fn new(first: Unit, second: Unit) -> Option<Self> {
        first
            .as_lift()
            .commutes_with(second.as_lift())
            .then_some(Self { first, second })
    }
}

impl LiftAction<(Power, Power)> for CommutingPairAction {
    fn act(&self, element: &(Power, Power)) -> DegreeOneLift {
        self.first.zpow(element.0 .0).op(&self.second.zpow(element.1 .0)).as_lift().clone()
    }
}
