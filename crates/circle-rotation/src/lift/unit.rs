//! Units: Invertible Degree-One Lifts
//!
//! The invertible elements of the composition monoid are exactly the lifts
//! of circle homeomorphisms. A [`Unit`] carries its inverse explicitly so
//! group operations never have to re-derive it.

use std::fmt;

use super::degree_one::DegreeOneLift;
use super::piecewise::PiecewiseLinear;
use crate::foundation::exactmath::Real;
use crate::foundation::group::{Group, Monoid};
use crate::Error;

/// A bijective degree-one lift together with its inverse.
#[derive(Clone)]
pub struct Unit {
    forward: DegreeOneLift,
    inverse: DegreeOneLift,
}

impl Unit {
    pub(crate) fn from_parts(forward: DegreeOneLift, inverse: DegreeOneLift) -> Self {
        Self { forward, inverse }
    }

    /// `y ↦ x + y`. The map `x ↦ translation(x)` is a homomorphism from the
    /// additive reals into the units.
    pub fn translation(x: Real) -> Self {
        let back = -&x;
        Self {
            forward: DegreeOneLift::from_table(PiecewiseLinear::translation(x)),
            inverse: DegreeOneLift::from_table(PiecewiseLinear::translation(back)),
        }
    }

    /// The underlying lift.
    pub fn as_lift(&self) -> &DegreeOneLift {
        &self.forward
    }

    /// The inverse lift.
    pub fn inverse_lift(&self) -> &DegreeOneLift {
        &self.inverse
    }

    /// Evaluate at `x`.
    pub fn apply(&self, x: &Real) -> Real {
        self.forward.apply(x)
    }

    /// Integer power; negative exponents iterate the inverse.
    pub fn zpow(&self, n: i64) -> Self {
        let k = n.unsigned_abs();
        let (forward, inverse) = if n >= 0 {
            (self.forward.iterate_pow(k), self.inverse.iterate_pow(k))
        } else {
            (self.inverse.iterate_pow(k), self.forward.iterate_pow(k))
        };
        Self { forward, inverse }
    }

    /// `self ∘ g ∘ self⁻¹`
    pub fn conjugate(&self, g: &DegreeOneLift) -> DegreeOneLift {
        self.forward.compose(g).compose(&self.inverse)
    }

    /// `self ∘ u ∘ self⁻¹` as a unit.
    pub fn conjugate_unit(&self, u: &Unit) -> Unit {
        self.op(u).op(&self.inverse())
    }
}

impl Monoid for Unit {
    fn op(&self, other: &Self) -> Self {
        Self {
            forward: self.forward.compose(&other.forward),
            inverse: other.inverse.compose(&self.inverse),
        }
    }

    fn identity() -> Self {
        Self {
            forward: DegreeOneLift::identity(),
            inverse: DegreeOneLift::identity(),
        }
    }
}

impl Group for Unit {
    fn inverse(&self) -> Self {
        Self {
            forward: self.inverse.clone(),
            inverse: self.forward.clone(),
        }
    }
}

impl TryFrom<DegreeOneLift> for Unit {
    type Error = Error;

    fn try_from(lift: DegreeOneLift) -> Result<Self, Error> {
        lift.as_unit().ok_or_else(|| {
            let reason = if lift.is_continuous() {
                "flat piece, map is not injective"
            } else {
                "jump discontinuity, map is not surjective"
            };
            Error::NotInvertible(reason.to_string())
        })
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.forward == other.forward
    }
}

impl Eq for Unit {}

impl std::hash::Hash for Unit {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.forward.hash(state);
    }
}

impl fmt::Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Unit").field(&self.forward).finish()
    }
}
