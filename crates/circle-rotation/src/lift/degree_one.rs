//! Degree-One Lifts
//!
//! A degree-one lift is a monotone map `f: ℝ → ℝ` with `f(x + 1) = f(x) + 1`,
//! the lift of a monotone degree-one self-map of the circle. Lifts form a
//! monoid under composition and a lattice under the pointwise order.

use std::fmt;
use std::sync::{Arc, OnceLock};

use num_traits::Zero;

use super::piecewise::{Piece, PiecewiseLinear};
use super::unit::Unit;
use crate::foundation::exactmath::Real;
use crate::Result;

/// Immutable degree-one lift. Cloning shares the underlying table.
#[derive(Clone)]
pub struct DegreeOneLift {
    inner: Arc<LiftInner>,
}

struct LiftInner {
    table: PiecewiseLinear,
    /// Translation number, once it has been determined exactly.
    exact_rotation: OnceLock<Real>,
}

impl DegreeOneLift {
    /// Continuous lift interpolating `(x_i, y_i)` on `[0, 1)`.
    ///
    /// The first point must sit at `x = 0`; the table is closed by
    /// `(1, y_0 + 1)`. Rejects decreasing data.
    pub fn from_breakpoints(points: &[(Real, Real)]) -> Result<Self> {
        Ok(Self::from_table(PiecewiseLinear::interpolate(points)?))
    }

    /// Lift from explicit linear pieces, jumps allowed at piece boundaries.
    ///
    /// Rejects tables that decrease anywhere or overshoot `f(0) + 1`.
    pub fn from_pieces(pieces: Vec<Piece>) -> Result<Self> {
        Ok(Self::from_table(PiecewiseLinear::new(pieces)?))
    }

    pub(crate) fn from_table(table: PiecewiseLinear) -> Self {
        Self {
            inner: Arc::new(LiftInner {
                table,
                exact_rotation: OnceLock::new(),
            }),
        }
    }

    /// The identity map, unit of the composition monoid.
    pub fn identity() -> Self {
        Self::from_table(PiecewiseLinear::translation(Real::zero()))
    }

    /// The translation `y ↦ x + y` as a unit.
    pub fn translate(x: Real) -> Unit {
        Unit::translation(x)
    }

    /// Evaluate at `x`.
    pub fn apply(&self, x: &Real) -> Real {
        self.inner.table.eval(x)
    }

    /// Underlying normalized table.
    pub fn table(&self) -> &PiecewiseLinear {
        &self.inner.table
    }

    /// `self ∘ other`, i.e. `x ↦ self(other(x))`.
    pub fn compose(&self, other: &Self) -> Self {
        Self::from_table(self.inner.table.compose(&other.inner.table))
    }

    /// Pointwise order: `self(x) ≤ other(x)` for all `x`.
    pub fn le(&self, other: &Self) -> bool {
        self.inner.table.le(&other.inner.table)
    }

    /// Sup-norm distance `sup_x |self(x) - other(x)|`, computed exactly.
    pub fn distance(&self, other: &Self) -> Real {
        self.inner.table.distance(&other.inner.table)
    }

    /// Pointwise maximum.
    pub fn join(&self, other: &Self) -> Self {
        Self::from_table(self.inner.table.join(&other.inner.table))
    }

    /// Pointwise minimum.
    pub fn meet(&self, other: &Self) -> Self {
        Self::from_table(self.inner.table.meet(&other.inner.table))
    }

    /// `n`-fold self-composition, by repeated squaring.
    pub fn iterate_pow(&self, n: u64) -> Self {
        let mut result = Self::identity();
        let mut base = self.clone();
        let mut n = n;
        while n > 0 {
            if n & 1 == 1 {
                result = result.compose(&base);
            }
            n >>= 1;
            if n > 0 {
                base = base.compose(&base);
            }
        }
        result
    }

    /// `n`-fold iterate applied to a single point.
    pub fn iterate_at(&self, x: &Real, n: u64) -> Real {
        let mut y = x.clone();
        for _ in 0..n {
            y = self.apply(&y);
        }
        y
    }

    /// Safe downcast to the group of units. `None` unless the map is a
    /// bijection of the line (continuous and strictly increasing).
    pub fn as_unit(&self) -> Option<Unit> {
        let inverse = self.inner.table.inverse()?;
        Some(Unit::from_parts(self.clone(), Self::from_table(inverse)))
    }

    /// `self ∘ other == other ∘ self`.
    pub fn commutes_with(&self, other: &Self) -> bool {
        self.compose(other) == other.compose(self)
    }

    /// `true` if the map has no jumps.
    pub fn is_continuous(&self) -> bool {
        self.inner.table.is_continuous()
    }

    pub(crate) fn exact_rotation(&self) -> Option<&Real> {
        self.inner.exact_rotation.get()
    }

    pub(crate) fn record_exact_rotation(&self, value: Real) -> &Real {
        self.inner.exact_rotation.get_or_init(|| value)
    }
}

impl PartialEq for DegreeOneLift {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.inner.table == other.inner.table
    }
}

impl Eq for DegreeOneLift {}

impl std::hash::Hash for DegreeOneLift {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.inner.table.hash(state);
    }
}

impl fmt::Debug for DegreeOneLift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.inner
                    .table
                    .pieces()
                    .iter()
                    .map(|p| format!("[{}, ..) ↦ {} + {}·(x - {})", p.start, p.value, p.slope, p.start)),
            )
            .finish()
    }
}

impl Default for DegreeOneLift {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<Unit> for DegreeOneLift {
    fn from(unit: Unit) -> Self {
        unit.as_lift().clone()
    }
}

/// `f(x + n) = f(x) + n` for every integer `n`: the lift commutes with
/// the integer translations.
pub fn commutes_with_integer_shift(f: &DegreeOneLift, x: &Real, n: i64) -> bool {
    let shift = Real::from_integer(n.into());
    f.apply(&(x + &shift)) == f.apply(x) + shift
}

/// `f(x) ≤ x + shift` for every `x`.
pub fn bounded_by_translation(f: &DegreeOneLift, shift: &Real) -> bool {
    f.le(DegreeOneLift::translate(shift.clone()).as_lift())
}
