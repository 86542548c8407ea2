//! Integer Translation Estimates
//!
//! Monotonicity plus `f(x + 1) = f(x) + 1` pins `f(x)` between the values of
//! `f` at the integers adjacent to `x`:
//!
//! ```text
//! f(0) + floor(x) ≤ f(x) ≤ f(0) + ceil(x)
//! ```
//!
//! Applied at `x = g(0)` this bounds how far composition can drift from
//! addition, `|f(g(0)) - f(0) - g(0)| < 1`, the seed of both the dyadic
//! convergence bound and the orbit bound used in synthesis.

use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};

use crate::foundation::exactmath::{ceil_int, floor_int, from_big, Real};
use crate::lift::DegreeOneLift;

/// `(f(0) + floor(x), f(0) + ceil(x))`, which brackets `f(x)`.
pub fn integer_sandwich(f: &DegreeOneLift, x: &Real) -> (Real, Real) {
    let base = f.apply(&Real::zero());
    (&base + from_big(floor_int(x)), base + from_big(ceil_int(x)))
}

/// `f(g(0)) - f(0) - g(0)`, always in the open interval `(-1, 1)`.
pub fn composition_defect(f: &DegreeOneLift, g: &DegreeOneLift) -> Real {
    let zero = Real::zero();
    let g0 = g.apply(&zero);
    f.apply(&g0) - f.apply(&zero) - g0
}

/// `dist(f(0) + g(0), f(g(0))) < 1`
pub fn composition_within_unit(f: &DegreeOneLift, g: &DegreeOneLift) -> bool {
    composition_defect(f, g).abs() < Real::one()
}

/// `(floor(f(x) - x), ceil(f(x) - x))`. The translation number lies in
/// this integer interval for every `x`.
pub fn displacement_bounds(f: &DegreeOneLift, x: &Real) -> (BigInt, BigInt) {
    let displacement = f.apply(x) - x;
    (floor_int(&displacement), ceil_int(&displacement))
}

/// `x + τ - 1 < f(x) < x + τ + 1`
pub fn strict_bounds_hold(f: &DegreeOneLift, x: &Real, tau: &Real) -> bool {
    let centre = x + tau;
    let value = f.apply(x);
    &centre - Real::one() < value && value < centre + Real::one()
}
