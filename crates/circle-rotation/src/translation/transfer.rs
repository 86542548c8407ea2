//! Bounded-Distance Transfer
//!
//! Any sequence `x_k` staying within a uniform distance `C` of the orbit
//! `f^k(0)` has the same asymptotic rate: `x_{2^n} / 2^n → τ(f)`, with error
//! at most `(C + 1) / 2^n`. This is what lets τ be read off approximate
//! orbits, and it is the reason τ is additive on commuting lifts and
//! invariant under semiconjugacy.

use std::num::NonZeroU64;

use num_traits::{One, Signed, Zero};
use tracing::debug;

use super::estimator::{translation_number, Estimate};
use crate::foundation::exactmath::{approx, from_big, pow2, Real};
use crate::lift::{DegreeOneLift, Unit};
use crate::{Error, Result};

/// Estimate τ(f) from a sequence `approx_orbit(k)` known to satisfy
/// `|approx_orbit(k) - f^k(0)| ≤ distance_bound` for every `k`.
///
/// Only the single term `k = 2^n` is evaluated, for the least `n ≤ max_level`
/// with `(distance_bound + 1) / 2^n ≤ tolerance`.
pub fn bounded_distance_estimate<F>(
    mut approx_orbit: F,
    distance_bound: &Real,
    tolerance: &Real,
    max_level: u32,
) -> Result<Estimate>
where
    F: FnMut(u64) -> Real,
{
    if !tolerance.is_positive() {
        return Err(Error::InvalidTolerance(tolerance.to_string()));
    }
    let numerator = distance_bound.abs() + Real::one();

    let level = (0..=max_level.min(62))
        .find(|&n| &numerator / from_big(pow2(n)) <= *tolerance)
        .ok_or_else(|| Error::PrecisionBudgetExceeded {
            tolerance: tolerance.to_string(),
            max_level,
        })?;

    let scale = from_big(pow2(level));
    let value = approx_orbit(1u64 << level) / &scale;
    debug!(level, value = approx(&value), "bounded-distance transfer estimate");

    Ok(Estimate {
        value,
        error_bound: numerator / scale,
        level,
        exact: false,
    })
}

/// τ(f ∘ g) for commuting lifts, read from the approximate orbit
/// `f^k(0) + g^k(0)`, which stays within distance 1 of `(f ∘ g)^k(0)`.
pub fn translation_number_of_commuting_product(
    f: &DegreeOneLift,
    g: &DegreeOneLift,
    tolerance: &Real,
    max_level: u32,
) -> Result<Estimate> {
    if !f.commutes_with(g) {
        return Err(Error::NotCommuting("f ∘ g ≠ g ∘ f".to_string()));
    }
    let zero = Real::zero();
    bounded_distance_estimate(
        |k| f.iterate_at(&zero, k) + g.iterate_at(&zero, k),
        &Real::one(),
        tolerance,
        max_level,
    )
}

/// τ(f^n) = n·τ(f), estimated through `f` itself with the tolerance scaled
/// down by `n` so the result still meets `tolerance`.
pub fn translation_number_of_power(f: &DegreeOneLift, n: u64, tolerance: &Real) -> Result<Estimate> {
    if n == 0 {
        return Ok(Estimate::exact(Real::zero()));
    }
    let steps = Real::from_integer(n.into());
    let base = translation_number(f, &(tolerance / &steps))?;
    Ok(Estimate {
        value: &base.value * &steps,
        error_bound: &base.error_bound * &steps,
        level: base.level,
        exact: base.exact,
    })
}

/// τ(u^n) for any integer `n`; negative powers use τ(u⁻¹) = -τ(u).
pub fn translation_number_of_zpow(u: &Unit, n: i64, tolerance: &Real) -> Result<Estimate> {
    let magnitude = translation_number_of_power(u.as_lift(), n.unsigned_abs(), tolerance)?;
    Ok(if n < 0 { magnitude.scaled(-1) } else { magnitude })
}

/// Average displacement `(f^n(x) - x) / n`, within `1/n` of τ(f) for every
/// base point `x`.
pub fn average_displacement(f: &DegreeOneLift, x: &Real, n: NonZeroU64) -> Estimate {
    let steps = Real::from_integer(n.get().into());
    let value = (f.iterate_at(x, n.get()) - x) / &steps;
    Estimate {
        value,
        error_bound: steps.recip(),
        level: 0,
        exact: false,
    }
}

/// A point `x ∈ [0, 1)` with `f(x) = x + d`, if one exists.
///
/// For continuous `f`, such a point exists whenever `d` lies between the
/// minimum and maximum of `f(x) - x`; in particular for `d = τ(f)`.
pub fn point_with_displacement(f: &DegreeOneLift, d: &Real) -> Option<Real> {
    let (lo, hi) = f.table().displacement_range();
    if *d < lo || *d > hi {
        return None;
    }
    f.table().solve_displacement(d)
}

/// A point with `f(x) = x + τ(f)`, available when the estimate is exact.
pub fn rotation_point(f: &DegreeOneLift, estimate: &Estimate) -> Option<Real> {
    if !estimate.exact {
        return None;
    }
    point_with_displacement(f, &estimate.value)
}
