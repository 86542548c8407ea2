//! Periodic Orbits and Rational Translation Numbers
//!
//! A point with `f^n(x) = x + m` projects to a periodic orbit of the circle
//! map and forces `τ(f) = m / n`. Conversely a continuous lift with
//! rational translation number always has such a point. Because lifts are
//! piecewise linear, `f^n(x) - x = m` is solved exactly on each piece of
//! `f^n`.

use num_bigint::BigInt;
use num_traits::ToPrimitive;
use tracing::debug;

use crate::foundation::exactmath::{ceil_int, floor_int, from_big, Real};
use crate::lift::DegreeOneLift;

/// A point `x ∈ [0, 1)` with `f^period(x) = x + shift`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PeriodicOrbit {
    /// Base point of the orbit
    pub point: Real,
    /// Least `n` found
    pub period: u64,
    /// Integer displacement after `period` steps
    pub shift: BigInt,
}

impl PeriodicOrbit {
    /// The translation number this orbit certifies, `shift / period`.
    pub fn rotation(&self) -> Real {
        Real::new(self.shift.clone(), BigInt::from(self.period))
    }

    /// `x, f(x), …, f^(period-1)(x)`.
    pub fn orbit(&self, f: &DegreeOneLift) -> Vec<Real> {
        let mut points = Vec::with_capacity(self.period.to_usize().unwrap_or(0));
        let mut x = self.point.clone();
        for _ in 0..self.period {
            let next = f.apply(&x);
            points.push(x);
            x = next;
        }
        points
    }
}

/// `f^n(x) = x + m`
pub fn is_periodic_point(f: &DegreeOneLift, x: &Real, n: u64, m: &BigInt) -> bool {
    f.iterate_at(x, n) == x + from_big(m.clone())
}

/// Search periods `1..=max_period` for a periodic point, smallest period first.
#[tracing::instrument(level = "debug", skip(f))]
pub fn find_periodic_orbit(f: &DegreeOneLift, max_period: u64) -> Option<PeriodicOrbit> {
    let mut power = DegreeOneLift::identity();

    for period in 1..=max_period {
        power = power.compose(f);
        let table = power.table();
        let (lo, hi) = table.displacement_range();

        let mut shift = ceil_int(&lo);
        let last = floor_int(&hi);
        while shift <= last {
            if let Some(point) = table.solve_displacement(&from_big(shift.clone())) {
                debug!(period, shift = %shift, point = %point, "periodic orbit found");
                return Some(PeriodicOrbit { point, period, shift });
            }
            shift += 1u32;
        }
    }
    None
}

/// Exact translation number certified by a periodic orbit of period at
/// most `max_period`. The value is memoized on `f`.
pub fn rational_rotation(f: &DegreeOneLift, max_period: u64) -> Option<Real> {
    if let Some(value) = f.exact_rotation() {
        return Some(value.clone());
    }
    let orbit = find_periodic_orbit(f, max_period)?;
    Some(f.record_exact_rotation(orbit.rotation()).clone())
}
