//! Translation Number Estimator
//!
//! The translation number of a degree-one lift `f` is the limit of the
//! dyadic samples
//!
//! ```text
//! a_n = f^(2^n)(0) / 2^n
//! ```
//!
//! Since `f^(2N) = f^N ∘ f^N`, the composition estimate gives
//! `|f^(2N)(0) - 2·f^N(0)| < 1`, hence `|a_n - a_{n+1}| < (1/2) / 2^n`.
//! The samples are dominated by a geometric series of ratio 1/2 and the
//! tail after level `n` is at most `2^-n`; that is the certified error of
//! an estimate stopped at level `n`.
//!
//! Exact orbit points of a generic lift double their denominators every few
//! steps, so the walk keeps exact values only while they fit a dyadic grid
//! of `n + guard` binary digits. Past that it carries an outward-rounded
//! bracket `lower ≤ f^k(0) ≤ upper`, which monotonicity preserves, and
//! certifies from `|f^N(0) - N·τ| < 1`:
//!
//! ```text
//! |τ - (lower + upper) / 2N| ≤ (upper - lower + 2) / 2N
//! ```
//!
//! τ is not Lipschitz in the lift, so a bracket can widen faster than the
//! grid suggests. The estimator then retries with more guard digits and
//! finally without rounding, which always succeeds.
//!
//! Periodic orbits give exact answers. A direct search for short periods
//! runs first. While the walk is exact it also indexes fractional parts:
//! two orbit points that differ by an integer `m` after `p` steps certify a
//! point with `f^p(x) = x + m`, and the translation number is then `m / p`.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

use num_bigint::BigUint;
use num_traits::{One, Signed, Zero};
use tracing::{debug, trace};

use crate::config::EstimatorConfig;
use crate::foundation::exactmath::{
    approx, ceil_to_grid, dist, dyadic, floor_to_grid, fract, from_big, limit_of_geometrically_bounded_cauchy,
    pow2, q, Real,
};
use crate::lift::DegreeOneLift;
use crate::periodic::rational_rotation;
use crate::{Error, Result};

/// Binary digits kept beyond the target level, one walk per entry.
const GUARD_DIGITS: [u32; 3] = [16, 64, 256];

/// A rational approximation of a translation number with a certified error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Estimate {
    /// Approximate value
    pub value: Real,
    /// Certified bound on `|value - τ(f)|`
    pub error_bound: Real,
    /// Dyadic level (or iteration depth) the estimate was taken at
    pub level: u32,
    /// `true` when `value` is the translation number itself
    pub exact: bool,
}

impl Estimate {
    /// An exactly known value.
    pub fn exact(value: Real) -> Self {
        Self {
            value,
            error_bound: Real::zero(),
            level: 0,
            exact: true,
        }
    }

    /// `value - error_bound`
    pub fn lower(&self) -> Real {
        &self.value - &self.error_bound
    }

    /// `value + error_bound`
    pub fn upper(&self) -> Real {
        &self.value + &self.error_bound
    }

    /// `true` if `x` is within the certified interval.
    pub fn contains(&self, x: &Real) -> bool {
        dist(&self.value, x) <= self.error_bound
    }

    /// `true` if both certified intervals can hold the same number.
    pub fn is_consistent_with(&self, other: &Estimate) -> bool {
        dist(&self.value, &other.value) <= &self.error_bound + &other.error_bound
    }

    /// Estimate of `n · τ`.
    pub fn scaled(&self, n: i64) -> Estimate {
        let factor = Real::from_integer(n.into());
        Estimate {
            value: &self.value * &factor,
            error_bound: &self.error_bound * factor.abs(),
            level: self.level,
            exact: self.exact,
        }
    }

    /// Estimate of `τ₁ + τ₂`.
    pub fn plus(&self, other: &Estimate) -> Estimate {
        Estimate {
            value: &self.value + &other.value,
            error_bound: &self.error_bound + &other.error_bound,
            level: self.level.min(other.level),
            exact: self.exact && other.exact,
        }
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exact {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{} ± {}", self.value, self.error_bound)
        }
    }
}

/// Dyadic translation-number estimator.
#[derive(Clone, Debug, Default)]
pub struct TranslationNumberEstimator {
    config: EstimatorConfig,
}

impl TranslationNumberEstimator {
    /// Create an estimator with the given budget.
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Smallest dyadic level `n` with `2^-n ≤ tolerance`.
    ///
    /// Fails only for a nonpositive tolerance, or above an explicit
    /// `max_level` cap.
    pub fn level_for(&self, tolerance: &Real) -> Result<u32> {
        if !tolerance.is_positive() {
            return Err(Error::InvalidTolerance(tolerance.to_string()));
        }
        let mut level = 0;
        let mut bound = Real::one();
        while bound > *tolerance {
            level += 1;
            if let Some(max_level) = self.config.max_level.filter(|&cap| level > cap) {
                return Err(Error::PrecisionBudgetExceeded {
                    tolerance: tolerance.to_string(),
                    max_level,
                });
            }
            bound = dyadic(level);
        }
        Ok(level)
    }

    /// Estimate `τ(f)` with `error_bound ≤ tolerance`.
    ///
    /// The orbit of 0 is walked for about `2^n` steps,
    /// `n = ⌈log2(1/tolerance)⌉`, on numbers of about `n` binary digits.
    /// An exact value is returned as soon as a periodic point is certified.
    #[tracing::instrument(level = "debug", skip_all, fields(tolerance = %tolerance))]
    pub fn estimate(&self, f: &DegreeOneLift, tolerance: &Real) -> Result<Estimate> {
        let level = self.level_for(tolerance)?;

        if let Some(value) = f.exact_rotation() {
            trace!(value = %value, "memoized exact translation number");
            return Ok(Estimate::exact(value.clone()));
        }
        if self.config.detect_periodic {
            if let Some(value) = rational_rotation(f, self.config.max_period) {
                debug!(value = %value, "short periodic orbit gives exact translation number");
                return Ok(Estimate::exact(value));
            }
        }

        let last_level = self.config.max_level.map_or(level + 2, |cap| cap.min(level + 2));
        let precisions = GUARD_DIGITS.iter().map(|guard| Some(level + guard)).chain([None]);

        for digits in precisions {
            let mut walk = OrbitWalk::new(f, level, digits, self.config.detect_periodic);
            let half = q(1, 2);
            let limit = limit_of_geometrically_bounded_cauchy(walk.by_ref(), &half, &half, tolerance);

            if let Some(limit) = limit {
                debug!(
                    level = limit.index,
                    value = approx(&limit.value),
                    steps = %walk.step,
                    "dyadic estimate"
                );
                return Ok(Estimate {
                    value: limit.value,
                    error_bound: limit.error_bound,
                    level: limit.index,
                    exact: false,
                });
            }
            if let Some(value) = walk.exact.take() {
                debug!(value = %value, steps = %walk.step, "periodic orbit certified exact translation number");
                return Ok(Estimate::exact(f.record_exact_rotation(value).clone()));
            }
            if let Some(estimate) = walk.certify(tolerance, last_level) {
                debug!(
                    level = estimate.level,
                    value = approx(&estimate.value),
                    digits = ?digits,
                    "rounded dyadic estimate"
                );
                return Ok(estimate);
            }
            debug!(digits = ?digits, "rounded orbit bracket too wide");
        }

        // The unrounded walk above reaches `level` or a periodic point
        Err(Error::PrecisionBudgetExceeded {
            tolerance: tolerance.to_string(),
            max_level: level,
        })
    }
}

/// `τ(f)` within `tolerance`, using the default budget.
pub fn translation_number(f: &DegreeOneLift, tolerance: &Real) -> Result<Estimate> {
    TranslationNumberEstimator::default().estimate(f, tolerance)
}

/// The dyadic sample `f^(2^n)(0) / 2^n`, walked exactly.
///
/// `None` when `2^n` steps do not fit a `u64`.
pub fn dyadic_sample(f: &DegreeOneLift, n: u32) -> Option<Real> {
    let steps = 1u64.checked_shl(n)?;
    Some(f.iterate_at(&Real::zero(), steps) / from_big(pow2(n)))
}

/// A single walk of the orbit of 0.
///
/// As an iterator it yields the exact samples `a_0, a_1, …` up to
/// `max_level`. It ends early when a periodic point is found, leaving the
/// exact value in `exact`, or when the orbit outgrows `digits` binary digits
/// and the walk switches to a rounded bracket; [`OrbitWalk::certify`]
/// continues from there.
struct OrbitWalk<'a> {
    lift: &'a DegreeOneLift,
    /// `lower ≤ f^step(0) ≤ upper`, equal while the walk is exact
    lower: Real,
    upper: Real,
    step: BigUint,
    digits: Option<u32>,
    level: u32,
    max_level: u32,
    seen: Option<HashMap<Real, (BigUint, Real)>>,
    exact: Option<Real>,
}

impl<'a> OrbitWalk<'a> {
    fn new(lift: &'a DegreeOneLift, max_level: u32, digits: Option<u32>, detect_periodic: bool) -> Self {
        Self {
            lift,
            lower: Real::zero(),
            upper: Real::zero(),
            step: BigUint::zero(),
            digits,
            level: 0,
            max_level,
            seen: detect_periodic.then(HashMap::new),
            exact: None,
        }
    }

    fn is_exact(&self) -> bool {
        self.lower == self.upper
    }

    fn target(&self) -> BigUint {
        BigUint::one() << self.level as usize
    }

    /// One step of the orbit, rounded outward once it needs more than
    /// `digits` binary digits.
    fn advance(&mut self) {
        let lower = self.lift.apply(&self.lower);
        let upper = if self.is_exact() {
            lower.clone()
        } else {
            self.lift.apply(&self.upper)
        };

        match self.digits {
            Some(digits) if exceeds(&lower, digits) || exceeds(&upper, digits) => {
                self.lower = floor_to_grid(&lower, digits);
                self.upper = ceil_to_grid(&upper, digits);
            }
            _ => {
                self.lower = lower;
                self.upper = upper;
            }
        }
        self.step += 1u32;
    }

    /// Index the current orbit point; returns `m / p` on a repeat.
    fn record(&mut self) -> Option<Real> {
        let seen = self.seen.as_mut()?;
        match seen.entry(fract(&self.lower)) {
            Entry::Occupied(entry) => {
                let (earlier_step, earlier_point) = entry.get();
                let period = &self.step - earlier_step;
                let shift = &self.lower - earlier_point;
                trace!(%period, shift = %shift, "orbit returned to a translate of an earlier point");
                Some(shift / Real::from_integer(period.into()))
            }
            Entry::Vacant(entry) => {
                entry.insert((self.step.clone(), self.lower.clone()));
                None
            }
        }
    }

    /// Walk the bracket on from the current level until its certificate
    /// meets `tolerance`, giving up after `last_level`.
    fn certify(&mut self, tolerance: &Real, last_level: u32) -> Option<Estimate> {
        while self.level <= last_level {
            let target = self.target();
            while self.step < target {
                self.advance();
            }

            let twice_steps = from_big(pow2(self.level + 1));
            let error_bound = (&self.upper - &self.lower + Real::from_integer(2.into())) / &twice_steps;
            trace!(level = self.level, error = approx(&error_bound), "bracket certificate");
            if error_bound <= *tolerance {
                return Some(Estimate {
                    value: (&self.lower + &self.upper) / twice_steps,
                    error_bound,
                    level: self.level,
                    exact: false,
                });
            }
            self.level += 1;
        }
        None
    }
}

/// `true` if the denominator of `x` is wider than any multiple of `2^-digits` needs.
fn exceeds(x: &Real, digits: u32) -> bool {
    x.denom().bits() > u64::from(digits) + 1
}

impl Iterator for OrbitWalk<'_> {
    type Item = Real;

    fn next(&mut self) -> Option<Real> {
        if self.exact.is_some() || self.level > self.max_level || !self.is_exact() {
            return None;
        }

        let target = self.target();
        while self.step < target {
            if let Some(value) = self.record() {
                self.exact = Some(value);
                return None;
            }
            self.advance();
            if !self.is_exact() {
                return None;
            }
        }

        let sample = &self.lower / from_big(pow2(self.level));
        self.level += 1;
        Some(sample)
    }
}
