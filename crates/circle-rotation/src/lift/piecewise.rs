//! Piecewise-Linear Tables on the Fundamental Domain
//!
//! A table describes a right-continuous, nondecreasing map on `[0, 1)` as a
//! sorted list of linear pieces. The map is extended to the real line by
//! `f(x + k) = f(x) + k`, so only one period is stored.
//!
//! The class is closed under composition, pointwise max/min and inversion of
//! its bijective members, and every comparison is exact. Tables are kept in
//! normal form (adjacent pieces that continue each other are merged), which
//! makes structural equality coincide with pointwise equality.

use std::collections::BTreeSet;

use num_traits::{One, Signed, Zero};

use crate::foundation::exactmath::{ceil_int, floor_int, fract, from_big, Real};
use crate::{Error, Result};

/// One linear piece: `x ↦ value + slope · (x - start)` on `[start, next_start)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    /// Left endpoint, in `[0, 1)`
    pub start: Real,
    /// Value at `start`
    pub value: Real,
    /// Nonnegative slope
    pub slope: Real,
}

impl Piece {
    /// Create a piece
    pub fn new(start: Real, value: Real, slope: Real) -> Self {
        Self { start, value, slope }
    }

    fn at(&self, x: &Real) -> Real {
        &self.value + &self.slope * (x - &self.start)
    }
}

/// Normalized piecewise-linear table of a degree-one lift.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PiecewiseLinear {
    pieces: Vec<Piece>,
}

impl PiecewiseLinear {
    /// Validate and normalize a table.
    pub fn new(pieces: Vec<Piece>) -> Result<Self> {
        validate_starts(pieces.iter().map(|p| &p.start))?;
        let table = Self { pieces };
        table.validate_monotone()?;
        Ok(table.normalized())
    }

    /// Continuous interpolation through `(x_i, y_i)`, closed by `(1, y_0 + 1)`.
    pub fn interpolate(points: &[(Real, Real)]) -> Result<Self> {
        validate_starts(points.iter().map(|(x, _)| x))?;

        let closing = (Real::one(), &points[0].1 + Real::one());
        let pieces = points
            .iter()
            .zip(points.iter().skip(1).chain(std::iter::once(&closing)))
            .map(|((x0, y0), (x1, y1))| Piece::new(x0.clone(), y0.clone(), (y1 - y0) / (x1 - x0)))
            .collect();

        Self::new(pieces)
    }

    /// Table for `x ↦ x + shift`.
    pub fn translation(shift: Real) -> Self {
        Self {
            pieces: vec![Piece::new(Real::zero(), shift, Real::one())],
        }
    }

    /// Normalize without validating. Callers guarantee the invariants.
    pub(crate) fn trusted(pieces: Vec<Piece>) -> Self {
        Self { pieces }.normalized()
    }

    /// Pieces in increasing order of `start`.
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Evaluate at any real `x`.
    pub fn eval(&self, x: &Real) -> Real {
        let (i, shift, t) = self.locate(x);
        self.pieces[i].at(&t) + shift
    }

    /// Right derivative at `x`.
    pub fn slope_at(&self, x: &Real) -> Real {
        let (i, _, _) = self.locate(x);
        self.pieces[i].slope.clone()
    }

    /// `true` if the map has no jumps, including across `x = 1`.
    pub fn is_continuous(&self) -> bool {
        (0..self.pieces.len()).all(|i| self.left_limit(i) == self.next_value(i))
    }

    /// `true` if every piece has positive slope.
    pub fn is_strictly_increasing(&self) -> bool {
        self.pieces.iter().all(|p| p.slope.is_positive())
    }

    /// A lift is a bijection of the line iff it is continuous and strictly increasing.
    pub fn is_bijective(&self) -> bool {
        self.is_continuous() && self.is_strictly_increasing()
    }

    /// `self ∘ inner`
    pub fn compose(&self, inner: &Self) -> Self {
        let mut cuts: BTreeSet<Real> = inner.starts().cloned().collect();

        // Split each increasing piece of `inner` where it crosses a breakpoint of `self`
        for (i, piece) in inner.pieces.iter().enumerate() {
            if !piece.slope.is_positive() {
                continue;
            }
            let lo = &piece.value;
            let hi = inner.left_limit(i);
            for b in self.starts() {
                let mut y = b + from_big(ceil_int(&(lo - b)));
                while y < hi {
                    if y > *lo {
                        cuts.insert(&piece.start + (&y - lo) / &piece.slope);
                    }
                    y += Real::one();
                }
            }
        }

        Self::from_cuts(cuts, |c| {
            let mid = inner.eval(c);
            (self.eval(&mid), self.slope_at(&mid) * inner.slope_at(c))
        })
    }

    /// Pointwise maximum.
    pub fn join(&self, other: &Self) -> Self {
        self.pointwise(other, true)
    }

    /// Pointwise minimum.
    pub fn meet(&self, other: &Self) -> Self {
        self.pointwise(other, false)
    }

    /// `self(x) ≤ other(x)` for every `x`.
    pub fn le(&self, other: &Self) -> bool {
        let cuts = self.merged_starts(other);
        let below = intervals(&cuts).all(|(c, d)| {
            let (va, sa) = (self.eval(c), self.slope_at(c));
            let (vb, sb) = (other.eval(c), other.slope_at(c));
            let width = &d - c;
            va <= vb && &va + &sa * &width <= &vb + &sb * &width
        });
        below
    }

    /// `sup_x |self(x) - other(x)|`.
    ///
    /// The difference has period 1 and is linear between merged cuts, so the
    /// supremum is attained at a cut or as a left limit at the next one.
    pub fn distance(&self, other: &Self) -> Real {
        let cuts = self.merged_starts(other);
        let mut sup = Real::zero();
        for (c, d) in intervals(&cuts) {
            let (va, sa) = (self.eval(c), self.slope_at(c));
            let (vb, sb) = (other.eval(c), other.slope_at(c));
            let width = &d - c;
            let at_end = (&va + &sa * &width - &vb - &sb * &width).abs();
            sup = sup.max((va - vb).abs()).max(at_end);
        }
        sup
    }

    /// Inverse table, if the map is a bijection.
    pub fn inverse(&self) -> Option<Self> {
        if !self.is_bijective() {
            return None;
        }

        let mut cuts: BTreeSet<Real> = self.pieces.iter().map(|p| fract(&p.value)).collect();
        cuts.insert(Real::zero());

        Some(Self::from_cuts(cuts, |y| self.preimage(y)))
    }

    /// Least `x ∈ [0, 1)` with `f(x) = x + d`, solved piece by piece.
    pub fn solve_displacement(&self, d: &Real) -> Option<Real> {
        self.pieces.iter().enumerate().find_map(|(i, p)| {
            let offset = &p.value - &p.start;
            let rate = &p.slope - Real::one();
            if rate.is_zero() {
                return (offset == *d).then(|| p.start.clone());
            }
            let x = &p.start + (d - &offset) / &rate;
            (x >= p.start && x < self.end(i)).then_some(x)
        })
    }

    /// Infimum and supremum of `f(x) - x` over one period.
    pub fn displacement_range(&self) -> (Real, Real) {
        let mut values = Vec::with_capacity(2 * self.pieces.len());
        for (i, p) in self.pieces.iter().enumerate() {
            values.push(&p.value - &p.start);
            values.push(self.left_limit(i) - self.end(i));
        }
        let min = values.iter().min().cloned().unwrap_or_else(Real::zero);
        let max = values.iter().max().cloned().unwrap_or_else(Real::zero);
        (min, max)
    }

    fn starts(&self) -> impl Iterator<Item = &Real> {
        self.pieces.iter().map(|p| &p.start)
    }

    fn merged_starts(&self, other: &Self) -> BTreeSet<Real> {
        self.starts().chain(other.starts()).cloned().collect()
    }

    fn pointwise(&self, other: &Self, take_max: bool) -> Self {
        let base = self.merged_starts(other);
        let mut cuts = base.clone();

        for (c, d) in intervals(&base) {
            let (va, sa) = (self.eval(c), self.slope_at(c));
            let (vb, sb) = (other.eval(c), other.slope_at(c));
            if sa != sb {
                let crossing = c + (&vb - &va) / (&sa - &sb);
                if crossing > *c && crossing < d {
                    cuts.insert(crossing);
                }
            }
        }

        Self::from_cuts(cuts, |c| {
            let a = (self.eval(c), self.slope_at(c));
            let b = (other.eval(c), other.slope_at(c));
            let a_wins = match a.0.cmp(&b.0) {
                std::cmp::Ordering::Greater => take_max,
                std::cmp::Ordering::Less => !take_max,
                std::cmp::Ordering::Equal => (a.1 >= b.1) == take_max,
            };
            if a_wins {
                a
            } else {
                b
            }
        })
    }

    // Requires a bijective table.
    fn preimage(&self, y: &Real) -> (Real, Real) {
        let base = &self.pieces[0].value;
        let shift = from_big(floor_int(&(y - base)));
        let t = y - &shift;
        let i = self.pieces.partition_point(|p| p.value <= t) - 1;
        let p = &self.pieces[i];
        (&p.start + (&t - &p.value) / &p.slope + shift, p.slope.recip())
    }

    /// Piece index, integer shift and reduced argument `x - shift ∈ [0, 1)`.
    fn locate(&self, x: &Real) -> (usize, Real, Real) {
        let shift = x.floor();
        let t = x - &shift;
        let i = self.pieces.partition_point(|p| p.start <= t) - 1;
        (i, shift, t)
    }

    fn end(&self, i: usize) -> Real {
        self.pieces.get(i + 1).map(|p| p.start.clone()).unwrap_or_else(Real::one)
    }

    fn next_value(&self, i: usize) -> Real {
        match self.pieces.get(i + 1) {
            Some(p) => p.value.clone(),
            None => &self.pieces[0].value + Real::one(),
        }
    }

    fn left_limit(&self, i: usize) -> Real {
        self.pieces[i].at(&self.end(i))
    }

    fn validate_monotone(&self) -> Result<()> {
        let last = self.pieces.len() - 1;
        for (i, p) in self.pieces.iter().enumerate() {
            if p.slope.is_negative() {
                return Err(Error::NonMonotone { at: p.start.to_string() });
            }
            let left = self.left_limit(i);
            let next = self.next_value(i);
            if left > next {
                return Err(if i == last {
                    Error::NotPeriodic {
                        left_limit: left.to_string(),
                        bound: next.to_string(),
                    }
                } else {
                    Error::NonMonotone {
                        at: self.end(i).to_string(),
                    }
                });
            }
        }
        Ok(())
    }

    fn normalized(self) -> Self {
        let mut merged: Vec<Piece> = Vec::with_capacity(self.pieces.len());
        for piece in self.pieces {
            if let Some(prev) = merged.last() {
                if prev.slope == piece.slope && prev.at(&piece.start) == piece.value {
                    continue;
                }
            }
            merged.push(piece);
        }
        Self { pieces: merged }
    }

    fn from_cuts<F>(cuts: BTreeSet<Real>, sample: F) -> Self
    where
        F: Fn(&Real) -> (Real, Real),
    {
        let pieces = cuts
            .into_iter()
            .map(|c| {
                let (value, slope) = sample(&c);
                Piece::new(c, value, slope)
            })
            .collect();
        Self::trusted(pieces)
    }
}

/// Consecutive `[c, d)` pairs of a cut set, closed at 1.
fn intervals(cuts: &BTreeSet<Real>) -> impl Iterator<Item = (&Real, Real)> {
    let ends = cuts.iter().skip(1).cloned().chain(std::iter::once(Real::one()));
    cuts.iter().zip(ends)
}

fn validate_starts<'a, I>(starts: I) -> Result<()>
where
    I: IntoIterator<Item = &'a Real>,
{
    let mut prev: Option<&Real> = None;
    for start in starts {
        match prev {
            None if !start.is_zero() => {
                return Err(Error::InvalidBreakpoints(format!("first breakpoint must be 0, got {}", start)));
            }
            Some(p) if start <= p => {
                return Err(Error::InvalidBreakpoints(format!("breakpoints not increasing at {}", start)));
            }
            _ => {}
        }
        if *start >= Real::one() {
            return Err(Error::InvalidBreakpoints(format!("breakpoint {} outside [0, 1)", start)));
        }
        prev = Some(start);
    }
    if prev.is_none() {
        return Err(Error::InvalidBreakpoints("empty table".to_string()));
    }
    Ok(())
}
