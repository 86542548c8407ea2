//! Exact Arbitrary-Precision Arithmetic
//!
//! Every quantity in this crate is an exact rational. Real limits are
//! delivered as a rational approximation together with a certified bound on
//! its distance to the limit, never as a floating-point guess.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive};

/// The ordered field the whole crate computes in.
pub type Real = BigRational;

/// Build the rational `numer / denom`.
///
/// # Panics
///
/// Panics when `denom` is zero.
pub fn q(numer: i64, denom: i64) -> Real {
    BigRational::new(BigInt::from(numer), BigInt::from(denom))
}

/// Embed an integer.
pub fn int(n: i64) -> Real {
    BigRational::from_integer(BigInt::from(n))
}

/// Embed an arbitrary-precision integer.
pub fn from_big(n: BigInt) -> Real {
    BigRational::from_integer(n)
}

/// Largest integer `k` with `k ≤ x`.
pub fn floor_int(x: &Real) -> BigInt {
    x.floor().to_integer()
}

/// Smallest integer `k` with `x ≤ k`.
pub fn ceil_int(x: &Real) -> BigInt {
    x.ceil().to_integer()
}

/// Fractional part `x - floor(x)`, always in `[0, 1)`.
pub fn fract(x: &Real) -> Real {
    x - x.floor()
}

/// `2^n` as an integer.
pub fn pow2(n: u32) -> BigInt {
    BigInt::one() << n as usize
}

/// `2^-n`.
pub fn dyadic(n: u32) -> Real {
    BigRational::new(BigInt::one(), pow2(n))
}

/// Largest multiple of `2^-bits` that is `≤ x`.
pub fn floor_to_grid(x: &Real, bits: u32) -> Real {
    let scale = from_big(pow2(bits));
    from_big(floor_int(&(x * &scale))) / scale
}

/// Smallest multiple of `2^-bits` that is `≥ x`.
pub fn ceil_to_grid(x: &Real, bits: u32) -> Real {
    let scale = from_big(pow2(bits));
    from_big(ceil_int(&(x * &scale))) / scale
}

/// Lossy view for logging.
pub fn approx(x: &Real) -> f64 {
    x.to_f64().unwrap_or(f64::NAN)
}

/// A limit point of a Cauchy sequence located by
/// [`limit_of_geometrically_bounded_cauchy`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CauchyLimit {
    /// The accepted term of the sequence.
    pub value: Real,
    /// Certified bound on `|value - limit|`.
    pub error_bound: Real,
    /// Index of the accepted term.
    pub index: u32,
}

/// Walk a sequence whose consecutive gaps satisfy
/// `|a_n - a_{n+1}| ≤ scale · ratio^n` until the geometric tail bound
/// `scale · ratio^n / (1 - ratio)` is at most `tolerance`.
///
/// Returns `None` if the iterator ends before the tolerance is met, or if
/// `ratio` is not in `[0, 1)`.
pub fn limit_of_geometrically_bounded_cauchy<I>(
    terms: I,
    ratio: &Real,
    scale: &Real,
    tolerance: &Real,
) -> Option<CauchyLimit>
where
    I: IntoIterator<Item = Real>,
{
    if ratio.is_negative() || *ratio >= Real::one() {
        return None;
    }
    let tail_factor = scale / (Real::one() - ratio);
    let mut weight = Real::one();
    for (index, value) in terms.into_iter().enumerate() {
        let error_bound = &tail_factor * &weight;
        if error_bound <= *tolerance {
            return Some(CauchyLimit {
                value,
                error_bound,
                index: index as u32,
            });
        }
        weight *= ratio;
    }
    None
}

/// `|a - b|`.
pub fn dist(a: &Real, b: &Real) -> Real {
    (a - b).abs()
}
