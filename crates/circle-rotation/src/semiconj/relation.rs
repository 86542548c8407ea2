//! The Semiconjugacy Relation
//!
//! A monotone degree-one `F` semiconjugates `f` to `g` when `F ∘ f = g ∘ F`.
//! Semiconjugacies compose, and both ends share a translation number.

use num_traits::Zero;

use crate::foundation::exactmath::Real;
use crate::foundation::{Group, LiftAction};
use crate::lift::DegreeOneLift;
use crate::translation::{translation_number, Estimate};
use crate::Result;

/// `conjugator ∘ f == g ∘ conjugator`, decided exactly.
pub fn is_semiconjugacy(conjugator: &DegreeOneLift, f: &DegreeOneLift, g: &DegreeOneLift) -> bool {
    conjugator.compose(f) == g.compose(conjugator)
}

/// `conjugator ∘ first(s) == second(s) ∘ conjugator` for every generator `s`.
pub fn semiconjugates_actions<G, A, B>(conjugator: &DegreeOneLift, first: &A, second: &B, generators: &[G]) -> bool
where
    G: Group,
    A: LiftAction<G>,
    B: LiftAction<G>,
{
    generators
        .iter()
        .all(|s| is_semiconjugacy(conjugator, &first.act(s), &second.act(s)))
}

/// How far `conjugator` is from semiconjugating `f` to `g`:
/// `sup_x |F(f(x)) - g(F(x))|`.
pub fn defect(conjugator: &DegreeOneLift, f: &DegreeOneLift, g: &DegreeOneLift) -> Real {
    conjugator.compose(f).distance(&g.compose(conjugator))
}

/// Largest [`defect`] over the generators.
pub fn semiconjugacy_defect<G, A, B>(conjugator: &DegreeOneLift, first: &A, second: &B, generators: &[G]) -> Real
where
    G: Group,
    A: LiftAction<G>,
    B: LiftAction<G>,
{
    generators
        .iter()
        .map(|s| defect(conjugator, &first.act(s), &second.act(s)))
        .max()
        .unwrap_or_else(Real::zero)
}

/// A verified semiconjugacy `F: f → g`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Semiconjugacy {
    conjugator: DegreeOneLift,
    source: DegreeOneLift,
    target: DegreeOneLift,
}

impl Semiconjugacy {
    /// `None` unless `conjugator ∘ source == target ∘ conjugator`.
    pub fn new(conjugator: DegreeOneLift, source: DegreeOneLift, target: DegreeOneLift) -> Option<Self> {
        is_semiconjugacy(&conjugator, &source, &target).then_some(Self {
            conjugator,
            source,
            target,
        })
    }

    /// The identity semiconjugacy `id: f → f`.
    pub fn reflexive(f: DegreeOneLift) -> Self {
        Self {
            conjugator: DegreeOneLift::identity(),
            source: f.clone(),
            target: f,
        }
    }

    /// `F`
    pub fn conjugator(&self) -> &DegreeOneLift {
        &self.conjugator
    }

    /// `f`
    pub fn source(&self) -> &DegreeOneLift {
        &self.source
    }

    /// `g`
    pub fn target(&self) -> &DegreeOneLift {
        &self.target
    }

    /// `G ∘ F: f → h` from `F: f → g` and `G: g → h`. `None` if the middle
    /// maps differ.
    pub fn then(&self, next: &Semiconjugacy) -> Option<Semiconjugacy> {
        (self.target == next.source).then(|| Semiconjugacy {
            conjugator: next.conjugator.compose(&self.conjugator),
            source: self.source.clone(),
            target: next.target.clone(),
        })
    }

    /// Estimates of τ at both ends; these always agree.
    pub fn translation_numbers(&self, tolerance: &Real) -> Result<(Estimate, Estimate)> {
        Ok((
            translation_number(&self.source, tolerance)?,
            translation_number(&self.target, tolerance)?,
        ))
    }
}
