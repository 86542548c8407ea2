//! Semiconjugacy Synthesis
//!
//! Given two actions `f₁, f₂: G → Lift` whose translation numbers agree on
//! every group element, the map
//!
//! ```text
//! F = sup_g f₂(g⁻¹) ∘ f₁(g)
//! ```
//!
//! satisfies `F ∘ f₁(s) = f₂(s) ∘ F` for every `s`. Agreement of translation
//! numbers bounds every term by `x ↦ x + 2`, so the supremum is a degree-one
//! lift. The synthesizer approximates it by the exact lattice join over
//! words of growing length and stops once the join stops changing.
//!
//! When the supremum is only reached in the limit (an orbit creeping towards
//! a periodic point) the join never settles. If both actions have a finite
//! orbit of at most `max_period` points, a step map matching the two orbits
//! in cyclic order is tried instead and verified exactly. Failing that, the
//! truncated join is returned unverified, with its sup-norm defect, after the
//! generators' translation numbers have been checked to agree.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::hash::Hash;

use num_traits::{One, Signed, Zero};
use tracing::{debug, trace};

use super::orbit::WordShells;
use super::relation::{semiconjugacy_defect, semiconjugates_actions};
use crate::config::SynthesisConfig;
use crate::foundation::exactmath::{ceil_int, dyadic, fract, from_big, int, Real};
use crate::foundation::{Group, LiftAction, Power, PowerAction};
use crate::lift::{DegreeOneLift, Piece, Unit};
use crate::periodic::find_periodic_orbit;
use crate::translation::translation_number;
use crate::{Error, Result};

/// Every orbit term `f₂(g⁻¹) ∘ f₁(g)` lies below `x ↦ x + ORBIT_BOUND` when
/// the translation numbers agree.
pub const ORBIT_BOUND: i64 = 2;

/// How a conjugator was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SynthesisMethod {
    /// The orbit join stopped changing and satisfies the relation exactly
    Supremum,
    /// Step map between finite invariant sets, verified exactly
    PeriodicOrbits,
    /// Orbit join cut off at `max_radius`; see [`Synthesis::defect`]
    Truncated,
}

/// Outcome of a synthesis run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Synthesis {
    /// The semiconjugacy, or its best approximation when not verified
    pub conjugator: DegreeOneLift,
    /// Largest word length enumerated
    pub radius: usize,
    /// Number of group elements whose terms were joined
    pub elements: usize,
    /// `conjugator ∘ f₁(s) == f₂(s) ∘ conjugator` holds for every generator
    pub verified: bool,
    pub method: SynthesisMethod,
    /// `max_s sup_x |F(f₁(s)(x)) - f₂(s)(F(x))|`, zero exactly when verified
    pub defect: Real,
}

/// Builds semiconjugacies between group actions by degree-one lifts.
#[derive(Clone, Debug, Default)]
pub struct SemiconjugacySynthesizer {
    config: SynthesisConfig,
}

impl SemiconjugacySynthesizer {
    /// Create a synthesizer with the given enumeration budget.
    pub fn new(config: SynthesisConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// Join orbit terms shell by shell until `patience` consecutive shells
    /// leave the join unchanged or `max_radius` is reached, then fall back to
    /// periodic orbits and finally to the truncated join.
    ///
    /// Fails with [`Error::TranslationNumberMismatch`] as soon as a term
    /// exceeds `x + 2`, or when a generator's translation numbers are
    /// certified apart at `2^-comparison_level`.
    #[tracing::instrument(level = "debug", skip_all, fields(generators = generators.len()))]
    pub fn synthesize<G, A, B>(&self, first: &A, second: &B, generators: &[G]) -> Result<Synthesis>
    where
        G: Group + Hash,
        A: LiftAction<G>,
        B: LiftAction<G>,
    {
        let bound: DegreeOneLift = DegreeOneLift::translate(int(ORBIT_BOUND)).into();
        let mut shells = WordShells::new(generators);

        // f₁(s) and f₂(s⁻¹) per symmetric generator, so each term extends a
        // term from the previous shell
        let steps: Vec<(DegreeOneLift, DegreeOneLift)> = shells
            .symmetric_generators()
            .iter()
            .map(|s| (first.act(s), second.act(&s.inverse())))
            .collect();

        let mut conjugator = DegreeOneLift::identity();
        let mut previous: HashMap<G, DegreeOneLift> = HashMap::new();
        let mut radius = 0;
        let mut elements = 0;
        let mut unchanged = 0;

        while let Some((r, shell)) = shells.next() {
            if r > self.config.max_radius {
                break;
            }
            radius = r;
            elements += shell.len();
            let mut changed = false;
            let mut current = HashMap::with_capacity(shell.len());

            for g in &shell {
                let extended = shells
                    .predecessor(g)
                    .and_then(|(p, i)| Some((previous.get(p)?, steps.get(i)?)));
                let term = match extended {
                    Some((term, (forward, backward))) => backward.compose(term).compose(forward),
                    None => second.act(&g.inverse()).compose(&first.act(g)),
                };

                if !term.le(&bound) {
                    debug!(radius = r, element = ?g, "orbit term exceeds x + 2");
                    return Err(Error::TranslationNumberMismatch {
                        element: format!("{:?}", g),
                        radius: r,
                    });
                }
                let joined = conjugator.join(&term);
                if joined != conjugator {
                    conjugator = joined;
                    changed = true;
                }
                current.insert(g.clone(), term);
            }
            previous = current;

            trace!(radius = r, shell = shell.len(), changed, "orbit shell joined");
            if changed {
                unchanged = 0;
            } else {
                unchanged += 1;
                if unchanged >= self.config.patience {
                    break;
                }
            }
        }

        let finish = |conjugator: DegreeOneLift, method: SynthesisMethod, verified: bool, defect: Real| {
            debug!(
                radius,
                elements,
                pieces = conjugator.table().pieces().len(),
                ?method,
                verified,
                "semiconjugacy synthesized"
            );
            Synthesis {
                conjugator,
                radius,
                elements,
                verified,
                method,
                defect,
            }
        };

        if semiconjugates_actions(&conjugator, first, second, generators) {
            return Ok(finish(conjugator, SynthesisMethod::Supremum, true, Real::zero()));
        }

        let symmetric = shells.symmetric_generators();
        if let Some(step) = periodic_conjugator(first, second, symmetric, generators, self.config.max_period) {
            return Ok(finish(step, SynthesisMethod::PeriodicOrbits, true, Real::zero()));
        }

        let tolerance = dyadic(self.config.comparison_level);
        for s in generators {
            let a = translation_number(&first.act(s), &tolerance)?;
            let b = translation_number(&second.act(s), &tolerance)?;
            if !a.is_consistent_with(&b) {
                debug!(element = ?s, first = %a, second = %b, "generator translation numbers differ");
                return Err(Error::TranslationNumberMismatch {
                    element: format!("{:?}", s),
                    radius,
                });
            }
        }

        let defect = semiconjugacy_defect(&conjugator, first, second, generators);
        Ok(finish(conjugator, SynthesisMethod::Truncated, false, defect))
    }
}

/// Step map sending a finite invariant set of `first` onto one of `second`
/// in cyclic order, tried at every rotation of the matching and shifted to
/// lie above the identity. Only exactly verified candidates are returned.
fn periodic_conjugator<G, A, B>(
    first: &A,
    second: &B,
    symmetric: &[G],
    generators: &[G],
    max_period: u64,
) -> Option<DegreeOneLift>
where
    G: Group,
    A: LiftAction<G>,
    B: LiftAction<G>,
{
    let sources = invariant_set(first, symmetric, max_period)?;
    let targets = invariant_set(second, symmetric, max_period)?;
    if sources.len() != targets.len() {
        trace!(sources = sources.len(), targets = targets.len(), "invariant sets differ in size");
        return None;
    }

    (0..targets.len())
        .filter_map(|offset| step_lift(&sources, &targets, offset))
        .find(|step| semiconjugates_actions(step, first, second, generators))
        .map(|step| {
            let (lowest, _) = step.table().displacement_range();
            let lift = if lowest.is_negative() {
                let shift = from_big(ceil_int(&-lowest));
                DegreeOneLift::translate(shift).as_lift().compose(&step)
            } else {
                step
            };
            debug!(points = sources.len(), "conjugator from periodic orbits");
            lift
        })
}

/// Fractional parts of the orbit of a periodic point of the first symmetric
/// generator under the whole group, sorted. `None` past `max_period` points.
fn invariant_set<G, A>(action: &A, symmetric: &[G], max_period: u64) -> Option<Vec<Real>>
where
    G: Group,
    A: LiftAction<G>,
{
    let lifts: Vec<DegreeOneLift> = symmetric.iter().map(|s| action.act(s)).collect();
    let seed = find_periodic_orbit(lifts.first()?, max_period)?;
    let limit = usize::try_from(max_period).ok()?;

    let start = fract(&seed.point);
    let mut points = BTreeSet::new();
    let mut queue = VecDeque::new();
    points.insert(start.clone());
    queue.push_back(start);

    while let Some(x) = queue.pop_front() {
        for lift in &lifts {
            let y = fract(&lift.apply(&x));
            if points.insert(y.clone()) {
                if points.len() > limit {
                    return None;
                }
                queue.push_back(y);
            }
        }
    }
    Some(points.into_iter().collect())
}

/// Right-continuous step lift equal to `targets[j + offset]` on
/// `[sources[j], sources[j + 1])`, indices taken cyclically with a unit
/// jump on wrap-around.
fn step_lift(sources: &[Real], targets: &[Real], offset: usize) -> Option<DegreeOneLift> {
    let n = targets.len();
    let value = |j: usize| {
        let k = j + offset;
        if k < n {
            targets[k].clone()
        } else {
            &targets[k - n] + Real::one()
        }
    };

    let first = sources.first()?;
    let mut pieces = Vec::with_capacity(n + 1);
    if !first.is_zero() {
        pieces.push(Piece::new(Real::zero(), value(n - 1) - Real::one(), Real::zero()));
    }
    pieces.extend(
        sources
            .iter()
            .enumerate()
            .map(|(j, x)| Piece::new(x.clone(), value(j), Real::zero())),
    );
    DegreeOneLift::from_pieces(pieces).ok()
}

/// A lift `F ≥ id` with `F ∘ f₁(s) = f₂(s) ∘ F` for every generator `s`,
/// using the default budget.
///
/// `None` only when translation numbers are certified to differ. If the
/// relation could not be verified exactly within the budget, the truncated
/// supremum is returned; call [`SemiconjugacySynthesizer::synthesize`] to
/// see its defect.
pub fn semiconjugate<G, A, B>(first: &A, second: &B, generators: &[G]) -> Option<DegreeOneLift>
where
    G: Group + Hash,
    A: LiftAction<G>,
    B: LiftAction<G>,
{
    match SemiconjugacySynthesizer::default().synthesize(first, second, generators) {
        Ok(synthesis) => {
            if !synthesis.verified {
                debug!(defect = %synthesis.defect, "returning unverified semiconjugacy");
            }
            Some(synthesis.conjugator)
        }
        Err(err) => {
            debug!(error = %err, "no semiconjugacy");
            None
        }
    }
}

/// Semiconjugacy between the ℤ-actions generated by two units.
pub fn semiconjugate_units(first: &Unit, second: &Unit) -> Option<DegreeOneLift> {
    semiconjugate(
        &PowerAction::new(first.clone()),
        &PowerAction::new(second.clone()),
        &[Power::GENERATOR],
    )
}
