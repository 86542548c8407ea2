//! Semiconjugacy Conformance Tests
//!
//! Synthesis round trips for ℤ and ℤ² actions, rejection of mismatched
//! translation numbers, and the relation laws.

use circle_rotation::config::SynthesisConfig;
use circle_rotation::foundation::exactmath::{dist, int, q};
use circle_rotation::foundation::FnAction;
use circle_rotation::prelude::*;
use circle_rotation::semiconj::{is_semiconjugacy, semiconjugates_actions, Semiconjugacy, ORBIT_BOUND};
use proptest::prelude::*;

fn homeo(points: &[(i64, i64, i64, i64)]) -> Unit {
    let points: Vec<(Real, Real)> = points.iter().map(|&(a, b, c, d)| (q(a, b), q(c, d))).collect();
    DegreeOneLift::from_breakpoints(&points).unwrap().as_unit().unwrap()
}

fn unit_strategy() -> impl Strategy<Value = Unit> {
    (1i64..6, 1i64..6, 1i64..6).prop_map(|(a, b, c)| {
        // Two pieces meeting at 1/2, rises a : b of the period, offset c/12
        let total = a + b;
        homeo(&[(0, 1, c, 12), (1, 2, c * total + 12 * a, 12 * total)])
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn test_round_trip_for_conjugated_rotations(h in unit_strategy(), n in 0i64..6, d in 1i64..5) {
        let rotation = DegreeOneLift::translate(q(n, d));
        let conjugated = h.conjugate_unit(&rotation);

        let conjugator = semiconjugate_units(&rotation, &conjugated).unwrap();
        prop_assert!(is_semiconjugacy(&conjugator, rotation.as_lift(), conjugated.as_lift()));

        // F(f1(x)) = f2(F(x)) on sample points
        for k in -6..=6 {
            let x = q(k, 5);
            prop_assert_eq!(
                conjugator.apply(&rotation.apply(&x)),
                conjugated.apply(&conjugator.apply(&x))
            );
        }
    }
}

#[test]
fn test_synthesis_round_trip_cyclic_group() {
    let h = homeo(&[(0, 1, 1, 5), (1, 3, 1, 2), (1, 2, 4, 5)]);
    let f1 = DegreeOneLift::translate(q(2, 5));
    let f2 = h.conjugate_unit(&f1);

    let synthesis = SemiconjugacySynthesizer::default()
        .synthesize(&PowerAction::new(f1.clone()), &PowerAction::new(f2.clone()), &[Power::GENERATOR])
        .unwrap();

    assert!(synthesis.verified);
    assert!(DegreeOneLift::identity().le(&synthesis.conjugator));
    assert!(synthesis
        .conjugator
        .le(DegreeOneLift::translate(int(ORBIT_BOUND)).as_lift()));

    let semi = Semiconjugacy::new(synthesis.conjugator, f1.as_lift().clone(), f2.as_lift().clone());
    assert!(semi.is_some());
}

#[test]
fn test_synthesis_rank_two_group() {
    let h = homeo(&[(0, 1, 1, 5), (1, 3, 1, 2), (1, 2, 4, 5)]);
    let (a, b) = (DegreeOneLift::translate(q(1, 2)), DegreeOneLift::translate(q(1, 3)));
    let first = CommutingPairAction::new(a.clone(), b.clone()).unwrap();
    let second = CommutingPairAction::new(h.conjugate_unit(&a), h.conjugate_unit(&b)).unwrap();

    let generators = [(Power(1), Power(0)), (Power(0), Power(1))];
    let synthesis = SemiconjugacySynthesizer::default()
        .synthesize(&first, &second, &generators)
        .unwrap();

    assert!(synthesis.verified);
    assert!(semiconjugates_actions(&synthesis.conjugator, &first, &second, &generators));
    assert!(semiconjugate(&first, &second, &generators).is_some());
}

#[test]
fn test_mismatched_translation_numbers() {
    let f1 = DegreeOneLift::translate(q(1, 2));
    let f2 = DegreeOneLift::translate(q(1, 3));

    let err = SemiconjugacySynthesizer::default()
        .synthesize(&PowerAction::new(f1.clone()), &PowerAction::new(f2.clone()), &[Power::GENERATOR])
        .unwrap_err();
    // Terms are x ↦ x + n/6, first above x + 2 at n = 13
    assert!(matches!(err, Error::TranslationNumberMismatch { radius: 13, .. }));

    assert!(semiconjugate_units(&f1, &f2).is_none());
}

#[test]
fn test_closure_actions() {
    // Same ℤ-action given two ways
    let u = homeo(&[(0, 1, 1, 5), (1, 3, 1, 2), (1, 2, 4, 5)]);
    let by_power = PowerAction::new(u.clone());
    let by_closure = FnAction::new(move |p: &Power| u.zpow(p.0).as_lift().clone());

    let synthesis = SemiconjugacySynthesizer::default()
        .synthesize(&by_power, &by_closure, &[Power::GENERATOR])
        .unwrap();
    assert_eq!(synthesis.conjugator, DegreeOneLift::identity());
    assert!(synthesis.verified);
}

#[test]
fn test_budget_without_convergence() {
    let h = homeo(&[(0, 1, 1, 5), (1, 3, 1, 2), (1, 2, 4, 5)]);
    let f1 = DegreeOneLift::translate(q(1, 5));
    let f2 = h.conjugate_unit(&f1);

    // Radius 1 only sees residues ±1/5 of the five distinct terms
    let synthesizer = SemiconjugacySynthesizer::new(SynthesisConfig {
        max_radius: 1,
        patience: 2,
        ..Default::default()
    });
    let synthesis = synthesizer
        .synthesize(&PowerAction::new(f1), &PowerAction::new(f2), &[Power::GENERATOR])
        .unwrap();

    assert_eq!(synthesis.radius, 1);
    assert_eq!(synthesis.elements, 3);
}

fn creeping() -> Unit {
    // Fixed point at 1/2, every other orbit only converges to it
    homeo(&[(0, 1, 1, 4), (1, 2, 1, 2)])
}

#[test]
fn test_equal_translation_numbers_without_settling_join() {
    let f = creeping();
    let id = Unit::identity();

    let conjugator = semiconjugate_units(&id, &f).expect("both fix a point");
    assert!(is_semiconjugacy(&conjugator, id.as_lift(), f.as_lift()));

    let synthesis = SemiconjugacySynthesizer::default()
        .synthesize(&PowerAction::new(f.clone()), &PowerAction::new(id.clone()), &[Power::GENERATOR])
        .unwrap();
    assert!(synthesis.verified);
    assert_eq!(synthesis.method, SynthesisMethod::PeriodicOrbits);
}

#[test]
fn test_truncated_conjugator_nearly_commutes_at_samples() {
    let f = creeping();
    let synthesizer = SemiconjugacySynthesizer::new(SynthesisConfig {
        max_radius: 16,
        max_period: 0,
        ..Default::default()
    });
    let synthesis = synthesizer
        .synthesize(&PowerAction::new(f.clone()), &PowerAction::new(Unit::identity()), &[Power::GENERATOR])
        .unwrap();
    assert!(!synthesis.verified);
    assert_eq!(synthesis.method, SynthesisMethod::Truncated);

    // The defect is a uniform bound
    let conjugator = &synthesis.conjugator;
    for k in -12..=12 {
        let x = q(k, 5);
        let gap = dist(&conjugator.apply(&f.apply(&x)), &conjugator.apply(&x));
        assert!(gap <= synthesis.defect, "at {}", x);
    }

    // and away from the repelling point the relation holds to 2^-16
    for k in [1, 2, 5, 6, 9] {
        let x = q(k, 4);
        let gap = dist(&conjugator.apply(&f.apply(&x)), &conjugator.apply(&x));
        assert!(gap <= q(1, 1 << 16), "at {}", x);
    }
}

