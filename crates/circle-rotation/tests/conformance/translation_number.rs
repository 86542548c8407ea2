//! Translation Number Conformance Tests
//!
//! Property-based tests for the certified estimator: calibration, the
//! algebraic laws of τ, the integer sandwich, and exactness on periodic
//! orbits.

use std::num::NonZeroU64;

use circle_rotation::foundation::exactmath::{dist, dyadic, from_big, int, q};
use circle_rotation::periodic::{find_periodic_orbit, is_periodic_point, rational_rotation};
use circle_rotation::prelude::*;
use circle_rotation::translation::{
    average_displacement, composition_within_unit, displacement_bounds, integer_sandwich, point_with_displacement,
    strict_bounds_hold, translation_number_of_commuting_product, translation_number_of_power,
    translation_number_of_zpow,
};
use proptest::prelude::*;

const GRID: i64 = 12;

fn lift_from(cuts: Vec<i64>, weights: Vec<i64>, base: i64) -> DegreeOneLift {
    let total: i64 = weights.iter().take(cuts.len() + 1).sum::<i64>().max(1);
    let mut xs = vec![0];
    xs.extend(cuts);

    let mut rise = 0;
    let points: Vec<(Real, Real)> = xs
        .iter()
        .zip(weights.iter())
        .map(|(&x, &w)| {
            let point = (q(x, GRID), q(base, GRID) + q(rise, total));
            rise += w;
            point
        })
        .collect();

    DegreeOneLift::from_breakpoints(&points).unwrap()
}

fn lift_strategy() -> impl Strategy<Value = DegreeOneLift> {
    (
        proptest::collection::btree_set(1..GRID, 0..3),
        proptest::collection::vec(0i64..4, 4),
        -GRID..GRID,
    )
        .prop_map(|(cuts, mut weights, base)| {
            let used = cuts.len() + 1;
            if weights[..used].iter().all(|&w| w == 0) {
                weights[0] = 1;
            }
            lift_from(cuts.into_iter().collect(), weights, base)
        })
}

fn unit_strategy() -> impl Strategy<Value = Unit> {
    (
        proptest::collection::btree_set(1..GRID, 0..3),
        proptest::collection::vec(1i64..4, 4),
        -GRID..GRID,
    )
        .prop_map(|(cuts, weights, base)| {
            lift_from(cuts.into_iter().collect(), weights, base)
                .as_unit()
                .expect("continuous and strictly increasing")
        })
}

fn rational_strategy() -> impl Strategy<Value = Real> {
    (-60i64..60, 1i64..13).prop_map(|(n, d)| q(n, d))
}

fn tolerance() -> Real {
    q(1, 64)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_error_bound_within_tolerance(f in lift_strategy(), k in 1u32..8) {
        let tol = q(1, 1 << k);
        let est = translation_number(&f, &tol).unwrap();
        prop_assert!(est.error_bound <= tol);
    }

    #[test]
    fn test_near_evaluation_at_zero(f in lift_strategy()) {
        let est = translation_number(&f, &tolerance()).unwrap();
        let f0 = f.apply(&int(0));
        prop_assert!(dist(&f0, &est.value) <= int(1) + &est.error_bound);
    }

    #[test]
    fn test_translation_calibration(x in rational_strategy()) {
        let est = translation_number(DegreeOneLift::translate(x.clone()).as_lift(), &q(1, 1000)).unwrap();
        prop_assert!(est.exact);
        prop_assert_eq!(est.value, x);
    }

    #[test]
    fn test_monotone(f in lift_strategy(), h in lift_strategy()) {
        let g = f.join(&h);
        prop_assert!(f.le(&g));

        let (ef, eg) = (translation_number(&f, &tolerance()).unwrap(), translation_number(&g, &tolerance()).unwrap());
        prop_assert!(ef.lower() <= eg.upper());
    }

    #[test]
    fn test_power_law(f in lift_strategy(), n in 0u64..5) {
        let direct = translation_number(&f.iterate_pow(n), &tolerance()).unwrap();
        let scaled = translation_number(&f, &tolerance()).unwrap().scaled(n as i64);
        prop_assert!(direct.is_consistent_with(&scaled));

        let via_base = translation_number_of_power(&f, n, &tolerance()).unwrap();
        prop_assert!(via_base.is_consistent_with(&direct));
    }

    #[test]
    fn test_inverse_negates(u in unit_strategy()) {
        let forward = translation_number(u.as_lift(), &tolerance()).unwrap();
        let backward = translation_number(u.inverse().as_lift(), &tolerance()).unwrap();
        prop_assert!(backward.is_consistent_with(&forward.scaled(-1)));

        let zpow = translation_number_of_zpow(&u, -2, &tolerance()).unwrap();
        prop_assert!(zpow.is_consistent_with(&forward.scaled(-2)));
    }

    #[test]
    fn test_additive_on_commuting_lifts(f in lift_strategy(), m in 1u64..3, n in 1u64..3) {
        let (a, b) = (f.iterate_pow(m), f.iterate_pow(n));
        prop_assert!(a.commutes_with(&b));

        let sum = translation_number(&a, &tolerance())
            .unwrap()
            .plus(&translation_number(&b, &tolerance()).unwrap());
        let product = translation_number(&a.compose(&b), &tolerance()).unwrap();
        prop_assert!(product.is_consistent_with(&sum));

        let transferred = translation_number_of_commuting_product(&a, &b, &tolerance(), 20).unwrap();
        prop_assert!(transferred.is_consistent_with(&product));
    }

    #[test]
    fn test_conjugation_invariance(u in unit_strategy(), g in lift_strategy()) {
        let before = translation_number(&g, &tolerance()).unwrap();
        let after = translation_number(&u.conjugate(&g), &tolerance()).unwrap();
        prop_assert!(before.is_consistent_with(&after));
    }

    #[test]
    fn test_integer_sandwich(f in lift_strategy(), k in -20i64..20) {
        let x = q(k, 7);
        let est = translation_number(&f, &tolerance()).unwrap();

        let (low, high) = integer_sandwich(&f, &x);
        prop_assert!(low <= f.apply(&x) && f.apply(&x) <= high);

        let (floor, ceil) = displacement_bounds(&f, &x);
        prop_assert!(from_big(floor) <= est.upper());
        prop_assert!(est.lower() <= from_big(ceil));
        prop_assert!(f.apply(&x) < &x + est.upper() + int(1));
        prop_assert!(&x + est.lower() - int(1) < f.apply(&x));
    }

    #[test]
    fn test_composition_drifts_less_than_one(f in lift_strategy(), g in lift_strategy()) {
        prop_assert!(composition_within_unit(&f, &g));
    }

    #[test]
    fn test_average_displacement_independent_of_base_point(f in lift_strategy(), k in -20i64..20) {
        let dyadic = translation_number(&f, &tolerance()).unwrap();
        let average = average_displacement(&f, &q(k, 5), NonZeroU64::new(40).unwrap());
        prop_assert!(average.is_consistent_with(&dyadic));
    }

    #[test]
    fn test_conjugated_rational_rotation_is_exact(u in unit_strategy(), x in rational_strategy()) {
        let f = u.conjugate(DegreeOneLift::translate(x.clone()).as_lift());
        let est = translation_number(&f, &q(1, 1000)).unwrap();
        prop_assert!(est.exact);
        prop_assert_eq!(&est.value, &x);
        for k in -6..=6 {
            prop_assert!(strict_bounds_hold(&f, &q(k, 5), &x));
        }

        // Continuous lifts attain their translation number
        let point = point_with_displacement(&f, &x).unwrap();
        prop_assert_eq!(f.apply(&point), &point + &x);
    }
}

#[test]
fn test_identity_is_zero() {
    let est = translation_number(&DegreeOneLift::identity(), &q(1, 1_000_000)).unwrap();
    assert!(est.exact);
    assert_eq!(est.value, int(0));
}

#[test]
fn test_calibration_example() {
    let est = translation_number(DegreeOneLift::translate(q(37, 100)).as_lift(), &q(1, 1000)).unwrap();
    assert_eq!(est.value, q(37, 100));
    assert_eq!(est.error_bound, int(0));
}

#[test]
fn test_rational_exactness() {
    // 0 ↦ 2/3 ↦ 4/3 ↦ 2
    let f = DegreeOneLift::from_breakpoints(&[
        (int(0), q(2, 3)),
        (q(1, 6), q(3, 4)),
        (q(1, 3), int(1)),
        (q(2, 3), q(4, 3)),
    ])
    .unwrap();
    assert!(is_periodic_point(&f, &int(0), 3, &2.into()));

    let est = translation_number(&f, &q(1, 1_000_000)).unwrap();
    assert!(est.exact);
    assert_eq!(est.value, q(2, 3));

    let orbit = find_periodic_orbit(&f, 3).unwrap();
    assert_eq!(orbit.rotation(), q(2, 3));
}

#[test]
fn test_additivity_fails_without_commutation() {
    let f = DegreeOneLift::from_breakpoints(&[(int(0), int(0)), (q(1, 2), q(3, 4))]).unwrap();
    let g = DegreeOneLift::from_breakpoints(&[(int(0), q(1, 4)), (q(1, 2), q(1, 2))]).unwrap();
    assert!(!f.commutes_with(&g));

    // f fixes 0 and g fixes 1/2
    assert_eq!(rational_rotation(&f, 1), Some(int(0)));
    assert_eq!(rational_rotation(&g, 1), Some(int(0)));

    // f ∘ g moves every point by at least 1/6
    let fg = f.compose(&g);
    let (least, _) = fg.table().displacement_range();
    assert_eq!(least, q(1, 6));

    let est = translation_number(&fg, &q(1, 100)).unwrap();
    assert!(est.lower() > int(0));

    assert!(matches!(
        translation_number_of_commuting_product(&f, &g, &q(1, 100), 20),
        Err(Error::NotCommuting(_))
    ));
}

#[test]
fn test_semiconjugacy_invariance() {
    let h = DegreeOneLift::from_breakpoints(&[(int(0), q(1, 5)), (q(1, 3), q(1, 2)), (q(1, 2), q(4, 5))])
        .unwrap()
        .as_unit()
        .unwrap();
    let f = DegreeOneLift::from_breakpoints(&[(int(0), q(1, 7)), (q(1, 2), q(3, 4))])
        .unwrap()
        .as_unit()
        .unwrap();
    let g = h.conjugate_unit(&f);
    assert_eq!(h.as_lift().compose(f.as_lift()), g.as_lift().compose(h.as_lift()));

    let tol = q(1, 512);
    let (ef, eg) = (
        translation_number(f.as_lift(), &tol).unwrap(),
        translation_number(g.as_lift(), &tol).unwrap(),
    );
    assert!(ef.is_consistent_with(&eg));
}

#[test]
fn test_tolerance_errors() {
    let f = DegreeOneLift::identity();
    assert!(matches!(translation_number(&f, &int(0)), Err(Error::InvalidTolerance(_))));

    // Only an explicit cap turns a small tolerance into an error
    let capped = TranslationNumberEstimator::new(circle_rotation::config::EstimatorConfig {
        max_level: Some(4),
        detect_periodic: false,
        ..Default::default()
    });
    assert!(matches!(
        capped.estimate(&f, &q(1, 1000)),
        Err(Error::PrecisionBudgetExceeded { max_level: 4, .. })
    ));
    assert!(translation_number(&f, &dyadic(80)).unwrap().exact);
}

#[test]
fn test_fine_tolerance_on_orbit_that_never_closes() {
    // The orbit of 0 converges to a 26-periodic orbit without reaching it
    let f = DegreeOneLift::from_breakpoints(&[(int(0), q(1, 7)), (q(1, 2), q(3, 4))]).unwrap();
    assert_ne!(f.iterate_at(&int(0), 26), int(5));

    let tolerance = dyadic(20);
    let est = translation_number(&f, &tolerance).unwrap();
    assert!(est.error_bound <= tolerance);
    assert_eq!(est.value, q(5, 26));

    // Without the periodic search the rounded orbit still certifies it
    let walk_only = TranslationNumberEstimator::new(circle_rotation::config::EstimatorConfig {
        detect_periodic: false,
        ..Default::default()
    });
    let fresh = DegreeOneLift::from_breakpoints(&[(int(0), q(1, 7)), (q(1, 2), q(3, 4))]).unwrap();
    let tolerance = dyadic(11);
    let est = walk_only.estimate(&fresh, &tolerance).unwrap();
    assert!(!est.exact);
    assert!(est.error_bound <= tolerance);
    assert!(est.contains(&q(5, 26)));
    assert!(est.level > 9);
}
