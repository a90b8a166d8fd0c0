//! Cross-operation estimator checks: the operations must agree with each
//! other, not just with their own fixtures.

use proptest::prelude::*;

use tt_core::{Calibration, Estimator, QUICK_REFERENCE_MINUTES};

#[test]
fn quick_reference_agrees_with_duration_estimate() {
    let e = Estimator::default();
    for rate in 1..=20 {
        let table = e.quick_reference(rate);
        assert_eq!(table.len(), QUICK_REFERENCE_MINUTES.len());
        for row in table {
            assert_eq!(row.expected_likes, e.likes_from_duration(row.minutes, rate));
        }
    }
}

#[test]
fn breakdown_agrees_with_taps_estimate() {
    // The two-step estimate (delivery then registration) must match feeding
    // the derived app-tap count back through the observed-taps path.
    let e = Estimator::default();
    for minutes in [1, 5, 30, 240] {
        for rate in [1, 5, 20] {
            let b = e.breakdown(minutes, rate, None);
            assert_eq!(b.expected_likes, e.likes_from_taps(b.app_taps));
        }
    }
}

#[test]
fn breakdown_with_observed_count_uses_it_verbatim() {
    let e = Estimator::default();
    let b = e.breakdown(10, 5, Some(2900));
    assert_eq!(b.app_taps, 2900);
    assert_eq!(b.expected_likes, e.likes_from_taps(2900));
}

#[test]
fn comparison_rows_are_internally_consistent() {
    let e = Estimator::default();
    let rows = e.compare_rates(10, &[1, 5, 10]).unwrap();
    assert_eq!(rows.len(), 3);
    for row in rows {
        assert_eq!(row.taps_per_minute, row.tap_rate * 60);
        assert_eq!(row.expected_likes, e.likes_from_duration(10, row.tap_rate));
    }
}

#[test]
fn recalibrated_estimator_stays_consistent() {
    let e = Estimator::new(Calibration::new(0.8, 0.9));
    let b = e.breakdown(2, 10, None);
    assert_eq!(b.theoretical_taps, 1200);
    assert_eq!(b.app_taps, 960);
    assert_eq!(b.expected_likes, e.likes_from_taps(960));
    assert!(b.expected_likes < b.theoretical_taps);
}

proptest! {
    #[test]
    fn monotonic_in_duration(m1 in 0i64..=600, m2 in 0i64..=600, rate in 1i64..=20) {
        let e = Estimator::default();
        let (lo, hi) = if m1 <= m2 { (m1, m2) } else { (m2, m1) };
        prop_assert!(e.likes_from_duration(lo, rate) <= e.likes_from_duration(hi, rate));
    }

    #[test]
    fn monotonic_in_rate(minutes in 0i64..=600, r1 in 1i64..=20, r2 in 1i64..=20) {
        let e = Estimator::default();
        let (lo, hi) = if r1 <= r2 { (r1, r2) } else { (r2, r1) };
        prop_assert!(e.likes_from_duration(minutes, lo) <= e.likes_from_duration(minutes, hi));
    }

    #[test]
    fn duration_round_trips_exactly(minutes in 1i64..=600, rate in 1i64..=20) {
        // Estimate likes for a duration, then ask how long that many likes
        // takes: minutes_for_target picks the smallest sufficient duration,
        // which is the one we started from.
        let e = Estimator::default();
        let likes = e.likes_from_duration(minutes, rate);
        let back = e.minutes_for_target(likes, rate).unwrap();
        prop_assert_eq!(back, minutes);
    }

    #[test]
    fn target_result_is_always_sufficient_and_minimal(target in 0i64..=1_000_000, rate in 1i64..=20) {
        let e = Estimator::default();
        let minutes = e.minutes_for_target(target, rate).unwrap();
        prop_assert!(e.likes_from_duration(minutes, rate) >= target);
        if minutes > 0 {
            prop_assert!(e.likes_from_duration(minutes - 1, rate) < target);
        }
    }

    #[test]
    fn derived_app_taps_never_exceed_theoretical(minutes in 0i64..=600, rate in 1i64..=20) {
        let b = Estimator::default().breakdown(minutes, rate, None);
        prop_assert!(b.app_taps <= b.theoretical_taps);
        prop_assert!(b.expected_likes >= 0);
    }

    #[test]
    fn observed_taps_never_gain_likes(taps in 0i64..=10_000_000) {
        prop_assert!(Estimator::default().likes_from_taps(taps) <= taps);
    }
}
