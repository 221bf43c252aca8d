//! Tests for the Wald-interval significance filter.

use mietkarte_core::model::RandomEffectEstimate;
use mietkarte_core::significance::{
    ConfidenceMultiplier, SignificanceFilter, classify_significance,
};

const ESTIMATES: [f64; 9] = [-0.8, -0.2, -0.05, -0.001, 0.001, 0.03, 0.05, 0.3, 1.2];
const ERRORS: [f64; 6] = [0.0, 0.001, 0.01, 0.03, 0.1, 0.5];
const MULTIPLIERS: [f64; 4] = [0.0, 1.0, 1.96, 2.58];

// ============================================================================
// Decision rule
// ============================================================================

#[test]
fn test_positive_estimates_kept_iff_above_half_width() {
    for &p in ESTIMATES.iter().filter(|p| **p > 0.0) {
        for &err in &ERRORS {
            for &z in &MULTIPLIERS {
                let expected = if p > z * err { Some(p) } else { None };
                assert_eq!(
                    classify_significance(p, err, z),
                    expected,
                    "p={p} err={err} z={z}"
                );
            }
        }
    }
}

#[test]
fn test_negative_estimates_kept_iff_below_half_width() {
    for &p in ESTIMATES.iter().filter(|p| **p < 0.0) {
        for &err in &ERRORS {
            for &z in &MULTIPLIERS {
                let expected = if -p > z * err { Some(p) } else { None };
                assert_eq!(
                    classify_significance(p, err, z),
                    expected,
                    "p={p} err={err} z={z}"
                );
            }
        }
    }
}

#[test]
fn test_zero_estimate_never_significant() {
    for &err in &ERRORS {
        for &z in &MULTIPLIERS {
            assert_eq!(classify_significance(0.0, err, z), None);
            assert_eq!(classify_significance(-0.0, err, z), None);
        }
    }
}

#[test]
fn test_zero_error_reduces_to_nonzero_check() {
    assert_eq!(classify_significance(0.01, 0.0, 1.96), Some(0.01));
    assert_eq!(classify_significance(-0.01, 0.0, 1.96), Some(-0.01));
    assert_eq!(classify_significance(0.0, 0.0, 1.96), None);
}

#[test]
fn test_interval_covering_zero_is_masked() {
    // [-0.1088, 0.0088] covers zero
    assert_eq!(classify_significance(-0.05, 0.03, 1.96), None);
    // [-0.08, -0.02] does not
    assert_eq!(classify_significance(-0.05, 0.03, 1.0), Some(-0.05));
}

#[test]
fn test_boundary_is_not_significant() {
    // Interval touching zero does not exclude it.
    assert_eq!(classify_significance(0.5, 0.25, 2.0), None);
    assert_eq!(classify_significance(-0.5, 0.25, 2.0), None);
}

#[test]
fn test_classification_is_deterministic() {
    for &p in &ESTIMATES {
        for &err in &ERRORS {
            let first = classify_significance(p, err, 1.96);
            let second = classify_significance(p, err, 1.96);
            assert_eq!(first, second);
        }
    }
}

// ============================================================================
// SignificanceFilter
// ============================================================================

#[test]
fn test_filter_uses_supplied_multiplier() {
    let effect = RandomEffectEstimate::new("12057", -0.05, 0.03);
    let strict = SignificanceFilter::new(ConfidenceMultiplier::NINETY_FIVE);
    let loose = SignificanceFilter::new(ConfidenceMultiplier::ONE_SIGMA);

    assert_eq!(strict.apply(&effect), None);
    assert_eq!(loose.apply(&effect), Some(-0.05));
    assert_eq!(strict.z(), 1.96);
    assert_eq!(SignificanceFilter::default().z(), 1.96);
}

#[test]
fn test_filter_apply_all_preserves_order() {
    let effects = vec![
        RandomEffectEstimate::new("10117", 0.35, 0.05),
        RandomEffectEstimate::new("10997", 0.02, 0.03),
        RandomEffectEstimate::new("13059", -0.21, 0.04),
    ];
    let filter = SignificanceFilter::new(ConfidenceMultiplier::new(1.96).unwrap());
    assert_eq!(filter.apply_all(&effects), vec![Some(0.35), None, Some(-0.21)]);
}
