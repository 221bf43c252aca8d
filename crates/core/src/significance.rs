//! Wald-interval significance filter for random effects.
//!
//! A random intercept is only drawn on the map when its interval
//! `[p - z*err, p + z*err]` excludes zero. Everything else is masked and
//! rendered as missing.

use crate::error::{MietkarteError, Result};
use crate::model::RandomEffectEstimate;

/// Multiplier applied to the standard error when building the interval.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ConfidenceMultiplier(f64);

impl ConfidenceMultiplier {
    /// Plus or minus one standard error.
    pub const ONE_SIGMA: ConfidenceMultiplier = ConfidenceMultiplier(1.0);
    /// Two-sided 95% normal interval.
    pub const NINETY_FIVE: ConfidenceMultiplier = ConfidenceMultiplier(1.96);

    /// Creates a multiplier, rejecting negative and non-finite values.
    pub fn new(z: f64) -> Result<Self> {
        if z.is_finite() && z >= 0.0 {
            Ok(Self(z))
        } else {
            Err(MietkarteError::InvalidParameter(format!(
                "confidence multiplier must be a non-negative number, got {z}"
            )))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for ConfidenceMultiplier {
    fn default() -> Self {
        Self::NINETY_FIVE
    }
}

/// Returns `Some(pointestimate)` when the interval excludes zero, `None`
/// otherwise.
///
/// A zero estimate is never significant. NaN in any input yields `None`.
pub fn classify_significance(pointestimate: f64, err: f64, z: f64) -> Option<f64> {
    let half_width = z * err;
    if pointestimate < 0.0 && pointestimate + half_width < 0.0 {
        Some(pointestimate)
    } else if pointestimate > 0.0 && pointestimate - half_width > 0.0 {
        Some(pointestimate)
    } else {
        None
    }
}

/// Applies [`classify_significance`] with a fixed multiplier.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SignificanceFilter {
    z: ConfidenceMultiplier,
}

impl SignificanceFilter {
    pub fn new(z: ConfidenceMultiplier) -> Self {
        Self { z }
    }

    pub fn z(&self) -> f64 {
        self.z.value()
    }

    /// Significant point estimate of `effect`, or `None` when masked.
    pub fn apply(&self, effect: &RandomEffectEstimate) -> Option<f64> {
        classify_significance(effect.pointestimate, effect.err, self.z.value())
    }

    pub fn apply_all(&self, effects: &[RandomEffectEstimate]) -> Vec<Option<f64>> {
        effects.iter().map(|e| self.apply(e)).collect()
    }
}
