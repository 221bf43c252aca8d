//! Per-zip random intercepts exported from a mixed-effects fit.

use serde::{Deserialize, Serialize};

/// Random intercept for one zip code.
///
/// `pointestimate` is on the log-price scale, so `exp(pointestimate)` is the
/// multiplicative price effect of the zip code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomEffectEstimate {
    pub zip: String,
    pub pointestimate: f64,
    /// Standard error of the point estimate.
    pub err: f64,
}

impl RandomEffectEstimate {
    pub fn new(zip: impl Into<String>, pointestimate: f64, err: f64) -> Self {
        Self {
            zip: zip.into(),
            pointestimate,
            err,
        }
    }
}
