//! Post-processing of per-zip random intercepts.

use std::collections::HashSet;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::{MietkarteError, Result};
use crate::model::RandomEffectEstimate;
use crate::significance::SignificanceFilter;

/// Random intercepts sorted ascending by point estimate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RandomEffects {
    estimates: Vec<RandomEffectEstimate>,
}

/// A random intercept together with its filtered value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedEffect {
    pub zip: String,
    pub pointestimate: f64,
    pub err: f64,
    /// The point estimate if significant, `None` if masked.
    pub significant: Option<f64>,
}

impl AnnotatedEffect {
    /// Multiplicative price effect of a significant intercept.
    pub fn multiplicative_effect(&self) -> Option<f64> {
        self.significant.map(f64::exp)
    }
}

impl RandomEffects {
    /// Builds the table, rejecting repeated zip codes.
    pub fn new(mut estimates: Vec<RandomEffectEstimate>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(estimates.len());
        for e in &estimates {
            if !seen.insert(e.zip.as_str()) {
                return Err(MietkarteError::InvalidParameter(format!(
                    "duplicate random effect for zip {}",
                    e.zip
                )));
            }
        }
        estimates.sort_by(|a, b| a.pointestimate.total_cmp(&b.pointestimate));
        Ok(Self { estimates })
    }

    /// Loads a JSON array of `{zip, pointestimate, err}` records.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let estimates: Vec<RandomEffectEstimate> = serde_json::from_str(&text)?;
        debug!(count = estimates.len(), "loaded random effects");
        Self::new(estimates)
    }

    pub fn get(&self, zip: &str) -> Option<&RandomEffectEstimate> {
        self.estimates.iter().find(|e| e.zip == zip)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RandomEffectEstimate> {
        self.estimates.iter()
    }

    pub fn len(&self) -> usize {
        self.estimates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.estimates.is_empty()
    }

    /// Every estimate with its filtered value, ascending by point estimate.
    pub fn annotate(&self, filter: &SignificanceFilter) -> Vec<AnnotatedEffect> {
        self.estimates
            .iter()
            .map(|e| AnnotatedEffect {
                zip: e.zip.clone(),
                pointestimate: e.pointestimate,
                err: e.err,
                significant: filter.apply(e),
            })
            .collect()
    }

    /// Significant effects only, largest first.
    pub fn ranked_significant(&self, filter: &SignificanceFilter) -> Vec<AnnotatedEffect> {
        let mut ranked: Vec<AnnotatedEffect> = self
            .annotate(filter)
            .into_iter()
            .filter(|e| e.significant.is_some())
            .collect();
        ranked.reverse();
        ranked
    }

    /// Price prediction for a property in `zip`.
    ///
    /// Adds the zip intercept to a fixed-effects prediction on the log
    /// scale and transforms back. `None` for zips without an estimate.
    pub fn adjusted_prediction(&self, log_prediction: f64, zip: &str) -> Option<f64> {
        self.get(zip)
            .map(|e| (log_prediction + e.pointestimate).exp())
    }
}
