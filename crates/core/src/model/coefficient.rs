//! Regression coefficients extracted from a summary table.

use serde::{Deserialize, Serialize};

/// One row of a regression summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoefficientRow {
    pub name: String,
    pub coef: f64,
    /// Standard error of `coef`.
    pub std: f64,
    pub tstat: f64,
    pub pval: f64,
}

impl CoefficientRow {
    /// Wald interval `coef ± z * std`.
    pub fn confidence_interval(&self, z: f64) -> (f64, f64) {
        (self.coef - z * self.std, self.coef + z * self.std)
    }
}
