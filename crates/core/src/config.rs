//! Analysis parameters.
//!
//! Contains AnalysisConfig, the single place the report's tunables live.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::coeftable::{RenameRules, TableLayout};
use crate::error::{MietkarteError, Result};
use crate::significance::{ConfidenceMultiplier, SignificanceFilter};

/// Parameters shared by the analysis steps.
///
/// Loaded from a JSON document where every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Standard-error multiplier of the significance filter.
    pub significance_z: f64,

    /// Header and footer line counts of coefficient tables.
    pub table_layout: TableLayout,

    /// Ordered renames applied to coefficient names.
    pub renames: RenameRules,

    /// Listings above this quantile of `square_meters` are dropped.
    pub size_quantile: f64,

    pub histogram_bins: usize,

    /// Zip code whose centroid distances are measured from.
    pub reference_zip: String,

    /// GeoJSON feature property holding the zip code.
    pub zip_property: String,

    /// Directory relative output paths are resolved against.
    pub output_dir: PathBuf,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            significance_z: ConfidenceMultiplier::NINETY_FIVE.value(),
            table_layout: TableLayout::default(),
            renames: RenameRules::default(),
            size_quantile: 0.999,
            histogram_bins: 50,
            reference_zip: "10117".to_string(),
            zip_property: "plz".to_string(),
            output_dir: PathBuf::from("documents/plots"),
        }
    }
}

impl AnalysisConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ConfidenceMultiplier::new(self.significance_z)?;
        if !(0.0..=1.0).contains(&self.size_quantile) {
            return Err(MietkarteError::InvalidParameter(format!(
                "size_quantile must be within [0, 1], got {}",
                self.size_quantile
            )));
        }
        if self.histogram_bins == 0 {
            return Err(MietkarteError::InvalidParameter(
                "histogram_bins must be positive".to_string(),
            ));
        }
        if let Some((_, to)) = self.renames.rules().iter().find(|(from, _)| from.is_empty()) {
            return Err(MietkarteError::InvalidParameter(format!(
                "rename rule to `{to}` has an empty pattern"
            )));
        }
        Ok(())
    }

    pub fn significance_filter(&self) -> Result<SignificanceFilter> {
        Ok(SignificanceFilter::new(ConfidenceMultiplier::new(
            self.significance_z,
        )?))
    }

    /// Resolves `path` against `output_dir` unless it is absolute.
    pub fn output_path(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.output_dir.join(path)
        }
    }
}
