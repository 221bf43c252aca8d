//! Ordered, name-keyed coefficient tables.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{MietkarteError, Result};
use crate::model::CoefficientRow;

/// Coefficient rows in summary order, unique by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoefficientTable {
    rows: IndexMap<String, CoefficientRow>,
}

/// A coefficient name with its row from each of two tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoefficientComparison {
    pub name: String,
    pub left: Option<CoefficientRow>,
    pub right: Option<CoefficientRow>,
}

impl CoefficientComparison {
    /// Difference `right.coef - left.coef` when both sides are present.
    pub fn coef_delta(&self) -> Option<f64> {
        match (&self.left, &self.right) {
            (Some(l), Some(r)) => Some(r.coef - l.coef),
            _ => None,
        }
    }
}

impl CoefficientTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row; `line` is only used for the duplicate-name error.
    pub(crate) fn insert(&mut self, row: CoefficientRow, line: usize) -> Result<()> {
        if self.rows.contains_key(&row.name) {
            return Err(MietkarteError::ParseError {
                line,
                msg: format!("duplicate coefficient name `{}`", row.name),
            });
        }
        self.rows.insert(row.name.clone(), row);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&CoefficientRow> {
        self.rows.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CoefficientRow> {
        self.rows.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows whose p-value is strictly below `alpha`.
    pub fn significant(&self, alpha: f64) -> Vec<&CoefficientRow> {
        self.iter().filter(|row| row.pval < alpha).collect()
    }

    pub fn confidence_interval(&self, name: &str, z: f64) -> Option<(f64, f64)> {
        self.get(name).map(|row| row.confidence_interval(z))
    }

    /// Outer join by name.
    ///
    /// Names of `self` come first in their order, followed by names only
    /// present in `other`.
    pub fn compare(&self, other: &CoefficientTable) -> Vec<CoefficientComparison> {
        let mut out: Vec<CoefficientComparison> = self
            .iter()
            .map(|row| CoefficientComparison {
                name: row.name.clone(),
                left: Some(row.clone()),
                right: other.get(&row.name).cloned(),
            })
            .collect();
        out.extend(
            other
                .iter()
                .filter(|row| !self.rows.contains_key(&row.name))
                .map(|row| CoefficientComparison {
                    name: row.name.clone(),
                    left: None,
                    right: Some(row.clone()),
                }),
        );
        out
    }

    pub fn into_rows(self) -> Vec<CoefficientRow> {
        self.rows.into_values().collect()
    }
}

impl<'a> IntoIterator for &'a CoefficientTable {
    type Item = &'a CoefficientRow;
    type IntoIter = indexmap::map::Values<'a, String, CoefficientRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.values()
    }
}
