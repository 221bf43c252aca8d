//! mietkarte - Statistical post-processing for Berlin listing price models.
//!
//! Sits between externally fitted regression models and the report charts:
//! filters random intercepts by significance, reads LaTeX coefficient
//! summaries back into tables, and prepares listing statistics and zip-zone
//! joins for plotting.

pub mod coeftable;
pub mod config;
pub mod effects;
pub mod error;
pub mod geo;
pub mod model;
pub mod significance;
pub mod stats;

pub use coeftable::{
    CoefficientTable, RenameRules, TableLayout, parse_coefficient_table, read_coefficient_table,
};
pub use config::AnalysisConfig;
pub use effects::{AnnotatedEffect, RandomEffects};
pub use error::{MietkarteError, Result};
pub use significance::{ConfidenceMultiplier, SignificanceFilter, classify_significance};
