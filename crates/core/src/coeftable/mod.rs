//! Coefficient tables read from LaTeX regression summaries.
//!
//! The regression notebooks export their summaries as LaTeX `tabular`
//! blocks. This module turns those back into structured rows so fitted
//! models can be compared side by side.

mod layout;
mod parser;
mod table;

pub use layout::{RenameRules, TableLayout};
pub use parser::{parse_coefficient_table, read_coefficient_table};
pub use table::{CoefficientComparison, CoefficientTable};
