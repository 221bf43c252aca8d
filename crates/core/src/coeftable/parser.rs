//! Line-oriented parser for LaTeX regression summaries.
//!
//! Data rows look like
//!
//! ```text
//! rooms3 & 0.1234 & 0.05 & 2.47 & 0.013 \\
//! ```
//!
//! and sit between a fixed number of header and footer lines.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::layout::{RenameRules, TableLayout};
use super::table::CoefficientTable;
use crate::error::{MietkarteError, Result};
use crate::model::CoefficientRow;

const FIELD_COUNT: usize = 5;
const NUMERIC_FIELDS: [&str; 4] = ["coef", "std", "tstat", "pval"];

/// Row terminator `\\`, optionally followed by `\hline`.
static ROW_TERMINATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\\\\s*(\\hline)?\s*$").expect("valid row terminator regex"));

/// Parses a coefficient table from its text.
///
/// Fails on the first malformed row; no partial table is returned.
pub fn parse_coefficient_table(
    text: &str,
    layout: &TableLayout,
    renames: &RenameRules,
) -> Result<CoefficientTable> {
    let lines: Vec<&str> = text.lines().collect();
    let framing = layout.header_lines + layout.footer_lines;
    if lines.len() < framing {
        return Err(MietkarteError::FormatError {
            line: lines.len(),
            msg: format!(
                "table has {} lines but the layout needs {} header and {} footer lines",
                lines.len(),
                layout.header_lines,
                layout.footer_lines
            ),
        });
    }

    let body = &lines[layout.header_lines..lines.len() - layout.footer_lines];
    let mut table = CoefficientTable::new();
    for (offset, raw) in body.iter().enumerate() {
        let line = layout.header_lines + offset + 1;
        if raw.trim().is_empty() {
            continue;
        }
        let row = parse_row(raw, line, renames)?;
        table.insert(row, line)?;
    }

    debug!(rows = table.len(), "parsed coefficient table");
    Ok(table)
}

/// Reads and parses a coefficient table from disk.
pub fn read_coefficient_table(
    path: impl AsRef<Path>,
    layout: &TableLayout,
    renames: &RenameRules,
) -> Result<CoefficientTable> {
    let text = std::fs::read_to_string(path.as_ref())?;
    parse_coefficient_table(&text, layout, renames)
}

fn parse_row(raw: &str, line: usize, renames: &RenameRules) -> Result<CoefficientRow> {
    let stripped = ROW_TERMINATOR.replace(raw.trim(), "");
    let fields: Vec<&str> = stripped.split('&').map(str::trim).collect();
    if fields.len() != FIELD_COUNT {
        return Err(MietkarteError::FormatError {
            line,
            msg: format!(
                "expected {FIELD_COUNT} fields, found {}: {}",
                fields.len(),
                raw.trim()
            ),
        });
    }

    let mut values = [0.0; 4];
    for (slot, (field, text)) in values
        .iter_mut()
        .zip(NUMERIC_FIELDS.iter().zip(&fields[1..]))
    {
        *slot = text.parse::<f64>().map_err(|_| MietkarteError::ParseError {
            line,
            msg: format!("field `{field}` is not a number: `{text}`"),
        })?;
    }

    let name = renames.apply(&fields[0].replace(r"\_", "_"));
    Ok(CoefficientRow {
        name,
        coef: values[0],
        std: values[1],
        tstat: values[2],
        pval: values[3],
    })
}
