//! Layout and renaming parameters for coefficient tables.

use serde::{Deserialize, Serialize};

/// Number of non-data lines surrounding the coefficient rows.
///
/// The summaries exported from the regression notebooks open with the
/// `tabular` preamble and column headings and close with the footer rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableLayout {
    pub header_lines: usize,
    pub footer_lines: usize,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            header_lines: 6,
            footer_lines: 3,
        }
    }
}

impl TableLayout {
    pub fn new(header_lines: usize, footer_lines: usize) -> Self {
        Self {
            header_lines,
            footer_lines,
        }
    }
}

/// Ordered substring replacements applied to coefficient names.
///
/// Replacements are textual and applied one after another, so an earlier
/// rule can change what a later rule sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenameRules(Vec<(String, String)>);

impl RenameRules {
    pub fn new<I, S, T>(rules: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        Self(
            rules
                .into_iter()
                .map(|(from, to)| (from.into(), to.into()))
                .collect(),
        )
    }

    /// No renaming at all.
    pub fn none() -> Self {
        Self(Vec::new())
    }

    pub fn apply(&self, name: &str) -> String {
        self.0
            .iter()
            .fold(name.to_string(), |acc, (from, to)| acc.replace(from.as_str(), to))
    }

    pub fn rules(&self) -> &[(String, String)] {
        &self.0
    }
}

impl Default for RenameRules {
    fn default() -> Self {
        Self::new([
            ("square_meters", "sqm"),
            ("object_type", "obj_type"),
            ("APARTMENT", "APT"),
            ("TEMPORARY", "TEMP"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_shorten_names() {
        let rules = RenameRules::default();
        assert_eq!(
            rules.apply("object_type[T.SHARED_APARTMENT]"),
            "obj_type[T.SHARED_APT]"
        );
        assert_eq!(rules.apply("rooms[T.2]:square_meters"), "rooms[T.2]:sqm");
        assert_eq!(
            rules.apply("object_type[T.TEMPORARY_LIVING]"),
            "obj_type[T.TEMP_LIVING]"
        );
    }

    #[test]
    fn rules_apply_in_order() {
        let forward = RenameRules::new([("ab", "x"), ("xc", "y")]);
        let reversed = RenameRules::new([("xc", "y"), ("ab", "x")]);
        assert_eq!(forward.apply("abc"), "y");
        assert_eq!(reversed.apply("abc"), "xc");
    }
}
