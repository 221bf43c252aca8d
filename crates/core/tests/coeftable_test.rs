//! Tests for the LaTeX coefficient table parser.

use mietkarte_core::coeftable::{
    RenameRules, TableLayout, parse_coefficient_table, read_coefficient_table,
};
use mietkarte_core::error::MietkarteError;
use mietkarte_core::model::CoefficientRow;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Wraps body rows in six header and three footer lines.
fn framed(rows: &[&str]) -> String {
    let mut lines = vec![
        r"\begin{table}",
        r"\caption{Results}",
        r"\begin{center}",
        r"\begin{tabular}{lrrrr}",
        r"\hline",
        r" & Coef. & Std.Err. & t & P$> |$t$|$ \\ \hline",
    ];
    lines.extend_from_slice(rows);
    lines.extend_from_slice(&[r"\hline", r"\end{tabular}", r"\end{center}"]);
    lines.join("\n")
}

// ============================================================================
// Well-formed tables
// ============================================================================

#[test]
fn test_three_row_table() {
    let text = framed(&[
        r"Intercept & 6.1 & 0.02 & 305.0 & 0.000 \\",
        r"rooms3 & 0.1234 & 0.05 & 2.47 & 0.013 \\",
        r"private_offer & -0.04 & 0.03 & -1.33 & 0.18 \\",
    ]);
    let table =
        parse_coefficient_table(&text, &TableLayout::default(), &RenameRules::default()).unwrap();

    assert_eq!(table.len(), 3);
    assert_eq!(
        table.names().collect::<Vec<_>>(),
        vec!["Intercept", "rooms3", "private_offer"]
    );
    assert_eq!(
        table.get("rooms3"),
        Some(&CoefficientRow {
            name: "rooms3".to_string(),
            coef: 0.1234,
            std: 0.05,
            tstat: 2.47,
            pval: 0.013,
        })
    );
    assert_eq!(table.get("private_offer").unwrap().coef, -0.04);
}

#[test]
fn test_square_meters_renamed_to_sqm() {
    let text = framed(&[r"square_meters & 0.0112 & 0.0003 & 37.3 & 0.000 \\"]);
    let table =
        parse_coefficient_table(&text, &TableLayout::default(), &RenameRules::default()).unwrap();
    assert!(table.get("square_meters").is_none());
    assert_eq!(table.get("sqm").unwrap().coef, 0.0112);
}

#[test]
fn test_renames_are_textual_and_ordered() {
    let text = framed(&[r"object_type[T.TEMPORARY_APARTMENT] & 0.3 & 0.02 & 15.0 & 0.000 \\"]);
    let table =
        parse_coefficient_table(&text, &TableLayout::default(), &RenameRules::default()).unwrap();
    assert_eq!(
        table.names().collect::<Vec<_>>(),
        vec!["obj_type[T.TEMP_APT]"]
    );
}

#[test]
fn test_custom_layout() {
    let text = "header\n\
                a & 1 & 2 & 3 & 0.5 \\\\\n\
                b & 4 & 5 & 6 & 0.01 \\\\\n\
                footer";
    let table = parse_coefficient_table(text, &TableLayout::new(1, 1), &RenameRules::none())
        .unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.get("b").unwrap().tstat, 6.0);
}

#[test]
fn test_blank_body_lines_are_skipped() {
    let text = framed(&[r"a & 1 & 2 & 3 & 0.5 \\", "   ", r"b & 1 & 2 & 3 & 0.5 \\"]);
    let table =
        parse_coefficient_table(&text, &TableLayout::default(), &RenameRules::none()).unwrap();
    assert_eq!(table.len(), 2);
}

#[test]
fn test_header_and_footer_only() {
    let text = framed(&[]);
    let table =
        parse_coefficient_table(&text, &TableLayout::default(), &RenameRules::none()).unwrap();
    assert!(table.is_empty());
}

// ============================================================================
// Malformed tables
// ============================================================================

#[test]
fn test_four_fields_is_format_error() {
    let text = framed(&[
        r"a & 1 & 2 & 3 & 0.5 \\",
        r"rooms3 & 0.1234 & 0.05 & 2.47 \\",
    ]);
    let err =
        parse_coefficient_table(&text, &TableLayout::default(), &RenameRules::none()).unwrap_err();
    match err {
        MietkarteError::FormatError { line, msg } => {
            assert_eq!(line, 8);
            assert!(msg.contains("found 4"), "{msg}");
            assert!(msg.contains("rooms3"), "{msg}");
        }
        other => panic!("expected FormatError, got {other:?}"),
    }
}

#[test]
fn test_non_numeric_pval_is_parse_error() {
    let text = framed(&[r"rooms3 & 0.1234 & 0.05 & 2.47 & n/a \\"]);
    let err =
        parse_coefficient_table(&text, &TableLayout::default(), &RenameRules::none()).unwrap_err();
    match err {
        MietkarteError::ParseError { line, msg } => {
            assert_eq!(line, 7);
            assert!(msg.contains("pval"), "{msg}");
            assert!(msg.contains("n/a"), "{msg}");
        }
        other => panic!("expected ParseError, got {other:?}"),
    }
}

#[test]
fn test_duplicate_after_rename_is_parse_error() {
    let text = framed(&[
        r"square_meters & 0.01 & 0.001 & 10.0 & 0.000 \\",
        r"sqm & 0.02 & 0.001 & 20.0 & 0.000 \\",
    ]);
    let err =
        parse_coefficient_table(&text, &TableLayout::default(), &RenameRules::default())
            .unwrap_err();
    assert!(
        matches!(err, MietkarteError::ParseError { line: 8, ref msg } if msg.contains("duplicate")),
        "{err:?}"
    );

    // Without renaming the names are distinct.
    let table =
        parse_coefficient_table(&text, &TableLayout::default(), &RenameRules::none()).unwrap();
    assert_eq!(table.len(), 2);
}

#[test]
fn test_document_shorter_than_layout() {
    let err = parse_coefficient_table("only\ntwo", &TableLayout::default(), &RenameRules::none())
        .unwrap_err();
    assert!(matches!(err, MietkarteError::FormatError { line: 2, .. }));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = read_coefficient_table(
        fixture("does_not_exist.tex"),
        &TableLayout::default(),
        &RenameRules::default(),
    )
    .unwrap_err();
    assert!(matches!(err, MietkarteError::Io(_)));
}

// ============================================================================
// Exported summaries
// ============================================================================

#[test]
fn test_read_ols_summary() {
    let table = read_coefficient_table(
        fixture("ols_summary.tex"),
        &TableLayout::default(),
        &RenameRules::default(),
    )
    .unwrap();

    assert_eq!(
        table.names().collect::<Vec<_>>(),
        vec![
            "Intercept",
            "obj_type[T.HOUSE]",
            "obj_type[T.SHARED_APT]",
            "obj_type[T.TEMP_LIVING]",
            "private_offer[T.True]",
            "rooms[T.3]",
            "sqm",
        ]
    );

    let significant: Vec<&str> = table
        .significant(0.05)
        .into_iter()
        .map(|row| row.name.as_str())
        .collect();
    assert!(!significant.contains(&"private_offer[T.True]"));
    assert!(significant.contains(&"rooms[T.3]"));
    assert_eq!(significant.len(), 6);

    let (lo, hi) = table.confidence_interval("rooms[T.3]", 2.0).unwrap();
    assert!((lo - 0.0234).abs() < 1e-12);
    assert!((hi - 0.2234).abs() < 1e-12);
    assert!(table.confidence_interval("missing", 2.0).is_none());
}

#[test]
fn test_compare_ols_and_mixed() {
    let layout = TableLayout::default();
    let renames = RenameRules::default();
    let ols = read_coefficient_table(fixture("ols_summary.tex"), &layout, &renames).unwrap();
    let mixed = read_coefficient_table(fixture("mixed_summary.tex"), &layout, &renames).unwrap();

    let comparison = ols.compare(&mixed);
    let names: Vec<&str> = comparison.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Intercept",
            "obj_type[T.HOUSE]",
            "obj_type[T.SHARED_APT]",
            "obj_type[T.TEMP_LIVING]",
            "private_offer[T.True]",
            "rooms[T.3]",
            "sqm",
            "rooms[T.3]:sqm",
            "Group Var",
        ]
    );

    let house = &comparison[1];
    assert!((house.coef_delta().unwrap() - (0.1893 - 0.2150)).abs() < 1e-12);

    let shared = &comparison[2];
    assert!(shared.left.is_some() && shared.right.is_none());
    assert_eq!(shared.coef_delta(), None);

    let interaction = &comparison[7];
    assert!(interaction.left.is_none());
    assert_eq!(interaction.right.as_ref().unwrap().pval, 0.0719);
}
