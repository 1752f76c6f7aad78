use std::io::Write;

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::format::{plan_formula, render_html, render_text, to_inline};
use crate::lexer::tokenize;
use crate::parser::parse;
use crate::{
    Config, FormulaError, LabelMode, LabelTable, Locale, format_for_display, format_formula,
    format_inline,
};

const LABELS_JSON: &str = r#"{
    "VLOOKUP": {
        "ja1": ["検索値", "範囲", "列番号", "検索の型"],
        "ja2": ["探す値", "探す範囲"],
        "en": ["lookup_value", "table_array"]
    }
}"#;

fn tree(src: &str, locale: Locale, mode: LabelMode) -> String {
    let table = LabelTable::default();
    let config = Config::new(&table).with_locale(locale).with_label_mode(mode);
    format_formula(src, &config).unwrap()
}

// ── Tree layout ──────────────────────────────────────────────────

#[test]
fn nested_if_in_japanese() {
    let expected = "\
IF(
| 条件式             (
|                     A1
|                     >
|                     0
|                   )
| 真の場合            SUM(
|                 | | 引数1             B1
|                 | | 引数2             B2
|                   )
| 偽の場合            0
)";
    assert_eq!(
        tree("=IF(A1>0, SUM(B1,B2), 0)", Locale::Ja, LabelMode::Auto),
        expected
    );
}

#[test]
fn ja2_mode_uses_builtin_if_labels() {
    let out = tree("=IF(1,2,3)", Locale::En, LabelMode::Ja2);
    assert!(out.contains("| 条件式"), "{out}");
    // generic labels follow the locale, not the variant
    let out = tree("=MAX(1)", Locale::En, LabelMode::Ja2);
    assert_eq!(out, "MAX(\n| arg1            1\n)");
}

#[test]
fn off_mode_drops_labels_only() {
    let expected = "\
IF(
|                 TRUE
|                 \"a\"
|                 \"b\"
)";
    assert_eq!(tree("=if(TRUE,\"a\",\"b\")", Locale::Ja, LabelMode::Off), expected);
}

#[test]
fn zero_argument_call() {
    assert_eq!(tree("=TODAY()", Locale::Ja, LabelMode::Auto), "TODAY(\n)");
}

#[test]
fn plain_values_stay_on_one_line() {
    assert_eq!(tree("  =\"text\"  ", Locale::En, LabelMode::Auto), "\"text\"");
    assert_eq!(tree("=+-A1", Locale::En, LabelMode::Auto), "+-A1");
}

#[test]
fn label_table_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(LABELS_JSON.as_bytes()).unwrap();
    let table = LabelTable::load(file.path()).unwrap();

    let config = Config::new(&table).with_locale(Locale::En);
    let expected = "\
VLOOKUP(
| lookup_value    A2
| table_array     (
|                     Sheet1
|                     :
|                     B9
|                   )
| arg3            2
)";
    assert_eq!(format_formula("=vlookup(A2,Sheet1:B9,2)", &config).unwrap(), expected);

    let ja = Config::new(&table).with_locale(Locale::Ja);
    let out = format_formula("=VLOOKUP(A2,B1:B9,2,FALSE)", &ja).unwrap();
    assert!(out.contains("| 検索値"), "{out}");
    assert!(out.contains("| 検索の型"), "{out}");
}

#[test]
fn missing_label_table_falls_back_to_generic() {
    let dir = tempfile::tempdir().unwrap();
    let table = LabelTable::load_or_default(dir.path().join("absent.json"));
    assert!(table.is_empty());
    let config = Config::new(&table).with_locale(Locale::Ja);
    assert_eq!(
        format_formula("VLOOKUP(1)", &config).unwrap(),
        "VLOOKUP(\n| 引数1             1\n)"
    );
}

// ── Collapsing ───────────────────────────────────────────────────

#[test]
fn collapse_expand_cycle() {
    let table = LabelTable::default();
    let config = Config::new(&table).with_locale(Locale::En);
    let mut plan = plan_formula("=SUM(A1:A3, MAX(B1, 2))", &config).unwrap();
    let expanded = render_text(&plan);

    assert_eq!(plan.toggle(1), Some(false));
    assert_eq!(
        render_text(&plan),
        "SUM(\n| arg1            (\n|                     A1\n|                     :\n|                     A3\n|                   )\n| arg2            MAX(B1, 2)\n)"
    );

    plan.collapse_all();
    assert_eq!(
        render_text(&plan),
        "=SUM(A1:A3, MAX(B1, 2))\nSUM(A1 : A3, MAX(B1, 2))"
    );
    assert!(render_html(&plan).contains("<div class=\"formula-header\" onclick="));

    plan.click_header();
    plan.expand_all();
    assert_eq!(render_text(&plan), expanded);
}

// ── Errors ───────────────────────────────────────────────────────

#[test]
fn unterminated_string_reports_missing_paren() {
    let err = format_inline("=SUM(\"abc").unwrap_err();
    assert!(matches!(err, FormulaError::Parse(_)));
    assert_eq!(err.to_string(), "1:10: expected ')', found end of input");
}

#[test]
fn errors_for_display() {
    let table = LabelTable::default();
    let en = Config::new(&table).with_locale(Locale::En);
    let ja = Config::new(&table).with_locale(Locale::Ja);

    assert_eq!(
        format_for_display("=A1 B1", &en).unwrap_err(),
        "Error: 1:5: unexpected 'B1' after a complete formula"
    );
    assert_eq!(
        format_for_display("=A1 B1", &ja).unwrap_err(),
        "エラー: 1:5: 式の後ろに余分なトークンがあります: 'B1'"
    );
    assert!(
        format_for_display("=A1==1", &en)
            .unwrap_err()
            .contains("'==' is not a formula operator")
    );
}

#[test]
fn error_positions_count_lines() {
    let err = format_inline("=SUM(1,\n  2 ?)").unwrap_err();
    assert_eq!(err.span().line, 2);
    assert_eq!(err.span().col, 5);
}

#[test]
fn failed_run_leaves_next_run_unaffected() {
    let table = LabelTable::default();
    let config = Config::new(&table).with_locale(Locale::En);
    assert!(format_formula("=SUM(", &config).is_err());
    assert_eq!(format_formula("=SUM(1)", &config).unwrap(), "SUM(\n| arg1            1\n)");
}

// ── Inline form ──────────────────────────────────────────────────

#[test]
fn inline_canonical_form() {
    assert_eq!(
        format_inline("=IF(A1>0,SUM(B1:B3),\"none\")").unwrap(),
        "IF(A1 > 0, SUM(B1 : B3), \"none\")"
    );
    assert_eq!(format_inline("=(1+2)*-3").unwrap(), "(1 + 2) * -3");
}

// ── Limits ───────────────────────────────────────────────────────

#[test]
fn runaway_nesting_is_reported_not_overflowed() {
    let table = LabelTable::default();
    let config = Config::new(&table).with_locale(Locale::En);
    let deep = format!("={}1{}", "(".repeat(10_000), ")".repeat(10_000));
    let msg = format_for_display(&deep, &config).unwrap_err();
    assert!(msg.starts_with("Error: 1:"), "{msg}");
    assert!(msg.ends_with("formula is nested more than 128 levels deep"), "{msg}");

    let calls = format!("={}1{}", "SUM(".repeat(300), ")".repeat(300));
    assert!(format_inline(&calls).is_err());
    assert!(format_for_display(&format!("={}1", "1+".repeat(5000)), &config).is_err());
}

#[test]
fn deep_but_allowed_formulas_render() {
    let table = LabelTable::default();
    let config = Config::new(&table).with_locale(Locale::En);
    let calls = format!("={}1{}", "ABS(".repeat(100), ")".repeat(100));
    let mut plan = plan_formula(&calls, &config).unwrap();
    assert_eq!(plan.blocks().len(), 100);
    assert!(render_text(&plan).ends_with(')'));
    plan.collapse_all();
    assert!(render_html(&plan).contains("data-block=\"99\""));

    let chain = format!("={}1", "1-".repeat(1000));
    assert_eq!(format_inline(&chain).unwrap(), format!("{}1", "1 - ".repeat(1000)));
}

// ── Round trip ───────────────────────────────────────────────────

#[test]
fn left_associative_chains_survive_inline_form() {
    for src in [
        "1-2-3",
        "A1:B2:C3",
        "2^3*4/5-6+7",
        "-A1:B2",
        "1=2<>3",
        "SUM(1-2-3, 4*5*6)",
        "(1-2)-(3-4)",
    ] {
        let ast = parse(tokenize(src).unwrap()).unwrap();
        let text = to_inline(&ast);
        assert_eq!(parse(tokenize(&text).unwrap()).unwrap(), ast, "{src} -> {text}");
    }
    assert_eq!(format_inline("1-2-3").unwrap(), "1 - 2 - 3");
}

fn leaf() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]{1,3}(\\.[0-9]{1,2})?",
        "[A-Z]{1,2}[1-9][0-9]{0,2}",
        "[a-z ]{0,6}".prop_map(|s| format!("\"{s}\"")),
    ]
}

fn bin_op() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "=", "<>", "<", "<=", ">", ">=", "+", "-", "*", "/", "^", ":",
    ])
}

/// Formula sources drawn from the grammar, so operator chains come out
/// left-nested exactly as the parser builds them.
fn source() -> impl Strategy<Value = String> {
    leaf().prop_recursive(4, 48, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(|e| format!("({e})")),
            ("[A-Z]{2,6}", prop::collection::vec(inner.clone(), 0..4))
                .prop_map(|(name, args)| format!("{name}({})", args.join(","))),
            (prop::bool::ANY, inner.clone())
                .prop_map(|(minus, e)| format!("{}{e}", if minus { '-' } else { '+' })),
            (inner.clone(), bin_op(), inner).prop_map(|(l, op, r)| format!("{l}{op}{r}")),
        ]
    })
}

proptest! {
    #[test]
    fn inline_form_parses_back(src in source()) {
        let ast = parse(tokenize(&src).unwrap()).unwrap();
        let text = to_inline(&ast);
        let back = parse(tokenize(&text).unwrap()).unwrap();
        prop_assert_eq!(back, ast);
    }

    #[test]
    fn any_input_is_handled_without_panicking(src in "[ -~\n]{0,40}") {
        let table = LabelTable::default();
        let config = Config::new(&table).with_locale(Locale::En);
        if let Err(msg) = format_for_display(&src, &config) {
            prop_assert!(msg.starts_with("Error: "), "{}", msg);
        }
    }
}
