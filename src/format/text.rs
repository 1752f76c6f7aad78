//! Indented text materialization of a [`RenderPlan`].
//!
//! ```text
//! IF(
//! | 条件式             (
//! |                     A1
//! |                     >
//! |                     0
//! |                   )
//! | 真の場合            SUM(
//! |                 | | 引数1             B1
//! |                 | | 引数2             B2
//! |                   )
//! | 偽の場合            0
//! )
//! ```

use crate::config::Config;
use crate::parser::Expr;

use super::plan::{Block, RenderPlan};

const INDENT: &str = "  ";
const BAR: &str = "| ";
/// Labels are padded to this many characters before the gutter.
pub const LABEL_WIDTH: usize = 14;
const GUTTER: &str = "  ";

/// Render the plan as text lines joined by `\n`, no trailing newline.
#[must_use]
pub fn render_text(plan: &RenderPlan) -> String {
    let mut lines = Vec::new();
    if plan.header_visible() {
        lines.push(plan.header().to_string());
    }
    lines.extend(Pretty::default().block(plan.root(), 0));
    lines.join("\n")
}

/// Tree view of an already-parsed formula, every block expanded.
#[must_use]
pub fn to_tree(expr: &Expr, config: &Config) -> String {
    render_text(&RenderPlan::build("", expr, config))
}

#[derive(Default)]
struct Pretty {
    /// Grown on demand so deep trees don't re-run `INDENT.repeat()`.
    indent_cache: String,
    bar_cache: String,
}

impl Pretty {
    fn indent(&mut self, depth: usize) -> &str {
        grow(&mut self.indent_cache, INDENT, depth)
    }

    fn bars(&mut self, depth: usize) -> &str {
        grow(&mut self.bar_cache, BAR, depth)
    }

    fn line(&mut self, depth: usize, text: &str) -> String {
        let mut s = String::with_capacity(depth * INDENT.len() + text.len());
        s.push_str(self.indent(depth));
        s.push_str(text);
        s
    }

    fn block(&mut self, block: &Block, depth: usize) -> Vec<String> {
        match block {
            Block::Line(text) => vec![self.line(depth, text)],
            Block::Paren(inner) => {
                let mut lines = vec![self.line(depth, "(")];
                lines.extend(self.block(inner, depth + 1));
                lines.push(self.line(depth, ")"));
                lines
            }
            Block::Binary { left, op, right } => {
                let mut lines = vec![self.line(depth, "(")];
                lines.extend(self.block(left, depth + 1));
                lines.push(self.line(depth + 1, op));
                lines.extend(self.block(right, depth + 1));
                lines.push(self.line(depth, ")"));
                lines
            }
            Block::Call(call) if !call.open => {
                let text = format!("{}{}", call.name, call.preview);
                vec![self.line(depth, &text)]
            }
            Block::Call(call) => {
                let mut lines = vec![self.line(depth, &format!("{}(", call.name))];
                let bars = self.bars(depth + 1).to_string();
                let blank_label = " ".repeat(LABEL_WIDTH);
                for row in &call.rows {
                    let arg_lines = self.block(&row.value, depth + 1);
                    let mut arg_lines = arg_lines.into_iter();
                    if let Some(first) = arg_lines.next() {
                        lines.push(format!(
                            "{bars}{}{GUTTER}{}",
                            pad_label(&row.label),
                            first.trim_start()
                        ));
                    }
                    for rest in arg_lines {
                        lines.push(format!("{bars}{blank_label}{GUTTER}{rest}"));
                    }
                }
                lines.push(self.line(depth, ")"));
                lines
            }
        }
    }
}

fn grow<'a>(cache: &'a mut String, unit: &str, depth: usize) -> &'a str {
    let need = depth * unit.len();
    while cache.len() < need {
        cache.push_str(unit);
    }
    &cache[..need]
}

/// Pad to [`LABEL_WIDTH`] characters; longer labels are kept whole.
fn pad_label(label: &str) -> String {
    let n = label.chars().count();
    let mut s = String::with_capacity(label.len() + LABEL_WIDTH.saturating_sub(n));
    s.push_str(label);
    for _ in n..LABEL_WIDTH {
        s.push(' ');
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LabelMode, Locale};
    use crate::labels::LabelTable;
    use crate::lexer::tokenize;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    fn tree(src: &str, config: &Config) -> String {
        to_tree(&parse(tokenize(src).unwrap()).unwrap(), config)
    }

    #[test]
    fn leaf_at_root() {
        let table = LabelTable::default();
        assert_eq!(tree("=-A1", &Config::new(&table)), "-A1");
    }

    #[test]
    fn empty_call() {
        let table = LabelTable::default();
        assert_eq!(tree("TODAY()", &Config::new(&table)), "TODAY(\n)");
    }

    #[test]
    fn binary_block() {
        let table = LabelTable::default();
        let expected = "\
(
  A1
  +
  (
    2
    *
    3
  )
)";
        assert_eq!(tree("A1+2*3", &Config::new(&table)), expected);
    }

    #[test]
    fn paren_block() {
        let table = LabelTable::default();
        assert_eq!(tree("(1)", &Config::new(&table)), "(\n  1\n)");
    }

    #[test]
    fn call_rows_are_labeled_and_padded() {
        let table = LabelTable::default();
        let config = Config::new(&table).with_locale(Locale::En);
        let expected = "\
SUM(
| arg1            A1
| arg2            \"x\"
)";
        assert_eq!(tree("=sum(A1,\"x\")", &config), expected);
    }

    #[test]
    fn multi_line_argument_keeps_gutter() {
        let table = LabelTable::default();
        let config = Config::new(&table).with_locale(Locale::En);
        let expected = "\
IF(
| logical_test    (
|                     A1
|                     >
|                     0
|                   )
| value_if_true   1
| value_if_false  -1
)";
        assert_eq!(tree("=IF(A1>0,1,-1)", &config), expected);
    }

    #[test]
    fn off_mode_keeps_structure() {
        let table = LabelTable::default();
        let config = Config::new(&table).with_label_mode(LabelMode::Off);
        let expected = "\
MAX(
|                 1
|                 2
)";
        assert_eq!(tree("MAX(1,2)", &config), expected);
    }

    #[test]
    fn long_labels_are_not_truncated() {
        let mut table = LabelTable::default();
        table.insert(
            "F",
            crate::labels::ArgLabels {
                en: vec![Some("a_very_long_label_name".into())],
                ..Default::default()
            },
        );
        let config = Config::new(&table).with_label_mode(LabelMode::En);
        assert_eq!(tree("F(1)", &config), "F(\n| a_very_long_label_name  1\n)");
    }

    #[test]
    fn collapsed_root_shows_header_and_preview() {
        let table = LabelTable::default();
        let config = Config::new(&table);
        let src = "=SUM(A1, B1)";
        let expr = parse(tokenize(src).unwrap()).unwrap();
        let mut plan = RenderPlan::build(src, &expr, &config);
        plan.toggle(0);
        assert_eq!(render_text(&plan), "=SUM(A1, B1)\nSUM(A1, B1)");
    }
}
