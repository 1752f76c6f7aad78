//! Collapsible markup materialization of a [`RenderPlan`].
//!
//! Call blocks become `<details>` elements whose `<summary>` carries the
//! function name, an opening paren and the inline preview. The `open`
//! attribute reflects the plan's fold state at render time; after that the
//! browser owns it. Visibility of the header, the paren and the preview is
//! driven by the embedded stylesheet from each `<details>` element's live
//! `[open]` state, so toggling in the page keeps them consistent. Clicking
//! the header re-opens the root block.

use super::plan::{Block, RenderPlan};

/// Rules keyed on `details[open]`; the header shows only while a root call
/// block is closed.
pub const STYLE: &str = "\
.formula-header{display:none;cursor:pointer}\
.formula-wrapper:has(>details.formula-call:not([open]))>.formula-header{display:block}\
details.formula-call:not([open])>summary>.formula-open{display:none}\
details.formula-call[open]>summary>.formula-preview{display:none}";

#[must_use]
pub fn render_html(plan: &RenderPlan) -> String {
    let mut out = String::new();
    out.push_str("<div class=\"formula-wrapper\"><style>");
    out.push_str(STYLE);
    out.push_str("</style>");
    out.push_str(
        "<div class=\"formula-header\" onclick=\"this.nextElementSibling.open=true\">\
         <span class=\"formula-inline\">",
    );
    escape_into(plan.header(), &mut out);
    out.push_str("</span></div>");
    block(plan.root(), &mut out);
    out.push_str("</div>");
    out
}

fn block(b: &Block, out: &mut String) {
    match b {
        Block::Line(text) => {
            out.push_str("<div class=\"formula-line\">");
            escape_into(text, out);
            out.push_str("</div>");
        }
        Block::Paren(inner) => {
            out.push_str("<div class=\"formula-group\"><div>(</div><div class=\"formula-body\">");
            block(inner, out);
            out.push_str("</div><div>)</div></div>");
        }
        Block::Binary { left, op, right } => {
            out.push_str("<div class=\"formula-group\"><div>(</div><div class=\"formula-body\">");
            block(left, out);
            out.push_str("<div class=\"formula-op\">");
            escape_into(op, out);
            out.push_str("</div>");
            block(right, out);
            out.push_str("</div><div>)</div></div>");
        }
        Block::Call(call) => {
            out.push_str(&format!(
                "<details class=\"formula-call\" data-block=\"{}\"{}><summary>",
                call.id,
                if call.open { " open" } else { "" }
            ));
            escape_into(&call.name, out);
            out.push_str("<span class=\"formula-open\">(</span><span class=\"formula-preview\">");
            escape_into(&call.preview, out);
            out.push_str("</span></summary><div class=\"formula-body\">");
            for row in &call.rows {
                out.push_str("<div class=\"formula-row\"><span class=\"formula-label\">");
                escape_into(&row.label, out);
                out.push_str("</span><div class=\"formula-value\">");
                block(&row.value, out);
                out.push_str("</div></div>");
            }
            out.push_str("</div><div>)</div></details>");
        }
    }
}

fn escape_into(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}
