//! Render formulas: inline canonical form, labeled tree text, collapsible markup.
//!
//! Every entry point runs the whole pipeline (tokenize, parse, render) from
//! the raw text; nothing is cached between calls. The tree renderers go
//! through a [`RenderPlan`], which the text and HTML adapters materialize.

mod html;
mod inline;
mod plan;
mod text;

pub use html::render_html;
pub use inline::to_inline;
pub use plan::{ArgRow, Block, BlockId, BlockInfo, CallBlock, RenderPlan};
pub use text::{LABEL_WIDTH, render_text, to_tree};

use crate::config::Config;
use crate::error::FormulaError;
use crate::i18n;
use crate::lexer::Lexer;
use crate::parser::{Expr, Parser};

/// Tokenize and parse `source`. A leading `=` is optional.
pub fn parse_formula(source: &str) -> Result<Expr, FormulaError> {
    let tokens = Lexer::new(source).tokenize()?;
    let expr = Parser::new(tokens).parse()?;
    Ok(expr)
}

/// Labeled tree text with every block expanded.
pub fn format_formula(source: &str, config: &Config) -> Result<String, FormulaError> {
    Ok(render_text(&plan_formula(source, config)?))
}

/// Canonical single-line form, e.g. `IF(A1 > 0, 1, -1)`.
pub fn format_inline(source: &str) -> Result<String, FormulaError> {
    Ok(to_inline(&parse_formula(source)?))
}

/// Structural plan for interactive surfaces; the header is the trimmed source.
pub fn plan_formula(source: &str, config: &Config) -> Result<RenderPlan, FormulaError> {
    let expr = parse_formula(source)?;
    Ok(RenderPlan::build(source.trim(), &expr, config))
}

/// Tree text, or the error message prefixed for the active locale.
pub fn format_for_display(source: &str, config: &Config) -> Result<String, String> {
    format_formula(source, config).map_err(|e| {
        log::debug!("formatting failed: {e}");
        format!(
            "{}{}",
            i18n::strings(config.locale).error_prefix,
            e.localized(config.locale)
        )
    })
}
