pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod i18n;
pub mod labels;
pub mod lexer;
pub mod parser;
pub mod repl;

pub use config::{Config, LabelMode, Locale};
pub use error::{FormulaError, LabelSourceError, LexError, ParseError};
pub use format::{format_for_display, format_formula, format_inline, parse_formula, plan_formula};
pub use labels::{LabelTable, resolve_arg_label};
pub use parser::Expr;

#[cfg(test)]
mod tests;
