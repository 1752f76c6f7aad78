use crate::config::Locale;
use crate::parser::{MAX_NESTING, MAX_OPERATORS};

/// Source location: line and column (both 1-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub col: usize,
}

impl Span {
    #[must_use]
    pub fn new(line: usize, col: usize) -> Self {
        Span { line, col }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// A character the tokenizer does not recognize.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{span}: unexpected character '{ch}'")]
pub struct LexError {
    pub ch: char,
    pub span: Span,
}

/// What the parser wanted when it gave up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expected {
    /// A specific token such as `)` or `,`.
    Token(&'static str),
    /// Start of an operand: literal, reference, call, sign or `(`.
    Operand,
    /// Nothing more: a complete formula was already parsed.
    EndOfInput,
    /// `==` was written where `=` is the equality operator.
    SingleEquals,
    /// Parentheses, calls or signs nest past [`MAX_NESTING`].
    ShallowerNesting,
    /// More than [`MAX_OPERATORS`] binary operators.
    FewerOperators,
}

impl std::fmt::Display for Expected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expected::Token(t) => write!(f, "'{t}'"),
            Expected::Operand => f.write_str("a value, reference, function call or '('"),
            Expected::EndOfInput => f.write_str("end of input"),
            Expected::SingleEquals => f.write_str("'='"),
            Expected::ShallowerNesting => f.write_str("shallower nesting"),
            Expected::FewerOperators => f.write_str("fewer operators"),
        }
    }
}

/// A grammar violation. `found` is the offending lexeme, or an empty
/// string when the input ran out.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{span}: {}", describe(.expected, .found))]
pub struct ParseError {
    pub expected: Expected,
    pub found: String,
    pub span: Span,
}

fn found_desc(found: &str) -> String {
    if found.is_empty() {
        "end of input".to_string()
    } else {
        format!("'{found}'")
    }
}

fn describe(expected: &Expected, found: &str) -> String {
    match expected {
        Expected::SingleEquals => "'==' is not a formula operator; use '=' for equality".to_string(),
        Expected::EndOfInput => {
            format!("unexpected {} after a complete formula", found_desc(found))
        }
        Expected::ShallowerNesting => {
            format!("formula is nested more than {MAX_NESTING} levels deep")
        }
        Expected::FewerOperators => {
            format!("formula has more than {MAX_OPERATORS} operators")
        }
        Expected::Token(_) | Expected::Operand => {
            format!("expected {expected}, found {}", found_desc(found))
        }
    }
}

/// Anything that aborts a single formatting attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormulaError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl FormulaError {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            FormulaError::Lex(e) => e.span,
            FormulaError::Parse(e) => e.span,
        }
    }

    /// The message in the given locale, without the error prefix.
    #[must_use]
    pub fn localized(&self, locale: Locale) -> String {
        match locale {
            Locale::En => self.to_string(),
            Locale::Ja => match self {
                FormulaError::Lex(e) => format!("{}: 未知の文字: {}", e.span, e.ch),
                FormulaError::Parse(e) => {
                    let found = if e.found.is_empty() {
                        "入力の終わり".to_string()
                    } else {
                        format!("'{}'", e.found)
                    };
                    match &e.expected {
                        Expected::SingleEquals => {
                            format!("{}: '==' は使えません。等号には '=' を使ってください", e.span)
                        }
                        Expected::EndOfInput => {
                            format!("{}: 式の後ろに余分なトークンがあります: {}", e.span, found)
                        }
                        Expected::ShallowerNesting => {
                            format!("{}: 式の入れ子が深すぎます（最大{}段）", e.span, MAX_NESTING)
                        }
                        Expected::FewerOperators => {
                            format!("{}: 演算子が多すぎます（最大{}個）", e.span, MAX_OPERATORS)
                        }
                        Expected::Operand => {
                            format!("{}: 予期せぬトークン: {}", e.span, found)
                        }
                        Expected::Token(t) => {
                            format!("{}: トークン不一致: 期待='{}' 実際={}", e.span, t, found)
                        }
                    }
                }
            },
        }
    }
}

/// The external label table could not be read. Never fatal for formatting.
#[derive(Debug, thiserror::Error)]
pub enum LabelSourceError {
    #[error("cannot read label table '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("label table is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("label table must be a JSON object keyed by function name")]
    NotAnObject,
}
