use crate::error::{LexError, Span};

/// Token types for Excel-like formulas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    // Literals; text is kept exactly as written
    Number(String),
    /// String contents without the surrounding quotes.
    Str(String),

    /// Function names, cell references (`$A$1`), named ranges.
    Ident(String),

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Colon,
    Eq,
    EqEq, // lexed, never accepted by the grammar
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    // Punctuation
    LParen,
    RParen,
    Comma,

    Eof,
}

/// Coarse token classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Number,
    Str,
    Punct,
    Op,
    Eof,
}

impl Token {
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Ident(_) => TokenKind::Ident,
            Token::Number(_) => TokenKind::Number,
            Token::Str(_) => TokenKind::Str,
            Token::LParen | Token::RParen | Token::Comma => TokenKind::Punct,
            Token::Eof => TokenKind::Eof,
            _ => TokenKind::Op,
        }
    }

    /// The raw lexeme: operator symbol, literal text, or empty for Eof.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Token::Number(s) | Token::Str(s) | Token::Ident(s) => s,
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Caret => "^",
            Token::Colon => ":",
            Token::Eq => "=",
            Token::EqEq => "==",
            Token::Ne => "<>",
            Token::Lt => "<",
            Token::Le => "<=",
            Token::Gt => ">",
            Token::Ge => ">=",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::Comma => ",",
            Token::Eof => "",
        }
    }
}

/// A token with the position of its first character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    pub token: Token,
    pub span: Span,
}

pub struct Lexer {
    input: Vec<char>,
    pos: usize,
    /// One past the last non-whitespace character.
    end: usize,
    line: usize,
    line_start: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let input: Vec<char> = input.chars().collect();
        let end = input
            .iter()
            .rposition(|c| !c.is_whitespace())
            .map_or(0, |i| i + 1);
        Lexer {
            input,
            pos: 0,
            end,
            line: 1,
            line_start: 0,
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Spanned>, LexError> {
        let mut tokens = Vec::new();

        while self.pos < self.end && self.input[self.pos].is_whitespace() {
            self.bump();
        }
        if self.peek() == Some('=') {
            self.bump();
        }

        loop {
            self.skip_whitespace();
            let span = self.span();
            if self.pos >= self.end {
                tokens.push(Spanned { token: Token::Eof, span });
                break;
            }

            let ch = self.input[self.pos];
            let token = match ch {
                ',' => { self.bump(); Token::Comma }
                '(' => { self.bump(); Token::LParen }
                ')' => { self.bump(); Token::RParen }
                '+' => { self.bump(); Token::Plus }
                '-' => { self.bump(); Token::Minus }
                '*' => { self.bump(); Token::Star }
                '/' => { self.bump(); Token::Slash }
                '^' => { self.bump(); Token::Caret }
                ':' => { self.bump(); Token::Colon }
                '=' => {
                    self.bump();
                    if self.peek() == Some('=') {
                        self.bump();
                        Token::EqEq
                    } else {
                        Token::Eq
                    }
                }
                '<' => {
                    self.bump();
                    match self.peek() {
                        Some('=') => { self.bump(); Token::Le }
                        Some('>') => { self.bump(); Token::Ne }
                        _ => Token::Lt,
                    }
                }
                '>' => {
                    self.bump();
                    if self.peek() == Some('=') {
                        self.bump();
                        Token::Ge
                    } else {
                        Token::Gt
                    }
                }
                '"' => self.read_string(),
                _ if ch.is_ascii_digit() => self.read_number(),
                '.' if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => self.read_number(),
                _ if ch.is_ascii_alphabetic() || ch == '_' || ch == '$' => self.read_ident(),
                _ => return Err(LexError { ch, span }),
            };

            tokens.push(Spanned { token, span });
        }

        Ok(tokens)
    }

    fn peek(&self) -> Option<char> {
        if self.pos < self.end {
            Some(self.input[self.pos])
        } else {
            None
        }
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        let i = self.pos + offset;
        if i < self.end { Some(self.input[i]) } else { None }
    }

    fn bump(&mut self) {
        if self.input.get(self.pos) == Some(&'\n') {
            self.line += 1;
            self.line_start = self.pos + 1;
        }
        self.pos += 1;
    }

    fn span(&self) -> Span {
        Span::new(self.line, self.pos - self.line_start + 1)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == ' ' || ch == '\t' || ch == '\r' || ch == '\n' {
                self.bump();
            } else {
                break;
            }
        }
    }

    /// Unterminated strings run to end of input; the parser reports what is
    /// missing after them.
    fn read_string(&mut self) -> Token {
        self.bump(); // opening "
        let mut s = String::new();
        while let Some(ch) = self.peek() {
            self.bump();
            if ch == '"' {
                return Token::Str(s);
            }
            s.push(ch);
        }
        Token::Str(s)
    }

    /// Digits and dots, taken verbatim. `1.2.3` is one number token.
    fn read_number(&mut self) -> Token {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '.') {
            self.bump();
        }
        Token::Number(self.input[start..self.pos].iter().collect())
    }

    fn read_ident(&mut self) -> Token {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        {
            self.bump();
        }
        Token::Ident(self.input[start..self.pos].iter().collect())
    }
}

/// Tokenize a whole formula.
pub fn tokenize(input: &str) -> Result<Vec<Spanned>, LexError> {
    Lexer::new(input).tokenize()
}
