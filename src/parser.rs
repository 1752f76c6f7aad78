use crate::error::{Expected, ParseError, Span};
use crate::lexer::{Spanned, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Number,
    Str,
}

/// Formula AST. Built bottom-up by the parser and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Canonical source text: numbers verbatim, strings with their quotes.
    Literal(LiteralKind, String),
    /// Cell reference, named range or bare word; not resolved.
    Ident(String),
    Unary(UnaryOp, Box<Expr>),
    Binary(Box<Expr>, BinOp, Box<Expr>),
    /// Parentheses the user wrote, kept so output mirrors the input.
    Paren(Box<Expr>),
    /// Function name as written (case preserved) and its arguments.
    Call(String, Vec<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

impl UnaryOp {
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Range,
}

impl BinOp {
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Eq => "=",
            BinOp::Ne => "<>",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Pow => "^",
            BinOp::Range => ":",
        }
    }
}

/// Shorthand constructors, mostly for tests and callers building trees by hand.
impl Expr {
    pub fn number(text: impl Into<String>) -> Expr {
        Expr::Literal(LiteralKind::Number, text.into())
    }

    /// `contents` without quotes; the stored text gets them added.
    pub fn string(contents: &str) -> Expr {
        Expr::Literal(LiteralKind::Str, format!("\"{contents}\""))
    }

    pub fn ident(name: impl Into<String>) -> Expr {
        Expr::Ident(name.into())
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Expr {
        Expr::Unary(op, Box::new(operand))
    }

    pub fn binary(left: Expr, op: BinOp, right: Expr) -> Expr {
        Expr::Binary(Box::new(left), op, Box::new(right))
    }

    pub fn paren(inner: Expr) -> Expr {
        Expr::Paren(Box::new(inner))
    }

    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Expr {
        Expr::Call(name.into(), args)
    }
}

/// Deepest allowed stack of parentheses, calls and signs.
pub const MAX_NESTING: usize = 128;
/// Most binary operators one formula may contain.
pub const MAX_OPERATORS: usize = 2048;

pub struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    nesting: usize,
    operators: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Spanned>) -> Self {
        Parser {
            tokens,
            pos: 0,
            nesting: 0,
            operators: 0,
        }
    }

    /// Parse one complete formula. Anything left over is an error.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_comparison()?;
        if !self.at_eof() {
            return Err(self.error(Expected::EndOfInput));
        }
        Ok(expr)
    }

    // --- expression parsing (lowest precedence first) ---

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_addition()?;

        loop {
            let op = match self.current() {
                Token::Eq => BinOp::Eq,
                Token::Ne => BinOp::Ne,
                Token::Lt => BinOp::Lt,
                Token::Le => BinOp::Le,
                Token::Gt => BinOp::Gt,
                Token::Ge => BinOp::Ge,
                Token::EqEq => return Err(self.error(Expected::SingleEquals)),
                _ => break,
            };
            self.advance();
            self.count_operator()?;
            let right = self.parse_addition()?;
            left = Expr::binary(left, op, right);
        }

        Ok(left)
    }

    fn parse_addition(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplication()?;

        loop {
            let op = match self.current() {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            self.count_operator()?;
            let right = self.parse_multiplication()?;
            left = Expr::binary(left, op, right);
        }

        Ok(left)
    }

    /// `*`, `/` and `^` share one level, left to right.
    fn parse_multiplication(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_range()?;

        loop {
            let op = match self.current() {
                Token::Star => BinOp::Mul,
                Token::Slash => BinOp::Div,
                Token::Caret => BinOp::Pow,
                _ => break,
            };
            self.advance();
            self.count_operator()?;
            let right = self.parse_range()?;
            left = Expr::binary(left, op, right);
        }

        Ok(left)
    }

    /// `:` binds tighter than any arithmetic operator.
    fn parse_range(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_primary()?;

        while self.check(&Token::Colon) {
            self.advance();
            self.count_operator()?;
            let right = self.parse_primary()?;
            left = Expr::binary(left, BinOp::Range, right);
        }

        Ok(left)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.current().clone() {
            Token::Plus => {
                self.advance();
                self.enter()?;
                let operand = self.parse_primary()?;
                self.nesting -= 1;
                Ok(Expr::unary(UnaryOp::Plus, operand))
            }
            Token::Minus => {
                self.advance();
                self.enter()?;
                let operand = self.parse_primary()?;
                self.nesting -= 1;
                Ok(Expr::unary(UnaryOp::Minus, operand))
            }
            Token::Number(text) => {
                self.advance();
                Ok(Expr::Literal(LiteralKind::Number, text))
            }
            Token::Str(contents) => {
                self.advance();
                Ok(Expr::string(&contents))
            }
            Token::Ident(name) => {
                self.advance();
                if self.check(&Token::LParen) {
                    return self.parse_func_call(name);
                }
                Ok(Expr::Ident(name))
            }
            Token::LParen => {
                self.advance();
                self.enter()?;
                let inner = self.parse_comparison()?;
                self.expect(&Token::RParen, ")")?;
                self.nesting -= 1;
                Ok(Expr::paren(inner))
            }
            Token::EqEq => Err(self.error(Expected::SingleEquals)),
            _ => Err(self.error(Expected::Operand)),
        }
    }

    fn parse_func_call(&mut self, name: String) -> Result<Expr, ParseError> {
        self.expect(&Token::LParen, "(")?;
        self.enter()?;
        let mut args = Vec::new();
        if !self.check(&Token::RParen) {
            args.push(self.parse_comparison()?);
            while self.check(&Token::Comma) {
                self.advance();
                args.push(self.parse_comparison()?);
            }
        }
        self.expect(&Token::RParen, ")")?;
        self.nesting -= 1;
        Ok(Expr::Call(name, args))
    }

    // --- helpers ---

    /// Step into a paren, call or sign; the caller steps out on success.
    fn enter(&mut self) -> Result<(), ParseError> {
        if self.nesting >= MAX_NESTING {
            return Err(self.error(Expected::ShallowerNesting));
        }
        self.nesting += 1;
        Ok(())
    }

    /// Each binary operator adds one level to a left-leaning chain.
    fn count_operator(&mut self) -> Result<(), ParseError> {
        if self.operators >= MAX_OPERATORS {
            return Err(self.error(Expected::FewerOperators));
        }
        self.operators += 1;
        Ok(())
    }

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).map_or(&Token::Eof, |s| &s.token)
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn at_eof(&self) -> bool {
        matches!(self.current(), Token::Eof)
    }

    fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(self.current()) == std::mem::discriminant(token)
    }

    fn expect(&mut self, token: &Token, text: &'static str) -> Result<(), ParseError> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(Expected::Token(text)))
        }
    }

    fn error(&self, expected: Expected) -> ParseError {
        let (found, span) = match self.tokens.get(self.pos).or(self.tokens.last()) {
            Some(s) => (s.token.text().to_string(), s.span),
            None => (String::new(), Span::new(1, 1)),
        };
        ParseError { expected, found, span }
    }
}

/// Parse a token stream produced by [`crate::lexer::tokenize`].
pub fn parse(tokens: Vec<Spanned>) -> Result<Expr, ParseError> {
    Parser::new(tokens).parse()
}
