//! Single-line canonical form of a formula AST.

use crate::parser::Expr;

/// `1 + SUM(A1 : A3, -2)`: spaced binary operators, tight signs, `, ` between
/// arguments, function names as written.
#[must_use]
pub fn to_inline(expr: &Expr) -> String {
    let mut out = String::new();
    write_inline(expr, &mut out);
    out
}

fn write_inline(expr: &Expr, out: &mut String) {
    match expr {
        Expr::Literal(_, text) => out.push_str(text),
        Expr::Ident(name) => out.push_str(name),
        Expr::Paren(inner) => {
            out.push('(');
            write_inline(inner, out);
            out.push(')');
        }
        Expr::Unary(op, operand) => {
            out.push_str(op.symbol());
            write_inline(operand, out);
        }
        Expr::Binary(l, op, r) => {
            write_inline(l, out);
            out.push(' ');
            out.push_str(op.symbol());
            out.push(' ');
            write_inline(r, out);
        }
        Expr::Call(name, args) => {
            out.push_str(name);
            write_args(args, out);
        }
    }
}

/// `(a, b, c)`; also the preview of a collapsed call block.
pub(crate) fn args_preview(args: &[Expr]) -> String {
    let mut out = String::new();
    write_args(args, &mut out);
    out
}

fn write_args(args: &[Expr], out: &mut String) {
    out.push('(');
    for (i, a) in args.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_inline(a, out);
    }
    out.push(')');
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&to_inline(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{BinOp, UnaryOp};

    #[test]
    fn binary_gets_single_spaces() {
        let e = Expr::binary(
            Expr::number("1"),
            BinOp::Add,
            Expr::binary(Expr::number("2"), BinOp::Mul, Expr::number("3")),
        );
        assert_eq!(to_inline(&e), "1 + 2 * 3");
    }

    #[test]
    fn unary_is_tight() {
        let e = Expr::unary(UnaryOp::Minus, Expr::paren(Expr::ident("A1")));
        assert_eq!(to_inline(&e), "-(A1)");
    }

    #[test]
    fn call_keeps_case_and_quotes() {
        let e = Expr::call(
            "concat",
            vec![Expr::string("a b"), Expr::call("today", vec![])],
        );
        assert_eq!(e.to_string(), r#"concat("a b", today())"#);
    }

    #[test]
    fn range_is_spaced_like_other_operators() {
        let e = Expr::binary(Expr::ident("A1"), BinOp::Range, Expr::ident("B2"));
        assert_eq!(to_inline(&e), "A1 : B2");
    }
}
