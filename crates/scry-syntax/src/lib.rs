//! Lexer, parser, and AST for **Python expressions**.
//!
//! The analysis layers only ever need expression-level syntax (decorator
//! calls, default values, annotations), so statements are not modelled.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`ast`] | `Expr`, `Call`, `Keyword`, `Constant`, operators |
//! | [`error`] | `ParseError` |
//! | [`lexer`] | `Lexer`, `Token` |
//! | [`parser`] | `parse_expr` / `parse_call` entry points |
//!
//! # Quick start
//!
//! ```rust
//! use scry_syntax::parse_call;
//!
//! let call = parse_call("dataclass(frozen=True, **options)").unwrap();
//! assert_eq!(call.keywords.len(), 2);
//! assert_eq!(call.keywords[0].arg.as_deref(), Some("frozen"));
//! assert_eq!(call.keywords[1].arg, None);
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;

pub use ast::{Call, Expr, Keyword};
pub use error::ParseError;
pub use parser::{parse_call, parse_expr};

#[cfg(test)]
mod parse_tests {
    use super::*;
    use crate::ast::{BinOp, Constant, UnaryOp};

    fn ok(src: &str) -> Expr { parse_expr(src).unwrap() }
    fn err(src: &str) -> ParseError { parse_expr(src).unwrap_err() }
    fn name(s: &str) -> Expr { Expr::Name(s.to_string()) }
    fn int(n: i64) -> Expr { Expr::Constant(Constant::Int(n)) }

    #[test] fn bare_name() { assert_eq!(ok("x"), name("x")); }
    #[test] fn constants() {
        assert_eq!(ok("None"), Expr::Constant(Constant::None));
        assert_eq!(ok("True"), Expr::Constant(Constant::Bool(true)));
        assert_eq!(ok("..."), Expr::Constant(Constant::Ellipsis));
        assert_eq!(ok("'a' \"b\""), Expr::Constant(Constant::Str("ab".into())));
    }
    #[test] fn dotted_attribute() {
        assert_eq!(ok("os.path"), Expr::Attribute { value: Box::new(name("os")), attr: "path".into() });
    }

    #[test]
    fn call_with_every_argument_kind() {
        let call = parse_call("f(1, *rest, key=2, **extra,)").unwrap();
        assert_eq!(*call.func, name("f"));
        assert_eq!(call.args, vec![int(1), Expr::Starred(Box::new(name("rest")))]);
        assert_eq!(call.keywords, vec![
            Keyword { arg: Some("key".into()), value: int(2) },
            Keyword { arg: None, value: name("extra") },
        ]);
    }

    #[test]
    fn call_without_arguments() {
        let call = parse_call("f()").unwrap();
        assert!(call.args.is_empty());
        assert!(call.keywords.is_empty());
    }

    #[test]
    fn keyword_value_may_be_comparison() {
        let call = parse_call("f(x=a == b)").unwrap();
        assert_eq!(call.keywords[0].value, Expr::Compare {
            left: Box::new(name("a")), comparators: vec![(BinOp::Eq, name("b"))],
        });
    }

    #[test]
    fn multiline_call() {
        let call = parse_call("field(\n    default=0,  # zero\n    repr=False,\n)").unwrap();
        assert_eq!(call.keywords.len(), 2);
    }

    #[test]
    fn precedence_mul_over_add() {
        assert_eq!(ok("1 + 2 * 3"), Expr::Binary {
            left: Box::new(int(1)),
            op: BinOp::Add,
            right: Box::new(Expr::Binary { left: Box::new(int(2)), op: BinOp::Mul, right: Box::new(int(3)) }),
        });
    }

    #[test]
    fn power_is_right_assoc_and_binds_over_neg() {
        assert_eq!(ok("-2 ** 3 ** 4"), Expr::Unary {
            op: UnaryOp::Neg,
            operand: Box::new(Expr::Binary {
                left: Box::new(int(2)),
                op: BinOp::Pow,
                right: Box::new(Expr::Binary { left: Box::new(int(3)), op: BinOp::Pow, right: Box::new(int(4)) }),
            }),
        });
    }

    #[test] fn negative_exponent() { ok("2 ** -1"); }
    #[test] fn union_annotation() { ok("int | None"); }
    #[test] fn generic_subscript() {
        assert_eq!(ok("Dict[str, int]"), Expr::Subscript {
            value: Box::new(name("Dict")),
            slice: Box::new(Expr::Tuple(vec![name("str"), name("int")])),
        });
    }
    #[test] fn tuples_and_grouping() {
        assert_eq!(ok("()"), Expr::Tuple(vec![]));
        assert_eq!(ok("(1)"), int(1));
        assert_eq!(ok("(1,)"), Expr::Tuple(vec![int(1)]));
    }
    #[test] fn list_with_star() {
        assert_eq!(ok("[1, *xs]"), Expr::List(vec![int(1), Expr::Starred(Box::new(name("xs")))]));
    }
    #[test] fn dict_with_spread() {
        assert_eq!(ok("{'a': 1, **b}"), Expr::Dict(vec![
            (Some(Expr::Constant(Constant::Str("a".into()))), int(1)),
            (None, name("b")),
        ]));
    }
    #[test] fn not_and_or() { ok("not a and b or c"); }

    #[test] fn err_positional_after_keyword() { err("f(a=1, 2)"); }
    #[test] fn err_star_after_double_star() { err("f(**a, *b)"); }
    #[test] fn err_lambda() {
        assert!(err("lambda: 0").message.contains("lambda"));
    }
    #[test] fn err_set_display() { err("{1, 2}"); }
    #[test] fn err_trailing_tokens() { err("a b"); }
    #[test] fn err_not_in_comparison_operand() { err("a == not b"); }
    #[test] fn err_unclosed_call() { err("f(a, b"); }
    #[test] fn err_parse_call_on_name() { assert!(parse_call("f").is_err()); }

    #[test]
    fn error_position() {
        let e = err("f(\n  a=1,\n  2)");
        assert_eq!((e.line, e.col), (3, 3));
        assert_eq!(e.to_string(), "parse error at 3:3: positional argument follows keyword argument");
    }

    // ── comparisons ───────────────────────────────────────────────────────

    #[test]
    fn comparison_chain_is_one_node() {
        assert_eq!(ok("a < b <= c"), Expr::Compare {
            left: Box::new(name("a")),
            comparators: vec![(BinOp::Lt, name("b")), (BinOp::LtE, name("c"))],
        });
    }

    #[test]
    fn grouped_comparison_nests() {
        let inner = Expr::Compare { left: Box::new(name("a")), comparators: vec![(BinOp::Lt, name("b"))] };
        assert_eq!(ok("(a < b) < c"), Expr::Compare {
            left: Box::new(inner),
            comparators: vec![(BinOp::Lt, name("c"))],
        });
    }

    // ── literals ──────────────────────────────────────────────────────────

    #[test]
    fn prefixed_literals() {
        assert_eq!(ok(r"r'\d'"), Expr::Constant(Constant::Str(r"\d".into())));
        assert_eq!(ok("b'raw'"), Expr::Constant(Constant::Bytes("raw".into())));
        assert_eq!(ok("0xff"), int(255));
        assert!(err("f'{x}'").message.contains("f-strings"));
    }

    // ── nesting ───────────────────────────────────────────────────────────

    #[test]
    fn deep_parens_are_rejected() {
        let n = 1000;
        let src = format!("f(a={}1{})", "(".repeat(n), ")".repeat(n));
        let e = parse_call(&src).unwrap_err();
        assert_eq!(e.message, "expression nested too deeply");
    }

    #[test]
    fn deep_unary_chain_is_rejected() {
        let e = err(&format!("{}1", "-".repeat(1000)));
        assert_eq!(e.message, "expression nested too deeply");
    }

    #[test]
    fn deep_calls_are_rejected() {
        let e = err(&format!("{}x{}", "f(".repeat(1000), ")".repeat(1000)));
        assert_eq!(e.message, "expression nested too deeply");
    }

    #[test]
    fn moderate_nesting_parses() {
        let n = 50;
        ok(&format!("{}1{}", "(".repeat(n), ")".repeat(n)));
        ok(&format!("{}x{}", "[".repeat(n), "]".repeat(n)));
    }
}
