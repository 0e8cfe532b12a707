//! Resolved expressions and the resolver that produces them from syntax.

mod expr;
mod resolve;

pub use expr::{BinOp, Constant, Expr, UnaryOp};
pub use resolve::{get_expression, safe_get_expression, ExpressionResolver, MAX_DEPTH};
