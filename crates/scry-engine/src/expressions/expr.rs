use std::fmt;

pub use scry_syntax::ast::{BinOp, Constant, UnaryOp};

/// Precedence of atoms, attribute access, calls and subscripts.
const ATOM: u8 = 13;

/// A resolved expression.
///
/// Mirrors the syntax tree, except that names carry the canonical path
/// they resolve to in their enclosing scope and keyword arguments are
/// explicit nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Name { name: String, canonical: String },
    Attribute { value: Box<Expr>, attr: String },
    Constant(Constant),
    /// Arguments in source order: positionals, `Starred`, `Keyword`, `DoubleStarred`.
    Call { function: Box<Expr>, arguments: Vec<Expr> },
    Keyword { name: String, value: Box<Expr> },
    List(Vec<Expr>),
    Tuple(Vec<Expr>),
    /// A `None` key marks a `**mapping` entry.
    Dict(Vec<(Option<Expr>, Expr)>),
    Subscript { value: Box<Expr>, slice: Box<Expr> },
    Unary { op: UnaryOp, operand: Box<Expr> },
    Binary { left: Box<Expr>, op: BinOp, right: Box<Expr> },
    /// Comparison chain; a grouped comparison appears as a nested operand.
    Compare { left: Box<Expr>, comparators: Vec<(BinOp, Expr)> },
    Starred(Box<Expr>),
    DoubleStarred(Box<Expr>),
}

impl Expr {
    /// Dotted path this expression refers to, for names and attribute
    /// chains rooted at a name.
    pub fn canonical_path(&self) -> Option<String> {
        match self {
            Expr::Name { canonical, .. } => Some(canonical.clone()),
            Expr::Attribute { value, attr } => {
                value.canonical_path().map(|base| format!("{base}.{attr}"))
            }
            _ => None,
        }
    }

    pub fn as_constant(&self) -> Option<&Constant> {
        match self {
            Expr::Constant(c) => Some(c),
            _ => None,
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Binary { op, .. } => op.precedence(),
            Expr::Unary { op, .. } => op.precedence(),
            Expr::Compare { comparators, .. } => {
                comparators.first().map_or(ATOM, |(op, _)| op.precedence())
            }
            Expr::Keyword { .. } | Expr::Starred(_) | Expr::DoubleStarred(_) => 0,
            _ => ATOM,
        }
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr, parens: bool) -> fmt::Result {
    if parens {
        write!(f, "({expr})")
    } else {
        write!(f, "{expr}")
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_constant(f: &mut fmt::Formatter<'_>, constant: &Constant) -> fmt::Result {
    match constant {
        Constant::None => f.write_str("None"),
        Constant::Bool(true) => f.write_str("True"),
        Constant::Bool(false) => f.write_str("False"),
        Constant::Int(n) => write!(f, "{n}"),
        Constant::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.1}"),
        Constant::Float(v) => write!(f, "{v}"),
        Constant::Ellipsis => f.write_str("..."),
        Constant::Str(s) => write_quoted(f, s),
        Constant::Bytes(s) => {
            f.write_str("b")?;
            write_quoted(f, s)
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("'")?;
    for ch in s.chars() {
        match ch {
            '\'' => f.write_str("\\'")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("'")
}

/// Renders the expression back as Python source, adding parentheses only
/// where precedence requires them.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Name { name, .. } => f.write_str(name),
            Expr::Attribute { value, attr } => {
                write_operand(f, value, value.precedence() < ATOM)?;
                write!(f, ".{attr}")
            }
            Expr::Constant(c) => write_constant(f, c),
            Expr::Call { function, arguments } => {
                write_operand(f, function, function.precedence() < ATOM)?;
                f.write_str("(")?;
                write_joined(f, arguments)?;
                f.write_str(")")
            }
            Expr::Keyword { name, value } => write!(f, "{name}={value}"),
            Expr::List(items) => {
                f.write_str("[")?;
                write_joined(f, items)?;
                f.write_str("]")
            }
            Expr::Tuple(items) => {
                f.write_str("(")?;
                write_joined(f, items)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Expr::Dict(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    match key {
                        Some(key) => write!(f, "{key}: {value}")?,
                        None => write!(f, "**{value}")?,
                    }
                }
                f.write_str("}")
            }
            Expr::Subscript { value, slice } => {
                write_operand(f, value, value.precedence() < ATOM)?;
                f.write_str("[")?;
                match slice.as_ref() {
                    Expr::Tuple(items) if !items.is_empty() => {
                        write_joined(f, items)?;
                        if items.len() == 1 {
                            f.write_str(",")?;
                        }
                    }
                    other => write!(f, "{other}")?,
                }
                f.write_str("]")
            }
            Expr::Unary { op, operand } => {
                f.write_str(op.symbol())?;
                write_operand(f, operand, operand.precedence() < op.precedence())
            }
            Expr::Binary { left, op, right } => {
                let prec = op.precedence();
                let (lp, rp) = (left.precedence(), right.precedence());
                let left_parens = lp < prec || (op.is_right_assoc() && lp == prec);
                let right_parens = rp < prec || (!op.is_right_assoc() && rp == prec);
                write_operand(f, left, left_parens)?;
                write!(f, " {} ", op.symbol())?;
                write_operand(f, right, right_parens)
            }
            Expr::Compare { left, comparators } => {
                // Comparisons don't nest without parentheses: `a < b < c`
                // would read back as a chain.
                let grouped = |e: &Expr| e.precedence() <= BinOp::Lt.precedence();
                write_operand(f, left, grouped(left))?;
                for (op, operand) in comparators {
                    write!(f, " {} ", op.symbol())?;
                    write_operand(f, operand, grouped(operand))?;
                }
                Ok(())
            }
            Expr::Starred(value) => write!(f, "*{value}"),
            Expr::DoubleStarred(value) => write!(f, "**{value}"),
        }
    }
}
