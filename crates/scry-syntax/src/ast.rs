// ── Constant ──────────────────────────────────────────────────────────────

/// A literal constant.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// String literal with escapes already processed.
    Str(String),
    /// `b"..."` literal, kept as text.
    Bytes(String),
    /// The `...` literal.
    Ellipsis,
}

// ── Operators ─────────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `+x`
    Pos,
    /// `~x`
    Invert,
    /// `not x`
    Not,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "+",
            UnaryOp::Invert => "~",
            UnaryOp::Not => "not ",
        }
    }

    /// Binding power of the operator; `not` binds looser than comparisons.
    pub fn precedence(self) -> u8 {
        match self {
            UnaryOp::Not => 3,
            UnaryOp::Neg | UnaryOp::Pos | UnaryOp::Invert => 11,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinOp {
    Or,
    And,
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    BitOr,
    BitXor,
    BitAnd,
    LShift,
    RShift,
    Add,
    Sub,
    Mul,
    MatMul,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Or => "or",
            BinOp::And => "and",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::Lt => "<",
            BinOp::LtE => "<=",
            BinOp::Gt => ">",
            BinOp::GtE => ">=",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::BitAnd => "&",
            BinOp::LShift => "<<",
            BinOp::RShift => ">>",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::MatMul => "@",
            BinOp::Div => "/",
            BinOp::FloorDiv => "//",
            BinOp::Mod => "%",
            BinOp::Pow => "**",
        }
    }

    /// Binding power, following Python's operator precedence table.
    /// Higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinOp::Or => 1,
            BinOp::And => 2,
            BinOp::Eq | BinOp::NotEq | BinOp::Lt | BinOp::LtE | BinOp::Gt | BinOp::GtE => 4,
            BinOp::BitOr => 5,
            BinOp::BitXor => 6,
            BinOp::BitAnd => 7,
            BinOp::LShift | BinOp::RShift => 8,
            BinOp::Add | BinOp::Sub => 9,
            BinOp::Mul | BinOp::MatMul | BinOp::Div | BinOp::FloorDiv | BinOp::Mod => 10,
            BinOp::Pow => 12,
        }
    }

    pub fn is_right_assoc(self) -> bool {
        self == BinOp::Pow
    }

    pub fn is_comparison(self) -> bool {
        matches!(self, BinOp::Eq | BinOp::NotEq | BinOp::Lt | BinOp::LtE | BinOp::Gt | BinOp::GtE)
    }
}

// ── Call ──────────────────────────────────────────────────────────────────

/// A keyword argument at a call site.
///
/// `arg` is `None` for a `**mapping` expansion.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    pub arg: Option<String>,
    pub value: Expr,
}

/// A call expression: `func(1, *rest, key=value, **extra)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub func: Box<Expr>,
    /// Positional arguments in source order; `*iterable` appears as [`Expr::Starred`].
    pub args: Vec<Expr>,
    /// Keyword arguments and `**` expansions in source order.
    pub keywords: Vec<Keyword>,
}

// ── Expr ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Name(String),
    Constant(Constant),
    /// `value.attr`
    Attribute { value: Box<Expr>, attr: String },
    Call(Call),
    /// `value[slice]`; multiple indices are a [`Expr::Tuple`] slice.
    Subscript { value: Box<Expr>, slice: Box<Expr> },
    List(Vec<Expr>),
    Tuple(Vec<Expr>),
    /// Dictionary display. A `None` key marks a `**mapping` entry.
    Dict(Vec<(Option<Expr>, Expr)>),
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// Non-comparison binary operator (`and`/`or` included).
    Binary { left: Box<Expr>, op: BinOp, right: Box<Expr> },
    /// Comparison chain: `a < b <= c` is one `Compare` with two comparators,
    /// while `(a < b) < c` nests a `Compare` as the left operand.
    Compare { left: Box<Expr>, comparators: Vec<(BinOp, Expr)> },
    /// `*value`, only valid as a call argument or display element.
    Starred(Box<Expr>),
}
