use crate::ast::{BinOp, Call, Constant, Expr, Keyword, UnaryOp};
use crate::error::ParseError;
use crate::lexer::{Lexer, Token, TokenWithPos};

// ── Parser ────────────────────────────────────────────────────────────────

/// Maximum nesting of operands (brackets, unary operators, `**` chains).
pub const MAX_NESTING: usize = 100;

pub struct Parser {
    tokens: Vec<TokenWithPos>,
    pos: usize,
    depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<TokenWithPos>) -> Self {
        Self { tokens, pos: 0, depth: 0 }
    }

    fn current_pos(&self) -> (usize, usize) {
        self.tokens
            .get(self.pos)
            .map(|t| (t.line, t.col))
            .or_else(|| self.tokens.last().map(|t| (t.line, t.col)))
            .unwrap_or((1, 1))
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).map(|t| &t.token).unwrap_or(&Token::Eof)
    }

    /// Look at the token `offset` positions ahead of current without consuming.
    fn peek_ahead(&self, offset: usize) -> &Token {
        self.tokens.get(self.pos + offset).map(|t| &t.token).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens.get(self.pos)
            .map(|t| t.token.clone())
            .unwrap_or(Token::Eof);
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    fn err(&self, msg: impl Into<String>) -> ParseError {
        let (line, col) = self.current_pos();
        ParseError::new(msg, line, col)
    }

    fn expect_token(&mut self, expected: &Token) -> Result<(), ParseError> {
        if self.peek() == expected {
            self.advance();
            Ok(())
        } else {
            Err(self.err(format!("expected {:?}, got {:?}", expected, self.peek())))
        }
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        match self.peek().clone() {
            Token::Ident(s) => {
                self.advance();
                Ok(s)
            }
            tok => Err(self.err(format!("expected identifier, got {:?}", tok))),
        }
    }

    // ── Entry ─────────────────────────────────────────────────────────────

    /// Parse a single expression that must span the whole input.
    pub fn parse_complete(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expr()?;
        if self.peek() != &Token::Eof {
            return Err(self.err(format!("unexpected {:?} after expression", self.peek())));
        }
        Ok(expr)
    }

    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        if self.peek() == &Token::Lambda {
            return Err(self.err("lambda expressions are not supported"));
        }
        self.parse_binary(0)
    }

    // ── Operators ─────────────────────────────────────────────────────────

    fn binary_op(&self) -> Option<BinOp> {
        Some(match self.peek() {
            Token::Or          => BinOp::Or,
            Token::And         => BinOp::And,
            Token::EqEq        => BinOp::Eq,
            Token::NotEq       => BinOp::NotEq,
            Token::Lt          => BinOp::Lt,
            Token::LtE         => BinOp::LtE,
            Token::Gt          => BinOp::Gt,
            Token::GtE         => BinOp::GtE,
            Token::Pipe        => BinOp::BitOr,
            Token::Caret       => BinOp::BitXor,
            Token::Amp         => BinOp::BitAnd,
            Token::LShift      => BinOp::LShift,
            Token::RShift      => BinOp::RShift,
            Token::Plus        => BinOp::Add,
            Token::Minus       => BinOp::Sub,
            Token::Star        => BinOp::Mul,
            Token::At          => BinOp::MatMul,
            Token::Slash       => BinOp::Div,
            Token::DoubleSlash => BinOp::FloorDiv,
            Token::Percent     => BinOp::Mod,
            Token::DoubleStar  => BinOp::Pow,
            _ => return None,
        })
    }

    /// Precedence climbing over [`BinOp::precedence`].
    ///
    /// A run of comparison operators at one level becomes a single
    /// [`Expr::Compare`] chain.
    fn parse_binary(&mut self, min_prec: u8) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary(min_prec)?;

        while let Some(op) = self.binary_op() {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            if op.is_comparison() {
                let mut comparators = Vec::new();
                while let Some(op) = self.binary_op().filter(|op| op.is_comparison()) {
                    self.advance();
                    comparators.push((op, self.parse_binary(prec + 1)?));
                }
                left = Expr::Compare { left: Box::new(left), comparators };
                continue;
            }
            self.advance();
            let next_min = if op.is_right_assoc() { prec } else { prec + 1 };
            let right = self.parse_binary(next_min)?;
            left = Expr::Binary { left: Box::new(left), op, right: Box::new(right) };
        }

        Ok(left)
    }

    /// Every nested operand passes through here, so this is where the
    /// nesting depth is bounded.
    fn parse_unary(&mut self, min_prec: u8) -> Result<Expr, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(self.err("expression nested too deeply"));
        }
        self.depth += 1;
        let result = self.parse_unary_operand(min_prec);
        self.depth -= 1;
        result
    }

    fn parse_unary_operand(&mut self, min_prec: u8) -> Result<Expr, ParseError> {
        let op = match self.peek() {
            Token::Not   => UnaryOp::Not,
            Token::Minus => UnaryOp::Neg,
            Token::Plus  => UnaryOp::Pos,
            Token::Tilde => UnaryOp::Invert,
            _ => return self.parse_postfix(),
        };
        if op == UnaryOp::Not && op.precedence() < min_prec {
            return Err(self.err(format!("unexpected {:?} in operand position", self.peek())));
        }
        self.advance();
        // `-x ** y` is `-(x ** y)`; `not a == b` is `not (a == b)`.
        let operand = self.parse_binary(op.precedence())?;
        Ok(Expr::Unary { op, operand: Box::new(operand) })
    }

    // ── Postfix ───────────────────────────────────────────────────────────

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_atom()?;
        loop {
            match self.peek() {
                Token::Dot => {
                    self.advance();
                    let attr = self.expect_ident()?;
                    expr = Expr::Attribute { value: Box::new(expr), attr };
                }
                Token::LParen => {
                    self.advance();
                    expr = Expr::Call(self.parse_call_args(expr)?);
                }
                Token::LBracket => {
                    self.advance();
                    let slice = self.parse_subscript()?;
                    expr = Expr::Subscript { value: Box::new(expr), slice: Box::new(slice) };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    /// Parse `args )` after the opening parenthesis of a call.
    fn parse_call_args(&mut self, func: Expr) -> Result<Call, ParseError> {
        let mut args = Vec::new();
        let mut keywords: Vec<Keyword> = Vec::new();
        let mut seen_double_star = false;

        while self.peek() != &Token::RParen {
            match self.peek() {
                Token::DoubleStar => {
                    self.advance();
                    let value = self.parse_expr()?;
                    keywords.push(Keyword { arg: None, value });
                    seen_double_star = true;
                }
                Token::Star => {
                    if seen_double_star {
                        return Err(self.err(
                            "iterable argument unpacking follows keyword argument unpacking",
                        ));
                    }
                    self.advance();
                    let value = self.parse_expr()?;
                    args.push(Expr::Starred(Box::new(value)));
                }
                Token::Ident(_) if self.peek_ahead(1) == &Token::Assign => {
                    let arg = self.expect_ident()?;
                    self.advance(); // consume `=`
                    let value = self.parse_expr()?;
                    keywords.push(Keyword { arg: Some(arg), value });
                }
                _ => {
                    if !keywords.is_empty() {
                        return Err(self.err("positional argument follows keyword argument"));
                    }
                    args.push(self.parse_expr()?);
                }
            }

            if !self.eat(&Token::Comma) {
                break;
            }
        }

        self.expect_token(&Token::RParen)?;
        Ok(Call { func: Box::new(func), args, keywords })
    }

    /// Parse `index ]`; `a[x, y]` yields a tuple slice.
    fn parse_subscript(&mut self) -> Result<Expr, ParseError> {
        let first = self.parse_expr()?;
        if self.peek() == &Token::Colon {
            return Err(self.err("slice syntax is not supported"));
        }
        let slice = if self.peek() == &Token::Comma {
            let mut items = vec![first];
            while self.eat(&Token::Comma) {
                if self.peek() == &Token::RBracket {
                    break;
                }
                items.push(self.parse_expr()?);
            }
            Expr::Tuple(items)
        } else {
            first
        };
        self.expect_token(&Token::RBracket)?;
        Ok(slice)
    }

    // ── Atoms ─────────────────────────────────────────────────────────────

    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        let tok = self.peek().clone();
        match tok {
            Token::Ident(name) => { self.advance(); Ok(Expr::Name(name)) }
            Token::Int(n)      => { self.advance(); Ok(Expr::Constant(Constant::Int(n))) }
            Token::Float(f)    => { self.advance(); Ok(Expr::Constant(Constant::Float(f))) }
            Token::True        => { self.advance(); Ok(Expr::Constant(Constant::Bool(true))) }
            Token::False       => { self.advance(); Ok(Expr::Constant(Constant::Bool(false))) }
            Token::None        => { self.advance(); Ok(Expr::Constant(Constant::None)) }
            Token::Ellipsis    => { self.advance(); Ok(Expr::Constant(Constant::Ellipsis)) }
            Token::Bytes(b)    => { self.advance(); Ok(Expr::Constant(Constant::Bytes(b))) }
            Token::Str(s) => {
                self.advance();
                // Adjacent literals concatenate: `"a" "b"` is `"ab"`.
                let mut value = s;
                while let Token::Str(next) = self.peek().clone() {
                    self.advance();
                    value.push_str(&next);
                }
                Ok(Expr::Constant(Constant::Str(value)))
            }
            Token::LParen   => { self.advance(); self.parse_paren() }
            Token::LBracket => { self.advance(); self.parse_list() }
            Token::LBrace   => { self.advance(); self.parse_dict() }
            Token::Lambda   => Err(self.err("lambda expressions are not supported")),
            tok => Err(self.err(format!("expected an expression, got {:?}", tok))),
        }
    }

    /// Element of a list or tuple display; allows `*iterable`.
    fn parse_display_item(&mut self) -> Result<Expr, ParseError> {
        if self.eat(&Token::Star) {
            let value = self.parse_binary(BinOp::BitOr.precedence())?;
            Ok(Expr::Starred(Box::new(value)))
        } else {
            self.parse_expr()
        }
    }

    /// `( )`, `( expr )`, or a tuple `( a, b, )`.
    fn parse_paren(&mut self) -> Result<Expr, ParseError> {
        if self.eat(&Token::RParen) {
            return Ok(Expr::Tuple(Vec::new()));
        }
        let first = self.parse_display_item()?;
        if self.eat(&Token::RParen) {
            if let Expr::Starred(_) = first {
                return Err(self.err("cannot use starred expression here"));
            }
            return Ok(first);
        }
        let mut items = vec![first];
        while self.eat(&Token::Comma) {
            if self.peek() == &Token::RParen {
                break;
            }
            items.push(self.parse_display_item()?);
        }
        self.expect_token(&Token::RParen)?;
        Ok(Expr::Tuple(items))
    }

    fn parse_list(&mut self) -> Result<Expr, ParseError> {
        let mut items = Vec::new();
        while self.peek() != &Token::RBracket {
            items.push(self.parse_display_item()?);
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.expect_token(&Token::RBracket)?;
        Ok(Expr::List(items))
    }

    /// `{ key: value, **other }`. Set displays are rejected.
    fn parse_dict(&mut self) -> Result<Expr, ParseError> {
        let mut entries = Vec::new();
        while self.peek() != &Token::RBrace {
            if self.eat(&Token::DoubleStar) {
                let value = self.parse_binary(BinOp::BitOr.precedence())?;
                entries.push((None, value));
            } else {
                let key = self.parse_expr()?;
                if self.peek() != &Token::Colon {
                    return Err(self.err("set displays are not supported"));
                }
                self.advance();
                let value = self.parse_expr()?;
                entries.push((Some(key), value));
            }
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.expect_token(&Token::RBrace)?;
        Ok(Expr::Dict(entries))
    }
}

// ── Public parse entry points ─────────────────────────────────────────────

/// Parse a Python expression into an [`Expr`].
pub fn parse_expr(src: &str) -> Result<Expr, ParseError> {
    let tokens = Lexer::new(src).tokenize()?;
    Parser::new(tokens).parse_complete()
}

/// Parse a Python expression that must be a call, e.g. `dataclass(frozen=True)`.
pub fn parse_call(src: &str) -> Result<Call, ParseError> {
    match parse_expr(src)? {
        Expr::Call(call) => Ok(call),
        _ => Err(ParseError::new("expected a call expression", 1, 1)),
    }
}
