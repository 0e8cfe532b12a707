use crate::error::ParseError;

// ── Token ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    Ident(String),
    Str(String),
    Bytes(String),
    Int(i64),
    Float(f64),
    // Keywords
    True,
    False,
    None,
    Not,
    And,
    Or,
    Lambda,
    // Brackets
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    // Punctuation
    Comma,
    Dot,
    Colon,
    Assign,
    Ellipsis,
    // Operators
    Star,
    DoubleStar,
    Plus,
    Minus,
    Slash,
    DoubleSlash,
    Percent,
    At,
    Pipe,
    Amp,
    Caret,
    Tilde,
    LShift,
    RShift,
    EqEq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    // Sentinel
    Eof,
}

/// A token tagged with the 1-based position of its first character.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenWithPos {
    pub token: Token,
    pub line: usize,
    pub col: usize,
}

// ── Lexer ─────────────────────────────────────────────────────────────────

pub struct Lexer<'s> {
    src: &'s str,
    pos: usize,
    line: usize,
    col: usize,
}

impl<'s> Lexer<'s> {
    pub fn new(src: &'s str) -> Self {
        Self { src, pos: 0, line: 1, col: 1 }
    }

    pub fn tokenize(mut self) -> Result<Vec<TokenWithPos>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            let (line, col) = (self.line, self.col);
            let token = self.next_token()?;
            let eof = token == Token::Eof;
            tokens.push(TokenWithPos { token, line, col });
            if eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.rest().chars().next()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn err(&self, msg: impl Into<String>) -> ParseError {
        ParseError::new(msg, self.line, self.col)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            // Newlines are insignificant inside an expression.
            while matches!(self.peek(), Some(c) if c.is_whitespace()) {
                self.advance();
            }
            // Explicit line continuation.
            if self.rest().starts_with("\\\n") {
                self.advance();
                self.advance();
                continue;
            }
            if self.peek() == Some('#') {
                while !matches!(self.peek(), None | Some('\n')) {
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    /// Consume `second` if it follows, yielding `double`; otherwise `single`.
    fn one_or_two(&mut self, second: char, double: Token, single: Token) -> Token {
        self.advance();
        if self.peek() == Some(second) {
            self.advance();
            double
        } else {
            single
        }
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        let ch = match self.peek() {
            None => return Ok(Token::Eof),
            Some(c) => c,
        };

        let token = match ch {
            '(' => { self.advance(); Token::LParen }
            ')' => { self.advance(); Token::RParen }
            '[' => { self.advance(); Token::LBracket }
            ']' => { self.advance(); Token::RBracket }
            '{' => { self.advance(); Token::LBrace }
            '}' => { self.advance(); Token::RBrace }
            ',' => { self.advance(); Token::Comma }
            ':' => { self.advance(); Token::Colon }
            '+' => { self.advance(); Token::Plus }
            '%' => { self.advance(); Token::Percent }
            '@' => { self.advance(); Token::At }
            '|' => { self.advance(); Token::Pipe }
            '&' => { self.advance(); Token::Amp }
            '^' => { self.advance(); Token::Caret }
            '~' => { self.advance(); Token::Tilde }
            '-' => { self.advance(); Token::Minus }
            '*' => self.one_or_two('*', Token::DoubleStar, Token::Star),
            '/' => self.one_or_two('/', Token::DoubleSlash, Token::Slash),
            '=' => self.one_or_two('=', Token::EqEq, Token::Assign),
            '<' => {
                self.advance();
                match self.peek() {
                    Some('<') => { self.advance(); Token::LShift }
                    Some('=') => { self.advance(); Token::LtE }
                    _ => Token::Lt,
                }
            }
            '>' => {
                self.advance();
                match self.peek() {
                    Some('>') => { self.advance(); Token::RShift }
                    Some('=') => { self.advance(); Token::GtE }
                    _ => Token::Gt,
                }
            }
            '!' => {
                if self.peek_second() != Some('=') {
                    return Err(self.err("unexpected character '!'"));
                }
                self.advance();
                self.advance();
                Token::NotEq
            }
            '.' => {
                if self.rest().starts_with("...") {
                    for _ in 0..3 {
                        self.advance();
                    }
                    Token::Ellipsis
                } else if matches!(self.peek_second(), Some(c) if c.is_ascii_digit()) {
                    return self.lex_number();
                } else {
                    self.advance();
                    Token::Dot
                }
            }
            '"' | '\'' => return self.lex_string("").map(Token::Str),
            c if c.is_ascii_digit() => return self.lex_number(),
            c if c.is_alphabetic() || c == '_' => {
                return match self.string_prefix() {
                    Some(prefix) => self.lex_prefixed_string(&prefix),
                    None => Ok(self.lex_ident_or_keyword()),
                };
            }
            other => return Err(self.err(format!("unexpected character {:?}", other))),
        };
        Ok(token)
    }

    /// Lowercased literal prefix (`r`, `b`, `rb`, ...) when the identifier
    /// at the cursor is immediately followed by a quote.
    fn string_prefix(&self) -> Option<String> {
        let rest = self.rest();
        for len in [2, 1] {
            let Some(prefix) = rest.get(..len) else { continue };
            let prefix = prefix.to_ascii_lowercase();
            let quoted = matches!(rest[len..].chars().next(), Some('"' | '\''));
            if quoted && matches!(prefix.as_str(), "r" | "b" | "u" | "f" | "rb" | "br" | "fr" | "rf") {
                return Some(prefix);
            }
        }
        None
    }

    fn lex_prefixed_string(&mut self, prefix: &str) -> Result<Token, ParseError> {
        if prefix.contains('f') {
            return Err(self.err("f-strings are not supported"));
        }
        for _ in 0..prefix.len() {
            self.advance();
        }
        let s = self.lex_string(prefix)?;
        Ok(if prefix.contains('b') { Token::Bytes(s) } else { Token::Str(s) })
    }

    /// Lex a quoted literal body. In raw (`r`) literals backslashes are kept
    /// verbatim and only stop an escaped quote from closing the literal.
    fn lex_string(&mut self, prefix: &str) -> Result<String, ParseError> {
        let (line, col) = (self.line, self.col);
        let raw = prefix.contains('r');
        // Caller guarantees the current character is a quote.
        let quote = self.advance().unwrap_or('"');
        let mut s = String::new();
        loop {
            match self.advance() {
                None | Some('\n') => {
                    return Err(ParseError::new("unterminated string literal", line, col));
                }
                Some(c) if c == quote => break,
                Some('\\') if raw => match self.advance() {
                    Some(c) => {
                        s.push('\\');
                        s.push(c);
                    }
                    None => return Err(self.err("unterminated escape sequence")),
                },
                Some('\\') => match self.advance() {
                    Some('n') => s.push('\n'),
                    Some('t') => s.push('\t'),
                    Some('r') => s.push('\r'),
                    Some('0') => s.push('\0'),
                    Some('\\') => s.push('\\'),
                    Some('\'') => s.push('\''),
                    Some('"') => s.push('"'),
                    // Escaped newline continues the literal.
                    Some('\n') => {}
                    Some(c) => {
                        s.push('\\');
                        s.push(c);
                    }
                    None => return Err(self.err("unterminated escape sequence")),
                },
                Some(c) => s.push(c),
            }
        }
        Ok(s)
    }

    fn lex_number(&mut self) -> Result<Token, ParseError> {
        let (line, col) = (self.line, self.col);
        if self.peek() == Some('0') {
            let radix = match self.peek_second() {
                Some('x' | 'X') => Some(16),
                Some('o' | 'O') => Some(8),
                Some('b' | 'B') => Some(2),
                _ => None,
            };
            if let Some(radix) = radix {
                return self.lex_radix_int(radix, line, col);
            }
        }

        let start = self.pos;
        let mut is_float = false;

        self.eat_digits();
        if self.peek() == Some('.') && !self.rest().starts_with("...") {
            is_float = true;
            self.advance();
            self.eat_digits();
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            is_float = true;
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            self.eat_digits();
        }

        let text: String = self.src[start..self.pos].chars().filter(|&c| c != '_').collect();
        if is_float {
            text.parse::<f64>()
                .map(Token::Float)
                .map_err(|_| ParseError::new(format!("invalid number {:?}", text), line, col))
        } else {
            text.parse::<i64>()
                .map(Token::Int)
                .map_err(|_| ParseError::new(format!("integer literal {:?} out of range", text), line, col))
        }
    }

    /// `0x`, `0o` or `0b` integer; the cursor is on the leading `0`.
    fn lex_radix_int(&mut self, radix: u32, line: usize, col: usize) -> Result<Token, ParseError> {
        self.advance();
        self.advance();
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.advance();
        }
        let digits: String = self.src[start..self.pos].chars().filter(|&c| c != '_').collect();
        i64::from_str_radix(&digits, radix)
            .map(Token::Int)
            .map_err(|_| ParseError::new(format!("invalid base-{radix} integer {:?}", digits), line, col))
    }

    fn eat_digits(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '_') {
            self.advance();
        }
    }

    fn lex_ident_or_keyword(&mut self) -> Token {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.advance();
        }
        let word = &self.src[start..self.pos];
        match word {
            "True"   => Token::True,
            "False"  => Token::False,
            "None"   => Token::None,
            "not"    => Token::Not,
            "and"    => Token::And,
            "or"     => Token::Or,
            "lambda" => Token::Lambda,
            _        => Token::Ident(word.to_string()),
        }
    }
}
