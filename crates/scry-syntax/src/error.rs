use thiserror::Error;

/// A parse error from the expression lexer or parser.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("parse error at {line}:{col}: {message}")]
pub struct ParseError {
    pub message: String,
    /// 1-based source line number where the error occurred.
    pub line: usize,
    /// 1-based source column number where the error occurred.
    pub col: usize,
}

impl ParseError {
    pub(crate) fn new(msg: impl Into<String>, line: usize, col: usize) -> Self {
        Self { message: msg.into(), line, col }
    }
}
