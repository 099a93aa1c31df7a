use thiserror::Error;

/// Raised while lexing or parsing a pattern. Carries the byte offset into
/// the pattern where the problem was detected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message} (at position {position})")]
pub struct SyntaxError {
    pub message: String,
    pub position: usize,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        SyntaxError { message: message.into(), position }
    }

    /// `err_pos` spaces followed by `^`, for pointing at the offending byte
    /// underneath a printed copy of the pattern.
    pub fn indicator(&self) -> String {
        let mut s = " ".repeat(self.position);
        s.push('^');
        s
    }
}

/// Raised while compiling a substitution template.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message} (at position {position})")]
pub struct FormatError {
    pub message: String,
    pub position: usize,
}

impl FormatError {
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        FormatError { message: message.into(), position }
    }
}
