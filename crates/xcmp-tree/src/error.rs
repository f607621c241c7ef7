use thiserror::Error;

/// The input text is not well-formed XML.
///
/// Raised once at build time; no partial tree is ever returned alongside it.
/// `line` and `column` are 1-based, the column counted in characters.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("XML parse error at line {line}, column {column}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ParseError {
    /// Locate a byte `offset` within `source` and attach `message`.
    pub fn at(source: &[u8], offset: usize, message: impl Into<String>) -> Self {
        let consumed = &source[..offset.min(source.len())];
        let line_start = consumed
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |pos| pos + 1);
        let line = consumed.iter().filter(|&&b| b == b'\n').count() + 1;
        let tail = &consumed[line_start..];
        let column = match std::str::from_utf8(tail) {
            Ok(s) => s.chars().count(),
            Err(_) => tail.len(),
        } + 1;

        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

/// Convenience alias for build results.
pub type ParseResult<T> = Result<T, ParseError>;
