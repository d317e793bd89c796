use thiserror::Error;

/// Classification of parse failures. Each variant maps to exactly one
/// syntactic or structural violation; errors are never recovered from
/// internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    EmptyInput,
    ExtraTokens,
    MaxDepthExceeded,
    UnexpectedEnd,
    InvalidSyntax,
    InvalidLiteral,
    InvalidNumber,
    InvalidString,
    InvalidEscape,
    InvalidUnicode,
}

/// A parse failure with its absolute position in the original input.
///
/// Line and column are 1-based and always refer to the full input buffer,
/// even when the failure was detected by a worker parsing an interior span.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} at line {line}, column {column}")]
pub struct ParseError {
    pub kind: ErrorKind,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl ParseError {
    pub(crate) fn new(
        kind: ErrorKind,
        message: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
            column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_position() {
        let err = ParseError::new(ErrorKind::InvalidSyntax, "unexpected character: '@'", 3, 14);
        assert_eq!(
            err.to_string(),
            "unexpected character: '@' at line 3, column 14"
        );
    }

    #[test]
    fn kind_is_comparable() {
        let err = ParseError::new(ErrorKind::UnexpectedEnd, "unexpected end of input", 1, 1);
        assert_eq!(err.kind, ErrorKind::UnexpectedEnd);
    }
}
