use crate::interpreter::scanner::Span;

/// Represents all errors that can occur while scanning source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// Encountered a character no token can start with.
    UnexpectedChar {
        /// The offending character.
        ch:   char,
        /// Where it occurred.
        span: Span,
    },
    /// A quoted string ran into a line break or the end of input.
    UnterminatedString {
        /// From the opening quote to where scanning stopped.
        span: Span,
    },
    /// A long-bracket string ran into the end of input.
    UnterminatedLongString {
        /// From the opening bracket to the end of input.
        span: Span,
    },
    /// A numeric literal was malformed.
    InvalidNumber {
        /// The literal text as consumed.
        lexeme: String,
        /// Where it occurred.
        span:   Span,
    },
    /// An escape sequence was unknown or out of range.
    InvalidEscape {
        /// The escape text, including the backslash.
        escape: String,
        /// Where it occurred.
        span:   Span,
    },
}

impl LexError {
    /// The source range the error refers to.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::UnexpectedChar { span, .. }
            | Self::UnterminatedString { span }
            | Self::UnterminatedLongString { span }
            | Self::InvalidNumber { span, .. }
            | Self::InvalidEscape { span, .. } => *span,
        }
    }
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedChar { ch, .. } => {
                write!(f, "Unexpected character '{ch}'.")
            },
            Self::UnterminatedString { .. } => {
                write!(f, "Unterminated string literal.")
            },
            Self::UnterminatedLongString { .. } => {
                write!(f, "Unterminated long string literal.")
            },
            Self::InvalidNumber { lexeme, .. } => {
                write!(f, "Malformed number '{lexeme}'.")
            },
            Self::InvalidEscape { escape, .. } => {
                write!(f, "Invalid escape sequence '{escape}'.")
            },
        }
    }
}

impl std::error::Error for LexError {}
