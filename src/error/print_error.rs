use crate::interpreter::scanner::Span;

/// Represents all errors that can occur while rendering an AST back to
/// source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintError {
    /// An identifier node holds a name that is not printable as an
    /// identifier (a reserved word, or text with non-identifier
    /// characters) in a position where no bracketed form exists.
    InvalidIdentifier {
        /// The unprintable name.
        name: String,
        /// The node's source range.
        span: Span,
    },
}

impl std::fmt::Display for PrintError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidIdentifier { name, .. } => {
                write!(f, "'{name}' cannot be printed as an identifier.")
            },
        }
    }
}

impl std::error::Error for PrintError {}
