/// Severity-tagged message collection and rendering.
///
/// The diagnostics collector gathers every message the pipeline produces,
/// in insertion order, and renders entries with the offending source line
/// and a caret under the reported column.
pub mod diagnostics;
/// Lexical errors.
///
/// Defines the error values the scanner and lexer produce for malformed
/// input: stray characters, unterminated strings, bad numeric literals and
/// invalid escape sequences.
pub mod lex_error;
/// Printing errors.
///
/// Defines the error raised when an AST cannot be rendered back to
/// surface syntax, such as an identifier node whose name is not a valid
/// identifier.
pub mod print_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation: type
/// mismatches, bad calls and indexing, division by zero, unresolved
/// labels, and the step/depth budget errors.
pub mod runtime_error;
/// Syntax errors.
///
/// Defines the error values the parser records while turning tokens into
/// an AST: unexpected tokens, missing terminators and invalid assignment
/// targets.
pub mod syntax_error;

pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use lex_error::LexError;
pub use print_error::PrintError;
pub use runtime_error::RuntimeError;
pub use syntax_error::SyntaxError;
