/// Parser state and primitive token operations.
///
/// Declares the `Parser` struct, the cursor primitives (`peek`,
/// `advance`, `check`, `expect`), the program entry point and the
/// error-recovery synchronizer.
pub mod core;
/// Expression parsing.
///
/// Implements precedence climbing over the binary operator table and
/// prefix-operator handling.
pub mod expression;
/// Primary and suffixed expression parsing.
///
/// Handles literals, names, parenthesized expressions, function
/// expressions, table constructors, and the suffix chain of member
/// accesses, indexes and calls (including method-call sugar).
pub mod primary;
/// Statement parsing.
///
/// Dispatches on the leading token of each statement, parses blocks up to
/// their terminators, and disambiguates assignments from call statements.
pub mod statement;

pub use self::core::{ParseResult, Parser};
