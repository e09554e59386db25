/// Numeric parsing and conversion helpers.
///
/// This module provides reusable numeric routines that are used throughout
/// the lexer, parser, printer and evaluator. These include literal parsing
/// for the language's number grammar, safe conversions between `i64` and
/// `f64`, and canonical text rendering for floating-point values.
pub mod num;
