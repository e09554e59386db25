//! # moonlet
//!
//! moonlet is a self-contained processor for a Lua-flavoured scripting
//! language: it converts source text to an abstract syntax tree, renders
//! an AST back to surface text, and executes an AST directly as a
//! tree-walking interpreter with lexical environments, closures,
//! multi-return values and iterator-protocol generic loops.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

/// Defines the structure of parsed code.
///
/// This module declares the `Program`, `Statement` and `Expr` types that
/// represent the syntactic structure of source code as a tree, with a
/// source span on every node. The AST is built by the parser, rendered
/// by the printer and traversed by the evaluator.
pub mod ast;
/// Provides unified error types for every pipeline stage.
///
/// This module defines the severity-tagged diagnostics collector and the
/// error enums for lexing, parsing, printing and evaluation, each
/// carrying source spans for position-accurate reporting.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together the scanner, lexer, parser, printer and
/// evaluator with the value and environment types they exchange.
pub mod interpreter;
/// General numeric utilities.
///
/// Literal parsing for the number grammar, canonical float rendering,
/// and safe integer/float conversions used across the pipeline.
pub mod util;

use error::{Diagnostics, PrintError, RuntimeError};
use interpreter::{
    evaluator::Interpreter,
    lexer::{LexOptions, tokenize},
    parser::Parser,
    printer,
};

pub use ast::Program;
pub use interpreter::evaluator::EvalOptions;
pub use interpreter::printer::{PrintOptions, QuoteStyle, Semicolons};
pub use interpreter::value::Value;

/// Options recognized by [`parse`].
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Exclude COMMENT tokens from the stream (default true).
    pub skip_comments: bool,
    /// Exclude NEWLINE tokens from the stream (default true).
    pub skip_newlines: bool,
    /// Reserved for future syntax restrictions; the parser currently
    /// ignores it.
    pub strict_mode: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { skip_comments: true,
               skip_newlines: true,
               strict_mode: false, }
    }
}

/// Parses source text into a program.
///
/// Lexical and syntax faults are collected rather than thrown; when any
/// error-severity entry was recorded, the collected diagnostics come
/// back as the `Err` value (render them against the source with
/// [`Diagnostics::render_all`]).
///
/// # Errors
/// The diagnostics collection, when it contains at least one error.
///
/// # Example
/// ```
/// use moonlet::{ParseOptions, parse};
///
/// let program = parse("return 1 + 2", &ParseOptions::default()).unwrap();
/// assert_eq!(program.body.len(), 1);
///
/// assert!(parse("local = 3", &ParseOptions::default()).is_err());
/// ```
pub fn parse(source: &str, options: &ParseOptions) -> Result<Program, Diagnostics> {
    let mut diagnostics = Diagnostics::new();
    let lex_options = LexOptions { skip_comments: options.skip_comments,
                                   skip_newlines: options.skip_newlines, };
    let tokens = tokenize(source, lex_options, &mut diagnostics);
    let program = Parser::new(tokens, &mut diagnostics).parse_program();

    if diagnostics.has_errors() {
        return Err(diagnostics);
    }
    Ok(program)
}

/// Renders a program back to surface text.
///
/// # Errors
/// `PrintError::InvalidIdentifier` when a name node cannot be printed
/// in its position.
///
/// # Example
/// ```
/// use moonlet::{ParseOptions, PrintOptions, parse, print};
///
/// let program = parse("local x=1  return x", &ParseOptions::default()).unwrap();
/// let text = print(&program, &PrintOptions::default()).unwrap();
/// assert_eq!(text, "local x = 1\nreturn x");
/// ```
pub fn print(program: &Program, options: &PrintOptions) -> Result<String, PrintError> {
    printer::print(program, options)
}

/// Executes a program and returns the values of its top-level `return`
/// (empty when execution falls off the end).
///
/// # Errors
/// Any runtime fault, including exhausted step or call-depth budgets.
///
/// # Example
/// ```
/// use moonlet::{EvalOptions, ParseOptions, Value, evaluate, parse};
///
/// let program = parse("return 2 + 3", &ParseOptions::default()).unwrap();
/// let results = evaluate(&program, &EvalOptions::default()).unwrap();
/// assert_eq!(results, vec![Value::Integer(5)]);
/// ```
pub fn evaluate(program: &Program, options: &EvalOptions) -> Result<Vec<Value>, RuntimeError> {
    let mut interpreter = Interpreter::new(options.clone());
    interpreter.eval_program(program)
}

/// Parses and executes `source` with default options, wiring the stages
/// the way the CLI does.
///
/// # Errors
/// The collected diagnostics when parsing fails, or the runtime error
/// when execution faults.
///
/// # Example
/// ```
/// use moonlet::{Value, run};
///
/// let results = run("local function double(n) return n * 2 end return double(21)").unwrap();
/// assert_eq!(results, vec![Value::Integer(42)]);
/// ```
pub fn run(source: &str) -> Result<Vec<Value>, Box<dyn std::error::Error>> {
    let program = parse(source, &ParseOptions::default())?;
    let results = evaluate(&program, &EvalOptions::default())?;
    Ok(results)
}
