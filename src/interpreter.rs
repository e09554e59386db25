/// The environment chain.
///
/// Defines the lexical environment type: a name-to-value map with an
/// optional shared parent handle, walked by lookups and nearest-binding
/// assignment. Closures capture environments from here.
pub mod env;
/// The evaluator executes AST nodes and computes results.
///
/// The evaluator traverses the AST, evaluates expressions and
/// statements, manages environments, implements the operators and the
/// iterator protocol, and enforces the step and call-depth budgets. It
/// is the core execution engine of the interpreter.
pub mod evaluator;
/// The lexer tokenizes source code for further parsing.
///
/// The lexer drives the scanner over the raw source text and produces a
/// flat token sequence terminated by EOF: keywords, names, literals,
/// operators, and (on request) line breaks and comments. This is the
/// first stage of the pipeline.
pub mod lexer;
/// The parser builds the abstract syntax tree from tokens.
///
/// The parser consumes the token stream, disambiguates statements,
/// assembles expressions by precedence climbing, and records syntax
/// errors without aborting, so one pass reports every problem.
pub mod parser;
/// The printer renders an AST back to surface text.
///
/// The printer walks the tree depth-first, emitting structurally
/// faithful source with parentheses chosen from the operator
/// precedence table and strings quoted per the configured style.
pub mod printer;
/// The scanner maintains a cursor over source text.
///
/// Defines source positions and spans, tracks line/column/offset, and
/// provides the character-level predicates and atomic readers
/// (identifier, number, string, long-bracket string) the lexer drives.
pub mod scanner;
/// The value module defines the runtime data types for evaluation.
///
/// Declares the `Value` enum and its variants (nil, booleans, integers,
/// floats, strings, tables, functions), table storage with normalized
/// keys and metatables, and the callable types.
pub mod value;
