/// Binary operator evaluation.
///
/// Implements arithmetic with integer/float promotion, floor division
/// and floored modulo, concatenation with numeric coercion, ordering
/// comparisons, and the short-circuiting logical operators.
pub mod binary;
/// Function calls.
///
/// Implements call evaluation (including method-call sugar), closure
/// invocation with fresh environments and the call-depth budget, and
/// dispatch to native routines.
pub mod call;
/// The interpreter state and the evaluation entry points.
///
/// Contains the `Interpreter` struct, expression dispatch, value-list
/// evaluation with tail expansion, and block execution with control
/// signals and label resolution.
pub mod core;
/// Numeric and generic `for` loops.
pub mod for_loop;
/// Native functions installed into the global environment.
pub mod native;
/// Statement execution.
///
/// Implements every statement kind: declarations, assignments with
/// nearest-binding resolution and global fallthrough, the conditional
/// and looping statements, and the control-flow statements.
pub mod statement;
/// Table construction and member access, including the bounded
/// `__index` metatable chain.
pub mod table;
/// Unary operator evaluation.
pub mod unary;

pub use self::core::{EvalOptions, EvalResult, Interpreter, Signal};
