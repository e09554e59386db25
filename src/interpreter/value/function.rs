use std::rc::Rc;

use crate::{
    ast::Statement,
    error::RuntimeError,
    interpreter::{env::EnvRef, evaluator::Interpreter, scanner::Span, value::core::Value},
};

/// The signature of a native function: the interpreter handle (natives
/// like `pcall` call back into it), the evaluated arguments, and the
/// span of the call site for error reporting. Natives return a value
/// list; multi-return is the norm, not the exception.
pub type NativeFn = fn(&mut Interpreter, Vec<Value>, Span) -> Result<Vec<Value>, RuntimeError>;

/// A callable value: either a native routine or a user closure.
///
/// A closure owns its parameter names, a shared handle to its body, and
/// a shared handle to the environment it was defined in. Each invocation
/// allocates a fresh environment whose parent is that captured
/// environment, never the caller's.
pub enum Function {
    /// A built-in routine.
    Native {
        /// The name it is installed under, for display.
        name: &'static str,
        /// The implementation.
        func: NativeFn,
    },
    /// A user-defined closure.
    Closure {
        /// Parameter names in order.
        params: Vec<String>,
        /// The function body, shared with the AST it was built from.
        body:   Rc<Vec<Statement>>,
        /// The defining environment.
        env:    EnvRef,
    },
}

impl Function {
    /// A short description for display and error messages.
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Native { .. } => "built-in function",
            Self::Closure { .. } => "function",
        }
    }
}

/// Debug formatting stays shallow; closures reference environments that
/// may reference them back.
impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Native { name, .. } => write!(f, "Native({name})"),
            Self::Closure { params, .. } => write!(f, "Closure(params: {params:?})"),
        }
    }
}
