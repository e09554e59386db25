use crate::interpreter::scanner::Span;

/// Represents all errors that can be raised during evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// An operator received operands of types it does not accept.
    TypeMismatch {
        /// The operator or operation.
        operation: String,
        /// A description of the offending types.
        types:     String,
        /// The source range of the failing node.
        span:      Span,
    },
    /// Attempted to call a value that is not a function.
    CallOnNonCallable {
        /// The type actually called.
        type_name: &'static str,
        /// The source range of the call.
        span:      Span,
    },
    /// Attempted to index a value that is not a table.
    IndexOnNonIndexable {
        /// The type actually indexed.
        type_name: &'static str,
        /// The source range of the index expression.
        span:      Span,
    },
    /// Read of an undefined variable while strict mode is on.
    UndefinedVariable {
        /// The variable name.
        name: String,
        /// The source range of the reference.
        span: Span,
    },
    /// Integer floor-division or modulo by zero.
    DivisionByZero {
        /// The source range of the operation.
        span: Span,
    },
    /// A numeric `for` loop was given a step of zero.
    StepOfZero {
        /// The source range of the loop header.
        span: Span,
    },
    /// An `__index` chain exceeded the permitted depth.
    MetatableCycle {
        /// The source range of the lookup.
        span: Span,
    },
    /// A `goto` found no matching label.
    GotoUnresolved {
        /// The label name.
        label: String,
        /// The source range of the `goto`.
        span:  Span,
    },
    /// A `break` was executed outside of a loop body.
    BreakOutsideLoop {
        /// The source range of the `break`.
        span: Span,
    },
    /// A table key was nil or NaN.
    InvalidTableKey {
        /// Why the key was rejected.
        reason: &'static str,
        /// The source range of the write.
        span:   Span,
    },
    /// Integer arithmetic overflowed.
    ArithmeticOverflow {
        /// The source range of the operation.
        span: Span,
    },
    /// The `error` built-in raised, or an assertion failed.
    Raised {
        /// The raised message.
        message: String,
        /// The source range of the raise site.
        span:    Span,
    },
    /// The configured statement budget was spent.
    StepsExhausted {
        /// The configured limit.
        limit: u64,
        /// The statement that crossed it.
        span:  Span,
    },
    /// The configured call-depth budget was spent.
    DepthExhausted {
        /// The configured limit.
        limit: usize,
        /// The call that crossed it.
        span:  Span,
    },
}

impl RuntimeError {
    /// The source range the error refers to.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::TypeMismatch { span, .. }
            | Self::CallOnNonCallable { span, .. }
            | Self::IndexOnNonIndexable { span, .. }
            | Self::UndefinedVariable { span, .. }
            | Self::DivisionByZero { span }
            | Self::StepOfZero { span }
            | Self::MetatableCycle { span }
            | Self::GotoUnresolved { span, .. }
            | Self::BreakOutsideLoop { span }
            | Self::InvalidTableKey { span, .. }
            | Self::ArithmeticOverflow { span }
            | Self::Raised { span, .. }
            | Self::StepsExhausted { span, .. }
            | Self::DepthExhausted { span, .. } => *span,
        }
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TypeMismatch { operation, types, span } => {
                write!(f, "{}: cannot apply '{operation}' to {types}.", span.start)
            },
            Self::CallOnNonCallable { type_name, span } => {
                write!(f, "{}: attempt to call a {type_name} value.", span.start)
            },
            Self::IndexOnNonIndexable { type_name, span } => {
                write!(f, "{}: attempt to index a {type_name} value.", span.start)
            },
            Self::UndefinedVariable { name, span } => {
                write!(f, "{}: undefined variable '{name}'.", span.start)
            },
            Self::DivisionByZero { span } => {
                write!(f, "{}: attempt to divide by zero.", span.start)
            },
            Self::StepOfZero { span } => {
                write!(f, "{}: 'for' step is zero.", span.start)
            },
            Self::MetatableCycle { span } => {
                write!(f, "{}: '__index' chain is too long; possible cycle.", span.start)
            },
            Self::GotoUnresolved { label, span } => {
                write!(f, "{}: no visible label '{label}' for goto.", span.start)
            },
            Self::BreakOutsideLoop { span } => {
                write!(f, "{}: 'break' outside a loop.", span.start)
            },
            Self::InvalidTableKey { reason, span } => {
                write!(f, "{}: table key is {reason}.", span.start)
            },
            Self::ArithmeticOverflow { span } => {
                write!(f, "{}: integer overflow.", span.start)
            },
            Self::Raised { message, span } => {
                write!(f, "{}: {message}", span.start)
            },
            Self::StepsExhausted { limit, span } => {
                write!(f, "{}: execution budget of {limit} steps exhausted.", span.start)
            },
            Self::DepthExhausted { limit, span } => {
                write!(f, "{}: call depth limit of {limit} exceeded.", span.start)
            },
        }
    }
}

impl std::error::Error for RuntimeError {}
