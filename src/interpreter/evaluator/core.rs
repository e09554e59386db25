use std::rc::Rc;

use crate::{
    ast::{Expr, Program, Statement},
    error::RuntimeError,
    interpreter::{
        env::{EnvRef, Environment},
        evaluator::native,
        scanner::Span,
        value::{Function, Value},
    },
};

/// Result type used by the evaluator.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Options controlling execution limits and lookup strictness.
#[derive(Debug, Clone)]
pub struct EvalOptions {
    /// Abort with `StepsExhausted` after this many statement
    /// executions. `None` means unlimited.
    pub max_steps: Option<u64>,
    /// Abort with `DepthExhausted` when user-function calls nest deeper
    /// than this.
    pub max_call_depth: usize,
    /// Error on reads of undefined variables instead of yielding nil.
    pub strict: bool,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self { max_steps: None,
               max_call_depth: 200,
               strict: false, }
    }
}

/// The control-flow outcome of executing a statement or block.
///
/// Blocks propagate signals upward until a handler intercepts them:
/// function calls intercept `Return`, loops intercept `Break`, and
/// blocks holding a matching label intercept `Goto`.
#[derive(Debug)]
pub enum Signal {
    /// Execution fell through; continue with the next statement.
    Normal,
    /// A `return` is unwinding to the enclosing call.
    Return(Vec<Value>),
    /// A `break` is unwinding to the innermost loop.
    Break {
        /// The `break` statement's source range.
        span: Span,
    },
    /// A `goto` is searching for its label.
    Goto {
        /// The target label name.
        label: String,
        /// The `goto` statement's source range.
        span:  Span,
    },
}

/// The tree-walking execution engine.
///
/// Holds the global environment, the execution budgets and the call
/// depth counter. Each program run executes in a fresh child of the
/// globals, so `local` declarations at the top level do not leak into
/// the globals while undeclared assignments still land there.
pub struct Interpreter {
    globals: EnvRef,
    options: EvalOptions,
    depth:   usize,
    steps:   u64,
}

impl Interpreter {
    /// Creates an interpreter with the native functions installed in a
    /// fresh global environment.
    #[must_use]
    pub fn new(options: EvalOptions) -> Self {
        let globals = Environment::root();
        native::install(&globals);
        Self { globals,
               options,
               depth: 0,
               steps: 0 }
    }

    /// The global environment.
    #[must_use]
    pub fn globals(&self) -> &EnvRef {
        &self.globals
    }

    /// The configured options.
    #[must_use]
    pub const fn options(&self) -> &EvalOptions {
        &self.options
    }

    /// Executes a program and returns the values of its top-level
    /// `return`, or an empty list when execution falls off the end.
    ///
    /// # Errors
    /// Any runtime fault, including a `goto` with no matching label and
    /// a `break` outside every loop.
    pub fn eval_program(&mut self, program: &Program) -> EvalResult<Vec<Value>> {
        let env = Environment::with_parent(&self.globals);
        match self.exec_block(&program.body, &env)? {
            Signal::Return(values) => Ok(values),
            Signal::Normal => Ok(Vec::new()),
            Signal::Break { span } => Err(RuntimeError::BreakOutsideLoop { span }),
            Signal::Goto { label, span } => Err(RuntimeError::GotoUnresolved { label, span }),
        }
    }

    /// Executes a statement sequence in `env`.
    ///
    /// `Goto` signals arising in the sequence are resolved against the
    /// sequence's own labels (forward or backward); unresolved ones
    /// propagate to the enclosing block.
    pub(crate) fn exec_block(&mut self, body: &[Statement], env: &EnvRef) -> EvalResult<Signal> {
        let mut index = 0;
        while index < body.len() {
            match self.exec_statement(&body[index], env)? {
                Signal::Normal => index += 1,
                Signal::Goto { label, span } => match find_label(body, &label) {
                    Some(target) => index = target + 1,
                    None => return Ok(Signal::Goto { label, span }),
                },
                signal => return Ok(signal),
            }
        }
        Ok(Signal::Normal)
    }

    /// Counts one statement against the step budget.
    pub(crate) fn charge_step(&mut self, span: Span) -> EvalResult<()> {
        self.steps += 1;
        if let Some(limit) = self.options.max_steps {
            if self.steps > limit {
                return Err(RuntimeError::StepsExhausted { limit, span });
            }
        }
        Ok(())
    }

    /// Enters a user-function call, enforcing the depth budget.
    pub(crate) fn enter_call(&mut self, span: Span) -> EvalResult<()> {
        if self.depth >= self.options.max_call_depth {
            return Err(RuntimeError::DepthExhausted { limit: self.options.max_call_depth,
                                                      span });
        }
        self.depth += 1;
        Ok(())
    }

    /// Leaves a user-function call.
    pub(crate) fn leave_call(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Evaluates an expression to a single value. Multi-valued
    /// expressions truncate to their first value here; list contexts go
    /// through [`Self::eval_expr_list`] instead.
    pub(crate) fn eval_expr(&mut self, expr: &Expr, env: &EnvRef) -> EvalResult<Value> {
        match expr {
            Expr::Literal { value, .. } => Ok(literal_to_value(value)),
            Expr::Identifier { name, span } => self.eval_identifier(name, *span, env),
            Expr::Unary { op, argument, span } => self.eval_unary(*op, argument, *span, env),
            Expr::Binary { op, left, right, span } => self.eval_binary(*op, left, right, *span, env),
            Expr::Function { params, body, .. } => Ok(Self::make_closure(params, body, env)),
            Expr::Call { .. } => {
                let mut values = self.eval_call(expr, env)?;
                if values.is_empty() {
                    Ok(Value::Nil)
                } else {
                    Ok(values.swap_remove(0))
                }
            },
            Expr::Member { base, selector, span } => {
                let base_value = self.eval_expr(base, env)?;
                let key = self.eval_selector_key(selector, env)?;
                self.member_get(&base_value, &key, *span)
            },
            Expr::Table { fields, span } => self.eval_table_constructor(fields, *span, env),
        }
    }

    /// Evaluates an expression in a multi-value context: calls keep
    /// their whole result list, everything else yields one value.
    pub(crate) fn eval_expr_multi(&mut self, expr: &Expr, env: &EnvRef) -> EvalResult<Vec<Value>> {
        if expr.is_multi_valued() {
            self.eval_call(expr, env)
        } else {
            Ok(vec![self.eval_expr(expr, env)?])
        }
    }

    /// Evaluates an expression list left to right. A multi-valued
    /// expression expands only in the final position; anywhere else it
    /// truncates to one value.
    pub(crate) fn eval_expr_list(&mut self, exprs: &[Expr], env: &EnvRef) -> EvalResult<Vec<Value>> {
        let mut values = Vec::with_capacity(exprs.len());
        for (index, expr) in exprs.iter().enumerate() {
            if index + 1 == exprs.len() {
                values.extend(self.eval_expr_multi(expr, env)?);
            } else {
                values.push(self.eval_expr(expr, env)?);
            }
        }
        Ok(values)
    }

    /// Resolves a variable reference. Absent names yield nil, or an
    /// error in strict mode.
    fn eval_identifier(&mut self, name: &str, span: Span, env: &EnvRef) -> EvalResult<Value> {
        match Environment::lookup(env, name) {
            Some(value) => Ok(value),
            None => {
                if self.options.strict {
                    return Err(RuntimeError::UndefinedVariable { name: name.to_string(),
                                                                 span });
                }
                Ok(Value::Nil)
            },
        }
    }

    /// Builds a closure capturing `env` as its defining environment.
    pub(crate) fn make_closure(params: &[crate::ast::Ident],
                               body: &[Statement],
                               env: &EnvRef)
                               -> Value {
        let params = params.iter().map(|p| p.name.clone()).collect();
        Value::Function(Rc::new(Function::Closure { params,
                                                    body: Rc::new(body.to_vec()),
                                                    env: Rc::clone(env) }))
    }
}

/// Converts a literal AST node to its runtime value.
fn literal_to_value(value: &crate::ast::LiteralValue) -> Value {
    use crate::ast::LiteralValue;
    match value {
        LiteralValue::Nil => Value::Nil,
        LiteralValue::Bool(b) => Value::Bool(*b),
        LiteralValue::Integer(n) => Value::Integer(*n),
        LiteralValue::Float(f) => Value::Float(*f),
        LiteralValue::Str(s) => Value::string(s.clone()),
    }
}

/// The position of the label named `label` in `body`, if present.
fn find_label(body: &[Statement], label: &str) -> Option<usize> {
    body.iter().position(|statement| match statement {
                   Statement::Label { name, .. } => name == label,
                   _ => false,
               })
}
