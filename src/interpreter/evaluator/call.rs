use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{
        env::{EnvRef, Environment},
        evaluator::core::{EvalResult, Interpreter, Signal},
        scanner::Span,
        value::{Function, Value},
    },
};

impl Interpreter {
    /// Evaluates a call expression to its full result list.
    ///
    /// For method-call sugar `obj:m(args)` the receiver is evaluated
    /// exactly once: its value is used both for the member lookup and
    /// as the leading argument.
    pub(crate) fn eval_call(&mut self, expr: &Expr, env: &EnvRef) -> EvalResult<Vec<Value>> {
        let Expr::Call { callee, arguments, is_method, span } = expr else {
            // Only call nodes are multi-valued; reaching here with
            // anything else is a dispatch defect.
            return Ok(vec![self.eval_expr(expr, env)?]);
        };

        if *is_method {
            let Expr::Member { base, selector, span: member_span } = callee.as_ref() else {
                return Err(RuntimeError::CallOnNonCallable { type_name: "nil",
                                                             span:      *span, });
            };
            let receiver = self.eval_expr(base, env)?;
            let key = self.eval_selector_key(selector, env)?;
            let method = self.member_get(&receiver, &key, *member_span)?;

            let mut call_arguments = Vec::with_capacity(arguments.len() + 1);
            call_arguments.push(receiver);
            call_arguments.extend(self.eval_expr_list(arguments, env)?);
            return self.call_value(&method, call_arguments, *span);
        }

        let callee_value = self.eval_expr(callee, env)?;
        let call_arguments = self.eval_expr_list(arguments, env)?;
        self.call_value(&callee_value, call_arguments, *span)
    }

    /// Calls a value with already-evaluated arguments.
    ///
    /// Native routines run directly. A closure call allocates a fresh
    /// environment parented to the closure's captured environment (not
    /// the caller's), binds parameters positionally (missing arguments
    /// become nil, extras are discarded), and executes the body; a
    /// `Return` signal supplies the result list, falling off the end
    /// supplies an empty one.
    ///
    /// # Errors
    /// - `CallOnNonCallable` for non-function callees.
    /// - `DepthExhausted` when the call-depth budget is spent.
    /// - `BreakOutsideLoop` / `GotoUnresolved` for control signals that
    ///   escape the body.
    pub(crate) fn call_value(&mut self,
                             callee: &Value,
                             arguments: Vec<Value>,
                             span: Span)
                             -> EvalResult<Vec<Value>> {
        let Value::Function(function) = callee else {
            return Err(RuntimeError::CallOnNonCallable { type_name: callee.type_name(),
                                                         span });
        };

        match function.as_ref() {
            Function::Native { func, .. } => func(self, arguments, span),
            Function::Closure { params, body, env } => {
                self.enter_call(span)?;

                let call_env = Environment::with_parent(env);
                for (index, param) in params.iter().enumerate() {
                    let value = arguments.get(index).cloned().unwrap_or(Value::Nil);
                    Environment::define(&call_env, param, value);
                }

                let outcome = self.exec_block(body, &call_env);
                self.leave_call();

                match outcome? {
                    Signal::Return(values) => Ok(values),
                    Signal::Normal => Ok(Vec::new()),
                    Signal::Break { span } => Err(RuntimeError::BreakOutsideLoop { span }),
                    Signal::Goto { label, span } => {
                        Err(RuntimeError::GotoUnresolved { label, span })
                    },
                }
            },
        }
    }
}
