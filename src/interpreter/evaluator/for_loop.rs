use crate::{
    ast::Statement,
    error::RuntimeError,
    interpreter::{
        env::{EnvRef, Environment},
        evaluator::core::{EvalResult, Interpreter, Signal},
        scanner::Span,
        value::{Value, core::NumericValue},
    },
};

impl Interpreter {
    /// Executes a numeric `for` loop.
    ///
    /// Start, stop and step evaluate once, before the first iteration.
    /// The loop stays in integer arithmetic when all three are
    /// integers. Iteration continues while `step > 0 and i <= stop` or
    /// `step < 0 and i >= stop`; a zero step is an error. Every
    /// iteration binds the variable in a fresh environment, so closures
    /// made in the body capture that iteration's binding.
    pub(crate) fn exec_for_numeric(&mut self,
                                   statement: &Statement,
                                   env: &EnvRef)
                                   -> EvalResult<Signal> {
        let Statement::ForNumeric { variable, start, end, step, body, span } = statement else {
            return Ok(Signal::Normal);
        };

        let start_value = self.eval_loop_number(start, env, "'for' initial value")?;
        let stop_value = self.eval_loop_number(end, env, "'for' limit")?;
        let step_value = match step {
            Some(step) => self.eval_loop_number(step, env, "'for' step")?,
            None => NumericValue::Int(1),
        };

        match (start_value, stop_value, step_value) {
            (NumericValue::Int(start), NumericValue::Int(stop), NumericValue::Int(step)) => {
                self.run_integer_loop(variable, start, stop, step, body, env, *span)
            },
            _ => self.run_float_loop(variable,
                                     start_value.as_float(),
                                     stop_value.as_float(),
                                     step_value.as_float(),
                                     body,
                                     env,
                                     *span),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn run_integer_loop(&mut self,
                        variable: &crate::ast::Ident,
                        start: i64,
                        stop: i64,
                        step: i64,
                        body: &[Statement],
                        env: &EnvRef,
                        span: Span)
                        -> EvalResult<Signal> {
        if step == 0 {
            return Err(RuntimeError::StepOfZero { span });
        }
        let mut i = start;
        while (step > 0 && i <= stop) || (step < 0 && i >= stop) {
            self.charge_step(span)?;
            let iteration_env = Environment::with_parent(env);
            Environment::define(&iteration_env, &variable.name, Value::Integer(i));
            match self.exec_block(body, &iteration_env)? {
                Signal::Normal => {},
                Signal::Break { .. } => break,
                signal => return Ok(signal),
            }
            // The counter stopping just below the overflow boundary
            // means the limit was unreachable; end the loop instead of
            // wrapping.
            match i.checked_add(step) {
                Some(next) => i = next,
                None => break,
            }
        }
        Ok(Signal::Normal)
    }

    #[allow(clippy::too_many_arguments)]
    fn run_float_loop(&mut self,
                      variable: &crate::ast::Ident,
                      start: f64,
                      stop: f64,
                      step: f64,
                      body: &[Statement],
                      env: &EnvRef,
                      span: Span)
                      -> EvalResult<Signal> {
        if step == 0.0 {
            return Err(RuntimeError::StepOfZero { span });
        }
        let mut i = start;
        while (step > 0.0 && i <= stop) || (step < 0.0 && i >= stop) {
            self.charge_step(span)?;
            let iteration_env = Environment::with_parent(env);
            Environment::define(&iteration_env, &variable.name, Value::Float(i));
            match self.exec_block(body, &iteration_env)? {
                Signal::Normal => {},
                Signal::Break { .. } => break,
                signal => return Ok(signal),
            }
            i += step;
        }
        Ok(Signal::Normal)
    }

    /// Executes a generic `for` loop over the iterator protocol.
    ///
    /// The iterator list evaluates once to (iterator function, state,
    /// control). Each round calls `iterator(state, control)`; a nil
    /// first result ends the loop, otherwise the results bind to the
    /// loop variables (missing ones nil, surplus discarded), the
    /// control value becomes the first result, and the body runs in a
    /// fresh per-iteration environment.
    pub(crate) fn exec_for_generic(&mut self,
                                   statement: &Statement,
                                   env: &EnvRef)
                                   -> EvalResult<Signal> {
        let Statement::ForGeneric { variables, iterators, body, span } = statement else {
            return Ok(Signal::Normal);
        };

        let mut setup = self.eval_expr_list(iterators, env)?;
        setup.resize(3, Value::Nil);
        let control_start = setup.pop().unwrap_or(Value::Nil);
        let state = setup.pop().unwrap_or(Value::Nil);
        let iterator = setup.pop().unwrap_or(Value::Nil);

        let mut control = control_start;
        loop {
            self.charge_step(*span)?;
            let results =
                self.call_value(&iterator, vec![state.clone(), control.clone()], *span)?;
            let first = results.first().cloned().unwrap_or(Value::Nil);
            if first.is_nil() {
                break;
            }

            let iteration_env = Environment::with_parent(env);
            for (index, variable) in variables.iter().enumerate() {
                let value = results.get(index).cloned().unwrap_or(Value::Nil);
                Environment::define(&iteration_env, &variable.name, value);
            }
            control = first;

            match self.exec_block(body, &iteration_env)? {
                Signal::Normal => {},
                Signal::Break { .. } => break,
                signal => return Ok(signal),
            }
        }
        Ok(Signal::Normal)
    }

    /// Evaluates a loop-header expression to a number.
    fn eval_loop_number(&mut self,
                        expr: &crate::ast::Expr,
                        env: &EnvRef,
                        what: &str)
                        -> EvalResult<NumericValue> {
        let value = self.eval_expr(expr, env)?;
        value.as_number()
             .ok_or_else(|| RuntimeError::TypeMismatch { operation: what.to_string(),
                                                         types:     value.type_name().to_string(),
                                                         span:      expr.span(), })
    }
}
