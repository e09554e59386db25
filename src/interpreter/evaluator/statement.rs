use crate::{
    ast::{Expr, Selector, Statement},
    error::RuntimeError,
    interpreter::{
        env::{EnvRef, Environment},
        evaluator::core::{EvalResult, Interpreter, Signal},
        scanner::Span,
        value::{TableKey, Value},
    },
};

impl Interpreter {
    /// Executes a single statement in `env` and reports how control
    /// continues.
    pub(crate) fn exec_statement(&mut self,
                                 statement: &Statement,
                                 env: &EnvRef)
                                 -> EvalResult<Signal> {
        self.charge_step(statement.span())?;

        match statement {
            Statement::Expression { expr, .. } => {
                // Evaluated for effect; every produced value is dropped.
                self.eval_expr_multi(expr, env)?;
                Ok(Signal::Normal)
            },
            Statement::Local { variables, init, .. } => {
                let values = self.eval_expr_list(init, env)?;
                for (index, variable) in variables.iter().enumerate() {
                    let value = values.get(index).cloned().unwrap_or(Value::Nil);
                    Environment::define(env, &variable.name, value);
                }
                Ok(Signal::Normal)
            },
            Statement::Assignment { targets, values, .. } => {
                let values = self.eval_expr_list(values, env)?;
                for (index, target) in targets.iter().enumerate() {
                    let value = values.get(index).cloned().unwrap_or(Value::Nil);
                    self.assign_target(target, value, env)?;
                }
                Ok(Signal::Normal)
            },
            Statement::FunctionDeclaration { name, params, body, is_local, .. } => {
                let closure = Self::make_closure(params, body, env);
                if *is_local {
                    if let Expr::Identifier { name, .. } = name {
                        Environment::define(env, name, closure);
                        return Ok(Signal::Normal);
                    }
                }
                self.assign_target(name, closure, env)?;
                Ok(Signal::Normal)
            },
            Statement::If { clauses, .. } => {
                for clause in clauses {
                    let taken = match &clause.condition {
                        Some(condition) => self.eval_expr(condition, env)?.is_truthy(),
                        None => true,
                    };
                    if taken {
                        let clause_env = Environment::with_parent(env);
                        return self.exec_block(&clause.body, &clause_env);
                    }
                }
                Ok(Signal::Normal)
            },
            Statement::While { condition, body, span } => {
                while self.eval_expr(condition, env)?.is_truthy() {
                    // Each round of an otherwise-empty loop still
                    // consumes budget, so a spin cannot outrun it.
                    self.charge_step(*span)?;
                    let iteration_env = Environment::with_parent(env);
                    match self.exec_block(body, &iteration_env)? {
                        Signal::Normal => {},
                        Signal::Break { .. } => break,
                        signal => return Ok(signal),
                    }
                }
                Ok(Signal::Normal)
            },
            Statement::Repeat { body, condition, span } => {
                loop {
                    self.charge_step(*span)?;
                    // The body environment stays live for the condition:
                    // `until` sees the block's locals.
                    let iteration_env = Environment::with_parent(env);
                    match self.exec_block(body, &iteration_env)? {
                        Signal::Normal => {},
                        Signal::Break { .. } => break,
                        signal => return Ok(signal),
                    }
                    if self.eval_expr(condition, &iteration_env)?.is_truthy() {
                        break;
                    }
                }
                Ok(Signal::Normal)
            },
            Statement::ForNumeric { .. } => self.exec_for_numeric(statement, env),
            Statement::ForGeneric { .. } => self.exec_for_generic(statement, env),
            Statement::Return { arguments, .. } => {
                let values = self.eval_expr_list(arguments, env)?;
                Ok(Signal::Return(values))
            },
            Statement::Break { span } => Ok(Signal::Break { span: *span }),
            Statement::Do { body, .. } => {
                let block_env = Environment::with_parent(env);
                self.exec_block(body, &block_env)
            },
            Statement::Goto { label, span } => Ok(Signal::Goto { label: label.clone(),
                                                                 span:  *span, }),
            Statement::Label { .. } => Ok(Signal::Normal),
        }
    }

    /// Writes `value` through an assignment target: a name updates the
    /// nearest enclosing binding (or creates a global), a member
    /// expression writes a table entry.
    pub(crate) fn assign_target(&mut self,
                                target: &Expr,
                                value: Value,
                                env: &EnvRef)
                                -> EvalResult<()> {
        match target {
            Expr::Identifier { name, .. } => {
                if !Environment::assign(env, name, value.clone()) {
                    Environment::define_at_root(env, name, value);
                }
                Ok(())
            },
            Expr::Member { base, selector, span } => {
                let base_value = self.eval_expr(base, env)?;
                let key = self.eval_selector_key(selector, env)?;
                self.member_set(&base_value, &key, value, *span)
            },
            // The parser only admits names and members; anything else
            // would be a parser defect.
            _ => Err(RuntimeError::TypeMismatch { operation: "assignment".to_string(),
                                                  types:     "a non-assignable expression".to_string(),
                                                  span:      target.span(), }),
        }
    }

    /// Evaluates a member selector to a key value.
    pub(crate) fn eval_selector_key(&mut self,
                                    selector: &Selector,
                                    env: &EnvRef)
                                    -> EvalResult<Value> {
        match selector {
            Selector::Name(name) => Ok(Value::string(name.name.clone())),
            Selector::Computed(expr) => self.eval_expr(expr, env),
        }
    }

    /// Normalizes a key value, attaching `span` to the failure.
    pub(crate) fn table_key(key: &Value, span: Span) -> EvalResult<TableKey> {
        TableKey::try_from_value(key).map_err(|reason| RuntimeError::InvalidTableKey { reason,
                                                                                       span })
    }
}
