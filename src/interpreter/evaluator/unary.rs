use crate::{
    ast::{Expr, UnaryOperator},
    error::RuntimeError,
    interpreter::{
        env::EnvRef,
        evaluator::core::{EvalResult, Interpreter},
        scanner::Span,
        value::{Value, core::NumericValue},
    },
};

impl Interpreter {
    /// Evaluates a unary operation.
    pub(crate) fn eval_unary(&mut self,
                             op: UnaryOperator,
                             argument: &Expr,
                             span: Span,
                             env: &EnvRef)
                             -> EvalResult<Value> {
        let value = self.eval_expr(argument, env)?;
        match op {
            UnaryOperator::Not => Ok(Value::Bool(!value.is_truthy())),
            UnaryOperator::Negate => match value.as_number() {
                Some(NumericValue::Int(n)) => n.checked_neg()
                                               .map(Value::Integer)
                                               .ok_or(RuntimeError::ArithmeticOverflow { span }),
                Some(NumericValue::Float(f)) => Ok(Value::Float(-f)),
                None => Err(RuntimeError::TypeMismatch { operation: op.to_string(),
                                                         types:     value.type_name().to_string(),
                                                         span }),
            },
            UnaryOperator::Length => match &value {
                Value::Str(s) => Ok(Value::Integer(i64::try_from(s.len()).unwrap_or(i64::MAX))),
                Value::Table(t) => Ok(Value::Integer(t.borrow().length())),
                _ => Err(RuntimeError::TypeMismatch { operation: op.to_string(),
                                                      types:     value.type_name().to_string(),
                                                      span }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::interpreter::value::{Table, TableKey};

    fn eval_unary_on(op: UnaryOperator, value: Value) -> EvalResult<Value> {
        let mut interpreter = Interpreter::new(crate::interpreter::evaluator::EvalOptions::default());
        let env = Rc::clone(interpreter.globals());
        crate::interpreter::env::Environment::define(&env, "x", value);
        let argument = Expr::Identifier { name: "x".to_string(),
                                          span: Span::default(), };
        interpreter.eval_unary(op, &argument, Span::default(), &env)
    }

    #[test]
    fn not_follows_truthiness() {
        assert_eq!(eval_unary_on(UnaryOperator::Not, Value::Nil).unwrap(), Value::Bool(true));
        assert_eq!(eval_unary_on(UnaryOperator::Not, Value::Integer(0)).unwrap(),
                   Value::Bool(false));
    }

    #[test]
    fn length_of_strings_and_tables() {
        assert_eq!(eval_unary_on(UnaryOperator::Length, Value::string("abcd")).unwrap(),
                   Value::Integer(4));

        let mut table = Table::new();
        table.raw_set(TableKey::Integer(1), Value::Integer(1));
        table.raw_set(TableKey::Integer(2), Value::Integer(2));
        let value = Value::Table(Rc::new(RefCell::new(table)));
        assert_eq!(eval_unary_on(UnaryOperator::Length, value).unwrap(), Value::Integer(2));
    }

    #[test]
    fn negating_a_string_is_a_type_error() {
        assert!(matches!(eval_unary_on(UnaryOperator::Negate, Value::string("x")),
                         Err(RuntimeError::TypeMismatch { .. })));
    }
}
