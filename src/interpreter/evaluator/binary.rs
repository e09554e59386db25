use crate::{
    ast::{BinaryOperator, Expr},
    error::RuntimeError,
    interpreter::{
        env::EnvRef,
        evaluator::core::{EvalResult, Interpreter},
        scanner::Span,
        value::{Value, core::NumericValue},
    },
    util::num::float_to_text,
};

impl Interpreter {
    /// Evaluates a binary operation.
    ///
    /// `and` and `or` short-circuit with value-returning semantics and
    /// are handled before the right operand is touched; every other
    /// operator evaluates both operands left to right.
    pub(crate) fn eval_binary(&mut self,
                              op: BinaryOperator,
                              left: &Expr,
                              right: &Expr,
                              span: Span,
                              env: &EnvRef)
                              -> EvalResult<Value> {
        match op {
            BinaryOperator::And => {
                let left_value = self.eval_expr(left, env)?;
                if left_value.is_truthy() {
                    self.eval_expr(right, env)
                } else {
                    Ok(left_value)
                }
            },
            BinaryOperator::Or => {
                let left_value = self.eval_expr(left, env)?;
                if left_value.is_truthy() {
                    Ok(left_value)
                } else {
                    self.eval_expr(right, env)
                }
            },
            _ => {
                let left_value = self.eval_expr(left, env)?;
                let right_value = self.eval_expr(right, env)?;
                apply_binary(op, &left_value, &right_value, span)
            },
        }
    }
}

/// Applies a non-short-circuiting binary operator to two values.
pub(crate) fn apply_binary(op: BinaryOperator,
                           left: &Value,
                           right: &Value,
                           span: Span)
                           -> EvalResult<Value> {
    match op {
        BinaryOperator::Add | BinaryOperator::Sub | BinaryOperator::Mul => {
            arithmetic(op, left, right, span)
        },
        BinaryOperator::Div => {
            let (a, b) = numeric_operands(op, left, right, span)?;
            Ok(Value::Float(a.as_float() / b.as_float()))
        },
        BinaryOperator::FloorDiv => floor_div(left, right, span),
        BinaryOperator::Mod => floor_mod(left, right, span),
        BinaryOperator::Pow => {
            let (a, b) = numeric_operands(op, left, right, span)?;
            Ok(Value::Float(a.as_float().powf(b.as_float())))
        },
        BinaryOperator::Concat => concat(left, right, span),
        BinaryOperator::Equal => Ok(Value::Bool(left.equals(right))),
        BinaryOperator::NotEqual => Ok(Value::Bool(!left.equals(right))),
        BinaryOperator::Less
        | BinaryOperator::LessEqual
        | BinaryOperator::Greater
        | BinaryOperator::GreaterEqual => compare(op, left, right, span),
        BinaryOperator::And | BinaryOperator::Or => {
            unreachable!("short-circuit operators are handled before operand evaluation")
        },
    }
}

/// `+`, `-` and `*`: integer-preserving on two integers (with checked
/// overflow), float otherwise.
fn arithmetic(op: BinaryOperator, left: &Value, right: &Value, span: Span) -> EvalResult<Value> {
    let (a, b) = numeric_operands(op, left, right, span)?;
    match (a, b) {
        (NumericValue::Int(x), NumericValue::Int(y)) => {
            let result = match op {
                BinaryOperator::Add => x.checked_add(y),
                BinaryOperator::Sub => x.checked_sub(y),
                _ => x.checked_mul(y),
            };
            result.map(Value::Integer)
                  .ok_or(RuntimeError::ArithmeticOverflow { span })
        },
        _ => {
            let (x, y) = (a.as_float(), b.as_float());
            let result = match op {
                BinaryOperator::Add => x + y,
                BinaryOperator::Sub => x - y,
                _ => x * y,
            };
            Ok(Value::Float(result))
        },
    }
}

/// `//`: floor division, integer-preserving on two integers. Integer
/// division by zero is an error; float division by zero follows IEEE.
fn floor_div(left: &Value, right: &Value, span: Span) -> EvalResult<Value> {
    let (a, b) = numeric_operands(BinaryOperator::FloorDiv, left, right, span)?;
    match (a, b) {
        (NumericValue::Int(x), NumericValue::Int(y)) => {
            if y == 0 {
                return Err(RuntimeError::DivisionByZero { span });
            }
            let mut q = x.wrapping_div(y);
            if x % y != 0 && (x < 0) != (y < 0) {
                q -= 1;
            }
            Ok(Value::Integer(q))
        },
        _ => Ok(Value::Float((a.as_float() / b.as_float()).floor())),
    }
}

/// `%`: floored modulo, so the result takes the divisor's sign.
fn floor_mod(left: &Value, right: &Value, span: Span) -> EvalResult<Value> {
    let (a, b) = numeric_operands(BinaryOperator::Mod, left, right, span)?;
    match (a, b) {
        (NumericValue::Int(x), NumericValue::Int(y)) => {
            if y == 0 {
                return Err(RuntimeError::DivisionByZero { span });
            }
            let mut r = x.wrapping_rem(y);
            if r != 0 && (r < 0) != (y < 0) {
                r += y;
            }
            Ok(Value::Integer(r))
        },
        _ => {
            let (x, y) = (a.as_float(), b.as_float());
            Ok(Value::Float(x - (x / y).floor() * y))
        },
    }
}

/// `..`: strings pass through, numbers coerce to their canonical text.
fn concat(left: &Value, right: &Value, span: Span) -> EvalResult<Value> {
    let mut out = concat_piece(left).ok_or_else(|| type_mismatch(BinaryOperator::Concat, left, right, span))?;
    let right_piece =
        concat_piece(right).ok_or_else(|| type_mismatch(BinaryOperator::Concat, left, right, span))?;
    out.push_str(&right_piece);
    Ok(Value::string(out))
}

fn concat_piece(value: &Value) -> Option<String> {
    match value {
        Value::Str(s) => Some(s.as_ref().clone()),
        Value::Integer(n) => Some(n.to_string()),
        Value::Float(f) => Some(float_to_text(*f)),
        _ => None,
    }
}

/// `< <= > >=`: numbers compare numerically across representations,
/// strings lexicographically; anything else is a type error.
fn compare(op: BinaryOperator, left: &Value, right: &Value, span: Span) -> EvalResult<Value> {
    let ordering = match (left, right) {
        (Value::Str(a), Value::Str(b)) => a.as_ref().cmp(b.as_ref()),
        _ => {
            let (Some(a), Some(b)) = (left.as_number(), right.as_number()) else {
                return Err(type_mismatch(op, left, right, span));
            };
            let (x, y) = match (a, b) {
                (NumericValue::Int(x), NumericValue::Int(y)) => {
                    return Ok(Value::Bool(ordering_holds(op, x.cmp(&y))));
                },
                _ => (a.as_float(), b.as_float()),
            };
            let Some(ordering) = x.partial_cmp(&y) else {
                // NaN compares false under every ordering operator.
                return Ok(Value::Bool(false));
            };
            ordering
        },
    };
    Ok(Value::Bool(ordering_holds(op, ordering)))
}

const fn ordering_holds(op: BinaryOperator, ordering: std::cmp::Ordering) -> bool {
    use std::cmp::Ordering::{Equal, Greater, Less};
    match op {
        BinaryOperator::Less => matches!(ordering, Less),
        BinaryOperator::LessEqual => matches!(ordering, Less | Equal),
        BinaryOperator::Greater => matches!(ordering, Greater),
        _ => matches!(ordering, Greater | Equal),
    }
}

/// Extracts two numeric operands or reports the mismatch.
fn numeric_operands(op: BinaryOperator,
                    left: &Value,
                    right: &Value,
                    span: Span)
                    -> EvalResult<(NumericValue, NumericValue)> {
    match (left.as_number(), right.as_number()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(type_mismatch(op, left, right, span)),
    }
}

fn type_mismatch(op: BinaryOperator, left: &Value, right: &Value, span: Span) -> RuntimeError {
    RuntimeError::TypeMismatch { operation: op.to_string(),
                                 types:     format!("{} and {}",
                                                    left.type_name(),
                                                    right.type_name()),
                                 span }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::scanner::Span;

    fn apply(op: BinaryOperator, left: Value, right: Value) -> EvalResult<Value> {
        apply_binary(op, &left, &right, Span::default())
    }

    #[test]
    fn integer_arithmetic_stays_integral() {
        assert_eq!(apply(BinaryOperator::Add, Value::Integer(2), Value::Integer(3)).unwrap(),
                   Value::Integer(5));
        assert_eq!(apply(BinaryOperator::Mul, Value::Integer(4), Value::Integer(5)).unwrap(),
                   Value::Integer(20));
    }

    #[test]
    fn mixed_arithmetic_promotes_to_float() {
        assert_eq!(apply(BinaryOperator::Add, Value::Integer(1), Value::Float(0.5)).unwrap(),
                   Value::Float(1.5));
    }

    #[test]
    fn division_always_yields_float() {
        assert_eq!(apply(BinaryOperator::Div, Value::Integer(7), Value::Integer(2)).unwrap(),
                   Value::Float(3.5));
    }

    #[test]
    fn floor_division_preserves_integers_and_floors_negatives() {
        assert_eq!(apply(BinaryOperator::FloorDiv, Value::Integer(7), Value::Integer(2)).unwrap(),
                   Value::Integer(3));
        assert_eq!(apply(BinaryOperator::FloorDiv, Value::Integer(-7), Value::Integer(2)).unwrap(),
                   Value::Integer(-4));
    }

    #[test]
    fn modulo_takes_the_divisor_sign() {
        assert_eq!(apply(BinaryOperator::Mod, Value::Integer(-5), Value::Integer(3)).unwrap(),
                   Value::Integer(1));
        assert_eq!(apply(BinaryOperator::Mod, Value::Integer(5), Value::Integer(-3)).unwrap(),
                   Value::Integer(-1));
    }

    #[test]
    fn integer_division_by_zero_is_an_error() {
        assert!(matches!(apply(BinaryOperator::FloorDiv, Value::Integer(1), Value::Integer(0)),
                         Err(RuntimeError::DivisionByZero { .. })));
        assert!(matches!(apply(BinaryOperator::Mod, Value::Integer(1), Value::Integer(0)),
                         Err(RuntimeError::DivisionByZero { .. })));
    }

    #[test]
    fn exponentiation_always_yields_float() {
        assert_eq!(apply(BinaryOperator::Pow, Value::Integer(2), Value::Integer(3)).unwrap(),
                   Value::Float(8.0));
    }

    #[test]
    fn concat_coerces_numbers() {
        assert_eq!(apply(BinaryOperator::Concat, Value::string("n="), Value::Integer(4)).unwrap(),
                   Value::string("n=4"));
        assert_eq!(apply(BinaryOperator::Concat, Value::Float(1.0), Value::string("!")).unwrap(),
                   Value::string("1.0!"));
    }

    #[test]
    fn comparing_incompatible_types_errors_except_equality() {
        assert!(matches!(apply(BinaryOperator::Less, Value::Integer(1), Value::string("x")),
                         Err(RuntimeError::TypeMismatch { .. })));
        assert_eq!(apply(BinaryOperator::Equal, Value::Integer(1), Value::string("x")).unwrap(),
                   Value::Bool(false));
        assert_eq!(apply(BinaryOperator::NotEqual, Value::Integer(1), Value::string("x")).unwrap(),
                   Value::Bool(true));
    }

    #[test]
    fn strings_compare_lexicographically() {
        assert_eq!(apply(BinaryOperator::Less, Value::string("abc"), Value::string("abd")).unwrap(),
                   Value::Bool(true));
    }

    #[test]
    fn integer_overflow_is_detected() {
        assert!(matches!(apply(BinaryOperator::Add, Value::Integer(i64::MAX), Value::Integer(1)),
                         Err(RuntimeError::ArithmeticOverflow { .. })));
    }
}
