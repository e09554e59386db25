use std::{cell::RefCell, rc::Rc};

use crate::{
    ast::TableField,
    error::RuntimeError,
    interpreter::{
        env::EnvRef,
        evaluator::core::{EvalResult, Interpreter},
        scanner::Span,
        value::{Table, TableKey, Value},
    },
};

/// How many `__index` hops a single lookup may take before the chain is
/// declared cyclic.
const MAX_INDEX_CHAIN: usize = 100;

impl Interpreter {
    /// Evaluates a table constructor.
    ///
    /// Fields evaluate left to right. Array entries take sequential
    /// integer keys starting at 1; a trailing array entry that is a
    /// call expands into as many sequential entries as it returns
    /// values.
    pub(crate) fn eval_table_constructor(&mut self,
                                         fields: &[TableField],
                                         span: Span,
                                         env: &EnvRef)
                                         -> EvalResult<Value> {
        let mut table = Table::new();
        let mut next_index: i64 = 1;

        for (position, field) in fields.iter().enumerate() {
            match field {
                TableField::Array { value } => {
                    let is_last = position + 1 == fields.len();
                    if is_last {
                        for item in self.eval_expr_multi(value, env)? {
                            table.raw_set(TableKey::Integer(next_index), item);
                            next_index += 1;
                        }
                    } else {
                        let item = self.eval_expr(value, env)?;
                        table.raw_set(TableKey::Integer(next_index), item);
                        next_index += 1;
                    }
                },
                TableField::Named { key, value } => {
                    let item = self.eval_expr(value, env)?;
                    table.raw_set(TableKey::Str(key.name.clone()), item);
                },
                TableField::Computed { key, value } => {
                    let key_value = self.eval_expr(key, env)?;
                    let key = Self::table_key(&key_value, span)?;
                    let item = self.eval_expr(value, env)?;
                    table.raw_set(key, item);
                },
            }
        }

        Ok(Value::Table(Rc::new(RefCell::new(table))))
    }

    /// Reads `base[key]`, following the `__index` metatable chain when
    /// the direct entry is absent: a table delegate recurses, a
    /// function delegate is called with `(table, key)`. The chain is
    /// bounded; exceeding the bound reports a metatable cycle.
    pub(crate) fn member_get(&mut self, base: &Value, key: &Value, span: Span) -> EvalResult<Value> {
        let Value::Table(table) = base else {
            return Err(RuntimeError::IndexOnNonIndexable { type_name: base.type_name(),
                                                           span });
        };

        let key = Self::table_key(key, span)?;
        let mut current = Rc::clone(table);

        for _ in 0..MAX_INDEX_CHAIN {
            let (direct, delegate) = {
                let borrowed = current.borrow();
                let direct = borrowed.raw_get(&key);
                let delegate = if direct.is_nil() {
                    borrowed.metatable()
                            .map(|mt| mt.borrow().raw_get(&TableKey::Str("__index".to_string())))
                } else {
                    None
                };
                (direct, delegate)
            };

            if !direct.is_nil() {
                return Ok(direct);
            }
            match delegate {
                None | Some(Value::Nil) => return Ok(Value::Nil),
                Some(Value::Table(next)) => current = next,
                Some(Value::Function(func)) => {
                    let arguments = vec![Value::Table(current), key.to_value()];
                    let mut results =
                        self.call_value(&Value::Function(func), arguments, span)?;
                    return Ok(if results.is_empty() { Value::Nil } else { results.swap_remove(0) });
                },
                Some(other) => {
                    return Err(RuntimeError::IndexOnNonIndexable { type_name: other.type_name(),
                                                                   span });
                },
            }
        }

        Err(RuntimeError::MetatableCycle { span })
    }

    /// Writes `base[key] = value` directly; the write path does not
    /// consult the metatable.
    pub(crate) fn member_set(&mut self,
                             base: &Value,
                             key: &Value,
                             value: Value,
                             span: Span)
                             -> EvalResult<()> {
        let Value::Table(table) = base else {
            return Err(RuntimeError::IndexOnNonIndexable { type_name: base.type_name(),
                                                           span });
        };
        let key = Self::table_key(key, span)?;
        table.borrow_mut().raw_set(key, value);
        Ok(())
    }
}
