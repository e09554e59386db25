use std::{
    cell::RefCell,
    collections::HashMap,
    hash::{Hash, Hasher},
    rc::Rc,
};

use ordered_float::OrderedFloat;

use crate::{
    interpreter::value::{core::Value, function::Function},
    util::num::float_to_exact_int,
};

/// A normalized table key.
///
/// Nil and NaN never become keys. A float key with an integral value is
/// stored as the integer key, so `t[2]` and `t[2.0]` address the same
/// entry. Tables and functions key by reference identity; the key keeps
/// the reference alive.
#[derive(Clone)]
pub enum TableKey {
    /// An integer key (also the normalized form of integral floats).
    Integer(i64),
    /// A non-integral float key.
    Float(OrderedFloat<f64>),
    /// A boolean key.
    Bool(bool),
    /// A string key.
    Str(String),
    /// A table key, by identity.
    Table(Rc<RefCell<Table>>),
    /// A function key, by identity.
    Function(Rc<Function>),
}

impl PartialEq for TableKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Table(a), Self::Table(b)) => Rc::ptr_eq(a, b),
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for TableKey {}

impl Hash for TableKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Integer(n) => n.hash(state),
            Self::Float(f) => f.hash(state),
            Self::Bool(b) => b.hash(state),
            Self::Str(s) => s.hash(state),
            Self::Table(t) => (Rc::as_ptr(t) as usize).hash(state),
            Self::Function(f) => (Rc::as_ptr(f) as usize).hash(state),
        }
    }
}

/// Debug formatting stays shallow; table keys may reference cyclic
/// structures.
impl std::fmt::Debug for TableKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "Integer({n})"),
            Self::Float(x) => write!(f, "Float({x})"),
            Self::Bool(b) => write!(f, "Bool({b})"),
            Self::Str(s) => write!(f, "Str({s:?})"),
            Self::Table(t) => write!(f, "Table({:p})", Rc::as_ptr(t)),
            Self::Function(func) => write!(f, "Function({:p})", Rc::as_ptr(func)),
        }
    }
}

impl TableKey {
    /// Normalizes a value into a key.
    ///
    /// # Errors
    /// A static description (`"nil"` or `"NaN"`) when the value cannot
    /// key a table; the caller attaches the source span.
    pub fn try_from_value(value: &Value) -> Result<Self, &'static str> {
        match value {
            Value::Nil => Err("nil"),
            Value::Bool(b) => Ok(Self::Bool(*b)),
            Value::Integer(n) => Ok(Self::Integer(*n)),
            Value::Float(f) => {
                if f.is_nan() {
                    return Err("NaN");
                }
                match float_to_exact_int(*f) {
                    Some(n) => Ok(Self::Integer(n)),
                    None => Ok(Self::Float(OrderedFloat(*f))),
                }
            },
            Value::Str(s) => Ok(Self::Str(s.as_ref().clone())),
            Value::Table(t) => Ok(Self::Table(Rc::clone(t))),
            Value::Function(f) => Ok(Self::Function(Rc::clone(f))),
        }
    }

    /// The key as a value again, for iteration results.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Integer(n) => Value::Integer(*n),
            Self::Float(f) => Value::Float(f.into_inner()),
            Self::Bool(b) => Value::Bool(*b),
            Self::Str(s) => Value::string(s.clone()),
            Self::Table(t) => Value::Table(Rc::clone(t)),
            Self::Function(f) => Value::Function(Rc::clone(f)),
        }
    }
}

/// A table: a hash mapping from normalized keys to values, plus an
/// optional metatable.
///
/// Entries never hold nil; writing nil removes the entry.
#[derive(Default)]
pub struct Table {
    entries:   HashMap<TableKey, Value>,
    metatable: Option<Rc<RefCell<Table>>>,
}

impl Table {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The direct entry for `key`, without consulting the metatable.
    #[must_use]
    pub fn raw_get(&self, key: &TableKey) -> Value {
        self.entries.get(key).cloned().unwrap_or(Value::Nil)
    }

    /// Writes a direct entry; nil removes it.
    pub fn raw_set(&mut self, key: TableKey, value: Value) {
        if value.is_nil() {
            self.entries.remove(&key);
        } else {
            self.entries.insert(key, value);
        }
    }

    /// The number of entries, regardless of their keys.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// The border used by the `#` operator: the largest `n` such that
    /// the keys `1..=n` are all present.
    #[must_use]
    pub fn length(&self) -> i64 {
        let mut n = 0;
        while self.entries.contains_key(&TableKey::Integer(n + 1)) {
            n += 1;
        }
        n
    }

    /// The successor of `control` in this table's iteration order;
    /// `None` starts from the beginning. Used by `next`, and therefore
    /// by `pairs`. The order is unspecified but stable while the table
    /// is not modified.
    #[must_use]
    pub fn next_entry(&self, control: Option<&TableKey>) -> Option<(TableKey, Value)> {
        let mut iter = self.entries.iter();
        if let Some(control) = control {
            for (key, _) in iter.by_ref() {
                if key == control {
                    break;
                }
            }
        }
        iter.next().map(|(k, v)| (k.clone(), v.clone()))
    }

    /// The metatable, if one is attached.
    #[must_use]
    pub fn metatable(&self) -> Option<Rc<RefCell<Self>>> {
        self.metatable.as_ref().map(Rc::clone)
    }

    /// Attaches or removes the metatable.
    pub fn set_metatable(&mut self, metatable: Option<Rc<RefCell<Self>>>) {
        self.metatable = metatable;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_float_keys_normalize_to_integers() {
        let mut table = Table::new();
        let key = TableKey::try_from_value(&Value::Float(2.0)).unwrap();
        table.raw_set(key, Value::string("two"));
        let int_key = TableKey::try_from_value(&Value::Integer(2)).unwrap();
        assert_eq!(table.raw_get(&int_key), Value::string("two"));
    }

    #[test]
    fn nil_and_nan_keys_are_rejected() {
        assert_eq!(TableKey::try_from_value(&Value::Nil), Err("nil"));
        assert_eq!(TableKey::try_from_value(&Value::Float(f64::NAN)), Err("NaN"));
    }

    #[test]
    fn writing_nil_removes_the_entry() {
        let mut table = Table::new();
        table.raw_set(TableKey::Integer(1), Value::Integer(10));
        assert_eq!(table.entry_count(), 1);
        table.raw_set(TableKey::Integer(1), Value::Nil);
        assert_eq!(table.entry_count(), 0);
    }

    #[test]
    fn length_counts_the_contiguous_prefix() {
        let mut table = Table::new();
        for i in 1..=3 {
            table.raw_set(TableKey::Integer(i), Value::Integer(i * 10));
        }
        table.raw_set(TableKey::Integer(5), Value::Integer(50));
        assert_eq!(table.length(), 3);
    }

    #[test]
    fn next_entry_visits_each_entry_once() {
        let mut table = Table::new();
        table.raw_set(TableKey::Str("a".to_string()), Value::Integer(1));
        table.raw_set(TableKey::Str("b".to_string()), Value::Integer(2));

        let mut seen = Vec::new();
        let mut control: Option<TableKey> = None;
        while let Some((key, _)) = table.next_entry(control.as_ref()) {
            seen.push(key.clone());
            control = Some(key);
        }
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().any(|k| *k == TableKey::Str("a".to_string())));
        assert!(seen.iter().any(|k| *k == TableKey::Str("b".to_string())));
    }
}
