use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::interpreter::value::Value;

/// A shared handle to an environment.
pub type EnvRef = Rc<RefCell<Environment>>;

/// A lexical environment: a name-to-value map plus an optional parent
/// link.
///
/// A fresh environment is created per program, per call and per block
/// body; closures hold a shared handle to the environment they were
/// defined in and use it as the parent of each invocation's fresh
/// environment. Lookups walk the parent chain; assignment updates the
/// nearest enclosing binding or falls through to the chain root (the
/// globals).
pub struct Environment {
    values: HashMap<String, Value>,
    parent: Option<EnvRef>,
}

impl Environment {
    /// Creates a root environment with no parent.
    #[must_use]
    pub fn root() -> EnvRef {
        Rc::new(RefCell::new(Self { values: HashMap::new(),
                                    parent: None, }))
    }

    /// Creates an environment whose lookups continue in `parent`.
    #[must_use]
    pub fn with_parent(parent: &EnvRef) -> EnvRef {
        Rc::new(RefCell::new(Self { values: HashMap::new(),
                                    parent: Some(Rc::clone(parent)), }))
    }

    /// Binds `name` in this environment, shadowing any outer binding.
    pub fn define(env: &EnvRef, name: &str, value: Value) {
        env.borrow_mut().values.insert(name.to_string(), value);
    }

    /// Resolves `name` by walking the chain outward. `None` when no
    /// environment in the chain binds it.
    #[must_use]
    pub fn lookup(env: &EnvRef, name: &str) -> Option<Value> {
        let mut current = Rc::clone(env);
        loop {
            let next = {
                let borrowed = current.borrow();
                if let Some(value) = borrowed.values.get(name) {
                    return Some(value.clone());
                }
                borrowed.parent.clone()
            };
            match next {
                Some(parent) => current = parent,
                None => return None,
            }
        }
    }

    /// Updates the nearest enclosing binding of `name` in place.
    /// Returns `false` when no environment in the chain binds it.
    pub fn assign(env: &EnvRef, name: &str, value: Value) -> bool {
        let mut current = Rc::clone(env);
        loop {
            let next = {
                let mut borrowed = current.borrow_mut();
                if let Some(slot) = borrowed.values.get_mut(name) {
                    *slot = value;
                    return true;
                }
                borrowed.parent.clone()
            };
            match next {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Binds `name` at the chain root, which is where assignments to
    /// never-declared names land.
    pub fn define_at_root(env: &EnvRef, name: &str, value: Value) {
        let mut current = Rc::clone(env);
        loop {
            let next = current.borrow().parent.clone();
            match next {
                Some(parent) => current = parent,
                None => {
                    current.borrow_mut().values.insert(name.to_string(), value);
                    return;
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_the_chain() {
        let root = Environment::root();
        Environment::define(&root, "x", Value::Integer(1));
        let inner = Environment::with_parent(&root);
        assert_eq!(Environment::lookup(&inner, "x"), Some(Value::Integer(1)));
        assert_eq!(Environment::lookup(&inner, "y"), None);
    }

    #[test]
    fn define_shadows_without_touching_outer() {
        let root = Environment::root();
        Environment::define(&root, "x", Value::Integer(1));
        let inner = Environment::with_parent(&root);
        Environment::define(&inner, "x", Value::Integer(2));
        assert_eq!(Environment::lookup(&inner, "x"), Some(Value::Integer(2)));
        assert_eq!(Environment::lookup(&root, "x"), Some(Value::Integer(1)));
    }

    #[test]
    fn assign_updates_nearest_binding() {
        let root = Environment::root();
        Environment::define(&root, "x", Value::Integer(1));
        let inner = Environment::with_parent(&root);
        assert!(Environment::assign(&inner, "x", Value::Integer(5)));
        assert_eq!(Environment::lookup(&root, "x"), Some(Value::Integer(5)));
    }

    #[test]
    fn unresolved_assignment_reports_false() {
        let root = Environment::root();
        let inner = Environment::with_parent(&root);
        assert!(!Environment::assign(&inner, "nope", Value::Integer(1)));
        Environment::define_at_root(&inner, "nope", Value::Integer(1));
        assert_eq!(Environment::lookup(&root, "nope"), Some(Value::Integer(1)));
    }
}
