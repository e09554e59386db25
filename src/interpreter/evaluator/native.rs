use std::rc::Rc;

use crate::{
    error::RuntimeError,
    interpreter::{
        env::{EnvRef, Environment},
        evaluator::core::{EvalResult, Interpreter},
        scanner::Span,
        value::{Function, NativeFn, TableKey, Value},
    },
};

/// Defines the native functions by generating the installation table.
///
/// Each entry provides a global name and the function implementing it.
macro_rules! native_functions {
    ($($name:literal => $func:expr),* $(,)?) => {
        struct NativeDef {
            name: &'static str,
            func: NativeFn,
        }
        static NATIVE_TABLE: &[NativeDef] = &[
            $(
                NativeDef { name: $name, func: $func },
            )*
        ];
    };
}

native_functions! {
    "print"        => print,
    "type"         => type_of,
    "tostring"     => tostring,
    "tonumber"     => tonumber,
    "assert"       => assert_fn,
    "error"        => error_fn,
    "pcall"        => pcall,
    "pairs"        => pairs,
    "ipairs"       => ipairs,
    "next"         => next_fn,
    "rawget"       => rawget,
    "rawset"       => rawset,
    "setmetatable" => setmetatable,
    "getmetatable" => getmetatable,
}

/// Installs every native function into `globals`.
pub fn install(globals: &EnvRef) {
    for def in NATIVE_TABLE {
        let value = Value::Function(Rc::new(Function::Native { name: def.name,
                                                               func: def.func, }));
        Environment::define(globals, def.name, value);
    }
}

/// `print(...)`: writes the arguments' display forms, tab-separated.
fn print(_: &mut Interpreter, arguments: Vec<Value>, _: Span) -> EvalResult<Vec<Value>> {
    let line = arguments.iter()
                        .map(std::string::ToString::to_string)
                        .collect::<Vec<_>>()
                        .join("\t");
    println!("{line}");
    Ok(Vec::new())
}

/// `type(v)`: the value's type name.
fn type_of(_: &mut Interpreter, arguments: Vec<Value>, _: Span) -> EvalResult<Vec<Value>> {
    let value = arguments.first().cloned().unwrap_or(Value::Nil);
    Ok(vec![Value::string(value.type_name())])
}

/// `tostring(v)`: the value's display form.
fn tostring(_: &mut Interpreter, arguments: Vec<Value>, _: Span) -> EvalResult<Vec<Value>> {
    let value = arguments.first().cloned().unwrap_or(Value::Nil);
    Ok(vec![Value::string(value.to_string())])
}

/// `tonumber(v)`: numbers pass through, strings parse via the literal
/// grammar; anything else yields nil.
fn tonumber(_: &mut Interpreter, arguments: Vec<Value>, _: Span) -> EvalResult<Vec<Value>> {
    let value = arguments.first().cloned().unwrap_or(Value::Nil);
    Ok(vec![value.coerce_to_number().unwrap_or(Value::Nil)])
}

/// `assert(v, message?)`: passes its arguments through when `v` is
/// truthy, raises otherwise.
fn assert_fn(_: &mut Interpreter, arguments: Vec<Value>, span: Span) -> EvalResult<Vec<Value>> {
    let value = arguments.first().cloned().unwrap_or(Value::Nil);
    if value.is_truthy() {
        return Ok(arguments);
    }
    let message = arguments.get(1)
                           .map_or_else(|| "assertion failed!".to_string(), ToString::to_string);
    Err(RuntimeError::Raised { message, span })
}

/// `error(message)`: raises with the message's display form.
fn error_fn(_: &mut Interpreter, arguments: Vec<Value>, span: Span) -> EvalResult<Vec<Value>> {
    let message = arguments.first().cloned().unwrap_or(Value::Nil).to_string();
    Err(RuntimeError::Raised { message, span })
}

/// `pcall(f, ...)`: calls `f` in protected mode, converting a raised
/// error into `(false, message)` and success into `(true, results...)`.
fn pcall(interpreter: &mut Interpreter, arguments: Vec<Value>, span: Span) -> EvalResult<Vec<Value>> {
    let mut arguments = arguments;
    if arguments.is_empty() {
        arguments.push(Value::Nil);
    }
    let callee = arguments.remove(0);

    match interpreter.call_value(&callee, arguments, span) {
        Ok(mut results) => {
            let mut values = vec![Value::Bool(true)];
            values.append(&mut results);
            Ok(values)
        },
        Err(error) => Ok(vec![Value::Bool(false), Value::string(error.to_string())]),
    }
}

/// `pairs(t)`: the iterator triple `(next, t, nil)`.
fn pairs(_: &mut Interpreter, arguments: Vec<Value>, span: Span) -> EvalResult<Vec<Value>> {
    let table = expect_table_argument(&arguments, span)?;
    let next = Value::Function(Rc::new(Function::Native { name: "next",
                                                          func: next_fn, }));
    Ok(vec![next, table, Value::Nil])
}

/// `ipairs(t)`: the iterator triple for the sequential integer part.
fn ipairs(_: &mut Interpreter, arguments: Vec<Value>, span: Span) -> EvalResult<Vec<Value>> {
    let table = expect_table_argument(&arguments, span)?;
    let step = Value::Function(Rc::new(Function::Native { name: "ipairs_iterator",
                                                          func: ipairs_iterator, }));
    Ok(vec![step, table, Value::Integer(0)])
}

/// The stateless step function behind `ipairs`: `(t, i)` to
/// `(i + 1, t[i + 1])`, ending at the first nil element.
fn ipairs_iterator(_: &mut Interpreter, arguments: Vec<Value>, span: Span) -> EvalResult<Vec<Value>> {
    let table = expect_table_argument(&arguments, span)?;
    let index = match arguments.get(1) {
        Some(Value::Integer(n)) => *n,
        _ => 0,
    };
    let next_index = index + 1;

    let Value::Table(table) = &table else { unreachable!() };
    let value = table.borrow().raw_get(&TableKey::Integer(next_index));
    if value.is_nil() {
        return Ok(vec![Value::Nil]);
    }
    Ok(vec![Value::Integer(next_index), value])
}

/// `next(t, k?)`: the entry after `k` in the table's iteration order,
/// or nil past the last one. `pairs` loops are built on this.
fn next_fn(_: &mut Interpreter, arguments: Vec<Value>, span: Span) -> EvalResult<Vec<Value>> {
    let table_value = expect_table_argument(&arguments, span)?;
    let Value::Table(table) = &table_value else { unreachable!() };

    let control = match arguments.get(1) {
        None | Some(Value::Nil) => None,
        Some(key) => Some(Interpreter::table_key(key, span)?),
    };

    let result = match table.borrow().next_entry(control.as_ref()) {
        Some((key, value)) => Ok(vec![key.to_value(), value]),
        None => Ok(vec![Value::Nil]),
    };
    result
}

/// `rawget(t, k)`: a direct read, bypassing the metatable.
fn rawget(_: &mut Interpreter, arguments: Vec<Value>, span: Span) -> EvalResult<Vec<Value>> {
    let table_value = expect_table_argument(&arguments, span)?;
    let Value::Table(table) = &table_value else { unreachable!() };
    let key = Interpreter::table_key(arguments.get(1).unwrap_or(&Value::Nil), span)?;
    let result = table.borrow().raw_get(&key);
    Ok(vec![result])
}

/// `rawset(t, k, v)`: a direct write, returning the table.
fn rawset(_: &mut Interpreter, arguments: Vec<Value>, span: Span) -> EvalResult<Vec<Value>> {
    let table_value = expect_table_argument(&arguments, span)?;
    {
        let Value::Table(table) = &table_value else { unreachable!() };
        let key = Interpreter::table_key(arguments.get(1).unwrap_or(&Value::Nil), span)?;
        let value = arguments.get(2).cloned().unwrap_or(Value::Nil);
        table.borrow_mut().raw_set(key, value);
    }
    Ok(vec![table_value])
}

/// `setmetatable(t, mt|nil)`: attaches or removes the metatable,
/// returning the table.
fn setmetatable(_: &mut Interpreter, arguments: Vec<Value>, span: Span) -> EvalResult<Vec<Value>> {
    let table_value = expect_table_argument(&arguments, span)?;
    let metatable = match arguments.get(1) {
        None | Some(Value::Nil) => None,
        Some(Value::Table(mt)) => Some(Rc::clone(mt)),
        Some(other) => {
            return Err(RuntimeError::TypeMismatch { operation: "setmetatable".to_string(),
                                                    types:     other.type_name().to_string(),
                                                    span });
        },
    };
    {
        let Value::Table(table) = &table_value else { unreachable!() };
        table.borrow_mut().set_metatable(metatable);
    }
    Ok(vec![table_value])
}

/// `getmetatable(t)`: the attached metatable, or nil.
fn getmetatable(_: &mut Interpreter, arguments: Vec<Value>, _: Span) -> EvalResult<Vec<Value>> {
    let result = match arguments.first() {
        Some(Value::Table(table)) => table.borrow().metatable().map_or(Value::Nil, Value::Table),
        _ => Value::Nil,
    };
    Ok(vec![result])
}

/// Checks that the first argument is a table and returns it.
fn expect_table_argument(arguments: &[Value], span: Span) -> EvalResult<Value> {
    match arguments.first() {
        Some(value @ Value::Table(_)) => Ok(value.clone()),
        Some(other) => Err(RuntimeError::TypeMismatch { operation: "table argument".to_string(),
                                                        types:     other.type_name().to_string(),
                                                        span }),
        None => Err(RuntimeError::TypeMismatch { operation: "table argument".to_string(),
                                                 types:     "nil".to_string(),
                                                 span }),
    }
}
