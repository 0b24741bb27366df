//! `ToPrimitive`, `ToNumber`, `ToString`, `ToBigInt`, `ToBoolean`, `ToObject`,
//! `ToPropertyKey` (spec.md §4.6).

use crate::completion::Completion;
use crate::execution::agent::Agent;
use crate::types::number::{number_to_string, string_to_number};
use crate::types::{JsBigInt, JsObject, JsString, PropertyKey, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hint {
    Default,
    Number,
    String,
}

/// For primitives, identity. For objects: try `[Symbol.toPrimitive]`, then
/// `valueOf`/`toString` in an order depending on `hint` (spec.md §4.6).
pub fn to_primitive(agent: &mut Agent, value: &Value, hint: Hint) -> Completion<Value> {
    let obj = match value {
        Value::Object(o) => o.clone(),
        other => return Ok(other.clone()),
    };

    let to_primitive_key = PropertyKey::Symbol(agent.realm.to_primitive_symbol.clone());
    let exotic = agent.get_property(&obj, &to_primitive_key, agent.strict())?;
    if agent.is_callable(&exotic) {
        let hint_str = match hint {
            Hint::Default => "default",
            Hint::Number => "number",
            Hint::String => "string",
        };
        let result = agent.call(&exotic, Value::Object(obj.clone()), &[Value::from_str(hint_str)])?;
        if !result.is_object() {
            return Ok(result);
        }
        return Err(agent.throw_type("Cannot convert object to primitive value"));
    }

    let method_order: [&str; 2] = match hint {
        Hint::String => ["toString", "valueOf"],
        Hint::Number | Hint::Default => ["valueOf", "toString"],
    };
    for name in method_order {
        let method = agent.get_property(&obj, &PropertyKey::from_str(name), agent.strict())?;
        if agent.is_callable(&method) {
            let result = agent.call(&method, Value::Object(obj.clone()), &[])?;
            if !result.is_object() {
                return Ok(result);
            }
        }
    }
    Err(agent.throw_type("Cannot convert object to primitive value"))
}

pub fn to_boolean(value: &Value) -> bool {
    match value {
        Value::Undefined | Value::Null => false,
        Value::Boolean(b) => *b,
        Value::Number(n) => *n != 0.0 && !n.is_nan(),
        Value::BigInt(b) => !b.is_zero(),
        Value::String(s) => !s.is_empty(),
        Value::Symbol(_) => true,
        Value::Object(_) => true,
    }
}

pub fn to_number(agent: &mut Agent, value: &Value) -> Completion<f64> {
    match value {
        Value::Undefined => Ok(f64::NAN),
        Value::Null => Ok(0.0),
        Value::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => Ok(*n),
        Value::BigInt(_) => Err(agent.throw_type("Cannot convert a BigInt value to a number")),
        Value::String(s) => Ok(string_to_number(&s.to_string_lossy())),
        Value::Symbol(_) => Err(agent.throw_type("Cannot convert a Symbol value to a number")),
        Value::Object(_) => {
            let prim = to_primitive(agent, value, Hint::Number)?;
            to_number(agent, &prim)
        }
    }
}

/// `ToNumeric`: like `ToNumber`, but passes a `bigint` input through and
/// never rejects it (used by the arithmetic/bitwise operators, spec.md
/// §4.5 "Binary").
#[derive(Debug, Clone)]
pub enum Numeric {
    Number(f64),
    BigInt(JsBigInt),
}

pub fn to_numeric(agent: &mut Agent, value: &Value) -> Completion<Numeric> {
    let prim = to_primitive(agent, value, Hint::Number)?;
    match prim {
        Value::BigInt(b) => Ok(Numeric::BigInt(b)),
        other => Ok(Numeric::Number(to_number(agent, &other)?)),
    }
}

pub fn to_string(agent: &mut Agent, value: &Value) -> Completion<JsString> {
    match value {
        Value::Undefined => Ok(JsString::from_str("undefined")),
        Value::Null => Ok(JsString::from_str("null")),
        Value::Boolean(b) => Ok(JsString::from_str(if *b { "true" } else { "false" })),
        Value::Number(n) => Ok(JsString::from_str(&number_to_string(*n))),
        Value::BigInt(b) => Ok(JsString::from_str(&b.to_string())),
        Value::String(s) => Ok(s.clone()),
        Value::Symbol(_) => Err(agent.throw_type("Cannot convert a Symbol value to a string")),
        Value::Object(_) => {
            let prim = to_primitive(agent, value, Hint::String)?;
            to_string(agent, &prim)
        }
    }
}

/// A diagnostic-only, non-reentrant string rendering: never invokes guest
/// code. Used after a guest exception has already propagated (script-runner
/// outcome messages, `error_constructor_name`), where calling back into the
/// guest program would be unsound.
pub fn to_string_lossy(value: &Value) -> String {
    match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Number(n) => number_to_string(*n),
        Value::BigInt(b) => b.to_string(),
        Value::String(s) => s.to_string_lossy(),
        Value::Symbol(s) => format!(
            "Symbol({})",
            s.0.description
                .as_ref()
                .map(|d| d.to_string_lossy())
                .unwrap_or_default()
        ),
        Value::Object(o) => {
            let name = o
                .get_own(&PropertyKey::from_str("name"))
                .and_then(|d| d.data_value().cloned())
                .map(|v| to_string_lossy(&v));
            let message = o
                .get_own(&PropertyKey::from_str("message"))
                .and_then(|d| d.data_value().cloned())
                .map(|v| to_string_lossy(&v));
            match (name, message) {
                (Some(n), Some(m)) if !m.is_empty() => format!("{n}: {m}"),
                (Some(n), _) => n,
                _ => "[object Object]".to_string(),
            }
        }
    }
}

pub fn to_bigint(agent: &mut Agent, value: &Value) -> Completion<JsBigInt> {
    match value {
        Value::BigInt(b) => Ok(b.clone()),
        Value::Boolean(b) => Ok(JsBigInt::from_i64(if *b { 1 } else { 0 })),
        Value::String(s) => JsBigInt::parse_str(&s.to_string_lossy())
            .ok_or_else(|| agent.throw_error(crate::execution::realm::ErrorKind::Syntax, "Cannot convert string to a BigInt")),
        Value::Number(_) => Err(agent.throw_type("Cannot convert a Number value to a BigInt")),
        Value::Null | Value::Undefined | Value::Symbol(_) => {
            Err(agent.throw_type("Cannot convert value to a BigInt"))
        }
        Value::Object(_) => {
            let prim = to_primitive(agent, value, Hint::Number)?;
            to_bigint(agent, &prim)
        }
    }
}

pub fn to_object(agent: &mut Agent, value: &Value) -> Completion<JsObject> {
    agent.to_object(value)
}

pub fn to_property_key(agent: &mut Agent, value: &Value) -> Completion<PropertyKey> {
    match value {
        Value::Symbol(s) => Ok(PropertyKey::Symbol(s.clone())),
        other => Ok(PropertyKey::String(to_string(agent, other)?)),
    }
}

/// `ToIntegerOrInfinity`: truncates towards zero, `NaN` becomes `0`,
/// infinities pass through. Used by the array/string built-ins (spec.md
/// §10.7) for index- and count-shaped arguments.
pub fn to_integer_or_infinity(agent: &mut Agent, value: &Value) -> Completion<f64> {
    let n = to_number(agent, value)?;
    if n.is_nan() {
        Ok(0.0)
    } else {
        Ok(n.trunc())
    }
}

/// Clamps a `ToIntegerOrInfinity` result into `0..=len` the way array/string
/// slicing arguments are normalized (negative counts from the end).
pub fn clamp_relative_index(n: f64, len: usize) -> usize {
    if n.is_infinite() {
        return if n > 0.0 { len } else { 0 };
    }
    let len = len as f64;
    let idx = if n < 0.0 { (len + n).max(0.0) } else { n.min(len) };
    idx as usize
}
