//! `Array`, `Array.isArray`, and the `Array.prototype` methods listed in
//! SPEC_FULL.md §10.7, grounded on the teacher's
//! `builtins/indexed_collections/array_objects`.

use super::helpers::{arg, define_constructor, define_method};
use crate::abstract_ops::{clamp_relative_index, to_integer_or_infinity};
use crate::completion::Completion;
use crate::execution::agent::Agent;
use crate::types::{CallFlags, JsObject, ObjectKind, Value};

/// Builds a fresh array object from already-computed elements; shared by
/// every built-in that returns an array (`Object.keys`, `Array.prototype.map`, ...).
pub fn new_array(agent: &Agent, elements: Vec<Value>) -> JsObject {
    JsObject::new(Some(agent.realm.array_prototype.clone()), ObjectKind::Array { elements })
}

pub fn install(agent: &Agent, global: &JsObject) {
    let array_proto = agent.realm.array_prototype.clone();
    let function_proto = agent.realm.function_prototype.clone();

    define_method(&array_proto, function_proto.clone(), "push", 1, push);
    define_method(&array_proto, function_proto.clone(), "pop", 0, pop);
    define_method(&array_proto, function_proto.clone(), "shift", 0, shift);
    define_method(&array_proto, function_proto.clone(), "unshift", 1, unshift);
    define_method(&array_proto, function_proto.clone(), "slice", 2, slice);
    define_method(&array_proto, function_proto.clone(), "splice", 2, splice);
    define_method(&array_proto, function_proto.clone(), "indexOf", 1, index_of);
    define_method(&array_proto, function_proto.clone(), "lastIndexOf", 1, last_index_of);
    define_method(&array_proto, function_proto.clone(), "includes", 1, includes);
    define_method(&array_proto, function_proto.clone(), "join", 1, join);
    define_method(&array_proto, function_proto.clone(), "toString", 0, join);
    define_method(&array_proto, function_proto.clone(), "forEach", 1, for_each);
    define_method(&array_proto, function_proto.clone(), "map", 1, map);
    define_method(&array_proto, function_proto.clone(), "filter", 1, filter);
    define_method(&array_proto, function_proto.clone(), "reduce", 1, reduce);
    define_method(&array_proto, function_proto.clone(), "find", 1, find);
    define_method(&array_proto, function_proto.clone(), "findIndex", 1, find_index);
    define_method(&array_proto, function_proto.clone(), "some", 1, some);
    define_method(&array_proto, function_proto.clone(), "every", 1, every);
    define_method(&array_proto, function_proto.clone(), "concat", 1, concat);
    define_method(&array_proto, function_proto.clone(), "reverse", 0, reverse);
    define_method(&array_proto, function_proto.clone(), "sort", 1, sort);
    define_method(&array_proto, function_proto.clone(), "flat", 0, flat);

    let ctor = define_constructor(global, function_proto.clone(), "Array", 1, &array_proto, construct_array);
    define_method(&ctor, function_proto, "isArray", 1, is_array);
}

fn array_of(agent: &mut Agent, this: &Value) -> Completion<JsObject> {
    match this {
        Value::Object(o) if o.is_array() => Ok(o.clone()),
        _ => Err(agent.throw_type("Array.prototype method called on non-array")),
    }
}

fn construct_array(agent: &mut Agent, _this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    if args.len() == 1 {
        if let Value::Number(n) = args[0] {
            if n < 0.0 || n.fract() != 0.0 || n > u32::MAX as f64 {
                return Err(agent.throw_range("Invalid array length"));
            }
            return Ok(Value::Object(new_array(agent, vec![Value::Undefined; n as usize])));
        }
    }
    Ok(Value::Object(new_array(agent, args.to_vec())))
}

fn is_array(_agent: &mut Agent, _this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    Ok(Value::Boolean(matches!(arg(args, 0), Value::Object(o) if o.is_array())))
}

fn push(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let o = array_of(agent, &this)?;
    for v in args {
        o.array_push(v.clone());
    }
    Ok(Value::Number(o.array_len().unwrap_or(0) as f64))
}

fn pop(agent: &mut Agent, this: Value, _args: &[Value], _f: CallFlags) -> Completion<Value> {
    let o = array_of(agent, &this)?;
    let mut elements = o.array_elements().unwrap_or_default();
    let v = elements.pop().unwrap_or(Value::Undefined);
    o.set_array_elements(elements);
    Ok(v)
}

fn shift(agent: &mut Agent, this: Value, _args: &[Value], _f: CallFlags) -> Completion<Value> {
    let o = array_of(agent, &this)?;
    let mut elements = o.array_elements().unwrap_or_default();
    if elements.is_empty() {
        return Ok(Value::Undefined);
    }
    let v = elements.remove(0);
    o.set_array_elements(elements);
    Ok(v)
}

fn unshift(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let o = array_of(agent, &this)?;
    let mut elements = o.array_elements().unwrap_or_default();
    for (i, v) in args.iter().enumerate() {
        elements.insert(i, v.clone());
    }
    let len = elements.len();
    o.set_array_elements(elements);
    Ok(Value::Number(len as f64))
}

fn slice(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let o = array_of(agent, &this)?;
    let elements = o.array_elements().unwrap_or_default();
    let len = elements.len();
    let start = clamp_relative_index(to_integer_or_infinity(agent, &arg(args, 0))?, len);
    let end = match arg(args, 1) {
        Value::Undefined => len,
        v => clamp_relative_index(to_integer_or_infinity(agent, &v)?, len),
    };
    let result = if start < end { elements[start..end].to_vec() } else { Vec::new() };
    Ok(Value::Object(new_array(agent, result)))
}

fn splice(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let o = array_of(agent, &this)?;
    let mut elements = o.array_elements().unwrap_or_default();
    let len = elements.len();
    let start = clamp_relative_index(to_integer_or_infinity(agent, &arg(args, 0))?, len);
    let delete_count = if args.len() < 2 {
        len - start
    } else {
        let n = to_integer_or_infinity(agent, &arg(args, 1))?;
        (n.max(0.0) as usize).min(len - start)
    };
    let removed: Vec<Value> = elements.splice(start..start + delete_count, args.iter().skip(2).cloned()).collect();
    o.set_array_elements(elements);
    Ok(Value::Object(new_array(agent, removed)))
}

fn index_of(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let o = array_of(agent, &this)?;
    let elements = o.array_elements().unwrap_or_default();
    let target = arg(args, 0);
    let pos = elements.iter().position(|v| crate::abstract_ops::equality::strict_equal(v, &target));
    Ok(Value::Number(pos.map(|i| i as f64).unwrap_or(-1.0)))
}

fn last_index_of(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let o = array_of(agent, &this)?;
    let elements = o.array_elements().unwrap_or_default();
    let target = arg(args, 0);
    let pos = elements.iter().rposition(|v| crate::abstract_ops::equality::strict_equal(v, &target));
    Ok(Value::Number(pos.map(|i| i as f64).unwrap_or(-1.0)))
}

fn includes(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let o = array_of(agent, &this)?;
    let elements = o.array_elements().unwrap_or_default();
    let target = arg(args, 0);
    Ok(Value::Boolean(elements.iter().any(|v| v.same_value_zero(&target))))
}

fn join(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let o = array_of(agent, &this)?;
    let elements = o.array_elements().unwrap_or_default();
    let sep = match arg(args, 0) {
        Value::Undefined => ",".to_string(),
        v => crate::abstract_ops::to_string(agent, &v)?.to_string_lossy(),
    };
    let mut parts = Vec::with_capacity(elements.len());
    for v in &elements {
        if v.is_nullish() {
            parts.push(String::new());
        } else {
            parts.push(crate::abstract_ops::to_string(agent, v)?.to_string_lossy());
        }
    }
    Ok(Value::from_str(&parts.join(&sep)))
}

fn for_each(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let o = array_of(agent, &this)?;
    let callback = arg(args, 0);
    if !agent.is_callable(&callback) {
        return Err(agent.throw_type("callback is not a function"));
    }
    let this_arg = arg(args, 1);
    let elements = o.array_elements().unwrap_or_default();
    for (i, v) in elements.iter().enumerate() {
        agent.call(&callback, this_arg.clone(), &[v.clone(), Value::Number(i as f64), Value::Object(o.clone())])?;
    }
    Ok(Value::Undefined)
}

fn map(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let o = array_of(agent, &this)?;
    let callback = arg(args, 0);
    if !agent.is_callable(&callback) {
        return Err(agent.throw_type("callback is not a function"));
    }
    let this_arg = arg(args, 1);
    let elements = o.array_elements().unwrap_or_default();
    let mut out = Vec::with_capacity(elements.len());
    for (i, v) in elements.iter().enumerate() {
        out.push(agent.call(&callback, this_arg.clone(), &[v.clone(), Value::Number(i as f64), Value::Object(o.clone())])?);
    }
    Ok(Value::Object(new_array(agent, out)))
}

fn filter(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let o = array_of(agent, &this)?;
    let callback = arg(args, 0);
    if !agent.is_callable(&callback) {
        return Err(agent.throw_type("callback is not a function"));
    }
    let this_arg = arg(args, 1);
    let elements = o.array_elements().unwrap_or_default();
    let mut out = Vec::new();
    for (i, v) in elements.iter().enumerate() {
        let keep = agent.call(&callback, this_arg.clone(), &[v.clone(), Value::Number(i as f64), Value::Object(o.clone())])?;
        if crate::abstract_ops::to_boolean(&keep) {
            out.push(v.clone());
        }
    }
    Ok(Value::Object(new_array(agent, out)))
}

fn reduce(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let o = array_of(agent, &this)?;
    let callback = arg(args, 0);
    if !agent.is_callable(&callback) {
        return Err(agent.throw_type("callback is not a function"));
    }
    let elements = o.array_elements().unwrap_or_default();
    let mut iter = elements.iter().enumerate();
    let mut acc = if args.len() >= 2 {
        arg(args, 1)
    } else {
        match iter.next() {
            Some((_, v)) => v.clone(),
            None => return Err(agent.throw_type("Reduce of empty array with no initial value")),
        }
    };
    for (i, v) in iter {
        acc = agent.call(&callback, Value::Undefined, &[acc, v.clone(), Value::Number(i as f64), Value::Object(o.clone())])?;
    }
    Ok(acc)
}

fn find(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let o = array_of(agent, &this)?;
    let callback = arg(args, 0);
    if !agent.is_callable(&callback) {
        return Err(agent.throw_type("callback is not a function"));
    }
    let this_arg = arg(args, 1);
    let elements = o.array_elements().unwrap_or_default();
    for (i, v) in elements.iter().enumerate() {
        let matched = agent.call(&callback, this_arg.clone(), &[v.clone(), Value::Number(i as f64), Value::Object(o.clone())])?;
        if crate::abstract_ops::to_boolean(&matched) {
            return Ok(v.clone());
        }
    }
    Ok(Value::Undefined)
}

fn find_index(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let o = array_of(agent, &this)?;
    let callback = arg(args, 0);
    if !agent.is_callable(&callback) {
        return Err(agent.throw_type("callback is not a function"));
    }
    let this_arg = arg(args, 1);
    let elements = o.array_elements().unwrap_or_default();
    for (i, v) in elements.iter().enumerate() {
        let matched = agent.call(&callback, this_arg.clone(), &[v.clone(), Value::Number(i as f64), Value::Object(o.clone())])?;
        if crate::abstract_ops::to_boolean(&matched) {
            return Ok(Value::Number(i as f64));
        }
    }
    Ok(Value::Number(-1.0))
}

fn some(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let o = array_of(agent, &this)?;
    let callback = arg(args, 0);
    if !agent.is_callable(&callback) {
        return Err(agent.throw_type("callback is not a function"));
    }
    let this_arg = arg(args, 1);
    let elements = o.array_elements().unwrap_or_default();
    for (i, v) in elements.iter().enumerate() {
        let matched = agent.call(&callback, this_arg.clone(), &[v.clone(), Value::Number(i as f64), Value::Object(o.clone())])?;
        if crate::abstract_ops::to_boolean(&matched) {
            return Ok(Value::Boolean(true));
        }
    }
    Ok(Value::Boolean(false))
}

fn every(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let o = array_of(agent, &this)?;
    let callback = arg(args, 0);
    if !agent.is_callable(&callback) {
        return Err(agent.throw_type("callback is not a function"));
    }
    let this_arg = arg(args, 1);
    let elements = o.array_elements().unwrap_or_default();
    for (i, v) in elements.iter().enumerate() {
        let matched = agent.call(&callback, this_arg.clone(), &[v.clone(), Value::Number(i as f64), Value::Object(o.clone())])?;
        if !crate::abstract_ops::to_boolean(&matched) {
            return Ok(Value::Boolean(false));
        }
    }
    Ok(Value::Boolean(true))
}

fn concat(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let o = array_of(agent, &this)?;
    let mut out = o.array_elements().unwrap_or_default();
    for v in args {
        match v {
            Value::Object(other) if other.is_array() => out.extend(other.array_elements().unwrap_or_default()),
            other => out.push(other.clone()),
        }
    }
    Ok(Value::Object(new_array(agent, out)))
}

fn reverse(agent: &mut Agent, this: Value, _args: &[Value], _f: CallFlags) -> Completion<Value> {
    let o = array_of(agent, &this)?;
    let mut elements = o.array_elements().unwrap_or_default();
    elements.reverse();
    o.set_array_elements(elements);
    Ok(this)
}

fn sort(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let o = array_of(agent, &this)?;
    let comparator = arg(args, 0);
    let has_comparator = agent.is_callable(&comparator);
    let mut elements = o.array_elements().unwrap_or_default();
    let (mut undefineds, mut rest): (Vec<Value>, Vec<Value>) =
        elements.drain(..).partition(|v| v.is_undefined());

    let mut sort_err = None;
    if has_comparator {
        // Rust's sort_by needs a total order; guest comparators can throw,
        // so bail out to `sort_err` and re-raise once sorting unwinds.
        rest.sort_by(|a, b| {
            if sort_err.is_some() {
                return std::cmp::Ordering::Equal;
            }
            match agent.call(&comparator, Value::Undefined, &[a.clone(), b.clone()]) {
                Ok(v) => {
                    let n = crate::abstract_ops::to_number(agent, &v).unwrap_or(0.0);
                    if n < 0.0 {
                        std::cmp::Ordering::Less
                    } else if n > 0.0 {
                        std::cmp::Ordering::Greater
                    } else {
                        std::cmp::Ordering::Equal
                    }
                }
                Err(e) => {
                    sort_err = Some(e);
                    std::cmp::Ordering::Equal
                }
            }
        });
    } else {
        let mut pairs: Vec<(String, Value)> = rest
            .into_iter()
            .map(|v| (crate::abstract_ops::conversions::to_string_lossy(&v), v))
            .collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        rest = pairs.into_iter().map(|(_, v)| v).collect();
    }
    if let Some(e) = sort_err {
        return Err(e);
    }

    rest.append(&mut undefineds);
    o.set_array_elements(rest);
    Ok(this)
}

fn flat(agent: &mut Agent, this: Value, _args: &[Value], _f: CallFlags) -> Completion<Value> {
    let o = array_of(agent, &this)?;
    let elements = o.array_elements().unwrap_or_default();
    let mut out = Vec::new();
    for v in elements {
        match &v {
            Value::Object(inner) if inner.is_array() => out.extend(inner.array_elements().unwrap_or_default()),
            _ => out.push(v),
        }
    }
    Ok(Value::Object(new_array(agent, out)))
}

