//! `String` and `String.prototype` (spec.md §10.7), grounded on the
//! teacher's `builtins/text_processing/string_objects`. Indices are UTF-16
//! code units throughout, matching [`crate::types::JsString`].

use super::array::new_array;
use super::helpers::{arg, define_constructor, define_method};
use crate::abstract_ops::{clamp_relative_index, to_integer_or_infinity};
use crate::completion::Completion;
use crate::execution::agent::Agent;
use crate::types::{CallFlags, JsObject, JsString, ObjectKind, Value};

pub fn install(agent: &Agent, global: &JsObject) {
    let string_proto = agent.realm.string_prototype.clone();
    let function_proto = agent.realm.function_prototype.clone();

    define_method(&string_proto, function_proto.clone(), "charAt", 1, char_at);
    define_method(&string_proto, function_proto.clone(), "charCodeAt", 1, char_code_at);
    define_method(&string_proto, function_proto.clone(), "at", 1, at);
    define_method(&string_proto, function_proto.clone(), "indexOf", 1, index_of);
    define_method(&string_proto, function_proto.clone(), "lastIndexOf", 1, last_index_of);
    define_method(&string_proto, function_proto.clone(), "includes", 1, includes);
    define_method(&string_proto, function_proto.clone(), "startsWith", 1, starts_with);
    define_method(&string_proto, function_proto.clone(), "endsWith", 1, ends_with);
    define_method(&string_proto, function_proto.clone(), "slice", 2, slice);
    define_method(&string_proto, function_proto.clone(), "substring", 2, substring);
    define_method(&string_proto, function_proto.clone(), "split", 2, split);
    define_method(&string_proto, function_proto.clone(), "toUpperCase", 0, to_upper_case);
    define_method(&string_proto, function_proto.clone(), "toLowerCase", 0, to_lower_case);
    define_method(&string_proto, function_proto.clone(), "trim", 0, trim);
    define_method(&string_proto, function_proto.clone(), "trimStart", 0, trim_start);
    define_method(&string_proto, function_proto.clone(), "trimEnd", 0, trim_end);
    define_method(&string_proto, function_proto.clone(), "repeat", 1, repeat);
    define_method(&string_proto, function_proto.clone(), "padStart", 2, pad_start);
    define_method(&string_proto, function_proto.clone(), "padEnd", 2, pad_end);
    define_method(&string_proto, function_proto.clone(), "replace", 2, replace);
    define_method(&string_proto, function_proto.clone(), "replaceAll", 2, replace_all);
    define_method(&string_proto, function_proto.clone(), "concat", 1, concat);
    define_method(&string_proto, function_proto.clone(), "toString", 0, to_string_method);
    define_method(&string_proto, function_proto.clone(), "valueOf", 0, to_string_method);

    let ctor = define_constructor(global, function_proto.clone(), "String", 1, &string_proto, construct_string);
    define_method(&ctor, function_proto, "fromCharCode", 1, from_char_code);
}

fn this_string(agent: &mut Agent, this: &Value) -> Completion<JsString> {
    match this {
        Value::String(s) => Ok(s.clone()),
        Value::Object(o) => match o.primitive_value() {
            Some(Value::String(s)) => Ok(s),
            _ => Err(agent.throw_type("String.prototype method called on incompatible receiver")),
        },
        _ => crate::abstract_ops::to_string(agent, this),
    }
}

fn construct_string(agent: &mut Agent, _this: Value, args: &[Value], flags: CallFlags) -> Completion<Value> {
    let s = if args.is_empty() {
        JsString::from_str("")
    } else {
        crate::abstract_ops::to_string(agent, &arg(args, 0))?
    };
    if flags.is_new {
        let obj = JsObject::new(Some(agent.realm.string_prototype.clone()), ObjectKind::PrimitiveWrapper(Value::String(s)));
        Ok(Value::Object(obj))
    } else {
        Ok(Value::String(s))
    }
}

fn from_char_code(agent: &mut Agent, _this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let mut units = Vec::with_capacity(args.len());
    for a in args {
        let n = crate::abstract_ops::to_number(agent, a)?;
        units.push(n as u16);
    }
    Ok(Value::String(JsString::from_units(units)))
}

fn char_at(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let s = this_string(agent, &this)?;
    let idx = to_integer_or_infinity(agent, &arg(args, 0))?;
    if idx < 0.0 || idx >= s.len() as f64 {
        return Ok(Value::from_str(""));
    }
    Ok(Value::String(s.slice(idx as usize, idx as usize + 1)))
}

fn char_code_at(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let s = this_string(agent, &this)?;
    let idx = to_integer_or_infinity(agent, &arg(args, 0))?;
    if idx < 0.0 {
        return Ok(Value::Number(f64::NAN));
    }
    match s.char_code_at(idx as usize) {
        Some(c) => Ok(Value::Number(c as f64)),
        None => Ok(Value::Number(f64::NAN)),
    }
}

fn at(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let s = this_string(agent, &this)?;
    let len = s.len() as f64;
    let mut idx = to_integer_or_infinity(agent, &arg(args, 0))?;
    if idx < 0.0 {
        idx += len;
    }
    if idx < 0.0 || idx >= len {
        return Ok(Value::Undefined);
    }
    Ok(Value::String(s.slice(idx as usize, idx as usize + 1)))
}

fn index_of(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let s = this_string(agent, &this)?.to_string_lossy();
    let needle = crate::abstract_ops::to_string(agent, &arg(args, 0))?.to_string_lossy();
    let pos = utf16_find(&s, &needle, 0);
    Ok(Value::Number(pos.map(|p| p as f64).unwrap_or(-1.0)))
}

fn last_index_of(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let s = this_string(agent, &this)?.to_string_lossy();
    let needle = crate::abstract_ops::to_string(agent, &arg(args, 0))?.to_string_lossy();
    let s_units: Vec<u16> = s.encode_utf16().collect();
    let n_units: Vec<u16> = needle.encode_utf16().collect();
    if n_units.is_empty() {
        return Ok(Value::Number(s_units.len() as f64));
    }
    let mut best = None;
    for start in 0..s_units.len() {
        if s_units[start..].starts_with(n_units.as_slice()) {
            best = Some(start);
        }
    }
    Ok(Value::Number(best.map(|p| p as f64).unwrap_or(-1.0)))
}

fn utf16_find(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let h: Vec<u16> = haystack.encode_utf16().collect();
    let n: Vec<u16> = needle.encode_utf16().collect();
    if n.is_empty() {
        return Some(from.min(h.len()));
    }
    if from >= h.len() {
        return None;
    }
    h[from..].windows(n.len()).position(|w| w == n.as_slice()).map(|p| p + from)
}

fn includes(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let s = this_string(agent, &this)?.to_string_lossy();
    let needle = crate::abstract_ops::to_string(agent, &arg(args, 0))?.to_string_lossy();
    Ok(Value::Boolean(utf16_find(&s, &needle, 0).is_some()))
}

fn starts_with(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let s: Vec<u16> = this_string(agent, &this)?.to_string_lossy().encode_utf16().collect();
    let needle: Vec<u16> = crate::abstract_ops::to_string(agent, &arg(args, 0))?.to_string_lossy().encode_utf16().collect();
    Ok(Value::Boolean(s.starts_with(needle.as_slice())))
}

fn ends_with(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let s: Vec<u16> = this_string(agent, &this)?.to_string_lossy().encode_utf16().collect();
    let needle: Vec<u16> = crate::abstract_ops::to_string(agent, &arg(args, 0))?.to_string_lossy().encode_utf16().collect();
    Ok(Value::Boolean(s.ends_with(needle.as_slice())))
}

fn slice(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let s = this_string(agent, &this)?;
    let len = s.len();
    let start = clamp_relative_index(to_integer_or_infinity(agent, &arg(args, 0))?, len);
    let end = match arg(args, 1) {
        Value::Undefined => len,
        v => clamp_relative_index(to_integer_or_infinity(agent, &v)?, len),
    };
    if start >= end {
        return Ok(Value::from_str(""));
    }
    Ok(Value::String(s.slice(start, end)))
}

fn substring(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let s = this_string(agent, &this)?;
    let len = s.len() as f64;
    let clamp = |n: f64| n.max(0.0).min(len) as usize;
    let a = clamp(to_integer_or_infinity(agent, &arg(args, 0))?);
    let b = match arg(args, 1) {
        Value::Undefined => len as usize,
        v => clamp(to_integer_or_infinity(agent, &v)?),
    };
    let (start, end) = if a <= b { (a, b) } else { (b, a) };
    Ok(Value::String(s.slice(start, end)))
}

fn split(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let s = this_string(agent, &this)?.to_string_lossy();
    let sep = arg(args, 0);
    if sep.is_undefined() {
        return Ok(Value::Object(new_array(agent, vec![Value::from_str(&s)])));
    }
    let sep = crate::abstract_ops::to_string(agent, &sep)?.to_string_lossy();
    let parts: Vec<Value> = if sep.is_empty() {
        s.chars().map(|c| Value::from_str(&c.to_string())).collect()
    } else {
        s.split(sep.as_str()).map(Value::from_str).collect()
    };
    Ok(Value::Object(new_array(agent, parts)))
}

fn to_upper_case(agent: &mut Agent, this: Value, _args: &[Value], _f: CallFlags) -> Completion<Value> {
    Ok(Value::from_str(&this_string(agent, &this)?.to_string_lossy().to_uppercase()))
}

fn to_lower_case(agent: &mut Agent, this: Value, _args: &[Value], _f: CallFlags) -> Completion<Value> {
    Ok(Value::from_str(&this_string(agent, &this)?.to_string_lossy().to_lowercase()))
}

fn trim(agent: &mut Agent, this: Value, _args: &[Value], _f: CallFlags) -> Completion<Value> {
    Ok(Value::from_str(this_string(agent, &this)?.to_string_lossy().trim()))
}

fn trim_start(agent: &mut Agent, this: Value, _args: &[Value], _f: CallFlags) -> Completion<Value> {
    Ok(Value::from_str(this_string(agent, &this)?.to_string_lossy().trim_start()))
}

fn trim_end(agent: &mut Agent, this: Value, _args: &[Value], _f: CallFlags) -> Completion<Value> {
    Ok(Value::from_str(this_string(agent, &this)?.to_string_lossy().trim_end()))
}

fn repeat(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let s = this_string(agent, &this)?.to_string_lossy();
    let n = to_integer_or_infinity(agent, &arg(args, 0))?;
    if n < 0.0 || n.is_infinite() {
        return Err(agent.throw_range("Invalid count value"));
    }
    Ok(Value::from_str(&s.repeat(n as usize)))
}

fn pad_start(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    pad(agent, this, args, true)
}

fn pad_end(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    pad(agent, this, args, false)
}

fn pad(agent: &mut Agent, this: Value, args: &[Value], at_start: bool) -> Completion<Value> {
    let s: Vec<u16> = this_string(agent, &this)?.to_string_lossy().encode_utf16().collect();
    let target_len = to_integer_or_infinity(agent, &arg(args, 0))?.max(0.0) as usize;
    if target_len <= s.len() {
        return Ok(Value::String(JsString::from_units(s)));
    }
    let filler = match arg(args, 1) {
        Value::Undefined => vec![b' ' as u16],
        v => {
            let f = crate::abstract_ops::to_string(agent, &v)?;
            if f.is_empty() {
                return Ok(Value::String(JsString::from_units(s)));
            }
            f.units().to_vec()
        }
    };
    let needed = target_len - s.len();
    let mut fill = Vec::with_capacity(needed);
    while fill.len() < needed {
        fill.extend_from_slice(&filler);
    }
    fill.truncate(needed);
    let result = if at_start {
        [fill, s].concat()
    } else {
        [s, fill].concat()
    };
    Ok(Value::String(JsString::from_units(result)))
}

fn replace(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let s = this_string(agent, &this)?.to_string_lossy();
    let pattern = crate::abstract_ops::to_string(agent, &arg(args, 0))?.to_string_lossy();
    let replacement_arg = arg(args, 1);
    match s.find(&pattern) {
        None => Ok(Value::from_str(&s)),
        Some(idx) => {
            let replacement = resolve_replacement(agent, &replacement_arg, &s, &pattern, idx)?;
            Ok(Value::from_str(&format!("{}{}{}", &s[..idx], replacement, &s[idx + pattern.len()..])))
        }
    }
}

fn replace_all(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let s = this_string(agent, &this)?.to_string_lossy();
    let pattern = crate::abstract_ops::to_string(agent, &arg(args, 0))?.to_string_lossy();
    let replacement_arg = arg(args, 1);
    if pattern.is_empty() {
        return Ok(Value::from_str(&s));
    }
    let mut out = String::new();
    let mut rest = s.as_str();
    let mut consumed = 0usize;
    while let Some(idx) = rest.find(&pattern) {
        out.push_str(&rest[..idx]);
        let replacement = resolve_replacement(agent, &replacement_arg, &s, &pattern, consumed + idx)?;
        out.push_str(&replacement);
        rest = &rest[idx + pattern.len()..];
        consumed += idx + pattern.len();
    }
    out.push_str(rest);
    Ok(Value::from_str(&out))
}

fn resolve_replacement(agent: &mut Agent, replacement_arg: &Value, whole: &str, matched: &str, idx: usize) -> Completion<String> {
    if agent.is_callable(replacement_arg) {
        let result = agent.call(replacement_arg, Value::Undefined, &[Value::from_str(matched), Value::Number(idx as f64), Value::from_str(whole)])?;
        return Ok(crate::abstract_ops::to_string(agent, &result)?.to_string_lossy());
    }
    let replacement = crate::abstract_ops::to_string(agent, replacement_arg)?.to_string_lossy();
    Ok(replacement.replace("$&", matched))
}

fn concat(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let mut s = this_string(agent, &this)?;
    for a in args {
        let piece = crate::abstract_ops::to_string(agent, a)?;
        s = s.concat(&piece);
    }
    Ok(Value::String(s))
}

fn to_string_method(agent: &mut Agent, this: Value, _args: &[Value], _f: CallFlags) -> Completion<Value> {
    Ok(Value::String(this_string(agent, &this)?))
}
