//! `Number` and `Number.prototype` (spec.md §10.7), grounded on the
//! teacher's `builtins/numbers_and_dates/number_objects`.

use super::helpers::{arg, define_constructor, define_method, define_value};
use crate::completion::Completion;
use crate::execution::agent::Agent;
use crate::types::number::number_to_string;
use crate::types::{CallFlags, JsObject, ObjectKind, Value};

pub fn install(agent: &Agent, global: &JsObject) {
    let number_proto = agent.realm.number_prototype.clone();
    let function_proto = agent.realm.function_prototype.clone();

    define_method(&number_proto, function_proto.clone(), "toString", 1, to_string_method);
    define_method(&number_proto, function_proto.clone(), "valueOf", 0, value_of);
    define_method(&number_proto, function_proto.clone(), "toFixed", 1, to_fixed);

    let ctor = define_constructor(global, function_proto.clone(), "Number", 1, &number_proto, construct_number);
    define_value(&ctor, "MAX_SAFE_INTEGER", Value::Number(9007199254740991.0), false, false, false);
    define_value(&ctor, "MIN_SAFE_INTEGER", Value::Number(-9007199254740991.0), false, false, false);
    define_value(&ctor, "MAX_VALUE", Value::Number(f64::MAX), false, false, false);
    define_value(&ctor, "MIN_VALUE", Value::Number(f64::MIN_POSITIVE), false, false, false);
    define_value(&ctor, "EPSILON", Value::Number(f64::EPSILON), false, false, false);
    define_value(&ctor, "NaN", Value::Number(f64::NAN), false, false, false);
    define_value(&ctor, "POSITIVE_INFINITY", Value::Number(f64::INFINITY), false, false, false);
    define_value(&ctor, "NEGATIVE_INFINITY", Value::Number(f64::NEG_INFINITY), false, false, false);
    define_method(&ctor, function_proto.clone(), "isNaN", 1, is_nan);
    define_method(&ctor, function_proto.clone(), "isFinite", 1, is_finite);
    define_method(&ctor, function_proto.clone(), "isInteger", 1, is_integer);
    define_method(&ctor, function_proto.clone(), "isSafeInteger", 1, is_safe_integer);
    define_method(&ctor, function_proto, "parseFloat", 1, parse_float);
}

fn this_number(agent: &mut Agent, this: &Value) -> Completion<f64> {
    match this {
        Value::Number(n) => Ok(*n),
        Value::Object(o) => match o.primitive_value() {
            Some(Value::Number(n)) => Ok(n),
            _ => Err(agent.throw_type("Number.prototype method called on incompatible receiver")),
        },
        _ => Err(agent.throw_type("Number.prototype method called on incompatible receiver")),
    }
}

fn construct_number(agent: &mut Agent, _this: Value, args: &[Value], flags: CallFlags) -> Completion<Value> {
    let n = if args.is_empty() { 0.0 } else { crate::abstract_ops::to_number(agent, &arg(args, 0))? };
    if flags.is_new {
        Ok(Value::Object(JsObject::new(Some(agent.realm.number_prototype.clone()), ObjectKind::PrimitiveWrapper(Value::Number(n)))))
    } else {
        Ok(Value::Number(n))
    }
}

fn to_string_method(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let n = this_number(agent, &this)?;
    match arg(args, 0) {
        Value::Undefined => Ok(Value::from_str(&number_to_string(n))),
        radix_value => {
            let radix = crate::abstract_ops::to_number(agent, &radix_value)? as u32;
            if radix == 10 {
                return Ok(Value::from_str(&number_to_string(n)));
            }
            if !(2..=36).contains(&radix) {
                return Err(agent.throw_range("toString() radix must be between 2 and 36"));
            }
            Ok(Value::from_str(&to_radix_string(n, radix)))
        }
    }
}

fn to_radix_string(n: f64, radix: u32) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let neg = n < 0.0;
    let mut int_part = n.abs().trunc() as u64;
    let mut frac_part = n.abs().fract();
    let digits = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut int_digits = Vec::new();
    if int_part == 0 {
        int_digits.push(b'0');
    }
    while int_part > 0 {
        int_digits.push(digits[(int_part % radix as u64) as usize]);
        int_part /= radix as u64;
    }
    int_digits.reverse();
    let mut out = String::from_utf8(int_digits).unwrap();
    if frac_part > 0.0 {
        out.push('.');
        for _ in 0..20 {
            if frac_part <= 0.0 {
                break;
            }
            frac_part *= radix as f64;
            let digit = frac_part.trunc() as usize;
            out.push(digits[digit] as char);
            frac_part -= digit as f64;
        }
    }
    if neg {
        format!("-{out}")
    } else {
        out
    }
}

fn value_of(agent: &mut Agent, this: Value, _args: &[Value], _f: CallFlags) -> Completion<Value> {
    this_number(agent, &this).map(Value::Number)
}

fn to_fixed(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let n = this_number(agent, &this)?;
    let digits = crate::abstract_ops::to_number(agent, &arg(args, 0))?;
    let digits = if digits.is_nan() { 0 } else { digits as usize };
    if !(0..=100).contains(&digits) {
        return Err(agent.throw_range("toFixed() digits argument must be between 0 and 100"));
    }
    if n.is_nan() {
        return Ok(Value::from_str("NaN"));
    }
    Ok(Value::from_str(&format!("{:.*}", digits, n)))
}

fn is_nan(_agent: &mut Agent, _this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    Ok(Value::Boolean(matches!(arg(args, 0), Value::Number(n) if n.is_nan())))
}

fn is_finite(_agent: &mut Agent, _this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    Ok(Value::Boolean(matches!(arg(args, 0), Value::Number(n) if n.is_finite())))
}

fn is_integer(_agent: &mut Agent, _this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    Ok(Value::Boolean(matches!(arg(args, 0), Value::Number(n) if n.is_finite() && n.fract() == 0.0)))
}

fn is_safe_integer(_agent: &mut Agent, _this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    Ok(Value::Boolean(
        matches!(arg(args, 0), Value::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() <= 9007199254740991.0),
    ))
}

fn parse_float(agent: &mut Agent, _this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let s = crate::abstract_ops::to_string(agent, &arg(args, 0))?.to_string_lossy();
    let trimmed = s.trim_start();
    Ok(Value::Number(parse_leading_float(trimmed)))
}

pub fn parse_leading_float(s: &str) -> f64 {
    if s.starts_with("Infinity") || s.starts_with("+Infinity") {
        return f64::INFINITY;
    }
    if s.starts_with("-Infinity") {
        return f64::NEG_INFINITY;
    }
    let bytes = s.as_bytes();
    let mut end = 0;
    let mut seen_dot = false;
    let mut seen_digit = false;
    let mut seen_exp = false;
    let mut i = 0;
    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }
    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_digit() {
            seen_digit = true;
            end = i + 1;
        } else if b == b'.' && !seen_dot && !seen_exp {
            seen_dot = true;
            end = i + 1;
        } else if (b == b'e' || b == b'E') && seen_digit && !seen_exp {
            let mut j = i + 1;
            if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
                j += 1;
            }
            if j < bytes.len() && bytes[j].is_ascii_digit() {
                seen_exp = true;
                i = j;
                continue;
            } else {
                break;
            }
        } else {
            break;
        }
        i += 1;
    }
    if !seen_digit {
        return f64::NAN;
    }
    s[..end].parse::<f64>().unwrap_or(f64::NAN)
}
