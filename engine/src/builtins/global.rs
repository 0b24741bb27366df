//! Free global functions (`parseInt`, `parseFloat`, `isNaN`, `isFinite`)
//! and the `globalThis` binding (SPEC_FULL.md §10.7), grounded on the
//! teacher's `builtins/numbers_and_dates/number_object`'s static-method
//! install pattern.

use super::helpers::{arg, define_method};
use crate::completion::Completion;
use crate::execution::agent::Agent;
use crate::types::{CallFlags, JsObject, PropertyKey, Value};

pub fn install(agent: &Agent, global: &JsObject) {
    let function_proto = agent.realm.function_prototype.clone();
    define_method(global, function_proto.clone(), "parseInt", 2, parse_int);
    define_method(global, function_proto, "parseFloat", 1, parse_float);
    define_method(global, agent.realm.function_prototype.clone(), "isNaN", 1, is_nan);
    define_method(global, agent.realm.function_prototype.clone(), "isFinite", 1, is_finite);

    let _ = global.define_own(
        PropertyKey::from_str("globalThis"),
        crate::types::PropertyDescriptor::data(Value::Object(global.clone()), true, false, true),
    );
}

/// `parseInt` (spec.md §4.6-adjacent global function): leading whitespace
/// skipped, optional sign, an optional `0x`/`0X` prefix only recognized
/// when `radix` is 0/undefined/16, digits parsed up to the first
/// non-digit-in-radix character. Returns `NaN` if no digits are consumed.
fn parse_int(agent: &mut Agent, _this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let s = crate::abstract_ops::to_string(agent, &arg(args, 0))?.to_string_lossy();
    let mut radix = crate::abstract_ops::to_integer_or_infinity(agent, &arg(args, 1))? as i64 as u32;
    let trimmed = s.trim_start();
    let (sign, rest) = match trimmed.strip_prefix('-') {
        Some(r) => (-1.0, r),
        None => (1.0, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let mut rest = rest;
    let mut strip_prefix = false;
    if radix == 0 {
        if rest.len() >= 2 && (rest.starts_with("0x") || rest.starts_with("0X")) {
            strip_prefix = true;
            radix = 16;
        } else {
            radix = 10;
        }
    } else if radix == 16 && rest.len() >= 2 && (rest.starts_with("0x") || rest.starts_with("0X")) {
        strip_prefix = true;
    }
    if strip_prefix {
        rest = &rest[2..];
    }
    if !(2..=36).contains(&radix) {
        return Ok(Value::Number(f64::NAN));
    }

    let digit_count = rest.chars().take_while(|c| c.to_digit(radix).is_some()).count();
    if digit_count == 0 {
        return Ok(Value::Number(f64::NAN));
    }
    let mut value = 0.0f64;
    for c in rest[..digit_count].chars() {
        value = value * radix as f64 + c.to_digit(radix).unwrap() as f64;
    }
    Ok(Value::Number(sign * value))
}

fn parse_float(agent: &mut Agent, _this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let s = crate::abstract_ops::to_string(agent, &arg(args, 0))?.to_string_lossy();
    Ok(Value::Number(super::number_obj::parse_leading_float(&s)))
}

fn is_nan(agent: &mut Agent, _this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let n = crate::abstract_ops::to_number(agent, &arg(args, 0))?;
    Ok(Value::Boolean(n.is_nan()))
}

fn is_finite(agent: &mut Agent, _this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let n = crate::abstract_ops::to_number(agent, &arg(args, 0))?;
    Ok(Value::Boolean(n.is_finite()))
}
