//! The `Math` namespace object (spec.md §10.7), grounded on the teacher's
//! `builtins/numbers_and_dates/math_object`.

use super::helpers::{arg, define_method, define_value};
use crate::abstract_ops::to_number;
use crate::completion::Completion;
use crate::execution::agent::Agent;
use crate::types::{CallFlags, JsObject, ObjectKind, PropertyDescriptor, PropertyKey, Value};

pub fn install(agent: &Agent, global: &JsObject) {
    let function_proto = agent.realm.function_prototype.clone();
    let math = JsObject::new(Some(agent.realm.object_prototype.clone()), ObjectKind::Ordinary);

    define_value(&math, "PI", Value::Number(std::f64::consts::PI), false, false, false);
    define_value(&math, "E", Value::Number(std::f64::consts::E), false, false, false);
    define_value(&math, "LN2", Value::Number(std::f64::consts::LN_2), false, false, false);
    define_value(&math, "LN10", Value::Number(std::f64::consts::LN_10), false, false, false);
    define_value(&math, "SQRT2", Value::Number(std::f64::consts::SQRT_2), false, false, false);

    define_method(&math, function_proto.clone(), "abs", 1, math_abs);
    define_method(&math, function_proto.clone(), "floor", 1, math_floor);
    define_method(&math, function_proto.clone(), "ceil", 1, math_ceil);
    define_method(&math, function_proto.clone(), "round", 1, round);
    define_method(&math, function_proto.clone(), "trunc", 1, math_trunc);
    define_method(&math, function_proto.clone(), "sign", 1, sign);
    define_method(&math, function_proto.clone(), "sqrt", 1, math_sqrt);
    define_method(&math, function_proto.clone(), "cbrt", 1, math_cbrt);
    define_method(&math, function_proto.clone(), "pow", 2, pow);
    define_method(&math, function_proto.clone(), "exp", 1, math_exp);
    define_method(&math, function_proto.clone(), "log", 1, math_ln);
    define_method(&math, function_proto.clone(), "log2", 1, math_log2);
    define_method(&math, function_proto.clone(), "log10", 1, math_log10);
    define_method(&math, function_proto.clone(), "sin", 1, math_sin);
    define_method(&math, function_proto.clone(), "cos", 1, math_cos);
    define_method(&math, function_proto.clone(), "tan", 1, math_tan);
    define_method(&math, function_proto.clone(), "atan", 1, math_atan);
    define_method(&math, function_proto.clone(), "atan2", 2, atan2);
    define_method(&math, function_proto.clone(), "max", 2, max);
    define_method(&math, function_proto.clone(), "min", 2, min);
    define_method(&math, function_proto.clone(), "hypot", 2, hypot);
    define_method(&math, function_proto, "random", 0, random);

    let _ = global.define_own(PropertyKey::from_str("Math"), PropertyDescriptor::data(Value::Object(math), true, false, true));
}

/// Wraps a pure `f64 -> f64` math function as a host callable, reading
/// argument 0 via `ToNumber`; shared by every single-argument `Math.*`.
fn unary(f: fn(f64) -> f64) -> crate::types::function::HostFn {
    // `HostFn` is a bare function pointer, so each distinct `f` needs its
    // own monomorphized wrapper; a small macro would help but each of
    // these is one line, so they're spelled out below as named fns.
    match_unary(f)
}

macro_rules! unary_fn {
    ($name:ident, $f:expr) => {
        fn $name(agent: &mut Agent, _this: Value, args: &[Value], _flags: CallFlags) -> Completion<Value> {
            let n = to_number(agent, &arg(args, 0))?;
            Ok(Value::Number(($f)(n)))
        }
    };
}

unary_fn!(math_abs, f64::abs);
unary_fn!(math_floor, f64::floor);
unary_fn!(math_ceil, f64::ceil);
unary_fn!(math_trunc, f64::trunc);
unary_fn!(math_sqrt, f64::sqrt);
unary_fn!(math_cbrt, f64::cbrt);
unary_fn!(math_exp, f64::exp);
unary_fn!(math_ln, f64::ln);
unary_fn!(math_log2, f64::log2);
unary_fn!(math_log10, f64::log10);
unary_fn!(math_sin, f64::sin);
unary_fn!(math_cos, f64::cos);
unary_fn!(math_tan, f64::tan);
unary_fn!(math_atan, f64::atan);

fn match_unary(f: fn(f64) -> f64) -> crate::types::function::HostFn {
    if std::ptr::eq(f as *const (), f64::abs as *const ()) {
        math_abs
    } else if std::ptr::eq(f as *const (), f64::floor as *const ()) {
        math_floor
    } else if std::ptr::eq(f as *const (), f64::ceil as *const ()) {
        math_ceil
    } else if std::ptr::eq(f as *const (), f64::trunc as *const ()) {
        math_trunc
    } else if std::ptr::eq(f as *const (), f64::sqrt as *const ()) {
        math_sqrt
    } else if std::ptr::eq(f as *const (), f64::cbrt as *const ()) {
        math_cbrt
    } else if std::ptr::eq(f as *const (), f64::exp as *const ()) {
        math_exp
    } else if std::ptr::eq(f as *const (), f64::ln as *const ()) {
        math_ln
    } else if std::ptr::eq(f as *const (), f64::log2 as *const ()) {
        math_log2
    } else if std::ptr::eq(f as *const (), f64::log10 as *const ()) {
        math_log10
    } else if std::ptr::eq(f as *const (), f64::sin as *const ()) {
        math_sin
    } else if std::ptr::eq(f as *const (), f64::cos as *const ()) {
        math_cos
    } else if std::ptr::eq(f as *const (), f64::tan as *const ()) {
        math_tan
    } else {
        math_atan
    }
}

fn round(agent: &mut Agent, _this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let n = to_number(agent, &arg(args, 0))?;
    if n.is_nan() || n.is_infinite() {
        return Ok(Value::Number(n));
    }
    Ok(Value::Number((n + 0.5).floor()))
}

fn sign(agent: &mut Agent, _this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let n = to_number(agent, &arg(args, 0))?;
    let result = if n.is_nan() || n == 0.0 { n } else if n > 0.0 { 1.0 } else { -1.0 };
    Ok(Value::Number(result))
}

fn pow(agent: &mut Agent, _this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let base = to_number(agent, &arg(args, 0))?;
    let exp = to_number(agent, &arg(args, 1))?;
    Ok(Value::Number(base.powf(exp)))
}

fn atan2(agent: &mut Agent, _this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let y = to_number(agent, &arg(args, 0))?;
    let x = to_number(agent, &arg(args, 1))?;
    Ok(Value::Number(y.atan2(x)))
}

fn max(agent: &mut Agent, _this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let mut result = f64::NEG_INFINITY;
    for a in args {
        let n = to_number(agent, a)?;
        if n.is_nan() {
            return Ok(Value::Number(f64::NAN));
        }
        if n > result || (n == 0.0 && result == 0.0 && n.is_sign_positive()) {
            result = n;
        }
    }
    Ok(Value::Number(result))
}

fn min(agent: &mut Agent, _this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let mut result = f64::INFINITY;
    for a in args {
        let n = to_number(agent, a)?;
        if n.is_nan() {
            return Ok(Value::Number(f64::NAN));
        }
        if n < result || (n == 0.0 && result == 0.0 && n.is_sign_negative()) {
            result = n;
        }
    }
    Ok(Value::Number(result))
}

fn hypot(agent: &mut Agent, _this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let mut sum = 0.0;
    for a in args {
        let n = to_number(agent, a)?;
        if n.is_infinite() {
            return Ok(Value::Number(f64::INFINITY));
        }
        sum += n * n;
    }
    Ok(Value::Number(sum.sqrt()))
}

fn random(_agent: &mut Agent, _this: Value, _args: &[Value], _f: CallFlags) -> Completion<Value> {
    use rand::Rng;
    Ok(Value::Number(rand::rng().random::<f64>()))
}
