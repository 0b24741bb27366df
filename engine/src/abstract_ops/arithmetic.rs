//! Binary numeric operators (spec.md §4.5 "Binary"): `+` string-concatenates
//! when either operand coerces to string, numeric otherwise; the rest
//! coerce both operands to numerics and reject mixing `number`/`bigint`.

use super::conversions::{to_numeric, to_primitive, to_string, Hint, Numeric};
use crate::completion::Completion;
use crate::execution::agent::Agent;
use crate::types::{JsBigInt, Value};

pub fn add(agent: &mut Agent, a: &Value, b: &Value) -> Completion<Value> {
    let pa = to_primitive(agent, a, Hint::Default)?;
    let pb = to_primitive(agent, b, Hint::Default)?;
    if matches!(pa, Value::String(_)) || matches!(pb, Value::String(_)) {
        let sa = to_string(agent, &pa)?;
        let sb = to_string(agent, &pb)?;
        return Ok(Value::String(sa.concat(&sb)));
    }
    match (to_numeric(agent, &pa)?, to_numeric(agent, &pb)?) {
        (Numeric::Number(x), Numeric::Number(y)) => Ok(Value::Number(x + y)),
        (Numeric::BigInt(x), Numeric::BigInt(y)) => {
            Ok(Value::BigInt(JsBigInt::from_inner(x.inner() + y.inner())))
        }
        _ => Err(agent.throw_type("Cannot mix BigInt and other types, use explicit conversions")),
    }
}

macro_rules! numeric_binop {
    ($name:ident, $num_op:expr, $big_op:expr) => {
        pub fn $name(agent: &mut Agent, a: &Value, b: &Value) -> Completion<Value> {
            match (to_numeric(agent, a)?, to_numeric(agent, b)?) {
                (Numeric::Number(x), Numeric::Number(y)) => Ok(Value::Number(($num_op)(x, y))),
                (Numeric::BigInt(x), Numeric::BigInt(y)) => {
                    Ok(Value::BigInt(JsBigInt::from_inner(($big_op)(x.inner(), y.inner()))))
                }
                _ => Err(agent.throw_type("Cannot mix BigInt and other types, use explicit conversions")),
            }
        }
    };
}

numeric_binop!(sub, |x: f64, y: f64| x - y, |x: &num_bigint::BigInt, y: &num_bigint::BigInt| x - y);
numeric_binop!(mul, |x: f64, y: f64| x * y, |x: &num_bigint::BigInt, y: &num_bigint::BigInt| x * y);

pub fn div(agent: &mut Agent, a: &Value, b: &Value) -> Completion<Value> {
    match (to_numeric(agent, a)?, to_numeric(agent, b)?) {
        (Numeric::Number(x), Numeric::Number(y)) => Ok(Value::Number(x / y)),
        (Numeric::BigInt(x), Numeric::BigInt(y)) => {
            if y.is_zero() {
                return Err(agent.throw_range("Division by zero"));
            }
            Ok(Value::BigInt(JsBigInt::from_inner(x.inner() / y.inner())))
        }
        _ => Err(agent.throw_type("Cannot mix BigInt and other types, use explicit conversions")),
    }
}

/// JS `%`: truncated-division remainder, following the sign of the
/// dividend (spec.md §4.5).
pub fn rem(agent: &mut Agent, a: &Value, b: &Value) -> Completion<Value> {
    match (to_numeric(agent, a)?, to_numeric(agent, b)?) {
        (Numeric::Number(x), Numeric::Number(y)) => {
            if y == 0.0 || x.is_infinite() {
                Ok(Value::Number(f64::NAN))
            } else if y.is_infinite() {
                Ok(Value::Number(x))
            } else {
                Ok(Value::Number(x % y))
            }
        }
        (Numeric::BigInt(x), Numeric::BigInt(y)) => {
            if y.is_zero() {
                return Err(agent.throw_range("Division by zero"));
            }
            Ok(Value::BigInt(JsBigInt::from_inner(x.inner() % y.inner())))
        }
        _ => Err(agent.throw_type("Cannot mix BigInt and other types, use explicit conversions")),
    }
}

pub fn exp(agent: &mut Agent, a: &Value, b: &Value) -> Completion<Value> {
    match (to_numeric(agent, a)?, to_numeric(agent, b)?) {
        (Numeric::Number(x), Numeric::Number(y)) => Ok(Value::Number(x.powf(y))),
        (Numeric::BigInt(x), Numeric::BigInt(y)) => {
            let exp = num_traits::ToPrimitive::to_u32(y.inner())
                .ok_or_else(|| agent.throw_range("Exponent must be non-negative"))?;
            Ok(Value::BigInt(JsBigInt::from_inner(x.inner().pow(exp))))
        }
        _ => Err(agent.throw_type("Cannot mix BigInt and other types, use explicit conversions")),
    }
}

fn js_to_i32(n: f64) -> i32 {
    if !n.is_finite() || n == 0.0 {
        return 0;
    }
    let n = n.trunc();
    let m = n.rem_euclid(4294967296.0);
    if m >= 2147483648.0 {
        (m - 4294967296.0) as i32
    } else {
        m as i32
    }
}

/// Coerces each side once via `ToNumeric` and dispatches to `int_op` for a
/// number/number pair or `big_op` for a bigint/bigint pair; mixing the two
/// is a `TypeError` (spec.md §4.5).
fn int_binop(
    agent: &mut Agent,
    a: &Value,
    b: &Value,
    int_op: impl FnOnce(i32, i32) -> f64,
    big_op: impl FnOnce(&num_bigint::BigInt, &num_bigint::BigInt) -> num_bigint::BigInt,
) -> Completion<Value> {
    match (to_numeric(agent, a)?, to_numeric(agent, b)?) {
        (Numeric::Number(x), Numeric::Number(y)) => {
            Ok(Value::Number(int_op(js_to_i32(x), js_to_i32(y))))
        }
        (Numeric::BigInt(x), Numeric::BigInt(y)) => {
            Ok(Value::BigInt(JsBigInt::from_inner(big_op(x.inner(), y.inner()))))
        }
        _ => Err(agent.throw_type("Cannot mix BigInt and other types, use explicit conversions")),
    }
}

pub fn shl(agent: &mut Agent, a: &Value, b: &Value) -> Completion<Value> {
    match (to_numeric(agent, a)?, to_numeric(agent, b)?) {
        (Numeric::Number(x), Numeric::Number(y)) => {
            let r = (js_to_i32(y) as u32) & 31;
            Ok(Value::Number((js_to_i32(x) << r) as f64))
        }
        (Numeric::BigInt(x), Numeric::BigInt(y)) => {
            let shift = num_traits::ToPrimitive::to_i64(y.inner()).unwrap_or(0);
            Ok(Value::BigInt(JsBigInt::from_inner(if shift >= 0 {
                x.inner() << shift as u32
            } else {
                x.inner() >> (-shift) as u32
            })))
        }
        _ => Err(agent.throw_type("Cannot mix BigInt and other types, use explicit conversions")),
    }
}

pub fn shr(agent: &mut Agent, a: &Value, b: &Value) -> Completion<Value> {
    match (to_numeric(agent, a)?, to_numeric(agent, b)?) {
        (Numeric::Number(x), Numeric::Number(y)) => {
            let r = (js_to_i32(y) as u32) & 31;
            Ok(Value::Number((js_to_i32(x) >> r) as f64))
        }
        (Numeric::BigInt(x), Numeric::BigInt(y)) => {
            let shift = num_traits::ToPrimitive::to_i64(y.inner()).unwrap_or(0);
            Ok(Value::BigInt(JsBigInt::from_inner(if shift >= 0 {
                x.inner() >> shift as u32
            } else {
                x.inner() << (-shift) as u32
            })))
        }
        _ => Err(agent.throw_type("Cannot mix BigInt and other types, use explicit conversions")),
    }
}

/// `>>>` has no `bigint` overload; mixing in a bigint is a `TypeError`.
pub fn shr_unsigned(agent: &mut Agent, a: &Value, b: &Value) -> Completion<Value> {
    match (to_numeric(agent, a)?, to_numeric(agent, b)?) {
        (Numeric::Number(x), Numeric::Number(y)) => {
            let l = js_to_i32(x) as u32;
            let r = (js_to_i32(y) as u32) & 31;
            Ok(Value::Number((l >> r) as f64))
        }
        _ => Err(agent.throw_type("BigInts have no unsigned right shift, use >> instead")),
    }
}

pub fn bit_and(agent: &mut Agent, a: &Value, b: &Value) -> Completion<Value> {
    int_binop(agent, a, b, |x, y| (x & y) as f64, |x, y| x & y)
}

pub fn bit_or(agent: &mut Agent, a: &Value, b: &Value) -> Completion<Value> {
    int_binop(agent, a, b, |x, y| (x | y) as f64, |x, y| x | y)
}

pub fn bit_xor(agent: &mut Agent, a: &Value, b: &Value) -> Completion<Value> {
    int_binop(agent, a, b, |x, y| (x ^ y) as f64, |x, y| x ^ y)
}

/// Unary `-`: negates a numeric operand (spec.md §4.5 "Unary").
pub fn negate(agent: &mut Agent, v: &Value) -> Completion<Value> {
    match to_numeric(agent, v)? {
        Numeric::Number(n) => Ok(Value::Number(-n)),
        Numeric::BigInt(b) => Ok(Value::BigInt(JsBigInt::from_inner(-b.inner()))),
    }
}

/// Unary `~`: bitwise complement (spec.md §4.5 "Unary").
pub fn bitwise_not(agent: &mut Agent, v: &Value) -> Completion<Value> {
    match to_numeric(agent, v)? {
        Numeric::Number(n) => Ok(Value::Number(!js_to_i32(n) as f64)),
        Numeric::BigInt(b) => Ok(Value::BigInt(JsBigInt::from_inner(!b.inner()))),
    }
}

pub(crate) fn to_i32(n: f64) -> i32 {
    js_to_i32(n)
}
