//! `BigInt` (non-constructable) and `BigInt.prototype.toString` (spec.md
//! §10.7), grounded on the teacher's `builtins/numbers_and_dates/bigint_objects`.

use super::helpers::{arg, define_method};
use crate::completion::Completion;
use crate::execution::agent::Agent;
use crate::types::{CallFlags, JsObject, Value};

pub fn install(agent: &Agent, global: &JsObject) {
    let bigint_proto = agent.realm.bigint_prototype.clone();
    let function_proto = agent.realm.function_prototype.clone();

    define_method(&bigint_proto, function_proto.clone(), "toString", 0, to_string_method);
    define_method(&bigint_proto, function_proto.clone(), "valueOf", 0, value_of);

    let ctor = super::helpers::new_host_fn(function_proto, "BigInt", 1, false, construct_bigint);
    let _ = ctor.define_own(
        crate::types::PropertyKey::from_str("prototype"),
        crate::types::PropertyDescriptor::data(Value::Object(bigint_proto.clone()), false, false, false),
    );
    let _ = bigint_proto.define_own(
        crate::types::PropertyKey::from_str("constructor"),
        crate::types::PropertyDescriptor::data(Value::Object(ctor.clone()), true, false, true),
    );
    let _ = global.define_own(
        crate::types::PropertyKey::from_str("BigInt"),
        crate::types::PropertyDescriptor::data(Value::Object(ctor), true, false, true),
    );
}

fn this_bigint(agent: &mut Agent, this: &Value) -> Completion<crate::types::JsBigInt> {
    match this {
        Value::BigInt(b) => Ok(b.clone()),
        Value::Object(o) => match o.primitive_value() {
            Some(Value::BigInt(b)) => Ok(b),
            _ => Err(agent.throw_type("BigInt.prototype method called on incompatible receiver")),
        },
        _ => Err(agent.throw_type("BigInt.prototype method called on incompatible receiver")),
    }
}

/// `BigInt(value)`: never constructable with `new` (spec.md §10.7 — `new
/// BigInt()` is a `TypeError` per the language, not an omission).
fn construct_bigint(agent: &mut Agent, _this: Value, args: &[Value], flags: CallFlags) -> Completion<Value> {
    if flags.is_new {
        return Err(agent.throw_type("BigInt is not a constructor"));
    }
    let v = arg(args, 0);
    match v {
        Value::Number(n) => {
            if n.fract() != 0.0 || !n.is_finite() {
                return Err(agent.throw_range("The number is not a safe integer"));
            }
            Ok(Value::BigInt(crate::types::JsBigInt::from_i64(n as i64)))
        }
        other => crate::abstract_ops::to_bigint(agent, &other).map(Value::BigInt),
    }
}

fn to_string_method(agent: &mut Agent, this: Value, _args: &[Value], _f: CallFlags) -> Completion<Value> {
    let b = this_bigint(agent, &this)?;
    Ok(Value::from_str(&b.to_string()))
}

fn value_of(agent: &mut Agent, this: Value, _args: &[Value], _f: CallFlags) -> Completion<Value> {
    this_bigint(agent, &this).map(Value::BigInt)
}

