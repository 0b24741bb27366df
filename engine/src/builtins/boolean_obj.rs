//! `Boolean` and `Boolean.prototype` (spec.md §10.7).

use super::helpers::{arg, define_constructor, define_method};
use crate::abstract_ops::to_boolean;
use crate::completion::Completion;
use crate::execution::agent::Agent;
use crate::types::{CallFlags, JsObject, ObjectKind, Value};

pub fn install(agent: &Agent, global: &JsObject) {
    let boolean_proto = agent.realm.boolean_prototype.clone();
    let function_proto = agent.realm.function_prototype.clone();

    define_method(&boolean_proto, function_proto.clone(), "toString", 0, to_string_method);
    define_method(&boolean_proto, function_proto.clone(), "valueOf", 0, value_of);
    define_constructor(global, function_proto, "Boolean", 1, &boolean_proto, construct_boolean);
}

fn this_boolean(agent: &mut Agent, this: &Value) -> Completion<bool> {
    match this {
        Value::Boolean(b) => Ok(*b),
        Value::Object(o) => match o.primitive_value() {
            Some(Value::Boolean(b)) => Ok(b),
            _ => Err(agent.throw_type("Boolean.prototype method called on incompatible receiver")),
        },
        _ => Err(agent.throw_type("Boolean.prototype method called on incompatible receiver")),
    }
}

fn construct_boolean(agent: &mut Agent, _this: Value, args: &[Value], flags: CallFlags) -> Completion<Value> {
    let b = to_boolean(&arg(args, 0));
    if flags.is_new {
        Ok(Value::Object(JsObject::new(Some(agent.realm.boolean_prototype.clone()), ObjectKind::PrimitiveWrapper(Value::Boolean(b)))))
    } else {
        Ok(Value::Boolean(b))
    }
}

fn to_string_method(agent: &mut Agent, this: Value, _args: &[Value], _f: CallFlags) -> Completion<Value> {
    Ok(Value::from_str(if this_boolean(agent, &this)? { "true" } else { "false" }))
}

fn value_of(agent: &mut Agent, this: Value, _args: &[Value], _f: CallFlags) -> Completion<Value> {
    this_boolean(agent, &this).map(Value::Boolean)
}
