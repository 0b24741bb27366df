//! `Symbol` (non-constructable) and `Symbol.prototype` (spec.md §10.7),
//! grounded on the teacher's `builtins/fundamental_objects/symbol_objects`.
//! The `Symbol.toPrimitive` well-known symbol itself lives on the realm
//! ([`crate::execution::realm::Realm::to_primitive_symbol`]); this module
//! only exposes `Symbol.toPrimitive` as a static property pointing at it.

use super::helpers::{arg, define_method, define_value};
use crate::completion::Completion;
use crate::execution::agent::Agent;
use crate::types::{CallFlags, JsObject, JsSymbol, PropertyDescriptor, PropertyKey, Value};

pub fn install(agent: &Agent, global: &JsObject) {
    let symbol_proto = agent.realm.symbol_prototype.clone();
    let function_proto = agent.realm.function_prototype.clone();

    define_method(&symbol_proto, function_proto.clone(), "toString", 0, to_string_method);
    define_method(&symbol_proto, function_proto.clone(), "valueOf", 0, value_of);

    let ctor = super::helpers::new_host_fn(function_proto.clone(), "Symbol", 0, false, construct_symbol);
    let _ = ctor.define_own(
        PropertyKey::from_str("prototype"),
        PropertyDescriptor::data(Value::Object(symbol_proto.clone()), false, false, false),
    );
    let _ = symbol_proto.define_own(
        PropertyKey::from_str("constructor"),
        PropertyDescriptor::data(Value::Object(ctor.clone()), true, false, true),
    );
    define_value(&ctor, "toPrimitive", Value::Symbol(agent.realm.to_primitive_symbol.clone()), false, false, false);
    let _ = global.define_own(PropertyKey::from_str("Symbol"), PropertyDescriptor::data(Value::Object(ctor), true, false, true));
}

fn this_symbol(agent: &mut Agent, this: &Value) -> Completion<JsSymbol> {
    match this {
        Value::Symbol(s) => Ok(s.clone()),
        Value::Object(o) => match o.primitive_value() {
            Some(Value::Symbol(s)) => Ok(s),
            _ => Err(agent.throw_type("Symbol.prototype method called on incompatible receiver")),
        },
        _ => Err(agent.throw_type("Symbol.prototype method called on incompatible receiver")),
    }
}

fn construct_symbol(agent: &mut Agent, _this: Value, args: &[Value], flags: CallFlags) -> Completion<Value> {
    if flags.is_new {
        return Err(agent.throw_type("Symbol is not a constructor"));
    }
    let description = match arg(args, 0) {
        Value::Undefined => None,
        v => Some(crate::abstract_ops::to_string(agent, &v)?),
    };
    Ok(Value::Symbol(JsSymbol::new(description)))
}

fn to_string_method(agent: &mut Agent, this: Value, _args: &[Value], _f: CallFlags) -> Completion<Value> {
    let s = this_symbol(agent, &this)?;
    let desc = s.0.description.as_ref().map(|d| d.to_string_lossy()).unwrap_or_default();
    Ok(Value::from_str(&format!("Symbol({desc})")))
}

fn value_of(agent: &mut Agent, this: Value, _args: &[Value], _f: CallFlags) -> Completion<Value> {
    this_symbol(agent, &this).map(Value::Symbol)
}
