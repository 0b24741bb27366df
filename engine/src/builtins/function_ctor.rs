//! `Function.prototype` (`call`, `apply`, `bind`, `toString`) and a minimal
//! `Function` constructor, grounded on the teacher's
//! `builtins/fundamental_objects/function_objects`. Named `function_ctor`
//! to avoid clashing with `crate::types::function`.

use super::helpers::{arg, define_constructor, define_method};
use crate::completion::Completion;
use crate::execution::agent::Agent;
use crate::types::function::{BoundFunctionData, FunctionData};
use crate::types::{CallFlags, JsObject, JsString, ObjectKind, PropertyKey, Value};

pub fn install(agent: &Agent, global: &JsObject) {
    let function_proto = agent.realm.function_prototype.clone();
    define_method(&function_proto, function_proto.clone(), "call", 1, call_method);
    define_method(&function_proto, function_proto.clone(), "apply", 2, apply_method);
    define_method(&function_proto, function_proto.clone(), "bind", 1, bind_method);
    define_method(&function_proto, function_proto.clone(), "toString", 0, to_string_method);

    define_constructor(global, function_proto.clone(), "Function", 1, &function_proto, construct_function);
}

fn call_method(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    if !agent.is_callable(&this) {
        return Err(agent.throw_type("Function.prototype.call called on non-callable"));
    }
    let call_this = arg(args, 0);
    let rest = if args.is_empty() { &[][..] } else { &args[1..] };
    agent.call(&this, call_this, rest)
}

fn apply_method(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    if !agent.is_callable(&this) {
        return Err(agent.throw_type("Function.prototype.apply called on non-callable"));
    }
    let call_this = arg(args, 0);
    let arg_list = match arg(args, 1) {
        Value::Undefined | Value::Null => Vec::new(),
        Value::Object(o) if o.is_array() => o.array_elements().unwrap_or_default(),
        _ => return Err(agent.throw_type("CreateListFromArrayLike called on non-object")),
    };
    agent.call(&this, call_this, &arg_list)
}

fn bind_method(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let Value::Object(target) = &this else {
        return Err(agent.throw_type("Bind must be called on a function"));
    };
    if !target.is_callable() {
        return Err(agent.throw_type("Bind must be called on a function"));
    }
    let bound_this = arg(args, 0);
    let bound_args = if args.is_empty() { Vec::new() } else { args[1..].to_vec() };
    let target_name = target
        .get_own(&PropertyKey::from_str("name"))
        .and_then(|d| d.data_value().cloned())
        .map(|v| crate::abstract_ops::conversions::to_string_lossy(&v))
        .unwrap_or_default();
    let name = JsString::from_str(&format!("bound {target_name}"));
    let obj = JsObject::new(
        Some(agent.realm.function_prototype.clone()),
        ObjectKind::Function(FunctionData::Bound(BoundFunctionData {
            target: target.clone(),
            bound_this,
            bound_args,
            name: name.clone(),
        })),
    );
    let _ = obj.define_own(
        PropertyKey::from_str("name"),
        crate::types::PropertyDescriptor::data(Value::String(name), false, false, true),
    );
    let len = target
        .get_own(&PropertyKey::from_str("length"))
        .and_then(|d| d.data_value().cloned())
        .unwrap_or(Value::Number(0.0));
    let _ = obj.define_own(
        PropertyKey::from_str("length"),
        crate::types::PropertyDescriptor::data(len, false, false, true),
    );
    Ok(Value::Object(obj))
}

fn to_string_method(agent: &mut Agent, this: Value, _args: &[Value], _f: CallFlags) -> Completion<Value> {
    let Value::Object(o) = &this else {
        return Err(agent.throw_type("Function.prototype.toString requires a function"));
    };
    match o.function_data() {
        Some(FunctionData::Host(h)) => Ok(Value::from_str(&format!("function {}() {{ [native code] }}", h.name.to_string_lossy()))),
        Some(FunctionData::User(u)) => Ok(Value::from_str(&format!("function {}() {{ ... }}", u.name.to_string_lossy()))),
        Some(FunctionData::Bound(b)) => Ok(Value::from_str(&format!("function {}() {{ [native code] }}", b.name.to_string_lossy()))),
        None => Err(agent.throw_type("Function.prototype.toString requires a function")),
    }
}

/// `new Function(...)`: SPEC_FULL.md §10.7 leaves dynamic function
/// compilation out of scope alongside `eval`'s indirect form's ability to
/// define globals outside the running script's own text; calling this
/// constructor throws rather than silently no-opping.
fn construct_function(agent: &mut Agent, _this: Value, _args: &[Value], _f: CallFlags) -> Completion<Value> {
    Err(agent.throw_type("Function constructor is not supported"))
}
