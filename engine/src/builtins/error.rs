//! `Error` and the five native error subclasses (spec.md §7 channel 1,
//! "host-defined error objects"), grounded on the teacher's
//! `builtins/fundamental_objects/error_objects`.
//!
//! The prototype *chain* (`TypeError.prototype`'s `[[Prototype]]` is
//! `Error.prototype`, etc.) is wired by `builtins::mod` while it bootstraps
//! the realm, since `Agent::make_error` needs every prototype to exist
//! before any constructor function does. This module only attaches the
//! per-prototype `name`/`message`/`toString` and the constructor functions
//! themselves.

use super::helpers::{arg, define_constructor, define_method, define_value};
use crate::completion::Completion;
use crate::execution::agent::Agent;
use crate::execution::realm::ErrorKind;
use crate::types::{CallFlags, JsObject, ObjectKind, Value};

pub fn install(agent: &Agent, global: &JsObject) {
    let function_proto = agent.realm.function_prototype.clone();

    install_one(agent, global, "Error", &agent.realm.error_prototype.clone(), construct_error);
    install_one(agent, global, "TypeError", &agent.realm.type_error_prototype.clone(), construct_type_error);
    install_one(agent, global, "RangeError", &agent.realm.range_error_prototype.clone(), construct_range_error);
    install_one(
        agent,
        global,
        "ReferenceError",
        &agent.realm.reference_error_prototype.clone(),
        construct_reference_error,
    );
    install_one(agent, global, "SyntaxError", &agent.realm.syntax_error_prototype.clone(), construct_syntax_error);
    install_one(agent, global, "EvalError", &agent.realm.eval_error_prototype.clone(), construct_eval_error);
    install_one(agent, global, "URIError", &agent.realm.uri_error_prototype.clone(), construct_uri_error);

    // `toString` only needs to exist on `Error.prototype`; every subclass
    // prototype inherits it.
    define_method(&agent.realm.error_prototype.clone(), function_proto, "toString", 0, to_string_method);
}

fn install_one(agent: &Agent, global: &JsObject, name: &str, proto: &JsObject, ctor_fn: crate::types::function::HostFn) {
    define_value(proto, "name", Value::from_str(name), true, false, true);
    define_value(proto, "message", Value::from_str(""), true, false, true);
    define_constructor(global, agent.realm.function_prototype.clone(), name, 1, proto, ctor_fn);
}

fn to_string_method(agent: &mut Agent, this: Value, _args: &[Value], _f: CallFlags) -> Completion<Value> {
    let obj = agent.to_object(&this)?;
    let name = agent.get_property(&obj, &crate::types::PropertyKey::from_str("name"), false)?;
    let name = if name.is_undefined() { "Error".to_string() } else { crate::abstract_ops::to_string(agent, &name)?.to_string_lossy() };
    let message = agent.get_property(&obj, &crate::types::PropertyKey::from_str("message"), false)?;
    let message = if message.is_undefined() { String::new() } else { crate::abstract_ops::to_string(agent, &message)?.to_string_lossy() };
    let rendered = match (name.is_empty(), message.is_empty()) {
        (true, true) => "Error".to_string(),
        (true, false) => message,
        (false, true) => name,
        (false, false) => format!("{name}: {message}"),
    };
    Ok(Value::from_str(&rendered))
}

/// Shared body for every `Error` subclass constructor: creates a fresh
/// instance on `kind`'s prototype (ignoring `new.target` subclassing, which
/// SPEC_FULL.md §10.7 leaves out), and installs `message` if provided and
/// not `undefined` (spec.md §7 "error objects").
fn construct_with(agent: &mut Agent, args: &[Value], kind: ErrorKind) -> Completion<Value> {
    let proto = agent.realm.error_prototype_for(kind);
    let obj = JsObject::new(Some(proto), ObjectKind::Ordinary);
    let message = arg(args, 0);
    if !message.is_undefined() {
        let s = crate::abstract_ops::to_string(agent, &message)?;
        define_value(&obj, "message", Value::String(s), true, false, true);
    }
    if let Value::Object(opts) = arg(args, 1) {
        let cause_key = crate::types::PropertyKey::from_str("cause");
        if opts.get_own(&cause_key).is_some() {
            let cause = agent.get_property(&opts, &cause_key, agent.strict())?;
            define_value(&obj, "cause", cause, true, false, true);
        }
    }
    Ok(Value::Object(obj))
}

fn construct_error(agent: &mut Agent, _this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    construct_with(agent, args, ErrorKind::Generic)
}
fn construct_type_error(agent: &mut Agent, _this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    construct_with(agent, args, ErrorKind::Type)
}
fn construct_range_error(agent: &mut Agent, _this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    construct_with(agent, args, ErrorKind::Range)
}
fn construct_reference_error(agent: &mut Agent, _this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    construct_with(agent, args, ErrorKind::Reference)
}
fn construct_syntax_error(agent: &mut Agent, _this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    construct_with(agent, args, ErrorKind::Syntax)
}
fn construct_eval_error(agent: &mut Agent, _this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    construct_with(agent, args, ErrorKind::Eval)
}
fn construct_uri_error(agent: &mut Agent, _this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    construct_with(agent, args, ErrorKind::Uri)
}
