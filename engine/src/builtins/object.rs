//! `Object`, `Object.prototype`, and the static `Object.*` helpers listed
//! in SPEC_FULL.md §10.7 (grounded on the teacher's
//! `builtins/fundamental_objects/object_objects`).

use super::helpers::{arg, define_constructor, define_method, define_value};
use crate::completion::Completion;
use crate::execution::agent::Agent;
use crate::types::{JsObject, ObjectKind, PropertyDescriptor, PropertyKey, PropertyValue, Value};

pub fn install(agent: &Agent, global: &JsObject) {
    let object_proto = agent.realm.object_prototype.clone();
    let function_proto = agent.realm.function_prototype.clone();

    define_method(&object_proto, function_proto.clone(), "hasOwnProperty", 1, has_own_property);
    define_method(&object_proto, function_proto.clone(), "isPrototypeOf", 1, is_prototype_of);
    define_method(&object_proto, function_proto.clone(), "propertyIsEnumerable", 1, property_is_enumerable);
    define_method(&object_proto, function_proto.clone(), "toString", 0, to_string_method);
    define_method(&object_proto, function_proto.clone(), "toLocaleString", 0, to_string_method);
    define_method(&object_proto, function_proto.clone(), "valueOf", 0, value_of);

    let ctor = define_constructor(global, function_proto.clone(), "Object", 1, &object_proto, construct_object);
    define_method(&ctor, function_proto.clone(), "keys", 1, keys);
    define_method(&ctor, function_proto.clone(), "values", 1, values);
    define_method(&ctor, function_proto.clone(), "entries", 1, entries);
    define_method(&ctor, function_proto.clone(), "assign", 2, assign);
    define_method(&ctor, function_proto.clone(), "freeze", 1, freeze);
    define_method(&ctor, function_proto.clone(), "isFrozen", 1, is_frozen);
    define_method(&ctor, function_proto.clone(), "getPrototypeOf", 1, get_prototype_of);
    define_method(&ctor, function_proto.clone(), "setPrototypeOf", 2, set_prototype_of);
    define_method(&ctor, function_proto.clone(), "create", 2, create);
    define_method(&ctor, function_proto.clone(), "defineProperty", 3, define_property);
    define_method(&ctor, function_proto.clone(), "defineProperties", 2, define_properties);
    define_method(&ctor, function_proto.clone(), "getOwnPropertyDescriptor", 2, get_own_property_descriptor);
    define_method(&ctor, function_proto, "getOwnPropertyNames", 1, get_own_property_names);
}

fn construct_object(
    agent: &mut Agent,
    _this: Value,
    args: &[Value],
    _flags: crate::types::CallFlags,
) -> Completion<Value> {
    match arg(args, 0) {
        Value::Undefined | Value::Null => {
            Ok(Value::Object(JsObject::new(Some(agent.realm.object_prototype.clone()), ObjectKind::Ordinary)))
        }
        Value::Object(o) => Ok(Value::Object(o)),
        other => agent.to_object(&other).map(Value::Object),
    }
}

fn has_own_property(agent: &mut Agent, this: Value, args: &[Value], _f: crate::types::CallFlags) -> Completion<Value> {
    let obj = agent.to_object(&this)?;
    let key = crate::abstract_ops::to_property_key(agent, &arg(args, 0))?;
    Ok(Value::Boolean(obj.get_own(&key).is_some()))
}

fn is_prototype_of(agent: &mut Agent, this: Value, args: &[Value], _f: crate::types::CallFlags) -> Completion<Value> {
    let obj = agent.to_object(&this)?;
    match arg(args, 0) {
        Value::Object(candidate) => Ok(Value::Boolean(obj.is_prototype_of(&candidate))),
        _ => Ok(Value::Boolean(false)),
    }
}

fn property_is_enumerable(
    agent: &mut Agent,
    this: Value,
    args: &[Value],
    _f: crate::types::CallFlags,
) -> Completion<Value> {
    let obj = agent.to_object(&this)?;
    let key = crate::abstract_ops::to_property_key(agent, &arg(args, 0))?;
    Ok(Value::Boolean(obj.get_own(&key).is_some_and(|d| d.enumerable)))
}

fn to_string_method(agent: &mut Agent, this: Value, _args: &[Value], _f: crate::types::CallFlags) -> Completion<Value> {
    let tag = match &this {
        Value::Undefined => "Undefined",
        Value::Null => "Null",
        Value::Object(o) if o.is_array() => "Array",
        Value::Object(o) if o.is_callable() => "Function",
        _ => "Object",
    };
    let _ = agent.to_object(&this);
    Ok(Value::from_str(&format!("[object {tag}]")))
}

fn value_of(agent: &mut Agent, this: Value, _args: &[Value], _f: crate::types::CallFlags) -> Completion<Value> {
    agent.to_object(&this).map(Value::Object)
}

fn keys(agent: &mut Agent, _this: Value, args: &[Value], _f: crate::types::CallFlags) -> Completion<Value> {
    let obj = agent.to_object(&arg(args, 0))?;
    let values = obj
        .own_enumerable_keys()
        .into_iter()
        .filter_map(|k| match k {
            PropertyKey::String(s) => Some(Value::String(s)),
            PropertyKey::Symbol(_) => None,
        })
        .collect();
    Ok(Value::Object(crate::builtins::new_array(agent, values)))
}

fn values(agent: &mut Agent, _this: Value, args: &[Value], _f: crate::types::CallFlags) -> Completion<Value> {
    let obj = agent.to_object(&arg(args, 0))?;
    let mut out = Vec::new();
    for key in obj.own_enumerable_keys() {
        if matches!(key, PropertyKey::Symbol(_)) {
            continue;
        }
        out.push(agent.get_property(&obj, &key, agent.strict())?);
    }
    Ok(Value::Object(crate::builtins::new_array(agent, out)))
}

fn entries(agent: &mut Agent, _this: Value, args: &[Value], _f: crate::types::CallFlags) -> Completion<Value> {
    let obj = agent.to_object(&arg(args, 0))?;
    let mut out = Vec::new();
    for key in obj.own_enumerable_keys() {
        let PropertyKey::String(s) = &key else { continue };
        let v = agent.get_property(&obj, &key, agent.strict())?;
        let pair = crate::builtins::new_array(agent, vec![Value::String(s.clone()), v]);
        out.push(Value::Object(pair));
    }
    Ok(Value::Object(crate::builtins::new_array(agent, out)))
}

fn assign(agent: &mut Agent, _this: Value, args: &[Value], _f: crate::types::CallFlags) -> Completion<Value> {
    let target = agent.to_object(&arg(args, 0))?;
    for source in args.iter().skip(1) {
        if source.is_nullish() {
            continue;
        }
        let src = agent.to_object(source)?;
        for key in src.own_enumerable_keys() {
            let v = agent.get_property(&src, &key, agent.strict())?;
            agent.set_property(&target, key, v, agent.strict())?;
        }
    }
    Ok(Value::Object(target))
}

fn freeze(agent: &mut Agent, _this: Value, args: &[Value], _f: crate::types::CallFlags) -> Completion<Value> {
    let v = arg(args, 0);
    if let Value::Object(o) = &v {
        o.prevent_extensions();
        for key in o.own_keys() {
            if let Some(desc) = o.get_own(&key) {
                let frozen = match desc.value {
                    PropertyValue::Data { value, .. } => PropertyDescriptor::data(value, false, desc.enumerable, false),
                    PropertyValue::Accessor { get, set } => PropertyDescriptor::accessor(get, set, desc.enumerable, false),
                };
                let _ = o.define_own(key, frozen);
            }
        }
    }
    Ok(v)
}

fn is_frozen(_agent: &mut Agent, _this: Value, args: &[Value], _f: crate::types::CallFlags) -> Completion<Value> {
    let v = arg(args, 0);
    let Value::Object(o) = &v else { return Ok(Value::Boolean(true)) };
    if o.is_extensible() {
        return Ok(Value::Boolean(false));
    }
    let frozen = o.own_keys().into_iter().all(|k| {
        o.get_own(&k)
            .map_or(true, |d| !d.configurable && (d.is_accessor() || !d.is_writable()))
    });
    Ok(Value::Boolean(frozen))
}

fn get_prototype_of(agent: &mut Agent, _this: Value, args: &[Value], _f: crate::types::CallFlags) -> Completion<Value> {
    let obj = agent.to_object(&arg(args, 0))?;
    Ok(obj.prototype().map(Value::Object).unwrap_or(Value::Null))
}

fn set_prototype_of(agent: &mut Agent, _this: Value, args: &[Value], _f: crate::types::CallFlags) -> Completion<Value> {
    let target = arg(args, 0);
    if let Value::Object(o) = &target {
        match arg(args, 1) {
            Value::Object(p) => o.set_prototype(Some(p)),
            Value::Null => o.set_prototype(None),
            _ => return Err(agent.throw_type("Object prototype may only be an Object or null")),
        }
    }
    Ok(target)
}

fn create(agent: &mut Agent, _this: Value, args: &[Value], _f: crate::types::CallFlags) -> Completion<Value> {
    let proto = match arg(args, 0) {
        Value::Object(o) => Some(o),
        Value::Null => None,
        _ => return Err(agent.throw_type("Object prototype may only be an Object or null")),
    };
    let obj = JsObject::new(proto, ObjectKind::Ordinary);
    if let Value::Object(props) = arg(args, 1) {
        apply_property_descriptors(agent, &obj, &props)?;
    }
    Ok(Value::Object(obj))
}

fn define_property(agent: &mut Agent, _this: Value, args: &[Value], _f: crate::types::CallFlags) -> Completion<Value> {
    let target = arg(args, 0);
    let Value::Object(obj) = &target else {
        return Err(agent.throw_type("Object.defineProperty called on non-object"));
    };
    let key = crate::abstract_ops::to_property_key(agent, &arg(args, 1))?;
    let desc_obj = arg(args, 2);
    let desc = to_property_descriptor(agent, &desc_obj, obj.get_own(&key))?;
    define_own_or_raise(agent, obj, key, desc)?;
    Ok(target)
}

fn define_properties(agent: &mut Agent, _this: Value, args: &[Value], _f: crate::types::CallFlags) -> Completion<Value> {
    let target = arg(args, 0);
    let Value::Object(obj) = &target else {
        return Err(agent.throw_type("Object.defineProperties called on non-object"));
    };
    if let Value::Object(props) = arg(args, 1) {
        apply_property_descriptors(agent, obj, &props)?;
    }
    Ok(target)
}

fn apply_property_descriptors(agent: &mut Agent, obj: &JsObject, props: &JsObject) -> Completion<()> {
    for key in props.own_enumerable_keys() {
        let desc_obj = agent.get_property(props, &key, agent.strict())?;
        let desc = to_property_descriptor(agent, &desc_obj, obj.get_own(&key))?;
        define_own_or_raise(agent, obj, key, desc)?;
    }
    Ok(())
}

/// Routes `define_own`'s two failure modes per spec.md §7: a non-extensible
/// target is an ordinary `TypeError`, but defining onto an `arguments`
/// array is the "arbitrarily left unimplemented" skip signal (spec.md §8
/// "Object.defineProperty on the arguments array"), not a guest exception.
fn define_own_or_raise(
    agent: &mut Agent,
    obj: &JsObject,
    key: PropertyKey,
    desc: PropertyDescriptor,
) -> Completion<()> {
    obj.define_own(key, desc).map_err(|e| match e {
        crate::types::object::DefineError::NotExtensible => {
            agent.throw_type("Cannot define property, object is not extensible")
        }
        crate::types::object::DefineError::ArgumentsArray => {
            unimplemented_error("Object.defineProperty on an arguments object")
        }
    })
}

/// Reads a property-descriptor-shaped object into a [`PropertyDescriptor`],
/// merging onto `existing` where a field is absent (spec.md §3.2's
/// assignment semantics table). `defineProperty` on `arguments` is handled
/// by the caller: `define_own` returns `ArgumentsArray`, which is routed to
/// the "arbitrarily left unimplemented" skip signal, not a `TypeError`
/// (see DESIGN.md Open Question on `writable`).
fn to_property_descriptor(
    agent: &mut Agent,
    desc_obj: &Value,
    existing: Option<PropertyDescriptor>,
) -> Completion<PropertyDescriptor> {
    let Value::Object(d) = desc_obj else {
        return Err(agent.throw_type("Property description must be an object"));
    };
    let has = |name: &str| d.get_own(&PropertyKey::from_str(name)).is_some();
    let read_bool = |agent: &mut Agent, name: &str, default: bool| -> Completion<bool> {
        if !has(name) {
            return Ok(default);
        }
        let v = agent.get_property(d, &PropertyKey::from_str(name), agent.strict())?;
        match v {
            Value::Boolean(b) => Ok(b),
            _ => Err(agent.throw_type(format!("Property descriptor's {name} field must be a boolean"))),
        }
    };

    let has_getter = has("get");
    let has_setter = has("set");
    if (has_getter || has_setter) && has("value") {
        return Err(agent.throw_type("Invalid property descriptor. Cannot both specify accessors and a value or writable attribute"));
    }

    let enumerable = read_bool(agent, "enumerable", existing.as_ref().map(|e| e.enumerable).unwrap_or(false))?;
    let configurable = read_bool(agent, "configurable", existing.as_ref().map(|e| e.configurable).unwrap_or(false))?;

    if has_getter || has_setter {
        let get = if has_getter {
            Some(agent.get_property(d, &PropertyKey::from_str("get"), agent.strict())?)
        } else {
            existing.as_ref().and_then(|e| e.getter().cloned())
        };
        let set = if has_setter {
            Some(agent.get_property(d, &PropertyKey::from_str("set"), agent.strict())?)
        } else {
            existing.as_ref().and_then(|e| e.setter().cloned())
        };
        return Ok(PropertyDescriptor::accessor(get, set, enumerable, configurable));
    }

    let writable = read_bool(agent, "writable", existing.as_ref().map(|e| e.is_writable()).unwrap_or(false))?;
    let value = if has("value") {
        agent.get_property(d, &PropertyKey::from_str("value"), agent.strict())?
    } else {
        existing.and_then(|e| e.data_value().cloned()).unwrap_or(Value::Undefined)
    };
    Ok(PropertyDescriptor::data(value, writable, enumerable, configurable))
}

fn get_own_property_descriptor(
    agent: &mut Agent,
    _this: Value,
    args: &[Value],
    _f: crate::types::CallFlags,
) -> Completion<Value> {
    let obj = agent.to_object(&arg(args, 0))?;
    let key = crate::abstract_ops::to_property_key(agent, &arg(args, 1))?;
    match obj.get_own(&key) {
        None => Ok(Value::Undefined),
        Some(desc) => {
            let out = JsObject::new(Some(agent.realm.object_prototype.clone()), ObjectKind::Ordinary);
            match desc.value {
                PropertyValue::Data { value, writable } => {
                    define_value(&out, "value", value, true, true, true);
                    define_value(&out, "writable", Value::Boolean(writable), true, true, true);
                }
                PropertyValue::Accessor { get, set } => {
                    define_value(&out, "get", get.unwrap_or(Value::Undefined), true, true, true);
                    define_value(&out, "set", set.unwrap_or(Value::Undefined), true, true, true);
                }
            }
            define_value(&out, "enumerable", Value::Boolean(desc.enumerable), true, true, true);
            define_value(&out, "configurable", Value::Boolean(desc.configurable), true, true, true);
            Ok(Value::Object(out))
        }
    }
}

fn get_own_property_names(agent: &mut Agent, _this: Value, args: &[Value], _f: crate::types::CallFlags) -> Completion<Value> {
    let obj = agent.to_object(&arg(args, 0))?;
    let values = obj
        .own_keys()
        .into_iter()
        .filter_map(|k| match k {
            PropertyKey::String(s) => Some(Value::String(s)),
            PropertyKey::Symbol(_) => None,
        })
        .collect();
    Ok(Value::Object(crate::builtins::new_array(agent, values)))
}

/// The "arbitrarily left unimplemented" skip signal of spec.md §7 for a
/// narrow built-in corner (e.g. `defineProperty` on an `arguments` object).
/// Distinct from `agent.throw_type`: this must reach the driver as a skip,
/// not a guest `TypeError`, so it builds `Abrupt::Unimplemented` directly.
pub fn unimplemented_error(what: &str) -> crate::completion::Abrupt {
    crate::completion::Abrupt::Unimplemented(what.to_string())
}

#[cfg(test)]
mod tests {
    use crate::execution::agent::{Agent, FailureKind};

    #[test]
    fn define_property_on_arguments_object_is_reported_unimplemented_not_type_error() {
        let mut agent = Agent::new();
        let outcome = agent.run_script(
            "<test>",
            "function f() { Object.defineProperty(arguments, '0', { value: 1 }); } f(9);",
        );
        assert!(!outcome.success);
        assert_eq!(outcome.kind, Some(FailureKind::Unimplemented));
    }

    #[test]
    fn define_property_on_non_extensible_object_is_a_type_error() {
        let mut agent = Agent::new();
        let outcome = agent.run_script(
            "<test>",
            "var o = {}; Object.freeze(o); Object.defineProperty(o, 'p', { value: 1 });",
        );
        assert!(!outcome.success);
        assert_eq!(outcome.kind, Some(FailureKind::VmException));
        assert_eq!(outcome.program_exception_name.as_deref(), Some("TypeError"));
    }

    #[test]
    fn non_boolean_writable_in_a_descriptor_raises_type_error_instead_of_coercing() {
        let mut agent = Agent::new();
        let outcome = agent.run_script(
            "<test>",
            "Object.defineProperty({}, 'p', { value: 1, writable: 'yes' });",
        );
        assert!(!outcome.success);
        assert_eq!(outcome.program_exception_name.as_deref(), Some("TypeError"));
    }
}
