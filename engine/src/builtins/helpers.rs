//! Small constructors shared by every built-in module: wrapping a Rust
//! function pointer as a host-defined callable (spec.md §4.2), and wiring
//! a constructor function to its `.prototype` / `.prototype.constructor`
//! pair the way the hoister/evaluator expect to find them (spec.md §4.2
//! "Constructors").

use crate::execution::agent::Agent;
use crate::types::function::{HostFn, HostFunctionData};
use crate::types::{FunctionData, JsObject, JsString, ObjectKind, PropertyDescriptor, PropertyKey, Value};

/// A host-defined function object, not (yet) attached anywhere.
pub fn new_host_fn(proto: JsObject, name: &str, len: u32, constructable: bool, f: HostFn) -> JsObject {
    let obj = JsObject::new(
        Some(proto),
        ObjectKind::Function(FunctionData::Host(HostFunctionData {
            name: JsString::from_str(name),
            func: f,
            constructable,
        })),
    );
    let _ = obj.define_own(
        PropertyKey::from_str("length"),
        PropertyDescriptor::data(Value::Number(len as f64), false, false, true),
    );
    let _ = obj.define_own(
        PropertyKey::from_str("name"),
        PropertyDescriptor::data(Value::from_str(name), false, false, true),
    );
    obj
}

/// Defines a non-constructable method `name` on `obj`, as an own,
/// writable, non-enumerable, configurable data property (the shape every
/// built-in prototype method has).
pub fn define_method(obj: &JsObject, func_proto: JsObject, name: &str, len: u32, f: HostFn) {
    let func = new_host_fn(func_proto, name, len, false, f);
    let _ = obj.define_own(
        PropertyKey::from_str(name),
        PropertyDescriptor::data(Value::Object(func), true, false, true),
    );
}

pub fn define_value(obj: &JsObject, name: &str, value: Value, writable: bool, enumerable: bool, configurable: bool) {
    let _ = obj.define_own(
        PropertyKey::from_str(name),
        PropertyDescriptor::data(value, writable, enumerable, configurable),
    );
}

pub fn define_accessor(obj: &JsObject, name: &str, func_proto: JsObject, getter_name: &str, f: HostFn) {
    let getter = new_host_fn(func_proto, getter_name, 0, false, f);
    let _ = obj.define_own(
        PropertyKey::from_str(name),
        PropertyDescriptor::accessor(Some(Value::Object(getter)), None, false, true),
    );
}

/// Installs a constructor on `global`, wires `ctor.prototype` (non-writable,
/// non-enumerable, non-configurable — every built-in's `.prototype` is
/// pinned this way) and `proto.constructor` back to it (spec.md §4.2).
pub fn define_constructor(
    global: &JsObject,
    func_proto: JsObject,
    name: &str,
    len: u32,
    proto: &JsObject,
    f: HostFn,
) -> JsObject {
    let ctor = new_host_fn(func_proto, name, len, true, f);
    let _ = ctor.define_own(
        PropertyKey::from_str("prototype"),
        PropertyDescriptor::data(Value::Object(proto.clone()), false, false, false),
    );
    let _ = proto.define_own(
        PropertyKey::from_str("constructor"),
        PropertyDescriptor::data(Value::Object(ctor.clone()), true, false, true),
    );
    let _ = global.define_own(
        PropertyKey::from_str(name),
        PropertyDescriptor::data(Value::Object(ctor.clone()), true, false, true),
    );
    ctor
}

/// `args.get(i)`, defaulting to `undefined` the way every built-in reads
/// an optional argument (spec.md §4.2 call protocol).
pub fn arg(args: &[Value], i: usize) -> Value {
    args.get(i).cloned().unwrap_or(Value::Undefined)
}

pub fn this_object(agent: &mut Agent, this: &Value) -> crate::completion::Completion<JsObject> {
    agent.to_object(this)
}
