//! The built-in object layer (spec.md §1, "primitive wrappers / errors /
//! function machinery / regex host bridge"): bootstraps a [`Realm`] and
//! wires every constructor/prototype onto its global object, grounded on
//! the teacher's `builtins/` tree (one submodule per built-in family,
//! each exposing an `install(agent, global)`).
//!
//! Bootstrapping is a chicken-and-egg problem: every `install` function
//! reads `agent.realm.*_prototype` fields, but those prototypes have to
//! exist *before* any `Agent` can be built the normal way
//! (`Agent::new` itself calls [`initialize_realm`]). `initialize_realm`
//! instead assembles a bare `Realm` by hand (every prototype object, the
//! global object/scope, no constructors yet), wraps it in a throwaway
//! `Agent` via `Agent::from_realm`, runs every `install` against that
//! agent, then hands the finished `realm` back out.

use crate::execution::agent::Agent;
use crate::execution::realm::Realm;
use crate::execution::scope;
use crate::types::function::{CallFlags, FunctionData, HostFunctionData};
use crate::types::symbol::well_known_to_primitive_description;
use crate::types::{JsObject, JsSymbol, ObjectKind, PropertyDescriptor, PropertyKey, Value};

pub mod array;
pub mod bigint_obj;
pub mod boolean_obj;
pub mod error;
pub mod eval_fn;
pub mod function_ctor;
pub mod global;
mod helpers;
pub mod json;
pub mod math;
pub mod number_obj;
pub mod object;
pub mod regexp;
pub mod string_obj;
pub mod symbol_obj;

pub use array::new_array;

pub fn initialize_realm() -> Realm {
    let object_prototype = JsObject::new(None, ObjectKind::Ordinary);

    let function_prototype = JsObject::new(
        Some(object_prototype.clone()),
        ObjectKind::Function(FunctionData::Host(HostFunctionData {
            name: crate::types::JsString::from_str(""),
            func: noop_call,
            constructable: false,
        })),
    );

    let array_prototype = JsObject::new(Some(object_prototype.clone()), ObjectKind::Array { elements: Vec::new() });
    let string_prototype = JsObject::new(
        Some(object_prototype.clone()),
        ObjectKind::PrimitiveWrapper(Value::from_str("")),
    );
    let number_prototype = JsObject::new(
        Some(object_prototype.clone()),
        ObjectKind::PrimitiveWrapper(Value::Number(0.0)),
    );
    let boolean_prototype = JsObject::new(
        Some(object_prototype.clone()),
        ObjectKind::PrimitiveWrapper(Value::Boolean(false)),
    );
    let bigint_prototype = JsObject::new(Some(object_prototype.clone()), ObjectKind::Ordinary);
    let symbol_prototype = JsObject::new(Some(object_prototype.clone()), ObjectKind::Ordinary);
    let regexp_prototype = JsObject::new(Some(object_prototype.clone()), ObjectKind::Ordinary);

    let error_prototype = JsObject::new(Some(object_prototype.clone()), ObjectKind::Ordinary);
    let type_error_prototype = JsObject::new(Some(error_prototype.clone()), ObjectKind::Ordinary);
    let range_error_prototype = JsObject::new(Some(error_prototype.clone()), ObjectKind::Ordinary);
    let reference_error_prototype = JsObject::new(Some(error_prototype.clone()), ObjectKind::Ordinary);
    let syntax_error_prototype = JsObject::new(Some(error_prototype.clone()), ObjectKind::Ordinary);
    let eval_error_prototype = JsObject::new(Some(error_prototype.clone()), ObjectKind::Ordinary);
    let uri_error_prototype = JsObject::new(Some(error_prototype.clone()), ObjectKind::Ordinary);

    let to_primitive_symbol = JsSymbol::new(Some(well_known_to_primitive_description()));

    let global_object = JsObject::new(Some(object_prototype.clone()), ObjectKind::Ordinary);
    let global_scope = scope::new_object_backed_scope(None, global_object.clone(), false);

    let eval_function = JsObject::new(
        Some(function_prototype.clone()),
        ObjectKind::Function(FunctionData::Host(HostFunctionData {
            name: crate::types::JsString::from_str("eval"),
            func: indirect_eval_call,
            constructable: false,
        })),
    );

    let realm = Realm {
        global_object,
        global_scope,
        object_prototype,
        function_prototype,
        array_prototype,
        string_prototype,
        number_prototype,
        boolean_prototype,
        bigint_prototype,
        symbol_prototype,
        regexp_prototype,
        error_prototype,
        type_error_prototype,
        range_error_prototype,
        reference_error_prototype,
        syntax_error_prototype,
        eval_error_prototype,
        uri_error_prototype,
        to_primitive_symbol,
        eval_function,
    };

    let mut agent = Agent::from_realm(realm);
    let global = agent.realm.global_object.clone();

    object::install(&agent, &global);
    function_ctor::install(&agent, &global);
    error::install(&agent, &global);
    array::install(&agent, &global);
    string_obj::install(&agent, &global);
    number_obj::install(&agent, &global);
    boolean_obj::install(&agent, &global);
    bigint_obj::install(&agent, &global);
    symbol_obj::install(&agent, &global);
    math::install(&agent, &global);
    regexp::install(&agent, &global);
    json::install(&agent, &global);
    global::install(&agent, &global);
    install_global_values(&agent, &global);

    agent.realm
}

/// `NaN`/`Infinity`/`undefined`: non-writable, non-enumerable,
/// non-configurable own properties of the global object whose assignment
/// is silently discarded rather than throwing even in strict mode
/// (spec.md §3.2 assignment semantics item 3). `eval` is installed here
/// too, as the realm's one true `eval_function` object.
fn install_global_values(agent: &Agent, global: &JsObject) {
    let pinned = |value: Value| PropertyDescriptor {
        value: crate::types::PropertyValue::Data { value, writable: false },
        enumerable: false,
        configurable: false,
        discard_on_nonwritable: true,
    };
    let _ = global.define_own(PropertyKey::from_str("NaN"), pinned(Value::Number(f64::NAN)));
    let _ = global.define_own(PropertyKey::from_str("Infinity"), pinned(Value::Number(f64::INFINITY)));
    let _ = global.define_own(PropertyKey::from_str("undefined"), pinned(Value::Undefined));
    let _ = global.define_own(
        PropertyKey::from_str("eval"),
        PropertyDescriptor::data(Value::Object(agent.realm.eval_function.clone()), true, false, true),
    );
}

fn noop_call(_agent: &mut Agent, _this: Value, _args: &[Value], _flags: CallFlags) -> crate::completion::Completion<Value> {
    Ok(Value::Undefined)
}

/// Body of the realm's `eval_function` object: reached whenever `eval` is
/// called other than through a bare identifier in call position (spec.md
/// §4.5 "direct eval" is special-cased in `eval::expr::eval_eval_call`
/// before this is ever invoked; this path is always indirect).
fn indirect_eval_call(agent: &mut Agent, _this: Value, args: &[Value], _flags: CallFlags) -> crate::completion::Completion<Value> {
    match args.first() {
        Some(Value::String(s)) => eval_fn::perform_eval(agent, &s.to_string_lossy(), false),
        Some(other) => Ok(other.clone()),
        None => Ok(Value::Undefined),
    }
}
