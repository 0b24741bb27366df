//! `RegExp`, `RegExp.prototype`, and the `test`/`exec` methods that drive
//! the matcher built in [`crate::types::regexp`] (spec.md §1, §9 "Regex
//! delegation"), grounded on the teacher's
//! `builtins/text_processing/regexp_objects`.

use std::rc::Rc;

use super::helpers::{arg, define_constructor, define_method, define_value};
use crate::abstract_ops::to_string;
use crate::completion::Completion;
use crate::execution::agent::Agent;
use crate::types::regexp::RegexpData;
use crate::types::{CallFlags, JsObject, JsString, ObjectKind, PropertyDescriptor, PropertyKey, Value};

/// Used directly by a regex literal's evaluation (spec.md §4.4) and by the
/// `RegExp` constructor below.
pub fn new_regexp(agent: &Agent, pattern: Rc<str>, flags: Rc<str>) -> JsObject {
    let source = JsString::from_str(&pattern);
    let flags_str = JsString::from_str(&flags);
    let data = RegexpData::new(source.clone(), flags_str.clone());
    let global = data.global;
    let ignore_case = data.ignore_case;
    let multiline = data.multiline;
    let obj = JsObject::new(Some(agent.realm.regexp_prototype.clone()), ObjectKind::Regexp(data));
    define_value(&obj, "source", Value::String(source), false, false, false);
    define_value(&obj, "flags", Value::String(flags_str), false, false, false);
    define_value(&obj, "global", Value::Boolean(global), false, false, false);
    define_value(&obj, "ignoreCase", Value::Boolean(ignore_case), false, false, false);
    define_value(&obj, "multiline", Value::Boolean(multiline), false, false, false);
    define_value(&obj, "lastIndex", Value::Number(0.0), true, false, false);
    obj
}

pub fn install(agent: &Agent, global: &JsObject) {
    let regexp_proto = agent.realm.regexp_prototype.clone();
    let function_proto = agent.realm.function_prototype.clone();

    define_method(&regexp_proto, function_proto.clone(), "exec", 1, exec_method);
    define_method(&regexp_proto, function_proto.clone(), "test", 1, test_method);
    define_method(&regexp_proto, function_proto.clone(), "toString", 0, to_string_method);

    define_constructor(global, function_proto, "RegExp", 2, &regexp_proto, construct_regexp);
}

fn construct_regexp(agent: &mut Agent, _this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let pattern_arg = arg(args, 0);
    let (pattern, default_flags) = match &pattern_arg {
        Value::Object(o) if o.regexp_data().is_some() => {
            let data = o.regexp_data().unwrap();
            (data.source.to_string_lossy(), data.flags.to_string_lossy())
        }
        Value::Undefined => (String::new(), String::new()),
        other => (to_string(agent, other)?.to_string_lossy(), String::new()),
    };
    let flags_arg = arg(args, 1);
    let flags = if flags_arg.is_undefined() {
        default_flags
    } else {
        to_string(agent, &flags_arg)?.to_string_lossy()
    };
    Ok(Value::Object(new_regexp(agent, Rc::from(pattern.as_str()), Rc::from(flags.as_str()))))
}

fn require_regexp(agent: &mut Agent, this: &Value) -> Completion<JsObject> {
    match this {
        Value::Object(o) if o.regexp_data().is_some() => Ok(o.clone()),
        _ => Err(agent.throw_type("method called on incompatible receiver")),
    }
}

fn last_index_of(agent: &mut Agent, obj: &JsObject) -> Completion<usize> {
    match agent.get_property(obj, &PropertyKey::from_str("lastIndex"), false)? {
        Value::Number(n) if n.is_finite() && n >= 0.0 => Ok(n as usize),
        _ => Ok(0),
    }
}

fn set_last_index(agent: &mut Agent, obj: &JsObject, value: usize) -> Completion<()> {
    agent.set_property(obj, PropertyKey::from_str("lastIndex"), Value::Number(value as f64), false)
}

/// `RegExp.prototype.exec` (spec.md §1): returns a result array with
/// `index`/`input` own properties, or `null`. Only global-flag `lastIndex`
/// tracking is modeled; named/numbered capture groups beyond the whole
/// match are out of scope.
fn exec_method(agent: &mut Agent, this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let obj = require_regexp(agent, &this)?;
    let data = obj.regexp_data().unwrap();
    let input = to_string(agent, &arg(args, 0))?.to_string_lossy();
    let start = if data.global { last_index_of(agent, &obj)? } else { 0 };

    if start > input.len() {
        if data.global {
            set_last_index(agent, &obj, 0)?;
        }
        return Ok(Value::Null);
    }

    let found = data.matcher.as_ref().and_then(|re| re.find_at(&input, start));
    match found {
        Some(m) => {
            if data.global {
                let advance = if m.end() > m.start() { m.end() } else { m.end() + 1 };
                set_last_index(agent, &obj, advance)?;
            }
            let matched = crate::builtins::new_array(agent, vec![Value::from_str(m.as_str())]);
            let _ = matched.define_own(
                PropertyKey::from_str("index"),
                PropertyDescriptor::data(Value::Number(m.start() as f64), true, true, true),
            );
            let _ = matched.define_own(
                PropertyKey::from_str("input"),
                PropertyDescriptor::data(Value::from_str(&input), true, true, true),
            );
            Ok(Value::Object(matched))
        }
        None => {
            if data.global {
                set_last_index(agent, &obj, 0)?;
            }
            Ok(Value::Null)
        }
    }
}

fn test_method(agent: &mut Agent, this: Value, args: &[Value], f: CallFlags) -> Completion<Value> {
    match exec_method(agent, this, args, f)? {
        Value::Null => Ok(Value::Boolean(false)),
        _ => Ok(Value::Boolean(true)),
    }
}

fn to_string_method(agent: &mut Agent, this: Value, _args: &[Value], _f: CallFlags) -> Completion<Value> {
    let obj = require_regexp(agent, &this)?;
    let data = obj.regexp_data().unwrap();
    Ok(Value::from_str(&format!("/{}/{}", data.source, data.flags)))
}
