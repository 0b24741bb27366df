//! `JSON.parse`/`JSON.stringify` (SPEC_FULL.md §10.7), hand-rolled against
//! the [`Value`] model directly rather than routed through `serde_json`:
//! `JSON.parse` builds `Value`s itself; `JSON.stringify` walks property
//! lists with `own_enumerable_keys`, the same traversal `Object.keys` uses.
//! Grounded on the teacher's `builtins/text_processing/json_object`, scaled
//! down to the subset SPEC_FULL.md keeps (no replacer/reviver functions,
//! no `space` indentation).

use super::helpers::{arg, define_method};
use crate::completion::Completion;
use crate::execution::agent::Agent;
use crate::types::{CallFlags, JsObject, ObjectKind, PropertyKey, Value};

pub fn install(agent: &Agent, global: &JsObject) {
    let function_proto = agent.realm.function_prototype.clone();
    let json_obj = JsObject::new(Some(agent.realm.object_prototype.clone()), ObjectKind::Ordinary);
    define_method(&json_obj, function_proto.clone(), "parse", 2, json_parse);
    define_method(&json_obj, function_proto, "stringify", 3, json_stringify);
    let _ = global.define_own(
        PropertyKey::from_str("JSON"),
        crate::types::PropertyDescriptor::data(Value::Object(json_obj), true, false, true),
    );
}

fn json_parse(agent: &mut Agent, _this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    let text = crate::abstract_ops::to_string(agent, &arg(args, 0))?.to_string_lossy();
    let mut parser = Parser { bytes: text.as_bytes(), pos: 0 };
    parser.skip_ws();
    let value = parser
        .parse_value(agent)
        .ok_or_else(|| agent.throw_error(crate::execution::realm::ErrorKind::Syntax, "Unexpected token in JSON"))?;
    parser.skip_ws();
    if parser.pos != parser.bytes.len() {
        return Err(agent.throw_error(crate::execution::realm::ErrorKind::Syntax, "Unexpected non-whitespace character after JSON"));
    }
    Ok(value)
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn eat_literal(&mut self, lit: &str) -> bool {
        if self.bytes[self.pos..].starts_with(lit.as_bytes()) {
            self.pos += lit.len();
            true
        } else {
            false
        }
    }

    fn parse_value(&mut self, agent: &mut Agent) -> Option<Value> {
        self.skip_ws();
        match self.peek()? {
            b'{' => self.parse_object(agent),
            b'[' => self.parse_array(agent),
            b'"' => self.parse_string().map(Value::String),
            b't' if self.eat_literal("true") => Some(Value::Boolean(true)),
            b'f' if self.eat_literal("false") => Some(Value::Boolean(false)),
            b'n' if self.eat_literal("null") => Some(Value::Null),
            b'-' | b'0'..=b'9' => self.parse_number(),
            _ => None,
        }
    }

    fn parse_number(&mut self) -> Option<Value> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        if self.peek() == Some(b'.') {
            self.pos += 1;
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.pos += 1;
            }
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                self.pos += 1;
            }
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos]).ok()?;
        text.parse::<f64>().ok().map(Value::Number)
    }

    fn parse_string(&mut self) -> Option<crate::types::JsString> {
        self.pos += 1;
        let mut units: Vec<u16> = Vec::new();
        loop {
            match self.peek()? {
                b'"' => {
                    self.pos += 1;
                    return Some(crate::types::JsString::from_units(units));
                }
                b'\\' => {
                    self.pos += 1;
                    match self.peek()? {
                        b'"' => units.push(u16::from(b'"')),
                        b'\\' => units.push(u16::from(b'\\')),
                        b'/' => units.push(u16::from(b'/')),
                        b'b' => units.push(0x08),
                        b'f' => units.push(0x0c),
                        b'n' => units.push(u16::from(b'\n')),
                        b'r' => units.push(u16::from(b'\r')),
                        b't' => units.push(u16::from(b'\t')),
                        b'u' => {
                            let hex = std::str::from_utf8(self.bytes.get(self.pos + 1..self.pos + 5)?).ok()?;
                            let code = u16::from_str_radix(hex, 16).ok()?;
                            units.push(code);
                            self.pos += 4;
                        }
                        _ => return None,
                    }
                    self.pos += 1;
                }
                _ => {
                    let rest = std::str::from_utf8(&self.bytes[self.pos..]).ok()?;
                    let ch = rest.chars().next()?;
                    let mut buf = [0u16; 2];
                    units.extend_from_slice(ch.encode_utf16(&mut buf));
                    self.pos += ch.len_utf8();
                }
            }
        }
    }

    fn parse_array(&mut self, agent: &mut Agent) -> Option<Value> {
        self.pos += 1;
        let mut elements = Vec::new();
        self.skip_ws();
        if self.peek() == Some(b']') {
            self.pos += 1;
            return Some(Value::Object(super::new_array(agent, elements)));
        }
        loop {
            elements.push(self.parse_value(agent)?);
            self.skip_ws();
            match self.peek()? {
                b',' => {
                    self.pos += 1;
                }
                b']' => {
                    self.pos += 1;
                    break;
                }
                _ => return None,
            }
        }
        Some(Value::Object(super::new_array(agent, elements)))
    }

    fn parse_object(&mut self, agent: &mut Agent) -> Option<Value> {
        self.pos += 1;
        let obj = JsObject::new(Some(agent.realm.object_prototype.clone()), ObjectKind::Ordinary);
        self.skip_ws();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            return Some(Value::Object(obj));
        }
        loop {
            self.skip_ws();
            if self.peek() != Some(b'"') {
                return None;
            }
            let key = self.parse_string()?;
            self.skip_ws();
            if self.peek() != Some(b':') {
                return None;
            }
            self.pos += 1;
            let value = self.parse_value(agent)?;
            let _ = obj.define_own(
                PropertyKey::String(key),
                crate::types::PropertyDescriptor::data(value, true, true, true),
            );
            self.skip_ws();
            match self.peek()? {
                b',' => {
                    self.pos += 1;
                }
                b'}' => {
                    self.pos += 1;
                    break;
                }
                _ => return None,
            }
        }
        Some(Value::Object(obj))
    }
}

fn json_stringify(agent: &mut Agent, _this: Value, args: &[Value], _f: CallFlags) -> Completion<Value> {
    match stringify_value(agent, &arg(args, 0))? {
        Some(s) => Ok(Value::from_str(&s)),
        None => Ok(Value::Undefined),
    }
}

/// `None` means the value has no JSON representation (`undefined`,
/// functions, `Symbol`) and is omitted the way `JSON.stringify` drops
/// such object properties and array holes become `null` at the call site.
fn stringify_value(agent: &mut Agent, value: &Value) -> Completion<Option<String>> {
    match value {
        Value::Undefined => Ok(None),
        Value::Null => Ok(Some("null".to_string())),
        Value::Boolean(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(if n.is_finite() { crate::types::number::number_to_string(*n) } else { "null".to_string() })),
        Value::String(s) => Ok(Some(quote_string(&s.to_string_lossy()))),
        Value::BigInt(_) => Err(agent.throw_type("Do not know how to serialize a BigInt")),
        Value::Symbol(_) => Ok(None),
        Value::Object(o) if o.is_callable() => Ok(None),
        Value::Object(o) if o.is_array() => {
            let elements = o.array_elements().unwrap_or_default();
            let mut parts = Vec::with_capacity(elements.len());
            for el in &elements {
                parts.push(stringify_value(agent, el)?.unwrap_or_else(|| "null".to_string()));
            }
            Ok(Some(format!("[{}]", parts.join(","))))
        }
        Value::Object(o) => {
            let mut parts = Vec::new();
            for key in o.own_enumerable_keys() {
                let PropertyKey::String(k) = &key else { continue };
                let v = agent.get_property(o, &key, agent.strict())?;
                if let Some(rendered) = stringify_value(agent, &v)? {
                    parts.push(format!("{}:{}", quote_string(&k.to_string_lossy()), rendered));
                }
            }
            Ok(Some(format!("{{{}}}", parts.join(","))))
        }
    }
}

fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
