//! The object store (spec.md §3.2, §4.1): property descriptors, the
//! prototype chain, and get/set/define/delete operations.

use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

use super::function::FunctionData;
use super::string::JsString;
use super::symbol::JsSymbol;
use super::value::Value;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    String(JsString),
    Symbol(JsSymbol),
}

impl PropertyKey {
    pub fn from_str(s: &str) -> Self {
        PropertyKey::String(JsString::from_str(s))
    }

    /// A property key that is itself a canonical numeric index string
    /// (`"0"`, `"1"`, ...), used by array index fast paths and by
    /// `own_enumerable_keys` ordering (numeric indices before string keys).
    pub fn as_array_index(&self) -> Option<u32> {
        match self {
            PropertyKey::String(s) => {
                let text = s.as_ascii_str()?;
                if text == "0" {
                    return Some(0);
                }
                if text.starts_with('0') || text.is_empty() {
                    return None;
                }
                text.parse::<u32>().ok()
            }
            PropertyKey::Symbol(_) => None,
        }
    }
}

impl std::fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyKey::String(s) => write!(f, "{s}"),
            PropertyKey::Symbol(s) => {
                write!(f, "Symbol({})", s.0.description.as_ref().map(|d| d.to_string_lossy()).unwrap_or_default())
            }
        }
    }
}

/// Either a data value or an accessor pair, never both (spec.md §3.2).
#[derive(Debug, Clone)]
pub enum PropertyValue {
    Data { value: Value, writable: bool },
    Accessor { get: Option<Value>, set: Option<Value> },
}

#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    pub value: PropertyValue,
    pub enumerable: bool,
    pub configurable: bool,
    /// Pinned globals such as `NaN` and `undefined` are non-writable data
    /// properties whose assignment is silently discarded rather than
    /// raising `TypeError` (spec.md §3.2, assignment semantics item 3).
    pub discard_on_nonwritable: bool,
}

impl PropertyDescriptor {
    pub fn data(value: Value, writable: bool, enumerable: bool, configurable: bool) -> Self {
        PropertyDescriptor {
            value: PropertyValue::Data { value, writable },
            enumerable,
            configurable,
            discard_on_nonwritable: false,
        }
    }

    pub fn accessor(
        get: Option<Value>,
        set: Option<Value>,
        enumerable: bool,
        configurable: bool,
    ) -> Self {
        PropertyDescriptor {
            value: PropertyValue::Accessor { get, set },
            enumerable,
            configurable,
            discard_on_nonwritable: false,
        }
    }

    pub fn is_accessor(&self) -> bool {
        matches!(self.value, PropertyValue::Accessor { .. })
    }

    pub fn getter(&self) -> Option<&Value> {
        match &self.value {
            PropertyValue::Accessor { get, .. } => get.as_ref(),
            _ => None,
        }
    }

    pub fn setter(&self) -> Option<&Value> {
        match &self.value {
            PropertyValue::Accessor { set, .. } => set.as_ref(),
            _ => None,
        }
    }

    pub fn data_value(&self) -> Option<&Value> {
        match &self.value {
            PropertyValue::Data { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn is_writable(&self) -> bool {
        matches!(self.value, PropertyValue::Data { writable: true, .. })
    }
}

#[derive(Debug)]
pub enum ObjectKind {
    Ordinary,
    Array { elements: Vec<Value> },
    /// A wrapped primitive, for `Number`/`String`/`Boolean`/`BigInt`/
    /// `Symbol` wrapper objects (spec.md §3.2).
    PrimitiveWrapper(Value),
    Function(FunctionData),
    Regexp(super::regexp::RegexpData),
}

#[derive(Debug)]
pub struct ObjectData {
    pub prototype: Option<JsObject>,
    pub properties: IndexMap<PropertyKey, PropertyDescriptor>,
    pub extensible: bool,
    pub kind: ObjectKind,
    /// Set on wrapper objects synthesized by implicit primitive→object
    /// coercion; affects accessor-receiver resolution in strict mode
    /// (spec.md §3.2, §4.1, §9).
    pub created_from_coercion: bool,
    /// Set on a call's `arguments` synthetic array; rejects
    /// `defineProperty` (spec.md §3.2).
    pub is_args_array: bool,
}

impl ObjectData {
    pub fn new(prototype: Option<JsObject>, kind: ObjectKind) -> Self {
        ObjectData {
            prototype,
            properties: IndexMap::new(),
            extensible: true,
            kind,
            created_from_coercion: false,
            is_args_array: false,
        }
    }
}

/// A handle to a heap object record. Equality is reference identity
/// (spec.md §3.1): two `JsObject`s are the `==` value only when they share
/// the same underlying allocation.
#[derive(Debug, Clone)]
pub struct JsObject(pub Rc<RefCell<ObjectData>>);

impl JsObject {
    pub fn new(prototype: Option<JsObject>, kind: ObjectKind) -> Self {
        JsObject(Rc::new(RefCell::new(ObjectData::new(prototype, kind))))
    }

    pub fn ptr_eq(&self, other: &JsObject) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Own-property lookup only; does not walk the prototype chain.
    pub fn get_own(&self, key: &PropertyKey) -> Option<PropertyDescriptor> {
        if let Some(idx) = key.as_array_index() {
            if let ObjectKind::Array { elements } = &self.0.borrow().kind {
                if let Some(v) = elements.get(idx as usize) {
                    return Some(PropertyDescriptor::data(v.clone(), true, true, true));
                }
                return None;
            }
        }
        if matches!(key, PropertyKey::String(s) if s.to_string_lossy() == "length") {
            if let ObjectKind::Array { elements } = &self.0.borrow().kind {
                let len = elements.len() as f64;
                return Some(PropertyDescriptor::data(Value::Number(len), true, false, false));
            }
        }
        self.0.borrow().properties.get(key).cloned()
    }

    /// Prototype-chain walk: own property if present, else the nearest
    /// ancestor's (spec.md §4.1).
    pub fn get_descriptor(&self, key: &PropertyKey) -> Option<(JsObject, PropertyDescriptor)> {
        if let Some(d) = self.get_own(key) {
            return Some((self.clone(), d));
        }
        let proto = self.0.borrow().prototype.clone();
        proto.and_then(|p| p.get_descriptor(key))
    }

    pub fn own_keys(&self) -> Vec<PropertyKey> {
        let data = self.0.borrow();
        let mut keys = Vec::new();
        if let ObjectKind::Array { elements } = &data.kind {
            for i in 0..elements.len() {
                keys.push(PropertyKey::from_str(&i.to_string()));
            }
            keys.push(PropertyKey::from_str("length"));
        }
        keys.extend(data.properties.keys().cloned());
        keys
    }

    /// Own enumerable keys, numeric indices first (ascending), then string
    /// keys, then symbols, all in insertion order within their group
    /// (spec.md §4.1 array override, §5 ordering guarantees).
    pub fn own_enumerable_keys(&self) -> Vec<PropertyKey> {
        let data = self.0.borrow();
        let mut numeric = Vec::new();
        let mut strings = Vec::new();
        let mut symbols = Vec::new();
        if let ObjectKind::Array { elements } = &data.kind {
            for i in 0..elements.len() {
                numeric.push(PropertyKey::from_str(&i.to_string()));
            }
        }
        for (k, d) in data.properties.iter() {
            if !d.enumerable {
                continue;
            }
            match k {
                PropertyKey::String(_) if k.as_array_index().is_some() => numeric.push(k.clone()),
                PropertyKey::String(_) => strings.push(k.clone()),
                PropertyKey::Symbol(_) => symbols.push(k.clone()),
            }
        }
        numeric.sort_by_key(|k| k.as_array_index().unwrap());
        numeric.extend(strings);
        numeric.extend(symbols);
        numeric
    }

    pub fn is_prototype_of(&self, candidate: &JsObject) -> bool {
        let mut current = candidate.0.borrow().prototype.clone();
        while let Some(proto) = current {
            if proto.ptr_eq(self) {
                return true;
            }
            current = proto.0.borrow().prototype.clone();
        }
        false
    }

    pub fn shallow_copy(&self) -> JsObject {
        let data = self.0.borrow();
        let kind = match &data.kind {
            ObjectKind::Array { elements } => ObjectKind::Array {
                elements: elements.clone(),
            },
            ObjectKind::Ordinary => ObjectKind::Ordinary,
            ObjectKind::PrimitiveWrapper(v) => ObjectKind::PrimitiveWrapper(v.clone()),
            ObjectKind::Function(f) => ObjectKind::Function(f.clone()),
            ObjectKind::Regexp(r) => ObjectKind::Regexp(r.clone()),
        };
        let mut copy = ObjectData::new(data.prototype.clone(), kind);
        copy.properties = data.properties.clone();
        copy.extensible = data.extensible;
        JsObject(Rc::new(RefCell::new(copy)))
    }

    /// Defines an own property directly, bypassing setter dispatch. Used by
    /// built-in setup and by `Object.defineProperty`. Rejects writes on
    /// non-extensible objects adding new keys, and on `arguments` objects
    /// (spec.md §3.2).
    pub fn define_own(&self, key: PropertyKey, desc: PropertyDescriptor) -> Result<(), DefineError> {
        let mut data = self.0.borrow_mut();
        if data.is_args_array {
            return Err(DefineError::ArgumentsArray);
        }
        if !data.properties.contains_key(&key) && !data.extensible {
            return Err(DefineError::NotExtensible);
        }
        data.properties.insert(key, desc);
        Ok(())
    }

    pub fn delete_own(&self, key: &PropertyKey) -> bool {
        let mut data = self.0.borrow_mut();
        match data.properties.get(key) {
            Some(d) if !d.configurable => false,
            Some(_) => {
                data.properties.shift_remove(key);
                true
            }
            None => {
                if let Some(idx) = key.as_array_index() {
                    if let ObjectKind::Array { elements } = &mut data.kind {
                        if (idx as usize) < elements.len() {
                            elements[idx as usize] = Value::Undefined;
                        }
                    }
                }
                true
            }
        }
    }

    pub fn prototype(&self) -> Option<JsObject> {
        self.0.borrow().prototype.clone()
    }

    pub fn set_prototype(&self, proto: Option<JsObject>) {
        self.0.borrow_mut().prototype = proto;
    }

    pub fn is_extensible(&self) -> bool {
        self.0.borrow().extensible
    }

    pub fn prevent_extensions(&self) {
        self.0.borrow_mut().extensible = false;
    }

    pub fn get_index(&self, index: u32) -> Option<Value> {
        self.get_own(&PropertyKey::from_str(&index.to_string()))
            .and_then(|d| d.data_value().cloned())
    }

    pub fn array_push(&self, value: Value) {
        let mut data = self.0.borrow_mut();
        if let ObjectKind::Array { elements } = &mut data.kind {
            elements.push(value);
        }
    }

    pub fn array_elements(&self) -> Option<Vec<Value>> {
        match &self.0.borrow().kind {
            ObjectKind::Array { elements } => Some(elements.clone()),
            _ => None,
        }
    }

    pub fn set_array_elements(&self, new_elements: Vec<Value>) {
        let mut data = self.0.borrow_mut();
        if let ObjectKind::Array { elements } = &mut data.kind {
            *elements = new_elements;
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self.0.borrow().kind, ObjectKind::Array { .. })
    }

    pub fn is_callable(&self) -> bool {
        matches!(self.0.borrow().kind, ObjectKind::Function(_))
    }

    pub fn created_from_coercion(&self) -> bool {
        self.0.borrow().created_from_coercion
    }

    pub fn set_created_from_coercion(&self, v: bool) {
        self.0.borrow_mut().created_from_coercion = v;
    }

    pub fn set_is_args_array(&self, v: bool) {
        self.0.borrow_mut().is_args_array = v;
    }

    pub fn primitive_value(&self) -> Option<Value> {
        match &self.0.borrow().kind {
            ObjectKind::PrimitiveWrapper(v) => Some(v.clone()),
            _ => None,
        }
    }

    /// Direct index write into an array's element vector, extending with
    /// `undefined` holes as needed (spec.md §4.1 "Arrays override indexed
    /// access"). A no-op on non-array objects.
    pub fn set_element(&self, idx: u32, value: Value) {
        let mut data = self.0.borrow_mut();
        if let ObjectKind::Array { elements } = &mut data.kind {
            let idx = idx as usize;
            if idx >= elements.len() {
                elements.resize(idx + 1, Value::Undefined);
            }
            elements[idx] = value;
        }
    }

    /// Implements `array.length = n`: truncates or pads with `undefined`.
    pub fn set_length(&self, new_len: u32) {
        let mut data = self.0.borrow_mut();
        if let ObjectKind::Array { elements } = &mut data.kind {
            elements.resize(new_len as usize, Value::Undefined);
        }
    }

    pub fn array_len(&self) -> Option<usize> {
        match &self.0.borrow().kind {
            ObjectKind::Array { elements } => Some(elements.len()),
            _ => None,
        }
    }

    pub fn function_data(&self) -> Option<FunctionData> {
        match &self.0.borrow().kind {
            ObjectKind::Function(f) => Some(f.clone()),
            _ => None,
        }
    }

    pub fn regexp_data(&self) -> Option<super::regexp::RegexpData> {
        match &self.0.borrow().kind {
            ObjectKind::Regexp(r) => Some(r.clone()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefineError {
    NotExtensible,
    ArgumentsArray,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_then_get_returns_the_observed_projection() {
        let obj = JsObject::new(None, ObjectKind::Ordinary);
        let key = PropertyKey::from_str("p");
        obj.define_own(key.clone(), PropertyDescriptor::data(Value::Number(7.0), true, true, true))
            .unwrap();
        let got = obj.get_own(&key).unwrap();
        assert!(matches!(got.data_value(), Some(Value::Number(n)) if *n == 7.0));
    }

    #[test]
    fn get_descriptor_walks_the_prototype_chain() {
        let parent = JsObject::new(None, ObjectKind::Ordinary);
        let key = PropertyKey::from_str("inherited");
        parent
            .define_own(key.clone(), PropertyDescriptor::data(Value::Boolean(true), true, true, true))
            .unwrap();
        let child = JsObject::new(Some(parent.clone()), ObjectKind::Ordinary);
        assert!(child.get_own(&key).is_none());
        let (holder, _) = child.get_descriptor(&key).unwrap();
        assert!(holder.ptr_eq(&parent));
    }

    #[test]
    fn is_prototype_of_reflects_the_chain() {
        let grandparent = JsObject::new(None, ObjectKind::Ordinary);
        let parent = JsObject::new(Some(grandparent.clone()), ObjectKind::Ordinary);
        let child = JsObject::new(Some(parent.clone()), ObjectKind::Ordinary);
        assert!(grandparent.is_prototype_of(&child));
        assert!(!child.is_prototype_of(&grandparent));
    }

    #[test]
    fn own_enumerable_keys_puts_array_indices_before_string_keys() {
        let obj = JsObject::new(None, ObjectKind::Array { elements: vec![Value::Number(1.0), Value::Number(2.0)] });
        obj.define_own(
            PropertyKey::from_str("name"),
            PropertyDescriptor::data(Value::from_str("x"), true, true, true),
        )
        .unwrap();
        let keys = obj.own_enumerable_keys();
        assert_eq!(keys[0], PropertyKey::from_str("0"));
        assert_eq!(keys[1], PropertyKey::from_str("1"));
        assert_eq!(keys[2], PropertyKey::from_str("name"));
    }

    #[test]
    fn defining_on_a_non_extensible_object_rejects_new_keys() {
        let obj = JsObject::new(None, ObjectKind::Ordinary);
        obj.prevent_extensions();
        let err = obj
            .define_own(PropertyKey::from_str("new"), PropertyDescriptor::data(Value::Undefined, true, true, true))
            .unwrap_err();
        assert_eq!(err, DefineError::NotExtensible);
    }

    #[test]
    fn non_configurable_properties_cannot_be_deleted() {
        let obj = JsObject::new(None, ObjectKind::Ordinary);
        let key = PropertyKey::from_str("pinned");
        obj.define_own(key.clone(), PropertyDescriptor::data(Value::Undefined, true, true, false))
            .unwrap();
        assert!(!obj.delete_own(&key));
    }
}
