//! The scope graph (spec.md §3.3, §4.3): lexical scopes holding variable
//! bindings, in two variants (direct and object-backed), plus a
//! temporal-dead-zone tag on uninitialized bindings.

use ahash::AHashMap;
use std::cell::RefCell;
use std::rc::Rc;

use crate::completion::{Abrupt, Completion};
use crate::types::{JsObject, PropertyDescriptor, PropertyKey, Value};

/// Binding-resolution failures are reported directly as [`Abrupt`] values.
/// The scope graph has no `Agent`/`Realm` access of its own, so the guest
/// exceptions it raises (`ReferenceError`, `TypeError`, `SyntaxError` for
/// redeclaration) are carried as [`Abrupt::HostError`] tags here and
/// promoted to real `Agent`-realm error objects by the evaluator at the
/// point where an `Agent` is in scope (see `execution::agent::Agent::throw_named`
/// and its call sites around scope operations). This keeps the scope graph a
/// self-contained data structure that does not need to know how errors are
/// represented as guest values.

/// A binding's current state: in the temporal dead zone, or holding a
/// value (spec.md §3.3 "TDZ | value"). The "lazy-thunk" producer mentioned
/// in spec.md §4.3 is not modeled separately: this implementation always
/// materializes `arguments` eagerly, which spec.md §3.4's invariant ("bound
/// exactly once, before any parameter default is evaluated") requires
/// anyway — the thunk is a pure perf optimization "used ... when possible",
/// not a correctness requirement. See DESIGN.md.
#[derive(Debug, Clone)]
pub enum Binding {
    Tdz,
    Value(Value),
}

#[derive(Debug)]
struct BindingCell {
    state: Binding,
    mutable: bool,
    deletable: bool,
}

#[derive(Debug, Default)]
pub struct DefineOptions {
    pub allow_redecl: bool,
    pub mutable: bool,
    pub deletable: bool,
    pub default_value: Option<Value>,
}

pub enum ScopeKind {
    /// A plain variable scope: `name -> (TDZ | value)`.
    Declarative {
        bindings: RefCell<AHashMap<Rc<str>, BindingCell>>,
    },
    /// Backed by an object record; reads/writes map to that object's own
    /// properties (spec.md §3.3, §4.3 global scope).
    ObjectBacked { object: JsObject },
}

pub struct ScopeData {
    pub parent: Option<ScopeRef>,
    pub kind: ScopeKind,
    pub strict: bool,
    /// Whether this scope is a call frame's outermost variable scope
    /// (spec.md §3.3).
    pub is_call_wrapper: bool,
    this_binding: RefCell<Option<Value>>,
    new_target: RefCell<Option<Value>>,
}

pub type ScopeRef = Rc<ScopeData>;

pub fn new_declarative_scope(parent: Option<ScopeRef>, strict: bool) -> ScopeRef {
    Rc::new(ScopeData {
        parent,
        kind: ScopeKind::Declarative {
            bindings: RefCell::new(AHashMap::new()),
        },
        strict,
        is_call_wrapper: false,
        this_binding: RefCell::new(None),
        new_target: RefCell::new(None),
    })
}

/// `this` is `None` for arrow functions: they have no own `this`/`new.target`
/// binding and both are resolved lexically through the parent chain
/// (spec.md §4.2 call protocol, §9 "arrow functions").
pub fn new_call_wrapper_scope(
    parent: Option<ScopeRef>,
    strict: bool,
    this: Option<Value>,
    new_target: Option<Value>,
) -> ScopeRef {
    Rc::new(ScopeData {
        parent,
        kind: ScopeKind::Declarative {
            bindings: RefCell::new(AHashMap::new()),
        },
        strict,
        is_call_wrapper: true,
        this_binding: RefCell::new(this),
        new_target: RefCell::new(new_target),
    })
}

pub fn new_object_backed_scope(parent: Option<ScopeRef>, object: JsObject, strict: bool) -> ScopeRef {
    Rc::new(ScopeData {
        parent,
        kind: ScopeKind::ObjectBacked { object },
        strict,
        is_call_wrapper: false,
        this_binding: RefCell::new(Some(Value::Object(object_placeholder(&object)))),
        new_target: RefCell::new(None),
    })
}

fn object_placeholder(o: &JsObject) -> JsObject {
    o.clone()
}

pub enum LookupResult {
    Tdz,
    Value(Value),
}

impl ScopeData {
    pub fn this_value(self: &ScopeRef) -> Option<Value> {
        if let Some(v) = self.this_binding.borrow().clone() {
            return Some(v);
        }
        self.parent.as_ref().and_then(|p| p.this_value())
    }

    pub fn new_target(self: &ScopeRef) -> Value {
        if let Some(v) = self.new_target.borrow().clone() {
            return v;
        }
        match &self.parent {
            Some(p) if !self.is_call_wrapper => p.new_target(),
            _ => Value::Undefined,
        }
    }

    /// Defines a binding on this scope directly (the hoister is
    /// responsible for choosing the correct target scope: the innermost
    /// binding block for `let`/`const`, the innermost function body or
    /// script root for `var` — spec.md §4.4).
    pub fn define(&self, name: &str, opts: DefineOptions) -> Completion<()> {
        match &self.kind {
            ScopeKind::Declarative { bindings } => {
                let mut bindings = bindings.borrow_mut();
                if bindings.contains_key(name) && !opts.allow_redecl {
                    return Err(syntax_error(format!(
                        "Identifier '{name}' has already been declared"
                    )));
                }
                let state = match opts.default_value {
                    Some(v) => Binding::Value(v),
                    None => {
                        if bindings.contains_key(name) && opts.allow_redecl {
                            return Ok(());
                        }
                        Binding::Tdz
                    }
                };
                bindings.insert(
                    Rc::from(name),
                    BindingCell {
                        state,
                        mutable: opts.mutable,
                        deletable: opts.deletable,
                    },
                );
                Ok(())
            }
            ScopeKind::ObjectBacked { object } => {
                let key = PropertyKey::from_str(name);
                let writable = name != "globalThis";
                if object.get_own(&key).is_none() {
                    let value = opts.default_value.unwrap_or(Value::Undefined);
                    let _ = object.define_own(
                        key,
                        PropertyDescriptor::data(value, writable, true, opts.deletable),
                    );
                } else if let Some(v) = opts.default_value {
                    let _ = object.define_own(
                        key,
                        PropertyDescriptor::data(v, writable, true, opts.deletable),
                    );
                }
                Ok(())
            }
        }
    }

    pub fn set(self: &ScopeRef, name: &str, value: Value) -> Completion<()> {
        match &self.kind {
            ScopeKind::Declarative { bindings } => {
                let mut b = bindings.borrow_mut();
                if let Some(cell) = b.get_mut(name) {
                    if !cell.mutable {
                        return Err(type_error(format!(
                            "Assignment to constant variable '{name}'."
                        )));
                    }
                    cell.state = Binding::Value(value);
                    return Ok(());
                }
                drop(b);
                match &self.parent {
                    Some(p) => p.set(name, value),
                    None => Err(reference_error_for_unbound(self.strict, name)),
                }
            }
            ScopeKind::ObjectBacked { object } => {
                let key = PropertyKey::from_str(name);
                if object.get_own(&key).is_some() {
                    let _ = object.define_own(key, PropertyDescriptor::data(value, true, true, true));
                    return Ok(());
                }
                match &self.parent {
                    Some(p) => p.set(name, value),
                    None => {
                        if self.strict {
                            Err(reference_error_for_unbound(true, name))
                        } else {
                            let _ = object.define_own(
                                key,
                                PropertyDescriptor::data(value, true, true, true),
                            );
                            Ok(())
                        }
                    }
                }
            }
        }
    }

    /// Transitions a TDZ binding in the *current* scope to a value,
    /// bypassing the mutability check `set` applies: this is the
    /// initializing assignment of a `let`/`const` declarator, not a later
    /// write, so a `const` binding may be initialized exactly once here
    /// even though subsequent `set` calls against it are rejected
    /// (spec.md §3.4, §4.5 "VariableDeclaration").
    pub fn initialize(&self, name: &str, value: Value) -> Completion<()> {
        match &self.kind {
            ScopeKind::Declarative { bindings } => {
                let mut b = bindings.borrow_mut();
                match b.get_mut(name) {
                    Some(cell) => {
                        cell.state = Binding::Value(value);
                        Ok(())
                    }
                    None => Err(Abrupt::HostError(format!(
                        "host bug: initialize of undeclared binding '{name}'"
                    ))),
                }
            }
            ScopeKind::ObjectBacked { object } => {
                let key = PropertyKey::from_str(name);
                let writable = name != "globalThis";
                let _ = object.define_own(key, PropertyDescriptor::data(value, writable, true, false));
                Ok(())
            }
        }
    }

    pub fn lookup(self: &ScopeRef, name: &str) -> Option<LookupResult> {
        match &self.kind {
            ScopeKind::Declarative { bindings } => {
                if let Some(cell) = bindings.borrow().get(name) {
                    return Some(match &cell.state {
                        Binding::Tdz => LookupResult::Tdz,
                        Binding::Value(v) => LookupResult::Value(v.clone()),
                    });
                }
                self.parent.as_ref().and_then(|p| p.lookup(name))
            }
            ScopeKind::ObjectBacked { object } => {
                let key = PropertyKey::from_str(name);
                if let Some((_, desc)) = object.get_descriptor(&key) {
                    if let Some(v) = desc.data_value() {
                        return Some(LookupResult::Value(v.clone()));
                    }
                }
                self.parent.as_ref().and_then(|p| p.lookup(name))
            }
        }
    }

    pub fn has_binding(self: &ScopeRef, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Whether `name` is bound directly on this scope, without consulting
    /// the parent chain. Used by the hoister to decide whether a `var`
    /// binding already has a value it must not clobber (spec.md §4.4).
    pub fn has_own_binding(&self, name: &str) -> bool {
        match &self.kind {
            ScopeKind::Declarative { bindings } => bindings.borrow().contains_key(name),
            ScopeKind::ObjectBacked { object } => object.get_own(&PropertyKey::from_str(name)).is_some(),
        }
    }

    /// The backing object of an object-backed (global) scope, if this is
    /// one (spec.md §4.4 "installed as a property of the global object").
    pub fn backing_object(&self) -> Option<JsObject> {
        match &self.kind {
            ScopeKind::ObjectBacked { object } => Some(object.clone()),
            ScopeKind::Declarative { .. } => None,
        }
    }

    pub fn delete(self: &ScopeRef, name: &str) -> bool {
        match &self.kind {
            ScopeKind::Declarative { bindings } => {
                let mut b = bindings.borrow_mut();
                match b.get(name) {
                    Some(cell) if cell.deletable => {
                        b.remove(name);
                        true
                    }
                    Some(_) => false,
                    None => self.parent.as_ref().map(|p| p.delete(name)).unwrap_or(true),
                }
            }
            ScopeKind::ObjectBacked { object } => {
                object.delete_own(&PropertyKey::from_str(name))
            }
        }
    }

    pub fn set_do_not_delete(&self, name: &str) {
        if let ScopeKind::Declarative { bindings } = &self.kind {
            if let Some(cell) = bindings.borrow_mut().get_mut(name) {
                cell.deletable = false;
            }
        }
    }

    /// Finds the nearest enclosing call-wrapper or object-backed (global)
    /// scope, the target `var` declarations hoist to when hoisting walks
    /// outward from a nested block.
    pub fn nearest_function_or_global(self: &ScopeRef) -> ScopeRef {
        let mut current = self.clone();
        loop {
            if current.is_call_wrapper || matches!(current.kind, ScopeKind::ObjectBacked { .. }) {
                return current;
            }
            match current.parent.clone() {
                Some(p) => current = p,
                None => return current,
            }
        }
    }
}

fn reference_error_for_unbound(_strict: bool, name: &str) -> Abrupt {
    reference_error(format!("{name} is not defined"))
}

pub fn reference_error(message: String) -> Abrupt {
    Abrupt::HostError(format!("ReferenceError: {message}"))
}

pub fn type_error(message: String) -> Abrupt {
    Abrupt::HostError(format!("TypeError: {message}"))
}

pub fn syntax_error(message: String) -> Abrupt {
    Abrupt::HostError(format!("SyntaxError: {message}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tdz_binding_reads_as_tdz_until_initialized() {
        let scope = new_declarative_scope(None, false);
        scope
            .define("x", DefineOptions { allow_redecl: false, mutable: true, deletable: false, default_value: None })
            .unwrap();
        assert!(matches!(scope.lookup("x"), Some(LookupResult::Tdz)));
        scope.initialize("x", Value::Number(1.0)).unwrap();
        assert!(matches!(scope.lookup("x"), Some(LookupResult::Value(Value::Number(n))) if n == 1.0));
    }

    #[test]
    fn redeclaration_without_allow_redecl_is_a_syntax_error() {
        let scope = new_declarative_scope(None, false);
        scope
            .define("x", DefineOptions { allow_redecl: false, mutable: true, deletable: false, default_value: Some(Value::Number(1.0)) })
            .unwrap();
        let err = scope
            .define("x", DefineOptions { allow_redecl: false, mutable: true, deletable: false, default_value: Some(Value::Number(2.0)) })
            .unwrap_err();
        assert!(matches!(err, Abrupt::HostError(msg) if msg.starts_with("SyntaxError")));
    }

    #[test]
    fn const_binding_rejects_a_later_set() {
        let scope = new_declarative_scope(None, false);
        scope
            .define("c", DefineOptions { allow_redecl: false, mutable: false, deletable: false, default_value: Some(Value::Number(1.0)) })
            .unwrap();
        let err = scope.set("c", Value::Number(2.0)).unwrap_err();
        assert!(matches!(err, Abrupt::HostError(msg) if msg.starts_with("TypeError")));
    }

    #[test]
    fn lookup_falls_through_to_parent_scope() {
        let parent = new_declarative_scope(None, false);
        parent
            .define("x", DefineOptions { allow_redecl: false, mutable: true, deletable: false, default_value: Some(Value::Number(9.0)) })
            .unwrap();
        let child = new_declarative_scope(Some(parent), false);
        assert!(matches!(child.lookup("x"), Some(LookupResult::Value(Value::Number(n))) if n == 9.0));
        assert!(child.lookup("nonexistent").is_none());
    }

    #[test]
    fn set_on_unbound_name_in_strict_root_is_reference_error() {
        let scope = new_declarative_scope(None, true);
        let err = scope.set("ghost", Value::Number(1.0)).unwrap_err();
        assert!(matches!(err, Abrupt::HostError(msg) if msg.starts_with("ReferenceError")));
    }

    #[test]
    fn nearest_function_or_global_skips_plain_blocks() {
        let function_wrapper = new_call_wrapper_scope(None, false, Some(Value::Undefined), None);
        let block = new_declarative_scope(Some(function_wrapper.clone()), false);
        assert!(Rc::ptr_eq(&block.nearest_function_or_global(), &function_wrapper));
    }
}
