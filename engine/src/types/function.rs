//! Callables (spec.md §4.2): host-defined and user-defined functions share
//! one function slot on the object record.

use std::rc::Rc;

use crate::ast::{FunctionBody, FunctionDef, Param};
use crate::completion::Completion;
use crate::execution::agent::Agent;
use crate::execution::scope::ScopeRef;

use super::object::JsObject;
use super::string::JsString;
use super::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallFlags {
    pub is_new: bool,
}

impl CallFlags {
    pub const CALL: CallFlags = CallFlags { is_new: false };
    pub const CONSTRUCT: CallFlags = CallFlags { is_new: true };
}

pub type HostFn = fn(&mut Agent, Value, &[Value], CallFlags) -> Completion<Value>;

#[derive(Clone)]
pub struct HostFunctionData {
    pub name: JsString,
    pub func: HostFn,
    /// Whether `new` is permitted on this host callable (spec.md §4.2).
    pub constructable: bool,
}

impl std::fmt::Debug for HostFunctionData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostFunctionData")
            .field("name", &self.name)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct UserFunctionData {
    pub name: JsString,
    pub params: Vec<Param>,
    pub body: Rc<FunctionBodyRef>,
    /// The lexical scope the function closes over (spec.md §4.2 step 2).
    pub scope: ScopeRef,
    pub strict: bool,
    pub is_arrow: bool,
}

/// Keeps the function's defining AST alive for as long as any closure
/// created from it is reachable; shared via `Rc` so every closure sharing
/// one `FunctionDeclaration`/`FunctionExpression` points at the same body.
#[derive(Debug)]
pub struct FunctionBodyRef(pub Rc<FunctionDef>);

impl FunctionBodyRef {
    pub fn body(&self) -> &FunctionBody {
        &self.0.body
    }
}

/// A function produced by `Function.prototype.bind` (spec.md §10.7): a
/// callable that forwards to `target` with `bound_this`/`bound_args`
/// prepended, closing over them the way a plain `HostFn` pointer cannot
/// (it captures nothing). Dispatched in `Agent::invoke`/`Agent::construct`
/// alongside `Host`/`User`.
#[derive(Debug, Clone)]
pub struct BoundFunctionData {
    pub target: JsObject,
    pub bound_this: Value,
    pub bound_args: Vec<Value>,
    pub name: JsString,
}

#[derive(Debug, Clone)]
pub enum FunctionData {
    Host(HostFunctionData),
    User(UserFunctionData),
    Bound(BoundFunctionData),
}

impl FunctionData {
    pub fn name(&self) -> &JsString {
        match self {
            FunctionData::Host(h) => &h.name,
            FunctionData::User(u) => &u.name,
            FunctionData::Bound(b) => &b.name,
        }
    }

    pub fn is_constructable(&self) -> bool {
        match self {
            FunctionData::Host(h) => h.constructable,
            FunctionData::User(u) => !u.is_arrow,
            FunctionData::Bound(b) => b.target.is_callable() && b.target.function_data().unwrap().is_constructable(),
        }
    }

    pub fn param_count(&self) -> usize {
        match self {
            FunctionData::Host(_) => 0,
            FunctionData::User(u) => u.params.len(),
            FunctionData::Bound(b) => b.target
                .function_data()
                .map(|d| d.param_count().saturating_sub(b.bound_args.len()))
                .unwrap_or(0),
        }
    }
}

pub fn new_user_function(
    def: &Rc<FunctionDef>,
    scope: ScopeRef,
    outer_strict: bool,
) -> UserFunctionData {
    UserFunctionData {
        name: def
            .name
            .as_ref()
            .map(|n| JsString::from_str(n))
            .unwrap_or_else(|| JsString::from_str("")),
        params: def.params.clone(),
        body: Rc::new(FunctionBodyRef(def.clone())),
        scope,
        strict: outer_strict || def.has_use_strict_directive,
        is_arrow: def.is_arrow,
    }
}
