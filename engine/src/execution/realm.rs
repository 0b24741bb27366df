//! The realm (spec.md §2, §5 "Shared resources"): the per-engine set of
//! prototype objects and global constructors owned by one `Agent`.

use crate::execution::scope::ScopeRef;
use crate::types::{JsObject, JsSymbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Generic,
    Type,
    Range,
    Reference,
    Syntax,
    Eval,
    Uri,
}

pub struct Realm {
    pub global_object: JsObject,
    pub global_scope: ScopeRef,

    pub object_prototype: JsObject,
    pub function_prototype: JsObject,
    pub array_prototype: JsObject,
    pub string_prototype: JsObject,
    pub number_prototype: JsObject,
    pub boolean_prototype: JsObject,
    pub bigint_prototype: JsObject,
    pub symbol_prototype: JsObject,
    pub regexp_prototype: JsObject,

    pub error_prototype: JsObject,
    pub type_error_prototype: JsObject,
    pub range_error_prototype: JsObject,
    pub reference_error_prototype: JsObject,
    pub syntax_error_prototype: JsObject,
    pub eval_error_prototype: JsObject,
    pub uri_error_prototype: JsObject,

    /// The well-known `@@toPrimitive` symbol, observed by `ToPrimitive`
    /// (spec.md §4.6, §9 "Symbol identity").
    pub to_primitive_symbol: JsSymbol,

    /// The realm's own global `eval` function object. A call through the
    /// identifier `eval` is direct only when that identifier still
    /// resolves to this exact object (spec.md §4.5 "Call / method call",
    /// "direct eval"); any other reachable `eval` binding is indirect.
    pub eval_function: JsObject,
}

impl Realm {
    pub fn error_prototype_for(&self, kind: ErrorKind) -> JsObject {
        match kind {
            ErrorKind::Generic => self.error_prototype.clone(),
            ErrorKind::Type => self.type_error_prototype.clone(),
            ErrorKind::Range => self.range_error_prototype.clone(),
            ErrorKind::Reference => self.reference_error_prototype.clone(),
            ErrorKind::Syntax => self.syntax_error_prototype.clone(),
            ErrorKind::Eval => self.eval_error_prototype.clone(),
            ErrorKind::Uri => self.uri_error_prototype.clone(),
        }
    }
}
