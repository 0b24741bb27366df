//! The `symbol` value variant: unique identity plus an optional description
//! (spec.md §3.1, §9 "Symbol identity").

use std::cell::Cell;
use std::rc::Rc;

use super::string::JsString;

thread_local! {
    static NEXT_SYMBOL_ID: Cell<u64> = const { Cell::new(1) };
}

#[derive(Debug)]
pub struct SymbolData {
    id: u64,
    pub description: Option<JsString>,
}

#[derive(Debug, Clone)]
pub struct JsSymbol(pub Rc<SymbolData>);

impl JsSymbol {
    pub fn new(description: Option<JsString>) -> Self {
        let id = NEXT_SYMBOL_ID.with(|c| {
            let id = c.get();
            c.set(id + 1);
            id
        });
        JsSymbol(Rc::new(SymbolData { id, description }))
    }

    pub fn id(&self) -> u64 {
        self.0.id
    }
}

impl PartialEq for JsSymbol {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}
impl Eq for JsSymbol {}

impl std::hash::Hash for JsSymbol {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

/// The well-known `@@toPrimitive` symbol, observed by `ToPrimitive`
/// (spec.md §4.6, §9). Every `Agent` shares one instance via its `Realm`.
pub fn well_known_to_primitive_description() -> JsString {
    JsString::from_str("Symbol.toPrimitive")
}
