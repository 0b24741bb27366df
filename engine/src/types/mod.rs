//! The value model and object store (spec.md §3, §4.1, §4.2).

pub mod bigint;
pub mod function;
pub mod number;
pub mod object;
pub mod regexp;
pub mod string;
pub mod symbol;
pub mod value;

pub use bigint::JsBigInt;
pub use function::{CallFlags, FunctionData};
pub use object::{JsObject, ObjectKind, PropertyDescriptor, PropertyKey, PropertyValue};
pub use string::JsString;
pub use symbol::JsSymbol;
pub use value::Value;
