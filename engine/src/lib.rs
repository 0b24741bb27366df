//! A tree-walking ECMAScript interpreter, validated against Test262
//! (spec.md §1). The external parser (`oxc_parser`) produces an AST; this
//! crate lowers it (`ast::lower`), hoists bindings (`execution::hoist`),
//! and walks it (`eval`) against the value/object model (`types`) and
//! abstract operations (`abstract_ops`) defined here. The built-in object
//! layer (`builtins`) wires up the realm those algorithms run against.
//!
//! The crate's only entry point for a consumer (the CLI, the Test262
//! driver) is [`execution::agent::Agent::run_script`].

pub mod abstract_ops;
pub mod ast;
pub mod builtins;
pub mod completion;
pub mod eval;
pub mod execution;
pub mod types;

pub use completion::{Abrupt, Completion};
pub use execution::agent::{Agent, FailureKind, RunOutcome};
