//! The engine instance: the agent, its realm, the scope graph, and the
//! pre-execution hoisting pass (spec.md §3.3, §4.3, §5.3, §6.1).

pub mod agent;
pub mod hoist;
pub mod realm;
pub mod scope;
