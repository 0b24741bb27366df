//! Statement and expression evaluation (spec.md §4.5): the evaluator
//! proper. Statements drive control flow and produce abrupt completions
//! through [`crate::completion::Abrupt`]; expressions return a
//! [`crate::types::Value`].

pub mod expr;
pub mod stmt;

/// Pushes a syntax-context frame for the duration of `f`, so a thrown
/// guest exception carries a trail of source locations (spec.md §4.5,
/// "every dispatch is wrapped in a 'syntax-context' frame"). Released on
/// every exit path, including the `?`-propagated error path, by virtue of
/// being an ordinary Rust scope (spec.md §5 "Resource discipline").
pub(crate) fn with_ctx<T>(
    agent: &mut crate::execution::agent::Agent,
    label: impl Into<String>,
    f: impl FnOnce(&mut crate::execution::agent::Agent) -> crate::completion::Completion<T>,
) -> crate::completion::Completion<T> {
    agent.push_ctx(label);
    let result = f(agent);
    agent.pop_ctx();
    result
}
