//! `eval` (spec.md §4.5 "Call / method call", direct vs. indirect), grounded
//! on the teacher's own script-entry path (`execution::agent::Agent::run_script`)
//! which this reuses for parsing/hoisting.
//!
//! The identifier-level "is this call direct" check lives in
//! `eval::expr::eval_eval_call`; this module only does the parse-and-run
//! once that has been decided.

use crate::completion::Completion;
use crate::execution::agent::Agent;
use crate::execution::hoist;
use crate::execution::scope;
use crate::types::Value;

/// Direct eval runs in the caller's current scope, inheriting its
/// strictness; indirect eval always runs at global scope, in non-strict
/// mode unless the evaluated text itself opts in with `"use strict"`
/// (spec.md §4.5).
pub fn perform_eval(agent: &mut Agent, source: &str, is_direct: bool) -> Completion<Value> {
    let allocator = oxc_allocator::Allocator::default();
    let source_type = oxc_span::SourceType::default();
    let parser_ret = oxc_parser::Parser::new(&allocator, source, source_type).parse();
    if !parser_ret.errors.is_empty() {
        return Err(agent.throw_error(crate::execution::realm::ErrorKind::Syntax, "eval: parse error"));
    }
    let program = match crate::ast::lower::lower_program(&parser_ret.program) {
        Ok(p) => p,
        Err(crate::ast::lower::LowerError::Unsupported { what, .. }) => {
            return Err(agent.throw_error(
                crate::execution::realm::ErrorKind::Syntax,
                format!("eval: unsupported syntax: {what}"),
            ));
        }
    };

    let outer_scope = if is_direct {
        agent.scope.clone()
    } else {
        agent.realm.global_scope.clone()
    };
    let outer_strict = if is_direct { agent.strict() } else { false };
    let eval_strict = outer_strict || program.has_use_strict_directive;
    let eval_scope = scope::new_declarative_scope(Some(outer_scope), eval_strict);
    let saved = std::mem::replace(&mut agent.scope, eval_scope);

    let result = (|| -> Completion<Value> {
        hoist::hoist_function_body(agent, &program.body)?;
        let mut last = Value::Undefined;
        for stmt in &program.body {
            last = crate::eval::stmt::eval_stmt(agent, stmt)?;
        }
        Ok(last)
    })();

    agent.scope = saved;

    result.map_err(|e| agent.promote(e))
}
