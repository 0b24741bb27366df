//! Pre-execution binding collection (spec.md §4.4). Two entry points:
//! `hoist_function_body` runs once per function/script body and also
//! walks nested statements (without crossing into a nested function) to
//! collect `var` bindings; `hoist_block` runs at every binding-carrying
//! node (a block, a switch, a for-in body) and only hoists what sits
//! directly in it: `let`/`const` declarations and function declarations.

use std::rc::Rc;

use crate::ast::{ForInTarget, ForInit, Stmt, VarKind};
use crate::completion::Completion;
use crate::execution::agent::Agent;
use crate::execution::scope::{self, DefineOptions};
use crate::types::{PropertyDescriptor, PropertyKey, Value};

const RESERVED_STRICT_WORDS: &[&str] = &[
    "let",
    "implements",
    "private",
    "public",
    "interface",
    "package",
    "protected",
    "static",
    "yield",
];

fn check_reserved(agent: &Agent, name: &str) -> Completion<()> {
    if agent.strict() && RESERVED_STRICT_WORDS.contains(&name) {
        return Err(scope::syntax_error(format!(
            "Unexpected strict mode reserved word '{name}'"
        )));
    }
    Ok(())
}

fn define_in_current(agent: &mut Agent, name: &str, opts: DefineOptions) -> Completion<()> {
    agent.scope.clone().define(name, opts).map_err(|e| agent.promote(e))
}

/// Called once on entering a function body or a script: collects every
/// `var` binding reachable without crossing into a nested function,
/// installing each on the nearest function/global scope, then hoists
/// this same statement list's own `let`/`const`/function bindings.
pub fn hoist_function_body(agent: &mut Agent, stmts: &[Stmt]) -> Completion<()> {
    collect_vars(agent, stmts)?;
    hoist_block(agent, stmts)
}

/// Hoists the `let`/`const` bindings and function declarations that sit
/// directly in `stmts` into the current scope, then materializes the
/// function declarations in declaration order (spec.md §4.4).
pub fn hoist_block(agent: &mut Agent, stmts: &[Stmt]) -> Completion<()> {
    for stmt in stmts {
        if let Stmt::VarDecl { kind, decls } = stmt {
            if matches!(kind, VarKind::Let | VarKind::Const) {
                let mutable = matches!(kind, VarKind::Let);
                for d in decls {
                    check_reserved(agent, &d.pattern.name)?;
                    define_in_current(
                        agent,
                        &d.pattern.name,
                        DefineOptions {
                            allow_redecl: false,
                            mutable,
                            deletable: false,
                            default_value: None,
                        },
                    )?;
                }
            }
        }
    }

    for stmt in stmts {
        if let Stmt::FunctionDecl(def) = stmt {
            hoist_function_decl(agent, def)?;
        }
    }

    Ok(())
}

fn hoist_function_decl(agent: &mut Agent, def: &Rc<crate::ast::FunctionDef>) -> Completion<()> {
    let name: Rc<str> = def.name.clone().unwrap_or_else(|| Rc::from(""));
    check_reserved(agent, &name)?;
    let func_obj = agent.make_function_object(def);
    define_in_current(
        agent,
        &name,
        DefineOptions {
            allow_redecl: true,
            mutable: true,
            deletable: false,
            default_value: Some(Value::Object(func_obj.clone())),
        },
    )?;
    // A function declaration at global scope is additionally a property
    // of the global object, even when the currently active scope is a
    // nested declarative scope whose parent chain reaches it.
    if let Some(global_obj) = agent.scope.nearest_function_or_global().backing_object() {
        let _ = global_obj.define_own(
            PropertyKey::from_str(&name),
            PropertyDescriptor::data(Value::Object(func_obj), true, true, true),
        );
    }
    Ok(())
}

fn collect_vars(agent: &mut Agent, stmts: &[Stmt]) -> Completion<()> {
    for stmt in stmts {
        collect_vars_stmt(agent, stmt)?;
    }
    Ok(())
}

fn collect_vars_stmt(agent: &mut Agent, stmt: &Stmt) -> Completion<()> {
    match stmt {
        Stmt::VarDecl { kind: VarKind::Var, decls } => {
            for d in decls {
                define_var(agent, &d.pattern.name)?;
            }
        }
        Stmt::Block(body) => collect_vars(agent, body)?,
        Stmt::If { cons, alt, .. } => {
            collect_vars_stmt(agent, cons)?;
            if let Some(alt) = alt {
                collect_vars_stmt(agent, alt)?;
            }
        }
        Stmt::While { body, .. } | Stmt::DoWhile { body, .. } | Stmt::Labeled(_, body) => {
            collect_vars_stmt(agent, body)?;
        }
        Stmt::For { init, body, .. } => {
            if let Some(init) = init {
                if let ForInit::VarDecl { kind: VarKind::Var, decls } = init.as_ref() {
                    for d in decls {
                        define_var(agent, &d.pattern.name)?;
                    }
                }
            }
            collect_vars_stmt(agent, body)?;
        }
        Stmt::ForIn { decl_kind, target, body, .. } => {
            if matches!(decl_kind, Some(VarKind::Var)) {
                if let ForInTarget::VarDecl(pattern) = target {
                    define_var(agent, &pattern.name)?;
                }
            }
            collect_vars_stmt(agent, body)?;
        }
        Stmt::Try { block, catch, finally } => {
            collect_vars(agent, block)?;
            if let Some((_, body)) = catch {
                collect_vars(agent, body)?;
            }
            if let Some(body) = finally {
                collect_vars(agent, body)?;
            }
        }
        Stmt::Switch { cases, .. } => {
            for case in cases {
                collect_vars(agent, &case.body)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// A bare `var` name never clobbers an existing binding's value: only
/// the first time it is hoisted does it default to `undefined` (spec.md
/// §4.4). Later hoists of the same name (repeated declarations in one
/// function, or re-running a script against a shared global on the same
/// `Agent`) leave the current value untouched.
fn define_var(agent: &mut Agent, name: &str) -> Completion<()> {
    check_reserved(agent, name)?;
    let target = agent.scope.nearest_function_or_global();
    let default_value = if target.has_own_binding(name) {
        None
    } else {
        Some(Value::Undefined)
    };
    target
        .define(
            name,
            DefineOptions {
                allow_redecl: true,
                mutable: true,
                deletable: false,
                default_value,
            },
        )
        .map_err(|e| agent.promote(e))
}
