//! Statement evaluation (spec.md §4.5). Every statement produces a
//! *completion value* (spec.md Glossary), threaded back up as an ordinary
//! return value so blocks/`if`/loops can propagate the value of their last
//! evaluated expression statement the way `eval` and the script runner
//! "surface" it.

use std::rc::Rc;

use crate::abstract_ops;
use crate::ast::{ForInTarget, ForInit, Stmt, SwitchCase, VarKind};
use crate::completion::{Abrupt, Completion};
use crate::eval::expr::eval_expr;
use crate::eval::with_ctx;
use crate::execution::agent::Agent;
use crate::execution::hoist;
use crate::execution::scope::{self, DefineOptions};
use crate::types::Value;

pub fn eval_stmt(agent: &mut Agent, stmt: &Stmt) -> Completion<Value> {
    eval_stmt_labeled(agent, stmt, &[])
}

fn eval_stmt_list(agent: &mut Agent, stmts: &[Stmt]) -> Completion<Value> {
    let mut last = Value::Undefined;
    for stmt in stmts {
        last = eval_stmt(agent, stmt)?;
    }
    Ok(last)
}

/// `labels` accumulates the chain of `Labeled` wrappers immediately
/// enclosing a loop, `switch`, or block, so that a labeled `break`/
/// `continue` can be matched at the statement it actually targets
/// (spec.md §4.5 "Labeled").
fn eval_stmt_labeled(agent: &mut Agent, stmt: &Stmt, labels: &[Rc<str>]) -> Completion<Value> {
    match stmt {
        Stmt::Labeled(name, inner) => {
            let mut extended = labels.to_vec();
            extended.push(name.clone());
            eval_stmt_labeled(agent, inner, &extended)
        }
        Stmt::While { test, body } => eval_while(agent, test, body, labels),
        Stmt::DoWhile { body, test } => eval_do_while(agent, body, test, labels),
        Stmt::For { init, test, update, body } => eval_for(agent, init, test, update, body, labels),
        Stmt::ForIn { decl_kind, target, object, body } => {
            eval_for_in(agent, decl_kind, target, object, body, labels)
        }
        Stmt::Switch { disc, cases } => eval_switch(agent, disc, cases, labels),
        Stmt::Block(stmts) => eval_block_labeled(agent, stmts, labels),
        other => eval_stmt_unlabeled(agent, other),
    }
}

fn eval_stmt_unlabeled(agent: &mut Agent, stmt: &Stmt) -> Completion<Value> {
    with_ctx(agent, stmt_ctx_label(stmt), |agent| match stmt {
        Stmt::Expr(e) => eval_expr(agent, e),
        Stmt::Empty => Ok(Value::Undefined),
        Stmt::VarDecl { kind, decls } => eval_var_decl(agent, *kind, decls),
        Stmt::FunctionDecl(_) => Ok(Value::Undefined),
        Stmt::Block(stmts) => eval_block_labeled(agent, stmts, &[]),
        Stmt::If { test, cons, alt } => {
            let t = eval_expr(agent, test)?;
            if abstract_ops::to_boolean(&t) {
                eval_stmt(agent, cons)
            } else if let Some(alt) = alt {
                eval_stmt(agent, alt)
            } else {
                Ok(Value::Undefined)
            }
        }
        Stmt::While { .. } | Stmt::DoWhile { .. } | Stmt::For { .. } | Stmt::ForIn { .. } => {
            unreachable!("loops are dispatched in eval_stmt_labeled")
        }
        Stmt::Return(e) => {
            let v = match e {
                Some(e) => eval_expr(agent, e)?,
                None => Value::Undefined,
            };
            Err(Abrupt::Return(v))
        }
        Stmt::Break(label) => Err(Abrupt::Break(label.clone())),
        Stmt::Continue(label) => Err(Abrupt::Continue(label.clone())),
        Stmt::Throw(e, _span) => {
            let v = eval_expr(agent, e)?;
            Err(Abrupt::Throw(v, agent.ctx_trail()))
        }
        Stmt::Try { block, catch, finally } => eval_try(agent, block, catch, finally),
        Stmt::Labeled(..) => unreachable!("labels are dispatched in eval_stmt_labeled"),
        Stmt::Switch { .. } => unreachable!("switch is dispatched in eval_stmt_labeled"),
    })
}

fn stmt_ctx_label(stmt: &Stmt) -> &'static str {
    match stmt {
        Stmt::Expr(_) => "ExpressionStatement",
        Stmt::VarDecl { .. } => "VariableDeclaration",
        Stmt::FunctionDecl(_) => "FunctionDeclaration",
        Stmt::Block(_) => "BlockStatement",
        Stmt::Empty => "EmptyStatement",
        Stmt::If { .. } => "IfStatement",
        Stmt::While { .. } => "WhileStatement",
        Stmt::DoWhile { .. } => "DoWhileStatement",
        Stmt::For { .. } => "ForStatement",
        Stmt::ForIn { .. } => "ForInStatement",
        Stmt::Return(_) => "ReturnStatement",
        Stmt::Break(_) => "BreakStatement",
        Stmt::Continue(_) => "ContinueStatement",
        Stmt::Throw(..) => "ThrowStatement",
        Stmt::Try { .. } => "TryStatement",
        Stmt::Labeled(..) => "LabeledStatement",
        Stmt::Switch { .. } => "SwitchStatement",
    }
}

fn eval_var_decl(
    agent: &mut Agent,
    kind: VarKind,
    decls: &[crate::ast::VarDeclarator],
) -> Completion<Value> {
    for d in decls {
        let value = match &d.init {
            Some(e) => eval_expr(agent, e)?,
            None => continue,
        };
        match kind {
            VarKind::Var => agent
                .scope
                .clone()
                .set(&d.pattern.name, value)
                .map_err(|e| agent.promote(e))?,
            VarKind::Let | VarKind::Const => agent
                .scope
                .initialize(&d.pattern.name, value)
                .map_err(|e| agent.promote(e))?,
        }
    }
    Ok(Value::Undefined)
}

/// Pushes a fresh declarative scope, hoists the block's own `let`/`const`
/// and function-declaration bindings into it, then runs `stmts` (spec.md
/// §4.4, §4.5 "Block statement").
fn eval_block(agent: &mut Agent, stmts: &[Stmt]) -> Completion<Value> {
    let parent = agent.scope.clone();
    let block_scope = scope::new_declarative_scope(Some(parent), agent.strict());
    let saved = std::mem::replace(&mut agent.scope, block_scope);
    let result = (|| {
        hoist::hoist_block(agent, stmts)?;
        eval_stmt_list(agent, stmts)
    })();
    agent.scope = saved;
    result
}

/// A bare block does not catch an unlabeled `break`/`continue` (those
/// target the nearest loop/`switch`); a *labeled* block catches only a
/// `break` naming one of its own labels (spec.md §4.5 "Labeled").
fn eval_block_labeled(agent: &mut Agent, stmts: &[Stmt], labels: &[Rc<str>]) -> Completion<Value> {
    match eval_block(agent, stmts) {
        Err(Abrupt::Break(Some(l))) if labels.contains(&l) => Ok(Value::Undefined),
        other => other,
    }
}

enum LoopSignal {
    Continue(Value),
    Break,
}

/// Runs one loop-body iteration in a fresh child scope (spec.md §4.5 "for",
/// "A fresh scope is entered on each iteration so loop-body function
/// expressions capture a distinct binding") and interprets the resulting
/// completion as either "run the next iteration" or "stop the loop",
/// catching `break`/`continue` that is unlabeled or names one of `labels`.
fn run_loop_body(agent: &mut Agent, body: &Stmt, labels: &[Rc<str>]) -> Completion<LoopSignal> {
    let parent = agent.scope.clone();
    let body_scope = scope::new_declarative_scope(Some(parent), agent.strict());
    let saved = std::mem::replace(&mut agent.scope, body_scope);
    let result = eval_stmt(agent, body);
    agent.scope = saved;
    match result {
        Ok(v) => Ok(LoopSignal::Continue(v)),
        Err(Abrupt::Break(None)) => Ok(LoopSignal::Break),
        Err(Abrupt::Break(Some(l))) if labels.contains(&l) => Ok(LoopSignal::Break),
        Err(Abrupt::Continue(None)) => Ok(LoopSignal::Continue(Value::Undefined)),
        Err(Abrupt::Continue(Some(l))) if labels.contains(&l) => Ok(LoopSignal::Continue(Value::Undefined)),
        Err(e) => Err(e),
    }
}

fn eval_while(agent: &mut Agent, test: &crate::ast::Expr, body: &Stmt, labels: &[Rc<str>]) -> Completion<Value> {
    let mut last = Value::Undefined;
    loop {
        let t = eval_expr(agent, test)?;
        if !abstract_ops::to_boolean(&t) {
            break;
        }
        match run_loop_body(agent, body, labels)? {
            LoopSignal::Continue(v) => last = v,
            LoopSignal::Break => break,
        }
    }
    Ok(last)
}

fn eval_do_while(agent: &mut Agent, body: &Stmt, test: &crate::ast::Expr, labels: &[Rc<str>]) -> Completion<Value> {
    let mut last = Value::Undefined;
    loop {
        match run_loop_body(agent, body, labels)? {
            LoopSignal::Continue(v) => last = v,
            LoopSignal::Break => break,
        }
        let t = eval_expr(agent, test)?;
        if !abstract_ops::to_boolean(&t) {
            break;
        }
    }
    Ok(last)
}

fn eval_for(
    agent: &mut Agent,
    init: &Option<Box<ForInit>>,
    test: &Option<crate::ast::Expr>,
    update: &Option<crate::ast::Expr>,
    body: &Stmt,
    labels: &[Rc<str>],
) -> Completion<Value> {
    let outer_scope = agent.scope.clone();
    let head_scope = scope::new_declarative_scope(Some(outer_scope.clone()), agent.strict());
    agent.scope = head_scope;

    let result = (|| -> Completion<Value> {
        if let Some(init) = init {
            match init.as_ref() {
                ForInit::VarDecl { kind, decls } => {
                    if matches!(kind, VarKind::Let | VarKind::Const) {
                        for d in decls {
                            let mutable = matches!(kind, VarKind::Let);
                            agent
                                .scope
                                .define(
                                    &d.pattern.name,
                                    DefineOptions {
                                        allow_redecl: false,
                                        mutable,
                                        deletable: false,
                                        default_value: None,
                                    },
                                )
                                .map_err(|e| agent.promote(e))?;
                        }
                    }
                    eval_var_decl(agent, *kind, decls)?;
                }
                ForInit::Expr(e) => {
                    eval_expr(agent, e)?;
                }
            }
        }

        let mut last = Value::Undefined;
        loop {
            if let Some(test) = test {
                let t = eval_expr(agent, test)?;
                if !abstract_ops::to_boolean(&t) {
                    break;
                }
            }
            match run_loop_body(agent, body, labels)? {
                LoopSignal::Continue(v) => last = v,
                LoopSignal::Break => break,
            }
            if let Some(update) = update {
                eval_expr(agent, update)?;
            }
        }
        Ok(last)
    })();

    agent.scope = outer_scope;
    result
}

fn eval_for_in(
    agent: &mut Agent,
    decl_kind: &Option<VarKind>,
    target: &ForInTarget,
    object: &crate::ast::Expr,
    body: &Stmt,
    labels: &[Rc<str>],
) -> Completion<Value> {
    let obj_val = eval_expr(agent, object)?;
    if obj_val.is_nullish() {
        return Ok(Value::Undefined);
    }
    let obj = agent.to_object(&obj_val)?;

    // Own enumerable string keys first, then the chain, in insertion
    // order within each object (spec.md §4.4, §5 "Ordering guarantees").
    let mut seen = std::collections::HashSet::new();
    let mut keys = Vec::new();
    let mut current = Some(obj);
    while let Some(o) = current {
        for key in o.own_enumerable_keys() {
            if let crate::types::PropertyKey::String(s) = &key {
                let text = s.to_string_lossy();
                if seen.insert(text) {
                    keys.push(s.clone());
                }
            }
        }
        current = o.prototype();
    }

    let mut last = Value::Undefined;
    for key in keys {
        let outer_scope = agent.scope.clone();
        let iter_scope = scope::new_declarative_scope(Some(outer_scope.clone()), agent.strict());
        agent.scope = iter_scope;
        let bind_result = (|| -> Completion<()> {
            match (decl_kind, target) {
                (Some(kind), ForInTarget::VarDecl(pattern)) => {
                    let mutable = !matches!(kind, VarKind::Const);
                    if matches!(kind, VarKind::Let | VarKind::Const) {
                        agent
                            .scope
                            .define(
                                &pattern.name,
                                DefineOptions {
                                    allow_redecl: false,
                                    mutable,
                                    deletable: false,
                                    default_value: Some(Value::String(key.clone())),
                                },
                            )
                            .map_err(|e| agent.promote(e))?;
                    } else {
                        agent
                            .scope
                            .clone()
                            .set(&pattern.name, Value::String(key.clone()))
                            .map_err(|e| agent.promote(e))?;
                    }
                }
                (None, ForInTarget::Pattern(expr)) => {
                    crate::eval::expr::assign_for_in_target(agent, expr, Value::String(key.clone()))?;
                }
                _ => {}
            }
            Ok(())
        })();
        if let Err(e) = bind_result {
            agent.scope = outer_scope;
            return Err(e);
        }

        let body_result = eval_stmt(agent, body);
        agent.scope = outer_scope;
        match body_result {
            Ok(v) => last = v,
            Err(Abrupt::Break(None)) => break,
            Err(Abrupt::Break(Some(l))) if labels.contains(&l) => break,
            Err(Abrupt::Continue(None)) => continue,
            Err(Abrupt::Continue(Some(l))) if labels.contains(&l) => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(last)
}

/// Finds the first `case` whose test triple-equals the discriminant
/// (skipping `default`), then executes consequents from there through to
/// the end, falling through until a `break` or the end of the statement;
/// if no case matches, execution starts at `default` if present (spec.md
/// §4.5 "Switch").
fn eval_switch(
    agent: &mut Agent,
    disc: &crate::ast::Expr,
    cases: &[SwitchCase],
    labels: &[Rc<str>],
) -> Completion<Value> {
    let disc_val = eval_expr(agent, disc)?;

    let parent = agent.scope.clone();
    let switch_scope = scope::new_declarative_scope(Some(parent), agent.strict());
    let saved = std::mem::replace(&mut agent.scope, switch_scope);

    let result = (|| -> Completion<Value> {
        for case in cases {
            hoist::hoist_block(agent, &case.body)?;
        }

        let mut start = None;
        for (i, case) in cases.iter().enumerate() {
            if let Some(test) = &case.test {
                let t = eval_expr(agent, test)?;
                if crate::abstract_ops::equality::strict_equal(&disc_val, &t) {
                    start = Some(i);
                    break;
                }
            }
        }
        let start = start.or_else(|| cases.iter().position(|c| c.test.is_none()));

        let mut last = Value::Undefined;
        if let Some(start) = start {
            for case in &cases[start..] {
                last = eval_stmt_list(agent, &case.body)?;
            }
        }
        Ok(last)
    })();

    agent.scope = saved;
    match result {
        Err(Abrupt::Break(None)) => Ok(Value::Undefined),
        Err(Abrupt::Break(Some(l))) if labels.contains(&l) => Ok(Value::Undefined),
        other => other,
    }
}

fn eval_try(
    agent: &mut Agent,
    block: &[Stmt],
    catch: &Option<(Option<crate::ast::Pattern>, Vec<Stmt>)>,
    finally: &Option<Vec<Stmt>>,
) -> Completion<Value> {
    let try_result = eval_block(agent, block);

    let after_catch = match (try_result, catch) {
        (Err(Abrupt::Throw(value, _trail)), Some((param, body))) => {
            let parent = agent.scope.clone();
            let catch_scope = scope::new_declarative_scope(Some(parent), agent.strict());
            let saved = std::mem::replace(&mut agent.scope, catch_scope);
            let bound = if let Some(p) = param {
                let r = agent.scope.define(
                    &p.name,
                    DefineOptions {
                        allow_redecl: false,
                        mutable: true,
                        deletable: false,
                        default_value: Some(value),
                    },
                );
                agent.scope.set_do_not_delete(&p.name);
                r.map_err(|e| agent.promote(e))
            } else {
                Ok(())
            };
            let result = bound.and_then(|()| {
                hoist::hoist_block(agent, body)?;
                eval_stmt_list(agent, body)
            });
            agent.scope = saved;
            result
        }
        (other, _) => other,
    };

    match finally {
        None => after_catch,
        Some(finally_body) => {
            let parent = agent.scope.clone();
            let fin_scope = scope::new_declarative_scope(Some(parent), agent.strict());
            let saved = std::mem::replace(&mut agent.scope, fin_scope);
            let fin_result = (|| {
                hoist::hoist_block(agent, finally_body)?;
                eval_stmt_list(agent, finally_body)
            })();
            agent.scope = saved;
            match fin_result {
                Ok(_) => after_catch,
                Err(e) => Err(e),
            }
        }
    }
}
