//! Lowers a borrowed `oxc_ast` tree into this crate's owned [`super`] tree.
//!
//! This is the single place that knows about `oxc_ast`'s node shapes; every
//! other module in the crate works exclusively with the owned tree. Nodes
//! outside the supported subset (classes, generators, async functions,
//! destructuring binding patterns, `with`, modules, ...) are rejected here
//! with [`LowerError::Unsupported`], which the script runner reports as the
//! engine's "arbitrarily unimplemented" signal (spec-level: skip, not fail).

use std::rc::Rc;

use oxc_ast::ast::{self as oxc};
use oxc_span::{GetSpan, Span};

use super::{
    AssignOp, BinaryOp, Expr, ForInTarget, ForInit, FunctionBody, FunctionDef, LogicalOp,
    MemberProp, ObjectProp, Param, Pattern, Program, PropKey, PropKind, Stmt, SwitchCase,
    UnaryOp, UpdateOp, VarDeclarator, VarKind,
};

#[derive(Debug, Clone)]
pub enum LowerError {
    Unsupported { what: &'static str, span: Span },
}

impl std::fmt::Display for LowerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LowerError::Unsupported { what, span } => {
                write!(f, "unsupported syntax: {what} at {span:?}")
            }
        }
    }
}

type R<T> = Result<T, LowerError>;

fn unsupported<T>(what: &'static str, span: Span) -> R<T> {
    Err(LowerError::Unsupported { what, span })
}

fn has_use_strict_directive(directives: &[oxc::Directive]) -> bool {
    directives
        .iter()
        .any(|d| d.directive.as_str() == "use strict")
}

pub fn lower_program(program: &oxc::Program) -> R<Program> {
    let mut body = Vec::with_capacity(program.body.len());
    for stmt in &program.body {
        body.push(lower_stmt(stmt)?);
    }
    Ok(Program {
        body,
        has_use_strict_directive: has_use_strict_directive(&program.directives),
    })
}

fn ident_pattern(name: &oxc::BindingIdentifier) -> Pattern {
    Pattern {
        name: Rc::from(name.name.as_str()),
    }
}

fn lower_binding_pattern(pat: &oxc::BindingPattern) -> R<Pattern> {
    match &pat.kind {
        oxc::BindingPatternKind::BindingIdentifier(id) => Ok(ident_pattern(id)),
        _ => unsupported("destructuring binding pattern", pat.span()),
    }
}

/// Splits a parameter's binding pattern into the bound identifier and its
/// default-initializer expression, if any (spec.md §4.2 "an optional
/// per-parameter default-initializer AST"). `foo = expr` lowers to
/// `AssignmentPattern { left: BindingIdentifier, right: expr }`; anything
/// destructuring on either side is outside the implemented subset.
fn lower_param_pattern(pat: &oxc::BindingPattern) -> R<(Pattern, Option<Expr>)> {
    match &pat.kind {
        oxc::BindingPatternKind::BindingIdentifier(id) => Ok((ident_pattern(id), None)),
        oxc::BindingPatternKind::AssignmentPattern(a) => {
            let pattern = lower_binding_pattern(&a.left)?;
            let default = lower_expr(&a.right)?;
            Ok((pattern, Some(default)))
        }
        _ => unsupported("destructuring binding pattern", pat.span()),
    }
}

fn lower_params(params: &oxc::FormalParameters) -> R<Vec<Param>> {
    let mut out = Vec::with_capacity(params.items.len());
    for item in &params.items {
        let (pattern, default) = lower_param_pattern(&item.pattern)?;
        out.push(Param { pattern, default });
    }
    if params.rest.is_some() {
        return unsupported("rest parameter", params.span);
    }
    Ok(out)
}

fn lower_function(func: &oxc::Function) -> R<FunctionDef> {
    if func.r#async || func.generator {
        return unsupported("async/generator function", func.span);
    }
    let body = func
        .body
        .as_ref()
        .ok_or_else(|| LowerError::Unsupported {
            what: "function without body",
            span: func.span,
        })?;
    let mut stmts = Vec::with_capacity(body.statements.len());
    for stmt in &body.statements {
        stmts.push(lower_stmt(stmt)?);
    }
    Ok(FunctionDef {
        name: func.id.as_ref().map(|id| Rc::from(id.name.as_str())),
        params: lower_params(&func.params)?,
        body: FunctionBody::Block(stmts),
        is_arrow: false,
        has_use_strict_directive: has_use_strict_directive(&body.directives),
        span: func.span,
    })
}

fn lower_arrow(func: &oxc::ArrowFunctionExpression) -> R<FunctionDef> {
    if func.r#async {
        return unsupported("async arrow function", func.span);
    }
    let body = &func.body;
    let (fn_body, strict) = if func.expression {
        let first = body
            .statements
            .first()
            .ok_or_else(|| LowerError::Unsupported {
                what: "empty arrow expression body",
                span: func.span,
            })?;
        let expr = match first {
            oxc::Statement::ExpressionStatement(e) => lower_expr(&e.expression)?,
            _ => return unsupported("malformed arrow expression body", func.span),
        };
        (FunctionBody::Expr(Box::new(expr)), false)
    } else {
        let mut stmts = Vec::with_capacity(body.statements.len());
        for stmt in &body.statements {
            stmts.push(lower_stmt(stmt)?);
        }
        let strict = has_use_strict_directive(&body.directives);
        (FunctionBody::Block(stmts), strict)
    };
    Ok(FunctionDef {
        name: None,
        params: lower_params(&func.params)?,
        body: fn_body,
        is_arrow: true,
        has_use_strict_directive: strict,
        span: func.span,
    })
}

fn lower_prop_key(key: &oxc::PropertyKey) -> R<PropKey> {
    match key {
        oxc::PropertyKey::StaticIdentifier(id) => Ok(PropKey::Ident(Rc::from(id.name.as_str()))),
        oxc::PropertyKey::StringLiteral(s) => Ok(PropKey::String(Rc::from(s.value.as_str()))),
        oxc::PropertyKey::NumericLiteral(n) => Ok(PropKey::Number(n.value)),
        _ => {
            if let Some(expr) = key.as_expression() {
                Ok(PropKey::Computed(Box::new(lower_expr(expr)?)))
            } else {
                unsupported("computed property key", key.span())
            }
        }
    }
}

fn lower_expr(expr: &oxc::Expression) -> R<Expr> {
    match expr {
        oxc::Expression::BooleanLiteral(b) => Ok(Expr::BoolLit(b.value)),
        oxc::Expression::NullLiteral(_) => Ok(Expr::NullLit),
        oxc::Expression::NumericLiteral(n) => {
            let is_legacy_octal = n
                .raw
                .as_ref()
                .map(|r| crate::types::number::looks_like_legacy_octal(r.as_str()))
                .unwrap_or(false);
            Ok(Expr::NumberLit(n.value, is_legacy_octal))
        }
        oxc::Expression::StringLiteral(s) => Ok(Expr::StringLit(Rc::from(s.value.as_str()))),
        oxc::Expression::BigIntLiteral(b) => Ok(Expr::BigIntLit(Rc::from(b.raw.as_str()))),
        oxc::Expression::RegExpLiteral(r) => Ok(Expr::RegexLit {
            pattern: Rc::from(r.regex.pattern.text.as_str()),
            flags: Rc::from(r.regex.flags.to_string().as_str()),
        }),
        oxc::Expression::Identifier(id) => Ok(Expr::Ident(Rc::from(id.name.as_str()), id.span)),
        oxc::Expression::ThisExpression(t) => Ok(Expr::This(t.span)),
        oxc::Expression::ArrayExpression(arr) => {
            let mut elems = Vec::with_capacity(arr.elements.len());
            for el in &arr.elements {
                match el {
                    oxc::ArrayExpressionElement::Elision(_) => elems.push(None),
                    oxc::ArrayExpressionElement::SpreadElement(s) => {
                        return unsupported("spread element", s.span);
                    }
                    _ => {
                        if let Some(e) = el.as_expression() {
                            elems.push(Some(lower_expr(e)?));
                        } else {
                            return unsupported("array element", arr.span);
                        }
                    }
                }
            }
            Ok(Expr::ArrayLit(elems))
        }
        oxc::Expression::ObjectExpression(obj) => {
            let mut props = Vec::with_capacity(obj.properties.len());
            for p in &obj.properties {
                match p {
                    oxc::ObjectPropertyKind::ObjectProperty(prop) => {
                        let key = lower_prop_key(&prop.key)?;
                        let value = lower_expr(&prop.value)?;
                        let kind = match prop.kind {
                            oxc::PropertyKind::Init => PropKind::Init,
                            oxc::PropertyKind::Get => PropKind::Get,
                            oxc::PropertyKind::Set => PropKind::Set,
                        };
                        props.push(ObjectProp { key, value, kind });
                    }
                    oxc::ObjectPropertyKind::SpreadProperty(s) => {
                        return unsupported("spread property", s.span);
                    }
                }
            }
            Ok(Expr::ObjectLit(props))
        }
        oxc::Expression::FunctionExpression(f) => {
            Ok(Expr::Function(Rc::new(lower_function(f)?)))
        }
        oxc::Expression::ArrowFunctionExpression(f) => {
            Ok(Expr::Function(Rc::new(lower_arrow(f)?)))
        }
        oxc::Expression::UnaryExpression(u) => {
            let op = match u.operator {
                oxc_syntax::operator::UnaryOperator::UnaryNegation => UnaryOp::Minus,
                oxc_syntax::operator::UnaryOperator::UnaryPlus => UnaryOp::Plus,
                oxc_syntax::operator::UnaryOperator::LogicalNot => UnaryOp::Not,
                oxc_syntax::operator::UnaryOperator::BitwiseNot => UnaryOp::BitNot,
                oxc_syntax::operator::UnaryOperator::Typeof => UnaryOp::TypeOf,
                oxc_syntax::operator::UnaryOperator::Void => UnaryOp::Void,
                oxc_syntax::operator::UnaryOperator::Delete => UnaryOp::Delete,
            };
            Ok(Expr::Unary {
                op,
                arg: Box::new(lower_expr(&u.argument)?),
                span: u.span,
            })
        }
        oxc::Expression::UpdateExpression(u) => {
            let op = match u.operator {
                oxc_syntax::operator::UpdateOperator::Increment => UpdateOp::Increment,
                oxc_syntax::operator::UpdateOperator::Decrement => UpdateOp::Decrement,
            };
            let arg = lower_simple_assignment_target(&u.argument)?;
            Ok(Expr::Update {
                op,
                arg: Box::new(arg),
                prefix: u.prefix,
            })
        }
        oxc::Expression::BinaryExpression(b) => {
            let op = lower_binary_op(b.operator)?;
            Ok(Expr::Binary {
                op,
                left: Box::new(lower_expr(&b.left)?),
                right: Box::new(lower_expr(&b.right)?),
            })
        }
        oxc::Expression::LogicalExpression(l) => {
            let op = match l.operator {
                oxc_syntax::operator::LogicalOperator::And => LogicalOp::And,
                oxc_syntax::operator::LogicalOperator::Or => LogicalOp::Or,
                oxc_syntax::operator::LogicalOperator::Coalesce => LogicalOp::Coalesce,
            };
            Ok(Expr::Logical {
                op,
                left: Box::new(lower_expr(&l.left)?),
                right: Box::new(lower_expr(&l.right)?),
            })
        }
        oxc::Expression::AssignmentExpression(a) => {
            let target = lower_assignment_target(&a.left)?;
            let value = lower_expr(&a.right)?;
            let op = lower_assign_op(a.operator)?;
            Ok(Expr::Assign {
                op,
                target: Box::new(target),
                value: Box::new(value),
            })
        }
        oxc::Expression::ConditionalExpression(c) => Ok(Expr::Conditional {
            test: Box::new(lower_expr(&c.test)?),
            cons: Box::new(lower_expr(&c.consequent)?),
            alt: Box::new(lower_expr(&c.alternate)?),
        }),
        oxc::Expression::CallExpression(c) => {
            let mut args = Vec::with_capacity(c.arguments.len());
            for a in &c.arguments {
                match a.as_expression() {
                    Some(e) => args.push(lower_expr(e)?),
                    None => return unsupported("spread argument", c.span),
                }
            }
            Ok(Expr::Call {
                callee: Box::new(lower_expr(&c.callee)?),
                args,
                span: c.span,
            })
        }
        oxc::Expression::NewExpression(n) => {
            let mut args = Vec::with_capacity(n.arguments.len());
            for a in &n.arguments {
                match a.as_expression() {
                    Some(e) => args.push(lower_expr(e)?),
                    None => return unsupported("spread argument", n.span),
                }
            }
            Ok(Expr::New {
                callee: Box::new(lower_expr(&n.callee)?),
                args,
                span: n.span,
            })
        }
        oxc::Expression::StaticMemberExpression(m) => Ok(Expr::Member {
            obj: Box::new(lower_expr(&m.object)?),
            prop: MemberProp::Ident(Rc::from(m.property.name.as_str())),
            span: m.span,
        }),
        oxc::Expression::ComputedMemberExpression(m) => Ok(Expr::Member {
            obj: Box::new(lower_expr(&m.object)?),
            prop: MemberProp::Computed(Box::new(lower_expr(&m.expression)?)),
            span: m.span,
        }),
        oxc::Expression::SequenceExpression(s) => {
            let mut exprs = Vec::with_capacity(s.expressions.len());
            for e in &s.expressions {
                exprs.push(lower_expr(e)?);
            }
            Ok(Expr::Sequence(exprs))
        }
        oxc::Expression::ParenthesizedExpression(p) => lower_expr(&p.expression),
        _ => unsupported("expression form", expr.span()),
    }
}

fn lower_binary_op(op: oxc_syntax::operator::BinaryOperator) -> R<BinaryOp> {
    use oxc_syntax::operator::BinaryOperator as B;
    Ok(match op {
        B::Addition => BinaryOp::Add,
        B::Subtraction => BinaryOp::Sub,
        B::Multiplication => BinaryOp::Mul,
        B::Division => BinaryOp::Div,
        B::Remainder => BinaryOp::Mod,
        B::Exponential => BinaryOp::Exp,
        B::ShiftLeft => BinaryOp::ShiftLeft,
        B::ShiftRight => BinaryOp::ShiftRight,
        B::ShiftRightZeroFill => BinaryOp::ShiftRightUnsigned,
        B::BitwiseAnd => BinaryOp::BitAnd,
        B::BitwiseOR => BinaryOp::BitOr,
        B::BitwiseXOR => BinaryOp::BitXor,
        B::Equality => BinaryOp::Equal,
        B::Inequality => BinaryOp::NotEqual,
        B::StrictEquality => BinaryOp::StrictEqual,
        B::StrictInequality => BinaryOp::StrictNotEqual,
        B::LessThan => BinaryOp::LessThan,
        B::LessEqualThan => BinaryOp::LessEqual,
        B::GreaterThan => BinaryOp::GreaterThan,
        B::GreaterEqualThan => BinaryOp::GreaterEqual,
        B::Instanceof => BinaryOp::InstanceOf,
        B::In => BinaryOp::In,
    })
}

fn lower_assign_op(op: oxc_syntax::operator::AssignmentOperator) -> R<AssignOp> {
    use oxc_syntax::operator::AssignmentOperator as A;
    Ok(match op {
        A::Assign => AssignOp::Assign,
        A::Addition => AssignOp::Compound(BinaryOp::Add),
        A::Subtraction => AssignOp::Compound(BinaryOp::Sub),
        A::Multiplication => AssignOp::Compound(BinaryOp::Mul),
        A::Division => AssignOp::Compound(BinaryOp::Div),
        A::Remainder => AssignOp::Compound(BinaryOp::Mod),
        A::Exponential => AssignOp::Compound(BinaryOp::Exp),
        A::ShiftLeft => AssignOp::Compound(BinaryOp::ShiftLeft),
        A::ShiftRight => AssignOp::Compound(BinaryOp::ShiftRight),
        A::ShiftRightZeroFill => AssignOp::Compound(BinaryOp::ShiftRightUnsigned),
        A::BitwiseAnd => AssignOp::Compound(BinaryOp::BitAnd),
        A::BitwiseOR => AssignOp::Compound(BinaryOp::BitOr),
        A::BitwiseXOR => AssignOp::Compound(BinaryOp::BitXor),
        A::LogicalAnd => AssignOp::LogicalAnd,
        A::LogicalOr => AssignOp::LogicalOr,
        A::LogicalNullish => AssignOp::LogicalCoalesce,
    })
}

fn lower_simple_assignment_target(target: &oxc::SimpleAssignmentTarget) -> R<Expr> {
    match target {
        oxc::SimpleAssignmentTarget::AssignmentTargetIdentifier(id) => {
            Ok(Expr::Ident(Rc::from(id.name.as_str()), id.span))
        }
        _ => {
            if let Some(expr) = target.as_expression() {
                lower_expr(expr)
            } else {
                unsupported("assignment target", target.span())
            }
        }
    }
}

fn lower_assignment_target(target: &oxc::AssignmentTarget) -> R<Expr> {
    match target {
        oxc::AssignmentTarget::AssignmentTargetIdentifier(id) => {
            Ok(Expr::Ident(Rc::from(id.name.as_str()), id.span))
        }
        oxc::AssignmentTarget::StaticMemberExpression(m) => Ok(Expr::Member {
            obj: Box::new(lower_expr(&m.object)?),
            prop: MemberProp::Ident(Rc::from(m.property.name.as_str())),
            span: m.span,
        }),
        oxc::AssignmentTarget::ComputedMemberExpression(m) => Ok(Expr::Member {
            obj: Box::new(lower_expr(&m.object)?),
            prop: MemberProp::Computed(Box::new(lower_expr(&m.expression)?)),
            span: m.span,
        }),
        _ => unsupported("destructuring assignment target", target.span()),
    }
}

fn lower_for_init(init: &oxc::ForStatementInit) -> R<ForInit> {
    match init {
        oxc::ForStatementInit::VariableDeclaration(decl) => {
            let (kind, decls) = lower_var_declaration(decl)?;
            Ok(ForInit::VarDecl { kind, decls })
        }
        _ => {
            if let Some(expr) = init.as_expression() {
                Ok(ForInit::Expr(lower_expr(expr)?))
            } else {
                unsupported("for-init", init.span())
            }
        }
    }
}

fn lower_var_declaration(decl: &oxc::VariableDeclaration) -> R<(VarKind, Vec<VarDeclarator>)> {
    let kind = match decl.kind {
        oxc::VariableDeclarationKind::Var => VarKind::Var,
        oxc::VariableDeclarationKind::Let => VarKind::Let,
        oxc::VariableDeclarationKind::Const => VarKind::Const,
    };
    let mut decls = Vec::with_capacity(decl.declarations.len());
    for d in &decl.declarations {
        let pattern = lower_binding_pattern(&d.id)?;
        let init = match &d.init {
            Some(e) => Some(lower_expr(e)?),
            None => None,
        };
        decls.push(VarDeclarator { pattern, init });
    }
    Ok((kind, decls))
}

fn lower_stmt(stmt: &oxc::Statement) -> R<Stmt> {
    match stmt {
        oxc::Statement::ExpressionStatement(e) => Ok(Stmt::Expr(lower_expr(&e.expression)?)),
        oxc::Statement::VariableDeclaration(decl) => {
            let (kind, decls) = lower_var_declaration(decl)?;
            Ok(Stmt::VarDecl { kind, decls })
        }
        oxc::Statement::FunctionDeclaration(f) => {
            Ok(Stmt::FunctionDecl(Rc::new(lower_function(f)?)))
        }
        oxc::Statement::BlockStatement(b) => {
            let mut stmts = Vec::with_capacity(b.body.len());
            for s in &b.body {
                stmts.push(lower_stmt(s)?);
            }
            Ok(Stmt::Block(stmts))
        }
        oxc::Statement::EmptyStatement(_) => Ok(Stmt::Empty),
        oxc::Statement::IfStatement(s) => Ok(Stmt::If {
            test: lower_expr(&s.test)?,
            cons: Box::new(lower_stmt(&s.consequent)?),
            alt: match &s.alternate {
                Some(a) => Some(Box::new(lower_stmt(a)?)),
                None => None,
            },
        }),
        oxc::Statement::WhileStatement(s) => Ok(Stmt::While {
            test: lower_expr(&s.test)?,
            body: Box::new(lower_stmt(&s.body)?),
        }),
        oxc::Statement::DoWhileStatement(s) => Ok(Stmt::DoWhile {
            body: Box::new(lower_stmt(&s.body)?),
            test: lower_expr(&s.test)?,
        }),
        oxc::Statement::ForStatement(s) => {
            let init = match &s.init {
                Some(i) => Some(Box::new(lower_for_init(i)?)),
                None => None,
            };
            Ok(Stmt::For {
                init,
                test: match &s.test {
                    Some(e) => Some(lower_expr(e)?),
                    None => None,
                },
                update: match &s.update {
                    Some(e) => Some(lower_expr(e)?),
                    None => None,
                },
                body: Box::new(lower_stmt(&s.body)?),
            })
        }
        oxc::Statement::ForInStatement(s) => {
            let (decl_kind, target) = lower_for_in_left(&s.left)?;
            Ok(Stmt::ForIn {
                decl_kind,
                target,
                object: lower_expr(&s.right)?,
                body: Box::new(lower_stmt(&s.body)?),
            })
        }
        oxc::Statement::ReturnStatement(s) => Ok(Stmt::Return(match &s.argument {
            Some(e) => Some(lower_expr(e)?),
            None => None,
        })),
        oxc::Statement::BreakStatement(s) => Ok(Stmt::Break(
            s.label.as_ref().map(|l| Rc::from(l.name.as_str())),
        )),
        oxc::Statement::ContinueStatement(s) => Ok(Stmt::Continue(
            s.label.as_ref().map(|l| Rc::from(l.name.as_str())),
        )),
        oxc::Statement::ThrowStatement(s) => {
            Ok(Stmt::Throw(lower_expr(&s.argument)?, s.span))
        }
        oxc::Statement::TryStatement(s) => {
            let mut block = Vec::with_capacity(s.block.body.len());
            for st in &s.block.body {
                block.push(lower_stmt(st)?);
            }
            let catch = match &s.handler {
                Some(h) => {
                    let param = match &h.param {
                        Some(p) => Some(lower_binding_pattern(&p.pattern)?),
                        None => None,
                    };
                    let mut body = Vec::with_capacity(h.body.body.len());
                    for st in &h.body.body {
                        body.push(lower_stmt(st)?);
                    }
                    Some((param, body))
                }
                None => None,
            };
            let finally = match &s.finalizer {
                Some(f) => {
                    let mut body = Vec::with_capacity(f.body.len());
                    for st in &f.body {
                        body.push(lower_stmt(st)?);
                    }
                    Some(body)
                }
                None => None,
            };
            Ok(Stmt::Try {
                block,
                catch,
                finally,
            })
        }
        oxc::Statement::LabeledStatement(s) => Ok(Stmt::Labeled(
            Rc::from(s.label.name.as_str()),
            Box::new(lower_stmt(&s.body)?),
        )),
        oxc::Statement::SwitchStatement(s) => {
            let mut cases = Vec::with_capacity(s.cases.len());
            for c in &s.cases {
                let mut body = Vec::with_capacity(c.consequent.len());
                for st in &c.consequent {
                    body.push(lower_stmt(st)?);
                }
                cases.push(SwitchCase {
                    test: match &c.test {
                        Some(e) => Some(lower_expr(e)?),
                        None => None,
                    },
                    body,
                });
            }
            Ok(Stmt::Switch {
                disc: lower_expr(&s.discriminant)?,
                cases,
            })
        }
        _ => unsupported("statement form", stmt.span()),
    }
}

fn lower_for_in_left(
    left: &oxc::ForStatementLeft,
) -> R<(Option<VarKind>, ForInTarget)> {
    match left {
        oxc::ForStatementLeft::VariableDeclaration(decl) => {
            let kind = match decl.kind {
                oxc::VariableDeclarationKind::Var => VarKind::Var,
                oxc::VariableDeclarationKind::Let => VarKind::Let,
                oxc::VariableDeclarationKind::Const => VarKind::Const,
            };
            let d = decl
                .declarations
                .first()
                .ok_or_else(|| LowerError::Unsupported {
                    what: "empty for-in declaration",
                    span: decl.span,
                })?;
            let pattern = lower_binding_pattern(&d.id)?;
            Ok((Some(kind), ForInTarget::VarDecl(pattern)))
        }
        _ => {
            if let Some(expr) = left.as_expression() {
                Ok((None, ForInTarget::Pattern(Box::new(lower_expr(expr)?))))
            } else {
                unsupported("for-in target", left.span())
            }
        }
    }
}
