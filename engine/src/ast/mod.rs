//! Owned abstract syntax tree.
//!
//! The external parser (`oxc_parser`) hands back a borrowed, arena-allocated
//! tree tied to the lifetime of its `oxc_allocator::Allocator`. Programs in
//! this engine can outlive a single parse (a function defined by a Test262
//! "includes" harness file is called from the main test body, parsed
//! separately, against the same `Agent`), so [`lower`] walks the borrowed
//! tree once and produces this owned, `'static`, reference-counted tree that
//! the evaluator actually runs against. This is the one translation step the
//! rest of the crate does not need to know about: everywhere else, "the AST"
//! means the types below.

pub mod lower;

use std::rc::Rc;

use oxc_span::Span;

pub type P<T> = Rc<T>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

/// A binding target. Destructuring patterns in declarations are out of
/// scope; every binding names a single identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub name: Rc<str>,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub pattern: Pattern,
    pub default: Option<Expr>,
}

#[derive(Debug, Clone)]
pub enum FunctionBody {
    Block(Vec<Stmt>),
    /// Arrow function with a concise (expression) body.
    Expr(Box<Expr>),
}

#[derive(Debug)]
pub struct FunctionDef {
    pub name: Option<Rc<str>>,
    pub params: Vec<Param>,
    pub body: FunctionBody,
    pub is_arrow: bool,
    /// Whether the function body opens with a `"use strict"` directive.
    /// Combined at call time with the defining scope's own strictness.
    pub has_use_strict_directive: bool,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Minus,
    Plus,
    Not,
    BitNot,
    TypeOf,
    Void,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
    ShiftLeft,
    ShiftRight,
    ShiftRightUnsigned,
    BitAnd,
    BitOr,
    BitXor,
    Equal,
    NotEqual,
    StrictEqual,
    StrictNotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
    InstanceOf,
    In,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
    Coalesce,
}

/// `None` means plain `=`; `Some(op)` means a compound assignment such as
/// `+=`, desugared at evaluation time into `lhs = lhs op rhs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Compound(BinaryOp),
    LogicalAnd,
    LogicalOr,
    LogicalCoalesce,
}

#[derive(Debug, Clone)]
pub enum PropKey {
    Ident(Rc<str>),
    String(Rc<str>),
    Number(f64),
    Computed(Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropKind {
    Init,
    Get,
    Set,
}

#[derive(Debug, Clone)]
pub struct ObjectProp {
    pub key: PropKey,
    pub value: Expr,
    pub kind: PropKind,
}

#[derive(Debug, Clone)]
pub enum MemberProp {
    Ident(Rc<str>),
    Computed(Box<Expr>),
}

#[derive(Debug, Clone)]
pub enum Expr {
    This(Span),
    Ident(Rc<str>, Span),
    /// The `bool` flags a legacy octal-form literal (`^0\d+`, e.g. `0123`):
    /// valid in sloppy mode, a `SyntaxError` at evaluation in strict mode
    /// (spec.md §4.5 "Literal").
    NumberLit(f64, bool),
    StringLit(Rc<str>),
    BoolLit(bool),
    NullLit,
    BigIntLit(Rc<str>),
    RegexLit { pattern: Rc<str>, flags: Rc<str> },
    ArrayLit(Vec<Option<Expr>>),
    ObjectLit(Vec<ObjectProp>),
    Function(P<FunctionDef>),
    Unary { op: UnaryOp, arg: Box<Expr>, span: Span },
    Update { op: UpdateOp, arg: Box<Expr>, prefix: bool },
    Binary { op: BinaryOp, left: Box<Expr>, right: Box<Expr> },
    Logical { op: LogicalOp, left: Box<Expr>, right: Box<Expr> },
    Assign { op: AssignOp, target: Box<Expr>, value: Box<Expr> },
    Conditional { test: Box<Expr>, cons: Box<Expr>, alt: Box<Expr> },
    Call { callee: Box<Expr>, args: Vec<Expr>, span: Span },
    New { callee: Box<Expr>, args: Vec<Expr>, span: Span },
    Member { obj: Box<Expr>, prop: MemberProp, span: Span },
    Sequence(Vec<Expr>),
}

#[derive(Debug, Clone)]
pub struct VarDeclarator {
    pub pattern: Pattern,
    pub init: Option<Expr>,
}

#[derive(Debug, Clone)]
pub struct SwitchCase {
    pub test: Option<Expr>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Expr(Expr),
    VarDecl { kind: VarKind, decls: Vec<VarDeclarator> },
    FunctionDecl(P<FunctionDef>),
    Block(Vec<Stmt>),
    Empty,
    If { test: Expr, cons: Box<Stmt>, alt: Option<Box<Stmt>> },
    While { test: Expr, body: Box<Stmt> },
    DoWhile { body: Box<Stmt>, test: Expr },
    For {
        init: Option<Box<ForInit>>,
        test: Option<Expr>,
        update: Option<Expr>,
        body: Box<Stmt>,
    },
    ForIn {
        decl_kind: Option<VarKind>,
        target: ForInTarget,
        object: Expr,
        body: Box<Stmt>,
    },
    Return(Option<Expr>),
    Break(Option<Rc<str>>),
    Continue(Option<Rc<str>>),
    Throw(Expr, Span),
    Try {
        block: Vec<Stmt>,
        catch: Option<(Option<Pattern>, Vec<Stmt>)>,
        finally: Option<Vec<Stmt>>,
    },
    Labeled(Rc<str>, Box<Stmt>),
    Switch { disc: Expr, cases: Vec<SwitchCase> },
}

#[derive(Debug, Clone)]
pub enum ForInit {
    VarDecl { kind: VarKind, decls: Vec<VarDeclarator> },
    Expr(Expr),
}

#[derive(Debug, Clone)]
pub enum ForInTarget {
    VarDecl(Pattern),
    Pattern(Box<Expr>),
}

#[derive(Debug)]
pub struct Program {
    pub body: Vec<Stmt>,
    pub has_use_strict_directive: bool,
}
