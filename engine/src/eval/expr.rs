//! Expression evaluation (spec.md §4.5 "Expressions").

use std::rc::Rc;

use crate::abstract_ops::{self, equality, Hint};
use crate::ast::{AssignOp, BinaryOp, Expr, LogicalOp, MemberProp, PropKey, PropKind, UnaryOp, UpdateOp};
use crate::completion::{Abrupt, Completion};
use crate::execution::agent::Agent;
use crate::execution::scope::LookupResult;
use crate::types::{JsObject, ObjectKind, PropertyDescriptor, PropertyKey, Value};

/// A resolved assignment target: either a binding name or an object/key
/// pair. Resolving the base and key once up front (rather than
/// re-evaluating the member expression for both the read and the write)
/// matches the left-to-right, evaluate-once ordering spec.md §5 requires
/// of compound assignment and update expressions.
enum Target {
    Ident(Rc<str>),
    Member { obj: JsObject, key: PropertyKey },
}

pub fn eval_expr(agent: &mut Agent, expr: &Expr) -> Completion<Value> {
    match expr {
        Expr::This(_) => Ok(agent.scope.this_value().unwrap_or(Value::Undefined)),
        Expr::Ident(name, _) => eval_ident(agent, name),
        Expr::NumberLit(n, is_legacy_octal) => {
            if *is_legacy_octal && agent.strict() {
                return Err(agent.throw_error(
                    crate::execution::realm::ErrorKind::Syntax,
                    "Octal literals are not allowed in strict mode",
                ));
            }
            Ok(Value::Number(*n))
        }
        Expr::StringLit(s) => Ok(Value::from_str(s)),
        Expr::BoolLit(b) => Ok(Value::Boolean(*b)),
        Expr::NullLit => Ok(Value::Null),
        Expr::BigIntLit(raw) => {
            let digits = raw.trim_end_matches('n');
            let v = crate::types::JsBigInt::parse_str(digits)
                .ok_or_else(|| agent.throw_error(crate::execution::realm::ErrorKind::Syntax, "Invalid BigInt literal"))?;
            Ok(Value::BigInt(v))
        }
        Expr::RegexLit { pattern, flags } => Ok(Value::Object(crate::builtins::regexp::new_regexp(
            agent,
            pattern.clone(),
            flags.clone(),
        ))),
        Expr::ArrayLit(elems) => eval_array_lit(agent, elems),
        Expr::ObjectLit(props) => eval_object_lit(agent, props),
        Expr::Function(def) => Ok(Value::Object(agent.make_function_object(def))),
        Expr::Unary { op, arg, span: _ } => eval_unary(agent, *op, arg),
        Expr::Update { op, arg, prefix } => eval_update(agent, *op, arg, *prefix),
        Expr::Binary { op, left, right } => {
            let l = eval_expr(agent, left)?;
            let r = eval_expr(agent, right)?;
            apply_binary_op(agent, *op, l, r)
        }
        Expr::Logical { op, left, right } => eval_logical(agent, *op, left, right),
        Expr::Assign { op, target, value } => eval_assign(agent, *op, target, value),
        Expr::Conditional { test, cons, alt } => {
            let t = eval_expr(agent, test)?;
            if abstract_ops::to_boolean(&t) {
                eval_expr(agent, cons)
            } else {
                eval_expr(agent, alt)
            }
        }
        Expr::Call { callee, args, span: _ } => eval_call(agent, callee, args),
        Expr::New { callee, args, span: _ } => {
            let callee_val = eval_expr(agent, callee)?;
            let arg_vals = eval_args(agent, args)?;
            agent.construct(&callee_val, &arg_vals)
        }
        Expr::Member { obj, prop, span: _ } => {
            let base = eval_expr(agent, obj)?;
            let key = eval_member_key(agent, prop)?;
            let holder = agent.to_object(&base)?;
            agent.get_property(&holder, &key, agent.strict())
        }
        Expr::Sequence(exprs) => {
            let mut last = Value::Undefined;
            for e in exprs {
                last = eval_expr(agent, e)?;
            }
            Ok(last)
        }
    }
}

fn eval_ident(agent: &mut Agent, name: &str) -> Completion<Value> {
    match agent.scope.lookup(name) {
        Some(LookupResult::Value(v)) => Ok(v),
        Some(LookupResult::Tdz) => Err(agent.throw_error(
            crate::execution::realm::ErrorKind::Reference,
            format!("Cannot access '{name}' before initialization"),
        )),
        None => Err(agent.throw_error(
            crate::execution::realm::ErrorKind::Reference,
            format!("{name} is not defined"),
        )),
    }
}

fn eval_member_key(agent: &mut Agent, prop: &MemberProp) -> Completion<PropertyKey> {
    match prop {
        MemberProp::Ident(name) => Ok(PropertyKey::from_str(name)),
        MemberProp::Computed(e) => {
            let v = eval_expr(agent, e)?;
            abstract_ops::to_property_key(agent, &v)
        }
    }
}

fn eval_args(agent: &mut Agent, args: &[Expr]) -> Completion<Vec<Value>> {
    let mut out = Vec::with_capacity(args.len());
    for a in args {
        out.push(eval_expr(agent, a)?);
    }
    Ok(out)
}

fn eval_array_lit(agent: &mut Agent, elems: &[Option<Expr>]) -> Completion<Value> {
    let mut values = Vec::with_capacity(elems.len());
    for e in elems {
        values.push(match e {
            Some(expr) => eval_expr(agent, expr)?,
            None => Value::Undefined,
        });
    }
    let obj = JsObject::new(
        Some(agent.realm.array_prototype.clone()),
        ObjectKind::Array { elements: values },
    );
    Ok(Value::Object(obj))
}

fn eval_object_lit(agent: &mut Agent, props: &[crate::ast::ObjectProp]) -> Completion<Value> {
    let obj = JsObject::new(Some(agent.realm.object_prototype.clone()), ObjectKind::Ordinary);
    for prop in props {
        let key = match &prop.key {
            PropKey::Ident(name) => PropertyKey::from_str(name),
            PropKey::String(s) => PropertyKey::from_str(s),
            PropKey::Number(n) => PropertyKey::from_str(&crate::types::number::number_to_string(*n)),
            PropKey::Computed(e) => {
                let v = eval_expr(agent, e)?;
                abstract_ops::to_property_key(agent, &v)?
            }
        };
        match prop.kind {
            PropKind::Init => {
                let value = eval_expr(agent, &prop.value)?;
                let _ = obj.define_own(key, PropertyDescriptor::data(value, true, true, true));
            }
            PropKind::Get | PropKind::Set => {
                let func = eval_expr(agent, &prop.value)?;
                let existing = obj.get_own(&key);
                let (mut get, mut set) = match &existing {
                    Some(d) if d.is_accessor() => (d.getter().cloned(), d.setter().cloned()),
                    _ => (None, None),
                };
                if prop.kind == PropKind::Get {
                    get = Some(func);
                } else {
                    set = Some(func);
                }
                let _ = obj.define_own(key, PropertyDescriptor::accessor(get, set, true, true));
            }
        }
    }
    Ok(Value::Object(obj))
}

fn eval_unary(agent: &mut Agent, op: UnaryOp, arg: &Expr) -> Completion<Value> {
    match op {
        UnaryOp::TypeOf => eval_typeof(agent, arg),
        UnaryOp::Delete => eval_delete(agent, arg),
        UnaryOp::Void => {
            eval_expr(agent, arg)?;
            Ok(Value::Undefined)
        }
        UnaryOp::Not => {
            let v = eval_expr(agent, arg)?;
            Ok(Value::Boolean(!abstract_ops::to_boolean(&v)))
        }
        UnaryOp::Minus => {
            let v = eval_expr(agent, arg)?;
            abstract_ops::arithmetic::negate(agent, &v)
        }
        UnaryOp::Plus => {
            let v = eval_expr(agent, arg)?;
            Ok(Value::Number(abstract_ops::to_number(agent, &v)?))
        }
        UnaryOp::BitNot => {
            let v = eval_expr(agent, arg)?;
            abstract_ops::arithmetic::bitwise_not(agent, &v)
        }
    }
}

/// `typeof` on an unbound identifier yields `"undefined"` without raising;
/// on a binding still in its temporal dead zone it raises `ReferenceError`
/// the same as any other access (spec.md §4.5, §3.4).
fn eval_typeof(agent: &mut Agent, arg: &Expr) -> Completion<Value> {
    if let Expr::Ident(name, _) = arg {
        return match agent.scope.lookup(name) {
            Some(LookupResult::Value(v)) => Ok(Value::from_str(v.type_of())),
            Some(LookupResult::Tdz) => Err(agent.throw_error(
                crate::execution::realm::ErrorKind::Reference,
                format!("Cannot access '{name}' before initialization"),
            )),
            None => Ok(Value::from_str("undefined")),
        };
    }
    let v = eval_expr(agent, arg)?;
    Ok(Value::from_str(v.type_of()))
}

fn eval_delete(agent: &mut Agent, arg: &Expr) -> Completion<Value> {
    match arg {
        Expr::Ident(name, _) => Ok(Value::Boolean(agent.scope.clone().delete(name))),
        Expr::Member { obj, prop, .. } => {
            let base = eval_expr(agent, obj)?;
            let key = eval_member_key(agent, prop)?;
            let holder = agent.to_object(&base)?;
            let ok = holder.delete_own(&key);
            if !ok && agent.strict() {
                return Err(agent.throw_type(format!("Cannot delete property '{key}'")));
            }
            Ok(Value::Boolean(ok))
        }
        other => {
            eval_expr(agent, other)?;
            Ok(Value::Boolean(true))
        }
    }
}

fn resolve_target(agent: &mut Agent, expr: &Expr) -> Completion<Target> {
    match expr {
        Expr::Ident(name, _) => Ok(Target::Ident(name.clone())),
        Expr::Member { obj, prop, .. } => {
            let base = eval_expr(agent, obj)?;
            let key = eval_member_key(agent, prop)?;
            let holder = agent.to_object(&base)?;
            Ok(Target::Member { obj: holder, key })
        }
        _ => Err(agent.throw_type("Invalid left-hand side in assignment")),
    }
}

fn get_target(agent: &mut Agent, target: &Target) -> Completion<Value> {
    match target {
        Target::Ident(name) => eval_ident(agent, name),
        Target::Member { obj, key } => agent.get_property(obj, key, agent.strict()),
    }
}

/// Assigns `value` to a `for-in`/`for-of`-shaped assignment target (an
/// identifier or a member expression, spec.md §4.5 "for-in"), reusing the
/// same target resolution as ordinary `=` assignment.
pub fn assign_for_in_target(agent: &mut Agent, target_expr: &Expr, value: Value) -> Completion<()> {
    let target = resolve_target(agent, target_expr)?;
    set_target(agent, &target, value)
}

fn set_target(agent: &mut Agent, target: &Target, value: Value) -> Completion<()> {
    match target {
        Target::Ident(name) => agent
            .scope
            .clone()
            .set(name, value)
            .map_err(|e| agent.promote(e)),
        Target::Member { obj, key } => agent.set_property(obj, key.clone(), value, agent.strict()),
    }
}

fn eval_update(agent: &mut Agent, op: UpdateOp, arg: &Expr, prefix: bool) -> Completion<Value> {
    let target = resolve_target(agent, arg)?;
    let old = get_target(agent, &target)?;
    let old_numeric = abstract_ops::to_numeric(agent, &old)?;
    let (old_value, new_value) = match old_numeric {
        abstract_ops::Numeric::Number(n) => {
            let delta = if op == UpdateOp::Increment { 1.0 } else { -1.0 };
            (Value::Number(n), Value::Number(n + delta))
        }
        abstract_ops::Numeric::BigInt(b) => {
            let one = crate::types::JsBigInt::from_i64(1);
            let new = if op == UpdateOp::Increment {
                b.inner() + one.inner()
            } else {
                b.inner() - one.inner()
            };
            (
                Value::BigInt(b),
                Value::BigInt(crate::types::JsBigInt::from_inner(new)),
            )
        }
    };
    set_target(agent, &target, new_value.clone())?;
    Ok(if prefix { new_value } else { old_value })
}

fn eval_logical(agent: &mut Agent, op: LogicalOp, left: &Expr, right: &Expr) -> Completion<Value> {
    let l = eval_expr(agent, left)?;
    let take_right = match op {
        LogicalOp::And => abstract_ops::to_boolean(&l),
        LogicalOp::Or => !abstract_ops::to_boolean(&l),
        LogicalOp::Coalesce => l.is_nullish(),
    };
    if take_right {
        eval_expr(agent, right)
    } else {
        Ok(l)
    }
}

fn eval_assign(agent: &mut Agent, op: AssignOp, target_expr: &Expr, value_expr: &Expr) -> Completion<Value> {
    match op {
        AssignOp::Assign => {
            let target = resolve_target(agent, target_expr)?;
            let value = eval_expr(agent, value_expr)?;
            set_target(agent, &target, value.clone())?;
            Ok(value)
        }
        AssignOp::Compound(bin_op) => {
            let target = resolve_target(agent, target_expr)?;
            let old = get_target(agent, &target)?;
            let rhs = eval_expr(agent, value_expr)?;
            let new_value = apply_binary_op(agent, bin_op, old, rhs)?;
            set_target(agent, &target, new_value.clone())?;
            Ok(new_value)
        }
        AssignOp::LogicalAnd | AssignOp::LogicalOr | AssignOp::LogicalCoalesce => {
            let target = resolve_target(agent, target_expr)?;
            let old = get_target(agent, &target)?;
            let take_rhs = match op {
                AssignOp::LogicalAnd => abstract_ops::to_boolean(&old),
                AssignOp::LogicalOr => !abstract_ops::to_boolean(&old),
                AssignOp::LogicalCoalesce => old.is_nullish(),
                _ => unreachable!(),
            };
            if !take_rhs {
                return Ok(old);
            }
            let rhs = eval_expr(agent, value_expr)?;
            set_target(agent, &target, rhs.clone())?;
            Ok(rhs)
        }
    }
}

fn eval_call(agent: &mut Agent, callee: &Expr, args: &[Expr]) -> Completion<Value> {
    if let Expr::Ident(name, _) = callee {
        if &**name == "eval" {
            return eval_eval_call(agent, args);
        }
    }
    let (this, callee_val) = match callee {
        Expr::Member { obj, prop, .. } => {
            let base = eval_expr(agent, obj)?;
            let key = eval_member_key(agent, prop)?;
            let holder = agent.to_object(&base)?;
            let func = agent.get_property(&holder, &key, agent.strict())?;
            (base, func)
        }
        other => (Value::Undefined, eval_expr(agent, other)?),
    };
    let arg_vals = eval_args(agent, args)?;
    if !agent.is_callable(&callee_val) {
        return Err(agent.throw_type("is not a function"));
    }
    agent.call(&callee_val, this, &arg_vals)
}

/// `eval("...")` called through the identifier `eval`: direct if that
/// identifier resolves to the realm's built-in `eval` function (the
/// common case, since shadowing it requires a local binding named `eval`),
/// indirect otherwise. Direct eval runs in the current scope, inheriting
/// strictness; indirect eval runs at the global scope without inheriting
/// strictness (spec.md §4.5 "Call / method call").
fn eval_eval_call(agent: &mut Agent, args: &[Expr]) -> Completion<Value> {
    let arg_vals = eval_args(agent, args)?;
    let is_direct = matches!(agent.scope.lookup("eval"), Some(LookupResult::Value(Value::Object(o))) if agent.realm.eval_function.ptr_eq(&o));
    let source = match arg_vals.first() {
        Some(Value::String(s)) => s.clone(),
        Some(other) => return Ok(other.clone()),
        None => return Ok(Value::Undefined),
    };
    crate::builtins::eval_fn::perform_eval(agent, &source.to_string_lossy(), is_direct)
}

/// Shared by `Expr::Binary` and compound-assignment desugaring
/// (`lhs OP= rhs` evaluates as `lhs OP rhs` then assigns, spec.md §4.5
/// "Assignment").
pub fn apply_binary_op(agent: &mut Agent, op: BinaryOp, left: Value, right: Value) -> Completion<Value> {
    use abstract_ops::arithmetic as a;
    match op {
        BinaryOp::Add => a::add(agent, &left, &right),
        BinaryOp::Sub => a::sub(agent, &left, &right),
        BinaryOp::Mul => a::mul(agent, &left, &right),
        BinaryOp::Div => a::div(agent, &left, &right),
        BinaryOp::Mod => a::rem(agent, &left, &right),
        BinaryOp::Exp => a::exp(agent, &left, &right),
        BinaryOp::ShiftLeft => a::shl(agent, &left, &right),
        BinaryOp::ShiftRight => a::shr(agent, &left, &right),
        BinaryOp::ShiftRightUnsigned => a::shr_unsigned(agent, &left, &right),
        BinaryOp::BitAnd => a::bit_and(agent, &left, &right),
        BinaryOp::BitOr => a::bit_or(agent, &left, &right),
        BinaryOp::BitXor => a::bit_xor(agent, &left, &right),
        BinaryOp::Equal => equality::loose_equal(agent, &left, &right).map(Value::Boolean),
        BinaryOp::NotEqual => equality::loose_equal(agent, &left, &right).map(|b| Value::Boolean(!b)),
        BinaryOp::StrictEqual => Ok(Value::Boolean(equality::strict_equal(&left, &right))),
        BinaryOp::StrictNotEqual => Ok(Value::Boolean(!equality::strict_equal(&left, &right))),
        BinaryOp::LessThan => Ok(Value::Boolean(
            abstract_ops::less_than(agent, &left, &right)? == abstract_ops::Tri::True,
        )),
        BinaryOp::LessEqual => abstract_ops::less_or_equal(agent, &left, &right).map(Value::Boolean),
        BinaryOp::GreaterThan => Ok(Value::Boolean(
            abstract_ops::less_than(agent, &right, &left)? == abstract_ops::Tri::True,
        )),
        BinaryOp::GreaterEqual => abstract_ops::less_or_equal(agent, &right, &left).map(Value::Boolean),
        BinaryOp::InstanceOf => eval_instanceof(agent, &left, &right),
        BinaryOp::In => eval_in(agent, &left, &right),
    }
}

fn eval_instanceof(agent: &mut Agent, left: &Value, right: &Value) -> Completion<Value> {
    let ctor = match right {
        Value::Object(o) if o.is_callable() => o.clone(),
        _ => return Err(agent.throw_type("Right-hand side of 'instanceof' is not callable")),
    };
    let proto_val = agent.get_property(&ctor, &PropertyKey::from_str("prototype"), agent.strict())?;
    let proto = match proto_val {
        Value::Object(o) => o,
        _ => return Err(agent.throw_type("Function has non-object prototype in instanceof check")),
    };
    match left {
        Value::Object(o) => Ok(Value::Boolean(proto.is_prototype_of(o))),
        _ => Ok(Value::Boolean(false)),
    }
}

fn eval_in(agent: &mut Agent, left: &Value, right: &Value) -> Completion<Value> {
    let key = abstract_ops::to_property_key(agent, left)?;
    let obj = match right {
        Value::Object(o) => o.clone(),
        _ => return Err(agent.throw_type("Cannot use 'in' operator to search for a key in a non-object value")),
    };
    Ok(Value::Boolean(obj.get_descriptor(&key).is_some()))
}
