//! Core expression evaluator.

use crate::compare::{bool_to_number, is_equal, is_in, is_less};
use crate::env::{Context, Environment};
use crate::error::{EvalError, EvalResult};
use pyexpr_stdlib::{parse_args, Builtins, CallArgs, Dict, PyFunction, Value};
use pyexpr_types::{BinaryOp, BoolOp, Expr, UnaryOp};
use std::collections::BTreeMap;

/// Evaluate `ast` against `context`, with the default builtins (local clock).
pub fn evaluate(ast: &Expr, context: &Context) -> EvalResult<Value> {
    Evaluator::default().evaluate(ast, context)
}

/// Evaluates expression trees against a builtins table.
///
/// Holds no per-call state: one evaluator can serve any number of calls,
/// from any thread.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    builtins: Builtins,
}

impl Evaluator {
    pub fn new(builtins: Builtins) -> Self {
        Self { builtins }
    }

    /// Reduce `ast` to a value. Names resolve in `context` first, then in
    /// the builtins.
    #[tracing::instrument(level = "debug", skip_all, fields(node = ast.kind()))]
    pub fn evaluate(&self, ast: &Expr, context: &Context) -> EvalResult<Value> {
        let mut env = Environment::new(self.builtins.names());
        env.push_scope(context);
        let evaluation = Evaluation {
            env,
            builtins: &self.builtins,
        };
        let result = evaluation.eval_expr(ast);
        if let Err(err) = &result {
            tracing::debug!(%err, "evaluation failed");
        }
        result
    }
}

/// One `evaluate` call: walks the tree over a fixed scope chain.
struct Evaluation<'a> {
    env: Environment<'a>,
    builtins: &'a Builtins,
}

impl Evaluation<'_> {
    fn eval_expr(&self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Number { value } => Ok(Value::Number(*value)),
            Expr::String { value } => Ok(Value::String(value.clone())),
            Expr::Boolean { value } => Ok(Value::Bool(*value)),
            Expr::None => Ok(Value::None),

            Expr::Name { value } => self.eval_name(value),

            Expr::UnaryOperator { op, right } => self.eval_unary(op, right),
            Expr::BinaryOperator { op, left, right } => self.eval_binary(op, left, right),
            Expr::BooleanOperator { op, left, right } => self.eval_boolean(op, left, right),

            Expr::List { value } | Expr::Tuple { value } => self.eval_sequence(value),
            Expr::Dictionary { value } => self.eval_dictionary(value),

            Expr::FunctionCall {
                callee,
                args,
                kwargs,
            } => self.eval_call(callee, args, kwargs),
            Expr::Lookup { target, key } => self.eval_lookup(target, key),
            Expr::If {
                condition,
                if_true,
                if_false,
            } => self.eval_if(condition, if_true, if_false),
            Expr::ObjLookup { obj, key } => self.eval_obj_lookup(obj, key),
        }
    }

    // ── Names & Literals ─────────────────────────────────────────────────

    fn eval_name(&self, name: &str) -> EvalResult<Value> {
        self.env
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::UnboundName(name.to_string()))
    }

    fn eval_sequence(&self, elems: &[Expr]) -> EvalResult<Value> {
        let mut values = Vec::with_capacity(elems.len());
        for elem in elems {
            values.push(self.eval_expr(elem)?);
        }
        Ok(Value::List(values))
    }

    /// A literal always produces a fresh [`Dict`], the only kind of value
    /// the `.get` emulation applies to.
    fn eval_dictionary(&self, entries: &[(String, Expr)]) -> EvalResult<Value> {
        let mut dict = Dict::new();
        for (key, value) in entries {
            dict.insert(key.clone(), self.eval_expr(value)?);
        }
        Ok(Value::Dict(dict))
    }

    // ── Operators ────────────────────────────────────────────────────────

    fn eval_unary(&self, op: &str, operand: &Expr) -> EvalResult<Value> {
        let op = UnaryOp::parse(op).ok_or_else(|| EvalError::UnsupportedOperator {
            kind: "unary",
            op: op.to_string(),
        })?;
        let val = self.eval_expr(operand)?;
        match op {
            UnaryOp::Neg => match val {
                Value::Number(n) => Ok(Value::Number(-n)),
                Value::Bool(b) => Ok(Value::Number(-bool_to_number(b))),
                Value::RelativeDelta(delta) => Ok(Value::RelativeDelta(delta.negate())),
                other => Err(EvalError::TypeMismatch(format!(
                    "bad operand type for unary -: '{}'",
                    other.type_name()
                ))),
            },
            UnaryOp::Pos => Ok(val),
            UnaryOp::Not => Ok(Value::Bool(!val.is_truthy())),
        }
    }

    /// `and` / `or` return one of their operands, not a bool, and never
    /// evaluate the right side once the left decides.
    fn eval_boolean(&self, op: &str, left: &Expr, right: &Expr) -> EvalResult<Value> {
        let op = BoolOp::parse(op).ok_or_else(|| EvalError::UnsupportedOperator {
            kind: "boolean",
            op: op.to_string(),
        })?;
        let lv = self.eval_expr(left)?;
        match op {
            BoolOp::And if !lv.is_truthy() => Ok(lv),
            BoolOp::Or if lv.is_truthy() => Ok(lv),
            _ => self.eval_expr(right),
        }
    }

    fn eval_binary(&self, op: &str, left: &Expr, right: &Expr) -> EvalResult<Value> {
        let op = BinaryOp::parse(op).ok_or_else(|| EvalError::UnsupportedOperator {
            kind: "binary",
            op: op.to_string(),
        })?;
        let lv = self.eval_expr(left)?;
        let rv = self.eval_expr(right)?;
        apply_binary(op, &lv, &rv)
    }

    // ── Calls & Access ───────────────────────────────────────────────────

    /// Arguments are evaluated left to right: positionals, then keywords.
    fn eval_call(
        &self,
        callee: &Expr,
        args: &[Expr],
        kwargs: &[(String, Expr)],
    ) -> EvalResult<Value> {
        let callee = self.eval_expr(callee)?;
        let mut positional = Vec::with_capacity(args.len());
        for arg in args {
            positional.push(self.eval_expr(arg)?);
        }
        let mut keywords = BTreeMap::new();
        for (name, value) in kwargs {
            keywords.insert(name.clone(), self.eval_expr(value)?);
        }
        let call_args = CallArgs::new(positional, keywords);

        match callee {
            Value::Constructor(ctor) => Ok(ctor.create(call_args)?),
            Value::Function(func) => func.call(call_args).map_err(|err| {
                tracing::debug!(function = func.name(), %err, "call failed");
                EvalError::from(err)
            }),
            other => Err(EvalError::TypeMismatch(format!(
                "'{}' object is not callable",
                other.type_name()
            ))),
        }
    }

    fn eval_lookup(&self, target: &Expr, key: &Expr) -> EvalResult<Value> {
        let target = self.eval_expr(target)?;
        let key = self.eval_expr(key)?;
        subscript(&target, &key)
    }

    /// Exactly one branch is evaluated.
    fn eval_if(&self, condition: &Expr, if_true: &Expr, if_false: &Expr) -> EvalResult<Value> {
        if self.eval_expr(condition)?.is_truthy() {
            self.eval_expr(if_true)
        } else {
            self.eval_expr(if_false)
        }
    }

    fn eval_obj_lookup(&self, obj: &Expr, name: &str) -> EvalResult<Value> {
        let obj = self.eval_expr(obj)?;
        match &obj {
            Value::Dict(dict) => dict_method(dict, name),
            value if value.is_date_like() => Ok(date_attr(value, name)),
            Value::Object(fields) => Ok(fields.get(name).cloned().unwrap_or(Value::None)),
            Value::Constructor(class) => Ok(self.builtins.class_attr(*class, name)),
            Value::None => Err(EvalError::TypeMismatch(format!(
                "'NoneType' object has no attribute '{name}'"
            ))),
            _ => Ok(Value::None),
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Binary operators
// ══════════════════════════════════════════════════════════════════════════════

fn apply_binary(op: BinaryOp, lv: &Value, rv: &Value) -> EvalResult<Value> {
    match op {
        BinaryOp::Add => eval_add(lv, rv),
        BinaryOp::Sub => eval_sub(lv, rv),
        BinaryOp::Mul => eval_arith(lv, rv, op, |a, b| a * b),
        BinaryOp::Div => {
            check_divisor(rv, "division by zero")?;
            eval_arith(lv, rv, op, |a, b| a / b)
        }
        BinaryOp::Mod => {
            check_divisor(rv, "modulo by zero")?;
            eval_arith(lv, rv, op, python_mod)
        }
        BinaryOp::FloorDiv => {
            check_divisor(rv, "integer division or modulo by zero")?;
            eval_arith(lv, rv, op, |a, b| (a / b).floor())
        }
        BinaryOp::Pow => {
            if let (Some(base), Some(exp)) = (as_number(lv), as_number(rv)) {
                if base == 0.0 && exp < 0.0 {
                    return Err(EvalError::ZeroDivision(
                        "0.0 cannot be raised to a negative power".into(),
                    ));
                }
            }
            eval_arith(lv, rv, op, f64::powf)
        }
        BinaryOp::Eq => Ok(Value::Bool(is_equal(lv, rv))),
        BinaryOp::NotEq => Ok(Value::Bool(!is_equal(lv, rv))),
        BinaryOp::Less => Ok(Value::Bool(is_less(lv, rv)?)),
        BinaryOp::Greater => Ok(Value::Bool(is_less(rv, lv)?)),
        BinaryOp::LessEq => Ok(Value::Bool(is_equal(lv, rv) || is_less(lv, rv)?)),
        BinaryOp::GreaterEq => Ok(Value::Bool(is_equal(lv, rv) || is_less(rv, lv)?)),
        BinaryOp::In => Ok(Value::Bool(is_in(lv, rv))),
        BinaryOp::NotIn => Ok(Value::Bool(!is_in(lv, rv))),
    }
}

/// A relative delta on either side turns `+` into date arithmetic.
fn eval_add(lv: &Value, rv: &Value) -> EvalResult<Value> {
    match (lv, rv) {
        (Value::RelativeDelta(delta), other) | (other, Value::RelativeDelta(delta)) => {
            Ok(delta.add_to(other)?)
        }
        (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{a}{b}"))),
        (Value::List(a), Value::List(b)) => {
            Ok(Value::List(a.iter().chain(b.iter()).cloned().collect()))
        }
        _ => eval_arith(lv, rv, BinaryOp::Add, |a, b| a + b),
    }
}

fn eval_sub(lv: &Value, rv: &Value) -> EvalResult<Value> {
    match (lv, rv) {
        (Value::Date(_) | Value::DateTime(_), Value::RelativeDelta(delta)) => {
            Ok(delta.negate().add_to(lv)?)
        }
        _ => eval_arith(lv, rv, BinaryOp::Sub, |a, b| a - b),
    }
}

fn eval_arith(lv: &Value, rv: &Value, op: BinaryOp, f: fn(f64, f64) -> f64) -> EvalResult<Value> {
    match (as_number(lv), as_number(rv)) {
        (Some(a), Some(b)) => Ok(Value::Number(f(a, b))),
        _ => Err(EvalError::TypeMismatch(format!(
            "unsupported operand type(s) for {}: '{}' and '{}'",
            op.as_str(),
            lv.type_name(),
            rv.type_name()
        ))),
    }
}

fn check_divisor(rv: &Value, message: &str) -> EvalResult<()> {
    match as_number(rv) {
        Some(n) if n == 0.0 => Err(EvalError::ZeroDivision(message.to_string())),
        _ => Ok(()),
    }
}

/// The result takes the sign of the divisor.
fn python_mod(a: f64, b: f64) -> f64 {
    let m = a % b;
    if m != 0.0 && (m < 0.0) != (b < 0.0) {
        m + b
    } else {
        m
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => Some(*n),
        Value::Bool(b) => Some(bool_to_number(*b)),
        _ => None,
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Subscript & attributes
// ══════════════════════════════════════════════════════════════════════════════

/// `target[key]`. A missing key or index yields `None`.
fn subscript(target: &Value, key: &Value) -> EvalResult<Value> {
    let found = match (target, key) {
        (Value::None, _) => {
            return Err(EvalError::TypeMismatch(
                "'NoneType' object is not subscriptable".into(),
            ));
        }
        (Value::List(items), key) => index(items.len(), key).map(|i| items[i].clone()),
        (Value::String(s), key) => {
            let chars: Vec<char> = s.chars().collect();
            index(chars.len(), key).map(|i| Value::String(chars[i].to_string()))
        }
        (Value::Dict(dict), Value::String(k)) => dict.get(k).cloned(),
        (Value::Object(fields), Value::String(k)) => fields.get(k).cloned(),
        _ => None,
    };
    Ok(found.unwrap_or(Value::None))
}

/// Resolve a possibly negative integer index against `len`.
fn index(len: usize, key: &Value) -> Option<usize> {
    let n = match key {
        Value::Number(n) if n.fract() == 0.0 => *n as i64,
        Value::Bool(b) => i64::from(*b),
        _ => return None,
    };
    let len = len as i64;
    let i = if n < 0 { n + len } else { n };
    (0..len).contains(&i).then_some(i as usize)
}

/// Dict method emulation. Only `get(key, defValue)` exists; the returned
/// function is bound to a snapshot of `dict`.
fn dict_method(dict: &Dict, name: &str) -> EvalResult<Value> {
    match name {
        "get" => {
            let dict = dict.clone();
            Ok(Value::Function(PyFunction::new("get", move |args| {
                let mut bound = parse_args("get", args, &["key", "defValue"])?;
                let key = bound.require("key")?;
                let default = bound.take("defValue");
                bound.finish()?;
                let found = key.as_str().and_then(|k| dict.get(k)).cloned();
                Ok(found.or(default).unwrap_or(Value::None))
            })))
        }
        _ => Err(EvalError::UnsupportedAttribute {
            type_name: "dict",
            name: name.to_string(),
        }),
    }
}

/// Named property of a date-like value; methods come back bound.
fn date_attr(value: &Value, name: &str) -> Value {
    match value {
        Value::Date(date) => date.attr(name),
        Value::DateTime(dt) => dt.attr(name),
        Value::Time(time) => time.attr(name),
        Value::RelativeDelta(delta) => delta.attr(name),
        _ => Value::None,
    }
}
