//! Runtime values.

use crate::args::CallArgs;
use crate::date::{Constructor, PyDate, PyDateTime, PyRelativeDelta, PyTime};
use crate::error::{StdlibError, StdlibResult};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A runtime value.
///
/// Lists and tuples share [`Value::List`]. Mappings come in two flavours:
/// [`Value::Dict`] is a dictionary built by an expression's `{...}` literal
/// and supports the `.get` emulation; [`Value::Object`] is any mapping the
/// host supplies (namespaces, JSON objects) and only supports plain
/// attribute and subscript access.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<Value>),
    Dict(Dict),
    Object(BTreeMap<String, Value>),
    Date(PyDate),
    DateTime(PyDateTime),
    Time(PyTime),
    RelativeDelta(PyRelativeDelta),
    Function(PyFunction),
    Constructor(Constructor),
}

impl Value {
    /// Python-style type name, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Number(n) if n.fract() == 0.0 => "int",
            Value::Number(_) => "float",
            Value::String(_) => "str",
            Value::List(_) => "list",
            Value::Dict(_) => "dict",
            Value::Object(_) => "object",
            Value::Date(_) => "date",
            Value::DateTime(_) => "datetime",
            Value::Time(_) => "time",
            Value::RelativeDelta(_) => "relativedelta",
            Value::Function(_) => "function",
            Value::Constructor(_) => "type",
        }
    }

    /// Python truthiness: `None`, `False`, `0`, `""`, empty containers and
    /// an empty relativedelta are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Dict(dict) => !dict.is_empty(),
            Value::Object(fields) => !fields.is_empty(),
            Value::RelativeDelta(delta) => !delta.is_zero(),
            Value::Date(_)
            | Value::DateTime(_)
            | Value::Time(_)
            | Value::Function(_)
            | Value::Constructor(_) => true,
        }
    }

    /// Dates, datetimes, times and relative deltas.
    pub fn is_date_like(&self) -> bool {
        matches!(
            self,
            Value::Date(_) | Value::DateTime(_) | Value::Time(_) | Value::RelativeDelta(_)
        )
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Build a [`Value::Dict`] from key/value pairs.
    pub fn dict<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Dict(entries.into_iter().collect())
    }

    /// Build a [`Value::Object`] from key/value pairs.
    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Convert to JSON. Functions, constructors and non-finite numbers have
    /// no JSON form.
    pub fn to_json(&self) -> StdlibResult<serde_json::Value> {
        use serde_json::Value as Json;
        Ok(match self {
            Value::None => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Number(n) => number_to_json(*n)?,
            Value::String(s) => Json::String(s.clone()),
            Value::List(items) => Json::Array(
                items
                    .iter()
                    .map(Value::to_json)
                    .collect::<StdlibResult<Vec<_>>>()?,
            ),
            Value::Dict(dict) => fields_to_json(dict.iter())?,
            Value::Object(fields) => fields_to_json(fields.iter())?,
            Value::Date(d) => Json::String(d.to_string()),
            Value::DateTime(dt) => Json::String(dt.to_string()),
            Value::Time(t) => Json::String(t.to_string()),
            Value::RelativeDelta(delta) => fields_to_json(delta.fields().iter())?,
            Value::Function(_) | Value::Constructor(_) => {
                return Err(StdlibError::Serialization(format!(
                    "{} has no JSON form",
                    self.type_name()
                )));
            }
        })
    }
}

fn number_to_json(n: f64) -> StdlibResult<serde_json::Value> {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        return Ok(serde_json::Value::from(n as i64));
    }
    serde_json::Number::from_f64(n)
        .map(serde_json::Value::Number)
        .ok_or_else(|| StdlibError::Serialization(format!("{n} is not a JSON number")))
}

fn fields_to_json<'a>(
    fields: impl Iterator<Item = (&'a String, &'a Value)>,
) -> StdlibResult<serde_json::Value> {
    let mut map = serde_json::Map::new();
    for (k, v) in fields {
        map.insert(k.clone(), v.to_json()?);
    }
    Ok(serde_json::Value::Object(map))
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match json {
            Json::Null => Value::None,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            Json::Object(fields) => Value::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

/// Python `repr`-like rendering.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e16 => write!(f, "{}", *n as i64),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "'{s}'"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Dict(dict) => write_fields(f, dict.iter()),
            Value::Object(fields) => write_fields(f, fields.iter()),
            Value::Date(d) => write!(f, "{d}"),
            Value::DateTime(dt) => write!(f, "{dt}"),
            Value::Time(t) => write!(f, "{t}"),
            Value::RelativeDelta(delta) => write!(f, "{delta}"),
            Value::Function(func) => write!(f, "<function {}>", func.name()),
            Value::Constructor(ctor) => write!(f, "<class '{}'>", ctor.name()),
        }
    }
}

fn write_fields<'a>(
    f: &mut fmt::Formatter<'_>,
    fields: impl Iterator<Item = (&'a String, &'a Value)>,
) -> fmt::Result {
    write!(f, "{{")?;
    for (i, (k, v)) in fields.enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "'{k}': {v}")?;
    }
    write!(f, "}}")
}

// ══════════════════════════════════════════════════════════════════════════════
// Dict
// ══════════════════════════════════════════════════════════════════════════════

/// A dictionary built by a `{...}` literal.
///
/// Keys keep insertion order, as Python's `dict` does. Equality ignores it.
#[derive(Debug, Clone, Default)]
pub struct Dict {
    entries: Vec<(String, Value)>,
}

impl Dict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

impl PartialEq for Dict {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Dict {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut dict = Dict::new();
        for (k, v) in iter {
            dict.insert(k, v);
        }
        dict
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Functions
// ══════════════════════════════════════════════════════════════════════════════

type NativeFn = dyn Fn(CallArgs) -> StdlibResult<Value> + Send + Sync;

/// A host callable.
///
/// Functions reach the evaluator through the builtins table or the caller's
/// context. Whatever a context-supplied function does when called (side
/// effects included) is the caller's business; the evaluator only invokes it.
#[derive(Clone)]
pub struct PyFunction {
    name: String,
    func: Arc<NativeFn>,
}

impl PyFunction {
    pub fn new(
        name: impl Into<String>,
        func: impl Fn(CallArgs) -> StdlibResult<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: CallArgs) -> StdlibResult<Value> {
        (self.func)(args)
    }
}

impl fmt::Debug for PyFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<function {}>", self.name)
    }
}

/// Functions compare by identity.
impl PartialEq for PyFunction {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}
