//! The builtins table: names every expression can see beneath its context.

use crate::args::{parse_args, CallArgs};
use crate::date::{strftime, Constructor, PyDate};
use crate::error::StdlibError;
use crate::value::{PyFunction, Value};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

/// Named global values: `bool`, `context_today`, `today`, `now`,
/// `current_date`, `time`, `datetime`, `relativedelta`, `true`, `false`.
///
/// Time-dependent builtins read one clock reading taken when the table is
/// built, so every name in a single evaluation agrees on "now".
#[derive(Debug, Clone)]
pub struct Builtins {
    names: BTreeMap<String, Value>,
    now: NaiveDateTime,
}

impl Builtins {
    /// Builtins reading the local wall clock.
    pub fn new() -> Self {
        Self::at(chrono::Local::now().naive_local())
    }

    /// Builtins with a pinned clock.
    pub fn at(now: NaiveDateTime) -> Self {
        let mut names = BTreeMap::new();
        let today = now.date();

        names.insert("bool".to_string(), Value::Function(bool_fn()));
        names.insert(
            "context_today".to_string(),
            Value::Function(PyFunction::new("context_today", move |args| {
                parse_args("context_today", args, &[])?.finish()?;
                Ok(Value::Date(PyDate(today)))
            })),
        );
        let today_str = today.format("%Y-%m-%d").to_string();
        names.insert("today".to_string(), Value::String(today_str.clone()));
        names.insert("current_date".to_string(), Value::String(today_str));
        names.insert(
            "now".to_string(),
            Value::String(now.format("%Y-%m-%d %H:%M:%S").to_string()),
        );
        names.insert(
            "time".to_string(),
            Value::object([(
                "strftime",
                Value::Function(PyFunction::new("strftime", move |args| {
                    let mut bound = parse_args("strftime", args, &["format"])?;
                    let format = bound.require("format")?;
                    bound.finish()?;
                    match format {
                        Value::String(format) => strftime(now, &format).map(Value::String),
                        other => Err(StdlibError::TypeError(format!(
                            "strftime() argument must be str, not {}",
                            other.type_name()
                        ))),
                    }
                })),
            )]),
        );
        names.insert(
            "datetime".to_string(),
            Value::object([
                ("date", Value::Constructor(Constructor::Date)),
                ("datetime", Value::Constructor(Constructor::DateTime)),
                ("time", Value::Constructor(Constructor::Time)),
            ]),
        );
        names.insert(
            "relativedelta".to_string(),
            Value::Constructor(Constructor::RelativeDelta),
        );
        names.insert("true".to_string(), Value::Bool(true));
        names.insert("false".to_string(), Value::Bool(false));

        Self { names, now }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.names.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Add or replace a builtin (e.g. a host-specific helper function).
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.names.insert(name.into(), value);
    }

    /// The whole table, for layering under an evaluation context.
    pub fn names(&self) -> &BTreeMap<String, Value> {
        &self.names
    }

    /// `class.name` for a constructor, e.g. `datetime.datetime.now`, read
    /// against this table's clock.
    pub fn class_attr(&self, class: Constructor, name: &str) -> Value {
        class.attr(name, self.now)
    }
}

impl Default for Builtins {
    fn default() -> Self {
        Self::new()
    }
}

/// `bool(x=False)`
fn bool_fn() -> PyFunction {
    PyFunction::new("bool", |args: CallArgs| {
        let mut bound = parse_args("bool", args, &["x"])?;
        let value = bound.take("x").unwrap_or(Value::Bool(false));
        bound.finish()?;
        Ok(Value::Bool(value.is_truthy()))
    })
}
