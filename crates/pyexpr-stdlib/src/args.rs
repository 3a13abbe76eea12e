//! The call convention shared by every callable.
//!
//! A call always carries positional arguments plus keyword arguments.
//! [`parse_args`] binds both against an ordered list of parameter names.

use crate::error::{StdlibError, StdlibResult};
use crate::value::Value;
use std::collections::BTreeMap;

/// Largest integer an `f64` holds exactly.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_991.0;

/// Arguments of one call: `f(a, b, key=c)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    pub positional: Vec<Value>,
    pub keywords: BTreeMap<String, Value>,
}

impl CallArgs {
    pub fn new(positional: Vec<Value>, keywords: BTreeMap<String, Value>) -> Self {
        Self {
            positional,
            keywords,
        }
    }

    /// Positional arguments only.
    pub fn positional(positional: Vec<Value>) -> Self {
        Self {
            positional,
            keywords: BTreeMap::new(),
        }
    }

    /// Add a keyword argument.
    pub fn with_keyword(mut self, name: impl Into<String>, value: Value) -> Self {
        self.keywords.insert(name.into(), value);
        self
    }
}

/// Bind `args` to `names`: the i-th positional argument becomes `names[i]`,
/// then keyword arguments are merged in.
///
/// Errors when there are more positionals than names, or when a keyword
/// repeats a parameter already bound positionally. Unknown keywords are kept
/// and reported by [`BoundArgs::finish`].
pub fn parse_args(callee: &str, args: CallArgs, names: &[&str]) -> StdlibResult<BoundArgs> {
    if args.positional.len() > names.len() {
        return Err(StdlibError::TypeError(format!(
            "{callee}() takes at most {} positional arguments ({} given)",
            names.len(),
            args.positional.len()
        )));
    }

    let mut values = BTreeMap::new();
    for (name, value) in names.iter().zip(args.positional) {
        values.insert(name.to_string(), value);
    }
    for (name, value) in args.keywords {
        if values.contains_key(&name) {
            return Err(StdlibError::TypeError(format!(
                "{callee}() got multiple values for argument '{name}'"
            )));
        }
        values.insert(name, value);
    }

    Ok(BoundArgs {
        callee: callee.to_string(),
        values,
    })
}

/// Arguments bound to parameter names by [`parse_args`].
///
/// Accessors remove what they read, so that [`BoundArgs::finish`] can reject
/// whatever is left over.
#[derive(Debug, Clone)]
pub struct BoundArgs {
    callee: String,
    values: BTreeMap<String, Value>,
}

impl BoundArgs {
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Remove and return an argument, if it was given.
    pub fn take(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    /// Remove and return an argument that must be present.
    pub fn require(&mut self, name: &str) -> StdlibResult<Value> {
        self.take(name).ok_or_else(|| {
            StdlibError::TypeError(format!(
                "{}() missing required argument '{name}'",
                self.callee
            ))
        })
    }

    /// An optional integer argument. An explicit `None` counts as absent.
    pub fn int(&mut self, name: &str) -> StdlibResult<Option<i64>> {
        match self.take(name) {
            None | Some(Value::None) => Ok(None),
            Some(value) => expect_int(&value, name).map(Some),
        }
    }

    pub fn int_or(&mut self, name: &str, default: i64) -> StdlibResult<i64> {
        Ok(self.int(name)?.unwrap_or(default))
    }

    pub fn require_int(&mut self, name: &str) -> StdlibResult<i64> {
        let value = self.require(name)?;
        expect_int(&value, name)
    }

    /// Fail on any argument nobody consumed.
    pub fn finish(self) -> StdlibResult<()> {
        match self.values.keys().next() {
            Some(name) => Err(StdlibError::TypeError(format!(
                "{}() got an unexpected keyword argument '{name}'",
                self.callee
            ))),
            None => Ok(()),
        }
    }

    pub fn into_map(self) -> BTreeMap<String, Value> {
        self.values
    }
}

/// Read an integer out of a number (or bool) value.
pub fn expect_int(value: &Value, what: &str) -> StdlibResult<i64> {
    match value {
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_EXACT_INT => Ok(*n as i64),
        Value::Number(n) => Err(StdlibError::TypeError(format!(
            "{what}: integer argument expected, got float {n}"
        ))),
        other => Err(StdlibError::TypeError(format!(
            "{what}: integer argument expected, got {}",
            other.type_name()
        ))),
    }
}
