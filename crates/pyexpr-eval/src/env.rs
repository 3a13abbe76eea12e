//! Layered name resolution for the evaluator.

use pyexpr_stdlib::Value;
use std::collections::BTreeMap;

/// Variable bindings supplied by the caller.
pub type Context = BTreeMap<String, Value>;

/// Read-only scope chain.
///
/// The outermost scope is the builtins table; the caller's context sits on
/// top. Lookups search from the innermost scope outward. Scopes are
/// borrowed, so the evaluator can never write to a caller's bindings.
#[derive(Debug, Clone)]
pub struct Environment<'a> {
    scopes: Vec<&'a BTreeMap<String, Value>>,
}

impl<'a> Environment<'a> {
    /// Create an environment whose only scope is `globals`.
    pub fn new(globals: &'a BTreeMap<String, Value>) -> Self {
        Self {
            scopes: vec![globals],
        }
    }

    /// Push a scope that shadows everything below it.
    pub fn push_scope(&mut self, scope: &'a BTreeMap<String, Value>) {
        self.scopes.push(scope);
    }

    /// Look up a name, searching from innermost to outermost scope.
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        for (depth, scope) in self.scopes.iter().enumerate().rev() {
            if let Some(value) = scope.get(name) {
                if depth == 0 && self.scopes.len() > 1 {
                    tracing::trace!(name, "resolved from globals");
                }
                return Some(value);
            }
        }
        None
    }
}
