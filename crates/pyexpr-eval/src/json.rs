//! JSON boundary: decode ASTs and contexts, encode results.

use crate::env::Context;
use crate::error::{EvalError, EvalResult};
use crate::evaluator::Evaluator;
use pyexpr_stdlib::Value;
use pyexpr_types::Expr;
use serde::Serialize;
use serde_json::error::Category;

/// Decode an AST from its JSON form.
///
/// A `type` tag outside the known node set is an
/// [`EvalError::UnsupportedNode`]; anything else that fails to decode is
/// [`EvalError::InvalidJson`].
pub fn parse_ast(json: &str) -> EvalResult<Expr> {
    serde_json::from_str(json).map_err(classify)
}

/// Decode a context object. Empty input is an empty context.
pub fn parse_context(json: &str) -> EvalResult<Context> {
    if json.trim().is_empty() {
        return Ok(Context::new());
    }
    match serde_json::from_str::<serde_json::Value>(json) {
        Ok(serde_json::Value::Object(fields)) => Ok(fields
            .into_iter()
            .map(|(name, value)| (name, Value::from(value)))
            .collect()),
        Ok(other) => Err(EvalError::InvalidJson(format!(
            "context must be an object, got {}",
            json_kind(&other)
        ))),
        Err(err) => Err(EvalError::InvalidJson(err.to_string())),
    }
}

/// Decode both inputs, evaluate, and encode the result as JSON.
pub fn evaluate_json(
    evaluator: &Evaluator,
    ast_json: &str,
    context_json: &str,
) -> EvalResult<serde_json::Value> {
    let ast = parse_ast(ast_json)?;
    let context = parse_context(context_json)?;
    let value = evaluator.evaluate(&ast, &context)?;
    Ok(value.to_json()?)
}

fn classify(err: serde_json::Error) -> EvalError {
    let message = err.to_string();
    match err.classify() {
        Category::Data if message.starts_with("unknown variant") => {
            EvalError::UnsupportedNode(message)
        }
        _ => EvalError::InvalidJson(message),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Envelope returned across the host boundary.
///
/// ```json
/// { "success": true, "value": 42 }
/// { "success": false, "error": "Name 'foo' is not defined" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvalResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EvalResponse {
    pub fn ok(value: serde_json::Value) -> Self {
        Self {
            success: true,
            value: Some(value),
            error: None,
        }
    }

    pub fn err(error: &EvalError) -> Self {
        Self {
            success: false,
            value: None,
            error: Some(error.to_string()),
        }
    }
}

impl From<EvalResult<serde_json::Value>> for EvalResponse {
    fn from(result: EvalResult<serde_json::Value>) -> Self {
        match result {
            Ok(value) => Self::ok(value),
            Err(err) => Self::err(&err),
        }
    }
}
