//! pyexpr evaluator as a WASM module for browser environments.
//!
//! This crate exposes JSON-in, JSON-out evaluation via `wasm-bindgen`,
//! suitable for running in a browser Web Worker.
//!
//! # Usage (JavaScript)
//!
//! ```js
//! import init, { evaluate } from 'pyexpr-wasm';
//!
//! await init();
//!
//! const ast = { type: "BinaryOperator", op: "+",
//!               left: { type: "Name", value: "x" },
//!               right: { type: "Number", value: 1 } };
//! const result = evaluate(JSON.stringify(ast), JSON.stringify({ x: 41 }));
//! console.log(JSON.parse(result));
//! // { success: true, value: 42 }
//! ```

use pyexpr_eval::{evaluate_json, EvalResponse, Evaluator};
use wasm_bindgen::prelude::*;

/// Evaluate a JSON-encoded AST against a JSON-encoded context object.
///
/// Returns a JSON string containing an `EvalResponse`:
/// ```json
/// { "success": true, "value": 42 }
/// ```
///
/// On failure, `success` is `false` and `error` holds the message. An empty
/// `context_json` is treated as `{}`.
#[wasm_bindgen]
pub fn evaluate(ast_json: &str, context_json: &str) -> String {
    let response = EvalResponse::from(evaluate_json(
        &Evaluator::default(),
        ast_json,
        context_json,
    ));
    serde_json::to_string(&response).unwrap_or_else(|e| {
        format!(
            r#"{{"success":false,"error":"Serialization error: {}"}}"#,
            e.to_string().replace('"', "'")
        )
    })
}

/// Return the evaluator version string.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn call(ast: &str, context: &str) -> Value {
        serde_json::from_str(&evaluate(ast, context)).unwrap()
    }

    #[test]
    fn test_success_envelope() {
        let ast = r#"{"type": "List", "value": [{"type": "String", "value": "a"}, {"type": "None"}]}"#;
        assert_eq!(call(ast, ""), json!({"success": true, "value": ["a", null]}));
    }

    #[test]
    fn test_error_envelope() {
        let out = call(r#"{"type": "Name", "value": "foo"}"#, "{}");
        assert_eq!(
            out,
            json!({"success": false, "error": "Name 'foo' is not defined"})
        );
    }

    #[test]
    fn test_malformed_input() {
        let out = call("{", "{}");
        assert_eq!(out["success"], json!(false));
        assert!(out["error"].as_str().unwrap().starts_with("invalid JSON"));
    }

    #[test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }
}
