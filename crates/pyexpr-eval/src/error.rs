//! Runtime error types for the pyexpr evaluator.

use pyexpr_stdlib::StdlibError;
use thiserror::Error;

/// Evaluation error. Every variant is fatal to the call that raised it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// A `Name` found in neither the context nor the builtins.
    #[error("Name '{0}' is not defined")]
    UnboundName(String),

    /// JSON that is well-formed but not a recognized AST node.
    #[error("unsupported AST node: {0}")]
    UnsupportedNode(String),

    /// An operator tag outside the unary, binary or boolean sets.
    #[error("unknown {kind} operator: {op}")]
    UnsupportedOperator { kind: &'static str, op: String },

    /// A method the dict emulation does not provide (only `get` exists).
    #[error("'{type_name}' object has no attribute '{name}'")]
    UnsupportedAttribute {
        type_name: &'static str,
        name: String,
    },

    /// Python `TypeError`: bad operand types, calling a non-callable, etc.
    #[error("TypeError: {0}")]
    TypeMismatch(String),

    /// Python `ZeroDivisionError`.
    #[error("ZeroDivisionError: {0}")]
    ZeroDivision(String),

    /// Malformed JSON at the decoding boundary.
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// Raised by a builtin, a host function or a date constructor.
    #[error(transparent)]
    Builtin(#[from] StdlibError),
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;
