//! Errors raised by builtins and host values.

use thiserror::Error;

/// An error raised while calling a builtin or constructing a host value.
///
/// Variants follow the Python exception a builtin would raise, so that the
/// evaluator can surface them unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StdlibError {
    /// Wrong argument count, wrong argument type, unexpected keyword.
    #[error("TypeError: {0}")]
    TypeError(String),

    /// Right type, bad value (e.g. `date(2024, 2, 30)`).
    #[error("ValueError: {0}")]
    ValueError(String),

    /// A call form the host deliberately does not implement.
    #[error("not supported: {0}")]
    NotSupported(String),

    /// A value has no JSON representation (functions, NaN).
    #[error("cannot serialize: {0}")]
    Serialization(String),
}

/// Result alias for builtin operations.
pub type StdlibResult<T> = Result<T, StdlibError>;
