//! pyexpr runtime library.
//!
//! Everything the evaluator treats as host-provided: the [`Value`] type,
//! truthiness, the call convention ([`CallArgs`], [`parse_args`]), the
//! date-like values and their constructors, and the [`Builtins`] table.

pub mod args;
pub mod builtins;
pub mod date;
mod error;
pub mod value;

pub use args::{parse_args, BoundArgs, CallArgs};
pub use builtins::Builtins;
pub use date::{Constructor, PyDate, PyDateTime, PyRelativeDelta, PyTime};
pub use error::{StdlibError, StdlibResult};
pub use value::{Dict, PyFunction, Value};
