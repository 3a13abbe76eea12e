//! pyexpr tree-walking evaluator.
//!
//! Reduces a Python expression AST (see [`pyexpr_types::Expr`]) to a
//! [`Value`] with Python's own semantics: truthiness, short-circuiting
//! `and`/`or`, the cross-type ordering of `None < numbers < mappings <
//! strings < lists`, floor division, dict `.get`, and date arithmetic with
//! `relativedelta`.
//!
//! ```ignore
//! use pyexpr_eval::{evaluate, Context};
//! use pyexpr_types::Expr;
//!
//! let ast = Expr::binary("+", Expr::number(1.0), Expr::name("x"));
//! let ctx = Context::from([("x".to_string(), 2.0.into())]);
//! assert_eq!(evaluate(&ast, &ctx)?, 3.0.into());
//! ```
//!
//! Evaluation is pure: it never mutates the context and keeps no state
//! between calls. Side effects are only possible through functions the
//! caller puts in the context.

pub mod compare;
pub mod env;
pub mod error;
pub mod evaluator;
pub mod json;

pub use compare::{is_equal, is_in, is_less, type_rank};
pub use env::{Context, Environment};
pub use error::{EvalError, EvalResult};
pub use evaluator::{evaluate, Evaluator};
pub use json::{evaluate_json, parse_ast, parse_context, EvalResponse};
pub use pyexpr_stdlib::{Builtins, Value};
