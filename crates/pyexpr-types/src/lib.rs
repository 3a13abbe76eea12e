//! Shared types for pyexpr.
//!
//! This crate defines the AST of the restricted Python expression grammar:
//! the contract between the external parser and the evaluator.

pub mod ast;

pub use ast::{BinaryOp, BoolOp, Expr, UnaryOp};
