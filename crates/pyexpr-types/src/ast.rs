//! AST node types for the restricted Python expression grammar.
//!
//! The tree is produced by an external parser and consumed read-only by the
//! evaluator. Operators are carried as their source text: the closed operator
//! sets are enforced at evaluation time, see [`UnaryOp::parse`],
//! [`BinaryOp::parse`] and [`BoolOp::parse`].
//!
//! The JSON form is internally tagged by `"type"`:
//!
//! ```json
//! { "type": "BinaryOperator", "op": "+",
//!   "left": { "type": "Number", "value": 1 },
//!   "right": { "type": "Name", "value": "x" } }
//! ```
//!
//! Dictionary entries and keyword arguments keep source order.

use serde::{Deserialize, Serialize};

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// One node of an expression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Expr {
    /// `42`, `3.5`
    Number { value: f64 },
    /// `'done'`
    String { value: String },
    /// `True` / `False`
    Boolean { value: bool },
    /// `None`
    None,
    /// `state`, `context_today`
    Name { value: String },
    /// `-x`, `+x`, `not x`
    UnaryOperator { op: String, right: Box<Expr> },
    /// `a + b`, `a in b`, `a // b`, ...
    BinaryOperator {
        op: String,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `a and b`, `a or b`
    BooleanOperator {
        op: String,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `[a, b]`
    List { value: Vec<Expr> },
    /// `(a, b)`
    Tuple { value: Vec<Expr> },
    /// `{'a': 1, 'b': x}`
    Dictionary {
        #[serde(with = "entries")]
        value: Vec<(String, Expr)>,
    },
    /// `f(a, b, key=c)`
    FunctionCall {
        #[serde(rename = "fn")]
        callee: Box<Expr>,
        #[serde(default)]
        args: Vec<Expr>,
        #[serde(with = "entries", default)]
        kwargs: Vec<(String, Expr)>,
    },
    /// `target[key]`
    Lookup { target: Box<Expr>, key: Box<Expr> },
    /// `if_true if condition else if_false`
    If {
        condition: Box<Expr>,
        #[serde(rename = "ifTrue")]
        if_true: Box<Expr>,
        #[serde(rename = "ifFalse")]
        if_false: Box<Expr>,
    },
    /// `obj.key`
    ObjLookup { obj: Box<Expr>, key: String },
}

impl Expr {
    pub fn number(value: f64) -> Self {
        Expr::Number { value }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::String {
            value: value.into(),
        }
    }

    pub fn boolean(value: bool) -> Self {
        Expr::Boolean { value }
    }

    pub fn none() -> Self {
        Expr::None
    }

    pub fn name(value: impl Into<String>) -> Self {
        Expr::Name {
            value: value.into(),
        }
    }

    pub fn unary(op: impl Into<String>, right: Expr) -> Self {
        Expr::UnaryOperator {
            op: op.into(),
            right: Box::new(right),
        }
    }

    pub fn binary(op: impl Into<String>, left: Expr, right: Expr) -> Self {
        Expr::BinaryOperator {
            op: op.into(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// `left and right`
    pub fn and(left: Expr, right: Expr) -> Self {
        Expr::BooleanOperator {
            op: BoolOp::And.as_str().to_string(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// `left or right`
    pub fn or(left: Expr, right: Expr) -> Self {
        Expr::BooleanOperator {
            op: BoolOp::Or.as_str().to_string(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn list(value: Vec<Expr>) -> Self {
        Expr::List { value }
    }

    pub fn tuple(value: Vec<Expr>) -> Self {
        Expr::Tuple { value }
    }

    pub fn dict<K: Into<String>>(entries: impl IntoIterator<Item = (K, Expr)>) -> Self {
        Expr::Dictionary {
            value: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// A call with positional arguments only.
    pub fn call(callee: Expr, args: Vec<Expr>) -> Self {
        Self::call_with_kwargs(callee, args, Vec::<(String, Expr)>::new())
    }

    pub fn call_with_kwargs<K: Into<String>>(
        callee: Expr,
        args: Vec<Expr>,
        kwargs: impl IntoIterator<Item = (K, Expr)>,
    ) -> Self {
        Expr::FunctionCall {
            callee: Box::new(callee),
            args,
            kwargs: kwargs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn lookup(target: Expr, key: Expr) -> Self {
        Expr::Lookup {
            target: Box::new(target),
            key: Box::new(key),
        }
    }

    pub fn if_else(condition: Expr, if_true: Expr, if_false: Expr) -> Self {
        Expr::If {
            condition: Box::new(condition),
            if_true: Box::new(if_true),
            if_false: Box::new(if_false),
        }
    }

    /// `obj.key`
    pub fn attr(obj: Expr, key: impl Into<String>) -> Self {
        Expr::ObjLookup {
            obj: Box::new(obj),
            key: key.into(),
        }
    }

    /// The node's `type` tag, as it appears in the JSON form.
    pub fn kind(&self) -> &'static str {
        match self {
            Expr::Number { .. } => "Number",
            Expr::String { .. } => "String",
            Expr::Boolean { .. } => "Boolean",
            Expr::None => "None",
            Expr::Name { .. } => "Name",
            Expr::UnaryOperator { .. } => "UnaryOperator",
            Expr::BinaryOperator { .. } => "BinaryOperator",
            Expr::BooleanOperator { .. } => "BooleanOperator",
            Expr::List { .. } => "List",
            Expr::Tuple { .. } => "Tuple",
            Expr::Dictionary { .. } => "Dictionary",
            Expr::FunctionCall { .. } => "FunctionCall",
            Expr::Lookup { .. } => "Lookup",
            Expr::If { .. } => "If",
            Expr::ObjLookup { .. } => "ObjLookup",
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Operators
// ══════════════════════════════════════════════════════════════════════════════

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `+x`
    Pos,
    /// `not x`
    Not,
}

impl UnaryOp {
    /// Recognize an operator tag. `None` for anything outside the closed set.
    pub fn parse(op: &str) -> Option<Self> {
        match op {
            "-" => Some(UnaryOp::Neg),
            "+" => Some(UnaryOp::Pos),
            "not" => Some(UnaryOp::Not),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "+",
            UnaryOp::Not => "not",
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    FloorDiv,
    // Comparison
    Eq,
    NotEq,
    Less,
    Greater,
    LessEq,
    GreaterEq,
    // Membership
    In,
    NotIn,
}

impl BinaryOp {
    /// Recognize an operator tag. `<>` is the legacy spelling of `!=`.
    pub fn parse(op: &str) -> Option<Self> {
        let op = match op {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "%" => BinaryOp::Mod,
            "**" => BinaryOp::Pow,
            "//" => BinaryOp::FloorDiv,
            "==" => BinaryOp::Eq,
            "!=" | "<>" => BinaryOp::NotEq,
            "<" => BinaryOp::Less,
            ">" => BinaryOp::Greater,
            "<=" => BinaryOp::LessEq,
            ">=" => BinaryOp::GreaterEq,
            "in" => BinaryOp::In,
            "not in" => BinaryOp::NotIn,
            _ => return None,
        };
        Some(op)
    }

    /// Returns the operator symbol for error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "**",
            BinaryOp::FloorDiv => "//",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Less => "<",
            BinaryOp::Greater => ">",
            BinaryOp::LessEq => "<=",
            BinaryOp::GreaterEq => ">=",
            BinaryOp::In => "in",
            BinaryOp::NotIn => "not in",
        }
    }
}

/// Short-circuiting boolean operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolOp {
    And,
    Or,
}

impl BoolOp {
    pub fn parse(op: &str) -> Option<Self> {
        match op {
            "and" => Some(BoolOp::And),
            "or" => Some(BoolOp::Or),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BoolOp::And => "and",
            BoolOp::Or => "or",
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Ordered name → expression maps
// ══════════════════════════════════════════════════════════════════════════════

/// (De)serializes `Vec<(String, Expr)>` as a JSON object, keeping key order.
mod entries {
    use super::Expr;
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(
        entries: &[(String, Expr)],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (name, expr) in entries {
            map.serialize_entry(name, expr)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<(String, Expr)>, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = Vec<(String, Expr)>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of names to expressions")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, expr)) = access.next_entry::<String, Expr>()? {
                    entries.push((name, expr));
                }
                Ok(entries)
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}
