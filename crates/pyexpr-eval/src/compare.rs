//! Equality, ordering and membership with Python semantics.
//!
//! Ordering across types follows the legacy total order: values of different
//! types compare by a fixed [`type_rank`], so `None < 0 < {} < "a" < [1]`.

use crate::error::{EvalError, EvalResult};
use pyexpr_stdlib::Value;
use std::borrow::Cow;

/// `left == right`.
///
/// Different types are never equal, except booleans against numbers
/// (`True == 1`). Containers compare structurally; functions by identity.
pub fn is_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Bool(b), Value::Number(n)) | (Value::Number(n), Value::Bool(b)) => {
            *n == bool_to_number(*b)
        }
        (Value::None, Value::None) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::List(a), Value::List(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| is_equal(x, y))
        }
        (Value::Dict(a), Value::Dict(b)) => {
            a.len() == b.len() && maps_equal(a.iter(), |k| b.get(k))
        }
        (Value::Dict(a), Value::Object(b)) | (Value::Object(b), Value::Dict(a)) => {
            a.len() == b.len() && maps_equal(a.iter(), |k| b.get(k))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len() && maps_equal(a.iter(), |k| b.get(k))
        }
        (Value::Date(a), Value::Date(b)) => a == b,
        (Value::DateTime(a), Value::DateTime(b)) => a == b,
        (Value::Time(a), Value::Time(b)) => a == b,
        (Value::RelativeDelta(a), Value::RelativeDelta(b)) => a == b,
        (Value::Function(a), Value::Function(b)) => a == b,
        (Value::Constructor(a), Value::Constructor(b)) => a == b,
        _ => false,
    }
}

/// Every entry of `a` has an equal value under the same key in `b`.
fn maps_equal<'a, 'b>(
    mut a: impl Iterator<Item = (&'a String, &'a Value)>,
    b: impl Fn(&str) -> Option<&'b Value>,
) -> bool {
    a.all(|(k, v)| b(k.as_str()).is_some_and(|other| is_equal(v, other)))
}

/// Ordinal used to order values of different types.
///
/// None=1, number=2, dict/object (and host date-likes)=3, string=4, list=5.
/// Functions and constructors have no rank and cannot be ordered.
pub fn type_rank(value: &Value) -> EvalResult<u8> {
    match value {
        Value::None => Ok(1),
        Value::Bool(_) | Value::Number(_) => Ok(2),
        Value::Dict(_)
        | Value::Object(_)
        | Value::Date(_)
        | Value::DateTime(_)
        | Value::Time(_)
        | Value::RelativeDelta(_) => Ok(3),
        Value::String(_) => Ok(4),
        Value::List(_) => Ok(5),
        Value::Function(_) | Value::Constructor(_) => Err(EvalError::TypeMismatch(format!(
            "ordering not supported for '{}'",
            value.type_name()
        ))),
    }
}

/// `left < right`.
pub fn is_less(left: &Value, right: &Value) -> EvalResult<bool> {
    if let (Value::Number(a), Value::Number(b)) = (left, right) {
        return Ok(a < b);
    }
    let left = coerce_bool(left);
    let right = coerce_bool(right);

    let (left_rank, right_rank) = (type_rank(&left)?, type_rank(&right)?);
    if left_rank != right_rank {
        return Ok(left_rank < right_rank);
    }

    Ok(match (left.as_ref(), right.as_ref()) {
        (Value::Number(a), Value::Number(b)) => a < b,
        (Value::String(a), Value::String(b)) => a < b,
        (Value::List(a), Value::List(b)) => list_less(a, b)?,
        (Value::Date(a), Value::Date(b)) => a < b,
        (Value::DateTime(a), Value::DateTime(b)) => a < b,
        (Value::Time(a), Value::Time(b)) => a < b,
        // same rank, nothing meaningful to compare (None, mappings, mixed dates)
        _ => false,
    })
}

/// Lexicographic: the first unequal pair decides, else the shorter list.
fn list_less(a: &[Value], b: &[Value]) -> EvalResult<bool> {
    for (x, y) in a.iter().zip(b) {
        if !is_equal(x, y) {
            return is_less(x, y);
        }
    }
    Ok(a.len() < b.len())
}

fn coerce_bool(value: &Value) -> Cow<'_, Value> {
    match value {
        Value::Bool(b) => Cow::Owned(Value::Number(bool_to_number(*b))),
        other => Cow::Borrowed(other),
    }
}

pub(crate) fn bool_to_number(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// `left in right`: element of a list, or substring of a string. Any other
/// combination is simply `false`.
pub fn is_in(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (_, Value::List(items)) => items.iter().any(|item| is_equal(left, item)),
        (Value::String(needle), Value::String(haystack)) => haystack.contains(needle.as_str()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyexpr_stdlib::{Dict, PyFunction};

    fn num(n: f64) -> Value {
        Value::Number(n)
    }

    fn s(v: &str) -> Value {
        Value::String(v.to_string())
    }

    #[test]
    fn test_bool_number_equality() {
        assert!(is_equal(&Value::Bool(true), &num(1.0)));
        assert!(is_equal(&Value::Bool(false), &num(0.0)));
        assert!(is_equal(&num(1.0), &Value::Bool(true)));
        assert!(!is_equal(&Value::Bool(true), &num(2.0)));
        assert!(!is_equal(&s("1"), &num(1.0)));
        assert!(!is_equal(&Value::None, &Value::Bool(false)));
    }

    #[test]
    fn test_structural_equality() {
        assert!(is_equal(
            &Value::List(vec![num(1.0), s("a")]),
            &Value::List(vec![Value::Bool(true), s("a")])
        ));
        assert!(!is_equal(&Value::List(vec![num(1.0)]), &Value::List(vec![])));
        assert!(is_equal(
            &Value::dict([("a", num(1.0))]),
            &Value::object([("a", num(1.0))])
        ));
        assert!(!is_equal(&Value::Dict(Dict::new()), &Value::List(vec![])));
        assert!(is_equal(
            &Value::dict([("a", num(1.0)), ("b", num(2.0))]),
            &Value::dict([("b", num(2.0)), ("a", Value::Bool(true))])
        ));
        assert!(!is_equal(
            &Value::dict([("a", num(1.0))]),
            &Value::dict([("a", num(1.0)), ("b", num(2.0))])
        ));
    }

    #[test]
    fn test_functions_compare_by_identity() {
        let f = Value::Function(PyFunction::new("f", |_| Ok(Value::None)));
        assert!(is_equal(&f, &f.clone()));
        let g = Value::Function(PyFunction::new("f", |_| Ok(Value::None)));
        assert!(!is_equal(&f, &g));
    }

    #[test]
    fn test_rank_order() {
        assert!(is_less(&Value::None, &num(0.0)).unwrap());
        assert!(is_less(&num(0.0), &Value::Dict(Dict::new())).unwrap());
        assert!(is_less(&Value::Dict(Dict::new()), &s("a")).unwrap());
        assert!(is_less(&s("a"), &Value::List(vec![num(1.0)])).unwrap());
        assert!(!is_less(&Value::List(vec![]), &s("z")).unwrap());
    }

    #[test]
    fn test_bools_order_as_numbers() {
        assert!(is_less(&Value::Bool(false), &Value::Bool(true)).unwrap());
        assert!(is_less(&Value::Bool(true), &num(2.0)).unwrap());
        assert!(!is_less(&Value::Bool(true), &num(1.0)).unwrap());
    }

    #[test]
    fn test_same_rank_fallbacks() {
        assert!(is_less(&s("abc"), &s("abd")).unwrap());
        assert!(!is_less(&s("b"), &s("a")).unwrap());
        assert!(is_less(
            &Value::List(vec![num(1.0), num(2.0)]),
            &Value::List(vec![num(1.0), num(3.0)])
        )
        .unwrap());
        assert!(is_less(&Value::List(vec![num(1.0)]), &Value::List(vec![num(1.0), num(0.0)])).unwrap());
        assert!(!is_less(&Value::None, &Value::None).unwrap());
        assert!(!is_less(&Value::Dict(Dict::new()), &Value::Dict(Dict::new())).unwrap());
    }

    #[test]
    fn test_functions_cannot_be_ordered() {
        let f = Value::Function(PyFunction::new("f", |_| Ok(Value::None)));
        assert!(matches!(is_less(&f, &num(1.0)), Err(EvalError::TypeMismatch(_))));
    }

    #[test]
    fn test_membership() {
        assert!(is_in(&s("a"), &s("cat")));
        assert!(is_in(&num(2.0), &Value::List(vec![num(1.0), num(2.0), num(3.0)])));
        assert!(!is_in(&num(2.0), &s("abc")));
        assert!(!is_in(&s("a"), &Value::dict([("a", num(1.0))])));
        assert!(is_in(&Value::Bool(true), &Value::List(vec![num(1.0)])));
    }
}
