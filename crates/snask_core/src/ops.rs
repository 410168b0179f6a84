//! Coercing operators over `Value`.
//!
//! Operators never fail loudly: incompatible operands produce `Nil`.

use crate::value::{Str, Value, number_to_string};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

pub fn binary(op: BinaryOp, a: &Value, b: &Value) -> Value {
    match op {
        BinaryOp::Add => add(a, b),
        BinaryOp::Sub => numeric(a, b, |x, y| Some(x - y)),
        BinaryOp::Mul => numeric(a, b, |x, y| Some(x * y)),
        BinaryOp::Div => numeric(a, b, |x, y| if y == 0.0 { None } else { Some(x / y) }),
        BinaryOp::Rem => numeric(a, b, |x, y| if y == 0.0 { None } else { Some(x % y) }),
    }
}

fn numeric(a: &Value, b: &Value, f: impl FnOnce(f64, f64) -> Option<f64>) -> Value {
    match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => f(x, y).map(Value::Number).unwrap_or_default(),
        _ => Value::Nil,
    }
}

/// Numeric addition, or concatenation when either side is a string.
pub fn add(a: &Value, b: &Value) -> Value {
    if a.is_str() || b.is_str() {
        return concat(a, b);
    }
    numeric(a, b, |x, y| Some(x + y))
}

pub fn sub(a: &Value, b: &Value) -> Value {
    binary(BinaryOp::Sub, a, b)
}

pub fn mul(a: &Value, b: &Value) -> Value {
    binary(BinaryOp::Mul, a, b)
}

pub fn div(a: &Value, b: &Value) -> Value {
    binary(BinaryOp::Div, a, b)
}

pub fn rem(a: &Value, b: &Value) -> Value {
    binary(BinaryOp::Rem, a, b)
}

pub fn neg(a: &Value) -> Value {
    a.as_number().map(|n| Value::Number(-n)).unwrap_or_default()
}

pub fn not(a: &Value) -> Value {
    Value::Bool(!a.truthy())
}

/// Joins the scalar renderings of both operands. Objects do not concatenate.
pub fn concat(a: &Value, b: &Value) -> Value {
    let (Some(left), Some(right)) = (scalar_text(a), scalar_text(b)) else {
        return Value::Nil;
    };
    let mut out = String::with_capacity(left.len() + right.len());
    out.push_str(&left);
    out.push_str(&right);
    Value::Str(Str::from(out))
}

fn scalar_text(v: &Value) -> Option<String> {
    match v {
        Value::Nil => Some("nil".to_string()),
        Value::Number(n) => Some(number_to_string(*n)),
        Value::Bool(b) => Some(b.to_string()),
        Value::Str(s) => Some(s.as_str().to_string()),
        Value::Object(_) => None,
    }
}

/// Orders numbers (and bools) numerically and strings lexicographically.
pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Str(x), Value::Str(y)) => Some(x.as_str().cmp(y.as_str())),
        _ => a.as_number()?.partial_cmp(&b.as_number()?),
    }
}

pub fn less_than(a: &Value, b: &Value) -> Value {
    compare(a, b)
        .map(|o| Value::Bool(o == Ordering::Less))
        .unwrap_or_default()
}

pub fn greater_than(a: &Value, b: &Value) -> Value {
    compare(a, b)
        .map(|o| Value::Bool(o == Ordering::Greater))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_on_numbers_and_bools() {
        assert_eq!(add(&Value::from_i64(2), &Value::from_i64(3)), Value::from_i64(5));
        assert_eq!(add(&Value::Bool(true), &Value::from_i64(1)), Value::from_i64(2));
        assert_eq!(sub(&Value::from_i64(2), &Value::from_i64(3)), Value::from_i64(-1));
        assert_eq!(mul(&Value::from_f64(1.5), &Value::from_i64(2)), Value::from_i64(3));
        assert_eq!(rem(&Value::from_i64(7), &Value::from_i64(4)), Value::from_i64(3));
        assert_eq!(neg(&Value::from_i64(2)), Value::from_i64(-2));
        assert_eq!(neg(&Value::Bool(true)), Value::from_i64(-1));
        assert_eq!(neg(&Value::Bool(false)), Value::from_f64(-0.0));
    }

    #[test]
    fn incompatible_operands_give_nil() {
        assert!(sub(&Value::str("a"), &Value::from_i64(1)).is_nil());
        assert!(mul(&Value::Nil, &Value::from_i64(1)).is_nil());
        assert!(div(&Value::from_i64(1), &Value::from_i64(0)).is_nil());
        assert!(neg(&Value::str("x")).is_nil());
        assert!(add(&Value::new_object(), &Value::str("x")).is_nil());
    }

    #[test]
    fn string_addition_concatenates() {
        assert_eq!(add(&Value::str("n="), &Value::from_i64(4)), Value::str("n=4"));
        assert_eq!(concat(&Value::Nil, &Value::str("!")), Value::str("nil!"));
        assert_eq!(concat(&Value::Bool(true), &Value::str("")), Value::str("true"));
    }

    #[test]
    fn comparisons() {
        assert_eq!(less_than(&Value::from_i64(1), &Value::from_i64(2)), Value::Bool(true));
        assert_eq!(greater_than(&Value::str("b"), &Value::str("a")), Value::Bool(true));
        assert!(less_than(&Value::str("b"), &Value::from_i64(1)).is_nil());
        assert_eq!(compare(&Value::Bool(true), &Value::from_i64(1)), Some(Ordering::Equal));
    }

    #[test]
    fn not_uses_truthiness() {
        assert_eq!(not(&Value::Nil), Value::Bool(true));
        assert_eq!(not(&Value::str("x")), Value::Bool(false));
        assert_eq!(not(&Value::from_i64(0)), Value::Bool(true));
    }
}
