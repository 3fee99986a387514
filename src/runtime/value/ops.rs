//! Operators over runtime values
//!
//! Every operator reads its operands through [`Value::read_number`] or
//! [`Value::read_text`] and returns a fresh owned value. Numeric edge cases
//! (division by zero, NaN) follow IEEE-754 and are never errors.

use super::runtime_value::Value;

/// Concatenate the text of `a` and `b` into a fresh owned value.
pub fn join(
    a: &Value,
    b: &Value,
) -> Value {
    let (s1, s2) = (a.read_text(), b.read_text());
    let mut joined = String::with_capacity(s1.len() + s2.len());
    joined.push_str(s1);
    joined.push_str(s2);
    Value::text(joined)
}

pub fn add(
    a: &Value,
    b: &Value,
) -> Value {
    Value::number(a.read_number() + b.read_number())
}

pub fn subtract(
    a: &Value,
    b: &Value,
) -> Value {
    Value::number(a.read_number() - b.read_number())
}

pub fn multiply(
    a: &Value,
    b: &Value,
) -> Value {
    Value::number(a.read_number() * b.read_number())
}

pub fn divide(
    a: &Value,
    b: &Value,
) -> Value {
    Value::number(a.read_number() / b.read_number())
}

/// Floored modulo: the result takes the sign of the divisor.
pub fn modulo(
    a: &Value,
    b: &Value,
) -> Value {
    let (n, m) = (a.read_number(), b.read_number());
    let r = n % m;
    let r = if r != 0.0 && (r < 0.0) != (m < 0.0) { r + m } else { r };
    Value::number(r)
}

pub fn sqrt(a: &Value) -> Value {
    Value::number(a.read_number().sqrt())
}

/// `1` when `a < b`, else `0`.
///
/// Two text operands compare case-insensitively; anything else compares
/// numerically.
pub fn less_than(
    a: &Value,
    b: &Value,
) -> Value {
    bool_value(match (a, b) {
        (Value::Text(_), Value::Text(_)) => lowered(a) < lowered(b),
        _ => a.read_number() < b.read_number(),
    })
}

/// `1` when `a > b`, else `0`. Same comparison rules as [`less_than`].
pub fn greater_than(
    a: &Value,
    b: &Value,
) -> Value {
    bool_value(match (a, b) {
        (Value::Text(_), Value::Text(_)) => lowered(a) > lowered(b),
        _ => a.read_number() > b.read_number(),
    })
}

/// `1` when both operands are equal numbers or case-insensitively equal text.
/// A number never equals text.
pub fn equals(
    a: &Value,
    b: &Value,
) -> Value {
    bool_value(match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::Text(_), Value::Text(_)) => lowered(a) == lowered(b),
        _ => false,
    })
}

pub fn and(
    a: &Value,
    b: &Value,
) -> Value {
    bool_value(a.is_truthy() && b.is_truthy())
}

pub fn or(
    a: &Value,
    b: &Value,
) -> Value {
    bool_value(a.is_truthy() || b.is_truthy())
}

pub fn not(a: &Value) -> Value {
    bool_value(!a.is_truthy())
}

#[inline]
fn bool_value(b: bool) -> Value {
    Value::number(if b { 1.0 } else { 0.0 })
}

#[inline]
fn lowered(v: &Value) -> String {
    v.read_text().to_lowercase()
}
