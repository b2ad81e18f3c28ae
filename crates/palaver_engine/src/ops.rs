//! Operator semantics for runtime values.
//!
//! Every operator is total: a bad operand degrades to a neutral value
//! (`Int(0)`, `false`) instead of failing.

#![allow(clippy::cast_precision_loss)]

use palaver_foundation::Value;

// =============================================================================
// Arithmetic
// =============================================================================

/// `lhs + rhs`.
///
/// Numeric addition when both operands coerce to numbers (numeric-looking
/// strings included), otherwise the concatenation of both textual forms.
#[must_use]
pub fn add(lhs: &Value, rhs: &Value) -> Value {
    match numeric_pair(lhs, rhs) {
        Some((Value::Int(a), Value::Int(b))) => a
            .checked_add(b)
            .map_or_else(|| Value::Float(a as f64 + b as f64), Value::Int),
        Some((a, b)) => finite(float(&a) + float(&b)),
        None => Value::string(format!("{lhs}{rhs}")),
    }
}

/// `lhs - rhs`. Numeric-looking strings are coerced.
#[must_use]
pub fn sub(lhs: &Value, rhs: &Value) -> Value {
    match numeric_pair(lhs, rhs) {
        Some((Value::Int(a), Value::Int(b))) => a
            .checked_sub(b)
            .map_or_else(|| Value::Float(a as f64 - b as f64), Value::Int),
        Some((a, b)) => finite(float(&a) - float(&b)),
        None => Value::Int(0),
    }
}

/// `lhs * rhs`. Numeric-looking strings are coerced.
#[must_use]
pub fn mul(lhs: &Value, rhs: &Value) -> Value {
    match numeric_pair(lhs, rhs) {
        Some((Value::Int(a), Value::Int(b))) => a
            .checked_mul(b)
            .map_or_else(|| finite(a as f64 * b as f64), Value::Int),
        Some((a, b)) => finite(float(&a) * float(&b)),
        None => Value::Int(0),
    }
}

/// `lhs / rhs`.
///
/// Division by zero yields `Int(0)`. Integer division stays integral only
/// when it divides evenly.
#[must_use]
pub fn div(lhs: &Value, rhs: &Value) -> Value {
    match numeric_pair(lhs, rhs) {
        Some((_, Value::Int(0))) => Value::Int(0),
        Some((_, Value::Float(b))) if b == 0.0 => Value::Int(0),
        Some((Value::Int(a), Value::Int(b))) => match a.checked_rem(b) {
            Some(0) => a
                .checked_div(b)
                .map_or_else(|| finite(a as f64 / b as f64), Value::Int),
            _ => finite(a as f64 / b as f64),
        },
        Some((a, b)) => finite(float(&a) / float(&b)),
        None => Value::Int(0),
    }
}

fn numeric_pair(lhs: &Value, rhs: &Value) -> Option<(Value, Value)> {
    Some((lhs.coerce_number()?, rhs.coerce_number()?))
}

fn float(value: &Value) -> f64 {
    value.as_number().unwrap_or(0.0)
}

fn finite(n: f64) -> Value {
    if n.is_finite() {
        Value::Float(n)
    } else {
        Value::Int(0)
    }
}

// =============================================================================
// Comparison
// =============================================================================

/// `lhs == rhs`.
///
/// Compares numerically when both sides coerce to numbers, otherwise compares
/// textual forms.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn equals(lhs: &Value, rhs: &Value) -> bool {
    match numeric_pair(lhs, rhs) {
        Some((Value::Int(a), Value::Int(b))) => a == b,
        Some((a, b)) => float(&a) == float(&b),
        None => lhs.to_text() == rhs.to_text(),
    }
}

/// `haystack contains needle` on textual forms.
#[must_use]
pub fn contains(haystack: &Value, needle: &Value) -> bool {
    haystack.to_text().contains(&needle.to_text())
}
