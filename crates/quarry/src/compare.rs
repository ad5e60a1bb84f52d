//! Typed comparison of a resolved value against a literal.
//!
//! The literal is decoded at the value's own type before comparing, so the
//! same `size<10` means integer comparison on a `u32` and lexical
//! comparison on a `String`.

use std::cmp::Ordering;

use crate::condition::Comparison;
use crate::error::{QuarryError, Result};
use crate::op::Operator;
use crate::value::{Float, Value, ValueType};

/// Applies `comparison` to a value resolved on `target`.
pub(crate) fn compare(comparison: &Comparison, value: &Value<'_>, target: &'static str) -> Result<bool> {
    let op = comparison.operator;
    let literal = comparison.literal.text();
    match value {
        Value::Text(s) => Ok(compare_text(op, s, literal)),
        Value::Integer(n) if op.is_ordering_op() => {
            let rhs = decode_integer(literal)
                .filter(|v| n.fits(*v))
                .ok_or_else(|| invalid_literal(comparison, n.value_type()))?;
            Ok(op.eval_ordering(n.value().cmp(&rhs)))
        }
        Value::Float(x) if op.is_ordering_op() => {
            let ordering = compare_float(*x, literal)
                .ok_or_else(|| invalid_literal(comparison, x.value_type()))?;
            Ok(op.eval_partial(ordering))
        }
        Value::Bool(b) if op == Operator::Eq => Ok(bool_text(*b) == literal),
        _ => Err(QuarryError::UnsupportedType {
            identifier: comparison.identifier.clone(),
            value_type: value.value_type(),
            target,
            operator: Some(op),
        }),
    }
}

fn compare_text(op: Operator, value: &str, literal: &str) -> bool {
    match op {
        Operator::Contains => contains_ignore_case(value, literal),
        Operator::NotContains => !contains_ignore_case(value, literal),
        _ => op.eval_ordering(value.cmp(literal)),
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Parses the literal at the float's width and compares. The outer
/// `Option` is `None` for an unparseable literal; the inner one is `None`
/// when either side is NaN.
fn compare_float(value: Float, literal: &str) -> Option<Option<Ordering>> {
    match value {
        Float::F32(x) => literal.parse::<f32>().ok().map(|rhs| x.partial_cmp(&rhs)),
        Float::F64(x) => literal.parse::<f64>().ok().map(|rhs| x.partial_cmp(&rhs)),
    }
}

fn bool_text(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

/// Decodes an integer literal.
///
/// Accepts an optional sign followed by `0x`, `0X` or `#` for hex, a
/// leading `0` for octal, or plain decimal digits. The range check against
/// the target width is left to the caller.
pub(crate) fn decode_integer(text: &str) -> Option<i128> {
    let (negative, rest) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    let (radix, digits) = if let Some(hex) = rest
        .strip_prefix("0x")
        .or_else(|| rest.strip_prefix("0X"))
        .or_else(|| rest.strip_prefix('#'))
    {
        (16, hex)
    } else if rest.len() > 1 && rest.starts_with('0') {
        (8, &rest[1..])
    } else {
        (10, rest)
    };
    if digits.is_empty() || digits.starts_with(['-', '+']) {
        return None;
    }
    let magnitude = i128::from_str_radix(digits, radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

fn invalid_literal(comparison: &Comparison, value_type: ValueType) -> QuarryError {
    QuarryError::InvalidLiteral {
        identifier: comparison.identifier.clone(),
        literal: comparison.literal.text().to_string(),
        value_type,
    }
}
