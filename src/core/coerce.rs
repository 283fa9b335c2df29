use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::error::CoercionError;
use crate::core::value::{Decimal, Value, ValueKind};

/// Converts `value` to the representation required by `target`.
///
/// Total over every value/kind pair: anything that has no well-defined
/// conversion yields a [`CoercionError`]. Null is rejected here; nullable
/// properties handle it before calling this function.
pub fn coerce(value: Value, target: &ValueKind) -> Result<Value, CoercionError> {
    if value.conforms_to(target) {
        return Ok(value);
    }

    let fail = |value: &Value, reason: &str| CoercionError::new(value.kind_name(), target, reason);

    match value {
        Value::Null => Err(fail(&value, "null is not allowed")),
        Value::Text(text) => parse_text(&text, target),
        scalar if *target == ValueKind::Text && scalar.is_scalar() => {
            Ok(Value::Text(scalar.to_string()))
        }
        Value::Bool(b) => match target {
            ValueKind::Int => Ok(Value::Int(i64::from(b))),
            ValueKind::UInt => Ok(Value::UInt(u64::from(b))),
            ValueKind::Float => Ok(Value::Float(if b { 1.0 } else { 0.0 })),
            ValueKind::Decimal => Ok(Value::Decimal(Decimal(if b { "1" } else { "0" }.into()))),
            _ => Err(fail(&value, "no conversion")),
        },
        Value::Int(i) => match target {
            ValueKind::Bool => Ok(Value::Bool(i != 0)),
            ValueKind::UInt => u64::try_from(i)
                .map(Value::UInt)
                .map_err(|_| fail(&value, "negative value for an unsigned property")),
            ValueKind::Float => Ok(Value::Float(i as f64)),
            ValueKind::Decimal => Ok(Value::Decimal(Decimal(i.to_string()))),
            _ => Err(fail(&value, "no conversion")),
        },
        Value::UInt(u) => match target {
            ValueKind::Bool => Ok(Value::Bool(u != 0)),
            ValueKind::Int => i64::try_from(u)
                .map(Value::Int)
                .map_err(|_| fail(&value, "value exceeds the signed range")),
            ValueKind::Float => Ok(Value::Float(u as f64)),
            ValueKind::Decimal => Ok(Value::Decimal(Decimal(u.to_string()))),
            _ => Err(fail(&value, "no conversion")),
        },
        Value::Float(x) => match target {
            ValueKind::Bool => Ok(Value::Bool(x != 0.0)),
            ValueKind::Int => float_to_int(x)
                .map(Value::Int)
                .map_err(|reason| fail(&value, reason)),
            ValueKind::UInt => float_to_int(x)
                .and_then(|i| u64::try_from(i).map_err(|_| "negative value for an unsigned property"))
                .map(Value::UInt)
                .map_err(|reason| fail(&value, reason)),
            ValueKind::Decimal if x.is_finite() => Ok(Value::Decimal(Decimal(x.to_string()))),
            ValueKind::Decimal => Err(fail(&value, "not a finite number")),
            _ => Err(fail(&value, "no conversion")),
        },
        Value::Decimal(ref d) => match target {
            ValueKind::Bool => Ok(Value::Bool(!d.is_zero())),
            ValueKind::Float => d
                .as_str()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| fail(&value, "not a number")),
            ValueKind::Int | ValueKind::UInt => {
                let (int_part, integral) = d.split_integral();
                if !integral {
                    return Err(fail(&value, "has a fractional part"));
                }
                parse_text(int_part, target).map_err(|_| fail(&value, "out of range"))
            }
            _ => Err(fail(&value, "no conversion")),
        },
        Value::DateTime(_) | Value::Uuid(_) | Value::Enum(_) => {
            Err(fail(&value, "no conversion"))
        }
        Value::List(_) | Value::Map(_) => {
            Err(fail(&value, "structured values only convert to themselves"))
        }
    }
}

/// Integer conversion that refuses to round or saturate
fn float_to_int(x: f64) -> Result<i64, &'static str> {
    if !x.is_finite() {
        return Err("not a finite number");
    }
    if x.fract() != 0.0 {
        return Err("has a fractional part");
    }
    // i64::MAX is not representable as f64; 2^63 is the first value out of range
    if x < i64::MIN as f64 || x >= 9_223_372_036_854_775_808.0 {
        return Err("out of range");
    }
    Ok(x as i64)
}

fn parse_text(text: &str, target: &ValueKind) -> Result<Value, CoercionError> {
    let trimmed = text.trim();
    let fail = |reason: &str| CoercionError::new("Text", target, format!("'{trimmed}' {reason}"));

    match target {
        ValueKind::Text | ValueKind::Any => Ok(Value::Text(text.to_string())),
        ValueKind::Bool => {
            if trimmed.eq_ignore_ascii_case("true") {
                Ok(Value::Bool(true))
            } else if trimmed.eq_ignore_ascii_case("false") {
                Ok(Value::Bool(false))
            } else {
                Err(fail("is not a boolean"))
            }
        }
        ValueKind::Int => trimmed
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| fail("is not an integer")),
        ValueKind::UInt => trimmed
            .parse::<u64>()
            .map(Value::UInt)
            .map_err(|_| fail("is not an unsigned integer")),
        ValueKind::Float => trimmed
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| fail("is not a number")),
        ValueKind::Decimal => Decimal::parse(trimmed)
            .map(Value::Decimal)
            .ok_or_else(|| fail("is not a decimal")),
        ValueKind::DateTime => DateTime::parse_from_rfc3339(trimmed)
            .map(|dt| Value::DateTime(dt.with_timezone(&Utc)))
            .map_err(|_| fail("is not an RFC 3339 date-time")),
        ValueKind::Uuid => Uuid::parse_str(trimmed)
            .map(Value::Uuid)
            .map_err(|_| fail("is not a UUID")),
        ValueKind::Enum(variants) => {
            if variants.is_empty() || variants.contains(&trimmed) {
                Ok(Value::Enum(trimmed.to_string()))
            } else {
                Err(fail("is not a known variant"))
            }
        }
        ValueKind::List | ValueKind::Map => Err(fail("cannot become a structured value")),
    }
}
