//! Conversion of stored attribute values into JSON.
//!
//! DynamoDB transports numbers as decimal strings. They are rendered as JSON
//! numbers: integral values as integers, everything else as floats.
//!
//! Integers must fit in `i64` or `u64` to stay exact. Larger integral values
//! (DynamoDB allows 38 digits) fall back to the nearest `f64`, since
//! `serde_json::Number` is built without `arbitrary_precision`.

use aws_sdk_dynamodb::types::AttributeValue;
use serde_json::{Map, Number, Value};

use crate::{Item, ReleasesError};

pub fn item_to_json(item: &Item) -> Result<Map<String, Value>, ReleasesError> {
    item.iter()
        .map(|(key, value)| Ok((key.clone(), attribute_to_json(key, value)?)))
        .collect()
}

/// `key` is only used to name the attribute in errors.
pub fn attribute_to_json(key: &str, value: &AttributeValue) -> Result<Value, ReleasesError> {
    let json = match value {
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::N(n) => Value::Number(decimal_to_number(n)?),
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::Ss(set) => set.iter().cloned().map(Value::String).collect(),
        AttributeValue::Ns(set) => set
            .iter()
            .map(|n| decimal_to_number(n).map(Value::Number))
            .collect::<Result<Value, _>>()?,
        AttributeValue::L(list) => list
            .iter()
            .map(|v| attribute_to_json(key, v))
            .collect::<Result<Value, _>>()?,
        AttributeValue::M(map) => Value::Object(item_to_json(map)?),
        AttributeValue::B(_) => return Err(unsupported(key, "B")),
        AttributeValue::Bs(_) => return Err(unsupported(key, "BS")),
        _ => return Err(unsupported(key, "unknown")),
    };

    Ok(json)
}

pub fn decimal_to_number(raw: &str) -> Result<Number, ReleasesError> {
    let raw = raw.trim();
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(i.into());
    }
    if let Ok(u) = raw.parse::<u64>() {
        return Ok(u.into());
    }

    let f = raw
        .parse::<f64>()
        .map_err(|_| ReleasesError::InvalidNumber(raw.to_string()))?;

    // "3.0" or "1E+2" carry no fraction and come out as integers
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        return Ok((f as i64).into());
    }

    Number::from_f64(f).ok_or_else(|| ReleasesError::InvalidNumber(raw.to_string()))
}

fn unsupported(key: &str, kind: &'static str) -> ReleasesError {
    ReleasesError::UnsupportedAttribute { key: key.to_string(), kind }
}
