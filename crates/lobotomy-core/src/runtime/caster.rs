// crates/lobotomy-core/src/runtime/caster.rs
// ============================================================================
// Module: Value Caster
// Description: Shape-directed conversion of configuration data to typed values.
// Purpose: Produce the result a real client would return for a response.
// Dependencies: crate::{core, runtime::timestamp}, bytes, serde_json
// ============================================================================

//! ## Overview
//! The caster walks a configuration value alongside its declared shape and
//! builds a new [`TypedValue`] tree. Casting is permissive where the real
//! client is: scalar text like `"1"` coerces into numbers, structure keys the
//! model does not declare pass through untouched, and absent members are
//! simply omitted. Failures carry the member path of the offending value.
//!
//! Security posture: configuration values are test-controlled but shapes may
//! be recursive, so nesting is bounded by [`MAX_CAST_DEPTH`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use bytes::Bytes;
use serde_json::Map;
use serde_json::Value;

use crate::core::CastError;
use crate::core::EventStream;
use crate::core::OperationModel;
use crate::core::ServiceModel;
use crate::core::Shape;
use crate::core::ShapeName;
use crate::core::StreamingBody;
use crate::core::StructureShape;
use crate::core::TypedValue;
use crate::core::call::json_kind;
use crate::runtime::timestamp::parse_timestamp;
use crate::runtime::timestamp::timestamp_from_epoch;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Deepest shape nesting the caster will follow.
pub const MAX_CAST_DEPTH: usize = 64;

// ============================================================================
// SECTION: Caster
// ============================================================================

/// Casts configuration values against the shapes of one service model.
#[derive(Debug, Clone, Copy)]
pub struct ValueCaster<'a> {
    /// Model supplying the shape table.
    model: &'a ServiceModel,
}

impl<'a> ValueCaster<'a> {
    /// Creates a caster over a service model.
    #[must_use]
    pub const fn new(model: &'a ServiceModel) -> Self {
        Self {
            model,
        }
    }

    /// Casts a value against a named shape.
    ///
    /// # Errors
    ///
    /// Returns [`CastError`] when the value cannot be represented as the shape.
    pub fn cast(&self, value: &Value, shape: &ShapeName) -> Result<TypedValue, CastError> {
        self.cast_at(value, shape, "", 0)
    }

    /// Casts a response against an operation's output shape.
    ///
    /// Operations without an output shape pass the response through untyped.
    ///
    /// # Errors
    ///
    /// Returns [`CastError`] when the response does not fit the output shape.
    pub fn cast_output(
        &self,
        value: &Value,
        operation: &OperationModel,
    ) -> Result<TypedValue, CastError> {
        match &operation.output {
            Some(shape) => self.cast(value, shape),
            None => Ok(untyped(value)),
        }
    }

    /// Casts one value at a member path.
    fn cast_at(
        &self,
        value: &Value,
        name: &ShapeName,
        path: &str,
        depth: usize,
    ) -> Result<TypedValue, CastError> {
        let Some(shape) = self.model.shape(name) else {
            return Err(CastError::new(path, "shape", format!("unknown shape {name}")));
        };
        if depth > MAX_CAST_DEPTH {
            return Err(CastError::new(
                path,
                shape.kind(),
                format!("nesting deeper than {MAX_CAST_DEPTH} levels"),
            ));
        }
        if value.is_null() {
            return Ok(TypedValue::Null);
        }
        match shape {
            Shape::Structure(structure) if structure.event_stream => {
                self.cast_event_stream(value, structure, path, depth)
            }
            Shape::Structure(structure) => {
                let map = expect_object(value, path, "structure")?;
                self.cast_members(map, structure, path, depth).map(TypedValue::Map)
            }
            Shape::List {
                member,
            } => {
                let Value::Array(items) = value else {
                    return Err(mismatch(value, path, "list"));
                };
                items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| {
                        self.cast_at(item, member, &format!("{path}[{index}]"), depth + 1)
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(TypedValue::List)
            }
            Shape::Map {
                value: value_shape,
                ..
            } => {
                let map = expect_object(value, path, "map")?;
                map.iter()
                    .map(|(key, item)| {
                        self.cast_at(item, value_shape, &member_path(path, key), depth + 1)
                            .map(|typed| (key.clone(), typed))
                    })
                    .collect::<Result<BTreeMap<_, _>, _>>()
                    .map(TypedValue::Map)
            }
            Shape::String {
                streaming,
            } => {
                let text = cast_text(value, path)?;
                if *streaming {
                    Ok(TypedValue::Blob(StreamingBody::new(Bytes::from(text))))
                } else {
                    Ok(TypedValue::String(text))
                }
            }
            Shape::Integer => cast_integer(value, path).map(TypedValue::Integer),
            Shape::Double => cast_double(value, path).map(TypedValue::Double),
            Shape::Boolean => cast_boolean(value, path).map(TypedValue::Boolean),
            Shape::Blob {
                ..
            } => cast_blob(value, path).map(TypedValue::Blob),
            Shape::Timestamp => cast_timestamp(value, path),
            Shape::Any => Ok(TypedValue::Untyped(value.clone())),
        }
    }

    /// Casts the declared members of a structure, passing unknown keys through.
    fn cast_members(
        &self,
        map: &Map<String, Value>,
        structure: &StructureShape,
        path: &str,
        depth: usize,
    ) -> Result<BTreeMap<String, TypedValue>, CastError> {
        let mut members = BTreeMap::new();
        for (key, item) in map {
            let typed = match structure.member(key) {
                Some(member) => {
                    self.cast_at(item, &member.shape, &member_path(path, key), depth + 1)?
                }
                None => TypedValue::Untyped(item.clone()),
            };
            members.insert(key.clone(), typed);
        }
        Ok(members)
    }

    /// Casts an event-stream member from one event or a sequence of events.
    fn cast_event_stream(
        &self,
        value: &Value,
        structure: &StructureShape,
        path: &str,
        depth: usize,
    ) -> Result<TypedValue, CastError> {
        let events: Vec<&Value> = match value {
            Value::Array(items) => items.iter().collect(),
            other => vec![other],
        };
        let mut typed = Vec::with_capacity(events.len());
        for (index, event) in events.into_iter().enumerate() {
            let event_path = format!("{path}[{index}]");
            let map = expect_object(event, &event_path, "event")?;
            let members = self.cast_members(map, structure, &event_path, depth + 1)?;
            typed.push(TypedValue::Map(members));
        }
        Ok(TypedValue::EventStream(EventStream::new(typed)))
    }
}

// ============================================================================
// SECTION: Scalar Coercion
// ============================================================================

/// Coerces text-like values into a string.
fn cast_text(value: &Value, path: &str) -> Result<String, CastError> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(mismatch(other, path, "string")),
    }
}

/// Coerces numbers and numeric text into an integer.
fn cast_integer(value: &Value, path: &str) -> Result<i64, CastError> {
    let parsed = match value {
        Value::Number(number) => number.as_i64().or_else(|| number.as_f64().and_then(integral)),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>().ok().or_else(|| text.parse::<f64>().ok().and_then(integral))
        }
        other => return Err(mismatch(other, path, "integer")),
    };
    parsed.ok_or_else(|| CastError::new(path, "integer", format!("{value} is not an integer")))
}

/// Coerces numbers and numeric text into a double.
fn cast_double(value: &Value, path: &str) -> Result<f64, CastError> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        other => return Err(mismatch(other, path, "double")),
    };
    parsed.ok_or_else(|| CastError::new(path, "double", format!("{value} is not a number")))
}

/// Coerces booleans, `0`/`1`, and boolean text into a boolean.
fn cast_boolean(value: &Value, path: &str) -> Result<bool, CastError> {
    let parsed = match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => match number.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        other => return Err(mismatch(other, path, "boolean")),
    };
    parsed.ok_or_else(|| CastError::new(path, "boolean", format!("{value} is not a boolean")))
}

/// Wraps text or a byte sequence in a single-read body.
fn cast_blob(value: &Value, path: &str) -> Result<StreamingBody, CastError> {
    match value {
        Value::String(text) => Ok(StreamingBody::new(Bytes::copy_from_slice(text.as_bytes()))),
        Value::Array(items) => {
            let bytes = items
                .iter()
                .map(|item| item.as_u64().and_then(|byte| u8::try_from(byte).ok()))
                .collect::<Option<Vec<u8>>>()
                .ok_or_else(|| {
                    CastError::new(path, "blob", "byte sequence must hold 0-255 values")
                })?;
            Ok(StreamingBody::new(bytes))
        }
        other => Err(mismatch(other, path, "blob")),
    }
}

/// Parses text or epoch seconds into a UTC-defaulted instant.
fn cast_timestamp(value: &Value, path: &str) -> Result<TypedValue, CastError> {
    let parsed = match value {
        Value::String(text) => parse_timestamp(text),
        Value::Number(number) => number.as_f64().and_then(timestamp_from_epoch),
        other => return Err(mismatch(other, path, "timestamp")),
    };
    parsed
        .map(TypedValue::Timestamp)
        .ok_or_else(|| CastError::new(path, "timestamp", format!("unparsable timestamp {value}")))
}

/// Returns the integer a float represents exactly, if any.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "The value is range-checked and integral before the cast."
)]
fn integral(value: f64) -> Option<i64> {
    let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
    (value.is_finite() && in_range && value.fract().abs() < f64::EPSILON).then(|| value as i64)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Requires a mapping value.
fn expect_object<'v>(
    value: &'v Value,
    path: &str,
    expected: &'static str,
) -> Result<&'v Map<String, Value>, CastError> {
    value.as_object().ok_or_else(|| mismatch(value, path, expected))
}

/// Builds a type-mismatch error.
fn mismatch(value: &Value, path: &str, expected: &'static str) -> CastError {
    CastError::new(path, expected, format!("got {}", json_kind(value)))
}

/// Appends a member name to a path.
fn member_path(path: &str, member: &str) -> String {
    if path.is_empty() { member.to_string() } else { format!("{path}.{member}") }
}

/// Wraps configuration data with no model shape.
fn untyped(value: &Value) -> TypedValue {
    match value {
        Value::Null => TypedValue::Null,
        Value::Object(map) => TypedValue::Map(
            map.iter()
                .map(|(key, item)| (key.clone(), TypedValue::Untyped(item.clone())))
                .collect(),
        ),
        other => TypedValue::Untyped(other.clone()),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
