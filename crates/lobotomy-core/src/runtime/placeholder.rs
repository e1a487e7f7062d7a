// crates/lobotomy-core/src/runtime/placeholder.rs
// ============================================================================
// Module: Placeholder Responses
// Description: Skeleton responses derived from an operation's output shape.
// Purpose: Give `add_call` without a response something castable to return.
// Dependencies: crate::{core, runtime::timestamp}, serde_json, time
// ============================================================================

//! ## Overview
//! Placeholders fill every structure member with a representative value:
//! text and binary become `"..."`, integers `1`, doubles `1.0`, booleans
//! `false`, timestamps the current UTC instant, lists a single element, and
//! maps stay empty. Recursive shapes stop at [`MAX_PLACEHOLDER_DEPTH`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;
use serde_json::json;
use time::OffsetDateTime;

use crate::core::ServiceModel;
use crate::core::Shape;
use crate::core::ShapeName;
use crate::runtime::timestamp::format_timestamp;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Deepest shape nesting expanded into a placeholder.
pub const MAX_PLACEHOLDER_DEPTH: usize = 8;

// ============================================================================
// SECTION: Synthesis
// ============================================================================

/// Builds a placeholder response for an output shape.
///
/// Operations without an output shape get an empty mapping.
#[must_use]
pub fn placeholder_response(model: &ServiceModel, output: Option<&ShapeName>) -> Value {
    output
        .and_then(|name| placeholder_for(model, name, 0))
        .unwrap_or_else(|| Value::Object(Map::new()))
}

/// Builds the placeholder for one shape, `None` past the depth limit.
fn placeholder_for(model: &ServiceModel, name: &ShapeName, depth: usize) -> Option<Value> {
    if depth > MAX_PLACEHOLDER_DEPTH {
        return None;
    }
    let value = match model.shape(name)? {
        Shape::Structure(structure) => {
            let members = structure
                .members
                .iter()
                .filter_map(|member| {
                    placeholder_for(model, &member.shape, depth + 1)
                        .map(|value| (member.name.clone(), value))
                })
                .collect();
            Value::Object(members)
        }
        Shape::List {
            member,
        } => Value::Array(placeholder_for(model, member, depth + 1).into_iter().collect()),
        Shape::Map {
            ..
        } => Value::Object(Map::new()),
        Shape::String {
            ..
        }
        | Shape::Blob {
            ..
        } => json!("..."),
        Shape::Integer => json!(1),
        Shape::Double => json!(1.0),
        Shape::Boolean => json!(false),
        Shape::Timestamp => {
            format_timestamp(OffsetDateTime::now_utc()).map_or(Value::Null, Value::String)
        }
        Shape::Any => Value::Null,
    };
    Some(value)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
