// crates/lobotomy-core/src/core/call.rs
// ============================================================================
// Module: Call Records
// Description: Request arguments and recorded invocations.
// Purpose: Capture what callers passed so tests can assert on it afterwards.
// Dependencies: crate::core::{error, identifiers}, serde, serde_json
// ============================================================================

//! ## Overview
//! [`RequestArgs`] is the keyword-argument mapping of one call. Every
//! invocation through a mocked client produces an immutable [`RecordedCall`]
//! that is appended to the owning registry's history.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::core::error::LobotomyError;
use crate::core::identifiers::MethodName;
use crate::core::identifiers::ServiceName;

// ============================================================================
// SECTION: Request Arguments
// ============================================================================

/// Keyword arguments supplied to a client method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestArgs(Map<String, Value>);

impl RequestArgs {
    /// Creates an empty argument set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds arguments from a JSON value; `null` means no arguments.
    ///
    /// # Errors
    ///
    /// Returns [`LobotomyError::InvalidRequest`] when the value is not a mapping.
    pub fn from_value(value: Value) -> Result<Self, LobotomyError> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(map) => Ok(Self(map)),
            other => Err(LobotomyError::InvalidRequest(format!(
                "request arguments must be a mapping, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Returns the argument value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns true when the key was supplied.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Iterates the supplied argument names.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Returns the number of supplied arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no arguments were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the arguments as a JSON mapping.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Converts the arguments into a JSON object value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

/// Returns a short label for a JSON value kind.
pub(crate) const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

// ============================================================================
// SECTION: Recorded Calls
// ============================================================================

/// Immutable record of one client invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedCall {
    /// Service the call was made on.
    pub service: ServiceName,
    /// Method name as invoked.
    pub method: MethodName,
    /// Keyword arguments of the call.
    pub request: RequestArgs,
}

impl RecordedCall {
    /// Returns true when the record matches the service and method.
    #[must_use]
    pub fn matches(&self, service: &ServiceName, method: &str) -> bool {
        &self.service == service && self.method.same_operation(method)
    }
}
