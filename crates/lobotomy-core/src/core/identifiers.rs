// crates/lobotomy-core/src/core/identifiers.rs
// ============================================================================
// Module: Lobotomy Identifiers
// Description: Opaque identifiers for services, client methods, and shapes.
// Purpose: Provide strongly typed, serializable names with stable string forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Identifiers are thin string wrappers. Client method names are written in
//! `snake_case` by callers while service models name operations in
//! `PascalCase`; both normalize to the same [`operation_key`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Service name as passed to the client factory (for example `s3`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceName(String);

impl ServiceName {
    /// Creates a new service name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ServiceName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ServiceName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&ServiceName> for ServiceName {
    fn from(value: &ServiceName) -> Self {
        value.clone()
    }
}

/// Client method name as invoked by the caller (for example `list_objects`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MethodName(String);

impl MethodName {
    /// Creates a new method name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the normalized lookup key for this method.
    #[must_use]
    pub fn operation_key(&self) -> String {
        operation_key(&self.0)
    }

    /// Returns true when both names refer to the same operation.
    #[must_use]
    pub fn same_operation(&self, other: &str) -> bool {
        self.operation_key() == operation_key(other)
    }
}

impl fmt::Display for MethodName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for MethodName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MethodName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&MethodName> for MethodName {
    fn from(value: &MethodName) -> Self {
        value.clone()
    }
}

/// Shape name within a single service model.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeName(String);

impl ShapeName {
    /// Creates a new shape name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShapeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ShapeName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ShapeName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Name Normalization
// ============================================================================

/// Normalizes an operation or method name into its lookup key.
///
/// `ListObjects`, `list_objects`, and `listobjects` all map to `listobjects`.
#[must_use]
pub fn operation_key(name: &str) -> String {
    name.chars().filter(|ch| *ch != '_').flat_map(char::to_lowercase).collect()
}

/// Converts a `PascalCase` operation name into its `snake_case` method name.
#[must_use]
pub fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (index, ch) in chars.iter().enumerate() {
        if ch.is_uppercase() && index > 0 {
            let prev = chars[index - 1];
            let next_is_lower = chars.get(index + 1).is_some_and(|next| next.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary {
                out.push('_');
            }
        }
        out.extend(ch.to_lowercase());
    }
    out
}
