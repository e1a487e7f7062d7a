// crates/lobotomy-core/src/core/value.rs
// ============================================================================
// Module: Typed Response Values
// Description: Richly typed values produced by casting configuration data.
// Purpose: Mirror the value kinds a real client returns to its callers.
// Dependencies: bytes, serde_json, time
// ============================================================================

//! ## Overview
//! [`TypedValue`] is the result tree returned from a mocked call. Binary and
//! streaming members are wrapped in a [`StreamingBody`] that the caller reads
//! once; timestamps are timezone-aware [`OffsetDateTime`] values; configuration
//! keys unknown to the model pass through as [`TypedValue::Untyped`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::io;
use std::ops::Index;

use bytes::Bytes;
use serde_json::Value;
use time::OffsetDateTime;

/// Shared null returned by indexing misses.
static NULL: TypedValue = TypedValue::Null;

// ============================================================================
// SECTION: Streaming Body
// ============================================================================

/// Readable response body backed by an in-memory buffer.
///
/// # Invariants
/// - `cursor <= bytes.len()`.
/// - A full [`StreamingBody::read`] consumes the body; later reads are empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamingBody {
    /// Body content.
    bytes: Bytes,
    /// Read position.
    cursor: usize,
}

impl StreamingBody {
    /// Wraps the given bytes in an unread body.
    #[must_use]
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            cursor: 0,
        }
    }

    /// Reads every remaining byte.
    pub fn read(&mut self) -> Bytes {
        self.read_amount(self.remaining())
    }

    /// Reads at most `amount` bytes from the current position.
    pub fn read_amount(&mut self, amount: usize) -> Bytes {
        let end = self.cursor.saturating_add(amount).min(self.bytes.len());
        let chunk = self.bytes.slice(self.cursor..end);
        self.cursor = end;
        chunk
    }

    /// Returns the number of unread bytes.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.cursor
    }

    /// Returns the total body length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true when the body holds no bytes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Marks the body as fully consumed.
    pub fn close(&mut self) {
        self.cursor = self.bytes.len();
    }
}

impl io::Read for StreamingBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let chunk = self.read_amount(buf.len());
        buf[..chunk.len()].copy_from_slice(&chunk);
        Ok(chunk.len())
    }
}

impl From<&str> for StreamingBody {
    fn from(value: &str) -> Self {
        Self::new(Bytes::copy_from_slice(value.as_bytes()))
    }
}

impl From<Vec<u8>> for StreamingBody {
    fn from(value: Vec<u8>) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Event Stream
// ============================================================================

/// Ordered sequence of events delivered by an event-stream member.
#[derive(Debug, Clone, PartialEq)]
pub struct EventStream {
    /// Events in delivery order.
    events: Vec<TypedValue>,
}

impl EventStream {
    /// Creates a stream over the given events.
    #[must_use]
    pub const fn new(events: Vec<TypedValue>) -> Self {
        Self {
            events,
        }
    }

    /// Iterates the events in order.
    pub fn iter(&self) -> std::slice::Iter<'_, TypedValue> {
        self.events.iter()
    }

    /// Returns the number of events.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true when the stream carries no events.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl IntoIterator for EventStream {
    type Item = TypedValue;
    type IntoIter = std::vec::IntoIter<TypedValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

// ============================================================================
// SECTION: Typed Value
// ============================================================================

/// Typed response value.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// Explicit null from configuration.
    Null,
    /// Boolean scalar.
    Boolean(bool),
    /// Integer scalar.
    Integer(i64),
    /// Floating point scalar.
    Double(f64),
    /// Text scalar.
    String(String),
    /// Single-read binary body.
    Blob(StreamingBody),
    /// Timezone-aware instant.
    Timestamp(OffsetDateTime),
    /// Ordered list.
    List(Vec<TypedValue>),
    /// Structure or map keyed by member name.
    Map(BTreeMap<String, TypedValue>),
    /// Event-stream member.
    EventStream(EventStream),
    /// Configuration data passed through without a model type.
    Untyped(Value),
}

impl TypedValue {
    /// Looks up a key when the value is a map.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// Looks up a key mutably when the value is a map.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Self> {
        match self {
            Self::Map(map) => map.get_mut(key),
            _ => None,
        }
    }

    /// Removes and returns a key when the value is a map.
    pub fn take(&mut self, key: &str) -> Option<Self> {
        match self {
            Self::Map(map) => map.remove(key),
            _ => None,
        }
    }

    /// Returns true for [`TypedValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the text when the value is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text),
            Self::Untyped(Value::String(text)) => Some(text),
            _ => None,
        }
    }

    /// Returns the integer when the value is an integer.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Untyped(value) => value.as_i64(),
            _ => None,
        }
    }

    /// Returns the number as a float when the value is numeric.
    #[must_use]
    #[allow(clippy::cast_precision_loss, reason = "Integers widen to floats for convenience.")]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(value) => Some(*value),
            Self::Integer(value) => Some(*value as f64),
            Self::Untyped(value) => value.as_f64(),
            _ => None,
        }
    }

    /// Returns the flag when the value is a boolean.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            Self::Untyped(value) => value.as_bool(),
            _ => None,
        }
    }

    /// Returns the instant when the value is a timestamp.
    #[must_use]
    pub const fn as_timestamp(&self) -> Option<OffsetDateTime> {
        match self {
            Self::Timestamp(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the items when the value is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries when the value is a map.
    #[must_use]
    pub const fn as_map(&self) -> Option<&BTreeMap<String, Self>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the event stream when the value is one.
    #[must_use]
    pub const fn as_event_stream(&self) -> Option<&EventStream> {
        match self {
            Self::EventStream(stream) => Some(stream),
            _ => None,
        }
    }

    /// Returns the body mutably so it can be read.
    pub fn as_body_mut(&mut self) -> Option<&mut StreamingBody> {
        match self {
            Self::Blob(body) => Some(body),
            _ => None,
        }
    }

    /// Consumes the value, returning the body when it is one.
    #[must_use]
    pub fn into_body(self) -> Option<StreamingBody> {
        match self {
            Self::Blob(body) => Some(body),
            _ => None,
        }
    }

    /// Returns the untyped configuration value when the value is one.
    #[must_use]
    pub const fn as_untyped(&self) -> Option<&Value> {
        match self {
            Self::Untyped(value) => Some(value),
            _ => None,
        }
    }
}

impl Index<&str> for TypedValue {
    type Output = Self;

    fn index(&self, key: &str) -> &Self::Output {
        self.get(key).unwrap_or(&NULL)
    }
}

impl Index<usize> for TypedValue {
    type Output = Self;

    fn index(&self, index: usize) -> &Self::Output {
        match self {
            Self::List(items) => items.get(index).unwrap_or(&NULL),
            _ => &NULL,
        }
    }
}
