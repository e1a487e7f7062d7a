// crates/lobotomy-core/src/core/response.rs
// ============================================================================
// Module: Configured Responses
// Description: Response entries and per-key response queues.
// Purpose: Represent fixed and computed responses and their consumption policy.
// Dependencies: crate::core::{call, error}, serde_json
// ============================================================================

//! ## Overview
//! A configured response is untyped JSON taken verbatim from test setup, or a
//! computed response produced from the request arguments at call time. Each
//! (service, method) key owns a [`CallQueue`] that either repeats one entry
//! forever or hands out a FIFO sequence of one-shot entries.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::core::call::RequestArgs;
use crate::core::error::ClientError;

// ============================================================================
// SECTION: Response Entries
// ============================================================================

/// Function computing a response from the request arguments.
///
/// Returning `Err` raises the given provider error to the caller.
pub type ResponseFn = Arc<dyn Fn(&RequestArgs) -> Result<Value, ClientError> + Send + Sync>;

/// One configured response.
#[derive(Clone)]
pub enum ResponseEntry {
    /// Response value returned as configured.
    Fixed(Value),
    /// Response computed from the call's arguments after it is popped.
    Computed(ResponseFn),
}

impl ResponseEntry {
    /// Wraps a closure as a computed response.
    #[must_use]
    pub fn computed<F>(func: F) -> Self
    where
        F: Fn(&RequestArgs) -> Result<Value, ClientError> + Send + Sync + 'static,
    {
        Self::Computed(Arc::new(func))
    }

    /// Produces the concrete response value for a call.
    ///
    /// # Errors
    ///
    /// Returns the [`ClientError`] raised by a computed response.
    pub fn resolve(self, request: &RequestArgs) -> Result<Value, ClientError> {
        match self {
            Self::Fixed(value) => Ok(value),
            Self::Computed(func) => func(request),
        }
    }

    /// Returns the fixed value, if this entry is not computed.
    #[must_use]
    pub const fn as_fixed(&self) -> Option<&Value> {
        match self {
            Self::Fixed(value) => Some(value),
            Self::Computed(_) => None,
        }
    }
}

impl fmt::Debug for ResponseEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(value) => f.debug_tuple("Fixed").field(value).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<Value> for ResponseEntry {
    fn from(value: Value) -> Self {
        Self::Fixed(value)
    }
}

// ============================================================================
// SECTION: Call Queue
// ============================================================================

/// Consumption policy and pending entries for one call key.
///
/// # Invariants
/// - `Repeating` hands out clones of its entry and never runs dry.
/// - `Sequence` hands out each entry exactly once, front first.
#[derive(Debug, Clone)]
pub enum CallQueue {
    /// Single entry returned unchanged on every call.
    Repeating(ResponseEntry),
    /// One-shot entries consumed in FIFO order.
    Sequence(VecDeque<ResponseEntry>),
}

impl CallQueue {
    /// Appends an entry, promoting a repeating queue into a sequence.
    pub fn push(&mut self, entry: ResponseEntry) {
        match self {
            Self::Repeating(existing) => {
                let mut queue = VecDeque::with_capacity(2);
                queue.push_back(existing.clone());
                queue.push_back(entry);
                *self = Self::Sequence(queue);
            }
            Self::Sequence(queue) => queue.push_back(entry),
        }
    }

    /// Hands out the next entry, or `None` when a sequence is exhausted.
    pub fn pop(&mut self) -> Option<ResponseEntry> {
        match self {
            Self::Repeating(entry) => Some(entry.clone()),
            Self::Sequence(queue) => queue.pop_front(),
        }
    }

    /// Returns the number of pending one-shot entries, `None` when repeating.
    #[must_use]
    pub fn pending(&self) -> Option<usize> {
        match self {
            Self::Repeating(_) => None,
            Self::Sequence(queue) => Some(queue.len()),
        }
    }
}
