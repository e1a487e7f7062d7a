// crates/lobotomy-core/src/runtime/sequencer.rs
// ============================================================================
// Module: Call Sequencer & Recorder
// Description: Per-key response queues and the append-only call history.
// Purpose: Hand out configured responses in order and record every call.
// Dependencies: crate::core, tracing
// ============================================================================

//! ## Overview
//! The sequencer owns one [`CallQueue`] per (service, operation) key and the
//! history of every recorded invocation. A single scalar registration repeats
//! forever; any further registration for the key, or a registration made as
//! a sequence, switches the key to strict FIFO where each entry is consumed
//! once and exhaustion is an error.
//!
//! Method names are normalized with [`operation_key`], so `list_objects` and
//! `ListObjects` address the same queue.
//!
//! ## Invariants
//! - Each sequence entry is returned by exactly one `next_response` call.
//! - History is append-only and preserves invocation order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::VecDeque;

use tracing::trace;
use tracing::warn;

use crate::core::CallQueue;
use crate::core::LobotomyError;
use crate::core::RecordedCall;
use crate::core::ResponseEntry;
use crate::core::ServiceName;
use crate::core::operation_key;

// ============================================================================
// SECTION: Remaining Responses
// ============================================================================

/// Number of responses still available for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    /// A repeating response; never runs out.
    Unbounded,
    /// One-shot responses left in the queue.
    Count(usize),
}

// ============================================================================
// SECTION: Sequencer
// ============================================================================

/// Queue key: service plus normalized operation name.
type QueueKey = (ServiceName, String);

/// Response queues and call history for one registry instance.
#[derive(Debug, Default)]
pub struct CallSequencer {
    /// Response queues by key.
    queues: BTreeMap<QueueKey, CallQueue>,
    /// Every recorded call, oldest first.
    history: Vec<RecordedCall>,
}

impl CallSequencer {
    /// Creates an empty sequencer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a single (scalar) response.
    ///
    /// The first scalar registration repeats forever; a later registration
    /// promotes the key to a FIFO sequence.
    pub fn enqueue(&mut self, service: &ServiceName, method: &str, entry: ResponseEntry) {
        let key = queue_key(service, method);
        match self.queues.get_mut(&key) {
            Some(queue) => {
                if queue.pending().is_none() {
                    trace!(service = %service, method, "promoting repeating response to sequence");
                }
                queue.push(entry);
            }
            None => {
                self.queues.insert(key, CallQueue::Repeating(entry));
            }
        }
    }

    /// Registers responses that are consumed one per call, in order.
    pub fn enqueue_sequence<I>(&mut self, service: &ServiceName, method: &str, entries: I)
    where
        I: IntoIterator<Item = ResponseEntry>,
    {
        let key = queue_key(service, method);
        let queue = match self.queues.remove(&key) {
            Some(CallQueue::Sequence(mut queue)) => {
                queue.extend(entries);
                queue
            }
            Some(CallQueue::Repeating(existing)) => {
                trace!(service = %service, method, "promoting repeating response to sequence");
                let mut queue = VecDeque::from([existing]);
                queue.extend(entries);
                queue
            }
            None => entries.into_iter().collect(),
        };
        self.queues.insert(key, CallQueue::Sequence(queue));
    }

    /// Removes every response registered for a key.
    ///
    /// Returns true when something was registered.
    pub fn clear(&mut self, service: &ServiceName, method: &str) -> bool {
        self.queues.remove(&queue_key(service, method)).is_some()
    }

    /// Hands out the next response for a key.
    ///
    /// # Errors
    ///
    /// Returns [`LobotomyError::NoResponseConfigured`] when nothing was ever
    /// registered and [`LobotomyError::NoMoreResponses`] when a sequence is
    /// exhausted.
    pub fn next_response(
        &mut self,
        service: &ServiceName,
        method: &str,
    ) -> Result<ResponseEntry, LobotomyError> {
        let Some(queue) = self.queues.get_mut(&queue_key(service, method)) else {
            return Err(LobotomyError::NoResponseConfigured {
                service: service.clone(),
                method: method.to_string(),
            });
        };
        queue.pop().ok_or_else(|| {
            warn!(service = %service, method, "response queue exhausted");
            LobotomyError::NoMoreResponses {
                service: service.clone(),
                method: method.to_string(),
            }
        })
    }

    /// Returns how many responses remain for a key, `None` if unregistered.
    #[must_use]
    pub fn remaining(&self, service: &ServiceName, method: &str) -> Option<Remaining> {
        self.queues
            .get(&queue_key(service, method))
            .map(|queue| queue.pending().map_or(Remaining::Unbounded, Remaining::Count))
    }

    /// Appends a call to the history.
    pub fn record(&mut self, call: RecordedCall) {
        self.history.push(call);
    }

    /// Returns every recorded call in invocation order.
    #[must_use]
    pub fn history(&self) -> &[RecordedCall] {
        &self.history
    }

    /// Returns the recorded calls for one key in invocation order.
    #[must_use]
    pub fn calls_for(&self, service: &ServiceName, method: &str) -> Vec<&RecordedCall> {
        self.history.iter().filter(|call| call.matches(service, method)).collect()
    }

    /// Returns one recorded call for a key.
    ///
    /// Negative indices count from the most recent call, so `-1` is the last.
    ///
    /// # Errors
    ///
    /// Returns [`LobotomyError::NoSuchCall`] when the index is out of range.
    pub fn call_at(
        &self,
        service: &ServiceName,
        method: &str,
        index: isize,
    ) -> Result<&RecordedCall, LobotomyError> {
        let calls = self.calls_for(service, method);
        let position = if index < 0 {
            calls.len().checked_sub(index.unsigned_abs())
        } else {
            Some(index.unsigned_abs())
        };
        position.and_then(|position| calls.get(position).copied()).ok_or_else(|| {
            LobotomyError::NoSuchCall {
                service: service.clone(),
                method: method.to_string(),
                index,
            }
        })
    }
}

/// Builds the normalized queue key.
fn queue_key(service: &ServiceName, method: &str) -> QueueKey {
    (service.clone(), operation_key(method))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
