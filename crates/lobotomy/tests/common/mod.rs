// crates/lobotomy/tests/common/mod.rs
// ============================================================================
// Module: Facade Test Helpers
// Description: Shared helpers for mocked client integration tests.
// Purpose: Keep body reading and call counting out of individual tests.
// ============================================================================

//! Shared helpers for lobotomy integration tests.

#![allow(dead_code, reason = "Each test binary uses a different subset of helpers.")]

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use lobotomy::ClientOverride;
use lobotomy::LobotomyError;
use lobotomy::TypedValue;
use serde_json::Value;

/// Reads the single-read body stored under a key.
pub fn read_body(value: &mut TypedValue, key: &str) -> Vec<u8> {
    let body = value.get_mut(key).and_then(TypedValue::as_body_mut).expect("body present");
    body.read().to_vec()
}

/// Override that counts calls and echoes the method name.
#[derive(Debug, Clone, Default)]
pub struct EchoOverride {
    /// Shared call counter.
    calls: Arc<AtomicUsize>,
}

impl EchoOverride {
    /// Returns how many calls reached the override.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ClientOverride for EchoOverride {
    fn call(&self, method: &str, args: &Value) -> Result<TypedValue, LobotomyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(TypedValue::Untyped(serde_json::json!({"method": method, "args": args})))
    }
}
