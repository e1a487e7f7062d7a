// crates/lobotomy-core/src/runtime/provider_errors.rs
// ============================================================================
// Module: Provider Error Synthesis
// Description: Turns `Error` response mappings into client errors.
// Purpose: Let tests exercise the caller's provider error handling.
// Dependencies: crate::core, serde_json, tracing
// ============================================================================

//! ## Overview
//! A configured response shaped like `{"Error": {"Code": .., "Message": ..}}`
//! is raised as a [`ClientError`] instead of being cast. The error is bound
//! to the call and marked modeled when its code names one of the service's
//! declared exceptions, which is what code-specific matching keys on.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde_json::Value;
use tracing::warn;

use crate::core::ClientError;
use crate::core::ServiceName;

// ============================================================================
// SECTION: Synthesis
// ============================================================================

/// Raises the error encoded in a response, if any.
///
/// # Errors
///
/// Returns [`ClientError`] when the response has an `Error` mapping carrying
/// both `Code` and `Message`.
pub fn maybe_raise(
    service: &ServiceName,
    operation: &str,
    exceptions: &BTreeSet<String>,
    response: &Value,
) -> Result<(), ClientError> {
    let Some(error) = response.get("Error").and_then(Value::as_object) else {
        return Ok(());
    };
    let (Some(code), Some(message)) = (error.get("Code"), error.get("Message")) else {
        return Ok(());
    };
    let error = ClientError::new(text(code), text(message)).bind(service, operation, exceptions);
    warn!(
        service = %service,
        operation,
        code = error.code(),
        modeled = error.is_modeled(),
        "raising configured client error"
    );
    Err(error)
}

/// Renders an error field as text.
fn text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test assertions use unwrap for clarity.")]

    use std::collections::BTreeSet;

    use serde_json::json;

    use super::maybe_raise;
    use crate::core::ServiceName;

    fn exceptions() -> BTreeSet<String> {
        BTreeSet::from(["NoSuchKey".to_string()])
    }

    #[test]
    fn passes_through_plain_responses() {
        let service = ServiceName::new("s3");
        assert!(maybe_raise(&service, "get_object", &exceptions(), &json!({"Body": "x"})).is_ok());
        assert!(
            maybe_raise(&service, "get_object", &exceptions(), &json!({"Error": {"Code": "X"}}))
                .is_ok(),
            "an Error mapping without a Message is not raised"
        );
    }

    #[test]
    fn raises_modeled_and_generic_codes() {
        let service = ServiceName::new("s3");
        let modeled = maybe_raise(
            &service,
            "get_object",
            &exceptions(),
            &json!({"Error": {"Code": "NoSuchKey", "Message": "gone"}}),
        )
        .unwrap_err();
        assert!(modeled.is("NoSuchKey"));
        assert_eq!(modeled.response(), json!({"Error": {"Code": "NoSuchKey", "Message": "gone"}}));

        let generic = maybe_raise(
            &service,
            "get_object",
            &exceptions(),
            &json!({"Error": {"Code": "Throttled", "Message": "slow down"}}),
        )
        .unwrap_err();
        assert!(!generic.is_modeled());
        assert!(!generic.is("Throttled"));
        assert_eq!(generic.code(), "Throttled");
    }
}
