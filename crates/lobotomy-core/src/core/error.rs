// crates/lobotomy-core/src/core/error.rs
// ============================================================================
// Module: Lobotomy Errors
// Description: Error taxonomy for model, contract, exhaustion, and cast failures.
// Purpose: Surface every failure to the caller explicitly and deterministically.
// Dependencies: crate::core::identifiers, crate::interfaces, serde_json, thiserror
// ============================================================================

//! ## Overview
//! [`LobotomyError`] is returned by every engine and facade operation. None of
//! its variants are retried or recovered internally. [`ClientError`] is the
//! provider-style error raised on purpose when a configured response carries
//! an `Error` mapping; it mirrors the real SDK's generic client error while
//! also exposing the modeled exception name for code-specific matching.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;

use serde_json::Value;
use serde_json::json;
use thiserror::Error;

use crate::core::identifiers::ServiceName;
use crate::interfaces::ModelLoadError;

// ============================================================================
// SECTION: Engine Errors
// ============================================================================

/// Errors raised by the response engine and client facade.
#[derive(Debug, Error)]
pub enum LobotomyError {
    /// No model is available for the service.
    #[error("unknown service: {0}")]
    UnknownService(ServiceName),
    /// The service model has no such operation.
    #[error("no definition found for {service}.{method}()")]
    UnknownOperation {
        /// Service name.
        service: ServiceName,
        /// Method name as invoked.
        method: String,
    },
    /// The service model could not be loaded.
    #[error("service model error: {0}")]
    Model(#[from] ModelLoadError),
    /// Required request arguments were omitted.
    #[error("missing required arguments [{}] on {service}.{method}", .missing.join(", "))]
    MissingRequiredArguments {
        /// Service name.
        service: ServiceName,
        /// Method name as invoked.
        method: String,
        /// Every missing member, sorted.
        missing: Vec<String>,
    },
    /// Request arguments not declared by the input shape were supplied.
    #[error("unknown arguments [{}] found on call to {service}.{method}", .unknown.join(", "))]
    UnknownArguments {
        /// Service name.
        service: ServiceName,
        /// Method name as invoked.
        method: String,
        /// Every unknown argument, sorted.
        unknown: Vec<String>,
    },
    /// Request arguments were not a mapping.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Nothing was ever registered for the call key.
    #[error("no response set for {service}.{method}()")]
    NoResponseConfigured {
        /// Service name.
        service: ServiceName,
        /// Method name as invoked.
        method: String,
    },
    /// Every queued response for the call key has been consumed.
    #[error("no more responses set for {service}.{method}(); all queued responses were returned")]
    NoMoreResponses {
        /// Service name.
        service: ServiceName,
        /// Method name as invoked.
        method: String,
    },
    /// Configuration data could not be cast to the declared shape.
    #[error(transparent)]
    Cast(#[from] CastError),
    /// No recorded call matched the inspection query.
    #[error("no recorded call {service}.{method}() at index {index}")]
    NoSuchCall {
        /// Service name.
        service: ServiceName,
        /// Method name.
        method: String,
        /// Requested index.
        index: isize,
    },
    /// Intentionally configured provider error.
    #[error(transparent)]
    Client(#[from] ClientError),
    /// A client override reported a failure.
    #[error("client override error: {0}")]
    Override(String),
    /// Internal state became unusable.
    #[error("lobotomy state error: {0}")]
    State(String),
}

impl LobotomyError {
    /// Returns the synthesized provider error, if this is one.
    #[must_use]
    pub const fn as_client_error(&self) -> Option<&ClientError> {
        match self {
            Self::Client(error) => Some(error),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Cast Errors
// ============================================================================

/// Failure to cast a configuration value into its declared shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to cast {path} as {expected}: {message}")]
pub struct CastError {
    /// Member path of the offending value (for example `Contents[0].Key`).
    pub path: String,
    /// Shape kind the value was cast to.
    pub expected: &'static str,
    /// Human readable reason.
    pub message: String,
}

impl CastError {
    /// Creates a cast error at the given path.
    #[must_use]
    pub fn new(path: &str, expected: &'static str, message: impl Into<String>) -> Self {
        let path = if path.is_empty() { "<response>".to_string() } else { path.to_string() };
        Self {
            path,
            expected,
            message: message.into(),
        }
    }
}

// ============================================================================
// SECTION: Client Errors
// ============================================================================

/// Provider-style error raised from an `Error` response mapping.
///
/// # Invariants
/// - `response()` always renders `{"Error": {"Code", "Message"}}`.
/// - `modeled` is true only when `code` names an exception of `service`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientError {
    /// Service that raised the error, once bound to a call.
    service: Option<ServiceName>,
    /// Operation that raised the error, once bound to a call.
    operation: Option<String>,
    /// Error code.
    code: String,
    /// Error message.
    message: String,
    /// Whether the code matches a modeled exception of the service.
    modeled: bool,
}

impl ClientError {
    /// Creates an unbound error with the given code and message.
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            service: None,
            operation: None,
            code: code.into(),
            message: message.into(),
            modeled: false,
        }
    }

    /// Binds the error to the call that raised it.
    #[must_use]
    pub fn bind(
        mut self,
        service: &ServiceName,
        operation: &str,
        exceptions: &BTreeSet<String>,
    ) -> Self {
        self.modeled = exceptions.contains(&self.code);
        self.service = Some(service.clone());
        self.operation = Some(operation.to_string());
        self
    }

    /// Returns the error code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the service that raised the error.
    #[must_use]
    pub const fn service(&self) -> Option<&ServiceName> {
        self.service.as_ref()
    }

    /// Returns the generic error payload.
    #[must_use]
    pub fn response(&self) -> Value {
        json!({"Error": {"Code": self.code, "Message": self.message}})
    }

    /// Returns true when the code names a modeled exception of the service.
    #[must_use]
    pub const fn is_modeled(&self) -> bool {
        self.modeled
    }

    /// Returns the modeled exception name, when the code is one.
    #[must_use]
    pub fn exception_name(&self) -> Option<&str> {
        self.modeled.then_some(self.code.as_str())
    }

    /// Returns true when this error matches the named exception.
    ///
    /// Codes that are not modeled by the service only match the generic form,
    /// so this returns false for them.
    #[must_use]
    pub fn is(&self, exception: &str) -> bool {
        self.modeled && self.code == exception
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.service, &self.operation) {
            (Some(service), Some(operation)) => write!(
                f,
                "an error occurred ({}) when calling the {service}.{operation} operation: {}",
                self.code, self.message
            ),
            _ => write!(f, "an error occurred ({}): {}", self.code, self.message),
        }
    }
}

impl std::error::Error for ClientError {}
