// crates/lobotomy/src/paginator.rs
// ============================================================================
// Module: Paginator
// Description: Single-page paginator over a mocked operation.
// Purpose: Let pagination loops run against configured responses.
// Dependencies: lobotomy-core, serde_json
// ============================================================================

//! ## Overview
//! Every pagination yields exactly one page: the result of one call.

use lobotomy_core::LobotomyError;
use lobotomy_core::TypedValue;
use serde_json::Value;

use crate::client::Client;

/// Paginator bound to one client method.
#[derive(Debug, Clone)]
pub struct Paginator {
    /// Client the pages come from.
    client: Client,
    /// Paginated method.
    method: String,
}

impl Paginator {
    /// Creates a paginator.
    pub(crate) fn new(client: Client, method: &str) -> Self {
        Self {
            client,
            method: method.to_string(),
        }
    }

    /// Returns the paginated method.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Runs the method once and returns its response as the only page.
    ///
    /// # Errors
    ///
    /// Returns the [`LobotomyError`] of the underlying call.
    pub fn paginate(&self, args: Value) -> Result<Vec<TypedValue>, LobotomyError> {
        Ok(vec![self.client.call(&self.method, args)?])
    }
}
