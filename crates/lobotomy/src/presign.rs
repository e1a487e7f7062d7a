// crates/lobotomy/src/presign.rs
// ============================================================================
// Module: Presigned URLs
// Description: Fake presigned URL rendering.
// Purpose: Give code under test a URL with the provider's query layout.
// Dependencies: lobotomy-core, time
// ============================================================================

//! ## Overview
//! The URL carries the real query parameters in their usual order, but the
//! token and signature are fixed placeholders. Nothing is signed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use lobotomy_core::ServiceName;
use time::OffsetDateTime;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Lifetime in seconds when none is given.
pub const DEFAULT_EXPIRES_IN: u64 = 3600;
/// Version label when the client was built without one.
const DEFAULT_API_VERSION: &str = "2011-06-15";
/// Region used when neither client nor session selects one.
const DEFAULT_REGION: &str = "us-east-1";
/// Placeholder security token.
const FAKE_TOKEN: &str = "LobotomyFakeToken";
/// Placeholder signature.
const FAKE_SIGNATURE: &str = "lobotomyfakesignature";

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Inputs of one presigned URL.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PresignRequest<'a> {
    /// Service the URL targets.
    pub service: &'a ServiceName,
    /// Client method being presigned.
    pub method: &'a str,
    /// Client API version, if configured.
    pub api_version: Option<&'a str>,
    /// Access key placed in the credential scope.
    pub access_key: &'a str,
    /// Region placed in the credential scope.
    pub region: Option<&'a str>,
    /// Lifetime in seconds.
    pub expires_in: Option<u64>,
    /// Signing instant.
    pub now: OffsetDateTime,
}

/// Renders a presigned URL.
pub(crate) fn presigned_url(request: &PresignRequest<'_>) -> String {
    let service = request.service;
    let now = request.now;
    let day = format!("{:04}{:02}{:02}", now.year(), u8::from(now.month()), now.day());
    let stamp = format!("{day}T{:02}{:02}{:02}Z", now.hour(), now.minute(), now.second());
    format!(
        "https://{service}.amazonaws.com/?Action={action}&Version={version}\
         &X-Amz-Algorithm=AWS4-HMAC-SHA256\
         &X-Amz-Credential={access}%2F{day}%2F{region}%2F{service}%2Faws4_request\
         &X-Amz-Date={stamp}&X-Amz-Expires={expires}&X-Amz-SignedHeaders=host\
         &X-Amz-Security-Token={FAKE_TOKEN}&X-Amz-Signature={FAKE_SIGNATURE}",
        action = action_name(request.method),
        version = request.api_version.unwrap_or(DEFAULT_API_VERSION),
        access = request.access_key,
        region = request.region.unwrap_or(DEFAULT_REGION),
        expires = request.expires_in.unwrap_or(DEFAULT_EXPIRES_IN),
    )
}

/// Converts `get_caller_identity` into `GetCallerIdentity`.
fn action_name(method: &str) -> String {
    method
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
