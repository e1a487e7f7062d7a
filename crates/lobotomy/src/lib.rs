// crates/lobotomy/src/lib.rs
// ============================================================================
// Module: Lobotomy Library
// Description: Mocked sessions and clients over the Lobotomy engine.
// Purpose: Public entry point for tests that mock cloud SDK calls.
// Dependencies: lobotomy-config, lobotomy-core, lobotomy-models
// ============================================================================

//! ## Overview
//! Lobotomy replaces cloud SDK clients in tests. Responses are registered on a
//! [`Lobotomy`] instance (directly or from configuration); sessions created
//! from it hand out [`Client`]s whose calls are validated against the
//! service model, answered from the registered responses, and cast into the
//! typed values the real client would return.
//!
//! ```no_run
//! use lobotomy::Lobotomy;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), lobotomy::LobotomyError> {
//! let lobotomy = Lobotomy::new();
//! lobotomy.add_call("s3", "get_object", Some(json!({"Body": "hello"})))?;
//! let client = lobotomy.session()?.client("s3")?;
//! let mut response = client.call("get_object", json!({"Bucket": "b", "Key": "k"}))?;
//! let body = response.get_mut("Body").and_then(lobotomy::TypedValue::as_body_mut);
//! assert_eq!(body.map(|body| body.read()).as_deref(), Some(&b"hello"[..]));
//! # Ok(())
//! # }
//! ```

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;
pub mod lobotomy;
pub mod paginator;
mod presign;
pub mod session;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::Client;
pub use client::ClientOptions;
pub use lobotomy::Lobotomy;
pub use lobotomy::LobotomyBuilder;
pub use lobotomy::SharedOverride;
pub use lobotomy::default_registry;
pub use lobotomy_config::ConfigError;
pub use lobotomy_config::ConfigPrefix;
pub use lobotomy_config::CredentialsConfig;
pub use lobotomy_config::LobotomyConfig;
pub use lobotomy_config::SessionConfig;
pub use lobotomy_config::SessionOptions;
pub use lobotomy_config::SessionSettings;
pub use lobotomy_core::ClientError;
pub use lobotomy_core::ClientOverride;
pub use lobotomy_core::LobotomyError;
pub use lobotomy_core::RecordedCall;
pub use lobotomy_core::Remaining;
pub use lobotomy_core::RequestArgs;
pub use lobotomy_core::ServiceName;
pub use lobotomy_core::StreamingBody;
pub use lobotomy_core::TypedValue;
pub use paginator::Paginator;
pub use presign::DEFAULT_EXPIRES_IN;
pub use session::Session;
