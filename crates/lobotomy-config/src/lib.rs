// crates/lobotomy-config/src/lib.rs
// ============================================================================
// Module: Lobotomy Config Library
// Description: Configuration ingestion for mocked clients and sessions.
// Purpose: Load the clients/session document from values or files.
// Dependencies: lobotomy-core, serde, serde_json, serde_yaml, toml
// ============================================================================

//! ## Overview
//! A Lobotomy configuration document maps services to methods to configured
//! responses, plus optional session settings:
//!
//! ```yaml
//! clients:
//!   s3:
//!     get_object:
//!       Body: hello
//! session:
//!   region_name: us-west-2
//! ```
//!
//! `session` (or `sessions`) may also hold a list, consumed one entry per
//! created session. The document may sit below a key prefix inside a larger
//! file. Files are
//! read as JSON, YAML, or TOML by extension and bounded by
//! [`MAX_CONFIG_FILE_SIZE`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod session;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::ConfigError;
pub use config::ConfigFormat;
pub use config::ConfigPrefix;
pub use config::LobotomyConfig;
pub use config::MAX_CONFIG_FILE_SIZE;
pub use session::CredentialsConfig;
pub use session::SessionConfig;
pub use session::SessionOptions;
pub use session::SessionSettings;
