// crates/lobotomy-config/src/session.rs
// ============================================================================
// Module: Session Configuration
// Description: Profile, region, and credential settings for mocked sessions.
// Purpose: Answer session-level accessors without the shape engine.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Session settings are plain data. Credentials default to fixed fake values
//! so code that reads them always gets something well-formed. Values passed
//! when a session is constructed ([`SessionOptions`]) take precedence over the
//! configured ones.
//!
//! Either configuration key, `session` or `sessions`, accepts one mapping or
//! a list of mappings ([`SessionSettings`]). A single mapping applies to
//! every created session; a list is a queue consumed one entry per session,
//! after which defaults apply.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::VecDeque;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Credential source reported when none is configured.
pub const DEFAULT_CREDENTIALS_METHOD: &str = "manual";
/// Access key reported when none is configured.
pub const DEFAULT_ACCESS_KEY: &str = "A123LOBOTOMY";
/// Secret key reported when none is configured.
pub const DEFAULT_SECRET_KEY: &str = "lobotomysecretkey";

// ============================================================================
// SECTION: Session Config
// ============================================================================

/// Configured session settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Selected profile name.
    #[serde(default)]
    pub profile_name: Option<String>,
    /// Selected region name.
    #[serde(default)]
    pub region_name: Option<String>,
    /// Profiles reported as available.
    #[serde(default)]
    pub available_profiles: Vec<String>,
    /// Resolved credentials.
    #[serde(default)]
    pub credentials: CredentialsConfig,
}

impl SessionConfig {
    /// Applies construction options over the configured values.
    #[must_use]
    pub fn with_options(mut self, options: &SessionOptions) -> Self {
        if let Some(profile) = &options.profile_name {
            self.profile_name = Some(profile.clone());
        }
        if let Some(region) = &options.region_name {
            self.region_name = Some(region.clone());
        }
        if let Some(access_key) = &options.access_key_id {
            self.credentials.access_key.clone_from(access_key);
        }
        if let Some(secret_key) = &options.secret_access_key {
            self.credentials.secret_key.clone_from(secret_key);
        }
        if let Some(token) = &options.session_token {
            self.credentials.token = Some(token.clone());
        }
        self
    }
}

/// Credentials reported by a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// How the credentials were obtained.
    #[serde(default = "default_method")]
    pub method: String,
    /// Access key identifier.
    #[serde(default = "default_access_key")]
    pub access_key: String,
    /// Secret access key.
    #[serde(default = "default_secret_key")]
    pub secret_key: String,
    /// Optional session token.
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            method: default_method(),
            access_key: default_access_key(),
            secret_key: default_secret_key(),
            token: None,
        }
    }
}

/// Default credential method.
fn default_method() -> String {
    DEFAULT_CREDENTIALS_METHOD.to_string()
}

/// Default access key.
fn default_access_key() -> String {
    DEFAULT_ACCESS_KEY.to_string()
}

/// Default secret key.
fn default_secret_key() -> String {
    DEFAULT_SECRET_KEY.to_string()
}

// ============================================================================
// SECTION: Session Settings
// ============================================================================

/// One shared session mapping or a queue of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SessionSettings {
    /// Settings consumed front to back, one per created session.
    Queue(VecDeque<SessionConfig>),
    /// Settings reported by every created session.
    Shared(SessionConfig),
}

impl SessionSettings {
    /// Returns the settings for the next created session.
    ///
    /// A drained queue yields defaults.
    pub fn next(&mut self) -> SessionConfig {
        match self {
            Self::Queue(queue) => queue.pop_front().unwrap_or_default(),
            Self::Shared(session) => session.clone(),
        }
    }
}

impl From<SessionConfig> for SessionSettings {
    fn from(session: SessionConfig) -> Self {
        Self::Shared(session)
    }
}

impl From<Vec<SessionConfig>> for SessionSettings {
    fn from(sessions: Vec<SessionConfig>) -> Self {
        Self::Queue(sessions.into())
    }
}

// ============================================================================
// SECTION: Session Options
// ============================================================================

/// Values supplied when constructing a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Access key override.
    pub access_key_id: Option<String>,
    /// Secret key override.
    pub secret_access_key: Option<String>,
    /// Session token override.
    pub session_token: Option<String>,
    /// Region override.
    pub region_name: Option<String>,
    /// Profile override.
    pub profile_name: Option<String>,
}

impl SessionOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the region.
    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region_name = Some(region.into());
        self
    }

    /// Sets the profile.
    #[must_use]
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile_name = Some(profile.into());
        self
    }

    /// Sets explicit credentials.
    #[must_use]
    pub fn credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: Option<String>,
    ) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self.secret_access_key = Some(secret_access_key.into());
        self.session_token = session_token;
        self
    }
}
