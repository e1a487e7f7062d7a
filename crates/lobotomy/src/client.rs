// crates/lobotomy/src/client.rs
// ============================================================================
// Module: Mocked Client
// Description: Per-service client routing calls to the engine or an override.
// Purpose: Present the low-level client call surface without network access.
// Dependencies: lobotomy-config, lobotomy-core, serde_json, time
// ============================================================================

//! ## Overview
//! A [`Client`] exposes one call per operation of its service through
//! [`Client::call`], addressed by the `snake_case` method name. Overrides are
//! looked up on every call, so an override installed after the client was
//! created still takes effect.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::sync::Arc;

use lobotomy_config::SessionConfig;
use lobotomy_core::LobotomyError;
use lobotomy_core::ServiceName;
use lobotomy_core::TypedValue;
use serde_json::Value;
use time::OffsetDateTime;

use crate::lobotomy::Lobotomy;
use crate::paginator::Paginator;
use crate::presign::PresignRequest;
use crate::presign::presigned_url;

// ============================================================================
// SECTION: Options
// ============================================================================

/// Options supplied when constructing a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientOptions {
    /// Region override.
    pub region_name: Option<String>,
    /// API version label used in presigned URLs.
    pub api_version: Option<String>,
    /// Access key override used in presigned URLs.
    pub aws_access_key_id: Option<String>,
    /// Endpoint override, reported back unchanged.
    pub endpoint_url: Option<String>,
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Mocked low-level client for one service.
#[derive(Debug, Clone)]
pub struct Client {
    /// Owning mock instance.
    lobotomy: Lobotomy,
    /// Settings of the session that created the client.
    session: Arc<SessionConfig>,
    /// Service name.
    service: ServiceName,
    /// Construction options.
    options: ClientOptions,
}

impl Client {
    /// Creates a client.
    pub(crate) const fn new(
        lobotomy: Lobotomy,
        session: Arc<SessionConfig>,
        service: ServiceName,
        options: ClientOptions,
    ) -> Self {
        Self {
            lobotomy,
            session,
            service,
            options,
        }
    }

    /// Returns the service name.
    #[must_use]
    pub const fn service_name(&self) -> &ServiceName {
        &self.service
    }

    /// Returns the construction options.
    #[must_use]
    pub const fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Returns the client region, falling back to the session region.
    #[must_use]
    pub fn region_name(&self) -> Option<&str> {
        self.options.region_name.as_deref().or(self.session.region_name.as_deref())
    }

    /// Calls a client method with keyword arguments (`null` for none).
    ///
    /// # Errors
    ///
    /// Returns [`LobotomyError`] from the engine or the override.
    pub fn call(&self, method: &str, args: Value) -> Result<TypedValue, LobotomyError> {
        if let Some(client) = self.lobotomy.get_client_override(self.service.clone())? {
            return client.call(method, &args);
        }
        self.lobotomy.invoke(&self.service, method, args)
    }

    /// Lists the `snake_case` methods the service model defines.
    ///
    /// # Errors
    ///
    /// Returns [`LobotomyError`] when the service model cannot be loaded.
    pub fn operations(&self) -> Result<Vec<String>, LobotomyError> {
        Ok(self.lobotomy.registry().service(&self.service)?.method_names())
    }

    /// Returns the modeled exception names of the service.
    ///
    /// # Errors
    ///
    /// Returns [`LobotomyError`] when the service model cannot be loaded.
    pub fn exceptions(&self) -> Result<BTreeSet<String>, LobotomyError> {
        Ok(self.lobotomy.registry().service(&self.service)?.exceptions())
    }

    /// Returns a single-page paginator for a method.
    ///
    /// # Errors
    ///
    /// Returns [`LobotomyError::UnknownOperation`] when the service model has
    /// no such method.
    pub fn get_paginator(&self, method: &str) -> Result<Paginator, LobotomyError> {
        if self.lobotomy.get_client_override(self.service.clone())?.is_none() {
            self.lobotomy.registry().resolve_operation(&self.service, method)?;
        }
        Ok(Paginator::new(self.clone(), method))
    }

    /// Generates a fake presigned URL for a method.
    ///
    /// The URL has the provider's query layout with a fixed token and
    /// signature; the credential scope uses the current UTC date.
    #[must_use]
    pub fn generate_presigned_url(&self, method: &str, expires_in: Option<u64>) -> String {
        let access_key = self
            .options
            .aws_access_key_id
            .as_deref()
            .unwrap_or(&self.session.credentials.access_key);
        presigned_url(&PresignRequest {
            service: &self.service,
            method,
            api_version: self.options.api_version.as_deref(),
            access_key,
            region: self.region_name(),
            expires_in,
            now: OffsetDateTime::now_utc(),
        })
    }
}
