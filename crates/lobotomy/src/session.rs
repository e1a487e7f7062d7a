// crates/lobotomy/src/session.rs
// ============================================================================
// Module: Mocked Session
// Description: Session accessors and the client factory.
// Purpose: Stand in for an SDK session object during tests.
// Dependencies: lobotomy-config, lobotomy-core
// ============================================================================

//! ## Overview
//! Session accessors answer from [`SessionConfig`], never from the shape
//! engine. [`Session::client`] returns one cached client per service;
//! [`Session::client_with`] always builds a fresh client with its own options.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use lobotomy_config::CredentialsConfig;
use lobotomy_config::SessionConfig;
use lobotomy_core::LobotomyError;
use lobotomy_core::ServiceName;

use crate::client::Client;
use crate::client::ClientOptions;
use crate::lobotomy::Lobotomy;

// ============================================================================
// SECTION: Session
// ============================================================================

/// Mocked SDK session.
#[derive(Debug, Clone)]
pub struct Session {
    /// Owning mock instance.
    lobotomy: Lobotomy,
    /// Effective session settings.
    config: Arc<SessionConfig>,
    /// Cached clients by service.
    clients: Arc<Mutex<BTreeMap<ServiceName, Client>>>,
}

impl Session {
    /// Creates a session over effective settings.
    pub(crate) fn new(lobotomy: Lobotomy, config: SessionConfig) -> Self {
        Self {
            lobotomy,
            config: Arc::new(config),
            clients: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }

    /// Returns the selected profile.
    #[must_use]
    pub fn profile_name(&self) -> Option<&str> {
        self.config.profile_name.as_deref()
    }

    /// Returns the selected region.
    #[must_use]
    pub fn region_name(&self) -> Option<&str> {
        self.config.region_name.as_deref()
    }

    /// Returns the profiles reported as available.
    #[must_use]
    pub fn available_profiles(&self) -> &[String] {
        &self.config.available_profiles
    }

    /// Returns the session credentials.
    #[must_use]
    pub fn credentials(&self) -> &CredentialsConfig {
        &self.config.credentials
    }

    /// Returns the owning mock instance.
    #[must_use]
    pub const fn lobotomy(&self) -> &Lobotomy {
        &self.lobotomy
    }

    /// Returns the client for a service, creating it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`LobotomyError::UnknownService`] when the service has no model
    /// and no override.
    pub fn client(&self, service: impl Into<ServiceName>) -> Result<Client, LobotomyError> {
        let service = service.into();
        let mut clients = self
            .clients
            .lock()
            .map_err(|_| LobotomyError::State("client cache lock poisoned".to_string()))?;
        if let Some(client) = clients.get(&service) {
            return Ok(client.clone());
        }
        let client = self.client_with(service.clone(), ClientOptions::default())?;
        clients.insert(service, client.clone());
        Ok(client)
    }

    /// Builds an uncached client with explicit options.
    ///
    /// # Errors
    ///
    /// Returns [`LobotomyError::UnknownService`] when the service has no model
    /// and no override.
    pub fn client_with(
        &self,
        service: impl Into<ServiceName>,
        options: ClientOptions,
    ) -> Result<Client, LobotomyError> {
        let service = service.into();
        if self.lobotomy.get_client_override(service.clone())?.is_none() {
            self.lobotomy.registry().service(&service)?;
        }
        Ok(Client::new(self.lobotomy.clone(), Arc::clone(&self.config), service, options))
    }
}
