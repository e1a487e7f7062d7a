// crates/lobotomy-core/src/interfaces/mod.rs
// ============================================================================
// Module: Lobotomy Interfaces
// Description: Schema-loading and client-override contracts.
// Purpose: Keep the engine schema-agnostic behind narrow trait seams.
// Dependencies: crate::core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The engine never knows where service models come from. A [`ModelLoader`]
//! turns a service name into a [`ServiceModel`]; the registry caches the
//! result. A [`ClientOverride`] replaces the mock engine for one service
//! entirely.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use thiserror::Error;

use crate::core::LobotomyError;
use crate::core::ServiceModel;
use crate::core::ServiceName;
use crate::core::TypedValue;

// ============================================================================
// SECTION: Model Loader
// ============================================================================

/// Model loading errors.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    /// Reading model data failed.
    #[error("model io error: {0}")]
    Io(String),
    /// Model data could not be parsed.
    #[error("model parse error: {0}")]
    Parse(String),
    /// Model data parsed but is inconsistent.
    #[error("invalid model: {0}")]
    Invalid(String),
}

/// Source of service models.
pub trait ModelLoader {
    /// Loads the model for a service.
    ///
    /// Returns `Ok(None)` when this loader has no model for the service.
    ///
    /// # Errors
    ///
    /// Returns [`ModelLoadError`] when a model exists but cannot be loaded.
    fn load(&self, service: &ServiceName) -> Result<Option<ServiceModel>, ModelLoadError>;

    /// Lists the services this loader can provide.
    fn services(&self) -> Vec<ServiceName>;
}

// ============================================================================
// SECTION: Client Override
// ============================================================================

/// Substitute client for one service, bypassing the mock engine.
pub trait ClientOverride {
    /// Handles a method call.
    ///
    /// # Errors
    ///
    /// Returns [`LobotomyError`] as the override sees fit.
    fn call(&self, method: &str, args: &Value) -> Result<TypedValue, LobotomyError>;
}

impl<F> ClientOverride for F
where
    F: Fn(&str, &Value) -> Result<TypedValue, LobotomyError>,
{
    fn call(&self, method: &str, args: &Value) -> Result<TypedValue, LobotomyError> {
        self(method, args)
    }
}
