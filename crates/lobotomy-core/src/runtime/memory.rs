// crates/lobotomy-core/src/runtime/memory.rs
// ============================================================================
// Module: In-Memory Model Loader
// Description: Model loader over a fixed set of prebuilt service models.
// Purpose: Serve hand-built models in tests and embedded setups.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! [`InMemoryModelLoader`] hands out clones of models registered up front. It
//! never fails; an unregistered service simply has no model.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::ServiceModel;
use crate::core::ServiceName;
use crate::interfaces::ModelLoadError;
use crate::interfaces::ModelLoader;

// ============================================================================
// SECTION: Loader
// ============================================================================

/// Model loader backed by an in-memory map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryModelLoader {
    /// Registered models keyed by service name.
    models: BTreeMap<ServiceName, ServiceModel>,
}

impl InMemoryModelLoader {
    /// Creates an empty loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a model under its own service name.
    #[must_use]
    pub fn with_model(mut self, model: ServiceModel) -> Self {
        self.insert(model);
        self
    }

    /// Registers or replaces a model.
    pub fn insert(&mut self, model: ServiceModel) {
        self.models.insert(model.service.clone(), model);
    }
}

impl ModelLoader for InMemoryModelLoader {
    fn load(&self, service: &ServiceName) -> Result<Option<ServiceModel>, ModelLoadError> {
        Ok(self.models.get(service).cloned())
    }

    fn services(&self) -> Vec<ServiceName> {
        self.models.keys().cloned().collect()
    }
}
