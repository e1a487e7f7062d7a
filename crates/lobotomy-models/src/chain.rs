// crates/lobotomy-models/src/chain.rs
// ============================================================================
// Module: Model Loader Chain
// Description: Ordered fallback across several model loaders.
// Purpose: Let local model directories shadow or extend the bundled set.
// Dependencies: lobotomy-core
// ============================================================================

//! ## Overview
//! The first loader that has a model for a service wins. A loader error stops
//! the search rather than falling through, so a broken local model is never
//! silently replaced by a bundled one.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;

use lobotomy_core::ModelLoadError;
use lobotomy_core::ModelLoader;
use lobotomy_core::ServiceModel;
use lobotomy_core::ServiceName;

// ============================================================================
// SECTION: Chain
// ============================================================================

/// Loaders consulted in insertion order.
#[derive(Default)]
pub struct ModelLoaderChain {
    /// Loaders, highest priority first.
    loaders: Vec<Box<dyn ModelLoader + Send + Sync>>,
}

impl ModelLoaderChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a loader with lower priority than those already present.
    #[must_use]
    pub fn with(mut self, loader: impl ModelLoader + Send + Sync + 'static) -> Self {
        self.push(loader);
        self
    }

    /// Appends a loader in place.
    pub fn push(&mut self, loader: impl ModelLoader + Send + Sync + 'static) {
        self.loaders.push(Box::new(loader));
    }

    /// Returns the number of chained loaders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    /// Returns true when no loaders are chained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }
}

impl ModelLoader for ModelLoaderChain {
    fn load(&self, service: &ServiceName) -> Result<Option<ServiceModel>, ModelLoadError> {
        for loader in &self.loaders {
            if let Some(model) = loader.load(service)? {
                return Ok(Some(model));
            }
        }
        Ok(None)
    }

    fn services(&self) -> Vec<ServiceName> {
        let services: BTreeSet<ServiceName> =
            self.loaders.iter().flat_map(|loader| loader.services()).collect();
        services.into_iter().collect()
    }
}

impl fmt::Debug for ModelLoaderChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelLoaderChain").field("loaders", &self.loaders.len()).finish()
    }
}
