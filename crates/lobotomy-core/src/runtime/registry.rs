// crates/lobotomy-core/src/runtime/registry.rs
// ============================================================================
// Module: Shape Registry
// Description: Lazily loaded, cached service models.
// Purpose: Resolve operations and shapes for a (service, method) pair.
// Dependencies: crate::{core, interfaces}, tracing
// ============================================================================

//! ## Overview
//! The shape registry wraps a [`ModelLoader`] and caches each service model
//! on first use. Loads are serialized by a single guard so each service is
//! loaded once; afterwards models are shared read-only behind [`Arc`].
//! Resolution is referentially transparent: the same key always resolves to
//! the same model instance for the lifetime of the registry.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::RwLock;

use tracing::debug;

use crate::core::LobotomyError;
use crate::core::OperationModel;
use crate::core::ServiceModel;
use crate::core::ServiceName;
use crate::core::Shape;
use crate::core::ShapeName;
use crate::interfaces::ModelLoadError;
use crate::interfaces::ModelLoader;

// ============================================================================
// SECTION: Resolved Operation
// ============================================================================

/// Operation resolved against its service model.
#[derive(Debug, Clone)]
pub struct ResolvedOperation {
    /// Shared service model.
    pub model: Arc<ServiceModel>,
    /// Operation descriptor.
    pub operation: OperationModel,
}

impl ResolvedOperation {
    /// Returns the input shape, if the operation takes arguments.
    #[must_use]
    pub fn input_shape(&self) -> Option<&Shape> {
        self.operation.input.as_ref().and_then(|name| self.model.shape(name))
    }

    /// Returns the output shape, if the operation returns data.
    #[must_use]
    pub fn output_shape(&self) -> Option<&Shape> {
        self.operation.output.as_ref().and_then(|name| self.model.shape(name))
    }

    /// Returns the service name.
    #[must_use]
    pub fn service(&self) -> &ServiceName {
        &self.model.service
    }

    /// Returns the modeled exception names of the service.
    #[must_use]
    pub fn exceptions(&self) -> BTreeSet<String> {
        self.model.exceptions()
    }
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Lazily populated registry of service models.
///
/// # Invariants
/// - Each service is loaded at most once per registry.
/// - Cached models are never mutated.
pub struct ShapeRegistry {
    /// Source of service models.
    loader: Box<dyn ModelLoader + Send + Sync>,
    /// Loaded models keyed by service name.
    models: RwLock<BTreeMap<ServiceName, Arc<ServiceModel>>>,
    /// Serializes first-load population.
    load_guard: Mutex<()>,
}

impl ShapeRegistry {
    /// Creates a registry backed by the given loader.
    #[must_use]
    pub fn new(loader: impl ModelLoader + Send + Sync + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            models: RwLock::new(BTreeMap::new()),
            load_guard: Mutex::new(()),
        }
    }

    /// Returns the model for a service, loading it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`LobotomyError::UnknownService`] when no model exists and
    /// [`LobotomyError::Model`] when the model is malformed.
    pub fn service(&self, service: &ServiceName) -> Result<Arc<ServiceModel>, LobotomyError> {
        if let Some(model) = self.cached(service)? {
            return Ok(model);
        }
        let _guard = self
            .load_guard
            .lock()
            .map_err(|_| LobotomyError::State("shape registry load guard poisoned".to_string()))?;
        if let Some(model) = self.cached(service)? {
            return Ok(model);
        }
        let Some(model) = self.loader.load(service)? else {
            return Err(LobotomyError::UnknownService(service.clone()));
        };
        model.validate()?;
        let model = Arc::new(model);
        self.models
            .write()
            .map_err(|_| LobotomyError::State("shape registry lock poisoned".to_string()))?
            .insert(service.clone(), Arc::clone(&model));
        debug!(
            service = %service,
            api_version = %model.api_version,
            operations = model.operations.len(),
            shapes = model.shapes.len(),
            "loaded service model"
        );
        Ok(model)
    }

    /// Resolves a client method to its operation.
    ///
    /// # Errors
    ///
    /// Returns [`LobotomyError::UnknownService`] or
    /// [`LobotomyError::UnknownOperation`] when resolution fails.
    pub fn resolve_operation(
        &self,
        service: &ServiceName,
        method: &str,
    ) -> Result<ResolvedOperation, LobotomyError> {
        let model = self.service(service)?;
        let Some(operation) = model.operation(method).cloned() else {
            return Err(LobotomyError::UnknownOperation {
                service: service.clone(),
                method: method.to_string(),
            });
        };
        Ok(ResolvedOperation {
            model,
            operation,
        })
    }

    /// Resolves a shape by name.
    ///
    /// # Errors
    ///
    /// Returns [`LobotomyError::UnknownService`] when the service has no model
    /// and [`LobotomyError::Model`] when the shape does not exist.
    pub fn resolve_shape(
        &self,
        service: &ServiceName,
        shape: &ShapeName,
    ) -> Result<Shape, LobotomyError> {
        let model = self.service(service)?;
        model.shape(shape).cloned().ok_or_else(|| {
            LobotomyError::Model(ModelLoadError::Invalid(format!(
                "{service}: unknown shape {shape}"
            )))
        })
    }

    /// Lists the services the underlying loader can provide.
    #[must_use]
    pub fn services(&self) -> Vec<ServiceName> {
        self.loader.services()
    }

    /// Returns true when the service model is already cached.
    #[must_use]
    pub fn is_loaded(&self, service: &ServiceName) -> bool {
        self.models.read().is_ok_and(|models| models.contains_key(service))
    }

    /// Returns the cached model, if any.
    fn cached(&self, service: &ServiceName) -> Result<Option<Arc<ServiceModel>>, LobotomyError> {
        let models = self
            .models
            .read()
            .map_err(|_| LobotomyError::State("shape registry lock poisoned".to_string()))?;
        Ok(models.get(service).cloned())
    }
}

impl fmt::Debug for ShapeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loaded: Vec<String> = self
            .models
            .read()
            .map(|models| models.keys().map(ToString::to_string).collect())
            .unwrap_or_default();
        f.debug_struct("ShapeRegistry").field("loaded", &loaded).finish_non_exhaustive()
    }
}
