// crates/lobotomy/src/lobotomy.rs
// ============================================================================
// Module: Lobotomy Registry Instance
// Description: Per-test response registration, call history, and overrides.
// Purpose: Own the mutable mock state and run calls through the engine.
// Dependencies: lobotomy-config, lobotomy-core, lobotomy-models, tracing
// ============================================================================

//! ## Overview
//! A [`Lobotomy`] is the state one test works against: configured responses,
//! the recorded call history, and client overrides. It hands out
//! [`Session`]s, whose clients route every call back through
//! [`Lobotomy::invoke`].
//!
//! The shape registry is shared process-wide by default; response queues and
//! history belong to one instance and are never shared between instances.
//! Cloning a [`Lobotomy`] yields a handle to the same state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::OnceLock;
use std::sync::RwLock;
use std::sync::RwLockWriteGuard;

use lobotomy_config::ConfigError;
use lobotomy_config::ConfigPrefix;
use lobotomy_config::LobotomyConfig;
use lobotomy_config::SessionOptions;
use lobotomy_core::CallSequencer;
use lobotomy_core::ClientError;
use lobotomy_core::ClientOverride;
use lobotomy_core::LobotomyError;
use lobotomy_core::MethodName;
use lobotomy_core::ModelLoader;
use lobotomy_core::RecordedCall;
use lobotomy_core::Remaining;
use lobotomy_core::RequestArgs;
use lobotomy_core::ResponseEntry;
use lobotomy_core::ServiceName;
use lobotomy_core::Shape;
use lobotomy_core::ShapeRegistry;
use lobotomy_core::TypedValue;
use lobotomy_core::ValueCaster;
use lobotomy_core::maybe_raise;
use lobotomy_core::placeholder_response;
use lobotomy_core::validate_request;
use lobotomy_models::default_model_loader;
use lobotomy_models::model_loader_with_data_paths;
use serde_json::Value;
use tracing::debug;

use crate::session::Session;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Shared override object for one service.
pub type SharedOverride = Arc<dyn ClientOverride + Send + Sync>;

/// Returns the process-wide registry over the bundled service models,
/// shadowed by any data directories named in `LOBOTOMY_DATA_PATH`.
#[must_use]
pub fn default_registry() -> Arc<ShapeRegistry> {
    static REGISTRY: OnceLock<Arc<ShapeRegistry>> = OnceLock::new();
    Arc::clone(REGISTRY.get_or_init(|| Arc::new(ShapeRegistry::new(default_model_loader()))))
}

/// State shared by every handle of one instance.
struct Shared {
    /// Service model registry.
    registry: Arc<ShapeRegistry>,
    /// Response queues and call history.
    state: Mutex<CallSequencer>,
    /// Client overrides by service.
    overrides: RwLock<BTreeMap<ServiceName, SharedOverride>>,
    /// Configured session settings; responses are already registered.
    sessions: Mutex<LobotomyConfig>,
}

// ============================================================================
// SECTION: Lobotomy
// ============================================================================

/// Mock state for one test: responses, history, and overrides.
#[derive(Clone)]
pub struct Lobotomy {
    /// Shared state.
    inner: Arc<Shared>,
}

impl Default for Lobotomy {
    fn default() -> Self {
        Self::new()
    }
}

impl Lobotomy {
    /// Creates an empty instance over the bundled service models.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Starts a builder.
    #[must_use]
    pub fn builder() -> LobotomyBuilder {
        LobotomyBuilder::default()
    }

    /// Creates an instance with the configured responses and sessions.
    #[must_use]
    pub fn from_config(config: LobotomyConfig) -> Self {
        Self::builder().config(config).build()
    }

    /// Loads configuration from a file and creates an instance from it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be loaded.
    pub fn load(path: &Path, prefix: &ConfigPrefix) -> Result<Self, ConfigError> {
        LobotomyConfig::load(path, prefix).map(Self::from_config)
    }

    /// Returns the shape registry calls resolve against.
    #[must_use]
    pub fn registry(&self) -> &ShapeRegistry {
        &self.inner.registry
    }

    // ------------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------------

    /// Registers a response for a client method.
    ///
    /// Without a response, a placeholder derived from the output shape is
    /// registered. A first registration repeats for every call; further
    /// registrations turn the method into a one-shot queue. Operations whose
    /// output is itself a list always start as a queue.
    ///
    /// # Errors
    ///
    /// Returns [`LobotomyError`] when the service or operation is unknown.
    pub fn add_call(
        &self,
        service: impl Into<ServiceName>,
        method: &str,
        response: Option<Value>,
    ) -> Result<(), LobotomyError> {
        let service = service.into();
        let resolved = self.inner.registry.resolve_operation(&service, method)?;
        let response = response.unwrap_or_else(|| {
            placeholder_response(&resolved.model, resolved.operation.output.as_ref())
        });
        let list_output = matches!(resolved.output_shape(), Some(Shape::List { .. }));
        let mut state = self.state()?;
        if list_output && state.remaining(&service, method).is_none() {
            state.enqueue_sequence(&service, method, [ResponseEntry::Fixed(response)]);
        } else {
            state.enqueue(&service, method, ResponseEntry::Fixed(response));
        }
        Ok(())
    }

    /// Registers a response computed from each call's arguments.
    ///
    /// # Errors
    ///
    /// Returns [`LobotomyError`] when the service or operation is unknown.
    pub fn add_computed_call<F>(
        &self,
        service: impl Into<ServiceName>,
        method: &str,
        func: F,
    ) -> Result<(), LobotomyError>
    where
        F: Fn(&RequestArgs) -> Result<Value, ClientError> + Send + Sync + 'static,
    {
        let service = service.into();
        self.inner.registry.resolve_operation(&service, method)?;
        self.state()?.enqueue(&service, method, ResponseEntry::computed(func));
        Ok(())
    }

    /// Registers responses consumed one per call, in order.
    ///
    /// # Errors
    ///
    /// Returns [`LobotomyError`] when the service or operation is unknown.
    pub fn add_responses<I>(
        &self,
        service: impl Into<ServiceName>,
        method: &str,
        responses: I,
    ) -> Result<(), LobotomyError>
    where
        I: IntoIterator<Item = Value>,
    {
        let service = service.into();
        self.inner.registry.resolve_operation(&service, method)?;
        self.state()?.enqueue_sequence(
            &service,
            method,
            responses.into_iter().map(ResponseEntry::Fixed),
        );
        Ok(())
    }

    /// Returns how many responses remain for a method, `None` if unregistered.
    ///
    /// # Errors
    ///
    /// Returns [`LobotomyError::State`] when the state lock is poisoned.
    pub fn remaining_responses(
        &self,
        service: impl Into<ServiceName>,
        method: &str,
    ) -> Result<Option<Remaining>, LobotomyError> {
        Ok(self.state()?.remaining(&service.into(), method))
    }

    // ------------------------------------------------------------------------
    // Overrides
    // ------------------------------------------------------------------------

    /// Routes every call for a service to the override instead of the engine.
    ///
    /// # Errors
    ///
    /// Returns [`LobotomyError::State`] when the override lock is poisoned.
    pub fn add_client_override(
        &self,
        service: impl Into<ServiceName>,
        client: impl ClientOverride + Send + Sync + 'static,
    ) -> Result<(), LobotomyError> {
        self.overrides_mut()?.insert(service.into(), Arc::new(client));
        Ok(())
    }

    /// Removes a service override; returns true when one existed.
    ///
    /// # Errors
    ///
    /// Returns [`LobotomyError::State`] when the override lock is poisoned.
    pub fn remove_client_override(
        &self,
        service: impl Into<ServiceName>,
    ) -> Result<bool, LobotomyError> {
        Ok(self.overrides_mut()?.remove(&service.into()).is_some())
    }

    /// Returns the override for a service, if any.
    ///
    /// # Errors
    ///
    /// Returns [`LobotomyError::State`] when the override lock is poisoned.
    pub fn get_client_override(
        &self,
        service: impl Into<ServiceName>,
    ) -> Result<Option<SharedOverride>, LobotomyError> {
        let overrides = self
            .inner
            .overrides
            .read()
            .map_err(|_| LobotomyError::State("override lock poisoned".to_string()))?;
        Ok(overrides.get(&service.into()).cloned())
    }

    // ------------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------------

    /// Returns every recorded call in invocation order.
    ///
    /// # Errors
    ///
    /// Returns [`LobotomyError::State`] when the state lock is poisoned.
    pub fn service_calls(&self) -> Result<Vec<RecordedCall>, LobotomyError> {
        Ok(self.state()?.history().to_vec())
    }

    /// Returns the recorded calls of one method in invocation order.
    ///
    /// # Errors
    ///
    /// Returns [`LobotomyError::State`] when the state lock is poisoned.
    pub fn get_service_calls(
        &self,
        service: impl Into<ServiceName>,
        method: &str,
    ) -> Result<Vec<RecordedCall>, LobotomyError> {
        let state = self.state()?;
        Ok(state.calls_for(&service.into(), method).into_iter().cloned().collect())
    }

    /// Returns one recorded call of a method; `-1` is the most recent.
    ///
    /// # Errors
    ///
    /// Returns [`LobotomyError::NoSuchCall`] when no call exists at the index.
    pub fn get_service_call(
        &self,
        service: impl Into<ServiceName>,
        method: &str,
        index: isize,
    ) -> Result<RecordedCall, LobotomyError> {
        self.state()?.call_at(&service.into(), method, index).cloned()
    }

    /// Returns the most recent recorded call of a method.
    ///
    /// # Errors
    ///
    /// Returns [`LobotomyError::NoSuchCall`] when the method was never called.
    pub fn last_service_call(
        &self,
        service: impl Into<ServiceName>,
        method: &str,
    ) -> Result<RecordedCall, LobotomyError> {
        self.get_service_call(service, method, -1)
    }

    // ------------------------------------------------------------------------
    // Sessions
    // ------------------------------------------------------------------------

    /// Creates a session with the next configured session settings.
    ///
    /// # Errors
    ///
    /// Returns [`LobotomyError::State`] when the session lock is poisoned.
    pub fn session(&self) -> Result<Session, LobotomyError> {
        self.session_with(&SessionOptions::default())
    }

    /// Creates a session whose construction options override the configured
    /// settings.
    ///
    /// # Errors
    ///
    /// Returns [`LobotomyError::State`] when the session lock is poisoned.
    pub fn session_with(&self, options: &SessionOptions) -> Result<Session, LobotomyError> {
        let config = self
            .inner
            .sessions
            .lock()
            .map_err(|_| LobotomyError::State("session lock poisoned".to_string()))?
            .next_session();
        Ok(Session::new(self.clone(), config.with_options(options)))
    }

    // ------------------------------------------------------------------------
    // Invocation
    // ------------------------------------------------------------------------

    /// Runs one client call through the engine.
    ///
    /// The call is recorded before validation. A call that fails validation
    /// consumes no response.
    ///
    /// # Errors
    ///
    /// Returns [`LobotomyError`] for model, contract, exhaustion, cast, and
    /// configured provider errors.
    pub fn invoke(
        &self,
        service: &ServiceName,
        method: &str,
        args: Value,
    ) -> Result<TypedValue, LobotomyError> {
        let resolved = self.inner.registry.resolve_operation(service, method)?;
        let request = RequestArgs::from_value(args)?;
        let operation = resolved.operation.name.as_str();
        debug!(service = %service, operation, args = request.len(), "invoking mocked operation");

        let entry = {
            let mut state = self.state()?;
            state.record(RecordedCall {
                service: service.clone(),
                method: MethodName::new(method),
                request: request.clone(),
            });
            validate_request(&resolved.model, &resolved.operation, &request)?;
            state.next_response(service, method)?
        };

        let exceptions = resolved.exceptions();
        let response = entry
            .resolve(&request)
            .map_err(|err| err.bind(service, operation, &exceptions))?;
        maybe_raise(service, operation, &exceptions, &response)?;
        Ok(ValueCaster::new(&resolved.model).cast_output(&response, &resolved.operation)?)
    }

    /// Locks the response and history state.
    fn state(&self) -> Result<MutexGuard<'_, CallSequencer>, LobotomyError> {
        self.inner.state.lock().map_err(|_| LobotomyError::State("state lock poisoned".to_string()))
    }

    /// Locks the overrides for writing.
    fn overrides_mut(
        &self,
    ) -> Result<RwLockWriteGuard<'_, BTreeMap<ServiceName, SharedOverride>>, LobotomyError> {
        self.inner
            .overrides
            .write()
            .map_err(|_| LobotomyError::State("override lock poisoned".to_string()))
    }
}

impl fmt::Debug for Lobotomy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lobotomy").field("registry", &self.inner.registry).finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Builder for [`Lobotomy`] instances.
#[derive(Default)]
pub struct LobotomyBuilder {
    /// Registry to resolve against; the process-wide one when unset.
    registry: Option<Arc<ShapeRegistry>>,
    /// Configuration to register.
    config: LobotomyConfig,
    /// Overrides to install.
    overrides: BTreeMap<ServiceName, SharedOverride>,
}

impl LobotomyBuilder {
    /// Uses a dedicated registry.
    #[must_use]
    pub fn registry(mut self, registry: Arc<ShapeRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Uses a dedicated registry over the given loader.
    #[must_use]
    pub fn loader(self, loader: impl ModelLoader + Send + Sync + 'static) -> Self {
        self.registry(Arc::new(ShapeRegistry::new(loader)))
    }

    /// Uses a dedicated registry reading botocore-style data directories,
    /// highest priority first, ahead of the bundled models.
    #[must_use]
    pub fn data_paths<I, P>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.loader(model_loader_with_data_paths(paths))
    }

    /// Registers the configured responses and sessions.
    #[must_use]
    pub fn config(mut self, config: LobotomyConfig) -> Self {
        self.config = config;
        self
    }

    /// Installs a client override.
    #[must_use]
    pub fn client_override(
        mut self,
        service: impl Into<ServiceName>,
        client: impl ClientOverride + Send + Sync + 'static,
    ) -> Self {
        self.overrides.insert(service.into(), Arc::new(client));
        self
    }

    /// Builds the instance.
    ///
    /// Configured arrays become one-shot queues; other values repeat. Null
    /// responses are skipped, so calling them reports that no response is
    /// configured.
    #[must_use]
    pub fn build(self) -> Lobotomy {
        let mut sequencer = CallSequencer::new();
        for (service, method, response) in self.config.responses() {
            match response {
                Value::Null => {}
                Value::Array(items) => sequencer.enqueue_sequence(
                    service,
                    method,
                    items.iter().cloned().map(ResponseEntry::Fixed),
                ),
                other => sequencer.enqueue(service, method, ResponseEntry::Fixed(other.clone())),
            }
        }
        let sessions = LobotomyConfig {
            clients: BTreeMap::new(),
            ..self.config
        };
        Lobotomy {
            inner: Arc::new(Shared {
                registry: self.registry.unwrap_or_else(default_registry),
                state: Mutex::new(sequencer),
                overrides: RwLock::new(self.overrides),
                sessions: Mutex::new(sessions),
            }),
        }
    }
}

impl fmt::Debug for LobotomyBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LobotomyBuilder")
            .field("config", &self.config)
            .field("overrides", &self.overrides.len())
            .finish_non_exhaustive()
    }
}
