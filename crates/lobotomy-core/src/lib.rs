// crates/lobotomy-core/src/lib.rs
// ============================================================================
// Module: Lobotomy Core Library
// Description: Public API surface for the Lobotomy response engine.
// Purpose: Expose core types, interfaces, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Lobotomy core is the shape-driven engine behind the mock SDK clients. It
//! resolves service models, validates request arguments, sequences configured
//! responses, synthesizes provider errors, and casts loosely typed
//! configuration data into the typed values a real client would return.
//! It never performs network calls; service models are supplied through the
//! [`ModelLoader`] interface.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::ClientOverride;
pub use interfaces::ModelLoadError;
pub use interfaces::ModelLoader;
pub use runtime::CallSequencer;
pub use runtime::InMemoryModelLoader;
pub use runtime::Remaining;
pub use runtime::ResolvedOperation;
pub use runtime::ShapeRegistry;
pub use runtime::ValueCaster;
pub use runtime::maybe_raise;
pub use runtime::parse_timestamp;
pub use runtime::placeholder_response;
pub use runtime::validate_request;
