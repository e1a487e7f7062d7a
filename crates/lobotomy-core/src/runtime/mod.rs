// crates/lobotomy-core/src/runtime/mod.rs
// ============================================================================
// Module: Lobotomy Runtime
// Description: Registry, validation, sequencing, error synthesis, and casting.
// Purpose: Implement the call pipeline stages used by the client facade.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Each submodule implements one stage of a mocked call: the shape registry
//! resolves operations, the validator checks required arguments, the
//! sequencer hands out queued responses and records calls, the provider error
//! synthesizer turns `Error` mappings into [`crate::ClientError`], and the
//! caster produces the typed result.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod caster;
pub mod memory;
pub mod placeholder;
pub mod provider_errors;
pub mod registry;
pub mod sequencer;
pub mod timestamp;
pub mod validator;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use caster::ValueCaster;
pub use memory::InMemoryModelLoader;
pub use placeholder::placeholder_response;
pub use provider_errors::maybe_raise;
pub use registry::ResolvedOperation;
pub use registry::ShapeRegistry;
pub use sequencer::CallSequencer;
pub use sequencer::Remaining;
pub use timestamp::parse_timestamp;
pub use validator::validate_request;
