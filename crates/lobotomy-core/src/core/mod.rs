// crates/lobotomy-core/src/core/mod.rs
// ============================================================================
// Module: Lobotomy Core Types
// Description: Service models, typed values, calls, responses, and errors.
// Purpose: Provide the shared data model for the response engine.
// Dependencies: bytes, serde, serde_json, thiserror, time
// ============================================================================

//! ## Overview
//! Core types describe the abstract service model (operations and shapes),
//! the typed values returned to callers, the configured responses queued per
//! call key, and the recorded call history. They carry no runtime behavior
//! beyond simple accessors.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod call;
pub mod error;
pub mod identifiers;
pub mod response;
pub mod shape;
pub mod value;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use call::RecordedCall;
pub use call::RequestArgs;
pub use error::CastError;
pub use error::ClientError;
pub use error::LobotomyError;
pub use identifiers::MethodName;
pub use identifiers::ServiceName;
pub use identifiers::ShapeName;
pub use identifiers::operation_key;
pub use identifiers::snake_case;
pub use response::CallQueue;
pub use response::ResponseEntry;
pub use response::ResponseFn;
pub use shape::OperationModel;
pub use shape::ServiceModel;
pub use shape::Shape;
pub use shape::StructureMember;
pub use shape::StructureShape;
pub use value::EventStream;
pub use value::StreamingBody;
pub use value::TypedValue;
