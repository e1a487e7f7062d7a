// crates/lobotomy-models/src/lib.rs
// ============================================================================
// Module: Lobotomy Models Library
// Description: Service model loaders for the Lobotomy engine.
// Purpose: Turn botocore-format service definitions into engine models.
// Dependencies: flate2, indexmap, lobotomy-core, serde, serde_json, serde_yaml
// ============================================================================

//! ## Overview
//! This crate implements [`lobotomy_core::ModelLoader`] for the sources a
//! mocked client can draw service definitions from: models bundled into the
//! binary, a directory tree laid out like botocore's data directory, and a
//! chain that consults several loaders in order. [`default_model_loader`]
//! chains the directories named by [`DATA_PATH_ENV`] ahead of the bundled
//! models. All of them share the
//! botocore `service-2.json` parser and the optional YAML augmentations that
//! add client-side convenience operations.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod botocore;
pub mod bundled;
pub mod chain;
pub mod data_path;
pub mod directory;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use botocore::merge_augmentations;
pub use botocore::parse_service_model;
pub use bundled::BundledModelLoader;
pub use chain::ModelLoaderChain;
pub use data_path::DATA_PATH_ENV;
pub use data_path::default_model_loader;
pub use data_path::model_loader_with_data_paths;
pub use directory::DirectoryModelLoader;
pub use directory::MAX_MODEL_FILE_SIZE;

#[cfg(test)]
mod tests;
