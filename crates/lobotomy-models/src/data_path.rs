// crates/lobotomy-models/src/data_path.rs
// ============================================================================
// Module: Model Data Path
// Description: Default loader chain built from configured data directories.
// Purpose: Mock any service a botocore data directory describes.
// Dependencies: lobotomy-core, tracing
// ============================================================================

//! ## Overview
//! The bundled models cover the operations tests mock most often. Pointing
//! [`DATA_PATH_ENV`] at one or more botocore `data` directories (joined the
//! way `PATH` is) makes every service and operation they define available.
//! Directories shadow the bundled set in the order given, and each of them
//! still receives the bundled augmentations for services that have them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::path::PathBuf;

use tracing::debug;

use crate::bundled::BundledModelLoader;
use crate::chain::ModelLoaderChain;
use crate::directory::DirectoryModelLoader;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable listing botocore-style data directories.
pub const DATA_PATH_ENV: &str = "LOBOTOMY_DATA_PATH";

// ============================================================================
// SECTION: Loaders
// ============================================================================

/// Returns the default loader: directories from [`DATA_PATH_ENV`] followed
/// by the bundled models.
#[must_use]
pub fn default_model_loader() -> ModelLoaderChain {
    let paths: Vec<PathBuf> = env::var_os(DATA_PATH_ENV)
        .map(|value| env::split_paths(&value).collect())
        .unwrap_or_default();
    model_loader_with_data_paths(paths)
}

/// Returns a chain of directory loaders over `paths`, highest priority
/// first, backed by the bundled models. Empty entries are skipped.
#[must_use]
pub fn model_loader_with_data_paths<I, P>(paths: I) -> ModelLoaderChain
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    let mut chain = ModelLoaderChain::new();
    for path in paths {
        let path: PathBuf = path.into();
        if path.as_os_str().is_empty() {
            continue;
        }
        debug!(path = %path.display(), "adding model data directory");
        chain.push(DirectoryModelLoader::new(path).with_bundled_augmentations());
    }
    chain.with(BundledModelLoader::new())
}
