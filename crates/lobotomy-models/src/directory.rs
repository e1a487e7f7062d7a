// crates/lobotomy-models/src/directory.rs
// ============================================================================
// Module: Directory Model Loader
// Description: Service models read from a botocore-style data directory.
// Purpose: Mock services whose definitions are not bundled.
// Dependencies: flate2, lobotomy-core, tracing
// ============================================================================

//! ## Overview
//! The directory layout mirrors botocore's data folder:
//! `<root>/<service>/<version>/service-2.json`, where version directories are
//! dated (`2006-03-01`) and the newest one wins. Recent botocore releases ship
//! the document gzipped as `service-2.json.gz`; the plain file is preferred
//! when both exist. An optional `<root>/<service>/augmentations.yaml` is
//! merged over the document. A loader pointed at a stock botocore data
//! directory can fall back to the augmentations bundled with this crate.
//!
//! Security posture: service names come from test code and are used as path
//! components, so names containing separators or starting with a dot are
//! treated as unknown. File reads are bounded by [`MAX_MODEL_FILE_SIZE`],
//! measured after decompression for gzipped documents.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use flate2::read::GzDecoder;
use lobotomy_core::ModelLoadError;
use lobotomy_core::ModelLoader;
use lobotomy_core::ServiceModel;
use lobotomy_core::ServiceName;
use tracing::debug;

use crate::botocore::load_service_model;
use crate::bundled::bundled_augmentations;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum size of a model or augmentation file in bytes.
pub const MAX_MODEL_FILE_SIZE: usize = 16 * 1024 * 1024;
/// Service document file name inside a version directory.
const SERVICE_FILE: &str = "service-2.json";
/// Gzipped service document file name inside a version directory.
const SERVICE_FILE_GZ: &str = "service-2.json.gz";
/// Augmentation file name inside a service directory.
const AUGMENTATIONS_FILE: &str = "augmentations.yaml";
/// Prefix shared by dated version directories.
const VERSION_PREFIX: &str = "20";

// ============================================================================
// SECTION: Loader
// ============================================================================

/// Loader reading service models from a directory tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryModelLoader {
    /// Data directory root.
    root: PathBuf,
    /// Per-file size limit in bytes.
    max_file_bytes: usize,
    /// Whether bundled augmentations apply when none exist on disk.
    bundled_augmentations: bool,
}

impl DirectoryModelLoader {
    /// Creates a loader rooted at the given directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_file_bytes: MAX_MODEL_FILE_SIZE,
            bundled_augmentations: false,
        }
    }

    /// Merges the bundled augmentations of a service (for example the S3
    /// transfer helpers) when its directory has no `augmentations.yaml`.
    #[must_use]
    pub const fn with_bundled_augmentations(mut self) -> Self {
        self.bundled_augmentations = true;
        self
    }

    /// Overrides the per-file size limit.
    #[must_use]
    pub const fn with_max_file_bytes(mut self, max_file_bytes: usize) -> Self {
        self.max_file_bytes = max_file_bytes;
        self
    }

    /// Returns the data directory root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the service directory, or `None` for unsafe names.
    fn service_dir(&self, service: &ServiceName) -> Option<PathBuf> {
        let name = service.as_str();
        let unsafe_name =
            name.is_empty() || name.starts_with('.') || name.contains(['/', '\\', '\0']);
        (!unsafe_name).then(|| self.root.join(name))
    }

    /// Reads a UTF-8 file within the size limit.
    fn read_limited(&self, path: &Path) -> Result<String, ModelLoadError> {
        let too_large = || {
            ModelLoadError::Invalid(format!(
                "{} exceeds {} bytes",
                path.display(),
                self.max_file_bytes
            ))
        };
        let metadata = fs::metadata(path).map_err(|err| io_error(path, &err))?;
        if usize::try_from(metadata.len()).unwrap_or(usize::MAX) > self.max_file_bytes {
            return Err(too_large());
        }
        let bytes = fs::read(path).map_err(|err| io_error(path, &err))?;
        if bytes.len() > self.max_file_bytes {
            return Err(too_large());
        }
        utf8(path, bytes)
    }

    /// Reads and decompresses a gzipped UTF-8 file within the size limit.
    fn read_gzip_limited(&self, path: &Path) -> Result<String, ModelLoadError> {
        let file = File::open(path).map_err(|err| io_error(path, &err))?;
        let limit = u64::try_from(self.max_file_bytes).unwrap_or(u64::MAX);
        let mut bytes = Vec::new();
        GzDecoder::new(file)
            .take(limit.saturating_add(1))
            .read_to_end(&mut bytes)
            .map_err(|err| io_error(path, &err))?;
        if bytes.len() > self.max_file_bytes {
            return Err(ModelLoadError::Invalid(format!(
                "{} exceeds {} bytes once decompressed",
                path.display(),
                self.max_file_bytes
            )));
        }
        utf8(path, bytes)
    }

    /// Reads the service document of a version directory.
    fn read_document(&self, version_dir: &Path) -> Result<String, ModelLoadError> {
        let plain = version_dir.join(SERVICE_FILE);
        let gzipped = version_dir.join(SERVICE_FILE_GZ);
        if !plain.is_file() && gzipped.is_file() {
            return self.read_gzip_limited(&gzipped);
        }
        self.read_limited(&plain)
    }

    /// Reads the augmentations for a service, on disk or bundled.
    fn read_augmentations(
        &self,
        service: &ServiceName,
        service_dir: &Path,
    ) -> Result<Option<String>, ModelLoadError> {
        let path = service_dir.join(AUGMENTATIONS_FILE);
        if path.is_file() {
            return self.read_limited(&path).map(Some);
        }
        if self.bundled_augmentations {
            return Ok(bundled_augmentations(service).map(str::to_string));
        }
        Ok(None)
    }
}

impl ModelLoader for DirectoryModelLoader {
    fn load(&self, service: &ServiceName) -> Result<Option<ServiceModel>, ModelLoadError> {
        let Some(service_dir) = self.service_dir(service) else {
            return Ok(None);
        };
        if !service_dir.is_dir() {
            return Ok(None);
        }
        let Some(version) = newest_version(&service_dir)? else {
            return Err(ModelLoadError::Invalid(format!(
                "{} has no dated version directory",
                service_dir.display()
            )));
        };
        let document = self.read_document(&service_dir.join(&version))?;
        let augmentations = self.read_augmentations(service, &service_dir)?;
        debug!(
            service = %service,
            version = %version,
            augmented = augmentations.is_some(),
            "reading service model from directory"
        );
        load_service_model(service, &document, augmentations.as_deref()).map(Some)
    }

    fn services(&self) -> Vec<ServiceName> {
        let Ok(entries) = fs::read_dir(&self.root) else {
            return Vec::new();
        };
        let mut services: Vec<ServiceName> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_dir())
            .filter(|entry| newest_version(&entry.path()).is_ok_and(|version| version.is_some()))
            .filter_map(|entry| entry.file_name().to_str().map(ServiceName::new))
            .collect();
        services.sort();
        services
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the newest dated version directory name.
fn newest_version(service_dir: &Path) -> Result<Option<String>, ModelLoadError> {
    let entries = fs::read_dir(service_dir).map_err(|err| io_error(service_dir, &err))?;
    let mut newest: Option<String> = None;
    for entry in entries {
        let entry = entry.map_err(|err| io_error(service_dir, &err))?;
        if !entry.path().is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if name.starts_with(VERSION_PREFIX) && newest.as_ref().is_none_or(|current| &name > current)
        {
            newest = Some(name);
        }
    }
    Ok(newest)
}

/// Decodes file bytes as UTF-8.
fn utf8(path: &Path, bytes: Vec<u8>) -> Result<String, ModelLoadError> {
    String::from_utf8(bytes)
        .map_err(|_| ModelLoadError::Parse(format!("{} must be utf-8", path.display())))
}

/// Wraps an I/O failure with its path.
fn io_error(path: &Path, err: &std::io::Error) -> ModelLoadError {
    ModelLoadError::Io(format!("{}: {err}", path.display()))
}
