// crates/lobotomy-models/src/bundled.rs
// ============================================================================
// Module: Bundled Models
// Description: Service models embedded into the binary at compile time.
// Purpose: Provide commonly mocked services without any files on disk.
// Dependencies: lobotomy-core, tracing
// ============================================================================

//! ## Overview
//! The bundled loader carries trimmed botocore documents for the services
//! tests most often mock. Each document is parsed on demand; the shape
//! registry caches the result, so parsing happens at most once per registry.

// ============================================================================
// SECTION: Imports
// ============================================================================

use lobotomy_core::ModelLoadError;
use lobotomy_core::ModelLoader;
use lobotomy_core::ServiceModel;
use lobotomy_core::ServiceName;
use tracing::trace;

use crate::botocore::load_service_model;

// ============================================================================
// SECTION: Embedded Documents
// ============================================================================

/// One embedded service document.
#[derive(Debug, Clone, Copy)]
struct BundledModel {
    /// Service name.
    service: &'static str,
    /// Model version directory.
    version: &'static str,
    /// `service-2.json` text.
    document: &'static str,
    /// Optional augmentations YAML.
    augmentations: Option<&'static str>,
}

/// Every embedded service, sorted by name.
const BUNDLED: &[BundledModel] = &[
    BundledModel {
        service: "dynamodb",
        version: "2012-08-10",
        document: include_str!("../models/dynamodb/2012-08-10/service-2.json"),
        augmentations: None,
    },
    BundledModel {
        service: "ecr",
        version: "2015-09-21",
        document: include_str!("../models/ecr/2015-09-21/service-2.json"),
        augmentations: None,
    },
    BundledModel {
        service: "eks",
        version: "2017-11-01",
        document: include_str!("../models/eks/2017-11-01/service-2.json"),
        augmentations: None,
    },
    BundledModel {
        service: "iam",
        version: "2010-05-08",
        document: include_str!("../models/iam/2010-05-08/service-2.json"),
        augmentations: None,
    },
    BundledModel {
        service: "lambda",
        version: "2015-03-31",
        document: include_str!("../models/lambda/2015-03-31/service-2.json"),
        augmentations: None,
    },
    BundledModel {
        service: "s3",
        version: "2006-03-01",
        document: include_str!("../models/s3/2006-03-01/service-2.json"),
        augmentations: Some(include_str!("../models/s3/augmentations.yaml")),
    },
    BundledModel {
        service: "sqs",
        version: "2012-11-05",
        document: include_str!("../models/sqs/2012-11-05/service-2.json"),
        augmentations: None,
    },
    BundledModel {
        service: "sts",
        version: "2011-06-15",
        document: include_str!("../models/sts/2011-06-15/service-2.json"),
        augmentations: None,
    },
];

/// Returns the bundled augmentations YAML of a service, if any.
pub(crate) fn bundled_augmentations(service: &ServiceName) -> Option<&'static str> {
    BUNDLED
        .iter()
        .find(|bundled| bundled.service == service.as_str())
        .and_then(|bundled| bundled.augmentations)
}

// ============================================================================
// SECTION: Loader
// ============================================================================

/// Loader over the embedded service models.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledModelLoader;

impl BundledModelLoader {
    /// Creates the loader.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ModelLoader for BundledModelLoader {
    fn load(&self, service: &ServiceName) -> Result<Option<ServiceModel>, ModelLoadError> {
        let Some(bundled) = BUNDLED.iter().find(|bundled| bundled.service == service.as_str())
        else {
            return Ok(None);
        };
        trace!(service = bundled.service, version = bundled.version, "parsing bundled model");
        load_service_model(service, bundled.document, bundled.augmentations).map(Some)
    }

    fn services(&self) -> Vec<ServiceName> {
        BUNDLED.iter().map(|bundled| ServiceName::new(bundled.service)).collect()
    }
}
