// crates/lobotomy-core/tests/common/mod.rs
// ============================================================================
// Module: Core Test Fixtures
// Description: Hand-built service models shared by integration tests.
// Purpose: Keep model construction out of individual test files.
// ============================================================================

//! Shared fixtures for lobotomy-core integration tests.

#![allow(dead_code, reason = "Each test binary uses a different subset of fixtures.")]

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use lobotomy_core::InMemoryModelLoader;
use lobotomy_core::ModelLoadError;
use lobotomy_core::ModelLoader;
use lobotomy_core::OperationModel;
use lobotomy_core::ServiceModel;
use lobotomy_core::ServiceName;
use lobotomy_core::Shape;
use lobotomy_core::ShapeName;
use lobotomy_core::StructureShape;

/// Small S3-like model with list, get, and error shapes.
pub fn s3_model() -> ServiceModel {
    ServiceModel::new("s3", "2006-03-01")
        .with_shape("String", Shape::String {
            streaming: false,
        })
        .with_shape("Size", Shape::Integer)
        .with_shape("Body", Shape::Blob {
            streaming: true,
        })
        .with_shape("Date", Shape::Timestamp)
        .with_shape(
            "Object",
            Shape::Structure(
                StructureShape::new()
                    .with_member("Key", "String")
                    .with_member("Size", "Size")
                    .with_member("LastModified", "Date"),
            ),
        )
        .with_shape("ObjectList", Shape::List {
            member: ShapeName::new("Object"),
        })
        .with_shape(
            "ListObjectsRequest",
            Shape::Structure(
                StructureShape::new()
                    .with_required("Bucket", "String")
                    .with_member("Prefix", "String"),
            ),
        )
        .with_shape(
            "ListObjectsOutput",
            Shape::Structure(StructureShape::new().with_member("Contents", "ObjectList")),
        )
        .with_shape(
            "GetObjectRequest",
            Shape::Structure(
                StructureShape::new()
                    .with_required("Bucket", "String")
                    .with_required("Key", "String"),
            ),
        )
        .with_shape(
            "GetObjectOutput",
            Shape::Structure(
                StructureShape::new()
                    .with_member("Body", "Body")
                    .with_member("ContentLength", "Size"),
            ),
        )
        .with_shape("NoSuchKey", Shape::Structure(StructureShape::new()))
        .with_shape("NoSuchBucket", Shape::Structure(StructureShape::new()))
        .with_operation(
            OperationModel::new("ListObjects")
                .with_input("ListObjectsRequest")
                .with_output("ListObjectsOutput")
                .with_error("NoSuchBucket"),
        )
        .with_operation(
            OperationModel::new("GetObject")
                .with_input("GetObjectRequest")
                .with_output("GetObjectOutput")
                .with_error("NoSuchKey"),
        )
}

/// Loader serving [`s3_model`].
pub fn s3_loader() -> InMemoryModelLoader {
    InMemoryModelLoader::new().with_model(s3_model())
}

/// Loader that counts how often each load is attempted.
#[derive(Debug, Clone, Default)]
pub struct CountingLoader {
    /// Wrapped loader.
    pub inner: InMemoryModelLoader,
    /// Number of load attempts.
    pub loads: Arc<AtomicUsize>,
}

impl CountingLoader {
    /// Returns the number of load attempts so far.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl ModelLoader for CountingLoader {
    fn load(&self, service: &ServiceName) -> Result<Option<ServiceModel>, ModelLoadError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.inner.load(service)
    }

    fn services(&self) -> Vec<ServiceName> {
        self.inner.services()
    }
}
