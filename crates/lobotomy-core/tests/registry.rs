// crates/lobotomy-core/tests/registry.rs
// ============================================================================
// Module: Shape Registry Tests
// Description: Lazy loading, caching, and resolution failures.
// Purpose: Ensure models load once and resolve deterministically.
// ============================================================================

//! Shape registry integration tests.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    missing_docs,
    reason = "Test-only assertions and helpers are permitted."
)]

mod common;

use std::sync::Arc;
use std::thread;

use lobotomy_core::InMemoryModelLoader;
use lobotomy_core::LobotomyError;
use lobotomy_core::ServiceModel;
use lobotomy_core::ServiceName;
use lobotomy_core::Shape;
use lobotomy_core::ShapeName;
use lobotomy_core::ShapeRegistry;
use lobotomy_core::StructureShape;

use crate::common::CountingLoader;
use crate::common::s3_loader;

#[test]
fn resolves_operations_by_method_or_operation_name() {
    let registry = ShapeRegistry::new(s3_loader());
    let s3 = ServiceName::new("s3");
    let by_method = registry.resolve_operation(&s3, "list_objects").unwrap();
    let by_name = registry.resolve_operation(&s3, "ListObjects").unwrap();
    assert_eq!(by_method.operation, by_name.operation);
    assert!(Arc::ptr_eq(&by_method.model, &by_name.model), "models are cached");
    assert!(matches!(by_method.input_shape(), Some(Shape::Structure(_))));
    assert!(by_method.exceptions().contains("NoSuchBucket"));
}

#[test]
fn unknown_service_and_operation_are_distinct_errors() {
    let registry = ShapeRegistry::new(s3_loader());
    let err =
        registry.resolve_operation(&ServiceName::new("ec2"), "describe_instances").unwrap_err();
    assert!(matches!(err, LobotomyError::UnknownService(_)), "got {err}");
    let err = registry.resolve_operation(&ServiceName::new("s3"), "fly_away").unwrap_err();
    assert!(matches!(err, LobotomyError::UnknownOperation { .. }), "got {err}");
}

#[test]
fn resolves_shapes_and_reports_missing_ones() {
    let registry = ShapeRegistry::new(s3_loader());
    let s3 = ServiceName::new("s3");
    assert_eq!(registry.resolve_shape(&s3, &ShapeName::new("Size")).unwrap(), Shape::Integer);
    let err = registry.resolve_shape(&s3, &ShapeName::new("Nope")).unwrap_err();
    assert!(matches!(err, LobotomyError::Model(_)), "got {err}");
}

#[test]
fn models_load_once_across_threads() {
    let loader = CountingLoader {
        inner: s3_loader(),
        ..CountingLoader::default()
    };
    let registry = Arc::new(ShapeRegistry::new(loader.clone()));
    let handles: Vec<_> = (0 .. 8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || registry.service(&ServiceName::new("s3")).map(|_| ()))
        })
        .collect();
    for handle in handles {
        handle.join().unwrap().unwrap();
    }
    assert_eq!(loader.load_count(), 1);
    assert!(registry.is_loaded(&ServiceName::new("s3")));
}

#[test]
fn dangling_shape_references_fail_the_load() {
    let broken = ServiceModel::new("broken", "2020-01-01")
        .with_shape("Out", Shape::Structure(StructureShape::new().with_member("X", "Missing")));
    let registry = ShapeRegistry::new(InMemoryModelLoader::new().with_model(broken));
    let err = registry.service(&ServiceName::new("broken")).unwrap_err();
    assert!(matches!(err, LobotomyError::Model(_)), "got {err}");
    assert!(!registry.is_loaded(&ServiceName::new("broken")));
}

#[test]
fn lists_loader_services() {
    let registry = ShapeRegistry::new(s3_loader());
    assert_eq!(registry.services(), vec![ServiceName::new("s3")]);
}
