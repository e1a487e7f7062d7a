// crates/lobotomy-models/src/tests.rs
// ============================================================================
// Module: Model Parser Unit Tests
// Description: Botocore document conversion and augmentation merging.
// Purpose: Pin the type folding and merge rules of the parser.
// Dependencies: lobotomy-models
// ============================================================================

//! ## Overview
//! Unit tests for the botocore parser on small inline documents.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

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
    reason = "Test-only output and panic-based assertions are permitted."
)]

use lobotomy_core::ModelLoadError;
use lobotomy_core::ServiceName;
use lobotomy_core::Shape;
use lobotomy_core::ShapeName;
use serde_json::json;

use crate::botocore::load_service_model;
use crate::botocore::merge_augmentations;
use crate::botocore::parse_service_model;

fn document() -> serde_json::Value {
    json!({
        "version": "2.0",
        "metadata": {"apiVersion": "2020-01-01"},
        "operations": {
            "GetThing": {
                "name": "GetThing",
                "input": {"shape": "GetThingRequest"},
                "output": {"shape": "GetThingOutput"},
                "errors": [{"shape": "ThingMissing"}]
            }
        },
        "shapes": {
            "Id": {"type": "string"},
            "Count": {"type": "long"},
            "Ratio": {"type": "float"},
            "Data": {"type": "blob", "streaming": true},
            "Weird": {"type": "document"},
            "Ids": {"type": "list", "member": {"shape": "Id"}},
            "Events": {
                "type": "structure",
                "eventstream": true,
                "members": {"Chunk": {"shape": "Data"}}
            },
            "GetThingRequest": {
                "type": "structure",
                "required": ["Id"],
                "members": {"Id": {"shape": "Id"}, "Tags": {"shape": "Ids"}}
            },
            "GetThingOutput": {
                "type": "structure",
                "members": {
                    "Count": {"shape": "Count"},
                    "Ratio": {"shape": "Ratio"},
                    "Data": {"shape": "Data"},
                    "Extra": {"shape": "Weird"},
                    "Stream": {"shape": "Events"}
                }
            },
            "ThingMissing": {"type": "structure", "members": {}, "exception": true}
        }
    })
}

#[test]
fn folds_scalar_type_names() {
    let model = parse_service_model(&ServiceName::new("things"), document()).unwrap();
    assert_eq!(model.api_version, "2020-01-01");
    assert_eq!(model.shape(&ShapeName::new("Count")), Some(&Shape::Integer));
    assert_eq!(model.shape(&ShapeName::new("Ratio")), Some(&Shape::Double));
    assert_eq!(model.shape(&ShapeName::new("Weird")), Some(&Shape::Any));
    assert_eq!(
        model.shape(&ShapeName::new("Data")),
        Some(&Shape::Blob {
            streaming: true
        })
    );
    model.validate().unwrap();
}

#[test]
fn keeps_required_and_event_stream_flags() {
    let model = parse_service_model(&ServiceName::new("things"), document()).unwrap();
    let Some(Shape::Structure(request)) = model.shape(&ShapeName::new("GetThingRequest")) else {
        panic!("request should be a structure");
    };
    let required: Vec<&str> =
        request.required_members().map(|member| member.name.as_str()).collect();
    assert_eq!(required, vec!["Id"]);
    let Some(Shape::Structure(events)) = model.shape(&ShapeName::new("Events")) else {
        panic!("events should be a structure");
    };
    assert!(events.event_stream);
}

#[test]
fn structure_members_keep_declaration_order() {
    let text = r#"{
        "operations": {},
        "shapes": {
            "Text": {"type": "string"},
            "Record": {
                "type": "structure",
                "members": {
                    "Zeta": {"shape": "Text"},
                    "Alpha": {"shape": "Text"},
                    "Mid": {"shape": "Text"}
                }
            }
        }
    }"#;
    let model = load_service_model(&ServiceName::new("things"), text, None).unwrap();
    let Some(Shape::Structure(record)) = model.shape(&ShapeName::new("Record")) else {
        panic!("record should be a structure");
    };
    let names: Vec<&str> = record.members.iter().map(|member| member.name.as_str()).collect();
    assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
}

#[test]
fn operations_are_reachable_by_method_name_with_exceptions() {
    let model = parse_service_model(&ServiceName::new("things"), document()).unwrap();
    let operation = model.operation("get_thing").unwrap();
    assert_eq!(operation.name, "GetThing");
    assert!(model.exceptions().contains("ThingMissing"));
    assert_eq!(model.method_names(), vec!["get_thing".to_string()]);
}

#[test]
fn lists_without_members_are_rejected() {
    let mut doc = document();
    doc["shapes"]["Ids"] = json!({"type": "list"});
    let err = parse_service_model(&ServiceName::new("things"), doc).unwrap_err();
    assert!(matches!(err, ModelLoadError::Parse(_)), "got {err}");
}

#[test]
fn augmentations_add_operations_and_shapes() {
    let mut doc = document();
    merge_augmentations(
        &mut doc,
        concat!(
            "operations:\n",
            "  PutThing:\n",
            "    name: PutThing\n",
            "    input: {shape: PutThingRequest}\n",
            "shapes:\n",
            "  PutThingRequest:\n",
            "    type: structure\n",
            "    required: [Id]\n",
            "    members:\n",
            "      Id: {shape: Id}\n",
        ),
    )
    .unwrap();
    let model = parse_service_model(&ServiceName::new("things"), doc).unwrap();
    assert!(model.has_operation("put_thing"));
    assert!(model.has_operation("get_thing"));
    model.validate().unwrap();
}

#[test]
fn empty_augmentations_are_a_no_op() {
    let text = serde_json::to_string(&document()).unwrap();
    let model = load_service_model(&ServiceName::new("things"), &text, Some("")).unwrap();
    assert_eq!(model.operations.len(), 1);
}

#[test]
fn malformed_documents_report_parse_errors() {
    let err = load_service_model(&ServiceName::new("things"), "{not json", None).unwrap_err();
    assert!(matches!(err, ModelLoadError::Parse(_)), "got {err}");
    let err = merge_augmentations(&mut document(), "- a\n- b\n").unwrap_err();
    assert!(matches!(err, ModelLoadError::Parse(_)), "got {err}");
}
