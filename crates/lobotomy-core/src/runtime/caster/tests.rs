// crates/lobotomy-core/src/runtime/caster/tests.rs
// ============================================================================
// Module: Value Caster Unit Tests
// Description: Shape-directed casting, coercion, and failure paths.
// Purpose: Pin what configured responses turn into.
// Dependencies: lobotomy-core, proptest, serde_json, time
// ============================================================================

//! ## Overview
//! Exercises [`ValueCaster`] against a small S3-like model.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    reason = "Test assertions use expect/unwrap for clarity."
)]

use proptest::prelude::*;
use serde_json::Value;
use serde_json::json;
use time::macros::datetime;

use super::MAX_CAST_DEPTH;
use super::ValueCaster;
use crate::core::OperationModel;
use crate::core::ServiceModel;
use crate::core::Shape;
use crate::core::ShapeName;
use crate::core::StructureShape;
use crate::core::TypedValue;

fn model() -> ServiceModel {
    ServiceModel::new("s3", "2006-03-01")
        .with_shape("String", Shape::String {
            streaming: false,
        })
        .with_shape("Size", Shape::Integer)
        .with_shape("Ratio", Shape::Double)
        .with_shape("Flag", Shape::Boolean)
        .with_shape("Date", Shape::Timestamp)
        .with_shape("Body", Shape::Blob {
            streaming: true,
        })
        .with_shape("Text", Shape::String {
            streaming: true,
        })
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
        .with_shape("Tags", Shape::Map {
            key: ShapeName::new("String"),
            value: ShapeName::new("Size"),
        })
        .with_shape(
            "ListObjectsOutput",
            Shape::Structure(
                StructureShape::new()
                    .with_member("Contents", "ObjectList")
                    .with_member("IsTruncated", "Flag")
                    .with_member("Tags", "Tags"),
            ),
        )
        .with_shape(
            "Records",
            Shape::Structure(StructureShape::new().with_member("Payload", "Body")),
        )
        .with_shape(
            "SelectStream",
            Shape::Structure(
                StructureShape::new().with_member("Records", "Records").as_event_stream(),
            ),
        )
        .with_operation(OperationModel::new("ListObjects").with_output("ListObjectsOutput"))
        .with_operation(OperationModel::new("DeleteBucket"))
}

fn cast(value: &Value, shape: &str) -> Result<TypedValue, crate::core::CastError> {
    let model = model();
    ValueCaster::new(&model).cast(value, &ShapeName::new(shape))
}

#[test]
fn casts_nested_structures_and_passes_unknown_keys_through() {
    let model = model();
    let caster = ValueCaster::new(&model);
    let op = model.operation("list_objects").unwrap();
    let config = json!({
        "Contents": [
            {"Key": "a.txt", "Size": "12", "LastModified": "2020-12-01T01:02:03Z"},
            {"Key": "b.txt", "Size": 4}
        ],
        "IsTruncated": "false",
        "Tags": {"team": "7"},
        "NextMarker": "untouched"
    });
    let typed = caster.cast_output(&config, op).unwrap();

    assert_eq!(typed["Contents"][0]["Key"].as_str(), Some("a.txt"));
    assert_eq!(typed["Contents"][0]["Size"].as_i64(), Some(12));
    assert_eq!(
        typed["Contents"][0]["LastModified"].as_timestamp(),
        Some(datetime!(2020-12-01 01:02:03 UTC))
    );
    assert!(typed["Contents"][1]["LastModified"].is_null(), "absent members are omitted");
    assert_eq!(typed["IsTruncated"].as_bool(), Some(false));
    assert_eq!(typed["Tags"]["team"].as_i64(), Some(7));
    assert_eq!(typed["NextMarker"].as_untyped(), Some(&json!("untouched")));
}

#[test]
fn cast_failures_name_the_member_path() {
    let config = json!({"Contents": [{"Key": "a"}, {"Size": "twelve"}]});
    let err = cast(&config, "ListObjectsOutput").unwrap_err();
    assert_eq!(err.path, "Contents[1].Size");
    assert_eq!(err.expected, "integer");

    let err = cast(&json!("not a list"), "ObjectList").unwrap_err();
    assert_eq!(err.path, "<response>");
    assert_eq!(err.expected, "list");
}

#[test]
fn blobs_and_streaming_strings_read_once() {
    let mut body = cast(&json!("hello"), "Body").unwrap();
    let body = body.as_body_mut().expect("body");
    assert_eq!(body.read().as_ref(), b"hello");
    assert!(body.read().is_empty(), "second read yields nothing");

    let mut bytes = cast(&json!([104, 105]), "Body").unwrap().into_body().unwrap();
    assert_eq!(bytes.read().as_ref(), b"hi");

    let mut text = cast(&json!("streamed"), "Text").unwrap().into_body().unwrap();
    assert_eq!(text.read().as_ref(), b"streamed");

    assert!(cast(&json!([300]), "Body").is_err());
}

#[test]
fn scalar_coercions() {
    assert_eq!(cast(&json!("1"), "Size").unwrap(), TypedValue::Integer(1));
    assert_eq!(cast(&json!(3.0), "Size").unwrap(), TypedValue::Integer(3));
    assert!(cast(&json!(3.5), "Size").is_err());
    assert_eq!(cast(&json!("2.5"), "Ratio").unwrap(), TypedValue::Double(2.5));
    assert_eq!(cast(&json!(1), "Flag").unwrap(), TypedValue::Boolean(true));
    assert_eq!(cast(&json!("TRUE"), "Flag").unwrap(), TypedValue::Boolean(true));
    assert!(cast(&json!("maybe"), "Flag").is_err());
    assert_eq!(cast(&json!(42), "String").unwrap(), TypedValue::String("42".to_string()));
    assert_eq!(cast(&Value::Null, "Size").unwrap(), TypedValue::Null);
}

#[test]
fn timestamps_default_to_utc() {
    let typed = cast(&json!("2020-12-01 01:02:03"), "Date").unwrap();
    assert_eq!(typed.as_timestamp(), Some(datetime!(2020-12-01 01:02:03 UTC)));
    let epoch = cast(&json!(0), "Date").unwrap();
    assert_eq!(epoch.as_timestamp(), Some(time::OffsetDateTime::UNIX_EPOCH));
    assert!(cast(&json!("soon"), "Date").is_err());
}

#[test]
fn event_streams_iterate_in_order() {
    let config = json!([
        {"Records": {"Payload": "one"}},
        {"Records": {"Payload": "two"}}
    ]);
    let typed = cast(&config, "SelectStream").unwrap();
    let stream = typed.as_event_stream().expect("event stream");
    let payloads: Vec<Vec<u8>> = stream
        .clone()
        .into_iter()
        .map(|mut event| {
            let records = event.get_mut("Records").unwrap();
            records.get_mut("Payload").unwrap().as_body_mut().unwrap().read().to_vec()
        })
        .collect();
    assert_eq!(payloads, vec![b"one".to_vec(), b"two".to_vec()]);

    let single = cast(&json!({"Records": {"Payload": "x"}}), "SelectStream").unwrap();
    assert_eq!(single.as_event_stream().map(crate::core::EventStream::len), Some(1));
}

#[test]
fn operations_without_output_pass_responses_through() {
    let model = model();
    let op = model.operation("delete_bucket").unwrap();
    let typed = ValueCaster::new(&model).cast_output(&json!({"Anything": [1]}), op).unwrap();
    assert_eq!(typed["Anything"].as_untyped(), Some(&json!([1])));
}

#[test]
fn recursive_nesting_is_bounded() {
    let model = ServiceModel::new("dynamodb", "2012-08-10")
        .with_shape("Node", Shape::Structure(StructureShape::new().with_member("Next", "Node")));
    let mut config = json!({});
    for _ in 0 ..= MAX_CAST_DEPTH + 1 {
        config = json!({"Next": config});
    }
    let err = ValueCaster::new(&model).cast(&config, &ShapeName::new("Node")).unwrap_err();
    assert!(err.message.contains("nesting"), "unexpected error: {err}");
}

#[test]
fn casting_does_not_mutate_configuration() {
    let config = json!({"Contents": [{"Key": "a", "Size": "1"}]});
    let before = config.clone();
    cast(&config, "ListObjectsOutput").unwrap();
    assert_eq!(config, before);
}

proptest! {
    #[test]
    fn already_typed_scalars_cast_unchanged(
        number in any::<i64>(),
        text in ".*",
        flag in any::<bool>(),
        ratio in -1.0e12f64 .. 1.0e12f64,
    ) {
        prop_assert_eq!(cast(&json!(number), "Size").unwrap(), TypedValue::Integer(number));
        prop_assert_eq!(cast(&json!(text.clone()), "String").unwrap(), TypedValue::String(text));
        prop_assert_eq!(cast(&json!(flag), "Flag").unwrap(), TypedValue::Boolean(flag));
        prop_assert_eq!(cast(&json!(ratio), "Ratio").unwrap(), TypedValue::Double(ratio));
    }
}
