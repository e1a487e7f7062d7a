// crates/lobotomy/tests/services.rs
// ============================================================================
// Module: Bundled Service Edge Case Tests
// Description: Service-specific casting and client conveniences.
// Purpose: Cover streams, recursion, timestamps, pagination, and presigning.
// ============================================================================

//! Service edge cases over the bundled models.

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

use lobotomy::ClientOptions;
use lobotomy::Lobotomy;
use lobotomy::LobotomyError;
use lobotomy::SessionOptions;
use lobotomy::TypedValue;
use serde_json::json;
use time::macros::datetime;

use crate::common::read_body;

#[test]
fn s3_select_returns_an_event_stream() {
    let lobotomy = Lobotomy::new();
    lobotomy
        .add_call(
            "s3",
            "select_object_content",
            Some(json!({
                "Payload": [
                    {"Records": {"Payload": "a,b\n"}},
                    {"Stats": {"Details": {"BytesScanned": 10, "BytesReturned": "4"}}},
                    {"End": {}}
                ]
            })),
        )
        .unwrap();
    let client = lobotomy.session().unwrap().client("s3").unwrap();
    let mut response = client
        .call(
            "select_object_content",
            json!({
                "Bucket": "b",
                "Key": "k",
                "Expression": "SELECT * FROM s3object",
                "ExpressionType": "SQL",
                "InputSerialization": {"CSV": {}},
                "OutputSerialization": {"CSV": {}}
            }),
        )
        .unwrap();

    let Some(TypedValue::EventStream(stream)) = response.take("Payload") else {
        panic!("payload should be an event stream");
    };
    let mut events: Vec<TypedValue> = stream.into_iter().collect();
    assert_eq!(events.len(), 3);
    let records = events[0].get_mut("Records").unwrap();
    assert_eq!(read_body(records, "Payload"), b"a,b\n");
    assert_eq!(events[1]["Stats"]["Details"]["BytesReturned"], TypedValue::Integer(4));
    assert!(events[2]["End"].as_map().is_some_and(std::collections::BTreeMap::is_empty));
}

#[test]
fn s3_select_accepts_a_single_event_mapping() {
    let lobotomy = Lobotomy::new();
    lobotomy.add_call("s3", "select_object_content", None).unwrap();
    let client = lobotomy.session().unwrap().client("s3").unwrap();
    let response = client
        .call(
            "select_object_content",
            json!({
                "Bucket": "b",
                "Key": "k",
                "Expression": "e",
                "ExpressionType": "SQL",
                "InputSerialization": {},
                "OutputSerialization": {}
            }),
        )
        .unwrap();
    let stream = response["Payload"].as_event_stream().expect("event stream");
    assert_eq!(stream.len(), 1);
}

#[test]
fn lambda_invoke_placeholder_payload_is_readable() {
    let lobotomy = Lobotomy::new();
    lobotomy.add_call("lambda", "invoke", None).unwrap();
    let client = lobotomy.session().unwrap().client("lambda").unwrap();
    let mut response = client.call("invoke", json!({"FunctionName": "fn"})).unwrap();

    assert_eq!(response["StatusCode"].as_i64(), Some(1));
    let body = response.get_mut("Payload").and_then(TypedValue::as_body_mut).unwrap();
    assert_eq!(body.read().as_ref(), b"...");
    assert!(body.read().is_empty(), "bodies are read once");
}

#[test]
fn lambda_invoke_payload_from_json_text() {
    let lobotomy = Lobotomy::new();
    lobotomy
        .add_call(
            "lambda",
            "invoke",
            Some(json!({"StatusCode": "200", "Payload": "{\"ok\": true}"})),
        )
        .unwrap();
    let client = lobotomy.session().unwrap().client("lambda").unwrap();
    let mut response =
        client.call("invoke", json!({"FunctionName": "fn", "Payload": "{}"})).unwrap();
    assert_eq!(response["StatusCode"], TypedValue::Integer(200));
    let payload: serde_json::Value =
        serde_json::from_slice(&read_body(&mut response, "Payload")).unwrap();
    assert_eq!(payload, json!({"ok": true}));
}

#[test]
fn dynamodb_get_item_casts_recursive_attribute_values() {
    let lobotomy = Lobotomy::new();
    lobotomy
        .add_call(
            "dynamodb",
            "get_item",
            Some(json!({
                "Item": {
                    "id": {"S": "abc"},
                    "count": {"N": 3},
                    "nested": {"M": {"inner": {"L": [{"BOOL": "true"}, {"B": "raw"}]}}}
                },
                "ConsumedCapacity": {"TableName": "t", "CapacityUnits": "0.5"}
            })),
        )
        .unwrap();
    let client = lobotomy.session().unwrap().client("dynamodb").unwrap();
    let mut response = client
        .call("get_item", json!({"TableName": "t", "Key": {"id": {"S": "abc"}}}))
        .unwrap();

    assert_eq!(response["Item"]["id"]["S"].as_str(), Some("abc"));
    assert_eq!(response["Item"]["count"]["N"].as_str(), Some("3"));
    let inner = &response["Item"]["nested"]["M"]["inner"]["L"];
    assert_eq!(inner[0]["BOOL"].as_bool(), Some(true));
    assert_eq!(response["ConsumedCapacity"]["CapacityUnits"].as_f64(), Some(0.5));

    let binary = response
        .get_mut("Item")
        .and_then(|item| item.get_mut("nested"))
        .and_then(|nested| nested.get_mut("M"))
        .and_then(|map| map.get_mut("inner"))
        .and_then(|inner| inner.get_mut("L"));
    let TypedValue::List(items) = binary.unwrap() else {
        panic!("L should be a list");
    };
    assert_eq!(read_body(&mut items[1], "B"), b"raw");
}

#[test]
fn sqs_delete_message_has_no_output_shape() {
    let lobotomy = Lobotomy::new();
    lobotomy.add_call("sqs", "delete_message", None).unwrap();
    let client = lobotomy.session().unwrap().client("sqs").unwrap();

    let response = client
        .call("delete_message", json!({"QueueUrl": "q", "ReceiptHandle": "r"}))
        .unwrap();
    assert_eq!(response.as_map().map(std::collections::BTreeMap::len), Some(0));
    let err = client.call("delete_message", json!({"QueueUrl": "q"})).unwrap_err();
    assert!(matches!(
        err,
        LobotomyError::MissingRequiredArguments { ref missing, .. } if missing == &["ReceiptHandle"]
    ));
}

#[test]
fn iam_timestamps_accept_several_formats() {
    let expected = datetime!(2020-12-01 01:02:03 UTC);
    let formats = [
        json!("2020-12-01T01:02:03Z"),
        json!("2020-12-01T01:02:03+00:00"),
        json!("2020-12-01T01:02:03+0000"),
        json!("2020-12-01T03:02:03+02"),
        json!("20201201T010203Z"),
        json!("2020-12-01 01:02:03"),
        json!("2020-12-01T01:02:03"),
        json!("2020-12-01T01:02:03.000"),
        json!(1_606_784_523),
        json!(1_606_784_523.0),
    ];
    let lobotomy = Lobotomy::new();
    lobotomy
        .add_responses(
            "iam",
            "get_role",
            formats.iter().map(|created| {
                json!({
                    "Role": {
                        "RoleName": "r",
                        "Path": "/",
                        "RoleId": "i",
                        "Arn": "a",
                        "CreateDate": created
                    }
                })
            }),
        )
        .unwrap();
    lobotomy
        .add_call(
            "iam",
            "get_role",
            Some(json!({"Role": {"RoleName": "r", "CreateDate": "2020-12-01"}})),
        )
        .unwrap();
    let client = lobotomy.session().unwrap().client("iam").unwrap();

    for created in &formats {
        let response = client.call("get_role", json!({"RoleName": "r"})).unwrap();
        let created_at = response["Role"]["CreateDate"].as_timestamp();
        assert_eq!(created_at, Some(expected), "input {created}");
    }
    let response = client.call("get_role", json!({"RoleName": "r"})).unwrap();
    assert_eq!(
        response["Role"]["CreateDate"].as_timestamp(),
        Some(datetime!(2020-12-01 00:00:00 UTC))
    );
}

#[test]
fn unparsable_timestamps_are_cast_errors() {
    let lobotomy = Lobotomy::new();
    lobotomy
        .add_call("iam", "list_roles", Some(json!({"Roles": [{"CreateDate": "yesterday"}]})))
        .unwrap();
    let client = lobotomy.session().unwrap().client("iam").unwrap();
    let err = client.call("list_roles", json!(null)).unwrap_err();
    let LobotomyError::Cast(cast) = err else {
        panic!("expected cast error, got {err}");
    };
    assert_eq!(cast.path, "Roles[0].CreateDate");
}

#[test]
fn s3_transfer_helpers_validate_their_arguments() {
    let lobotomy = Lobotomy::new();
    lobotomy.add_call("s3", "upload_file", None).unwrap();
    lobotomy.add_call("s3", "download_fileobj", None).unwrap();
    let client = lobotomy.session().unwrap().client("s3").unwrap();

    client
        .call(
            "upload_file",
            json!({
                "Filename": "/tmp/f",
                "Bucket": "b",
                "Key": "k",
                "ExtraArgs": {"ACL": "private"}
            }),
        )
        .unwrap();
    client.call("download_fileobj", json!({"Bucket": "b", "Key": "k", "Fileobj": null})).unwrap();
    let err = client.call("upload_file", json!({"Bucket": "b"})).unwrap_err();
    assert!(matches!(
        err,
        LobotomyError::MissingRequiredArguments { ref missing, .. }
            if missing == &["Filename", "Key"]
    ));
    let call = lobotomy.last_service_call("s3", "upload_file").unwrap();
    assert_eq!(call.request.get("Bucket"), Some(&json!("b")));
}

#[test]
fn paginators_return_one_page_per_call() {
    let lobotomy = Lobotomy::new();
    lobotomy
        .add_responses(
            "s3",
            "list_objects_v2",
            [json!({"Contents": [{"Key": "a"}]}), json!({"Contents": [{"Key": "b"}]})],
        )
        .unwrap();
    let client = lobotomy.session().unwrap().client("s3").unwrap();
    let paginator = client.get_paginator("list_objects_v2").unwrap();
    assert_eq!(paginator.method(), "list_objects_v2");

    let pages = paginator.paginate(json!({"Bucket": "b"})).unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0]["Contents"][0]["Key"].as_str(), Some("a"));
    let pages = paginator.paginate(json!({"Bucket": "b"})).unwrap();
    assert_eq!(pages[0]["Contents"][0]["Key"].as_str(), Some("b"));
    assert!(matches!(client.get_paginator("nope"), Err(LobotomyError::UnknownOperation { .. })));
}

#[test]
fn presigned_urls_use_session_credentials_and_region() {
    let lobotomy = Lobotomy::new();
    let session = lobotomy
        .session_with(
            &SessionOptions::new().region("eu-central-1").credentials("AKIAEXAMPLE", "s", None),
        )
        .unwrap();
    let client = session.client("sts").unwrap();
    let url = client.generate_presigned_url("get_caller_identity", None);
    let expected_prefix =
        "https://sts.amazonaws.com/?Action=GetCallerIdentity&Version=2011-06-15&";
    assert!(url.starts_with(expected_prefix));
    assert!(url.contains("X-Amz-Credential=AKIAEXAMPLE%2F"));
    assert!(url.contains("%2Feu-central-1%2Fsts%2Faws4_request"));
    assert!(url.contains("&X-Amz-Expires=3600&"));
    assert!(url.ends_with("&X-Amz-Signature=lobotomyfakesignature"));

    let custom = session
        .client_with(
            "sts",
            ClientOptions {
                region_name: Some("ap-east-1".to_string()),
                api_version: Some("2011-06-15".to_string()),
                aws_access_key_id: Some("AKIACLIENT".to_string()),
                ..ClientOptions::default()
            },
        )
        .unwrap();
    let url = custom.generate_presigned_url("assume_role", Some(900));
    assert!(url.contains("Action=AssumeRole&"));
    assert!(url.contains("X-Amz-Credential=AKIACLIENT%2F"));
    assert!(url.contains("%2Fap-east-1%2F"));
    assert!(url.contains("&X-Amz-Expires=900&"));
}

#[test]
fn client_lists_snake_case_operations() {
    let lobotomy = Lobotomy::new();
    let client = lobotomy.session().unwrap().client("s3").unwrap();
    let operations = client.operations().unwrap();
    for expected in ["get_object", "list_objects_v2", "select_object_content", "upload_file"] {
        assert!(operations.iter().any(|name| name == expected), "missing {expected}");
    }
}

#[test]
fn sts_assume_role_casts_credentials() {
    let lobotomy = Lobotomy::new();
    lobotomy
        .add_call(
            "sts",
            "assume_role",
            Some(json!({
                "Credentials": {
                    "AccessKeyId": "A",
                    "SecretAccessKey": "S",
                    "SessionToken": "T",
                    "Expiration": "2030-01-01T00:00:00Z"
                },
                "PackedPolicySize": "7"
            })),
        )
        .unwrap();
    let client = lobotomy.session().unwrap().client("sts").unwrap();
    let response = client
        .call("assume_role", json!({"RoleArn": "arn", "RoleSessionName": "s"}))
        .unwrap();
    assert_eq!(
        response["Credentials"]["Expiration"].as_timestamp(),
        Some(datetime!(2030-01-01 00:00:00 UTC))
    );
    assert_eq!(response["PackedPolicySize"].as_i64(), Some(7));
}

#[test]
fn ecr_authorization_tokens_cast_their_expiry() {
    let lobotomy = Lobotomy::new();
    lobotomy
        .add_call(
            "ecr",
            "get_authorization_token",
            Some(json!({
                "authorizationData": [{
                    "authorizationToken": "...",
                    "expiresAt": "2020-11-04T20:06:29.048640Z"
                }]
            })),
        )
        .unwrap();
    let client = lobotomy.session().unwrap().client("ecr").unwrap();
    let response = client.call("get_authorization_token", json!({"registryIds": ["123"]})).unwrap();

    let data = &response["authorizationData"][0];
    assert_eq!(data["authorizationToken"].as_str(), Some("..."));
    assert_eq!(
        data["expiresAt"].as_timestamp(),
        Some(datetime!(2020-11-04 20:06:29.048640 UTC))
    );
    let calls = lobotomy.get_service_calls("ecr", "get_authorization_token").unwrap();
    assert_eq!(calls[0].request.get("registryIds"), Some(&json!(["123"])));
}

#[test]
fn eks_describe_cluster_passes_unknown_keys_through() {
    let lobotomy = Lobotomy::new();
    lobotomy
        .add_call(
            "eks",
            "describe_cluster",
            Some(json!({
                "name": "cluster",
                "arn": "arn:aws:eks:us-east-1:123456789012:cluster/cluster",
                "certificateAuthority": {"data": "LS0t"}
            })),
        )
        .unwrap();
    let client = lobotomy.session().unwrap().client("eks").unwrap();
    let response = client.call("describe_cluster", json!({"name": "cluster"})).unwrap();
    assert_eq!(
        response["arn"].as_str(),
        Some("arn:aws:eks:us-east-1:123456789012:cluster/cluster")
    );
    assert_eq!(response["certificateAuthority"].as_untyped(), Some(&json!({"data": "LS0t"})));

    let err = client.call("describe_cluster", json!({})).unwrap_err();
    assert!(matches!(
        err,
        LobotomyError::MissingRequiredArguments { ref missing, .. } if missing == &["name"]
    ));
}

#[test]
fn s3_copy_object_and_sqs_queue_urls_are_mockable() {
    let lobotomy = Lobotomy::new();
    lobotomy
        .add_call(
            "s3",
            "copy_object",
            Some(json!({"CopyObjectResult": {"ETag": "\"e\"", "LastModified": "2021-01-01"}})),
        )
        .unwrap();
    lobotomy
        .add_call("sqs", "get_queue_url", Some(json!({"QueueUrl": "https://queue/q"})))
        .unwrap();
    let session = lobotomy.session().unwrap();

    let s3 = session.client("s3").unwrap();
    let copied = s3
        .call("copy_object", json!({"Bucket": "b", "CopySource": "a/k", "Key": "k"}))
        .unwrap();
    assert_eq!(
        copied["CopyObjectResult"]["LastModified"].as_timestamp(),
        Some(datetime!(2021-01-01 00:00:00 UTC))
    );
    let sqs = session.client("sqs").unwrap();
    let queue = sqs.call("get_queue_url", json!({"QueueName": "q"})).unwrap();
    assert_eq!(queue["QueueUrl"].as_str(), Some("https://queue/q"));
}
