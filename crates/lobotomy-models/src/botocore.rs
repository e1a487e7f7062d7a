// crates/lobotomy-models/src/botocore.rs
// ============================================================================
// Module: Botocore Model Parser
// Description: Conversion of `service-2.json` documents into service models.
// Purpose: Read the provider's published schema format without the provider SDK.
// Dependencies: lobotomy-core, indexmap, serde, serde_json, serde_yaml
// ============================================================================

//! ## Overview
//! A botocore service document lists operations (with input, output, and
//! error shape references) and a flat shape table. Scalar type names are
//! folded onto the engine's shape kinds: `long`, `short`, and `byte` become
//! integers, `float` becomes a double, and any type the engine does not know
//! becomes [`Shape::Any`] so its values pass through untouched.
//!
//! Structure members keep the order the document declares them in.
//!
//! Augmentations are YAML documents with the same `operations` and `shapes`
//! sections; their entries are merged over the base document before parsing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use indexmap::IndexMap;
use lobotomy_core::ModelLoadError;
use lobotomy_core::OperationModel;
use lobotomy_core::ServiceModel;
use lobotomy_core::ServiceName;
use lobotomy_core::Shape;
use lobotomy_core::ShapeName;
use lobotomy_core::StructureMember;
use lobotomy_core::StructureShape;
use serde::Deserialize;
use serde_json::Value;

// ============================================================================
// SECTION: Raw Document
// ============================================================================

/// Top-level botocore service document.
#[derive(Debug, Deserialize)]
struct RawDocument {
    /// Service metadata.
    #[serde(default)]
    metadata: RawMetadata,
    /// Operations keyed by operation name.
    #[serde(default)]
    operations: BTreeMap<String, RawOperation>,
    /// Shape table.
    #[serde(default)]
    shapes: BTreeMap<String, RawShape>,
}

/// Service metadata fields the engine uses.
#[derive(Debug, Default, Deserialize)]
struct RawMetadata {
    /// API version label.
    #[serde(rename = "apiVersion", default)]
    api_version: Option<String>,
}

/// Operation entry.
#[derive(Debug, Deserialize)]
struct RawOperation {
    /// Operation name; defaults to the map key.
    #[serde(default)]
    name: Option<String>,
    /// Input shape reference.
    #[serde(default)]
    input: Option<RawShapeRef>,
    /// Output shape reference.
    #[serde(default)]
    output: Option<RawShapeRef>,
    /// Error shape references.
    #[serde(default)]
    errors: Vec<RawShapeRef>,
}

/// Reference to a named shape.
#[derive(Debug, Deserialize)]
struct RawShapeRef {
    /// Referenced shape name.
    shape: String,
}

/// Shape entry.
#[derive(Debug, Deserialize)]
struct RawShape {
    /// Botocore type name.
    #[serde(rename = "type")]
    kind: String,
    /// Structure members in declaration order.
    #[serde(default)]
    members: IndexMap<String, RawShapeRef>,
    /// Required structure members.
    #[serde(default)]
    required: Vec<String>,
    /// List element.
    #[serde(default)]
    member: Option<RawShapeRef>,
    /// Map key.
    #[serde(default)]
    key: Option<RawShapeRef>,
    /// Map value.
    #[serde(default)]
    value: Option<RawShapeRef>,
    /// Streaming flag on strings and blobs.
    #[serde(default)]
    streaming: bool,
    /// Event-stream flag on structures.
    #[serde(default)]
    eventstream: bool,
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Parses a botocore service document into a service model.
///
/// # Errors
///
/// Returns [`ModelLoadError::Parse`] when the document does not follow the
/// botocore layout.
pub fn parse_service_model(
    service: &ServiceName,
    document: Value,
) -> Result<ServiceModel, ModelLoadError> {
    let raw: RawDocument = serde_json::from_value(document)
        .map_err(|err| ModelLoadError::Parse(format!("{service}: {err}")))?;
    let api_version = raw.metadata.api_version.unwrap_or_default();
    let mut model = ServiceModel::new(service.clone(), api_version);

    for (name, shape) in raw.shapes {
        let shape = convert_shape(service, &name, shape)?;
        model.shapes.insert(ShapeName::new(name), shape);
    }
    for (key, operation) in raw.operations {
        let mut converted = OperationModel::new(operation.name.unwrap_or(key));
        converted.input = operation.input.map(|input| ShapeName::new(input.shape));
        converted.output = operation.output.map(|output| ShapeName::new(output.shape));
        converted.errors =
            operation.errors.into_iter().map(|error| ShapeName::new(error.shape)).collect();
        model.insert_operation(converted);
    }
    Ok(model)
}

/// Converts one raw shape.
fn convert_shape(
    service: &ServiceName,
    name: &str,
    raw: RawShape,
) -> Result<Shape, ModelLoadError> {
    let shape = match raw.kind.as_str() {
        "structure" => {
            let members = raw
                .members
                .into_iter()
                .map(|(member, reference)| StructureMember {
                    required: raw.required.contains(&member),
                    name: member,
                    shape: ShapeName::new(reference.shape),
                })
                .collect();
            Shape::Structure(StructureShape {
                members,
                event_stream: raw.eventstream,
            })
        }
        "list" => Shape::List {
            member: required_ref(service, name, "member", raw.member)?,
        },
        "map" => Shape::Map {
            key: required_ref(service, name, "key", raw.key)?,
            value: required_ref(service, name, "value", raw.value)?,
        },
        "string" => Shape::String {
            streaming: raw.streaming,
        },
        "integer" | "long" | "short" | "byte" => Shape::Integer,
        "double" | "float" => Shape::Double,
        "boolean" => Shape::Boolean,
        "blob" => Shape::Blob {
            streaming: raw.streaming,
        },
        "timestamp" => Shape::Timestamp,
        _ => Shape::Any,
    };
    Ok(shape)
}

/// Requires a shape reference that the type cannot do without.
fn required_ref(
    service: &ServiceName,
    shape: &str,
    field: &str,
    reference: Option<RawShapeRef>,
) -> Result<ShapeName, ModelLoadError> {
    reference.map(|reference| ShapeName::new(reference.shape)).ok_or_else(|| {
        ModelLoadError::Parse(format!("{service}: shape {shape} is missing its {field}"))
    })
}

// ============================================================================
// SECTION: Augmentations
// ============================================================================

/// Merges YAML augmentations into a botocore document.
///
/// Entries under `operations` and `shapes` replace same-named entries of the
/// base document.
///
/// # Errors
///
/// Returns [`ModelLoadError::Parse`] when either document is malformed.
pub fn merge_augmentations(
    document: &mut Value,
    augmentations: &str,
) -> Result<(), ModelLoadError> {
    if augmentations.trim().is_empty() {
        return Ok(());
    }
    let extras: Value = serde_yaml::from_str(augmentations)
        .map_err(|err| ModelLoadError::Parse(format!("augmentations: {err}")))?;
    let Some(extras) = extras.as_object() else {
        if extras.is_null() {
            return Ok(());
        }
        return Err(ModelLoadError::Parse("augmentations must be a mapping".to_string()));
    };
    let Some(base) = document.as_object_mut() else {
        return Err(ModelLoadError::Parse("service document must be a mapping".to_string()));
    };
    for section in ["operations", "shapes"] {
        let Some(entries) = extras.get(section).and_then(Value::as_object) else {
            continue;
        };
        let target = base
            .entry(section)
            .or_insert_with(|| Value::Object(serde_json::Map::new()))
            .as_object_mut()
            .ok_or_else(|| ModelLoadError::Parse(format!("{section} must be a mapping")))?;
        for (name, entry) in entries {
            target.insert(name.clone(), entry.clone());
        }
    }
    Ok(())
}

/// Parses document text plus optional augmentations into a model.
///
/// # Errors
///
/// Returns [`ModelLoadError::Parse`] when any input is malformed.
pub fn load_service_model(
    service: &ServiceName,
    document: &str,
    augmentations: Option<&str>,
) -> Result<ServiceModel, ModelLoadError> {
    let mut document: Value = serde_json::from_str(document)
        .map_err(|err| ModelLoadError::Parse(format!("{service}: {err}")))?;
    if let Some(augmentations) = augmentations {
        merge_augmentations(&mut document, augmentations)?;
    }
    parse_service_model(service, document)
}
