// crates/lobotomy-core/src/core/shape.rs
// ============================================================================
// Module: Service Model Types
// Description: Operations and shape descriptors for an emulated service.
// Purpose: Represent externally loaded schema metadata as plain data.
// Dependencies: crate::core::identifiers, crate::interfaces, serde
// ============================================================================

//! ## Overview
//! A [`ServiceModel`] maps operations to their input/output shapes and holds
//! the full shape table of one service. Shapes reference each other by name,
//! so the table forms a directed graph that may legitimately recurse (for
//! example a map whose values are the enclosing structure). Models are
//! immutable once handed to the registry.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::ServiceName;
use crate::core::identifiers::ShapeName;
use crate::core::identifiers::operation_key;
use crate::core::identifiers::snake_case;
use crate::interfaces::ModelLoadError;

// ============================================================================
// SECTION: Shapes
// ============================================================================

/// Type descriptor for a named shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    /// Ordered members, each referencing another shape.
    Structure(StructureShape),
    /// Homogeneous sequence of the member shape.
    List {
        /// Element shape.
        member: ShapeName,
    },
    /// Mapping with string keys and values of the value shape.
    Map {
        /// Key shape.
        key: ShapeName,
        /// Value shape.
        value: ShapeName,
    },
    /// Text value; streaming strings are returned as a readable body.
    String {
        /// Whether the value is returned as a streaming body.
        #[serde(default)]
        streaming: bool,
    },
    /// Signed integer value (also used for `long`).
    Integer,
    /// Floating point value (also used for `float`).
    Double,
    /// Boolean value.
    Boolean,
    /// Binary value, always returned as a single-read body.
    Blob {
        /// Whether the model flags the blob as streaming.
        #[serde(default)]
        streaming: bool,
    },
    /// Timezone-aware instant.
    Timestamp,
    /// Unknown or unsupported type; values pass through untouched.
    Any,
}

impl Shape {
    /// Returns the lowercase type label for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Structure(_) => "structure",
            Self::List {
                ..
            } => "list",
            Self::Map {
                ..
            } => "map",
            Self::String {
                ..
            } => "string",
            Self::Integer => "integer",
            Self::Double => "double",
            Self::Boolean => "boolean",
            Self::Blob {
                ..
            } => "blob",
            Self::Timestamp => "timestamp",
            Self::Any => "any",
        }
    }

    /// Returns every shape name this shape refers to.
    #[must_use]
    pub fn references(&self) -> Vec<&ShapeName> {
        match self {
            Self::Structure(structure) => {
                structure.members.iter().map(|member| &member.shape).collect()
            }
            Self::List {
                member,
            } => vec![member],
            Self::Map {
                key,
                value,
            } => vec![key, value],
            _ => Vec::new(),
        }
    }
}

/// Structure shape with ordered members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureShape {
    /// Members in declaration order.
    pub members: Vec<StructureMember>,
    /// Whether the structure is delivered as an event stream.
    #[serde(default)]
    pub event_stream: bool,
}

impl StructureShape {
    /// Creates an empty structure.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an optional member.
    #[must_use]
    pub fn with_member(mut self, name: impl Into<String>, shape: impl Into<ShapeName>) -> Self {
        self.members.push(StructureMember {
            name: name.into(),
            shape: shape.into(),
            required: false,
        });
        self
    }

    /// Adds a required member.
    #[must_use]
    pub fn with_required(mut self, name: impl Into<String>, shape: impl Into<ShapeName>) -> Self {
        self.members.push(StructureMember {
            name: name.into(),
            shape: shape.into(),
            required: true,
        });
        self
    }

    /// Marks the structure as an event stream.
    #[must_use]
    pub const fn as_event_stream(mut self) -> Self {
        self.event_stream = true;
        self
    }

    /// Looks up a member by name.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&StructureMember> {
        self.members.iter().find(|member| member.name == name)
    }

    /// Iterates the members flagged required.
    pub fn required_members(&self) -> impl Iterator<Item = &StructureMember> {
        self.members.iter().filter(|member| member.required)
    }
}

/// Member entry within a structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureMember {
    /// Member name as it appears in requests and responses.
    pub name: String,
    /// Referenced shape.
    pub shape: ShapeName,
    /// Whether callers must supply this member in requests.
    #[serde(default)]
    pub required: bool,
}

// ============================================================================
// SECTION: Operations
// ============================================================================

/// Operation descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationModel {
    /// Operation name as written in the model (`PascalCase`).
    pub name: String,
    /// Input shape, when the operation takes arguments.
    #[serde(default)]
    pub input: Option<ShapeName>,
    /// Output shape, when the operation returns data.
    #[serde(default)]
    pub output: Option<ShapeName>,
    /// Error shapes the operation may raise.
    #[serde(default)]
    pub errors: Vec<ShapeName>,
}

impl OperationModel {
    /// Creates an operation with no input, output, or errors.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            input: None,
            output: None,
            errors: Vec::new(),
        }
    }

    /// Sets the input shape.
    #[must_use]
    pub fn with_input(mut self, shape: impl Into<ShapeName>) -> Self {
        self.input = Some(shape.into());
        self
    }

    /// Sets the output shape.
    #[must_use]
    pub fn with_output(mut self, shape: impl Into<ShapeName>) -> Self {
        self.output = Some(shape.into());
        self
    }

    /// Adds an error shape.
    #[must_use]
    pub fn with_error(mut self, shape: impl Into<ShapeName>) -> Self {
        self.errors.push(shape.into());
        self
    }

    /// Returns the `snake_case` client method name.
    #[must_use]
    pub fn method_name(&self) -> String {
        snake_case(&self.name)
    }
}

// ============================================================================
// SECTION: Service Model
// ============================================================================

/// Immutable model for one service.
///
/// # Invariants
/// - `operations` is keyed by [`operation_key`] of the operation name.
/// - After [`ServiceModel::validate`] succeeds, every referenced shape exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceModel {
    /// Service name.
    pub service: ServiceName,
    /// Model API version label.
    pub api_version: String,
    /// Operations keyed by normalized name.
    pub operations: BTreeMap<String, OperationModel>,
    /// Shape table.
    pub shapes: BTreeMap<ShapeName, Shape>,
}

impl ServiceModel {
    /// Creates an empty model.
    #[must_use]
    pub fn new(service: impl Into<ServiceName>, api_version: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            api_version: api_version.into(),
            operations: BTreeMap::new(),
            shapes: BTreeMap::new(),
        }
    }

    /// Adds or replaces a shape.
    #[must_use]
    pub fn with_shape(mut self, name: impl Into<ShapeName>, shape: Shape) -> Self {
        self.shapes.insert(name.into(), shape);
        self
    }

    /// Adds or replaces an operation.
    #[must_use]
    pub fn with_operation(mut self, operation: OperationModel) -> Self {
        self.insert_operation(operation);
        self
    }

    /// Adds or replaces an operation in place.
    pub fn insert_operation(&mut self, operation: OperationModel) {
        self.operations.insert(operation_key(&operation.name), operation);
    }

    /// Looks up an operation by client method or operation name.
    #[must_use]
    pub fn operation(&self, method: &str) -> Option<&OperationModel> {
        self.operations.get(&operation_key(method))
    }

    /// Returns true when the model defines the operation.
    #[must_use]
    pub fn has_operation(&self, method: &str) -> bool {
        self.operation(method).is_some()
    }

    /// Looks up a shape by name.
    #[must_use]
    pub fn shape(&self, name: &ShapeName) -> Option<&Shape> {
        self.shapes.get(name)
    }

    /// Returns the `snake_case` method names of every operation.
    #[must_use]
    pub fn method_names(&self) -> Vec<String> {
        self.operations.values().map(OperationModel::method_name).collect()
    }

    /// Returns the names of every modeled exception of the service.
    #[must_use]
    pub fn exceptions(&self) -> BTreeSet<String> {
        self.operations
            .values()
            .flat_map(|operation| operation.errors.iter())
            .map(|shape| shape.as_str().to_string())
            .collect()
    }

    /// Checks that every shape reference in the model resolves.
    ///
    /// # Errors
    ///
    /// Returns [`ModelLoadError::Invalid`] naming the first dangling reference.
    pub fn validate(&self) -> Result<(), ModelLoadError> {
        for operation in self.operations.values() {
            let refs = operation
                .input
                .iter()
                .chain(operation.output.iter())
                .chain(operation.errors.iter());
            for shape in refs {
                if !self.shapes.contains_key(shape) {
                    return Err(ModelLoadError::Invalid(format!(
                        "{}: operation {} references unknown shape {shape}",
                        self.service, operation.name
                    )));
                }
            }
        }
        for (name, shape) in &self.shapes {
            for reference in shape.references() {
                if !self.shapes.contains_key(reference) {
                    return Err(ModelLoadError::Invalid(format!(
                        "{}: shape {name} references unknown shape {reference}",
                        self.service
                    )));
                }
            }
        }
        Ok(())
    }
}
