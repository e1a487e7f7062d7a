// crates/lobotomy-core/src/runtime/validator.rs
// ============================================================================
// Module: Request Validator
// Description: Presence checks of request arguments against the input shape.
// Purpose: Reject calls that a real client would refuse before sending.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Validation only enforces presence: every required member of the input
//! structure must be supplied, and every supplied top-level key must be a
//! declared member. Keys beginning with `_` are reserved for test helpers and
//! skip the unknown-argument check. Argument values are never type-checked.
//! All offending names are reported together, sorted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::LobotomyError;
use crate::core::OperationModel;
use crate::core::RequestArgs;
use crate::core::ServiceModel;
use crate::core::Shape;

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validates request arguments for an operation.
///
/// # Errors
///
/// Returns [`LobotomyError::MissingRequiredArguments`] naming every omitted
/// required member, or [`LobotomyError::UnknownArguments`] naming every
/// undeclared argument.
pub fn validate_request(
    model: &ServiceModel,
    operation: &OperationModel,
    request: &RequestArgs,
) -> Result<(), LobotomyError> {
    let structure = match operation.input.as_ref().and_then(|name| model.shape(name)) {
        Some(Shape::Structure(structure)) => Some(structure),
        _ => None,
    };

    if let Some(structure) = structure {
        let mut missing: Vec<String> = structure
            .required_members()
            .filter(|member| !request.contains(&member.name))
            .map(|member| member.name.clone())
            .collect();
        if !missing.is_empty() {
            missing.sort();
            return Err(LobotomyError::MissingRequiredArguments {
                service: model.service.clone(),
                method: operation.method_name(),
                missing,
            });
        }
    }

    let mut unknown: Vec<String> = request
        .keys()
        .filter(|key| !key.starts_with('_'))
        .filter(|key| structure.is_none_or(|structure| structure.member(key).is_none()))
        .map(str::to_string)
        .collect();
    if unknown.is_empty() {
        return Ok(());
    }
    unknown.sort();
    Err(LobotomyError::UnknownArguments {
        service: model.service.clone(),
        method: operation.method_name(),
        unknown,
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================
