//! # Structural Validation
//!
//! Runs one resource against one schema document under JSON Schema Draft 4
//! semantics and reports filtered violation messages.
//!
//! ## Determinism
//!
//! The `jsonschema` crate's error iteration order is unspecified, so raw
//! violations are sorted by their string representation before filtering.
//! Validating the same resource against the same schema twice yields the
//! same ordered list both times.

use serde_json::Value;

use redval_core::{ExclusionSet, ValidateError};

/// Validate `resource` against `schema` and return the violation messages
/// that survive exclusion filtering, in sorted order.
///
/// Violations are not deduplicated beyond the library's own output. An empty
/// vector means the resource conforms (or every violation was excluded).
///
/// # Errors
///
/// Returns [`ValidateError::SchemaParse`] if the schema document does not
/// compile into a Draft 4 validator; `schema_name` is only used for that
/// diagnostic.
pub fn validate_resource(
    resource: &Value,
    schema: &Value,
    schema_name: &str,
    excludes: &ExclusionSet,
) -> Result<Vec<String>, ValidateError> {
    let mut opts = jsonschema::options();
    opts.with_draft(jsonschema::Draft::Draft4);
    let validator = opts.build(schema).map_err(|e| ValidateError::SchemaParse {
        schema_name: schema_name.to_string(),
        reason: e.to_string(),
    })?;

    let mut messages: Vec<String> = validator
        .iter_errors(resource)
        .map(|e| e.to_string())
        .collect();
    messages.sort();
    messages.retain(|m| !excludes.is_excluded(m));
    Ok(messages)
}
