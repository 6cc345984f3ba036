//! # Error Hierarchy
//!
//! Structured error types for the validator, built with `thiserror`.
//!
//! Every variant corresponds to one way a single resource can fail on its
//! path through the pipeline: loading, parsing, type resolution, schema
//! retrieval, or schema parsing. All of them are caught at the per-resource
//! boundary by the batch runner, recorded, counted, and skipped — none of
//! them aborts a batch.

use thiserror::Error;

/// A per-resource failure anywhere in the resolution-and-validation pipeline.
#[derive(Error, Debug)]
pub enum ValidateError {
    /// The resource document has no `@odata.type` field (and its provenance
    /// path is not one of the exempt index documents).
    #[error("missing @odata.type")]
    MissingTypeIdentifier,

    /// The `@odata.type` value matched neither the version-qualified nor the
    /// bare form.
    #[error("malformed @odata.type: \"{0}\"")]
    MalformedTypeIdentifier(String),

    /// The resource could not be read from its file or URL.
    #[error("failed to load resource '{path}': {reason}")]
    ResourceLoad {
        /// Provenance of the resource (file path or URL).
        path: String,
        /// Why the load failed.
        reason: String,
    },

    /// The resource bytes were not valid JSON.
    #[error("json load failed for '{path}': {reason}")]
    ResourceParse {
        /// Provenance of the resource (file path or URL).
        path: String,
        /// The JSON parser's diagnostic.
        reason: String,
    },

    /// A local schema file was absent or unreadable.
    #[error("schema not found: '{schema_name}' ({reason})")]
    SchemaNotFound {
        /// The derived schema file name that was looked up.
        schema_name: String,
        /// Why the read failed.
        reason: String,
    },

    /// The remote schema origin answered with a non-success status.
    #[error("schema fetch failed for '{schema_name}': HTTP status {status}")]
    SchemaFetch {
        /// The derived schema file name that was requested.
        schema_name: String,
        /// The HTTP status code returned by the origin.
        status: u16,
    },

    /// The request to the remote schema origin failed before a status was
    /// received (connection refused, timeout, bad URL).
    #[error("schema request failed for '{schema_name}': {reason}")]
    SchemaRequest {
        /// The derived schema file name that was requested.
        schema_name: String,
        /// The transport-level diagnostic.
        reason: String,
    },

    /// Schema bytes were retrieved but are not valid JSON, or do not compile
    /// into a usable Draft 4 validator.
    #[error("schema parse failed for '{schema_name}': {reason}")]
    SchemaParse {
        /// The schema file name whose content was rejected.
        schema_name: String,
        /// The parser or compiler diagnostic.
        reason: String,
    },
}

impl ValidateError {
    /// The schema name this failure concerns, when it has one.
    ///
    /// Used by the error log so that schema-side failures name the schema
    /// in their recorded block.
    pub fn schema_name(&self) -> Option<&str> {
        match self {
            ValidateError::SchemaNotFound { schema_name, .. }
            | ValidateError::SchemaFetch { schema_name, .. }
            | ValidateError::SchemaRequest { schema_name, .. }
            | ValidateError::SchemaParse { schema_name, .. } => Some(schema_name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_type_identifier_display() {
        let err = ValidateError::MissingTypeIdentifier;
        assert!(format!("{err}").contains("@odata.type"));
    }

    #[test]
    fn malformed_type_identifier_carries_input() {
        let err = ValidateError::MalformedTypeIdentifier("#Foo-Bar.Baz".to_string());
        assert!(format!("{err}").contains("#Foo-Bar.Baz"));
    }

    #[test]
    fn schema_fetch_carries_status_and_name() {
        let err = ValidateError::SchemaFetch {
            schema_name: "Chassis.v1_0_0.json".to_string(),
            status: 404,
        };
        let msg = format!("{err}");
        assert!(msg.contains("Chassis.v1_0_0.json"));
        assert!(msg.contains("404"));
    }

    #[test]
    fn schema_name_accessor() {
        let err = ValidateError::SchemaNotFound {
            schema_name: "Thermal.json".to_string(),
            reason: "no such file".to_string(),
        };
        assert_eq!(err.schema_name(), Some("Thermal.json"));
        assert_eq!(ValidateError::MissingTypeIdentifier.schema_name(), None);
    }
}
