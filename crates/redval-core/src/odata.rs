//! # `@odata.type` Resolution
//!
//! Parses a resource's embedded type identifier into its components and
//! derives the schema file name used to look the schema up, locally or at
//! the DMTF origin.
//!
//! ## Accepted Forms
//!
//! - Version-qualified: `#Namespace.Version.TypeName`, where the version may
//!   itself contain periods and underscores (`#Chassis.v1_0_0.Chassis`).
//! - Bare: `#Namespace.TypeName` (`#ServiceRoot.ServiceRoot`).
//!
//! Namespace and type name are strictly alphanumeric; anything else is a
//! [`ValidateError::MalformedTypeIdentifier`].

use serde_json::Value;

use crate::error::ValidateError;

/// The JSON field carrying a Redfish resource's type identifier.
pub const ODATA_TYPE_FIELD: &str = "@odata.type";

/// Path suffixes of the two well-known index documents that legitimately
/// carry no `@odata.type`. Resources whose provenance ends in one of these
/// are counted but not validated against any schema.
pub const SCHEMA_EXEMPT_SUFFIXES: [&str; 2] =
    ["redfish/index.json", "redfish/v1/odata/index.json"];

/// Returns true if `path` names one of the schema-less index documents.
pub fn is_schema_exempt(path: &str) -> bool {
    SCHEMA_EXEMPT_SUFFIXES
        .iter()
        .any(|suffix| path.ends_with(suffix))
}

/// A parsed `@odata.type` identifier.
///
/// Construction via [`OdataType::parse`] is the only way to obtain one, so
/// every instance satisfies the format invariants and
/// [`OdataType::schema_name`] is total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OdataType {
    namespace: String,
    version: Option<String>,
    type_name: String,
}

impl OdataType {
    /// Parse a raw `@odata.type` string.
    ///
    /// The version-qualified form is tried first, then the bare form,
    /// matching the original DMTF tool's two-pattern fallback.
    ///
    /// # Errors
    ///
    /// Returns [`ValidateError::MalformedTypeIdentifier`] if neither form
    /// matches.
    pub fn parse(raw: &str) -> Result<Self, ValidateError> {
        let malformed = || ValidateError::MalformedTypeIdentifier(raw.to_string());

        let body = raw.strip_prefix('#').ok_or_else(malformed)?;

        // Version-qualified: namespace up to the first dot, type name after
        // the last dot, version in between (periods and underscores allowed).
        if let (Some(first), Some(last)) = (body.find('.'), body.rfind('.')) {
            if first < last {
                let namespace = &body[..first];
                let version = &body[first + 1..last];
                let type_name = &body[last + 1..];
                if is_alphanumeric(namespace)
                    && is_version(version)
                    && is_alphanumeric(type_name)
                {
                    return Ok(Self {
                        namespace: namespace.to_string(),
                        version: Some(version.to_string()),
                        type_name: type_name.to_string(),
                    });
                }
                return Err(malformed());
            }
        }

        // Bare: exactly one dot separating namespace and type name.
        if let Some((namespace, type_name)) = body.split_once('.') {
            if is_alphanumeric(namespace) && is_alphanumeric(type_name) {
                return Ok(Self {
                    namespace: namespace.to_string(),
                    version: None,
                    type_name: type_name.to_string(),
                });
            }
        }

        Err(malformed())
    }

    /// Extract and parse the `@odata.type` field of a resource document.
    ///
    /// # Errors
    ///
    /// Returns [`ValidateError::MissingTypeIdentifier`] if the field is
    /// absent, or [`ValidateError::MalformedTypeIdentifier`] if present but
    /// not a parseable string. Exemption checks are the caller's concern —
    /// they depend on provenance, not document content.
    pub fn from_resource(resource: &Value) -> Result<Self, ValidateError> {
        let raw = resource
            .get(ODATA_TYPE_FIELD)
            .ok_or(ValidateError::MissingTypeIdentifier)?;
        let raw = raw
            .as_str()
            .ok_or_else(|| ValidateError::MalformedTypeIdentifier(raw.to_string()))?;
        Self::parse(raw)
    }

    /// The namespace component.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The version component, when the identifier carried one.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// The type name component.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Derive the schema file name: `Namespace.Version.json` when a version
    /// is present, else `Namespace.json`. No trailing empty segment is ever
    /// produced.
    pub fn schema_name(&self) -> String {
        match &self.version {
            Some(version) => format!("{}.{}.json", self.namespace, version),
            None => format!("{}.json", self.namespace),
        }
    }
}

impl std::fmt::Display for OdataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.version {
            Some(version) => {
                write!(f, "#{}.{}.{}", self.namespace, version, self.type_name)
            }
            None => write!(f, "#{}.{}", self.namespace, self.type_name),
        }
    }
}

fn is_alphanumeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric())
}

fn is_version(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
}
