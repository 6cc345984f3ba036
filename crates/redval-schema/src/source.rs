//! # Schema Sources
//!
//! Two interchangeable strategies for retrieving raw schema text by file
//! name, selected once per run:
//!
//! - [`SchemaSource::Local`] reads `<schema_dir>/<schema_name>` from a
//!   directory of DMTF schema files.
//! - [`SchemaSource::Remote`] issues a blocking `GET <origin><schema_name>`
//!   against a schema origin such as `http://redfish.dmtf.org/schemas/v1/`.
//!
//! Both return raw text; parsing into a schema document happens at the cache
//! layer and fails independently with `SchemaParse`.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use redval_core::ValidateError;

/// Default remote origin for published DMTF Redfish schemas.
pub const DMTF_SCHEMA_ORIGIN: &str = "http://redfish.dmtf.org/schemas/v1/";

/// Where schema documents are fetched from on a cache miss.
pub enum SchemaSource {
    /// A local directory containing schema files named `<SchemaName>`.
    Local {
        /// Directory holding the schema files.
        schema_dir: PathBuf,
    },
    /// A remote HTTP origin serving schema files under a base URL.
    Remote {
        /// Base URL; schema names are appended directly, so it must end
        /// with a trailing slash.
        origin: Url,
        /// Blocking client with the run's configured timeout.
        client: reqwest::blocking::Client,
    },
}

impl SchemaSource {
    /// A source reading schemas from a local directory.
    pub fn local(schema_dir: impl Into<PathBuf>) -> Self {
        Self::Local {
            schema_dir: schema_dir.into(),
        }
    }

    /// A source fetching schemas from a remote origin with the given
    /// request timeout.
    ///
    /// # Errors
    ///
    /// Returns the underlying client construction error, which the CLI
    /// treats as an operational (run-fatal) failure.
    pub fn remote(origin: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self::Remote { origin, client })
    }

    /// Fetch the raw text of one schema file.
    ///
    /// # Errors
    ///
    /// - [`ValidateError::SchemaNotFound`] — local file absent or unreadable.
    /// - [`ValidateError::SchemaFetch`] — remote origin answered with a
    ///   non-success status; carries the status code and schema name.
    /// - [`ValidateError::SchemaRequest`] — remote request failed before a
    ///   status was received.
    pub fn fetch(&self, schema_name: &str) -> Result<String, ValidateError> {
        match self {
            Self::Local { schema_dir } => {
                let path = schema_dir.join(schema_name);
                std::fs::read_to_string(&path).map_err(|e| ValidateError::SchemaNotFound {
                    schema_name: schema_name.to_string(),
                    reason: format!("{}: {e}", path.display()),
                })
            }
            Self::Remote { origin, client } => {
                let url = origin.join(schema_name).map_err(|e| {
                    ValidateError::SchemaRequest {
                        schema_name: schema_name.to_string(),
                        reason: format!("invalid schema URL: {e}"),
                    }
                })?;
                tracing::debug!(url = %url, "fetching schema from origin");
                let response =
                    client
                        .get(url)
                        .send()
                        .map_err(|e| ValidateError::SchemaRequest {
                            schema_name: schema_name.to_string(),
                            reason: e.to_string(),
                        })?;
                let status = response.status();
                if !status.is_success() {
                    return Err(ValidateError::SchemaFetch {
                        schema_name: schema_name.to_string(),
                        status: status.as_u16(),
                    });
                }
                response.text().map_err(|e| ValidateError::SchemaRequest {
                    schema_name: schema_name.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }
}

impl std::fmt::Debug for SchemaSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local { schema_dir } => f
                .debug_struct("SchemaSource::Local")
                .field("schema_dir", schema_dir)
                .finish(),
            Self::Remote { origin, .. } => f
                .debug_struct("SchemaSource::Remote")
                .field("origin", &origin.as_str())
                .finish_non_exhaustive(),
        }
    }
}
