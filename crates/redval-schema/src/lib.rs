#![deny(missing_docs)]

//! # redval-schema — Schema Retrieval and Validation
//!
//! Supplies schema documents to the batch runner and runs structural
//! validation of resources against them.
//!
//! ## Pipeline Position
//!
//! The batch runner derives a schema file name from a resource's
//! `@odata.type` (see `redval-core`), then asks [`SchemaCache::get_or_fetch`]
//! for the parsed schema document. The cache pulls misses from its
//! [`SchemaSource`] — a local directory of DMTF schema files or the remote
//! DMTF origin — and evicts in strict insertion order once it holds 20
//! entries. [`validate_resource`] then reports filtered, deterministically
//! ordered violation messages.
//!
//! ## Draft Semantics
//!
//! Validation uses JSON Schema Draft 4 via the `jsonschema` crate, matching
//! the draft the published DMTF schemas target.

pub mod cache;
pub mod source;
pub mod validate;

pub use cache::{SchemaCache, SCHEMA_CACHE_CAPACITY};
pub use source::{SchemaSource, DMTF_SCHEMA_ORIGIN};
pub use validate::validate_resource;
