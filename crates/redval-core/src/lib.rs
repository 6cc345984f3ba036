#![deny(missing_docs)]

//! # redval-core — Foundational Types for the Redfish Response Validator
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It has no internal crate dependencies — only `serde_json` and
//! `thiserror` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Typed identifiers.** An `@odata.type` string is parsed once into an
//!    [`OdataType`] at the boundary; schema file names are derived from it,
//!    never re-parsed from raw strings downstream.
//!
//! 2. **[`ValidateError`] hierarchy.** Structured errors with `thiserror` —
//!    no sentinel return values, no `.unwrap()` outside tests.
//!
//! 3. **No globals.** All run counters live in a [`RunStats`] struct that is
//!    threaded through the batch by mutable reference.

pub mod error;
pub mod exclude;
pub mod odata;
pub mod stats;

// Re-export primary types at crate root for ergonomic imports.
pub use error::ValidateError;
pub use exclude::ExclusionSet;
pub use odata::{is_schema_exempt, OdataType, SCHEMA_EXEMPT_SUFFIXES};
pub use stats::{RunStats, Summary};
