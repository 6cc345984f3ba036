//! # redval-cli — Redfish Response Validator CLI
//!
//! Provides the `redval` command, a Rust reimplementation of the DMTF
//! `Redfish-JsonSchema-ResponseValidator` Python tool: it validates Redfish
//! resource documents against the DMTF JSON schemas named by each resource's
//! `@odata.type`.
//!
//! ## Input Modes
//!
//! One of five mutually exclusive modes per run:
//!
//! - default — scan a mockup directory tree for `index.json` resources
//! - `--files` — validate an explicit list of mockup-relative resources
//! - `--local-file` — validate a single local JSON file
//! - `--rhost` — pull one resource from a live service with basic auth
//! - `--replay-errors` — re-validate only resources that failed a prior run
//!
//! ## Output Compatibility
//!
//! The console summary and the error log layout match the Python tool
//! exactly; the log is parsed back by `--replay-errors`, so its format is a
//! stable interface, not cosmetics.

pub mod errlog;
pub mod live;
pub mod run;
