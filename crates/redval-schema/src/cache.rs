//! # Bounded Schema Cache
//!
//! Maps schema file names to parsed schema documents so that schemas pulled
//! repeatedly across a large batch are fetched once, with memory capped at
//! [`SCHEMA_CACHE_CAPACITY`] entries.
//!
//! ## Eviction Is FIFO, Not LRU
//!
//! Entries are evicted in strict insertion order; a cache hit does not
//! re-promote. This is an intentional simplicity/performance trade-off
//! carried over from the original tool, and it is observable: the
//! from-cache and from-fetch counters differ from what an LRU would
//! produce. Do not "upgrade" it.

use std::collections::{HashMap, VecDeque};

use serde_json::Value;

use redval_core::ValidateError;

use crate::source::SchemaSource;

/// Maximum number of schema documents held at any time.
pub const SCHEMA_CACHE_CAPACITY: usize = 20;

/// A bounded, insertion-ordered store of parsed schema documents backed by
/// one [`SchemaSource`].
#[derive(Debug)]
pub struct SchemaCache {
    source: SchemaSource,
    entries: HashMap<String, Value>,
    /// Insertion order of `entries` keys; front is oldest.
    order: VecDeque<String>,
    capacity: usize,
    from_cache: u64,
    from_fetch: u64,
}

impl SchemaCache {
    /// A cache at the standard capacity backed by `source`.
    pub fn new(source: SchemaSource) -> Self {
        Self::with_capacity(source, SCHEMA_CACHE_CAPACITY)
    }

    /// A cache with an explicit capacity (tests exercise small bounds).
    pub fn with_capacity(source: SchemaSource, capacity: usize) -> Self {
        Self {
            source,
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
            from_cache: 0,
            from_fetch: 0,
        }
    }

    /// Return the parsed schema document for `schema_name`, fetching and
    /// parsing it on a miss.
    ///
    /// A hit increments the from-cache counter and leaves insertion order
    /// untouched. A miss fetches via the source, parses, stores, increments
    /// the from-fetch counter, and evicts the single oldest entry if the
    /// cache has grown past capacity.
    ///
    /// # Errors
    ///
    /// Source failures propagate unchanged; unparseable schema text is a
    /// [`ValidateError::SchemaParse`].
    pub fn get_or_fetch(&mut self, schema_name: &str) -> Result<&Value, ValidateError> {
        if self.entries.contains_key(schema_name) {
            self.from_cache += 1;
            return Ok(&self.entries[schema_name]);
        }

        let text = self.source.fetch(schema_name)?;
        let document: Value =
            serde_json::from_str(&text).map_err(|e| ValidateError::SchemaParse {
                schema_name: schema_name.to_string(),
                reason: e.to_string(),
            })?;

        self.order.push_back(schema_name.to_string());
        if self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                tracing::debug!(schema = %oldest, "evicting oldest cached schema");
                self.entries.remove(&oldest);
            }
        }
        self.entries.insert(schema_name.to_string(), document);
        self.from_fetch += 1;
        Ok(&self.entries[schema_name])
    }

    /// True if `schema_name` is currently cached.
    pub fn contains(&self, schema_name: &str) -> bool {
        self.entries.contains_key(schema_name)
    }

    /// Number of cached schema documents.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is cached yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Schema loads satisfied from the cache so far.
    pub fn from_cache(&self) -> u64 {
        self.from_cache
    }

    /// Schema loads satisfied by fetching from the source so far.
    pub fn from_fetch(&self) -> u64 {
        self.from_fetch
    }
}
