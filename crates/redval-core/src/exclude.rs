//! # Violation Exclusion Sets
//!
//! An [`ExclusionSet`] is an ordered list of substrings built once from
//! configuration. A violation message containing any member is suppressed
//! silently — not reported, not counted.

/// Substring patterns that suppress matching violation messages.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    patterns: Vec<String>,
}

impl ExclusionSet {
    /// Build from a comma-separated configuration string.
    ///
    /// Empty segments are dropped, so an empty or all-comma input yields an
    /// empty set that excludes nothing.
    pub fn from_csv(csv: &str) -> Self {
        let patterns = csv
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        Self { patterns }
    }

    /// True if `message` contains any member pattern.
    pub fn is_excluded(&self, message: &str) -> bool {
        self.patterns.iter().any(|p| message.contains(p))
    }

    /// True if the set has no patterns.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// The member patterns, in configuration order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}
