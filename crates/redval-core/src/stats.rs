//! # Run Counters
//!
//! Process-wide tallies for one batch run, held in a single struct threaded
//! through the runner by mutable reference. Initialized at run start,
//! printed once at run end, then discarded.

use std::fmt;

/// Counters accumulated across a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Resources loaded and counted (including exempt index documents).
    pub resources: u64,
    /// Failures recorded: violations plus per-resource operational errors.
    pub errors: u64,
    /// Schema loads satisfied by fetching from the configured source.
    pub from_fetch: u64,
    /// Schema loads satisfied from the bounded cache.
    pub from_cache: u64,
}

impl RunStats {
    /// A zeroed counter set.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Final summary block, formatted the way the error-count line and cache
/// statistics are expected by downstream tooling.
pub struct Summary<'a> {
    /// The counters to print.
    pub stats: &'a RunStats,
    /// The error log path named when the error count is non-zero.
    pub errfile: &'a str,
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n{} resources validated.", self.stats.resources)?;
        if self.stats.errors > 0 {
            writeln!(f, "{} errors. See {}", self.stats.errors, self.errfile)?;
        } else {
            writeln!(f, "0 errors")?;
        }
        writeln!(f, "schemas returned from GET  {}", self.stats.from_fetch)?;
        write!(f, "schemas returned from cache {}", self.stats.from_cache)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_clean_run() {
        let stats = RunStats {
            resources: 1,
            errors: 0,
            from_fetch: 1,
            from_cache: 0,
        };
        let out = Summary {
            stats: &stats,
            errfile: "./validate_errs",
        }
        .to_string();
        assert!(out.contains("1 resources validated."));
        assert!(out.contains("0 errors"));
        assert!(!out.contains("See"));
    }

    #[test]
    fn summary_names_errfile_on_errors() {
        let stats = RunStats {
            resources: 3,
            errors: 2,
            from_fetch: 1,
            from_cache: 2,
        };
        let out = Summary {
            stats: &stats,
            errfile: "./validate_errs",
        }
        .to_string();
        assert!(out.contains("2 errors. See ./validate_errs"));
        assert!(out.contains("schemas returned from GET  1"));
        assert!(out.contains("schemas returned from cache 2"));
    }
}
