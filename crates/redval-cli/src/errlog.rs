//! # Error Log
//!
//! The durable artifact of a run: a plain-text log of every recorded
//! failure, appended as the batch progresses. Its exact layout is
//! load-bearing — failure-replay mode parses it back to recover the set of
//! resources that failed a previous run. Each record is a block of
//!
//! ```text
//! \n\n<resource path>\n  schema: <schema name>\n>>><message>
//! ```
//!
//! The log is truncated at run start in every mode except replay, where it
//! is the input, not the output.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Append-oriented writer for the validation error log.
#[derive(Debug)]
pub struct ErrorLog {
    file: File,
    path: PathBuf,
}

impl ErrorLog {
    /// Create (truncating) the log at `path` for the duration of the run.
    pub fn create(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        let file = File::create(&path)?;
        Ok(Self { file, path })
    }

    /// Where the log lives, for the end-of-run summary.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one failure block.
    ///
    /// `schema_name` is empty for failures that occur before a schema name
    /// was derived (load, parse, and type-resolution errors).
    pub fn record(
        &mut self,
        message: &str,
        resource_path: &str,
        schema_name: &str,
    ) -> std::io::Result<()> {
        write!(
            self.file,
            "\n\n{resource_path}\n  schema: {schema_name}\n>>>{message}"
        )
    }
}

/// Recover the resource identifiers recorded as failing in a prior log.
///
/// Scans for lines containing `mockup_dir`, strips that prefix and the
/// trailing `/index.json` suffix, and de-duplicates. The result is sorted so
/// replay order is reproducible.
pub fn replay_targets(log_path: &Path, mockup_dir: &str) -> std::io::Result<Vec<String>> {
    let reader = BufReader::new(File::open(log_path)?);
    let mut targets = BTreeSet::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        // Only the resource-path line of each block is a candidate; message
        // lines carry the `>>>` prefix and may themselves mention the
        // mockup root.
        if !line.starts_with(">>>") && line.contains(mockup_dir) {
            let target = line.replace(mockup_dir, "").replace("/index.json", "");
            targets.insert(target);
        }
    }
    Ok(targets.into_iter().collect())
}
