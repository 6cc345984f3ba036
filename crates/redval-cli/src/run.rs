//! # Batch Runner
//!
//! Drives one of five mutually exclusive input modes over the shared
//! per-resource pipeline: load → parse → resolve `@odata.type` (or
//! exemption) → fetch schema through the cache → validate → accumulate.
//!
//! A failure at any stage of one resource increments the error counter,
//! records to the error log, and moves on to the next resource — the run is
//! as complete as possible, never all-or-nothing. The one exception is live
//! mode, where the single resource's connection failure ends the run.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::Value;
use url::Url;

use redval_core::{is_schema_exempt, ExclusionSet, OdataType, RunStats, ValidateError};
use redval_schema::{validate_resource, SchemaCache, SchemaSource, DMTF_SCHEMA_ORIGIN};

use crate::errlog::{replay_targets, ErrorLog};
use crate::live::LiveTarget;

/// Everything one run needs, assembled from the CLI surface.
#[derive(Debug)]
pub struct RunConfig {
    /// Root of the captured mockup tree. Kept as a string because replay
    /// recovers resource identifiers by substring-stripping this prefix
    /// from error log lines.
    pub mockup_dir: String,
    /// Directory of local DMTF schema files.
    pub schema_dir: PathBuf,
    /// Fetch schemas from the DMTF origin instead of `schema_dir`.
    pub schema_org: bool,
    /// Error log location.
    pub errfile: PathBuf,
    /// Comma-separated mockup-relative resource identifiers.
    pub files: Option<String>,
    /// Single local JSON file to validate.
    pub local_file: Option<PathBuf>,
    /// Live service to pull one resource from.
    pub live: Option<LiveTarget>,
    /// Re-validate only resources recorded as failing in a prior log.
    pub replay: bool,
    /// Violation-message substrings to suppress.
    pub excludes: ExclusionSet,
    /// HTTP timeout for schema-origin fetches.
    pub timeout: Duration,
    /// Print resource JSON as it is processed.
    pub verbose: bool,
}

/// The five mutually exclusive input modes, in selection precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Re-run resources recorded as failing in a prior error log.
    FailureReplay,
    /// One HTTP GET against a live service.
    LiveFetch,
    /// One local JSON file.
    LocalFile,
    /// A de-duplicated list of mockup-relative identifiers.
    ExplicitList,
    /// Recursive scan for `index.json` files under the mockup root.
    DirectoryScan,
}

impl RunConfig {
    /// Select the run mode. Chosen once at startup; modes never mix.
    pub fn mode(&self) -> Mode {
        if self.replay {
            Mode::FailureReplay
        } else if self.live.is_some() {
            Mode::LiveFetch
        } else if self.local_file.is_some() {
            Mode::LocalFile
        } else if self.files.is_some() {
            Mode::ExplicitList
        } else {
            Mode::DirectoryScan
        }
    }
}

/// Run the configured mode to completion and return the final counters.
pub fn execute(config: &RunConfig) -> Result<RunStats> {
    BatchRunner::new(config)?.run()
}

/// Per-run state: the schema cache, the counters, and the error log.
struct BatchRunner<'a> {
    config: &'a RunConfig,
    cache: SchemaCache,
    stats: RunStats,
    /// Absent in replay mode, where the log is input rather than output.
    log: Option<ErrorLog>,
}

impl<'a> BatchRunner<'a> {
    fn new(config: &'a RunConfig) -> Result<Self> {
        let source = if config.schema_org {
            let origin = Url::parse(DMTF_SCHEMA_ORIGIN).context("invalid schema origin URL")?;
            SchemaSource::remote(origin, config.timeout)
                .context("failed to build schema origin client")?
        } else {
            SchemaSource::local(&config.schema_dir)
        };

        let log = if config.replay {
            None
        } else {
            Some(ErrorLog::create(&config.errfile).with_context(|| {
                format!("cannot create error log at {}", config.errfile.display())
            })?)
        };

        Ok(Self {
            config,
            cache: SchemaCache::new(source),
            stats: RunStats::new(),
            log,
        })
    }

    fn run(mut self) -> Result<RunStats> {
        match self.config.mode() {
            Mode::DirectoryScan => self.scan_directory(),
            Mode::ExplicitList => {
                let targets = explicit_targets(self.config.files.as_deref().unwrap_or(""));
                self.run_targets(&targets);
            }
            Mode::LocalFile => self.run_local_file()?,
            Mode::LiveFetch => self.run_live()?,
            Mode::FailureReplay => {
                let targets = replay_targets(&self.config.errfile, &self.config.mockup_dir)
                    .with_context(|| {
                        format!("cannot read error log at {}", self.config.errfile.display())
                    })?;
                self.run_targets(&targets);
            }
        }

        self.stats.from_cache = self.cache.from_cache();
        self.stats.from_fetch = self.cache.from_fetch();
        Ok(self.stats)
    }

    /// Walk the mockup tree validating every `index.json`.
    fn scan_directory(&mut self) {
        for path in find_index_files(Path::new(&self.config.mockup_dir)) {
            let fname = path.display().to_string();
            println!("{fname}");
            self.process_file(&fname, false);
        }
    }

    /// Validate `<mockup>/<target>/index.json` for each identifier.
    fn run_targets(&mut self, targets: &[String]) {
        for target in targets {
            let fname = format!("{}/{}/index.json", self.config.mockup_dir, target);
            println!("\n{fname}");
            self.process_file(&fname, false);
        }
    }

    /// Validate exactly one local JSON file, announcing its schema name.
    fn run_local_file(&mut self) -> Result<()> {
        // Mode selection guarantees the path is present.
        let file = self
            .config
            .local_file
            .clone()
            .context("local-file mode without a path")?;
        let fname = file.display().to_string();
        println!("\n{fname}");
        self.process_file(&fname, true);
        Ok(())
    }

    /// GET one resource from a live service and validate it. Transport
    /// failures are fatal here — there is nothing else to process.
    fn run_live(&mut self) -> Result<()> {
        let target = self
            .config
            .live
            .clone()
            .context("live mode without a target")?;
        println!("{}", target.request_url());

        let body = crate::live::fetch_resource(&target)?;
        if self.config.verbose {
            println!("{body}");
        }

        let data: Value = match serde_json::from_str(&body) {
            Ok(data) => data,
            Err(e) => {
                let err = ValidateError::ResourceParse {
                    path: target.url.clone(),
                    reason: e.to_string(),
                };
                self.fail(&err.to_string(), &target.url, "");
                return Ok(());
            }
        };
        self.process_resource(&data, &target.url, false);
        Ok(())
    }

    /// Load and parse one resource file, then push it through the pipeline.
    fn process_file(&mut self, fname: &str, announce_schema: bool) {
        let text = match std::fs::read_to_string(fname) {
            Ok(text) => text,
            Err(e) => {
                let err = ValidateError::ResourceLoad {
                    path: fname.to_string(),
                    reason: e.to_string(),
                };
                self.fail(&err.to_string(), fname, "");
                return;
            }
        };
        if self.config.verbose {
            println!("{text}\n");
        }
        let data: Value = match serde_json::from_str(&text) {
            Ok(data) => data,
            Err(e) => {
                let err = ValidateError::ResourceParse {
                    path: fname.to_string(),
                    reason: e.to_string(),
                };
                self.fail(&err.to_string(), fname, "");
                return;
            }
        };
        self.process_resource(&data, fname, announce_schema);
    }

    /// Resolve the resource's type, fetch its schema through the cache, and
    /// record whatever violations survive exclusion filtering.
    fn process_resource(&mut self, data: &Value, provenance: &str, announce_schema: bool) {
        let odata_type = match OdataType::from_resource(data) {
            Ok(odata_type) => odata_type,
            Err(err @ ValidateError::MissingTypeIdentifier) => {
                if is_schema_exempt(provenance) {
                    // The two well-known index documents are valid without a
                    // type; counted but never checked against a schema.
                    self.stats.resources += 1;
                } else {
                    self.fail(&err.to_string(), provenance, "");
                }
                return;
            }
            Err(err) => {
                self.fail(&err.to_string(), provenance, "");
                return;
            }
        };

        let schema_name = odata_type.schema_name();
        if announce_schema {
            println!("JSON schema name is {schema_name}");
        }
        self.stats.resources += 1;

        let schema = match self.cache.get_or_fetch(&schema_name) {
            Ok(schema) => schema,
            Err(err) => {
                let name = err.schema_name().unwrap_or(&schema_name).to_string();
                self.fail(&err.to_string(), provenance, &name);
                return;
            }
        };

        match validate_resource(data, schema, &schema_name, &self.config.excludes) {
            Ok(violations) => {
                for message in violations {
                    self.fail(&message, provenance, &schema_name);
                }
            }
            Err(err) => {
                self.fail(&err.to_string(), provenance, &schema_name);
            }
        }
    }

    /// Record one failure: console line, counter, and (outside replay mode)
    /// an error log block.
    fn fail(&mut self, message: &str, resource_path: &str, schema_name: &str) {
        println!(">>> {message}");
        self.stats.errors += 1;
        if let Some(log) = &mut self.log {
            if let Err(e) = log.record(message, resource_path, schema_name) {
                tracing::warn!(error = %e, "failed to append to error log");
            }
        }
    }
}

/// De-duplicate a comma-separated identifier list. Sorted so processing
/// order is reproducible; the set itself is unordered by contract.
fn explicit_targets(files: &str) -> Vec<String> {
    files
        .split(',')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Recursively collect every file named `index.json` under `dir`, sorted.
fn find_index_files(dir: &Path) -> Vec<PathBuf> {
    let mut acc = Vec::new();
    walk_for_index(dir, &mut acc);
    acc.sort();
    acc
}

fn walk_for_index(dir: &Path, acc: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "failed to read directory during scan");
            return;
        }
    };
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "failed to read directory entry");
                continue;
            }
        };
        let path = entry.path();
        if path.is_dir() {
            walk_for_index(&path, acc);
        } else if path.file_name().and_then(|f| f.to_str()) == Some("index.json") {
            acc.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A mockup tree and schema directory under one tempdir, with a config
    /// pointing at them.
    struct Fixture {
        dir: tempfile::TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            std::fs::create_dir_all(dir.path().join("schemas")).unwrap();
            std::fs::create_dir_all(dir.path().join("mockup")).unwrap();
            Self { dir }
        }

        fn mockup_dir(&self) -> String {
            self.dir.path().join("mockup").display().to_string()
        }

        fn write_resource(&self, rel: &str, content: &str) {
            let path = self.dir.path().join("mockup").join(rel).join("index.json");
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, content).unwrap();
        }

        fn write_schema(&self, name: &str, content: &str) {
            std::fs::write(self.dir.path().join("schemas").join(name), content).unwrap();
        }

        fn config(&self) -> RunConfig {
            RunConfig {
                mockup_dir: self.mockup_dir(),
                schema_dir: self.dir.path().join("schemas"),
                schema_org: false,
                errfile: self.dir.path().join("validate_errs"),
                files: None,
                local_file: None,
                live: None,
                replay: false,
                excludes: ExclusionSet::default(),
                timeout: Duration::from_secs(30),
                verbose: false,
            }
        }
    }

    const CHASSIS_RESOURCE: &str =
        r##"{ "@odata.type": "#Chassis.v1_0_0.Chassis", "Name": "Chassis 1", "Id": "1" }"##;
    const PERMISSIVE_SCHEMA: &str = r#"{ "type": "object" }"#;
    const REQUIRES_SERIAL_SCHEMA: &str =
        r#"{ "type": "object", "required": ["SerialNumber"] }"#;

    #[test]
    fn mode_selection_precedence() {
        let fixture = Fixture::new();
        let mut config = fixture.config();
        assert_eq!(config.mode(), Mode::DirectoryScan);

        config.files = Some("a,b".to_string());
        assert_eq!(config.mode(), Mode::ExplicitList);

        config.local_file = Some(PathBuf::from("r.json"));
        assert_eq!(config.mode(), Mode::LocalFile);

        config.live = Some(LiveTarget {
            host: "10.0.0.5".to_string(),
            url: "/redfish/v1".to_string(),
            user: "root".to_string(),
            password: "calvin".to_string(),
            insecure: false,
            timeout: Duration::from_secs(30),
        });
        assert_eq!(config.mode(), Mode::LiveFetch);

        config.replay = true;
        assert_eq!(config.mode(), Mode::FailureReplay);
    }

    #[test]
    fn clean_mockup_validates_with_zero_errors() {
        let fixture = Fixture::new();
        fixture.write_resource("redfish/v1/Chassis", CHASSIS_RESOURCE);
        fixture.write_schema("Chassis.v1_0_0.json", PERMISSIVE_SCHEMA);

        let stats = execute(&fixture.config()).unwrap();
        assert_eq!(stats.resources, 1);
        assert_eq!(stats.errors, 0);
        assert_eq!(stats.from_fetch, 1);
        assert_eq!(stats.from_cache, 0);
    }

    #[test]
    fn violation_is_counted_and_logged() {
        let fixture = Fixture::new();
        fixture.write_resource("redfish/v1/Chassis", CHASSIS_RESOURCE);
        fixture.write_schema("Chassis.v1_0_0.json", REQUIRES_SERIAL_SCHEMA);
        let config = fixture.config();

        let stats = execute(&config).unwrap();
        assert_eq!(stats.resources, 1);
        assert_eq!(stats.errors, 1);

        let log = std::fs::read_to_string(&config.errfile).unwrap();
        assert!(log.contains("redfish/v1/Chassis/index.json"));
        assert!(log.contains("schema: Chassis.v1_0_0.json"));
        assert!(log.contains("SerialNumber"));
    }

    #[test]
    fn missing_type_identifier_is_one_error_without_validation() {
        let fixture = Fixture::new();
        fixture.write_resource("redfish/v1/Mystery", r#"{ "Name": "no type" }"#);

        let stats = execute(&fixture.config()).unwrap();
        assert_eq!(stats.resources, 0, "unresolved resource is not counted");
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.from_fetch, 0, "no schema lookup may occur");
        assert_eq!(stats.from_cache, 0);
    }

    #[test]
    fn exempt_index_documents_are_counted_not_checked() {
        let fixture = Fixture::new();
        fixture.write_resource("redfish", r#"{ "v1": "/redfish/v1" }"#);
        fixture.write_resource("redfish/v1/odata", r#"{ "value": [] }"#);

        let stats = execute(&fixture.config()).unwrap();
        assert_eq!(stats.resources, 2);
        assert_eq!(stats.errors, 0);
        assert_eq!(stats.from_fetch, 0);
    }

    #[test]
    fn malformed_type_identifier_is_recorded() {
        let fixture = Fixture::new();
        fixture.write_resource(
            "redfish/v1/Odd",
            r##"{ "@odata.type": "#Foo-Bar.Baz" }"##,
        );
        let config = fixture.config();

        let stats = execute(&config).unwrap();
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.from_fetch, 0);
        let log = std::fs::read_to_string(&config.errfile).unwrap();
        assert!(log.contains("#Foo-Bar.Baz"));
    }

    #[test]
    fn schema_reuse_hits_the_cache() {
        let fixture = Fixture::new();
        fixture.write_resource("redfish/v1/Chassis/1", CHASSIS_RESOURCE);
        fixture.write_resource("redfish/v1/Chassis/2", CHASSIS_RESOURCE);
        fixture.write_schema("Chassis.v1_0_0.json", PERMISSIVE_SCHEMA);

        let stats = execute(&fixture.config()).unwrap();
        assert_eq!(stats.resources, 2);
        assert_eq!(stats.from_fetch, 1);
        assert_eq!(stats.from_cache, 1);
    }

    #[test]
    fn explicit_list_deduplicates_and_survives_missing_files() {
        let fixture = Fixture::new();
        fixture.write_resource("redfish/v1/Chassis", CHASSIS_RESOURCE);
        fixture.write_schema("Chassis.v1_0_0.json", PERMISSIVE_SCHEMA);

        let mut config = fixture.config();
        config.files = Some(
            "/redfish/v1/Chassis,/redfish/v1/Chassis,/redfish/v1/NoSuch".to_string(),
        );

        let stats = execute(&config).unwrap();
        // The duplicate collapses; the missing file is a non-fatal error.
        assert_eq!(stats.resources, 1);
        assert_eq!(stats.errors, 1);
    }

    #[test]
    fn replay_revalidates_exactly_the_failed_resources() {
        let fixture = Fixture::new();
        fixture.write_resource("redfish/v1/Chassis", CHASSIS_RESOURCE);
        fixture.write_resource("redfish/v1/Thermal", CHASSIS_RESOURCE);
        fixture.write_resource("redfish/v1/Power", CHASSIS_RESOURCE);
        fixture.write_schema("Chassis.v1_0_0.json", PERMISSIVE_SCHEMA);

        let config = fixture.config();
        // A prior run's log naming two of the three resources.
        {
            let mut log = ErrorLog::create(&config.errfile).unwrap();
            log.record(
                "'SerialNumber' is a required property",
                &format!("{}/redfish/v1/Chassis/index.json", config.mockup_dir),
                "Chassis.v1_0_0.json",
            )
            .unwrap();
            log.record(
                "'SerialNumber' is a required property",
                &format!("{}/redfish/v1/Thermal/index.json", config.mockup_dir),
                "Chassis.v1_0_0.json",
            )
            .unwrap();
        }

        let mut replay_config = fixture.config();
        replay_config.replay = true;
        let stats = execute(&replay_config).unwrap();
        assert_eq!(stats.resources, 2, "only the two logged resources re-run");
        assert_eq!(stats.errors, 0);

        // Replay reads the log; it must not have been truncated.
        let log = std::fs::read_to_string(&config.errfile).unwrap();
        assert!(log.contains("redfish/v1/Thermal"));
    }

    #[test]
    fn local_file_mode_validates_one_file() {
        let fixture = Fixture::new();
        fixture.write_schema("Chassis.v1_0_0.json", PERMISSIVE_SCHEMA);
        let file = fixture.dir.path().join("resource.json");
        std::fs::write(&file, CHASSIS_RESOURCE).unwrap();

        let mut config = fixture.config();
        config.local_file = Some(file);

        let stats = execute(&config).unwrap();
        assert_eq!(stats.resources, 1);
        assert_eq!(stats.errors, 0);
    }

    #[test]
    fn unreadable_resource_is_non_fatal() {
        let fixture = Fixture::new();
        fixture.write_resource("redfish/v1/Bad", "{not json");
        fixture.write_resource("redfish/v1/Chassis", CHASSIS_RESOURCE);
        fixture.write_schema("Chassis.v1_0_0.json", PERMISSIVE_SCHEMA);

        let stats = execute(&fixture.config()).unwrap();
        assert_eq!(stats.errors, 1, "parse failure recorded");
        assert_eq!(stats.resources, 1, "the good resource still validates");
    }

    #[test]
    fn missing_schema_is_recorded_per_resource() {
        let fixture = Fixture::new();
        fixture.write_resource("redfish/v1/Chassis", CHASSIS_RESOURCE);
        let config = fixture.config();

        let stats = execute(&config).unwrap();
        assert_eq!(stats.resources, 1);
        assert_eq!(stats.errors, 1);
        let log = std::fs::read_to_string(&config.errfile).unwrap();
        assert!(log.contains("schema: Chassis.v1_0_0.json"));
    }

    #[test]
    fn exclusions_suppress_matching_violations() {
        let fixture = Fixture::new();
        fixture.write_resource("redfish/v1/Chassis", CHASSIS_RESOURCE);
        fixture.write_schema("Chassis.v1_0_0.json", REQUIRES_SERIAL_SCHEMA);

        let mut config = fixture.config();
        config.excludes = ExclusionSet::from_csv("SerialNumber");

        let stats = execute(&config).unwrap();
        assert_eq!(stats.resources, 1);
        assert_eq!(stats.errors, 0, "excluded violations are not counted");
    }

    #[test]
    fn explicit_targets_dedup_and_drop_empties() {
        let targets = explicit_targets("b,a,b,,a");
        assert_eq!(targets, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn find_index_files_is_recursive_and_sorted() {
        let fixture = Fixture::new();
        fixture.write_resource("redfish/v1/Systems/1", "{}");
        fixture.write_resource("redfish/v1/Chassis", "{}");
        std::fs::write(
            fixture.dir.path().join("mockup/notes.txt"),
            "not an index file",
        )
        .unwrap();

        let files = find_index_files(&fixture.dir.path().join("mockup"));
        assert_eq!(files.len(), 2);
        assert!(files[0] < files[1]);
        assert!(files.iter().all(|f| f.ends_with("index.json")));
    }

    #[test]
    fn find_index_files_empty_for_missing_dir() {
        assert!(find_index_files(Path::new("/tmp/redval-no-such-dir-xyz")).is_empty());
    }
}
