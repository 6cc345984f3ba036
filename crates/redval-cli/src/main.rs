//! # redval CLI entry point
//!
//! Parses command-line arguments with clap derive, maps them onto a
//! [`RunConfig`], runs the selected mode to completion, and prints the
//! final summary. Exit code 0 when no errors were recorded, 1 otherwise.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use redval_core::{ExclusionSet, Summary};
use redval_cli::live::LiveTarget;
use redval_cli::run::{self, RunConfig};

/// Validate Redfish resources against DMTF JSON schemas.
///
/// Resources name their own schema via `@odata.type`; schemas are read from
/// a local directory or fetched from the DMTF schema origin through a
/// bounded cache. Failures are recorded to an error log that later runs can
/// replay with `--replay-errors`.
#[derive(Parser, Debug)]
#[command(name = "redval", version, about, long_about = None)]
struct Cli {
    /// Directory path to a mockup tree to validate against.
    #[arg(short = 'm', long, default_value = "./mockup-sim-pull")]
    mockup_dir: String,

    /// Local directory containing the JSON schema files.
    #[arg(short = 's', long, default_value = "./DMTFSchemas")]
    schema_dir: PathBuf,

    /// Fetch schemas from http://redfish.dmtf.org/schemas/v1/ instead of
    /// the local schema directory.
    #[arg(short = 'S', long)]
    schema_org: bool,

    /// Basic-auth user name for live fetches.
    #[arg(short = 'u', long, default_value = "root")]
    user: String,

    /// Basic-auth password for live fetches.
    #[arg(short = 'p', long, default_value = "calvin")]
    password: String,

    /// Error output file.
    #[arg(short = 'e', long, default_value = "./validate_errs")]
    errfile: PathBuf,

    /// Comma-separated list of mockup-relative resources to validate.
    /// Without this, the entire mockup tree is scanned.
    #[arg(short = 'f', long)]
    files: Option<String>,

    /// Hostname or IP address [:port] of a live Redfish service; validates
    /// exactly one resource from it.
    #[arg(short = 'r', long)]
    rhost: Option<String>,

    /// Resource URL on the live service (used with --rhost).
    #[arg(short = 'i', long, default_value = "/redfish/v1")]
    url: String,

    /// Comma-separated substrings; violations whose message contains one
    /// are dropped silently.
    #[arg(short = 'x', long, default_value = "")]
    exclude: String,

    /// Validate only the resources that failed a previous run, parsed back
    /// from the error file.
    #[arg(short = 'g', long)]
    replay_errors: bool,

    /// A single local JSON file to validate.
    #[arg(short = 'l', long)]
    local_file: Option<PathBuf>,

    /// Skip TLS certificate verification on live fetches. For lab racks
    /// with self-signed certificates only.
    #[arg(long)]
    insecure: bool,

    /// HTTP request timeout in seconds (schema origin and live fetches).
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Print resource JSON as it is processed. Repeat for more tracing
    /// detail (-v, -vv, -vvv).
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Map verbosity onto the tracing filter.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let timeout = Duration::from_secs(cli.timeout_secs);
    let live = cli.rhost.as_ref().map(|host| LiveTarget {
        host: host.clone(),
        url: cli.url.clone(),
        user: cli.user.clone(),
        password: cli.password.clone(),
        insecure: cli.insecure,
        timeout,
    });

    if cli.insecure {
        tracing::warn!("TLS certificate verification disabled (--insecure)");
    }

    let config = RunConfig {
        mockup_dir: cli.mockup_dir,
        schema_dir: cli.schema_dir,
        schema_org: cli.schema_org,
        errfile: cli.errfile,
        files: cli.files,
        local_file: cli.local_file,
        live,
        replay: cli.replay_errors,
        excludes: ExclusionSet::from_csv(&cli.exclude),
        timeout,
        verbose: cli.verbose > 0,
    };

    let stats = match run::execute(&config) {
        Ok(stats) => stats,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(1);
        }
    };

    let errfile = config.errfile.display().to_string();
    println!(
        "{}",
        Summary {
            stats: &stats,
            errfile: &errfile,
        }
    );

    if stats.errors > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
