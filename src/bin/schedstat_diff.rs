//! schedstat-diff - scheduler statistics interval sampler.
//!
//! Samples `/proc/schedstat`, sleeps for the requested interval, samples it
//! again and prints how much every domain and CPU counter moved.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tracing::{Level, debug, info, warn};
use tracing_subscriber::EnvFilter;

use schedstat_diff::collector::RealFs;
use schedstat_diff::collector::schedstat::{CPU_FIELDS, DEFAULT_SCHEDSTAT_PATH, SnapshotReader};
use schedstat_diff::delta::cpu_membership_changes;
use schedstat_diff::report::{Report, ReportOptions};
use schedstat_diff::util::{interval_duration, parse_interval};

/// Scheduler statistics interval sampler.
#[derive(Parser)]
#[command(
    name = "schedstat-diff",
    about = "Report /proc/schedstat counter deltas over an interval",
    version,
    allow_negative_numbers = true
)]
struct Args {
    /// Sampling interval in seconds (fractional values allowed).
    #[arg(value_name = "INTERVAL_SECONDS", value_parser = parse_interval)]
    interval: f64,

    /// Path to the schedstat file.
    #[arg(long, default_value = DEFAULT_SCHEDSTAT_PATH)]
    path: PathBuf,

    /// Output as JSON.
    #[arg(long)]
    json: bool,

    /// Also report deltas for every CPU present in both samples.
    #[arg(long)]
    per_cpu: bool,

    /// Omit counters that did not change.
    #[arg(long)]
    skip_zero: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is warn level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Initializes the tracing subscriber on stderr; stdout carries the report.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("schedstat_diff={}", level).parse() {
        filter = filter.add_directive(directive);
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let reader = SnapshotReader::new(RealFs::new(), &args.path);
    if !reader.is_available() {
        warn!(
            "{} does not exist; is the kernel built with CONFIG_SCHEDSTATS?",
            reader.path().display()
        );
    }

    let start = reader.read()?;
    info!(
        "First sample: schedstat v{}, {} domains, {} cpus; sleeping {}s",
        start.version(),
        start.domains().len(),
        start.cpus().len(),
        args.interval
    );

    std::thread::sleep(interval_duration(args.interval));

    let end = reader.read()?;
    if end.version() != start.version() {
        warn!(
            "Schedstat version changed between samples (v{} -> v{}); using v{} field set",
            start.version(),
            end.version(),
            start.version()
        );
    }
    if end.domains().len() != start.domains().len() {
        debug!(
            "Domain count changed between samples: {} -> {}",
            start.domains().len(),
            end.domains().len()
        );
    }
    let (removed, added) = cpu_membership_changes(start.cpus(), end.cpus());
    if !removed.is_empty() || !added.is_empty() {
        debug!(
            "CPUs excluded from deltas: removed [{}], added [{}]",
            removed.join(", "),
            added.join(", ")
        );
    }

    let report = Report::build(
        &start,
        &end,
        args.interval,
        ReportOptions {
            cpu_field_names: Some(CPU_FIELDS),
            per_cpu: args.per_cpu,
        },
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_text(args.skip_zero));
    }
    Ok(())
}

/// Exit code for a failed argument parse.
///
/// `--help` and `--version` go to stdout and succeed; usage errors exit 1.
fn usage_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() { 1 } else { 0 }
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            std::process::exit(usage_exit_code(&e));
        }
    };

    init_logging(args.verbose, args.quiet);

    if let Err(e) = run(&args) {
        let mut source = e.source();
        while let Some(cause) = source {
            debug!("caused by: {}", cause);
            source = cause.source();
        }
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
