use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use confval_cli::views::{self, Format, Streams, TestOutput};
use confval_moduletest::diag::has_errors;
use confval_moduletest::moduletest::{Status, Suite};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Maximum results file size in bytes (16MB)
const MAX_RESULTS_SIZE: u64 = 16_000_000;

#[derive(Parser, Debug)]
#[command(name = "confval")]
#[command(about = "Inspect results of configuration tests")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Present test results recorded in a JSON file
    TestResults {
        /// Path to a JSON object mapping suite names to suites
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Pretty)]
        format: Format,

        /// Also export results as JUnit XML to this path
        #[arg(long)]
        junit_xml: Option<PathBuf>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::TestResults {
            file,
            format,
            junit_xml,
        } => cmd_test_results(&file, format, junit_xml),
    }
}

fn load_results(path: &Path) -> Result<BTreeMap<String, Suite>> {
    let len = std::fs::metadata(path)
        .with_context(|| format!("failed to read results file '{}'", path.display()))?
        .len();
    if len > MAX_RESULTS_SIZE {
        bail!(
            "results file exceeds {}MB limit ({} bytes)",
            MAX_RESULTS_SIZE / 1_000_000,
            len
        );
    }

    let src = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read results file '{}'", path.display()))?;
    serde_json::from_str(&src)
        .with_context(|| format!("failed to parse results file '{}'", path.display()))
}

fn cmd_test_results(file: &Path, format: Format, junit_xml: Option<PathBuf>) -> Result<ExitCode> {
    let results = load_results(file)?;
    info!(suites = results.len(), path = %file.display(), "loaded test results");

    let mut view = views::new_test(
        TestOutput {
            format,
            junit_xml_file: junit_xml,
        },
        Streams::std(),
    );
    let diags = view.results(&results);
    view.diagnostics(&diags);

    let failed = results
        .values()
        .any(|s| matches!(s.status(), Status::Failed | Status::Error));
    if failed || has_errors(&diags) {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
