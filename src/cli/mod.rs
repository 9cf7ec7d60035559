//! CLI module for testloom
//!
//! A test binary hands its suite to [`run`], which parses the command line, drives the suite to
//! completion on a single-threaded runtime and exits with the run's status.
//!
//! ## Flags
//!
//! - `--seed <N>` - pin the fuzz seed (default: derived from the start time)
//! - `--fuzz <RUNS>` - generated inputs per fuzz test (default: 100)
//! - `--format <console|json>` - output format
//! - `-v` - print failures as they happen
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! [`execute`] returns `CliResult<ExitCode>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::fmt;
use std::io::IsTerminal;
use std::process;

use clap::Parser;
use testloom_core::{DEFAULT_RUNS, Seed, Suite};

use crate::clock::SystemClock;
use crate::config::RunConfig;
use crate::host::{Program, RunOutcome, run_reported};
use crate::report::{ConsoleReporter, JsonReporter, OutputFormat};
use crate::version::TESTLOOM_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
    /// The host broke the run lifecycle.
    pub const INTERNAL: ExitCode = ExitCode(101);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Run a testloom suite
#[derive(Parser, Debug)]
#[command(name = "testloom")]
#[command(version = TESTLOOM_VERSION)]
#[command(about = "Run a unit and fuzz test suite one test at a time", long_about = None)]
pub struct Cli {
    /// Seed for fuzz tests (default: derived from the start time)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u32>,

    /// Number of generated inputs per fuzz test
    #[arg(long = "fuzz", value_name = "RUNS", default_value_t = DEFAULT_RUNS)]
    pub runs: u32,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Console)]
    pub format: OutputFormat,

    /// Print failures as they happen
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn run_config(&self) -> RunConfig {
        let config = RunConfig::new().with_runs(self.runs);
        match self.seed {
            Some(seed) => config.with_seed(Seed(seed)),
            None => config,
        }
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called.
pub fn run(suite: Suite) {
    let cli = Cli::parse();

    match execute(cli, suite) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Run the suite as configured by `cli` and map the outcome to an exit code.
pub fn execute(cli: Cli, suite: Suite) -> CliResult<ExitCode> {
    let config = cli.run_config();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::failure(format!("Failed to start runtime: {}", e)))?;

    let program = Program::new(suite, &config, SystemClock);
    let result = match cli.format {
        OutputFormat::Console => {
            let live = std::io::stdout().is_terminal();
            runtime.block_on(run_reported(program, ConsoleReporter::stdout(cli.verbose, live)))
        }
        OutputFormat::Json => runtime.block_on(run_reported(program, JsonReporter::stdout())),
    };

    let outcome = result.map_err(|err| {
        let report = miette::Report::new(err);
        CliError::new(format!("{:?}", report), ExitCode::INTERNAL)
    })?;

    exit_code_for(&outcome, &config, cli.format)
}

fn exit_code_for(outcome: &RunOutcome, config: &RunConfig, format: OutputFormat) -> CliResult<ExitCode> {
    if !outcome.snapshot.is_finished() {
        return Err(CliError::failure("Test run stopped before finishing"));
    }
    if outcome.snapshot.failures().is_empty() {
        return Ok(ExitCode::SUCCESS);
    }

    if let (Some(seed), OutputFormat::Console) = (outcome.seed, format) {
        eprintln!();
        eprintln!("To reproduce these results, run with: --seed {} --fuzz {}", seed, config.runs);
    }
    // Tests failed - return error with empty message (summary already printed)
    Err(CliError::new("", ExitCode::FAILURE))
}

// ============================================================================
// Tests
// ============================================================================
