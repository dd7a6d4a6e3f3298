//! # Pressplan
//!
//! Prints the P&L summary and cash-flow timeline for a vinyl release.
//!
//! ## Usage
//! ```text
//! pressplan [--json] [SCENARIO.toml]
//! ```
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  args ──► ScenarioConfig::load ──► into_plan(today) ──► report()       │
//! │                                                            │            │
//! │                                       --json ◄─────────────┴──► table   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Logs go to stderr so the report on stdout stays pipeable.

mod config;
mod error;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::ScenarioConfig;
use crate::error::CliError;

pub const USAGE: &str = "\
Usage: pressplan [--json] [SCENARIO.toml]

Options:
  --json       Print the report as JSON (or set PRESSPLAN_OUTPUT=json)
  -h, --help   Show this help

Scenario file: argument, else $PRESSPLAN_CONFIG, else the platform config
directory's pressplan/release.toml. Missing sections use defaults.

Overrides: PRESSPLAN_RELEASE_DATE, PRESSPLAN_UNIT_PRICE,
PRESSPLAN_SELL_THROUGH, PRESSPLAN_UNITS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, PartialEq)]
enum Command {
    Help,
    Report {
        format: OutputFormat,
        scenario: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Report failed");
            eprintln!("pressplan: {}", err);
            if matches!(&err, CliError::Core(core) if core.is_configuration()) {
                eprintln!("pressplan: check the scenario file and PRESSPLAN_* overrides");
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), CliError> {
    let json_env = std::env::var("PRESSPLAN_OUTPUT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let (format, scenario) = match parse_args(std::env::args().skip(1), json_env)? {
        Command::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        Command::Report { format, scenario } => (format, scenario),
    };

    let config = ScenarioConfig::load(ScenarioConfig::explicit_path(scenario))?;
    let today = chrono::Local::now().date_naive();
    let plan = config.into_plan(today)?;

    info!(
        release_date = %plan.schedule.release_date(),
        units = plan.manufacturing.units(),
        "Running release report"
    );
    let report = plan.report()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print!("{}", render::render_report(&report)),
    }

    Ok(())
}

fn parse_args<I>(args: I, json_default: bool) -> Result<Command, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut format = if json_default {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let mut scenario = None;

    for arg in args {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--json" => format = OutputFormat::Json,
            flag if flag.starts_with('-') => {
                return Err(CliError::Usage(format!("Unknown option '{}'", flag)));
            }
            path => {
                if scenario.is_some() {
                    return Err(CliError::Usage(format!(
                        "Unexpected extra argument '{}'",
                        path
                    )));
                }
                scenario = Some(PathBuf::from(path));
            }
        }
    }

    Ok(Command::Report { format, scenario })
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show allocation and override details
/// - Default: warnings, plus info from pressplan crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,pressplan=info,pressplan_core=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
