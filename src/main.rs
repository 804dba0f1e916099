use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ptrcalc::{run_scenario, DataLayout, DiagnosticPolicy, EvalConfig, ReportRecord, Scenario};
use tracing_subscriber::EnvFilter;

/// Exit status used when a run produced diagnostics (EX_SOFTWARE).
const DIAGNOSTIC_EXIT_STATUS: u8 = 70;

#[derive(Parser, Debug)]
#[command(name = "ptrcalc", version, about = "Evaluate typed pointer arithmetic scenarios")]
struct Args {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a scenario file and exit with the status its program returns
    Run {
        /// Scenario JSON file
        file: PathBuf,
        /// JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Target data layout (word64, lp64, ilp32)
        #[arg(long, value_parser = parse_layout)]
        layout: Option<DataLayout>,
        /// Keep evaluating after a diagnostic and report all of them
        #[arg(long)]
        collect: bool,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a configuration file with every field filled in
    Config {
        #[arg(long, value_parser = parse_layout)]
        layout: Option<DataLayout>,
    },
}

fn parse_layout(name: &str) -> Result<DataLayout, String> {
    DataLayout::named(name)
        .ok_or_else(|| format!("unknown layout `{}` (expected one of {})", name, DataLayout::NAMES.join(", ")))
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    match dispatch(args.command) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn dispatch(command: Command) -> Result<ExitCode> {
    match command {
        Command::Run { file, config, layout, collect, json } => {
            let mut config = match config {
                Some(path) => EvalConfig::load(&path)?,
                None => EvalConfig::strict(),
            };
            if let Some(layout) = layout {
                config.layout = layout;
            }
            if collect {
                config.on_diagnostic = DiagnosticPolicy::Collect;
                config.max_diagnostics = 0;
            }
            run_file(&file, &config, json)
        }
        Command::Config { layout } => {
            let config = EvalConfig::strict().with_layout(layout.unwrap_or_default());
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_file(path: &Path, config: &EvalConfig, json: bool) -> Result<ExitCode> {
    let text = fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    let scenario =
        Scenario::from_json_str(&text).with_context(|| format!("invalid scenario {}", path.display()))?;
    let file_name = path.display().to_string();

    match run_scenario(&scenario, config) {
        Ok(outcome) => {
            if json {
                let doc = serde_json::json!({
                    "name": outcome.name,
                    "returned": outcome.returned,
                    "exit_status": outcome.exit_status,
                    "steps_run": outcome.steps_run,
                });
                println!("{}", serde_json::to_string_pretty(&doc)?);
            } else if let Some(value) = outcome.returned {
                println!("{}: returned {} (exit {})", file_name, value, outcome.exit_status);
            }
            Ok(ExitCode::from(outcome.exit_status))
        }
        Err(reports) => {
            if json {
                let records: Vec<ReportRecord> = reports.iter().map(ReportRecord::from).collect();
                println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "diagnostics": records }))?);
            } else {
                for report in &reports {
                    eprintln!("{}: {}", file_name, report);
                }
            }
            Ok(ExitCode::from(DIAGNOSTIC_EXIT_STATUS))
        }
    }
}
