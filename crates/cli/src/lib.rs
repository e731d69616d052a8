//! Command-line front end for restygen.
//!
//! [`run_cli`] parses arguments, loads the optional `restygen.toml`, sets up
//! logging and dispatches to a subcommand, returning the process exit code:
//! 0 on success, 1 when generation fails, 2 for argument errors.

pub mod commands;
pub mod config;

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use crate::commands::{generate, inspect};
use crate::config::Config;

/// Environment variable controlling the log filter.
pub const LOG_ENV: &str = "RESTYGEN_LOG";

/// Crates a plain log level applies to.
const LOG_TARGETS: [&str; 3] = ["restygen_cli", "restygen_core", "restygen_common"];

#[derive(Parser, Debug)]
#[command(
    name = "restygen",
    version,
    about = "Generates promise-based RestyGWT wrappers for annotated service interfaces"
)]
struct Cli {
    /// Config file [default: ./restygen.toml if present]
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate wrapper artifacts for one round
    Generate(generate::GenerateArgs),
    /// Show the services and operations a round would generate
    Inspect(inspect::InspectArgs),
}

/// Parse `args` (including the program name) and run the selected command.
pub fn run_cli(args: Vec<String>) -> i32 {
    match Cli::try_parse_from(args) {
        Ok(cli) => {
            let config = match Config::load(cli.config.as_deref()) {
                Ok(config) => config,
                Err(err) => {
                    eprintln!("{err}");
                    return 1;
                }
            };
            init_tracing(config.log.filter.as_deref());

            match cli.command {
                Some(Commands::Generate(args)) => generate::run(args, &config),
                Some(Commands::Inspect(args)) => inspect::run(args),
                None => {
                    let mut cmd = Cli::command();
                    let _ = cmd.print_help();
                    println!();
                    0
                }
            }
        }
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

/// Install the stderr fmt subscriber. `RESTYGEN_LOG` wins over
/// `config_filter`; both accept a plain level or a full filter spec.
pub fn init_tracing(config_filter: Option<&str>) {
    let env = std::env::var(LOG_ENV).ok();
    let filter = tracing_filter(env.as_deref(), config_filter);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn tracing_filter(env: Option<&str>, config: Option<&str>) -> String {
    match env.or(config) {
        Some(level) if is_plain_level(level) => crate_filter(level),
        Some(spec) => spec.to_string(),
        None => crate_filter("info"),
    }
}

fn crate_filter(level: &str) -> String {
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}
