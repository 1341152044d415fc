mod api;
mod app;
mod catalog;
mod commands;
mod config;
mod errors;
mod launcher;
mod logging;
mod output;
mod session;
#[cfg(test)]
mod testing;
mod tui;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::app::Runtime;
use crate::commands::tui::TuiArgs;
use crate::errors::CliError;
use crate::output::{OutputMode, print_error};

#[derive(Debug, Parser)]
#[command(
    name = "ccode",
    version,
    about = "Pick models from an OpenAI-compatible proxy and launch Claude Code against it.",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// Config file. Defaults to ~/.ccode/config.json.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Program to launch.
    #[arg(long, global = true, default_value = launcher::DEFAULT_PROGRAM)]
    program: String,
    /// Catalog request timeout in milliseconds.
    #[arg(long, global = true, default_value_t = api::DEFAULT_TIMEOUT_MS)]
    timeout: u64,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, global = true)]
    quiet: bool,
    #[arg(long, global = true)]
    verbose: bool,
    #[arg(long, global = true)]
    debug: bool,
    #[arg(long = "no-color", global = true)]
    no_color: bool,
    #[command(flatten)]
    tui: TuiArgs,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch the model catalog and list it grouped by owner.
    Models,
    /// Print the environment the launched program would receive.
    Env,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let output = OutputMode {
        json: cli.json,
        quiet: cli.quiet,
        verbose: cli.verbose,
        debug: cli.debug,
        no_color: cli.no_color,
    };

    let result = run(cli, output.clone()).await;
    if let Err(err) = result {
        tracing::error!(error = %err, "exiting with error");
        print_error(&err, &output);
        std::process::exit(err.exit_code());
    }
}

async fn run(cli: Cli, output: OutputMode) -> Result<(), CliError> {
    let config_path = match cli.config {
        Some(path) => path,
        None => config::config_path()?,
    };
    let log_dir = config_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    if !logging::init(log_dir, cli.verbose) {
        output.print_verbose("Logging disabled: could not open the log file.");
    }

    let runtime = Runtime {
        output,
        config_path,
        program: cli.program,
        timeout_ms: cli.timeout,
    };

    match cli.command {
        Some(Commands::Models) => commands::models::handle(&runtime).await,
        Some(Commands::Env) => commands::env::handle(&runtime),
        None => commands::tui::handle(&runtime, cli.tui).await,
    }
}
