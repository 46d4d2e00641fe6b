//! agentver CLI
//!
//! Registers agent installations, switches the active one and reports
//! what is installed.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Action, Cli};
use error::{CliError, Result};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        match &e {
            // configure reports its outcome on stdout, failed or not
            CliError::Install(failure) => {
                println!("{}: {}", "error".red().bold(), failure);
                tracing::debug!(origin = %failure.error.origin(), "Install failure origin");
            }
            CliError::Core(core) => {
                eprintln!("{}: {}", "error".red().bold(), core);
                tracing::debug!(origin = %core.origin(), "Error origin");
            }
            other => eprintln!("{}: {}", "error".red().bold(), other),
        }
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let builder = FmtSubscriber::builder()
        .with_writer(std::io::stderr)
        .with_target(verbose);

    let result = if verbose {
        tracing::subscriber::set_global_default(builder.with_max_level(Level::DEBUG).finish())
    } else {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        tracing::subscriber::set_global_default(builder.with_env_filter(filter).finish())
    };

    if result.is_err() {
        eprintln!("{} tracing subscriber already set", "warning:".yellow().bold());
    }
    tracing::debug!("Verbose mode enabled");
}

fn run(cli: &Cli) -> Result<()> {
    let ctx = commands::build_context(cli)?;
    let policy = commands::policy(cli.skip_invalid);

    match cli.action() {
        Action::Configure(path) => commands::run_configure(&ctx, &path),
        Action::List => commands::run_list(&ctx, policy),
        Action::Set(version) => commands::run_set(&ctx, &version, policy),
        Action::Current => commands::run_current(&ctx),
    }
}
