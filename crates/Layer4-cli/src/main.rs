//! Kiln CLI - Main entry point

mod app;
mod check;
mod listing;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Kiln - extension host for the Kiln editor shell
#[derive(Parser, Debug)]
#[command(name = "kiln")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Settings file to use instead of the user/project settings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the diagnostics debounce window (milliseconds)
    #[arg(long, global = true)]
    debounce_ms: Option<u64>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the diagnostics pipeline over files and print the results
    Check {
        /// Files to open as the active document, in order
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List known plugins and their state
    Plugins,
    /// List registered commands, views and diagnostic providers
    Contributions,
    /// Execute a command by id
    Run {
        /// Command id (e.g. lint.listRules)
        id: String,

        /// Arguments, parsed as JSON when possible
        args: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let working_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = app::load_config(&working_dir, args.config, args.debounce_ms)?;
    let host = app::build_host(config)?;

    let mut failed = false;
    match args.command {
        Command::Check { files } => {
            let summary = check::run(&host, &files).await?;
            failed = summary.errors > 0;
        }
        Command::Plugins => listing::print_plugins(&host),
        Command::Contributions => listing::print_contributions(&host),
        Command::Run { id, args } => {
            host.execute_command(&id, &listing::parse_args(&args))?;
        }
    }

    host.deactivate_all();

    if failed {
        std::process::exit(1);
    }
    Ok(())
}
