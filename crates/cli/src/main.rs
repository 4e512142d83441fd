//! Lifeline CLI — the main entry point.
//!
//! Commands:
//! - `init`     — Write the default config
//! - `status`   — Show resolved configuration
//! - `context`  — Assemble one cycle context and print it
//! - `watch`    — Run the heartbeat loop, one context per tick

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "lifeline",
    about = "Lifeline — balance-aware heartbeat runtime",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default configuration file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show resolved configuration
    Status,

    /// Assemble one cycle context and print it as JSON
    Context {
        #[command(flatten)]
        source: commands::SourceArgs,
    },

    /// Run the heartbeat loop
    Watch {
        #[command(flatten)]
        source: commands::SourceArgs,

        /// Stop after this many cycles (default: run until Ctrl-C)
        #[arg(short = 'n', long)]
        cycles: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    if cli.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    match cli.command {
        Commands::Init { force } => commands::init::run(force).await?,
        Commands::Status => commands::status::run().await?,
        Commands::Context { source } => commands::context::run(source).await?,
        Commands::Watch { source, cycles } => commands::watch::run(source, cycles).await?,
    }

    Ok(())
}
