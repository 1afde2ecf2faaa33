//! QuizHub server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ───────────────▶ request id / trace / metrics / timeout / body limit
//!                          │
//!                          ▼
//!                      route guard ──(no cookie on protected page)──▶ /login?callbackUrl=…
//!                          │
//!                          ▼
//!                 ┌─────────────────────┐     ┌──────────────┐
//!                 │ handlers + session  │────▶│  quiz logic  │
//!                 │     extractors      │     │ (evaluator,  │
//!                 └─────────┬───────────┘     │  scoring)    │
//!                           │                 └──────────────┘
//!                           ▼
//!                 ┌─────────────────────┐     ┌──────────────┐
//!                 │   db (sea-orm)      │     │ rate limiter │
//!                 └─────────────────────┘     └──────────────┘
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use quizhub::config::load_config;
use quizhub::lifecycle::startup;
use quizhub::observability::logging;

#[derive(Parser)]
#[command(name = "quizhub")]
#[command(about = "Quiz authoring, play and ranking service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// TOML configuration file; defaults apply when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Create missing database tables and exit
    Migrate {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let (Commands::Serve { config } | Commands::Migrate { config }) = &cli.command;

    let config = load_config(config.as_deref())?;
    logging::init(&config.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "quizhub starting");

    match cli.command {
        Commands::Serve { .. } => startup::serve(config).await?,
        Commands::Migrate { .. } => startup::migrate(config).await?,
    }
    Ok(())
}
