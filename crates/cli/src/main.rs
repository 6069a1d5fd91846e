//! Meldgate CLI — the main entry point.
//!
//! Commands:
//! - `serve`    — Start the HTTP gateway
//! - `compose`  — Render a request document without sending it
//! - `send`     — Send a rendered document to the registry endpoint
//! - `doctor`   — Diagnose configuration and runtime health

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "meldgate",
    about = "Meldgate — XMeld civil-registry connector",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Render a request document and print it
    Compose(commands::compose::ComposeArgs),

    /// Send a rendered document file to the registry endpoint
    Send {
        /// Path to the rendered XMeld document
        file: PathBuf,

        /// Override the endpoint URL
        #[arg(short, long)]
        endpoint: Option<String>,
    },

    /// Diagnose configuration and runtime health
    Doctor,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Compose(args) => commands::compose::run(args)?,
        Commands::Send { file, endpoint } => commands::send::run(file, endpoint).await?,
        Commands::Doctor => commands::doctor::run()?,
    }

    Ok(())
}
