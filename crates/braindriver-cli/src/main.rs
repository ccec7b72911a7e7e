//! braindriver CLI: play the game and inspect catalogs and sessions.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "braindriver", version, about = "Brain Driver quiz game")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game, reading one answer per line from stdin
    Play {
        /// Catalog TOML file (defaults to the configured or built-in catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Seed for a reproducible question draw
        #[arg(long)]
        seed: Option<u64>,

        /// Session id to record under (defaults to a fresh UUID)
        #[arg(long)]
        session: Option<String>,

        /// Write a JSON game report to this path
        #[arg(long)]
        report: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Simulate many draws and check selection uniformity
    Simulate {
        /// Number of games to draw
        #[arg(long, default_value = "10000")]
        runs: u64,

        /// Seed for a reproducible simulation
        #[arg(long)]
        seed: Option<u64>,

        /// Catalog TOML file
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate a catalog TOML file
    Validate {
        /// Path to the catalog file
        #[arg(long)]
        catalog: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List the questions of the active catalog
    Catalog {
        /// Catalog TOML file
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Print the catalog as TOML instead of a table
        #[arg(long)]
        toml: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Recompute a session's results from the JSON store
    Results {
        /// Session id
        #[arg(long)]
        session: String,

        /// Store directory (defaults to the configured JSON store)
        #[arg(long)]
        store_dir: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config and catalog
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("braindriver=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            catalog,
            seed,
            session,
            report,
            config,
        } => commands::play::execute(catalog, seed, session, report, config).await,
        Commands::Simulate {
            runs,
            seed,
            catalog,
            config,
        } => commands::simulate::execute(runs, seed, catalog, config),
        Commands::Validate { catalog, config } => commands::validate::execute(catalog, config),
        Commands::Catalog {
            catalog,
            toml,
            config,
        } => commands::catalog::execute(catalog, toml, config),
        Commands::Results {
            session,
            store_dir,
            format,
            config,
        } => commands::results::execute(session, store_dir, format, config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
