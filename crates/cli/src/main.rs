//! Framecraft CLI - Database migrations and catalog seeding.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! fc-cli migrate
//!
//! # Load option sets, products, and gallery items from YAML
//! fc-cli seed catalog crates/cli/data/catalog.yaml
//!
//! # Check a catalog file without touching the database
//! fc-cli seed catalog crates/cli/data/catalog.yaml --dry-run
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "fc-cli")]
#[command(author, version, about = "Framecraft CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Upsert option sets, products, and gallery items from a YAML file
    Catalog {
        /// Path to the catalog YAML file
        file: String,

        /// Validate the file and stop
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Catalog { file, dry_run } => {
                commands::seed::catalog(&file, dry_run).await?;
            }
        },
    }
    Ok(())
}
