//! Webshop CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! webshop-cli migrate
//!
//! # Insert the sample product catalog
//! webshop-cli seed products
//!
//! # Wipe and reseed the catalog
//! webshop-cli seed products --clear
//!
//! # Restore the default admin credentials
//! webshop-cli admin reset
//! ```
//!
//! The target database comes from `WEBSHOP_DATABASE_URL` (or `DATABASE_URL`),
//! defaulting to `sqlite:data/webshop.db`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "webshop-cli")]
#[command(author, version, about = "Webshop CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Manage admin credentials
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert the sample product catalog
    Products {
        /// Delete existing products first
        #[arg(long)]
        clear: bool,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Restore the default admin credentials
    Reset,
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
            SeedTarget::Products { clear } => commands::seed::products(clear).await?,
        },
        Commands::Admin { action } => match action {
            AdminAction::Reset => commands::admin::reset().await?,
        },
    }
    Ok(())
}
