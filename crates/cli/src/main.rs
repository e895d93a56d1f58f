//! Basket CLI - schema setup and cart maintenance.
//!
//! # Usage
//!
//! ```bash
//! # Create the carts table if it does not exist
//! basket init
//!
//! # Purge entries inactive for more than 7 days (the sweeper's default)
//! basket purge
//!
//! # Purge with a custom window
//! basket purge --older-than-days 30
//!
//! # Show one visitor's cart
//! basket list 6f1c0e9a2b7d4c3e8f5a1b2c3d4e5f60
//!
//! # Show table statistics
//! basket stats
//! ```
//!
//! The database file comes from `BASKET_DATABASE_PATH` (default
//! `cart_database.db`) unless `--database` is given.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "basket")]
#[command(author, version, about = "Basket cart maintenance tools")]
struct Cli {
    /// SQLite database file (overrides `BASKET_DATABASE_PATH`)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the carts table and indexes if missing
    Init,
    /// Delete cart entries older than the retention window
    Purge {
        /// Retention window in days
        #[arg(long, default_value_t = 7)]
        older_than_days: u32,
    },
    /// Print the products in one session's cart
    List {
        /// Session identifier (the `cart_session` cookie value)
        session_id: String,

        /// Maximum number of entries to print
        #[arg(long, default_value_t = 500)]
        limit: u32,
    },
    /// Print entry and session counts
    Stats,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Command output is logged, so default to info when RUST_LOG is unset
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    let pool = commands::open_pool(cli.database).await?;

    let result = match cli.command {
        Commands::Init => commands::schema::init(&pool).await,
        Commands::Purge { older_than_days } => {
            commands::carts::purge(&pool, older_than_days).await
        }
        Commands::List { session_id, limit } => {
            commands::carts::list(&pool, &session_id, limit).await
        }
        Commands::Stats => commands::carts::stats(&pool).await,
    };

    pool.close().await;
    result
}
