//! Leadbook CLI - Multi-tenant CRM with lead scoring
//!
//! Usage:
//!   leadbook init                      Initialize database
//!   leadbook seed                      Create the demo user
//!   leadbook serve --port 3000         Start web server
//!   leadbook scores --org 1            Print calculated lead scores
//!   leadbook insights --org 1          Print dashboard stats and insights
//!   leadbook export --org 1 -o a.csv   Export scored leads to CSV

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Seed => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_seed(&db)
        }
        Commands::Serve {
            port,
            host,
            static_dir,
        } => {
            commands::cmd_serve(
                &cli.db,
                &host,
                port,
                cli.no_encrypt,
                static_dir.as_deref(),
            )
            .await
        }
        Commands::Scores { org } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_scores(&db, org)
        }
        Commands::Insights { org } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_insights(&db, org)
        }
        Commands::Export { org, output } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_export(&db, org, output.as_deref())
        }
    }
}
