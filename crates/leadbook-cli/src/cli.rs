//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Leadbook - Contacts, leads, and lead scoring for small sales teams
#[derive(Parser)]
#[command(name = "leadbook")]
#[command(about = "Multi-tenant CRM with lead scoring and dashboard insights", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "leadbook.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set LEADBOOK_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Create the demo user (demo@example.com / Demo123!)
    Seed,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Show calculated lead scores for an organization
    Scores {
        /// Organization ID
        #[arg(long)]
        org: i64,
    },

    /// Show dashboard stats, funnel, and insights for an organization
    Insights {
        /// Organization ID
        #[arg(long)]
        org: i64,
    },

    /// Export scored leads to CSV
    Export {
        /// Organization ID
        #[arg(long)]
        org: i64,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
