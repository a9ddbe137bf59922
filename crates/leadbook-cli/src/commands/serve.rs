//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use leadbook_server::{ServerConfig, ALLOWED_ORIGINS_ENV};

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    no_encrypt: bool,
    static_dir: Option<&Path>,
) -> Result<()> {
    println!("🚀 Starting Leadbook web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    let config = ServerConfig::from_env();
    println!("   🔒 Sessions expire after {} hours", config.session_ttl_hours);
    if config.allowed_origins.is_empty() {
        println!("   🌐 CORS: same-origin only (set {})", ALLOWED_ORIGINS_ENV);
    } else {
        println!("   🌐 CORS: {}", config.allowed_origins.join(", "));
    }
    println!();

    let db = open_db(db_path, no_encrypt)?;
    let static_dir = match static_dir {
        Some(dir) => Some(
            dir.to_str()
                .context("Static directory path is not valid UTF-8")?,
        ),
        None => None,
    };

    leadbook_server::serve_with_config(db, host, port, static_dir, config).await
}
