//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `require_organization` - Resolve an `--org` argument
//! - `cmd_init` - Initialize the database
//! - `cmd_seed` - Create the demo user

use std::path::Path;

use anyhow::{bail, Context, Result};
use leadbook_core::db::{Database, DB_KEY_ENV};
use leadbook_core::models::{Organization, UserRole};

/// Demo account created by `leadbook seed`
pub const DEMO_EMAIL: &str = "demo@example.com";
pub const DEMO_PASSWORD: &str = "Demo123!";
pub const DEMO_NAME: &str = "Demo User";

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

/// Look up an organization, failing with a readable message if it is missing
pub fn require_organization(db: &Database, org: i64) -> Result<Organization> {
    match db.get_organization(org)? {
        Some(organization) => Ok(organization),
        None => bail!("Organization {} not found", org),
    }
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path, no_encrypt)?;
    let organizations = db
        .list_organizations()
        .context("Failed to read organizations")?;
    println!("   Path: {}", db.path());
    println!("   Organizations: {}", organizations.len());

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else if db.is_encrypted()? {
        println!("   🔒 Encryption: ENABLED ({}=***)", DB_KEY_ENV);
    } else {
        println!("   ⚠️  Encryption: SQLCipher unavailable in this build");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Create the demo user: leadbook seed");
    println!("  2. Start the API: leadbook serve");

    Ok(())
}

pub fn cmd_seed(db: &Database) -> Result<()> {
    if db.find_user_by_email(DEMO_EMAIL)?.is_some() {
        println!("ℹ️  Demo user already exists ({})", DEMO_EMAIL);
        return Ok(());
    }

    let user = db
        .create_user(DEMO_NAME, DEMO_EMAIL, DEMO_PASSWORD, UserRole::Admin)
        .context("Failed to create demo user")?;

    println!("✅ Demo user created");
    println!("   Email:        {}", user.email);
    println!("   Password:     {}", DEMO_PASSWORD);
    println!("   Role:         {}", user.role);
    println!("   Organization: {}", user.organization_id);

    Ok(())
}
