//! Database bootstrap and business commands

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use keel_core::db::Database;

/// Open the database, creating it if needed
pub fn open_db(path: &Path) -> Result<Database> {
    let path_str = path.to_string_lossy();
    Database::new(&path_str).with_context(|| format!("Failed to open database at {}", path_str))
}

/// Parse a YYYY-MM period argument into the first of that month
pub fn parse_period(period: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", period), "%Y-%m-%d")
        .with_context(|| format!("Invalid period {:?} (use YYYY-MM)", period))
}

/// keel init
pub fn cmd_init(path: &Path) -> Result<()> {
    let db = open_db(path)?;
    println!("Initialized database at {}", db.path());
    Ok(())
}

/// keel business add
pub fn cmd_business_add(db: &Database, name: &str, industry: Option<&str>) -> Result<()> {
    let id = db.create_business(name, industry)?;
    println!("Created business {} ({})", name, id);
    Ok(())
}

/// keel business list
pub fn cmd_business_list(db: &Database) -> Result<()> {
    let businesses = db.list_businesses()?;
    if businesses.is_empty() {
        println!("No businesses yet. Add one with: keel business add <name>");
        return Ok(());
    }

    println!("{:<5} {:<30} {:<20}", "ID", "NAME", "INDUSTRY");
    for business in businesses {
        println!(
            "{:<5} {:<30} {:<20}",
            business.id,
            business.name,
            business.industry.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}
