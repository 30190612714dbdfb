//! Statement import and inspection commands

use std::path::Path;

use anyhow::{bail, Context, Result};

use keel_core::context::format_dollars;
use keel_core::db::Database;
use keel_core::import;
use keel_core::models::StatementType;
use keel_core::AiClient;

use super::parse_period;

/// keel statement import
pub async fn cmd_statement_import(
    db: &Database,
    business_id: i64,
    file: &Path,
    statement_type: &str,
    period: &str,
    yes: bool,
) -> Result<()> {
    if db.get_business(business_id)?.is_none() {
        bail!("Business {} not found", business_id);
    }

    let statement_type: StatementType = statement_type
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    let period = parse_period(period)?;

    let bytes =
        std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file.display().to_string());

    let file_hash = import::file_hash(&bytes);
    if db.find_statement_by_hash(business_id, &file_hash)?.is_some() {
        bail!("{} has already been imported for this business", file_name);
    }

    let ai = AiClient::from_env();
    let extracted = import::extract(&bytes, &file_name, ai.as_ref()).await?;
    if extracted.is_empty() {
        bail!("No line items could be extracted from {}", file_name);
    }

    let history = db.recent_line_items(business_id)?;
    let review = import::suggest_categories(&extracted, &history);

    let suggested_count = review.iter().filter(|i| i.is_suggested).count();
    println!(
        "Extracted {} line items from {} ({} suggested from your past uploads):",
        review.len(),
        file_name,
        suggested_count
    );
    println!();
    println!("{:<40} {:>12} {:<26} {}", "LINE ITEM", "AMOUNT", "CATEGORY", "");
    for item in &review {
        println!(
            "{:<40} {:>12} {:<26} {}",
            item.line_name,
            format_dollars(item.amount),
            item.category.as_str(),
            if item.is_suggested { "(reused)" } else { "" }
        );
    }

    if !yes {
        println!();
        println!("Dry run: re-run with --yes to save these categories.");
        return Ok(());
    }

    let statement_id = db.insert_statement(
        business_id,
        statement_type,
        period,
        &file_name,
        &file_hash,
        None,
    )?;
    let batch = import::finalize(&review, &history);
    let saved = db.insert_line_items(business_id, statement_id, &batch)?;

    println!();
    println!("Saved {} line items (statement {})", saved, statement_id);
    Ok(())
}

/// keel statement items
pub fn cmd_statement_items(db: &Database, statement_id: i64) -> Result<()> {
    let Some(statement) = db.get_statement(statement_id)? else {
        bail!("Statement {} not found", statement_id);
    };

    let items = db.list_line_items(statement_id)?;
    if items.is_empty() {
        println!(
            "No confirmed line items for {} ({})",
            statement.file_name, statement_id
        );
        return Ok(());
    }

    println!(
        "{} — {} ({})",
        statement.file_name,
        statement.period.format("%b %Y"),
        statement.statement_type
    );
    println!();
    println!("{:<40} {:>12} {:<26}", "LINE ITEM", "AMOUNT", "CATEGORY");
    for item in items {
        println!(
            "{:<40} {:>12} {:<26}",
            item.line_name,
            format_dollars(item.amount),
            item.category.as_str(),
        );
    }
    Ok(())
}
