//! Snapshot entry, history, and summary commands

use anyhow::{bail, Result};

use keel_core::context::format_dollars;
use keel_core::db::Database;
use keel_core::models::NewSnapshot;
use keel_core::trends::{Runway, SnapshotSummary};

use super::parse_period;

/// keel snapshot add
#[allow(clippy::too_many_arguments)]
pub fn cmd_snapshot_add(
    db: &Database,
    business_id: i64,
    period: &str,
    cash: f64,
    revenue: f64,
    expenses: f64,
    receivables: f64,
    payables: f64,
    notes: Option<&str>,
) -> Result<()> {
    if db.get_business(business_id)?.is_none() {
        bail!("Business {} not found", business_id);
    }

    let snapshot = NewSnapshot {
        period: parse_period(period)?,
        cash_balance: cash,
        revenue,
        expenses,
        accounts_receivable: receivables,
        accounts_payable: payables,
        notes: notes.map(str::to_string),
    };

    let id = db.insert_snapshot(business_id, &snapshot)?;
    println!("Recorded snapshot {} for {}", id, period);
    Ok(())
}

/// keel snapshot list
pub fn cmd_snapshot_list(db: &Database, business_id: i64, limit: usize) -> Result<()> {
    if db.get_business(business_id)?.is_none() {
        bail!("Business {} not found", business_id);
    }

    let snapshots = db.list_snapshots(business_id)?;
    if snapshots.is_empty() {
        println!("No snapshots yet. Add one with: keel snapshot add");
        return Ok(());
    }

    println!(
        "{:<10} {:>12} {:>12} {:>12}",
        "PERIOD", "CASH", "REVENUE", "EXPENSES"
    );
    for snapshot in snapshots.iter().take(limit) {
        println!(
            "{:<10} {:>12} {:>12} {:>12}",
            snapshot.period.format("%b %Y"),
            format_dollars(snapshot.cash_balance),
            format_dollars(snapshot.revenue),
            format_dollars(snapshot.expenses),
        );
    }
    Ok(())
}

/// keel summary
pub fn cmd_summary(db: &Database, business_id: i64) -> Result<()> {
    let Some(business) = db.get_business(business_id)? else {
        bail!("Business {} not found", business_id);
    };

    let (latest, previous) = db.latest_snapshots(business_id)?;
    let Some(latest) = latest else {
        bail!("No snapshots recorded for {} yet", business.name);
    };

    let summary = SnapshotSummary::build(latest, previous);

    println!("{} — {}", business.name, summary.latest.period.format("%b %Y"));
    println!();

    let trend = |t: &Option<String>| t.clone().unwrap_or_default();
    println!(
        "Cash in bank     {:>12}  {}",
        format_dollars(summary.latest.cash_balance),
        trend(&summary.cash_trend)
    );
    println!(
        "Revenue          {:>12}  {}",
        format_dollars(summary.latest.revenue),
        trend(&summary.revenue_trend)
    );
    println!(
        "Expenses         {:>12}  {}",
        format_dollars(summary.latest.expenses),
        trend(&summary.expenses_trend)
    );
    println!(
        "Net burn         {:>12}",
        format_dollars(summary.net_burn)
    );
    match summary.runway {
        Runway::Profitable => println!("Runway           {:>12}", "profitable"),
        Runway::Months { months } => println!("Runway           {:>9} mo", months),
    }
    println!(
        "Receivables      {:>12}",
        format_dollars(summary.latest.accounts_receivable)
    );
    println!(
        "Payables         {:>12}",
        format_dollars(summary.latest.accounts_payable)
    );

    if !summary.top_changes.is_empty() {
        println!();
        println!("Biggest changes since last period:");
        for change in &summary.top_changes {
            let sign = if change.delta >= 0.0 { "+" } else { "" };
            println!(
                "  {:<18} {}{}",
                change.field,
                sign,
                format_dollars(change.delta)
            );
        }
    }

    if let Some(notes) = &summary.latest.notes {
        println!();
        println!("Notes: {}", notes);
    }

    Ok(())
}
