//! Forecast command

use anyhow::{bail, Result};
use chrono::Utc;

use keel_core::context::format_dollars;
use keel_core::db::Database;
use keel_core::forecast::{self, Assumptions, Outlook, StartingPosition};

/// keel forecast
pub fn cmd_forecast(
    db: &Database,
    business_id: i64,
    growth: f64,
    expense_change: f64,
    months: u32,
) -> Result<()> {
    let Some(business) = db.get_business(business_id)? else {
        bail!("Business {} not found", business_id);
    };

    let (latest, _) = db.latest_snapshots(business_id)?;
    let Some(snapshot) = latest else {
        bail!("No snapshots recorded for {} yet", business.name);
    };

    let assumptions = Assumptions {
        revenue_growth_pct: growth,
        expense_change_pct: expense_change,
        months_to_forecast: months,
    };
    let today = Utc::now().date_naive();
    let rows = forecast::project(StartingPosition::from(&snapshot), &assumptions, today)?;

    println!(
        "{} — {} month forecast ({}% revenue growth, {}% expense change)",
        business.name, months, growth, expense_change
    );
    println!();
    println!(
        "{:<10} {:>12} {:>12} {:>12} {:>12}",
        "MONTH", "REVENUE", "EXPENSES", "NET", "CASH"
    );
    for row in &rows {
        println!(
            "{:<10} {:>12} {:>12} {:>12} {:>12}",
            row.month,
            format_dollars(row.revenue as f64),
            format_dollars(row.expenses as f64),
            format_dollars(row.net_change as f64),
            format_dollars(row.cash as f64),
        );
    }

    println!();
    match forecast::outlook(&rows) {
        Some(Outlook::Shortfall { month_index, month }) => {
            println!(
                "Cash runs out in {} months ({}). You'll need additional funding by then.",
                month_index, month
            );
        }
        Some(Outlook::Funded { ending_cash }) => {
            println!(
                "Projected cash in {} months: {}",
                months,
                format_dollars(ending_cash as f64)
            );
        }
        None => println!("Nothing to project for a zero-month horizon."),
    }

    Ok(())
}
