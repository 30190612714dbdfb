//! Integration tests for keel-core
//!
//! These tests exercise the full upload → suggest → confirm → reuse flow
//! and the snapshot → summary → forecast flow.

use chrono::NaiveDate;

use keel_core::{
    db::Database,
    forecast::{self, Assumptions, Outlook, StartingPosition},
    import,
    models::{Category, NewSnapshot, StatementType},
    trends::{Runway, SnapshotSummary},
    AiClient,
};

fn period(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap()
}

fn snapshot(period_date: NaiveDate, cash: f64, revenue: f64, expenses: f64) -> NewSnapshot {
    NewSnapshot {
        period: period_date,
        cash_balance: cash,
        revenue,
        expenses,
        accounts_receivable: 0.0,
        accounts_payable: 0.0,
        notes: None,
    }
}

/// A February P&L the first upload sees: keyword suggestions only.
const FEBRUARY_CSV: &str = "Line Item,Amount\n\
Revenue - Subscriptions,18000\n\
Contractor payroll,6500\n\
Office Rent,2500\n\
Crane hire,900\n";

/// March reuses two February names with different casing.
const MARCH_CSV: &str = "Line Item,Amount\n\
revenue - subscriptions,19500\n\
CRANE HIRE,900\n\
New billboard,1200\n";

#[tokio::test]
async fn test_statement_review_reuses_prior_categories() {
    let db = Database::in_memory().expect("Failed to create database");
    let business_id = db.create_business("Bluebird Bakery", None).unwrap();

    // First upload: nothing in history, so every suggestion is keyword- or
    // fallback-based and unflagged.
    let items = import::extract(FEBRUARY_CSV.as_bytes(), "feb.csv", None)
        .await
        .unwrap();
    let history = db.recent_line_items(business_id).unwrap();
    let review = import::suggest_categories(&items, &history);

    assert_eq!(review.len(), 4);
    assert!(review.iter().all(|item| !item.is_suggested));
    assert_eq!(review[0].category, Category::Revenue);
    assert_eq!(review[1].category, Category::Payroll);
    assert_eq!(review[2].category, Category::Rent);
    assert_eq!(review[3].category, Category::Other);

    // The founder fixes "Crane hire" to COGS and confirms.
    let mut confirmed = review.clone();
    confirmed[3].category = Category::CostOfGoodsSold;

    let statement_id = db
        .insert_statement(
            business_id,
            StatementType::ProfitLoss,
            period(2026, 2),
            "feb.csv",
            &import::file_hash(FEBRUARY_CSV.as_bytes()),
            None,
        )
        .unwrap();
    let batch = import::finalize(&confirmed, &history);
    db.insert_line_items(business_id, statement_id, &batch)
        .unwrap();

    // Second upload: exact name matches (case-insensitive) reuse February's
    // categories, including the manual COGS fix, and are flagged as reused.
    let items = import::extract(MARCH_CSV.as_bytes(), "mar.csv", None)
        .await
        .unwrap();
    let history = db.recent_line_items(business_id).unwrap();
    let review = import::suggest_categories(&items, &history);

    assert_eq!(review[0].category, Category::Revenue);
    assert!(review[0].is_suggested);
    assert_eq!(review[1].category, Category::CostOfGoodsSold);
    assert!(review[1].is_suggested);
    assert_eq!(review[2].category, Category::Other);
    assert!(!review[2].is_suggested);
}

#[tokio::test]
async fn test_ai_extraction_feeds_the_same_review_path() {
    let db = Database::in_memory().expect("Failed to create database");
    let business_id = db.create_business("Test", None).unwrap();

    let ai = AiClient::mock();
    let items = import::extract(b"Stripe payouts, 18000\nOffice Rent, 2500", "feb.pdf", Some(&ai))
        .await
        .unwrap();

    let history = db.recent_line_items(business_id).unwrap();
    let review = import::suggest_categories(&items, &history);
    assert_eq!(review.len(), 2);
    assert_eq!(review[1].category, Category::Rent);
}

#[test]
fn test_snapshot_history_drives_summary_and_forecast() {
    let db = Database::in_memory().expect("Failed to create database");
    let business_id = db.create_business("Bluebird Bakery", None).unwrap();

    db.insert_snapshot(business_id, &snapshot(period(2025, 12), 40_000.0, 17_000.0, 20_000.0))
        .unwrap();
    db.insert_snapshot(business_id, &snapshot(period(2026, 1), 36_000.0, 18_000.0, 21_000.0))
        .unwrap();

    let (latest, previous) = db.latest_snapshots(business_id).unwrap();
    let latest = latest.unwrap();

    let summary = SnapshotSummary::build(latest.clone(), previous);

    // Burning 3k/month on 36k cash: 12 whole months of runway.
    assert_eq!(summary.net_burn, 3_000.0);
    assert_eq!(summary.runway, Runway::Months { months: 12 });
    assert_eq!(summary.cash_trend.as_deref(), Some("-10%"));
    assert_eq!(summary.revenue_trend.as_deref(), Some("+6%"));
    assert!(!summary.top_changes.is_empty());

    // Forecast from the same snapshot: flat rates keep burning 3k/month,
    // so cash crosses zero in month 13 — past a 12-month horizon.
    let assumptions = Assumptions {
        revenue_growth_pct: 0.0,
        expense_change_pct: 0.0,
        months_to_forecast: 12,
    };
    let today = period(2026, 1);
    let rows = forecast::project(StartingPosition::from(&latest), &assumptions, today).unwrap();

    assert_eq!(rows.len(), 12);
    assert_eq!(
        forecast::outlook(&rows).unwrap(),
        Outlook::Funded { ending_cash: 0 }
    );

    // Two more months and the shortfall appears.
    let assumptions = Assumptions {
        months_to_forecast: 14,
        ..assumptions
    };
    let rows = forecast::project(StartingPosition::from(&latest), &assumptions, today).unwrap();
    match forecast::outlook(&rows).unwrap() {
        Outlook::Shortfall { month_index, .. } => assert_eq!(month_index, 13),
        other => panic!("expected shortfall, got {:?}", other),
    }
}

#[tokio::test]
async fn test_duplicate_statement_upload_detected() {
    let db = Database::in_memory().expect("Failed to create database");
    let business_id = db.create_business("Test", None).unwrap();

    let hash = import::file_hash(FEBRUARY_CSV.as_bytes());
    db.insert_statement(
        business_id,
        StatementType::ProfitLoss,
        period(2026, 2),
        "feb.csv",
        &hash,
        None,
    )
    .unwrap();

    assert!(db
        .find_statement_by_hash(business_id, &hash)
        .unwrap()
        .is_some());

    // Inserting the same bytes again violates the uniqueness constraint.
    assert!(db
        .insert_statement(
            business_id,
            StatementType::ProfitLoss,
            period(2026, 3),
            "feb-again.csv",
            &hash,
            None,
        )
        .is_err());
}
