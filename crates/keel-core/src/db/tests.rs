//! Database layer tests

use chrono::{NaiveDate, Utc};

use super::Database;
use crate::models::{
    Category, ChatMessage, Confidence, DecisionAnalysis, DecisionStatus, NewDecision, NewLineItem,
    NewSnapshot, Role, StatementType, Verdict,
};

fn test_db() -> Database {
    Database::in_memory().expect("Failed to create test database")
}

fn new_snapshot(period: NaiveDate, cash: f64, revenue: f64, expenses: f64) -> NewSnapshot {
    NewSnapshot {
        period,
        cash_balance: cash,
        revenue,
        expenses,
        accounts_receivable: 0.0,
        accounts_payable: 0.0,
        notes: None,
    }
}

#[test]
fn test_business_crud() {
    let db = test_db();

    let id = db.create_business("Bluebird Bakery", Some("food")).unwrap();
    let business = db.get_business(id).unwrap().unwrap();
    assert_eq!(business.name, "Bluebird Bakery");
    assert_eq!(business.industry.as_deref(), Some("food"));

    db.update_business(id, Some("Bluebird Bakery LLC"), None)
        .unwrap();
    let business = db.get_business(id).unwrap().unwrap();
    assert_eq!(business.name, "Bluebird Bakery LLC");
    assert_eq!(business.industry.as_deref(), Some("food"));

    assert_eq!(db.list_businesses().unwrap().len(), 1);

    db.delete_business(id).unwrap();
    assert!(db.get_business(id).unwrap().is_none());
}

#[test]
fn test_snapshots_listed_newest_period_first() {
    let db = test_db();
    let business_id = db.create_business("Test", None).unwrap();

    for (year, month) in [(2025, 11), (2026, 1), (2025, 12)] {
        let period = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
        db.insert_snapshot(business_id, &new_snapshot(period, 1000.0, 500.0, 600.0))
            .unwrap();
    }

    let snapshots = db.list_snapshots(business_id).unwrap();
    let periods: Vec<(i32, u32)> = snapshots
        .iter()
        .map(|s| {
            use chrono::Datelike;
            (s.period.year(), s.period.month())
        })
        .collect();
    assert_eq!(periods, vec![(2026, 1), (2025, 12), (2025, 11)]);

    let (latest, previous) = db.latest_snapshots(business_id).unwrap();
    use chrono::Datelike;
    assert_eq!(latest.unwrap().period.month(), 1);
    assert_eq!(previous.unwrap().period.month(), 12);
}

#[test]
fn test_snapshot_period_normalized_to_month_start() {
    let db = test_db();
    let business_id = db.create_business("Test", None).unwrap();

    let period = NaiveDate::from_ymd_opt(2026, 3, 17).unwrap();
    let id = db
        .insert_snapshot(business_id, &new_snapshot(period, 1000.0, 0.0, 0.0))
        .unwrap();

    let snapshot = db.get_snapshot(id).unwrap().unwrap();
    assert_eq!(snapshot.period, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
}

#[test]
fn test_snapshot_rejects_non_finite_figures() {
    let db = test_db();
    let business_id = db.create_business("Test", None).unwrap();

    let period = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    let mut snapshot = new_snapshot(period, 1000.0, 500.0, 600.0);
    snapshot.revenue = f64::NAN;

    assert!(db.insert_snapshot(business_id, &snapshot).is_err());
}

#[test]
fn test_statement_upload_and_line_item_batch() {
    let db = test_db();
    let business_id = db.create_business("Test", None).unwrap();
    let period = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();

    let statement_id = db
        .insert_statement(
            business_id,
            StatementType::ProfitLoss,
            period,
            "feb-pnl.csv",
            "abc123",
            None,
        )
        .unwrap();

    let items = vec![
        NewLineItem {
            line_name: "Office Rent".to_string(),
            amount: 2500.0,
            category: Category::Rent,
            is_suggested: false,
        },
        NewLineItem {
            line_name: "Stripe payouts".to_string(),
            amount: 18_000.0,
            category: Category::Revenue,
            is_suggested: true,
        },
    ];
    assert_eq!(
        db.insert_line_items(business_id, statement_id, &items)
            .unwrap(),
        2
    );

    let stored = db.list_line_items(statement_id).unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].category, Category::Rent);
    assert!(stored[1].is_suggested);

    // Duplicate upload detection by hash, scoped to the business.
    assert!(db
        .find_statement_by_hash(business_id, "abc123")
        .unwrap()
        .is_some());
    assert!(db
        .find_statement_by_hash(business_id + 1, "abc123")
        .unwrap()
        .is_none());
}

#[test]
fn test_recent_line_items_window_newest_first() {
    let db = test_db();
    let business_id = db.create_business("Test", None).unwrap();
    let period = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();

    let statement_id = db
        .insert_statement(
            business_id,
            StatementType::ProfitLoss,
            period,
            "big.csv",
            "hash-big",
            None,
        )
        .unwrap();

    let items: Vec<NewLineItem> = (0..120)
        .map(|i| NewLineItem {
            line_name: format!("line {}", i),
            amount: i as f64,
            category: Category::Other,
            is_suggested: false,
        })
        .collect();
    db.insert_line_items(business_id, statement_id, &items)
        .unwrap();

    let recent = db.recent_line_items(business_id).unwrap();
    assert_eq!(recent.len(), 100);
    // Newest first: the last inserted row leads.
    assert_eq!(recent[0].line_name, "line 119");
}

#[test]
fn test_decision_lifecycle() {
    let db = test_db();
    let business_id = db.create_business("Test", None).unwrap();

    let id = db
        .create_decision(
            business_id,
            &NewDecision {
                title: "Hire a second baker".to_string(),
                question: "Can we afford a full-time hire right now?".to_string(),
                amount: Some(4500.0),
                context: None,
            },
        )
        .unwrap();

    let decision = db.get_decision(id).unwrap().unwrap();
    assert_eq!(decision.status, DecisionStatus::Considering);
    assert!(decision.analysis.is_none());

    let analysis = DecisionAnalysis {
        recommendation: Verdict::Depends,
        summary: "Feasible if revenue holds".to_string(),
        considerations: vec!["Runway drops to 5 months".to_string()],
        watch_out_for: "A slow month would force a layoff".to_string(),
        confidence: Confidence::Medium,
    };
    db.set_decision_analysis(id, &analysis).unwrap();
    db.set_decision_status(id, DecisionStatus::DecidedYes)
        .unwrap();

    let decision = db.get_decision(id).unwrap().unwrap();
    assert_eq!(decision.status, DecisionStatus::DecidedYes);
    let stored = decision.analysis.unwrap();
    assert_eq!(stored.recommendation, Verdict::Depends);
    assert_eq!(stored.confidence, Confidence::Medium);

    db.delete_decision(id).unwrap();
    assert!(db.get_decision(id).unwrap().is_none());
}

#[test]
fn test_conversation_round_trip() {
    let db = test_db();
    let business_id = db.create_business("Test", None).unwrap();

    let messages = vec![ChatMessage {
        role: Role::User,
        content: "Am I okay?".to_string(),
        timestamp: Utc::now(),
    }];
    let id = db
        .create_conversation(business_id, "Am I okay?", &messages)
        .unwrap();

    let mut conversation = db.get_conversation(id).unwrap().unwrap();
    assert_eq!(conversation.messages.len(), 1);
    assert_eq!(conversation.messages[0].role, Role::User);

    conversation.messages.push(ChatMessage {
        role: Role::Assistant,
        content: "You have nine months of runway.".to_string(),
        timestamp: Utc::now(),
    });
    db.update_conversation_messages(id, &conversation.messages)
        .unwrap();

    let stored = db.get_conversation(id).unwrap().unwrap();
    assert_eq!(stored.messages.len(), 2);
    assert_eq!(stored.messages[1].role, Role::Assistant);

    assert_eq!(db.list_conversations(business_id).unwrap().len(), 1);
    db.delete_conversation(id).unwrap();
    assert!(db.get_conversation(id).unwrap().is_none());
}

#[test]
fn test_audit_log_append_and_list() {
    let db = test_db();

    db.log_audit("local-dev", "create", Some("business"), Some(1), None)
        .unwrap();
    db.log_audit("local-dev", "view", Some("snapshot"), None, Some("count=3"))
        .unwrap();

    let entries = db.list_audit_log(10).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].action, "view");
    assert_eq!(entries[1].resource_type.as_deref(), Some("business"));
}
