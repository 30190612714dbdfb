//! Snapshot trend and runway helpers
//!
//! Pure comparisons between a business's latest and previous snapshots:
//! runway at current burn, net burn, period-over-period percent trends, and
//! the largest period-over-period changes.

use serde::Serialize;

use crate::models::Snapshot;

/// How long the cash lasts at the current burn rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Runway {
    /// Net burn is zero or negative; no finite runway figure
    Profitable,
    /// Whole months until the cash balance reaches zero
    Months { months: i64 },
}

/// Monthly expenses minus monthly revenue (positive = losing money)
pub fn net_burn(latest: &Snapshot) -> f64 {
    latest.expenses - latest.revenue
}

/// Runway at the latest snapshot's burn rate
pub fn runway(latest: &Snapshot) -> Runway {
    let burn = net_burn(latest);
    if burn <= 0.0 {
        return Runway::Profitable;
    }
    Runway::Months {
        months: (latest.cash_balance / burn).floor() as i64,
    }
}

/// Period-over-period direction of a single figure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    /// Magnitude below 1%; reported instead of a signed zero
    NoChange,
    Up(i64),
    Down(i64),
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoChange => write!(f, "No change"),
            Self::Up(pct) => write!(f, "+{}%", pct),
            Self::Down(pct) => write!(f, "-{}%", pct),
        }
    }
}

/// Percent change between two figures
///
/// `None` when either figure is zero or non-finite (no meaningful trend);
/// magnitudes under 1% collapse to `NoChange`.
pub fn percent_trend(current: f64, previous: f64) -> Option<Trend> {
    if current == 0.0 || previous == 0.0 || !current.is_finite() || !previous.is_finite() {
        return None;
    }

    let diff = (current - previous) / previous * 100.0;
    if diff.abs() < 1.0 {
        return Some(Trend::NoChange);
    }

    let pct = diff.abs().round() as i64;
    if diff > 0.0 {
        Some(Trend::Up(pct))
    } else {
        Some(Trend::Down(pct))
    }
}

/// One tracked figure's period-over-period movement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldChange {
    pub field: &'static str,
    pub delta: f64,
}

/// Largest period-over-period changes across the tracked fields
///
/// Computes `latest - previous` for revenue, expenses, and accounts
/// payable, drops unchanged fields, and returns the top 3 by magnitude.
pub fn top_changes(latest: &Snapshot, previous: &Snapshot) -> Vec<FieldChange> {
    let mut changes: Vec<FieldChange> = [
        ("revenue", latest.revenue - previous.revenue),
        ("expenses", latest.expenses - previous.expenses),
        (
            "accounts_payable",
            latest.accounts_payable - previous.accounts_payable,
        ),
    ]
    .into_iter()
    .filter(|(_, delta)| *delta != 0.0)
    .map(|(field, delta)| FieldChange { field, delta })
    .collect();

    changes.sort_by(|a, b| {
        b.delta
            .abs()
            .partial_cmp(&a.delta.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    changes.truncate(3);
    changes
}

/// Everything the snapshot overview needs, computed from two snapshots
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotSummary {
    pub latest: Snapshot,
    pub previous: Option<Snapshot>,
    pub net_burn: f64,
    pub runway: Runway,
    pub cash_trend: Option<String>,
    pub revenue_trend: Option<String>,
    pub expenses_trend: Option<String>,
    pub top_changes: Vec<FieldChange>,
}

impl SnapshotSummary {
    pub fn build(latest: Snapshot, previous: Option<Snapshot>) -> Self {
        let trend = |current: f64, previous_value: Option<f64>| {
            previous_value
                .and_then(|p| percent_trend(current, p))
                .map(|t| t.to_string())
        };

        let cash_trend = trend(
            latest.cash_balance,
            previous.as_ref().map(|p| p.cash_balance),
        );
        let revenue_trend = trend(latest.revenue, previous.as_ref().map(|p| p.revenue));
        let expenses_trend = trend(latest.expenses, previous.as_ref().map(|p| p.expenses));
        let top_changes = previous
            .as_ref()
            .map(|p| top_changes(&latest, p))
            .unwrap_or_default();

        Self {
            net_burn: net_burn(&latest),
            runway: runway(&latest),
            cash_trend,
            revenue_trend,
            expenses_trend,
            top_changes,
            latest,
            previous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn snapshot(cash: f64, revenue: f64, expenses: f64, payables: f64) -> Snapshot {
        Snapshot {
            id: 1,
            business_id: 1,
            period: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            cash_balance: cash,
            revenue,
            expenses,
            accounts_receivable: 0.0,
            accounts_payable: payables,
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_runway_months_floor() {
        // 10k cash burning 3k/month: 3 whole months, not 3.33.
        let snap = snapshot(10_000.0, 2_000.0, 5_000.0, 0.0);
        assert_eq!(runway(&snap), Runway::Months { months: 3 });
        assert_eq!(net_burn(&snap), 3_000.0);
    }

    #[test]
    fn test_profitable_has_no_finite_runway() {
        let snap = snapshot(10_000.0, 5_000.0, 4_000.0, 0.0);
        assert_eq!(runway(&snap), Runway::Profitable);

        // Break-even counts as profitable too.
        let snap = snapshot(10_000.0, 4_000.0, 4_000.0, 0.0);
        assert_eq!(runway(&snap), Runway::Profitable);
    }

    #[test]
    fn test_percent_trend_formats_sign_and_percent() {
        assert_eq!(percent_trend(110.0, 100.0).unwrap().to_string(), "+10%");
        assert_eq!(percent_trend(97.0, 100.0).unwrap().to_string(), "-3%");
    }

    #[test]
    fn test_percent_trend_sub_percent_is_no_change() {
        assert_eq!(percent_trend(100.4, 100.0), Some(Trend::NoChange));
        assert_eq!(percent_trend(99.2, 100.0), Some(Trend::NoChange));
        assert_eq!(
            percent_trend(100.4, 100.0).unwrap().to_string(),
            "No change"
        );
    }

    #[test]
    fn test_percent_trend_absent_on_zero() {
        assert_eq!(percent_trend(0.0, 100.0), None);
        assert_eq!(percent_trend(100.0, 0.0), None);
    }

    #[test]
    fn test_top_changes_sorted_by_magnitude() {
        let previous = snapshot(0.0, 10_000.0, 8_000.0, 2_000.0);
        let latest = snapshot(0.0, 10_500.0, 11_000.0, 1_000.0);

        let changes = top_changes(&latest, &previous);

        let fields: Vec<&str> = changes.iter().map(|c| c.field).collect();
        assert_eq!(fields, vec!["expenses", "accounts_payable", "revenue"]);
        assert_eq!(changes[0].delta, 3_000.0);
        assert_eq!(changes[1].delta, -1_000.0);
    }

    #[test]
    fn test_top_changes_drops_unchanged_fields() {
        let previous = snapshot(0.0, 10_000.0, 8_000.0, 2_000.0);
        let latest = snapshot(0.0, 10_000.0, 9_000.0, 2_000.0);

        let changes = top_changes(&latest, &previous);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, "expenses");
    }

    #[test]
    fn test_summary_without_previous_snapshot() {
        let summary = SnapshotSummary::build(snapshot(5_000.0, 1_000.0, 1_500.0, 0.0), None);

        assert_eq!(summary.runway, Runway::Months { months: 10 });
        assert_eq!(summary.cash_trend, None);
        assert!(summary.top_changes.is_empty());
    }

    #[test]
    fn test_summary_with_previous_snapshot() {
        let previous = snapshot(4_000.0, 900.0, 1_500.0, 100.0);
        let latest = snapshot(5_000.0, 1_000.0, 1_500.0, 100.0);

        let summary = SnapshotSummary::build(latest, Some(previous));

        assert_eq!(summary.cash_trend.as_deref(), Some("+25%"));
        assert_eq!(summary.revenue_trend.as_deref(), Some("+11%"));
        assert_eq!(summary.expenses_trend.as_deref(), Some("No change"));
    }
}
