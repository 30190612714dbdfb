//! Cash forecast engine
//!
//! Projects cash, revenue, and expenses forward month by month from a
//! starting position under constant growth/change rates, and determines
//! when (if ever) the cash balance first goes negative.
//!
//! Growth compounds monthly: each month's revenue/expense figure is derived
//! from the previous projected value, not the starting one. The running
//! totals stay unrounded; rounding to whole currency units happens only
//! when a row is emitted.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::Snapshot;

/// Cash/revenue/expense position a projection starts from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StartingPosition {
    pub cash: f64,
    pub revenue: f64,
    pub expenses: f64,
}

impl From<&Snapshot> for StartingPosition {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            cash: snapshot.cash_balance,
            revenue: snapshot.revenue,
            expenses: snapshot.expenses,
        }
    }
}

/// What-if levers for a projection
///
/// Percentages are monthly and uncapped; negative values model decline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assumptions {
    pub revenue_growth_pct: f64,
    pub expense_change_pct: f64,
    pub months_to_forecast: u32,
}

/// One projected month
///
/// Currency fields are rounded to whole units at emission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRow {
    /// Display label, e.g. "Mar 2026"
    pub month: String,
    pub cash: i64,
    pub revenue: i64,
    pub expenses: i64,
    pub net_change: i64,
}

/// Where the projection leaves the business
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outlook {
    /// Cash first goes negative in the given projected month (1-based)
    Shortfall { month_index: usize, month: String },
    /// Cash stays non-negative for the whole horizon
    Funded { ending_cash: i64 },
}

/// Project the starting position forward under the given assumptions
///
/// Returns one row per projected month, in chronological order, labeled
/// relative to `today`. A zero-month horizon yields an empty projection.
/// Fails with `InvalidInput` if any numeric input is non-finite; growth
/// rates and horizon length are otherwise unrestricted.
pub fn project(
    start: StartingPosition,
    assumptions: &Assumptions,
    today: NaiveDate,
) -> Result<Vec<ForecastRow>> {
    for (name, value) in [
        ("cash", start.cash),
        ("revenue", start.revenue),
        ("expenses", start.expenses),
        ("revenue_growth_pct", assumptions.revenue_growth_pct),
        ("expense_change_pct", assumptions.expense_change_pct),
    ] {
        if !value.is_finite() {
            return Err(Error::InvalidInput(format!(
                "{} must be a finite number, got {}",
                name, value
            )));
        }
    }

    let revenue_factor = 1.0 + assumptions.revenue_growth_pct / 100.0;
    let expense_factor = 1.0 + assumptions.expense_change_pct / 100.0;

    let mut cash = start.cash;
    let mut revenue = start.revenue;
    let mut expenses = start.expenses;

    let mut rows = Vec::with_capacity(assumptions.months_to_forecast as usize);

    for i in 1..=assumptions.months_to_forecast {
        revenue *= revenue_factor;
        expenses *= expense_factor;
        let net_change = revenue - expenses;
        cash += net_change;

        rows.push(ForecastRow {
            month: month_label(today, i),
            cash: cash.round() as i64,
            revenue: revenue.round() as i64,
            expenses: expenses.round() as i64,
            net_change: net_change.round() as i64,
        });
    }

    Ok(rows)
}

/// Determine the runway outlook from emitted rows
///
/// Scans in order for the first month with negative cash; otherwise reports
/// the final projected balance. `None` for an empty projection.
pub fn outlook(rows: &[ForecastRow]) -> Option<Outlook> {
    if let Some((idx, row)) = rows.iter().enumerate().find(|(_, row)| row.cash < 0) {
        return Some(Outlook::Shortfall {
            month_index: idx + 1,
            month: row.month.clone(),
        });
    }

    rows.last().map(|row| Outlook::Funded {
        ending_cash: row.cash,
    })
}

/// Label for the i-th projected month after `today`
fn month_label(today: NaiveDate, months_ahead: u32) -> String {
    today
        .checked_add_months(Months::new(months_ahead))
        .unwrap_or(NaiveDate::MAX)
        .format("%b %Y")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    fn flat_burn_start() -> StartingPosition {
        StartingPosition {
            cash: 1000.0,
            revenue: 500.0,
            expenses: 600.0,
        }
    }

    #[test]
    fn test_flat_rates_burn_down_linearly() {
        let assumptions = Assumptions {
            revenue_growth_pct: 0.0,
            expense_change_pct: 0.0,
            months_to_forecast: 3,
        };

        let rows = project(flat_burn_start(), &assumptions, today()).unwrap();

        let cash: Vec<i64> = rows.iter().map(|r| r.cash).collect();
        assert_eq!(cash, vec![900, 800, 700]);
        assert!(rows.iter().all(|r| r.net_change == -100));
    }

    #[test]
    fn test_row_count_and_cash_identity() {
        let assumptions = Assumptions {
            revenue_growth_pct: 4.0,
            expense_change_pct: 2.0,
            months_to_forecast: 24,
        };
        let start = StartingPosition {
            cash: 25_000.0,
            revenue: 8_000.0,
            expenses: 9_500.0,
        };

        let rows = project(start, &assumptions, today()).unwrap();
        assert_eq!(rows.len(), 24);

        // Row i's cash equals start.cash plus the running sum of unrounded
        // net changes, so rounded-row sums stay within rounding slack.
        let mut net_sum = 0i64;
        for row in &rows {
            net_sum += row.net_change;
            assert!((row.cash - (start.cash as i64 + net_sum)).abs() <= rows.len() as i64);
        }
    }

    #[test]
    fn test_growth_compounds_monthly() {
        let assumptions = Assumptions {
            revenue_growth_pct: 10.0,
            expense_change_pct: 0.0,
            months_to_forecast: 3,
        };
        let start = StartingPosition {
            cash: 0.0,
            revenue: 1000.0,
            expenses: 0.0,
        };

        let rows = project(start, &assumptions, today()).unwrap();

        // 1000 -> 1100 -> 1210 -> 1331, not 1100/1200/1300
        let revenue: Vec<i64> = rows.iter().map(|r| r.revenue).collect();
        assert_eq!(revenue, vec![1100, 1210, 1331]);
    }

    #[test]
    fn test_month_labels_advance_from_today() {
        let assumptions = Assumptions {
            revenue_growth_pct: 0.0,
            expense_change_pct: 0.0,
            months_to_forecast: 13,
        };

        let rows = project(flat_burn_start(), &assumptions, today()).unwrap();

        assert_eq!(rows[0].month, "Feb 2026");
        assert_eq!(rows[11].month, "Jan 2027");
        assert_eq!(rows[12].month, "Feb 2027");
    }

    #[test]
    fn test_shortfall_month_identified() {
        // Burns 100/month from 250: negative in month 3.
        let start = StartingPosition {
            cash: 250.0,
            revenue: 500.0,
            expenses: 600.0,
        };
        let assumptions = Assumptions {
            revenue_growth_pct: 0.0,
            expense_change_pct: 0.0,
            months_to_forecast: 12,
        };

        let rows = project(start, &assumptions, today()).unwrap();

        match outlook(&rows).unwrap() {
            Outlook::Shortfall { month_index, month } => {
                assert_eq!(month_index, 3);
                assert_eq!(month, rows[2].month);
            }
            other => panic!("expected shortfall, got {:?}", other),
        }
    }

    #[test]
    fn test_rising_expenses_cross_zero() {
        let start = StartingPosition {
            cash: 10_000.0,
            revenue: 1000.0,
            expenses: 1000.0,
        };
        let assumptions = Assumptions {
            revenue_growth_pct: 0.0,
            expense_change_pct: 25.0,
            months_to_forecast: 36,
        };

        let rows = project(start, &assumptions, today()).unwrap();

        let first_negative = rows.iter().position(|r| r.cash < 0).unwrap();
        match outlook(&rows).unwrap() {
            Outlook::Shortfall { month_index, .. } => assert_eq!(month_index, first_negative + 1),
            other => panic!("expected shortfall, got {:?}", other),
        }
    }

    #[test]
    fn test_funded_outlook_reports_ending_cash() {
        let start = StartingPosition {
            cash: 1000.0,
            revenue: 700.0,
            expenses: 600.0,
        };
        let assumptions = Assumptions {
            revenue_growth_pct: 0.0,
            expense_change_pct: 0.0,
            months_to_forecast: 6,
        };

        let rows = project(start, &assumptions, today()).unwrap();

        assert_eq!(
            outlook(&rows).unwrap(),
            Outlook::Funded { ending_cash: 1600 }
        );
    }

    #[test]
    fn test_already_negative_cash_flags_first_row() {
        let start = StartingPosition {
            cash: -50.0,
            revenue: 500.0,
            expenses: 600.0,
        };
        let assumptions = Assumptions {
            revenue_growth_pct: 0.0,
            expense_change_pct: 0.0,
            months_to_forecast: 4,
        };

        let rows = project(start, &assumptions, today()).unwrap();

        match outlook(&rows).unwrap() {
            Outlook::Shortfall { month_index, .. } => assert_eq!(month_index, 1),
            other => panic!("expected shortfall, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_months_yields_empty_projection() {
        let assumptions = Assumptions {
            revenue_growth_pct: 5.0,
            expense_change_pct: 5.0,
            months_to_forecast: 0,
        };

        let rows = project(flat_burn_start(), &assumptions, today()).unwrap();
        assert!(rows.is_empty());
        assert_eq!(outlook(&rows), None);
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let assumptions = Assumptions {
            revenue_growth_pct: f64::NAN,
            expense_change_pct: 0.0,
            months_to_forecast: 6,
        };

        let err = project(flat_burn_start(), &assumptions, today()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let start = StartingPosition {
            cash: f64::INFINITY,
            revenue: 0.0,
            expenses: 0.0,
        };
        let assumptions = Assumptions {
            revenue_growth_pct: 0.0,
            expense_change_pct: 0.0,
            months_to_forecast: 6,
        };
        assert!(project(start, &assumptions, today()).is_err());
    }

    #[test]
    fn test_rates_beyond_100_percent_allowed() {
        let start = StartingPosition {
            cash: 100.0,
            revenue: 10.0,
            expenses: 0.0,
        };
        let assumptions = Assumptions {
            revenue_growth_pct: 300.0,
            expense_change_pct: -150.0,
            months_to_forecast: 2,
        };

        let rows = project(start, &assumptions, today()).unwrap();
        assert_eq!(rows[0].revenue, 40);
        assert_eq!(rows[1].revenue, 160);
    }

    #[test]
    fn test_projection_is_pure() {
        let assumptions = Assumptions {
            revenue_growth_pct: 3.5,
            expense_change_pct: -1.25,
            months_to_forecast: 18,
        };

        let first = project(flat_burn_start(), &assumptions, today()).unwrap();
        let second = project(flat_burn_start(), &assumptions, today()).unwrap();
        assert_eq!(first, second);
    }
}
