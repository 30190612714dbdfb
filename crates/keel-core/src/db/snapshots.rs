//! Financial snapshot operations
//!
//! Snapshots are append-only; the forecast and summary paths only ever read
//! them newest-first by period.

use chrono::Datelike;
use rusqlite::{params, OptionalExtension, Row};

use super::{parse_date, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewSnapshot, Snapshot};

fn snapshot_from_row(row: &Row<'_>) -> rusqlite::Result<Snapshot> {
    let period_str: String = row.get(2)?;
    let created_at_str: String = row.get(9)?;
    Ok(Snapshot {
        id: row.get(0)?,
        business_id: row.get(1)?,
        period: parse_date(&period_str),
        cash_balance: row.get(3)?,
        revenue: row.get(4)?,
        expenses: row.get(5)?,
        accounts_receivable: row.get(6)?,
        accounts_payable: row.get(7)?,
        notes: row.get(8)?,
        created_at: parse_datetime(&created_at_str),
    })
}

const SNAPSHOT_COLUMNS: &str = "id, business_id, period, cash_balance, revenue, expenses, \
     accounts_receivable, accounts_payable, notes, created_at";

impl Database {
    /// Record a new snapshot
    ///
    /// Rejects non-finite figures; the period's day component is normalized
    /// to the first of the month.
    pub fn insert_snapshot(&self, business_id: i64, snapshot: &NewSnapshot) -> Result<i64> {
        for (name, value) in [
            ("cash_balance", snapshot.cash_balance),
            ("revenue", snapshot.revenue),
            ("expenses", snapshot.expenses),
            ("accounts_receivable", snapshot.accounts_receivable),
            ("accounts_payable", snapshot.accounts_payable),
        ] {
            if !value.is_finite() {
                return Err(Error::InvalidInput(format!(
                    "{} must be a finite number",
                    name
                )));
            }
        }

        let period = snapshot.period.with_day(1).unwrap_or(snapshot.period);

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO snapshots (business_id, period, cash_balance, revenue, expenses, \
             accounts_receivable, accounts_payable, notes) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                business_id,
                period.format("%Y-%m-%d").to_string(),
                snapshot.cash_balance,
                snapshot.revenue,
                snapshot.expenses,
                snapshot.accounts_receivable,
                snapshot.accounts_payable,
                snapshot.notes,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get a snapshot by ID
    pub fn get_snapshot(&self, id: i64) -> Result<Option<Snapshot>> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {} FROM snapshots WHERE id = ?", SNAPSHOT_COLUMNS),
            params![id],
            snapshot_from_row,
        )
        .optional()
        .map_err(Into::into)
    }

    /// List a business's snapshots, newest period first
    pub fn list_snapshots(&self, business_id: i64) -> Result<Vec<Snapshot>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM snapshots WHERE business_id = ? ORDER BY period DESC, id DESC",
            SNAPSHOT_COLUMNS
        ))?;

        let snapshots = stmt
            .query_map(params![business_id], snapshot_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(snapshots)
    }

    /// The latest and previous snapshots, for trend comparisons
    pub fn latest_snapshots(&self, business_id: i64) -> Result<(Option<Snapshot>, Option<Snapshot>)> {
        let mut snapshots = self.list_snapshots(business_id)?;
        let mut iter = snapshots.drain(..);
        Ok((iter.next(), iter.next()))
    }
}
