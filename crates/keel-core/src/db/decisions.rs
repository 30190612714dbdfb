//! Decision tracking operations

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::models::{Decision, DecisionAnalysis, DecisionStatus, NewDecision};

fn decision_from_row(row: &Row<'_>) -> rusqlite::Result<Decision> {
    let status_str: String = row.get(6)?;
    let analysis_json: Option<String> = row.get(7)?;
    let created_at_str: String = row.get(8)?;

    // A malformed analysis column is treated as absent rather than failing
    // the whole read; the advisor can regenerate it.
    let analysis = analysis_json
        .as_deref()
        .and_then(|json| serde_json::from_str::<DecisionAnalysis>(json).ok());

    Ok(Decision {
        id: row.get(0)?,
        business_id: row.get(1)?,
        title: row.get(2)?,
        question: row.get(3)?,
        amount: row.get(4)?,
        context: row.get(5)?,
        status: status_str.parse().unwrap_or_default(),
        analysis,
        created_at: parse_datetime(&created_at_str),
    })
}

const DECISION_COLUMNS: &str =
    "id, business_id, title, question, amount, context, status, analysis, created_at";

impl Database {
    /// Create a new decision in `considering` status
    pub fn create_decision(&self, business_id: i64, decision: &NewDecision) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO decisions (business_id, title, question, amount, context) \
             VALUES (?, ?, ?, ?, ?)",
            params![
                business_id,
                decision.title,
                decision.question,
                decision.amount,
                decision.context,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get a decision by ID
    pub fn get_decision(&self, id: i64) -> Result<Option<Decision>> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {} FROM decisions WHERE id = ?", DECISION_COLUMNS),
            params![id],
            decision_from_row,
        )
        .optional()
        .map_err(Into::into)
    }

    /// List a business's decisions, newest first
    pub fn list_decisions(&self, business_id: i64) -> Result<Vec<Decision>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM decisions WHERE business_id = ? ORDER BY id DESC",
            DECISION_COLUMNS
        ))?;

        let decisions = stmt
            .query_map(params![business_id], decision_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(decisions)
    }

    /// Move a decision to a new status
    pub fn set_decision_status(&self, id: i64, status: DecisionStatus) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "UPDATE decisions SET status = ? WHERE id = ?",
            params![status.as_str(), id],
        )?;
        Ok(())
    }

    /// Store the advisor's analysis for a decision
    pub fn set_decision_analysis(&self, id: i64, analysis: &DecisionAnalysis) -> Result<()> {
        let json = serde_json::to_string(analysis)?;
        let conn = self.conn()?;
        conn.execute(
            "UPDATE decisions SET analysis = ? WHERE id = ?",
            params![json, id],
        )?;
        Ok(())
    }

    /// Delete a decision permanently
    pub fn delete_decision(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM decisions WHERE id = ?", params![id])?;
        Ok(())
    }
}
