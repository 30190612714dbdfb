//! Statement and line-item operations
//!
//! Statements record uploads; line items are written in one batch once the
//! founder confirms the review step. `recent_line_items` is the history
//! window the category suggestion engine reads.

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_date, parse_datetime, Database};
use crate::error::Result;
use crate::models::{Category, LineItem, NewLineItem, Statement, StatementType};

/// History window consulted for category reuse
pub const LINE_ITEM_HISTORY_LIMIT: i64 = 100;

fn statement_from_row(row: &Row<'_>) -> rusqlite::Result<Statement> {
    let type_str: String = row.get(2)?;
    let period_str: String = row.get(3)?;
    let created_at_str: String = row.get(7)?;
    Ok(Statement {
        id: row.get(0)?,
        business_id: row.get(1)?,
        statement_type: type_str.parse().unwrap_or(StatementType::ProfitLoss),
        period: parse_date(&period_str),
        file_name: row.get(4)?,
        file_hash: row.get(5)?,
        notes: row.get(6)?,
        created_at: parse_datetime(&created_at_str),
    })
}

fn line_item_from_row(row: &Row<'_>) -> rusqlite::Result<LineItem> {
    let category_str: String = row.get(5)?;
    let created_at_str: String = row.get(7)?;
    Ok(LineItem {
        id: row.get(0)?,
        business_id: row.get(1)?,
        statement_id: row.get(2)?,
        line_name: row.get(3)?,
        amount: row.get(4)?,
        category: category_str.parse().unwrap_or(Category::Other),
        is_suggested: row.get(6)?,
        created_at: parse_datetime(&created_at_str),
    })
}

const STATEMENT_COLUMNS: &str =
    "id, business_id, statement_type, period, file_name, file_hash, notes, created_at";

const LINE_ITEM_COLUMNS: &str =
    "id, business_id, statement_id, line_name, amount, category, is_suggested, created_at";

impl Database {
    /// Record an uploaded statement
    pub fn insert_statement(
        &self,
        business_id: i64,
        statement_type: StatementType,
        period: chrono::NaiveDate,
        file_name: &str,
        file_hash: &str,
        notes: Option<&str>,
    ) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO statements (business_id, statement_type, period, file_name, file_hash, notes) \
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                business_id,
                statement_type.as_str(),
                period.format("%Y-%m-%d").to_string(),
                file_name,
                file_hash,
                notes,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get a statement by ID
    pub fn get_statement(&self, id: i64) -> Result<Option<Statement>> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {} FROM statements WHERE id = ?", STATEMENT_COLUMNS),
            params![id],
            statement_from_row,
        )
        .optional()
        .map_err(Into::into)
    }

    /// Find a prior upload of the same bytes for this business
    pub fn find_statement_by_hash(
        &self,
        business_id: i64,
        file_hash: &str,
    ) -> Result<Option<Statement>> {
        let conn = self.conn()?;
        conn.query_row(
            &format!(
                "SELECT {} FROM statements WHERE business_id = ? AND file_hash = ?",
                STATEMENT_COLUMNS
            ),
            params![business_id, file_hash],
            statement_from_row,
        )
        .optional()
        .map_err(Into::into)
    }

    /// List a business's statements, newest first
    pub fn list_statements(&self, business_id: i64) -> Result<Vec<Statement>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM statements WHERE business_id = ? ORDER BY id DESC",
            STATEMENT_COLUMNS
        ))?;

        let statements = stmt
            .query_map(params![business_id], statement_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(statements)
    }

    /// Write a confirmed batch of line items atomically
    pub fn insert_line_items(
        &self,
        business_id: i64,
        statement_id: i64,
        items: &[NewLineItem],
    ) -> Result<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        for item in items {
            tx.execute(
                "INSERT INTO line_items (business_id, statement_id, line_name, amount, category, is_suggested) \
                 VALUES (?, ?, ?, ?, ?, ?)",
                params![
                    business_id,
                    statement_id,
                    item.line_name,
                    item.amount,
                    item.category.as_str(),
                    item.is_suggested,
                ],
            )?;
        }

        tx.commit()?;
        Ok(items.len())
    }

    /// List the line items confirmed for a statement
    pub fn list_line_items(&self, statement_id: i64) -> Result<Vec<LineItem>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM line_items WHERE statement_id = ? ORDER BY id",
            LINE_ITEM_COLUMNS
        ))?;

        let items = stmt
            .query_map(params![statement_id], line_item_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Recent categorized items for a business, newest first
    ///
    /// The suggestion engine's history window; bounded to the most recent
    /// `LINE_ITEM_HISTORY_LIMIT` items.
    pub fn recent_line_items(&self, business_id: i64) -> Result<Vec<LineItem>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM line_items WHERE business_id = ? ORDER BY id DESC LIMIT ?",
            LINE_ITEM_COLUMNS
        ))?;

        let items = stmt
            .query_map(params![business_id, LINE_ITEM_HISTORY_LIMIT], line_item_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(items)
    }
}
