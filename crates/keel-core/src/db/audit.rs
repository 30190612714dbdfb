//! Audit log operations

use rusqlite::{params, Row};

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::models::AuditEntry;

fn audit_from_row(row: &Row<'_>) -> rusqlite::Result<AuditEntry> {
    let created_at_str: String = row.get(6)?;
    Ok(AuditEntry {
        id: row.get(0)?,
        user: row.get(1)?,
        action: row.get(2)?,
        resource_type: row.get(3)?,
        resource_id: row.get(4)?,
        details: row.get(5)?,
        created_at: parse_datetime(&created_at_str),
    })
}

impl Database {
    /// Append an audit entry
    pub fn log_audit(
        &self,
        user: &str,
        action: &str,
        resource_type: Option<&str>,
        resource_id: Option<i64>,
        details: Option<&str>,
    ) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO audit_log (user, action, resource_type, resource_id, details) \
             VALUES (?, ?, ?, ?, ?)",
            params![user, action, resource_type, resource_id, details],
        )?;
        Ok(())
    }

    /// List recent audit entries, newest first
    pub fn list_audit_log(&self, limit: i64) -> Result<Vec<AuditEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user, action, resource_type, resource_id, details, created_at \
             FROM audit_log ORDER BY id DESC LIMIT ?",
        )?;

        let entries = stmt
            .query_map(params![limit], audit_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }
}
