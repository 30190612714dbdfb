//! Business record operations

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::models::Business;

impl Database {
    /// Create a new business
    pub fn create_business(&self, name: &str, industry: Option<&str>) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO businesses (name, industry) VALUES (?, ?)",
            params![name, industry],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get a business by ID
    pub fn get_business(&self, id: i64) -> Result<Option<Business>> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, name, industry, created_at FROM businesses WHERE id = ?",
            params![id],
            |row| {
                let created_at_str: String = row.get(3)?;
                Ok(Business {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    industry: row.get(2)?,
                    created_at: parse_datetime(&created_at_str),
                })
            },
        )
        .optional()
        .map_err(Into::into)
    }

    /// List all businesses, oldest first
    pub fn list_businesses(&self) -> Result<Vec<Business>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, name, industry, created_at FROM businesses ORDER BY id")?;

        let businesses = stmt
            .query_map([], |row| {
                let created_at_str: String = row.get(3)?;
                Ok(Business {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    industry: row.get(2)?,
                    created_at: parse_datetime(&created_at_str),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(businesses)
    }

    /// Update a business's name and/or industry
    pub fn update_business(
        &self,
        id: i64,
        name: Option<&str>,
        industry: Option<&str>,
    ) -> Result<()> {
        let conn = self.conn()?;
        if let Some(name) = name {
            conn.execute(
                "UPDATE businesses SET name = ? WHERE id = ?",
                params![name, id],
            )?;
        }
        if let Some(industry) = industry {
            conn.execute(
                "UPDATE businesses SET industry = ? WHERE id = ?",
                params![industry, id],
            )?;
        }
        Ok(())
    }

    /// Delete a business permanently
    pub fn delete_business(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM businesses WHERE id = ?", params![id])?;
        Ok(())
    }
}
