//! Database access layer with connection pooling and migrations
//!
//! This module is organized by domain:
//! - `businesses` - Business records
//! - `snapshots` - Financial snapshot history
//! - `statements` - Uploaded statements and their categorized line items
//! - `decisions` - Tracked financial decisions
//! - `conversations` - Advisor conversation threads
//! - `audit` - Audit log for API access

use chrono::{DateTime, NaiveDate, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::error::Result;

mod audit;
mod businesses;
mod conversations;
mod decisions;
mod snapshots;
mod statements;

#[cfg(test)]
mod tests;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Parse a SQLite datetime string into a DateTime<Utc>
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    // SQLite stores as "YYYY-MM-DD HH:MM:SS" format
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

/// Parse a SQLite date string into a NaiveDate
pub(crate) fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap_or(NaiveDate::MIN)
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
}

impl Database {
    /// Create a new database connection pool, running migrations
    pub fn new(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Uses a unique temp file rather than `:memory:` so every pooled
    /// connection sees the same database.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!("keel_test_{}_{}.db", std::process::id(), id));
        let path = path.to_string_lossy().to_string();

        // Remove any existing file
        let _ = std::fs::remove_file(&path);

        Self::new(&path)
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- Enable foreign keys
            PRAGMA foreign_keys = ON;

            -- WAL mode: better concurrency, readers don't block writers
            PRAGMA journal_mode = WAL;

            -- Synchronous NORMAL: good balance of safety and performance
            PRAGMA synchronous = NORMAL;

            -- Businesses
            CREATE TABLE IF NOT EXISTS businesses (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                industry TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            -- Financial snapshots (immutable once created)
            CREATE TABLE IF NOT EXISTS snapshots (
                id INTEGER PRIMARY KEY,
                business_id INTEGER NOT NULL REFERENCES businesses(id),
                period DATE NOT NULL,                      -- month, day normalized to the 1st
                cash_balance REAL NOT NULL,
                revenue REAL NOT NULL DEFAULT 0,
                expenses REAL NOT NULL DEFAULT 0,
                accounts_receivable REAL NOT NULL DEFAULT 0,
                accounts_payable REAL NOT NULL DEFAULT 0,
                notes TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_snapshots_business_period
                ON snapshots(business_id, period DESC);

            -- Uploaded financial statements
            CREATE TABLE IF NOT EXISTS statements (
                id INTEGER PRIMARY KEY,
                business_id INTEGER NOT NULL REFERENCES businesses(id),
                statement_type TEXT NOT NULL,              -- profit_loss, balance_sheet, cash_flow
                period DATE NOT NULL,
                file_name TEXT NOT NULL,
                file_hash TEXT NOT NULL,                   -- SHA-256 of uploaded bytes
                notes TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                UNIQUE(business_id, file_hash)
            );

            CREATE INDEX IF NOT EXISTS idx_statements_business ON statements(business_id);

            -- Categorized statement line items (created in bulk after review)
            CREATE TABLE IF NOT EXISTS line_items (
                id INTEGER PRIMARY KEY,
                business_id INTEGER NOT NULL REFERENCES businesses(id),
                statement_id INTEGER NOT NULL REFERENCES statements(id),
                line_name TEXT NOT NULL,
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                is_suggested BOOLEAN NOT NULL DEFAULT 0,   -- category reused from history
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_line_items_business ON line_items(business_id, id DESC);
            CREATE INDEX IF NOT EXISTS idx_line_items_statement ON line_items(statement_id);

            -- Tracked financial decisions
            CREATE TABLE IF NOT EXISTS decisions (
                id INTEGER PRIMARY KEY,
                business_id INTEGER NOT NULL REFERENCES businesses(id),
                title TEXT NOT NULL,
                question TEXT NOT NULL,
                amount REAL,
                context TEXT,
                status TEXT NOT NULL DEFAULT 'considering',
                analysis TEXT,                             -- advisor analysis JSON
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_decisions_business ON decisions(business_id, id DESC);

            -- Advisor conversation threads
            CREATE TABLE IF NOT EXISTS conversations (
                id INTEGER PRIMARY KEY,
                business_id INTEGER NOT NULL REFERENCES businesses(id),
                title TEXT NOT NULL,
                messages TEXT NOT NULL DEFAULT '[]',       -- ChatMessage array JSON
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_conversations_business
                ON conversations(business_id, updated_at DESC);

            -- Audit log
            CREATE TABLE IF NOT EXISTS audit_log (
                id INTEGER PRIMARY KEY,
                user TEXT NOT NULL,
                action TEXT NOT NULL,
                resource_type TEXT,
                resource_id INTEGER,
                details TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_audit_created ON audit_log(created_at DESC);
            "#,
        )?;

        info!(path = %self.db_path, "Database migrations complete");
        Ok(())
    }
}
