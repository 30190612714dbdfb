//! Keel Core Library
//!
//! Shared functionality for the Keel financial clarity tool:
//! - Database access and migrations
//! - Financial snapshot trend and runway helpers
//! - Cash forecast engine
//! - Category suggestion engine for statement line items
//! - Statement import pipeline (CSV parsing + AI extraction)
//! - Pluggable advisor backends (Ollama, OpenAI-compatible servers)
//! - Context assembler for advisor prompt grounding

pub mod ai;
pub mod categorize;
pub mod context;
pub mod db;
pub mod error;
pub mod forecast;
pub mod import;
pub mod models;
pub mod trends;

pub use ai::{AdvisorBackend, AiClient, ExtractedLineItem, MockBackend, OllamaBackend};
pub use context::FinancialContext;
pub use db::Database;
pub use error::{Error, Result};
pub use forecast::{Assumptions, ForecastRow, Outlook, StartingPosition};
pub use import::ReviewItem;
pub use trends::SnapshotSummary;
