//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Keel - Financial clarity for small-business founders
#[derive(Parser)]
#[command(name = "keel")]
#[command(about = "Snapshots, forecasts, and a grounded advisor for your business", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "keel.db", env = "KEEL_DB", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Manage businesses
    Business {
        #[command(subcommand)]
        action: BusinessAction,
    },

    /// Record and inspect financial snapshots
    Snapshot {
        #[command(subcommand)]
        action: SnapshotAction,
    },

    /// Show runway, burn, and trends for a business
    Summary {
        /// Business ID
        #[arg(short, long)]
        business: i64,
    },

    /// Project cash forward under what-if assumptions
    Forecast {
        /// Business ID
        #[arg(short, long)]
        business: i64,

        /// Monthly revenue growth percent
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        growth: f64,

        /// Monthly expense change percent
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        expense_change: f64,

        /// Months to forecast (UI range 1-36)
        #[arg(long, default_value = "12")]
        months: u32,
    },

    /// Import a financial statement and categorize its line items
    Statement {
        #[command(subcommand)]
        action: StatementAction,
    },

    /// Track financial decisions
    Decision {
        #[command(subcommand)]
        action: DecisionAction,
    },

    /// Ask the advisor a one-off question
    Ask {
        /// Business ID
        #[arg(short, long)]
        business: i64,

        /// The question to ask
        question: String,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        ///
        /// WARNING: Do not use this flag when exposing the server to a
        /// network. By default the server requires a bearer API key from
        /// KEEL_API_KEYS.
        #[arg(long)]
        no_auth: bool,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum BusinessAction {
    /// Add a business
    Add {
        /// Business name
        name: String,

        /// Industry label
        #[arg(long)]
        industry: Option<String>,
    },

    /// List businesses
    List,
}

#[derive(Subcommand)]
pub enum SnapshotAction {
    /// Record a snapshot for a period
    Add {
        /// Business ID
        #[arg(short, long)]
        business: i64,

        /// Period as YYYY-MM
        #[arg(long)]
        period: String,

        /// Cash in the bank
        #[arg(long, allow_hyphen_values = true)]
        cash: f64,

        /// Revenue this period
        #[arg(long, default_value = "0")]
        revenue: f64,

        /// Expenses this period
        #[arg(long, default_value = "0")]
        expenses: f64,

        /// Accounts receivable
        #[arg(long, default_value = "0")]
        receivables: f64,

        /// Accounts payable
        #[arg(long, default_value = "0")]
        payables: f64,

        /// Free-form notes about the period
        #[arg(long)]
        notes: Option<String>,
    },

    /// List snapshot history
    List {
        /// Business ID
        #[arg(short, long)]
        business: i64,

        /// Maximum rows to show
        #[arg(long, default_value = "12")]
        limit: usize,
    },
}

#[derive(Subcommand)]
pub enum StatementAction {
    /// Import a statement file and review its line items
    Import {
        /// Business ID
        #[arg(short, long)]
        business: i64,

        /// Statement file (CSV, or anything the advisor can read)
        #[arg(short, long)]
        file: PathBuf,

        /// Statement type: profit_loss, balance_sheet, cash_flow
        #[arg(long, default_value = "profit_loss")]
        statement_type: String,

        /// Period as YYYY-MM
        #[arg(long)]
        period: String,

        /// Confirm the suggested categories without prompting
        #[arg(short, long)]
        yes: bool,
    },

    /// List a statement's confirmed line items
    Items {
        /// Statement ID
        #[arg(short, long)]
        statement: i64,
    },
}

#[derive(Subcommand)]
pub enum DecisionAction {
    /// Track a new decision
    Add {
        /// Business ID
        #[arg(short, long)]
        business: i64,

        /// Short decision title
        #[arg(long)]
        title: String,

        /// The yes/no question being weighed
        #[arg(long)]
        question: String,

        /// Dollar amount involved
        #[arg(long)]
        amount: Option<f64>,

        /// Additional context for the advisor
        #[arg(long)]
        context: Option<String>,
    },

    /// List decisions
    List {
        /// Business ID
        #[arg(short, long)]
        business: i64,
    },

    /// Ask the advisor to analyze a decision
    Analyze {
        /// Decision ID
        #[arg(short, long)]
        decision: i64,
    },

    /// Move a decision to a new status
    Status {
        /// Decision ID
        #[arg(short, long)]
        decision: i64,

        /// New status: considering, decided_yes, decided_no, deferred
        #[arg(long)]
        status: String,
    },
}
