//! Keel CLI - Financial clarity for small-business founders
//!
//! Usage:
//!   keel init                     Initialize database
//!   keel snapshot add ...         Record this month's numbers
//!   keel summary --business 1     Runway, burn, and trends
//!   keel forecast --business 1    Project cash forward
//!   keel serve --port 3000        Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Business { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                BusinessAction::Add { name, industry } => {
                    commands::cmd_business_add(&db, &name, industry.as_deref())
                }
                BusinessAction::List => commands::cmd_business_list(&db),
            }
        }
        Commands::Snapshot { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                SnapshotAction::Add {
                    business,
                    period,
                    cash,
                    revenue,
                    expenses,
                    receivables,
                    payables,
                    notes,
                } => commands::cmd_snapshot_add(
                    &db,
                    business,
                    &period,
                    cash,
                    revenue,
                    expenses,
                    receivables,
                    payables,
                    notes.as_deref(),
                ),
                SnapshotAction::List { business, limit } => {
                    commands::cmd_snapshot_list(&db, business, limit)
                }
            }
        }
        Commands::Summary { business } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_summary(&db, business)
        }
        Commands::Forecast {
            business,
            growth,
            expense_change,
            months,
        } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_forecast(&db, business, growth, expense_change, months)
        }
        Commands::Statement { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                StatementAction::Import {
                    business,
                    file,
                    statement_type,
                    period,
                    yes,
                } => {
                    commands::cmd_statement_import(&db, business, &file, &statement_type, &period, yes)
                        .await
                }
                StatementAction::Items { statement } => {
                    commands::cmd_statement_items(&db, statement)
                }
            }
        }
        Commands::Decision { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                DecisionAction::Add {
                    business,
                    title,
                    question,
                    amount,
                    context,
                } => commands::cmd_decision_add(
                    &db,
                    business,
                    &title,
                    &question,
                    amount,
                    context.as_deref(),
                ),
                DecisionAction::List { business } => commands::cmd_decision_list(&db, business),
                DecisionAction::Analyze { decision } => {
                    commands::cmd_decision_analyze(&db, decision).await
                }
                DecisionAction::Status { decision, status } => {
                    commands::cmd_decision_status(&db, decision, &status)
                }
            }
        }
        Commands::Ask { business, question } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_ask(&db, business, &question).await
        }
        Commands::Serve {
            port,
            host,
            no_auth,
            static_dir,
        } => commands::cmd_serve(&cli.db, &host, port, no_auth, static_dir.as_deref()).await,
    }
}
