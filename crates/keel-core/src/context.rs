//! Financial context assembler for advisor prompts
//!
//! Every LLM feature grounds its prompt in the business's stored numbers.
//! This module builds that grounding block from the latest snapshot so the
//! advisor never answers from thin air.

use crate::db::Database;
use crate::error::Result;
use crate::models::{Business, Snapshot};

/// The numbers an advisor prompt is grounded in
#[derive(Debug, Clone)]
pub struct FinancialContext {
    pub business_name: String,
    pub latest: Option<Snapshot>,
}

impl FinancialContext {
    /// Assemble context for a business from storage
    pub fn assemble(db: &Database, business: &Business) -> Result<Self> {
        let (latest, _) = db.latest_snapshots(business.id)?;
        Ok(Self {
            business_name: business.name.clone(),
            latest,
        })
    }

    /// Render the grounding block embedded in every prompt
    pub fn grounding_block(&self) -> String {
        let Some(snapshot) = &self.latest else {
            return "No financial data available yet.".to_string();
        };

        format!(
            "Current financial situation for {}:\n\
             - Cash in bank: {}\n\
             - Monthly revenue: {}\n\
             - Monthly expenses: {}\n\
             - Net monthly: {}\n\
             - Accounts receivable: {}\n\
             - Accounts payable: {}",
            self.business_name,
            format_dollars(snapshot.cash_balance),
            format_dollars(snapshot.revenue),
            format_dollars(snapshot.expenses),
            format_dollars(snapshot.revenue - snapshot.expenses),
            format_dollars(snapshot.accounts_receivable),
            format_dollars(snapshot.accounts_payable),
        )
    }
}

/// Whole-dollar display used inside prompts ($12,500 / -$300)
pub fn format_dollars(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let sign = if rounded < 0 { "-" } else { "" };
    let digits = rounded.abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{}${}", sign, grouped)
}
