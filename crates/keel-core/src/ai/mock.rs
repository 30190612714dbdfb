//! Mock backend for testing
//!
//! Deterministic responses for all advisor operations, so tests and
//! development never need a running LLM server.

use async_trait::async_trait;

use crate::context::FinancialContext;
use crate::error::Result;
use crate::forecast::{Assumptions, ForecastRow};
use crate::models::{
    ChatMessage, Confidence, Decision, DecisionAnalysis, ForecastReview, Sentiment, Verdict,
};

use super::types::ExtractedLineItem;
use super::AdvisorBackend;

/// Mock advisor backend for testing
#[derive(Clone, Default)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self { healthy: true }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self { healthy: false }
    }
}

#[async_trait]
impl AdvisorBackend for MockBackend {
    async fn extract_line_items(&self, statement_text: &str) -> Result<Vec<ExtractedLineItem>> {
        // Treat each "name, amount" line as a line item; fall back to a
        // small fixed statement when nothing parses.
        let mut items: Vec<ExtractedLineItem> = statement_text
            .lines()
            .filter_map(|line| {
                let (name, amount) = line.rsplit_once(',')?;
                let amount: f64 = amount.trim().trim_start_matches('$').parse().ok()?;
                let name = name.trim();
                if name.is_empty() {
                    return None;
                }
                Some(ExtractedLineItem {
                    line_name: name.to_string(),
                    amount,
                })
            })
            .collect();

        if items.is_empty() {
            items = vec![
                ExtractedLineItem {
                    line_name: "Revenue - Subscriptions".to_string(),
                    amount: 12_000.0,
                },
                ExtractedLineItem {
                    line_name: "Office Rent".to_string(),
                    amount: 2_500.0,
                },
                ExtractedLineItem {
                    line_name: "Payroll".to_string(),
                    amount: 8_000.0,
                },
            ];
        }

        Ok(items)
    }

    async fn review_forecast(
        &self,
        _ctx: &FinancialContext,
        assumptions: &Assumptions,
        rows: &[ForecastRow],
    ) -> Result<ForecastReview> {
        let ending_cash = rows.last().map(|r| r.cash).unwrap_or(0);
        let goes_negative = rows.iter().any(|r| r.cash < 0);

        let sentiment = if goes_negative {
            Sentiment::Concerning
        } else if rows.iter().any(|r| r.net_change < 0) {
            Sentiment::Cautious
        } else {
            Sentiment::Positive
        };

        Ok(ForecastReview {
            health_assessment: format!(
                "Over {} months the projection ends at {} in cash.",
                assumptions.months_to_forecast, ending_cash
            ),
            key_insight: if goes_negative {
                "Cash goes negative inside the forecast window.".to_string()
            } else {
                "Cash stays positive across the forecast window.".to_string()
            },
            recommendation: "Revisit the assumptions after your next snapshot.".to_string(),
            sentiment,
        })
    }

    async fn analyze_decision(
        &self,
        _ctx: &FinancialContext,
        decision: &Decision,
    ) -> Result<DecisionAnalysis> {
        Ok(DecisionAnalysis {
            recommendation: Verdict::Depends,
            summary: format!("\"{}\" comes down to your runway.", decision.title),
            considerations: vec![
                "How many months of cash remain after the spend".to_string(),
                "Whether the expense is reversible".to_string(),
            ],
            watch_out_for: "Committing before the next revenue number lands.".to_string(),
            confidence: Confidence::Medium,
        })
    }

    async fn advise(
        &self,
        ctx: &FinancialContext,
        history: &[ChatMessage],
        user_message: &str,
    ) -> Result<String> {
        Ok(format!(
            "Regarding \"{}\" for {}: based on the numbers you've shared ({} prior messages), \
             you're in a workable position. Keep your snapshot current and re-ask after the \
             next one.",
            user_message,
            ctx.business_name,
            history.len()
        ))
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
