//! Prompt construction for the advisor backends
//!
//! All prompts keep the same register: a calm, plain-spoken CFO talking to
//! a founder, grounded in the numbers from `FinancialContext`. Backends
//! that return free text get an explicit JSON shape spelled out where a
//! structured response is required.

use crate::context::{format_dollars, FinancialContext};
use crate::forecast::{Assumptions, ForecastRow};
use crate::models::{ChatMessage, Decision, Role};

/// Messages of history embedded in a conversation prompt
const HISTORY_WINDOW: usize = 10;

/// Prompt for extracting line items from raw statement text
pub fn extract_line_items(statement_text: &str) -> String {
    format!(
        "Extract the line items from this financial statement. Each line item has a name \
         and a dollar amount. Ignore headers, totals, and subtotals.\n\n\
         Statement:\n{}\n\n\
         Respond with only a JSON object of the form:\n\
         {{\"line_items\": [{{\"line_name\": \"...\", \"amount\": 123.45}}]}}",
        statement_text
    )
}

/// Prompt for reviewing a computed forecast
pub fn review_forecast(
    ctx: &FinancialContext,
    assumptions: &Assumptions,
    rows: &[ForecastRow],
) -> String {
    let ending_cash = rows.last().map(|r| r.cash).unwrap_or(0);

    format!(
        "As a calm, thoughtful CFO, analyze this financial forecast for a small business. \
         Be conversational and reassuring.\n\n\
         {}\n\n\
         Forecast assumptions:\n\
         - Revenue growth: {}% per month\n\
         - Expense change: {}% per month\n\n\
         {}-month forecast ending cash: {}\n\n\
         Provide brief, actionable insights. Focus on:\n\
         1. Overall health assessment (1-2 sentences)\n\
         2. Key risk or opportunity (1-2 sentences)\n\
         3. One specific recommendation (1-2 sentences)\n\n\
         Keep it warm and human, not robotic. Use plain language.\n\n\
         Respond with only a JSON object of the form:\n\
         {{\"health_assessment\": \"...\", \"key_insight\": \"...\", \"recommendation\": \"...\", \
         \"sentiment\": \"positive\" | \"cautious\" | \"concerning\"}}",
        ctx.grounding_block(),
        assumptions.revenue_growth_pct,
        assumptions.expense_change_pct,
        assumptions.months_to_forecast,
        format_dollars(ending_cash as f64),
    )
}

/// Prompt for analyzing a tracked decision
pub fn analyze_decision(ctx: &FinancialContext, decision: &Decision) -> String {
    let amount_line = decision
        .amount
        .map(|a| format!("Amount involved: {}\n", format_dollars(a)))
        .unwrap_or_default();
    let context_line = decision
        .context
        .as_deref()
        .map(|c| format!("Additional context: {}\n", c))
        .unwrap_or_default();

    format!(
        "As a thoughtful, calm CFO advising a small business founder, analyze this \
         financial decision:\n\n\
         Decision: {}\n\
         Question: {}\n\
         {}{}\n\
         {}\n\n\
         Provide a balanced analysis with:\n\
         1. A clear recommendation (yes, no, or it depends)\n\
         2. Key considerations (2-3 bullet points)\n\
         3. What to watch out for\n\
         4. A confidence level for your recommendation\n\n\
         Be warm, conversational, and reassuring. Use plain language. Remember this is \
         a real person making a stressful decision.\n\n\
         Respond with only a JSON object of the form:\n\
         {{\"recommendation\": \"yes\" | \"no\" | \"depends\", \"summary\": \"...\", \
         \"considerations\": [\"...\"], \"watch_out_for\": \"...\", \
         \"confidence\": \"high\" | \"medium\" | \"low\"}}",
        decision.title,
        decision.question,
        amount_line,
        context_line,
        ctx.grounding_block(),
    )
}

/// Prompt for one conversational advisor turn
pub fn advise(ctx: &FinancialContext, history: &[ChatMessage], user_message: &str) -> String {
    let window_start = history.len().saturating_sub(HISTORY_WINDOW);
    let transcript = history[window_start..]
        .iter()
        .map(|m| {
            let speaker = match m.role {
                Role::User => "User",
                Role::Assistant => "Advisor",
            };
            format!("{}: {}", speaker, m.content)
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "You are a calm, thoughtful virtual CFO for small business founders. \
         You're like a wise friend who happens to be great with numbers. You speak in \
         plain language, you're reassuring but honest, and you always ground your advice \
         in the user's actual financial situation.\n\n\
         {}\n\n\
         Conversation so far:\n{}\n\n\
         User's latest message: {}\n\n\
         Respond naturally and helpfully. If you reference numbers, explain what they \
         mean in plain terms. Keep responses concise but warm. Use short paragraphs. \
         Don't be overly formal or use jargon. If you don't have enough information to \
         answer something, say so and suggest what data would help.",
        ctx.grounding_block(),
        transcript,
        user_message,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn bare_context() -> FinancialContext {
        FinancialContext {
            business_name: "Test Co".to_string(),
            latest: None,
        }
    }

    #[test]
    fn test_advise_prompt_windows_history() {
        let history: Vec<ChatMessage> = (0..25)
            .map(|i| ChatMessage {
                role: if i % 2 == 0 { Role::User } else { Role::Assistant },
                content: format!("message {}", i),
                timestamp: Utc::now(),
            })
            .collect();

        let prompt = advise(&bare_context(), &history, "latest question");

        // Only the last 10 messages appear.
        assert!(!prompt.contains("message 14"));
        assert!(prompt.contains("message 15"));
        assert!(prompt.contains("message 24"));
        assert!(prompt.contains("latest question"));
    }

    #[test]
    fn test_decision_prompt_omits_absent_fields() {
        let decision = Decision {
            id: 1,
            business_id: 1,
            title: "Buy an oven".to_string(),
            question: "Worth it?".to_string(),
            amount: None,
            context: None,
            status: Default::default(),
            analysis: None,
            created_at: Utc::now(),
        };

        let prompt = analyze_decision(&bare_context(), &decision);
        assert!(!prompt.contains("Amount involved"));
        assert!(!prompt.contains("Additional context"));
        assert!(prompt.contains("Buy an oven"));
    }
}
