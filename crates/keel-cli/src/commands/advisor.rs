//! One-off advisor question command

use anyhow::{bail, Result};
use chrono::Utc;

use keel_core::ai::AdvisorBackend;
use keel_core::db::Database;
use keel_core::models::{conversation_title, ChatMessage, Role};
use keel_core::{AiClient, FinancialContext};

/// keel ask
///
/// Starts a new conversation thread with the question, prints the reply,
/// and saves both turns so the web UI picks the thread up.
pub async fn cmd_ask(db: &Database, business_id: i64, question: &str) -> Result<()> {
    let Some(business) = db.get_business(business_id)? else {
        bail!("Business {} not found", business_id);
    };

    let question = question.trim();
    if question.is_empty() {
        bail!("Ask a question, e.g.: keel ask --business 1 \"Can I afford a hire?\"");
    }

    let Some(ai) = AiClient::from_env() else {
        bail!("No advisor backend configured (set OLLAMA_HOST, or AI_BACKEND=mock to try it out)");
    };

    let mut messages = vec![ChatMessage {
        role: Role::User,
        content: question.to_string(),
        timestamp: Utc::now(),
    }];

    let ctx = FinancialContext::assemble(db, &business)?;
    let reply = ai.advise(&ctx, &messages, question).await?;

    messages.push(ChatMessage {
        role: Role::Assistant,
        content: reply.clone(),
        timestamp: Utc::now(),
    });
    db.create_conversation(business_id, &conversation_title(question), &messages)?;

    println!("{}", reply);
    Ok(())
}
