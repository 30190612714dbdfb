//! Decision tracking commands

use anyhow::{bail, Result};

use keel_core::ai::AdvisorBackend;
use keel_core::context::format_dollars;
use keel_core::db::Database;
use keel_core::models::{DecisionStatus, NewDecision};
use keel_core::{AiClient, FinancialContext};

/// keel decision add
pub fn cmd_decision_add(
    db: &Database,
    business_id: i64,
    title: &str,
    question: &str,
    amount: Option<f64>,
    context: Option<&str>,
) -> Result<()> {
    if db.get_business(business_id)?.is_none() {
        bail!("Business {} not found", business_id);
    }

    let decision = NewDecision {
        title: title.to_string(),
        question: question.to_string(),
        amount,
        context: context.map(str::to_string),
    };
    let id = db.create_decision(business_id, &decision)?;
    println!("Tracking decision {} ({})", title, id);
    Ok(())
}

/// keel decision list
pub fn cmd_decision_list(db: &Database, business_id: i64) -> Result<()> {
    if db.get_business(business_id)?.is_none() {
        bail!("Business {} not found", business_id);
    }

    let decisions = db.list_decisions(business_id)?;
    if decisions.is_empty() {
        println!("No decisions tracked yet. Add one with: keel decision add");
        return Ok(());
    }

    println!(
        "{:<5} {:<32} {:<14} {:>12} {}",
        "ID", "TITLE", "STATUS", "AMOUNT", "ADVISOR"
    );
    for decision in decisions {
        println!(
            "{:<5} {:<32} {:<14} {:>12} {}",
            decision.id,
            decision.title,
            decision.status.as_str(),
            decision
                .amount
                .map(format_dollars)
                .unwrap_or_else(|| "-".to_string()),
            decision
                .analysis
                .map(|a| format!("{:?}", a.recommendation).to_lowercase())
                .unwrap_or_default(),
        );
    }
    Ok(())
}

/// keel decision analyze
pub async fn cmd_decision_analyze(db: &Database, decision_id: i64) -> Result<()> {
    let Some(decision) = db.get_decision(decision_id)? else {
        bail!("Decision {} not found", decision_id);
    };
    let Some(business) = db.get_business(decision.business_id)? else {
        bail!("Business {} not found", decision.business_id);
    };

    let Some(ai) = AiClient::from_env() else {
        bail!("No advisor backend configured (set OLLAMA_HOST, or AI_BACKEND=mock to try it out)");
    };

    let ctx = FinancialContext::assemble(db, &business)?;
    let analysis = ai.analyze_decision(&ctx, &decision).await?;
    db.set_decision_analysis(decision_id, &analysis)?;

    println!("{}", decision.title);
    println!();
    println!(
        "Recommendation: {:?} (confidence: {:?})",
        analysis.recommendation, analysis.confidence
    );
    println!();
    println!("{}", analysis.summary);
    println!();
    for consideration in &analysis.considerations {
        println!("  - {}", consideration);
    }
    println!();
    println!("Watch out for: {}", analysis.watch_out_for);
    Ok(())
}

/// keel decision status
pub fn cmd_decision_status(db: &Database, decision_id: i64, status: &str) -> Result<()> {
    let status: DecisionStatus = status.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    if db.get_decision(decision_id)?.is_none() {
        bail!("Decision {} not found", decision_id);
    }

    db.set_decision_status(decision_id, status)?;
    println!("Decision {} is now {}", decision_id, status);
    Ok(())
}
