//! Decision tracking handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    Json,
};
use serde::Deserialize;

use crate::{get_user, AppError, AppState, SuccessResponse};
use keel_core::ai::AdvisorBackend;
use keel_core::models::{Decision, DecisionStatus, NewDecision};
use keel_core::FinancialContext;

use super::read_json_default;

/// GET /api/businesses/:id/decisions - List decisions, newest first
pub async fn list_decisions(
    State(state): State<Arc<AppState>>,
    Path(business_id): Path<i64>,
) -> Result<Json<Vec<Decision>>, AppError> {
    state
        .db
        .get_business(business_id)?
        .ok_or_else(|| AppError::not_found("Business not found"))?;

    let decisions = state.db.list_decisions(business_id)?;
    Ok(Json(decisions))
}

/// POST /api/businesses/:id/decisions - Track a new decision
pub async fn create_decision(
    State(state): State<Arc<AppState>>,
    Path(business_id): Path<i64>,
    request: Request,
) -> Result<Json<Decision>, AppError> {
    let user = get_user(request.headers());
    let req: NewDecision = read_json_default(request).await?;

    state
        .db
        .get_business(business_id)?
        .ok_or_else(|| AppError::not_found("Business not found"))?;

    if req.title.trim().is_empty() || req.question.trim().is_empty() {
        return Err(AppError::bad_request("Title and question are required"));
    }
    if let Some(amount) = req.amount {
        if !amount.is_finite() {
            return Err(AppError::bad_request("amount must be a finite number"));
        }
    }

    let decision_id = state.db.create_decision(business_id, &req)?;

    state.db.log_audit(
        &user,
        "create",
        Some("decision"),
        Some(decision_id),
        Some(&format!("title={}", req.title)),
    )?;

    let decision = state
        .db
        .get_decision(decision_id)?
        .ok_or_else(|| AppError::internal("Decision not found after creation"))?;

    Ok(Json(decision))
}

/// Request body for updating a decision's status
#[derive(Debug, Deserialize)]
pub struct UpdateDecisionRequest {
    pub status: String,
}

/// PATCH /api/decisions/:id - Move a decision to a new status
pub async fn update_decision(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Decision>, AppError> {
    let user = get_user(request.headers());
    let req: UpdateDecisionRequest = read_json_default(request).await?;

    let status: DecisionStatus = req.status.parse().map_err(|_| {
        AppError::bad_request(&format!(
            "Invalid status: {}. Valid: considering, decided_yes, decided_no, deferred",
            req.status
        ))
    })?;

    state
        .db
        .get_decision(id)?
        .ok_or_else(|| AppError::not_found("Decision not found"))?;

    state.db.set_decision_status(id, status)?;

    state.db.log_audit(
        &user,
        "update",
        Some("decision"),
        Some(id),
        Some(&format!("status={}", status)),
    )?;

    let decision = state
        .db
        .get_decision(id)?
        .ok_or_else(|| AppError::not_found("Decision not found"))?;

    Ok(Json(decision))
}

/// DELETE /api/decisions/:id - Delete a decision
pub async fn delete_decision(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let user = get_user(request.headers());

    state
        .db
        .get_decision(id)?
        .ok_or_else(|| AppError::not_found("Decision not found"))?;

    state.db.delete_decision(id)?;

    state
        .db
        .log_audit(&user, "delete", Some("decision"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}

/// POST /api/decisions/:id/analyze - Ask the advisor for an analysis
pub async fn analyze_decision(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Decision>, AppError> {
    let user = get_user(request.headers());

    let ai = state
        .ai
        .as_ref()
        .ok_or_else(|| AppError::unavailable("No advisor backend is configured"))?;

    let decision = state
        .db
        .get_decision(id)?
        .ok_or_else(|| AppError::not_found("Decision not found"))?;

    let business = state
        .db
        .get_business(decision.business_id)?
        .ok_or_else(|| AppError::not_found("Business not found"))?;

    let ctx = FinancialContext::assemble(&state.db, &business)?;
    let analysis = ai.analyze_decision(&ctx, &decision).await?;

    state.db.set_decision_analysis(id, &analysis)?;

    state.db.log_audit(
        &user,
        "analyze",
        Some("decision"),
        Some(id),
        Some(&format!("recommendation={:?}", analysis.recommendation)),
    )?;

    let decision = state
        .db
        .get_decision(id)?
        .ok_or_else(|| AppError::not_found("Decision not found"))?;

    Ok(Json(decision))
}
