//! Statement upload, review, and confirmation handlers
//!
//! Upload extracts line items (CSV locally, anything else via the advisor
//! backend) and returns the suggested review list. Nothing is written to
//! the line-item history until the founder confirms.

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    Json,
};
use base64::Engine;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{get_user, AppError, AppState, MAX_UPLOAD_SIZE};
use keel_core::import::{self, ReviewItem};
use keel_core::models::{LineItem, Statement, StatementType};

use super::read_json;

/// Request body for uploading a statement
#[derive(Debug, Deserialize)]
pub struct UploadStatementRequest {
    pub file_name: String,
    pub statement_type: String,
    /// Month the statement covers (YYYY-MM-DD)
    pub period: NaiveDate,
    /// File content, base64-encoded
    pub content: String,
    pub notes: Option<String>,
}

/// Response for an upload: the statement id plus the items to review
#[derive(Debug, Serialize)]
pub struct UploadStatementResponse {
    pub statement_id: i64,
    pub items: Vec<ReviewItem>,
    /// How many suggestions came from the founder's past uploads
    pub suggested_count: usize,
}

/// POST /api/businesses/:id/statements - Upload and extract a statement
pub async fn upload_statement(
    State(state): State<Arc<AppState>>,
    Path(business_id): Path<i64>,
    request: Request,
) -> Result<Json<UploadStatementResponse>, AppError> {
    let user = get_user(request.headers());
    let req: UploadStatementRequest = read_json(request, MAX_UPLOAD_SIZE).await?;

    state
        .db
        .get_business(business_id)?
        .ok_or_else(|| AppError::not_found("Business not found"))?;

    let statement_type: StatementType = req.statement_type.parse().map_err(|_| {
        AppError::bad_request(&format!(
            "Invalid statement_type: {}. Valid: profit_loss, balance_sheet, cash_flow",
            req.statement_type
        ))
    })?;

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(&req.content)
        .map_err(|_| AppError::bad_request("content must be base64-encoded"))?;

    let file_hash = import::file_hash(&bytes);
    if state
        .db
        .find_statement_by_hash(business_id, &file_hash)?
        .is_some()
    {
        return Err(AppError::conflict(
            "This file has already been uploaded for this business",
        ));
    }

    let extracted = import::extract(&bytes, &req.file_name, state.ai.as_ref()).await?;
    if extracted.is_empty() {
        return Err(AppError::bad_request(
            "No line items could be extracted from this file",
        ));
    }

    let history = state.db.recent_line_items(business_id)?;
    let items = import::suggest_categories(&extracted, &history);

    let statement_id = state.db.insert_statement(
        business_id,
        statement_type,
        req.period,
        &req.file_name,
        &file_hash,
        req.notes.as_deref(),
    )?;

    state.db.log_audit(
        &user,
        "upload",
        Some("statement"),
        Some(statement_id),
        Some(&format!(
            "file={}, items={}",
            req.file_name,
            items.len()
        )),
    )?;

    let suggested_count = items.iter().filter(|i| i.is_suggested).count();

    Ok(Json(UploadStatementResponse {
        statement_id,
        items,
        suggested_count,
    }))
}

/// GET /api/businesses/:id/statements - List uploaded statements
pub async fn list_statements(
    State(state): State<Arc<AppState>>,
    Path(business_id): Path<i64>,
) -> Result<Json<Vec<Statement>>, AppError> {
    state
        .db
        .get_business(business_id)?
        .ok_or_else(|| AppError::not_found("Business not found"))?;

    let statements = state.db.list_statements(business_id)?;
    Ok(Json(statements))
}

/// Request body for confirming reviewed line items
#[derive(Debug, Deserialize)]
pub struct ConfirmStatementRequest {
    pub items: Vec<ReviewItem>,
}

/// Response for a confirmation
#[derive(Debug, Serialize)]
pub struct ConfirmStatementResponse {
    pub statement_id: i64,
    pub saved: usize,
}

/// POST /api/statements/:id/confirm - Finalize reviewed line items
pub async fn confirm_statement(
    State(state): State<Arc<AppState>>,
    Path(statement_id): Path<i64>,
    request: Request,
) -> Result<Json<ConfirmStatementResponse>, AppError> {
    let user = get_user(request.headers());
    let req: ConfirmStatementRequest = read_json(request, MAX_UPLOAD_SIZE).await?;

    let statement = state
        .db
        .get_statement(statement_id)?
        .ok_or_else(|| AppError::not_found("Statement not found"))?;

    if req.items.is_empty() {
        return Err(AppError::bad_request("No line items to confirm"));
    }
    if !state.db.list_line_items(statement_id)?.is_empty() {
        return Err(AppError::conflict(
            "This statement's line items have already been confirmed",
        ));
    }

    // Re-derive the reuse flag against current history: only categories
    // still matching an exact historical suggestion keep it.
    let history = state.db.recent_line_items(statement.business_id)?;
    let batch = import::finalize(&req.items, &history);

    let saved = state
        .db
        .insert_line_items(statement.business_id, statement_id, &batch)?;

    state.db.log_audit(
        &user,
        "confirm",
        Some("statement"),
        Some(statement_id),
        Some(&format!("items={}", saved)),
    )?;

    Ok(Json(ConfirmStatementResponse { statement_id, saved }))
}

/// GET /api/statements/:id/items - List a statement's confirmed line items
pub async fn list_line_items(
    State(state): State<Arc<AppState>>,
    Path(statement_id): Path<i64>,
) -> Result<Json<Vec<LineItem>>, AppError> {
    state
        .db
        .get_statement(statement_id)?
        .ok_or_else(|| AppError::not_found("Statement not found"))?;

    let items = state.db.list_line_items(statement_id)?;
    Ok(Json(items))
}
