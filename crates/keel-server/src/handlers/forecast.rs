//! Forecast handlers
//!
//! The projection itself is pure and never persisted; these handlers wire
//! the latest snapshot into the engine and, for the review endpoint, hand
//! the result to the advisor backend.

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;

use crate::{AppError, AppState};
use keel_core::ai::AdvisorBackend;
use keel_core::forecast::{self, Assumptions, ForecastRow, Outlook, StartingPosition};
use keel_core::models::{ForecastReview, Snapshot};
use keel_core::FinancialContext;

use super::read_json_default;

/// Forecast response: the projected rows plus the runway outlook
#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub rows: Vec<ForecastRow>,
    pub outlook: Option<Outlook>,
}

async fn latest_snapshot(state: &AppState, business_id: i64) -> Result<Snapshot, AppError> {
    state
        .db
        .get_business(business_id)?
        .ok_or_else(|| AppError::not_found("Business not found"))?;

    let (latest, _) = state.db.latest_snapshots(business_id)?;
    latest.ok_or_else(|| AppError::not_found("No snapshots recorded for this business"))
}

/// POST /api/businesses/:id/forecast - Project cash forward
pub async fn run_forecast(
    State(state): State<Arc<AppState>>,
    Path(business_id): Path<i64>,
    request: Request,
) -> Result<Json<ForecastResponse>, AppError> {
    let assumptions: Assumptions = read_json_default(request).await?;

    let snapshot = latest_snapshot(&state, business_id).await?;
    let today = Utc::now().date_naive();

    let rows = forecast::project(StartingPosition::from(&snapshot), &assumptions, today)?;
    let outlook = forecast::outlook(&rows);

    Ok(Json(ForecastResponse { rows, outlook }))
}

/// POST /api/businesses/:id/forecast/review - Advisor review of a projection
pub async fn review_forecast(
    State(state): State<Arc<AppState>>,
    Path(business_id): Path<i64>,
    request: Request,
) -> Result<Json<ForecastReview>, AppError> {
    let assumptions: Assumptions = read_json_default(request).await?;

    let ai = state
        .ai
        .as_ref()
        .ok_or_else(|| AppError::unavailable("No advisor backend is configured"))?;

    let business = state
        .db
        .get_business(business_id)?
        .ok_or_else(|| AppError::not_found("Business not found"))?;

    let (latest, _) = state.db.latest_snapshots(business_id)?;
    let snapshot =
        latest.ok_or_else(|| AppError::not_found("No snapshots recorded for this business"))?;

    let today = Utc::now().date_naive();
    let rows = forecast::project(StartingPosition::from(&snapshot), &assumptions, today)?;

    let ctx = FinancialContext::assemble(&state.db, &business)?;
    let review = ai.review_forecast(&ctx, &assumptions, &rows).await?;

    Ok(Json(review))
}
