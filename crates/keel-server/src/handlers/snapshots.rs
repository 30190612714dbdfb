//! Snapshot and summary handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    Json,
};

use crate::{get_user, AppError, AppState};
use keel_core::models::{NewSnapshot, Snapshot};
use keel_core::trends::SnapshotSummary;

use super::read_json_default;

/// GET /api/businesses/:id/snapshots - Snapshot history, newest period first
pub async fn list_snapshots(
    State(state): State<Arc<AppState>>,
    Path(business_id): Path<i64>,
) -> Result<Json<Vec<Snapshot>>, AppError> {
    state
        .db
        .get_business(business_id)?
        .ok_or_else(|| AppError::not_found("Business not found"))?;

    let snapshots = state.db.list_snapshots(business_id)?;
    Ok(Json(snapshots))
}

/// POST /api/businesses/:id/snapshots - Record a new snapshot
pub async fn create_snapshot(
    State(state): State<Arc<AppState>>,
    Path(business_id): Path<i64>,
    request: Request,
) -> Result<Json<Snapshot>, AppError> {
    let user = get_user(request.headers());
    let req: NewSnapshot = read_json_default(request).await?;

    state
        .db
        .get_business(business_id)?
        .ok_or_else(|| AppError::not_found("Business not found"))?;

    let snapshot_id = state.db.insert_snapshot(business_id, &req)?;

    state.db.log_audit(
        &user,
        "create",
        Some("snapshot"),
        Some(snapshot_id),
        Some(&format!("period={}", req.period)),
    )?;

    let snapshot = state
        .db
        .get_snapshot(snapshot_id)?
        .ok_or_else(|| AppError::internal("Snapshot not found after creation"))?;

    Ok(Json(snapshot))
}

/// GET /api/businesses/:id/summary - Runway, burn, and trends at a glance
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Path(business_id): Path<i64>,
) -> Result<Json<SnapshotSummary>, AppError> {
    state
        .db
        .get_business(business_id)?
        .ok_or_else(|| AppError::not_found("Business not found"))?;

    let (latest, previous) = state.db.latest_snapshots(business_id)?;
    let latest =
        latest.ok_or_else(|| AppError::not_found("No snapshots recorded for this business"))?;

    Ok(Json(SnapshotSummary::build(latest, previous)))
}
