//! Business management handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    Json,
};
use serde::Deserialize;

use crate::{get_user, AppError, AppState, SuccessResponse};
use keel_core::models::Business;

use super::read_json_default;

/// GET /api/businesses - List all businesses
pub async fn list_businesses(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Business>>, AppError> {
    let businesses = state.db.list_businesses()?;
    Ok(Json(businesses))
}

/// GET /api/businesses/:id - Get a specific business
pub async fn get_business(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Business>, AppError> {
    let business = state
        .db
        .get_business(id)?
        .ok_or_else(|| AppError::not_found("Business not found"))?;

    Ok(Json(business))
}

/// Request body for creating a business
#[derive(Debug, Deserialize)]
pub struct CreateBusinessRequest {
    pub name: String,
    pub industry: Option<String>,
}

/// POST /api/businesses - Create a new business
pub async fn create_business(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Business>, AppError> {
    let user = get_user(request.headers());
    let req: CreateBusinessRequest = read_json_default(request).await?;

    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("Business name is required"));
    }

    let business_id = state.db.create_business(name, req.industry.as_deref())?;

    state.db.log_audit(
        &user,
        "create",
        Some("business"),
        Some(business_id),
        Some(&format!("name={}", name)),
    )?;

    let business = state
        .db
        .get_business(business_id)?
        .ok_or_else(|| AppError::internal("Business not found after creation"))?;

    Ok(Json(business))
}

/// Request body for updating a business
#[derive(Debug, Deserialize)]
pub struct UpdateBusinessRequest {
    pub name: Option<String>,
    pub industry: Option<String>,
}

/// PUT /api/businesses/:id - Update a business
pub async fn update_business(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Business>, AppError> {
    let user = get_user(request.headers());
    let req: UpdateBusinessRequest = read_json_default(request).await?;

    state
        .db
        .get_business(id)?
        .ok_or_else(|| AppError::not_found("Business not found"))?;

    state
        .db
        .update_business(id, req.name.as_deref(), req.industry.as_deref())?;

    state
        .db
        .log_audit(&user, "update", Some("business"), Some(id), None)?;

    let business = state
        .db
        .get_business(id)?
        .ok_or_else(|| AppError::not_found("Business not found"))?;

    Ok(Json(business))
}

/// DELETE /api/businesses/:id - Delete a business
pub async fn delete_business(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let user = get_user(request.headers());

    state
        .db
        .get_business(id)?
        .ok_or_else(|| AppError::not_found("Business not found"))?;

    state.db.delete_business(id)?;

    state
        .db
        .log_audit(&user, "delete", Some("business"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}
