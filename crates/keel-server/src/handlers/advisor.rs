//! Advisor conversation handlers
//!
//! Creating a conversation or posting a message runs one advisor turn: the
//! user message is appended, the backend replies grounded in the latest
//! snapshot, and the updated thread is returned.

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::{get_user, AppError, AppState, SuccessResponse};
use keel_core::ai::AdvisorBackend;
use keel_core::models::{conversation_title, ChatMessage, Conversation, Role};
use keel_core::FinancialContext;

use super::read_json_default;

/// GET /api/businesses/:id/conversations - List threads, most active first
pub async fn list_conversations(
    State(state): State<Arc<AppState>>,
    Path(business_id): Path<i64>,
) -> Result<Json<Vec<Conversation>>, AppError> {
    state
        .db
        .get_business(business_id)?
        .ok_or_else(|| AppError::not_found("Business not found"))?;

    let conversations = state.db.list_conversations(business_id)?;
    Ok(Json(conversations))
}

/// Request body carrying one user message
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub message: String,
}

/// Run one advisor turn over an existing message history
async fn advisor_reply(
    state: &AppState,
    business_id: i64,
    history: &[ChatMessage],
    user_message: &str,
) -> Result<ChatMessage, AppError> {
    let ai = state
        .ai
        .as_ref()
        .ok_or_else(|| AppError::unavailable("No advisor backend is configured"))?;

    let business = state
        .db
        .get_business(business_id)?
        .ok_or_else(|| AppError::not_found("Business not found"))?;

    let ctx = FinancialContext::assemble(&state.db, &business)?;
    let reply = ai.advise(&ctx, history, user_message).await?;

    Ok(ChatMessage {
        role: Role::Assistant,
        content: reply,
        timestamp: Utc::now(),
    })
}

/// POST /api/businesses/:id/conversations - Start a thread with a first message
pub async fn create_conversation(
    State(state): State<Arc<AppState>>,
    Path(business_id): Path<i64>,
    request: Request,
) -> Result<Json<Conversation>, AppError> {
    let user = get_user(request.headers());
    let req: MessageRequest = read_json_default(request).await?;

    let message = req.message.trim().to_string();
    if message.is_empty() {
        return Err(AppError::bad_request("Message is required"));
    }

    let mut messages = vec![ChatMessage {
        role: Role::User,
        content: message.clone(),
        timestamp: Utc::now(),
    }];

    let reply = advisor_reply(&state, business_id, &messages, &message).await?;
    messages.push(reply);

    let title = conversation_title(&message);
    let conversation_id = state
        .db
        .create_conversation(business_id, &title, &messages)?;

    state.db.log_audit(
        &user,
        "create",
        Some("conversation"),
        Some(conversation_id),
        None,
    )?;

    let conversation = state
        .db
        .get_conversation(conversation_id)?
        .ok_or_else(|| AppError::internal("Conversation not found after creation"))?;

    Ok(Json(conversation))
}

/// GET /api/conversations/:id - Get a thread
pub async fn get_conversation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Conversation>, AppError> {
    let conversation = state
        .db
        .get_conversation(id)?
        .ok_or_else(|| AppError::not_found("Conversation not found"))?;

    Ok(Json(conversation))
}

/// POST /api/conversations/:id/messages - Continue a thread
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Conversation>, AppError> {
    let user = get_user(request.headers());
    let req: MessageRequest = read_json_default(request).await?;

    let message = req.message.trim().to_string();
    if message.is_empty() {
        return Err(AppError::bad_request("Message is required"));
    }

    let mut conversation = state
        .db
        .get_conversation(id)?
        .ok_or_else(|| AppError::not_found("Conversation not found"))?;

    conversation.messages.push(ChatMessage {
        role: Role::User,
        content: message.clone(),
        timestamp: Utc::now(),
    });

    let reply = advisor_reply(
        &state,
        conversation.business_id,
        &conversation.messages,
        &message,
    )
    .await?;
    conversation.messages.push(reply);

    state
        .db
        .update_conversation_messages(id, &conversation.messages)?;

    state
        .db
        .log_audit(&user, "message", Some("conversation"), Some(id), None)?;

    let conversation = state
        .db
        .get_conversation(id)?
        .ok_or_else(|| AppError::not_found("Conversation not found"))?;

    Ok(Json(conversation))
}

/// DELETE /api/conversations/:id - Delete a thread
pub async fn delete_conversation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let user = get_user(request.headers());

    state
        .db
        .get_conversation(id)?
        .ok_or_else(|| AppError::not_found("Conversation not found"))?;

    state.db.delete_conversation(id)?;

    state
        .db
        .log_audit(&user, "delete", Some("conversation"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}
