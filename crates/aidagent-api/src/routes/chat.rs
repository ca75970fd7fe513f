use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use aidagent_types::ChatMessage;

use crate::{
    error::{ApiError, ApiResult},
    response::ApiResponse,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub participant_id: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

pub async fn converse(
    State(state): State<Arc<AppState>>,
    Path(alert_id): Path<String>,
    Json(req): Json<ChatRequest>,
) -> ApiResult<Json<ChatReply>> {
    if req.message.trim().is_empty() {
        return Err(ApiError::BadRequest("message must not be empty".to_string()));
    }

    let reply = state
        .chat
        .converse(&alert_id, &req.participant_id, &req.message)
        .await?;

    Ok(Json(ChatReply { reply }))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub participant_id: String,
}

pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(alert_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<ApiResponse<Vec<ChatMessage>>>> {
    let messages = state
        .chat
        .get_history(&alert_id, &query.participant_id)
        .await?;

    Ok(Json(ApiResponse::success(
        200,
        "Chat history retrieved successfully",
        messages,
    )))
}
