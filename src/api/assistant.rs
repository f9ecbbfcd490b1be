//! Aethon assistant API endpoints.

use axum::{extract::State, Json};

use super::{success, ApiResult};
use crate::assistant;
use crate::auth::UserId;
use crate::models::{ChatRequest, ChatResponse, Outline, OutlineRequest, QuestionsRequest};
use crate::AppState;

/// POST /api/chat - One assistant turn.
pub async fn chat(
    State(state): State<AppState>,
    user: UserId,
    Json(request): Json<ChatRequest>,
) -> ApiResult<ChatResponse> {
    let (prompt, history) = request.into_prompt();
    tracing::debug!("Chat turn for {} with {} prior messages", user.as_str(), history.len());

    let reply = state.assistant.reply(&prompt, &history).await?;
    success(reply)
}

/// POST /api/assistant/outline - Document outline for a topic.
pub async fn generate_outline(
    _user: UserId,
    Json(request): Json<OutlineRequest>,
) -> ApiResult<Outline> {
    success(assistant::outline(&request.topic, request.kind)?)
}

/// POST /api/assistant/questions - Research questions for a topic.
pub async fn research_questions(
    _user: UserId,
    Json(request): Json<QuestionsRequest>,
) -> ApiResult<Vec<String>> {
    success(assistant::research_questions(&request.topic)?)
}
