//! Router for the chat API

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use serde_json::json;

use super::public::{ChatRequest, ChatResponse, ResetResponse};
use crate::api::SharedState;
use crate::api::error::ApiError;
use crate::api::validate;
use crate::models::{AdapterError, GenerationOptions, PromptContext};
use crate::session::{HISTORY_WINDOW, Message, Role};

const CHAT_MODELS: &[&str] = &["gpt-4o", "gpt-3.5", "default"];

const MESSAGE_MAX_LEN: usize = 10_000;
const SYSTEM_PROMPT_MAX_LEN: usize = 5_000;

/// Run one conversation turn: append the user's message to the
/// session, dispatch the transcript to the selected model, and store
/// the assistant's reply.
async fn chat_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    axum::Json(payload): axum::Json<ChatRequest>,
) -> Result<axum::Json<ChatResponse>, ApiError> {
    // All validation happens before any session state changes.
    let session_id = validate::session_id(&headers)?;
    let message =
        validate::required_string(payload.message.as_deref(), "message", 1, MESSAGE_MAX_LEN)?;
    let model = validate::one_of(payload.model.as_deref(), "model", CHAT_MODELS)?
        .unwrap_or_else(|| "default".to_string());
    let system_prompt = validate::optional_string(
        payload.system_prompt.as_deref(),
        "systemPrompt",
        SYSTEM_PROMPT_MAX_LEN,
    )?;

    let sessions = &state.sessions;

    // One in-flight turn per session; concurrent requests for the
    // same session queue up here.
    let _lease = sessions.lease(&session_id).await;

    let history = sessions.get_or_create(&session_id).await;

    // The user's turn is recorded before dispatch and retained if the
    // model call fails, so a retry still has the full context.
    let user_turn = Message::new(Role::User, &message);
    sessions.append(&session_id, user_turn.clone()).await;

    // Prompt context: stored history plus the new user turn. The
    // system prompt is prepended for this call only, never stored.
    let mut messages = history;
    messages.push(user_turn);
    if let Some(prompt) = &system_prompt {
        messages.insert(0, Message::new(Role::System, prompt));
    }
    let context = PromptContext {
        messages,
        system_instruction: system_prompt,
        options: GenerationOptions::default(),
    };

    let answer = match state.chat_models.dispatch(&model, &context).await {
        Ok(answer) => answer,
        Err(AdapterError::Provider(cause)) => {
            return Err(ApiError::service(
                format!("AI Model ({model})"),
                cause.to_string(),
            ));
        }
        Err(AdapterError::Rejected { reason }) => {
            return Err(ApiError::generic(
                format!("Failed to get response from {model}"),
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(json!({ "model": model, "reason": reason })),
            ));
        }
    };

    sessions
        .append(&session_id, Message::new(Role::Assistant, &answer))
        .await;
    sessions.enforce_window(&session_id, HISTORY_WINDOW).await;

    Ok(axum::Json(ChatResponse {
        text: answer,
        model,
        citations: vec![],
    }))
}

/// Clear the session's conversation history
async fn reset_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<axum::Json<ResetResponse>, ApiError> {
    let session_id = validate::session_id(&headers)?;
    let had_history = state.sessions.reset(&session_id).await;

    Ok(axum::Json(ResetResponse {
        status: "ok".to_string(),
        message: "Conversation reset".to_string(),
        session_id,
        had_history,
    }))
}

/// Create the chat router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", post(chat_handler))
        .route("/reset", post(reset_handler))
}
