//! Public types for the chat API
use serde::{Deserialize, Serialize};

/// Inbound chat payload. Fields stay optional at the serde level so
/// field rules surface as validation errors, not extractor
/// rejections.
#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    pub model: Option<String>,
    #[serde(rename = "systemPrompt")]
    pub system_prompt: Option<String>,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub text: String,
    pub model: String,
    pub citations: Vec<String>,
}

#[derive(Serialize)]
pub struct ResetResponse {
    pub status: String,
    pub message: String,
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(rename = "hadHistory")]
    pub had_history: bool,
}
