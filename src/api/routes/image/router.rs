//! Router for the image generation API

use axum::{Router, extract::State, http::StatusCode, routing::post};
use serde_json::json;

use super::public::{ImageRequest, ImageResponse};
use crate::api::SharedState;
use crate::api::error::ApiError;
use crate::api::validate;
use crate::models::{AdapterError, ImageParams};

const IMAGE_MODELS: &[&str] = &["deepimg", "flux"];
const IMAGE_STYLES: &[&str] = &["default", "anime", "cyberpunk", "realistic", "portrait"];
const IMAGE_SIZES: &[&str] = &["1:1", "16:9", "9:16", "4:3", "3:4"];

const PROMPT_MAX_LEN: usize = 1_000;

// The prompt is echoed back truncated so the response stays small.
const PROMPT_ECHO_LEN: usize = 100;

/// Generate an image from a text prompt
async fn image_handler(
    State(state): State<SharedState>,
    axum::Json(payload): axum::Json<ImageRequest>,
) -> Result<axum::Json<ImageResponse>, ApiError> {
    // Validation happens before any generation call.
    let prompt =
        validate::required_string(payload.prompt.as_deref(), "prompt", 1, PROMPT_MAX_LEN)?;
    let model = validate::one_of(payload.model.as_deref(), "model", IMAGE_MODELS)?
        .unwrap_or_else(|| state.image_models.default_key().to_string());
    let style = validate::one_of(payload.style.as_deref(), "style", IMAGE_STYLES)?
        .unwrap_or_else(|| "default".to_string());
    let size = validate::one_of(payload.size.as_deref(), "size", IMAGE_SIZES)?
        .unwrap_or_else(|| "1:1".to_string());

    let echoed_prompt: String = prompt.chars().take(PROMPT_ECHO_LEN).collect();
    let params = ImageParams {
        prompt,
        style,
        size,
    };

    let image = match state.image_models.dispatch(&model, &params).await {
        Ok(image) => image,
        Err(AdapterError::Provider(cause)) => {
            return Err(ApiError::service("Image Generation", cause.to_string()));
        }
        Err(AdapterError::Rejected { reason }) => {
            return Err(ApiError::generic(
                reason.clone(),
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(json!({
                    "service": state.image_models.default_key(),
                    "prompt": echoed_prompt,
                    "reason": reason,
                })),
            ));
        }
    };

    Ok(axum::Json(ImageResponse {
        success: true,
        model: state.image_models.default_key().to_string(),
        image_url: image.image_url,
        prompt: echoed_prompt,
    }))
}

/// Create the image router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", post(image_handler))
}
