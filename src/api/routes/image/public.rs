//! Public types for the image generation API
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct ImageRequest {
    pub prompt: Option<String>,
    pub model: Option<String>,
    pub style: Option<String>,
    pub size: Option<String>,
}

#[derive(Serialize)]
pub struct ImageResponse {
    pub success: bool,
    pub model: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub prompt: String,
}
