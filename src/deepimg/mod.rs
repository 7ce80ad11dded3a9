//! Client for the deepimg image generation provider.

use std::time::Duration;

use anyhow::{Error, Result};
use async_trait::async_trait;
use serde_json::{Value, json};

use crate::models::{AdapterError, GeneratedImage, ImageAdapter, ImageParams};

/// Calls the provider's generation endpoint with the prompt, style,
/// and aspect ratio.
pub async fn generate_image(
    params: &ImageParams,
    api_url: &str,
    api_key: &str,
    timeout: Duration,
) -> Result<Value, Error> {
    let payload = json!({
        "prompt": params.prompt,
        "style": params.style,
        "size": params.size,
    });
    let url = format!("{}/v1/images/generations", api_url.trim_end_matches("/"));
    let response = reqwest::Client::new()
        .post(url)
        .bearer_auth(api_key)
        .header("Content-Type", "application/json")
        .timeout(timeout)
        .json(&payload)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(response)
}

pub struct DeepImg {
    api_url: String,
    api_key: String,
    timeout: Duration,
}

impl DeepImg {
    pub fn new(api_url: &str, api_key: &str, timeout: Duration) -> Self {
        Self {
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl ImageAdapter for DeepImg {
    async fn generate(&self, params: &ImageParams) -> Result<GeneratedImage, AdapterError> {
        let response =
            generate_image(params, &self.api_url, &self.api_key, self.timeout).await?;

        // The provider signals failure in-band with a status flag and
        // a message.
        if !response["status"].as_bool().unwrap_or(false) {
            let reason = response["message"]
                .as_str()
                .unwrap_or("Unknown error")
                .to_string();
            return Err(AdapterError::rejected(reason));
        }

        match response["imageUrl"].as_str() {
            Some(url) => Ok(GeneratedImage {
                image_url: url.to_string(),
            }),
            None => Err(AdapterError::rejected("response missing imageUrl")),
        }
    }
}
