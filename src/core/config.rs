use std::env;

use crate::models::DEFAULT_SYSTEM_INSTRUCTION;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub openai_api_hostname: String,
    pub openai_api_key: String,
    pub gpt4o_model: String,
    pub gpt35_model: String,
    pub deepimg_api_url: String,
    pub deepimg_api_key: String,
    pub system_message: String,
    pub model_timeout_secs: u64,
    pub assets_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let openai_api_hostname = env::var("RELAY_OPENAI_API_HOSTNAME")
            .unwrap_or_else(|_| "https://api.openai.com".to_string());
        let openai_api_key =
            env::var("OPENAI_API_KEY").unwrap_or_else(|_| "thiswontworkforopenai".to_string());
        let gpt4o_model =
            env::var("RELAY_GPT4O_MODEL").unwrap_or_else(|_| "gpt-4o".to_string());
        let gpt35_model =
            env::var("RELAY_GPT35_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string());
        let deepimg_api_url = env::var("RELAY_DEEPIMG_API_URL")
            .unwrap_or_else(|_| "https://api.deepimg.dev".to_string());
        let deepimg_api_key =
            env::var("RELAY_DEEPIMG_API_KEY").unwrap_or_else(|_| "thiswontworkfordeepimg".to_string());
        let system_message = env::var("RELAY_SYSTEM_MESSAGE")
            .unwrap_or_else(|_| DEFAULT_SYSTEM_INSTRUCTION.to_string());
        let model_timeout_secs = env::var("RELAY_MODEL_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(120);
        let assets_path =
            env::var("RELAY_ASSETS_PATH").unwrap_or_else(|_| "./public".to_string());

        Self {
            openai_api_hostname,
            openai_api_key,
            gpt4o_model,
            gpt35_model,
            deepimg_api_url,
            deepimg_api_key,
            system_message,
            model_timeout_secs,
            assets_path,
        }
    }
}
