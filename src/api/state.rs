use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::core::AppConfig;
use crate::deepimg::DeepImg;
use crate::models::{ImageRegistry, ModelRegistry};
use crate::openai::{Gpt4o, Gpt35};
use crate::session::{MemorySessionStore, SessionStore};

pub struct AppState {
    pub config: AppConfig,
    pub sessions: Arc<dyn SessionStore>,
    pub chat_models: ModelRegistry,
    pub image_models: ImageRegistry,
    pub started_at: Instant,
}

impl AppState {
    /// Wires the default providers from config: both OpenAI style chat
    /// models (with gpt-4o doubling as the default) and the deepimg
    /// image model.
    pub fn new(config: AppConfig) -> Self {
        let timeout = Duration::from_secs(config.model_timeout_secs);

        let mut chat_models = ModelRegistry::new("gpt-4o");
        chat_models.register(
            "gpt-4o",
            Arc::new(Gpt4o::new(
                &config.openai_api_hostname,
                &config.openai_api_key,
                &config.gpt4o_model,
                timeout,
            )),
        );
        chat_models.register(
            "gpt-3.5",
            Arc::new(Gpt35::new(
                &config.openai_api_hostname,
                &config.openai_api_key,
                &config.gpt35_model,
                &config.system_message,
                timeout,
            )),
        );

        let mut image_models = ImageRegistry::new("deepimg");
        image_models.register(
            "deepimg",
            Arc::new(DeepImg::new(
                &config.deepimg_api_url,
                &config.deepimg_api_key,
                timeout,
            )),
        );

        Self::with_parts(
            config,
            Arc::new(MemorySessionStore::new()),
            chat_models,
            image_models,
        )
    }

    /// Assembles state from externally built parts. Lets callers swap
    /// in a different store backing or their own adapters.
    pub fn with_parts(
        config: AppConfig,
        sessions: Arc<dyn SessionStore>,
        chat_models: ModelRegistry,
        image_models: ImageRegistry,
    ) -> Self {
        Self {
            config,
            sessions,
            chat_models,
            image_models,
            started_at: Instant::now(),
        }
    }
}
