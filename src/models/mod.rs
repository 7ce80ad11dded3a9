//! Uniform contract over heterogeneous AI model providers.
//!
//! Providers have different native call signatures; each one is
//! wrapped in an adapter implementing `ModelAdapter` (chat) or
//! `ImageAdapter` (image generation) and registered under a model
//! key. Callers go through a registry so an unknown key falls back to
//! the configured default instead of failing resolution.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::session::Message;

/// Sampling temperature applied when the caller does not override it.
pub const DEFAULT_TEMPERATURE: f32 = 0.9;

/// Response length cap applied when the caller does not override it.
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

/// System instruction used when a request carries none.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "Be a helpful assistant";

#[derive(Clone, Debug)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// Everything a chat adapter needs for one invocation: the ordered
/// transcript, an optional system instruction, and generation
/// parameters.
#[derive(Clone, Debug)]
pub struct PromptContext {
    pub messages: Vec<Message>,
    pub system_instruction: Option<String>,
    pub options: GenerationOptions,
}

/// How a model invocation failed.
///
/// The two cases stay distinct so the caller can classify them:
/// `Provider` is the call itself going wrong (transport error,
/// timeout, non-success HTTP status), `Rejected` is the provider
/// replying with something unusable (an explicit failure or a
/// response missing the expected fields).
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error(transparent)]
    Provider(#[from] anyhow::Error),

    #[error("{reason}")]
    Rejected { reason: String },
}

impl AdapterError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }
}

/// A chat completion provider behind the uniform contract.
#[async_trait]
pub trait ModelAdapter: Send + Sync {
    /// Invokes the underlying provider and returns the assistant's
    /// answer text.
    async fn invoke(&self, context: &PromptContext) -> Result<String, AdapterError>;
}

/// Parameters for one image generation call.
#[derive(Clone, Debug)]
pub struct ImageParams {
    pub prompt: String,
    pub style: String,
    pub size: String,
}

#[derive(Clone, Debug)]
pub struct GeneratedImage {
    pub image_url: String,
}

/// An image generation provider behind the uniform contract.
#[async_trait]
pub trait ImageAdapter: Send + Sync {
    async fn generate(&self, params: &ImageParams) -> Result<GeneratedImage, AdapterError>;
}

/// Registry of chat adapters, indexed by model key.
pub struct ModelRegistry {
    adapters: HashMap<String, Arc<dyn ModelAdapter>>,
    default_key: String,
}

impl ModelRegistry {
    pub fn new(default_key: impl Into<String>) -> Self {
        Self {
            adapters: HashMap::new(),
            default_key: default_key.into(),
        }
    }

    /// Registers an adapter under the given key, replacing any
    /// previous registration.
    pub fn register(&mut self, key: impl Into<String>, adapter: Arc<dyn ModelAdapter>) {
        self.adapters.insert(key.into(), adapter);
    }

    pub fn default_key(&self) -> &str {
        &self.default_key
    }

    /// Resolves a model key to its adapter. Unknown keys resolve to
    /// the default adapter; resolution itself never fails unless the
    /// registry is empty.
    fn resolve(&self, key: &str) -> Option<&Arc<dyn ModelAdapter>> {
        self.adapters
            .get(key)
            .or_else(|| self.adapters.get(&self.default_key))
    }

    /// Resolves the key and invokes the adapter.
    pub async fn dispatch(
        &self,
        key: &str,
        context: &PromptContext,
    ) -> Result<String, AdapterError> {
        let adapter = self
            .resolve(key)
            .ok_or_else(|| AdapterError::rejected(format!("no adapter registered for '{key}'")))?;
        adapter.invoke(context).await
    }
}

/// Registry of image adapters, indexed by model key.
pub struct ImageRegistry {
    adapters: HashMap<String, Arc<dyn ImageAdapter>>,
    default_key: String,
}

impl ImageRegistry {
    pub fn new(default_key: impl Into<String>) -> Self {
        Self {
            adapters: HashMap::new(),
            default_key: default_key.into(),
        }
    }

    pub fn register(&mut self, key: impl Into<String>, adapter: Arc<dyn ImageAdapter>) {
        self.adapters.insert(key.into(), adapter);
    }

    pub fn default_key(&self) -> &str {
        &self.default_key
    }

    fn resolve(&self, key: &str) -> Option<&Arc<dyn ImageAdapter>> {
        self.adapters
            .get(key)
            .or_else(|| self.adapters.get(&self.default_key))
    }

    pub async fn dispatch(
        &self,
        key: &str,
        params: &ImageParams,
    ) -> Result<GeneratedImage, AdapterError> {
        let adapter = self
            .resolve(key)
            .ok_or_else(|| AdapterError::rejected(format!("no adapter registered for '{key}'")))?;
        adapter.generate(params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Message, Role};

    struct NamedModel(&'static str);

    #[async_trait]
    impl ModelAdapter for NamedModel {
        async fn invoke(&self, _context: &PromptContext) -> Result<String, AdapterError> {
            Ok(self.0.to_string())
        }
    }

    fn context() -> PromptContext {
        PromptContext {
            messages: vec![Message::new(Role::User, "hello")],
            system_instruction: None,
            options: GenerationOptions::default(),
        }
    }

    #[tokio::test]
    async fn test_dispatch_by_key() {
        let mut registry = ModelRegistry::new("a");
        registry.register("a", Arc::new(NamedModel("answer a")));
        registry.register("b", Arc::new(NamedModel("answer b")));

        let answer = registry.dispatch("b", &context()).await.unwrap();
        assert_eq!(answer, "answer b");
    }

    #[tokio::test]
    async fn test_unknown_key_resolves_to_default() {
        let mut registry = ModelRegistry::new("a");
        registry.register("a", Arc::new(NamedModel("answer a")));

        let answer = registry.dispatch("missing", &context()).await.unwrap();
        assert_eq!(answer, "answer a");
    }

    #[tokio::test]
    async fn test_empty_registry_is_rejected() {
        let registry = ModelRegistry::new("a");

        let result = registry.dispatch("a", &context()).await;
        assert!(matches!(result, Err(AdapterError::Rejected { .. })));
    }

    #[test]
    fn test_generation_defaults() {
        let options = GenerationOptions::default();
        assert_eq!(options.temperature, 0.9);
        assert_eq!(options.max_tokens, 2048);
    }
}
