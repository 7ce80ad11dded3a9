//! Test utilities for integration tests
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::{Router, body::Body};
use http::Request;

use relay::api::{AppState, app};
use relay::core::AppConfig;
use relay::models::{
    AdapterError, GeneratedImage, ImageAdapter, ImageParams, ImageRegistry, ModelAdapter,
    ModelRegistry, PromptContext,
};
use relay::session::{MemorySessionStore, Role, SessionStore};

/// Chat model that answers with an echo of the last user message, so
/// tests can verify which turn produced which reply.
pub struct EchoChatModel;

#[async_trait]
impl ModelAdapter for EchoChatModel {
    async fn invoke(&self, context: &PromptContext) -> Result<String, AdapterError> {
        let last_user = context
            .messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .unwrap_or_default();
        Ok(format!("echo: {last_user}"))
    }
}

/// Chat model that fails at the provider level, as if the remote call
/// itself blew up.
pub struct RaisingChatModel;

#[async_trait]
impl ModelAdapter for RaisingChatModel {
    async fn invoke(&self, _context: &PromptContext) -> Result<String, AdapterError> {
        Err(AdapterError::Provider(anyhow::anyhow!(
            "connection refused"
        )))
    }
}

/// Chat model that replies, but with an unusable result.
pub struct RejectingChatModel;

#[async_trait]
impl ModelAdapter for RejectingChatModel {
    async fn invoke(&self, _context: &PromptContext) -> Result<String, AdapterError> {
        Err(AdapterError::rejected("quota exceeded"))
    }
}

/// Chat model that records the context it was invoked with.
#[derive(Default)]
pub struct CapturingChatModel {
    pub seen: Mutex<Option<PromptContext>>,
}

#[async_trait]
impl ModelAdapter for CapturingChatModel {
    async fn invoke(&self, context: &PromptContext) -> Result<String, AdapterError> {
        *self.seen.lock().unwrap() = Some(context.clone());
        Ok("captured".to_string())
    }
}

/// Image model that counts invocations and returns a fixed URL.
#[derive(Default)]
pub struct CountingImageModel {
    pub calls: AtomicUsize,
}

#[async_trait]
impl ImageAdapter for CountingImageModel {
    async fn generate(&self, _params: &ImageParams) -> Result<GeneratedImage, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(GeneratedImage {
            image_url: "https://img.example.com/generated.png".to_string(),
        })
    }
}

pub struct RaisingImageModel;

#[async_trait]
impl ImageAdapter for RaisingImageModel {
    async fn generate(&self, _params: &ImageParams) -> Result<GeneratedImage, AdapterError> {
        Err(AdapterError::Provider(anyhow::anyhow!("connection refused")))
    }
}

pub struct RejectingImageModel;

#[async_trait]
impl ImageAdapter for RejectingImageModel {
    async fn generate(&self, _params: &ImageParams) -> Result<GeneratedImage, AdapterError> {
        Err(AdapterError::rejected("prompt was refused"))
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        openai_api_hostname: "http://localhost:0".to_string(),
        openai_api_key: "test-api-key".to_string(),
        gpt4o_model: "gpt-4o".to_string(),
        gpt35_model: "gpt-3.5-turbo".to_string(),
        deepimg_api_url: "http://localhost:0".to_string(),
        deepimg_api_key: "test-api-key".to_string(),
        system_message: "Be a helpful assistant".to_string(),
        model_timeout_secs: 5,
        assets_path: "./public".to_string(),
    }
}

pub struct TestApp {
    pub app: Router,
    pub sessions: Arc<MemorySessionStore>,
}

/// Creates a test application router wired to the given adapters,
/// returning the session store alongside so tests can inspect stored
/// history.
pub fn test_app_with(chat: Arc<dyn ModelAdapter>, image: Arc<dyn ImageAdapter>) -> TestApp {
    let sessions = Arc::new(MemorySessionStore::new());

    let mut chat_models = ModelRegistry::new("gpt-4o");
    chat_models.register("gpt-4o", Arc::clone(&chat));
    chat_models.register("gpt-3.5", chat);

    let mut image_models = ImageRegistry::new("deepimg");
    image_models.register("deepimg", image);

    let state = AppState::with_parts(
        test_config(),
        Arc::clone(&sessions) as Arc<dyn SessionStore>,
        chat_models,
        image_models,
    );

    TestApp {
        app: app(Arc::new(state)),
        sessions,
    }
}

/// Creates a test application router with well-behaved adapters.
pub fn test_app() -> TestApp {
    test_app_with(
        Arc::new(EchoChatModel),
        Arc::new(CountingImageModel::default()),
    )
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_to_json(body: Body) -> serde_json::Value {
    serde_json::from_str(&body_to_string(body).await).unwrap()
}
