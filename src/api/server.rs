use std::sync::Arc;

use axum::middleware;
use axum::{Router, extract::OriginalUri, extract::Request, response::Response};
use http::{HeaderValue, Method, header};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use super::routes;
use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::core::AppConfig;

pub type SharedState = Arc<AppState>;

async fn set_static_cache_control(request: Request, next: middleware::Next) -> Response {
    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    response
}

// Unmatched API routes get the JSON 404 treatment; everything outside
// /api falls through to static assets.
async fn api_fallback(method: Method, OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::not_found(method.as_str(), uri.path())
}

pub fn app(shared_state: SharedState) -> Router {
    let cors = CorsLayer::permissive();
    let assets_path = shared_state.config.assets_path.clone();

    Router::new()
        // API routes
        .nest("/api", routes::router().fallback(api_fallback))
        // Static server of web assets
        .fallback_service(
            ServiceBuilder::new()
                .layer(middleware::from_fn(set_static_cache_control))
                .service(ServeDir::new(assets_path)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

// Run the server
pub async fn serve(host: String, port: String, config: AppConfig) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // axum logs rejections from built-in extractors with the `axum::rejection`
                // target, at `TRACE` level. `axum::rejection=trace` enables showing those events
                format! {
                    "{}=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                }
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let app_state = AppState::new(config);
    let app = app(Arc::new(app_state));

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port))
        .await
        .unwrap();

    tracing::debug!(
        "Server started. Listening on {}",
        listener.local_addr().unwrap()
    );

    axum::serve(listener, app).await.unwrap();
}
