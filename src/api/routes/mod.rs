//! API routes module

pub mod chat;
pub mod image;
pub mod status;

use axum::Router;

use crate::api::SharedState;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Chat routes
        .nest("/chat", chat::router())
        // Image generation routes
        .nest("/image", image::router())
        // Health/status routes
        .nest("/status", status::router())
}
