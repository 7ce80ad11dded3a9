//! Public API types

pub use super::error::ApiError;

// Re-export public types from each route

pub mod chat {
    pub use crate::api::routes::chat::public::*;
}

pub mod image {
    pub use crate::api::routes::image::public::*;
}

pub mod status {
    pub use crate::api::routes::status::public::*;
}
