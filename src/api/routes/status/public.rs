//! Public types for the status API
use serde::Serialize;

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub uptime: f64,
}
