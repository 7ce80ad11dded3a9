pub mod error;
pub mod routes;
mod server;
pub use server::{SharedState, app, serve};
pub mod public;
mod state;
pub use state::AppState;
pub mod validate;
