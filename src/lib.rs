pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod store;
pub mod types;
pub mod validation;

pub use app::{router, AppState};
pub use error::ApiError;
