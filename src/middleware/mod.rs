pub mod auth;
pub mod extract;

pub use auth::require_api_key;
pub use extract::JsonBody;
