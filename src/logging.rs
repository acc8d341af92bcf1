use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, Environment};

/// Install the global tracing subscriber. `RUST_LOG` wins over the
/// environment-based default filter.
pub fn init(config: &AppConfig) {
    let default_filter = match config.environment {
        Environment::Development => "todo_api_rust=debug,tower_http=debug",
        Environment::Staging | Environment::Production => "todo_api_rust=info,tower_http=info",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // Ignore the error when a subscriber is already installed (tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
