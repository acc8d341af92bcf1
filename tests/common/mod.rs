use std::sync::Arc;

use anyhow::{Context, Result};
use todo_api_rust::{
    config::AppConfig,
    router,
    store::{MemoryStore, Store},
    types::{IdPolicy, ResourceKind},
    AppState,
};

pub const API_KEY: &str = "7T#p2Km$8q!Lz&9Wc@yE5sF";

pub struct TestServer {
    pub base_url: String,
    pub state: AppState,
    _handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn store(&self, collection: &str) -> Arc<dyn Store> {
        self.state
            .resource(collection)
            .map(|r| r.store.clone())
            .unwrap_or_else(|| panic!("collection {} not mounted", collection))
    }
}

/// Spawn a fresh server with its own seeded stores on an ephemeral port
#[allow(dead_code)]
pub async fn spawn_server(id_policy: IdPolicy) -> Result<TestServer> {
    let config = AppConfig::development()
        .with_api_key(API_KEY)
        .with_id_policy(id_policy);
    let state = AppState::from_config(config).context("failed to build state")?;
    serve(state).await
}

#[allow(dead_code)]
pub async fn spawn_default() -> Result<TestServer> {
    spawn_server(IdPolicy::LengthPlusOne).await
}

/// Server mounting only the task collection, on an empty store
#[allow(dead_code)]
pub async fn spawn_with_empty_task_store() -> Result<TestServer> {
    let config = AppConfig::development().with_api_key(API_KEY);
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new(IdPolicy::LengthPlusOne));
    let state = AppState::with_stores(config, vec![(ResourceKind::task(), store)])?;
    serve(state).await
}

async fn serve(state: AppState) -> Result<TestServer> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind test listener")?;
    let addr = listener.local_addr()?;
    let app = router(state.clone());

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });

    Ok(TestServer {
        base_url: format!("http://{}", addr),
        state,
        _handle: handle,
    })
}
