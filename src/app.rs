//! Router assembly and shared application state.

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::ApiKeyAuthorizer;
use crate::config::{AppConfig, ConfigError};
use crate::handlers::public::{self, DocsState};
use crate::handlers::resource::{self, ResourceState};
use crate::middleware::require_api_key;
use crate::store::{MemoryStore, Store};
use crate::types::ResourceKind;

/// Process-wide state, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub authorizer: Arc<ApiKeyAuthorizer>,
    pub resources: Vec<ResourceState>,
}

impl AppState {
    /// Default collections (todo and task), each backed by a seeded in-memory store
    pub fn from_config(config: AppConfig) -> Result<Self, ConfigError> {
        let id_policy = config.store.id_policy;
        let resources = [ResourceKind::todo(), ResourceKind::task()]
            .into_iter()
            .map(|kind| {
                let store: Arc<dyn Store> = Arc::new(MemoryStore::seeded(id_policy, kind.seeds));
                (kind, store)
            })
            .collect();

        Self::with_stores(config, resources)
    }

    /// Mount the given collections on caller-supplied stores
    pub fn with_stores(
        config: AppConfig,
        stores: Vec<(ResourceKind, Arc<dyn Store>)>,
    ) -> Result<Self, ConfigError> {
        let authorizer = Arc::new(ApiKeyAuthorizer::from_config(&config.security)?);
        let resources = stores
            .into_iter()
            .map(|(kind, store)| ResourceState::new(kind, store))
            .collect();

        Ok(Self {
            config: Arc::new(config),
            authorizer,
            resources,
        })
    }

    pub fn resource(&self, collection: &str) -> Option<&ResourceState> {
        self.resources.iter().find(|r| r.kind.collection == collection)
    }
}

pub fn router(state: AppState) -> Router {
    let docs = DocsState {
        kinds: Arc::new(state.resources.iter().map(|r| r.kind.clone()).collect()),
        api_key_header: state.config.security.api_key_header.clone(),
    };

    let mut app = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/api-docs", get(public::api_docs).with_state(docs));

    for resource in &state.resources {
        app = app.merge(resource_routes(resource.clone(), state.authorizer.clone()));
    }

    if state.config.server.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    if state.config.security.enable_cors {
        app.layer(cors_layer(&state.config.security.cors_origins))
    } else {
        app
    }
}

/// Collection and item routes of one resource kind. Only the collection GET
/// is mounted without the api key layer.
fn resource_routes(resource: ResourceState, authorizer: Arc<ApiKeyAuthorizer>) -> Router {
    let collection = format!("/{}", resource.kind.collection);
    let item = format!("/{}/:id", resource.kind.collection);
    let auth = middleware::from_fn_with_state(authorizer, require_api_key);

    Router::new()
        .route(
            &collection,
            get(resource::list).merge(post(resource::create).route_layer(auth.clone())),
        )
        .route(
            &item,
            get(resource::get)
                .put(resource::update)
                .delete(resource::delete)
                .route_layer(auth),
        )
        .with_state(resource)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const KEY: &str = "test-key";

    fn state() -> AppState {
        AppState::from_config(AppConfig::development().with_api_key(KEY)).unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn request(method: &str, uri: &str, key: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(key) = key {
            builder = builder.header("api_key", key);
        }
        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    #[tokio::test]
    async fn list_is_public() {
        let (status, body) = send(router(state()), request("GET", "/task", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                {"id": 1, "title": "task1"},
                {"id": 2, "title": "task2"},
                {"id": 3, "title": "task3"}
            ])
        );
    }

    #[tokio::test]
    async fn every_other_route_requires_key() {
        let state = state();
        let cases = [
            ("GET", "/task/2", None),
            ("POST", "/task", Some(json!({"title": "task4"}))),
            ("PUT", "/task/2", Some(json!({"title": "updated"}))),
            ("DELETE", "/task/1", None),
        ];

        for (method, uri, body) in cases {
            for key in [None, Some("wrong")] {
                let (status, json) = send(router(state.clone()), request(method, uri, key, body.clone())).await;
                assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {} with {:?}", method, uri, key);
                assert_eq!(json["message"], "Unauthorized. Invalid API key.");
            }
        }

        let records = state.resource("task").unwrap().store.list().await.unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].label, "task2");
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let (status, body) = send(router(state()), request("GET", "/task/99", Some(KEY), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "the task with given ID was not found");
    }

    #[tokio::test]
    async fn non_numeric_id_is_not_found() {
        let (status, _) = send(router(state()), request("GET", "/task/abc", Some(KEY), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn id_with_trailing_text_resolves_leading_number() {
        let (status, body) = send(router(state()), request("GET", "/task/2abc", Some(KEY), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"id": 2, "title": "task2"}));

        let (status, body) = send(router(state()), request("GET", "/task/2.0", Some(KEY), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 2);
    }

    #[tokio::test]
    async fn update_missing_short_circuits_before_validation() {
        let state = state();
        // Invalid body and unknown id: the 404 wins
        let (status, _) = send(
            router(state.clone()),
            request("PUT", "/task/99", Some(KEY), Some(json!({"title": ""}))),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let bad_json = Request::builder()
            .method("PUT")
            .uri("/task/99")
            .header("api_key", KEY)
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, _) = send(router(state.clone()), bad_json).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        assert_eq!(state.resource("task").unwrap().store.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn update_with_invalid_body_leaves_record() {
        let state = state();
        let (status, body) = send(
            router(state.clone()),
            request("PUT", "/todo/1", Some(KEY), Some(json!({"name": "ab"}))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "\"name\" length must be at least 3 characters long");

        let record = state.resource("todo").unwrap().store.get_by_id(1).await.unwrap().unwrap();
        assert_eq!(record.label, "todO1");
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let req = Request::builder()
            .method("POST")
            .uri("/task")
            .header("api_key", KEY)
            .header("content-type", "application/json")
            .body(Body::from("{\"title\":"))
            .unwrap();
        let (status, body) = send(router(state()), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_JSON");
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn missing_content_type_is_bad_request() {
        let req = Request::builder()
            .method("POST")
            .uri("/task")
            .header("api_key", KEY)
            .body(Body::from("{\"title\":\"x\"}"))
            .unwrap();
        let (status, body) = send(router(state()), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn delete_missing_does_not_mutate() {
        let state = state();
        let (status, _) = send(router(state.clone()), request("DELETE", "/todo/42", Some(KEY), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(state.resource("todo").unwrap().store.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn public_routes_respond() {
        let response = router(state())
            .oneshot(request("GET", "/", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"hello world");

        let (status, body) = send(router(state()), request("GET", "/health", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (status, body) = send(router(state()), request("GET", "/api-docs", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/todo/{id}"].is_object());
    }

    #[test]
    fn state_requires_api_key() {
        let config = AppConfig::development().with_api_key("");
        assert!(matches!(AppState::from_config(config), Err(ConfigError::MissingApiKey)));
    }
}
