use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::{json, Map, Value};

use crate::types::ResourceKind;

/// What the route index needs to describe the mounted API
#[derive(Debug, Clone)]
pub struct DocsState {
    pub kinds: Arc<Vec<ResourceKind>>,
    pub api_key_header: String,
}

/// GET / - liveness greeting
pub async fn root() -> &'static str {
    "hello world"
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /api-docs - OpenAPI skeleton of the mounted collections
pub async fn api_docs(State(docs): State<DocsState>) -> Json<Value> {
    Json(openapi_document(&docs))
}

pub fn openapi_document(docs: &DocsState) -> Value {
    let mut paths = Map::new();

    for kind in docs.kinds.iter() {
        let body = json!({
            "required": true,
            "content": { "application/json": { "schema": label_schema(kind) } }
        });

        paths.insert(
            format!("/{}", kind.collection),
            json!({
                "get": operation(&format!("List all {} records", kind.noun), false, None),
                "post": operation(&format!("Create a {}", kind.noun), true, Some(body.clone())),
            }),
        );
        paths.insert(
            format!("/{}/{{id}}", kind.collection),
            json!({
                "get": operation(&format!("Get a {} by id", kind.noun), true, None),
                "put": operation(&format!("Update a {} by id", kind.noun), true, Some(body)),
                "delete": operation(&format!("Delete a {} by id", kind.noun), true, None),
            }),
        );
    }

    json!({
        "openapi": "3.0.0",
        "info": {
            "title": "Todo API",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "components": {
            "securitySchemes": {
                "ApiKeyAuth": { "type": "apiKey", "in": "header", "name": docs.api_key_header }
            }
        },
        "paths": Value::Object(paths),
    })
}

fn label_schema(kind: &ResourceKind) -> Value {
    let mut field = json!({ "type": "string" });
    if kind.min_len > 0 {
        field["minLength"] = json!(kind.min_len);
    }
    json!({
        "type": "object",
        "required": [kind.label_field],
        "properties": { kind.label_field: field }
    })
}

fn operation(summary: &str, secured: bool, body: Option<Value>) -> Value {
    let mut op = json!({ "summary": summary });
    if secured {
        op["security"] = json!([{ "ApiKeyAuth": [] }]);
    }
    if let Some(body) = body {
        op["requestBody"] = body;
    }
    op
}
