use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::error::ApiError;
use crate::middleware::JsonBody;
use crate::store::{Store, StoreError};
use crate::types::{Record, ResourceKind};
use crate::validation::{validate, Schema};

/// Everything one collection's handlers need
#[derive(Clone)]
pub struct ResourceState {
    pub kind: ResourceKind,
    pub schema: Arc<Schema>,
    pub store: Arc<dyn Store>,
}

impl ResourceState {
    pub fn new(kind: ResourceKind, store: Arc<dyn Store>) -> Self {
        let schema = Arc::new(Schema::for_kind(&kind));
        Self { kind, schema, store }
    }

    /// Resolve the path id to an existing record or stop with 404
    async fn find(&self, raw_id: &str) -> Result<Record, ApiError> {
        let not_found = || ApiError::not_found(self.kind.not_found_message());
        let id = parse_id(raw_id).ok_or_else(not_found)?;
        self.store.get_by_id(id).await?.ok_or_else(not_found)
    }

    fn validated_label(&self, body: &Value) -> Result<String, ApiError> {
        let validated = validate(&self.schema, body)?;
        validated
            .str_field(self.kind.label_field)
            .map(str::to_string)
            .ok_or_else(|| ApiError::internal_server_error("validated body lost its label"))
    }

    fn not_found_on_store_miss(&self, err: StoreError) -> ApiError {
        match err {
            StoreError::NotFound(_) => ApiError::not_found(self.kind.not_found_message()),
            other => other.into(),
        }
    }
}

/// Read the leading integer of a path id: `"2abc"` and `"2.0"` both name
/// record 2. No leading digits, a negative value or an overflow can never
/// match a stored id.
pub fn parse_id(raw: &str) -> Option<u64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || negative {
        return None;
    }
    rest[..digits].parse().ok()
}

/// GET /{collection} - every record, no credential needed
pub async fn list(State(state): State<ResourceState>) -> Result<Json<Value>, ApiError> {
    let records = state.store.list().await?;
    Ok(Json(Record::to_api_array(&records, &state.kind)))
}

/// GET /{collection}/:id
pub async fn get(
    State(state): State<ResourceState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let record = state.find(&id).await?;
    Ok(Json(record.to_api_value(&state.kind)))
}

/// POST /{collection} - append a record, id assigned by the store
pub async fn create(
    State(state): State<ResourceState>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<Value>, ApiError> {
    let label = state.validated_label(&body)?;
    let record = state.store.append(label).await?;

    tracing::info!("Created {} {}", state.kind.noun, record.id);
    Ok(Json(record.to_api_value(&state.kind)))
}

/// PUT /{collection}/:id - replace the label of an existing record
///
/// Lookup happens before the body is even parsed: an unknown id is always a
/// 404, whatever the payload.
pub async fn update(
    State(state): State<ResourceState>,
    Path(id): Path<String>,
    payload: Result<JsonBody<Value>, ApiError>,
) -> Result<Json<Value>, ApiError> {
    let existing = state.find(&id).await?;

    let JsonBody(body) = payload?;
    let label = state.validated_label(&body)?;

    let record = state
        .store
        .update_by_id(existing.id, label)
        .await
        .map_err(|e| state.not_found_on_store_miss(e))?;

    tracing::info!("Updated {} {}", state.kind.noun, record.id);
    Ok(Json(record.to_api_value(&state.kind)))
}

/// DELETE /{collection}/:id - remove a record and return its last state
pub async fn delete(
    State(state): State<ResourceState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let existing = state.find(&id).await?;

    let removed = state
        .store
        .remove_by_id(existing.id)
        .await
        .map_err(|e| state.not_found_on_store_miss(e))?;

    tracing::info!("Deleted {} {}", state.kind.noun, removed.id);
    Ok(Json(removed.to_api_value(&state.kind)))
}
