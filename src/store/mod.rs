//! Record storage behind a swappable async interface.
//!
//! Handlers only talk to [`Store`]; the in-memory implementation is the one
//! shipped today, a database-backed one can slot in without touching them.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::Record;

pub use memory::MemoryStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("record {0} not found")]
    NotFound(u64),

    #[error("store backend error: {0}")]
    Backend(String),
}

/// Capability set every record store provides
#[async_trait]
pub trait Store: Send + Sync {
    /// All records in sequence order
    async fn list(&self) -> Result<Vec<Record>, StoreError>;

    async fn get_by_id(&self, id: u64) -> Result<Option<Record>, StoreError>;

    /// Append a new record; the store assigns the id
    async fn append(&self, label: String) -> Result<Record, StoreError>;

    /// Replace the label of an existing record, id is untouched
    async fn update_by_id(&self, id: u64, label: String) -> Result<Record, StoreError>;

    /// Remove a record, returning its last state
    async fn remove_by_id(&self, id: u64) -> Result<Record, StoreError>;
}
