use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Store, StoreError};
use crate::types::{IdPolicy, Record};

struct Inner {
    records: Vec<Record>,
    // Highest id ever handed out, used by IdPolicy::Monotonic
    last_id: u64,
}

/// Process-wide ordered record list. One lock covers the sequence and the
/// id counter so concurrent requests never lose an append or splice.
pub struct MemoryStore {
    inner: RwLock<Inner>,
    id_policy: IdPolicy,
}

impl MemoryStore {
    pub fn new(id_policy: IdPolicy) -> Self {
        Self {
            inner: RwLock::new(Inner {
                records: Vec::new(),
                last_id: 0,
            }),
            id_policy,
        }
    }

    /// Store pre-populated with `labels`, ids 1..=n
    pub fn seeded(id_policy: IdPolicy, labels: &[&str]) -> Self {
        let records: Vec<Record> = labels
            .iter()
            .enumerate()
            .map(|(i, label)| Record::new(i as u64 + 1, *label))
            .collect();
        let last_id = records.len() as u64;

        Self {
            inner: RwLock::new(Inner { records, last_id }),
            id_policy,
        }
    }
}

impl Inner {
    fn next_id(&mut self, policy: IdPolicy) -> u64 {
        let id = match policy {
            IdPolicy::LengthPlusOne => self.records.len() as u64 + 1,
            IdPolicy::Monotonic => self.last_id + 1,
        };
        self.last_id = self.last_id.max(id);
        id
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list(&self) -> Result<Vec<Record>, StoreError> {
        Ok(self.inner.read().await.records.clone())
    }

    async fn get_by_id(&self, id: u64) -> Result<Option<Record>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.records.iter().find(|r| r.id == id).cloned())
    }

    async fn append(&self, label: String) -> Result<Record, StoreError> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id(self.id_policy);
        let record = Record::new(id, label);
        inner.records.push(record.clone());
        tracing::debug!("Appended record {} ({} total)", id, inner.records.len());
        Ok(record)
    }

    async fn update_by_id(&self, id: u64, label: String) -> Result<Record, StoreError> {
        let mut inner = self.inner.write().await;
        // With LengthPlusOne ids can repeat; the first match wins, as with lookups
        let record = inner
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))?;
        record.label = label;
        Ok(record.clone())
    }

    async fn remove_by_id(&self, id: u64) -> Result<Record, StoreError> {
        let mut inner = self.inner.write().await;
        let index = inner.position(id).ok_or(StoreError::NotFound(id))?;
        let removed = inner.records.remove(index);
        tracing::debug!("Removed record {} ({} left)", id, inner.records.len());
        Ok(removed)
    }
}
