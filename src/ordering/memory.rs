//! In-memory stand-in for the Postgres order stores, used by unit tests.
//!
//! A batch holds the store lock from `begin` until commit, mirroring the
//! per-parent advisory lock the real adapters take, so concurrent
//! operations observe committed snapshots only.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::ordering::plan::{ShiftPlan, Sibling};
use crate::ordering::store::{AtomicBatchExecutor, PrimaryWrite, SiblingRepository};

#[derive(Debug, Error)]
pub(crate) enum MemoryError {
    #[error("injected commit failure")]
    InjectedCommitFailure,
}

#[derive(Debug, Clone)]
pub(crate) struct MemoryWrite<T> {
    pub(crate) id: String,
    pub(crate) payload: T,
}

#[derive(Debug, Clone)]
struct StoredItem<T> {
    id: String,
    order: i32,
    #[allow(dead_code)]
    payload: T,
}

struct Shared<T> {
    items: HashMap<String, Vec<StoredItem<T>>>,
    fail_next_commit: bool,
}

#[derive(Clone)]
pub(crate) struct MemoryStore<T> {
    shared: Arc<Mutex<Shared<T>>>,
}

impl<T: Clone + Send + 'static> MemoryStore<T> {
    pub(crate) fn new() -> Self {
        Self { shared: Arc::new(Mutex::new(Shared { items: HashMap::new(), fail_next_commit: false })) }
    }

    pub(crate) async fn begin(&self) -> MemoryBatch<T> {
        MemoryBatch { guard: self.shared.clone().lock_owned().await }
    }

    /// Place items directly, bypassing the protocol. For corruption tests.
    pub(crate) async fn seed(&self, parent_id: &str, rows: &[(&str, i32, T)]) {
        let mut shared = self.shared.lock().await;
        let items = shared.items.entry(parent_id.to_string()).or_default();
        for (id, order, payload) in rows {
            items.push(StoredItem { id: (*id).to_string(), order: *order, payload: payload.clone() });
        }
    }

    pub(crate) async fn fail_next_commit(&self) {
        self.shared.lock().await.fail_next_commit = true;
    }

    /// Live (id, order) pairs under the parent, sorted by order.
    pub(crate) async fn orders(&self, parent_id: &str) -> Vec<(String, i32)> {
        let shared = self.shared.lock().await;
        let mut rows: Vec<(String, i32)> = shared
            .items
            .get(parent_id)
            .map(|items| items.iter().map(|item| (item.id.clone(), item.order)).collect())
            .unwrap_or_default();
        rows.sort_by_key(|(_, order)| *order);
        rows
    }
}

pub(crate) struct MemoryBatch<T> {
    guard: OwnedMutexGuard<Shared<T>>,
}

#[async_trait]
impl<T: Send + 'static> SiblingRepository for MemoryBatch<T> {
    type Error = MemoryError;

    async fn load_siblings(&mut self, parent_id: &str) -> Result<Vec<Sibling>, MemoryError> {
        Ok(self
            .guard
            .items
            .get(parent_id)
            .map(|items| {
                items
                    .iter()
                    .map(|item| Sibling { id: item.id.clone(), order: item.order })
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[async_trait]
impl<T: Send + 'static> AtomicBatchExecutor<MemoryWrite<T>> for MemoryBatch<T> {
    async fn commit(
        mut self,
        parent_id: &str,
        plan: ShiftPlan,
        primary: PrimaryWrite<MemoryWrite<T>>,
    ) -> Result<(), MemoryError> {
        if self.guard.fail_next_commit {
            self.guard.fail_next_commit = false;
            return Err(MemoryError::InjectedCommitFailure);
        }

        let items = self.guard.items.entry(parent_id.to_string()).or_default();
        for shift in &plan {
            if let Some(item) = items.iter_mut().find(|item| item.id == shift.item_id) {
                item.order = shift.new_order;
            }
        }

        match primary {
            PrimaryWrite::Upsert { item, order } => {
                if let Some(existing) = items.iter_mut().find(|stored| stored.id == item.id) {
                    existing.order = order;
                    existing.payload = item.payload;
                } else {
                    items.push(StoredItem { id: item.id, order, payload: item.payload });
                }
            }
            PrimaryWrite::Delete { item_id } => {
                items.retain(|stored| stored.id != item_id);
            }
        }

        Ok(())
    }
}
