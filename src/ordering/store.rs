use async_trait::async_trait;

use crate::ordering::plan::{ShiftPlan, Sibling};

/// The single domain write that rides along with a shift plan.
#[derive(Debug)]
pub(crate) enum PrimaryWrite<T> {
    /// Insert the item, or replace it in place, at the resolved order.
    Upsert { item: T, order: i32 },
    /// Remove the item entirely.
    Delete { item_id: String },
}

/// Read side of the protocol: the live siblings under one parent.
///
/// Reads must reflect prior commits by this process. Implementations that
/// want correctness under concurrent callers are expected to serialize the
/// whole load-plan-commit cycle per parent (the Postgres adapters take a
/// per-parent advisory lock before reading; see the entity repositories).
#[async_trait]
pub(crate) trait SiblingRepository {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn load_siblings(&mut self, parent_id: &str) -> Result<Vec<Sibling>, Self::Error>;
}

/// Write side of the protocol.
///
/// The shift plan and the primary write either all become visible together
/// or not at all. Consuming `self` ends the operation: there is no retry
/// here, and after a failure the caller must re-read siblings before
/// planning again.
#[async_trait]
pub(crate) trait AtomicBatchExecutor<T>: SiblingRepository {
    async fn commit(
        self,
        parent_id: &str,
        plan: ShiftPlan,
        primary: PrimaryWrite<T>,
    ) -> Result<(), Self::Error>;
}
