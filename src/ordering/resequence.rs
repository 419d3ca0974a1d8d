use thiserror::Error;

use crate::ordering::assign;
use crate::ordering::plan::{self, Sibling};
use crate::ordering::store::{AtomicBatchExecutor, PrimaryWrite};

#[derive(Debug, Error)]
pub(crate) enum ResequenceError<E: std::error::Error> {
    #[error("item {item_id} not found under parent {parent_id}")]
    NotFound { parent_id: String, item_id: String },
    #[error("sibling orders under parent {parent_id} are corrupt (duplicate or non-positive)")]
    CorruptOrdering { parent_id: String },
    #[error(transparent)]
    Store(#[from] E),
}

/// Insert `item` under `parent_id`, opening a slot at the requested order
/// (clamped; absent means append). Returns the order the item took.
pub(crate) async fn insert_item<S, T>(
    mut store: S,
    parent_id: &str,
    item: T,
    requested_order: Option<i32>,
) -> Result<i32, ResequenceError<S::Error>>
where
    S: AtomicBatchExecutor<T> + Send,
    T: Send,
{
    let siblings = store.load_siblings(parent_id).await?;
    ensure_well_formed(parent_id, &siblings)?;

    let orders: Vec<i32> = siblings.iter().map(|sibling| sibling.order).collect();
    let order = assign::resolve_insert_order(&orders, requested_order);
    let shift_plan = plan::plan_insert(&siblings, order);

    store.commit(parent_id, shift_plan, PrimaryWrite::Upsert { item, order }).await?;
    Ok(order)
}

/// Rewrite `item` in place and, when a different order is requested, swap
/// positions with the sibling occupying it. Returns the resolved order.
pub(crate) async fn move_item<S, T>(
    mut store: S,
    parent_id: &str,
    item_id: &str,
    item: T,
    requested_order: Option<i32>,
) -> Result<i32, ResequenceError<S::Error>>
where
    S: AtomicBatchExecutor<T> + Send,
    T: Send,
{
    let siblings = store.load_siblings(parent_id).await?;
    ensure_well_formed(parent_id, &siblings)?;

    let Some(current) = siblings.iter().find(|sibling| sibling.id == item_id) else {
        return Err(ResequenceError::NotFound {
            parent_id: parent_id.to_string(),
            item_id: item_id.to_string(),
        });
    };
    let old_order = current.order;

    let others: Vec<Sibling> =
        siblings.iter().filter(|sibling| sibling.id != item_id).cloned().collect();
    let (order, shift_plan) = plan::plan_move(&others, old_order, requested_order);

    store.commit(parent_id, shift_plan, PrimaryWrite::Upsert { item, order }).await?;
    Ok(order)
}

/// Delete the item and compact the siblings that followed it.
pub(crate) async fn delete_item<S, T>(
    mut store: S,
    parent_id: &str,
    item_id: &str,
) -> Result<(), ResequenceError<S::Error>>
where
    S: AtomicBatchExecutor<T> + Send,
    T: Send,
{
    let siblings = store.load_siblings(parent_id).await?;
    ensure_well_formed(parent_id, &siblings)?;

    let Some(deleted) = siblings.iter().find(|sibling| sibling.id == item_id) else {
        return Err(ResequenceError::NotFound {
            parent_id: parent_id.to_string(),
            item_id: item_id.to_string(),
        });
    };

    let remaining: Vec<Sibling> =
        siblings.iter().filter(|sibling| sibling.id != item_id).cloned().collect();
    let shift_plan = plan::plan_delete(&remaining, deleted.order);

    store
        .commit(parent_id, shift_plan, PrimaryWrite::Delete { item_id: item_id.to_string() })
        .await?;
    Ok(())
}

/// Refuse to plan on top of an already-broken sibling set. A duplicate or
/// non-positive order means some earlier writer bypassed the protocol.
fn ensure_well_formed<E: std::error::Error>(
    parent_id: &str,
    siblings: &[Sibling],
) -> Result<(), ResequenceError<E>> {
    let mut seen: Vec<i32> = siblings.iter().map(|sibling| sibling.order).collect();
    seen.sort_unstable();
    let corrupt =
        seen.first().is_some_and(|first| *first < 1) || seen.windows(2).any(|pair| pair[0] == pair[1]);
    if corrupt {
        return Err(ResequenceError::CorruptOrdering { parent_id: parent_id.to_string() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordering::memory::{MemoryError, MemoryStore, MemoryWrite};

    fn write(id: &str, payload: &'static str) -> MemoryWrite<&'static str> {
        MemoryWrite { id: id.to_string(), payload }
    }

    async fn assert_dense<T: Clone + Send + 'static>(
        store: &MemoryStore<T>,
        parent: &str,
        expected_len: usize,
    ) {
        let orders: Vec<i32> =
            store.orders(parent).await.into_iter().map(|(_, order)| order).collect();
        let expected: Vec<i32> = (1..=expected_len as i32).collect();
        assert_eq!(orders, expected, "orders under {parent} are not dense");
    }

    #[tokio::test]
    async fn insert_into_empty_parent_takes_order_one() {
        let store = MemoryStore::new();
        let order = insert_item(store.begin().await, "class-1", write("a", "intro"), None)
            .await
            .expect("insert");
        assert_eq!(order, 1);
        assert_dense(&store, "class-1", 1).await;
    }

    #[tokio::test]
    async fn insert_at_start_shifts_every_sibling() {
        let store = MemoryStore::new();
        for (id, payload) in [("a", "one"), ("b", "two"), ("c", "three")] {
            insert_item(store.begin().await, "class-1", write(id, payload), None)
                .await
                .expect("seed");
        }

        let order = insert_item(store.begin().await, "class-1", write("d", "new"), Some(1))
            .await
            .expect("insert at start");
        assert_eq!(order, 1);
        assert_eq!(
            store.orders("class-1").await,
            vec![
                ("d".to_string(), 1),
                ("a".to_string(), 2),
                ("b".to_string(), 3),
                ("c".to_string(), 4),
            ]
        );
    }

    #[tokio::test]
    async fn insert_beyond_end_appends() {
        let store = MemoryStore::new();
        for id in ["a", "b", "c"] {
            insert_item(store.begin().await, "class-1", write(id, "x"), None).await.expect("seed");
        }

        let order = insert_item(store.begin().await, "class-1", write("d", "x"), Some(10))
            .await
            .expect("insert past end");
        assert_eq!(order, 4);
        assert_dense(&store, "class-1", 4).await;
    }

    #[tokio::test]
    async fn delete_middle_compacts_the_tail() {
        let store = MemoryStore::new();
        for id in ["a", "b", "c", "d"] {
            insert_item(store.begin().await, "class-1", write(id, "x"), None).await.expect("seed");
        }

        delete_item(store.begin().await, "class-1", "b").await.expect("delete");
        assert_eq!(
            store.orders("class-1").await,
            vec![("a".to_string(), 1), ("c".to_string(), 2), ("d".to_string(), 3)]
        );
    }

    #[tokio::test]
    async fn move_swaps_with_target_occupant_only() {
        let store = MemoryStore::new();
        for id in ["a", "b", "c"] {
            insert_item(store.begin().await, "class-1", write(id, "x"), None).await.expect("seed");
        }

        let order = move_item(store.begin().await, "class-1", "a", write("a", "x"), Some(3))
            .await
            .expect("move");
        assert_eq!(order, 3);
        assert_eq!(
            store.orders("class-1").await,
            vec![("c".to_string(), 1), ("b".to_string(), 2), ("a".to_string(), 3)]
        );
    }

    #[tokio::test]
    async fn move_to_current_position_changes_nothing() {
        let store = MemoryStore::new();
        for id in ["a", "b"] {
            insert_item(store.begin().await, "class-1", write(id, "x"), None).await.expect("seed");
        }

        let order = move_item(store.begin().await, "class-1", "b", write("b", "x"), Some(2))
            .await
            .expect("move");
        assert_eq!(order, 2);
        assert_eq!(
            store.orders("class-1").await,
            vec![("a".to_string(), 1), ("b".to_string(), 2)]
        );
    }

    #[tokio::test]
    async fn moving_a_missing_item_is_not_found() {
        let store = MemoryStore::new();
        insert_item(store.begin().await, "class-1", write("a", "x"), None).await.expect("seed");

        let result =
            move_item(store.begin().await, "class-1", "ghost", write("ghost", "x"), Some(1)).await;
        assert!(matches!(result, Err(ResequenceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn deleting_a_missing_item_is_not_found() {
        let store: MemoryStore<&'static str> = MemoryStore::new();
        let result = delete_item(store.begin().await, "class-1", "ghost").await;
        assert!(matches!(result, Err(ResequenceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn corrupt_orders_are_rejected_before_planning() {
        let store = MemoryStore::new();
        store.seed("class-1", &[("a", 2, "x"), ("b", 2, "y")]).await;

        let result = insert_item(store.begin().await, "class-1", write("c", "z"), None).await;
        assert!(matches!(result, Err(ResequenceError::CorruptOrdering { .. })));
    }

    #[tokio::test]
    async fn failed_commit_leaves_no_partial_state() {
        let store = MemoryStore::new();
        for id in ["a", "b"] {
            insert_item(store.begin().await, "class-1", write(id, "x"), None).await.expect("seed");
        }
        let before = store.orders("class-1").await;

        store.fail_next_commit().await;
        let result = insert_item(store.begin().await, "class-1", write("c", "x"), Some(1)).await;
        assert!(matches!(
            result,
            Err(ResequenceError::Store(MemoryError::InjectedCommitFailure))
        ));
        assert_eq!(store.orders("class-1").await, before);
    }

    /// Uses owned `String` payloads: spawning the `insert_item` future with
    /// a `&'static str` payload trips rust-lang/rust#102211
    /// ("implementation of `Send` is not general enough").
    #[tokio::test]
    async fn concurrent_appends_serialize_to_distinct_orders() {
        let store: MemoryStore<String> = MemoryStore::new();
        let owned_write =
            |id: &str| MemoryWrite { id: id.to_string(), payload: "x".to_string() };

        let first = {
            let store = store.clone();
            let item = owned_write("a");
            tokio::spawn(async move {
                insert_item(store.begin().await, "class-1", item, None).await
            })
        };
        let second = {
            let store = store.clone();
            let item = owned_write("b");
            tokio::spawn(async move {
                insert_item(store.begin().await, "class-1", item, None).await
            })
        };

        let first = first.await.expect("join").expect("insert");
        let second = second.await.expect("join").expect("insert");

        assert_ne!(first, second);
        assert_dense(&store, "class-1", 2).await;
    }
}
