//! In-process collection with scriptable failures.
//!
//! Backs the binary's offline mode and the store tests. Every call is
//! recorded so tests can assert which requests were (or were not) issued.

use super::{GatewayError, GatewayFuture, TodoGateway};
use crate::types::{Item, ItemId, ItemPatch, NewItem, UserId};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Gateway operation, used to script failures
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `list_items`
    List,
    /// `create_item`
    Create,
    /// `delete_item`
    Delete,
    /// `update_item`
    Update,
}

/// A recorded gateway call
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GatewayCall {
    /// `list_items`
    List,
    /// `create_item` with the submitted title
    Create(String),
    /// `delete_item`
    Delete(ItemId),
    /// `update_item`
    Update(ItemId, ItemPatch),
}

#[derive(Debug, Default)]
struct Collection {
    items: Vec<Item>,
    next_id: i64,
    failures: HashSet<(Operation, Option<ItemId>)>,
    calls: Vec<GatewayCall>,
}

impl Collection {
    fn should_fail(&self, operation: Operation, id: Option<ItemId>) -> bool {
        self.failures.contains(&(operation, None))
            || (id.is_some() && self.failures.contains(&(operation, id)))
    }
}

fn scripted_failure(operation: Operation) -> GatewayError {
    GatewayError::Status {
        status: 500,
        message: format!("scripted {operation:?} failure"),
    }
}

fn not_found(id: ItemId) -> GatewayError {
    GatewayError::Status {
        status: 404,
        message: format!("todo {id} not found"),
    }
}

/// In-memory gateway.
///
/// Clones share the same collection.
#[derive(Clone, Debug)]
pub struct InMemoryGateway {
    owner: UserId,
    latency: Duration,
    collection: Arc<Mutex<Collection>>,
}

impl InMemoryGateway {
    /// Empty collection for `owner`
    #[must_use]
    pub fn new(owner: UserId) -> Self {
        Self::with_items(owner, Vec::new())
    }

    /// Collection seeded with `items`; new identifiers continue after the largest
    #[must_use]
    pub fn with_items(owner: UserId, items: Vec<Item>) -> Self {
        let next_id = items.iter().map(|item| item.id.get()).max().unwrap_or(0) + 1;
        Self {
            owner,
            latency: Duration::ZERO,
            collection: Arc::new(Mutex::new(Collection {
                items,
                next_id,
                ..Collection::default()
            })),
        }
    }

    /// Delay every call by `latency` before answering
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Fail every call of `operation`
    pub fn fail(&self, operation: Operation) {
        self.lock().failures.insert((operation, None));
    }

    /// Fail calls of `operation` targeting `id`
    pub fn fail_for(&self, operation: Operation, id: ItemId) {
        self.lock().failures.insert((operation, Some(id)));
    }

    /// Remove all scripted failures
    pub fn heal(&self) {
        self.lock().failures.clear();
    }

    /// Snapshot of the stored items
    #[must_use]
    pub fn items(&self) -> Vec<Item> {
        self.lock().items.clone()
    }

    /// Calls received so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Collection> {
        self.collection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    async fn wait(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn list(&self) -> Result<Vec<Item>, GatewayError> {
        let mut collection = self.lock();
        collection.calls.push(GatewayCall::List);
        if collection.should_fail(Operation::List, None) {
            return Err(scripted_failure(Operation::List));
        }

        Ok(collection
            .items
            .iter()
            .filter(|item| item.user_id == self.owner)
            .cloned()
            .collect())
    }

    fn create(&self, new: NewItem) -> Result<Item, GatewayError> {
        let mut collection = self.lock();
        collection.calls.push(GatewayCall::Create(new.title.clone()));
        if collection.should_fail(Operation::Create, None) {
            return Err(scripted_failure(Operation::Create));
        }

        let id = ItemId::new(collection.next_id);
        collection.next_id += 1;
        let item = Item::new(id, new.title, new.completed, self.owner);
        collection.items.push(item.clone());
        Ok(item)
    }

    fn delete(&self, id: ItemId) -> Result<(), GatewayError> {
        let mut collection = self.lock();
        collection.calls.push(GatewayCall::Delete(id));
        if collection.should_fail(Operation::Delete, Some(id)) {
            return Err(scripted_failure(Operation::Delete));
        }

        let index = collection
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| not_found(id))?;
        collection.items.remove(index);
        Ok(())
    }

    fn update(&self, id: ItemId, patch: ItemPatch) -> Result<Item, GatewayError> {
        let mut collection = self.lock();
        collection.calls.push(GatewayCall::Update(id, patch.clone()));
        if collection.should_fail(Operation::Update, Some(id)) {
            return Err(scripted_failure(Operation::Update));
        }

        let item = collection
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| not_found(id))?;
        patch.apply_to(item);
        Ok(item.clone())
    }
}

impl TodoGateway for InMemoryGateway {
    fn owner(&self) -> UserId {
        self.owner
    }

    fn list_items(&self) -> GatewayFuture<'_, Vec<Item>> {
        Box::pin(async move {
            self.wait().await;
            self.list()
        })
    }

    fn create_item(&self, item: NewItem) -> GatewayFuture<'_, Item> {
        Box::pin(async move {
            self.wait().await;
            self.create(item)
        })
    }

    fn delete_item(&self, id: ItemId) -> GatewayFuture<'_, ()> {
        Box::pin(async move {
            self.wait().await;
            self.delete(id)
        })
    }

    fn update_item(&self, id: ItemId, patch: ItemPatch) -> GatewayFuture<'_, Item> {
        Box::pin(async move {
            self.wait().await;
            self.update(id, patch)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Tests may panic
mod tests {
    use super::*;

    fn owner() -> UserId {
        UserId::new(1).unwrap()
    }

    fn seeded() -> InMemoryGateway {
        InMemoryGateway::with_items(
            owner(),
            vec![
                Item::new(ItemId::new(1), "a", false, owner()),
                Item::new(ItemId::new(2), "b", true, owner()),
                Item::new(ItemId::new(3), "theirs", false, UserId::new(2).unwrap()),
            ],
        )
    }

    #[tokio::test]
    async fn list_returns_only_owned_items() {
        let gateway = seeded();
        let items = gateway.list_items().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(gateway.calls(), vec![GatewayCall::List]);
    }

    #[tokio::test]
    async fn create_assigns_next_id() {
        let gateway = seeded();
        let item = gateway
            .create_item(NewItem {
                title: "c".to_string(),
                completed: false,
            })
            .await
            .unwrap();

        assert_eq!(item.id, ItemId::new(4));
        assert_eq!(item.user_id, owner());
        assert_eq!(gateway.items().len(), 4);
    }

    #[tokio::test]
    async fn update_and_delete_mutate_collection() {
        let gateway = seeded();
        let updated = gateway
            .update_item(ItemId::new(1), ItemPatch::title("renamed"))
            .await
            .unwrap();
        assert_eq!(updated.title, "renamed");
        assert!(!updated.completed);

        gateway.delete_item(ItemId::new(2)).await.unwrap();
        assert!(gateway.items().iter().all(|item| item.id != ItemId::new(2)));
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let gateway = seeded();
        let err = gateway.delete_item(ItemId::new(99)).await.unwrap_err();
        assert!(matches!(err, GatewayError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn scripted_failures_target_ids() {
        let gateway = seeded();
        gateway.fail_for(Operation::Delete, ItemId::new(1));

        assert!(gateway.delete_item(ItemId::new(1)).await.is_err());
        assert!(gateway.delete_item(ItemId::new(2)).await.is_ok());

        gateway.fail(Operation::Create);
        let result = gateway
            .create_item(NewItem {
                title: "x".to_string(),
                completed: false,
            })
            .await;
        assert!(result.is_err());

        gateway.heal();
        assert!(gateway.delete_item(ItemId::new(1)).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn latency_delays_answers() {
        let gateway = seeded().with_latency(Duration::from_millis(200));
        let start = tokio::time::Instant::now();
        gateway.list_items().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(200));
    }
}
