//! End-to-end flows through the store runtime and the in-memory gateway.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Tests may panic

use std::time::Duration;
use tasklist_runtime::Store;
use todos::gateway::{GatewayCall, Operation};
use todos::{
    InMemoryGateway, Item, ItemId, ItemPatch, TodoAction, TodoEnvironment, TodoReducer, TodoState,
    UserId,
};
use tokio::time::Instant;

type TodoStore = Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;

fn owner() -> UserId {
    UserId::new(1868).unwrap()
}

fn item(id: i64, title: &str, completed: bool) -> Item {
    Item::new(ItemId::new(id), title, completed, owner())
}

/// Store whose state mirrors the gateway's seeded items
fn store_with(gateway: &InMemoryGateway) -> TodoStore {
    Store::new(
        TodoState::with_items(gateway.items()),
        TodoReducer::new(),
        TodoEnvironment::with_gateway(gateway.clone()),
    )
}

async fn dispatch(store: &TodoStore, action: TodoAction) {
    let mut handle = store.send(action).await.unwrap();
    handle.wait().await;
}

async fn snapshot(store: &TodoStore) -> TodoState {
    store.state(Clone::clone).await
}

#[tokio::test]
async fn load_replaces_items_and_counts() {
    let gateway = InMemoryGateway::with_items(
        owner(),
        vec![item(1, "a", false), item(2, "b", true), item(3, "c", false)],
    );
    let store = Store::new(
        TodoState::new(),
        TodoReducer::new(),
        TodoEnvironment::with_gateway(gateway.clone()),
    );

    let result = store
        .send_and_wait_for(
            TodoAction::Load,
            |action| matches!(action, TodoAction::Loaded { .. }),
            Duration::from_secs(1),
        )
        .await
        .unwrap();

    assert!(matches!(result, TodoAction::Loaded { ref items } if items.len() == 3));
    let state = snapshot(&store).await;
    assert_eq!(state.active_count, 2);
    assert!(!state.is_loading);
}

#[tokio::test]
async fn add_appends_confirmed_item() {
    let gateway = InMemoryGateway::with_items(owner(), vec![item(1, "a", false)]);
    let store = store_with(&gateway);

    dispatch(
        &store,
        TodoAction::AddItem {
            title: "b".to_string(),
        },
    )
    .await;

    let state = snapshot(&store).await;
    assert_eq!(state.items, vec![item(1, "a", false), item(2, "b", false)]);
    assert_eq!(state.active_count, 2);
    assert_eq!(gateway.items(), state.items);
}

#[tokio::test]
async fn blank_add_never_reaches_the_gateway() {
    let gateway = InMemoryGateway::with_items(owner(), vec![item(1, "a", false)]);
    let store = store_with(&gateway);

    dispatch(
        &store,
        TodoAction::AddItem {
            title: " \t ".to_string(),
        },
    )
    .await;

    let state = snapshot(&store).await;
    assert_eq!(state.items, vec![item(1, "a", false)]);
    assert_eq!(state.error_message(), Some("Title should not be empty"));
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn failed_add_rolls_back() {
    let gateway = InMemoryGateway::with_items(owner(), vec![item(1, "a", false)]);
    gateway.fail(Operation::Create);
    let store = store_with(&gateway);
    let before = snapshot(&store).await.items;

    dispatch(
        &store,
        TodoAction::AddItem {
            title: "b".to_string(),
        },
    )
    .await;

    let state = snapshot(&store).await;
    assert_eq!(state.items, before);
    assert_eq!(state.error_message(), Some("Unable to add a todo"));
    assert!(!state.is_submitting);
}

#[tokio::test]
async fn toggle_all_completes_both() {
    let gateway =
        InMemoryGateway::with_items(owner(), vec![item(1, "a", false), item(2, "b", true)]);
    let store = store_with(&gateway);

    dispatch(&store, TodoAction::ToggleAll).await;

    let state = snapshot(&store).await;
    assert_eq!(state.items, vec![item(1, "a", true), item(2, "b", true)]);
    assert_eq!(state.active_count, 0);
}

#[tokio::test]
async fn toggle_all_updates_in_list_order() {
    let gateway = InMemoryGateway::with_items(
        owner(),
        vec![item(3, "c", false), item(1, "a", false), item(2, "b", false)],
    );
    let store = store_with(&gateway);

    dispatch(&store, TodoAction::ToggleAll).await;

    let order: Vec<GatewayCall> = [3, 1, 2]
        .into_iter()
        .map(|id| GatewayCall::Update(ItemId::new(id), ItemPatch::completed(true)))
        .collect();
    assert_eq!(gateway.calls(), order);
}

#[tokio::test]
async fn clear_completed_keeps_failed_delete() {
    let gateway =
        InMemoryGateway::with_items(owner(), vec![item(1, "a", true), item(2, "b", false)]);
    gateway.fail_for(Operation::Delete, ItemId::new(1));
    let store = store_with(&gateway);

    dispatch(&store, TodoAction::ClearCompleted).await;

    let state = snapshot(&store).await;
    assert_eq!(state.items, vec![item(1, "a", true), item(2, "b", false)]);
    assert_eq!(state.error_message(), Some("Unable to delete a todo"));
    assert!(state.items.iter().all(|item| !item.is_pending()));
}

#[tokio::test]
async fn failed_delete_leaves_sequence_unchanged() {
    let gateway =
        InMemoryGateway::with_items(owner(), vec![item(1, "a", false), item(2, "b", true)]);
    gateway.fail(Operation::Delete);
    let store = store_with(&gateway);
    let before = snapshot(&store).await.items;

    dispatch(&store, TodoAction::DeleteItem { id: ItemId::new(2) }).await;

    let state = snapshot(&store).await;
    assert_eq!(state.items, before);
    assert_eq!(state.error_message(), Some("Unable to delete a todo"));
}

#[tokio::test(start_paused = true)]
async fn item_is_pending_until_the_server_answers() {
    let gateway = InMemoryGateway::with_items(owner(), vec![item(1, "a", false)])
        .with_latency(Duration::from_millis(100));
    let store = store_with(&gateway);

    let mut handle = store
        .send(TodoAction::ToggleItem { id: ItemId::new(1) })
        .await
        .unwrap();

    let during = snapshot(&store).await;
    assert!(during.items[0].is_pending());
    assert!(!during.items[0].completed);

    // A second toggle while the first is in flight is dropped
    dispatch(&store, TodoAction::ToggleItem { id: ItemId::new(1) }).await;

    handle.wait().await;
    let after = snapshot(&store).await;
    assert!(!after.items[0].is_pending());
    assert!(after.items[0].completed);
    assert_eq!(gateway.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn second_submission_is_refused_while_one_is_in_flight() {
    let gateway = InMemoryGateway::new(owner()).with_latency(Duration::from_millis(100));
    let store = store_with(&gateway);

    let mut first = store
        .send(TodoAction::AddItem {
            title: "a".to_string(),
        })
        .await
        .unwrap();
    dispatch(
        &store,
        TodoAction::AddItem {
            title: "b".to_string(),
        },
    )
    .await;
    first.wait().await;

    let state = snapshot(&store).await;
    assert_eq!(state.items, vec![item(1, "a", false)]);
    assert_eq!(gateway.calls(), vec![GatewayCall::Create("a".to_string())]);
}

#[tokio::test(start_paused = true)]
async fn error_clears_after_timeout() {
    let gateway = InMemoryGateway::new(owner());
    let store = store_with(&gateway);
    let mut results = store.subscribe_actions();
    let start = Instant::now();

    dispatch(
        &store,
        TodoAction::AddItem {
            title: String::new(),
        },
    )
    .await;
    assert!(snapshot(&store).await.error.is_some());

    let fired = results.recv().await.unwrap();
    assert_eq!(fired, TodoAction::ErrorTimerElapsed { generation: 1 });
    assert!(start.elapsed() >= Duration::from_secs(3));
    assert!(snapshot(&store).await.error.is_none());
}

#[tokio::test(start_paused = true)]
async fn new_error_restarts_the_timer() {
    let gateway = InMemoryGateway::new(owner());
    gateway.fail(Operation::Delete);
    let store = Store::new(
        TodoState::with_items(vec![item(1, "a", false)]),
        TodoReducer::new(),
        TodoEnvironment::with_gateway(gateway.clone()),
    );

    dispatch(
        &store,
        TodoAction::AddItem {
            title: String::new(),
        },
    )
    .await;
    tokio::time::sleep(Duration::from_secs(2)).await;

    dispatch(&store, TodoAction::DeleteItem { id: ItemId::new(1) }).await;
    assert_eq!(
        snapshot(&store).await.error_message(),
        Some("Unable to delete a todo")
    );

    // The first timer fires at 3s but no longer owns the banner
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(
        snapshot(&store).await.error_message(),
        Some("Unable to delete a todo")
    );

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(snapshot(&store).await.error.is_none());
}

#[tokio::test(start_paused = true)]
async fn dismissed_error_stays_dismissed() {
    let gateway = InMemoryGateway::new(owner());
    let store = store_with(&gateway);

    dispatch(
        &store,
        TodoAction::AddItem {
            title: String::new(),
        },
    )
    .await;
    dispatch(&store, TodoAction::DismissError).await;
    assert!(snapshot(&store).await.error.is_none());

    tokio::time::sleep(Duration::from_secs(4)).await;
    assert!(snapshot(&store).await.error.is_none());
}

#[tokio::test]
async fn shutdown_waits_for_in_flight_calls() {
    let gateway = InMemoryGateway::with_items(owner(), vec![item(1, "a", false)]);
    let store = store_with(&gateway);

    store
        .send(TodoAction::ToggleItem { id: ItemId::new(1) })
        .await
        .unwrap();
    store.shutdown(Duration::from_secs(1)).await.unwrap();

    assert!(snapshot(&store).await.items[0].completed);
    assert!(
        store
            .send(TodoAction::ToggleItem { id: ItemId::new(1) })
            .await
            .is_err()
    );
}
