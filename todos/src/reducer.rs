//! Reducer for the task list.
//!
//! Every mutating intent follows the same shape: mark the target item
//! `Pending`, hand a gateway call to the runtime, then commit or roll back
//! when the result action comes back. Intents aimed at a `Pending` item are
//! dropped.

use crate::gateway::TodoGateway;
use crate::types::{
    BulkToggle, ErrorKind, ErrorNotice, Item, ItemId, ItemPatch, ItemStatus, NewItem, TodoAction,
    TodoState,
};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tasklist_core::{SmallVec, async_effect, delay, effect::Effect, reducer::Reducer, smallvec};

type Effects = SmallVec<[Effect<TodoAction>; 4]>;

/// How long an error banner stays up unless replaced or dismissed
pub const DEFAULT_ERROR_TIMEOUT: Duration = Duration::from_secs(3);

/// Environment dependencies for the todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Remote collection
    pub gateway: Arc<dyn TodoGateway>,
    /// Error banner lifetime
    pub error_timeout: Duration,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(gateway: Arc<dyn TodoGateway>, error_timeout: Duration) -> Self {
        Self {
            gateway,
            error_timeout,
        }
    }

    /// Environment with the default error timeout
    #[must_use]
    pub fn with_gateway(gateway: impl TodoGateway + 'static) -> Self {
        Self::new(Arc::new(gateway), DEFAULT_ERROR_TIMEOUT)
    }
}

impl std::fmt::Debug for TodoEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoEnvironment")
            .field("owner", &self.gateway.owner())
            .field("error_timeout", &self.error_timeout)
            .finish_non_exhaustive()
    }
}

/// Reducer for the task list
#[derive(Clone, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Show an error banner and arm its auto-clear timer
    fn raise(state: &mut TodoState, kind: ErrorKind, env: &TodoEnvironment) -> Effect<TodoAction> {
        state.error_generation += 1;
        let generation = state.error_generation;
        state.error = Some(ErrorNotice { kind, generation });
        tracing::warn!(error = %kind, generation, "Showing error");

        delay! {
            duration: env.error_timeout,
            action: TodoAction::ErrorTimerElapsed { generation }
        }
    }

    /// Item that is present and not awaiting the server
    fn settled<'a>(
        state: &'a mut TodoState,
        id: ItemId,
        intent: &'static str,
    ) -> Option<&'a mut Item> {
        match state.get_mut(id) {
            Some(item) if item.is_pending() => {
                tracing::debug!(%id, intent, "Ignoring intent for pending item");
                None
            },
            Some(item) => Some(item),
            None => {
                tracing::debug!(%id, intent, "Ignoring intent for unknown item");
                None
            },
        }
    }

    fn settle(state: &mut TodoState, id: ItemId) {
        if let Some(item) = state.get_mut(id) {
            item.status = ItemStatus::Stable;
        }
    }

    fn load(state: &mut TodoState, env: &TodoEnvironment) -> Effects {
        if state.is_loading {
            tracing::debug!("Load already in flight");
            return SmallVec::new();
        }
        state.is_loading = true;

        let gateway = Arc::clone(&env.gateway);
        smallvec![async_effect! {
            match gateway.list_items().await {
                Ok(items) => Some(TodoAction::Loaded { items }),
                Err(error) => Some(TodoAction::LoadFailed { error: error.to_string() }),
            }
        }]
    }

    fn add(state: &mut TodoState, title: &str, env: &TodoEnvironment) -> Effects {
        if state.is_submitting {
            tracing::debug!("Submission already in flight");
            return SmallVec::new();
        }

        let title = title.trim();
        if title.is_empty() {
            return smallvec![Self::raise(state, ErrorKind::Validation, env)];
        }

        let placeholder = state.next_placeholder();
        let mut item = Item::new(placeholder, title, false, env.gateway.owner());
        item.status = ItemStatus::Pending;
        state.items.push(item);
        state.is_submitting = true;
        state.recount();

        let gateway = Arc::clone(&env.gateway);
        let new = NewItem {
            title: title.to_string(),
            completed: false,
        };
        smallvec![async_effect! {
            match gateway.create_item(new).await {
                Ok(item) => Some(TodoAction::ItemCreated { placeholder, item }),
                Err(error) => Some(TodoAction::CreateFailed {
                    placeholder,
                    error: error.to_string(),
                }),
            }
        }]
    }

    fn delete(state: &mut TodoState, id: ItemId, env: &TodoEnvironment) -> Effects {
        let Some(item) = Self::settled(state, id, "delete") else {
            return SmallVec::new();
        };
        item.status = ItemStatus::Pending;

        let gateway = Arc::clone(&env.gateway);
        smallvec![async_effect! {
            match gateway.delete_item(id).await {
                Ok(()) => Some(TodoAction::ItemDeleted { id }),
                Err(error) => Some(TodoAction::DeleteFailed { id, error: error.to_string() }),
            }
        }]
    }

    fn toggle(state: &mut TodoState, id: ItemId, env: &TodoEnvironment) -> Effects {
        let Some(item) = Self::settled(state, id, "toggle") else {
            return SmallVec::new();
        };
        item.status = ItemStatus::Pending;
        let completed = !item.completed;

        let gateway = Arc::clone(&env.gateway);
        smallvec![async_effect! {
            match gateway.update_item(id, ItemPatch::completed(completed)).await {
                Ok(_) => Some(TodoAction::ItemToggled { id, completed }),
                Err(error) => Some(TodoAction::UpdateFailed { id, error: error.to_string() }),
            }
        }]
    }

    fn submit_edit(
        state: &mut TodoState,
        id: ItemId,
        title: &str,
        env: &TodoEnvironment,
    ) -> Effects {
        let Some(item) = Self::settled(state, id, "rename") else {
            return SmallVec::new();
        };

        let title = title.trim();
        if title == item.title {
            if state.editing == Some(id) {
                state.editing = None;
            }
            return SmallVec::new();
        }
        if title.is_empty() {
            return Self::delete(state, id, env);
        }
        item.status = ItemStatus::Pending;

        let gateway = Arc::clone(&env.gateway);
        let title = title.to_string();
        smallvec![async_effect! {
            match gateway.update_item(id, ItemPatch::title(title.clone())).await {
                Ok(_) => Some(TodoAction::ItemRenamed { id, title }),
                Err(error) => Some(TodoAction::UpdateFailed { id, error: error.to_string() }),
            }
        }]
    }

    fn toggle_all(state: &mut TodoState, env: &TodoEnvironment) -> Effects {
        if state.bulk_toggle.is_some() {
            tracing::debug!("Toggle-all already in flight");
            return SmallVec::new();
        }

        let target = !state.all_completed();
        let remaining = state
            .items
            .iter()
            .filter(|item| item.completed != target && !item.is_pending())
            .map(|item| item.id)
            .collect();
        state.bulk_toggle = Some(BulkToggle { target, remaining });

        smallvec![Self::next_bulk_step(state, env)]
    }

    /// Send the next toggle-all update, or finish when nothing is left
    fn next_bulk_step(state: &mut TodoState, env: &TodoEnvironment) -> Effect<TodoAction> {
        let Some(bulk) = state.bulk_toggle.as_mut() else {
            return Effect::None;
        };
        let target = bulk.target;

        while let Some(id) = bulk.remaining.pop_front() {
            let Some(item) = state.items.iter_mut().find(|item| item.id == id) else {
                continue;
            };
            if item.is_pending() || item.completed == target {
                continue;
            }
            item.status = ItemStatus::Pending;

            let gateway = Arc::clone(&env.gateway);
            return async_effect! {
                match gateway.update_item(id, ItemPatch::completed(target)).await {
                    Ok(_) => Some(TodoAction::BulkToggleStepSucceeded { id, completed: target }),
                    Err(error) => Some(TodoAction::BulkToggleStepFailed {
                        id,
                        error: error.to_string(),
                    }),
                }
            };
        }

        state.bulk_toggle = None;
        Effect::None
    }

    fn clear_completed(state: &mut TodoState, env: &TodoEnvironment) -> Effects {
        let ids: Vec<ItemId> = state
            .items
            .iter_mut()
            .filter(|item| item.completed && !item.is_pending())
            .map(|item| {
                item.status = ItemStatus::Pending;
                item.id
            })
            .collect();
        if ids.is_empty() {
            return SmallVec::new();
        }

        let gateway = Arc::clone(&env.gateway);
        smallvec![async_effect! {
            let gateway = &gateway;
            let results = join_all(
                ids.iter()
                    .map(move |&id| async move { (id, gateway.delete_item(id).await) }),
            )
            .await;

            let mut deleted = Vec::new();
            let mut failed = Vec::new();
            for (id, result) in results {
                match result {
                    Ok(()) => deleted.push(id),
                    Err(error) => {
                        tracing::warn!(%id, %error, "Clear-completed delete failed");
                        failed.push(id);
                    },
                }
            }
            Some(TodoAction::CompletedCleared { deleted, failed })
        }]
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Intents ==========
            TodoAction::Load => Self::load(state, env),
            TodoAction::AddItem { title } => Self::add(state, &title, env),
            TodoAction::DeleteItem { id } => Self::delete(state, id, env),
            TodoAction::ToggleItem { id } => Self::toggle(state, id, env),
            TodoAction::BeginEdit { id } => {
                if Self::settled(state, id, "edit").is_some() {
                    state.editing = Some(id);
                }
                SmallVec::new()
            },
            TodoAction::CancelEdit => {
                state.editing = None;
                SmallVec::new()
            },
            TodoAction::SubmitEdit { id, title } => Self::submit_edit(state, id, &title, env),
            TodoAction::ToggleAll => Self::toggle_all(state, env),
            TodoAction::ClearCompleted => Self::clear_completed(state, env),
            TodoAction::SetFilter { filter } => {
                state.filter = filter;
                SmallVec::new()
            },
            TodoAction::DismissError => {
                state.error = None;
                SmallVec::new()
            },

            // ========== Results ==========
            TodoAction::Loaded { items } => {
                let placeholders: Vec<Item> = state
                    .items
                    .drain(..)
                    .filter(|item| item.id.is_placeholder())
                    .collect();
                state.items = items;
                state.items.extend(placeholders);
                state.is_loading = false;
                state.recount();
                tracing::info!(count = state.items.len(), "Items loaded");
                SmallVec::new()
            },
            TodoAction::LoadFailed { error } => {
                tracing::warn!(%error, "Load failed");
                state.items.retain(|item| item.id.is_placeholder());
                state.is_loading = false;
                state.recount();
                smallvec![Self::raise(state, ErrorKind::Load, env)]
            },
            TodoAction::ItemCreated { placeholder, item } => {
                state.is_submitting = false;
                if state.get(item.id).is_some() {
                    tracing::warn!(id = %item.id, "Created item already present");
                    state.remove(placeholder);
                } else if let Some(entry) = state.get_mut(placeholder) {
                    entry.id = item.id;
                    entry.user_id = item.user_id;
                    entry.status = ItemStatus::Stable;
                }
                state.recount();
                SmallVec::new()
            },
            TodoAction::CreateFailed { placeholder, error } => {
                tracing::warn!(%error, "Create failed");
                state.remove(placeholder);
                state.is_submitting = false;
                state.recount();
                smallvec![Self::raise(state, ErrorKind::Add, env)]
            },
            TodoAction::ItemDeleted { id } => {
                state.remove(id);
                if state.editing == Some(id) {
                    state.editing = None;
                }
                state.recount();
                SmallVec::new()
            },
            TodoAction::DeleteFailed { id, error } => {
                tracing::warn!(%id, %error, "Delete failed");
                Self::settle(state, id);
                smallvec![Self::raise(state, ErrorKind::Delete, env)]
            },
            TodoAction::ItemToggled { id, completed } => {
                if let Some(item) = state.get_mut(id) {
                    item.completed = completed;
                    item.status = ItemStatus::Stable;
                }
                state.recount();
                SmallVec::new()
            },
            TodoAction::ItemRenamed { id, title } => {
                if let Some(item) = state.get_mut(id) {
                    item.title = title;
                    item.status = ItemStatus::Stable;
                }
                if state.editing == Some(id) {
                    state.editing = None;
                }
                SmallVec::new()
            },
            TodoAction::UpdateFailed { id, error } => {
                tracing::warn!(%id, %error, "Update failed");
                Self::settle(state, id);
                smallvec![Self::raise(state, ErrorKind::Update, env)]
            },
            TodoAction::BulkToggleStepSucceeded { id, completed } => {
                if let Some(item) = state.get_mut(id) {
                    item.completed = completed;
                    item.status = ItemStatus::Stable;
                }
                state.recount();
                smallvec![Self::next_bulk_step(state, env)]
            },
            TodoAction::BulkToggleStepFailed { id, error } => {
                tracing::warn!(%id, %error, "Toggle-all stopped");
                Self::settle(state, id);
                state.bulk_toggle = None;
                smallvec![Self::raise(state, ErrorKind::BulkUpdate, env)]
            },
            TodoAction::CompletedCleared { deleted, failed } => {
                for id in &deleted {
                    state.remove(*id);
                    if state.editing == Some(*id) {
                        state.editing = None;
                    }
                }
                for id in &failed {
                    Self::settle(state, *id);
                }
                state.recount();

                if failed.is_empty() {
                    SmallVec::new()
                } else {
                    smallvec![Self::raise(state, ErrorKind::Delete, env)]
                }
            },
            TodoAction::ErrorTimerElapsed { generation } => {
                if state.error.is_some_and(|notice| notice.generation == generation) {
                    state.error = None;
                }
                SmallVec::new()
            },
        }
    }
}
