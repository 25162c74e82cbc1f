//! Domain types for the task list.
//!
//! Items mirror the remote collection's records. Everything else here
//! (status tags, the error banner, the edit session) is client-side state
//! that never leaves the process.

use crate::filter::FilterState;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Identifier of an item.
///
/// Server-assigned identifiers are positive. Items that have not been
/// confirmed by the server yet carry a negative placeholder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(i64);

impl ItemId {
    /// Wraps a raw identifier
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Whether this is a local placeholder awaiting a server identifier
    #[must_use]
    pub const fn is_placeholder(self) -> bool {
        self.0 < 0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Owner identifier scoping which items are visible and mutable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Wraps a raw owner identifier. Zero means "not configured".
    #[must_use]
    pub const fn new(raw: u64) -> Option<Self> {
        if raw == 0 { None } else { Some(Self(raw)) }
    }

    /// Returns the raw identifier
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transient status of an item while a gateway call is in flight
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ItemStatus {
    /// No operation in flight
    #[default]
    Stable,
    /// A create, update or delete for this item awaits the server
    Pending,
}

/// A single task record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique identifier (placeholder until confirmed)
    pub id: ItemId,
    /// Trimmed, non-empty title
    pub title: String,
    /// Whether the task is done
    pub completed: bool,
    /// Owner of the item
    pub user_id: UserId,
    /// Client-side in-flight marker, never sent over the wire
    #[serde(skip)]
    pub status: ItemStatus,
}

impl Item {
    /// Creates a stable item
    #[must_use]
    pub fn new(id: ItemId, title: impl Into<String>, completed: bool, user_id: UserId) -> Self {
        Self {
            id,
            title: title.into(),
            completed,
            user_id,
            status: ItemStatus::Stable,
        }
    }

    /// Whether a gateway call for this item is in flight
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == ItemStatus::Pending
    }
}

/// Body of a create request. The gateway injects the owner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    /// Trimmed title
    pub title: String,
    /// Initial completion flag
    pub completed: bool,
}

/// Partial update of an item; absent fields are left untouched
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPatch {
    /// New title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New completion flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl ItemPatch {
    /// Patch that only sets the completion flag
    #[must_use]
    pub const fn completed(completed: bool) -> Self {
        Self {
            title: None,
            completed: Some(completed),
        }
    }

    /// Patch that only sets the title
    #[must_use]
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            completed: None,
        }
    }

    /// Apply the present fields to an item
    pub fn apply_to(&self, item: &mut Item) {
        if let Some(title) = &self.title {
            item.title.clone_from(title);
        }
        if let Some(completed) = self.completed {
            item.completed = completed;
        }
    }
}

/// User-facing error categories. Each has one fixed message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The initial list request failed
    Load,
    /// A submitted title was blank
    Validation,
    /// Creating an item failed
    Add,
    /// Deleting one or more items failed
    Delete,
    /// Updating an item failed
    Update,
    /// Toggle-all stopped on a failed update
    BulkUpdate,
}

impl ErrorKind {
    /// Message shown in the error banner
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Load => "Unable to load todos",
            Self::Validation => "Title should not be empty",
            Self::Add => "Unable to add a todo",
            Self::Delete => "Unable to delete a todo",
            Self::Update => "Unable to update a todo",
            Self::BulkUpdate => "Unable to update todos",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// The error banner currently shown
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ErrorNotice {
    /// What went wrong
    pub kind: ErrorKind,
    /// Generation of the auto-clear timer armed for this notice
    pub generation: u64,
}

/// Toggle-all in progress: remaining items are updated one at a time
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BulkToggle {
    /// Completion flag every remaining item is moved to
    pub target: bool,
    /// Items not yet sent, in list order
    pub remaining: VecDeque<ItemId>,
}

/// State of the task list
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TodoState {
    /// Items in display order
    pub items: Vec<Item>,
    /// Number of items with `completed == false`
    pub active_count: usize,
    /// Current filter
    pub filter: FilterState,
    /// Error banner, if any
    pub error: Option<ErrorNotice>,
    /// Last generation handed out to an error timer
    pub error_generation: u64,
    /// The initial list request is in flight
    pub is_loading: bool,
    /// A create is in flight; new submissions are refused until it resolves
    pub is_submitting: bool,
    /// Item currently in edit mode
    pub editing: Option<ItemId>,
    /// Toggle-all progress
    pub bulk_toggle: Option<BulkToggle>,
    next_placeholder: i64,
}

impl Default for TodoState {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoState {
    /// Creates an empty state
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            active_count: 0,
            filter: FilterState::All,
            error: None,
            error_generation: 0,
            is_loading: false,
            is_submitting: false,
            editing: None,
            bulk_toggle: None,
            next_placeholder: -1,
        }
    }

    /// Creates a state holding the given items, with counters computed
    #[must_use]
    pub fn with_items(items: Vec<Item>) -> Self {
        let mut state = Self::new();
        state.items = items;
        state.recount();
        state
    }

    /// Returns an item by identifier
    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Returns a mutable item by identifier
    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// Number of completed items
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|item| item.completed).count()
    }

    /// Whether every item is completed (vacuously true when empty)
    #[must_use]
    pub fn all_completed(&self) -> bool {
        self.items.iter().all(|item| item.completed)
    }

    /// Currently displayed error message
    #[must_use]
    pub fn error_message(&self) -> Option<&'static str> {
        self.error.map(|notice| notice.kind.message())
    }

    /// Items visible under the current filter
    pub fn visible(&self) -> impl Iterator<Item = &Item> {
        crate::filter::visible(&self.items, self.filter)
    }

    /// Recompute `active_count` from the items
    pub fn recount(&mut self) {
        self.active_count = self.items.iter().filter(|item| !item.completed).count();
    }

    /// Hand out the next placeholder identifier
    pub(crate) fn next_placeholder(&mut self) -> ItemId {
        let id = ItemId::new(self.next_placeholder);
        self.next_placeholder -= 1;
        id
    }

    /// Remove an item, returning it
    pub(crate) fn remove(&mut self, id: ItemId) -> Option<Item> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }
}

/// Actions for the task list: user intents and gateway results
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TodoAction {
    // ========== Intents ==========
    /// Fetch the owner's items
    Load,
    /// Submit a new item
    AddItem {
        /// Raw title as typed
        title: String,
    },
    /// Delete an item
    DeleteItem {
        /// Item to delete
        id: ItemId,
    },
    /// Flip an item's completion flag
    ToggleItem {
        /// Item to toggle
        id: ItemId,
    },
    /// Enter edit mode for an item
    BeginEdit {
        /// Item to edit
        id: ItemId,
    },
    /// Leave edit mode without saving
    CancelEdit,
    /// Submit an edited title
    SubmitEdit {
        /// Item being renamed
        id: ItemId,
        /// Raw title as typed
        title: String,
    },
    /// Complete every item, or reopen every item when all are complete
    ToggleAll,
    /// Delete every completed item
    ClearCompleted,
    /// Change the visible subset
    SetFilter {
        /// New filter
        filter: FilterState,
    },
    /// Hide the error banner
    DismissError,

    // ========== Results ==========
    /// Items fetched
    Loaded {
        /// Items from the server
        items: Vec<Item>,
    },
    /// Fetching failed
    LoadFailed {
        /// Gateway error text
        error: String,
    },
    /// The server confirmed a create
    ItemCreated {
        /// Placeholder the item was inserted under
        placeholder: ItemId,
        /// Item as returned by the server
        item: Item,
    },
    /// A create failed
    CreateFailed {
        /// Placeholder to roll back
        placeholder: ItemId,
        /// Gateway error text
        error: String,
    },
    /// The server confirmed a delete
    ItemDeleted {
        /// Deleted item
        id: ItemId,
    },
    /// A delete failed
    DeleteFailed {
        /// Item that is kept
        id: ItemId,
        /// Gateway error text
        error: String,
    },
    /// The server confirmed a completion flip
    ItemToggled {
        /// Toggled item
        id: ItemId,
        /// Confirmed flag
        completed: bool,
    },
    /// The server confirmed a rename
    ItemRenamed {
        /// Renamed item
        id: ItemId,
        /// Confirmed title
        title: String,
    },
    /// A single-item update failed
    UpdateFailed {
        /// Item left unchanged
        id: ItemId,
        /// Gateway error text
        error: String,
    },
    /// One toggle-all update succeeded
    BulkToggleStepSucceeded {
        /// Updated item
        id: ItemId,
        /// Confirmed flag
        completed: bool,
    },
    /// One toggle-all update failed; the rest are abandoned
    BulkToggleStepFailed {
        /// Item left unchanged
        id: ItemId,
        /// Gateway error text
        error: String,
    },
    /// All clear-completed deletes settled
    CompletedCleared {
        /// Items the server deleted
        deleted: Vec<ItemId>,
        /// Items whose delete failed
        failed: Vec<ItemId>,
    },
    /// The auto-clear timer for an error banner fired
    ErrorTimerElapsed {
        /// Generation the timer was armed for
        generation: u64,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Tests may panic
mod tests {
    use super::*;

    fn owner() -> UserId {
        UserId::new(7).unwrap()
    }

    #[test]
    fn item_wire_format_is_camel_case() {
        let item = Item::new(ItemId::new(3), "Buy milk", true, owner());
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 3, "title": "Buy milk", "completed": true, "userId": 7})
        );

        let parsed: Item = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, item);
        assert_eq!(parsed.status, ItemStatus::Stable);
    }

    #[test]
    fn patch_omits_absent_fields() {
        let json = serde_json::to_value(ItemPatch::completed(true)).unwrap();
        assert_eq!(json, serde_json::json!({"completed": true}));

        let json = serde_json::to_value(ItemPatch::title("x")).unwrap();
        assert_eq!(json, serde_json::json!({"title": "x"}));
    }

    #[test]
    fn patch_applies_present_fields_only() {
        let mut item = Item::new(ItemId::new(1), "a", false, owner());
        ItemPatch::title("b").apply_to(&mut item);
        assert_eq!(item.title, "b");
        assert!(!item.completed);

        ItemPatch::completed(true).apply_to(&mut item);
        assert_eq!(item.title, "b");
        assert!(item.completed);
    }

    #[test]
    fn zero_user_id_is_unconfigured() {
        assert_eq!(UserId::new(0), None);
        assert_eq!(UserId::new(1868).map(UserId::get), Some(1868));
    }

    #[test]
    fn placeholders_are_negative_and_unique() {
        let mut state = TodoState::new();
        let first = state.next_placeholder();
        let second = state.next_placeholder();
        assert!(first.is_placeholder());
        assert!(second.is_placeholder());
        assert_ne!(first, second);
        assert!(!ItemId::new(1).is_placeholder());
    }

    #[test]
    fn with_items_counts_active() {
        let state = TodoState::with_items(vec![
            Item::new(ItemId::new(1), "a", false, owner()),
            Item::new(ItemId::new(2), "b", true, owner()),
        ]);
        assert_eq!(state.active_count, 1);
        assert_eq!(state.completed_count(), 1);
        assert!(!state.all_completed());
        assert!(TodoState::new().all_completed());
    }

    #[test]
    fn error_messages_match_kinds() {
        assert_eq!(ErrorKind::Validation.to_string(), "Title should not be empty");
        assert_eq!(ErrorKind::BulkUpdate.message(), "Unable to update todos");
    }
}
