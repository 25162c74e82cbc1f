//! Plain-text rendering of the task list.

use crate::filter::FilterState;
use crate::types::{Item, TodoState};

/// Shown instead of the list when no owner identifier is configured
#[must_use]
pub fn render_user_warning() -> String {
    "Please set TODOS_USER_ID to your user id to load your todos.".to_string()
}

fn render_item(state: &TodoState, item: &Item) -> String {
    let check = if item.completed { "[x]" } else { "[ ]" };
    let id = if item.id.is_placeholder() {
        "--".to_string()
    } else {
        item.id.to_string()
    };

    let mut line = format!("{check} {id:>4}  {}", item.title);
    if state.editing == Some(item.id) {
        line.push_str("  (editing)");
    }
    if item.is_pending() {
        line.push_str("  ...");
    }
    line
}

fn render_footer(state: &TodoState) -> String {
    let filters: Vec<String> = FilterState::ALL
        .iter()
        .map(|&filter| {
            if filter == state.filter {
                format!("[{filter}]")
            } else {
                filter.to_string()
            }
        })
        .collect();

    let clear = if state.completed_count() > 0 {
        "Clear completed"
    } else {
        "(Clear completed)"
    };

    format!(
        "{} items left  |  {}  |  {clear}",
        state.active_count,
        filters.join(" ")
    )
}

/// Render the whole screen
#[must_use]
pub fn render(state: &TodoState) -> String {
    let mut lines = vec!["todos".to_string()];

    let toggle = match (state.items.is_empty(), state.all_completed()) {
        (true, _) => "   ",
        (false, true) => "(v)",
        (false, false) => "( )",
    };
    let input = if state.is_submitting {
        "What needs to be done?  (saving)"
    } else {
        "What needs to be done?"
    };
    lines.push(format!("{toggle} {input}"));

    if state.is_loading {
        lines.push("Loading...".to_string());
    }

    lines.extend(state.visible().map(|item| render_item(state, item)));

    if !state.items.is_empty() {
        lines.push(render_footer(state));
    }

    if let Some(message) = state.error_message() {
        lines.push(format!("! {message}"));
    }

    lines.join("\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Tests may panic
mod tests {
    use super::*;
    use crate::types::{ErrorKind, ErrorNotice, ItemId, ItemStatus, UserId};

    fn item(id: i64, title: &str, completed: bool) -> Item {
        Item::new(ItemId::new(id), title, completed, UserId::new(1).unwrap())
    }

    #[test]
    fn empty_list_has_no_footer_or_toggle() {
        let screen = render(&TodoState::new());
        assert_eq!(screen, "todos\n    What needs to be done?");
    }

    #[test]
    fn renders_items_and_footer() {
        let state = TodoState::with_items(vec![item(1, "a", false), item(2, "b", true)]);
        let screen = render(&state);

        assert!(screen.contains("( ) What needs to be done?"));
        assert!(screen.contains("[ ]    1  a"));
        assert!(screen.contains("[x]    2  b"));
        assert!(screen.contains("1 items left  |  [All] Active Completed  |  Clear completed"));
    }

    #[test]
    fn toggle_marker_is_active_when_all_completed() {
        let state = TodoState::with_items(vec![item(1, "a", true)]);
        assert!(render(&state).contains("(v) What needs to be done?"));
    }

    #[test]
    fn clear_completed_is_disabled_without_completed_items() {
        let state = TodoState::with_items(vec![item(1, "a", false)]);
        assert!(render(&state).contains("(Clear completed)"));
    }

    #[test]
    fn filter_hides_items_and_marks_selection() {
        let mut state = TodoState::with_items(vec![item(1, "a", false), item(2, "b", true)]);
        state.filter = FilterState::Active;
        let screen = render(&state);

        assert!(screen.contains("  a"));
        assert!(!screen.contains("  b"));
        assert!(screen.contains("All [Active] Completed"));
    }

    #[test]
    fn pending_placeholder_and_edit_markers() {
        let mut state = TodoState::with_items(vec![item(1, "a", false), item(-1, "new", false)]);
        state.items[1].status = ItemStatus::Pending;
        state.editing = Some(ItemId::new(1));
        let screen = render(&state);

        assert!(screen.contains("[ ]    1  a  (editing)"));
        assert!(screen.contains("[ ]   --  new  ..."));
    }

    #[test]
    fn error_banner_is_last_line() {
        let mut state = TodoState::new();
        state.error = Some(ErrorNotice {
            kind: ErrorKind::Load,
            generation: 1,
        });
        let screen = render(&state);

        assert_eq!(screen.lines().last(), Some("! Unable to load todos"));
    }
}
