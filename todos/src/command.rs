//! Line commands accepted by the `todos` binary.

use crate::filter::{FilterState, ParseFilterError};
use crate::types::{ItemId, TodoAction};
use std::str::FromStr;
use thiserror::Error;

/// Help text listing every command
pub const HELP: &str = "\
commands:
  add <title>          add an item
  toggle <id>          flip an item's completion
  rm <id>              delete an item
  edit <id>            start editing an item
  save <id> <title>    rename an item (empty title deletes it)
  cancel               leave edit mode
  all                  complete all items, or reopen all when all are complete
  clear                delete completed items
  filter <name>        all | active | completed
  dismiss              hide the error message
  list                 redraw
  help                 show this help
  quit                 exit";

/// A parsed command line
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `add <title>`
    Add(String),
    /// `toggle <id>`
    Toggle(ItemId),
    /// `rm <id>`
    Remove(ItemId),
    /// `edit <id>`
    Edit(ItemId),
    /// `save <id> <title>`
    Save(ItemId, String),
    /// `cancel`
    Cancel,
    /// `all`
    ToggleAll,
    /// `clear`
    ClearCompleted,
    /// `filter <name>`
    Filter(FilterState),
    /// `dismiss`
    Dismiss,
    /// `list`
    List,
    /// `help`
    Help,
    /// `quit`
    Quit,
}

/// Why a command line was rejected
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    /// Blank line
    #[error("Empty command")]
    Empty,

    /// Unrecognised verb
    #[error("Unknown command: {0} (try `help`)")]
    Unknown(String),

    /// Required argument missing
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    /// Identifier is not an integer
    #[error("Invalid id: {0}")]
    InvalidId(String),

    /// Unrecognised filter
    #[error(transparent)]
    Filter(#[from] ParseFilterError),
}

fn parse_id(arg: &str) -> Result<ItemId, CommandError> {
    let arg = arg.trim();
    if arg.is_empty() {
        return Err(CommandError::MissingArgument("id"));
    }
    arg.parse()
        .map(ItemId::new)
        .map_err(|_| CommandError::InvalidId(arg.to_string()))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Err(CommandError::Empty);
        }
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match verb {
            "add" => Ok(Self::Add(rest.to_string())),
            "toggle" => parse_id(rest).map(Self::Toggle),
            "rm" => parse_id(rest).map(Self::Remove),
            "edit" => parse_id(rest).map(Self::Edit),
            "save" => {
                let (id, title) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                Ok(Self::Save(parse_id(id)?, title.to_string()))
            },
            "cancel" => Ok(Self::Cancel),
            "all" => Ok(Self::ToggleAll),
            "clear" => Ok(Self::ClearCompleted),
            "filter" => Ok(Self::Filter(rest.parse()?)),
            "dismiss" => Ok(Self::Dismiss),
            "list" | "ls" => Ok(Self::List),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

impl Command {
    /// Store action for this command; `None` for commands handled by the shell
    #[must_use]
    pub fn into_action(self) -> Option<TodoAction> {
        match self {
            Self::Add(title) => Some(TodoAction::AddItem { title }),
            Self::Toggle(id) => Some(TodoAction::ToggleItem { id }),
            Self::Remove(id) => Some(TodoAction::DeleteItem { id }),
            Self::Edit(id) => Some(TodoAction::BeginEdit { id }),
            Self::Save(id, title) => Some(TodoAction::SubmitEdit { id, title }),
            Self::Cancel => Some(TodoAction::CancelEdit),
            Self::ToggleAll => Some(TodoAction::ToggleAll),
            Self::ClearCompleted => Some(TodoAction::ClearCompleted),
            Self::Filter(filter) => Some(TodoAction::SetFilter { filter }),
            Self::Dismiss => Some(TodoAction::DismissError),
            Self::List | Self::Help | Self::Quit => None,
        }
    }
}
