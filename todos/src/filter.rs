//! Filter view: which subset of the items is shown.

use crate::types::Item;
use std::str::FromStr;
use thiserror::Error;

/// Tri-state visibility filter
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FilterState {
    /// Every item
    #[default]
    All,
    /// Items not yet completed
    Active,
    /// Completed items
    Completed,
}

impl FilterState {
    /// All filters in footer order
    pub const ALL: [Self; 3] = [Self::All, Self::Active, Self::Completed];

    /// Whether an item passes this filter
    #[must_use]
    pub const fn matches(self, item: &Item) -> bool {
        match self {
            Self::All => true,
            Self::Active => !item.completed,
            Self::Completed => item.completed,
        }
    }

    /// Route fragment of the filter link
    #[must_use]
    pub const fn href(self) -> &'static str {
        match self {
            Self::All => "#/",
            Self::Active => "#/active",
            Self::Completed => "#/completed",
        }
    }

    /// Footer label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for FilterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Unrecognised filter name
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("Unknown filter: {0} (expected all, active or completed)")]
pub struct ParseFilterError(pub String);

impl FromStr for FilterState {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "#/" | "#" | "" => Ok(Self::All),
            "active" | "#/active" => Ok(Self::Active),
            "completed" | "#/completed" => Ok(Self::Completed),
            other => Err(ParseFilterError(other.to_string())),
        }
    }
}

/// Items passing the filter, in their original order
pub fn visible(items: &[Item], filter: FilterState) -> impl Iterator<Item = &Item> {
    items.iter().filter(move |item| filter.matches(item))
}

/// Owned copy of the items passing the filter
#[must_use]
pub fn apply(items: &[Item], filter: FilterState) -> Vec<Item> {
    visible(items, filter).cloned().collect()
}
