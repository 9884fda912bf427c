//! Renderer-side state for a built [`CodeGroup`].
//!
//! Nothing here changes the group itself; these types track what the reader
//! currently sees (active tab, collapsed long blocks).

use rw_tabstore::TabStore;

use crate::group::{CodeGroup, TabDescriptor};

/// Default number of lines shown before a block becomes collapsible.
pub const DEFAULT_COLLAPSE_THRESHOLD: usize = 10;

/// How a group is laid out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupLayout {
    /// One tab: a plain code block, no tab strip.
    Single,
    /// Several tabs behind a tab strip.
    Tabbed,
}

impl CodeGroup {
    /// Layout for this group, decided by the number of tabs.
    #[must_use]
    pub fn layout(&self) -> GroupLayout {
        if self.tabs.len() > 1 {
            GroupLayout::Tabbed
        } else {
            GroupLayout::Single
        }
    }
}

/// Active tab of a tabbed group.
///
/// Starts on the title stored under the group's storage key when that title
/// exists in the group, otherwise on the first tab.
pub struct TabSelection<'a> {
    group: &'a CodeGroup,
    store: &'a dyn TabStore,
    active: usize,
}

impl<'a> TabSelection<'a> {
    /// Restore the selection for `group` from `store`.
    pub fn new(group: &'a CodeGroup, store: &'a dyn TabStore) -> Self {
        let active = group
            .storage_key
            .as_deref()
            .and_then(|key| store.get(key))
            .and_then(|title| group.find_tab(&title).map(|(idx, _)| idx))
            .unwrap_or(0);
        Self {
            group,
            store,
            active,
        }
    }

    /// Index of the active tab.
    #[must_use]
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// The active tab, `None` for a group without tabs.
    #[must_use]
    pub fn active(&self) -> Option<&'a TabDescriptor> {
        self.group.tabs.get(self.active)
    }

    /// Activate the first tab titled `title` and persist the choice.
    ///
    /// Returns `false` and keeps the current tab if no tab has that title.
    pub fn select(&mut self, title: &str) -> bool {
        let Some((idx, _)) = self.group.find_tab(title) else {
            return false;
        };
        self.active = idx;
        if let Some(key) = &self.group.storage_key {
            self.store.set(key, title);
        }
        true
    }
}

/// Collapse toggle for long code blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollapseState {
    /// Block fits within the threshold; no toggle.
    NotApplicable,
    /// Only the first lines are shown.
    Collapsed {
        /// Lines hidden behind the toggle.
        hidden: usize,
    },
    /// Everything is shown; toggle collapses again.
    Expanded {
        /// Lines hidden when collapsed.
        hidden: usize,
    },
}

impl CollapseState {
    /// Initial state for a block of `line_count` lines.
    #[must_use]
    pub fn for_lines(line_count: usize, threshold: usize) -> Self {
        if line_count > threshold {
            Self::Collapsed {
                hidden: line_count - threshold,
            }
        } else {
            Self::NotApplicable
        }
    }

    /// Flip between collapsed and expanded.
    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            Self::NotApplicable => Self::NotApplicable,
            Self::Collapsed { hidden } => Self::Expanded { hidden },
            Self::Expanded { hidden } => Self::Collapsed { hidden },
        }
    }

    /// Whether lines are currently hidden.
    #[must_use]
    pub fn is_collapsed(self) -> bool {
        matches!(self, Self::Collapsed { .. })
    }

    /// Number of lines to show out of `line_count`.
    #[must_use]
    pub fn visible_lines(self, line_count: usize) -> usize {
        match self {
            Self::Collapsed { hidden } => line_count.saturating_sub(hidden),
            Self::NotApplicable | Self::Expanded { .. } => line_count,
        }
    }

    /// Toggle button text, `None` when there is no toggle.
    #[must_use]
    pub fn label(self) -> Option<String> {
        match self {
            Self::NotApplicable => None,
            Self::Collapsed { hidden: 1 } => Some("Show 1 more line".to_owned()),
            Self::Collapsed { hidden } => Some(format!("Show {hidden} more lines")),
            Self::Expanded { .. } => Some("Show less".to_owned()),
        }
    }
}
