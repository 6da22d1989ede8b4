//! Selection / delete-mode controller.
//!
//! Each group is either `Idle` or `Selecting` with its own selection set.
//! Pressing a group's delete button drives the transitions:
//!
//! ```text
//! Idle      --press-->               Selecting(empty)
//! Selecting --press, empty set-->    Idle            (cancel)
//! Selecting --press, non-empty-->    Idle            (commit the set)
//! ```
//!
//! State is keyed by group id and is independent of rendering.

use std::collections::{HashMap, HashSet};

use crate::types::interaction::ClickAction;

/// Delete-mode state of one group.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeleteMode {
    #[default]
    Idle,
    Selecting(HashSet<String>),
}

/// Result of pressing a group's delete button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletePress {
    /// Delete-mode was entered with an empty selection.
    Entered,
    /// Delete-mode was left without selecting anything.
    Cancelled,
    /// Delete-mode was left; the caller removes these keys.
    Commit(HashSet<String>),
}

#[derive(Debug, Default)]
pub struct SelectionController {
    states: HashMap<String, DeleteMode>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self, group_id: &str) -> &DeleteMode {
        static IDLE: DeleteMode = DeleteMode::Idle;
        self.states.get(group_id).unwrap_or(&IDLE)
    }

    pub fn is_selecting(&self, group_id: &str) -> bool {
        matches!(self.mode(group_id), DeleteMode::Selecting(_))
    }

    pub fn is_selected(&self, group_id: &str, key: &str) -> bool {
        match self.mode(group_id) {
            DeleteMode::Selecting(set) => set.contains(key),
            DeleteMode::Idle => false,
        }
    }

    pub fn selection_len(&self, group_id: &str) -> usize {
        match self.mode(group_id) {
            DeleteMode::Selecting(set) => set.len(),
            DeleteMode::Idle => 0,
        }
    }

    /// What a click on an item of `group_id` should do right now.
    pub fn click_action(&self, group_id: &str) -> ClickAction {
        if self.is_selecting(group_id) {
            ClickAction::ToggleSelect
        } else {
            ClickAction::Activate
        }
    }

    pub fn press_delete(&mut self, group_id: &str) -> DeletePress {
        match self.states.remove(group_id) {
            None | Some(DeleteMode::Idle) => {
                self.states
                    .insert(group_id.to_string(), DeleteMode::Selecting(HashSet::new()));
                DeletePress::Entered
            }
            Some(DeleteMode::Selecting(set)) if set.is_empty() => DeletePress::Cancelled,
            Some(DeleteMode::Selecting(set)) => DeletePress::Commit(set),
        }
    }

    /// Flips membership of `key`. Returns the new membership, or `None` when
    /// the group is not in delete-mode.
    pub fn toggle_select(&mut self, group_id: &str, key: &str) -> Option<bool> {
        match self.states.get_mut(group_id) {
            Some(DeleteMode::Selecting(set)) => {
                if set.remove(key) {
                    Some(false)
                } else {
                    set.insert(key.to_string());
                    Some(true)
                }
            }
            _ => None,
        }
    }

    /// Returns a group to `Idle`, dropping any partial selection.
    pub fn reset(&mut self, group_id: &str) {
        self.states.remove(group_id);
    }

    /// Drops state for groups that no longer exist.
    pub fn retain_groups<'a>(&mut self, live: impl IntoIterator<Item = &'a str>) {
        let live: HashSet<&str> = live.into_iter().collect();
        self.states.retain(|id, _| live.contains(id.as_str()));
    }

    /// Drops selected keys of `group_id` that are no longer its items. The
    /// group stays in delete-mode even when its selection empties.
    pub fn retain_keys<'a>(&mut self, group_id: &str, live: impl IntoIterator<Item = &'a str>) {
        if let Some(DeleteMode::Selecting(set)) = self.states.get_mut(group_id) {
            let live: HashSet<&str> = live.into_iter().collect();
            set.retain(|key| live.contains(key.as_str()));
        }
    }

    /// Ids of the groups currently in delete-mode.
    pub fn selecting_groups(&self) -> Vec<&str> {
        self.states
            .iter()
            .filter(|(_, mode)| matches!(mode, DeleteMode::Selecting(_)))
            .map(|(id, _)| id.as_str())
            .collect()
    }
}
