use serde::{Deserialize, Serialize};

use super::interaction::{GroupBindings, ItemBindings};
use super::settings::ViewMode;
use super::tab::TabGroupColor;

/// Full projection of one feature's group list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedView {
    pub mode: ViewMode,
    pub groups: Vec<RenderedGroup>,
}

impl RenderedView {
    pub fn group(&self, id: &str) -> Option<&RenderedGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn items(&self) -> impl Iterator<Item = &RenderedItem> {
        self.groups.iter().flat_map(|g| g.items.iter())
    }

    pub fn items_mut(&mut self) -> impl Iterator<Item = &mut RenderedItem> {
        self.groups.iter_mut().flat_map(|g| g.items.iter_mut())
    }

    pub fn highlighted_keys(&self) -> Vec<String> {
        self.items()
            .filter(|i| i.highlighted)
            .map(|i| i.key.clone())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedGroup {
    pub id: String,
    /// Header text: `name (count)`.
    pub title: String,
    pub item_count: usize,
    pub pinned: bool,
    pub expanded: bool,
    pub color: Option<TabGroupColor>,
    pub delete_mode: bool,
    pub bindings: GroupBindings,
    pub items: Vec<RenderedItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedItem {
    pub key: String,
    pub group_id: String,
    pub url: String,
    pub label: String,
    pub icon: Option<String>,
    pub selected: bool,
    pub highlighted: bool,
    pub bindings: ItemBindings,
}
