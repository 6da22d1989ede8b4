use serde::{Deserialize, Serialize};

use super::tab::{TabGroupColor, TabRef};

/// Reserved group of the bookmark feature.
pub const BOOKMARK_RESERVED_ID: &str = "group-1";
/// Display name of the reserved bookmark group.
pub const BOOKMARK_RESERVED_NAME: &str = "Others";
/// Synthetic bucket holding tabs outside any browser tab group.
pub const TAB_RESERVED_ID: &str = "ungrouped";
/// Display name of the synthetic tab bucket.
pub const TAB_RESERVED_NAME: &str = "Ungrouped";

/// A named, orderable bucket of items.
///
/// The serialized field names follow the stored bookmark document layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub pinned: bool,
    #[serde(rename = "pinnedTime", default)]
    pub pinned_time: Option<i64>,
    /// Rank among unpinned groups. Meaningless while pinned.
    #[serde(default)]
    pub order: usize,
    #[serde(rename = "toggle", default = "default_expanded")]
    pub expanded: bool,
    #[serde(rename = "websites", default)]
    pub items: Vec<Item>,
    /// Only set for groups projected from live browser tab groups.
    #[serde(skip)]
    pub color: Option<TabGroupColor>,
}

fn default_expanded() -> bool {
    true
}

impl Group {
    pub fn new(id: impl Into<String>, name: impl Into<String>, order: usize) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            pinned: false,
            pinned_time: None,
            order,
            expanded: true,
            items: Vec::new(),
            color: None,
        }
    }

    pub fn find_item(&self, key: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.key() == key)
    }
}

/// A single shortcut: a saved link, or an open tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub url: String,
    #[serde(rename = "shortName", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(rename = "addedTime", default, skip_serializing_if = "Option::is_none")]
    pub added_time: Option<i64>,
    #[serde(skip)]
    pub tab: Option<TabRef>,
}

/// Labels longer than this are cut and suffixed with `...`.
pub const LABEL_MAX_CHARS: usize = 60;

impl Item {
    pub fn bookmark(url: impl Into<String>, display_name: Option<String>, added_time: i64) -> Self {
        Self {
            url: url.into(),
            display_name,
            added_time: Some(added_time),
            tab: None,
        }
    }

    /// Stable key: the tab id for live tabs, the URL for bookmarks.
    pub fn key(&self) -> String {
        match &self.tab {
            Some(tab) => tab.tab_id.to_string(),
            None => self.url.clone(),
        }
    }

    /// Display label, falling back to a truncated URL.
    pub fn label(&self) -> String {
        match self.display_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => truncate_label(&self.url),
        }
    }
}

fn truncate_label(url: &str) -> String {
    if url.chars().count() > LABEL_MAX_CHARS {
        let cut: String = url.chars().take(LABEL_MAX_CHARS).collect();
        format!("{}...", cut)
    } else {
        url.to_string()
    }
}
