use serde::{Deserialize, Serialize};

/// Stateless payload carried by an in-flight drag gesture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragPayload {
    Group { group_id: String },
    Item { item_key: String, source_group_id: String },
}

/// Where a dragged group lands relative to the drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropPosition {
    Before,
    After,
}

impl DropPosition {
    /// Position implied by dragging from `from` to `to` in a list:
    /// moving down lands after the target, moving up lands before it.
    pub fn between(from: usize, to: usize) -> Self {
        if from < to {
            DropPosition::After
        } else {
            DropPosition::Before
        }
    }
}

/// Where the URLs of a context-menu action are opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpenTarget {
    CurrentWindow,
    NewWindow,
    Incognito,
}

/// What a click on a rendered item does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClickAction {
    Activate,
    ToggleSelect,
}

/// Subject of a right-click action menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContextMenuTarget {
    Group { group_id: String },
    Item { group_id: String, item_key: String },
}

impl ContextMenuTarget {
    pub fn options(&self) -> &'static [OpenTarget] {
        &[OpenTarget::CurrentWindow, OpenTarget::NewWindow, OpenTarget::Incognito]
    }
}

/// Interaction bindings attached to every rendered item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemBindings {
    pub click: ClickAction,
    pub context_menu: Option<ContextMenuTarget>,
    pub drag: DragPayload,
}

/// Interaction bindings attached to every rendered group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupBindings {
    /// Set when the group can be dragged onto another group.
    pub drag: Option<DragPayload>,
    pub context_menu: Option<ContextMenuTarget>,
    pub can_rename: bool,
    pub can_delete: bool,
    pub can_pin: bool,
}
