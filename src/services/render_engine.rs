//! Render Engine: projects a group collection into a [`RenderedView`].
//!
//! Rendering is a pure function of the model, the view mode, and the
//! delete-mode state. Every call produces the whole view with fresh
//! interaction bindings; nothing is diffed against the previous output and the
//! engine never triggers itself.

use crate::managers::drag::DragPolicy;
use crate::managers::group_model::GroupModel;
use crate::managers::selection::SelectionController;
use crate::types::group::{Group, Item};
use crate::types::interaction::{
    ClickAction, ContextMenuTarget, DragPayload, GroupBindings, ItemBindings,
};
use crate::types::settings::{FeatureKind, ViewMode};
use crate::types::view::{RenderedGroup, RenderedItem, RenderedView};

/// Everything besides the model that shapes a render pass.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub feature: FeatureKind,
    pub mode: ViewMode,
    pub selection: &'a SelectionController,
    pub drag_policy: DragPolicy,
}

/// Renders pinned groups (newest pin first) followed by unpinned groups in
/// `order`.
pub fn render(model: &GroupModel, ctx: &RenderContext<'_>) -> RenderedView {
    let groups = model
        .ordered()
        .into_iter()
        .map(|group| render_group(group, model.is_reserved(&group.id), ctx))
        .collect();
    RenderedView {
        mode: ctx.mode,
        groups,
    }
}

fn render_group(group: &Group, reserved: bool, ctx: &RenderContext<'_>) -> RenderedGroup {
    let bookmarks = ctx.feature == FeatureKind::Bookmarks;
    let bindings = GroupBindings {
        drag: ctx.drag_policy.group_reorder.then(|| DragPayload::Group {
            group_id: group.id.clone(),
        }),
        context_menu: bookmarks.then(|| ContextMenuTarget::Group {
            group_id: group.id.clone(),
        }),
        can_rename: !reserved,
        can_delete: !reserved,
        can_pin: bookmarks,
    };

    let items = group
        .items
        .iter()
        .map(|item| render_item(group, item, ctx))
        .collect::<Vec<_>>();

    RenderedGroup {
        id: group.id.clone(),
        title: format!("{} ({})", group.name, group.items.len()),
        item_count: group.items.len(),
        pinned: group.pinned,
        expanded: group.expanded,
        color: group.color,
        delete_mode: ctx.selection.is_selecting(&group.id),
        bindings,
        items,
    }
}

fn render_item(group: &Group, item: &Item, ctx: &RenderContext<'_>) -> RenderedItem {
    let key = item.key();
    let context_menu = (ctx.feature == FeatureKind::Bookmarks).then(|| ContextMenuTarget::Item {
        group_id: group.id.clone(),
        item_key: key.clone(),
    });
    RenderedItem {
        selected: ctx.selection.is_selected(&group.id, &key),
        bindings: ItemBindings {
            click: ctx.selection.click_action(&group.id),
            context_menu,
            drag: DragPayload::Item {
                item_key: key.clone(),
                source_group_id: group.id.clone(),
            },
        },
        key,
        group_id: group.id.clone(),
        url: item.url.clone(),
        label: item.label(),
        icon: item.tab.as_ref().and_then(|t| t.favicon.clone()),
        highlighted: false,
    }
}

/// Typed callbacks a view registers for rendered items.
pub trait ItemHandlers {
    fn on_activate(&mut self, item: &RenderedItem);
    fn on_toggle_select(&mut self, item: &RenderedItem);
    fn on_context_menu(&mut self, target: &ContextMenuTarget);
}

/// Routes a click to the handler named by the item's bindings.
pub fn dispatch_click(item: &RenderedItem, handlers: &mut impl ItemHandlers) {
    match item.bindings.click {
        ClickAction::Activate => handlers.on_activate(item),
        ClickAction::ToggleSelect => handlers.on_toggle_select(item),
    }
}

/// Routes a right-click. Returns false when the item has no action menu.
pub fn dispatch_context_menu(item: &RenderedItem, handlers: &mut impl ItemHandlers) -> bool {
    match &item.bindings.context_menu {
        Some(target) => {
            handlers.on_context_menu(target);
            true
        }
        None => false,
    }
}
