//! Tab-group feature controller.
//!
//! The browser is the source of truth: the group collection held here is a
//! throwaway projection rebuilt from a live tab query after every command.
//! Failed browser commands are logged and followed by a fresh projection, so
//! the view heals itself on the next pass.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::config::DEFAULT_TAB_SETTLE;
use crate::managers::drag::{DragController, DragPolicy, DropOutcome};
use crate::managers::group_model::{GroupModel, GroupModelTrait};
use crate::managers::selection::{DeletePress, SelectionController};
use crate::platform::browser::{BrowserControl, BrowserResult};
use crate::platform::prompt::UserPrompt;
use crate::services::render_engine::{render, RenderContext};
use crate::services::search_filter::highlight;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::store::StoreAdapter;
use crate::types::errors::{FeatureError, Mutation, SkipReason};
use crate::types::group::{Group, Item, TAB_RESERVED_ID, TAB_RESERVED_NAME};
use crate::types::interaction::DragPayload;
use crate::types::settings::{FeatureKind, ViewMode};
use crate::types::tab::{BrowserTab, TabGroupColor, TabRef, NEW_TAB_URL};
use crate::types::view::RenderedView;

/// Title shown for tab groups without one.
pub const DEFAULT_GROUP_TITLE: &str = "Group";

pub struct TabManager<S: StoreAdapter, B: BrowserControl> {
    browser: Arc<B>,
    settings: SettingsEngine<S>,
    model: GroupModel,
    selection: SelectionController,
    drag: DragController,
    view_mode: ViewMode,
    keyword: String,
    settle_delay: Duration,
    // Browser groups have no expand flag of their own; kept across refreshes.
    collapsed: HashSet<String>,
}

/// Logs a failed browser command and turns it into `None`.
fn settle<T>(op: &str, result: BrowserResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(op, error = %e, "browser command failed");
            None
        }
    }
}

fn applied_if(ok: bool) -> Mutation {
    if ok {
        Mutation::Applied
    } else {
        Mutation::Skipped(SkipReason::Unchanged)
    }
}

impl<S: StoreAdapter, B: BrowserControl> TabManager<S, B> {
    pub fn new(store: Arc<S>, browser: Arc<B>) -> Self {
        Self {
            browser,
            settings: SettingsEngine::new(store),
            model: GroupModel::new(TAB_RESERVED_ID, TAB_RESERVED_NAME),
            selection: SelectionController::new(),
            drag: DragController::new(DragPolicy::TABS),
            view_mode: ViewMode::default(),
            keyword: String::new(),
            settle_delay: DEFAULT_TAB_SETTLE,
            collapsed: HashSet::new(),
        }
    }

    /// Overrides the wait inserted after tab mutations.
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub async fn initialize(&mut self) -> RenderedView {
        self.view_mode = self.settings.load().view_mode(FeatureKind::Tabs);
        self.refresh().await
    }

    pub fn model(&self) -> &GroupModel {
        &self.model
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn render(&self) -> RenderedView {
        let ctx = RenderContext {
            feature: FeatureKind::Tabs,
            mode: self.view_mode,
            selection: &self.selection,
            drag_policy: self.drag.policy(),
        };
        let mut view = render(&self.model, &ctx);
        highlight(&self.keyword, &mut view);
        view
    }

    pub fn apply_search(&mut self, keyword: &str) -> RenderedView {
        self.keyword = keyword.trim().to_string();
        self.render()
    }

    /// Rebuilds the projection from the live browser state and renders it.
    pub async fn refresh(&mut self) -> RenderedView {
        let tabs = settle("query_tabs", self.browser.query_tabs().await).unwrap_or_default();

        let mut buckets: Vec<(i64, Vec<&BrowserTab>)> = Vec::new();
        let mut ungrouped: Vec<&BrowserTab> = Vec::new();
        for tab in &tabs {
            if !tab.is_grouped() {
                ungrouped.push(tab);
                continue;
            }
            match buckets.iter_mut().find(|(gid, _)| *gid == tab.group_id) {
                Some((_, members)) => members.push(tab),
                None => buckets.push((tab.group_id, vec![tab])),
            }
        }

        let mut groups = Vec::with_capacity(buckets.len() + 1);
        for (order, (gid, members)) in buckets.into_iter().enumerate() {
            let (title, color) = match self.browser.get_tab_group(gid).await {
                Ok(info) => (info.title, info.color),
                Err(e) => {
                    warn!(group_id = gid, error = %e, "tab group metadata unavailable");
                    (None, TabGroupColor::Grey)
                }
            };
            let title = title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_GROUP_TITLE.to_string());
            let mut group = Group::new(gid.to_string(), title, order);
            group.color = Some(color);
            group.expanded = !self.collapsed.contains(&group.id);
            group.items = members.into_iter().map(tab_item).collect();
            groups.push(group);
        }

        let mut reserved = Group::new(TAB_RESERVED_ID, TAB_RESERVED_NAME, groups.len());
        reserved.expanded = !self.collapsed.contains(TAB_RESERVED_ID);
        reserved.items = ungrouped.into_iter().map(tab_item).collect();
        groups.push(reserved);

        self.model = GroupModel::from_groups(groups, TAB_RESERVED_ID, TAB_RESERVED_NAME);
        let live: Vec<&str> = self.model.groups().iter().map(|g| g.id.as_str()).collect();
        self.collapsed.retain(|id| live.contains(&id.as_str()));
        self.selection.retain_groups(live);
        for group in self.model.groups() {
            let keys: Vec<String> = group.items.iter().map(Item::key).collect();
            self.selection
                .retain_keys(&group.id, keys.iter().map(String::as_str));
        }
        self.render()
    }

    async fn pause(&self) {
        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }
    }

    /// Browser group id behind a projected group id. `None` for the reserved
    /// bucket and for ids that are not browser group ids.
    fn browser_group_id(&self, id: &str) -> Option<i64> {
        if self.model.is_reserved(id) {
            return None;
        }
        id.parse().ok()
    }

    // ─── Groups ───

    /// Creates a tab group around a fresh placeholder tab.
    pub async fn create_group(&mut self, name: &str, color: Option<TabGroupColor>) -> Mutation {
        let title = match name.trim() {
            "" => DEFAULT_GROUP_TITLE.to_string(),
            trimmed => trimmed.to_string(),
        };

        let mut ok = false;
        if let Some(tab) = settle("create_tab", self.browser.create_tab(NEW_TAB_URL, false).await) {
            if let Some(gid) = settle("group_tabs", self.browser.group_tabs(&[tab.id], None).await) {
                ok = settle(
                    "update_tab_group",
                    self.browser
                        .update_tab_group(gid, Some(title), Some(color.unwrap_or_default()))
                        .await,
                )
                .is_some();
            }
        }
        self.refresh().await;
        applied_if(ok)
    }

    /// Updates title and/or colour. A blank name leaves the title unchanged.
    pub async fn edit_group(
        &mut self,
        id: &str,
        name: Option<&str>,
        color: Option<TabGroupColor>,
    ) -> Mutation {
        if self.model.is_reserved(id) {
            return Mutation::Skipped(SkipReason::Reserved);
        }
        let Some(gid) = self.browser_group_id(id) else {
            return Mutation::Skipped(SkipReason::NotFound);
        };
        let title = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        let ok = settle(
            "update_tab_group",
            self.browser.update_tab_group(gid, title, color).await,
        )
        .is_some();
        self.refresh().await;
        applied_if(ok)
    }

    /// Shows or hides a group's tabs in the popup.
    pub fn toggle_expand(&mut self, id: &str) -> Mutation {
        let outcome = self.model.toggle_expand(id);
        if outcome.is_applied() && !self.collapsed.remove(id) {
            self.collapsed.insert(id.to_string());
        }
        outcome
    }

    pub async fn rename_group(&mut self, id: &str, new_name: &str) -> Mutation {
        if new_name.trim().is_empty() {
            return Mutation::Skipped(SkipReason::EmptyName);
        }
        self.edit_group(id, Some(new_name), None).await
    }

    /// Dissolves a tab group after confirmation. Its tabs stay open and move
    /// to the ungrouped bucket.
    pub async fn delete_group(&mut self, id: &str, prompt: &impl UserPrompt) -> Mutation {
        if self.model.is_reserved(id) {
            return Mutation::Skipped(SkipReason::Reserved);
        }
        let (Some(gid), Some(group)) = (self.browser_group_id(id), self.model.group(id)) else {
            return Mutation::Skipped(SkipReason::NotFound);
        };
        if !prompt.confirm(&format!("Ungroup \"{}\"?", group.name)) {
            return Mutation::Skipped(SkipReason::Unchanged);
        }

        let members: Vec<i64> = settle("query_tabs", self.browser.query_tabs().await)
            .unwrap_or_default()
            .into_iter()
            .filter(|t| t.group_id == gid)
            .map(|t| t.id)
            .collect();
        let ok = members.is_empty()
            || settle("ungroup_tabs", self.browser.ungroup_tabs(&members).await).is_some();
        self.selection.reset(id);
        self.refresh().await;
        applied_if(ok)
    }

    /// Ungroups every grouped tab after confirmation.
    pub async fn ungroup_all(&mut self, prompt: &impl UserPrompt) -> Mutation {
        if !prompt.confirm("Ungroup all tabs?") {
            return Mutation::Skipped(SkipReason::Unchanged);
        }
        let grouped: Vec<i64> = settle("query_tabs", self.browser.query_tabs().await)
            .unwrap_or_default()
            .into_iter()
            .filter(BrowserTab::is_grouped)
            .map(|t| t.id)
            .collect();
        if grouped.is_empty() {
            return Mutation::Skipped(SkipReason::Unchanged);
        }
        let ok = settle("ungroup_tabs", self.browser.ungroup_tabs(&grouped).await).is_some();
        self.refresh().await;
        applied_if(ok)
    }

    // ─── Tabs ───

    /// Opens a background new-tab page in the given group.
    pub async fn add_tab(&mut self, group_id: &str) -> Mutation {
        if self.model.group(group_id).is_none() {
            return Mutation::Skipped(SkipReason::NotFound);
        }
        let target = self.browser_group_id(group_id);

        let mut ok = false;
        if let Some(tab) = settle("create_tab", self.browser.create_tab(NEW_TAB_URL, false).await) {
            ok = match target {
                None => true,
                Some(gid) => {
                    self.pause().await;
                    settle("group_tabs", self.browser.group_tabs(&[tab.id], Some(gid)).await)
                        .is_some()
                }
            };
        }
        self.refresh().await;
        applied_if(ok)
    }

    /// Brings a tab to the front and focuses its window.
    pub async fn activate_item(&mut self, key: &str) -> Mutation {
        let Some(tab) = self
            .model
            .groups()
            .iter()
            .flat_map(|g| g.items.iter())
            .find(|i| i.key() == key)
            .and_then(|i| i.tab.clone())
        else {
            return Mutation::Skipped(SkipReason::NotFound);
        };

        let activated = settle("activate_tab", self.browser.activate_tab(tab.tab_id).await).is_some();
        let focused = settle("focus_window", self.browser.focus_window(tab.window_id).await).is_some();
        applied_if(activated && focused)
    }

    // ─── Delete-mode ───

    /// Presses a group's delete button. A commit closes the selected tabs,
    /// waits for the browser to settle and re-projects.
    pub async fn press_delete(&mut self, group_id: &str) -> DeletePress {
        if self.model.group(group_id).is_none() {
            self.selection.reset(group_id);
            return DeletePress::Cancelled;
        }
        let press = match self.selection.press_delete(group_id) {
            DeletePress::Commit(keys) => DeletePress::Commit(self.members_of(group_id, keys)),
            other => other,
        };
        if let DeletePress::Commit(keys) = &press {
            if !keys.is_empty() {
                let tab_ids = parse_tab_ids(keys);
                settle("remove_tabs", self.browser.remove_tabs(&tab_ids).await);
                self.pause().await;
            }
            self.refresh().await;
        }
        press
    }

    /// The subset of `keys` that are still tabs of `group_id`. A selected tab
    /// that was dragged elsewhere is no longer this group's to close.
    fn members_of(&self, group_id: &str, keys: HashSet<String>) -> HashSet<String> {
        let Some(group) = self.model.group(group_id) else {
            return HashSet::new();
        };
        keys.into_iter()
            .filter(|key| group.items.iter().any(|i| i.key() == *key))
            .collect()
    }

    pub fn toggle_select(&mut self, group_id: &str, key: &str) -> Option<bool> {
        self.selection.toggle_select(group_id, key)
    }

    // ─── Drag and drop ───

    pub fn begin_drag(&mut self, payload: DragPayload) -> bool {
        self.drag.begin(payload)
    }

    pub fn drag_enter(&mut self, group_id: &str) {
        self.drag.enter(group_id);
    }

    pub fn drag_leave(&mut self, group_id: &str) {
        self.drag.leave(group_id);
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    /// Ends a tab drag over another group by regrouping the tab in the
    /// browser. The resulting state is read back, not predicted.
    pub async fn drop_on(&mut self, target_group_id: &str) -> Mutation {
        let DropOutcome::MoveItem {
            to_group_id,
            item_key,
            ..
        } = self.drag.drop_on(target_group_id, &self.model)
        else {
            return Mutation::Skipped(SkipReason::Unchanged);
        };
        let Ok(tab_id) = item_key.parse::<i64>() else {
            return Mutation::Skipped(SkipReason::NotFound);
        };

        let ok = match self.browser_group_id(&to_group_id) {
            None => settle("ungroup_tabs", self.browser.ungroup_tabs(&[tab_id]).await).is_some(),
            Some(gid) => settle(
                "group_tabs",
                self.browser.group_tabs(&[tab_id], Some(gid)).await,
            )
            .is_some(),
        };
        self.refresh().await;
        applied_if(ok)
    }

    // ─── View ───

    pub fn toggle_view_mode(&mut self) -> Result<ViewMode, FeatureError> {
        let mode = self.view_mode.toggled();
        self.settings.set_view_mode(FeatureKind::Tabs, mode)?;
        self.view_mode = mode;
        Ok(mode)
    }
}

fn tab_item(tab: &BrowserTab) -> Item {
    Item {
        url: tab.url.clone(),
        display_name: tab.title.clone(),
        added_time: None,
        tab: Some(TabRef::from(tab)),
    }
}

fn parse_tab_ids(keys: &HashSet<String>) -> Vec<i64> {
    let mut ids: Vec<i64> = keys.iter().filter_map(|k| k.parse().ok()).collect();
    ids.sort_unstable();
    ids
}
