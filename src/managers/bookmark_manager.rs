//! Bookmark feature controller.
//!
//! Owns the bookmark group collection and its interaction state. Every
//! mutating operation updates the in-memory model first and then writes the
//! whole collection back to the store under [`BOOKMARK_STORE_KEY`]. Callers
//! re-render after each operation with [`BookmarkManager::render`].

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::managers::drag::{DragController, DragPolicy, DropOutcome};
use crate::managers::group_model::{system_clock, Clock, GroupModel, GroupModelTrait};
use crate::managers::selection::{DeletePress, SelectionController};
use crate::platform::browser::BrowserControl;
use crate::platform::prompt::UserPrompt;
use crate::services::render_engine::{render, RenderContext};
use crate::services::search_filter::highlight;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::services::url_tools::suggest_short_name;
use crate::store::StoreAdapter;
use crate::types::errors::{FeatureError, Mutation, SkipReason, StoreError};
use crate::types::group::{Group, Item, BOOKMARK_RESERVED_ID, BOOKMARK_RESERVED_NAME};
use crate::types::interaction::{DragPayload, OpenTarget};
use crate::types::settings::{FeatureKind, ViewMode};
use crate::types::view::RenderedView;

/// Storage key of the bookmark group collection.
pub const BOOKMARK_STORE_KEY: &str = "websiteGroups";
/// Link placed in the reserved group on first run.
pub const SEED_URL: &str = "https://www.google.com/";
pub const SEED_NAME: &str = "Google";

/// Prefilled add-item form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub group_id: String,
    pub url: String,
    pub display_name: String,
}

pub struct BookmarkManager<S: StoreAdapter> {
    store: Arc<S>,
    settings: SettingsEngine<S>,
    model: GroupModel,
    selection: SelectionController,
    drag: DragController,
    view_mode: ViewMode,
    keyword: String,
    clock: Clock,
}

impl<S: StoreAdapter> BookmarkManager<S> {
    /// Creates an uninitialized manager; call [`initialize`](Self::initialize)
    /// before use.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            settings: SettingsEngine::new(Arc::clone(&store)),
            store,
            model: GroupModel::new(BOOKMARK_RESERVED_ID, BOOKMARK_RESERVED_NAME),
            selection: SelectionController::new(),
            drag: DragController::new(DragPolicy::BOOKMARKS),
            view_mode: ViewMode::default(),
            keyword: String::new(),
            clock: system_clock(),
        }
    }

    /// Replaces the timestamp source. The loaded collection is kept, so this
    /// may be called before or after `initialize`.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.model.set_clock(Arc::clone(&clock));
        self.clock = clock;
        self
    }

    /// Loads the view mode and the stored collection, seeding the default
    /// group on first run. Read failures count as "nothing stored".
    pub fn initialize(&mut self) -> Result<RenderedView, FeatureError> {
        self.view_mode = self.settings.load().view_mode(FeatureKind::Bookmarks);

        let stored = match self.store.read(BOOKMARK_STORE_KEY) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "bookmark store read failed, treating as empty");
                None
            }
        };

        let loaded = stored.and_then(|value| match serde_json::from_value::<Vec<Group>>(value) {
            Ok(groups) => Some(groups),
            Err(e) => {
                warn!(error = %e, "stored bookmark groups are malformed, reseeding");
                None
            }
        });

        match loaded {
            Some(groups) => {
                info!(groups = groups.len(), "loaded bookmark groups");
                self.model = GroupModel::from_groups(groups, BOOKMARK_RESERVED_ID, BOOKMARK_RESERVED_NAME)
                    .with_clock(Arc::clone(&self.clock));
            }
            None => self.seed()?,
        }
        Ok(self.render())
    }

    fn seed(&mut self) -> Result<(), FeatureError> {
        info!("seeding default bookmark group");
        let mut model = GroupModel::new(BOOKMARK_RESERVED_ID, BOOKMARK_RESERVED_NAME)
            .with_clock(Arc::clone(&self.clock));
        model.add_item(BOOKMARK_RESERVED_ID, SEED_URL, Some(SEED_NAME))?;
        self.model = model;
        self.persist()?;
        Ok(())
    }

    fn persist(&self) -> Result<(), StoreError> {
        let value = serde_json::to_value(self.model.groups())?;
        self.store.write(BOOKMARK_STORE_KEY, &value)
    }

    fn persist_if_applied(&self, mutation: Mutation) -> Result<Mutation, FeatureError> {
        if mutation.is_applied() {
            self.persist()?;
        }
        Ok(mutation)
    }

    /// Drops selected keys that are no longer items of their group.
    fn prune_selection(&mut self) {
        for group in self.model.groups() {
            let keys: Vec<String> = group.items.iter().map(Item::key).collect();
            self.selection
                .retain_keys(&group.id, keys.iter().map(String::as_str));
        }
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

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Full view of the current state, with the last search keyword applied.
    pub fn render(&self) -> RenderedView {
        let ctx = RenderContext {
            feature: FeatureKind::Bookmarks,
            mode: self.view_mode,
            selection: &self.selection,
            drag_policy: self.drag.policy(),
        };
        let mut view = render(&self.model, &ctx);
        highlight(&self.keyword, &mut view);
        view
    }

    /// Records the keyword and returns the re-highlighted view.
    pub fn apply_search(&mut self, keyword: &str) -> RenderedView {
        self.keyword = keyword.trim().to_string();
        self.render()
    }

    // ─── Groups ───

    pub fn add_group(&mut self, name: &str) -> Result<String, FeatureError> {
        let id = self.model.add_group(name)?;
        self.persist()?;
        Ok(id)
    }

    pub fn rename_group(&mut self, id: &str, new_name: &str) -> Result<Mutation, FeatureError> {
        let mutation = self.model.rename_group(id, new_name);
        self.persist_if_applied(mutation)
    }

    pub fn toggle_expand(&mut self, id: &str) -> Result<Mutation, FeatureError> {
        let mutation = self.model.toggle_expand(id);
        self.persist_if_applied(mutation)
    }

    pub fn toggle_pin(&mut self, id: &str) -> Result<Mutation, FeatureError> {
        let mutation = self.model.toggle_pin(id);
        self.persist_if_applied(mutation)
    }

    /// Deletes a group after the user confirms.
    pub fn delete_group(&mut self, id: &str, prompt: &impl UserPrompt) -> Result<Mutation, FeatureError> {
        if self.model.is_reserved(id) {
            return Ok(Mutation::Skipped(SkipReason::Reserved));
        }
        let Some(group) = self.model.group(id) else {
            return Ok(Mutation::Skipped(SkipReason::NotFound));
        };
        if !prompt.confirm(&format!("Delete \"{}\"?", group.name)) {
            return Ok(Mutation::Skipped(SkipReason::Unchanged));
        }
        let mutation = self.model.delete_group(id);
        if mutation.is_applied() {
            self.selection.reset(id);
        }
        self.persist_if_applied(mutation)
    }

    /// Drops the stored collection after confirmation and bootstraps again
    /// exactly like a first run.
    pub fn delete_all_groups(&mut self, prompt: &impl UserPrompt) -> Result<Mutation, FeatureError> {
        if !prompt.confirm("Delete all groups?") {
            return Ok(Mutation::Skipped(SkipReason::Unchanged));
        }
        self.store.remove(BOOKMARK_STORE_KEY)?;
        self.selection = SelectionController::new();
        self.drag.cancel();
        self.seed()?;
        Ok(Mutation::Applied)
    }

    // ─── Items ───

    pub fn add_item(
        &mut self,
        group_id: &str,
        url: &str,
        display_name: Option<&str>,
    ) -> Result<Mutation, FeatureError> {
        let mutation = self.model.add_item(group_id, url, display_name)?;
        self.persist_if_applied(mutation)
    }

    /// Short name offered for a URL typed into the add-item form.
    pub fn suggest_short_name(url: &str) -> String {
        suggest_short_name(url)
    }

    /// Draft for bookmarking the active tab into the reserved group.
    pub async fn bookmark_current_page<B: BrowserControl>(
        &self,
        browser: &B,
    ) -> Result<Option<ItemDraft>, FeatureError> {
        let Some(tab) = browser.query_active_tab().await? else {
            return Ok(None);
        };
        Ok(Some(ItemDraft {
            group_id: self.model.reserved_id().to_string(),
            url: tab.url,
            display_name: tab.title.unwrap_or_default(),
        }))
    }

    // ─── Delete-mode ───

    /// Presses a group's delete button. A commit removes the selected items
    /// and, if that empties a non-reserved group, the group too.
    pub fn press_delete(&mut self, group_id: &str) -> Result<DeletePress, FeatureError> {
        if self.model.group(group_id).is_none() {
            self.selection.reset(group_id);
            return Ok(DeletePress::Cancelled);
        }
        let press = self.selection.press_delete(group_id);
        if let DeletePress::Commit(keys) = &press {
            let mutation = self.model.remove_items(group_id, keys);
            debug!(group_id, removed = keys.len(), ?mutation, "committed delete-mode");
            self.persist_if_applied(mutation)?;
        }
        Ok(press)
    }

    pub fn toggle_select(&mut self, group_id: &str, key: &str) -> Option<bool> {
        self.selection.toggle_select(group_id, key)
    }

    /// Removes items directly, outside delete-mode.
    pub fn remove_items(&mut self, group_id: &str, keys: &HashSet<String>) -> Result<Mutation, FeatureError> {
        let mutation = self.model.remove_items(group_id, keys);
        self.persist_if_applied(mutation)
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

    /// Ends the drag over `target_group_id` and applies the implied move.
    pub fn drop_on(&mut self, target_group_id: &str) -> Result<Mutation, FeatureError> {
        let mutation = match self.drag.drop_on(target_group_id, &self.model) {
            DropOutcome::ReorderGroups {
                moved_id,
                target_id,
                position,
            } => self.model.reorder_groups(&moved_id, &target_id, position),
            DropOutcome::MoveItem {
                from_group_id,
                to_group_id,
                item_key,
            } => {
                let mutation = self.model.move_item(&from_group_id, &to_group_id, &item_key);
                if mutation.is_applied() {
                    self.prune_selection();
                }
                mutation
            }
            DropOutcome::Ignored(reason) => {
                debug!(?reason, "drop ignored");
                Mutation::Skipped(SkipReason::Unchanged)
            }
        };
        self.persist_if_applied(mutation)
    }

    // ─── View ───

    pub fn toggle_view_mode(&mut self) -> Result<ViewMode, FeatureError> {
        let mode = self.view_mode.toggled();
        self.settings.set_view_mode(FeatureKind::Bookmarks, mode)?;
        self.view_mode = mode;
        Ok(mode)
    }

    // ─── Context-menu actions ───

    /// Opens a saved link in the foreground, as a plain click does.
    pub async fn activate_item<B: BrowserControl>(&self, url: &str, browser: &B) -> Result<(), FeatureError> {
        browser.create_tab(url, true).await?;
        Ok(())
    }

    /// Opens every link of a group. Current-window opens background tabs;
    /// the other targets open one new window.
    pub async fn open_group<B: BrowserControl>(
        &self,
        group_id: &str,
        target: OpenTarget,
        browser: &B,
    ) -> Result<Mutation, FeatureError> {
        let Some(group) = self.model.group(group_id) else {
            return Ok(Mutation::Skipped(SkipReason::NotFound));
        };
        let urls: Vec<String> = group.items.iter().map(|i| i.url.clone()).collect();
        if urls.is_empty() {
            return Ok(Mutation::Skipped(SkipReason::Unchanged));
        }

        match target {
            OpenTarget::CurrentWindow => {
                for url in &urls {
                    browser.create_tab(url, false).await?;
                }
            }
            OpenTarget::NewWindow => {
                browser.create_window(&urls, false).await?;
            }
            OpenTarget::Incognito => {
                browser.create_window(&urls, true).await?;
            }
        }
        Ok(Mutation::Applied)
    }

    pub async fn open_item<B: BrowserControl>(
        &self,
        url: &str,
        target: OpenTarget,
        browser: &B,
    ) -> Result<(), FeatureError> {
        match target {
            OpenTarget::CurrentWindow => {
                browser.create_tab(url, true).await?;
            }
            OpenTarget::NewWindow => {
                browser.create_window(&[url.to_string()], false).await?;
            }
            OpenTarget::Incognito => {
                browser.create_window(&[url.to_string()], true).await?;
            }
        }
        Ok(())
    }
}
