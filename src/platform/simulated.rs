//! In-memory browser used by the demo binary and the test suite.
//!
//! Mirrors the observable behaviour of the real tab/window/tab-group surface:
//! a tab group exists only while at least one tab belongs to it, and closing
//! the last tab of a window closes the window.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use super::browser::{BrowserControl, BrowserResult};
use crate::types::errors::BrowserError;
use crate::types::tab::{BrowserTab, TabGroupColor, TabGroupInfo, NO_GROUP};

#[derive(Debug, Default)]
struct BrowserState {
    tabs: Vec<BrowserTab>,
    groups: BTreeMap<i64, TabGroupInfo>,
    windows: Vec<SimWindow>,
    focused_window: Option<i64>,
    next_tab_id: i64,
    next_group_id: i64,
    next_window_id: i64,
    /// Commands that fail on their next invocation, by command name.
    failing: HashSet<&'static str>,
    log: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimWindow {
    pub id: i64,
    pub incognito: bool,
}

pub struct SimulatedBrowser {
    state: Mutex<BrowserState>,
}

impl Default for SimulatedBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedBrowser {
    /// A browser with one focused, empty, non-private window.
    pub fn new() -> Self {
        let state = BrowserState {
            windows: vec![SimWindow {
                id: 1,
                incognito: false,
            }],
            focused_window: Some(1),
            next_tab_id: 1,
            next_group_id: 1,
            next_window_id: 2,
            ..BrowserState::default()
        };
        Self {
            state: Mutex::new(state),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BrowserState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Opens a tab directly, bypassing the command log.
    pub fn open_tab(&self, url: &str, title: &str) -> i64 {
        let mut state = self.lock();
        let window_id = state.focused_window.unwrap_or(1);
        let id = state.push_tab(window_id, url, false);
        if let Some(tab) = state.tabs.iter_mut().find(|t| t.id == id) {
            tab.title = Some(title.to_string());
        }
        id
    }

    /// Creates a tab group around existing tabs, bypassing the command log.
    pub fn add_group(&self, title: &str, color: TabGroupColor, tab_ids: &[i64]) -> i64 {
        let mut state = self.lock();
        let group_id = state.next_group_id;
        state.next_group_id += 1;
        state.groups.insert(
            group_id,
            TabGroupInfo {
                id: group_id,
                title: Some(title.to_string()),
                color,
            },
        );
        for tab in state.tabs.iter_mut().filter(|t| tab_ids.contains(&t.id)) {
            tab.group_id = group_id;
        }
        group_id
    }

    /// Marks the given tab as the active one of the focused window.
    pub fn set_active(&self, tab_id: i64) {
        let mut state = self.lock();
        for tab in state.tabs.iter_mut() {
            tab.active = tab.id == tab_id;
        }
    }

    /// Makes the next call of `command` fail with `CommandFailed`.
    pub fn fail_next(&self, command: &'static str) {
        self.lock().failing.insert(command);
    }

    /// Drops a group's metadata while its tabs keep the id, as happens when the
    /// browser removes a group between the tab query and the group lookup.
    pub fn forget_group_metadata(&self, group_id: i64) {
        self.lock().groups.remove(&group_id);
    }

    pub fn tabs(&self) -> Vec<BrowserTab> {
        self.lock().tabs.clone()
    }

    pub fn windows(&self) -> Vec<SimWindow> {
        self.lock().windows.clone()
    }

    pub fn group_info(&self, group_id: i64) -> Option<TabGroupInfo> {
        self.lock().groups.get(&group_id).cloned()
    }

    pub fn focused_window(&self) -> Option<i64> {
        self.lock().focused_window
    }

    /// Names of the commands issued so far, in order.
    pub fn command_log(&self) -> Vec<String> {
        self.lock().log.clone()
    }
}

impl BrowserState {
    fn begin(&mut self, command: &'static str) -> BrowserResult<()> {
        self.log.push(command.to_string());
        if self.failing.remove(command) {
            return Err(BrowserError::CommandFailed(format!("{} rejected", command)));
        }
        Ok(())
    }

    fn push_tab(&mut self, window_id: i64, url: &str, active: bool) -> i64 {
        let id = self.next_tab_id;
        self.next_tab_id += 1;
        if active {
            for tab in self.tabs.iter_mut().filter(|t| t.window_id == window_id) {
                tab.active = false;
            }
        }
        self.tabs.push(BrowserTab {
            id,
            window_id,
            group_id: NO_GROUP,
            url: url.to_string(),
            title: None,
            favicon: None,
            active,
        });
        id
    }

    fn tab(&self, tab_id: i64) -> BrowserResult<&BrowserTab> {
        self.tabs
            .iter()
            .find(|t| t.id == tab_id)
            .ok_or(BrowserError::TabNotFound(tab_id))
    }

    /// Removes group metadata for groups left without tabs and windows left
    /// without tabs.
    fn collect_garbage(&mut self) {
        let live_groups: HashSet<i64> = self.tabs.iter().map(|t| t.group_id).collect();
        self.groups.retain(|id, _| live_groups.contains(id));
        let live_windows: HashSet<i64> = self.tabs.iter().map(|t| t.window_id).collect();
        self.windows.retain(|w| live_windows.contains(&w.id));
        if let Some(focused) = self.focused_window {
            if !live_windows.contains(&focused) {
                self.focused_window = self.windows.first().map(|w| w.id);
            }
        }
    }
}

impl BrowserControl for SimulatedBrowser {
    async fn query_tabs(&self) -> BrowserResult<Vec<BrowserTab>> {
        let mut state = self.lock();
        state.begin("query_tabs")?;
        Ok(state.tabs.clone())
    }

    async fn query_active_tab(&self) -> BrowserResult<Option<BrowserTab>> {
        let mut state = self.lock();
        state.begin("query_active_tab")?;
        let focused = state.focused_window;
        Ok(state
            .tabs
            .iter()
            .find(|t| t.active && Some(t.window_id) == focused)
            .cloned())
    }

    async fn get_tab_group(&self, group_id: i64) -> BrowserResult<TabGroupInfo> {
        let mut state = self.lock();
        state.begin("get_tab_group")?;
        state
            .groups
            .get(&group_id)
            .cloned()
            .ok_or(BrowserError::GroupNotFound(group_id))
    }

    async fn update_tab_group(
        &self,
        group_id: i64,
        title: Option<String>,
        color: Option<TabGroupColor>,
    ) -> BrowserResult<TabGroupInfo> {
        let mut state = self.lock();
        state.begin("update_tab_group")?;
        let group = state
            .groups
            .get_mut(&group_id)
            .ok_or(BrowserError::GroupNotFound(group_id))?;
        if let Some(title) = title {
            group.title = Some(title);
        }
        if let Some(color) = color {
            group.color = color;
        }
        Ok(group.clone())
    }

    async fn create_tab(&self, url: &str, active: bool) -> BrowserResult<BrowserTab> {
        let mut state = self.lock();
        state.begin("create_tab")?;
        let window_id = match state.focused_window {
            Some(id) => id,
            None => {
                let id = state.next_window_id;
                state.next_window_id += 1;
                state.windows.push(SimWindow {
                    id,
                    incognito: false,
                });
                state.focused_window = Some(id);
                id
            }
        };
        let id = state.push_tab(window_id, url, active);
        Ok(state.tab(id)?.clone())
    }

    async fn activate_tab(&self, tab_id: i64) -> BrowserResult<()> {
        let mut state = self.lock();
        state.begin("activate_tab")?;
        let window_id = state.tab(tab_id)?.window_id;
        for tab in state.tabs.iter_mut().filter(|t| t.window_id == window_id) {
            tab.active = tab.id == tab_id;
        }
        Ok(())
    }

    async fn focus_window(&self, window_id: i64) -> BrowserResult<()> {
        let mut state = self.lock();
        state.begin("focus_window")?;
        if !state.windows.iter().any(|w| w.id == window_id) {
            return Err(BrowserError::WindowNotFound(window_id));
        }
        state.focused_window = Some(window_id);
        Ok(())
    }

    async fn remove_tabs(&self, tab_ids: &[i64]) -> BrowserResult<()> {
        let mut state = self.lock();
        state.begin("remove_tabs")?;
        for id in tab_ids {
            state.tab(*id)?;
        }
        state.tabs.retain(|t| !tab_ids.contains(&t.id));
        state.collect_garbage();
        Ok(())
    }

    async fn group_tabs(&self, tab_ids: &[i64], group_id: Option<i64>) -> BrowserResult<i64> {
        let mut state = self.lock();
        state.begin("group_tabs")?;
        for id in tab_ids {
            state.tab(*id)?;
        }
        let target = match group_id {
            Some(id) if state.groups.contains_key(&id) => id,
            Some(id) => return Err(BrowserError::GroupNotFound(id)),
            None => {
                let id = state.next_group_id;
                state.next_group_id += 1;
                state.groups.insert(
                    id,
                    TabGroupInfo {
                        id,
                        title: None,
                        color: TabGroupColor::default(),
                    },
                );
                id
            }
        };
        for tab in state.tabs.iter_mut().filter(|t| tab_ids.contains(&t.id)) {
            tab.group_id = target;
        }
        state.collect_garbage();
        Ok(target)
    }

    async fn ungroup_tabs(&self, tab_ids: &[i64]) -> BrowserResult<()> {
        let mut state = self.lock();
        state.begin("ungroup_tabs")?;
        for id in tab_ids {
            state.tab(*id)?;
        }
        for tab in state.tabs.iter_mut().filter(|t| tab_ids.contains(&t.id)) {
            tab.group_id = NO_GROUP;
        }
        state.collect_garbage();
        Ok(())
    }

    async fn create_window(&self, urls: &[String], incognito: bool) -> BrowserResult<i64> {
        let mut state = self.lock();
        state.begin("create_window")?;
        let window_id = state.next_window_id;
        state.next_window_id += 1;
        state.windows.push(SimWindow {
            id: window_id,
            incognito,
        });
        for (i, url) in urls.iter().enumerate() {
            state.push_tab(window_id, url, i == 0);
        }
        state.focused_window = Some(window_id);
        Ok(window_id)
    }
}
