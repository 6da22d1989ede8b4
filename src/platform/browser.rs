//! Live Tab/Group Control Surface.
//!
//! Every call suspends until the browser acknowledges it; effects are only
//! observable once the returned future resolves.

use std::future::Future;

use crate::types::errors::BrowserError;
use crate::types::tab::{BrowserTab, TabGroupColor, TabGroupInfo};

pub type BrowserResult<T> = Result<T, BrowserError>;

/// Commands the popup may issue against the host browser.
pub trait BrowserControl: Send + Sync {
    /// All open tabs across all windows, in browser order.
    fn query_tabs(&self) -> impl Future<Output = BrowserResult<Vec<BrowserTab>>> + Send;

    /// The active tab of the focused window, if any.
    fn query_active_tab(&self) -> impl Future<Output = BrowserResult<Option<BrowserTab>>> + Send;

    fn get_tab_group(&self, group_id: i64) -> impl Future<Output = BrowserResult<TabGroupInfo>> + Send;

    /// Sets title and/or colour; `None` leaves the field untouched.
    fn update_tab_group(
        &self,
        group_id: i64,
        title: Option<String>,
        color: Option<TabGroupColor>,
    ) -> impl Future<Output = BrowserResult<TabGroupInfo>> + Send;

    /// Opens a tab in the focused window.
    fn create_tab(&self, url: &str, active: bool) -> impl Future<Output = BrowserResult<BrowserTab>> + Send;

    fn activate_tab(&self, tab_id: i64) -> impl Future<Output = BrowserResult<()>> + Send;

    fn focus_window(&self, window_id: i64) -> impl Future<Output = BrowserResult<()>> + Send;

    fn remove_tabs(&self, tab_ids: &[i64]) -> impl Future<Output = BrowserResult<()>> + Send;

    /// Groups the tabs under `group_id`, or under a fresh group when `None`.
    /// Returns the group id used.
    fn group_tabs(
        &self,
        tab_ids: &[i64],
        group_id: Option<i64>,
    ) -> impl Future<Output = BrowserResult<i64>> + Send;

    fn ungroup_tabs(&self, tab_ids: &[i64]) -> impl Future<Output = BrowserResult<()>> + Send;

    /// Opens a window with the given URLs. Returns the new window id.
    fn create_window(
        &self,
        urls: &[String],
        incognito: bool,
    ) -> impl Future<Output = BrowserResult<i64>> + Send;
}
