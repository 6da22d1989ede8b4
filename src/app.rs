//! Popup shell for groupshelf.
//!
//! Owns the store, browser and prompt handles, builds each feature the first
//! time it is shown, and routes operation failures to the user as notices.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::Config;
use crate::managers::bookmark_manager::BookmarkManager;
use crate::managers::operation_queue::OperationQueue;
use crate::managers::tab_manager::TabManager;
use crate::platform::browser::BrowserControl;
use crate::platform::prompt::UserPrompt;
use crate::services::search_filter::Debouncer;
use crate::store::StoreAdapter;
use crate::types::errors::FeatureError;
use crate::types::settings::FeatureKind;
use crate::types::view::RenderedView;

pub struct Popup<S, B, P>
where
    S: StoreAdapter + 'static,
    B: BrowserControl + 'static,
    P: UserPrompt,
{
    store: Arc<S>,
    browser: Arc<B>,
    prompt: Arc<P>,
    config: Config,
    debouncer: Debouncer,
    active: Option<FeatureKind>,
    bookmarks: Option<OperationQueue<BookmarkManager<S>>>,
    tabs: Option<OperationQueue<TabManager<S, B>>>,
}

impl<S, B, P> Popup<S, B, P>
where
    S: StoreAdapter + 'static,
    B: BrowserControl + 'static,
    P: UserPrompt,
{
    pub fn new(store: Arc<S>, browser: Arc<B>, prompt: Arc<P>, config: Config) -> Self {
        let debouncer = Debouncer::new(config.search_debounce);
        Self {
            store,
            browser,
            prompt,
            config,
            debouncer,
            active: None,
            bookmarks: None,
            tabs: None,
        }
    }

    pub fn active(&self) -> Option<FeatureKind> {
        self.active
    }

    pub fn browser(&self) -> &B {
        &self.browser
    }

    pub fn search_delay(&self) -> Duration {
        self.debouncer.delay()
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    pub fn bookmarks(&self) -> Option<&OperationQueue<BookmarkManager<S>>> {
        self.bookmarks.as_ref()
    }

    pub fn tabs(&self) -> Option<&OperationQueue<TabManager<S, B>>> {
        self.tabs.as_ref()
    }

    /// Switches to `feature`, building it on first use, and returns its view.
    pub async fn activate(&mut self, feature: FeatureKind) -> Result<RenderedView, FeatureError> {
        self.active = Some(feature);
        match feature {
            FeatureKind::Bookmarks => match &self.bookmarks {
                Some(queue) => Ok(queue.enter().await.render()),
                None => {
                    let mut manager = BookmarkManager::new(Arc::clone(&self.store));
                    let view = manager.initialize()?;
                    info!(groups = view.groups.len(), "bookmarks feature ready");
                    self.bookmarks = Some(OperationQueue::new(manager));
                    Ok(view)
                }
            },
            FeatureKind::Tabs => match &self.tabs {
                Some(queue) => Ok(queue.enter().await.refresh().await),
                None => {
                    let mut manager = TabManager::new(Arc::clone(&self.store), Arc::clone(&self.browser))
                        .with_settle_delay(self.config.tab_settle_delay);
                    let view = manager.initialize().await;
                    info!(groups = view.groups.len(), "tabs feature ready");
                    self.tabs = Some(OperationQueue::new(manager));
                    Ok(view)
                }
            },
        }
    }

    /// Current view of the active feature, if one has been shown.
    pub async fn view(&self) -> Option<RenderedView> {
        match self.active? {
            FeatureKind::Bookmarks => Some(self.bookmarks.as_ref()?.enter().await.render()),
            FeatureKind::Tabs => Some(self.tabs.as_ref()?.enter().await.render()),
        }
    }

    /// Unwraps an operation result, showing any error to the user.
    pub fn report<T>(&self, result: Result<T, FeatureError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) if e.is_validation() => {
                self.prompt.notify(&e.to_string());
                None
            }
            Err(e) => {
                warn!(error = %e, "operation failed");
                self.prompt.notify(&format!("Something went wrong: {}", e));
                None
            }
        }
    }

    /// Debounced search on the active feature. Only the last keyword of a
    /// burst is applied; the handle resolves to whether this call was it.
    pub fn search(&self, keyword: impl Into<String>) -> JoinHandle<bool> {
        let keyword = keyword.into();
        match self.active {
            Some(FeatureKind::Bookmarks) if self.bookmarks.is_some() => {
                let queue = self.bookmarks.clone();
                self.debouncer.call(move || async move {
                    if let Some(queue) = queue {
                        queue.enter().await.apply_search(&keyword);
                    }
                })
            }
            Some(FeatureKind::Tabs) if self.tabs.is_some() => {
                let queue = self.tabs.clone();
                self.debouncer.call(move || async move {
                    if let Some(queue) = queue {
                        queue.enter().await.apply_search(&keyword);
                    }
                })
            }
            _ => self.debouncer.call(|| async {}),
        }
    }
}
