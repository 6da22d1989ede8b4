//! Search Filter: marks rendered items whose label contains a keyword.
//!
//! Matching never hides items and never touches the model. Keystrokes reach
//! the filter through a [`Debouncer`] so a burst of typing filters once.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::types::view::RenderedView;

/// Shortest delay between the last keystroke and filtering.
pub const MIN_SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Case-insensitive substring test. A blank keyword matches nothing.
pub fn matches(keyword: &str, label: &str) -> bool {
    let needle = keyword.trim().to_lowercase();
    !needle.is_empty() && label.to_lowercase().contains(&needle)
}

/// Sets `highlighted` on every item of `view` whose label matches `keyword`
/// and clears it on all others. Returns the number of matches.
pub fn highlight(keyword: &str, view: &mut RenderedView) -> usize {
    let mut hits = 0;
    for item in view.items_mut() {
        item.highlighted = matches(keyword, &item.label);
        if item.highlighted {
            hits += 1;
        }
    }
    hits
}

/// Trailing-edge debouncer: of a burst of calls, only the last one runs, once
/// `delay` has passed without a newer call.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    /// Delays shorter than [`MIN_SEARCH_DEBOUNCE`] are raised to it.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay: delay.max(MIN_SEARCH_DEBOUNCE),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules `task`. The handle resolves to `true` if the task ran and
    /// `false` if a newer call superseded it.
    pub fn call<F, Fut>(&self, task: F) -> JoinHandle<bool>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let generation = Arc::clone(&self.generation);
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if generation.load(Ordering::SeqCst) != ticket {
                return false;
            }
            task().await;
            true
        })
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(MIN_SEARCH_DEBOUNCE)
    }
}
