use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::platform::get_config_dir;
use crate::services::search_filter::MIN_SEARCH_DEBOUNCE;

/// Default wait after tab mutations before re-reading browser state.
pub const DEFAULT_TAB_SETTLE: Duration = Duration::from_millis(120);

/// Runtime configuration, read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    pub search_debounce: Duration,
    pub tab_settle_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: get_config_dir().join("store.db"),
            search_debounce: MIN_SEARCH_DEBOUNCE,
            tab_settle_delay: DEFAULT_TAB_SETTLE,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            db_path: env::var("GROUPSHELF_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            search_debounce: env::var("GROUPSHELF_SEARCH_DEBOUNCE_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.search_debounce)
                .max(MIN_SEARCH_DEBOUNCE),
            tab_settle_delay: env::var("GROUPSHELF_TAB_SETTLE_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.tab_settle_delay),
        }
    }
}
