use serde::{Deserialize, Serialize};

/// Storage key of the shared settings record.
pub const SETTINGS_KEY: &str = "setting";

/// The two popup features, each with its own group collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Bookmarks,
    Tabs,
}

impl FeatureKind {
    /// Field of the settings record holding this feature's view mode.
    pub fn view_mode_key(&self) -> &'static str {
        match self {
            FeatureKind::Bookmarks => "bookMarkViewMode",
            FeatureKind::Tabs => "tabViewMode",
        }
    }
}

/// How item lists are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Grid => ViewMode::List,
            ViewMode::List => ViewMode::Grid,
        }
    }
}

/// Persisted popup preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PopupSettings {
    #[serde(rename = "bookMarkViewMode", default)]
    pub bookmark_view_mode: ViewMode,
    #[serde(rename = "tabViewMode", default)]
    pub tab_view_mode: ViewMode,
}

impl PopupSettings {
    pub fn view_mode(&self, feature: FeatureKind) -> ViewMode {
        match feature {
            FeatureKind::Bookmarks => self.bookmark_view_mode,
            FeatureKind::Tabs => self.tab_view_mode,
        }
    }

    pub fn set_view_mode(&mut self, feature: FeatureKind, mode: ViewMode) {
        match feature {
            FeatureKind::Bookmarks => self.bookmark_view_mode = mode,
            FeatureKind::Tabs => self.tab_view_mode = mode,
        }
    }
}
