use serde::{Deserialize, Serialize};

/// Group id the browser reports for a tab outside any tab group.
pub const NO_GROUP: i64 = -1;

/// URL of the placeholder tab opened for new groups and the add button.
pub const NEW_TAB_URL: &str = "chrome://newtab/";

/// An open browser tab as reported by the live tab query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowserTab {
    pub id: i64,
    pub window_id: i64,
    pub group_id: i64,
    pub url: String,
    pub title: Option<String>,
    pub favicon: Option<String>,
    pub active: bool,
}

impl BrowserTab {
    pub fn is_grouped(&self) -> bool {
        self.group_id != NO_GROUP
    }
}

/// Live data attached to an item projected from an open tab.
#[derive(Debug, Clone, PartialEq)]
pub struct TabRef {
    pub tab_id: i64,
    pub window_id: i64,
    pub favicon: Option<String>,
    pub active: bool,
}

impl From<&BrowserTab> for TabRef {
    fn from(tab: &BrowserTab) -> Self {
        Self {
            tab_id: tab.id,
            window_id: tab.window_id,
            favicon: tab.favicon.clone(),
            active: tab.active,
        }
    }
}

/// Browser-native tab-group colour palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabGroupColor {
    #[default]
    Grey,
    Blue,
    Red,
    Yellow,
    Green,
    Pink,
    Purple,
    Cyan,
    Orange,
}

impl TabGroupColor {
    pub const ALL: [TabGroupColor; 9] = [
        TabGroupColor::Grey,
        TabGroupColor::Blue,
        TabGroupColor::Red,
        TabGroupColor::Yellow,
        TabGroupColor::Green,
        TabGroupColor::Pink,
        TabGroupColor::Purple,
        TabGroupColor::Cyan,
        TabGroupColor::Orange,
    ];
}

/// Tab-group metadata (title and colour) kept by the browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabGroupInfo {
    pub id: i64,
    pub title: Option<String>,
    pub color: TabGroupColor,
}
