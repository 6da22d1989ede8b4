use thiserror::Error;

// === ValidationError ===

/// Rejected user input. The operation is aborted with no partial mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Group name was empty after trimming.
    #[error("Group name must not be empty")]
    EmptyName,
    /// URL was empty after trimming.
    #[error("URL must not be empty")]
    EmptyUrl,
    /// Another group already uses this exact name.
    #[error("Group already exists: {0}")]
    DuplicateName(String),
    /// The target group already holds an item with the same normalized URL.
    #[error("Website already exists in group: {0}")]
    DuplicateItem(String),
}

// === SkipReason ===

/// Why a model operation completed without mutating anything.
///
/// These are not errors: stale UI state is expected to catch up on the next
/// render cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The group or item no longer exists.
    NotFound,
    /// The operation is not allowed on the reserved group.
    Reserved,
    /// Group reordering involving a pinned group.
    Pinned,
    /// Source and destination group are the same.
    SameGroup,
    /// A rename with an empty name.
    EmptyName,
    /// The request matched the current state already.
    Unchanged,
}

/// Outcome of a model operation that did not fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Applied,
    Skipped(SkipReason),
}

impl Mutation {
    pub fn is_applied(&self) -> bool {
        matches!(self, Mutation::Applied)
    }
}

// === BrowserError ===

/// Failure reported by the live tab/window/tab-group control surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrowserError {
    #[error("Tab not found: {0}")]
    TabNotFound(i64),
    #[error("Tab group not found: {0}")]
    GroupNotFound(i64),
    #[error("Window not found: {0}")]
    WindowNotFound(i64),
    #[error("Browser command failed: {0}")]
    CommandFailed(String),
}

// === StoreError ===

/// Failure of the persistent key-value substrate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Store database error: {0}")]
    Database(String),
    #[error("Store serialization error: {0}")]
    Serialization(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

// === SettingsError ===

/// Errors related to popup settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// The settings key does not exist.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The value does not fit the setting's type.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

// === FeatureError ===

/// Error returned by a feature controller operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Browser(#[from] BrowserError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl FeatureError {
    /// Validation failures are shown to the user as a blocking notice.
    pub fn is_validation(&self) -> bool {
        matches!(self, FeatureError::Validation(_))
    }
}
