// groupshelf platform boundary
// Everything the popup talks to but does not own: the live browser
// tab/window/tab-group surface, the user's confirm/notify dialogs, and the
// OS data directory.

pub mod browser;
pub mod paths;
pub mod prompt;
pub mod simulated;

pub use browser::BrowserControl;
pub use paths::get_config_dir;
pub use prompt::UserPrompt;
pub use simulated::SimulatedBrowser;
