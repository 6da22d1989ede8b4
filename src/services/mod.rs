// groupshelf services
// Stateless or near-stateless helpers: rendering, search, settings, URL handling.

pub mod render_engine;
pub mod search_filter;
pub mod settings_engine;
pub mod url_tools;
