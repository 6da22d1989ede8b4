//! groupshelf console demo.
//!
//! Opens the SQLite store, shows both popup features over a simulated browser,
//! runs a scripted sequence of operations and prints each rendered view.

use std::sync::Arc;
use std::time::Duration;

use groupshelf::app::Popup;
use groupshelf::config::Config;
use groupshelf::platform::prompt::ScriptedPrompt;
use groupshelf::platform::SimulatedBrowser;
use groupshelf::store::SqliteStore;
use groupshelf::types::group::TAB_RESERVED_ID;
use groupshelf::types::interaction::DragPayload;
use groupshelf::types::settings::FeatureKind;
use groupshelf::types::tab::TabGroupColor;
use groupshelf::types::view::RenderedView;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("groupshelf=info")),
        )
        .init();

    let config = Config::from_env();
    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    println!("groupshelf v{}  store: {}", env!("CARGO_PKG_VERSION"), config.db_path.display());

    let store = Arc::new(SqliteStore::open(&config.db_path)?);
    let browser = Arc::new(SimulatedBrowser::new());
    let docs = browser.open_tab("https://doc.rust-lang.org/book/", "The Rust Book");
    let crates = browser.open_tab("https://crates.io/", "crates.io");
    browser.open_tab("https://news.ycombinator.com/", "Hacker News");
    browser.add_group("Rust", TabGroupColor::Orange, &[docs, crates]);
    browser.set_active(docs);

    let prompt = Arc::new(ScriptedPrompt::accepting());
    let mut popup = Popup::new(store, Arc::clone(&browser), prompt, config);

    section("Bookmarks");
    let view = popup.activate(FeatureKind::Bookmarks).await?;
    print_view(&view);
    if let Some(queue) = popup.bookmarks() {
        let mut bookmarks = queue.enter().await;
        let reading = popup.report(bookmarks.add_group("Reading"));
        if let Some(id) = reading.as_deref() {
            popup.report(bookmarks.add_item(id, "doc.rust-lang.org/std/", None));
            popup.report(bookmarks.add_item(id, "https://blog.rust-lang.org/", Some("Rust Blog")));
        }
        // Second add with the same name shows a notice instead of failing.
        popup.report(bookmarks.add_group("Reading"));

        if let Some(Some(draft)) = popup.report(bookmarks.bookmark_current_page(popup.browser()).await) {
            popup.report(bookmarks.add_item(&draft.group_id, &draft.url, Some(&draft.display_name)));
        }
        if let Some(id) = reading.as_deref() {
            popup.report(bookmarks.toggle_pin(id));
        }
        print_view(&bookmarks.render());
    }

    popup.search("rust");
    tokio::time::sleep(popup.search_delay() + Duration::from_millis(50)).await;
    if let Some(view) = popup.view().await {
        println!("  matches for \"rust\": {:?}", view.highlighted_keys());
    }

    section("Tabs");
    let view = popup.activate(FeatureKind::Tabs).await?;
    print_view(&view);
    if let Some(queue) = popup.tabs() {
        let mut tabs = queue.enter().await;
        tabs.create_group("Later", Some(TabGroupColor::Blue)).await;

        let ungrouped = tabs
            .model()
            .groups()
            .iter()
            .find(|g| tabs.model().is_reserved(&g.id))
            .and_then(|g| g.items.first())
            .map(|i| i.key());
        let later = tabs
            .model()
            .groups()
            .iter()
            .find(|g| g.name == "Later")
            .map(|g| g.id.clone());
        if let (Some(key), Some(later)) = (ungrouped, later) {
            tabs.begin_drag(DragPayload::Item {
                item_key: key,
                source_group_id: TAB_RESERVED_ID.to_string(),
            });
            tabs.drop_on(&later).await;
        }
        print_view(&tabs.render());
    }

    for message in popup.prompt().messages() {
        println!("  notice: {}", message);
    }
    Ok(())
}

fn section(name: &str) {
    println!("───────────────────────────────────────────────");
    println!("  {}", name);
    println!("───────────────────────────────────────────────");
}

fn print_view(view: &RenderedView) {
    println!("  [{:?}]", view.mode);
    for group in &view.groups {
        let pin = if group.pinned { "*" } else { " " };
        println!("  {} {}", pin, group.title);
        if !group.expanded {
            continue;
        }
        for item in &group.items {
            let mark = if item.highlighted { ">" } else { " " };
            println!("     {} {}  {}", mark, item.label, item.url);
        }
    }
}
