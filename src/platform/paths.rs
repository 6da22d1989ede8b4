// Per-OS location of the groupshelf config directory.
//   Linux:   $XDG_CONFIG_HOME/groupshelf or ~/.config/groupshelf
//   macOS:   ~/Library/Application Support/groupshelf
//   Windows: %APPDATA%/groupshelf

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "groupshelf";

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Directory holding the SQLite store.
#[cfg(target_os = "linux")]
pub fn get_config_dir() -> PathBuf {
    match env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join(APP_DIR),
        _ => home_dir().join(".config").join(APP_DIR),
    }
}

#[cfg(target_os = "macos")]
pub fn get_config_dir() -> PathBuf {
    home_dir()
        .join("Library")
        .join("Application Support")
        .join(APP_DIR)
}

#[cfg(target_os = "windows")]
pub fn get_config_dir() -> PathBuf {
    env::var("APPDATA")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join("AppData").join("Roaming"))
        .join(APP_DIR)
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
pub fn get_config_dir() -> PathBuf {
    home_dir().join(format!(".{}", APP_DIR))
}
