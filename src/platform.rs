// Shelfmark platform paths
// Linux:   config in $XDG_CONFIG_HOME/shelfmark, data in $XDG_DATA_HOME/shelfmark
// macOS:   ~/Library/Application Support/Shelfmark for both
// Windows: %APPDATA%\Shelfmark for both

use std::env;
use std::path::PathBuf;

#[cfg(target_os = "linux")]
const APP_DIR: &str = "shelfmark";
#[cfg(not(target_os = "linux"))]
const APP_DIR: &str = "Shelfmark";

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Joins the app directory onto `$var`, or onto `home/fallback` when the
/// variable is unset or empty.
fn xdg_dir(var: &str, fallback: &[&str]) -> PathBuf {
    match env::var(var) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir).join(APP_DIR),
        _ => fallback
            .iter()
            .fold(home_dir(), |path, part| path.join(part))
            .join(APP_DIR),
    }
}

/// Returns the directory holding `settings.json`.
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        xdg_dir("XDG_CONFIG_HOME", &[".config"])
    }
    #[cfg(target_os = "macos")]
    {
        home_dir().join("Library").join("Application Support").join(APP_DIR)
    }
    #[cfg(target_os = "windows")]
    {
        xdg_dir("APPDATA", &["AppData", "Roaming"])
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        xdg_dir("XDG_CONFIG_HOME", &[".config"])
    }
}

/// Returns the private data directory holding the bookmark shelf.
pub fn get_data_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        xdg_dir("XDG_DATA_HOME", &[".local", "share"])
    }
    #[cfg(target_os = "macos")]
    {
        home_dir().join("Library").join("Application Support").join(APP_DIR)
    }
    #[cfg(target_os = "windows")]
    {
        xdg_dir("APPDATA", &["AppData", "Roaming"])
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        xdg_dir("XDG_DATA_HOME", &[".local", "share"])
    }
}
