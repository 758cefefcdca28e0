//! Persistent settings stored as JSON next to the executable

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const CONFIG_NAME: &str = "config.json";

/// Saved settings. Loading never fails: a missing or unreadable file
/// yields the defaults, and unknown keys in the file are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output_dir: String,
    pub cookies_path: String,
    pub data_sync_id: String,
    pub proxy_url: String,
    pub ffmpeg_path: String,
    pub language: String,
    pub theme: String,
}

impl Default for Config {
    fn default() -> Self {
        let cwd = std::env::current_dir()
            .map(|dir| dir.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            output_dir: cwd,
            cookies_path: String::new(),
            data_sync_id: String::new(),
            proxy_url: String::new(),
            ffmpeg_path: String::new(),
            language: "en".to_string(),
            theme: "dark".to_string(),
        }
    }
}

/// Where the settings file lives: beside the executable, falling back
/// to the working directory when the executable path is unavailable.
pub fn config_path() -> PathBuf {
    let dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));
    dir.join(CONFIG_NAME)
}

/// Expands a leading "~" to the user's home directory.
fn expand_path(raw: &str) -> String {
    if raw == "~" {
        if let Some(home) = dirs::home_dir() {
            return home.to_string_lossy().into_owned();
        }
    } else if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest).to_string_lossy().into_owned();
        }
    }
    raw.to_string()
}

pub fn load_config(path: &Path) -> Config {
    let mut config = match std::fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(config) => config,
            Err(error) => {
                log::warn!("Error loading config: {error}");
                Config::default()
            }
        },
        Err(_) => Config::default(),
    };
    config.output_dir = expand_path(&config.output_dir);
    config.cookies_path = expand_path(&config.cookies_path);
    config
}

pub fn save_config(path: &Path, config: &Config) {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            if let Err(error) = std::fs::create_dir_all(parent) {
                log::warn!("Error saving config: {error}");
                return;
            }
        }
    }
    let serialized = match serde_json::to_string_pretty(config) {
        Ok(serialized) => serialized,
        Err(error) => {
            log::warn!("Error saving config: {error}");
            return;
        }
    };
    if let Err(error) = std::fs::write(path, serialized) {
        log::warn!("Error saving config: {error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.json"));
        assert_eq!(config.language, "en");
        assert_eq!(config.theme, "dark");
        assert!(config.cookies_path.is_empty());
    }

    #[test]
    fn test_defaults_when_file_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_NAME);
        std::fs::write(&path, "{not json").unwrap();
        let config = load_config(&path);
        assert_eq!(config.language, "en");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_NAME);
        let mut config = Config::default();
        config.language = "ja".to_string();
        config.proxy_url = "socks5://127.0.0.1:1080".to_string();
        save_config(&path, &config);
        let reloaded = load_config(&path);
        assert_eq!(reloaded.language, "ja");
        assert_eq!(reloaded.proxy_url, "socks5://127.0.0.1:1080");
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let raw = r#"{"language": "ko", "telemetry": true}"#;
        let config: Config = serde_json::from_str(raw).unwrap();
        assert_eq!(config.language, "ko");
        assert_eq!(config.theme, "dark");
    }

    #[test]
    fn test_tilde_expansion_in_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_NAME);
        std::fs::write(&path, r#"{"output_dir": "~/videos"}"#).unwrap();
        let config = load_config(&path);
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                config.output_dir,
                home.join("videos").to_string_lossy().as_ref()
            );
        }
    }
}
