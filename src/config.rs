use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::history::DEFAULT_HISTORY_CAPACITY;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub history: HistoryConfig,
    pub signals: SignalConfig,
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HistoryConfig {
    pub capacity: usize,
    pub initial_page: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_HISTORY_CAPACITY,
            initial_page: "dashboard".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SignalConfig {
    /// Collapse back presses from several channels in one turn into one.
    pub coalesce_within_turn: bool,
    /// User-agent fragments that mark an embedded WebView.
    pub webview_markers: Vec<String>,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            coalesce_within_turn: true,
            webview_markers: vec!["; wv)".to_string(), "WebView".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SyncConfig {
    pub enabled: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    pub fn load() -> AppResult<Self> {
        let Some(path) = default_config_path() else {
            return Ok(Self::default());
        };
        Self::load_from_path(path)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("no config at {}; using defaults", path.display());
            return Ok(Self::default());
        }
        if !path.is_file() {
            return Err(AppError::invalid_argument(format!(
                "config path is not a regular file: {}",
                path.display()
            )));
        }

        let raw = fs::read_to_string(path).map_err(|source| {
            AppError::io_with_context(source, format!("failed to read config: {}", path.display()))
        })?;
        Self::from_toml(&raw).map_err(|err| match err {
            AppError::InvalidArgument(message) => {
                AppError::invalid_argument(format!("{} ({})", message, path.display()))
            }
            other => other,
        })
    }

    pub fn from_toml(raw: &str) -> AppResult<Self> {
        let parsed = toml::from_str::<Self>(raw).map_err(|source| {
            AppError::invalid_argument(format!("failed to parse config: {source}"))
        })?;
        Ok(parsed.sanitized())
    }

    fn sanitized(mut self) -> Self {
        self.history.capacity = self.history.capacity.max(1);
        if self.history.initial_page.trim().is_empty() {
            self.history.initial_page = HistoryConfig::default().initial_page;
        }
        self.signals
            .webview_markers
            .retain(|marker| !marker.is_empty());
        self
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os("NAVSHELL_CONFIG_PATH")
        && !explicit.is_empty()
    {
        return Some(PathBuf::from(explicit));
    }

    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME")
        && !xdg.is_empty()
    {
        return Some(PathBuf::from(xdg).join("navshell").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME")
        && !home.is_empty()
    {
        return Some(
            PathBuf::from(home)
                .join(".config")
                .join("navshell")
                .join("config.toml"),
        );
    }
    if let Some(appdata) = std::env::var_os("APPDATA")
        && !appdata.is_empty()
    {
        return Some(PathBuf::from(appdata).join("navshell").join("config.toml"));
    }
    None
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::process;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::Config;

    fn unique_temp_path(suffix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("navshell_config_{suffix}_{}_{}", process::id(), nanos));
        path
    }

    #[test]
    fn load_from_path_returns_defaults_for_missing_file() {
        let missing = unique_temp_path("missing.toml");
        let config = Config::load_from_path(&missing).expect("missing config should fallback");
        assert_eq!(config, Config::default());
        assert_eq!(config.history.capacity, 10);
    }

    #[test]
    fn load_from_path_applies_partial_overrides_and_sanitizes() {
        let path = unique_temp_path("custom.toml");
        fs::write(
            &path,
            r#"
            [history]
            capacity = 0
            initial_page = "  "

            [signals]
            coalesce_within_turn = false
            webview_markers = ["", "CustomShell"]
            "#,
        )
        .expect("config file should be written");

        let config = Config::load_from_path(&path).expect("config should parse");
        assert_eq!(config.history.capacity, 1);
        assert_eq!(config.history.initial_page, "dashboard");
        assert!(!config.signals.coalesce_within_turn);
        assert_eq!(config.signals.webview_markers, vec!["CustomShell".to_string()]);
        assert!(config.sync.enabled);

        fs::remove_file(&path).expect("config file should be removed");
    }

    #[test]
    fn malformed_toml_is_an_invalid_argument() {
        let err = Config::from_toml("[history\ncapacity = 3").expect_err("parse should fail");
        assert!(err.to_string().starts_with("invalid argument: failed to parse config"));
    }
}
