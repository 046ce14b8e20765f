use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigPathError {
    #[error("missing HOME environment variable")]
    MissingHomeDirectory,
}

pub(crate) const APP_DIR: &str = "master-controller";
const APP_CONFIG_FILE: &str = "config.json";

pub const DEFAULT_DEBOUNCE_MS: u64 = 150;
pub const DEFAULT_STYLE_ELEMENT_ID: &str = "master-controller-styles";

/// Engine settings from `config.json`; every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub debounce_ms: u64,
    pub style_element_id: String,
    pub storage_dir: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            style_element_id: DEFAULT_STYLE_ELEMENT_ID.to_string(),
            storage_dir: None,
        }
    }
}

impl EngineConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

pub fn load_engine_config() -> EngineConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_engine_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_engine_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> EngineConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(_) => return EngineConfig::default(),
    };
    if !path.exists() {
        return EngineConfig::default();
    }
    let config = match std::fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            EngineConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            EngineConfig::default()
        }
    };
    sanitize(config)
}

fn sanitize(mut config: EngineConfig) -> EngineConfig {
    if config.style_element_id.trim().is_empty() {
        tracing::warn!("empty style_element_id in config.json; using default");
        config.style_element_id = DEFAULT_STYLE_ELEMENT_ID.to_string();
    }
    config
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn with_temp_root<F: FnOnce(&Path)>(f: F) {
        let mut root = std::env::temp_dir();
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::SystemTime::UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        root.push(format!("master-controller-config-{}-{nanos}", std::process::id()));
        fs::create_dir_all(root.join(APP_DIR)).unwrap();
        f(&root);
        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn app_config_path_prefers_xdg_config_home() {
        let path = app_config_path(
            "master-controller",
            "config.json",
            Some(Path::new("/tmp/config-root")),
            Some(Path::new("/tmp/home")),
        )
        .expect("path should resolve");

        assert_eq!(
            path,
            PathBuf::from("/tmp/config-root/master-controller/config.json")
        );
    }

    #[test]
    fn app_config_path_falls_back_to_home_dot_config() {
        let path = app_config_path(
            "master-controller",
            "config.json",
            None,
            Some(Path::new("/tmp/home")),
        )
        .expect("path should resolve");

        assert_eq!(
            path,
            PathBuf::from("/tmp/home/.config/master-controller/config.json")
        );
    }

    #[test]
    fn app_config_path_errors_when_home_missing_and_xdg_unset() {
        let error = app_config_path("master-controller", "config.json", None, None).unwrap_err();
        assert_eq!(error, ConfigPathError::MissingHomeDirectory);
    }

    #[test]
    fn missing_config_file_yields_defaults() {
        with_temp_root(|root| {
            let config = load_engine_config_with(Some(root), None);
            assert_eq!(config, EngineConfig::default());
            assert_eq!(config.debounce(), Duration::from_millis(150));
        });
    }

    #[test]
    fn partial_config_keeps_remaining_defaults() {
        with_temp_root(|root| {
            fs::write(
                root.join(APP_DIR).join(APP_CONFIG_FILE),
                r#"{ "debounce_ms": 40, "style_element_id": "  " }"#,
            )
            .unwrap();
            let config = load_engine_config_with(Some(root), None);
            assert_eq!(config.debounce_ms, 40);
            assert_eq!(config.style_element_id, DEFAULT_STYLE_ELEMENT_ID);
            assert_eq!(config.storage_dir, None);
        });
    }

    #[test]
    fn invalid_config_file_yields_defaults() {
        with_temp_root(|root| {
            fs::write(root.join(APP_DIR).join(APP_CONFIG_FILE), "{ invalid").unwrap();
            assert_eq!(
                load_engine_config_with(Some(root), None),
                EngineConfig::default()
            );
        });
    }
}
