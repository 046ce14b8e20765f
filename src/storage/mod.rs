use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{app_config_path, config_env_dirs, ConfigPathError, APP_DIR};

const TOKENS_SUBDIR: &str = "tokens";
const ENTRY_EXTENSION: &str = "json";
const TEMP_SUFFIX: &str = ".tmp";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("missing HOME environment variable")]
    MissingHomeDirectory,
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl From<ConfigPathError> for StorageError {
    fn from(error: ConfigPathError) -> Self {
        match error {
            ConfigPathError::MissingHomeDirectory => Self::MissingHomeDirectory,
        }
    }
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Durable string key-value storage, one entry per token store.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
}

fn validate_key(key: &str) -> StorageResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
    if !valid {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Stores each entry as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn with_path(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn with_default_path() -> StorageResult<Self> {
        let (xdg_config_home, home) = config_env_dirs();
        let dir = app_config_path(
            APP_DIR,
            TOKENS_SUBDIR,
            xdg_config_home.as_deref(),
            home.as_deref(),
        )?;
        Ok(Self::with_path(dir))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn entry_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        let mut path = self.dir.clone();
        path.push(format!("{key}.{ENTRY_EXTENSION}"));
        Ok(path)
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.entry_path(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::Io(err)),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.entry_path(key)?;
        write_replace(&path, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let path = self.entry_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::Io(err)),
        }
    }
}

/// Write to a sibling temp file, then rename over the destination.
pub(crate) fn write_replace(destination: &Path, contents: &str) -> StorageResult<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut temp = destination.as_os_str().to_owned();
    temp.push(TEMP_SUFFIX);
    let temp = PathBuf::from(temp);

    fs::write(&temp, contents)?;
    if let Err(err) = fs::rename(&temp, destination) {
        let _ = fs::remove_file(&temp);
        return Err(StorageError::Io(err));
    }
    Ok(())
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        validate_key(key)?;
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        validate_key(key)?;
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        validate_key(key)?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
