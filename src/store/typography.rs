use serde_json::{Map, Value};

use super::error::{StoreError, StoreResult};
use super::{require_clamp, TokenSet};
use crate::tokens::defaults::{default_text_settings, default_typography};
use crate::tokens::{TextRole, TextTypePatch, TypographySettings};

/// Role dropped in schema version 2.
const RETIRED_ROLE: &str = "subtitle";

impl TokenSet for TypographySettings {
    type Key = TextRole;
    type Patch = TextTypePatch;

    const NAME: &'static str = "typography";
    const STORAGE_KEY: &'static str = "typography";
    const SCHEMA_VERSION: u32 = 2;

    fn defaults() -> Self {
        default_typography()
    }

    fn required_keys() -> Vec<&'static str> {
        TextRole::ALL.into_iter().map(TextRole::as_str).collect()
    }

    fn apply_patch(&mut self, role: TextRole, patch: TextTypePatch) -> StoreResult<()> {
        let current = self
            .get(role)
            .cloned()
            .unwrap_or_else(|| default_text_settings(role));
        self.insert(role, current.merged_with(&patch));
        Ok(())
    }

    fn apply_entry(&mut self, key: &str, value: &Value) -> StoreResult<()> {
        let role = TextRole::from_key(key).ok_or_else(|| StoreError::UnknownKey {
            set: Self::NAME,
            key: key.to_string(),
        })?;
        let patch: TextTypePatch =
            serde_json::from_value(value.clone()).map_err(|err| StoreError::InvalidEntry {
                set: Self::NAME,
                key: key.to_string(),
                reason: err.to_string(),
            })?;
        self.apply_patch(role, patch)
    }

    fn validate_entry(_key: &str, value: Option<&Value>) -> Result<(), String> {
        let value = value.ok_or_else(|| "missing role".to_string())?;
        let size = value
            .get("size")
            .ok_or_else(|| "missing size".to_string())?;
        require_clamp(size).map_err(|reason| format!("size: {reason}"))
    }

    fn migrate(settings: &mut Map<String, Value>, from_version: u32) {
        if from_version < 2 {
            if settings.remove(RETIRED_ROLE).is_some() {
                tracing::info!(role = RETIRED_ROLE, "removed retired typography role");
            }
            let submenu = TextRole::Submenu.as_str();
            if !settings.contains_key(submenu) {
                if let Ok(value) = serde_json::to_value(default_text_settings(TextRole::Submenu)) {
                    settings.insert(submenu.to_string(), value);
                }
            }
        }
    }
}
