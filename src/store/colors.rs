use serde_json::Value;

use super::error::{StoreError, StoreResult};
use super::TokenSet;
use crate::tokens::defaults::default_brand_colors;
use crate::tokens::{is_hex_color, BrandColorsSettings, ColorName};

impl TokenSet for BrandColorsSettings {
    type Key = ColorName;
    type Patch = String;

    const NAME: &'static str = "brandColors";
    const STORAGE_KEY: &'static str = "brand-colors";
    const SCHEMA_VERSION: u32 = 1;

    fn defaults() -> Self {
        default_brand_colors()
    }

    fn required_keys() -> Vec<&'static str> {
        ColorName::ALL.into_iter().map(ColorName::as_str).collect()
    }

    fn apply_patch(&mut self, name: ColorName, value: String) -> StoreResult<()> {
        if !is_hex_color(&value) {
            return Err(StoreError::InvalidColor { name, value });
        }
        self.set(name, value);
        Ok(())
    }

    fn apply_entry(&mut self, key: &str, value: &Value) -> StoreResult<()> {
        let name = ColorName::from_key(key).ok_or_else(|| StoreError::UnknownKey {
            set: Self::NAME,
            key: key.to_string(),
        })?;
        let value = value.as_str().ok_or_else(|| StoreError::InvalidEntry {
            set: Self::NAME,
            key: key.to_string(),
            reason: format!("expected a hex string, got {value}"),
        })?;
        self.apply_patch(name, value.to_string())
    }

    fn validate_entry(_key: &str, value: Option<&Value>) -> Result<(), String> {
        match value {
            None => Err("missing color".to_string()),
            Some(Value::String(hex)) if is_hex_color(hex) => Ok(()),
            Some(other) => Err(format!("not a hex color: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{BrandColorsStore, HydrationOutcome};

    #[test]
    fn update_accepts_short_hex() {
        let store = BrandColorsStore::new();
        store
            .update(ColorName::Background, "#fafafa".to_string())
            .unwrap();
        store.update(ColorName::Neutral, "#999".to_string()).unwrap();
        let colors = store.snapshot();
        assert_eq!(colors.background, "#fafafa");
        assert_eq!(colors.neutral, "#999");
    }

    #[test]
    fn persisted_non_hex_color_resets_store() {
        let mut settings = serde_json::to_value(default_brand_colors()).unwrap();
        settings["accent"] = serde_json::json!("gold");
        let blob = serde_json::json!({ "settings": settings, "schemaVersion": 1 });

        let store = BrandColorsStore::new();
        let outcome = store.hydrate_from(Some(&blob.to_string()));
        assert_eq!(
            outcome,
            HydrationOutcome::Reset {
                reasons: vec!["accent: not a hex color: \"gold\"".to_string()]
            }
        );
    }

    #[test]
    fn blob_without_schema_version_reads_as_version_one() {
        let blob = serde_json::json!({ "settings": default_brand_colors() });
        let store = BrandColorsStore::new();
        assert_eq!(
            store.hydrate_from(Some(&blob.to_string())),
            HydrationOutcome::Restored {
                migrated_from: None
            }
        );
    }

    #[test]
    fn batch_entry_with_invalid_hex_is_dropped() {
        let store = BrandColorsStore::new();
        let entries = serde_json::json!({ "primary": "#12345" });
        let report = store.batch_update(entries.as_object().unwrap());
        assert_eq!(report.dropped[0].key, "primary");
        assert_eq!(store.snapshot(), default_brand_colors());
    }
}
