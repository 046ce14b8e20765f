use serde_json::Value;

use super::error::{StoreError, StoreResult};
use super::{require_clamp, TokenSet};
use crate::tokens::defaults::default_spacing;
use crate::tokens::{ClampPatch, SpacingKey, SpacingPatch, SpacingSettings};

impl TokenSet for SpacingSettings {
    type Key = SpacingKey;
    type Patch = SpacingPatch;

    const NAME: &'static str = "spacing";
    const STORAGE_KEY: &'static str = "spacing";
    const SCHEMA_VERSION: u32 = 1;

    fn defaults() -> Self {
        default_spacing()
    }

    fn required_keys() -> Vec<&'static str> {
        SpacingKey::ALL.into_iter().map(SpacingKey::as_str).collect()
    }

    fn apply_patch(&mut self, key: SpacingKey, patch: SpacingPatch) -> StoreResult<()> {
        match (key, patch) {
            (SpacingKey::ContainerPadding, SpacingPatch::Clamp(patch)) => {
                self.container_padding = self.container_padding.merged_with(&patch);
            }
            (SpacingKey::GridGap, SpacingPatch::Clamp(patch)) => {
                self.grid_gap = self.grid_gap.merged_with(&patch);
            }
            (SpacingKey::SectionMargin, SpacingPatch::Clamp(patch)) => {
                self.section_margin = self.section_margin.merged_with(&patch);
            }
            (SpacingKey::GridMinWidth, SpacingPatch::Pixels(width)) => {
                self.grid_min_width = width;
            }
            (key, _) => return Err(StoreError::PatchMismatch { key }),
        }
        Ok(())
    }

    fn apply_entry(&mut self, key: &str, value: &Value) -> StoreResult<()> {
        let spacing = SpacingKey::from_key(key).ok_or_else(|| StoreError::UnknownKey {
            set: Self::NAME,
            key: key.to_string(),
        })?;
        let invalid = |reason: String| StoreError::InvalidEntry {
            set: Self::NAME,
            key: key.to_string(),
            reason,
        };
        let patch = match spacing {
            SpacingKey::GridMinWidth => SpacingPatch::Pixels(
                value
                    .as_f64()
                    .ok_or_else(|| invalid(format!("expected a number, got {value}")))?,
            ),
            _ => SpacingPatch::Clamp(
                serde_json::from_value::<ClampPatch>(value.clone())
                    .map_err(|err| invalid(err.to_string()))?,
            ),
        };
        self.apply_patch(spacing, patch)
    }

    fn validate_entry(key: &str, value: Option<&Value>) -> Result<(), String> {
        let value = value.ok_or_else(|| "missing entry".to_string())?;
        if key == SpacingKey::GridMinWidth.as_str() {
            if !value.is_number() {
                return Err("not numeric".to_string());
            }
            return Ok(());
        }
        require_clamp(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{HydrationOutcome, SpacingStore};
    use crate::tokens::CssUnit;

    #[test]
    fn clamp_patch_updates_only_named_fields() {
        let store = SpacingStore::new();
        store
            .update(
                SpacingKey::SectionMargin,
                SpacingPatch::Clamp(ClampPatch {
                    max: Some(10.0),
                    ..ClampPatch::default()
                }),
            )
            .unwrap();
        let margin = store.snapshot().section_margin;
        assert_eq!(margin.min, 3.0);
        assert_eq!(margin.max, 10.0);
        assert_eq!(margin.unit, CssUnit::Rem);
    }

    #[test]
    fn mismatched_patch_kind_is_rejected() {
        let store = SpacingStore::new();
        let err = store
            .update(SpacingKey::GridGap, SpacingPatch::Pixels(12.0))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::PatchMismatch {
                key: SpacingKey::GridGap
            }
        ));
        assert!(store
            .update(
                SpacingKey::GridMinWidth,
                SpacingPatch::Clamp(ClampPatch::default())
            )
            .is_err());
        assert_eq!(store.snapshot(), default_spacing());
    }

    #[test]
    fn batch_update_accepts_numbers_and_partial_clamps() {
        let store = SpacingStore::new();
        let entries = serde_json::json!({
            "gridMinWidth": 320,
            "containerPadding": { "min": 24 },
            "gutter": 8
        });
        let report = store.batch_update(entries.as_object().unwrap());

        assert_eq!(
            report.applied,
            vec!["containerPadding".to_string(), "gridMinWidth".to_string()]
        );
        assert_eq!(report.dropped[0].key, "gutter");
        let spacing = store.snapshot();
        assert_eq!(spacing.grid_min_width, 320.0);
        assert_eq!(spacing.container_padding.min, 24.0);
        assert_eq!(spacing.container_padding.max, 64.0);
    }

    #[test]
    fn clamp_entry_missing_max_is_corruption() {
        let mut settings = serde_json::to_value(default_spacing()).unwrap();
        settings["gridGap"].as_object_mut().unwrap().remove("max");
        let blob = serde_json::json!({ "settings": settings, "schemaVersion": 1 });

        let store = SpacingStore::new();
        assert_eq!(
            store.hydrate_from(Some(&blob.to_string())),
            HydrationOutcome::Reset {
                reasons: vec!["gridGap: missing max".to_string()]
            }
        );
    }
}
