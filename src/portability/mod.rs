//! Backup and restore of the full token set as a versioned JSON envelope.

use std::fs;
use std::io;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::storage::{write_replace, StorageError};
use crate::store::{check_entries, BatchReport, TokenSet, TokenStores};
use crate::tokens::{BrandColorsSettings, SpacingSettings, TypographySettings};

pub const EXPORT_FORMAT_VERSION: &str = "1.0.0";
const SUPPORTED_MAJOR: &str = "1";

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read import file: {0}")]
    Io(#[from] io::Error),
    #[error("import is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("import rejected: {}", .violations.join("; "))]
    Invalid { violations: Vec<String> },
}

pub type ImportResult<T> = std::result::Result<T, ImportError>;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type ExportResult<T> = std::result::Result<T, ExportError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedSettings {
    pub version: String,
    #[serde(default)]
    pub timestamp: String,
    pub typography: TypographySettings,
    pub brand_colors: BrandColorsSettings,
    pub spacing: SpacingSettings,
}

impl ExportedSettings {
    pub fn new(
        colors: BrandColorsSettings,
        typography: TypographySettings,
        spacing: SpacingSettings,
    ) -> Self {
        Self {
            version: EXPORT_FORMAT_VERSION.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            typography,
            brand_colors: colors,
            spacing,
        }
    }

    pub fn capture(stores: &TokenStores) -> Self {
        Self::new(
            stores.colors.snapshot(),
            stores.typography.snapshot(),
            stores.spacing.snapshot(),
        )
    }
}

/// Result of handing a validated envelope to the stores.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub typography: BatchReport,
    pub colors: BatchReport,
    pub spacing: BatchReport,
}

pub fn export_settings(
    colors: &BrandColorsSettings,
    typography: &TypographySettings,
    spacing: &SpacingSettings,
) -> ExportResult<String> {
    let envelope = ExportedSettings::new(colors.clone(), typography.clone(), spacing.clone());
    Ok(serde_json::to_string_pretty(&envelope)?)
}

pub fn export_to_file(stores: &TokenStores, path: &Path) -> ExportResult<()> {
    let json = serde_json::to_string_pretty(&ExportedSettings::capture(stores))?;
    write_replace(path, &json)?;
    tracing::info!(?path, "exported token settings");
    Ok(())
}

/// Parse and validate an envelope. Every violation found is reported, not just the first.
pub fn import_settings(json: &str) -> ImportResult<ExportedSettings> {
    let value: Value = serde_json::from_str(json).map_err(ImportError::Parse)?;
    let Value::Object(mut envelope) = value else {
        return Err(invalid(vec!["envelope is not a JSON object".to_string()]));
    };

    let mut violations = Vec::new();
    match envelope.get("version") {
        Some(Value::String(version)) => {
            if version.split('.').next() != Some(SUPPORTED_MAJOR) {
                tracing::warn!(version, "importing settings from an unknown format version");
            }
        }
        Some(other) => violations.push(format!("version must be a string, got {other}")),
        None => violations.push("missing version".to_string()),
    }

    check_section::<TypographySettings>(&mut envelope, "typography", &mut violations);
    check_section::<BrandColorsSettings>(&mut envelope, "brandColors", &mut violations);
    check_section::<SpacingSettings>(&mut envelope, "spacing", &mut violations);
    if !violations.is_empty() {
        return Err(invalid(violations));
    }

    serde_json::from_value(Value::Object(envelope))
        .map_err(|err| invalid(vec![format!("envelope does not decode: {err}")]))
}

pub fn import_from_file(path: &Path) -> ImportResult<ExportedSettings> {
    let json = fs::read_to_string(path)?;
    import_settings(&json)
}

/// Validate `json` and merge it into the stores. Nothing is applied unless the
/// whole envelope is valid.
pub fn apply_import(stores: &TokenStores, json: &str) -> ImportResult<ImportReport> {
    let settings = import_settings(json).inspect_err(|err| {
        tracing::warn!(%err, "rejected settings import");
    })?;
    Ok(apply_settings(stores, &settings))
}

pub fn apply_settings(stores: &TokenStores, settings: &ExportedSettings) -> ImportReport {
    ImportReport {
        typography: stores.typography.batch_update(&section(&settings.typography)),
        colors: stores.colors.batch_update(&section(&settings.brand_colors)),
        spacing: stores.spacing.batch_update(&section(&settings.spacing)),
    }
}

fn check_section<T: TokenSet>(
    envelope: &mut Map<String, Value>,
    name: &str,
    violations: &mut Vec<String>,
) {
    match envelope.get_mut(name) {
        Some(Value::Object(entries)) => violations.extend(
            check_entries::<T>(entries)
                .into_iter()
                .map(|reason| format!("{name}.{reason}")),
        ),
        Some(_) => violations.push(format!("section {name} is not an object")),
        None => violations.push(format!("missing section {name}")),
    }
}

fn section<T: Serialize>(settings: &T) -> Map<String, Value> {
    match serde_json::to_value(settings) {
        Ok(Value::Object(entries)) => entries,
        _ => Map::new(),
    }
}

fn invalid(violations: Vec<String>) -> ImportError {
    ImportError::Invalid { violations }
}
