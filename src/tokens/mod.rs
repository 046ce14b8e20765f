//! Design token data model.
//!
//! Typography entries reference brand colors by [`ColorName`]; the literal hex
//! value is resolved only when the stylesheet is generated.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

pub mod defaults;
pub mod presets;

pub const DEFAULT_VIEWPORT_MIN: f64 = 250.0;
pub const DEFAULT_VIEWPORT_MAX: f64 = 3000.0;

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#([0-9A-Fa-f]{3}|[0-9A-Fa-f]{6})$").unwrap());

pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR.is_match(value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CssUnit {
    #[default]
    Px,
    Rem,
    Em,
}

impl CssUnit {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Px => "px",
            Self::Rem => "rem",
            Self::Em => "em",
        }
    }
}

impl fmt::Display for CssUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Linear viewport interpolation between two sizes.
///
/// `min > max` is allowed and yields a value that shrinks as the viewport grows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClampConfig {
    pub min: f64,
    pub max: f64,
    #[serde(default = "default_viewport_min")]
    pub viewport_min: f64,
    #[serde(default = "default_viewport_max")]
    pub viewport_max: f64,
    #[serde(default)]
    pub unit: CssUnit,
}

fn default_viewport_min() -> f64 {
    DEFAULT_VIEWPORT_MIN
}

fn default_viewport_max() -> f64 {
    DEFAULT_VIEWPORT_MAX
}

impl ClampConfig {
    pub const fn new(
        min: f64,
        max: f64,
        viewport_min: f64,
        viewport_max: f64,
        unit: CssUnit,
    ) -> Self {
        Self {
            min,
            max,
            viewport_min,
            viewport_max,
            unit,
        }
    }

    /// Pixel range over the default viewport breakpoints.
    pub const fn px(min: f64, max: f64) -> Self {
        Self::new(
            min,
            max,
            DEFAULT_VIEWPORT_MIN,
            DEFAULT_VIEWPORT_MAX,
            CssUnit::Px,
        )
    }

    pub fn is_well_formed(&self) -> bool {
        [self.min, self.max, self.viewport_min, self.viewport_max]
            .iter()
            .all(|value| value.is_finite())
            && self.viewport_min < self.viewport_max
    }

    pub fn is_reversed(&self) -> bool {
        self.min > self.max
    }

    pub fn merged_with(&self, patch: &ClampPatch) -> Self {
        Self {
            min: patch.min.unwrap_or(self.min),
            max: patch.max.unwrap_or(self.max),
            viewport_min: patch.viewport_min.unwrap_or(self.viewport_min),
            viewport_max: patch.viewport_max.unwrap_or(self.viewport_max),
            unit: patch.unit.unwrap_or(self.unit),
        }
    }
}

/// Partial [`ClampConfig`]; absent fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClampPatch {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub viewport_min: Option<f64>,
    #[serde(default)]
    pub viewport_max: Option<f64>,
    #[serde(default)]
    pub unit: Option<CssUnit>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorName {
    Primary,
    Secondary,
    Accent,
    Neutral,
    Background,
    Text,
}

impl ColorName {
    pub const ALL: [ColorName; 6] = [
        Self::Primary,
        Self::Secondary,
        Self::Accent,
        Self::Neutral,
        Self::Background,
        Self::Text,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Accent => "accent",
            Self::Neutral => "neutral",
            Self::Background => "background",
            Self::Text => "text",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|name| name.as_str() == key)
    }
}

impl fmt::Display for ColorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic text role; declaration order is the stylesheet emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextRole {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Body,
    Quote,
    Link,
    Tagline,
    Caption,
    Menu,
    Submenu,
    Button,
}

impl TextRole {
    pub const ALL: [TextRole; 14] = [
        Self::H1,
        Self::H2,
        Self::H3,
        Self::H4,
        Self::H5,
        Self::H6,
        Self::Body,
        Self::Quote,
        Self::Link,
        Self::Tagline,
        Self::Caption,
        Self::Menu,
        Self::Submenu,
        Self::Button,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
            Self::H4 => "h4",
            Self::H5 => "h5",
            Self::H6 => "h6",
            Self::Body => "body",
            Self::Quote => "quote",
            Self::Link => "link",
            Self::Tagline => "tagline",
            Self::Caption => "caption",
            Self::Menu => "menu",
            Self::Submenu => "submenu",
            Self::Button => "button",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.as_str() == key)
    }
}

impl fmt::Display for TextRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    Normal,
    Italic,
}

impl FontStyle {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Italic => "italic",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextTypeSettings {
    pub size: ClampConfig,
    pub line_height: f64,
    pub letter_spacing: f64,
    pub font_weight: u16,
    pub font_family: String,
    pub color: ColorName,
    /// Serialized as `null` when unset so a merge can clear it.
    #[serde(default)]
    pub font_style: Option<FontStyle>,
}

impl TextTypeSettings {
    /// Shallow merge, except `size` which is merged field by field.
    pub fn merged_with(&self, patch: &TextTypePatch) -> Self {
        Self {
            size: patch
                .size
                .as_ref()
                .map_or(self.size, |size| self.size.merged_with(size)),
            line_height: patch.line_height.unwrap_or(self.line_height),
            letter_spacing: patch.letter_spacing.unwrap_or(self.letter_spacing),
            font_weight: patch.font_weight.unwrap_or(self.font_weight),
            font_family: patch
                .font_family
                .clone()
                .unwrap_or_else(|| self.font_family.clone()),
            color: patch.color.unwrap_or(self.color),
            font_style: patch.font_style.unwrap_or(self.font_style),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextTypePatch {
    #[serde(default)]
    pub size: Option<ClampPatch>,
    #[serde(default)]
    pub line_height: Option<f64>,
    #[serde(default)]
    pub letter_spacing: Option<f64>,
    #[serde(default)]
    pub font_weight: Option<u16>,
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default)]
    pub color: Option<ColorName>,
    /// `Some(None)` clears the style; an absent field keeps it.
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub font_style: Option<Option<FontStyle>>,
}

fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypographySettings {
    roles: BTreeMap<TextRole, TextTypeSettings>,
}

impl TypographySettings {
    pub fn get(&self, role: TextRole) -> Option<&TextTypeSettings> {
        self.roles.get(&role)
    }

    pub fn insert(&mut self, role: TextRole, settings: TextTypeSettings) {
        self.roles.insert(role, settings);
    }

    pub fn iter(&self) -> impl Iterator<Item = (TextRole, &TextTypeSettings)> {
        self.roles.iter().map(|(role, settings)| (*role, settings))
    }

    pub fn missing_roles(&self) -> Vec<TextRole> {
        TextRole::ALL
            .into_iter()
            .filter(|role| !self.roles.contains_key(role))
            .collect()
    }
}

impl FromIterator<(TextRole, TextTypeSettings)> for TypographySettings {
    fn from_iter<I: IntoIterator<Item = (TextRole, TextTypeSettings)>>(iter: I) -> Self {
        Self {
            roles: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandColorsSettings {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub neutral: String,
    pub background: String,
    pub text: String,
}

impl BrandColorsSettings {
    pub fn get(&self, name: ColorName) -> &str {
        match name {
            ColorName::Primary => &self.primary,
            ColorName::Secondary => &self.secondary,
            ColorName::Accent => &self.accent,
            ColorName::Neutral => &self.neutral,
            ColorName::Background => &self.background,
            ColorName::Text => &self.text,
        }
    }

    pub fn set(&mut self, name: ColorName, value: String) {
        let slot = match name {
            ColorName::Primary => &mut self.primary,
            ColorName::Secondary => &mut self.secondary,
            ColorName::Accent => &mut self.accent,
            ColorName::Neutral => &mut self.neutral,
            ColorName::Background => &mut self.background,
            ColorName::Text => &mut self.text,
        };
        *slot = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (ColorName, &str)> {
        ColorName::ALL.into_iter().map(|name| (name, self.get(name)))
    }

    pub fn invalid_colors(&self) -> Vec<ColorName> {
        self.iter()
            .filter(|(_, value)| !is_hex_color(value))
            .map(|(name, _)| name)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SpacingKey {
    ContainerPadding,
    GridGap,
    SectionMargin,
    GridMinWidth,
}

impl SpacingKey {
    pub const ALL: [SpacingKey; 4] = [
        Self::ContainerPadding,
        Self::GridGap,
        Self::SectionMargin,
        Self::GridMinWidth,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ContainerPadding => "containerPadding",
            Self::GridGap => "gridGap",
            Self::SectionMargin => "sectionMargin",
            Self::GridMinWidth => "gridMinWidth",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|spacing| spacing.as_str() == key)
    }
}

impl fmt::Display for SpacingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacingSettings {
    pub container_padding: ClampConfig,
    pub grid_gap: ClampConfig,
    pub section_margin: ClampConfig,
    pub grid_min_width: f64,
}

impl SpacingSettings {
    pub fn is_well_formed(&self) -> bool {
        self.container_padding.is_well_formed()
            && self.grid_gap.is_well_formed()
            && self.section_margin.is_well_formed()
            && self.grid_min_width.is_finite()
            && self.grid_min_width >= 0.0
    }
}

/// Patch for a single spacing entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpacingPatch {
    Clamp(ClampPatch),
    Pixels(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_color_accepts_short_and_long_forms_only() {
        assert!(is_hex_color("#fff"));
        assert!(is_hex_color("#1A2b3C"));
        assert!(!is_hex_color("#ffff"));
        assert!(!is_hex_color("fff"));
        assert!(!is_hex_color("#12345g"));
        assert!(!is_hex_color("rgb(0,0,0)"));
    }

    #[test]
    fn clamp_patch_touching_min_keeps_max() {
        let base = ClampConfig::px(16.0, 24.0);
        let merged = base.merged_with(&ClampPatch {
            min: Some(18.0),
            ..ClampPatch::default()
        });
        assert_eq!(merged.min, 18.0);
        assert_eq!(merged.max, 24.0);
        assert_eq!(merged.viewport_max, DEFAULT_VIEWPORT_MAX);
    }

    #[test]
    fn clamp_well_formed_requires_finite_fields_and_ordered_viewports() {
        assert!(ClampConfig::px(18.0, 17.0).is_well_formed());
        assert!(!ClampConfig::new(1.0, 2.0, 800.0, 800.0, CssUnit::Px).is_well_formed());
        assert!(!ClampConfig::new(f64::NAN, 2.0, 100.0, 800.0, CssUnit::Rem).is_well_formed());
    }

    #[test]
    fn text_type_patch_deserializes_nested_partial_size() {
        let patch: TextTypePatch =
            serde_json::from_str(r#"{"size":{"min":40},"color":"accent"}"#).unwrap();
        assert_eq!(patch.size.unwrap().min, Some(40.0));
        assert_eq!(patch.size.unwrap().max, None);
        assert_eq!(patch.color, Some(ColorName::Accent));
    }

    #[test]
    fn font_style_patch_tells_null_from_absent() {
        let quote = defaults::default_text_settings(TextRole::Quote);

        let keep: TextTypePatch = serde_json::from_str(r#"{"fontWeight":500}"#).unwrap();
        assert_eq!(keep.font_style, None);
        assert_eq!(quote.merged_with(&keep).font_style, Some(FontStyle::Italic));

        let clear: TextTypePatch = serde_json::from_str(r#"{"fontStyle":null}"#).unwrap();
        assert_eq!(clear.font_style, Some(None));
        assert_eq!(quote.merged_with(&clear).font_style, None);
    }

    #[test]
    fn unset_font_style_serializes_as_null() {
        let body = serde_json::to_value(defaults::default_text_settings(TextRole::Body)).unwrap();
        assert_eq!(body.get("fontStyle"), Some(&serde_json::Value::Null));
    }

    #[test]
    fn clamp_config_only_requires_min_and_max() {
        let config: ClampConfig = serde_json::from_str(r#"{"min":3,"max":8}"#).unwrap();
        assert_eq!(config, ClampConfig::px(3.0, 8.0));
        assert!(serde_json::from_str::<ClampConfig>(r#"{"min":3}"#).is_err());
    }

    #[test]
    fn typography_serializes_every_role_by_name() {
        let settings = defaults::default_typography();
        let value = serde_json::to_value(&settings).unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert!(keys.contains(&"h1"));
        assert!(keys.contains(&"button"));
        assert_eq!(keys.len(), TextRole::ALL.len());
    }

    #[test]
    fn key_lookup_matches_serde_names() {
        for role in TextRole::ALL {
            let json = serde_json::to_value(role).unwrap();
            assert_eq!(json.as_str(), Some(role.as_str()));
            assert_eq!(TextRole::from_key(role.as_str()), Some(role));
        }
        for name in ColorName::ALL {
            let json = serde_json::to_value(name).unwrap();
            assert_eq!(json.as_str(), Some(name.as_str()));
        }
        assert_eq!(SpacingKey::from_key("gridMinWidth"), Some(SpacingKey::GridMinWidth));
    }
}
