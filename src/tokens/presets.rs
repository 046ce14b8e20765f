//! Built-in preset tables.

use super::defaults::{default_text_settings, BODY_FONT, HEADING_FONT};
use super::{
    BrandColorsSettings, ClampConfig, FontStyle, TextRole, TextTypeSettings, TypographySettings,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypographyPreset {
    Classic,
    Compact,
    Editorial,
}

impl TypographyPreset {
    pub const fn all() -> &'static [TypographyPreset] {
        &[Self::Classic, Self::Compact, Self::Editorial]
    }

    pub const fn id(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Compact => "compact",
            Self::Editorial => "editorial",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::all().iter().copied().find(|preset| preset.id() == id)
    }

    pub fn settings(self) -> TypographySettings {
        TextRole::ALL
            .into_iter()
            .map(|role| (role, self.text_settings(role)))
            .collect()
    }

    fn text_settings(self, role: TextRole) -> TextTypeSettings {
        let base = default_text_settings(role);
        match self {
            Self::Classic => base,
            Self::Compact => compact(role, base),
            Self::Editorial => editorial(role, base),
        }
    }
}

// (min, max) in px, indexed like TextRole::ALL.
const COMPACT_SIZES: [(f64, f64); 14] = [
    (28.0, 48.0),
    (24.0, 36.0),
    (20.0, 28.0),
    (18.0, 22.0),
    (16.0, 18.0),
    (15.0, 16.0),
    (15.0, 16.0),
    (17.0, 20.0),
    (15.0, 16.0),
    (13.0, 14.0),
    // caption shrinks slightly on wide viewports
    (18.0, 17.0),
    (14.0, 15.0),
    (13.0, 14.0),
    (14.0, 15.0),
];

const EDITORIAL_SIZES: [(f64, f64); 14] = [
    (36.0, 80.0),
    (30.0, 56.0),
    (26.0, 40.0),
    (22.0, 30.0),
    (19.0, 24.0),
    (17.0, 19.0),
    (17.0, 20.0),
    (22.0, 34.0),
    (17.0, 20.0),
    (14.0, 16.0),
    (12.0, 14.0),
    (15.0, 17.0),
    (14.0, 15.0),
    (15.0, 17.0),
];

fn role_index(role: TextRole) -> usize {
    TextRole::ALL
        .iter()
        .position(|candidate| *candidate == role)
        .unwrap_or(0)
}

fn compact(role: TextRole, base: TextTypeSettings) -> TextTypeSettings {
    let (min, max) = COMPACT_SIZES[role_index(role)];
    TextTypeSettings {
        size: ClampConfig::px(min, max),
        line_height: tighten(base.line_height),
        font_family: BODY_FONT.to_string(),
        ..base
    }
}

/// Drop a line height by 0.1, floored at 1 and kept to two decimals.
fn tighten(line_height: f64) -> f64 {
    (((line_height - 0.1) * 100.0).round() / 100.0).max(1.0)
}

fn editorial(role: TextRole, base: TextTypeSettings) -> TextTypeSettings {
    let (min, max) = EDITORIAL_SIZES[role_index(role)];
    let heading = matches!(
        role,
        TextRole::H1 | TextRole::H2 | TextRole::H3 | TextRole::Quote
    );
    TextTypeSettings {
        size: ClampConfig::px(min, max),
        font_family: if heading { HEADING_FONT } else { BODY_FONT }.to_string(),
        font_style: if role == TextRole::Quote {
            Some(FontStyle::Italic)
        } else {
            base.font_style
        },
        ..base
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorPreset {
    Harbor,
    Sandstone,
    Evergreen,
}

impl ColorPreset {
    pub const fn all() -> &'static [ColorPreset] {
        &[Self::Harbor, Self::Sandstone, Self::Evergreen]
    }

    pub const fn id(self) -> &'static str {
        match self {
            Self::Harbor => "harbor",
            Self::Sandstone => "sandstone",
            Self::Evergreen => "evergreen",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::all().iter().copied().find(|preset| preset.id() == id)
    }

    pub fn colors(self) -> BrandColorsSettings {
        let [primary, secondary, accent, neutral, background, text] = match self {
            Self::Harbor => [
                "#1B2A41", "#324A5F", "#C9A227", "#6B7280", "#FFFFFF", "#1F2937",
            ],
            Self::Sandstone => [
                "#5C4033", "#A67B5B", "#E07A5F", "#8D8D8D", "#FAF7F2", "#2E2A27",
            ],
            Self::Evergreen => [
                "#14532D", "#166534", "#F59E0B", "#64748B", "#F8FAFC", "#0F172A",
            ],
        };
        BrandColorsSettings {
            primary: primary.to_string(),
            secondary: secondary.to_string(),
            accent: accent.to_string(),
            neutral: neutral.to_string(),
            background: background.to_string(),
            text: text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_catalog_ids_round_trip() {
        for preset in TypographyPreset::all() {
            assert_eq!(TypographyPreset::from_id(preset.id()), Some(*preset));
        }
        for preset in ColorPreset::all() {
            assert_eq!(ColorPreset::from_id(preset.id()), Some(*preset));
        }
        assert_eq!(TypographyPreset::from_id("missing"), None);
    }

    #[test]
    fn every_preset_covers_every_role_and_valid_color() {
        for preset in TypographyPreset::all() {
            assert!(preset.settings().missing_roles().is_empty(), "{preset:?}");
        }
        for preset in ColorPreset::all() {
            assert!(preset.colors().invalid_colors().is_empty(), "{preset:?}");
        }
    }

    #[test]
    fn compact_caption_keeps_reverse_range() {
        let settings = TypographyPreset::Compact.settings();
        let caption = settings.get(TextRole::Caption).unwrap();
        assert_eq!((caption.size.min, caption.size.max), (18.0, 17.0));
        assert!(caption.size.is_reversed());
    }

    #[test]
    fn compact_line_heights_stay_at_two_decimals() {
        let settings = TypographyPreset::Compact.settings();
        assert_eq!(settings.get(TextRole::H1).unwrap().line_height, 1.0);
        assert_eq!(settings.get(TextRole::H2).unwrap().line_height, 1.05);
        assert_eq!(settings.get(TextRole::Body).unwrap().line_height, 1.5);
        assert_eq!(settings.get(TextRole::Button).unwrap().line_height, 1.0);

        let css = crate::css::generate(
            &ColorPreset::Harbor.colors(),
            &settings,
            &crate::tokens::defaults::default_spacing(),
        );
        assert!(css.contains("--line-height-h1: 1;"), "{css}");
        assert!(css.contains("--line-height-body: 1.5;"), "{css}");
        assert!(!css.contains("0000000"), "{css}");
    }
}
