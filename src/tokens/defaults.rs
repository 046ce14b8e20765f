use super::{
    BrandColorsSettings, ClampConfig, ColorName, CssUnit, FontStyle, SpacingSettings,
    TextRole, TextTypeSettings, TypographySettings, DEFAULT_VIEWPORT_MAX, DEFAULT_VIEWPORT_MIN,
};

pub const HEADING_FONT: &str = "Playfair Display";
pub const BODY_FONT: &str = "Inter";

fn text(
    min: f64,
    max: f64,
    line_height: f64,
    letter_spacing: f64,
    font_weight: u16,
    font_family: &str,
    color: ColorName,
) -> TextTypeSettings {
    TextTypeSettings {
        size: ClampConfig::px(min, max),
        line_height,
        letter_spacing,
        font_weight,
        font_family: font_family.to_string(),
        color,
        font_style: None,
    }
}

pub fn default_text_settings(role: TextRole) -> TextTypeSettings {
    use ColorName::*;
    match role {
        TextRole::H1 => text(32.0, 64.0, 1.1, -0.02, 700, HEADING_FONT, Primary),
        TextRole::H2 => text(28.0, 48.0, 1.15, -0.01, 700, HEADING_FONT, Primary),
        TextRole::H3 => text(24.0, 36.0, 1.2, 0.0, 600, HEADING_FONT, Primary),
        TextRole::H4 => text(20.0, 28.0, 1.25, 0.0, 600, HEADING_FONT, Text),
        TextRole::H5 => text(18.0, 22.0, 1.3, 0.0, 600, BODY_FONT, Text),
        TextRole::H6 => text(16.0, 18.0, 1.4, 0.02, 600, BODY_FONT, Text),
        TextRole::Body => text(16.0, 18.0, 1.6, 0.0, 400, BODY_FONT, Text),
        TextRole::Quote => TextTypeSettings {
            font_style: Some(FontStyle::Italic),
            ..text(20.0, 28.0, 1.5, 0.0, 400, HEADING_FONT, Secondary)
        },
        TextRole::Link => text(16.0, 18.0, 1.6, 0.0, 500, BODY_FONT, Accent),
        TextRole::Tagline => text(14.0, 16.0, 1.4, 0.12, 600, BODY_FONT, Accent),
        TextRole::Caption => text(12.0, 14.0, 1.4, 0.01, 400, BODY_FONT, Neutral),
        TextRole::Menu => text(15.0, 17.0, 1.2, 0.02, 500, BODY_FONT, Text),
        TextRole::Submenu => text(14.0, 15.0, 1.3, 0.01, 400, BODY_FONT, Neutral),
        TextRole::Button => text(15.0, 17.0, 1.0, 0.04, 600, BODY_FONT, Background),
    }
}

pub fn default_typography() -> TypographySettings {
    TextRole::ALL
        .into_iter()
        .map(|role| (role, default_text_settings(role)))
        .collect()
}

pub fn default_brand_colors() -> BrandColorsSettings {
    BrandColorsSettings {
        primary: "#1B2A41".to_string(),
        secondary: "#324A5F".to_string(),
        accent: "#C9A227".to_string(),
        neutral: "#6B7280".to_string(),
        background: "#FFFFFF".to_string(),
        text: "#1F2937".to_string(),
    }
}

pub fn default_spacing() -> SpacingSettings {
    SpacingSettings {
        container_padding: ClampConfig::px(16.0, 64.0),
        grid_gap: ClampConfig::px(16.0, 40.0),
        section_margin: ClampConfig::new(
            3.0,
            8.0,
            DEFAULT_VIEWPORT_MIN,
            DEFAULT_VIEWPORT_MAX,
            CssUnit::Rem,
        ),
        grid_min_width: 280.0,
    }
}
