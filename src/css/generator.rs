use crate::clamp::{compile, format_number};
use crate::tokens::{
    BrandColorsSettings, SpacingSettings, TextRole, TextTypeSettings, TypographySettings,
};

/// Used verbatim when the spacing tokens cannot be compiled.
pub const FALLBACK_SPACING_BLOCK: &str = "  --spacing-container-padding: clamp(16px, calc(11.64px + 1.75vw), 64px);
  --spacing-grid-gap: clamp(16px, calc(13.82px + 0.87vw), 40px);
  --spacing-section-margin: clamp(3rem, calc(2.55rem + 0.18vw), 8rem);
  --grid-min-width: 280px;
";

const HEADER: &str = "/* master-controller design tokens */\n";

/// Build the complete stylesheet: one `:root` block of custom properties followed by
/// the fixed utility classes. Output depends only on the arguments.
pub fn generate(
    colors: &BrandColorsSettings,
    typography: &TypographySettings,
    spacing: &SpacingSettings,
) -> String {
    let mut css = String::with_capacity(8 * 1024);
    css.push_str(HEADER);
    css.push_str(":root {\n");
    css.push_str(&color_properties(colors));
    css.push_str(&typography_properties(typography, colors));
    css.push_str(&spacing_properties(spacing));
    css.push_str("}\n");
    css.push_str(&utility_classes());
    css
}

pub fn color_properties(colors: &BrandColorsSettings) -> String {
    let mut block = String::new();
    for (name, value) in colors.iter() {
        declaration(&mut block, &format!("--color-{name}"), value);
    }
    block
}

/// Text colors are emitted as literal hex so the rule never depends on
/// `--color-*` having been parsed first.
pub fn typography_properties(
    typography: &TypographySettings,
    colors: &BrandColorsSettings,
) -> String {
    let mut block = String::new();
    for (role, settings) in typography.iter() {
        if !settings.size.is_well_formed() {
            tracing::warn!(%role, size = ?settings.size, "skipping text role with unusable size");
            continue;
        }
        role_properties(&mut block, role, settings, colors);
    }
    block
}

fn role_properties(
    block: &mut String,
    role: TextRole,
    settings: &TextTypeSettings,
    colors: &BrandColorsSettings,
) {
    declaration(block, &format!("--font-size-{role}"), &compile(&settings.size));
    declaration(
        block,
        &format!("--line-height-{role}"),
        &format_number(settings.line_height),
    );
    declaration(
        block,
        &format!("--letter-spacing-{role}"),
        &format!("{}em", format_number(settings.letter_spacing)),
    );
    declaration(
        block,
        &format!("--font-weight-{role}"),
        &settings.font_weight.to_string(),
    );
    declaration(
        block,
        &format!("--font-family-{role}"),
        &font_family_value(&settings.font_family),
    );
    if let Some(style) = settings.font_style {
        declaration(block, &format!("--font-style-{role}"), style.as_str());
    }
    declaration(
        block,
        &format!("--text-color-{role}"),
        colors.get(settings.color),
    );
}

pub fn spacing_properties(spacing: &SpacingSettings) -> String {
    if !spacing.is_well_formed() {
        tracing::warn!(?spacing, "spacing tokens malformed; using fallback block");
        return FALLBACK_SPACING_BLOCK.to_string();
    }
    let mut block = String::new();
    declaration(
        &mut block,
        "--spacing-container-padding",
        &compile(&spacing.container_padding),
    );
    declaration(&mut block, "--spacing-grid-gap", &compile(&spacing.grid_gap));
    declaration(
        &mut block,
        "--spacing-section-margin",
        &compile(&spacing.section_margin),
    );
    declaration(
        &mut block,
        "--grid-min-width",
        &format!("{}px", format_number(spacing.grid_min_width)),
    );
    block
}

/// Quote a family name unless it already is a `var(...)` reference or quoted.
fn font_family_value(family: &str) -> String {
    let family = family.trim();
    if family.starts_with("var(") || family.starts_with('"') || family.starts_with('\'') {
        return family.to_string();
    }
    format!("\"{}\"", family.replace('"', "\\\""))
}

fn declaration(block: &mut String, property: &str, value: &str) {
    block.push_str("  ");
    block.push_str(property);
    block.push_str(": ");
    block.push_str(value);
    block.push_str(";\n");
}

pub fn utility_classes() -> String {
    let mut css = String::new();
    for role in TextRole::ALL {
        let selector = match role {
            TextRole::Link => "a,\n.text-link".to_string(),
            _ => format!(".text-{role}"),
        };
        css.push('\n');
        css.push_str(&selector);
        css.push_str(" {\n");
        declaration(&mut css, "font-size", &format!("var(--font-size-{role})"));
        declaration(&mut css, "line-height", &format!("var(--line-height-{role})"));
        declaration(
            &mut css,
            "letter-spacing",
            &format!("var(--letter-spacing-{role})"),
        );
        declaration(&mut css, "font-weight", &format!("var(--font-weight-{role})"));
        declaration(&mut css, "font-family", &format!("var(--font-family-{role})"));
        declaration(
            &mut css,
            "font-style",
            &format!("var(--font-style-{role}, normal)"),
        );
        declaration(&mut css, "color", &format!("var(--text-color-{role})"));
        if role == TextRole::Link {
            declaration(&mut css, "text-decoration", "underline");
            declaration(&mut css, "text-underline-offset", "0.2em");
        }
        css.push_str("}\n");
    }
    css.push_str(LAYOUT_UTILITIES);
    css
}

const LAYOUT_UTILITIES: &str = "
a:hover,
.text-link:hover {
  color: var(--color-primary);
}

.grid-responsive {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(var(--grid-min-width), 1fr));
  gap: var(--spacing-grid-gap);
}

.container-responsive {
  width: 100%;
  margin-inline: auto;
  padding-inline: var(--spacing-container-padding);
}

.section-spacing {
  margin-block: var(--spacing-section-margin);
}
";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::optimizer::validate;
    use crate::tokens::defaults::{default_brand_colors, default_spacing, default_typography};
    use crate::tokens::{ClampConfig, ColorName, CssUnit, FontStyle};

    fn generate_defaults() -> String {
        generate(
            &default_brand_colors(),
            &default_typography(),
            &default_spacing(),
        )
    }

    #[test]
    fn generation_is_deterministic() {
        assert_eq!(generate_defaults(), generate_defaults());
    }

    #[test]
    fn default_stylesheet_validates_cleanly() {
        let warnings = validate(&generate_defaults());
        assert!(warnings.is_empty(), "{warnings:?}");
    }

    #[test]
    fn root_block_precedes_utilities_and_exposes_contract_names() {
        let css = generate_defaults();
        let root = css.find(":root {").unwrap();
        let utilities = css.find(".text-h1 {").unwrap();
        assert!(root < utilities);
        for needle in [
            "--color-primary: #1B2A41;",
            "--font-size-h1: clamp(32px, calc(29.09px + 1.16vw), 64px);",
            "--line-height-h1: 1.1;",
            "--letter-spacing-h1: -0.02em;",
            "--font-weight-h1: 700;",
            "--font-family-h1: \"Playfair Display\";",
            "--font-style-quote: italic;",
            "--spacing-grid-gap:",
            "--grid-min-width: 280px;",
            ".grid-responsive {",
            ".container-responsive {",
            ".section-spacing {",
            "a,\n.text-link {",
            ".text-tagline {",
        ] {
            assert!(css.contains(needle), "missing {needle}");
        }
        assert!(!css.contains("--font-style-h1:"));
    }

    #[test]
    fn text_color_is_resolved_to_literal_hex() {
        let mut colors = default_brand_colors();
        colors.set(ColorName::Primary, "#ABCDEF".to_string());
        let css = generate(&colors, &default_typography(), &default_spacing());
        assert!(css.contains("--text-color-h1: #ABCDEF;"));
        assert!(!css.contains("--text-color-h1: var("));
    }

    #[test]
    fn var_font_family_is_not_quoted() {
        assert_eq!(font_family_value("var(--brand-font)"), "var(--brand-font)");
        assert_eq!(font_family_value("Inter"), "\"Inter\"");
        assert_eq!(font_family_value("'Inter'"), "'Inter'");
    }

    #[test]
    fn role_with_unusable_size_is_skipped() {
        let mut typography = default_typography();
        let mut h2 = typography.get(TextRole::H2).unwrap().clone();
        h2.size = ClampConfig::new(10.0, 20.0, 900.0, 300.0, CssUnit::Px);
        h2.font_style = Some(FontStyle::Normal);
        typography.insert(TextRole::H2, h2);

        let block = typography_properties(&typography, &default_brand_colors());
        assert!(!block.contains("--font-size-h2"));
        assert!(!block.contains("--text-color-h2"));
        assert!(block.contains("--font-size-h1"));
        assert!(block.contains("--font-size-h3"));
    }

    #[test]
    fn default_spacing_matches_fallback_block() {
        assert_eq!(spacing_properties(&default_spacing()), FALLBACK_SPACING_BLOCK);
    }

    #[test]
    fn malformed_spacing_uses_fallback_block() {
        let mut spacing = default_spacing();
        spacing.grid_min_width = f64::NAN;
        assert_eq!(spacing_properties(&spacing), FALLBACK_SPACING_BLOCK);

        let mut spacing = default_spacing();
        spacing.grid_gap.viewport_max = spacing.grid_gap.viewport_min;
        assert_eq!(spacing_properties(&spacing), FALLBACK_SPACING_BLOCK);
    }

    #[test]
    fn color_edit_changes_only_color_dependent_lines() {
        let before = generate_defaults();
        let mut colors = default_brand_colors();
        colors.set(ColorName::Accent, "#000".to_string());
        let after = generate(&colors, &default_typography(), &default_spacing());
        let changed: Vec<_> = before
            .lines()
            .zip(after.lines())
            .filter(|(a, b)| a != b)
            .map(|(_, b)| b.trim().to_string())
            .collect();
        assert!(!changed.is_empty());
        assert!(changed.iter().all(|line| line.contains("#000")));
    }
}
