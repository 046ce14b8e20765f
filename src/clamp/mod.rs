use crate::tokens::ClampConfig;

/// Range used when a token cannot be compiled.
pub const FALLBACK_CLAMP_CONFIG: ClampConfig = ClampConfig::px(16.0, 32.0);

/// `compile(&FALLBACK_CLAMP_CONFIG)`, spelled out so it never depends on the input path.
pub const FALLBACK_CLAMP: &str = "clamp(16px, calc(14.55px + 0.58vw), 32px)";

/// Compile a clamp config into a fluid CSS expression:
/// `clamp(MIN, calc(INTERCEPT + SLOPE vw), MAX)`.
///
/// Malformed configs (non-finite fields, `viewport_min >= viewport_max`) compile
/// to [`FALLBACK_CLAMP`] instead of failing.
pub fn compile(config: &ClampConfig) -> String {
    if !config.is_well_formed() {
        tracing::warn!(?config, "malformed clamp config; using fallback range");
        return FALLBACK_CLAMP.to_string();
    }
    if config.is_reversed() {
        tracing::debug!(
            min = config.min,
            max = config.max,
            "reverse fluid range; value shrinks as viewport grows"
        );
    }

    let slope = (config.max - config.min) / (config.viewport_max - config.viewport_min);
    let intercept = config.min - slope * config.viewport_min;
    format!(
        "clamp({min}{unit}, calc({intercept}{unit} + {slope}vw), {max}{unit})",
        min = format_number(config.min),
        max = format_number(config.max),
        intercept = format_number(round2(intercept)),
        slope = format_number(round2(slope * 100.0)),
        unit = config.unit.as_str(),
    )
}

/// Evaluate a compiled expression's middle term at `viewport` (px), without the clamp bounds.
pub fn interpolate(config: &ClampConfig, viewport: f64) -> f64 {
    let slope = (config.max - config.min) / (config.viewport_max - config.viewport_min);
    let intercept = config.min - slope * config.viewport_min;
    intercept + slope * viewport
}

fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Shortest decimal form; integral values print without a fractional part.
pub(crate) fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::{CssUnit, DEFAULT_VIEWPORT_MIN};

    /// Parse `clamp(A, calc(B + Cvw), D)` back into its numbers.
    fn parse(expr: &str, unit: &str) -> (f64, f64, f64, f64) {
        let inner = expr
            .strip_prefix("clamp(")
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap();
        let (min, rest) = inner.split_once(", calc(").unwrap();
        let (calc, max) = rest.split_once("), ").unwrap();
        let (intercept, slope) = calc.split_once(" + ").unwrap();
        let number = |text: &str, suffix: &str| -> f64 {
            text.strip_suffix(suffix).unwrap().parse().unwrap()
        };
        (
            number(min, unit),
            number(intercept, unit),
            number(slope, "vw"),
            number(max, unit),
        )
    }

    fn evaluate(expr: &str, unit: &str, viewport: f64) -> f64 {
        let (min, intercept, slope, max) = parse(expr, unit);
        let preferred = intercept + slope / 100.0 * viewport;
        let (low, high) = if min <= max { (min, max) } else { (max, min) };
        preferred.clamp(low, high)
    }

    #[test]
    fn compiles_documented_example() {
        let config = ClampConfig::new(32.0, 64.0, 250.0, 3000.0, CssUnit::Px);
        assert_eq!(compile(&config), "clamp(32px, calc(29.09px + 1.16vw), 64px)");
    }

    #[test]
    fn fallback_constant_matches_fallback_config() {
        assert_eq!(compile(&FALLBACK_CLAMP_CONFIG), FALLBACK_CLAMP);
    }

    #[test]
    fn malformed_configs_compile_to_fallback() {
        let cases = [
            ClampConfig::new(f64::NAN, 10.0, 250.0, 3000.0, CssUnit::Px),
            ClampConfig::new(10.0, f64::INFINITY, 250.0, 3000.0, CssUnit::Px),
            ClampConfig::new(10.0, 20.0, 800.0, 800.0, CssUnit::Px),
            ClampConfig::new(10.0, 20.0, 1200.0, 800.0, CssUnit::Rem),
        ];
        for config in cases {
            assert_eq!(compile(&config), FALLBACK_CLAMP, "{config:?}");
        }
    }

    #[test]
    fn endpoints_evaluate_to_min_and_max() {
        let cases = [
            ClampConfig::new(32.0, 64.0, 250.0, 3000.0, CssUnit::Px),
            ClampConfig::new(16.0, 18.0, 320.0, 1440.0, CssUnit::Px),
            ClampConfig::new(1.0, 2.5, 400.0, 1200.0, CssUnit::Rem),
            ClampConfig::new(-4.0, 12.0, 300.0, 1000.0, CssUnit::Em),
            ClampConfig::new(18.0, 17.0, 250.0, 3000.0, CssUnit::Px),
        ];
        for config in cases {
            let expr = compile(&config);
            let unit = config.unit.as_str();
            // intercept is rounded to 0.005, slope to 0.00005 per px of viewport
            let tolerance = 0.005 + 0.00005 * config.viewport_max;
            let at_min = evaluate(&expr, unit, config.viewport_min);
            let at_max = evaluate(&expr, unit, config.viewport_max);
            assert!((at_min - config.min).abs() <= tolerance, "{expr} at min");
            assert!((at_max - config.max).abs() <= tolerance, "{expr} at max");
        }
    }

    #[test]
    fn reverse_range_passes_through_with_negative_slope() {
        let expr = compile(&ClampConfig::px(18.0, 17.0));
        assert_eq!(expr, "clamp(18px, calc(18.09px + -0.04vw), 17px)");
    }

    #[test]
    fn flat_range_has_zero_slope() {
        let expr = compile(&ClampConfig::px(16.0, 16.0));
        assert_eq!(expr, "clamp(16px, calc(16px + 0vw), 16px)");
    }

    #[test]
    fn interpolate_hits_endpoints_exactly() {
        let config = ClampConfig::px(20.0, 40.0);
        assert!((interpolate(&config, DEFAULT_VIEWPORT_MIN) - 20.0).abs() < 1e-9);
        assert!((interpolate(&config, config.viewport_max) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn format_number_drops_trailing_zeroes() {
        assert_eq!(format_number(16.0), "16");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(-0.0), "0");
    }
}
