use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static SPACE_AROUND_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*([{}:;,])\s*").unwrap());
static SEMICOLON_BEFORE_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r";+\}").unwrap());
static EMPTY_RULE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^{};]*\{\}").unwrap());
static PROPERTY_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[a-z][a-z0-9]*(-[a-z0-9]+)*$").unwrap());

/// Non-fatal stylesheet problem reported by [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    #[error("unbalanced braces: {opened} opened, {closed} closed")]
    UnbalancedBraces { opened: usize, closed: usize },
    #[error("empty rule body: {selector}")]
    EmptyRule { selector: String },
    #[error("invalid property name `{property}` in {selector}")]
    InvalidProperty { selector: String, property: String },
    #[error("missing semicolon after `{property}` in {selector}")]
    MissingSemicolon { selector: String, property: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationReport {
    pub optimized: String,
    pub original_size: usize,
    pub optimized_size: usize,
    /// `optimized_size / original_size`; `1.0` for empty input.
    pub compression_ratio: f64,
    pub errors: Vec<ValidationIssue>,
}

/// validate → minify → deduplicate. Validation findings never stop the pipeline.
pub fn optimize(css: &str) -> OptimizationReport {
    let errors = validate(css);
    if !errors.is_empty() {
        tracing::debug!(count = errors.len(), "stylesheet validation reported issues");
    }
    let optimized = deduplicate(&minify(css));
    let original_size = css.len();
    let optimized_size = optimized.len();
    let compression_ratio = if original_size == 0 {
        1.0
    } else {
        optimized_size as f64 / original_size as f64
    };

    OptimizationReport {
        optimized,
        original_size,
        optimized_size,
        compression_ratio,
        errors,
    }
}

pub fn validate(css: &str) -> Vec<ValidationIssue> {
    let css = COMMENT.replace_all(css, "");
    let mut issues = Vec::new();

    let opened = css.matches('{').count();
    let closed = css.matches('}').count();
    if opened != closed {
        issues.push(ValidationIssue::UnbalancedBraces { opened, closed });
    }

    // (selector, body start, has nested block)
    let mut stack: Vec<(String, usize, bool)> = Vec::new();
    let mut segment_start = 0;
    for (index, ch) in css.char_indices() {
        match ch {
            '{' => {
                if let Some(parent) = stack.last_mut() {
                    parent.2 = true;
                }
                let selector = css[segment_start..index].trim().to_string();
                stack.push((selector, index + 1, false));
                segment_start = index + 1;
            }
            '}' => {
                if let Some((selector, body_start, nested)) = stack.pop() {
                    if !nested {
                        check_declarations(&selector, &css[body_start..index], &mut issues);
                    }
                }
                segment_start = index + 1;
            }
            ';' if !stack.is_empty() => segment_start = index + 1,
            _ => {}
        }
    }

    issues
}

fn check_declarations(selector: &str, body: &str, issues: &mut Vec<ValidationIssue>) {
    if body.trim().is_empty() {
        issues.push(ValidationIssue::EmptyRule {
            selector: selector.to_string(),
        });
        return;
    }

    let segments: Vec<&str> = body.split(';').collect();
    let last = segments.len() - 1;
    for (position, segment) in segments.iter().enumerate() {
        let declaration = segment.trim();
        if declaration.is_empty() {
            continue;
        }
        let property = declaration
            .split_once(':')
            .map_or(declaration, |(name, _)| name)
            .trim();
        if !is_valid_property(property) {
            issues.push(ValidationIssue::InvalidProperty {
                selector: selector.to_string(),
                property: property.to_string(),
            });
        }
        if position == last {
            issues.push(ValidationIssue::MissingSemicolon {
                selector: selector.to_string(),
                property: property.to_string(),
            });
        }
    }
}

fn is_valid_property(property: &str) -> bool {
    (property.starts_with("--") && property.len() > 2) || PROPERTY_NAME.is_match(property)
}

pub fn minify(css: &str) -> String {
    let without_comments = COMMENT.replace_all(css, "");
    let collapsed = WHITESPACE_RUN.replace_all(&without_comments, " ");
    let mut minified = SPACE_AROUND_PUNCTUATION
        .replace_all(&collapsed, "$1")
        .into_owned();

    // Dropping an empty rule can empty its parent block.
    loop {
        let stripped = SEMICOLON_BEFORE_CLOSE.replace_all(&minified, "}");
        let next = EMPTY_RULE.replace_all(&stripped, "").into_owned();
        if next == minified {
            break;
        }
        minified = next;
    }

    minified.trim().to_string()
}

/// Drop exact-text duplicates among top-level rules, keeping first-seen order.
pub fn deduplicate(css: &str) -> String {
    let mut seen = HashSet::new();
    let mut output = String::with_capacity(css.len());
    for fragment in rule_fragments(css) {
        if seen.insert(fragment) {
            output.push_str(fragment);
        }
    }
    output
}

/// Split into `}`-terminated top-level fragments; nested blocks stay inside their parent.
pub fn rule_fragments(css: &str) -> Vec<&str> {
    let mut fragments = Vec::new();
    let mut depth = 0_usize;
    let mut start = 0;
    for (index, ch) in css.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    fragments.push(&css[start..=index]);
                    start = index + 1;
                }
            }
            _ => {}
        }
    }
    if start < css.len() {
        fragments.push(&css[start..]);
    }
    fragments
}
