//! Confidence classification from the textual shape of a locator.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::ConfidenceTier;

/// `//tag[@id='v']` or `//*[@id='v']` and nothing else.
static ID_ONLY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^//(?:\*|[A-Za-z_][\w.:-]*)\s*\[\s*@id\s*=\s*(?:'[^']*'|"[^"]*"|concat\([^\[\]]*\))\s*\]$"#,
    )
    .expect("static id pattern")
});

static STABLE_ATTRIBUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"@(?:data-testid|data-test|name|aria-label)\s*[=,)\]]")
        .expect("static attribute pattern")
});

static FRAGILE_MATCH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"@class\s*[=,)\]]|text\(\)|contains\(").expect("static caution pattern")
});

/// Classifies a locator expression. Pure: the result depends on the text only.
pub fn classify(expression: &str) -> ConfidenceTier {
    let expression = expression.trim();
    if ID_ONLY_RE.is_match(expression) || STABLE_ATTRIBUTE_RE.is_match(expression) {
        ConfidenceTier::Reliable
    } else if FRAGILE_MATCH_RE.is_match(expression) {
        ConfidenceTier::Caution
    } else {
        ConfidenceTier::Weak
    }
}
