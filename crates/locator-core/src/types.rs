//! Core types for locator synthesis

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::strategies::StrategyKind;

/// How likely a locator is to survive document changes.
///
/// Ordered `Weak < Caution < Reliable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    Weak,
    Caution,
    Reliable,
}

impl ConfidenceTier {
    /// Numeric rank (Reliable=3, Caution=2, Weak=1)
    pub fn rank(self) -> u8 {
        match self {
            ConfidenceTier::Reliable => 3,
            ConfidenceTier::Caution => 2,
            ConfidenceTier::Weak => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConfidenceTier::Reliable => "Reliable",
            ConfidenceTier::Caution => "Caution",
            ConfidenceTier::Weak => "Weak",
        }
    }

    /// Colour used by the status line of rendered snippets.
    pub fn colour(self) -> &'static str {
        match self {
            ConfidenceTier::Reliable => "green",
            ConfidenceTier::Caution => "yellow",
            ConfidenceTier::Weak => "red",
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ConfidenceTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reliable" => Ok(ConfidenceTier::Reliable),
            "caution" => Ok(ConfidenceTier::Caution),
            "weak" => Ok(ConfidenceTier::Weak),
            other => Err(format!(
                "unknown confidence tier '{other}' (expected reliable, caution or weak)"
            )),
        }
    }
}

/// A locator that has been proven to identify the selected node.
///
/// Only the orchestrators in this crate construct candidates, after the
/// uniqueness check has passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    expression: String,
    tier: ConfidenceTier,
    rationale: String,
    strategy: Option<StrategyKind>,
}

impl Candidate {
    pub(crate) fn new(
        expression: String,
        tier: ConfidenceTier,
        rationale: impl Into<String>,
        strategy: Option<StrategyKind>,
    ) -> Self {
        Self {
            expression,
            tier,
            rationale: rationale.into(),
            strategy,
        }
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn tier(&self) -> ConfidenceTier {
        self.tier
    }

    pub fn rationale(&self) -> &str {
        &self.rationale
    }

    /// Strategy that produced the candidate; `None` for external suggestions.
    pub fn strategy(&self) -> Option<StrategyKind> {
        self.strategy
    }
}

/// How class-based strategies compare against the `class` attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassMatch {
    /// `@class='token'`: only matches elements whose whole class attribute is the token
    #[default]
    Exact,
    /// Whitespace-separated token match
    Token,
}

impl FromStr for ClassMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(ClassMatch::Exact),
            "token" => Ok(ClassMatch::Token),
            other => Err(format!(
                "unknown class match mode '{other}' (expected exact or token)"
            )),
        }
    }
}

/// Tunables for synthesis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorOptions {
    pub class_match: ClassMatch,
}

impl LocatorOptions {
    pub fn with_class_match(mut self, class_match: ClassMatch) -> Self {
        self.class_match = class_match;
        self
    }
}
