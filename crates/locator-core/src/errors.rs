//! Error types for locator synthesis

use dom_snapshot::SnapshotError;
use thiserror::Error;
use xpath_forge_core_types::NodeId;

/// Failure to parse or evaluate a path expression.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum XPathError {
    /// Malformed expression
    #[error("syntax error at {position}: {message}")]
    Syntax { position: usize, message: String },

    /// Well-formed but outside the supported subset
    #[error("unsupported expression: {0}")]
    Unsupported(String),
}

impl XPathError {
    pub fn syntax(position: usize, message: impl Into<String>) -> Self {
        XPathError::Syntax {
            position,
            message: message.into(),
        }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        XPathError::Unsupported(message.into())
    }
}

/// Locator error enumeration
#[derive(Debug, Error)]
pub enum LocatorError {
    /// Not even the absolute fallback could be built for the node
    #[error("no locator candidate for {node}: {reason}")]
    NoCandidateFound { node: NodeId, reason: String },

    /// The node handle does not belong to the tree
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// Expression passed to an explicit resolve call is invalid
    #[error("invalid expression '{expression}': {source}")]
    InvalidExpression {
        expression: String,
        #[source]
        source: XPathError,
    },
}

impl LocatorError {
    /// Whether the selection itself is unusable (as opposed to a bad input expression).
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            LocatorError::NoCandidateFound { .. } | LocatorError::Snapshot(_)
        )
    }

    /// Get error severity (0=low, 1=medium, 2=high, 3=critical)
    pub fn severity(&self) -> u8 {
        match self {
            LocatorError::NoCandidateFound { .. } => 2,
            LocatorError::Snapshot(_) => 2,
            LocatorError::InvalidExpression { .. } => 1,
        }
    }
}
