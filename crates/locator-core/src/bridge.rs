//! Gate for locators suggested from outside the strategy bank.

use dom_snapshot::DomTree;
use serde::Serialize;
use tracing::{info, warn};

use crate::confidence::classify;
use crate::oracle::Oracle;
use crate::session::Session;
use crate::types::Candidate;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "verdict", rename_all = "lowercase")]
pub enum ExternalVerdict {
    Accepted(Candidate),
    Rejected { reason: String },
}

impl ExternalVerdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ExternalVerdict::Accepted(_))
    }

    fn rejected(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        warn!(%reason, "external locator rejected");
        ExternalVerdict::Rejected { reason }
    }
}

/// Validates `raw` against the session's node. Accepted expressions become the
/// session's current candidate with a tier taken from [`classify`].
pub fn submit_external_candidate(
    tree: &DomTree,
    session: &mut Session,
    raw: &str,
) -> ExternalVerdict {
    let expression = raw.trim();
    if expression.is_empty() {
        return ExternalVerdict::rejected("empty suggestion");
    }

    let nodes = match Oracle::new(tree).resolve(expression) {
        Ok(nodes) => nodes,
        Err(err) => return ExternalVerdict::rejected(format!("does not evaluate: {err}")),
    };
    match nodes.as_slice() {
        [node] if *node == session.selected() => {}
        [_] => return ExternalVerdict::rejected("selects a different node"),
        many => {
            return ExternalVerdict::rejected(format!(
                "matches {} nodes instead of exactly one",
                many.len()
            ))
        }
    }

    let candidate = Candidate::new(
        expression.to_string(),
        classify(expression),
        "external suggestion",
        None,
    );
    info!(
        session = %session.id(),
        expression,
        tier = %candidate.tier(),
        "external locator accepted"
    );
    session.record(candidate.clone());
    ExternalVerdict::Accepted(candidate)
}
