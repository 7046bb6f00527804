//! First-time generation over the initial strategy chain.

use dom_snapshot::{DomTree, NodeId};
use tracing::{debug, info};

use crate::errors::LocatorError;
use crate::oracle::Oracle;
use crate::session::Session;
use crate::strategies::StrategyKind;
use crate::types::LocatorOptions;

/// Starts a fresh session for `node` holding the first candidate that
/// identifies it.
///
/// Fails when not even the absolute path identifies the node, which for an
/// element means it is not attached to the document.
pub fn generate_initial(
    tree: &DomTree,
    node: NodeId,
    options: &LocatorOptions,
) -> Result<Session, LocatorError> {
    tree.check(node)?;
    if !tree.is_element(node) {
        return Err(LocatorError::NoCandidateFound {
            node,
            reason: "selected node is not an element".to_string(),
        });
    }

    let oracle = Oracle::new(tree);
    for strategy in StrategyKind::initial_chain() {
        let Some(candidate) = strategy.synthesize(&oracle, options, node) else {
            debug!(strategy = strategy.id(), "strategy produced no candidate");
            continue;
        };
        if !oracle.identifies(candidate.expression(), node) {
            debug!(
                strategy = strategy.id(),
                expression = candidate.expression(),
                "candidate failed uniqueness check"
            );
            continue;
        }
        info!(
            node = %tree.describe(node),
            strategy = strategy.id(),
            expression = candidate.expression(),
            tier = %candidate.tier(),
            "locator generated"
        );
        return Ok(Session::start(node, candidate));
    }

    let reason = if tree.is_attached(node) {
        "no strategy produced an expression that identifies the node"
    } else {
        "node is not attached to the document"
    };
    Err(LocatorError::NoCandidateFound {
        node,
        reason: reason.to_string(),
    })
}
