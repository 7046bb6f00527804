//! Regeneration: a different locator of at least the requested tier, never
//! repeating a consumed strategy or a surfaced expression.

use dom_snapshot::DomTree;
use tracing::{debug, info, warn};

use crate::oracle::Oracle;
use crate::session::Session;
use crate::strategies::StrategyKind;
use crate::types::{Candidate, ConfidenceTier, LocatorOptions};

/// Returns the new current candidate, or `None` when the extended chain is
/// exhausted. The session is left untouched on `None`.
pub fn regenerate(
    tree: &DomTree,
    session: &mut Session,
    min_tier: ConfidenceTier,
    options: &LocatorOptions,
) -> Option<Candidate> {
    let node = session.selected();
    if tree.check(node).is_err() {
        warn!(%node, "session node is not part of this tree");
        return None;
    }

    let oracle = Oracle::new(tree);
    let eligible: Vec<StrategyKind> = StrategyKind::extended_chain()
        .iter()
        .copied()
        .filter(|strategy| strategy.min_tier() >= min_tier)
        .filter(|strategy| !session.has_used(*strategy))
        .collect();

    for strategy in eligible {
        let Some(candidate) = strategy.synthesize(&oracle, options, node) else {
            debug!(strategy = strategy.id(), "strategy produced no candidate");
            continue;
        };
        if session.has_surfaced(candidate.expression()) {
            debug!(
                strategy = strategy.id(),
                expression = candidate.expression(),
                "expression already surfaced"
            );
            continue;
        }
        if !oracle.identifies(candidate.expression(), node) {
            continue;
        }
        info!(
            session = %session.id(),
            strategy = strategy.id(),
            expression = candidate.expression(),
            tier = %candidate.tier(),
            "locator regenerated"
        );
        session.record(candidate.clone());
        return Some(candidate);
    }

    warn!(
        session = %session.id(),
        min_tier = %min_tier,
        "no alternative locator found; keeping current"
    );
    None
}
