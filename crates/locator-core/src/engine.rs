use dom_snapshot::{DomTree, NodeId};

use crate::bridge::{submit_external_candidate, ExternalVerdict};
use crate::errors::LocatorError;
use crate::generator::generate_initial;
use crate::oracle::Oracle;
use crate::regenerator::regenerate;
use crate::session::Session;
use crate::types::{Candidate, ConfidenceTier, LocatorOptions};

/// Entry point mirroring the user-facing triggers: select a node, ask for
/// another locator, or hand in an outside suggestion.
#[derive(Debug, Clone, Default)]
pub struct LocatorEngine {
    options: LocatorOptions,
}

impl LocatorEngine {
    pub fn new(options: LocatorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LocatorOptions {
        &self.options
    }

    /// A new selection always starts a new session.
    pub fn on_node_selected(&self, tree: &DomTree, node: NodeId) -> Result<Session, LocatorError> {
        generate_initial(tree, node, &self.options)
    }

    /// Regenerates with the current candidate's tier as the floor.
    pub fn on_regenerate_requested(
        &self,
        tree: &DomTree,
        session: &mut Session,
    ) -> Option<Candidate> {
        let floor = session.current().tier();
        regenerate(tree, session, floor, &self.options)
    }

    pub fn regenerate_at_least(
        &self,
        tree: &DomTree,
        session: &mut Session,
        min_tier: ConfidenceTier,
    ) -> Option<Candidate> {
        regenerate(tree, session, min_tier, &self.options)
    }

    pub fn submit_external(
        &self,
        tree: &DomTree,
        session: &mut Session,
        raw: &str,
    ) -> ExternalVerdict {
        submit_external_candidate(tree, session, raw)
    }

    /// Matches of `expression`, with evaluation errors reported.
    pub fn resolve(&self, tree: &DomTree, expression: &str) -> Result<Vec<NodeId>, LocatorError> {
        Oracle::new(tree)
            .resolve(expression)
            .map_err(|source| LocatorError::InvalidExpression {
                expression: expression.to_string(),
                source,
            })
    }
}
