use dom_snapshot::DomTree;
use locator_core::{Candidate, ExternalVerdict, LocatorEngine, Session};
use serde::Serialize;
use tracing::{info, warn};

use crate::chain::{ProviderChain, Suggestion};
use crate::element_info::ElementInfo;

/// Result of one assist request.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AssistOutcome {
    /// A provider's suggestion passed validation and is now the session's current candidate.
    Accepted { candidate: Candidate, provider: String },
    /// No provider answered or the suggestion was rejected; `candidate` is the
    /// local regeneration result, if any.
    LocalFallback {
        candidate: Option<Candidate>,
        reason: String,
    },
}

impl AssistOutcome {
    pub fn candidate(&self) -> Option<&Candidate> {
        match self {
            AssistOutcome::Accepted { candidate, .. } => Some(candidate),
            AssistOutcome::LocalFallback { candidate, .. } => candidate.as_ref(),
        }
    }
}

pub struct AssistCoordinator {
    chain: ProviderChain,
    engine: LocatorEngine,
}

impl AssistCoordinator {
    pub fn new(chain: ProviderChain, engine: LocatorEngine) -> Self {
        Self { chain, engine }
    }

    pub fn chain(&self) -> &ProviderChain {
        &self.chain
    }

    /// Asks the provider chain for a locator of the session's node. The first
    /// suggestion goes through the same validation gate as any external
    /// expression; when it is rejected, or no provider answers, the local bank
    /// regenerates instead.
    pub async fn assist(&self, tree: &DomTree, session: &mut Session) -> AssistOutcome {
        let Some(info) = ElementInfo::from_node(tree, session.selected()) else {
            return self.fallback(tree, session, "selected node is not an element".to_string());
        };

        let Suggestion {
            provider,
            expression,
        } = match self.chain.run(&info).await {
            Ok(suggestion) => suggestion,
            Err(err) => return self.fallback(tree, session, err.to_string()),
        };

        match self.engine.submit_external(tree, session, &expression) {
            ExternalVerdict::Accepted(candidate) => {
                info!(%provider, tier = %candidate.tier(), "assist accepted");
                AssistOutcome::Accepted {
                    candidate,
                    provider,
                }
            }
            ExternalVerdict::Rejected { reason } => self.fallback(
                tree,
                session,
                format!("{provider} suggested {expression}, rejected: {reason}"),
            ),
        }
    }

    fn fallback(&self, tree: &DomTree, session: &mut Session, reason: String) -> AssistOutcome {
        warn!(%reason, "assist falling back to local regeneration");
        let candidate = self.engine.on_regenerate_requested(tree, session);
        AssistOutcome::LocalFallback { candidate, reason }
    }
}
