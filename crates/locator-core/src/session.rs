//! Per-selection memory: consumed strategies, current candidate, surfaced history.

use std::collections::BTreeSet;

use dom_snapshot::NodeId;
use serde::Serialize;
use xpath_forge_core_types::SessionId;

use crate::strategies::StrategyKind;
use crate::types::Candidate;

/// State for one selected node. Created by generation; a new selection means a
/// new session, so the consumed strategy set always starts empty.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    id: SessionId,
    selected: NodeId,
    used: BTreeSet<StrategyKind>,
    current: Candidate,
    history: Vec<String>,
}

impl Session {
    pub(crate) fn start(selected: NodeId, candidate: Candidate) -> Self {
        let mut session = Self {
            id: SessionId::new(),
            selected,
            used: BTreeSet::new(),
            current: candidate.clone(),
            history: Vec::new(),
        };
        session.record(candidate);
        session
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn selected(&self) -> NodeId {
        self.selected
    }

    pub fn current(&self) -> &Candidate {
        &self.current
    }

    pub fn used_strategies(&self) -> &BTreeSet<StrategyKind> {
        &self.used
    }

    pub fn has_used(&self, strategy: StrategyKind) -> bool {
        self.used.contains(&strategy)
    }

    /// Every expression surfaced in this session, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn has_surfaced(&self, expression: &str) -> bool {
        self.history.iter().any(|seen| seen == expression)
    }

    /// Makes `candidate` current and remembers its strategy and expression.
    pub(crate) fn record(&mut self, candidate: Candidate) {
        if let Some(strategy) = candidate.strategy() {
            self.used.insert(strategy);
        }
        if !self.has_surfaced(candidate.expression()) {
            self.history.push(candidate.expression().to_string());
        }
        self.current = candidate;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ConfidenceTier;

    fn candidate(expression: &str, strategy: Option<StrategyKind>) -> Candidate {
        Candidate::new(
            expression.to_string(),
            ConfidenceTier::Caution,
            "test",
            strategy,
        )
    }

    #[test]
    fn start_records_first_candidate() {
        let session = Session::start(
            NodeId(3),
            candidate("//*[@class='a']", Some(StrategyKind::UniqueClass)),
        );
        assert_eq!(session.selected(), NodeId(3));
        assert!(session.has_used(StrategyKind::UniqueClass));
        assert_eq!(session.history(), ["//*[@class='a']".to_string()]);
    }

    #[test]
    fn external_candidates_do_not_consume_strategies() {
        let mut session = Session::start(
            NodeId(1),
            candidate("//*[@class='a']", Some(StrategyKind::UniqueClass)),
        );
        session.record(candidate("//div[@title='x']", None));
        assert_eq!(session.used_strategies().len(), 1);
        assert_eq!(session.current().expression(), "//div[@title='x']");
        assert!(session.has_surfaced("//*[@class='a']"));
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn sessions_get_distinct_ids() {
        let a = Session::start(NodeId(1), candidate("//a", None));
        let b = Session::start(NodeId(1), candidate("//a", None));
        assert_ne!(a.id(), b.id());
    }
}
