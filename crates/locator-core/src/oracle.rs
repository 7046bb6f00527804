//! Uniqueness oracle: the single gate every candidate passes before it is surfaced.

use dom_snapshot::{DomTree, NodeId};
use tracing::debug;

use crate::errors::XPathError;
use crate::xpath;

#[derive(Clone, Copy)]
pub struct Oracle<'t> {
    tree: &'t DomTree,
}

impl<'t> Oracle<'t> {
    pub fn new(tree: &'t DomTree) -> Self {
        Self { tree }
    }

    pub fn tree(&self) -> &'t DomTree {
        self.tree
    }

    /// Matches of `expression` in document order, or the evaluation error.
    pub fn resolve(&self, expression: &str) -> Result<Vec<NodeId>, XPathError> {
        xpath::select(self.tree, expression)
    }

    /// Number of matching nodes. Evaluation errors count as zero matches.
    pub fn evaluate(&self, expression: &str) -> usize {
        match self.resolve(expression) {
            Ok(nodes) => nodes.len(),
            Err(err) => {
                debug!(expression, error = %err, "expression did not evaluate");
                0
            }
        }
    }

    pub fn is_unique(&self, expression: &str) -> bool {
        self.evaluate(expression) == 1
    }

    /// True when `expression` matches exactly one node and that node is `node`.
    pub fn identifies(&self, expression: &str, node: NodeId) -> bool {
        match self.resolve(expression) {
            Ok(nodes) => nodes.as_slice() == [node],
            Err(err) => {
                debug!(expression, error = %err, "expression did not evaluate");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use dom_snapshot::TreeBuilder;

    use super::*;

    #[test]
    fn errors_count_as_zero() {
        let mut builder = TreeBuilder::new();
        let html = builder.element(builder.document(), "html", &[]);
        let a = builder.element(html, "a", &[("id", "x")]);
        let b = builder.element(html, "a", &[]);
        let tree = builder.build();
        let oracle = Oracle::new(&tree);

        assert_eq!(oracle.evaluate("//a["), 0);
        assert_eq!(oracle.evaluate("//a/@id"), 0);
        assert_eq!(oracle.evaluate("//a"), 2);
        assert!(oracle.is_unique("//*[@id='x']"));
        assert!(oracle.identifies("//*[@id='x']", a));
        assert!(!oracle.identifies("//*[@id='x']", b));
        assert!(!oracle.identifies("//a", a));
        assert!(oracle.resolve("//a[").is_err());
    }
}
