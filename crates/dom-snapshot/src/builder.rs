use xpath_forge_core_types::{BackendNodeId, NodeId};

use crate::model::{Attribute, DomTree, NodeData, NodeKind};

/// Programmatic construction of a [`DomTree`].
///
/// A node whose parent handle is unknown to the builder is kept as a detached
/// node. Document order is computed once in [`TreeBuilder::build`].
#[derive(Debug)]
pub struct TreeBuilder {
    nodes: Vec<NodeData>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
                backend_node_id: None,
                order: 0,
            }],
        }
    }

    pub fn document(&self) -> NodeId {
        NodeId(0)
    }

    /// Appends an element. Attribute names are lower-cased; the first
    /// occurrence of a duplicated name wins.
    pub fn element(&mut self, parent: NodeId, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
        let kind = element_kind(tag, attributes.iter().map(|(k, v)| (*k, *v)));
        self.push(Some(parent), kind)
    }

    /// Appends an element holding a single text child.
    pub fn element_with_text(
        &mut self,
        parent: NodeId,
        tag: &str,
        attributes: &[(&str, &str)],
        text: &str,
    ) -> NodeId {
        let element = self.element(parent, tag, attributes);
        self.text(element, text);
        element
    }

    pub(crate) fn element_owned(
        &mut self,
        parent: NodeId,
        tag: &str,
        attributes: Vec<(String, String)>,
    ) -> NodeId {
        let kind = element_kind(
            tag,
            attributes.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        );
        self.push(Some(parent), kind)
    }

    pub fn text(&mut self, parent: NodeId, value: &str) -> NodeId {
        self.push(Some(parent), NodeKind::Text(value.to_string()))
    }

    /// An element with no parent; it never matches absolute paths.
    pub fn detached_element(&mut self, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
        let kind = element_kind(tag, attributes.iter().map(|(k, v)| (*k, *v)));
        self.push(None, kind)
    }

    pub fn set_backend_node_id(&mut self, node: NodeId, backend: BackendNodeId) {
        if let Some(data) = self.nodes.get_mut(node.0) {
            data.backend_node_id = Some(backend);
        }
    }

    pub fn build(mut self) -> DomTree {
        let mut order = 0usize;
        let mut roots = vec![NodeId(0)];
        roots.extend(
            self.nodes
                .iter()
                .enumerate()
                .skip(1)
                .filter(|(_, node)| node.parent.is_none())
                .map(|(index, _)| NodeId(index)),
        );
        for root in roots {
            let mut stack = vec![root];
            while let Some(next) = stack.pop() {
                self.nodes[next.0].order = order;
                order += 1;
                stack.extend(self.nodes[next.0].children.iter().rev().copied());
            }
        }
        DomTree {
            nodes: self.nodes,
            document: NodeId(0),
        }
    }

    fn push(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent = parent.filter(|p| p.0 < self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent,
            children: Vec::new(),
            backend_node_id: None,
            order: 0,
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }
}

fn element_kind<'a>(tag: &str, attributes: impl Iterator<Item = (&'a str, &'a str)>) -> NodeKind {
    let mut attrs: Vec<Attribute> = Vec::new();
    for (name, value) in attributes {
        let name = name.to_ascii_lowercase();
        if attrs.iter().any(|existing| existing.name == name) {
            continue;
        }
        attrs.push(Attribute {
            name,
            value: value.to_string(),
        });
    }
    NodeKind::Element {
        tag: tag.to_ascii_lowercase(),
        attributes: attrs,
    }
}
