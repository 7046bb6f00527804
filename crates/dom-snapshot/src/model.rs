use std::fmt::Write as _;

use xpath_forge_core_types::{BackendNodeId, NodeId};

use crate::errors::SnapshotError;
use crate::text::normalize_space;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element {
        /// Lower-cased tag name
        tag: String,
        attributes: Vec<Attribute>,
    },
    Text(String),
}

#[derive(Clone, Debug)]
pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) backend_node_id: Option<BackendNodeId>,
    pub(crate) order: usize,
}

/// Immutable arena tree. Node handles are indices into the arena.
#[derive(Clone, Debug)]
pub struct DomTree {
    pub(crate) nodes: Vec<NodeData>,
    pub(crate) document: NodeId,
}

impl DomTree {
    fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0)
    }

    /// Number of nodes in the arena, detached ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    /// Returns `id` back when the handle belongs to this tree.
    pub fn check(&self, id: NodeId) -> Result<NodeId, SnapshotError> {
        if self.contains(id) {
            Ok(id)
        } else {
            Err(SnapshotError::UnknownNode(id))
        }
    }

    /// The document node every attached node descends from.
    pub fn document(&self) -> NodeId {
        self.document
    }

    /// Document root used as the start of absolute paths.
    pub fn root(&self) -> NodeId {
        self.document
    }

    /// The first element child of the document (normally `<html>`).
    pub fn root_element(&self) -> Option<NodeId> {
        self.element_children(self.document).into_iter().next()
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node(id).map(|node| &node.kind)
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Element { .. }))
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Text(_)))
    }

    pub fn is_document(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Document))
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Element { tag, .. } => Some(tag.as_str()),
            _ => None,
        }
    }

    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        match self.kind(id) {
            Some(NodeKind::Element { attributes, .. }) => attributes,
            _ => &[],
        }
    }

    /// Attribute lookup; names compare ASCII case-insensitively.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
            .map(|attr| attr.value.as_str())
    }

    /// The `id` attribute when present and non-empty.
    pub fn id_attribute(&self, id: NodeId) -> Option<&str> {
        self.attribute(id, "id").filter(|value| !value.is_empty())
    }

    /// Individual class tokens in attribute order.
    pub fn class_tokens(&self, id: NodeId) -> Vec<&str> {
        self.attribute(id, "class")
            .map(|classes| classes.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Value of a text node.
    pub fn text_value(&self, id: NodeId) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// XPath string-value: the concatenation of all descendant text.
    pub fn string_value(&self, id: NodeId) -> String {
        if let Some(value) = self.text_value(id) {
            return value.to_string();
        }
        let mut out = String::new();
        for node in self.descendants(id) {
            if let Some(value) = self.text_value(node) {
                out.push_str(value);
            }
        }
        out
    }

    /// Normalized text content (trimmed, whitespace runs collapsed).
    pub fn text(&self, id: NodeId) -> String {
        normalize_space(&self.string_value(id))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|parent| self.is_element(*parent))
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|child| self.is_element(*child))
            .collect()
    }

    /// Direct text-node children, in order.
    pub fn text_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|child| self.is_text(*child))
            .collect()
    }

    /// Element siblings sharing the node's tag, the node itself included, in order.
    pub fn siblings_of_same_tag(&self, id: NodeId) -> Vec<NodeId> {
        let Some(tag) = self.tag_name(id) else {
            return Vec::new();
        };
        match self.parent(id) {
            Some(parent) => self
                .children(parent)
                .iter()
                .copied()
                .filter(|sibling| self.tag_name(*sibling) == Some(tag))
                .collect(),
            None => vec![id],
        }
    }

    /// 1-based position among [`Self::siblings_of_same_tag`].
    pub fn same_tag_index(&self, id: NodeId) -> Option<usize> {
        self.siblings_of_same_tag(id)
            .iter()
            .position(|sibling| *sibling == id)
            .map(|index| index + 1)
    }

    /// All descendants in document order, `id` excluded.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Ancestors from the parent upwards.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.parent(id);
        while let Some(node) = current {
            out.push(node);
            current = self.parent(node);
        }
        out
    }

    /// Whether the parent chain reaches the document node.
    pub fn is_attached(&self, id: NodeId) -> bool {
        id == self.document || self.ancestors(id).last() == Some(&self.document)
    }

    /// Rank in document order. Detached subtrees sort after the document.
    pub fn doc_order(&self, id: NodeId) -> usize {
        self.node(id).map(|node| node.order).unwrap_or(usize::MAX)
    }

    pub fn backend_node_id(&self, id: NodeId) -> Option<BackendNodeId> {
        self.node(id)?.backend_node_id
    }

    pub fn find_by_backend_node_id(&self, backend: BackendNodeId) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.backend_node_id == Some(backend))
            .map(NodeId)
    }

    /// Short human readable summary, e.g. `<button id="go" class="btn">`.
    pub fn describe(&self, id: NodeId) -> String {
        match self.kind(id) {
            Some(NodeKind::Document) => "#document".to_string(),
            Some(NodeKind::Text(value)) => format!("#text {:?}", normalize_space(value)),
            Some(NodeKind::Element { tag, .. }) => {
                let mut out = format!("<{tag}");
                for name in ["id", "name", "data-testid", "class"] {
                    if let Some(value) = self.attribute(id, name) {
                        let _ = write!(out, " {name}=\"{value}\"");
                    }
                }
                out.push('>');
                out
            }
            None => format!("<unknown {id}>"),
        }
    }
}
