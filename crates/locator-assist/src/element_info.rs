use dom_snapshot::{DomTree, NodeId};
use serde::Serialize;

const TEXT_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeInfo {
    pub name: String,
    pub value: String,
}

/// What providers are told about the selected element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementInfo {
    pub tag_name: String,
    pub id: Option<String>,
    pub class_name: Option<String>,
    pub attributes: Vec<AttributeInfo>,
    /// Normalized text, cut at 100 characters
    pub text_content: Option<String>,
    pub parent_tag_name: Option<String>,
}

impl ElementInfo {
    /// `None` unless `node` is an element.
    pub fn from_node(tree: &DomTree, node: NodeId) -> Option<Self> {
        let tag_name = tree.tag_name(node)?.to_string();
        let text: String = tree.text(node).chars().take(TEXT_LIMIT).collect();
        Some(Self {
            tag_name,
            id: tree.id_attribute(node).map(str::to_string),
            class_name: tree
                .attribute(node, "class")
                .filter(|value| !value.trim().is_empty())
                .map(str::to_string),
            attributes: tree
                .attributes(node)
                .iter()
                .map(|attr| AttributeInfo {
                    name: attr.name.clone(),
                    value: attr.value.clone(),
                })
                .collect(),
            text_content: (!text.is_empty()).then_some(text),
            parent_tag_name: tree
                .parent_element(node)
                .and_then(|parent| tree.tag_name(parent))
                .map(str::to_string),
        })
    }
}
