//! Loader for the nested node format returned by CDP `DOM.getDocument`.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use xpath_forge_core_types::{BackendNodeId, NodeId};

use crate::builder::TreeBuilder;
use crate::errors::SnapshotError;
use crate::model::DomTree;

const ELEMENT_NODE: u32 = 1;
const TEXT_NODE: u32 = 3;
const CDATA_NODE: u32 = 4;
const DOCUMENT_NODE: u32 = 9;

/// One CDP node without its children; those are walked separately so nesting
/// depth never turns into recursion.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdpNode {
    #[serde(default)]
    node_type: u32,
    #[serde(default)]
    node_name: String,
    #[serde(default)]
    local_name: Option<String>,
    #[serde(default)]
    node_value: Option<String>,
    #[serde(default)]
    attributes: Vec<String>,
    #[serde(default)]
    backend_node_id: Option<u64>,
}

impl CdpNode {
    fn read(value: &Value) -> Result<CdpNode, SnapshotError> {
        Ok(CdpNode::deserialize(value)?)
    }
}

fn children_of(value: &Value) -> &[Value] {
    value
        .get("children")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

impl DomTree {
    /// Builds a tree from a `DOM.getDocument` result (`{"root": ...}`) or a bare node.
    pub fn from_cdp_json(value: &Value) -> Result<DomTree, SnapshotError> {
        let root_value = value.get("root").unwrap_or(value);
        let root = CdpNode::read(root_value)?;
        let mut builder = TreeBuilder::new();
        let document = builder.document();
        let mut pending: Vec<(NodeId, &Value)> = Vec::new();
        match root.node_type {
            DOCUMENT_NODE => {
                if let Some(id) = root.backend_node_id {
                    builder.set_backend_node_id(document, BackendNodeId(id));
                }
                pending.extend(children_of(root_value).iter().rev().map(|child| (document, child)));
            }
            ELEMENT_NODE => pending.push((document, root_value)),
            other => return Err(SnapshotError::UnexpectedRoot(other)),
        }

        // Children are pushed in reverse so siblings pop in document order.
        while let Some((parent, value)) = pending.pop() {
            let node = CdpNode::read(value)?;
            let Some(id) = append(&mut builder, parent, &node)? else {
                continue;
            };
            if node.node_type == ELEMENT_NODE {
                pending.extend(children_of(value).iter().rev().map(|child| (id, child)));
            }
        }

        let tree = builder.build();
        debug!(nodes = tree.len(), "loaded CDP snapshot");
        Ok(tree)
    }

    /// Parses raw snapshot JSON of any nesting depth.
    pub fn from_cdp_str(raw: &str) -> Result<DomTree, SnapshotError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        deserializer.disable_recursion_limit();
        let value = Value::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
        deserializer.end()?;
        Self::from_cdp_json(&value)
    }
}

/// Adds one node under `parent`; returns `None` for node types the tree skips.
fn append(
    builder: &mut TreeBuilder,
    parent: NodeId,
    node: &CdpNode,
) -> Result<Option<NodeId>, SnapshotError> {
    let id = match node.node_type {
        ELEMENT_NODE => {
            let tag = node
                .local_name
                .as_deref()
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| node.node_name.to_ascii_lowercase());
            if node.attributes.len() % 2 != 0 {
                return Err(SnapshotError::MalformedAttributes {
                    node: tag,
                    len: node.attributes.len(),
                });
            }
            let attributes = node
                .attributes
                .chunks(2)
                .map(|pair| (pair[0].clone(), pair[1].clone()))
                .collect();
            builder.element_owned(parent, &tag, attributes)
        }
        TEXT_NODE | CDATA_NODE => builder.text(parent, node.node_value.as_deref().unwrap_or("")),
        _ => return Ok(None),
    };
    if let Some(backend) = node.backend_node_id {
        builder.set_backend_node_id(id, BackendNodeId(backend));
    }
    Ok(Some(id))
}
