use thiserror::Error;
use xpath_forge_core_types::NodeId;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("invalid snapshot json: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("unexpected snapshot root (nodeType {0})")]
    UnexpectedRoot(u32),

    #[error("malformed attribute list on <{node}>: {len} entries")]
    MalformedAttributes { node: String, len: usize },

    #[error("unknown node: {0}")]
    UnknownNode(NodeId),
}
