use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use dom_snapshot::{BackendNodeId, DomTree, NodeId};
use locator_core::LocatorEngine;
use tokio::fs;
use tracing::debug;

/// Selects one node of a snapshot.
#[derive(Args, Clone, Debug)]
pub struct TargetArgs {
    /// CDP `DOM.getDocument` JSON snapshot
    #[arg(long, value_name = "FILE")]
    pub snapshot: PathBuf,

    /// Expression that matches exactly the node to select
    #[arg(
        long,
        value_name = "XPATH",
        conflicts_with = "backend_node_id",
        required_unless_present = "backend_node_id"
    )]
    pub node: Option<String>,

    /// backendNodeId of the node to select
    #[arg(long, value_name = "ID")]
    pub backend_node_id: Option<u64>,
}

pub async fn load_snapshot(path: &Path) -> Result<DomTree> {
    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    let tree = DomTree::from_cdp_str(&raw)
        .with_context(|| format!("parsing snapshot {}", path.display()))?;
    debug!(path = %path.display(), nodes = tree.len(), "snapshot loaded");
    Ok(tree)
}

pub fn resolve_target(engine: &LocatorEngine, tree: &DomTree, target: &TargetArgs) -> Result<NodeId> {
    if let Some(backend) = target.backend_node_id {
        return tree
            .find_by_backend_node_id(BackendNodeId(backend))
            .with_context(|| format!("no node with backendNodeId {backend}"));
    }
    let Some(expression) = target.node.as_deref() else {
        bail!("either --node or --backend-node-id is required");
    };
    let nodes = engine.resolve(tree, expression)?;
    match nodes.as_slice() {
        [node] => Ok(*node),
        [] => bail!("{expression} matches no node"),
        many => bail!("{expression} matches {} nodes; select exactly one", many.len()),
    }
}
