use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use locator_core::positional::absolute_path;
use serde::Serialize;

use super::context::CliContext;
use super::output::emit;
use super::target::load_snapshot;

#[derive(Args, Clone, Debug)]
pub struct EvaluateArgs {
    /// CDP `DOM.getDocument` JSON snapshot
    #[arg(long, value_name = "FILE")]
    pub snapshot: PathBuf,

    /// Expression to evaluate
    pub expression: String,
}

#[derive(Debug, Serialize)]
struct Match {
    node: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    backend_node_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

#[derive(Debug, Serialize)]
struct EvaluateReport {
    expression: String,
    count: usize,
    unique: bool,
    matches: Vec<Match>,
}

pub async fn cmd_evaluate(args: EvaluateArgs, ctx: &CliContext) -> Result<()> {
    let engine = ctx.engine();
    let tree = load_snapshot(&args.snapshot).await?;
    let nodes = engine.resolve(&tree, &args.expression)?;

    let matches: Vec<Match> = nodes
        .iter()
        .map(|&node| Match {
            node: tree.describe(node),
            backend_node_id: tree.backend_node_id(node).map(|id| id.0),
            path: absolute_path(&tree, node),
        })
        .collect();
    let report = EvaluateReport {
        expression: args.expression,
        count: matches.len(),
        unique: matches.len() == 1,
        matches,
    };

    emit(ctx.output(), &report, || {
        let mut out = format!("{} match(es)", report.count);
        for m in &report.matches {
            let _ = write!(out, "\n  {}", m.node);
            if let Some(path) = &m.path {
                let _ = write!(out, "  {path}");
            }
        }
        out
    })
}
