use std::fmt::Write as _;

use anyhow::Result;
use clap::Args;
use locator_core::{Candidate, ConfidenceTier};
use serde::Serialize;
use tracing::info;

use super::context::CliContext;
use super::output::emit;
use super::target::{load_snapshot, resolve_target, TargetArgs};
use crate::snippet::{render_snippet, Framework};

#[derive(Args, Clone, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Number of regeneration requests after the initial locator
    #[arg(long, default_value_t = 0)]
    pub regenerate: usize,

    /// Lowest acceptable tier for regenerated locators (defaults to the current tier)
    #[arg(long, value_name = "TIER")]
    pub min_tier: Option<ConfidenceTier>,

    /// Also render a snippet for the final locator
    #[arg(long, value_enum)]
    pub framework: Option<Framework>,
}

#[derive(Debug, Serialize)]
struct GenerateReport {
    session: String,
    node: String,
    candidates: Vec<Candidate>,
    exhausted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    snippet: Option<String>,
}

pub async fn cmd_generate(args: GenerateArgs, ctx: &CliContext) -> Result<()> {
    let engine = ctx.engine();
    let tree = load_snapshot(&args.target.snapshot).await?;
    let node = resolve_target(&engine, &tree, &args.target)?;

    let mut session = engine.on_node_selected(&tree, node)?;
    let mut candidates = vec![session.current().clone()];
    let mut exhausted = false;

    for _ in 0..args.regenerate {
        let next = match args.min_tier {
            Some(min_tier) => engine.regenerate_at_least(&tree, &mut session, min_tier),
            None => engine.on_regenerate_requested(&tree, &mut session),
        };
        match next {
            Some(candidate) => candidates.push(candidate),
            None => {
                exhausted = true;
                break;
            }
        }
    }

    let current = session.current();
    info!(
        session = %session.id(),
        expression = current.expression(),
        rounds = candidates.len(),
        "generation finished"
    );
    let snippet = args
        .framework
        .map(|framework| render_snippet(framework, current.expression(), current.tier()));

    let report = GenerateReport {
        session: session.id().to_string(),
        node: tree.describe(node),
        candidates,
        exhausted,
        snippet,
    };
    emit(ctx.output(), &report, || render_human(&report))
}

fn render_human(report: &GenerateReport) -> String {
    let mut out = format!("Node: {}\n", report.node);
    for (idx, candidate) in report.candidates.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. [{}] {}  ({})",
            idx + 1,
            candidate.tier(),
            candidate.expression(),
            candidate.rationale()
        );
    }
    if report.exhausted {
        out.push_str("No further locator available; keeping the last one.\n");
    }
    if let Some(snippet) = &report.snippet {
        out.push('\n');
        out.push_str(snippet);
        out.push('\n');
    }
    out.trim_end().to_string()
}
