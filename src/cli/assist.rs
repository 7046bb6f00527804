use anyhow::{Context, Result};
use clap::Args;
use locator_assist::{AssistCoordinator, AssistOutcome, ProviderChain};
use serde::Serialize;

use super::context::CliContext;
use super::output::emit;
use super::target::{load_snapshot, resolve_target, TargetArgs};

#[derive(Args, Clone, Debug)]
pub struct AssistArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Debug, Serialize)]
struct AssistReport {
    node: String,
    initial: locator_core::Candidate,
    #[serde(flatten)]
    outcome: AssistOutcome,
}

pub async fn cmd_assist(args: AssistArgs, ctx: &CliContext) -> Result<()> {
    let engine = ctx.engine();
    let chain = ProviderChain::from_settings(&ctx.config().assist)
        .context("assist providers unavailable")?;
    let coordinator = AssistCoordinator::new(chain, engine.clone());

    let tree = load_snapshot(&args.target.snapshot).await?;
    let node = resolve_target(&engine, &tree, &args.target)?;
    let mut session = engine.on_node_selected(&tree, node)?;
    let initial = session.current().clone();

    let outcome = coordinator.assist(&tree, &mut session).await;
    let report = AssistReport {
        node: tree.describe(node),
        initial,
        outcome,
    };

    emit(ctx.output(), &report, || match &report.outcome {
        AssistOutcome::Accepted {
            candidate,
            provider,
        } => format!(
            "[{}] {}  (suggested by {provider})",
            candidate.tier(),
            candidate.expression()
        ),
        AssistOutcome::LocalFallback {
            candidate: Some(candidate),
            reason,
        } => format!(
            "[{}] {}  (local fallback: {reason})",
            candidate.tier(),
            candidate.expression()
        ),
        AssistOutcome::LocalFallback {
            candidate: None,
            reason,
        } => format!(
            "[{}] {}  (kept; {reason})",
            report.initial.tier(),
            report.initial.expression()
        ),
    })
}
