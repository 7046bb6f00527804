use anyhow::Result;
use clap::Args;
use locator_core::{classify, ConfidenceTier};
use serde::Serialize;

use super::context::CliContext;
use super::output::emit;
use crate::snippet::{render_snippet, Framework};

#[derive(Args, Clone, Debug)]
pub struct SnippetArgs {
    /// Target framework (defaults to `snippet.default_framework`)
    #[arg(short, long, value_enum)]
    pub framework: Option<Framework>,

    /// Tier shown in the status line (defaults to the classifier's rating)
    #[arg(long, value_name = "TIER")]
    pub tier: Option<ConfidenceTier>,

    /// Locator expression
    pub expression: String,
}

#[derive(Debug, Serialize)]
struct SnippetReport {
    framework: Framework,
    tier: ConfidenceTier,
    snippet: String,
}

pub fn cmd_snippet(args: SnippetArgs, ctx: &CliContext) -> Result<()> {
    let framework = args
        .framework
        .unwrap_or(ctx.config().snippet.default_framework);
    let tier = args.tier.unwrap_or_else(|| classify(&args.expression));
    let report = SnippetReport {
        framework,
        tier,
        snippet: render_snippet(framework, &args.expression, tier),
    };
    emit(ctx.output(), &report, || report.snippet.clone())
}
