use anyhow::Result;
use clap::Args;
use locator_core::{classify, ConfidenceTier};
use serde::Serialize;

use super::context::CliContext;
use super::output::emit;

#[derive(Args, Clone, Debug)]
pub struct ClassifyArgs {
    /// Expression to rate
    pub expression: String,
}

#[derive(Debug, Serialize)]
struct ClassifyReport<'a> {
    expression: &'a str,
    tier: ConfidenceTier,
    colour: &'static str,
}

pub fn cmd_classify(args: ClassifyArgs, ctx: &CliContext) -> Result<()> {
    let tier = classify(&args.expression);
    let report = ClassifyReport {
        expression: &args.expression,
        tier,
        colour: tier.colour(),
    };
    emit(ctx.output(), &report, || {
        format!("{} ({})", tier.label(), tier.colour())
    })
}
