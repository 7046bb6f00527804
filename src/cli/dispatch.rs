use super::assist::cmd_assist;
use super::classify::cmd_classify;
use super::config::cmd_config;
use super::env::CliArgs;
use super::evaluate::cmd_evaluate;
use super::generate::cmd_generate;
use super::snippet::cmd_snippet;
use crate::cli::commands::Commands;
use crate::cli::context::CliContext;
use anyhow::Result;

pub async fn dispatch(cli: &CliArgs, ctx: &CliContext) -> Result<()> {
    match cli.command.clone() {
        Commands::Generate(args) => cmd_generate(args, ctx).await,
        Commands::Classify(args) => cmd_classify(args, ctx),
        Commands::Evaluate(args) => cmd_evaluate(args, ctx).await,
        Commands::Snippet(args) => cmd_snippet(args, ctx),
        Commands::Assist(args) => cmd_assist(args, ctx).await,
        Commands::Config(args) => cmd_config(args, ctx).await,
    }
}
