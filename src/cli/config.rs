use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use tokio::fs;

use super::context::CliContext;
use crate::config::Config;

#[derive(Args, Clone, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Clone, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration (file values plus environment overrides)
    Show,

    /// Print the configuration file path in use
    Path,

    /// Validate the configuration file
    Validate,
}

pub async fn cmd_config(args: ConfigArgs, ctx: &CliContext) -> Result<()> {
    let path = ctx.config_path();
    match args.action {
        ConfigAction::Show => {
            let mut shown = ctx.config().clone();
            redact(&mut shown);
            println!("Current configuration ({}):", path.display());
            print!("{}", serde_yaml::to_string(&shown)?);
        }
        ConfigAction::Path => println!("{}", path.display()),
        ConfigAction::Validate => {
            if fs::try_exists(path).await? {
                let raw = fs::read_to_string(path)
                    .await
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_yaml::from_str::<Config>(&raw)
                    .with_context(|| format!("parsing {}", path.display()))?;
                println!("Configuration file {} is valid", path.display());
            } else {
                println!(
                    "No configuration file at {}; defaults are valid",
                    path.display()
                );
            }
        }
    }

    Ok(())
}

fn redact(config: &mut Config) {
    const MASK: &str = "***";
    if config.assist.huggingface.token.is_some() {
        config.assist.huggingface.token = Some(MASK.to_string());
    }
    if config.assist.openrouter.api_key.is_some() {
        config.assist.openrouter.api_key = Some(MASK.to_string());
    }
}
