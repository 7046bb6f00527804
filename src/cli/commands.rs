use clap::Subcommand;

use super::assist::AssistArgs;
use super::classify::ClassifyArgs;
use super::config::ConfigArgs;
use super::evaluate::EvaluateArgs;
use super::generate::GenerateArgs;
use super::snippet::SnippetArgs;

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Generate a locator for one node of a DOM snapshot, optionally regenerating
    Generate(GenerateArgs),

    /// Report the confidence tier of an expression
    Classify(ClassifyArgs),

    /// Evaluate an expression against a DOM snapshot
    Evaluate(EvaluateArgs),

    /// Render a framework snippet for an expression
    Snippet(SnippetArgs),

    /// Ask the configured providers for a locator, falling back to local regeneration
    Assist(AssistArgs),

    /// Inspect xpath-forge configuration
    Config(ConfigArgs),
}
