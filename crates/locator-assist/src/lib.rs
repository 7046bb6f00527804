//! Outside help for locator synthesis
//!
//! Text-generation services are asked for a locator in a fixed order. The first
//! suggestion that comes back is cleaned and then validated by `locator-core`
//! before it can replace the session's current candidate. When no provider
//! answers, or the suggestion is rejected, the local strategy bank
//! regenerates instead.

pub mod chain;
pub mod coordinator;
pub mod element_info;
pub mod errors;
pub mod huggingface;
pub mod openrouter;
pub mod prompt;
pub mod provider;
pub mod settings;
pub mod utils;

pub use chain::{ProviderChain, Suggestion};
pub use coordinator::{AssistCoordinator, AssistOutcome};
pub use element_info::{AttributeInfo, ElementInfo};
pub use errors::AssistError;
pub use huggingface::HuggingFaceProvider;
pub use openrouter::OpenRouterProvider;
pub use provider::{LocatorProvider, MockLocatorProvider};
pub use settings::{AssistSettings, HuggingFaceConfig, OpenRouterConfig, ProviderKind};
pub use utils::clean_expression;
