//! Locator synthesis engine
//!
//! Given one node of a parsed document this crate produces an XPath locator
//! that re-identifies exactly that node, together with a confidence tier:
//! - an ordered strategy bank (ids, stable attributes, text, classes, positions)
//! - a uniqueness oracle every candidate must pass before it is surfaced
//! - a confidence classifier working on the expression text
//! - regeneration that never repeats a consumed strategy or a surfaced expression
//! - a gate for locators suggested by outside providers

pub mod bridge;
pub mod confidence;
pub mod engine;
pub mod errors;
pub mod generator;
pub mod oracle;
pub mod positional;
pub mod regenerator;
pub mod session;
pub mod strategies;
pub mod types;
pub mod xpath;

pub use bridge::{submit_external_candidate, ExternalVerdict};
pub use confidence::classify;
pub use engine::LocatorEngine;
pub use errors::{LocatorError, XPathError};
pub use generator::generate_initial;
pub use oracle::Oracle;
pub use regenerator::regenerate;
pub use session::Session;
pub use strategies::StrategyKind;
pub use types::{Candidate, ClassMatch, ConfidenceTier, LocatorOptions};
