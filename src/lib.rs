//! xpath-forge command line
//!
//! Loads DOM snapshots, generates and regenerates locators through
//! `locator-core`, asks outside providers through `locator-assist` and
//! renders framework snippets.

pub mod cli;
pub mod config;
pub mod snippet;

pub use config::Config;
pub use snippet::{render_snippet, Framework};
